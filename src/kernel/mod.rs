pub mod catalog;
pub mod config;
pub mod decode;
pub mod engine;
pub mod poller;
pub mod raw;
pub mod state;
pub mod telemetry;
pub mod time;
pub mod version;
