//! Decode telemetry.
//!
//! Every non-fatal problem hit while normalizing a refresh ends up here as a
//! [`event::TelemetryEvent`]. The layer is write-only from the engine's point
//! of view: nothing recorded here feeds back into snapshot construction.
//!
//! Events carry parameter keys, codes and short diagnostics. Never full raw
//! tables.

pub mod event;
pub mod metrics;
pub mod recorder;
