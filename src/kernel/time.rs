use serde::Serialize;
use std::fmt;

/// Refresh counter. Tick `n` is the snapshot produced by the n-th update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Tick(pub u64);

/// Default host polling cadence.
pub const POLL_MS: u64 = 100;

impl Tick {
    pub fn next(self) -> Self {
        Tick(self.0 + 1)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
