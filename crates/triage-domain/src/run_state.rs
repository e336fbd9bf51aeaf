//! Run state module - lifecycle of one intake run

use std::fmt;

/// Whether an intake run is in progress
///
/// Gates the start of a new run and whether exports are permitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RunState {
    /// No run in progress
    #[default]
    Idle,

    /// A run has started and not yet settled
    Running,
}

impl RunState {
    /// Get the state name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Idle => "idle",
            RunState::Running => "running",
        }
    }

    /// Whether a new run may start
    pub fn can_start(&self) -> bool {
        matches!(self, RunState::Idle)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Monotonic identifier of a run
///
/// A run publishes its result only while its identifier is still current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RunId(u64);

impl RunId {
    /// Create a run identifier from a raw value
    pub fn from_value(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw value
    pub fn value(&self) -> u64 {
        self.0
    }

    /// The identifier following this one
    pub fn next(&self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_idle() {
        assert_eq!(RunState::default(), RunState::Idle);
        assert!(RunState::Idle.can_start());
        assert!(!RunState::Running.can_start());
    }

    #[test]
    fn test_run_id_progression() {
        let first = RunId::default();
        let second = first.next();
        assert!(second > first);
        assert_eq!(second.value(), 1);
        assert_eq!(second.to_string(), "#1");
    }
}
