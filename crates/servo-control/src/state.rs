//! Controller lifecycle state and counters.

/// Controller lifecycle.
///
/// ```text
/// Uninitialized ──start() ok──► Running ──signal──► ShuttingDown ──► Terminated
///       │                         ▲  │
///       │                         └──┘ tick (read/write failures absorbed)
///       └──start() err──────────────────────────────────────────► Terminated
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopState {
    /// Resources not yet acquired.
    #[default]
    Uninitialized,
    /// Polling the encoder.
    Running,
    /// Releasing resources.
    ShuttingDown,
    /// All release attempts made.
    Terminated,
}

impl LoopState {
    /// Get the state as a string slice.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Uninitialized => "Uninitialized",
            Self::Running => "Running",
            Self::ShuttingDown => "ShuttingDown",
            Self::Terminated => "Terminated",
        }
    }
}

impl core::fmt::Display for LoopState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Control loop counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoopMetrics {
    /// Poll iterations run.
    pub ticks: u64,
    /// Rising edges recognized.
    pub edges: u64,
    /// Ticks skipped because a line could not be read.
    pub read_failures: u64,
    /// Duty-cycle writes that succeeded.
    pub duty_writes: u64,
    /// Duty-cycle writes that failed.
    pub write_failures: u64,
}

impl LoopMetrics {
    /// Create zeroed metrics.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_display() {
        assert_eq!(LoopState::default(), LoopState::Uninitialized);
        assert_eq!(LoopState::ShuttingDown.to_string(), "ShuttingDown");
    }
}
