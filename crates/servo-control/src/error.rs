//! Error types for controller startup and shutdown.

use rotary_servo_io::{IoError, LineId, PwmId};

/// Startup step that can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupStep {
    /// Claiming the encoder clock input.
    ClaimClock(LineId),
    /// Claiming the encoder data input.
    ClaimData(LineId),
    /// Claiming and enabling the servo PWM output.
    ClaimPwm(PwmId),
}

impl core::fmt::Display for StartupStep {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ClaimClock(id) => write!(f, "claim clock input {id}"),
            Self::ClaimData(id) => write!(f, "claim data input {id}"),
            Self::ClaimPwm(id) => write!(f, "claim PWM output {id}"),
        }
    }
}

/// Fatal startup failure. The control loop never starts.
#[derive(Debug, thiserror::Error)]
#[error("failed to {step}: {source}")]
pub struct StartupError {
    /// Step that failed.
    pub step: StartupStep,
    /// Underlying I/O error.
    #[source]
    pub source: IoError,
}

impl StartupError {
    /// Create a startup error.
    #[must_use]
    pub fn new(step: StartupStep, source: IoError) -> Self {
        Self { step, source }
    }
}

/// Which release action failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseAction {
    /// Disabling the PWM output.
    DisablePwm,
    /// Releasing the PWM channel.
    ReleasePwm,
    /// Releasing a digital input.
    ReleaseLine,
}

/// One failed step of the best-effort release sequence.
#[derive(Debug, thiserror::Error)]
#[error("failed to release {resource} ({action:?}): {source}")]
pub struct ReleaseFailure {
    /// Resource name, e.g. `gpio23`.
    pub resource: String,
    /// Action that failed.
    pub action: ReleaseAction,
    /// Underlying I/O error.
    #[source]
    pub source: IoError,
}
