//! I/O capability traits.
//!
//! The control loop only talks to hardware through these traits, so the
//! sysfs backend and the in-memory mock are interchangeable.

use rotary_servo_encoder::{DutyCycle, Level};

use crate::error::IoResult;

/// Identifier of a digital input line (kernel GPIO number).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineId(pub u32);

impl core::fmt::Display for LineId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "gpio{}", self.0)
    }
}

/// Identifier of a PWM output (chip and channel index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PwmId {
    /// PWM controller index.
    pub chip: u32,
    /// Channel index on the controller.
    pub channel: u32,
}

impl core::fmt::Display for PwmId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "pwmchip{}/pwm{}", self.chip, self.channel)
    }
}

/// A claimed digital input.
///
/// `release` must be idempotent: once a line has been released, further
/// calls succeed without touching hardware.
pub trait DigitalLine: Send {
    /// Line identifier.
    fn id(&self) -> LineId;

    /// Read the current level.
    ///
    /// # Errors
    ///
    /// Returns an error if the level cannot be read or parsed.
    fn read(&mut self) -> IoResult<Level>;

    /// Give the line back to the system.
    ///
    /// # Errors
    ///
    /// Returns an error if the release request fails.
    fn release(&mut self) -> IoResult<()>;
}

/// A claimed, enabled PWM output.
pub trait PwmChannel: Send {
    /// Channel identifier.
    fn id(&self) -> PwmId;

    /// Set the pulse on-time.
    ///
    /// # Errors
    ///
    /// Returns an error if the duty cycle cannot be written.
    fn set_duty(&mut self, duty: DutyCycle) -> IoResult<()>;

    /// Stop driving the output.
    ///
    /// Attempted once: after a call, successful or not, [`release`] no
    /// longer disables on its own.
    ///
    /// [`release`]: PwmChannel::release
    ///
    /// # Errors
    ///
    /// Returns an error if the channel cannot be disabled.
    fn disable(&mut self) -> IoResult<()>;

    /// Give the channel back to the system.
    ///
    /// Idempotent. If [`disable`](PwmChannel::disable) was never called the
    /// output is disabled first.
    ///
    /// # Errors
    ///
    /// Returns an error if the implicit disable or the release request
    /// fails.
    fn release(&mut self) -> IoResult<()>;
}

/// Source of claimed lines and channels.
pub trait IoBackend {
    /// Digital input handle type.
    type Line: DigitalLine;
    /// PWM output handle type.
    type Pwm: PwmChannel;

    /// Claim `id` and configure it as an input.
    ///
    /// # Errors
    ///
    /// Returns an error if the line cannot be claimed or configured.
    fn claim_input(&mut self, id: LineId) -> IoResult<Self::Line>;

    /// Claim `id`, program its period and enable the output.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel cannot be claimed or configured.
    fn claim_pwm(&mut self, id: PwmId, period_ns: u32) -> IoResult<Self::Pwm>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        assert_eq!(LineId(23).to_string(), "gpio23");
        assert_eq!(
            PwmId {
                chip: 0,
                channel: 1
            }
            .to_string(),
            "pwmchip0/pwm1"
        );
    }

    #[test]
    fn test_trait_bounds() {
        fn assert_send<T: Send + ?Sized>() {}
        assert_send::<dyn DigitalLine>();
        assert_send::<dyn PwmChannel>();
    }
}
