//! # rotary-servo-io
//!
//! Hardware boundary for the rotary servo controller.
//!
//! - [`DigitalLine`] and [`PwmChannel`] are the only capabilities the
//!   control loop needs: read a level, write a pulse width, release.
//! - [`IoBackend`] claims and configures them once at startup.
//! - [`sysfs::SysfsBackend`] drives the Linux GPIO/PWM class interface.
//! - [`mock::MockBackend`] is an in-memory stand-in with failure injection.
//!
//! Handles are scoped: dropping one releases it. Explicit `release()` calls
//! exist so shutdown can report each failure instead of logging it from a
//! destructor.

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod error;
pub mod mock;
pub mod prelude;
pub mod sysfs;
pub mod traits;

pub use error::{IoError, IoResult};
pub use sysfs::{DEFAULT_SYSFS_ROOT, SysfsBackend, SysfsLine, SysfsPwm};
pub use traits::{DigitalLine, IoBackend, LineId, PwmChannel, PwmId};

/// Encoder clock input.
pub const CLOCK_LINE: LineId = LineId(23);

/// Encoder data input.
pub const DATA_LINE: LineId = LineId(24);

/// Servo PWM output.
pub const SERVO_PWM: PwmId = PwmId {
    chip: 0,
    channel: 0,
};

/// Servo PWM period (50 Hz).
pub const SERVO_PERIOD_NS: u32 = 20_000_000;
