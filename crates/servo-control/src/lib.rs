//! # rotary-servo
//!
//! Drives a hobby servo from a rotary encoder.
//!
//! [`ControlLoop`] polls the encoder's clock and data inputs every tick,
//! decodes rising clock edges into a clamped 0 to 180 degree position and
//! writes the matching pulse width to the PWM output. Transient read and
//! write failures skip or absorb a tick; only startup failures are fatal.
//!
//! ```rust
//! use rotary_servo::{ControlConfig, ControlLoop};
//! use rotary_servo_encoder::Level;
//! use rotary_servo_io::{CLOCK_LINE, mock::MockBackend};
//!
//! let mut backend = MockBackend::new();
//! backend.queue_levels(CLOCK_LINE, [Level::Low, Level::High]);
//!
//! let mut control = ControlLoop::start(&mut backend, ControlConfig::default())?;
//! control.tick();
//! assert_eq!(control.position().degrees(), 5);
//!
//! let report = control.shutdown();
//! assert!(report.is_clean());
//! assert!(!backend.pwm_enabled());
//! # Ok::<(), rotary_servo::StartupError>(())
//! ```

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod control;
pub mod error;
pub mod logging;
pub mod signal;
pub mod state;

pub use config::{ConfigError, ControlConfig};
pub use control::{ControlLoop, ShutdownReport, TickOutcome};
pub use error::{ReleaseAction, ReleaseFailure, StartupError, StartupStep};
pub use state::{LoopMetrics, LoopState};
