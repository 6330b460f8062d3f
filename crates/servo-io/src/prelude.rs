//! Prelude for rotary-servo-io.

pub use crate::error::{IoError, IoResult};
pub use crate::mock::{MockBackend, MockEvent, MockOp};
pub use crate::sysfs::{DEFAULT_SYSFS_ROOT, SysfsBackend};
pub use crate::traits::{DigitalLine, IoBackend, LineId, PwmChannel, PwmId};
pub use crate::{CLOCK_LINE, DATA_LINE, SERVO_PERIOD_NS, SERVO_PWM};
