//! Linux sysfs GPIO and PWM backend.
//!
//! Lines and channels are exported through the legacy class interface:
//!
//! ```text
//! <root>/gpio/export              <- "23"
//! <root>/gpio/gpio23/direction    <- "in"
//! <root>/gpio/gpio23/value        -> "0" | "1"
//! <root>/gpio/unexport            <- "23"
//! <root>/pwm/pwmchip0/export      <- "0"
//! <root>/pwm/pwmchip0/pwm0/period      <- "20000000"
//! <root>/pwm/pwmchip0/pwm0/duty_cycle  <- "1500000"
//! <root>/pwm/pwmchip0/pwm0/enable      <- "1" | "0"
//! <root>/pwm/pwmchip0/unexport    <- "0"
//! ```
//!
//! Each handle unexports itself when dropped. An explicit `release()` does
//! the same and reports the error instead of logging it.

use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use rotary_servo_encoder::{DutyCycle, Level};
use tracing::{debug, warn};

use crate::error::{IoError, IoResult};
use crate::traits::{DigitalLine, IoBackend, LineId, PwmChannel, PwmId};

/// Default sysfs class directory.
pub const DEFAULT_SYSFS_ROOT: &str = "/sys/class";

/// Write `value` to a register file.
fn write_attr(path: &Path, value: &str) -> IoResult<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(path)
        .map_err(|source| IoError::Open {
            path: path.to_path_buf(),
            source,
        })?;
    file.write_all(value.as_bytes())
        .map_err(|source| IoError::Write {
            path: path.to_path_buf(),
            value: value.to_string(),
            source,
        })
}

/// Read a `0`/`1` level from the first byte of a register file.
fn read_level(path: &Path) -> IoResult<Level> {
    let mut file = File::open(path).map_err(|source| IoError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut buf = [0u8; 1];
    let n = file.read(&mut buf).map_err(|source| IoError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let raw = if n == 1 { Some(buf[0]) } else { None };
    raw.and_then(Level::from_raw)
        .ok_or_else(|| IoError::InvalidLevel {
            path: path.to_path_buf(),
            value: String::from_utf8_lossy(buf.get(..n).unwrap_or_default()).into_owned(),
        })
}

/// Sysfs backend rooted at a class directory (normally `/sys/class`).
#[derive(Debug, Clone)]
pub struct SysfsBackend {
    root: PathBuf,
}

impl SysfsBackend {
    /// Create a backend rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Class directory this backend writes under.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn gpio_dir(&self) -> PathBuf {
        self.root.join("gpio")
    }

    fn pwm_chip_dir(&self, id: PwmId) -> PathBuf {
        self.root.join("pwm").join(format!("pwmchip{}", id.chip))
    }
}

impl Default for SysfsBackend {
    fn default() -> Self {
        Self::new(DEFAULT_SYSFS_ROOT)
    }
}

impl IoBackend for SysfsBackend {
    type Line = SysfsLine;
    type Pwm = SysfsPwm;

    fn claim_input(&mut self, id: LineId) -> IoResult<SysfsLine> {
        let gpio_dir = self.gpio_dir();
        write_attr(&gpio_dir.join("export"), &id.0.to_string())?;

        // Owned from here on, so a failed direction write still unexports.
        let line = SysfsLine {
            id,
            line_dir: gpio_dir.join(format!("gpio{}", id.0)),
            unexport: gpio_dir.join("unexport"),
            released: false,
        };
        write_attr(&line.line_dir.join("direction"), "in")?;

        debug!(line = %id, "claimed digital input");
        Ok(line)
    }

    fn claim_pwm(&mut self, id: PwmId, period_ns: u32) -> IoResult<SysfsPwm> {
        let chip_dir = self.pwm_chip_dir(id);
        write_attr(&chip_dir.join("export"), &id.channel.to_string())?;

        let mut pwm = SysfsPwm {
            id,
            channel_dir: chip_dir.join(format!("pwm{}", id.channel)),
            unexport: chip_dir.join("unexport"),
            disable_on_release: false,
            released: false,
        };
        write_attr(&pwm.channel_dir.join("period"), &period_ns.to_string())?;
        write_attr(&pwm.channel_dir.join("enable"), "1")?;
        pwm.disable_on_release = true;

        debug!(pwm = %id, period_ns, "claimed PWM channel");
        Ok(pwm)
    }
}

/// Exported sysfs GPIO configured as input.
#[derive(Debug)]
pub struct SysfsLine {
    id: LineId,
    line_dir: PathBuf,
    unexport: PathBuf,
    released: bool,
}

impl DigitalLine for SysfsLine {
    fn id(&self) -> LineId {
        self.id
    }

    fn read(&mut self) -> IoResult<Level> {
        read_level(&self.line_dir.join("value"))
    }

    fn release(&mut self) -> IoResult<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        write_attr(&self.unexport, &self.id.0.to_string())?;
        debug!(line = %self.id, "released digital input");
        Ok(())
    }
}

impl Drop for SysfsLine {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            warn!(line = %self.id, error = %e, "failed to release digital input");
        }
    }
}

/// Exported sysfs PWM channel.
#[derive(Debug)]
pub struct SysfsPwm {
    id: PwmId,
    channel_dir: PathBuf,
    unexport: PathBuf,
    disable_on_release: bool,
    released: bool,
}

impl PwmChannel for SysfsPwm {
    fn id(&self) -> PwmId {
        self.id
    }

    fn set_duty(&mut self, duty: DutyCycle) -> IoResult<()> {
        write_attr(
            &self.channel_dir.join("duty_cycle"),
            &duty.as_nanos().to_string(),
        )
    }

    fn disable(&mut self) -> IoResult<()> {
        self.disable_on_release = false;
        write_attr(&self.channel_dir.join("enable"), "0")
    }

    fn release(&mut self) -> IoResult<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;

        // Unexport even when disabling fails; report the first error.
        let disabled = if self.disable_on_release {
            self.disable()
        } else {
            Ok(())
        };
        let unexported = write_attr(&self.unexport, &self.id.channel.to_string());
        disabled.and(unexported)?;

        debug!(pwm = %self.id, "released PWM channel");
        Ok(())
    }
}

impl Drop for SysfsPwm {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            warn!(pwm = %self.id, error = %e, "failed to release PWM channel");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_level_rejects_garbage() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("value");

        std::fs::write(&path, "1\n")?;
        assert_eq!(read_level(&path)?, Level::High);

        std::fs::write(&path, "0")?;
        assert_eq!(read_level(&path)?, Level::Low);

        std::fs::write(&path, "x")?;
        assert!(matches!(
            read_level(&path),
            Err(IoError::InvalidLevel { ref value, .. }) if value == "x"
        ));

        std::fs::write(&path, "")?;
        assert!(matches!(
            read_level(&path),
            Err(IoError::InvalidLevel { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_write_attr_truncates() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("period");
        std::fs::write(&path, "20000000")?;

        write_attr(&path, "1")?;
        assert_eq!(std::fs::read_to_string(&path)?, "1");
        Ok(())
    }

    #[test]
    fn test_missing_register_is_open_error() {
        let result = write_attr(Path::new("/nonexistent/rotary-servo/export"), "23");
        assert!(matches!(result, Err(IoError::Open { .. })));
    }
}
