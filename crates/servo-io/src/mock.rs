//! In-memory backend for tests.
//!
//! [`MockBackend`] hands out lines and channels that share one journal, so a
//! test can script input levels, inject failures on any operation and then
//! inspect exactly what the code under test did, in order.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use rotary_servo_encoder::{DutyCycle, Level};
use tracing::debug;

use crate::error::{IoError, IoResult};
use crate::traits::{DigitalLine, IoBackend, LineId, PwmChannel, PwmId};

/// Operation recorded by the mock backend.
///
/// Attempts are recorded before failure injection is applied, so a failed
/// read still shows up as [`MockEvent::Read`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockEvent {
    /// `claim_input` was called.
    ClaimInput(LineId),
    /// `claim_pwm` was called.
    ClaimPwm {
        /// Channel requested.
        id: PwmId,
        /// Period requested.
        period_ns: u32,
    },
    /// A line was read.
    Read(LineId),
    /// A duty cycle write was attempted.
    SetDuty(DutyCycle),
    /// The PWM output was disabled.
    Disable(PwmId),
    /// A line was released.
    ReleaseLine(LineId),
    /// The PWM channel was released.
    ReleasePwm(PwmId),
}

/// Operation selector for failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOp {
    /// Claiming a specific line.
    ClaimInput(LineId),
    /// Claiming any PWM channel.
    ClaimPwm,
    /// Reading a specific line.
    Read(LineId),
    /// Writing a duty cycle.
    SetDuty,
    /// Disabling the PWM output.
    Disable,
    /// Releasing a specific line.
    ReleaseLine(LineId),
    /// Releasing the PWM channel.
    ReleasePwm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Failure {
    Once,
    Always,
}

#[derive(Debug, Default)]
struct Shared {
    journal: Vec<MockEvent>,
    scripted: HashMap<LineId, VecDeque<Level>>,
    steady: HashMap<LineId, Level>,
    failures: HashMap<MockOp, Failure>,
    claimed_lines: HashSet<LineId>,
    claimed_pwm: Option<PwmId>,
    pwm_enabled: bool,
    duty: Option<DutyCycle>,
}

impl Shared {
    /// Record `event` and apply any failure injected for `op`.
    fn attempt(&mut self, event: MockEvent, op: MockOp) -> IoResult<()> {
        self.journal.push(event);
        match self.failures.get(&op).copied() {
            Some(Failure::Once) => {
                self.failures.remove(&op);
                Err(IoError::injected(format!("{op:?}")))
            }
            Some(Failure::Always) => Err(IoError::injected(format!("{op:?}"))),
            None => Ok(()),
        }
    }
}

/// Scriptable in-memory backend.
///
/// Clones share state, so keep one clone in the test to inspect the journal
/// after handing the other to the code under test.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    shared: Arc<Mutex<Shared>>,
}

impl MockBackend {
    /// Create a backend with every line reading [`Level::Low`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Level returned by `line` once its script is exhausted.
    pub fn set_level(&self, line: LineId, level: Level) {
        self.lock().steady.insert(line, level);
    }

    /// Queue levels returned by successive successful reads of `line`.
    pub fn queue_levels(&self, line: LineId, levels: impl IntoIterator<Item = Level>) {
        self.lock()
            .scripted
            .entry(line)
            .or_default()
            .extend(levels);
    }

    /// Fail the next occurrence of `op`.
    pub fn fail_once(&self, op: MockOp) {
        self.lock().failures.insert(op, Failure::Once);
    }

    /// Fail every occurrence of `op` until cleared.
    pub fn fail_always(&self, op: MockOp) {
        self.lock().failures.insert(op, Failure::Always);
    }

    /// Every recorded operation, oldest first.
    #[must_use]
    pub fn journal(&self) -> Vec<MockEvent> {
        self.lock().journal.clone()
    }

    /// Number of read attempts on any line.
    #[must_use]
    pub fn read_count(&self) -> usize {
        self.lock()
            .journal
            .iter()
            .filter(|e| matches!(e, MockEvent::Read(_)))
            .count()
    }

    /// Last duty cycle written successfully.
    #[must_use]
    pub fn last_duty(&self) -> Option<DutyCycle> {
        self.lock().duty
    }

    /// Returns true while the PWM output is enabled.
    #[must_use]
    pub fn pwm_enabled(&self) -> bool {
        self.lock().pwm_enabled
    }

    /// Returns true while `line` is claimed.
    #[must_use]
    pub fn is_line_claimed(&self, line: LineId) -> bool {
        self.lock().claimed_lines.contains(&line)
    }

    /// Returns true while a PWM channel is claimed.
    #[must_use]
    pub fn is_pwm_claimed(&self) -> bool {
        self.lock().claimed_pwm.is_some()
    }
}

impl IoBackend for MockBackend {
    type Line = MockLine;
    type Pwm = MockPwm;

    fn claim_input(&mut self, id: LineId) -> IoResult<MockLine> {
        let mut shared = self.lock();
        shared.attempt(MockEvent::ClaimInput(id), MockOp::ClaimInput(id))?;
        shared.claimed_lines.insert(id);
        Ok(MockLine {
            id,
            shared: Arc::clone(&self.shared),
            released: false,
        })
    }

    fn claim_pwm(&mut self, id: PwmId, period_ns: u32) -> IoResult<MockPwm> {
        let mut shared = self.lock();
        shared.attempt(MockEvent::ClaimPwm { id, period_ns }, MockOp::ClaimPwm)?;
        shared.claimed_pwm = Some(id);
        shared.pwm_enabled = true;
        Ok(MockPwm {
            id,
            shared: Arc::clone(&self.shared),
            disable_on_release: true,
            released: false,
        })
    }
}

/// Digital line handed out by [`MockBackend`].
#[derive(Debug)]
pub struct MockLine {
    id: LineId,
    shared: Arc<Mutex<Shared>>,
    released: bool,
}

impl MockLine {
    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl DigitalLine for MockLine {
    fn id(&self) -> LineId {
        self.id
    }

    fn read(&mut self) -> IoResult<Level> {
        let id = self.id;
        let mut shared = self.lock();
        shared.attempt(MockEvent::Read(id), MockOp::Read(id))?;

        let scripted = shared.scripted.get_mut(&id).and_then(VecDeque::pop_front);
        let level = match scripted {
            Some(level) => {
                shared.steady.insert(id, level);
                level
            }
            None => shared.steady.get(&id).copied().unwrap_or_default(),
        };
        Ok(level)
    }

    fn release(&mut self) -> IoResult<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;

        let id = self.id;
        let mut shared = self.lock();
        shared.claimed_lines.remove(&id);
        shared.attempt(MockEvent::ReleaseLine(id), MockOp::ReleaseLine(id))
    }
}

impl Drop for MockLine {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            debug!(line = %self.id, error = %e, "mock line release failed on drop");
        }
    }
}

/// PWM channel handed out by [`MockBackend`].
#[derive(Debug)]
pub struct MockPwm {
    id: PwmId,
    shared: Arc<Mutex<Shared>>,
    disable_on_release: bool,
    released: bool,
}

impl MockPwm {
    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl PwmChannel for MockPwm {
    fn id(&self) -> PwmId {
        self.id
    }

    fn set_duty(&mut self, duty: DutyCycle) -> IoResult<()> {
        let mut shared = self.lock();
        shared.attempt(MockEvent::SetDuty(duty), MockOp::SetDuty)?;
        shared.duty = Some(duty);
        Ok(())
    }

    fn disable(&mut self) -> IoResult<()> {
        self.disable_on_release = false;
        let id = self.id;
        let mut shared = self.lock();
        shared.attempt(MockEvent::Disable(id), MockOp::Disable)?;
        shared.pwm_enabled = false;
        Ok(())
    }

    fn release(&mut self) -> IoResult<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;

        let disabled = if self.disable_on_release {
            self.disable()
        } else {
            Ok(())
        };

        let id = self.id;
        let mut shared = self.lock();
        shared.claimed_pwm = None;
        let released = shared.attempt(MockEvent::ReleasePwm(id), MockOp::ReleasePwm);
        disabled.and(released)
    }
}

impl Drop for MockPwm {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            debug!(pwm = %self.id, error = %e, "mock PWM release failed on drop");
        }
    }
}
