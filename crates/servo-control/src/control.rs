//! The encoder-to-servo control loop.

use rotary_servo_encoder::{DutyCycle, EncoderDecoder, Position, Rotation, duty_for_position};
use rotary_servo_io::{
    CLOCK_LINE, DATA_LINE, DigitalLine, IoBackend, IoResult, PwmChannel, SERVO_PERIOD_NS,
    SERVO_PWM,
};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::config::ControlConfig;
use crate::error::{ReleaseAction, ReleaseFailure, StartupError, StartupStep};
use crate::state::{LoopMetrics, LoopState};

/// Result of a single poll iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A line could not be read; nothing was decoded.
    ReadFailed,
    /// Both lines read, no rising edge.
    Idle,
    /// A rising edge was recognized and a duty write attempted.
    Moved {
        /// The recognized edge.
        rotation: Rotation,
        /// Duty cycle computed for the new position.
        duty: DutyCycle,
        /// Whether the PWM write succeeded.
        written: bool,
    },
}

/// Outcome of the shutdown sequence.
#[derive(Debug)]
pub struct ShutdownReport {
    failures: Vec<ReleaseFailure>,
    metrics: LoopMetrics,
    state: LoopState,
}

impl ShutdownReport {
    /// Returns true if every release step succeeded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Release steps that failed, in the order attempted.
    #[must_use]
    pub fn failures(&self) -> &[ReleaseFailure] {
        &self.failures
    }

    /// Counters at the time of shutdown.
    #[must_use]
    pub fn metrics(&self) -> LoopMetrics {
        self.metrics
    }

    /// Final controller state.
    #[must_use]
    pub fn state(&self) -> LoopState {
        self.state
    }
}

/// Best-effort release of everything acquired so far.
///
/// Shared by the failed-startup and shutdown paths. Every step is attempted
/// regardless of earlier failures.
fn release_all<L: DigitalLine, P: PwmChannel>(
    pwm: Option<&mut P>,
    lines: &mut [&mut L],
) -> Vec<ReleaseFailure> {
    let mut failures = Vec::new();
    let mut record = |resource: String, action: ReleaseAction, result: IoResult<()>| {
        if let Err(source) = result {
            let failure = ReleaseFailure {
                resource,
                action,
                source,
            };
            warn!(error = %failure, "release step failed, continuing");
            failures.push(failure);
        }
    };

    if let Some(pwm) = pwm {
        let id = pwm.id().to_string();
        record(id.clone(), ReleaseAction::DisablePwm, pwm.disable());
        record(id, ReleaseAction::ReleasePwm, pwm.release());
    }
    for line in lines.iter_mut() {
        record(line.id().to_string(), ReleaseAction::ReleaseLine, line.release());
    }
    failures
}

/// Single-owner control loop.
///
/// Owns both encoder lines, the PWM channel and all decoding state. Nothing
/// else reads or writes the hardware while it runs.
#[derive(Debug)]
pub struct ControlLoop<L: DigitalLine, P: PwmChannel> {
    clock: L,
    data: L,
    pwm: P,
    decoder: EncoderDecoder,
    last_written: Option<DutyCycle>,
    config: ControlConfig,
    state: LoopState,
    metrics: LoopMetrics,
}

impl<L: DigitalLine, P: PwmChannel> ControlLoop<L, P> {
    /// Run the startup sequence and enter [`LoopState::Running`].
    ///
    /// Claims the clock line, the data line and the PWM channel in that
    /// order, then seeds the decoder from one clock read. If the seed read
    /// fails the decoder stays unseeded and seeds itself on the first good
    /// tick.
    ///
    /// # Errors
    ///
    /// Returns the first claim failure. Anything already claimed is released
    /// before returning.
    pub fn start<B>(backend: &mut B, config: ControlConfig) -> Result<Self, StartupError>
    where
        B: IoBackend<Line = L, Pwm = P>,
    {
        let mut clock = backend
            .claim_input(CLOCK_LINE)
            .map_err(|e| StartupError::new(StartupStep::ClaimClock(CLOCK_LINE), e))?;

        let mut data = match backend.claim_input(DATA_LINE) {
            Ok(line) => line,
            Err(e) => {
                release_all::<L, P>(None, &mut [&mut clock]);
                return Err(StartupError::new(StartupStep::ClaimData(DATA_LINE), e));
            }
        };

        let pwm = match backend.claim_pwm(SERVO_PWM, SERVO_PERIOD_NS) {
            Ok(pwm) => pwm,
            Err(e) => {
                release_all::<L, P>(None, &mut [&mut data, &mut clock]);
                return Err(StartupError::new(StartupStep::ClaimPwm(SERVO_PWM), e));
            }
        };

        let mut decoder = EncoderDecoder::new();
        match clock.read() {
            Ok(level) => decoder.seed(level),
            Err(e) => warn!(
                line = %CLOCK_LINE,
                error = %e,
                "initial clock read failed, seeding from first good tick"
            ),
        }

        info!(
            clock = %CLOCK_LINE,
            data = %DATA_LINE,
            pwm = %SERVO_PWM,
            period_ns = SERVO_PERIOD_NS,
            "servo controller started"
        );

        Ok(Self {
            clock,
            data,
            pwm,
            decoder,
            last_written: None,
            config,
            state: LoopState::Running,
            metrics: LoopMetrics::new(),
        })
    }

    /// Run one poll iteration.
    ///
    /// A failed read leaves the position and the previous clock level
    /// untouched. A failed write is reported and not retried; the next edge
    /// writes a fresh value.
    pub fn tick(&mut self) -> TickOutcome {
        self.metrics.ticks = self.metrics.ticks.saturating_add(1);

        let clock = self.clock.read();
        let data = self.data.read();
        let (clock, data) = match (clock, data) {
            (Ok(clock), Ok(data)) => (clock, data),
            (clock, data) => {
                if let Err(e) = clock {
                    warn!(
                        line = %self.clock.id(),
                        error = %e,
                        "failed to read clock, skipping tick"
                    );
                }
                if let Err(e) = data {
                    warn!(
                        line = %self.data.id(),
                        error = %e,
                        "failed to read data, skipping tick"
                    );
                }
                self.metrics.read_failures = self.metrics.read_failures.saturating_add(1);
                return TickOutcome::ReadFailed;
            }
        };

        debug!(
            clk = %clock,
            dt = %data,
            position = self.decoder.position().degrees(),
            "tick"
        );

        let Some(rotation) = self.decoder.sample(clock, data) else {
            return TickOutcome::Idle;
        };
        self.metrics.edges = self.metrics.edges.saturating_add(1);

        let duty = duty_for_position(rotation.after);
        info!(
            duty_ns = duty.as_nanos(),
            position = rotation.after.degrees(),
            direction = %rotation.direction,
            "duty cycle update"
        );

        let written = match self.pwm.set_duty(duty) {
            Ok(()) => {
                self.last_written = Some(duty);
                self.metrics.duty_writes = self.metrics.duty_writes.saturating_add(1);
                true
            }
            Err(e) => {
                self.metrics.write_failures = self.metrics.write_failures.saturating_add(1);
                warn!(pwm = %self.pwm.id(), error = %e, "failed to write duty cycle, continuing");
                false
            }
        };

        TickOutcome::Moved {
            rotation,
            duty,
            written,
        }
    }

    /// Poll until `shutdown` fires, then run the shutdown sequence.
    ///
    /// Termination is only observed between ticks. A closed channel counts
    /// as a shutdown request.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) -> ShutdownReport {
        info!(
            tick = ?self.config.tick_interval,
            "control loop running"
        );

        loop {
            self.tick();
            tokio::select! {
                biased;
                _ = shutdown.recv() => {
                    info!("termination requested");
                    break;
                }
                () = tokio::time::sleep(self.config.tick_interval) => {}
            }
        }

        self.shutdown()
    }

    /// Disable the PWM output and release every resource, best effort.
    pub fn shutdown(mut self) -> ShutdownReport {
        self.state = LoopState::ShuttingDown;
        info!(state = %self.state, "releasing hardware");

        let failures = release_all(Some(&mut self.pwm), &mut [&mut self.data, &mut self.clock]);
        self.state = LoopState::Terminated;

        info!(
            ticks = self.metrics.ticks,
            edges = self.metrics.edges,
            read_failures = self.metrics.read_failures,
            write_failures = self.metrics.write_failures,
            release_failures = failures.len(),
            "servo controller stopped"
        );

        ShutdownReport {
            failures,
            metrics: self.metrics,
            state: self.state,
        }
    }

    /// Current position.
    #[must_use]
    pub fn position(&self) -> Position {
        self.decoder.position()
    }

    /// Last duty cycle written successfully, if any.
    #[must_use]
    pub fn last_written(&self) -> Option<DutyCycle> {
        self.last_written
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Current counters.
    #[must_use]
    pub fn metrics(&self) -> LoopMetrics {
        self.metrics
    }

    /// Decoder state, for inspection.
    #[must_use]
    pub fn decoder(&self) -> &EncoderDecoder {
        &self.decoder
    }
}
