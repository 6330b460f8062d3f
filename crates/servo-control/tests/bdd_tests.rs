//! Scenario tests for the controller lifecycle.
//!
//! Feature: encoder_servo_control.feature

#![cfg(test)]

use rotary_servo::{ControlConfig, ControlLoop, LoopState, TickOutcome};
use rotary_servo_encoder::{DutyCycle, Level, Position};
use rotary_servo_io::mock::{MockBackend, MockLine, MockOp, MockPwm};
use rotary_servo_io::{CLOCK_LINE, DATA_LINE};

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn start(
    backend: &mut MockBackend,
) -> Result<ControlLoop<MockLine, MockPwm>, rotary_servo::StartupError> {
    ControlLoop::start(backend, ControlConfig::default())
}

/// Queue `n` full clockwise detents (clock low then high, data low).
fn queue_clockwise(backend: &MockBackend, n: usize) {
    for _ in 0..n {
        backend.queue_levels(CLOCK_LINE, [Level::Low, Level::High]);
    }
}

mod encoder_servo_scenarios {
    use super::*;

    /// Scenario: Sweeping clockwise to the end stop
    #[test]
    fn scenario_36_clockwise_edges_reach_full_deflection() -> TestResult {
        let mut backend = MockBackend::new();
        backend.set_level(DATA_LINE, Level::Low);
        backend.queue_levels(CLOCK_LINE, [Level::Low]);
        let mut control = start(&mut backend)?;

        queue_clockwise(&backend, 36);
        for _ in 0..72 {
            control.tick();
        }
        assert_eq!(control.position(), Position::MAX);
        assert_eq!(backend.last_duty(), Some(DutyCycle::MAX));
        assert_eq!(backend.last_duty().map(DutyCycle::as_nanos), Some(2_500_000));

        queue_clockwise(&backend, 4);
        for _ in 0..8 {
            control.tick();
        }
        assert_eq!(control.position(), Position::MAX);
        assert_eq!(control.metrics().edges, 40);
        assert_eq!(control.metrics().duty_writes, 40);
        Ok(())
    }

    /// Scenario: A read failure on tick N is absorbed
    #[test]
    fn scenario_read_failure_leaves_state_and_loop_continues() -> TestResult {
        let mut backend = MockBackend::new();
        backend.queue_levels(CLOCK_LINE, [Level::Low]);
        let mut control = start(&mut backend)?;

        queue_clockwise(&backend, 3);
        for _ in 0..6 {
            control.tick();
        }
        let position = control.position();
        let duty = backend.last_duty();

        backend.fail_once(MockOp::Read(CLOCK_LINE));
        assert_eq!(control.tick(), TickOutcome::ReadFailed);
        assert_eq!(control.position(), position);
        assert_eq!(backend.last_duty(), duty);
        assert_eq!(control.state(), LoopState::Running);

        queue_clockwise(&backend, 1);
        let mut moved = false;
        for _ in 0..2 {
            moved |= matches!(control.tick(), TickOutcome::Moved { .. });
        }
        assert!(moved);
        assert_eq!(control.position(), Position::new(position.degrees() + 5));
        Ok(())
    }

    /// Scenario: PWM claim fails at startup
    #[test]
    fn scenario_pwm_claim_failure_is_fatal_before_any_read() {
        let mut backend = MockBackend::new();
        backend.fail_always(MockOp::ClaimPwm);

        let result = start(&mut backend);
        assert!(result.is_err());
        assert_eq!(backend.read_count(), 0);
        assert!(!backend.is_line_claimed(CLOCK_LINE));
        assert!(!backend.is_line_claimed(DATA_LINE));
    }

    /// Scenario: Termination signal while running, with a failing release
    #[tokio::test]
    async fn scenario_signal_shutdown_survives_release_failure() -> TestResult {
        let mut backend = MockBackend::new();
        let control = start(&mut backend)?;
        backend.fail_always(MockOp::ReleaseLine(CLOCK_LINE));

        let (tx, rx) = tokio::sync::broadcast::channel(1);
        tx.send(())?;
        let report = control.run(rx).await;

        assert_eq!(report.state(), LoopState::Terminated);
        assert_eq!(report.failures().len(), 1);
        assert!(!backend.pwm_enabled());
        assert!(!backend.is_pwm_claimed());
        assert!(!backend.is_line_claimed(DATA_LINE));
        Ok(())
    }

    /// Scenario: Persistent write failures never stop the loop
    #[test]
    fn scenario_write_failures_are_transient() -> TestResult {
        let mut backend = MockBackend::new();
        backend.queue_levels(CLOCK_LINE, [Level::Low]);
        backend.fail_always(MockOp::SetDuty);
        let mut control = start(&mut backend)?;

        queue_clockwise(&backend, 5);
        for _ in 0..10 {
            control.tick();
        }
        assert_eq!(control.position(), Position::new(25));
        assert_eq!(control.metrics().write_failures, 5);
        assert_eq!(control.last_written(), None);
        assert_eq!(control.state(), LoopState::Running);
        Ok(())
    }
}
