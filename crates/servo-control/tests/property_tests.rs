//! Property-based tests for the control loop under injected read failures.

#![cfg(test)]

use proptest::prelude::*;
use rotary_servo::{ControlConfig, ControlLoop, TickOutcome};
use rotary_servo_encoder::{Level, Position, duty_for_position};
use rotary_servo_io::mock::{MockBackend, MockOp};
use rotary_servo_io::{CLOCK_LINE, DATA_LINE};

#[derive(Debug, Clone, Copy)]
enum Tick {
    Sample { clock: bool, data: bool },
    ReadFailure,
}

fn tick() -> impl Strategy<Value = Tick> {
    prop_oneof![
        4 => (any::<bool>(), any::<bool>()).prop_map(|(clock, data)| Tick::Sample { clock, data }),
        1 => Just(Tick::ReadFailure),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_position_and_duty_stay_consistent(ticks in prop::collection::vec(tick(), 0..200)) {
        let mut backend = MockBackend::new();
        let mut control = ControlLoop::start(&mut backend, ControlConfig::default())
            .map_err(|e| TestCaseError::fail(e.to_string()))?;

        for t in ticks {
            let before = control.position();
            let written_before = backend.last_duty();
            match t {
                Tick::Sample { clock, data } => {
                    backend.queue_levels(CLOCK_LINE, [Level::from(clock)]);
                    backend.queue_levels(DATA_LINE, [Level::from(data)]);
                    if let TickOutcome::Moved { duty, .. } = control.tick() {
                        prop_assert_eq!(Some(duty), backend.last_duty());
                    }
                }
                Tick::ReadFailure => {
                    backend.fail_once(MockOp::Read(CLOCK_LINE));
                    prop_assert_eq!(control.tick(), TickOutcome::ReadFailed);
                    prop_assert_eq!(control.position(), before);
                    prop_assert_eq!(backend.last_duty(), written_before);
                }
            }
            prop_assert!(control.position() <= Position::MAX);
            if let Some(duty) = backend.last_duty() {
                prop_assert_eq!(duty, duty_for_position(control.position()));
            }
        }
    }
}
