//! Property-based tests for encoder decoding and duty mapping invariants.

#![cfg(test)]

use proptest::prelude::*;
use rotary_servo_encoder::prelude::*;

fn level() -> impl Strategy<Value = Level> {
    any::<bool>().prop_map(Level::from)
}

fn position() -> impl Strategy<Value = Position> {
    (0u16..=36).prop_map(|n| Position::new(n * Position::STEP))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn prop_position_never_leaves_range(
        samples in prop::collection::vec((level(), level()), 0..400),
        seed in level(),
    ) {
        let mut decoder = EncoderDecoder::new();
        decoder.seed(seed);

        for (clock, data) in samples {
            let _ = decoder.sample(clock, data);
            prop_assert!(decoder.position() <= Position::MAX);
            prop_assert!(decoder.position() >= Position::MIN);
        }
    }

    #[test]
    fn prop_rising_edge_clockwise_adds_one_step(start in position()) {
        let next = step(Level::Low, Level::High, Level::Low, start);
        if start == Position::MAX {
            prop_assert_eq!(next, Position::MAX);
        } else {
            prop_assert_eq!(next.degrees(), start.degrees() + Position::STEP);
        }
    }

    #[test]
    fn prop_rising_edge_counter_clockwise_removes_one_step(start in position()) {
        let next = step(Level::Low, Level::High, Level::High, start);
        if start == Position::MIN {
            prop_assert_eq!(next, Position::MIN);
        } else {
            prop_assert_eq!(next.degrees(), start.degrees() - Position::STEP);
        }
    }

    #[test]
    fn prop_non_edges_never_move(
        start in position(),
        clock in level(),
        data in level(),
    ) {
        prop_assert_eq!(step(clock, clock, data, start), start);
        prop_assert_eq!(step(Level::High, Level::Low, data, start), start);
    }

    #[test]
    fn prop_duty_is_non_decreasing(a in 0u16..=180, b in 0u16..=180) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(
            duty_for_position(Position::new(lo)) <= duty_for_position(Position::new(hi))
        );
    }

    #[test]
    fn prop_duty_stays_in_safe_range(degrees in any::<u16>()) {
        let duty = duty_for_position(Position::new(degrees));
        prop_assert!(duty >= DutyCycle::MIN);
        prop_assert!(duty <= DutyCycle::MAX);
    }

    #[test]
    fn prop_rotations_only_on_rising_edges(
        samples in prop::collection::vec((level(), level()), 0..200),
    ) {
        let mut decoder = EncoderDecoder::new();
        for (clock, data) in samples {
            let prev = decoder.state().prev_clock;
            let rotation = decoder.sample(clock, data);
            let rising = prev == Some(Level::Low) && clock == Level::High;
            prop_assert_eq!(rotation.is_some(), rising);
        }
    }
}
