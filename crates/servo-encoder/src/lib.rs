//! # rotary-servo-encoder
//!
//! Quadrature encoder decoding and servo pulse-width mapping.
//!
//! This crate is the pure half of the rotary servo controller. It never
//! touches hardware: callers feed it clock/data samples they have already
//! read successfully and write the resulting [`DutyCycle`] themselves.
//!
//! - [`EncoderDecoder`] detects rising clock edges and accumulates a clamped
//!   [`Position`] in 5 degree steps
//! - [`step`] is the same transition as a free function over plain values
//! - [`duty_for_position`] maps a position onto the servo's safe
//!   500 µs to 2500 µs pulse range
//!
//! ## Decoding
//!
//! ```text
//!  clock  ___/‾‾‾\___/‾‾‾\___
//!  data   _____/‾‾‾‾‾‾‾\_____
//!            ^       ^
//!            │       └─ rising edge, data High: counter-clockwise, -5
//!            └───────── rising edge, data Low: clockwise, +5
//! ```
//!
//! Falling edges and unchanged samples never move the position. The decoder
//! refuses to invent a previous clock level: until it has been seeded from a
//! real read, the first sample only seeds it.
//!
//! ## Example
//!
//! ```rust
//! use rotary_servo_encoder::prelude::*;
//!
//! let mut decoder = EncoderDecoder::new();
//! decoder.seed(Level::Low);
//!
//! let rotation = decoder.sample(Level::High, Level::Low);
//! assert!(rotation.is_some());
//! assert_eq!(decoder.position(), Position::new(5));
//! assert_eq!(duty_for_position(decoder.position()).as_nanos(), 555_555);
//! ```

#![no_std]
#![deny(
    unsafe_op_in_unsafe_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    missing_debug_implementations
)]
#![warn(clippy::pedantic)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod decoder;
pub mod duty;
pub mod level;
pub mod position;
pub mod prelude;

pub use decoder::{EncoderDecoder, EncoderState, Rotation, step};
pub use duty::{DutyCycle, duty_for_position};
pub use level::{Direction, Level};
pub use position::Position;
