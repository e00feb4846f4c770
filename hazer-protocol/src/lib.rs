//! Hazer: a multi-protocol GNSS/IMU framing and decoding subsystem.
//!
//! Four byte-oriented state machines (NMEA 0183, u-blox UBX, RTCM 10403,
//! Garmin CPO) race on one input stream ([`multiplexer`]); a fifth
//! (WT901/Dally) runs independently on its own stream. Completed frames are
//! integrity-checked as they're assembled ([`checksum`], [`framer`]),
//! tokenized or sliced into typed payloads ([`sentences`], [`parse`]), and
//! folded into per-system domain records ([`domain`]) that an outer
//! scheduler ages via a countdown expiry. [`station::Station`] ties all of
//! that together into the single entry point most callers want.
//!
//! The RTK datagram router ([`router`], [`datagram`]) is a separate
//! concern: it forwards RTCM corrections between UDP peers and does not
//! touch the decode pipeline above.
//!
//! Error types ([`error`]) implement `std::error::Error` only when the
//! `std` feature is enabled (the default), matching the teacher's own
//! opt-in `Error` impl convention; the rest of the crate currently assumes
//! a standard-library environment throughout (`router`/`station` use
//! `std::collections`/`std::net` directly).

pub mod checksum;
pub mod constants;
pub mod constellation;
pub mod datagram;
pub mod domain;
pub mod error;
pub mod format;
pub mod framer;
pub mod multiplexer;
pub mod parse;
pub mod router;
pub mod sentences;
pub mod station;
pub mod time;
pub mod tokenize;
pub mod validator;

pub use constellation::System;
pub use multiplexer::{Event, Multiplexer, Protocol};
pub use station::{FrameEvent, Station};
