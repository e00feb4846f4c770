//! Integrity primitives (C1): one accumulator type per wire protocol, each
//! usable either incrementally (fed a byte at a time by a framer) or as a
//! one-shot check over a completed buffer.

pub mod cpo;
pub mod nmea;
pub mod rtcm;
pub mod ubx;

pub use cpo::CpoChecksum;
pub use nmea::NmeaChecksum;
pub use rtcm::{crc24q, CRC24Q_TABLE};
pub use ubx::UbxChecksum;
