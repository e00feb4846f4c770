//! WT901/Dally payload parsing. A data frame (`flag == 0x61`) packs nine
//! little-endian signed 16-bit words — three-axis acceleration, three-axis
//! angular velocity, and roll/pitch/yaw — scaled per WitMotion's documented
//! full-scale ranges (±16g, ±2000°/s, ±180°). A register frame
//! (`flag == 0x71`) always carries the same eight trailing data words
//! regardless of which register was queried; which of them hold meaningful
//! data depends on the register, per `src/dally.c`'s register table.

use crate::constants::{
    WT901_REGISTER_DATEHOUR, WT901_REGISTER_MAGNETICFIELD, WT901_REGISTER_MILLISECOND,
    WT901_REGISTER_MINUTESECOND, WT901_REGISTER_QUATERNION, WT901_REGISTER_TEMPERATURE,
    WT901_REGISTER_WORDS, WT901_REGISTER_YEARMONTH,
};
use crate::error::ContentError;

fn i16le(b: &[u8], at: usize) -> i16 {
    i16::from_le_bytes([b[at], b[at + 1]])
}

const ACCELERATION_FULL_SCALE_G: f64 = 16.0;
const ANGULAR_VELOCITY_FULL_SCALE_DPS: f64 = 2000.0;
const ANGLE_FULL_SCALE_DEGREES: f64 = 180.0;
const RAW_FULL_SCALE: f64 = 32768.0;

fn scaled(raw: i16, full_scale: f64) -> f64 {
    (raw as f64 / RAW_FULL_SCALE) * full_scale
}

/// A decoded `0x61` data frame: acceleration in g, angular velocity in
/// degrees/second, and roll/pitch/yaw in degrees.
#[derive(Debug, Clone, Copy)]
pub struct Wt901Data {
    pub acceleration_g: [f64; 3],
    pub angular_velocity_degrees_per_second: [f64; 3],
    pub roll_degrees: f64,
    pub pitch_degrees: f64,
    pub yaw_degrees: f64,
}

/// `frame` is the full buffer the framer assembled, header and flag byte
/// included: `0x55 0x61 w0lo w0hi ... w8lo w8hi`.
pub fn data(frame: &[u8]) -> Result<Wt901Data, ContentError> {
    const EXPECT: usize = 2 + 9 * 2;
    if frame.len() < EXPECT {
        return Err(ContentError::InvalidPacketLen { expect: EXPECT, got: frame.len() });
    }
    let word = |i: usize| i16le(frame, 2 + i * 2);
    Ok(Wt901Data {
        acceleration_g: [
            scaled(word(0), ACCELERATION_FULL_SCALE_G),
            scaled(word(1), ACCELERATION_FULL_SCALE_G),
            scaled(word(2), ACCELERATION_FULL_SCALE_G),
        ],
        angular_velocity_degrees_per_second: [
            scaled(word(3), ANGULAR_VELOCITY_FULL_SCALE_DPS),
            scaled(word(4), ANGULAR_VELOCITY_FULL_SCALE_DPS),
            scaled(word(5), ANGULAR_VELOCITY_FULL_SCALE_DPS),
        ],
        roll_degrees: scaled(word(6), ANGLE_FULL_SCALE_DEGREES),
        pitch_degrees: scaled(word(7), ANGLE_FULL_SCALE_DEGREES),
        yaw_degrees: scaled(word(8), ANGLE_FULL_SCALE_DEGREES),
    })
}

/// One register-read reply's decoded meaning. Magnetic field and
/// quaternion registers report three components in the same reply (the
/// device's own quaternion struct has a fourth, `q3`, that it never
/// actually populates); the four calendar registers carry no payload data
/// of their own, just a low/high byte pair in the first word.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Wt901Register {
    YearMonth { year: u8, month: u8 },
    DateHour { day: u8, hour: u8 },
    MinuteSecond { minute: u8, second: u8 },
    MillisecondOfSecond(u16),
    MagneticFieldMilliGauss { x: i16, y: i16, z: i16 },
    TemperatureCelsius(f64),
    Quaternion { q0: f64, q1: f64, q2: f64 },
    Unknown { register: u8, raw: u16 },
}

/// `frame` is `0x55 0x71 regLo regHi` followed by eight little-endian data
/// words, matching `dally_register_t`'s fixed layout regardless of which
/// register was queried.
pub fn register(frame: &[u8]) -> Result<Wt901Register, ContentError> {
    const EXPECT: usize = 4 + WT901_REGISTER_WORDS * 2;
    if frame.len() < EXPECT {
        return Err(ContentError::InvalidPacketLen { expect: EXPECT, got: frame.len() });
    }
    let reg = frame[2];
    let word = |i: usize| i16le(frame, 4 + i * 2);
    let raw = word(0) as u16;
    Ok(match reg {
        r if r == WT901_REGISTER_YEARMONTH => Wt901Register::YearMonth { year: raw as u8, month: (raw >> 8) as u8 },
        r if r == WT901_REGISTER_DATEHOUR => Wt901Register::DateHour { day: raw as u8, hour: (raw >> 8) as u8 },
        r if r == WT901_REGISTER_MINUTESECOND => {
            Wt901Register::MinuteSecond { minute: raw as u8, second: (raw >> 8) as u8 }
        },
        r if r == WT901_REGISTER_MILLISECOND => Wt901Register::MillisecondOfSecond(raw),
        r if r == WT901_REGISTER_MAGNETICFIELD => {
            Wt901Register::MagneticFieldMilliGauss { x: word(0), y: word(1), z: word(2) }
        },
        r if r == WT901_REGISTER_TEMPERATURE => Wt901Register::TemperatureCelsius(word(0) as f64 / 100.0),
        r if r == WT901_REGISTER_QUATERNION => Wt901Register::Quaternion {
            q0: word(0) as f64 / RAW_FULL_SCALE,
            q1: word(1) as f64 / RAW_FULL_SCALE,
            q2: word(2) as f64 / RAW_FULL_SCALE,
        },
        other => Wt901Register::Unknown { register: other, raw },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_data_frame_scaling() {
        let mut frame = vec![0x55u8, 0x61];
        for i in 0..9i16 {
            frame.extend_from_slice(&(i * 1000).to_le_bytes());
        }
        let decoded = data(&frame).unwrap();
        assert!((decoded.acceleration_g[0] - 0.0).abs() < 1e-9);
        assert!(decoded.yaw_degrees > 0.0);
    }

    fn build_register_frame(register: u8, words: [i16; WT901_REGISTER_WORDS]) -> Vec<u8> {
        let mut frame = vec![0x55u8, 0x71, register, 0x00];
        for word in words {
            frame.extend_from_slice(&word.to_le_bytes());
        }
        frame
    }

    #[test]
    fn decodes_temperature_register() {
        let frame = build_register_frame(WT901_REGISTER_TEMPERATURE, [3048, 0, 0, 0, 0, 0, 0, 0]); // 3048 -> 30.48C
        assert_eq!(frame.len(), 20);
        let reading = register(&frame).unwrap();
        match reading {
            Wt901Register::TemperatureCelsius(c) => assert!((c - 30.48).abs() < 1e-6),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn decodes_quaternion_register_components() {
        let frame = build_register_frame(WT901_REGISTER_QUATERNION, [16384, -16384, 8192, 0, 0, 0, 0, 0]);
        let reading = register(&frame).unwrap();
        match reading {
            Wt901Register::Quaternion { q0, q1, q2 } => {
                assert!((q0 - 0.5).abs() < 1e-6);
                assert!((q1 + 0.5).abs() < 1e-6);
                assert!((q2 - 0.25).abs() < 1e-6);
            },
            other => panic!("unexpected {other:?}"),
        }
    }
}
