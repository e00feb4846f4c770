//! Garmin CPO payload parsers (C5, CPO half): CPO-PVT (id 0x33) and CPO-SDR
//! (id 0x72). Both payloads are little-endian and packed (no struct
//! padding), matching the wire layout Garmin's own binary protocol
//! documentation describes for the D800/D802 PVT and satellite data
//! records. The framer hands these functions the de-escaped buffer
//! `DLE id size payload... checksum DLE ETX`; callers pass
//! `&buf[3..3 + size]`, the payload slice alone.

use crate::constants::{CPO_PVT_LENGTH, CPO_SDR_LENGTH};
use crate::constellation::System;
use crate::error::ContentError;

fn f32le(b: &[u8], at: usize) -> f32 {
    f32::from_le_bytes([b[at], b[at + 1], b[at + 2], b[at + 3]])
}

fn f64le(b: &[u8], at: usize) -> f64 {
    f64::from_le_bytes([b[at], b[at + 1], b[at + 2], b[at + 3], b[at + 4], b[at + 5], b[at + 6], b[at + 7]])
}

fn i16le(b: &[u8], at: usize) -> i16 {
    i16::from_le_bytes([b[at], b[at + 1]])
}

/// Garmin fix-type codes, straight off the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpoFixType {
    Unusable,
    StillUnusable,
    TwoD,
    ThreeD,
    TwoDDifferential,
    ThreeDDifferential,
}

impl CpoFixType {
    fn from_code(code: i16) -> CpoFixType {
        match code {
            0 => CpoFixType::Unusable,
            1 => CpoFixType::StillUnusable,
            2 => CpoFixType::TwoD,
            3 => CpoFixType::ThreeD,
            4 => CpoFixType::TwoDDifferential,
            _ => CpoFixType::ThreeDDifferential,
        }
    }
}

/// A decoded CPO-PVT (id 0x33) record, in the receiver's own units: meters,
/// radians, meters/second, seconds. Converting these into Hazer's
/// nanominute/millimeter/nanosecond domain units is the caller's job (see
/// `time::cpo_pvt_to_posix_nanos` and the nanominute conversion in
/// `format`).
#[derive(Debug, Clone, Copy)]
pub struct CpoPvt {
    pub altitude_meters: f32,
    pub fix_type: CpoFixType,
    pub seconds_of_week: f64,
    pub latitude_radians: f64,
    pub longitude_radians: f64,
    pub velocity_east_meters_per_second: f32,
    pub velocity_north_meters_per_second: f32,
    pub velocity_up_meters_per_second: f32,
    /// WGS84-ellipsoid-to-MSL separation (Garmin's `msl_hght`), not an
    /// altitude: MSL altitude is `altitude_meters - height_above_msl_meters`.
    pub height_above_msl_meters: f32,
    pub leap_seconds: i16,
    pub days_since_garmin_epoch: i32,
}

pub fn cpo_pvt(payload: &[u8]) -> Result<CpoPvt, ContentError> {
    if payload.len() < CPO_PVT_LENGTH {
        return Err(ContentError::InvalidPacketLen { expect: CPO_PVT_LENGTH, got: payload.len() });
    }
    Ok(CpoPvt {
        altitude_meters: f32le(payload, 0),
        fix_type: CpoFixType::from_code(i16le(payload, 16)),
        seconds_of_week: f64le(payload, 18),
        latitude_radians: f64le(payload, 26),
        longitude_radians: f64le(payload, 34),
        velocity_east_meters_per_second: f32le(payload, 42),
        velocity_north_meters_per_second: f32le(payload, 46),
        velocity_up_meters_per_second: f32le(payload, 50),
        height_above_msl_meters: f32le(payload, 54),
        leap_seconds: i16le(payload, 58),
        days_since_garmin_epoch: i32::from_le_bytes([payload[60], payload[61], payload[62], payload[63]]),
    })
}

/// Converts radians to Hazer's signed nanominutes.
pub fn radians_to_nanominutes(radians: f64) -> i64 {
    (radians.to_degrees() * 60.0 * 1_000_000_000.0).round() as i64
}

/// One satellite's status in a CPO-SDR record.
#[derive(Debug, Clone, Copy)]
pub struct CpoSatellite {
    pub id: u16,
    pub system: Option<System>,
    pub snr: i16,
    pub elevation_degrees: u8,
    pub azimuth_degrees: u16,
    pub has_ephemeris: bool,
    pub has_correction: bool,
    pub used_in_solution: bool,
    pub has_augmentation: bool,
}

/// A decoded CPO-SDR (id 0x72) record: 12 fixed satellite slots, 7 bytes
/// each.
pub fn cpo_sdr(payload: &[u8]) -> Result<Vec<CpoSatellite>, ContentError> {
    if payload.len() < CPO_SDR_LENGTH {
        return Err(ContentError::InvalidPacketLen { expect: CPO_SDR_LENGTH, got: payload.len() });
    }
    let mut satellites = Vec::with_capacity(12);
    for chunk in payload.chunks(7).take(12) {
        if chunk.len() < 7 {
            break;
        }
        let svid = chunk[0] as u16;
        let status = chunk[6];
        satellites.push(CpoSatellite {
            id: svid,
            system: System::from_satellite_id(svid),
            snr: i16le(chunk, 1),
            elevation_degrees: chunk[3],
            azimuth_degrees: u16::from_le_bytes([chunk[4], chunk[5]]),
            has_ephemeris: status & 0x01 != 0,
            has_correction: status & 0x02 != 0,
            used_in_solution: status & 0x04 != 0,
            has_augmentation: status & 0x08 != 0,
        });
    }
    Ok(satellites)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_pvt(fix: i16, lat: f64, lon: f64) -> Vec<u8> {
        let mut buf = vec![0u8; CPO_PVT_LENGTH];
        buf[0..4].copy_from_slice(&1708.6f32.to_le_bytes());
        buf[16..18].copy_from_slice(&fix.to_le_bytes());
        buf[18..26].copy_from_slice(&123456.0f64.to_le_bytes());
        buf[26..34].copy_from_slice(&lat.to_le_bytes());
        buf[34..42].copy_from_slice(&lon.to_le_bytes());
        buf[58..60].copy_from_slice(&18i16.to_le_bytes());
        buf[60..64].copy_from_slice(&12000i32.to_le_bytes());
        buf
    }

    #[test]
    fn decodes_pvt_fix_and_radians() {
        let payload = build_pvt(3, 0.694, -1.836);
        let pvt = cpo_pvt(&payload).unwrap();
        assert_eq!(pvt.fix_type, CpoFixType::ThreeD);
        assert!((pvt.latitude_radians - 0.694).abs() < 1e-9);
        assert!((pvt.longitude_radians - (-1.836)).abs() < 1e-9);
    }

    #[test]
    fn radians_conversion_is_within_one_nanominute_of_reference() {
        let nanominutes = radians_to_nanominutes(0.694);
        let back_to_radians = (nanominutes as f64 / 1_000_000_000.0 / 60.0).to_radians();
        assert!((back_to_radians - 0.694).abs() < 1e-12);
    }

    #[test]
    fn sdr_maps_svid_ranges_to_systems() {
        let mut payload = vec![0u8; CPO_SDR_LENGTH];
        payload[0] = 5; // GPS
        payload[6] = 0x07; // ephemeris+correction+solution
        payload[7] = 40; // second satellite svid
        let satellites = cpo_sdr(&payload).unwrap();
        assert_eq!(satellites[0].system, Some(System::Gps));
        assert!(satellites[0].used_in_solution);
        assert_eq!(satellites[1].system, Some(System::Sbas));
    }
}
