//! Proprietary u-blox PUBX sentences. Unlike a standard NMEA sentence,
//! `$PUBX`'s first field after the name is itself a sub-message id
//! (`"00"`, `"03"`, `"04"`) rather than data; dispatch on it before parsing
//! fields, most-specific (the full two-digit id) first, same ordering
//! discipline the original's coordinate-format parser uses.

use crate::domain::{Position, Quality, Safety};
use crate::error::ContentError;
use crate::format::parse_scaled;
use crate::time::parse_utc_of_day;

/// PUBX,00: position, DOPs, and safety. Field layout (after the id):
/// `utc,lat,N/S,lon,E/W,altRef,navStat,hAcc,vAcc,sog,cog,vVel,hdop,vdop,
/// age,numSV,...`.
pub fn position(position_out: &mut Position, fields: &[&str]) -> Result<(), ContentError> {
    if fields.len() < 16 {
        return Err(ContentError::InvalidField { field: "pubx00/arity" });
    }
    if let Some(utc) = parse_utc_of_day(fields[0]) {
        position_out.utc_of_day_nanoseconds = utc;
    }
    let ns = fields[2].chars().next().ok_or(ContentError::InvalidField { field: "pubx00/ns" })?;
    let (lat, lat_digits) =
        crate::format::parse_latlon(fields[1], ns, 2).ok_or(ContentError::InvalidField { field: "pubx00/lat" })?;
    let ew = fields[4].chars().next().ok_or(ContentError::InvalidField { field: "pubx00/ew" })?;
    let (lon, lon_digits) =
        crate::format::parse_latlon(fields[3], ew, 3).ok_or(ContentError::InvalidField { field: "pubx00/lon" })?;
    position_out.latitude_nanominutes = lat;
    position_out.latitude_digits = lat_digits;
    position_out.longitude_nanominutes = lon;
    position_out.longitude_digits = lon_digits;
    if let Some(mm) = parse_scaled(fields[5], 1_000.0) {
        position_out.altitude_millimeters = mm;
    }
    position_out.quality = match fields[6] {
        "NF" => Quality::NoFix,
        "DR" => Quality::Estimated,
        "G2" | "G3" => Quality::Autonomous,
        "D2" | "D3" => Quality::Differential,
        "RK" => Quality::RtkFixed,
        "TT" => Quality::Manual,
        _ => position_out.quality,
    };
    position_out.safety = match fields[6] {
        "NF" => Safety::NotValid,
        "DR" => Safety::Caution,
        _ => Safety::Safe,
    };
    if let Some(microknots) = parse_scaled(fields[9], 1_000_000.0) {
        position_out.speed_microknots = microknots;
    }
    if let Some(nanodeg) = parse_scaled(fields[10], 1_000_000_000.0) {
        position_out.course_nanodegrees = nanodeg;
    }
    position_out.satellites_used = fields.get(15).and_then(|f| f.parse().ok()).unwrap_or(0);
    position_out.expiry.refresh();
    Ok(())
}

/// PUBX,03: satellite status. Field layout (after the id): `numSV,
/// (id,status,azm,elv,snr,lck){1..numSV}`, where `status` is one of `e`
/// (ephemeris only), `U` (used in solution), or `-` (not used).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SatelliteStatus {
    EphemerisOnly,
    Used,
    NotUsed,
}

pub struct SatelliteStatusEntry {
    pub id: u16,
    pub status: SatelliteStatus,
    pub azimuth_degrees: u16,
    pub elevation_degrees: i16,
    pub snr_dbhz: u8,
}

pub fn svstatus(fields: &[&str]) -> Result<Vec<SatelliteStatusEntry>, ContentError> {
    if fields.is_empty() {
        return Err(ContentError::InvalidField { field: "pubx03/arity" });
    }
    let count: usize = fields[0].parse().map_err(|_| ContentError::InvalidField { field: "pubx03/count" })?;
    let mut entries = Vec::with_capacity(count);
    for chunk in fields[1..].chunks(6) {
        if chunk.len() < 6 {
            break;
        }
        let id = chunk[0].parse().unwrap_or(0);
        let status = match chunk[1] {
            "e" => SatelliteStatus::EphemerisOnly,
            "U" => SatelliteStatus::Used,
            _ => SatelliteStatus::NotUsed,
        };
        entries.push(SatelliteStatusEntry {
            id,
            status,
            azimuth_degrees: chunk[2].parse().unwrap_or(0),
            elevation_degrees: chunk[3].parse().unwrap_or(0),
            snr_dbhz: chunk[4].parse().unwrap_or(0),
        });
    }
    Ok(entries)
}

/// PUBX,04: time. Field layout (after the id): `utc,date,utcTow,utcWeek,
/// leapSec,clkBias,clkDrift,tpGran`. The time can be synthesized without a
/// valid fix; per the design notes' open question, the original
/// deliberately does not refresh position expiry in that case, so this
/// returns the parsed UTC-of-day without touching `position.expiry`.
pub fn time(position_out: &mut Position, fields: &[&str]) -> Result<(), ContentError> {
    if fields.len() < 2 {
        return Err(ContentError::InvalidField { field: "pubx04/arity" });
    }
    let utc = parse_utc_of_day(fields[0]).ok_or(ContentError::InvalidField { field: "pubx04/utc" })?;
    position_out.utc_of_day_nanoseconds = utc;
    if let Some(dmy) = crate::time::parse_date_time(fields[1], utc) {
        position_out.stamp(dmy);
    }
    // Deliberately not calling position_out.expiry.refresh() here.
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constellation::System;

    #[test]
    fn pubx04_does_not_refresh_expiry() {
        let mut position_out = Position::new(System::Gps);
        assert!(position_out.expiry.is_stale());
        let fields = ["135627.00", "070818"];
        time(&mut position_out, &fields).unwrap();
        assert!(position_out.expiry.is_stale());
        assert_eq!(position_out.utc_of_day_nanoseconds, 50_187_000_000_000);
    }

    #[test]
    fn pubx03_parses_status_codes() {
        let fields = ["1", "12", "U", "045", "30", "42", "1"];
        let entries = svstatus(&fields).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].status, SatelliteStatus::Used);
        assert_eq!(entries[0].snr_dbhz, 42);
    }
}
