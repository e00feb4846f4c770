//! Sentence parsers (C5, NMEA half): one function per NMEA sentence name
//! Hazer understands, each taking the already-tokenized field vector and
//! mutating the typed record it belongs to — directly, the way the
//! original's `hazer_parse_XXX(position_t *position, char *argv[], ...)`
//! functions mutate a record through a pointer, rather than building an
//! intermediate "update" value for a caller to merge in.

pub mod pubx;

use crate::constellation::System;
use crate::domain::{Active, Fault, FixMode, Position, Quality, Safety, View};
use crate::error::ContentError;
use crate::format::parse_scaled;
use crate::time::{parse_date_time, parse_utc_of_day, parse_zda_date_time, parse_zone_offset};

/// Every sentence mnemonic this dispatch table knows. Used by callers that
/// want to distinguish "unrecognized sentence, logged at info" from a
/// structural parse failure.
pub const KNOWN_SENTENCES: &[&str] = &["GGA", "RMC", "GLL", "VTG", "GSA", "GSV", "ZDA", "GBS", "TXT"];

fn mode_safety(mode: Option<char>) -> Safety {
    match mode {
        Some('A') | Some('D') => Safety::Safe,
        Some('E') | Some('M') => Safety::Caution,
        Some('S') => Safety::Unsafe,
        Some('N') => Safety::NotValid,
        _ => Safety::Unknown,
    }
}

fn last_char(field: Option<&&str>) -> Option<char> {
    field.and_then(|f| f.chars().next())
}

/// GGA: fix data. Field layout (0-based, after the sentence name):
/// `utc,lat,N/S,lon,E/W,quality,numSV,hdop,alt,M,sep,M,age,stationId`.
pub fn gga(position: &mut Position, system: System, fields: &[&str]) -> Result<(), ContentError> {
    if fields.len() < 14 {
        return Err(ContentError::InvalidField { field: "gga/arity" });
    }
    position.system = system;
    if let Some(utc) = parse_utc_of_day(fields[0]) {
        position.utc_of_day_nanoseconds = utc;
    }
    let ns = fields[2].chars().next().ok_or(ContentError::InvalidField { field: "gga/ns" })?;
    let (lat, lat_digits) = crate::format::parse_latlon(fields[1], ns, 2)
        .ok_or(ContentError::InvalidField { field: "gga/lat" })?;
    let ew = fields[4].chars().next().ok_or(ContentError::InvalidField { field: "gga/ew" })?;
    let (lon, lon_digits) = crate::format::parse_latlon(fields[3], ew, 3)
        .ok_or(ContentError::InvalidField { field: "gga/lon" })?;
    position.latitude_nanominutes = lat;
    position.latitude_digits = lat_digits;
    position.longitude_nanominutes = lon;
    position.longitude_digits = lon_digits;

    let quality_code: u8 = fields[5].parse().map_err(|_| ContentError::InvalidField { field: "gga/quality" })?;
    position.quality = Quality::from_gga_code(quality_code).ok_or(ContentError::InvalidField { field: "gga/quality" })?;
    position.satellites_used = fields[6].parse().unwrap_or(0);
    if let Some(mm) = parse_scaled(fields[8], 1_000.0) {
        position.altitude_millimeters = mm;
    }
    if let Some(mm) = parse_scaled(fields[10], 1_000.0) {
        position.geoidal_separation_millimeters = mm;
    }
    position.expiry.refresh();
    Ok(())
}

/// RMC: recommended minimum. Field layout:
/// `utc,status,lat,N/S,lon,E/W,sog,cog,date,magvar,E/W,mode`. `mode` is
/// absent pre-NMEA-2.3; its absence is treated as `'A'`.
pub fn rmc(position: &mut Position, fields: &[&str]) -> Result<(), ContentError> {
    if fields.len() < 9 {
        return Err(ContentError::InvalidField { field: "rmc/arity" });
    }
    let status = fields[1].chars().next().ok_or(ContentError::InvalidField { field: "rmc/status" })?;
    let mode = last_char(fields.get(11)).unwrap_or('A');
    match status {
        'A' => {},
        'V' => match mode {
            'A' | 'D' => {},
            _ => return Err(ContentError::InvalidStatus { status, mode }),
        },
        _ => return Err(ContentError::InvalidField { field: "rmc/status" }),
    }

    if let Some(utc) = parse_utc_of_day(fields[0]) {
        position.utc_of_day_nanoseconds = utc;
    }
    if !fields[2].is_empty() {
        let ns = fields[3].chars().next().ok_or(ContentError::InvalidField { field: "rmc/ns" })?;
        let (lat, lat_digits) =
            crate::format::parse_latlon(fields[2], ns, 2).ok_or(ContentError::InvalidField { field: "rmc/lat" })?;
        position.latitude_nanominutes = lat;
        position.latitude_digits = lat_digits;
    }
    if !fields[4].is_empty() {
        let ew = fields[5].chars().next().ok_or(ContentError::InvalidField { field: "rmc/ew" })?;
        let (lon, lon_digits) =
            crate::format::parse_latlon(fields[4], ew, 3).ok_or(ContentError::InvalidField { field: "rmc/lon" })?;
        position.longitude_nanominutes = lon;
        position.longitude_digits = lon_digits;
    }
    if let Some(microknots) = parse_scaled(fields[6], 1_000_000.0) {
        position.speed_microknots = microknots;
    }
    if let Some(nanodeg) = parse_scaled(fields[7], 1_000_000_000.0) {
        position.course_nanodegrees = nanodeg;
    }
    if let Some(dmy) = parse_date_time(fields[8], position.utc_of_day_nanoseconds) {
        position.stamp(dmy);
    }
    position.safety = mode_safety(Some(mode));
    position.expiry.refresh();
    Ok(())
}

/// GLL: geographic position. Field layout: `lat,N/S,lon,E/W,utc,status,mode`.
pub fn gll(position: &mut Position, fields: &[&str]) -> Result<(), ContentError> {
    if fields.len() < 6 {
        return Err(ContentError::InvalidField { field: "gll/arity" });
    }
    let status = fields[5].chars().next().ok_or(ContentError::InvalidField { field: "gll/status" })?;
    let mode = last_char(fields.get(6)).unwrap_or('A');
    match status {
        'A' => {},
        'V' => match mode {
            'A' | 'D' => {},
            _ => return Err(ContentError::InvalidStatus { status, mode }),
        },
        _ => return Err(ContentError::InvalidField { field: "gll/status" }),
    }

    let ns = fields[1].chars().next().ok_or(ContentError::InvalidField { field: "gll/ns" })?;
    let (lat, lat_digits) =
        crate::format::parse_latlon(fields[0], ns, 2).ok_or(ContentError::InvalidField { field: "gll/lat" })?;
    let ew = fields[3].chars().next().ok_or(ContentError::InvalidField { field: "gll/ew" })?;
    let (lon, lon_digits) =
        crate::format::parse_latlon(fields[2], ew, 3).ok_or(ContentError::InvalidField { field: "gll/lon" })?;
    position.latitude_nanominutes = lat;
    position.latitude_digits = lat_digits;
    position.longitude_nanominutes = lon;
    position.longitude_digits = lon_digits;
    if let Some(utc) = parse_utc_of_day(fields[4]) {
        position.utc_of_day_nanoseconds = utc;
    }
    position.safety = mode_safety(Some(mode));
    position.expiry.refresh();
    Ok(())
}

/// VTG: course and speed over ground. Field layout:
/// `cogTrue,T,cogMag,M,sogKnots,N,sogKmh,K,mode`. Mode `'N'` (data not
/// valid) fails with no mutation.
pub fn vtg(position: &mut Position, fields: &[&str]) -> Result<(), ContentError> {
    if fields.len() < 8 {
        return Err(ContentError::InvalidField { field: "vtg/arity" });
    }
    let mode = last_char(fields.get(8));
    if mode == Some('N') {
        return Err(ContentError::InvalidStatus { status: 'V', mode: 'N' });
    }
    if let Some(nanodeg) = parse_scaled(fields[0], 1_000_000_000.0) {
        position.course_nanodegrees = nanodeg;
    }
    if let Some(nanodeg) = parse_scaled(fields[2], 1_000_000_000.0) {
        position.course_magnetic_nanodegrees = nanodeg;
    }
    if let Some(microknots) = parse_scaled(fields[4], 1_000_000.0) {
        position.speed_microknots = microknots;
    }
    if let Some(mmph) = parse_scaled(fields[6], 1_000_000.0) {
        position.speed_millimeters_per_hour = mmph;
    }
    if let Some(mode) = mode {
        position.safety = mode_safety(Some(mode));
    }
    position.expiry.refresh();
    Ok(())
}

/// GSA: DOPs and active satellites. Field layout: `mode1,mode2,sat[1..12],
/// pdop,hdop,vdop,systemId?`. Returns the optional NMEA 4.10+ GNSS system
/// ID field, which the caller uses to disambiguate a GN-talker GSA.
pub fn gsa(active: &mut Active, fields: &[&str]) -> Result<Option<System>, ContentError> {
    if fields.len() < 17 {
        return Err(ContentError::InvalidField { field: "gsa/arity" });
    }
    active.mode = match fields[1] {
        "1" => FixMode::NoFix,
        "2" => FixMode::TwoD,
        "3" => FixMode::ThreeD,
        _ => FixMode::Unknown,
    };
    active.satellites.clear();
    for field in &fields[2..14] {
        if field.is_empty() {
            continue;
        }
        if let Ok(id) = field.parse::<u16>() {
            active.satellites.push(id);
        }
    }
    active.pdop_centi = parse_scaled(fields[14], 100.0).map(|v| v as u16).unwrap_or(crate::domain::active::DOP_UNDEFINED);
    active.hdop_centi = parse_scaled(fields[15], 100.0).map(|v| v as u16).unwrap_or(crate::domain::active::DOP_UNDEFINED);
    active.vdop_centi = parse_scaled(fields[16], 100.0).map(|v| v as u16).unwrap_or(crate::domain::active::DOP_UNDEFINED);
    active.expiry.refresh();

    let system = fields.get(17).and_then(|code| match *code {
        "1" => Some(System::Gps),
        "2" => Some(System::Glonass),
        "3" => Some(System::Galileo),
        "4" => Some(System::Beidou),
        "5" => Some(System::Qzss),
        _ => None,
    });
    Ok(system)
}

/// GSV: satellites in view. Field layout: `total,index,visible,
/// (id,elv,azm,snr){1..4},signalId?`. A sentence sequence is chunked into
/// up to 4-satellite fragments; this returns the 1-based fragment index
/// just completed so the caller can track `pending` across the sequence.
pub fn gsv(view: &mut View, fields: &[&str]) -> Result<u8, ContentError> {
    if fields.len() < 3 {
        return Err(ContentError::InvalidField { field: "gsv/arity" });
    }
    let total_fragments: u8 = fields[0].parse().map_err(|_| ContentError::InvalidField { field: "gsv/total" })?;
    let fragment_index: u8 = fields[1].parse().map_err(|_| ContentError::InvalidField { field: "gsv/index" })?;
    let visible: u8 = fields[2].parse().unwrap_or(0);

    view.begin_fragment(fragment_index, total_fragments);
    view.visible = visible;
    view.channels = visible;

    let remaining = &fields[3..];
    let has_signal_id = remaining.len() % 4 == 1;
    let groups = remaining.len() / 4;
    for g in 0..groups {
        let base = g * 4;
        let id: u16 = match remaining[base].parse() {
            Ok(id) => id,
            Err(_) => continue,
        };
        let elevation_degrees: i16 = remaining[base + 1].parse().unwrap_or(0);
        let azimuth_degrees: u16 = remaining[base + 2].parse().unwrap_or(0);
        let snr_dbhz: Option<u8> = remaining[base + 3].parse().ok();
        view.satellites.push(crate::domain::view::Satellite {
            id,
            elevation_degrees,
            azimuth_degrees,
            snr_dbhz,
            phantom: false,
            untracked: snr_dbhz.is_none(),
            unused: false,
        });
    }
    let _ = has_signal_id;
    view.expiry.refresh();
    Ok(fragment_index)
}

/// ZDA: date and time with local zone offset. Field layout:
/// `utc,day,month,year,tzHours,tzMinutes`.
pub fn zda(position: &mut Position, fields: &[&str]) -> Result<(), ContentError> {
    if fields.len() < 6 {
        return Err(ContentError::InvalidField { field: "zda/arity" });
    }
    let utc = parse_utc_of_day(fields[0]).ok_or(ContentError::InvalidField { field: "zda/utc" })?;
    position.utc_of_day_nanoseconds = utc;
    if let Some(dmy) = parse_zda_date_time(fields[1], fields[2], fields[3], utc) {
        position.dmy_nanoseconds = dmy;
        position.stamp(dmy);
    }
    if let Some(offset) = parse_zone_offset(fields[4], fields[5]) {
        position.timezone_offset_nanoseconds = offset;
    }
    position.expiry.refresh();
    Ok(())
}

/// GBS: RAIM fault detection. Field layout: `utc,errLat,errLon,errAlt,
/// failedId,probability,bias,stddev,systemId?,signalId?`.
pub fn gbs(fault: &mut Fault, fields: &[&str]) -> Result<(), ContentError> {
    if fields.len() < 8 {
        return Err(ContentError::InvalidField { field: "gbs/arity" });
    }
    fault.utc_of_day_nanoseconds = parse_utc_of_day(fields[0]).unwrap_or(crate::time::UNSET_NANOSECONDS);
    fault.latitude_error_meters = fields[1].parse().unwrap_or(0.0);
    fault.longitude_error_meters = fields[2].parse().unwrap_or(0.0);
    fault.altitude_error_meters = fields[3].parse().unwrap_or(0.0);
    fault.failed_satellite_id = fields[4].parse::<u16>().ok().filter(|&id| id != 0);
    fault.probability_of_missed_detection = fields[5].parse().unwrap_or(0.0);
    fault.estimated_bias_meters = fields[6].parse().unwrap_or(0.0);
    fault.standard_deviation_meters = fields[7].parse().unwrap_or(0.0);
    fault.expiry.refresh();
    Ok(())
}

/// TXT: free-form diagnostic text. No record mutation; the caller logs it.
/// Field layout: `total,index,severity,text`; the text itself may itself
/// contain commas that were already consumed by tokenization upstream, so
/// this simply rejoins whatever fields remain after the severity code.
pub fn txt(fields: &[&str]) -> Result<String, ContentError> {
    if fields.len() < 4 {
        return Err(ContentError::InvalidField { field: "txt/arity" });
    }
    Ok(fields[3..].join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gga_matches_documented_scenario() {
        let mut position = Position::new(System::Gnss);
        let fields = [
            "135627.00", "3947.65338", "N", "10509.20216", "W", "2", "12", "0.67", "1708.6", "M", "-21.5", "M", "",
            "0000",
        ];
        gga(&mut position, System::Gnss, &fields).unwrap();
        assert_eq!(position.latitude_nanominutes, 2_387_653_380_000);
        assert_eq!(position.longitude_nanominutes, -6_309_202_160_000);
        assert_eq!(position.altitude_millimeters, 1_708_600);
        assert_eq!(position.geoidal_separation_millimeters, -21_500);
        assert_eq!(position.satellites_used, 12);
        assert_eq!(position.quality, Quality::Differential);
        assert_eq!(position.utc_of_day_nanoseconds, 50_187_000_000_000);
    }

    #[test]
    fn rmc_void_with_bad_mode_fails_and_leaves_record_untouched() {
        let mut position = Position::new(System::Gnss);
        let before = position;
        let fields =
            ["135628.00", "V", "3947.65337", "N", "10509.20223", "W", "0.010", "", "070818", "", "", "M"];
        let err = rmc(&mut position, &fields).unwrap_err();
        assert_eq!(err, ContentError::InvalidStatus { status: 'V', mode: 'M' });
        assert_eq!(position, before);
    }

    #[test]
    fn zda_chatham_islands_offset() {
        let mut position = Position::new(System::Gnss);
        let fields = ["171305.00", "12", "05", "2023", "-12", "45"];
        zda(&mut position, &fields).unwrap();
        assert_eq!(position.timezone_offset_nanoseconds, -45_900_000_000_000);
    }

    #[test]
    fn vtg_mode_n_fails_without_mutation() {
        let mut position = Position::new(System::Gnss);
        let before = position;
        let fields = ["054.7", "T", "034.4", "M", "005.5", "N", "010.2", "K", "N"];
        assert!(vtg(&mut position, &fields).is_err());
        assert_eq!(position, before);
    }

    #[test]
    fn gsv_tracks_pending_fragments() {
        let mut view = View::new();
        let first = ["3", "1", "09", "12", "045", "220", "30", "18", "310", "200", "25"];
        let idx = gsv(&mut view, &first).unwrap();
        assert_eq!(idx, 1);
        assert_eq!(view.pending, 2);
        assert_eq!(view.satellites.len(), 2);
    }
}
