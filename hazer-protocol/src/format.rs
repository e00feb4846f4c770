//! Coordinate and bearing formatting helpers: NMEA `ddmm.mmmm`
//! latitude/longitude fields to/from signed nanominutes, and nanodegree
//! bearings to compass points.

/// Parses an NMEA `ddmm.mmmm` (latitude, 2-digit degrees) or `dddmm.mmmm`
/// (longitude, 3-digit degrees) field plus its hemisphere letter into
/// signed nanominutes (10⁻⁹ arc minutes). Retains the number of fractional
/// digits actually present, since downstream emitters need it to avoid
/// claiming false precision.
pub fn parse_latlon(field: &str, hemisphere: char, degree_digits: usize) -> Option<(i64, u32)> {
    if field.len() < degree_digits {
        return None;
    }
    let (deg_str, min_str) = field.split_at(degree_digits);
    let degrees: i64 = deg_str.parse().ok()?;
    let minutes: f64 = min_str.parse().ok()?;
    let digits = min_str.split('.').nth(1).map_or(0, |frac| frac.len());

    let nanominutes = degrees * 60_000_000_000 + (minutes * 1_000_000_000.0).round() as i64;
    let signed = match hemisphere {
        'N' | 'E' => nanominutes,
        'S' | 'W' => -nanominutes,
        _ => return None,
    };
    Some((signed, digits as u32))
}

/// Formats signed nanominutes back into an NMEA-style `(degrees, minutes,
/// hemisphere)` triple, given the desired fractional-minute digit count.
pub fn format_latlon(nanominutes: i64, is_longitude: bool, digits: u32) -> (u32, f64, char) {
    let magnitude = nanominutes.unsigned_abs();
    let total_minutes = magnitude as f64 / 1_000_000_000.0;
    let degrees = (total_minutes / 60.0) as u32;
    let minutes = total_minutes - (degrees as f64 * 60.0);
    let _ = digits; // retained for callers that need to reformat with source precision
    let hemisphere = if is_longitude {
        if nanominutes >= 0 { 'E' } else { 'W' }
    } else if nanominutes >= 0 {
        'N'
    } else {
        'S'
    };
    (degrees, minutes, hemisphere)
}

/// Parses a decimal ASCII field and scales it to an integer unit, rounding
/// to nearest. Shared by the NMEA sentence parsers for every "decimal
/// meters/knots/degrees in, fixed-point sub-unit out" field: altitude and
/// geoidal separation (millimeters, scale 1e3), speed over ground
/// (microknots, scale 1e6; millimeters/hour, scale 1e6), course (nanodegrees,
/// scale 1e9).
pub fn parse_scaled(field: &str, scale: f64) -> Option<i64> {
    if field.is_empty() {
        return None;
    }
    let value: f64 = field.parse().ok()?;
    Some((value * scale).round() as i64)
}

const COMPASS_8: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];
const COMPASS_16: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW", "NNW",
];
const COMPASS_32: [&str; 32] = [
    "N", "NbE", "NNE", "NEbN", "NE", "NEbE", "ENE", "EbN", "E", "EbS", "ESE", "SEbE", "SE", "SEbS", "SSE", "SbE",
    "S", "SbW", "SSW", "SWbS", "SW", "SWbW", "WSW", "WbS", "W", "WbN", "WNW", "NWbW", "NW", "NWbN", "NNW", "NbW",
];

/// Which compass rose resolution to quantize a bearing to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompassPoints {
    Eight,
    Sixteen,
    ThirtyTwo,
}

/// Maps a bearing in nanodegrees (0..360e9, wrapping) to the nearest
/// compass point label at the requested resolution. Monotone across the
/// boundary angles of each table.
pub fn format_nanodegrees2compass(nanodegrees: i64, points: CompassPoints) -> &'static str {
    let degrees = (nanodegrees.rem_euclid(360_000_000_000) as f64) / 1_000_000_000.0;
    let (table, sectors): (&[&str], f64) = match points {
        CompassPoints::Eight => (&COMPASS_8, 8.0),
        CompassPoints::Sixteen => (&COMPASS_16, 16.0),
        CompassPoints::ThirtyTwo => (&COMPASS_32, 32.0),
    };
    let sector_width = 360.0 / sectors;
    let index = ((degrees + sector_width / 2.0) / sector_width).floor() as usize % table.len();
    table[index]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_round_trips_latitude() {
        let (nm, digits) = parse_latlon("3947.65338", 'N', 2).unwrap();
        assert_eq!(digits, 5);
        let (deg, min, hemi) = format_latlon(nm, false, digits);
        assert_eq!((deg, hemi), (39, 'N'));
        assert!((min - 47.65338).abs() < 1e-6);
    }

    #[test]
    fn compass_boundaries_are_monotone() {
        assert_eq!(format_nanodegrees2compass(0, CompassPoints::Eight), "N");
        assert_eq!(format_nanodegrees2compass(45_000_000_000, CompassPoints::Eight), "NE");
        assert_eq!(format_nanodegrees2compass(359_999_999_999, CompassPoints::Eight), "N");
    }
}
