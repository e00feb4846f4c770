//! NMEA tokenization: splits a validated `$...*XX\r\n` frame on `,` and `*`
//! into fields, and the complementary `serialize` that recomposes fields
//! back into a checksummed `$...*XX\r\n` sentence.
//!
//! Design notes re-expresses the original's in-place, comma-to-NUL buffer
//! mutation as borrowed slice indices into an immutable buffer instead.

use crate::checksum::nmea::NmeaChecksum;
use crate::constants::{NMEA_CHECKSUM, NMEA_DELIMITER, NMEA_SYNC};

/// One parsed NMEA sentence: the talker+name token (e.g. `"GNGGA"`) and the
/// comma-separated fields that followed it, up to (not including) `*`.
pub struct Tokens<'a> {
    pub name: &'a str,
    pub fields: Vec<&'a str>,
}

/// Splits a validated sentence buffer into its name and fields. `buf` is
/// expected to start with `$` and contain a `*` checksum delimiter; callers
/// should run `validator::validate_nmea` first.
pub fn tokenize(buf: &[u8]) -> Option<Tokens<'_>> {
    let start = buf.iter().position(|&b| b == NMEA_SYNC)? + 1;
    let end = buf[start..].iter().position(|&b| b == NMEA_CHECKSUM)? + start;
    let body = core::str::from_utf8(&buf[start..end]).ok()?;
    let mut parts = body.split(NMEA_DELIMITER as char);
    let name = parts.next()?;
    let fields = parts.collect();
    Some(Tokens { name, fields })
}

/// Talker (first two letters, e.g. `"GN"`) and sentence mnemonic (the rest,
/// e.g. `"GGA"`) split out of a token name.
pub fn split_talker(name: &str) -> Option<(&str, &str)> {
    if name.len() < 3 {
        return None;
    }
    Some(name.split_at(2))
}

/// Recomposes a name and fields back into a complete, checksummed
/// `$...*XX\r\n` sentence.
pub fn serialize(name: &str, fields: &[&str]) -> String {
    let mut body = String::new();
    body.push_str(name);
    for field in fields {
        body.push(NMEA_DELIMITER as char);
        body.push_str(field);
    }

    let mut checksum = NmeaChecksum::new();
    for byte in body.bytes() {
        checksum.update(byte);
    }
    let (msn, lsn) = checksum.finalize();

    let mut sentence = String::with_capacity(body.len() + 6);
    sentence.push(NMEA_SYNC as char);
    sentence.push_str(&body);
    sentence.push(NMEA_CHECKSUM as char);
    sentence.push(msn as char);
    sentence.push(lsn as char);
    sentence.push_str("\r\n");
    sentence
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_gga_sentence() {
        let sentence = b"$GNGGA,135627.00,3947.65338,N,10509.20216,W,2,12,0.67,1708.6,M,-21.5,M,,0000*4E\r\n";
        let tokens = tokenize(sentence).unwrap();
        assert_eq!(tokens.name, "GNGGA");
        assert_eq!(tokens.fields[0], "135627.00");
        assert_eq!(split_talker(tokens.name), Some(("GN", "GGA")));
    }

    #[test]
    fn round_trips_through_serialize() {
        let sentence = b"$GNGGA,135627.00,3947.65338,N,10509.20216,W,2,12,0.67,1708.6,M,-21.5,M,,0000*4E\r\n";
        let tokens = tokenize(sentence).unwrap();
        let rebuilt = serialize(tokens.name, &tokens.fields);
        assert_eq!(rebuilt.as_bytes(), sentence);
    }
}
