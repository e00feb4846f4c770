//! Validators (C4): given a buffer that purports to hold one finished frame
//! of a known protocol — for instance one forwarded verbatim by the RTK
//! router rather than assembled by a local framer — confirm its declared
//! length is consistent with what's actually there and recompute the
//! integrity check against the trailing field.

use crate::checksum::cpo::CpoChecksum;
use crate::checksum::nmea::parse_ascii;
use crate::checksum::rtcm::{crc24q, to_bytes};
use crate::checksum::ubx::UbxChecksum;
use crate::constants::{RTCM_HEADER_LENGTH, UBX_HEADER_LENGTH};
use crate::error::{IntegrityError, LengthError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidateError {
    Length(LengthError),
    Integrity(IntegrityError),
    Malformed,
}

impl From<LengthError> for ValidateError {
    fn from(e: LengthError) -> Self {
        ValidateError::Length(e)
    }
}

impl From<IntegrityError> for ValidateError {
    fn from(e: IntegrityError) -> Self {
        ValidateError::Integrity(e)
    }
}

/// Validates a `$...*XXCRLF` buffer. Returns the validated length (up to
/// and including the trailing LF) on success.
pub fn validate_nmea(buf: &[u8]) -> Result<usize, ValidateError> {
    let dollar = buf.iter().position(|&b| b == b'$').ok_or(ValidateError::Malformed)?;
    let star = buf[dollar..].iter().position(|&b| b == b'*').ok_or(ValidateError::Malformed)? + dollar;
    let declared = star + 1 + 2 + 2; // '*' + two nibbles + CRLF
    if declared > buf.len() {
        return Err(LengthError { declared, available: buf.len() }.into());
    }
    let (msn, lsn) = (buf[star + 1], buf[star + 2]);
    let mut sum: u8 = 0;
    for &b in &buf[dollar + 1..star] {
        sum ^= b;
    }
    let got = parse_ascii(msn, lsn).ok_or(ValidateError::Malformed)?;
    if sum != got {
        return Err(IntegrityError::Nmea { expected: sum, got }.into());
    }
    Ok(declared)
}

/// Validates a `0xB5 0x62 class id lenL lenH payload ckA ckB` buffer.
pub fn validate_ubx(buf: &[u8]) -> Result<usize, ValidateError> {
    if buf.len() < UBX_HEADER_LENGTH + 2 {
        return Err(LengthError { declared: UBX_HEADER_LENGTH + 2, available: buf.len() }.into());
    }
    let payload_len = u16::from_le_bytes([buf[4], buf[5]]) as usize;
    let declared = UBX_HEADER_LENGTH + payload_len + 2;
    if declared > buf.len() {
        return Err(LengthError { declared, available: buf.len() }.into());
    }
    let mut calc = UbxChecksum::new();
    for &b in &buf[2..UBX_HEADER_LENGTH + payload_len] {
        calc.update(b);
    }
    let (ck_a, ck_b) = calc.result();
    let (got_a, got_b) = (buf[declared - 2], buf[declared - 1]);
    if (ck_a, ck_b) != (got_a, got_b) {
        return Err(IntegrityError::Ubx { expected: (ck_a, ck_b), got: (got_a, got_b) }.into());
    }
    Ok(declared)
}

/// Validates a `0xD3` reserved/length(10)/payload/CRC-24Q(3) buffer.
pub fn validate_rtcm(buf: &[u8]) -> Result<usize, ValidateError> {
    if buf.len() < RTCM_HEADER_LENGTH {
        return Err(LengthError { declared: RTCM_HEADER_LENGTH, available: buf.len() }.into());
    }
    let length = (((buf[1] & 0x03) as usize) << 8) | buf[2] as usize;
    let declared = RTCM_HEADER_LENGTH + length + 3;
    if declared > buf.len() {
        return Err(LengthError { declared, available: buf.len() }.into());
    }
    let crc = crc24q(&buf[..RTCM_HEADER_LENGTH + length]);
    let expected = to_bytes(crc);
    let got = &buf[RTCM_HEADER_LENGTH + length..declared];
    if got != expected {
        let got_u32 = u32::from_be_bytes([0, got[0], got[1], got[2]]);
        return Err(IntegrityError::Rtcm { expected: crc, got: got_u32 }.into());
    }
    Ok(declared)
}

/// Validates a de-escaped `DLE id size payload checksum DLE ETX` buffer
/// (i.e. one already run through `framer::CpoFramer`, not raw wire bytes).
pub fn validate_cpo(buf: &[u8]) -> Result<usize, ValidateError> {
    const SHORTEST: usize = 3 + 3; // DLE id size ... checksum DLE ETX
    if buf.len() < SHORTEST {
        return Err(LengthError { declared: SHORTEST, available: buf.len() }.into());
    }
    let size = buf[2] as usize;
    let declared = 3 + size + 3;
    if declared > buf.len() {
        return Err(LengthError { declared, available: buf.len() }.into());
    }
    let mut calc = CpoChecksum::new();
    for &b in &buf[1..3 + size] {
        calc.update(b);
    }
    let expected = calc.result();
    let got = buf[3 + size];
    if got != expected {
        return Err(IntegrityError::Cpo { expected, got }.into());
    }
    Ok(declared)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_known_good_gga_sentence() {
        let sentence = b"$GNGGA,135627.00,3947.65338,N,10509.20216,W,2,12,0.67,1708.6,M,-21.5,M,,0000*4E\r\n";
        assert_eq!(validate_nmea(sentence), Ok(sentence.len()));
    }

    #[test]
    fn rejects_truncated_gga_sentence() {
        let sentence = b"$GNGGA,135627.00,3947.65338,N,10509.20216,W,2,12,0.67,1708.6,M,-21.5,M,,0000*4E";
        assert!(matches!(validate_nmea(sentence), Err(ValidateError::Length(_))));
    }
}
