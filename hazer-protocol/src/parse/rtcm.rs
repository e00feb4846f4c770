//! RTCM payload parsing (C5, RTCM half). Per the non-goals, Hazer doesn't
//! decode RTCM message bodies (that's the DGNSS/RTK math) — it only
//! extracts the message type, a fixed 12-bit field at the start of every
//! RTCM 10403 payload, for routing and display purposes.

use crate::constants::RTCM_HEADER_LENGTH;
use crate::error::ContentError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RtcmMessage {
    pub message_type: u16,
    pub payload_length: usize,
}

/// Extracts the message type from a full `0xD3 len(10) payload CRC(3)`
/// frame. `frame` must already have passed `validator::validate_rtcm`.
pub fn message_type(frame: &[u8]) -> Result<RtcmMessage, ContentError> {
    let length = (((frame.get(1).copied().unwrap_or(0) & 0x03) as usize) << 8)
        | frame.get(2).copied().unwrap_or(0) as usize;
    if length < 2 || frame.len() < RTCM_HEADER_LENGTH + 2 {
        return Err(ContentError::InvalidPacketLen { expect: RTCM_HEADER_LENGTH + 2, got: frame.len() });
    }
    // Message type is the leading 12 bits of the payload, MSB-first.
    let b0 = frame[RTCM_HEADER_LENGTH];
    let b1 = frame[RTCM_HEADER_LENGTH + 1];
    let message_type = ((b0 as u16) << 4) | ((b1 as u16) >> 4);
    Ok(RtcmMessage { message_type, payload_length: length })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::rtcm::{crc24q, to_bytes};
    use crate::constants::RTCM_SYNC;

    #[test]
    fn extracts_message_type_1005() {
        // Type 1005 = 0x3ED, top 12 bits of a 2-byte payload: 0x3ED0.
        let payload = [0x3Eu8, 0xD0, 0x00];
        let mut frame = vec![RTCM_SYNC, 0x00, payload.len() as u8];
        frame.extend_from_slice(&payload);
        let crc = crc24q(&frame);
        frame.extend_from_slice(&to_bytes(crc));
        let decoded = message_type(&frame).unwrap();
        assert_eq!(decoded.message_type, 1005);
    }
}
