//! Wire-format constants for the four framed protocols plus WT901.

/// NMEA 0183 sentence leader.
pub const NMEA_SYNC: u8 = b'$';
/// NMEA field delimiter.
pub const NMEA_DELIMITER: u8 = b',';
/// NMEA checksum delimiter.
pub const NMEA_CHECKSUM: u8 = b'*';
/// Longest legal NMEA sentence including leader and CRLF.
pub const NMEA_MAX_LENGTH: usize = 82;

/// UBX protocol sync bytes.
pub const UBX_SYNC_1: u8 = 0xB5;
pub const UBX_SYNC_2: u8 = 0x62;
/// Bytes preceding the payload: two sync, class, id, two length.
pub const UBX_HEADER_LENGTH: usize = 6;
/// Trailing Fletcher-16 bytes.
pub const UBX_CHECKSUM_LENGTH: usize = 2;
pub const UBX_MAX_PAYLOAD: usize = 65535;
pub const UBX_MAX_LENGTH: usize = UBX_HEADER_LENGTH + UBX_MAX_PAYLOAD + UBX_CHECKSUM_LENGTH;

/// RTCM 10403 preamble byte.
pub const RTCM_SYNC: u8 = 0xD3;
/// Preamble + reserved/length bytes.
pub const RTCM_HEADER_LENGTH: usize = 3;
/// Trailing CRC-24Q bytes.
pub const RTCM_CRC_LENGTH: usize = 3;
pub const RTCM_MAX_PAYLOAD: usize = 1023;
pub const RTCM_MAX_LENGTH: usize = RTCM_HEADER_LENGTH + RTCM_MAX_PAYLOAD + RTCM_CRC_LENGTH;
/// Shortest legal RTCM frame: header, zero-length payload, CRC. Used by the
/// router to distinguish a keepalive from a correction.
pub const RTCM_MIN_LENGTH: usize = RTCM_HEADER_LENGTH + RTCM_CRC_LENGTH;

/// Garmin CPO framing sentinel, also used mid-frame as an escape prefix.
pub const CPO_DLE: u8 = 0x10;
pub const CPO_ETX: u8 = 0x03;
pub const CPO_MAX_PAYLOAD: usize = 255;
/// DLE + id + size + payload + checksum + DLE + ETX, before de-escaping.
pub const CPO_MAX_LENGTH: usize = 3 + CPO_MAX_PAYLOAD + 3;
pub const CPO_PVT_ID: u8 = 0x33;
pub const CPO_PVT_LENGTH: usize = 64;
pub const CPO_SDR_ID: u8 = 0x72;
pub const CPO_SDR_LENGTH: usize = 84;

/// WT901/Dally frame header byte. Unlike the other three protocols this
/// machine carries no trailing checksum of its own; framing relies entirely
/// on recognizing a lone header byte followed immediately by a valid flag.
pub const WT901_SYNC: u8 = 0x55;
pub const WT901_FLAG_DATA: u8 = 0x61;
pub const WT901_FLAG_REGISTER: u8 = 0x71;
pub const WT901_DATA_WORDS: usize = 9;
/// A register-read reply carries one fewer word than a data frame: the
/// register address occupies the first word's slot and the remaining eight
/// are always sent, regardless of how many the queried register actually
/// uses.
pub const WT901_REGISTER_WORDS: usize = WT901_DATA_WORDS - 1;
/// header + flag + 9 little-endian words of 2 bytes each.
pub const WT901_DATA_FRAME_LENGTH: usize = 2 + WT901_DATA_WORDS * 2;
/// header + flag + register address word + 8 data words.
pub const WT901_REGISTER_FRAME_LENGTH: usize = 2 + 2 + WT901_REGISTER_WORDS * 2;

/// Register addresses the WT901 register-read reply (flag 0x71) may carry.
pub const WT901_REGISTER_YEARMONTH: u8 = 0x30;
pub const WT901_REGISTER_DATEHOUR: u8 = 0x31;
pub const WT901_REGISTER_MINUTESECOND: u8 = 0x32;
pub const WT901_REGISTER_MILLISECOND: u8 = 0x33;
pub const WT901_REGISTER_MAGNETICFIELD: u8 = 0x3A;
pub const WT901_REGISTER_TEMPERATURE: u8 = 0x40;
pub const WT901_REGISTER_QUATERNION: u8 = 0x51;

/// Datagram envelope sequence field width.
pub const DATAGRAM_HEADER_LENGTH: usize = 4;

/// Default number of whole ticks a domain record stays valid after its last refresh.
pub const DEFAULT_EXPIRY_TICKS: u32 = 5;
