//! Binary-protocol payload parsers (C5, non-NMEA half): UBX, RTCM, Garmin
//! CPO, and WT901. NMEA sentence parsers live in [`crate::sentences`]
//! instead, since they work on tokenized fields rather than byte offsets.

pub mod cpo;
pub mod rtcm;
pub mod ubx;
pub mod wt901;
