//! The tagged system enumeration and its NMEA talker/satellite-id mappings.

/// A GNSS constellation, or the aggregate multi-constellation tag NMEA 4.10
/// uses for the "GN" talker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum System {
    Gnss,
    Gps,
    Glonass,
    Galileo,
    Beidou,
    Sbas,
    Imes,
    Qzss,
}

impl System {
    /// Maps an NMEA talker ID (the two letters following `$`) to a system.
    /// Returns `Gnss` for the aggregate "GN" talker and `None` for anything
    /// not recognized.
    pub fn from_talker(talker: &str) -> Option<System> {
        match talker {
            "GN" => Some(System::Gnss),
            "GP" => Some(System::Gps),
            "GL" => Some(System::Glonass),
            "GA" => Some(System::Galileo),
            "GB" | "BD" => Some(System::Beidou),
            "GQ" | "QZ" => Some(System::Qzss),
            _ => None,
        }
    }

    /// Maps an NMEA satellite ID (as carried in GSA/GSV) to the system that
    /// owns that numeric range. Ranges per NMEA 0183 4.11 Table 1.
    pub fn from_satellite_id(id: u16) -> Option<System> {
        match id {
            1..=32 => Some(System::Gps),
            33..=64 => Some(System::Sbas),
            65..=96 => Some(System::Glonass),
            120..=158 => Some(System::Sbas),
            173..=182 => Some(System::Imes),
            193..=197 => Some(System::Qzss),
            201..=235 => Some(System::Beidou),
            301..=336 => Some(System::Galileo),
            _ => None,
        }
    }
}
