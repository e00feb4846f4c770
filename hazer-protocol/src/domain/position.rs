use super::{Expiry, Quality, Safety};
use crate::constellation::System;

/// A per-system position/velocity/time record. Latitude/longitude are
/// signed nanominutes; altitude and geoidal separation are signed
/// millimeters; speed is carried in both microknots and millimeters/hour
/// since different sentences (and CPO) report it in different base units;
/// course is signed nanodegrees.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub system: System,
    pub utc_of_day_nanoseconds: u64,
    pub dmy_nanoseconds: u64,
    pub tot_nanoseconds: u64,
    pub old_nanoseconds: u64,
    pub timezone_offset_nanoseconds: i64,
    pub latitude_nanominutes: i64,
    pub longitude_nanominutes: i64,
    pub altitude_millimeters: i64,
    pub geoidal_separation_millimeters: i64,
    pub speed_microknots: i64,
    pub speed_millimeters_per_hour: i64,
    pub course_nanodegrees: i64,
    pub course_magnetic_nanodegrees: i64,
    pub latitude_digits: u32,
    pub longitude_digits: u32,
    pub satellites_used: u8,
    pub quality: Quality,
    pub safety: Safety,
    pub expiry: Expiry,
}

impl Position {
    pub fn new(system: System) -> Self {
        Self {
            system,
            utc_of_day_nanoseconds: crate::time::UNSET_NANOSECONDS,
            dmy_nanoseconds: crate::time::UNSET_NANOSECONDS,
            tot_nanoseconds: crate::time::UNSET_NANOSECONDS,
            old_nanoseconds: crate::time::UNSET_NANOSECONDS,
            timezone_offset_nanoseconds: 0,
            latitude_nanominutes: 0,
            longitude_nanominutes: 0,
            altitude_millimeters: 0,
            geoidal_separation_millimeters: 0,
            speed_microknots: 0,
            speed_millimeters_per_hour: 0,
            course_nanodegrees: 0,
            course_magnetic_nanodegrees: 0,
            latitude_digits: 0,
            longitude_digits: 0,
            satellites_used: 0,
            quality: Quality::NoFix,
            safety: Safety::Unknown,
            expiry: Expiry::default(),
        }
    }

    /// Folds a freshly parsed total D/M/Y+UTC-of-day timestamp in, keeping
    /// the previous total as `old_nanoseconds` (spec's combined (TOT) and
    /// previous (OLD) totals).
    pub fn stamp(&mut self, total_nanoseconds: u64) {
        self.old_nanoseconds = self.tot_nanoseconds;
        self.tot_nanoseconds = total_nanoseconds;
    }
}
