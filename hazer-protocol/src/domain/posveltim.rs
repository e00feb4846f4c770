use super::{Expiry, FixMode};

/// The UBX NAV-PVT combined position/velocity/time record. Distinct from
/// `Position`: it is a single receiver-wide record straight off the wire in
/// UBX's own units (converted to Hazer's nanodegree/millimeter/millisecond
/// conventions), rather than a per-constellation record assembled out of
/// several NMEA sentences.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PosVelTim {
    pub itow_milliseconds: u32,
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub valid_date: bool,
    pub valid_time: bool,
    pub fully_resolved: bool,
    pub time_accuracy_nanoseconds: u32,
    pub fix_type: FixMode,
    pub gnss_fix_ok: bool,
    pub differential_soln: bool,
    pub heading_of_vehicle_valid: bool,
    pub satellites_used: u8,
    pub longitude_nanodegrees: i64,
    pub latitude_nanodegrees: i64,
    pub height_ellipsoid_millimeters: i32,
    pub height_msl_millimeters: i32,
    pub horizontal_accuracy_millimeters: u32,
    pub vertical_accuracy_millimeters: u32,
    pub velocity_north_millimeters_per_second: i32,
    pub velocity_east_millimeters_per_second: i32,
    pub velocity_down_millimeters_per_second: i32,
    pub ground_speed_millimeters_per_second: i32,
    pub heading_of_motion_nanodegrees: i64,
    pub speed_accuracy_millimeters_per_second: u32,
    pub heading_accuracy_nanodegrees: u32,
    pub pdop_centi: u16,
    pub expiry: Expiry,
}

impl PosVelTim {
    pub fn new() -> Self {
        Self::default()
    }
}
