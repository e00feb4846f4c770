use super::Expiry;

/// RAIM fault detection output (GBS): per-axis error estimate, the
/// satellite (if any) identified as the likely fault source, and the
/// statistics behind that identification.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fault {
    pub utc_of_day_nanoseconds: u64,
    pub latitude_error_meters: f32,
    pub longitude_error_meters: f32,
    pub altitude_error_meters: f32,
    pub failed_satellite_id: Option<u16>,
    pub probability_of_missed_detection: f32,
    pub estimated_bias_meters: f32,
    pub standard_deviation_meters: f32,
    pub expiry: Expiry,
}
