use super::Expiry;

/// MON-HW jamming/interference monitor state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JammingState {
    #[default]
    Unknown,
    None,
    Warning,
    Critical,
}

impl JammingState {
    pub fn from_bits(bits: u8) -> JammingState {
        match bits {
            0 => JammingState::Unknown,
            1 => JammingState::None,
            2 => JammingState::Warning,
            3 => JammingState::Critical,
            _ => JammingState::Unknown,
        }
    }
}

/// NAV-STATUS spoofing detection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpoofingState {
    #[default]
    Unknown,
    None,
    OneIndicator,
    ManyIndicators,
}

impl SpoofingState {
    pub fn from_bits(bits: u8) -> SpoofingState {
        match bits {
            0 => SpoofingState::Unknown,
            1 => SpoofingState::None,
            2 => SpoofingState::OneIndicator,
            3 => SpoofingState::ManyIndicators,
            _ => SpoofingState::Unknown,
        }
    }
}

/// Receiver-wide solution health, assembled from several UBX messages
/// (NAV-STATUS, MON-HW, NAV-SVIN, NAV-ODO, RXM-RTCM) rather than one. Unlike
/// `Position`, this isn't per-constellation: it describes the receiver
/// itself, not a GNSS system's fix.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    pub time_to_first_fix_milliseconds: u32,
    pub jamming: JammingState,
    pub jamming_indicator: u8,
    pub spoofing: SpoofingState,
    pub survey_in_active: bool,
    pub survey_in_valid: bool,
    pub survey_in_observations: u32,
    /// 0.1mm units, matching the NAV-SVIN wire field directly (see the
    /// design notes' open question on the output/input unit mismatch).
    pub survey_in_mean_accuracy_tenths_mm: u32,
    pub odometer_distance_meters: f64,
    pub odometer_total_distance_meters: f64,
    pub odometer_std_dev_meters: f64,
    pub rtcm_correction_accepted: bool,
    pub expiry: Expiry,
}

impl Default for Solution {
    fn default() -> Self {
        Self {
            time_to_first_fix_milliseconds: 0,
            jamming: JammingState::Unknown,
            jamming_indicator: 0,
            spoofing: SpoofingState::Unknown,
            survey_in_active: false,
            survey_in_valid: false,
            survey_in_observations: 0,
            survey_in_mean_accuracy_tenths_mm: 0,
            odometer_distance_meters: 0.0,
            odometer_total_distance_meters: 0.0,
            odometer_std_dev_meters: 0.0,
            rtcm_correction_accepted: false,
            expiry: Expiry::default(),
        }
    }
}

impl Solution {
    pub fn new() -> Self {
        Self::default()
    }
}
