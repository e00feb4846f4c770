use super::Expiry;

/// Roll/pitch/heading, as reported by UBX NAV-ATT or derived from a WT901
/// data frame. Angles are signed nanodegrees; accuracies share the same
/// unit.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attitude {
    pub roll_nanodegrees: i64,
    pub pitch_nanodegrees: i64,
    pub heading_nanodegrees: i64,
    pub roll_accuracy_nanodegrees: u64,
    pub pitch_accuracy_nanodegrees: u64,
    pub heading_accuracy_nanodegrees: u64,
    pub expiry: Expiry,
}
