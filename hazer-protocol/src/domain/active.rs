use super::{Expiry, FixMode};

pub const MAX_ACTIVE_SATELLITES: usize = 64;

/// The satellites currently contributing to a fix, plus the resulting
/// dilution-of-precision figures (GSA). DOP values are in centi-units;
/// 9999 means undefined, matching the wire convention.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Active {
    pub mode: FixMode,
    pub satellites: Vec<u16>,
    pub pdop_centi: u16,
    pub hdop_centi: u16,
    pub vdop_centi: u16,
    pub tdop_centi: u16,
    pub expiry: Expiry,
}

pub const DOP_UNDEFINED: u16 = 9999;

impl Default for Active {
    fn default() -> Self {
        Self {
            mode: FixMode::Unknown,
            satellites: Vec::with_capacity(MAX_ACTIVE_SATELLITES),
            pdop_centi: DOP_UNDEFINED,
            hdop_centi: DOP_UNDEFINED,
            vdop_centi: DOP_UNDEFINED,
            tdop_centi: DOP_UNDEFINED,
            expiry: Expiry::default(),
        }
    }
}

impl Active {
    pub fn new() -> Self {
        Self::default()
    }
}
