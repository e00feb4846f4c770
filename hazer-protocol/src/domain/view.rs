use super::Expiry;

/// Maximum satellites tracked per signal/system, matching the practical
/// ceiling GSV fragments are chunked against.
pub const MAX_SATELLITES: usize = 64;

/// One satellite's visibility as reported by GSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Satellite {
    pub id: u16,
    pub elevation_degrees: i16,
    pub azimuth_degrees: u16,
    pub snr_dbhz: Option<u8>,
    pub phantom: bool,
    pub untracked: bool,
    pub unused: bool,
}

/// One signal's worth of satellite visibility for a system, assembled from
/// a run of numbered GSV fragments.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct View {
    pub channels: u8,
    pub visible: u8,
    pub satellites: Vec<Satellite>,
    /// How many more fragments this signal's GSV sequence still expects.
    pub pending: u8,
    pub expiry: Expiry,
}

impl Default for View {
    fn default() -> Self {
        Self {
            channels: 0,
            visible: 0,
            satellites: Vec::with_capacity(MAX_SATELLITES),
            pending: 0,
            expiry: Expiry::default(),
        }
    }
}

impl View {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begins (or continues) a GSV fragment sequence. `total_fragments`
    /// comes from the sentence's own field; `fragment_index` is 1-based.
    pub fn begin_fragment(&mut self, fragment_index: u8, total_fragments: u8) {
        if fragment_index == 1 {
            self.satellites.clear();
        }
        self.pending = total_fragments.saturating_sub(fragment_index);
    }
}
