//! Domain model (C6): typed records the framers/parsers feed, each carrying
//! a countdown `Expiry` so consumers can tell a stale record from an absent
//! one without a separate "valid" flag.

pub mod active;
pub mod attitude;
pub mod fault;
pub mod position;
pub mod posveltim;
pub mod solution;
pub mod view;

pub use active::Active;
pub use attitude::Attitude;
pub use fault::Fault;
pub use position::Position;
pub use posveltim::PosVelTim;
pub use solution::{JammingState, Solution, SpoofingState};
pub use view::View;

use crate::constants::DEFAULT_EXPIRY_TICKS;

/// A monotonic countdown timer. `expiry == 0` means the record is stale and
/// consumers must treat it as absent, even though its fields are still
/// populated with the last values received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Expiry {
    ticks: u32,
    lifetime: u32,
}

impl Expiry {
    pub fn new(lifetime: u32) -> Self {
        Self { ticks: 0, lifetime }
    }

    /// Restores the timer to its configured lifetime; called whenever the
    /// owning record is refreshed by a new sentence/message.
    pub fn refresh(&mut self) {
        self.ticks = self.lifetime;
    }

    /// Decrements by the number of whole ticks elapsed since the last call,
    /// floored at zero.
    pub fn tick(&mut self, elapsed: u32) {
        self.ticks = self.ticks.saturating_sub(elapsed);
    }

    pub fn is_stale(&self) -> bool {
        self.ticks == 0
    }

    pub fn remaining(&self) -> u32 {
        self.ticks
    }
}

impl Default for Expiry {
    fn default() -> Self {
        Self::new(DEFAULT_EXPIRY_TICKS)
    }
}

/// NMEA fix quality, as carried in GGA's quality field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Quality {
    NoFix,
    Autonomous,
    Differential,
    RtkFixed,
    RtkFloat,
    Estimated,
    Manual,
    Simulator,
}

impl Quality {
    pub fn from_gga_code(code: u8) -> Option<Quality> {
        match code {
            0 => Some(Quality::NoFix),
            1 => Some(Quality::Autonomous),
            2 => Some(Quality::Differential),
            4 => Some(Quality::RtkFixed),
            5 => Some(Quality::RtkFloat),
            6 => Some(Quality::Estimated),
            7 => Some(Quality::Manual),
            8 => Some(Quality::Simulator),
            _ => None,
        }
    }
}

/// RMC/GLL/VTG safety classification, derived from status + mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Safety {
    Unknown,
    Safe,
    Caution,
    Unsafe,
    NotValid,
}

/// GSA fix mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FixMode {
    #[default]
    Unknown,
    NoFix,
    TwoD,
    ThreeD,
}
