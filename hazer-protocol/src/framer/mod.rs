//! Framers (C2): one deterministic finite automaton per wire protocol, each
//! driven one input byte at a time and each owning its own growable frame
//! buffer (design notes: re-expressing the original's moving write pointer
//! over a caller buffer as an owned container plus a typed offset).

pub mod cpo;
pub mod nmea;
pub mod rtcm;
pub mod ubx;
pub mod wt901;

pub use cpo::CpoFramer;
pub use nmea::NmeaFramer;
pub use rtcm::RtcmFramer;
pub use ubx::UbxFramer;
pub use wt901::Wt901Framer;

use crate::error::FramingError;

/// What happened to one input byte fed to a framer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The machine is still scanning for sync, or mid-frame waiting on more
    /// bytes. The byte may or may not have been the machine's sync byte;
    /// see `Step::accepted` via the caller's state inspection if it matters.
    Pending,
    /// The frame is complete; the buffer holds `len` logical bytes (NUL
    /// advisory terminator, if any, not counted).
    Complete { len: usize },
    /// The machine left START and later hit an integrity failure, an
    /// unexpected byte, or ran out of buffer space; it has reset to START
    /// and this byte was its last consumed.
    LostSync(FramingError),
}

/// Common shape every protocol framer exposes, so the multiplexer (C3) can
/// hold all four behind one trait object-free generic dispatch.
pub trait Framer {
    /// The wire sync byte this machine expects in its START state.
    const SYNC: u8;

    /// Feeds one byte. Returns the outcome of that single transition.
    fn feed(&mut self, byte: u8) -> Step;

    /// True once the machine has left its START state (i.e. it has
    /// committed to framing the current byte sequence).
    fn is_framing(&self) -> bool;

    /// The bytes accumulated so far (valid regardless of whether framing
    /// is complete).
    fn buffer(&self) -> &[u8];

    /// Resets to START, discarding any partial frame.
    fn reset(&mut self);
}
