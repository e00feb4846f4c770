use core::fmt;

/// A framer could not assemble a frame: an unexpected byte arrived in an
/// intermediate state, or the caller-supplied buffer was exhausted mid-frame.
///
/// Per spec, framing errors never escape the multiplexer as a public error —
/// they trigger a resync and are only observable through logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramingError {
    UnexpectedByte { state: &'static str, byte: u8 },
    BufferExhausted { needed: usize },
}

impl fmt::Display for FramingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FramingError::UnexpectedByte { state, byte } => {
                write!(f, "unexpected byte 0x{byte:02x} in state {state}")
            },
            FramingError::BufferExhausted { needed } => {
                write!(f, "frame buffer exhausted, needed {needed} more bytes")
            },
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FramingError {}

/// A checksum or CRC recomputed over a completed frame did not match the
/// trailing field the wire format carries it in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrityError {
    Nmea { expected: u8, got: u8 },
    Ubx { expected: (u8, u8), got: (u8, u8) },
    Rtcm { expected: u32, got: u32 },
    Cpo { expected: u8, got: u8 },
}

impl fmt::Display for IntegrityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityError::Nmea { expected, got } => {
                write!(f, "NMEA checksum mismatch, expected 0x{expected:02X}, got 0x{got:02X}")
            },
            IntegrityError::Ubx { expected, got } => write!(
                f,
                "UBX Fletcher-16 mismatch, expected {expected:?}, got {got:?}"
            ),
            IntegrityError::Rtcm { expected, got } => write!(
                f,
                "RTCM CRC-24Q mismatch, expected 0x{expected:06X}, got 0x{got:06X}"
            ),
            IntegrityError::Cpo { expected, got } => {
                write!(f, "CPO checksum mismatch, expected 0x{expected:02X}, got 0x{got:02X}")
            },
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for IntegrityError {}

/// A frame's self-declared length was inconsistent with the bytes actually
/// available in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthError {
    pub declared: usize,
    pub available: usize,
}

impl fmt::Display for LengthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "declared length {} exceeds available {} bytes",
            self.declared, self.available
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LengthError {}

/// The frame was structurally valid (integrity check passed, length
/// consistent) but semantically rejected by a sentence or message parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentError {
    UnrecognizedSentence,
    InvalidStatus { status: char, mode: char },
    InvalidField { field: &'static str },
    InvalidPacketLen { expect: usize, got: usize },
    IncompleteFragment,
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentError::UnrecognizedSentence => f.write_str("unrecognized sentence name"),
            ContentError::InvalidStatus { status, mode } => {
                write!(f, "invalid status '{status}' with mode '{mode}'")
            },
            ContentError::InvalidField { field } => write!(f, "invalid field {field}"),
            ContentError::InvalidPacketLen { expect, got } => {
                write!(f, "invalid packet length, expected {expect}, got {got}")
            },
            ContentError::IncompleteFragment => f.write_str("multi-fragment sentence incomplete"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ContentError {}

/// A received datagram's sequence number was not the next one expected from
/// its peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceError {
    pub expected: u32,
    pub got: u32,
}

impl fmt::Display for SequenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "datagram out of order, expected {}, got {}",
            self.expected, self.got
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SequenceError {}

/// An RTK client tried to change classification mid-session, or a second
/// base tried to register while one is already active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationError {
    Conflict,
    SecondBase,
}

impl fmt::Display for ClassificationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassificationError::Conflict => f.write_str("client changed classification"),
            ClassificationError::SecondBase => f.write_str("second base rejected"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ClassificationError {}
