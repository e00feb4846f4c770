use super::{Framer, Step};
use crate::checksum::cpo::CpoChecksum;
use crate::constants::{CPO_DLE, CPO_ETX, CPO_MAX_LENGTH};
use crate::error::FramingError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    Id,
    Size,
    SizeDle,
    Payload,
    PayloadDle,
    Cs,
    CsDle,
    Dle,
    Etx,
}

/// Garmin CPO framer: `DLE id size[,DLE-escaped] payload[,DLE-escaped]
/// checksum[,DLE-escaped] DLE ETX`. DLE bytes inside size/payload/checksum
/// are doubled on the wire; this machine de-escapes them inline, so the
/// buffer holds logical bytes except for the framing sentinels themselves
/// (leading DLE, trailing DLE, ETX), which are preserved verbatim.
pub struct CpoFramer {
    state: State,
    buffer: Vec<u8>,
    checksum: CpoChecksum,
    remaining: usize,
}

impl Default for CpoFramer {
    fn default() -> Self {
        Self::new()
    }
}

impl CpoFramer {
    pub fn new() -> Self {
        Self {
            state: State::Start,
            buffer: Vec::with_capacity(64),
            checksum: CpoChecksum::new(),
            remaining: 0,
        }
    }

    fn stop(&mut self, error: FramingError) -> Step {
        self.state = State::Start;
        Step::LostSync(error)
    }

    fn save_payload_byte(&mut self, byte: u8) -> Step {
        self.checksum.update(byte);
        self.buffer.push(byte);
        if self.remaining > 1 {
            self.remaining -= 1;
        } else {
            self.state = State::Cs;
        }
        Step::Pending
    }
}

impl Framer for CpoFramer {
    const SYNC: u8 = CPO_DLE;

    fn feed(&mut self, byte: u8) -> Step {
        match self.state {
            State::Start => {
                if byte == CPO_DLE {
                    self.buffer.clear();
                    self.buffer.push(byte);
                    self.checksum = CpoChecksum::new();
                    self.state = State::Id;
                }
                Step::Pending
            },
            State::Id => {
                self.checksum.update(byte);
                self.buffer.push(byte);
                self.state = State::Size;
                Step::Pending
            },
            State::Size => {
                if byte == CPO_DLE {
                    self.state = State::SizeDle;
                    Step::Pending
                } else {
                    self.checksum.update(byte);
                    self.buffer.push(byte);
                    self.remaining = byte as usize;
                    self.state = State::Payload;
                    Step::Pending
                }
            },
            State::SizeDle => {
                self.checksum.update(byte);
                self.buffer.push(byte);
                self.remaining = byte as usize;
                self.state = State::Payload;
                Step::Pending
            },
            State::Payload => {
                if self.buffer.len() >= CPO_MAX_LENGTH {
                    return self.stop(FramingError::BufferExhausted { needed: self.remaining });
                }
                if byte == CPO_DLE {
                    self.state = State::PayloadDle;
                    Step::Pending
                } else {
                    self.save_payload_byte(byte)
                }
            },
            State::PayloadDle => self.save_payload_byte(byte),
            State::Cs => {
                if byte == CPO_DLE {
                    self.state = State::CsDle;
                    Step::Pending
                } else if byte == self.checksum.result() {
                    self.buffer.push(byte);
                    self.state = State::Dle;
                    Step::Pending
                } else {
                    self.stop(FramingError::UnexpectedByte { state: "CS", byte })
                }
            },
            State::CsDle => {
                if byte == self.checksum.result() {
                    self.buffer.push(byte);
                    self.state = State::Dle;
                    Step::Pending
                } else {
                    self.stop(FramingError::UnexpectedByte { state: "CS_DLE", byte })
                }
            },
            State::Dle => {
                if byte == CPO_DLE {
                    self.buffer.push(byte);
                    self.state = State::Etx;
                    Step::Pending
                } else {
                    self.stop(FramingError::UnexpectedByte { state: "DLE", byte })
                }
            },
            State::Etx => {
                if byte == CPO_ETX {
                    self.buffer.push(byte);
                    let len = self.buffer.len();
                    self.state = State::Start;
                    Step::Complete { len }
                } else {
                    self.stop(FramingError::UnexpectedByte { state: "ETX", byte })
                }
            },
        }
    }

    fn is_framing(&self) -> bool {
        self.state != State::Start
    }

    fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    fn reset(&mut self) {
        self.state = State::Start;
        self.buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_frame(id: u8, payload: &[u8]) -> Vec<u8> {
        let mut checksum = CpoChecksum::new();
        checksum.update(id);
        checksum.update(payload.len() as u8);
        for &b in payload {
            checksum.update(b);
        }
        let cs = checksum.result();

        let mut wire = Vec::new();
        wire.push(CPO_DLE);
        wire.push(id);
        let mut escape_and_push = |wire: &mut Vec<u8>, byte: u8| {
            if byte == CPO_DLE {
                wire.push(CPO_DLE);
            }
            wire.push(byte);
        };
        escape_and_push(&mut wire, payload.len() as u8);
        for &b in payload {
            escape_and_push(&mut wire, b);
        }
        escape_and_push(&mut wire, cs);
        wire.push(CPO_DLE);
        wire.push(CPO_ETX);
        wire
    }

    #[test]
    fn accepts_small_frame_without_escapes() {
        let frame = build_frame(0x33, &[1, 2, 3, 4]);
        let mut framer = CpoFramer::new();
        let mut last = Step::Pending;
        for &b in &frame {
            last = framer.feed(b);
        }
        assert_eq!(last, Step::Complete { len: frame.len() });
    }

    #[test]
    fn escapes_a_dle_valued_payload_byte() {
        let frame = build_frame(0x33, &[CPO_DLE, 0x02]);
        let mut framer = CpoFramer::new();
        let mut last = Step::Pending;
        for &b in &frame {
            last = framer.feed(b);
        }
        assert_eq!(last, Step::Complete { len: frame.len() });
    }
}
