use super::{Framer, Step};
use crate::checksum::ubx::UbxChecksum;
use crate::constants::{UBX_MAX_LENGTH, UBX_SYNC_1, UBX_SYNC_2};
use crate::error::FramingError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    Sync2,
    Class,
    Id,
    Length1,
    Length2,
    Payload,
    CkA,
    CkB,
}

/// UBX framer: `0xB5 0x62` class id lenL lenH payload ckA ckB.
pub struct UbxFramer {
    state: State,
    buffer: Vec<u8>,
    checksum: UbxChecksum,
    length: usize,
    remaining: usize,
    ck_a: u8,
}

impl Default for UbxFramer {
    fn default() -> Self {
        Self::new()
    }
}

impl UbxFramer {
    pub fn new() -> Self {
        Self {
            state: State::Start,
            buffer: Vec::with_capacity(64),
            checksum: UbxChecksum::new(),
            length: 0,
            remaining: 0,
            ck_a: 0,
        }
    }

    fn stop(&mut self, error: FramingError) -> Step {
        self.state = State::Start;
        Step::LostSync(error)
    }
}

impl Framer for UbxFramer {
    const SYNC: u8 = UBX_SYNC_1;

    fn feed(&mut self, byte: u8) -> Step {
        match self.state {
            State::Start => {
                if byte == UBX_SYNC_1 {
                    self.buffer.clear();
                    self.buffer.push(byte);
                    self.checksum = UbxChecksum::new();
                    self.state = State::Sync2;
                }
                Step::Pending
            },
            State::Sync2 => {
                if byte == UBX_SYNC_2 {
                    self.buffer.push(byte);
                    self.state = State::Class;
                    Step::Pending
                } else {
                    self.stop(FramingError::UnexpectedByte { state: "SYNC_2", byte })
                }
            },
            State::Class => {
                self.buffer.push(byte);
                self.checksum.update(byte);
                self.state = State::Id;
                Step::Pending
            },
            State::Id => {
                self.buffer.push(byte);
                self.checksum.update(byte);
                self.state = State::Length1;
                Step::Pending
            },
            State::Length1 => {
                self.buffer.push(byte);
                self.checksum.update(byte);
                self.length = byte as usize;
                self.state = State::Length2;
                Step::Pending
            },
            State::Length2 => {
                self.buffer.push(byte);
                self.checksum.update(byte);
                self.length |= (byte as usize) << 8;
                self.remaining = self.length;
                self.state = if self.remaining == 0 { State::CkA } else { State::Payload };
                Step::Pending
            },
            State::Payload => {
                if self.buffer.len() >= UBX_MAX_LENGTH {
                    return self.stop(FramingError::BufferExhausted { needed: self.remaining });
                }
                self.buffer.push(byte);
                self.checksum.update(byte);
                self.remaining -= 1;
                if self.remaining == 0 {
                    self.state = State::CkA;
                }
                Step::Pending
            },
            State::CkA => {
                self.buffer.push(byte);
                self.ck_a = byte;
                self.state = State::CkB;
                Step::Pending
            },
            State::CkB => {
                self.buffer.push(byte);
                let (expected_a, expected_b) = self.checksum.result();
                if self.ck_a == expected_a && byte == expected_b {
                    let len = self.buffer.len();
                    self.state = State::Start;
                    Step::Complete { len }
                } else {
                    self.stop(FramingError::UnexpectedByte { state: "CK_B", byte })
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

    #[test]
    fn accepts_zero_length_payload() {
        // MON-VER class=0x0A id=0x04 checksum computed in checksum::ubx tests.
        let frame = [0xB5u8, 0x62, 0x0A, 0x04, 0x00, 0x00, 0x0E, 0x34];
        let mut framer = UbxFramer::new();
        let mut last = Step::Pending;
        for b in frame {
            last = framer.feed(b);
        }
        assert_eq!(last, Step::Complete { len: 8 });
    }
}
