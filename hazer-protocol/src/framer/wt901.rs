use super::{Framer, Step};
use crate::constants::{
    WT901_FLAG_DATA, WT901_FLAG_REGISTER, WT901_REGISTER_DATEHOUR, WT901_REGISTER_MAGNETICFIELD,
    WT901_REGISTER_MILLISECOND, WT901_REGISTER_MINUTESECOND, WT901_REGISTER_QUATERNION,
    WT901_REGISTER_TEMPERATURE, WT901_REGISTER_YEARMONTH, WT901_SYNC,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Heading,
    Flag,
    RegisterLow,
    RegisterHigh,
    DataLow,
    DataHigh,
}

fn is_known_register(byte: u8) -> bool {
    matches!(
        byte,
        WT901_REGISTER_YEARMONTH
            | WT901_REGISTER_DATEHOUR
            | WT901_REGISTER_MINUTESECOND
            | WT901_REGISTER_MILLISECOND
            | WT901_REGISTER_MAGNETICFIELD
            | WT901_REGISTER_TEMPERATURE
            | WT901_REGISTER_QUATERNION
    )
}

/// WT901/Dally framer. Unlike the other three protocols there is no
/// trailing checksum here: a frame is recognized purely by a lone `0x55`
/// header immediately followed by a valid flag byte, and any byte that
/// doesn't fit the expected sequence restarts the scan at `Heading` (a
/// `0x55` seen mid-sequence restarts at `Flag` instead, since it may be the
/// true header of the next frame).
pub struct Wt901Framer {
    state: State,
    buffer: Vec<u8>,
    remaining: usize,
}

impl Default for Wt901Framer {
    fn default() -> Self {
        Self::new()
    }
}

impl Wt901Framer {
    pub fn new() -> Self {
        Self {
            state: State::Heading,
            buffer: Vec::with_capacity(20),
            remaining: 0,
        }
    }

    fn resync_to_heading(&mut self) -> Step {
        self.state = State::Heading;
        self.buffer.clear();
        Step::Pending
    }

    fn resync_to_flag(&mut self, byte: u8) -> Step {
        self.buffer.clear();
        self.buffer.push(byte);
        self.state = State::Flag;
        Step::Pending
    }
}

impl Framer for Wt901Framer {
    const SYNC: u8 = WT901_SYNC;

    fn feed(&mut self, byte: u8) -> Step {
        match self.state {
            State::Heading => {
                if byte == WT901_SYNC {
                    self.buffer.clear();
                    self.buffer.push(byte);
                    self.state = State::Flag;
                }
                Step::Pending
            },
            State::Flag => match byte {
                WT901_FLAG_DATA => {
                    self.buffer.push(byte);
                    self.remaining = crate::constants::WT901_DATA_WORDS;
                    self.state = State::DataLow;
                    Step::Pending
                },
                WT901_FLAG_REGISTER => {
                    self.buffer.push(byte);
                    self.state = State::RegisterLow;
                    Step::Pending
                },
                WT901_SYNC => self.resync_to_flag(byte),
                _ => self.resync_to_heading(),
            },
            State::RegisterLow => {
                if is_known_register(byte) {
                    self.buffer.push(byte);
                    self.state = State::RegisterHigh;
                    Step::Pending
                } else if byte == WT901_SYNC {
                    self.resync_to_flag(byte)
                } else {
                    self.resync_to_heading()
                }
            },
            State::RegisterHigh => {
                if byte == 0x00 {
                    self.buffer.push(byte);
                    self.remaining = crate::constants::WT901_REGISTER_WORDS;
                    self.state = State::DataLow;
                    Step::Pending
                } else if byte == WT901_SYNC {
                    self.resync_to_flag(byte)
                } else {
                    self.resync_to_heading()
                }
            },
            State::DataLow => {
                self.buffer.push(byte);
                self.state = State::DataHigh;
                Step::Pending
            },
            State::DataHigh => {
                self.buffer.push(byte);
                self.remaining -= 1;
                if self.remaining > 0 {
                    self.state = State::DataLow;
                    Step::Pending
                } else {
                    let len = self.buffer.len();
                    self.state = State::Heading;
                    Step::Complete { len }
                }
            },
        }
    }

    fn is_framing(&self) -> bool {
        self.state != State::Heading
    }

    fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    fn reset(&mut self) {
        self.state = State::Heading;
        self.buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_data_frame() {
        let mut frame = vec![WT901_SYNC, WT901_FLAG_DATA];
        for i in 0..9u16 {
            frame.extend_from_slice(&i.to_le_bytes());
        }
        let mut framer = Wt901Framer::new();
        let mut last = Step::Pending;
        for &b in &frame {
            last = framer.feed(b);
        }
        assert_eq!(last, Step::Complete { len: frame.len() });
    }

    #[test]
    fn resyncs_on_garbage_flag_byte() {
        let mut framer = Wt901Framer::new();
        assert_eq!(framer.feed(WT901_SYNC), Step::Pending);
        assert_eq!(framer.feed(0x00), Step::Pending);
        assert!(!framer.is_framing());
    }

    #[test]
    fn accepts_full_register_frame() {
        let mut frame = vec![WT901_SYNC, WT901_FLAG_REGISTER, WT901_REGISTER_TEMPERATURE, 0x00];
        for i in 0..crate::constants::WT901_REGISTER_WORDS as u16 {
            frame.extend_from_slice(&i.to_le_bytes());
        }
        let mut framer = Wt901Framer::new();
        let mut last = Step::Pending;
        for &b in &frame {
            last = framer.feed(b);
        }
        assert_eq!(last, Step::Complete { len: frame.len() });
        assert_eq!(frame.len(), 20);
    }
}
