use super::{Framer, Step};
use crate::checksum::nmea::{parse_ascii, NmeaChecksum};
use crate::constants::{NMEA_CHECKSUM, NMEA_MAX_LENGTH, NMEA_SYNC};
use crate::error::FramingError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    Payload,
    Msn,
    Lsn,
    Cr,
    Lf,
}

/// NMEA 0183 framer: `$` ... `*` MSN LSN CR LF.
pub struct NmeaFramer {
    state: State,
    buffer: Vec<u8>,
    checksum: NmeaChecksum,
    msn: u8,
}

impl Default for NmeaFramer {
    fn default() -> Self {
        Self::new()
    }
}

impl NmeaFramer {
    pub fn new() -> Self {
        Self {
            state: State::Start,
            buffer: Vec::with_capacity(NMEA_MAX_LENGTH),
            checksum: NmeaChecksum::new(),
            msn: 0,
        }
    }

    fn stop(&mut self, error: FramingError) -> Step {
        self.state = State::Start;
        Step::LostSync(error)
    }
}

impl Framer for NmeaFramer {
    const SYNC: u8 = NMEA_SYNC;

    fn feed(&mut self, byte: u8) -> Step {
        match self.state {
            State::Start => {
                if byte == NMEA_SYNC {
                    self.buffer.clear();
                    self.buffer.push(byte);
                    self.checksum = NmeaChecksum::new();
                    self.state = State::Payload;
                }
                Step::Pending
            },
            State::Payload => {
                if self.buffer.len() >= NMEA_MAX_LENGTH {
                    return self.stop(FramingError::BufferExhausted { needed: 1 });
                }
                if byte == NMEA_CHECKSUM {
                    self.buffer.push(byte);
                    self.state = State::Msn;
                } else {
                    self.checksum.update(byte);
                    self.buffer.push(byte);
                }
                Step::Pending
            },
            State::Msn => {
                self.msn = byte;
                self.buffer.push(byte);
                self.state = State::Lsn;
                Step::Pending
            },
            State::Lsn => {
                self.buffer.push(byte);
                let (expected_msn, expected_lsn) = self.checksum.finalize();
                let expected = parse_ascii(expected_msn, expected_lsn);
                let got = parse_ascii(self.msn, byte);
                if got.is_some() && got == expected {
                    self.state = State::Cr;
                    Step::Pending
                } else {
                    self.stop(FramingError::UnexpectedByte { state: "LSN", byte })
                }
            },
            State::Cr => {
                if byte == b'\r' {
                    self.buffer.push(byte);
                    self.state = State::Lf;
                    Step::Pending
                } else {
                    self.stop(FramingError::UnexpectedByte { state: "CR", byte })
                }
            },
            State::Lf => {
                if byte == b'\n' {
                    self.buffer.push(byte);
                    let len = self.buffer.len();
                    self.state = State::Start;
                    Step::Complete { len }
                } else {
                    self.stop(FramingError::UnexpectedByte { state: "LF", byte })
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

    fn feed_all(framer: &mut NmeaFramer, bytes: &[u8]) -> Step {
        let mut last = Step::Pending;
        for &b in bytes {
            last = framer.feed(b);
        }
        last
    }

    #[test]
    fn accepts_valid_gga_sentence() {
        let sentence = b"$GNGGA,135627.00,3947.65338,N,10509.20216,W,2,12,0.67,1708.6,M,-21.5,M,,0000*4E\r\n";
        let mut framer = NmeaFramer::new();
        let step = feed_all(&mut framer, sentence);
        assert_eq!(step, Step::Complete { len: sentence.len() });
        assert_eq!(framer.buffer(), sentence);
    }

    #[test]
    fn rejects_bad_checksum() {
        let mut sentence = b"$GNGGA,1*00\r\n".to_vec();
        sentence[9] = b'9';
        sentence[10] = b'9';
        let mut framer = NmeaFramer::new();
        let step = feed_all(&mut framer, &sentence);
        assert!(matches!(step, Step::LostSync(_)));
    }
}
