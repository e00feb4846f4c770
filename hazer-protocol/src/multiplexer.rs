//! Multiplexer (C3): races the four NMEA/UBX/RTCM/CPO framers on one input
//! stream, switching into single-machine mode as soon as one of them leaves
//! its START state, and resynchronizing whenever that machine stops short
//! of END.

use crate::framer::{CpoFramer, Framer, NmeaFramer, RtcmFramer, Step, UbxFramer};

/// Which protocol a completed frame or a lost-sync episode belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Nmea,
    Ubx,
    Rtcm,
    Cpo,
}

/// What the multiplexer did with one input byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Still scanning, or mid-frame; nothing to report yet.
    None,
    /// A frame completed; read it from `Multiplexer::frame()`.
    FrameReady(Protocol),
    /// The committed machine stopped short of END; all four framers have
    /// been reset and scanning resumes at the next byte.
    LostSync,
}

/// Counts consecutive bytes that have not produced a frame, so garbage
/// input is bounded rather than accumulated forever.
struct ResyncCounter {
    consecutive: usize,
    threshold: usize,
}

impl ResyncCounter {
    fn new(threshold: usize) -> Self {
        Self { consecutive: 0, threshold }
    }

    fn note_progress(&mut self) {
        self.consecutive = 0;
    }

    /// Returns the discarded count when the threshold is crossed.
    fn note_discard(&mut self) -> Option<usize> {
        self.consecutive += 1;
        if self.consecutive >= self.threshold {
            let discarded = self.consecutive;
            self.consecutive = 0;
            Some(discarded)
        } else {
            None
        }
    }
}

pub struct Multiplexer {
    nmea: NmeaFramer,
    ubx: UbxFramer,
    rtcm: RtcmFramer,
    cpo: CpoFramer,
    committed: Option<Protocol>,
    resync: ResyncCounter,
    lost_sync_bytes: u64,
}

impl Multiplexer {
    /// `resync_threshold` bounds how many consecutive non-framing bytes are
    /// tolerated before they are reported to the diagnostic sink and
    /// dropped (spec's buffer-length-sized garbage bound).
    pub fn new(resync_threshold: usize) -> Self {
        Self {
            nmea: NmeaFramer::new(),
            ubx: UbxFramer::new(),
            rtcm: RtcmFramer::new(),
            cpo: CpoFramer::new(),
            committed: None,
            resync: ResyncCounter::new(resync_threshold),
            lost_sync_bytes: 0,
        }
    }

    fn reset_all(&mut self) {
        self.nmea.reset();
        self.ubx.reset();
        self.rtcm.reset();
        self.cpo.reset();
        self.committed = None;
    }

    /// Total bytes ever discarded to the diagnostic sink via `LostSync` or
    /// resync-threshold overflow. Exposed for the log sink / metrics.
    pub fn lost_sync_bytes(&self) -> u64 {
        self.lost_sync_bytes
    }

    /// Feeds one byte. While scanning (no machine committed), the byte is
    /// offered to all four; at most one of their disjoint sync bytes can
    /// match, so at most one leaves START.
    pub fn feed(&mut self, byte: u8) -> Event {
        if let Some(protocol) = self.committed {
            return self.feed_committed(protocol, byte);
        }

        let steps = [
            (Protocol::Nmea, self.nmea.feed(byte)),
            (Protocol::Ubx, self.ubx.feed(byte)),
            (Protocol::Rtcm, self.rtcm.feed(byte)),
            (Protocol::Cpo, self.cpo.feed(byte)),
        ];

        for (protocol, step) in steps {
            if matches!(step, Step::Complete { .. }) {
                // Only possible for protocols whose whole frame is a
                // single byte, which none of ours are; defensive only.
                self.committed = None;
                self.resync.note_progress();
                return Event::FrameReady(protocol);
            }
        }

        let framing_now = self.nmea.is_framing() as u8
            + self.ubx.is_framing() as u8
            + self.rtcm.is_framing() as u8
            + self.cpo.is_framing() as u8;

        if framing_now == 1 {
            self.committed = Some(if self.nmea.is_framing() {
                Protocol::Nmea
            } else if self.ubx.is_framing() {
                Protocol::Ubx
            } else if self.rtcm.is_framing() {
                Protocol::Rtcm
            } else {
                Protocol::Cpo
            });
            self.resync.note_progress();
            Event::None
        } else {
            match self.resync.note_discard() {
                Some(discarded) => {
                    self.lost_sync_bytes += discarded as u64;
                    Event::LostSync
                },
                None => Event::None,
            }
        }
    }

    fn feed_committed(&mut self, protocol: Protocol, byte: u8) -> Event {
        let step = match protocol {
            Protocol::Nmea => self.nmea.feed(byte),
            Protocol::Ubx => self.ubx.feed(byte),
            Protocol::Rtcm => self.rtcm.feed(byte),
            Protocol::Cpo => self.cpo.feed(byte),
        };
        match step {
            Step::Pending => Event::None,
            Step::Complete { .. } => {
                self.committed = None;
                self.resync.note_progress();
                Event::FrameReady(protocol)
            },
            Step::LostSync(_) => {
                self.reset_all();
                self.lost_sync_bytes += 1;
                Event::LostSync
            },
        }
    }

    /// The buffer for the most recently completed frame, valid until the
    /// next `feed` call that starts a new frame.
    pub fn frame(&self, protocol: Protocol) -> &[u8] {
        match protocol {
            Protocol::Nmea => self.nmea.buffer(),
            Protocol::Ubx => self.ubx.buffer(),
            Protocol::Rtcm => self.rtcm.buffer(),
            Protocol::Cpo => self.cpo.buffer(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_a_single_nmea_sentence() {
        let sentence = b"$GNGGA,135627.00,3947.65338,N,10509.20216,W,2,12,0.67,1708.6,M,-21.5,M,,0000*4E\r\n";
        let mut mux = Multiplexer::new(256);
        let mut ready = None;
        for &b in sentence {
            if let Event::FrameReady(p) = mux.feed(b) {
                ready = Some(p);
            }
        }
        assert_eq!(ready, Some(Protocol::Nmea));
        assert_eq!(mux.frame(Protocol::Nmea), sentence);
    }

    #[test]
    fn only_one_machine_leaves_start_per_sync_byte() {
        let mut mux = Multiplexer::new(256);
        assert_eq!(mux.feed(b'$'), Event::None);
        assert!(mux.nmea.is_framing());
        assert!(!mux.ubx.is_framing());
        assert!(!mux.rtcm.is_framing());
        assert!(!mux.cpo.is_framing());
    }

    #[test]
    fn resyncs_after_garbage_run() {
        let mut mux = Multiplexer::new(4);
        let mut saw_lost_sync = false;
        for _ in 0..8 {
            if mux.feed(0xFF) == Event::LostSync {
                saw_lost_sync = true;
            }
        }
        assert!(saw_lost_sync);
    }
}
