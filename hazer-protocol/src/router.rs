//! RTK router (C8): an ordered set of clients keyed by (address, port),
//! classifying each as base or rover from the RTCM frames it sends and
//! forwarding a base's corrections to every rover, with liveness-based
//! membership. Re-expresses the original's intrusive address-ordered tree
//! of clients as a `BTreeMap` (design notes: ordered container of owned
//! records, not a hand-rolled tree).

use std::collections::BTreeMap;
use std::net::Ipv6Addr;

use log::{debug, info, warn};

use crate::constants::RTCM_MIN_LENGTH;
use crate::datagram::{self, Outcome, Sequencer};
use crate::error::ClassificationError;

/// A client never proves its classification through anything but the RTCM
/// frames it sends: a bare keepalive (no payload) looks like a rover
/// checking in, anything longer carries an actual correction and looks
/// like a base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Unclassified,
    Base,
    Rover,
}

/// A node in the router's client set.
pub struct Client {
    pub last_seen_tick: u64,
    pub classification: Classification,
    sequencer: Sequencer,
}

impl Client {
    fn new(now: u64) -> Self {
        Self {
            last_seen_tick: now,
            classification: Classification::Unclassified,
            sequencer: Sequencer::new(),
        }
    }
}

/// Result of routing one received datagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Keepalive from a rover; nothing to forward.
    RoverKeepalive,
    /// Correction from the base; forwarded to `forwarded_to` rovers.
    Forwarded { forwarded_to: usize },
    /// Rejected: out-of-order sequence, a classification conflict, or a
    /// second base while one is already present.
    Rejected(RejectReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    Sequence,
    Classification(ClassificationError),
}

/// Key a client is stored under: an IPv6 address (IPv4 peers mapped into
/// IPv6 form by the caller) plus UDP port.
pub type ClientKey = (Ipv6Addr, u16);

pub struct Router {
    clients: BTreeMap<ClientKey, Client>,
    base: Option<ClientKey>,
    timeout_ticks: u64,
}

impl Router {
    pub fn new(timeout_ticks: u64) -> Self {
        Self { clients: BTreeMap::new(), base: None, timeout_ticks }
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    pub fn is_base(&self, key: &ClientKey) -> bool {
        self.base.as_ref() == Some(key)
    }

    /// Runs one received datagram through validate → classify →
    /// reject-or-commit → forward. `rtcm_payload` is the frame *after* the
    /// sequence header has been stripped (see `datagram::parse_header`).
    pub fn ingest(&mut self, key: ClientKey, sequence: u32, rtcm_payload_len: usize, now: u64) -> Disposition {
        let mut candidate = Client::new(now);
        if let Some(existing) = self.clients.get(&key) {
            candidate.sequencer = existing.sequencer;
            candidate.classification = existing.classification;
        }

        match candidate.sequencer.accept(sequence) {
            Outcome::OutOfOrder(_) => {
                debug!("datagram out of order from {key:?}");
                return Disposition::Rejected(RejectReason::Sequence);
            },
            Outcome::Missing { missing } => {
                warn!("{missing} datagram(s) missing from {key:?}");
            },
            Outcome::InOrder => {},
        }

        let incoming_classification = if rtcm_payload_len >= RTCM_MIN_LENGTH + 1 {
            Classification::Base
        } else {
            Classification::Rover
        };

        if candidate.classification != Classification::Unclassified
            && candidate.classification != incoming_classification
        {
            warn!("client {key:?} changed classification; rejecting until timeout");
            return Disposition::Rejected(RejectReason::Classification(ClassificationError::Conflict));
        }

        if incoming_classification == Classification::Base {
            if let Some(current_base) = self.base {
                if current_base != key {
                    warn!("second base {key:?} rejected; {current_base:?} is already base");
                    return Disposition::Rejected(RejectReason::Classification(ClassificationError::SecondBase));
                }
            }
        }

        candidate.classification = incoming_classification;
        candidate.last_seen_tick = now;
        self.clients.insert(key, candidate);

        match incoming_classification {
            Classification::Base => {
                self.base = Some(key);
                let forwarded_to = self
                    .clients
                    .iter()
                    .filter(|(k, c)| **k != key && c.classification == Classification::Rover)
                    .count();
                info!("forwarding base correction from {key:?} to {forwarded_to} rover(s)");
                Disposition::Forwarded { forwarded_to }
            },
            Classification::Rover => Disposition::RoverKeepalive,
            Classification::Unclassified => unreachable!("classification always set above"),
        }
    }

    /// The keys of every client currently classified as a rover, for the
    /// caller to forward the base's verbatim datagram to.
    pub fn rovers(&self) -> impl Iterator<Item = &ClientKey> {
        self.clients
            .iter()
            .filter(|(_, c)| c.classification == Classification::Rover)
            .map(|(k, _)| k)
    }

    /// Removes clients whose last-seen age exceeds the configured timeout.
    /// Removing the incumbent base clears the base slot, allowing a future
    /// correction to promote a new one. Intended to run once per elapsed
    /// whole tick, not on every `ingest`.
    pub fn sweep(&mut self, now: u64) {
        let timeout_ticks = self.timeout_ticks;
        let expired: Vec<ClientKey> = self
            .clients
            .iter()
            .filter(|(_, c)| now.saturating_sub(c.last_seen_tick) > timeout_ticks)
            .map(|(k, _)| *k)
            .collect();
        for key in expired {
            info!("client {key:?} timed out");
            self.clients.remove(&key);
            if self.base == Some(key) {
                self.base = None;
            }
        }
    }
}

/// Stamps `payload` (an already-framed RTCM buffer) with the next outgoing
/// sequence number for `expected`, for re-sending to a rover.
pub fn stamp_for_forward(expected: &mut u32, payload: &[u8]) -> Vec<u8> {
    datagram::stamp(expected, payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(port: u16) -> ClientKey {
        (Ipv6Addr::LOCALHOST, port)
    }

    #[test]
    fn first_correction_establishes_the_base() {
        let mut router = Router::new(5);
        let disposition = router.ingest(key(1), 0, RTCM_MIN_LENGTH + 10, 0);
        assert_eq!(disposition, Disposition::Forwarded { forwarded_to: 0 });
        assert!(router.is_base(&key(1)));
    }

    #[test]
    fn second_base_is_rejected() {
        let mut router = Router::new(5);
        router.ingest(key(1), 0, RTCM_MIN_LENGTH + 10, 0);
        let disposition = router.ingest(key(2), 0, RTCM_MIN_LENGTH + 10, 0);
        assert_eq!(
            disposition,
            Disposition::Rejected(RejectReason::Classification(ClassificationError::SecondBase))
        );
    }

    #[test]
    fn keepalive_then_correction_from_same_client_is_rejected() {
        let mut router = Router::new(5);
        assert_eq!(router.ingest(key(1), 0, RTCM_MIN_LENGTH, 0), Disposition::RoverKeepalive);
        let disposition = router.ingest(key(1), 1, RTCM_MIN_LENGTH + 10, 1);
        assert_eq!(
            disposition,
            Disposition::Rejected(RejectReason::Classification(ClassificationError::Conflict))
        );
    }

    #[test]
    fn sweep_clears_base_slot_after_timeout() {
        let mut router = Router::new(5);
        router.ingest(key(1), 0, RTCM_MIN_LENGTH + 10, 0);
        router.sweep(100);
        assert_eq!(router.client_count(), 0);
        assert!(!router.is_base(&key(1)));
    }
}
