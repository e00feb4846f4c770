//! Station: the aggregator that ties the multiplexer (C3) and parsers (C5)
//! to the domain model (C6). One `Station` plays the role of the spec's
//! "reader task" — it owns the multiplexer and every typed record, is fed
//! one byte at a time, and exposes the parsed records by system the way
//! the original's global per-system arrays did, without the globals.

use std::collections::BTreeMap;

use log::{info, warn};

use crate::constants::{CPO_PVT_ID, CPO_SDR_ID};
use crate::constellation::System;
use crate::domain::view::Satellite as ViewSatellite;
use crate::domain::{Active, Attitude, Fault, Position, PosVelTim, Quality, Solution, View};
use crate::error::ContentError;
use crate::multiplexer::{Event, Multiplexer, Protocol};
use crate::parse::{cpo, rtcm, ubx, wt901};
use crate::sentences::{self, pubx};
use crate::tokenize::{split_talker, tokenize};

/// What `Station::feed_byte` did with one input byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameEvent {
    /// Still scanning or mid-frame.
    None,
    /// A framer left sync without reaching END; all machines resynchronized.
    LostSync,
    /// A frame of `protocol` completed and its content was parsed into the
    /// domain model.
    Parsed(Protocol),
    /// A frame of `protocol` completed but its content was structurally
    /// valid yet semantically rejected; the record it would have updated
    /// was left untouched.
    Rejected { protocol: Protocol, error: ContentError },
}

/// UBX class/id pairs this station understands. Named the way the spec's
/// parser table names them, not by their numeric value, so dispatch reads
/// like the table in spec.md §4.5.
mod ubx_message {
    pub const NAV_STATUS: (u8, u8) = (0x01, 0x03);
    pub const NAV_ATT: (u8, u8) = (0x01, 0x05);
    pub const NAV_PVT: (u8, u8) = (0x01, 0x07);
    pub const NAV_ODO: (u8, u8) = (0x01, 0x09);
    pub const NAV_HPPOSLLH: (u8, u8) = (0x01, 0x14);
    pub const NAV_SVIN: (u8, u8) = (0x01, 0x3B);
    pub const RXM_RTCM: (u8, u8) = (0x02, 0x32);
    pub const ACK_NAK: (u8, u8) = (0x05, 0x00);
    pub const ACK_ACK: (u8, u8) = (0x05, 0x01);
    pub const CFG_VALGET: (u8, u8) = (0x06, 0x8B);
    pub const MON_VER: (u8, u8) = (0x0A, 0x04);
    pub const MON_HW: (u8, u8) = (0x0A, 0x09);
    pub const MON_COMMS: (u8, u8) = (0x0A, 0x36);
}

/// Ties together everything C3 through C6 do with a GNSS/IMU byte stream.
pub struct Station {
    mux: Multiplexer,
    positions: BTreeMap<System, Position>,
    actives: BTreeMap<System, Active>,
    views: BTreeMap<System, View>,
    fault: Fault,
    solution: Solution,
    posveltim: PosVelTim,
    attitude: Attitude,
    pubx_position: Position,
    /// Set by the most recently parsed RTCM frame. The message body itself
    /// is out of scope (no RTK math); only the type is surfaced.
    last_rtcm_message_type: Option<u16>,
}

impl Station {
    /// `resync_threshold` is passed straight through to the multiplexer.
    pub fn new(resync_threshold: usize) -> Self {
        Self {
            mux: Multiplexer::new(resync_threshold),
            positions: BTreeMap::new(),
            actives: BTreeMap::new(),
            views: BTreeMap::new(),
            fault: Fault::default(),
            solution: Solution::new(),
            posveltim: PosVelTim::new(),
            attitude: Attitude::default(),
            pubx_position: Position::new(System::Gps),
            last_rtcm_message_type: None,
        }
    }

    pub fn position(&self, system: System) -> Option<&Position> {
        self.positions.get(&system)
    }

    pub fn active(&self, system: System) -> Option<&Active> {
        self.actives.get(&system)
    }

    pub fn view(&self, system: System) -> Option<&View> {
        self.views.get(&system)
    }

    pub fn fault(&self) -> &Fault {
        &self.fault
    }

    pub fn solution(&self) -> &Solution {
        &self.solution
    }

    pub fn posveltim(&self) -> &PosVelTim {
        &self.posveltim
    }

    pub fn attitude(&self) -> &Attitude {
        &self.attitude
    }

    pub fn pubx_position(&self) -> &Position {
        &self.pubx_position
    }

    pub fn last_rtcm_message_type(&self) -> Option<u16> {
        self.last_rtcm_message_type
    }

    /// Decrements every record's expiry by `elapsed` whole ticks. Intended
    /// to run once per elapsed tick of the declared scheduler frequency,
    /// not once per `feed_byte` call.
    pub fn tick(&mut self, elapsed: u32) {
        for position in self.positions.values_mut() {
            position.expiry.tick(elapsed);
        }
        for active in self.actives.values_mut() {
            active.expiry.tick(elapsed);
        }
        for view in self.views.values_mut() {
            view.expiry.tick(elapsed);
        }
        self.fault.expiry.tick(elapsed);
        self.solution.expiry.tick(elapsed);
        self.posveltim.expiry.tick(elapsed);
        self.attitude.expiry.tick(elapsed);
        self.pubx_position.expiry.tick(elapsed);
    }

    /// Feeds one byte from the primary input stream through the
    /// multiplexer, and on a completed frame, through the matching parser.
    pub fn feed_byte(&mut self, byte: u8) -> FrameEvent {
        match self.mux.feed(byte) {
            Event::None => FrameEvent::None,
            Event::LostSync => FrameEvent::LostSync,
            Event::FrameReady(protocol) => {
                let frame = self.mux.frame(protocol).to_vec();
                let outcome = match protocol {
                    Protocol::Nmea => self.dispatch_nmea(&frame),
                    Protocol::Ubx => self.dispatch_ubx(&frame),
                    Protocol::Rtcm => self.dispatch_rtcm(&frame),
                    Protocol::Cpo => self.dispatch_cpo(&frame),
                };
                match outcome {
                    Ok(()) => FrameEvent::Parsed(protocol),
                    Err(error) => FrameEvent::Rejected { protocol, error },
                }
            },
        }
    }

    fn dispatch_nmea(&mut self, frame: &[u8]) -> Result<(), ContentError> {
        let tokens = tokenize(frame).ok_or(ContentError::InvalidField { field: "nmea/frame" })?;

        if tokens.name == "PUBX" {
            return self.dispatch_pubx(&tokens.fields);
        }

        let (talker, name) = split_talker(tokens.name).ok_or(ContentError::UnrecognizedSentence)?;
        if !sentences::KNOWN_SENTENCES.contains(&name) {
            info!("unrecognized NMEA sentence {name}");
            return Err(ContentError::UnrecognizedSentence);
        }
        let system = System::from_talker(talker).unwrap_or(System::Gnss);
        let fields = &tokens.fields;

        match name {
            "GGA" => {
                let position = self.positions.entry(system).or_insert_with(|| Position::new(system));
                sentences::gga(position, system, fields)
            },
            "RMC" => {
                let position = self.positions.entry(system).or_insert_with(|| Position::new(system));
                sentences::rmc(position, fields)
            },
            "GLL" => {
                let position = self.positions.entry(system).or_insert_with(|| Position::new(system));
                sentences::gll(position, fields)
            },
            "VTG" => {
                let position = self.positions.entry(system).or_insert_with(|| Position::new(system));
                sentences::vtg(position, fields)
            },
            "ZDA" => {
                let position = self.positions.entry(system).or_insert_with(|| Position::new(system));
                sentences::zda(position, fields)
            },
            "GSA" => {
                let active = self.actives.entry(system).or_default();
                let reported_system = sentences::gsa(active, fields)?;
                if let Some(reported) = reported_system {
                    if reported != system {
                        warn!("GSA system field {reported:?} disagrees with talker-derived {system:?}");
                    }
                }
                Ok(())
            },
            "GSV" => {
                let view = self.views.entry(system).or_default();
                sentences::gsv(view, fields)?;
                Ok(())
            },
            "GBS" => sentences::gbs(&mut self.fault, fields),
            "TXT" => {
                let text = sentences::txt(fields)?;
                info!("TXT: {text}");
                Ok(())
            },
            _ => unreachable!("filtered by KNOWN_SENTENCES above"),
        }
    }

    fn dispatch_pubx(&mut self, fields: &[&str]) -> Result<(), ContentError> {
        match fields.first().copied() {
            Some("00") => pubx::position(&mut self.pubx_position, &fields[1..]),
            Some("03") => {
                let entries = pubx::svstatus(&fields[1..])?;
                info!("PUBX,03: {} satellites reported", entries.len());
                Ok(())
            },
            Some("04") => pubx::time(&mut self.pubx_position, &fields[1..]),
            _ => Err(ContentError::UnrecognizedSentence),
        }
    }

    fn dispatch_ubx(&mut self, frame: &[u8]) -> Result<(), ContentError> {
        if frame.len() < 6 {
            return Err(ContentError::InvalidPacketLen { expect: 6, got: frame.len() });
        }
        let class = frame[2];
        let id = frame[3];
        let length = u16::from_le_bytes([frame[4], frame[5]]) as usize;
        let payload = frame
            .get(6..6 + length)
            .ok_or(ContentError::InvalidPacketLen { expect: 6 + length, got: frame.len() })?;

        match (class, id) {
            ubx_message::NAV_STATUS => {
                let status = ubx::nav_status(payload)?;
                self.posveltim.fix_type = status.fix_type;
                self.solution.time_to_first_fix_milliseconds = status.time_to_first_fix_milliseconds;
                self.solution.spoofing = status.spoofing;
                self.solution.expiry.refresh();
                Ok(())
            },
            ubx_message::NAV_SVIN => {
                let svin = ubx::nav_svin(payload)?;
                self.solution.survey_in_active = svin.active;
                self.solution.survey_in_valid = svin.valid;
                self.solution.survey_in_observations = svin.observations;
                self.solution.survey_in_mean_accuracy_tenths_mm = svin.mean_accuracy_tenths_mm;
                self.solution.expiry.refresh();
                Ok(())
            },
            ubx_message::NAV_HPPOSLLH => {
                let hp = ubx::nav_hpposllh(payload)?;
                self.posveltim.longitude_nanodegrees = hp.longitude_nanodegrees;
                self.posveltim.latitude_nanodegrees = hp.latitude_nanodegrees;
                self.posveltim.height_ellipsoid_millimeters = hp.height_ellipsoid_millimeters.round() as i32;
                self.posveltim.height_msl_millimeters = hp.height_msl_millimeters.round() as i32;
                self.posveltim.horizontal_accuracy_millimeters = hp.horizontal_accuracy_tenths_mm / 10;
                self.posveltim.vertical_accuracy_millimeters = hp.vertical_accuracy_tenths_mm / 10;
                self.posveltim.expiry.refresh();
                Ok(())
            },
            ubx_message::NAV_ATT => {
                let att = ubx::nav_att(payload)?;
                self.attitude.roll_nanodegrees = att.roll_nanodegrees;
                self.attitude.pitch_nanodegrees = att.pitch_nanodegrees;
                self.attitude.heading_nanodegrees = att.heading_nanodegrees;
                self.attitude.roll_accuracy_nanodegrees = att.roll_accuracy_nanodegrees;
                self.attitude.pitch_accuracy_nanodegrees = att.pitch_accuracy_nanodegrees;
                self.attitude.heading_accuracy_nanodegrees = att.heading_accuracy_nanodegrees;
                self.attitude.expiry.refresh();
                Ok(())
            },
            ubx_message::NAV_ODO => {
                let odo = ubx::nav_odo(payload)?;
                self.solution.odometer_distance_meters = odo.distance_meters as f64;
                self.solution.odometer_total_distance_meters = odo.total_distance_meters as f64;
                self.solution.odometer_std_dev_meters = odo.distance_std_dev_meters as f64;
                self.solution.expiry.refresh();
                Ok(())
            },
            ubx_message::NAV_PVT => {
                let pvt = ubx::nav_pvt(payload)?;
                self.posveltim.itow_milliseconds = pvt.itow_milliseconds;
                self.posveltim.year = pvt.year;
                self.posveltim.month = pvt.month;
                self.posveltim.day = pvt.day;
                self.posveltim.hour = pvt.hour;
                self.posveltim.minute = pvt.minute;
                self.posveltim.second = pvt.second;
                self.posveltim.valid_date = pvt.valid_date;
                self.posveltim.valid_time = pvt.valid_time;
                self.posveltim.fully_resolved = pvt.fully_resolved;
                self.posveltim.time_accuracy_nanoseconds = pvt.time_accuracy_nanoseconds;
                self.posveltim.fix_type = pvt.fix_type;
                self.posveltim.gnss_fix_ok = pvt.flags.contains(ubx::PvtFlags::GNSS_FIX_OK);
                self.posveltim.differential_soln = pvt.flags.contains(ubx::PvtFlags::DIFF_SOLN);
                self.posveltim.heading_of_vehicle_valid = pvt.flags.contains(ubx::PvtFlags::HEAD_VEH_VALID);
                self.posveltim.satellites_used = pvt.satellites_used;
                self.posveltim.longitude_nanodegrees = pvt.longitude_nanodegrees;
                self.posveltim.latitude_nanodegrees = pvt.latitude_nanodegrees;
                self.posveltim.height_ellipsoid_millimeters = pvt.height_ellipsoid_millimeters;
                self.posveltim.height_msl_millimeters = pvt.height_msl_millimeters;
                self.posveltim.horizontal_accuracy_millimeters = pvt.horizontal_accuracy_millimeters;
                self.posveltim.vertical_accuracy_millimeters = pvt.vertical_accuracy_millimeters;
                self.posveltim.velocity_north_millimeters_per_second = pvt.velocity_north_millimeters_per_second;
                self.posveltim.velocity_east_millimeters_per_second = pvt.velocity_east_millimeters_per_second;
                self.posveltim.velocity_down_millimeters_per_second = pvt.velocity_down_millimeters_per_second;
                self.posveltim.ground_speed_millimeters_per_second = pvt.ground_speed_millimeters_per_second;
                self.posveltim.heading_of_motion_nanodegrees = pvt.heading_of_motion_nanodegrees;
                self.posveltim.speed_accuracy_millimeters_per_second = pvt.speed_accuracy_millimeters_per_second;
                self.posveltim.heading_accuracy_nanodegrees = pvt.heading_accuracy_nanodegrees;
                self.posveltim.pdop_centi = pvt.pdop_centi;
                self.posveltim.expiry.refresh();
                Ok(())
            },
            ubx_message::MON_HW => {
                let hw = ubx::mon_hw(payload)?;
                self.solution.jamming = hw.jamming;
                self.solution.jamming_indicator = hw.jamming_indicator;
                self.solution.expiry.refresh();
                Ok(())
            },
            ubx_message::RXM_RTCM => {
                let rxm = ubx::rxm_rtcm(payload)?;
                self.solution.rtcm_correction_accepted = rxm.message_used;
                self.solution.expiry.refresh();
                Ok(())
            },
            ubx_message::CFG_VALGET => {
                let (_layer, entries) = ubx::cfg_valget(payload)?;
                info!("CFG-VALGET: {} keys", entries.len());
                Ok(())
            },
            ubx_message::MON_VER => {
                let ver = ubx::mon_ver(payload)?;
                info!("MON-VER: sw={} hw={}", ver.software_version, ver.hardware_version);
                Ok(())
            },
            ubx_message::MON_COMMS => {
                let ports = ubx::mon_comms(payload)?;
                info!("MON-COMMS: {} ports", ports.len());
                Ok(())
            },
            ubx_message::ACK_ACK | ubx_message::ACK_NAK => {
                let acked = ubx::ack(payload)?;
                info!("ACK class=0x{:02X} id=0x{:02X}", acked.acked_class, acked.acked_id);
                Ok(())
            },
            _ => {
                info!("unrecognized UBX message class=0x{class:02X} id=0x{id:02X}");
                Err(ContentError::UnrecognizedSentence)
            },
        }
    }

    fn dispatch_rtcm(&mut self, frame: &[u8]) -> Result<(), ContentError> {
        let message = rtcm::message_type(frame)?;
        self.last_rtcm_message_type = Some(message.message_type);
        Ok(())
    }

    fn dispatch_cpo(&mut self, frame: &[u8]) -> Result<(), ContentError> {
        if frame.len() < 3 {
            return Err(ContentError::InvalidPacketLen { expect: 3, got: frame.len() });
        }
        let id = frame[1];
        let size = frame[2] as usize;
        let payload = frame
            .get(3..3 + size)
            .ok_or(ContentError::InvalidPacketLen { expect: 3 + size, got: frame.len() })?;

        match id {
            CPO_PVT_ID => {
                let pvt = cpo::cpo_pvt(payload)?;
                let system = System::Gps;
                let position = self.positions.entry(system).or_insert_with(|| Position::new(system));
                position.latitude_nanominutes = cpo::radians_to_nanominutes(pvt.latitude_radians);
                position.longitude_nanominutes = cpo::radians_to_nanominutes(pvt.longitude_radians);
                // `height_above_msl_meters` is the WGS84-ellipsoid-to-MSL
                // separation itself (Garmin's `msl_hght`), not an altitude;
                // MSL altitude is the ellipsoid altitude minus that offset.
                position.altitude_millimeters =
                    ((pvt.altitude_meters - pvt.height_above_msl_meters) as f64 * 1_000.0).round() as i64;
                position.geoidal_separation_millimeters = (pvt.height_above_msl_meters as f64 * 1_000.0).round() as i64;
                position.quality = match pvt.fix_type {
                    cpo::CpoFixType::TwoD | cpo::CpoFixType::ThreeD => Quality::Autonomous,
                    cpo::CpoFixType::TwoDDifferential | cpo::CpoFixType::ThreeDDifferential => Quality::Differential,
                    _ => Quality::NoFix,
                };
                let north = pvt.velocity_north_meters_per_second as f64;
                let east = pvt.velocity_east_meters_per_second as f64;
                const METERS_PER_SECOND_TO_MICROKNOTS: f64 = 1_943_844.49;
                position.speed_microknots = (north.hypot(east) * METERS_PER_SECOND_TO_MICROKNOTS).round() as i64;
                position.course_nanodegrees = (east.atan2(north).to_degrees().rem_euclid(360.0) * 1_000_000_000.0)
                    .round() as i64;
                let total_nanos =
                    crate::time::cpo_pvt_to_posix_nanos(pvt.days_since_garmin_epoch as u32, pvt.seconds_of_week, pvt.leap_seconds as i32);
                if total_nanos > 0 {
                    position.stamp(total_nanos as u64);
                }
                position.expiry.refresh();
                Ok(())
            },
            CPO_SDR_ID => {
                let satellites = cpo::cpo_sdr(payload)?;
                let view = self.views.entry(System::Gps).or_default();
                view.satellites.clear();
                for satellite in satellites {
                    view.satellites.push(ViewSatellite {
                        id: satellite.id,
                        elevation_degrees: satellite.elevation_degrees as i16,
                        azimuth_degrees: satellite.azimuth_degrees,
                        snr_dbhz: (satellite.snr >= 0).then_some(satellite.snr.clamp(0, 255) as u8),
                        phantom: false,
                        untracked: !satellite.used_in_solution,
                        unused: !satellite.has_ephemeris,
                    });
                }
                view.visible = view.satellites.len() as u8;
                view.channels = view.visible;
                view.expiry.refresh();
                Ok(())
            },
            _ => Err(ContentError::UnrecognizedSentence),
        }
    }

    /// Decodes one complete WT901 frame, already assembled by
    /// `framer::Wt901Framer` — this protocol has no sync with the
    /// multiplexer's other four, so callers run a second framer/feed loop
    /// over its own stream and hand the result here directly.
    pub fn ingest_wt901_data(&mut self, frame: &[u8]) -> Result<(), ContentError> {
        let data = wt901::data(frame)?;
        self.attitude.roll_nanodegrees = (data.roll_degrees * 1_000_000_000.0).round() as i64;
        self.attitude.pitch_nanodegrees = (data.pitch_degrees * 1_000_000_000.0).round() as i64;
        self.attitude.heading_nanodegrees = (data.yaw_degrees * 1_000_000_000.0).round() as i64;
        self.attitude.expiry.refresh();
        Ok(())
    }
}

impl Default for Station {
    fn default() -> Self {
        Self::new(crate::constants::NMEA_MAX_LENGTH * 4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_sentence(station: &mut Station, sentence: &[u8]) -> FrameEvent {
        let mut last = FrameEvent::None;
        for &b in sentence {
            let event = station.feed_byte(b);
            if !matches!(event, FrameEvent::None) {
                last = event;
            }
        }
        last
    }

    #[test]
    fn gga_sentence_populates_position() {
        let mut station = Station::default();
        let sentence = b"$GNGGA,135627.00,3947.65338,N,10509.20216,W,2,12,0.67,1708.6,M,-21.5,M,,0000*4E\r\n";
        assert_eq!(feed_sentence(&mut station, sentence), FrameEvent::Parsed(Protocol::Nmea));
        let position = station.position(System::Gnss).unwrap();
        assert_eq!(position.quality, Quality::Differential);
        assert_eq!(position.satellites_used, 12);
    }

    #[test]
    fn void_rmc_with_bad_mode_is_rejected_without_mutating_state() {
        let mut station = Station::default();
        let sentence = b"$GNRMC,135628.00,V,3947.65337,N,10509.20223,W,0.010,,070818,,,M*6A\r\n";
        let event = feed_sentence(&mut station, sentence);
        assert!(matches!(event, FrameEvent::Rejected { protocol: Protocol::Nmea, .. }));
        assert!(station.position(System::Gnss).is_none());
    }

    #[test]
    fn tick_expires_stale_records() {
        let mut station = Station::default();
        let sentence = b"$GNGGA,135627.00,3947.65338,N,10509.20216,W,2,12,0.67,1708.6,M,-21.5,M,,0000*4E\r\n";
        feed_sentence(&mut station, sentence);
        assert!(!station.position(System::Gnss).unwrap().expiry.is_stale());
        station.tick(crate::constants::DEFAULT_EXPIRY_TICKS);
        assert!(station.position(System::Gnss).unwrap().expiry.is_stale());
    }
}
