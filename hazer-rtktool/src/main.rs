//! rtktool: a point-to-multipoint router that distributes RTK corrections
//! from a stationary base to subscribed rovers. A rover subscribes simply
//! by sending a keepalive datagram; the router remembers the source
//! address and port and forwards every subsequent base correction there
//! until the rover goes quiet for longer than the configured timeout.

use std::net::{Ipv6Addr, SocketAddr, UdpSocket};
use std::time::{Duration, Instant};

use clap::{value_parser, Arg, Command};
use log::{debug, error, info, warn};

use hazer_protocol::datagram;
use hazer_protocol::router::{Disposition, Router};
use hazer_protocol::validator;

const MAX_DATAGRAM: usize = 2048;
const SWEEP_INTERVAL: Duration = Duration::from_secs(1);

struct Options {
    port: u16,
    timeout_seconds: u64,
    verbose: bool,
}

fn parse_args() -> Options {
    let matches = Command::new("rtktool")
        .about("RTK datagram router: forwards corrections from a base to subscribed rovers")
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("Rendezvous UDP port for the RTCM source and sink")
                .default_value("21010")
                .value_parser(value_parser!(u16)),
        )
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .value_name("SECONDS")
                .help("Client timeout in seconds")
                .default_value("30")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(clap::ArgAction::SetTrue)
                .help("Display verbose output on standard error"),
        )
        .get_matches();

    Options {
        port: *matches.get_one::<u16>("port").expect("has default"),
        timeout_seconds: *matches.get_one::<u64>("timeout").expect("has default"),
        verbose: matches.get_flag("verbose"),
    }
}

fn socket_addr_to_key(addr: SocketAddr) -> (Ipv6Addr, u16) {
    match addr {
        SocketAddr::V4(v4) => (v4.ip().to_ipv6_mapped(), v4.port()),
        SocketAddr::V6(v6) => (*v6.ip(), v6.port()),
    }
}

fn main() {
    env_logger::init();

    let options = parse_args();
    let socket = UdpSocket::bind(("::", options.port)).unwrap_or_else(|e| {
        error!("failed to bind rendezvous port {}: {e}", options.port);
        std::process::exit(1);
    });
    socket
        .set_read_timeout(Some(SWEEP_INTERVAL))
        .expect("read timeout is a valid duration");

    info!("Router [::]:{} timeout={}s", options.port, options.timeout_seconds);

    let mut router = Router::new(options.timeout_seconds);
    let mut forward_sequence: u32 = 0;
    let started = Instant::now();
    let mut last_sweep = started;
    let mut buffer = [0u8; MAX_DATAGRAM];

    loop {
        match socket.recv_from(&mut buffer) {
            Ok((received, peer)) => {
                let now = started.elapsed().as_secs();
                let datagram = &buffer[..received];
                handle_datagram(&socket, &mut router, &mut forward_sequence, datagram, peer, now, options.verbose);
            },
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock || e.kind() == std::io::ErrorKind::TimedOut => {},
            Err(e) => {
                error!("recv_from failed: {e}");
                continue;
            },
        }

        if last_sweep.elapsed() >= SWEEP_INTERVAL {
            let now = started.elapsed().as_secs();
            router.sweep(now);
            last_sweep = Instant::now();
        }
    }
}

fn handle_datagram(
    socket: &UdpSocket,
    router: &mut Router,
    forward_sequence: &mut u32,
    datagram: &[u8],
    peer: SocketAddr,
    now: u64,
    verbose: bool,
) {
    let key = socket_addr_to_key(peer);

    let Some((sequence, rtcm_payload)) = datagram::parse_header(datagram) else {
        warn!("datagram too short for sequence header from {peer}");
        return;
    };

    let declared_len = match validator::validate_rtcm(rtcm_payload) {
        Ok(len) => len,
        Err(e) => {
            warn!("rejected datagram from {peer}: {e:?}");
            return;
        },
    };

    if verbose {
        debug!("datagram from {peer} [{} bytes]", datagram.len());
    }

    match router.ingest(key, sequence, declared_len, now) {
        Disposition::Forwarded { forwarded_to } => {
            debug!("forwarding {declared_len}-byte correction from {peer} to {forwarded_to} rover(s)");
            let rover_keys: Vec<_> = router.rovers().copied().collect();
            for (ip, port) in rover_keys {
                let outgoing = datagram::stamp(forward_sequence, &rtcm_payload[..declared_len]);
                if let Err(e) = socket.send_to(&outgoing, (ip, port)) {
                    warn!("failed to forward to [{ip}]:{port}: {e}");
                }
            }
        },
        Disposition::RoverKeepalive => {
            debug!("keepalive from rover {peer}");
        },
        Disposition::Rejected(reason) => {
            warn!("rejected datagram from {peer}: {reason:?}");
        },
    }
}
