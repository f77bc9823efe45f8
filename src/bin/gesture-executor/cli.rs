use std::net::{IpAddr, Ipv4Addr};

use clap::Parser;
use hand_gesture_pointer::executor::pointer::PointerBackend;

// Some defaults; some of which can be overriden via CLI args
const HOST: std::net::IpAddr = IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0));
const PORT: u16 = 4000;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Address to listen on
    #[arg(long = "host", default_value_t=HOST)]
    pub host: std::net::IpAddr,

    #[arg(long = "port", default_value_t = PORT)]
    pub port: u16,

    /// How pointer commands reach the host
    #[arg(long = "pointer.backend", value_enum, default_value_t = PointerBackend::Enigo)]
    pub pointer_backend: PointerBackend,

    /// Acknowledge (and ignore) requests with unknown actions instead of rejecting them
    #[arg(long = "lenient")]
    pub lenient: bool,

    #[arg(long = "loglevel",default_value_t=String::from("info"))]
    pub log_level: String,
}
