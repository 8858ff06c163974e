use std::net::SocketAddr;
use std::path::PathBuf;

use serde::Serialize;

/// Where transport packets come from.
#[derive(Debug, Clone)]
pub enum Input {
    /// UDP unicast or multicast (IPv4).
    Udp(SocketAddr),
    /// Recorded transport stream.
    File(PathBuf),
}

/// Configuration options for the inspector
#[derive(Debug, Clone)]
pub struct Options {
    pub input: Input,
    /// PIDs carrying EIT sections
    pub pids: Vec<u16>,
    /// table_id that gets an EIT decoder attached on first sight
    pub eit_table_id: u8,
    pub pretty: bool,
}

/// Running counters kept by the packet processor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProcessorStats {
    pub packets:          u64,
    pub sections:         u64,
    pub section_errors:   u64,
    pub discontinuities:  u64,
    pub subtables:        u64,
    pub tables_delivered: u64,
    /// Already delivered tables reported as having become current
    pub now_current:      u64,
}
