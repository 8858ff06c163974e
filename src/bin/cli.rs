use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;
use psip_eit::constants::{DEFAULT_EIT_PID, EIT_TABLE_ID};
use psip_eit::inspector::{run, Input, Options};

#[derive(Parser)]
#[clap(about = "Reassemble and decode ATSC EIT tables from a transport stream")]
struct Opt {
    /// UDP socket to bind + listen (IPv4)
    #[clap(long, default_value = "239.1.1.2:1234")]
    addr: SocketAddr,

    /// Read a recorded transport stream instead of UDP
    #[clap(long)]
    file: Option<PathBuf>,

    /// PID carrying EIT sections (repeatable, hex with 0x prefix or decimal)
    #[clap(long = "pid", value_parser = parse_u16, default_values_t = [DEFAULT_EIT_PID])]
    pids: Vec<u16>,

    /// table_id to decode as EIT
    #[clap(long, value_parser = parse_u8, default_value_t = EIT_TABLE_ID)]
    table_id: u8,

    /// Pretty-print each table
    #[clap(long, default_value_t = false)]
    pretty: bool,

    /// Log level when RUST_LOG is not set
    #[clap(long, default_value = "info")]
    log_level: LevelFilter,
}

fn parse_u16(s: &str) -> Result<u16, String> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse(),
    }
    .map_err(|e| format!("{s}: {e}"))
}

fn parse_u8(s: &str) -> Result<u8, String> {
    let v = parse_u16(s)?;
    u8::try_from(v).map_err(|e| format!("{s}: {e}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let opt = Opt::parse();

    env_logger::Builder::new()
        .filter_level(opt.log_level)
        .parse_default_env()
        .init();

    let input = match opt.file {
        Some(path) => Input::File(path),
        None => Input::Udp(opt.addr),
    };

    run(Options {
        input,
        pids: opt.pids,
        eit_table_id: opt.table_id,
        pretty: opt.pretty,
    })
    .await
}
