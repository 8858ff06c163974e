use bytes::{Buf, BytesMut};
use log::{info, warn};
use tokio::io::AsyncReadExt;
use tokio::net::UdpSocket;

use crate::constants::{TS_PACKET_SIZE, TS_SYNC_BYTE};
use crate::network::create_udp_socket;
use crate::processor::PacketProcessor;
use crate::report::Reporter;
use crate::types::{Input, Options};

const READ_CHUNK: usize = TS_PACKET_SIZE * 64;

pub async fn run(opts: Options) -> anyhow::Result<()> {
    let mut processor = PacketProcessor::new(&opts.pids, opts.eit_table_id);
    info!(
        "watching PIDs {:?} for table_id {:#04x}",
        opts.pids.iter().map(|p| format!("{p:#06x}")).collect::<Vec<_>>(),
        opts.eit_table_id
    );

    match &opts.input {
        Input::Udp(addr) => {
            let sock = UdpSocket::from_std(create_udp_socket(*addr)?.into())?;
            info!("listening on {addr}");
            let mut buf = vec![0u8; 2048 * 8];
            loop {
                tokio::select! {
                    res = sock.recv(&mut buf) => {
                        let n = res?;
                        // datagrams carry whole packets
                        for chunk in buf[..n].chunks_exact(TS_PACKET_SIZE) {
                            processor.process_packet(chunk);
                        }
                        emit(&mut processor, opts.pretty)?;
                    }
                    _ = tokio::signal::ctrl_c() => break,
                }
            }
        }
        Input::File(path) => {
            let mut file = tokio::fs::File::open(path).await?;
            info!("reading {}", path.display());
            let mut pending = BytesMut::with_capacity(READ_CHUNK * 2);
            loop {
                tokio::select! {
                    res = file.read_buf(&mut pending) => {
                        if res? == 0 {
                            break;
                        }
                        feed_aligned(&mut processor, &mut pending);
                        emit(&mut processor, opts.pretty)?;
                        pending.reserve(READ_CHUNK);
                    }
                    _ = tokio::signal::ctrl_c() => break,
                }
            }
            if !pending.is_empty() {
                warn!("{} trailing bytes do not form a packet", pending.len());
            }
        }
    }

    emit(&mut processor, opts.pretty)?;
    processor.detach_all();
    info!("stats: {}", Reporter::stats_json(&processor.stats())?);
    Ok(())
}

/// Splits whole packets off `pending`, resyncing on the sync byte.
fn feed_aligned(processor: &mut PacketProcessor, pending: &mut BytesMut) {
    while pending.len() >= TS_PACKET_SIZE {
        if pending[0] != TS_SYNC_BYTE {
            let skip = pending.iter().position(|&b| b == TS_SYNC_BYTE).unwrap_or(pending.len());
            warn!("lost sync, skipping {skip} bytes");
            pending.advance(skip);
            continue;
        }
        let packet = pending.split_to(TS_PACKET_SIZE);
        processor.process_packet(&packet);
    }
}

fn emit(processor: &mut PacketProcessor, pretty: bool) -> anyhow::Result<()> {
    for gathered in processor.drain() {
        println!("{}", Reporter::gathered_json(&gathered, pretty)?);
    }
    Ok(())
}
