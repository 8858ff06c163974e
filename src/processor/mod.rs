//! Main packet processing logic

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};

use bytes::Bytes;
use log::{debug, info};

use crate::constants::TS_PACKET_SIZE;
use crate::psi::{Demux, Gathered, Section};
use crate::ts::{SectionCollector, TsPacket};
use crate::types::ProcessorStats;

/// Per-PID state: packet-level reassembly plus the subtable demux.
#[derive(Default)]
struct PidState {
    collector: SectionCollector,
    demux:     Demux,
}

pub struct PacketProcessor {
    pids:         HashMap<u16, PidState>,
    eit_table_id: u8,
    tx:           Sender<Gathered>,
    rx:           Receiver<Gathered>,
    stats:        ProcessorStats,
}

impl PacketProcessor {
    pub fn new(pids: &[u16], eit_table_id: u8) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            pids: pids.iter().map(|&pid| (pid, PidState::default())).collect(),
            eit_table_id,
            tx,
            rx,
            stats: ProcessorStats::default(),
        }
    }

    pub fn stats(&self) -> ProcessorStats {
        self.stats
    }

    /// Process a single TS packet
    pub fn process_packet(&mut self, chunk: &[u8]) {
        if chunk.len() < TS_PACKET_SIZE {
            return; // Invalid packet
        }
        let Some(packet) = TsPacket::parse(chunk) else {
            return;
        };
        self.stats.packets += 1;

        let Some(state) = self.pids.get_mut(&packet.pid) else {
            return;
        };
        let collected = state.collector.push(&packet);
        if collected.discontinuity {
            self.stats.discontinuities += 1;
            state.demux.signal_discontinuity();
        }

        for raw in collected.sections {
            self.process_section(packet.pid, raw);
        }
    }

    /// Feeds one raw section (starting at `table_id`) of `pid` to its demux.
    pub fn process_section(&mut self, pid: u16, raw: Bytes) {
        let Some(state) = self.pids.get_mut(&pid) else {
            return;
        };
        let section = match Section::parse(&raw) {
            Ok(section) => section,
            Err(e) => {
                self.stats.section_errors += 1;
                debug!("PID {pid:#06x}: dropping section: {e}");
                return;
            }
        };
        self.stats.sections += 1;

        let Some(unclaimed) = state.demux.push_section(section) else {
            return;
        };
        let (table_id, extension) = (unclaimed.header.table_id, unclaimed.header.extension);
        if table_id != self.eit_table_id {
            return;
        }

        let tx = self.tx.clone();
        let attached = state.demux.attach_eit(table_id, extension, move |gathered| {
            // receiver is owned by the processor
            let _ = tx.send(gathered);
        });
        if attached.is_ok() {
            info!("PID {pid:#06x}: new EIT subtable (table_id {table_id:#04x}, source_id {extension})");
            self.stats.subtables += 1;
            state.demux.push_section(unclaimed);
        }
    }

    /// Tables and "now current" notifications gathered since the previous
    /// call, in delivery order.
    pub fn drain(&mut self) -> Vec<Gathered> {
        let gathered: Vec<Gathered> = self.rx.try_iter().collect();
        for g in &gathered {
            match g {
                Gathered::TableReady(_) => self.stats.tables_delivered += 1,
                Gathered::StillCurrent(_) => self.stats.now_current += 1,
            }
        }
        gathered
    }

    /// Unregisters every subtable, dropping any partially gathered table.
    pub fn detach_all(&mut self) {
        for state in self.pids.values_mut() {
            state.demux = Demux::new();
        }
    }
}
