//! Per-PID section collector: rebuilds complete sections from packet
//! payloads and reports transport gaps.

use bytes::{Bytes, BytesMut};
use log::debug;

use super::packet::TsPacket;
use crate::constants::{MAX_SECTION_LENGTH, SECTION_HEADER_SIZE, STUFFING_BYTE};

/// Output of one [`SectionCollector::push`].
#[derive(Debug, Default)]
pub struct Collected {
    /// Raw sections, each starting at `table_id`.
    pub sections: Vec<Bytes>,
    /// Continuity was lost before or at this packet.
    pub discontinuity: bool,
}

#[derive(Default)]
pub struct SectionCollector {
    buffer:   BytesMut,
    last_cc:  Option<u8>,
    /// A section start has been seen since the last loss of sync.
    synced:   bool,
}

impl SectionCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, packet: &TsPacket<'_>) -> Collected {
        let mut out = Collected::default();
        if packet.transport_error {
            return out;
        }
        let Some(payload) = packet.payload else {
            return out;
        };

        let cc = packet.continuity_counter;
        match self.last_cc {
            Some(last) if last == cc && !packet.discontinuity_indicator => {
                debug!("PID {:#06x}: duplicate packet (cc {cc})", packet.pid);
                return out;
            }
            Some(last) if (last + 1) & 0x0F != cc => {
                debug!("PID {:#06x}: continuity error ({last} -> {cc})", packet.pid);
                out.discontinuity = true;
            }
            _ => {}
        }
        if packet.discontinuity_indicator {
            out.discontinuity = true;
        }
        self.last_cc = Some(cc);

        if out.discontinuity {
            self.buffer.clear();
            self.synced = false;
        }

        if packet.payload_unit_start {
            let pointer = payload[0] as usize;
            let rest = &payload[1..];
            if pointer > rest.len() {
                self.buffer.clear();
                self.synced = false;
                return out;
            }
            if self.synced {
                self.buffer.extend_from_slice(&rest[..pointer]);
                self.drain(&mut out.sections);
            }
            self.buffer.clear();
            self.buffer.extend_from_slice(&rest[pointer..]);
            self.synced = true;
        } else if self.synced {
            self.buffer.extend_from_slice(payload);
        }

        self.drain(&mut out.sections);
        out
    }

    fn drain(&mut self, sections: &mut Vec<Bytes>) {
        while self.synced && self.buffer.len() >= SECTION_HEADER_SIZE {
            if self.buffer[0] == STUFFING_BYTE {
                self.buffer.clear();
                self.synced = false;
                break;
            }
            let sec_len = (((self.buffer[1] & 0x0F) as usize) << 8) | self.buffer[2] as usize;
            if sec_len > MAX_SECTION_LENGTH {
                self.buffer.clear();
                self.synced = false;
                break;
            }
            let total = SECTION_HEADER_SIZE + sec_len;
            if self.buffer.len() < total {
                break;
            }
            sections.push(self.buffer.split_to(total).freeze());
        }
        if !self.synced && !self.buffer.is_empty() {
            self.buffer.clear();
        }
    }
}
