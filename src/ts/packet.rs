//! Transport packet header parsing.

use crate::constants::{TS_PACKET_SIZE, TS_SYNC_BYTE};

/// Header fields of one 188-byte transport packet plus its payload.
#[derive(Debug, Clone, Copy)]
pub struct TsPacket<'a> {
    pub pid:                      u16,
    pub transport_error:          bool,
    pub payload_unit_start:       bool,
    pub continuity_counter:       u8,
    /// `discontinuity_indicator` from the adaptation field.
    pub discontinuity_indicator:  bool,
    pub payload:                  Option<&'a [u8]>,
}

impl<'a> TsPacket<'a> {
    /// Returns `None` for short packets, a bad sync byte or an adaptation
    /// field that runs past the packet.
    pub fn parse(chunk: &'a [u8]) -> Option<Self> {
        if chunk.len() < TS_PACKET_SIZE || chunk[0] != TS_SYNC_BYTE {
            return None;
        }
        let chunk = &chunk[..TS_PACKET_SIZE];

        let pid = (((chunk[1] & 0x1F) as u16) << 8) | (chunk[2] as u16);
        let adaptation_field_ctrl = (chunk[3] & 0x30) >> 4;
        let mut payload_offset = 4usize;
        let mut discontinuity_indicator = false;

        if adaptation_field_ctrl & 0x02 != 0 {
            let adap_len = chunk[4] as usize;
            if adap_len > 0 {
                discontinuity_indicator = chunk[5] & 0x80 != 0;
            }
            payload_offset += 1 + adap_len;
            if payload_offset > TS_PACKET_SIZE {
                return None;
            }
        }

        let payload = if adaptation_field_ctrl & 0x01 != 0 && payload_offset < TS_PACKET_SIZE {
            Some(&chunk[payload_offset..])
        } else {
            None
        };

        Some(Self {
            pid,
            transport_error:    chunk[1] & 0x80 != 0,
            payload_unit_start: chunk[1] & 0x40 != 0,
            continuity_counter: chunk[3] & 0x0F,
            discontinuity_indicator,
            payload,
        })
    }
}
