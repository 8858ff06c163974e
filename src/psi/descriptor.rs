// psi/descriptor.rs
//! Descriptors attached to EIT events.
//!
//! Every descriptor is kept as raw bytes; [`Descriptor::decode`] gives a typed
//! view for the tags we understand and [`DescriptorKind::Unknown`] otherwise.

use bitstream_io::{BigEndian, BitRead, BitReader};
use bytes::Bytes;

use crate::constants::{LCN_DESCRIPTOR_TAG, LCN_ENTRY_SIZE, LCN_MAX_ENTRIES};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    pub tag:  u8,
    pub data: Bytes,
}

impl Descriptor {
    pub fn new(tag: u8, data: Bytes) -> Self {
        Self { tag, data }
    }

    /// Declared descriptor_length.
    pub fn length(&self) -> u8 {
        self.data.len() as u8
    }

    pub fn decode(&self) -> DescriptorKind {
        match self.tag {
            LCN_DESCRIPTOR_TAG => DescriptorKind::LogicalChannelNumber(LcnDescriptor::parse(&self.data)),
            tag => DescriptorKind::Unknown { tag },
        }
    }
}

/// Typed view of a descriptor, keyed by tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorKind {
    LogicalChannelNumber(LcnDescriptor),
    /// Tag without a decoder; the raw bytes stay on the [`Descriptor`].
    Unknown { tag: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LcnEntry {
    pub service_id:             u16,
    pub visible:                bool,
    pub logical_channel_number: u16,
}

/// Logical Channel Number descriptor (0x83).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LcnDescriptor {
    pub entries: Vec<LcnEntry>,
}

impl LcnDescriptor {
    /// Reads 4-byte entries until the body is exhausted or `LCN_MAX_ENTRIES`
    /// have been collected. A trailing partial entry is ignored.
    pub fn parse(data: &[u8]) -> Self {
        let entries = data
            .chunks_exact(LCN_ENTRY_SIZE)
            .take(LCN_MAX_ENTRIES)
            .filter_map(parse_lcn_entry)
            .collect();
        Self { entries }
    }
}

fn parse_lcn_entry(raw: &[u8]) -> Option<LcnEntry> {
    let mut br = BitReader::endian(raw, BigEndian);
    let service_id = br.read::<16, u16>().ok()?;
    let visible = br.read_bit().ok()?;
    br.skip(5).ok()?;                               // reserved
    let logical_channel_number = br.read::<10, u16>().ok()?;
    Some(LcnEntry { service_id, visible, logical_channel_number })
}
