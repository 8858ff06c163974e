// psi/eit.rs
//! ATSC Event Information Table (table_id 0xCB): data model and the decoder
//! that turns a complete, ordered set of sections into events.

use bytes::Bytes;
use log::warn;

use super::descriptor::Descriptor;
use super::section::Section;
use crate::constants::{
    DESCRIPTOR_HEADER_SIZE, EIT_EVENT_HEADER_SIZE, EIT_LOOP_LENGTH_SIZE, EIT_PAYLOAD_HEADER_SIZE,
};

/// Scalar header of a table. Also used as the "current" snapshot kept by the
/// reassembly engine once a table has been delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EitHeader {
    pub version:      u8,
    pub protocol:     u8,
    pub source_id:    u16,
    pub current_next: bool,
}

impl EitHeader {
    /// Header of a table built from `section`.
    pub fn from_section(section: &Section) -> Self {
        Self {
            version:      section.header.version,
            protocol:     section.protocol(),
            source_id:    section.header.extension,
            current_next: section.header.current_next,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eit {
    pub version:      u8,
    pub protocol:     u8,
    pub source_id:    u16,
    pub current_next: bool,
    pub events:       Vec<EitEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EitEvent {
    pub event_id:       u16,
    /// GPS seconds since 1980-01-06T00:00:00Z.
    pub start_time:     u32,
    pub etm_location:   u8,
    pub length_seconds: u32,
    /// Multiple-string structure, kept opaque.
    pub title:          Bytes,
    pub descriptors:    Vec<Descriptor>,
}

impl Eit {
    pub fn new(header: EitHeader) -> Self {
        Self {
            version:      header.version,
            protocol:     header.protocol,
            source_id:    header.source_id,
            current_next: header.current_next,
            events:       Vec::new(),
        }
    }

    pub fn header(&self) -> EitHeader {
        EitHeader {
            version:      self.version,
            protocol:     self.protocol,
            source_id:    self.source_id,
            current_next: self.current_next,
        }
    }

    /// Appends the events of every section, in the order given.
    pub fn decode_sections<'a, I>(&mut self, sections: I)
    where
        I: IntoIterator<Item = &'a Section>,
    {
        for section in sections {
            self.decode_section(section);
        }
    }

    /// Decodes one section payload. A record whose title or loop length field
    /// runs past the payload end is dropped; one whose descriptor loop does is
    /// kept without descriptors. Either way the rest of the section is
    /// abandoned.
    fn decode_section(&mut self, section: &Section) {
        let payload = &section.payload;
        if payload.len() < EIT_PAYLOAD_HEADER_SIZE {
            warn!("EIT section {} payload too short ({} bytes)", section.header.number, payload.len());
            return;
        }
        let announced = payload[1] as usize;
        let end = payload.len();
        let mut idx = EIT_PAYLOAD_HEADER_SIZE;

        let mut count = 0;
        while count < announced && idx + EIT_EVENT_HEADER_SIZE <= end {
            count += 1;
            match parse_event(payload, idx) {
                Ok(Record::Complete(event, next)) => {
                    self.events.push(event);
                    idx = next;
                }
                Ok(Record::Truncated(event, bounds)) => {
                    warn!(
                        "EIT section {}: {} in event {} of {}, keeping it without descriptors",
                        section.header.number, bounds, count, announced
                    );
                    self.events.push(event);
                    break;
                }
                Err(bounds) => {
                    warn!(
                        "EIT section {}: {} in event {} of {}, skipping rest of section",
                        section.header.number, bounds, count, announced
                    );
                    break;
                }
            }
        }
    }
}

/// Which length field ran past the payload end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
enum Overrun {
    #[error("title_length {declared} exceeds {available} remaining bytes")]
    Title { declared: usize, available: usize },
    #[error("descriptors_length field missing")]
    LoopLength,
    #[error("descriptors_length {declared} exceeds {available} remaining bytes")]
    DescriptorLoop { declared: usize, available: usize },
}

enum Record {
    /// Record fully in bounds, followed by the index just past it.
    Complete(EitEvent, usize),
    /// Descriptor loop ran past the payload end. The event has no descriptors.
    Truncated(EitEvent, Overrun),
}

/// Parses the record at `idx`. The caller guarantees the fixed header fits.
fn parse_event(payload: &Bytes, idx: usize) -> Result<Record, Overrun> {
    let end = payload.len();
    let fixed = FixedHeader::read(&payload[idx..idx + EIT_EVENT_HEADER_SIZE]);
    let title_length = fixed.title_length as usize;

    let mut idx = idx + EIT_EVENT_HEADER_SIZE;
    if idx + title_length > end {
        return Err(Overrun::Title { declared: title_length, available: end - idx });
    }
    let title = payload.slice(idx..idx + title_length);
    idx += title_length;

    if idx + EIT_LOOP_LENGTH_SIZE > end {
        return Err(Overrun::LoopLength);
    }
    let loop_len = (((payload[idx] & 0x0F) as usize) << 8) | payload[idx + 1] as usize;
    idx += EIT_LOOP_LENGTH_SIZE;
    let loop_end = idx + loop_len;
    let mut event = EitEvent {
        event_id: fixed.event_id,
        start_time: fixed.start_time,
        etm_location: fixed.etm_location,
        length_seconds: fixed.length_seconds,
        title,
        descriptors: Vec::new(),
    };
    if loop_end > end {
        let bounds = Overrun::DescriptorLoop { declared: loop_len, available: end - idx };
        return Ok(Record::Truncated(event, bounds));
    }

    event.descriptors = parse_descriptor_loop(payload, idx, loop_end);
    Ok(Record::Complete(event, loop_end))
}

struct FixedHeader {
    event_id:       u16,
    start_time:     u32,
    etm_location:   u8,
    length_seconds: u32,
    title_length:   u8,
}

impl FixedHeader {
    /// `raw` holds exactly the 10 fixed bytes of a record.
    fn read(raw: &[u8]) -> Self {
        Self {
            event_id:       ((raw[0] & 0x3F) as u16) << 8 | raw[1] as u16,
            start_time:     u32::from_be_bytes([raw[2], raw[3], raw[4], raw[5]]),
            etm_location:   (raw[6] & 0x30) >> 4,
            length_seconds: ((raw[6] & 0x0F) as u32) << 16 | (raw[7] as u32) << 8 | raw[8] as u32,
            title_length:   raw[9],
        }
    }
}

/// Walks `{tag, length, body}` entries in `payload[start..loop_end]`. An entry
/// whose body does not fit is skipped, the cursor still moves past it.
fn parse_descriptor_loop(payload: &Bytes, start: usize, loop_end: usize) -> Vec<Descriptor> {
    let mut descriptors = Vec::new();
    let mut idx = start;
    while idx + DESCRIPTOR_HEADER_SIZE <= loop_end {
        let tag = payload[idx];
        let len = payload[idx + 1] as usize;
        let body = idx + DESCRIPTOR_HEADER_SIZE;
        if body + len <= loop_end {
            descriptors.push(Descriptor::new(tag, payload.slice(body..body + len)));
        } else {
            warn!("descriptor {tag:#04x} length {len} overruns descriptor loop, skipped");
        }
        idx = body + len;
    }
    descriptors
}
