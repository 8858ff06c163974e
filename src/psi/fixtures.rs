//! Byte-level builders shared by the unit tests.

use bytes::Bytes;

use crate::psi::section::{crc32, Section, SectionHeader};

/// Full long-form section bytes, CRC included.
pub fn raw_section(
    table_id: u8,
    extension: u16,
    version: u8,
    current_next: bool,
    number: u8,
    last_number: u8,
    payload: &[u8],
) -> Vec<u8> {
    let sec_len = 5 + payload.len() + 4;
    let mut out = vec![
        table_id,
        0xB0 | ((sec_len >> 8) as u8 & 0x0F),
        sec_len as u8,
        (extension >> 8) as u8,
        extension as u8,
        0xC0 | ((version & 0x1F) << 1) | current_next as u8,
        number,
        last_number,
    ];
    out.extend_from_slice(payload);
    let crc = crc32(&out);
    out.extend_from_slice(&crc.to_be_bytes());
    out
}

/// One event record: fixed header, title, descriptor loop.
pub fn event_record(
    event_id: u16,
    start_time: u32,
    etm_location: u8,
    length_seconds: u32,
    title: &[u8],
    descriptors: &[(u8, &[u8])],
) -> Vec<u8> {
    let mut loop_bytes = Vec::new();
    for (tag, body) in descriptors {
        loop_bytes.push(*tag);
        loop_bytes.push(body.len() as u8);
        loop_bytes.extend_from_slice(body);
    }
    event_record_with_loop(event_id, start_time, etm_location, length_seconds, title, loop_bytes.len() as u16, &loop_bytes)
}

/// Event record with an explicit (possibly lying) descriptors_length.
pub fn event_record_with_loop(
    event_id: u16,
    start_time: u32,
    etm_location: u8,
    length_seconds: u32,
    title: &[u8],
    loop_length: u16,
    loop_bytes: &[u8],
) -> Vec<u8> {
    let mut out = vec![0xC0 | ((event_id >> 8) as u8 & 0x3F), event_id as u8];
    out.extend_from_slice(&start_time.to_be_bytes());
    out.push(0xC0 | ((etm_location & 0x03) << 4) | ((length_seconds >> 16) as u8 & 0x0F));
    out.push((length_seconds >> 8) as u8);
    out.push(length_seconds as u8);
    out.push(title.len() as u8);
    out.extend_from_slice(title);
    out.push(0xF0 | ((loop_length >> 8) as u8 & 0x0F));
    out.push(loop_length as u8);
    out.extend_from_slice(loop_bytes);
    out
}

/// `protocol_version`, `num_events_in_section`, then the records.
pub fn eit_payload(protocol: u8, announced: u8, records: &[Vec<u8>]) -> Vec<u8> {
    let mut out = vec![protocol, announced];
    for r in records {
        out.extend_from_slice(r);
    }
    out
}

pub fn eit_section(
    extension: u16,
    version: u8,
    current_next: bool,
    number: u8,
    last_number: u8,
    payload: &[u8],
) -> Section {
    Section::new(
        SectionHeader {
            table_id: crate::constants::EIT_TABLE_ID,
            syntax_indicator: true,
            extension,
            version,
            current_next,
            number,
            last_number,
        },
        Bytes::copy_from_slice(payload),
    )
}

/// Section whose single event carries `event_id` as a marker.
pub fn marked_section(extension: u16, version: u8, number: u8, last_number: u8, event_id: u16) -> Section {
    let payload = eit_payload(0, 1, &[event_record(event_id, 0, 0, 0, &[], &[])]);
    eit_section(extension, version, true, number, last_number, &payload)
}
