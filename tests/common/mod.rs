#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use psip_eit::constants::EIT_TABLE_ID;
use psip_eit::psi::{Demux, Eit, Gathered, Section};
use psip_eit::psi::section::crc32;

/// Complete long-form EIT section bytes, CRC included.
pub fn eit_section_bytes(
    source_id: u16,
    version: u8,
    current_next: bool,
    number: u8,
    last_number: u8,
    payload: &[u8],
) -> Vec<u8> {
    let sec_len = 5 + payload.len() + 4;
    let mut out = vec![
        EIT_TABLE_ID,
        0xF0 | ((sec_len >> 8) as u8 & 0x0F),
        sec_len as u8,
        (source_id >> 8) as u8,
        source_id as u8,
        0xC0 | ((version & 0x1F) << 1) | current_next as u8,
        number,
        last_number,
    ];
    out.extend_from_slice(payload);
    let crc = crc32(&out);
    out.extend_from_slice(&crc.to_be_bytes());
    out
}

pub fn section(source_id: u16, version: u8, number: u8, last_number: u8, payload: &[u8]) -> Section {
    Section::parse(&eit_section_bytes(source_id, version, true, number, last_number, payload)).unwrap()
}

pub fn record(event_id: u16, start_time: u32, length_seconds: u32, title: &[u8], descriptors: &[(u8, &[u8])]) -> Vec<u8> {
    let loop_bytes: Vec<u8> = descriptors
        .iter()
        .flat_map(|(tag, body)| [vec![*tag, body.len() as u8], body.to_vec()].concat())
        .collect();
    let mut out = vec![0xC0 | ((event_id >> 8) as u8 & 0x3F), event_id as u8];
    out.extend_from_slice(&start_time.to_be_bytes());
    out.push(0xC0 | ((length_seconds >> 16) as u8 & 0x0F));
    out.push((length_seconds >> 8) as u8);
    out.push(length_seconds as u8);
    out.push(title.len() as u8);
    out.extend_from_slice(title);
    out.push(0xF0 | ((loop_bytes.len() >> 8) as u8 & 0x0F));
    out.push(loop_bytes.len() as u8);
    out.extend_from_slice(&loop_bytes);
    out
}

pub fn payload(records: &[Vec<u8>]) -> Vec<u8> {
    let mut out = vec![0x00, records.len() as u8];
    for r in records {
        out.extend_from_slice(r);
    }
    out
}

/// Section holding one event whose id marks where it came from.
pub fn marked(source_id: u16, version: u8, number: u8, last_number: u8, event_id: u16) -> Section {
    section(source_id, version, number, last_number, &payload(&[record(event_id, 0, 0, &[], &[])]))
}

/// Demux with one EIT subtable whose callback collects every decoded table.
pub fn collecting_demux(source_id: u16) -> (Demux, Rc<RefCell<Vec<Eit>>>) {
    let tables = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&tables);
    let mut demux = Demux::new();
    demux
        .attach_eit(EIT_TABLE_ID, source_id, move |g: Gathered| sink.borrow_mut().extend(g.into_table()))
        .unwrap();
    (demux, tables)
}

pub fn event_ids(eit: &Eit) -> Vec<u16> {
    eit.events.iter().map(|e| e.event_id).collect()
}
