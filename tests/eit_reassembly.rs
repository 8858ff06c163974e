mod common;

use common::*;
use psip_eit::psi::{DescriptorKind, EitDecoder, EitHeader, Gathered, Section};

fn permutations(items: &[u8]) -> Vec<Vec<u8>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }
    let mut out = Vec::new();
    for (i, &head) in items.iter().enumerate() {
        let mut rest = items.to_vec();
        rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, head);
            out.push(tail);
        }
    }
    out
}

#[test]
fn any_arrival_order_yields_exactly_one_table() {
    for order in permutations(&[0, 1, 2, 3]) {
        let (mut demux, tables) = collecting_demux(0x10);
        for &n in &order {
            assert!(demux.push_section(marked(0x10, 1, n, 3, 100 + n as u16)).is_none());
        }
        let tables = tables.borrow();
        assert_eq!(tables.len(), 1, "order {order:?}");
        assert_eq!(event_ids(&tables[0]), vec![100, 101, 102, 103], "order {order:?}");
    }
}

#[test]
fn reversed_pair_completes_only_when_both_present() {
    let (mut demux, tables) = collecting_demux(1);
    demux.push_section(marked(1, 0, 1, 1, 11));
    assert!(tables.borrow().is_empty());
    demux.push_section(marked(1, 0, 0, 1, 10));
    assert_eq!(event_ids(&tables.borrow()[0]), vec![10, 11]);
}

#[test]
fn last_received_copy_of_a_section_wins() {
    let (mut demux, tables) = collecting_demux(1);
    demux.push_section(marked(1, 0, 0, 1, 1));
    demux.push_section(marked(1, 0, 0, 1, 2));
    demux.push_section(marked(1, 0, 1, 1, 3));
    assert_eq!(event_ids(&tables.borrow()[0]), vec![2, 3]);
}

#[test]
fn version_change_empties_buffer() {
    let mut dec = EitDecoder::new();
    dec.admit(marked(1, 0, 0, 3, 0), false);
    dec.admit(marked(1, 0, 1, 3, 1), false);
    dec.admit(marked(1, 0, 3, 3, 3), false);
    assert_eq!(dec.buffered(), 3);

    dec.admit(marked(1, 1, 2, 3, 2), false);
    assert_eq!(dec.buffered(), 1);
}

#[test]
fn discontinuity_resets_consistent_reassembly() {
    let (mut demux, tables) = collecting_demux(1);
    demux.push_section(marked(1, 0, 0, 1, 10));
    demux.signal_discontinuity();
    demux.push_section(marked(1, 0, 1, 1, 11));
    assert!(tables.borrow().is_empty());
    demux.push_section(marked(1, 0, 0, 1, 10));
    assert_eq!(tables.borrow().len(), 1);
}

#[test]
fn reference_payload_decodes() {
    let payload = [
        0x01, 0x01,
        0xC0, 0x01, 0x00, 0x00, 0x00, 0x10, 0xC0, 0x00, 0x05, 0x02, 0xAA, 0xBB,
        0xF0, 0x04, 0x83, 0x02, 0x00, 0x01,
    ];
    let (mut demux, tables) = collecting_demux(5);
    demux.push_section(section(5, 0, 0, 0, &payload));

    let tables = tables.borrow();
    let eit = &tables[0];
    assert_eq!(eit.protocol, 1);
    assert_eq!(eit.events.len(), 1);
    let ev = &eit.events[0];
    assert_eq!((ev.event_id, ev.start_time, ev.length_seconds), (1, 0x10, 5));
    assert_eq!(&ev.title[..], &[0xAA, 0xBB]);
    assert_eq!(ev.descriptors.len(), 1);
    assert_eq!(ev.descriptors[0].tag, 0x83);
    assert_eq!(&ev.descriptors[0].data[..], &[0x00, 0x01]);
    // two bytes are not a whole LCN entry
    let DescriptorKind::LogicalChannelNumber(lcn) = ev.descriptors[0].decode() else {
        panic!("tag 0x83 decodes as LCN");
    };
    assert!(lcn.entries.is_empty());
}

#[test]
fn overrunning_title_is_not_emitted_and_next_section_still_decodes() {
    let mut bad = record(1, 0, 0, &[0x41, 0x42], &[]);
    bad[9] = 0xF0;
    let s0 = section(1, 0, 0, 1, &payload(&[bad]));
    let s1 = section(1, 0, 1, 1, &payload(&[record(2, 0, 0, b"ok", &[])]));

    let (mut demux, tables) = collecting_demux(1);
    demux.push_section(s0);
    demux.push_section(s1);
    let tables = tables.borrow();
    assert_eq!(event_ids(&tables[0]), vec![2]);
    assert_eq!(&tables[0].events[0].title[..], b"ok");
}

#[test]
fn overrunning_descriptor_does_not_disturb_following_events() {
    let mut rec = record(1, 0, 0, &[], &[(0x86, &[1, 2, 3])]);
    // descriptor claims 4 bytes, loop holds 3 after its header
    let len_at = rec.len() - 4;
    rec[len_at] = 4;
    let following = record(2, 0, 0, &[], &[(0x87, &[9])]);

    let (mut demux, tables) = collecting_demux(1);
    demux.push_section(section(1, 0, 0, 0, &payload(&[rec, following])));
    let tables = tables.borrow();
    let eit = &tables[0];
    assert_eq!(event_ids(eit), vec![1, 2]);
    assert!(eit.events[0].descriptors.is_empty());
    assert_eq!(eit.events[1].descriptors[0].tag, 0x87);
}

#[test]
fn next_version_becoming_current_is_notified_without_redecode() {
    let body = payload(&[record(7, 0, 0, &[], &[])]);
    let next = Section::parse(&eit_section_bytes(9, 3, false, 0, 0, &body)).unwrap();
    let now = Section::parse(&eit_section_bytes(9, 3, true, 0, 0, &body)).unwrap();

    let mut dec = EitDecoder::new();
    let first = dec.admit(next, false);
    assert!(matches!(first, Some(Gathered::TableReady(ref t)) if !t.current_next && t.events.len() == 1));

    match dec.admit(now.clone(), false) {
        Some(Gathered::StillCurrent(h)) => {
            assert_eq!(h, EitHeader { version: 3, protocol: 0, source_id: 9, current_next: true });
        }
        other => panic!("expected StillCurrent, got {other:?}"),
    }
    assert!(dec.admit(now, false).is_none());
}

#[test]
fn detach_releases_partial_state() {
    let (mut demux, tables) = collecting_demux(1);
    demux.push_section(marked(1, 0, 0, 1, 10));
    demux.detach(psip_eit::constants::EIT_TABLE_ID, 1).unwrap();
    assert!(demux.push_section(marked(1, 0, 1, 1, 11)).is_some());
    assert!(tables.borrow().is_empty());
}
