//! JSON rendering of delivered event tables

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::constants::GPS_EPOCH_UNIX_SECONDS;
use crate::psi::{Descriptor, DescriptorKind, Eit, EitEvent, EitHeader, Gathered};
use crate::types::ProcessorStats;

/// JSON structure for one LCN entry
#[derive(Serialize)]
struct LcnJson {
    service_id: u16,
    visible: bool,
    logical_channel_number: u16,
}

/// JSON structure for a descriptor
#[derive(Serialize)]
struct DescriptorJson {
    tag: u8,
    length: u8,
    data: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    lcn: Option<Vec<LcnJson>>,
}

/// JSON structure for an event
#[derive(Serialize)]
struct EventJson {
    event_id: u16,
    start_time: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_time_utc: Option<String>,
    etm_location: u8,
    length_seconds: u32,
    title: String,
    descriptors: Vec<DescriptorJson>,
}

/// JSON structure for a complete table
#[derive(Serialize)]
struct TableJson {
    ts_time: String,
    source_id: u16,
    version: u8,
    protocol: u8,
    current_next: bool,
    events: Vec<EventJson>,
}

/// JSON structure for a table that became current without changing
#[derive(Serialize)]
struct NowCurrentJson {
    ts_time: String,
    source_id: u16,
    version: u8,
    protocol: u8,
    current_next: bool,
    now_current: bool,
}

/// Report generator for decoded tables
pub struct Reporter;

impl Reporter {
    pub fn gathered_json(gathered: &Gathered, pretty: bool) -> anyhow::Result<String> {
        match gathered {
            Gathered::TableReady(eit) => Self::table_json(eit, pretty),
            Gathered::StillCurrent(header) => Self::now_current_json(header, pretty),
        }
    }

    pub fn table_json(eit: &Eit, pretty: bool) -> anyhow::Result<String> {
        let rep = TableJson {
            ts_time: Utc::now().to_rfc3339(),
            source_id: eit.source_id,
            version: eit.version,
            protocol: eit.protocol,
            current_next: eit.current_next,
            events: eit.events.iter().map(event_json).collect(),
        };
        to_json(&rep, pretty)
    }

    pub fn now_current_json(header: &EitHeader, pretty: bool) -> anyhow::Result<String> {
        let rep = NowCurrentJson {
            ts_time: Utc::now().to_rfc3339(),
            source_id: header.source_id,
            version: header.version,
            protocol: header.protocol,
            current_next: header.current_next,
            now_current: true,
        };
        to_json(&rep, pretty)
    }

    pub fn stats_json(stats: &ProcessorStats) -> anyhow::Result<String> {
        Ok(serde_json::to_string(stats)?)
    }
}

fn to_json<T: Serialize>(rep: &T, pretty: bool) -> anyhow::Result<String> {
    Ok(if pretty { serde_json::to_string_pretty(rep)? } else { serde_json::to_string(rep)? })
}

fn event_json(ev: &EitEvent) -> EventJson {
    EventJson {
        event_id: ev.event_id,
        start_time: ev.start_time,
        start_time_utc: gps_to_utc(ev.start_time).map(|t| t.to_rfc3339()),
        etm_location: ev.etm_location,
        length_seconds: ev.length_seconds,
        title: hex(&ev.title),
        descriptors: ev.descriptors.iter().map(descriptor_json).collect(),
    }
}

fn descriptor_json(d: &Descriptor) -> DescriptorJson {
    let lcn = match d.decode() {
        DescriptorKind::LogicalChannelNumber(lcn) => Some(
            lcn.entries
                .iter()
                .map(|e| LcnJson {
                    service_id: e.service_id,
                    visible: e.visible,
                    logical_channel_number: e.logical_channel_number,
                })
                .collect(),
        ),
        DescriptorKind::Unknown { .. } => None,
    };
    DescriptorJson { tag: d.tag, length: d.length(), data: hex(&d.data), lcn }
}

/// GPS seconds to wall-clock time. Leap seconds (GPS-UTC offset) are not applied.
pub fn gps_to_utc(gps_seconds: u32) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(GPS_EPOCH_UNIX_SECONDS + gps_seconds as i64, 0)
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
