//! Constants for MPEG-TS transport and ATSC PSIP event tables

/// MPEG-TS packet constants
pub const TS_PACKET_SIZE: usize = 188;
pub const TS_SYNC_BYTE: u8 = 0x47;

/// PSI section framing
pub const SECTION_HEADER_SIZE: usize = 3;      // table_id + flags/section_length
pub const LONG_HEADER_SIZE: usize = 8;         // up to and including last_section_number
pub const CRC_SIZE: usize = 4;
pub const MAX_SECTION_LENGTH: usize = 4093;
pub const STUFFING_BYTE: u8 = 0xFF;

/// One slot per possible section_number
pub const SECTION_SLOTS: usize = 256;

/// ATSC A/65 Event Information Table
pub const EIT_TABLE_ID: u8 = 0xCB;
pub const DEFAULT_EIT_PID: u16 = 0x1D00;
/// protocol_version + num_events_in_section
pub const EIT_PAYLOAD_HEADER_SIZE: usize = 2;
/// event_id .. title_length
pub const EIT_EVENT_HEADER_SIZE: usize = 10;
/// reserved + descriptors_length
pub const EIT_LOOP_LENGTH_SIZE: usize = 2;

/// Descriptor framing (tag + length)
pub const DESCRIPTOR_HEADER_SIZE: usize = 2;

/// Logical Channel Number descriptor
pub const LCN_DESCRIPTOR_TAG: u8 = 0x83;
pub const LCN_ENTRY_SIZE: usize = 4;
pub const LCN_MAX_ENTRIES: usize = 64;

/// GPS epoch (1980-01-06T00:00:00Z) as a Unix timestamp
pub const GPS_EPOCH_UNIX_SECONDS: i64 = 315_964_800;
