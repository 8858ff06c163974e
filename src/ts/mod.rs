//! Transport-stream side of the pipeline: packet headers and section
//! reassembly from packet payloads.

pub mod collector;
pub mod packet;

pub use collector::{Collected, SectionCollector};
pub use packet::TsPacket;
