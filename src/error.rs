//! Error types surfaced by the section parser and the subtable demultiplexer.

use thiserror::Error;

/// Structural problems with a raw PSI section.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SectionError {
    #[error("section buffer is empty")]
    Empty,
    #[error("section too short: {0} bytes")]
    TooShort(usize),
    #[error("invalid section_length {0}")]
    InvalidLength(usize),
    #[error("truncated section: declared {declared} bytes, {available} available")]
    Truncated { declared: usize, available: usize },
    #[error("CRC-32 mismatch: section carries {carried:#010x}, computed {computed:#010x}")]
    CrcMismatch { carried: u32, computed: u32 },
}

/// Registration failures of a subtable decoder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DemuxError {
    #[error("already a decoder for (table_id == {table_id:#04x}, extension == {extension:#06x})")]
    AlreadyAttached { table_id: u8, extension: u16 },
    #[error("no such decoder (table_id == {table_id:#04x}, extension == {extension:#06x})")]
    NotAttached { table_id: u8, extension: u16 },
}
