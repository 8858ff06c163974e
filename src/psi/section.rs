// psi/section.rs
//! Owned PSI section with CRC-32 (MPEG-2) validation.

use bytes::Bytes;
use crc::{Crc, CRC_32_MPEG_2};

use crate::constants::{CRC_SIZE, LONG_HEADER_SIZE, SECTION_HEADER_SIZE};
use crate::error::SectionError;

const CRC_MPEG: Crc<u32> = Crc::<u32>::new(&CRC_32_MPEG_2);

/// Fixed header fields of a section.
///
/// For short-form sections (`syntax_indicator == false`) every field past
/// `table_id` is zero, except `current_next` which reads as set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionHeader {
    pub table_id:         u8,
    pub syntax_indicator: bool,
    pub extension:        u16,
    pub version:          u8,
    pub current_next:     bool,
    pub number:           u8,
    pub last_number:      u8,
}

/// One section handed over by the demultiplexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub header:  SectionHeader,
    /// Bytes between the fixed header and the CRC.
    pub payload: Bytes,
}

impl Section {
    pub fn new(header: SectionHeader, payload: Bytes) -> Self {
        Self { header, payload }
    }

    /// Parses a section starting at `table_id` (pointer field already removed).
    /// Long-form sections must carry a valid CRC-32.
    pub fn parse(data: &[u8]) -> Result<Self, SectionError> {
        if data.is_empty() { return Err(SectionError::Empty) }
        if data.len() < SECTION_HEADER_SIZE { return Err(SectionError::TooShort(data.len())) }

        let table_id         = data[0];
        let syntax_indicator = data[1] & 0x80 != 0;
        let sec_len          = (((data[1] & 0x0F) as usize) << 8) | data[2] as usize;
        let end              = SECTION_HEADER_SIZE + sec_len;
        if end > data.len() {
            return Err(SectionError::Truncated { declared: end, available: data.len() });
        }

        if !syntax_indicator {
            let header = SectionHeader {
                table_id,
                syntax_indicator,
                extension: 0,
                version: 0,
                current_next: true,
                number: 0,
                last_number: 0,
            };
            return Ok(Self::new(header, Bytes::copy_from_slice(&data[SECTION_HEADER_SIZE..end])));
        }

        if end < LONG_HEADER_SIZE + CRC_SIZE {
            return Err(SectionError::InvalidLength(sec_len));
        }

        let computed = CRC_MPEG.checksum(&data[..end - CRC_SIZE]);
        let carried  = u32::from_be_bytes([data[end - 4], data[end - 3], data[end - 2], data[end - 1]]);
        if computed != carried {
            return Err(SectionError::CrcMismatch { carried, computed });
        }

        let header = SectionHeader {
            table_id,
            syntax_indicator,
            extension:    u16::from_be_bytes([data[3], data[4]]),
            version:      (data[5] & 0x3E) >> 1,
            current_next: data[5] & 0x01 != 0,
            number:       data[6],
            last_number:  data[7],
        };
        Ok(Self::new(header, Bytes::copy_from_slice(&data[LONG_HEADER_SIZE..end - CRC_SIZE])))
    }

    /// First payload byte; the protocol version for ATSC tables.
    pub fn protocol(&self) -> u8 {
        self.payload.first().copied().unwrap_or_default()
    }
}

/// Computes the MPEG-2 CRC-32 of `data`.
pub fn crc32(data: &[u8]) -> u32 {
    CRC_MPEG.checksum(data)
}
