// psi/eit_decoder.rs
//! Reassembly of EIT sections into complete tables.
//!
//! One [`EitDecoder`] serves one (table_id, extension) subtable. Sections are
//! admitted in delivery order; a table is produced once every section from 0
//! to `last_section_number` is held for the same version.

use log::{debug, warn};

use super::buffer::SectionBuffer;
use super::eit::{Eit, EitHeader};
use super::section::Section;

/// Outcome of [`EitDecoder::admit`] when something is ready for the consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gathered {
    /// A freshly reassembled and decoded table.
    TableReady(Eit),
    /// The already delivered version became current. Nothing is re-decoded,
    /// so only the updated header is carried.
    StillCurrent(EitHeader),
}

impl Gathered {
    pub fn header(&self) -> EitHeader {
        match self {
            Gathered::TableReady(eit) => eit.header(),
            Gathered::StillCurrent(header) => *header,
        }
    }

    /// The decoded table, if this is one.
    pub fn into_table(self) -> Option<Eit> {
        match self {
            Gathered::TableReady(eit) => Some(eit),
            Gathered::StillCurrent(_) => None,
        }
    }
}

pub struct EitDecoder {
    /// Header of the last delivered table.
    current: Option<EitHeader>,
    building: Option<Eit>,
    last_section_number: u8,
    sections: SectionBuffer,
}

impl EitDecoder {
    pub fn new() -> Self {
        Self {
            current: None,
            building: None,
            last_section_number: 0,
            sections: SectionBuffer::new(),
        }
    }

    pub fn current(&self) -> Option<EitHeader> {
        self.current
    }

    pub fn is_building(&self) -> bool {
        self.building.is_some()
    }

    /// Sections held for the table under construction.
    pub fn buffered(&self) -> usize {
        self.sections.len()
    }

    /// Drops the table under construction, all held sections and the current
    /// snapshot, so the next complete table is decoded and delivered again.
    pub fn reset(&mut self) {
        self.current = None;
        self.building = None;
        self.sections.clear();
    }

    pub fn admit(&mut self, section: Section, discontinuity: bool) -> Option<Gathered> {
        let h = section.header;
        if !h.syntax_indicator {
            warn!("ATSC EIT decoder: invalid section (section_syntax_indicator == 0)");
            return None;
        }

        debug!(
            "ATSC EIT decoder: table version {:2}, table_id {:#04x}, extension {:5}, section {:3} up to {:3}, current {}",
            h.version, h.table_id, h.extension, h.number, h.last_number, h.current_next as u8
        );

        if discontinuity {
            debug!("ATSC EIT decoder: discontinuity, resetting");
            self.reset();
        } else if let Some(building) = &self.building {
            let mismatch = if building.source_id != h.extension {
                Some("'source_id'")
            } else if building.version != h.version {
                Some("'version_number'")
            } else if self.last_section_number != h.last_number {
                Some("'last_section_number'")
            } else {
                None
            };
            if let Some(field) = mismatch {
                warn!("ATSC EIT decoder: {field} differs whereas no discontinuity has occurred");
                self.reset();
            }
        } else if let Some(current) = self.current.as_mut() {
            if current.version == h.version {
                if !current.current_next && h.current_next {
                    current.current_next = true;
                    return Some(Gathered::StillCurrent(*current));
                }
                return None;
            }
        }

        if self.building.is_none() {
            self.building = Some(Eit::new(EitHeader::from_section(&section)));
            self.last_section_number = h.last_number;
        }

        if self.sections.insert(section).is_some() {
            debug!("ATSC EIT decoder: overwrite section number {}", h.number);
        }

        let sections = self.sections.take_complete(self.last_section_number)?;
        let mut eit = self.building.take()?;
        self.current = Some(eit.header());
        eit.decode_sections(&sections);
        self.sections.clear();
        Some(Gathered::TableReady(eit))
    }
}

impl Default for EitDecoder {
    fn default() -> Self {
        Self::new()
    }
}
