// psi/demux.rs
//! Subtable demultiplexer: routes sections of one PID to the decoder
//! registered for their (table_id, extension).

use std::collections::HashMap;

use log::{debug, error};

use super::eit_decoder::{EitDecoder, Gathered};
use super::section::Section;
use crate::error::DemuxError;

/// Key of a subtable: (table_id, table_id_extension).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubtableId {
    pub table_id:  u8,
    pub extension: u16,
}

impl SubtableId {
    pub fn new(table_id: u8, extension: u16) -> Self {
        Self { table_id, extension }
    }

    pub fn of(section: &Section) -> Self {
        Self::new(section.header.table_id, section.header.extension)
    }
}

/// Receives every section of the subtable it is attached to.
pub trait SubtableDecoder {
    fn gather(&mut self, section: Section, discontinuity: bool);
}

/// EIT reassembly wired to a consumer callback. The callback sees both new
/// tables and "now current" notifications.
pub struct EitSubtable<F> {
    decoder:  EitDecoder,
    callback: F,
}

impl<F: FnMut(Gathered)> EitSubtable<F> {
    pub fn new(callback: F) -> Self {
        Self { decoder: EitDecoder::new(), callback }
    }
}

impl<F: FnMut(Gathered)> SubtableDecoder for EitSubtable<F> {
    fn gather(&mut self, section: Section, discontinuity: bool) {
        if let Some(gathered) = self.decoder.admit(section, discontinuity) {
            (self.callback)(gathered);
        }
    }
}

struct Entry {
    decoder:       Box<dyn SubtableDecoder>,
    discontinuity: bool,
}

#[derive(Default)]
pub struct Demux {
    subtables: HashMap<SubtableId, Entry>,
}

impl Demux {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(
        &mut self,
        table_id: u8,
        extension: u16,
        decoder: Box<dyn SubtableDecoder>,
    ) -> Result<(), DemuxError> {
        let id = SubtableId::new(table_id, extension);
        if self.subtables.contains_key(&id) {
            let err = DemuxError::AlreadyAttached { table_id, extension };
            error!("subtable demux: {err}");
            return Err(err);
        }
        debug!("attached subtable decoder (table_id {table_id:#04x}, extension {extension:#06x})");
        self.subtables.insert(id, Entry { decoder, discontinuity: false });
        Ok(())
    }

    /// Registers an EIT decoder reporting everything it gathers to `callback`.
    pub fn attach_eit<F>(&mut self, table_id: u8, extension: u16, callback: F) -> Result<(), DemuxError>
    where
        F: FnMut(Gathered) + 'static,
    {
        self.attach(table_id, extension, Box::new(EitSubtable::new(callback)))
    }

    /// Unregisters a decoder, dropping everything it holds.
    pub fn detach(&mut self, table_id: u8, extension: u16) -> Result<(), DemuxError> {
        match self.subtables.remove(&SubtableId::new(table_id, extension)) {
            Some(_) => Ok(()),
            None => {
                let err = DemuxError::NotAttached { table_id, extension };
                error!("subtable demux: {err}");
                Err(err)
            }
        }
    }

    pub fn is_attached(&self, table_id: u8, extension: u16) -> bool {
        self.subtables.contains_key(&SubtableId::new(table_id, extension))
    }

    pub fn len(&self) -> usize {
        self.subtables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subtables.is_empty()
    }

    /// Flags a transport gap. Each subtable sees it on its next section.
    pub fn signal_discontinuity(&mut self) {
        for entry in self.subtables.values_mut() {
            entry.discontinuity = true;
        }
    }

    /// Hands `section` to its subtable decoder. A section nobody is attached
    /// for is given back.
    pub fn push_section(&mut self, section: Section) -> Option<Section> {
        let Some(entry) = self.subtables.get_mut(&SubtableId::of(&section)) else {
            return Some(section);
        };
        let discontinuity = std::mem::take(&mut entry.discontinuity);
        entry.decoder.gather(section, discontinuity);
        None
    }
}
