// psi/buffer.rs
//! Section slots indexed by section_number.

use super::section::Section;
use crate::constants::SECTION_SLOTS;

/// Holds at most one section per section_number (0..=255).
pub struct SectionBuffer {
    slots: Vec<Option<Section>>,
}

impl SectionBuffer {
    pub fn new() -> Self {
        Self { slots: (0..SECTION_SLOTS).map(|_| None).collect() }
    }

    /// Stores `section` in its slot and returns the section it replaced.
    pub fn insert(&mut self, section: Section) -> Option<Section> {
        let slot = section.header.number as usize;
        self.slots[slot].replace(section)
    }

    pub fn get(&self, number: u8) -> Option<&Section> {
        self.slots[number as usize].as_ref()
    }

    /// True when every slot `0..=last` is occupied.
    pub fn is_complete(&self, last: u8) -> bool {
        self.slots[..=last as usize].iter().all(Option::is_some)
    }

    /// Removes slots `0..=last` in section_number order. Returns `None`, leaving
    /// the buffer untouched, unless all of them are occupied.
    pub fn take_complete(&mut self, last: u8) -> Option<Vec<Section>> {
        if !self.is_complete(last) {
            return None;
        }
        self.slots[..=last as usize].iter_mut().map(Option::take).collect()
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}

impl Default for SectionBuffer {
    fn default() -> Self {
        Self::new()
    }
}
