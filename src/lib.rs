// src/lib.rs
//! ATSC PSIP Event Information Table reassembly and decoding.
//!
//! Sections of one (table_id, extension) subtable are gathered by
//! [`psi::EitDecoder`] until the table is complete, then decoded into
//! events and handed to a consumer through [`psi::Demux`].

pub mod inspector {
    pub use crate::types::{Input, Options};

    /// Async entry-point; returns at end of input or on Ctrl-C
    pub async fn run(opts: Options) -> anyhow::Result<()> {
        crate::core::run(opts).await
    }
}

pub mod constants;
pub mod error;
pub mod network;
pub mod processor;
pub mod psi;
pub mod report;
pub mod ts;
pub mod types;
mod core;

pub use error::{DemuxError, SectionError};
