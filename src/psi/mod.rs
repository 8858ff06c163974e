pub mod buffer;
pub mod demux;
pub mod descriptor;
pub mod eit;
pub mod eit_decoder;
pub mod section;

#[cfg(test)]
pub(crate) mod fixtures;

pub use demux::{Demux, EitSubtable, SubtableDecoder, SubtableId};
pub use descriptor::{Descriptor, DescriptorKind, LcnDescriptor, LcnEntry};
pub use eit::{Eit, EitEvent, EitHeader};
pub use eit_decoder::{EitDecoder, Gathered};
pub use section::{Section, SectionHeader};
