//! core/tags/mod.rs
//!
//! MP4 atom / ID3 frame writing.
//! Public API:
//! - [`lookup`] tells where a field lands in a format (or that it doesn't).
//! - [`encode_for_mp4`] / [`encode_for_id3`] project a record without touching a container.
//! - [`resolve_album_art`] is the one-shot image read + delete, on its own.
//! - [`write_to_container`] applies a record to an open [`TagStore`].
//! - [`add_to_mp4`] / [`add_to_mp3`] do open + write for a file path.

mod art;
mod encode;
mod mapping;
mod store;
pub(crate) mod util;
mod write;

pub use art::{Cleanup, Resolved, resolve_album_art};
pub use encode::{
    AtomValue, COVER_MIME, EncodedTag, FrameValue, Id3Frames, Mp4Atoms, TagScheme, encode_field,
    encode_for_id3, encode_for_mp4, encode_resolved,
};
pub use mapping::{
    AtomKey, AtomShape, FrameKey, FrameShape, MAPPINGS, Mapping, TagKey, field_for_atom,
    field_for_frame, lookup, lookup_name, mapping,
};
pub use store::{Id3Store, MemoryStore, Mp4Store, TagStore};
pub use write::{FileWrite, WriteReport, WriteState, add_to_mp3, add_to_mp4, write_to_container};
