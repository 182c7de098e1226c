//! tagsmith
//!
//! Writes one canonical, format-agnostic metadata record into either of two
//! tagging schemes:
//! - MP4 / M4A files (iTunes `ilst` atoms, via `mp4ameta`)
//! - MP3 files (ID3v2 frames, via `id3`)
//!
//! The interesting part is `core::tags::mapping`: one table says where each
//! canonical field lands in each format and what payload shape it takes.
//! Everything else reads from it.
//!
//! Typical use:
//!
//! ```no_run
//! use tagsmith::{CanonicalRecord, WriterConfig, add_to_mp3};
//!
//! let mut record = CanonicalRecord::from_json(r#"{"title": "Song", "track": [1, 12]}"#)?;
//! add_to_mp3(&mut record, "song.mp3", &WriterConfig::default())?;
//! # Ok::<(), tagsmith::TagError>(())
//! ```

pub mod core;

pub use crate::core::config::{Id3Version, WriterConfig};
pub use crate::core::error::{Result, TagError};
pub use crate::core::record::CanonicalRecord;
pub use crate::core::tags::{
    AtomKey, AtomValue, Cleanup, EncodedTag, FileWrite, FrameKey, FrameShape, FrameValue, Id3Frames,
    Id3Store, MemoryStore, Mp4Atoms, Mp4Store, Resolved, TagKey, TagScheme, TagStore,
    WriteReport, WriteState, add_to_mp3, add_to_mp4, encode_field, encode_for_id3,
    encode_for_mp4, encode_resolved, lookup, lookup_name, resolve_album_art, write_to_container,
};
pub use crate::core::types::{
    AlbumArt, Compilation, CoverArt, Field, FieldKind, FieldValue, MediaType, Rating, TagFormat,
};
