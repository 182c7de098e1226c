//! core/tags/mapping.rs
//!
//! The field -> tag table.
//!
//! One row per canonical field, in `Field::ALL` order, so a lookup is a plain
//! index. Each row carries:
//! - the MP4 atom key (every field has one) and how the value is laid out
//! - the ID3 frame id and payload shape, if the field has a frame at all
//!
//! Adding a field or changing where it lands is a one-row change here.

use std::fmt;

use super::super::types::{Field, TagFormat};
use super::util::latin1_to_string;

/// Four-byte iTunes atom key, e.g. `©nam` or `trkn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AtomKey(pub [u8; 4]);

impl AtomKey {
    pub const fn bytes(self) -> [u8; 4] {
        self.0
    }
}

impl fmt::Display for AtomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&latin1_to_string(&self.0))
    }
}

/// How a value is laid out inside an MP4 data atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtomShape {
    Utf8,
    /// (index, total) in the reserved binary layout of `trkn` / `disk`.
    Pair,
    /// Single big-endian integer byte.
    Integer,
    /// JPEG image data.
    Cover,
}

/// Which ID3 payload shape a frame takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameShape {
    /// Plain text frame; the value is cast to a string.
    Text,
    /// "index/total" text (TRCK, TPOS).
    SlashPair,
    /// description = canonical field name, text = value.
    DescribedText,
    /// description = text = value.
    Comment,
    /// Unsynchronised lyrics with an encoding marker, no language/description.
    Lyrics,
    /// Attached picture, `image/jpeg`, front cover.
    Picture,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameKey {
    pub id: &'static str,
    pub shape: FrameShape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mapping {
    pub field: Field,
    pub atom: AtomKey,
    pub atom_shape: AtomShape,
    /// `None`: the field has no ID3 equivalent and is skipped for MP3s.
    pub frame: Option<FrameKey>,
}

/// Result of a lookup in one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKey {
    Atom(AtomKey),
    Frame(FrameKey),
}

const fn row(
    field: Field,
    atom: &[u8; 4],
    atom_shape: AtomShape,
    frame: Option<(&'static str, FrameShape)>,
) -> Mapping {
    let frame = match frame {
        Some((id, shape)) => Some(FrameKey { id, shape }),
        None => None,
    };
    Mapping {
        field,
        atom: AtomKey(*atom),
        atom_shape,
        frame,
    }
}

use AtomShape as A;
use FrameShape as F;

pub static MAPPINGS: [Mapping; Field::COUNT] = [
    row(Field::Title, b"\xa9nam", A::Utf8, Some(("TIT2", F::Text))),
    row(Field::Album, b"\xa9alb", A::Utf8, Some(("TALB", F::Text))),
    row(Field::AlbumArtist, b"aART", A::Utf8, Some(("TPE2", F::Text))),
    row(Field::Artist, b"\xa9ART", A::Utf8, Some(("TPE1", F::Text))),
    row(Field::Track, b"trkn", A::Pair, Some(("TRCK", F::SlashPair))),
    row(Field::Date, b"\xa9day", A::Utf8, Some(("TDRC", F::Text))),
    row(Field::Genre, b"\xa9gen", A::Utf8, Some(("TCON", F::Text))),
    row(Field::Composer, b"\xa9wrt", A::Utf8, Some(("TCOM", F::Text))),
    row(Field::Disk, b"disk", A::Pair, Some(("TPOS", F::SlashPair))),
    row(Field::Compilation, b"cpil", A::Integer, Some(("TCMP", F::Text))),
    row(Field::GaplessPlayback, b"pgap", A::Integer, None),
    row(Field::Rating, b"rtng", A::Integer, None),
    row(Field::MediaType, b"stik", A::Integer, None),
    row(Field::Copyright, b"cprt", A::Utf8, Some(("TCOP", F::Text))),
    row(Field::AccountId, b"apID", A::Utf8, None),
    row(Field::PurchaseDate, b"purd", A::Utf8, None),
    row(Field::SortName, b"sonm", A::Utf8, Some(("TSOT", F::DescribedText))),
    row(Field::SortAlbum, b"soal", A::Utf8, Some(("TSOA", F::DescribedText))),
    row(Field::SortAlbumArtist, b"soaa", A::Utf8, Some(("TSO2", F::DescribedText))),
    row(Field::SortArtist, b"soar", A::Utf8, Some(("TSOP", F::DescribedText))),
    row(Field::SortComposer, b"soco", A::Utf8, Some(("TSOC", F::DescribedText))),
    row(Field::Lyrics, b"\xa9lyr", A::Utf8, Some(("USLT", F::Lyrics))),
    row(Field::AlbumArt, b"covr", A::Cover, Some(("APIC", F::Picture))),
    row(Field::Comment, b"\xa9cmt", A::Utf8, Some(("COMM", F::Comment))),
];

pub fn mapping(field: Field) -> &'static Mapping {
    &MAPPINGS[field.index()]
}

/// Where `field` lands in `format`. Never `None` for MP4.
pub fn lookup(field: Field, format: TagFormat) -> Option<TagKey> {
    let m = mapping(field);
    match format {
        TagFormat::Mp4 => Some(TagKey::Atom(m.atom)),
        TagFormat::Id3 => m.frame.map(TagKey::Frame),
    }
}

/// Same as [`lookup`], by canonical name. Unknown names are simply `None`.
pub fn lookup_name(name: &str, format: TagFormat) -> Option<TagKey> {
    name.parse::<Field>().ok().and_then(|f| lookup(f, format))
}

pub fn field_for_atom(key: AtomKey) -> Option<Field> {
    MAPPINGS.iter().find(|m| m.atom == key).map(|m| m.field)
}

pub fn field_for_frame(id: &str) -> Option<Field> {
    MAPPINGS
        .iter()
        .find(|m| m.frame.is_some_and(|f| f.id == id))
        .map(|m| m.field)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    const NO_FRAME: [Field; 5] = [
        Field::Rating,
        Field::MediaType,
        Field::GaplessPlayback,
        Field::AccountId,
        Field::PurchaseDate,
    ];

    #[test]
    fn rows_follow_field_order() {
        for field in Field::ALL {
            assert_eq!(mapping(field).field, field, "row out of place for {field}");
        }
    }

    #[test]
    fn every_field_has_an_atom() {
        for field in Field::ALL {
            assert!(matches!(lookup(field, TagFormat::Mp4), Some(TagKey::Atom(_))));
        }
    }

    #[test]
    fn only_itunes_specific_fields_lack_a_frame() {
        for field in Field::ALL {
            let frame = lookup(field, TagFormat::Id3);
            assert_eq!(frame.is_none(), NO_FRAME.contains(&field), "{field}");
        }
    }

    #[test]
    fn keys_are_unique_per_format() {
        let atoms: HashSet<_> = MAPPINGS.iter().map(|m| m.atom).collect();
        assert_eq!(atoms.len(), Field::COUNT);

        let frames: Vec<_> = MAPPINGS.iter().filter_map(|m| m.frame).map(|f| f.id).collect();
        let unique: HashSet<_> = frames.iter().collect();
        assert_eq!(unique.len(), frames.len());
    }

    #[test]
    fn shapes_are_declared_per_row() {
        for field in [
            Field::SortName,
            Field::SortAlbum,
            Field::SortAlbumArtist,
            Field::SortArtist,
            Field::SortComposer,
        ] {
            assert_eq!(mapping(field).frame.unwrap().shape, FrameShape::DescribedText);
        }
        assert_eq!(mapping(Field::Track).atom_shape, AtomShape::Pair);
        assert_eq!(mapping(Field::Comment).frame.unwrap().shape, FrameShape::Comment);
        assert_eq!(mapping(Field::Lyrics).frame.unwrap().shape, FrameShape::Lyrics);
    }

    #[test]
    fn lookup_by_name_and_reverse() {
        assert_eq!(lookup_name("disk", TagFormat::Mp4), Some(TagKey::Atom(AtomKey(*b"disk"))));
        assert_eq!(
            lookup_name("disk", TagFormat::Id3),
            Some(TagKey::Frame(FrameKey { id: "TPOS", shape: FrameShape::SlashPair }))
        );
        assert_eq!(lookup_name("", TagFormat::Mp4), None);
        assert_eq!(lookup_name("account_id", TagFormat::Id3), None);

        assert_eq!(field_for_atom(AtomKey(*b"\xa9nam")), Some(Field::Title));
        assert_eq!(field_for_frame("TSOP"), Some(Field::SortArtist));
        assert_eq!(field_for_frame("TXXX"), None);
        assert_eq!(AtomKey(*b"\xa9day").to_string(), "©day");
    }
}
