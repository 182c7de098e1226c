//! core/tags/encode.rs
//!
//! Turns canonical field values into destination-native tag values.
//!
//! The mapping row decides the shape; this module only knows how to build
//! each shape. Nothing here touches a file: encoding a record with unresolved
//! album art is a validation error, and the `encode_for_*` helpers resolve the
//! art first.

use std::fmt;

use id3::Encoding;
use id3::frame::PictureType;
use tracing::debug;

use super::super::error::{Result, TagError};
use super::super::record::CanonicalRecord;
use super::super::types::{AlbumArt, CoverArt, Field, FieldValue, TagFormat};
use super::mapping::{AtomKey, AtomShape, FrameShape, mapping};
use super::util::format_slash_pair;

/// MIME type written for every embedded cover.
pub const COVER_MIME: &str = "image/jpeg";

/// A value ready to be stored under an MP4 atom key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtomValue {
    Text(String),
    /// (index, total); MP4 stores both as u16.
    Pair(u16, u16),
    Integer(u8),
    /// JPEG bytes for `covr`.
    Cover(Vec<u8>),
}

/// A value ready to be stored under an ID3 frame id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameValue {
    Text(String),
    DescribedText {
        description: String,
        text: String,
    },
    Lyrics {
        encoding: Encoding,
        text: String,
    },
    Picture {
        mime_type: String,
        picture_type: PictureType,
        data: Vec<u8>,
    },
}

/// Runtime-format result of [`encode_field`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodedTag {
    Atom(AtomKey, AtomValue),
    Frame(&'static str, FrameValue),
}

/// A destination tagging scheme: its key/value vocabulary plus the rules for
/// producing them from canonical values.
pub trait TagScheme {
    const FORMAT: TagFormat;
    type Key: Copy + PartialEq + fmt::Debug;
    type Value: Clone + PartialEq + fmt::Debug;

    /// `Ok(None)` when the field has no mapping in this scheme.
    fn encode(field: Field, value: FieldValue<'_>) -> Result<Option<(Self::Key, Self::Value)>>;
}

/// iTunes-style MP4 atoms.
#[derive(Debug, Clone)]
pub enum Mp4Atoms {}

/// ID3v2 frames.
#[derive(Debug, Clone)]
pub enum Id3Frames {}

impl TagScheme for Mp4Atoms {
    const FORMAT: TagFormat = TagFormat::Mp4;
    type Key = AtomKey;
    type Value = AtomValue;

    fn encode(field: Field, value: FieldValue<'_>) -> Result<Option<(AtomKey, AtomValue)>> {
        value.expect_kind(field)?;
        let row = mapping(field);

        let encoded = match (row.atom_shape, value) {
            (AtomShape::Utf8, FieldValue::Text(s)) => AtomValue::Text(s.to_owned()),
            (AtomShape::Pair, FieldValue::Pair(n, total)) => {
                AtomValue::Pair(fit_u16(field, n)?, fit_u16(field, total)?)
            }
            (AtomShape::Integer, FieldValue::Code(code)) => AtomValue::Integer(code),
            (AtomShape::Cover, FieldValue::Art(art)) => {
                AtomValue::Cover(embedded(field, art)?.data.clone())
            }
            (shape, v) => return Err(shape_mismatch(field, v, shape)),
        };
        Ok(Some((row.atom, encoded)))
    }
}

impl TagScheme for Id3Frames {
    const FORMAT: TagFormat = TagFormat::Id3;
    type Key = &'static str;
    type Value = FrameValue;

    fn encode(field: Field, value: FieldValue<'_>) -> Result<Option<(&'static str, FrameValue)>> {
        value.expect_kind(field)?;
        let Some(frame) = mapping(field).frame else {
            return Ok(None);
        };

        let encoded = match (frame.shape, value) {
            (FrameShape::Text, FieldValue::Text(s)) => FrameValue::Text(s.to_owned()),
            (FrameShape::Text, FieldValue::Code(code)) => FrameValue::Text(code.to_string()),
            (FrameShape::SlashPair, FieldValue::Pair(n, total)) => {
                FrameValue::Text(format_slash_pair(n, total))
            }
            (FrameShape::DescribedText, FieldValue::Text(s)) => FrameValue::DescribedText {
                description: field.name().to_owned(),
                text: s.to_owned(),
            },
            (FrameShape::Comment, FieldValue::Text(s)) => FrameValue::DescribedText {
                description: s.to_owned(),
                text: s.to_owned(),
            },
            (FrameShape::Lyrics, FieldValue::Text(s)) => FrameValue::Lyrics {
                encoding: Encoding::UTF8,
                text: s.to_owned(),
            },
            (FrameShape::Picture, FieldValue::Art(art)) => FrameValue::Picture {
                mime_type: COVER_MIME.to_owned(),
                picture_type: PictureType::CoverFront,
                data: embedded(field, art)?.data.clone(),
            },
            (shape, v) => return Err(shape_mismatch(field, v, shape)),
        };
        Ok(Some((frame.id, encoded)))
    }
}

fn fit_u16(field: Field, n: u32) -> Result<u16> {
    u16::try_from(n)
        .map_err(|_| TagError::validation(field.name(), format!("{n} does not fit an MP4 pair")))
}

fn embedded(field: Field, art: &AlbumArt) -> Result<&CoverArt> {
    match art {
        AlbumArt::Embedded(cover) => Ok(cover),
        AlbumArt::Path(path) => Err(TagError::validation(
            field.name(),
            format!("{} has not been resolved yet", path.display()),
        )),
    }
}

fn shape_mismatch(field: Field, value: FieldValue<'_>, shape: impl fmt::Debug) -> TagError {
    TagError::validation(
        field.name(),
        format!("a {:?} value cannot be written as {shape:?}", value.kind()),
    )
}

/// Encode one value for a format chosen at runtime.
pub fn encode_field(
    field: Field,
    value: FieldValue<'_>,
    format: TagFormat,
) -> Result<Option<EncodedTag>> {
    Ok(match format {
        TagFormat::Mp4 => Mp4Atoms::encode(field, value)?.map(|(k, v)| EncodedTag::Atom(k, v)),
        TagFormat::Id3 => Id3Frames::encode(field, value)?.map(|(k, v)| EncodedTag::Frame(k, v)),
    })
}

/// Project a record onto scheme `S`, in field declaration order.
///
/// Pure. All-or-nothing: the first invalid field fails the whole projection.
pub fn encode_resolved<S: TagScheme>(record: &CanonicalRecord) -> Result<Vec<(S::Key, S::Value)>> {
    let format = S::FORMAT;
    let mut out = Vec::with_capacity(Field::COUNT);

    for field in Field::ALL {
        let Some(value) = record.value(field) else {
            continue;
        };
        match S::encode(field, value)? {
            Some(pair) => out.push(pair),
            None => debug!(field = field.name(), format = %format, "no mapping, skipped"),
        }
    }

    Ok(out)
}

/// Resolve album art (one-time side effect), then project onto MP4 atoms.
pub fn encode_for_mp4(record: &mut CanonicalRecord) -> Result<Vec<(AtomKey, AtomValue)>> {
    record.resolve_album_art()?;
    encode_resolved::<Mp4Atoms>(record)
}

/// Resolve album art (one-time side effect), then project onto ID3 frames.
pub fn encode_for_id3(record: &mut CanonicalRecord) -> Result<Vec<(&'static str, FrameValue)>> {
    record.resolve_album_art()?;
    encode_resolved::<Id3Frames>(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Compilation, MediaType, Rating};

    fn frame_of<'a>(frames: &'a [(&'static str, FrameValue)], id: &str) -> Option<&'a FrameValue> {
        frames.iter().find(|(k, _)| *k == id).map(|(_, v)| v)
    }

    #[test]
    fn track_is_a_pair_for_mp4_and_slash_text_for_id3() {
        let mut r = CanonicalRecord::new();
        r.track = Some((3, 12));

        let atoms = encode_resolved::<Mp4Atoms>(&r).unwrap();
        assert!(atoms.contains(&(AtomKey(*b"trkn"), AtomValue::Pair(3, 12))));

        let frames = encode_resolved::<Id3Frames>(&r).unwrap();
        assert_eq!(frame_of(&frames, "TRCK"), Some(&FrameValue::Text("3/12".into())));
        assert_eq!(frame_of(&frames, "TPOS"), Some(&FrameValue::Text("1/1".into())));
    }

    #[test]
    fn itunes_only_fields_are_omitted_from_id3() {
        let mut r = CanonicalRecord::new();
        r.rating = Rating::Explicit;
        r.media_type = MediaType::Audiobook;
        r.gapless_playback = Some(true);
        r.account_id = Some("someone@example.com".into());
        r.purchase_date = Some("2020-01-01 00:00:00".into());

        let frames = encode_resolved::<Id3Frames>(&r).unwrap();
        let ids: Vec<_> = frames.iter().map(|(k, _)| *k).collect();
        assert_eq!(ids, vec!["TPOS"]);

        let atoms = encode_resolved::<Mp4Atoms>(&r).unwrap();
        assert!(atoms.contains(&(AtomKey(*b"rtng"), AtomValue::Integer(1))));
        assert!(atoms.contains(&(AtomKey(*b"stik"), AtomValue::Integer(2))));
        assert!(atoms.contains(&(AtomKey(*b"pgap"), AtomValue::Integer(1))));
        assert!(atoms.contains(&(AtomKey(*b"apID"), AtomValue::Text("someone@example.com".into()))));
    }

    #[test]
    fn sort_fields_carry_their_name_as_description() {
        let value = FieldValue::Text("Beatles, The");

        assert_eq!(
            encode_field(Field::SortArtist, value, TagFormat::Id3).unwrap(),
            Some(EncodedTag::Frame(
                "TSOP",
                FrameValue::DescribedText {
                    description: "sort_artist".into(),
                    text: "Beatles, The".into(),
                }
            ))
        );
        assert_eq!(
            encode_field(Field::SortArtist, value, TagFormat::Mp4).unwrap(),
            Some(EncodedTag::Atom(AtomKey(*b"soar"), AtomValue::Text("Beatles, The".into())))
        );
    }

    #[test]
    fn comment_and_lyrics_shapes() {
        let (id, comment) = Id3Frames::encode(Field::Comment, FieldValue::Text("nice"))
            .unwrap()
            .unwrap();
        assert_eq!(id, "COMM");
        assert_eq!(
            comment,
            FrameValue::DescribedText { description: "nice".into(), text: "nice".into() }
        );

        let (id, lyrics) = Id3Frames::encode(Field::Lyrics, FieldValue::Text("la la"))
            .unwrap()
            .unwrap();
        assert_eq!(id, "USLT");
        assert_eq!(lyrics, FrameValue::Lyrics { encoding: Encoding::UTF8, text: "la la".into() });
    }

    #[test]
    fn compilation_goes_through_its_mapping_in_both_formats() {
        let mut r = CanonicalRecord::new();
        r.compilation = Some(Compilation::Yes);

        let frames = encode_resolved::<Id3Frames>(&r).unwrap();
        assert_eq!(frame_of(&frames, "TCMP"), Some(&FrameValue::Text("1".into())));

        let atoms = encode_resolved::<Mp4Atoms>(&r).unwrap();
        assert!(atoms.contains(&(AtomKey(*b"cpil"), AtomValue::Integer(1))));
    }

    #[test]
    fn embedded_art_becomes_a_front_cover() {
        let art = AlbumArt::Embedded(CoverArt { data: vec![7; 16] });

        let (_, frame) = Id3Frames::encode(Field::AlbumArt, FieldValue::Art(&art)).unwrap().unwrap();
        assert_eq!(
            frame,
            FrameValue::Picture {
                mime_type: "image/jpeg".into(),
                picture_type: PictureType::CoverFront,
                data: vec![7; 16],
            }
        );

        let (key, atom) = Mp4Atoms::encode(Field::AlbumArt, FieldValue::Art(&art)).unwrap().unwrap();
        assert_eq!(key, AtomKey(*b"covr"));
        assert_eq!(atom, AtomValue::Cover(vec![7; 16]));
    }

    #[test]
    fn unresolved_art_does_not_reach_the_pure_encoder() {
        let mut r = CanonicalRecord::new();
        r.album_art = Some(AlbumArt::Path("cover.jpg".into()));
        assert!(matches!(
            encode_resolved::<Id3Frames>(&r),
            Err(TagError::Validation { field, .. }) if field == "album_art"
        ));
    }

    #[test]
    fn malformed_values_fail_validation() {
        for format in [TagFormat::Mp4, TagFormat::Id3] {
            assert!(matches!(
                encode_field(Field::Track, FieldValue::Code(3), format),
                Err(TagError::Validation { field, .. }) if field == "track"
            ));
        }
        assert!(matches!(
            encode_field(Field::Track, FieldValue::Pair(70_000, 1), TagFormat::Mp4),
            Err(TagError::Validation { .. })
        ));
        // Wrong kind is reported even when the format has no mapping for the field.
        assert!(encode_field(Field::Rating, FieldValue::Text("x"), TagFormat::Id3).is_err());
        assert_eq!(encode_field(Field::Rating, FieldValue::Code(1), TagFormat::Id3).unwrap(), None);
    }
}
