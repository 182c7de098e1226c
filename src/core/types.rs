//! Field vocabulary shared by the record, the mapping table, and the encoders.
//!
//! Rule of thumb:
//! - These are "boring" value types
//! - No filesystem code
//! - No container (mp4ameta / id3) types
//!
//! The container libraries only show up in `tags::store`.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::{Result, TagError};

/// Destination tagging scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagFormat {
    /// Atom-based: iTunes-style MP4 `ilst` items.
    Mp4,
    /// Frame-based: ID3v2.
    Id3,
}

impl fmt::Display for TagFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagFormat::Mp4 => f.write_str("MP4"),
            TagFormat::Id3 => f.write_str("ID3"),
        }
    }
}

/// Every canonical metadata field, in declaration (and encode) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Title,
    Album,
    AlbumArtist,
    Artist,
    Track,
    Date,
    Genre,
    Composer,
    Disk,
    Compilation,
    GaplessPlayback,
    Rating,
    MediaType,
    Copyright,
    AccountId,
    PurchaseDate,
    SortName,
    SortAlbum,
    SortAlbumArtist,
    SortArtist,
    SortComposer,
    Lyrics,
    AlbumArt,
    Comment,
}

/// Semantic kind of a field. Decides which `FieldValue` variant it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Ordered (index, total), e.g. track 3 of 12.
    Pair,
    /// Small closed-set integer code.
    Code,
    Image,
}

impl Field {
    pub const COUNT: usize = 24;

    pub const ALL: [Field; Field::COUNT] = [
        Field::Title,
        Field::Album,
        Field::AlbumArtist,
        Field::Artist,
        Field::Track,
        Field::Date,
        Field::Genre,
        Field::Composer,
        Field::Disk,
        Field::Compilation,
        Field::GaplessPlayback,
        Field::Rating,
        Field::MediaType,
        Field::Copyright,
        Field::AccountId,
        Field::PurchaseDate,
        Field::SortName,
        Field::SortAlbum,
        Field::SortAlbumArtist,
        Field::SortArtist,
        Field::SortComposer,
        Field::Lyrics,
        Field::AlbumArt,
        Field::Comment,
    ];

    /// Canonical snake_case name (also the JSON key).
    pub const fn name(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Album => "album",
            Field::AlbumArtist => "album_artist",
            Field::Artist => "artist",
            Field::Track => "track",
            Field::Date => "date",
            Field::Genre => "genre",
            Field::Composer => "composer",
            Field::Disk => "disk",
            Field::Compilation => "compilation",
            Field::GaplessPlayback => "gapless_playback",
            Field::Rating => "rating",
            Field::MediaType => "media_type",
            Field::Copyright => "copyright",
            Field::AccountId => "account_id",
            Field::PurchaseDate => "purchase_date",
            Field::SortName => "sort_name",
            Field::SortAlbum => "sort_album",
            Field::SortAlbumArtist => "sort_album_artist",
            Field::SortArtist => "sort_artist",
            Field::SortComposer => "sort_composer",
            Field::Lyrics => "lyrics",
            Field::AlbumArt => "album_art",
            Field::Comment => "comment",
        }
    }

    pub const fn kind(self) -> FieldKind {
        match self {
            Field::Track | Field::Disk => FieldKind::Pair,
            Field::Compilation | Field::GaplessPlayback | Field::Rating | Field::MediaType => {
                FieldKind::Code
            }
            Field::AlbumArt => FieldKind::Image,
            _ => FieldKind::Text,
        }
    }

    /// Position in `Field::ALL` (and in the mapping table).
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = TagError;

    fn from_str(s: &str) -> Result<Self> {
        Field::ALL
            .iter()
            .copied()
            .find(|f| f.name() == s)
            .ok_or_else(|| TagError::validation(s, "unknown field"))
    }
}

/// iTunes content advisory (`rtng`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rating {
    #[default]
    None,
    Explicit,
    Clean,
    ExplicitOld,
}

impl Rating {
    pub const fn code(self) -> u8 {
        match self {
            Rating::None => 0,
            Rating::Explicit => 1,
            Rating::Clean => 2,
            Rating::ExplicitOld => 4,
        }
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Rating::None),
            1 => Some(Rating::Explicit),
            2 => Some(Rating::Clean),
            4 => Some(Rating::ExplicitOld),
            _ => None,
        }
    }
}

/// iTunes media kind (`stik`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaType {
    MovieOld,
    #[default]
    Music,
    Audiobook,
    WhackedBookmark,
    MusicVideo,
    Movie,
    TvShow,
    Booklet,
    Ringtone,
    Podcast,
    ItunesU,
}

impl MediaType {
    pub const fn code(self) -> u8 {
        match self {
            MediaType::MovieOld => 0,
            MediaType::Music => 1,
            MediaType::Audiobook => 2,
            MediaType::WhackedBookmark => 5,
            MediaType::MusicVideo => 6,
            MediaType::Movie => 9,
            MediaType::TvShow => 10,
            MediaType::Booklet => 11,
            MediaType::Ringtone => 14,
            MediaType::Podcast => 21,
            MediaType::ItunesU => 23,
        }
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(MediaType::MovieOld),
            1 => Some(MediaType::Music),
            2 => Some(MediaType::Audiobook),
            5 => Some(MediaType::WhackedBookmark),
            6 => Some(MediaType::MusicVideo),
            9 => Some(MediaType::Movie),
            10 => Some(MediaType::TvShow),
            11 => Some(MediaType::Booklet),
            14 => Some(MediaType::Ringtone),
            21 => Some(MediaType::Podcast),
            23 => Some(MediaType::ItunesU),
            _ => None,
        }
    }
}

/// Part-of-a-compilation flag (`cpil` / `TCMP`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compilation {
    No,
    Yes,
}

impl Compilation {
    pub const fn code(self) -> u8 {
        match self {
            Compilation::No => 0,
            Compilation::Yes => 1,
        }
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Compilation::No),
            1 => Some(Compilation::Yes),
            _ => None,
        }
    }
}

/// Cover image bytes once they have been pulled off disk.
///
/// Always JPEG: the writers tag it as `image/jpeg` in both formats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverArt {
    pub data: Vec<u8>,
}

impl CoverArt {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Album art is either still a file on disk or already embedded bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlbumArt {
    /// Unresolved: reading it consumes (deletes) the file.
    Path(PathBuf),
    Embedded(CoverArt),
}

impl AlbumArt {
    pub fn is_resolved(&self) -> bool {
        matches!(self, AlbumArt::Embedded(_))
    }
}

/// A borrowed, kind-tagged view of one field's value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Pair(u32, u32),
    Code(u8),
    Art(&'a AlbumArt),
}

impl FieldValue<'_> {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Text(_) => FieldKind::Text,
            FieldValue::Pair(..) => FieldKind::Pair,
            FieldValue::Code(_) => FieldKind::Code,
            FieldValue::Art(_) => FieldKind::Image,
        }
    }

    /// Fail with `Validation` unless this value has the kind `field` expects.
    pub fn expect_kind(&self, field: Field) -> Result<()> {
        if self.kind() == field.kind() {
            Ok(())
        } else {
            Err(TagError::validation(
                field.name(),
                format!("expected a {:?} value, got {:?}", field.kind(), self.kind()),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_round_trip_through_from_str() {
        for field in Field::ALL {
            assert_eq!(field.name().parse::<Field>().unwrap(), field);
        }
        assert!(matches!(
            "nope".parse::<Field>(),
            Err(TagError::Validation { field, .. }) if field == "nope"
        ));
    }

    #[test]
    fn all_is_in_discriminant_order() {
        for (i, field) in Field::ALL.iter().enumerate() {
            assert_eq!(field.index(), i);
        }
    }

    #[test]
    fn closed_sets_reject_unknown_codes() {
        assert_eq!(Rating::from_code(4), Some(Rating::ExplicitOld));
        assert_eq!(Rating::from_code(3), None);
        assert_eq!(MediaType::from_code(21), Some(MediaType::Podcast));
        assert_eq!(MediaType::from_code(3), None);
        assert_eq!(Compilation::from_code(2), None);
    }

    #[test]
    fn album_art_reports_resolution() {
        let empty = CoverArt { data: Vec::new() };
        assert!(empty.is_empty());
        assert_eq!(empty.len(), 0);

        let art = AlbumArt::Embedded(CoverArt { data: vec![0xFF, 0xD8] });
        assert!(art.is_resolved());
        assert!(!AlbumArt::Path("cover.jpg".into()).is_resolved());
    }

    #[test]
    fn wrong_kind_names_the_field() {
        let err = FieldValue::Code(3).expect_kind(Field::Track).unwrap_err();
        match err {
            TagError::Validation { field, .. } => assert_eq!(field, "track"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
