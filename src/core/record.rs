//! The canonical metadata record.
//!
//! One plain struct with one field per canonical metadata attribute. Upstream
//! resolvers usually hand us JSON, so ingestion from a JSON object lives here
//! too, with validation done up front: a malformed document never yields a
//! half-filled record.

use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{Map, Value};

use super::error::{Result, TagError};
use super::tags::util::parse_boolish;
use super::types::{AlbumArt, Compilation, Field, FieldKind, FieldValue, MediaType, Rating};

/// Every metadata field a file may carry, independent of destination format.
///
/// `None` means "not provided"; the writers skip it. `disk`, `rating` and
/// `media_type` always have a value (see `Default`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct CanonicalRecord {
    pub title: Option<String>,
    pub album: Option<String>,
    pub album_artist: Option<String>,
    pub artist: Option<String>,
    /// (track number, total tracks)
    pub track: Option<(u32, u32)>,
    pub date: Option<String>,
    pub genre: Option<String>,
    pub composer: Option<String>,
    /// (disc number, total discs)
    pub disk: (u32, u32),
    pub compilation: Option<Compilation>,
    pub gapless_playback: Option<bool>,
    pub rating: Rating,
    pub media_type: MediaType,
    pub copyright: Option<String>,
    pub account_id: Option<String>,
    pub purchase_date: Option<String>,
    pub sort_name: Option<String>,
    pub sort_album: Option<String>,
    pub sort_album_artist: Option<String>,
    pub sort_artist: Option<String>,
    pub sort_composer: Option<String>,
    pub lyrics: Option<String>,
    pub album_art: Option<AlbumArt>,
    pub comment: Option<String>,
}

impl Default for CanonicalRecord {
    fn default() -> Self {
        Self {
            title: None,
            album: None,
            album_artist: None,
            artist: None,
            track: None,
            date: None,
            genre: None,
            composer: None,
            disk: (1, 1),
            compilation: None,
            gapless_playback: None,
            rating: Rating::None,
            media_type: MediaType::Music,
            copyright: None,
            account_id: None,
            purchase_date: None,
            sort_name: None,
            sort_album: None,
            sort_album_artist: None,
            sort_artist: None,
            sort_composer: None,
            lyrics: None,
            album_art: None,
            comment: None,
        }
    }
}

fn text(v: &Option<String>) -> Option<FieldValue<'_>> {
    v.as_deref().map(FieldValue::Text)
}

impl CanonicalRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object keyed by canonical field names.
    pub fn from_json(json: &str) -> Result<Self> {
        let map: Map<String, Value> = serde_json::from_str(json)
            .map_err(|e| TagError::validation("record", format!("not a JSON object: {e}")))?;
        Self::try_from(map)
    }

    /// Borrowed view of one field, or `None` when it is absent.
    pub fn value(&self, field: Field) -> Option<FieldValue<'_>> {
        match field {
            Field::Title => text(&self.title),
            Field::Album => text(&self.album),
            Field::AlbumArtist => text(&self.album_artist),
            Field::Artist => text(&self.artist),
            Field::Track => self.track.map(|(n, total)| FieldValue::Pair(n, total)),
            Field::Date => text(&self.date),
            Field::Genre => text(&self.genre),
            Field::Composer => text(&self.composer),
            Field::Disk => Some(FieldValue::Pair(self.disk.0, self.disk.1)),
            Field::Compilation => self.compilation.map(|c| FieldValue::Code(c.code())),
            Field::GaplessPlayback => self.gapless_playback.map(|g| FieldValue::Code(u8::from(g))),
            Field::Rating => Some(FieldValue::Code(self.rating.code())),
            Field::MediaType => Some(FieldValue::Code(self.media_type.code())),
            Field::Copyright => text(&self.copyright),
            Field::AccountId => text(&self.account_id),
            Field::PurchaseDate => text(&self.purchase_date),
            Field::SortName => text(&self.sort_name),
            Field::SortAlbum => text(&self.sort_album),
            Field::SortAlbumArtist => text(&self.sort_album_artist),
            Field::SortArtist => text(&self.sort_artist),
            Field::SortComposer => text(&self.sort_composer),
            Field::Lyrics => text(&self.lyrics),
            Field::AlbumArt => self.album_art.as_ref().map(FieldValue::Art),
            Field::Comment => text(&self.comment),
        }
    }

    /// Assign a loosely-typed value. Nothing changes unless the value fits.
    pub fn set(&mut self, field: Field, value: FieldValue<'_>) -> Result<()> {
        value.expect_kind(field)?;

        match value {
            FieldValue::Text(s) => {
                if let Some(slot) = self.text_slot_mut(field) {
                    *slot = Some(s.to_string());
                }
            }
            FieldValue::Pair(n, total) => match field {
                Field::Track => self.track = Some((n, total)),
                _ => self.disk = (n, total),
            },
            FieldValue::Code(code) => self.set_code(field, code)?,
            FieldValue::Art(art) => self.album_art = Some(art.clone()),
        }
        Ok(())
    }

    fn set_code(&mut self, field: Field, code: u8) -> Result<()> {
        let out_of_set = || TagError::validation(field.name(), format!("code {code} is not allowed"));
        match field {
            Field::Compilation => {
                self.compilation = Some(Compilation::from_code(code).ok_or_else(out_of_set)?)
            }
            Field::GaplessPlayback => {
                self.gapless_playback = Some(match code {
                    0 => false,
                    1 => true,
                    _ => return Err(out_of_set()),
                })
            }
            Field::Rating => self.rating = Rating::from_code(code).ok_or_else(out_of_set)?,
            Field::MediaType => {
                self.media_type = MediaType::from_code(code).ok_or_else(out_of_set)?
            }
            _ => return Err(out_of_set()),
        }
        Ok(())
    }

    fn text_slot_mut(&mut self, field: Field) -> Option<&mut Option<String>> {
        let slot = match field {
            Field::Title => &mut self.title,
            Field::Album => &mut self.album,
            Field::AlbumArtist => &mut self.album_artist,
            Field::Artist => &mut self.artist,
            Field::Date => &mut self.date,
            Field::Genre => &mut self.genre,
            Field::Composer => &mut self.composer,
            Field::Copyright => &mut self.copyright,
            Field::AccountId => &mut self.account_id,
            Field::PurchaseDate => &mut self.purchase_date,
            Field::SortName => &mut self.sort_name,
            Field::SortAlbum => &mut self.sort_album,
            Field::SortAlbumArtist => &mut self.sort_album_artist,
            Field::SortArtist => &mut self.sort_artist,
            Field::SortComposer => &mut self.sort_composer,
            Field::Lyrics => &mut self.lyrics,
            Field::Comment => &mut self.comment,
            _ => return None,
        };
        Some(slot)
    }

    fn ingest(&mut self, field: Field, value: &Value) -> Result<()> {
        match (field.kind(), value) {
            (_, Value::Null) => Ok(()),
            (FieldKind::Text, Value::String(s)) => self.set(field, FieldValue::Text(s)),
            (FieldKind::Text, Value::Number(n)) => {
                self.set(field, FieldValue::Text(&n.to_string()))
            }
            (FieldKind::Pair, Value::Array(items)) => {
                let (n, total) = pair_from_json(field, items)?;
                self.set(field, FieldValue::Pair(n, total))
            }
            (FieldKind::Code, v) => self.set(field, FieldValue::Code(code_from_json(field, v)?)),
            (FieldKind::Image, Value::String(path)) => {
                self.set(field, FieldValue::Art(&AlbumArt::Path(PathBuf::from(path))))
            }
            (kind, other) => Err(TagError::validation(
                field.name(),
                format!("expected a {kind:?} value, got JSON {}", json_type(other)),
            )),
        }
    }
}

impl TryFrom<Map<String, Value>> for CanonicalRecord {
    type Error = TagError;

    fn try_from(map: Map<String, Value>) -> Result<Self> {
        let mut record = CanonicalRecord::default();
        for (key, value) in &map {
            let field: Field = key.parse()?;
            record.ingest(field, value)?;
        }
        Ok(record)
    }
}

fn pair_from_json(field: Field, items: &[Value]) -> Result<(u32, u32)> {
    let part = |v: &Value| v.as_u64().and_then(|n| u32::try_from(n).ok());
    match items {
        [a, b] => match (part(a), part(b)) {
            (Some(a), Some(b)) => Ok((a, b)),
            _ => Err(TagError::validation(
                field.name(),
                "pair members must be non-negative integers",
            )),
        },
        _ => Err(TagError::validation(
            field.name(),
            format!("expected [index, total], got {} element(s)", items.len()),
        )),
    }
}

fn code_from_json(field: Field, value: &Value) -> Result<u8> {
    let flag_field = matches!(field, Field::Compilation | Field::GaplessPlayback);
    let code = match value {
        Value::Number(n) => n.as_u64().and_then(|n| u8::try_from(n).ok()),
        Value::Bool(b) if flag_field => Some(u8::from(*b)),
        Value::String(s) if flag_field => parse_boolish(s).map(u8::from),
        _ => None,
    };
    code.ok_or_else(|| {
        TagError::validation(field.name(), format!("not a valid code: {value}"))
    })
}

fn json_type(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
