//! core/tags/store.rs
//!
//! Tag stores: the only place `mp4ameta` / `id3` types are touched.
//!
//! A store is opened (structure checked, existing tags loaded), then mutated
//! in memory with `set`, and only `save` writes bytes back to the file.

use std::path::{Path, PathBuf};

use id3::frame::{Comment, Content, Lyrics, Picture};
use id3::{Encoding, TagLike, Version};
use mp4ameta::{Data, Fourcc};
use tracing::info;

use super::super::config::WriterConfig;
use super::super::error::{Result, TagError};
use super::super::types::TagFormat;
use super::encode::{AtomValue, FrameValue, Id3Frames, Mp4Atoms, TagScheme};
use super::mapping::AtomKey;
use super::util::parse_be_u64;

/// An open container's tags: get/set by key, then save.
pub trait TagStore {
    type Scheme: TagScheme;

    fn get(
        &self,
        key: &<Self::Scheme as TagScheme>::Key,
    ) -> Option<<Self::Scheme as TagScheme>::Value>;

    /// Replace whatever is stored under `key`.
    fn set(
        &mut self,
        key: <Self::Scheme as TagScheme>::Key,
        value: <Self::Scheme as TagScheme>::Value,
    );

    /// Flush to disk. The only operation that writes the file.
    fn save(&mut self) -> Result<()>;
}

// ---------------------------------------------------------------------------
// MP4
// ---------------------------------------------------------------------------

/// iTunes metadata of an MP4 / M4A file.
pub struct Mp4Store {
    path: PathBuf,
    tag: mp4ameta::Tag,
}

impl Mp4Store {
    /// Fails fast when the file is missing or not an MP4 container.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let tag = mp4ameta::Tag::read_from_path(&path).map_err(|e| TagError::ContainerOpen {
            format: TagFormat::Mp4,
            path: path.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self { path, tag })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// `trkn` carries two trailing padding bytes, `disk` does not.
fn pair_bytes(key: AtomKey, n: u16, total: u16) -> Vec<u8> {
    let [n_hi, n_lo] = n.to_be_bytes();
    let [t_hi, t_lo] = total.to_be_bytes();
    let mut bytes = vec![0, 0, n_hi, n_lo, t_hi, t_lo];
    if key.bytes() == *b"trkn" {
        bytes.extend_from_slice(&[0, 0]);
    }
    bytes
}

fn atom_from_data(data: &Data) -> Option<AtomValue> {
    match data {
        Data::Utf8(s) | Data::Utf16(s) => Some(AtomValue::Text(s.clone())),
        Data::Reserved(b) if b.len() >= 6 => Some(AtomValue::Pair(
            u16::from_be_bytes([b[2], b[3]]),
            u16::from_be_bytes([b[4], b[5]]),
        )),
        Data::BeSigned(b) => parse_be_u64(b)
            .and_then(|v| u8::try_from(v).ok())
            .map(AtomValue::Integer),
        Data::Jpeg(b) | Data::Png(b) => Some(AtomValue::Cover(b.clone())),
        _ => None,
    }
}

impl TagStore for Mp4Store {
    type Scheme = Mp4Atoms;

    fn get(&self, key: &AtomKey) -> Option<AtomValue> {
        let ident = Fourcc(key.bytes());
        let data = self.tag.data_of(&ident).next().cloned()?;
        atom_from_data(&data)
    }

    fn set(&mut self, key: AtomKey, value: AtomValue) {
        let data = match value {
            AtomValue::Text(s) => Data::Utf8(s),
            AtomValue::Pair(n, total) => Data::Reserved(pair_bytes(key, n, total)),
            AtomValue::Integer(code) => Data::BeSigned(vec![code]),
            AtomValue::Cover(bytes) => Data::Jpeg(bytes),
        };
        self.tag.set_data(Fourcc(key.bytes()), data);
    }

    fn save(&mut self) -> Result<()> {
        self.tag
            .write_to_path(&self.path)
            .map_err(|e| TagError::Persist {
                format: TagFormat::Mp4,
                path: self.path.clone(),
                reason: e.to_string(),
            })?;
        info!(path = %self.path.display(), "MP4 tags saved");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ID3
// ---------------------------------------------------------------------------

/// ID3v2 tag of an MP3 file.
pub struct Id3Store {
    path: PathBuf,
    tag: id3::Tag,
    version: Version,
    language: String,
}

impl Id3Store {
    /// Loads the existing ID3v2 tag.
    ///
    /// A missing file always fails. A file without an ID3v2 header fails too,
    /// unless `config.create_missing_id3` is set.
    pub fn open(path: impl AsRef<Path>, config: &WriterConfig) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let tag = match id3::Tag::read_from_path(&path) {
            Ok(tag) => tag,
            Err(e)
                if matches!(e.kind, id3::ErrorKind::NoTag)
                    && config.create_missing_id3
                    && path.is_file() =>
            {
                id3::Tag::new()
            }
            Err(e) => {
                return Err(TagError::ContainerOpen {
                    format: TagFormat::Id3,
                    path,
                    reason: e.to_string(),
                });
            }
        };

        Ok(Self {
            path,
            tag,
            version: config.id3_version.into(),
            language: config.frame_language.clone(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Encoding `id3` writes a frame with under `version` when the frame names none.
fn implied_encoding(version: Version) -> Encoding {
    match version {
        Version::Id3v24 => Encoding::UTF8,
        _ => Encoding::UTF16,
    }
}

impl TagStore for Id3Store {
    type Scheme = Id3Frames;

    fn get(&self, key: &&'static str) -> Option<FrameValue> {
        let frame = self.tag.get(*key)?;
        match frame.content() {
            Content::Text(s) => Some(FrameValue::Text(s.clone())),
            Content::Comment(c) => Some(FrameValue::DescribedText {
                description: c.description.clone(),
                text: c.text.clone(),
            }),
            // Decoded USLT frames don't keep their encoding byte; fall back to
            // what the loaded tag's version implies.
            Content::Lyrics(l) => Some(FrameValue::Lyrics {
                encoding: frame
                    .encoding()
                    .unwrap_or_else(|| implied_encoding(self.tag.version())),
                text: l.text.clone(),
            }),
            Content::Picture(p) => Some(FrameValue::Picture {
                mime_type: p.mime_type.clone(),
                picture_type: p.picture_type,
                data: p.data.clone(),
            }),
            _ => None,
        }
    }

    fn set(&mut self, key: &'static str, value: FrameValue) {
        self.tag.remove(key);

        match value {
            FrameValue::Text(s) => self.tag.set_text(key, s),
            FrameValue::DescribedText { description, text } if key == "COMM" => {
                let _ = self.tag.add_frame(Comment {
                    lang: self.language.clone(),
                    description,
                    text,
                });
            }
            // T*** frames hold text only; the description stays in the projection.
            FrameValue::DescribedText { text, .. } => self.tag.set_text(key, text),
            FrameValue::Lyrics { text, .. } => {
                let _ = self.tag.add_frame(Lyrics {
                    lang: self.language.clone(),
                    description: String::new(),
                    text,
                });
            }
            FrameValue::Picture {
                mime_type,
                picture_type,
                data,
            } => {
                let _ = self.tag.add_frame(Picture {
                    mime_type,
                    picture_type,
                    description: String::new(),
                    data,
                });
            }
        }
    }

    fn save(&mut self) -> Result<()> {
        self.tag
            .write_to_path(&self.path, self.version)
            .map_err(|e| TagError::Persist {
                format: TagFormat::Id3,
                path: self.path.clone(),
                reason: e.to_string(),
            })?;
        info!(path = %self.path.display(), version = ?self.version, "ID3 tags saved");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// Ordered in-memory store. Useful to inspect what a write would do without
/// touching a file.
#[derive(Debug, Clone)]
pub struct MemoryStore<S: TagScheme> {
    entries: Vec<(S::Key, S::Value)>,
    saves: usize,
    save_error: Option<String>,
}

impl<S: TagScheme> Default for MemoryStore<S> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            saves: 0,
            save_error: None,
        }
    }
}

impl<S: TagScheme> MemoryStore<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose `save` always fails with `reason`.
    pub fn failing_save(reason: impl Into<String>) -> Self {
        Self {
            save_error: Some(reason.into()),
            ..Self::default()
        }
    }

    pub fn entries(&self) -> &[(S::Key, S::Value)] {
        &self.entries
    }

    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl<S: TagScheme> TagStore for MemoryStore<S> {
    type Scheme = S;

    fn get(&self, key: &S::Key) -> Option<S::Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    fn set(&mut self, key: S::Key, value: S::Value) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    fn save(&mut self) -> Result<()> {
        if let Some(reason) = &self.save_error {
            return Err(TagError::Persist {
                format: S::FORMAT,
                path: PathBuf::from("<memory>"),
                reason: reason.clone(),
            });
        }
        self.saves += 1;
        Ok(())
    }
}
