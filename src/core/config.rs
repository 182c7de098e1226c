//! Writer configuration.
//!
//! Nothing here is read from disk; callers build a `WriterConfig` in code or
//! deserialize it from whatever settings source they already have.

use serde::Deserialize;

/// ID3v2 revision used when saving MP3 tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum Id3Version {
    #[serde(rename = "2.3")]
    V23,
    #[default]
    #[serde(rename = "2.4")]
    V24,
}

impl From<Id3Version> for id3::Version {
    fn from(v: Id3Version) -> Self {
        match v {
            Id3Version::V23 => id3::Version::Id3v23,
            Id3Version::V24 => id3::Version::Id3v24,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// Save the container right after the tags are set.
    pub persist_immediately: bool,

    pub id3_version: Id3Version,

    /// Accept MP3s with no ID3v2 header and start from an empty tag.
    /// Off by default: a missing header is treated as a wrong signature.
    pub create_missing_id3: bool,

    /// Language code for COMM / USLT frames. The record carries none.
    pub frame_language: String,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            persist_immediately: true,
            id3_version: Id3Version::V24,
            create_missing_id3: false,
            frame_language: "XXX".to_string(),
        }
    }
}
