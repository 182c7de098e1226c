//! core/tags/art.rs
//!
//! Album art resolution: turn `AlbumArt::Path` into embedded bytes.
//!
//! This is the only filesystem side effect outside the stores. The image file
//! is read once and then deleted; after that the record carries the bytes and
//! later encodes never look at the disk again.

use std::fs;
use std::path::PathBuf;

use tracing::{info, warn};

use super::super::error::{Result, TagError};
use super::super::record::CanonicalRecord;
use super::super::types::{AlbumArt, CoverArt};

/// What happened to the source image file.
#[derive(Debug)]
pub enum Cleanup {
    /// Art was absent or already embedded; no file was touched.
    NotNeeded,
    Removed(PathBuf),
    /// Always `TagError::ResourceCleanup`. The record is already resolved.
    Failed(TagError),
}

#[derive(Debug)]
pub struct Resolved {
    pub record: CanonicalRecord,
    pub cleanup: Cleanup,
}

/// Resolve `record`'s album art, returning the new record and the cleanup
/// outcome separately so the caller sees the side effect.
///
/// A read failure is an error and leaves nothing changed on disk. A delete
/// failure is not: the resolved record comes back with `Cleanup::Failed`.
pub fn resolve_album_art(mut record: CanonicalRecord) -> Result<Resolved> {
    let cleanup = resolve_in_place(&mut record)?;
    Ok(Resolved { record, cleanup })
}

fn resolve_in_place(record: &mut CanonicalRecord) -> Result<Cleanup> {
    let path = match &record.album_art {
        Some(AlbumArt::Path(p)) => p.clone(),
        _ => return Ok(Cleanup::NotNeeded),
    };

    let data = fs::read(&path).map_err(|source| TagError::ResourceRead {
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), bytes = data.len(), "album art resolved");
    record.album_art = Some(AlbumArt::Embedded(CoverArt { data }));

    Ok(match fs::remove_file(&path) {
        Ok(()) => Cleanup::Removed(path),
        Err(source) => {
            warn!(path = %path.display(), error = %source, "album art source not removed");
            Cleanup::Failed(TagError::ResourceCleanup { path, source })
        }
    })
}

impl CanonicalRecord {
    /// In-place form of [`resolve_album_art`].
    ///
    /// If the file was read but could not be deleted, `self` is already
    /// resolved when the `ResourceCleanup` error comes back.
    pub fn resolve_album_art(&mut self) -> Result<()> {
        match resolve_in_place(self)? {
            Cleanup::Failed(err) => Err(err),
            Cleanup::NotNeeded | Cleanup::Removed(_) => Ok(()),
        }
    }
}
