//! Write a `CanonicalRecord` into an open tag store, and optionally save it.

use std::path::Path;

use tracing::debug;

use super::super::config::WriterConfig;
use super::super::error::Result;
use super::super::record::CanonicalRecord;
use super::super::types::{Field, TagFormat};
use super::encode::{TagScheme, encode_resolved};
use super::mapping::lookup;
use super::store::{Id3Store, Mp4Store, TagStore};

/// Where a store ended up after a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteState {
    /// Tags set in memory only.
    Written,
    /// Tags set and saved to disk.
    Persisted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReport {
    pub format: TagFormat,
    /// Present fields that were set on the store, in field order.
    pub written: Vec<Field>,
    /// Present fields with no mapping in `format`.
    pub skipped: Vec<Field>,
    pub state: WriteState,
}

/// A store opened from a path, plus what was written into it.
///
/// When persistence was not requested the caller still owns the store and can
/// `save` it later.
pub struct FileWrite<S> {
    pub store: S,
    pub report: WriteReport,
}

/// Write `record` into `store`.
///
/// Order of operations:
/// 1. resolve album art (may read + delete the image file)
/// 2. encode every present, mapped field; any invalid field aborts here,
///    before the store is touched
/// 3. set the encoded values on the store
/// 4. save, if `persist`
///
/// Nothing is retried; a save error comes back as-is.
pub fn write_to_container<S: TagStore>(
    record: &mut CanonicalRecord,
    store: &mut S,
    persist: bool,
) -> Result<WriteReport> {
    record.resolve_album_art()?;

    let format = <S::Scheme as TagScheme>::FORMAT;
    let staged = encode_resolved::<S::Scheme>(record)?;

    let (written, skipped): (Vec<Field>, Vec<Field>) = Field::ALL
        .into_iter()
        .filter(|f| record.value(*f).is_some())
        .partition(|f| lookup(*f, format).is_some());

    for (key, value) in staged {
        debug!(?key, %format, "set tag");
        store.set(key, value);
    }

    let state = if persist {
        store.save()?;
        WriteState::Persisted
    } else {
        WriteState::Written
    };

    Ok(WriteReport {
        format,
        written,
        skipped,
        state,
    })
}

/// Open an MP4 / M4A file and write `record` into it.
///
/// The container is opened before the album art is resolved, so a wrong file
/// fails without consuming the image.
pub fn add_to_mp4(
    record: &mut CanonicalRecord,
    path: impl AsRef<Path>,
    config: &WriterConfig,
) -> Result<FileWrite<Mp4Store>> {
    let mut store = Mp4Store::open(path)?;
    let report = write_to_container(record, &mut store, config.persist_immediately)?;
    Ok(FileWrite { store, report })
}

/// Open an MP3 file and write `record` into its ID3v2 tag.
pub fn add_to_mp3(
    record: &mut CanonicalRecord,
    path: impl AsRef<Path>,
    config: &WriterConfig,
) -> Result<FileWrite<Id3Store>> {
    let mut store = Id3Store::open(path, config)?;
    let report = write_to_container(record, &mut store, config.persist_immediately)?;
    Ok(FileWrite { store, report })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::TagError;
    use crate::core::tags::encode::{AtomValue, FrameValue, Id3Frames, Mp4Atoms};
    use crate::core::tags::mapping::AtomKey;
    use crate::core::tags::store::MemoryStore;
    use crate::core::types::AlbumArt;

    fn sample() -> CanonicalRecord {
        let mut r = CanonicalRecord::new();
        r.title = Some("Test".into());
        r.track = Some((1, 1));
        r.account_id = Some("acct".into());
        r
    }

    #[test]
    fn unpersisted_write_stays_in_memory() {
        let mut store = MemoryStore::<Id3Frames>::new();
        let report = write_to_container(&mut sample(), &mut store, false).unwrap();

        assert_eq!(report.state, WriteState::Written);
        assert_eq!(store.saves(), 0);
        assert_eq!(store.get(&"TIT2"), Some(FrameValue::Text("Test".into())));
        assert_eq!(
            report.written,
            vec![Field::Title, Field::Track, Field::Disk]
        );
        assert_eq!(
            report.skipped,
            vec![Field::Rating, Field::MediaType, Field::AccountId]
        );
    }

    #[test]
    fn persisted_write_saves_once() {
        let mut store = MemoryStore::<Mp4Atoms>::new();
        let report = write_to_container(&mut sample(), &mut store, true).unwrap();

        assert_eq!(report.state, WriteState::Persisted);
        assert_eq!(store.saves(), 1);
        assert_eq!(store.get(&AtomKey(*b"trkn")), Some(AtomValue::Pair(1, 1)));
        assert_eq!(store.get(&AtomKey(*b"apID")), Some(AtomValue::Text("acct".into())));
    }

    #[test]
    fn invalid_field_leaves_store_untouched() {
        let mut record = sample();
        record.track = Some((100_000, 1));

        let mut store = MemoryStore::<Mp4Atoms>::new();
        let err = write_to_container(&mut record, &mut store, true).unwrap_err();

        assert!(matches!(err, TagError::Validation { ref field, .. } if field == "track"));
        assert!(store.entries().is_empty());
        assert_eq!(store.saves(), 0);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn cleanup_failure_stops_before_the_store() {
        let mut record = sample();
        record.album_art = Some(AlbumArt::Path("/proc/self/cmdline".into()));

        let mut store = MemoryStore::<Id3Frames>::new();
        let err = write_to_container(&mut record, &mut store, true).unwrap_err();

        assert!(matches!(err, TagError::ResourceCleanup { .. }));
        assert!(record.album_art.as_ref().is_some_and(AlbumArt::is_resolved));
        assert!(store.entries().is_empty());
        assert_eq!(store.saves(), 0);
    }

    #[test]
    fn save_failure_propagates_after_tags_are_set() {
        let mut store = MemoryStore::<Id3Frames>::failing_save("disk full");
        let err = write_to_container(&mut sample(), &mut store, true).unwrap_err();

        assert!(matches!(err, TagError::Persist { ref reason, .. } if reason == "disk full"));
        assert!(store.get(&"TIT2").is_some());
    }
}
