// SPDX-License-Identifier: GPL-3.0-only

//! Persistence for the photo board
//!
//! Two concerns live here:
//! - [`PhotoPersistence`]: load/save of the placed photo collection under an
//!   opaque key (JSON file on disk, or in memory)
//! - [`PhotoLibrary`]: the encoded image files that photo records point at

use crate::board::{ImageRef, PhotoRecord};
use crate::errors::StorageError;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Backing store for the placed photo collection
pub trait PhotoPersistence {
    /// Load the saved collection; every returned record has `placed == true`
    fn load(&self) -> Result<Vec<PhotoRecord>, StorageError>;

    /// Replace the saved collection with `records`
    fn save(&self, records: &[PhotoRecord]) -> Result<(), StorageError>;
}

/// Serialize a collection to the on-disk JSON form
pub fn encode_collection(records: &[PhotoRecord]) -> Result<String, StorageError> {
    Ok(serde_json::to_string(records)?)
}

/// Parse the on-disk JSON form; loaded photos are never pending
///
/// Image references must be plain file names inside the library, anything
/// else marks the whole collection as malformed.
pub fn decode_collection(json: &str) -> Result<Vec<PhotoRecord>, StorageError> {
    let mut records: Vec<PhotoRecord> = serde_json::from_str(json)?;
    for record in &mut records {
        if !record.image.is_file_name() {
            return Err(StorageError::Malformed(format!(
                "image reference {:?} of photo {} is not a file name",
                record.image.as_str(),
                record.id
            )));
        }
        record.placed = true;
    }
    Ok(records)
}

/// JSON file keyed by an opaque storage key: `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", key)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PhotoPersistence for JsonFileStore {
    fn load(&self) -> Result<Vec<PhotoRecord>, StorageError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No saved photos yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let records = decode_collection(&json)?;
        info!(count = records.len(), path = %self.path.display(), "Loaded saved photos");
        Ok(records)
    }

    fn save(&self, records: &[PhotoRecord]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write-then-rename so a crash never leaves a half-written collection
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, encode_collection(records)?)?;
        fs::rename(&tmp_path, &self.path)?;

        debug!(count = records.len(), path = %self.path.display(), "Saved photos");
        Ok(())
    }
}

/// In-memory store; clones share the same slot
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the slot with raw serialized data, valid or not
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(raw.into()))),
        }
    }

    /// The raw serialized form last written, if any
    pub fn raw(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }
}

impl PhotoPersistence for MemoryStore {
    fn load(&self) -> Result<Vec<PhotoRecord>, StorageError> {
        match self.raw() {
            Some(json) => decode_collection(&json),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, records: &[PhotoRecord]) -> Result<(), StorageError> {
        let json = encode_collection(records)?;
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| StorageError::Io("memory store lock poisoned".to_string()))?;
        *slot = Some(json);
        Ok(())
    }
}

/// Directory of encoded photo images, one PNG per photo
#[derive(Debug, Clone)]
pub struct PhotoLibrary {
    dir: PathBuf,
}

impl PhotoLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolve an image reference to its file
    pub fn path(&self, image: &ImageRef) -> PathBuf {
        self.dir.join(image.as_str())
    }

    /// Store encoded PNG bytes under a fresh name and return the reference to them
    pub fn store_png(&self, png: &[u8]) -> Result<ImageRef, StorageError> {
        fs::create_dir_all(&self.dir)?;

        let image = ImageRef::new(format!("{}.png", uuid::Uuid::new_v4().simple()));
        let path = self.path(&image);
        fs::write(&path, png)?;

        debug!(path = %path.display(), bytes = png.len(), "Stored photo image");
        Ok(image)
    }

    /// Path of a stored image, or None when the reference would leave the library
    fn resolve(&self, image: &ImageRef) -> Option<PathBuf> {
        image.is_file_name().then(|| self.path(image))
    }

    /// Read the raw encoded bytes of a photo
    pub fn read(&self, image: &ImageRef) -> Result<Vec<u8>, StorageError> {
        let path = self.resolve(image).ok_or_else(|| {
            StorageError::Io(format!("{:?} is outside the photo library", image.as_str()))
        })?;
        Ok(fs::read(path)?)
    }

    /// Decode a stored photo into RGBA pixels
    pub fn load_rgba(&self, image: &ImageRef) -> Result<image::RgbaImage, StorageError> {
        let bytes = self.read(image)?;
        Ok(image::load_from_memory(&bytes)?.to_rgba8())
    }

    /// Delete a stored image; missing files are not an error
    pub fn remove(&self, image: &ImageRef) {
        let Some(path) = self.resolve(image) else {
            warn!(image = %image, "Refusing to remove image outside the photo library");
            return;
        };
        match fs::remove_file(&path) {
            Ok(()) => debug!(path = %path.display(), "Removed photo image"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove photo image"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_forces_placed() {
        let json = r#"[{"id":"a","image":"a.png","capturedAt":5,"x":1,"y":2,"rotationDegrees":4,"pinned":true,"placed":false}]"#;
        let records = decode_collection(json).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].placed);
        assert!(records[0].pinned);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_collection("{not json"),
            Err(StorageError::Malformed(_))
        ));
        assert!(matches!(
            decode_collection(r#"{"id":"a"}"#),
            Err(StorageError::Malformed(_))
        ));
    }

    #[test]
    fn test_decode_rejects_paths_outside_library() {
        for image in ["/tmp/victim.txt", "../victim.txt", "nested/a.png", "..", ""] {
            let json = format!(
                r#"[{{"id":"a","image":{:?},"capturedAt":5,"x":1,"y":2,"rotationDegrees":4}}]"#,
                image
            );
            assert!(
                matches!(decode_collection(&json), Err(StorageError::Malformed(_))),
                "{:?} should be rejected",
                image
            );
        }
    }

    #[test]
    fn test_library_never_touches_files_outside_its_dir() {
        let dir = tempfile::tempdir().unwrap();
        let victim = dir.path().join("victim.txt");
        fs::write(&victim, "keep me").unwrap();
        let library = PhotoLibrary::new(dir.path().join("photos"));

        let escaping = ImageRef::new(victim.to_string_lossy().into_owned());
        library.remove(&escaping);
        library.remove(&ImageRef::new("../victim.txt"));
        assert!(victim.exists());
        assert!(library.read(&ImageRef::new("../victim.txt")).is_err());
    }

    #[test]
    fn test_memory_store_clones_share_slot() {
        let store = MemoryStore::new();
        let observer = store.clone();
        store.save(&[]).unwrap();
        assert_eq!(observer.raw().as_deref(), Some("[]"));
    }
}
