// SPDX-License-Identifier: GPL-3.0-only

//! Photo collection store
//!
//! Single owner of every photo record on the board. Records are kept in
//! insertion order. At most one record may be pending (`placed == false`),
//! which gates capturing the next photo.
//!
//! Every successful mutation writes the placed subset through the configured
//! [`PhotoPersistence`]. Write failures are logged and otherwise ignored.

use super::geometry::Point;
use super::photo::{ImageRef, PhotoId, PhotoRecord};
use crate::errors::{BoardError, StorageError};
use crate::storage::PhotoPersistence;
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

pub struct PhotoStore {
    photos: Vec<PhotoRecord>,
    persistence: Box<dyn PhotoPersistence>,
}

impl PhotoStore {
    /// Start with an empty collection without reading the backing store
    pub fn empty(persistence: Box<dyn PhotoPersistence>) -> Self {
        Self {
            photos: Vec::new(),
            persistence,
        }
    }

    /// Load the saved collection, or start empty if it cannot be read
    pub fn open(persistence: Box<dyn PhotoPersistence>) -> Self {
        let photos = match persistence.load() {
            Ok(mut photos) => {
                for photo in &mut photos {
                    photo.placed = true;
                }
                dedup_ids(&mut photos);
                photos
            }
            Err(e) => {
                warn!(error = %e, "Discarding unreadable saved photos");
                Vec::new()
            }
        };

        info!(count = photos.len(), "Photo store opened");
        Self {
            photos,
            persistence,
        }
    }

    /// Add a freshly captured photo as the pending photo
    ///
    /// Rejected with [`BoardError::PendingPhoto`] while another photo still
    /// waits for its first placement.
    pub fn add_photo(
        &mut self,
        image: ImageRef,
        captured_at: DateTime<Utc>,
        x: f32,
        y: f32,
        rotation_degrees: f32,
    ) -> Result<PhotoId, BoardError> {
        if self.has_pending_photo() {
            debug!("Refusing new photo while one is pending");
            return Err(BoardError::PendingPhoto);
        }

        let mut id = PhotoId::generate();
        while self.contains(&id) {
            id = PhotoId::generate();
        }

        self.photos.push(PhotoRecord::pending(
            id.clone(),
            image,
            captured_at,
            Point::new(x, y),
            rotation_degrees,
        ));

        info!(id = %id, x, y, rotation_degrees, "Photo added");
        self.persist();
        Ok(id)
    }

    /// Remove a photo, returning the removed record
    ///
    /// Removing the pending photo clears the pending gate.
    pub fn remove_photo(&mut self, id: &PhotoId) -> Option<PhotoRecord> {
        let index = self.photos.iter().position(|p| &p.id == id)?;
        let removed = self.photos.remove(index);

        info!(id = %id, was_pending = !removed.placed, "Photo removed");
        self.persist();
        Some(removed)
    }

    /// Commit a new position
    ///
    /// No-op for pinned or unknown photos. The first commit of the pending
    /// photo marks it placed. Returns true when the position was committed.
    pub fn update_position(&mut self, id: &PhotoId, x: f32, y: f32) -> bool {
        let Some(photo) = self.photos.iter_mut().find(|p| &p.id == id) else {
            return false;
        };

        if photo.pinned {
            debug!(id = %id, "Ignoring move of pinned photo");
            return false;
        }

        photo.x = x;
        photo.y = y;
        if !photo.placed {
            photo.placed = true;
            info!(id = %id, "Pending photo placed");
        }

        debug!(id = %id, x, y, "Photo moved");
        self.persist();
        true
    }

    /// Flip the pinned flag, returning the new value
    pub fn toggle_pin(&mut self, id: &PhotoId) -> Option<bool> {
        let photo = self.photos.iter_mut().find(|p| &p.id == id)?;
        photo.pinned = !photo.pinned;
        let pinned = photo.pinned;

        info!(id = %id, pinned, "Pin toggled");
        self.persist();
        Some(pinned)
    }

    pub fn has_pending_photo(&self) -> bool {
        self.photos.iter().any(|p| !p.placed)
    }

    pub fn pending_photo(&self) -> Option<&PhotoRecord> {
        self.photos.iter().find(|p| !p.placed)
    }

    pub fn get(&self, id: &PhotoId) -> Option<&PhotoRecord> {
        self.photos.iter().find(|p| &p.id == id)
    }

    pub fn contains(&self, id: &PhotoId) -> bool {
        self.get(id).is_some()
    }

    /// All records in insertion order
    pub fn photos(&self) -> &[PhotoRecord] {
        &self.photos
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    /// Write the placed subset now, reporting failure to the caller
    ///
    /// Used on shutdown; regular mutations persist on their own.
    pub fn flush(&self) -> Result<(), StorageError> {
        self.persistence.save(&self.placed_photos())
    }

    fn placed_photos(&self) -> Vec<PhotoRecord> {
        self.photos.iter().filter(|p| p.placed).cloned().collect()
    }

    fn persist(&self) {
        if let Err(e) = self.flush() {
            warn!(error = %e, "Failed to persist photos");
        }
    }
}

impl std::fmt::Debug for PhotoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotoStore")
            .field("photos", &self.photos.len())
            .field("pending", &self.has_pending_photo())
            .finish()
    }
}

/// Keep the first occurrence of each id from a loaded collection
fn dedup_ids(photos: &mut Vec<PhotoRecord>) {
    let mut seen = std::collections::HashSet::new();
    let before = photos.len();
    photos.retain(|p| seen.insert(p.id.clone()));
    if photos.len() != before {
        warn!(dropped = before - photos.len(), "Dropped duplicate photo ids");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn store() -> PhotoStore {
        PhotoStore::empty(Box::new(MemoryStore::new()))
    }

    fn add(store: &mut PhotoStore) -> Result<PhotoId, BoardError> {
        store.add_photo(ImageRef::new("img.png"), Utc::now(), 10.0, 10.0, 5.0)
    }

    #[test]
    fn test_add_initializes_pending_unpinned() {
        let mut store = store();
        let id = add(&mut store).unwrap();

        let photo = store.get(&id).unwrap();
        assert!(!photo.placed);
        assert!(!photo.pinned);
        assert_eq!(photo.position(), Point::new(10.0, 10.0));
        assert_eq!(photo.rotation_degrees, 5.0);
        assert!(store.has_pending_photo());
    }

    #[test]
    fn test_second_add_rejected_while_pending() {
        let mut store = store();
        add(&mut store).unwrap();
        assert_eq!(add(&mut store), Err(BoardError::PendingPhoto));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_removing_pending_photo_clears_gate() {
        let mut store = store();
        let id = add(&mut store).unwrap();

        assert!(store.remove_photo(&id).is_some());
        assert!(!store.has_pending_photo());
        assert!(add(&mut store).is_ok());
    }

    #[test]
    fn test_unknown_ids_are_no_ops() {
        let mut store = store();
        let ghost = PhotoId::from("ghost");

        assert!(store.remove_photo(&ghost).is_none());
        assert!(!store.update_position(&ghost, 1.0, 1.0));
        assert_eq!(store.toggle_pin(&ghost), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_duplicate_ids_dropped_on_open() {
        let json = r#"[
            {"id":"a","image":"a.png","capturedAt":1,"x":1,"y":1,"rotationDegrees":0},
            {"id":"a","image":"b.png","capturedAt":2,"x":2,"y":2,"rotationDegrees":0}
        ]"#;
        let store = PhotoStore::open(Box::new(MemoryStore::with_raw(json)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.photos()[0].image, ImageRef::new("a.png"));
    }
}
