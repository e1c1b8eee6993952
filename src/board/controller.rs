// SPDX-License-Identifier: GPL-3.0-only

//! Placement interaction controller
//!
//! Turns board gestures into [`PhotoStore`] operations. Each photo is either
//! idle (drawn at its committed position) or dragging (drawn under the
//! pointer). Drag state is tracked per photo and never touches the store
//! until the gesture ends:
//!
//! ```text
//!            DragStart (unpinned)
//!   Idle ───────────────────────────▶ Dragging ──┐ DragMove
//!    ▲                                    │  ◀───┘ (hover feedback only)
//!    │  DragEnd / DragCancel              │
//!    └────────────────────────────────────┘
//!         inside trash → remove_photo
//!         elsewhere    → update_position
//! ```

use super::geometry::{Point, PointerSample, Rect, Size};
use super::photo::{ImageRef, PhotoId, PhotoRecord};
use super::store::PhotoStore;
use crate::errors::BoardError;
use chrono::{DateTime, Utc};
use rand::Rng;
use std::collections::HashMap;
use tracing::{debug, info};

/// Something that knows where the trash currently is
///
/// Queried on every test because the layout may change between events.
pub trait TrashTarget {
    fn bounds(&self) -> Rect;
}

impl TrashTarget for Rect {
    fn bounds(&self) -> Rect {
        *self
    }
}

/// Geometry the controller needs for placement and hover feedback
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardLayout {
    /// Rendered size of a photo, used to find its visual centre
    pub photo_size: Size,
    /// Extra distance around the trash that still counts as hovering
    pub hover_margin: f32,
    /// Where new photos land before the user moves them
    pub capture_anchor: Point,
    /// Random offset added to the anchor on both axes, in [0, jitter)
    pub placement_jitter: f32,
}

/// Input events understood by [`PlacementController::dispatch`]
#[derive(Debug, Clone, PartialEq)]
pub enum BoardEvent {
    /// The camera finished printing a photo
    PhotoCaptured {
        image: ImageRef,
        captured_at: DateTime<Utc>,
    },
    /// Pointer pressed on a photo
    DragStart { id: PhotoId, pointer: PointerSample },
    /// Pointer moved while pressed
    DragMove { id: PhotoId, pointer: PointerSample },
    /// Pointer released
    DragEnd { id: PhotoId, pointer: PointerSample },
    /// The input system dropped the gesture (e.g. pointer capture lost)
    DragCancel { id: PhotoId },
    TogglePin { id: PhotoId },
    /// Explicit deletion, independent of the trash
    Delete { id: PhotoId },
}

impl BoardEvent {
    pub fn drag_start(id: &PhotoId, x: f32, y: f32) -> Self {
        BoardEvent::DragStart {
            id: id.clone(),
            pointer: PointerSample::Mouse { x, y },
        }
    }

    pub fn drag_move(id: &PhotoId, x: f32, y: f32) -> Self {
        BoardEvent::DragMove {
            id: id.clone(),
            pointer: PointerSample::Mouse { x, y },
        }
    }

    pub fn drag_end(id: &PhotoId, x: f32, y: f32) -> Self {
        BoardEvent::DragEnd {
            id: id.clone(),
            pointer: PointerSample::Mouse { x, y },
        }
    }
}

/// What an event did to the board
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Nothing changed (unknown id, pinned photo, no active drag)
    Ignored,
    /// A new pending photo was added
    Added(PhotoId),
    /// The new photo was refused
    Rejected(BoardError),
    DragStarted,
    /// The dragged photo is now drawn at `position`
    Dragging { position: Point },
    /// The drag committed a new position
    Placed { position: Point },
    /// The photo was dropped on the trash and destroyed
    Trashed(PhotoRecord),
    /// The photo was deleted explicitly
    Deleted(PhotoRecord),
    PinToggled { pinned: bool },
}

/// Result of dispatching one event
#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
    pub outcome: Outcome,
    /// Advisory: the dragged photo is close enough to the trash to highlight it
    pub hovering_trash: bool,
}

impl Feedback {
    fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            hovering_trash: false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct DragState {
    /// Pointer position minus photo top-left at drag start
    grab_offset: Point,
    last_pointer: Point,
}

impl DragState {
    fn visual_position(&self) -> Point {
        self.last_pointer.offset_from(self.grab_offset)
    }
}

pub struct PlacementController {
    store: PhotoStore,
    trash: Box<dyn TrashTarget>,
    layout: BoardLayout,
    drags: HashMap<PhotoId, DragState>,
}

impl PlacementController {
    pub fn new(store: PhotoStore, trash: Box<dyn TrashTarget>, layout: BoardLayout) -> Self {
        Self {
            store,
            trash,
            layout,
            drags: HashMap::new(),
        }
    }

    pub fn store(&self) -> &PhotoStore {
        &self.store
    }

    pub fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    pub fn trash_bounds(&self) -> Rect {
        self.trash.bounds()
    }

    /// Replace the trash target, e.g. after a resize
    pub fn set_trash(&mut self, trash: Box<dyn TrashTarget>) {
        self.trash = trash;
    }

    pub fn set_layout(&mut self, layout: BoardLayout) {
        self.layout = layout;
    }

    /// Hand the store back, e.g. to flush it on shutdown
    pub fn into_store(self) -> PhotoStore {
        self.store
    }

    pub fn is_dragging(&self, id: &PhotoId) -> bool {
        self.drags.contains_key(id)
    }

    /// Where a photo should be drawn right now
    pub fn visual_position(&self, id: &PhotoId) -> Option<Point> {
        if let Some(drag) = self.drags.get(id) {
            return Some(drag.visual_position());
        }
        self.store.get(id).map(PhotoRecord::position)
    }

    /// Topmost photo whose rendered box contains `point`
    pub fn photo_at(&self, point: Point) -> Option<&PhotoId> {
        self.store
            .photos()
            .iter()
            .rev()
            .find(|photo| {
                let origin = self
                    .visual_position(&photo.id)
                    .unwrap_or_else(|| photo.position());
                Rect::from_origin_size(origin, self.layout.photo_size).contains(point)
            })
            .map(|photo| &photo.id)
    }

    /// Process one event to completion
    pub fn dispatch(&mut self, event: BoardEvent) -> Feedback {
        match event {
            BoardEvent::PhotoCaptured { image, captured_at } => {
                self.on_photo_captured(image, captured_at)
            }
            BoardEvent::DragStart { id, pointer } => self.on_drag_start(id, pointer.position()),
            BoardEvent::DragMove { id, pointer } => self.on_drag_move(&id, pointer.position()),
            BoardEvent::DragEnd { id, pointer } => self.on_drop(&id, pointer.position()),
            BoardEvent::DragCancel { id } => match self.drags.get(&id) {
                Some(drag) => {
                    let at = drag.last_pointer;
                    debug!(id = %id, "Drag cancelled, dropping at last pointer position");
                    self.on_drop(&id, at)
                }
                None => Feedback::new(Outcome::Ignored),
            },
            BoardEvent::TogglePin { id } => match self.store.toggle_pin(&id) {
                Some(pinned) => Feedback::new(Outcome::PinToggled { pinned }),
                None => Feedback::new(Outcome::Ignored),
            },
            BoardEvent::Delete { id } => {
                self.drags.remove(&id);
                match self.store.remove_photo(&id) {
                    Some(record) => Feedback::new(Outcome::Deleted(record)),
                    None => Feedback::new(Outcome::Ignored),
                }
            }
        }
    }

    fn on_photo_captured(&mut self, image: ImageRef, captured_at: DateTime<Utc>) -> Feedback {
        let (position, rotation) = self.initial_placement();
        match self
            .store
            .add_photo(image, captured_at, position.x, position.y, rotation)
        {
            Ok(id) => Feedback::new(Outcome::Added(id)),
            Err(e) => Feedback::new(Outcome::Rejected(e)),
        }
    }

    fn initial_placement(&self) -> (Point, f32) {
        let mut rng = rand::rng();
        let jitter = self.layout.placement_jitter.max(0.0);
        let (dx, dy) = if jitter > 0.0 {
            (rng.random_range(0.0..jitter), rng.random_range(0.0..jitter))
        } else {
            (0.0, 0.0)
        };
        let rotation = rng.random_range(-10.0f32..10.0);

        (self.layout.capture_anchor.translate(dx, dy), rotation)
    }

    fn on_drag_start(&mut self, id: PhotoId, pointer: Point) -> Feedback {
        let Some(photo) = self.store.get(&id) else {
            return Feedback::new(Outcome::Ignored);
        };
        if self.drags.contains_key(&id) {
            debug!(id = %id, "Photo is already being dragged");
            return Feedback::new(Outcome::Ignored);
        }
        if photo.pinned {
            debug!(id = %id, "Pinned photo cannot be dragged");
            return Feedback::new(Outcome::Ignored);
        }

        let drag = DragState {
            grab_offset: pointer.offset_from(photo.position()),
            last_pointer: pointer,
        };
        debug!(id = %id, x = pointer.x, y = pointer.y, "Drag started");
        self.drags.insert(id, drag);
        Feedback::new(Outcome::DragStarted)
    }

    fn on_drag_move(&mut self, id: &PhotoId, pointer: Point) -> Feedback {
        let Some(drag) = self.drags.get_mut(id) else {
            return Feedback::new(Outcome::Ignored);
        };
        drag.last_pointer = pointer;
        let position = drag.visual_position();

        let size = self.layout.photo_size;
        let center = position.translate(size.width / 2.0, size.height / 2.0);
        let hovering_trash = self
            .trash
            .bounds()
            .expand(self.layout.hover_margin)
            .contains(center);

        Feedback {
            outcome: Outcome::Dragging { position },
            hovering_trash,
        }
    }

    fn on_drop(&mut self, id: &PhotoId, pointer: Point) -> Feedback {
        let Some(drag) = self.drags.remove(id) else {
            return Feedback::new(Outcome::Ignored);
        };

        // Pinned mid-gesture: the drag is over but nothing may change
        if self.store.get(id).is_none_or(|photo| photo.pinned) {
            return Feedback::new(Outcome::Ignored);
        }

        if self.trash.bounds().contains(pointer) {
            return match self.store.remove_photo(id) {
                Some(record) => {
                    info!(id = %id, "Photo dropped in the trash");
                    Feedback::new(Outcome::Trashed(record))
                }
                None => Feedback::new(Outcome::Ignored),
            };
        }

        let position = pointer.offset_from(drag.grab_offset);
        if self.store.update_position(id, position.x, position.y) {
            Feedback::new(Outcome::Placed { position })
        } else {
            Feedback::new(Outcome::Ignored)
        }
    }
}

impl std::fmt::Debug for PlacementController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlacementController")
            .field("store", &self.store)
            .field("trash", &self.trash.bounds())
            .field("dragging", &self.drags.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn layout() -> BoardLayout {
        BoardLayout {
            photo_size: Size::new(100.0, 120.0),
            hover_margin: 50.0,
            capture_anchor: Point::new(56.0, 500.0),
            placement_jitter: 0.0,
        }
    }

    fn controller() -> PlacementController {
        PlacementController::new(
            PhotoStore::empty(Box::new(MemoryStore::new())),
            Box::new(Rect::new(700.0, 500.0, 780.0, 580.0)),
            layout(),
        )
    }

    fn capture(controller: &mut PlacementController) -> PhotoId {
        match controller
            .dispatch(BoardEvent::PhotoCaptured {
                image: ImageRef::new("a.png"),
                captured_at: Utc::now(),
            })
            .outcome
        {
            Outcome::Added(id) => id,
            other => panic!("expected Added, got {:?}", other),
        }
    }

    #[test]
    fn test_capture_uses_anchor_and_bounded_rotation() {
        let mut controller = controller();
        let id = capture(&mut controller);

        let photo = controller.store().get(&id).unwrap();
        assert_eq!(photo.position(), Point::new(56.0, 500.0));
        assert!((-10.0..10.0).contains(&photo.rotation_degrees));
    }

    #[test]
    fn test_grab_offset_is_preserved() {
        let mut controller = controller();
        let id = capture(&mut controller);

        // Grab 20 units right and 30 down from the photo corner
        controller.dispatch(BoardEvent::drag_start(&id, 76.0, 530.0));
        let feedback = controller.dispatch(BoardEvent::drag_end(&id, 220.0, 330.0));

        assert_eq!(
            feedback.outcome,
            Outcome::Placed {
                position: Point::new(200.0, 300.0)
            }
        );
    }

    #[test]
    fn test_repeated_drag_start_keeps_original_grab() {
        let mut controller = controller();
        let id = capture(&mut controller);

        controller.dispatch(BoardEvent::drag_start(&id, 76.0, 530.0));
        controller.dispatch(BoardEvent::drag_move(&id, 320.0, 230.0));
        let again = controller.dispatch(BoardEvent::drag_start(&id, 320.0, 230.0));
        assert_eq!(again.outcome, Outcome::Ignored);
        assert!(controller.is_dragging(&id));

        let feedback = controller.dispatch(BoardEvent::drag_end(&id, 320.0, 230.0));
        assert_eq!(
            feedback.outcome,
            Outcome::Placed {
                position: Point::new(300.0, 200.0)
            }
        );
    }

    #[test]
    fn test_hover_uses_visual_center_and_margin() {
        let mut controller = controller();
        let id = capture(&mut controller);
        controller.dispatch(BoardEvent::drag_start(&id, 56.0, 500.0));

        // Centre at (600 + 50, 400 + 60) = (650, 460): on the expanded edge
        let near = controller.dispatch(BoardEvent::drag_move(&id, 600.0, 400.0));
        assert!(near.hovering_trash);

        let far = controller.dispatch(BoardEvent::drag_move(&id, 100.0, 100.0));
        assert!(!far.hovering_trash);
        assert_eq!(
            far.outcome,
            Outcome::Dragging {
                position: Point::new(100.0, 100.0)
            }
        );
        assert_eq!(
            controller.visual_position(&id),
            Some(Point::new(100.0, 100.0))
        );
        // Store untouched while dragging
        assert_eq!(
            controller.store().get(&id).unwrap().position(),
            Point::new(56.0, 500.0)
        );
    }

    #[test]
    fn test_photo_at_prefers_topmost() {
        let mut controller = controller();
        let first = capture(&mut controller);
        controller.dispatch(BoardEvent::drag_start(&first, 56.0, 500.0));
        controller.dispatch(BoardEvent::drag_end(&first, 10.0, 10.0));
        let second = capture(&mut controller);
        controller.dispatch(BoardEvent::drag_start(&second, 56.0, 500.0));
        controller.dispatch(BoardEvent::drag_end(&second, 50.0, 50.0));

        assert_eq!(controller.photo_at(Point::new(60.0, 60.0)), Some(&second));
        assert_eq!(controller.photo_at(Point::new(20.0, 20.0)), Some(&first));
        assert_eq!(controller.photo_at(Point::new(400.0, 20.0)), None);
    }
}
