// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the photo store and placement controller

use chrono::Utc;
use polaroid_booth::board::{
    BoardEvent, BoardLayout, ImageRef, Outcome, PhotoId, PhotoStore, PlacementController, Point,
    PointerSample, Rect, Size,
};
use polaroid_booth::errors::BoardError;
use polaroid_booth::storage::MemoryStore;

fn store() -> PhotoStore {
    PhotoStore::empty(Box::new(MemoryStore::new()))
}

fn controller() -> PlacementController {
    PlacementController::new(
        store(),
        Box::new(Rect::new(700.0, 500.0, 780.0, 580.0)),
        BoardLayout {
            photo_size: Size::new(256.0, 320.0),
            hover_margin: 50.0,
            capture_anchor: Point::new(56.0, 500.0),
            placement_jitter: 40.0,
        },
    )
}

fn capture(controller: &mut PlacementController) -> PhotoId {
    let feedback = controller.dispatch(BoardEvent::PhotoCaptured {
        image: ImageRef::new("photo.png"),
        captured_at: Utc::now(),
    });
    match feedback.outcome {
        Outcome::Added(id) => id,
        other => panic!("expected a new photo, got {:?}", other),
    }
}

/// Press on the photo's own corner and release at `(x, y)`
fn drag_to(controller: &mut PlacementController, id: &PhotoId, x: f32, y: f32) -> Outcome {
    let start = controller.store().get(id).unwrap().position();
    controller.dispatch(BoardEvent::drag_start(id, start.x, start.y));
    controller.dispatch(BoardEvent::drag_end(id, x, y)).outcome
}

#[test]
fn test_add_then_place_clears_pending_gate() {
    let mut store = store();
    let id = store
        .add_photo(ImageRef::new("a.png"), Utc::now(), 10.0, 10.0, 5.0)
        .unwrap();
    assert!(store.has_pending_photo());

    let second = store.add_photo(ImageRef::new("b.png"), Utc::now(), 0.0, 0.0, 0.0);
    assert_eq!(second, Err(BoardError::PendingPhoto));
    assert_eq!(store.len(), 1);

    assert!(store.update_position(&id, 200.0, 300.0));
    let photo = store.get(&id).unwrap();
    assert!(photo.placed);
    assert_eq!(photo.position(), Point::new(200.0, 300.0));
    assert!(!store.has_pending_photo());
}

#[test]
fn test_at_most_one_pending_photo() {
    let mut controller = controller();
    for _ in 0..5 {
        let id = capture(&mut controller);
        let rejected = controller.dispatch(BoardEvent::PhotoCaptured {
            image: ImageRef::new("extra.png"),
            captured_at: Utc::now(),
        });
        assert_eq!(rejected.outcome, Outcome::Rejected(BoardError::PendingPhoto));

        let pending = controller.store().photos().iter().filter(|p| !p.placed).count();
        assert_eq!(pending, 1);
        drag_to(&mut controller, &id, 300.0, 100.0);
    }
    assert_eq!(controller.store().len(), 5);
    assert!(!controller.store().has_pending_photo());
}

#[test]
fn test_new_photo_lands_near_anchor_with_small_tilt() {
    let mut controller = controller();
    let id = capture(&mut controller);
    let photo = controller.store().get(&id).unwrap();

    assert!((56.0..96.0).contains(&photo.x));
    assert!((500.0..540.0).contains(&photo.y));
    assert!((-10.0..10.0).contains(&photo.rotation_degrees));
    assert!(!photo.pinned);
    assert!(!photo.placed);
}

#[test]
fn test_drop_inside_trash_removes_photo() {
    let mut controller = controller();
    let id = capture(&mut controller);

    let outcome = drag_to(&mut controller, &id, 750.0, 540.0);
    assert!(matches!(outcome, Outcome::Trashed(ref record) if record.id == id));
    assert!(controller.store().is_empty());
    assert!(!controller.store().has_pending_photo());
}

#[test]
fn test_drop_just_outside_trash_places_photo() {
    let mut controller = controller();
    let id = capture(&mut controller);

    let outcome = drag_to(&mut controller, &id, 781.0, 540.0);
    assert_eq!(
        outcome,
        Outcome::Placed {
            position: Point::new(781.0, 540.0)
        }
    );
    let photo = controller.store().get(&id).unwrap();
    assert_eq!(photo.position(), Point::new(781.0, 540.0));
    assert!(photo.placed);
}

#[test]
fn test_trash_edges_are_inclusive() {
    for (x, y) in [(700.0, 500.0), (780.0, 580.0), (700.0, 580.0), (780.0, 540.0)] {
        let mut controller = controller();
        let id = capture(&mut controller);
        assert!(
            matches!(drag_to(&mut controller, &id, x, y), Outcome::Trashed(_)),
            "drop at ({}, {}) should hit the trash",
            x,
            y
        );
    }
}

#[test]
fn test_pin_toggle_round_trips_and_freezes_position() {
    let mut controller = controller();
    let id = capture(&mut controller);
    drag_to(&mut controller, &id, 200.0, 200.0);

    let pinned = controller.dispatch(BoardEvent::TogglePin { id: id.clone() });
    assert_eq!(pinned.outcome, Outcome::PinToggled { pinned: true });

    // Drags on a pinned photo never start
    let start = controller.dispatch(BoardEvent::drag_start(&id, 200.0, 200.0));
    assert_eq!(start.outcome, Outcome::Ignored);
    let end = controller.dispatch(BoardEvent::drag_end(&id, 750.0, 540.0));
    assert_eq!(end.outcome, Outcome::Ignored);
    assert_eq!(
        controller.store().get(&id).unwrap().position(),
        Point::new(200.0, 200.0)
    );

    let unpinned = controller.dispatch(BoardEvent::TogglePin { id: id.clone() });
    assert_eq!(unpinned.outcome, Outcome::PinToggled { pinned: false });
    assert!(!controller.store().get(&id).unwrap().pinned);
}

#[test]
fn test_pinned_store_ignores_position_updates() {
    let mut store = store();
    let id = store
        .add_photo(ImageRef::new("a.png"), Utc::now(), 10.0, 10.0, 0.0)
        .unwrap();
    store.update_position(&id, 50.0, 60.0);
    store.toggle_pin(&id);

    assert!(!store.update_position(&id, 500.0, 600.0));
    assert_eq!(store.get(&id).unwrap().position(), Point::new(50.0, 60.0));
}

#[test]
fn test_pinning_mid_drag_blocks_the_drop() {
    let mut controller = controller();
    let id = capture(&mut controller);
    drag_to(&mut controller, &id, 200.0, 200.0);

    controller.dispatch(BoardEvent::drag_start(&id, 200.0, 200.0));
    controller.dispatch(BoardEvent::TogglePin { id: id.clone() });
    let end = controller.dispatch(BoardEvent::drag_end(&id, 750.0, 540.0));

    assert_eq!(end.outcome, Outcome::Ignored);
    assert!(!controller.is_dragging(&id));
    assert_eq!(controller.store().len(), 1);
}

#[test]
fn test_moves_without_drag_are_ignored() {
    let mut controller = controller();
    let id = capture(&mut controller);

    let moved = controller.dispatch(BoardEvent::drag_move(&id, 10.0, 10.0));
    assert_eq!(moved.outcome, Outcome::Ignored);
    let ended = controller.dispatch(BoardEvent::drag_end(&id, 750.0, 540.0));
    assert_eq!(ended.outcome, Outcome::Ignored);
    assert_eq!(controller.store().len(), 1);
}

#[test]
fn test_cancel_commits_last_pointer_position() {
    let mut controller = controller();
    let id = capture(&mut controller);
    let start = controller.store().get(&id).unwrap().position();

    controller.dispatch(BoardEvent::drag_start(&id, start.x, start.y));
    controller.dispatch(BoardEvent::drag_move(&id, 320.0, 240.0));
    let cancelled = controller.dispatch(BoardEvent::DragCancel { id: id.clone() });

    assert_eq!(
        cancelled.outcome,
        Outcome::Placed {
            position: Point::new(320.0, 240.0)
        }
    );
    assert!(!controller.store().has_pending_photo());
}

#[test]
fn test_touch_pointer_uses_first_changed_touch() {
    let mut controller = controller();
    let id = capture(&mut controller);
    let start = controller.store().get(&id).unwrap().position();

    controller.dispatch(BoardEvent::DragStart {
        id: id.clone(),
        pointer: PointerSample::Touch {
            changed: vec![start],
        },
    });
    let end = controller.dispatch(BoardEvent::DragEnd {
        id: id.clone(),
        pointer: PointerSample::Touch {
            changed: vec![Point::new(400.0, 100.0), Point::new(0.0, 0.0)],
        },
    });

    assert_eq!(
        end.outcome,
        Outcome::Placed {
            position: Point::new(400.0, 100.0)
        }
    );
}

#[test]
fn test_explicit_delete_ignores_trash() {
    let mut controller = controller();
    let id = capture(&mut controller);
    drag_to(&mut controller, &id, 100.0, 100.0);

    let deleted = controller.dispatch(BoardEvent::Delete { id: id.clone() });
    assert!(matches!(deleted.outcome, Outcome::Deleted(_)));
    let again = controller.dispatch(BoardEvent::Delete { id });
    assert_eq!(again.outcome, Outcome::Ignored);
}

#[test]
fn test_trash_target_can_move() {
    let mut controller = controller();
    let id = capture(&mut controller);
    controller.set_trash(Box::new(Rect::new(0.0, 0.0, 50.0, 50.0)));

    assert!(matches!(
        drag_to(&mut controller, &id, 25.0, 25.0),
        Outcome::Trashed(_)
    ));
}
