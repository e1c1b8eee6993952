// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for the photo board
//!
//! This module provides command-line functionality for:
//! - Listing photos and filters
//! - Taking a photo without the interactive board
//! - Moving, pinning, deleting and downloading photos

use chrono::Local;
use polaroid_booth::app::{Booth, FilterType, ShutterOutcome};
use polaroid_booth::board::{BoardEvent, Outcome, PhotoId, Point};
use polaroid_booth::errors::{AppError, BoardError};
use std::path::PathBuf;
use std::time::Instant;

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// List all photos on the board
pub fn list_photos(booth: &Booth) -> CliResult {
    let photos = booth.store().photos();
    if photos.is_empty() {
        println!("The board is empty.");
        return Ok(());
    }

    println!("Photos on the board:");
    println!();
    for photo in photos {
        let mut flags = Vec::new();
        if photo.pinned {
            flags.push("pinned");
        }
        if !photo.placed {
            flags.push("pending");
        }

        println!("  {}", photo.id);
        println!(
            "      Taken: {}",
            photo
                .captured_at
                .with_timezone(&Local)
                .format("%Y-%m-%d %I:%M %p")
        );
        println!(
            "      Position: ({:.0}, {:.0})  Tilt: {:+.1}°{}",
            photo.x,
            photo.y,
            photo.rotation_degrees,
            if flags.is_empty() {
                String::new()
            } else {
                format!("  [{}]", flags.join(", "))
            }
        );
        println!("      Image: {}", booth.library().path(&photo.image).display());
        println!();
    }

    Ok(())
}

/// List the available filters
pub fn list_filters() -> CliResult {
    println!("Available filters:");
    println!();
    for filter in FilterType::ALL {
        let [r, g, b] = filter.swatch_color();
        println!(
            "  {:<7} #{:02x}{:02x}{:02x}  {}",
            filter.display_name(),
            r,
            g,
            b,
            filter.css_value()
        );
    }
    Ok(())
}

/// Take a photo and place it on the board
///
/// Without `at` the photo stays where it landed; it is still committed with
/// a zero-distance drag so it survives a restart.
pub fn snap(booth: &mut Booth, filter: Option<FilterType>, at: Option<Point>) -> CliResult {
    if let Some(filter) = filter {
        booth.camera_mut().set_filter(filter);
    }

    println!("Using source: {}", booth.camera().source_name());
    if !booth.camera().is_open() {
        expect_shutter(booth.shutter(Instant::now()), ShutterOutcome::Opened)?;
    }
    expect_shutter(booth.shutter(Instant::now()), ShutterOutcome::Printing)?;

    let photo = booth
        .camera_mut()
        .finish_print_now()
        .ok_or_else(|| AppError::Other("Camera produced no photo".into()))?;
    let feedback = booth.deliver(photo)?;
    let id = match feedback.outcome {
        Outcome::Added(id) => id,
        Outcome::Rejected(e) => return Err(AppError::Board(e).into()),
        other => return Err(format!("Unexpected result: {:?}", other).into()),
    };

    let landed = booth
        .store()
        .get(&id)
        .map(|p| p.position())
        .ok_or_else(|| BoardError::UnknownPhoto(id.to_string()))?;
    let target = at.unwrap_or(landed);
    let outcome = drag(booth, &id, landed, target);

    println!("Filter: {}", booth.camera().filter().display_name());
    report(&id, &outcome);
    booth.shutdown()?;
    Ok(())
}

/// Drag a photo to a new position, dropping it on the trash if it lands there
pub fn move_photo(booth: &mut Booth, id: &str, x: f32, y: f32) -> CliResult {
    let id = PhotoId::from(id);
    let from = booth
        .store()
        .get(&id)
        .map(|p| p.position())
        .ok_or_else(|| BoardError::UnknownPhoto(id.to_string()))?;

    let outcome = drag(booth, &id, from, Point::new(x, y));
    report(&id, &outcome);
    booth.shutdown()?;
    Ok(())
}

/// Toggle the pin of a photo
pub fn pin_photo(booth: &mut Booth, id: &str) -> CliResult {
    let id = PhotoId::from(id);
    let feedback = booth.dispatch(BoardEvent::TogglePin { id: id.clone() });
    if feedback.outcome == Outcome::Ignored {
        return Err(AppError::Board(BoardError::UnknownPhoto(id.to_string())).into());
    }
    report(&id, &feedback.outcome);
    booth.shutdown()?;
    Ok(())
}

/// Delete a photo and its image
pub fn delete_photo(booth: &mut Booth, id: &str) -> CliResult {
    let id = PhotoId::from(id);
    let feedback = booth.dispatch(BoardEvent::Delete { id: id.clone() });
    if feedback.outcome == Outcome::Ignored {
        return Err(AppError::Board(BoardError::UnknownPhoto(id.to_string())).into());
    }
    report(&id, &feedback.outcome);
    booth.shutdown()?;
    Ok(())
}

/// Download a photo as a polaroid PNG
pub fn export_photo(booth: &Booth, id: &str, output: Option<PathBuf>) -> CliResult {
    let id = PhotoId::from(id);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let path = runtime.block_on(booth.export(&id, output.as_deref()))?;
    println!("Saved: {}", path.display());
    Ok(())
}

/// A full gesture: press at `from`, release at `to`
fn drag(booth: &mut Booth, id: &PhotoId, from: Point, to: Point) -> Outcome {
    let started = booth.dispatch(BoardEvent::drag_start(id, from.x, from.y));
    if started.outcome != Outcome::DragStarted {
        return started.outcome;
    }
    booth.dispatch(BoardEvent::drag_end(id, to.x, to.y)).outcome
}

fn expect_shutter(outcome: ShutterOutcome, expected: ShutterOutcome) -> Result<(), AppError> {
    match outcome {
        o if o == expected => Ok(()),
        ShutterOutcome::Failed(e) => Err(AppError::Other(e.user_message().to_string())),
        ShutterOutcome::Refused => Err(AppError::Board(BoardError::PendingPhoto)),
        other => Err(AppError::Other(format!("Shutter did not fire: {:?}", other))),
    }
}

fn report(id: &PhotoId, outcome: &Outcome) {
    match outcome {
        Outcome::Placed { position } => {
            println!("{} placed at ({:.0}, {:.0})", id, position.x, position.y)
        }
        Outcome::Trashed(_) => println!("{} dropped in the trash", id),
        Outcome::Deleted(_) => println!("{} deleted", id),
        Outcome::PinToggled { pinned: true } => println!("{} pinned", id),
        Outcome::PinToggled { pinned: false } => println!("{} unpinned", id),
        Outcome::Ignored => println!("{} is pinned and stays put", id),
        other => println!("{}: {:?}", id, other),
    }
}
