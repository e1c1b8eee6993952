// SPDX-License-Identifier: GPL-3.0-only

//! The photo booth
//!
//! [`Booth`] wires the camera to the board: a shutter press goes through the
//! [`CameraSession`], a finished print is encoded into the photo library and
//! handed to the [`PlacementController`] as a new photo, and destroyed photos
//! take their image file with them.
//!
//! # Architecture
//!
//! - `state`: filter types and the camera shutter state machine
//!
//! # Main Types
//!
//! - `Booth`: camera, board and photo library behind one owner
//! - `ExportJob`: a polaroid download that can run off the UI thread

mod state;

pub use state::{CameraSession, FilterType, PrintState, ShutterOutcome};

use crate::backends::camera::FrameSource;
use crate::board::{BoardEvent, Feedback, Outcome, PhotoId, PhotoStore, PlacementController, Size};
use crate::config::Config;
use crate::errors::{AppError, AppResult, BoardError};
use crate::pipelines::photo::{
    CapturedPhoto, PhotoEncoder, caption_text, download_file_name, render_polaroid,
};
use crate::storage::{JsonFileStore, PhotoLibrary, PhotoPersistence};
use chrono::Local;
use image::RgbaImage;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

pub struct Booth {
    config: Config,
    controller: PlacementController,
    camera: CameraSession,
    library: PhotoLibrary,
    encoder: PhotoEncoder,
    hovering_trash: bool,
}

impl Booth {
    /// Open the booth on the configured data directory
    pub fn open(config: Config, source: Box<dyn FrameSource>) -> Self {
        let persistence = JsonFileStore::new(config.data_dir(), &config.storage_key);
        let library = PhotoLibrary::new(config.photos_dir());
        info!(
            data_dir = %config.data_dir().display(),
            key = %config.storage_key,
            "Opening photo booth"
        );
        Self::with_parts(config, Box::new(persistence), library, source)
    }

    /// Assemble a booth from explicit parts
    pub fn with_parts(
        config: Config,
        persistence: Box<dyn PhotoPersistence>,
        library: PhotoLibrary,
        source: Box<dyn FrameSource>,
    ) -> Self {
        let store = PhotoStore::open(persistence);
        let controller = PlacementController::new(
            store,
            Box::new(config.trash_bounds()),
            config.board_layout(),
        );
        let camera = CameraSession::new(source, config.default_filter);

        Self {
            config,
            controller,
            camera,
            library,
            encoder: PhotoEncoder::new(),
            hovering_trash: false,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn controller(&self) -> &PlacementController {
        &self.controller
    }

    pub fn store(&self) -> &PhotoStore {
        self.controller.store()
    }

    pub fn camera(&self) -> &CameraSession {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut CameraSession {
        &mut self.camera
    }

    pub fn library(&self) -> &PhotoLibrary {
        &self.library
    }

    /// Whether the trash should be highlighted
    pub fn hovering_trash(&self) -> bool {
        self.hovering_trash
    }

    /// Press the shutter, respecting the board's pending photo gate
    pub fn shutter(&mut self, now: Instant) -> ShutterOutcome {
        let pending = self.controller.store().has_pending_photo();
        self.camera.shutter(now, pending)
    }

    /// Advance the print timer, delivering the photo when it is done
    pub fn tick(&mut self, now: Instant) -> Option<AppResult<Feedback>> {
        let photo = self.camera.poll_print(now)?;
        Some(self.deliver(photo))
    }

    /// Store a printed photo and put it on the board
    pub fn deliver(&mut self, photo: CapturedPhoto) -> AppResult<Feedback> {
        let png = self.encoder.encode_png(&photo.image)?;
        let image = self.library.store_png(&png)?;

        let feedback = self.controller.dispatch(BoardEvent::PhotoCaptured {
            image: image.clone(),
            captured_at: photo.captured_at,
        });
        if let Outcome::Rejected(e) = &feedback.outcome {
            warn!(error = %e, "Printed photo rejected by the board");
            self.library.remove(&image);
        }
        Ok(feedback)
    }

    /// Forward a board event, cleaning up images of destroyed photos
    pub fn dispatch(&mut self, event: BoardEvent) -> Feedback {
        let feedback = self.controller.dispatch(event);

        match &feedback.outcome {
            Outcome::Trashed(record) | Outcome::Deleted(record) => {
                self.library.remove(&record.image);
            }
            _ => {}
        }
        self.hovering_trash =
            matches!(feedback.outcome, Outcome::Dragging { .. }) && feedback.hovering_trash;

        feedback
    }

    /// Follow a new canvas size: the trash and capture anchor move with it
    pub fn resize(&mut self, canvas: Size) {
        if self.config.canvas == canvas {
            return;
        }
        debug!(width = canvas.width, height = canvas.height, "Canvas resized");
        self.config.canvas = canvas;
        self.controller.set_trash(Box::new(self.config.trash_bounds()));
        self.controller.set_layout(self.config.board_layout());
    }

    /// Gather everything needed to download a photo as a polaroid
    pub fn prepare_export(&self, id: &PhotoId, output_dir: Option<&Path>) -> AppResult<ExportJob> {
        let record = self
            .controller
            .store()
            .get(id)
            .ok_or_else(|| BoardError::UnknownPhoto(id.to_string()))?;

        Ok(ExportJob {
            image: self.library.load_rgba(&record.image)?,
            caption: caption_text(&record.captured_at.with_timezone(&Local)),
            file_name: download_file_name(record.timestamp_millis()),
            output_dir: output_dir
                .map(Path::to_path_buf)
                .unwrap_or_else(|| self.config.output_dir()),
            encoder: self.encoder,
        })
    }

    /// Download a photo as a polaroid PNG
    pub async fn export(&self, id: &PhotoId, output_dir: Option<&Path>) -> AppResult<PathBuf> {
        self.prepare_export(id, output_dir)?.run().await
    }

    /// Close the camera, drop an unplaced photo and write the collection one last time
    pub fn shutdown(&mut self) -> AppResult<()> {
        if self.camera.is_open() {
            self.camera.toggle();
        }
        // Pending photos are never saved, so their image would be orphaned
        if let Some(pending) = self.controller.store().pending_photo() {
            let id = pending.id.clone();
            debug!(id = %id, "Discarding unplaced photo on shutdown");
            self.dispatch(BoardEvent::Delete { id });
        }
        self.controller.store().flush()?;
        info!(photos = self.controller.store().len(), "Photo booth shut down");
        Ok(())
    }
}

impl std::fmt::Debug for Booth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Booth")
            .field("controller", &self.controller)
            .field("camera", &self.camera)
            .finish()
    }
}

/// A polaroid download, independent of the booth once prepared
pub struct ExportJob {
    image: RgbaImage,
    caption: String,
    file_name: String,
    output_dir: PathBuf,
    encoder: PhotoEncoder,
}

impl ExportJob {
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Render, encode and write the polaroid
    pub async fn run(self) -> AppResult<PathBuf> {
        let ExportJob {
            image,
            caption,
            file_name,
            output_dir,
            encoder,
        } = self;

        let print = tokio::task::spawn_blocking(move || render_polaroid(&image, &caption))
            .await
            .map_err(|e| AppError::Other(format!("Render task error: {}", e)))?;
        let png = encoder.encode(print).await?;
        let path = encoder.save(png, &output_dir, &file_name).await?;

        info!(path = %path.display(), "Polaroid downloaded");
        Ok(path)
    }
}
