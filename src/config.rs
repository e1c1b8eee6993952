// SPDX-License-Identifier: GPL-3.0-only

//! User configuration
//!
//! Read from `<config dir>/polaroid-booth/config.json`. Every field is
//! optional in the file; anything missing falls back to [`Config::default`].

use crate::app::FilterType;
use crate::board::{BoardLayout, Point, Rect, Size};
use crate::constants::{APP_DIR_NAME, DEFAULT_STORAGE_KEY, PHOTOS_SUBDIR, layout};
use crate::errors::AppError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the photo collection and images live (platform data dir if unset)
    pub data_dir: Option<PathBuf>,
    /// Where downloads are written (~/Pictures/polaroid-booth if unset)
    pub output_dir: Option<PathBuf>,
    /// Key the photo collection is saved under
    pub storage_key: String,
    /// Size of the board
    pub canvas: Size,
    /// Rendered size of one polaroid on the board
    pub photo_size: Size,
    pub trash_size: Size,
    /// Distance of the trash from the right and bottom edges of the board
    pub trash_inset: f32,
    /// Hover feedback distance around the trash
    pub trash_hover_margin: f32,
    /// Landing spot for new photos (bottom-left, near the camera, if unset)
    pub capture_anchor: Option<Point>,
    pub placement_jitter: f32,
    /// Filter selected when the camera opens
    pub default_filter: FilterType,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            output_dir: None,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            canvas: Size::new(layout::CANVAS_WIDTH, layout::CANVAS_HEIGHT),
            photo_size: Size::new(layout::PHOTO_WIDTH, layout::PHOTO_HEIGHT),
            trash_size: Size::new(layout::TRASH_WIDTH, layout::TRASH_HEIGHT),
            trash_inset: layout::TRASH_INSET,
            trash_hover_margin: layout::TRASH_HOVER_MARGIN,
            capture_anchor: None,
            placement_jitter: layout::PLACEMENT_JITTER,
            default_filter: FilterType::default(),
        }
    }
}

impl Config {
    /// Default location of the config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join("config.json"))
    }

    /// Load the config file at the default location
    pub fn load_default() -> Self {
        match Self::default_path() {
            Some(path) => Self::load(&path),
            None => Self::default(),
        }
    }

    /// Load a config file; a missing or unreadable file yields the defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(config) => {
                    debug!(path = %path.display(), "Loaded config");
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Invalid config file, using defaults");
                    Self::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not read config file, using defaults");
                Self::default()
            }
        }
    }

    /// Write the config as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Resolved data directory
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .or_else(dirs::home_dir)
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR_NAME)
        })
    }

    /// Directory holding captured images
    pub fn photos_dir(&self) -> PathBuf {
        self.data_dir().join(PHOTOS_SUBDIR)
    }

    /// Resolved download directory
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| {
            dirs::picture_dir()
                .or_else(|| dirs::home_dir().map(|home| home.join("Pictures")))
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR_NAME)
        })
    }

    /// Trash rectangle, anchored to the bottom-right corner of the canvas
    pub fn trash_bounds(&self) -> Rect {
        let right = self.canvas.width - self.trash_inset;
        let bottom = self.canvas.height - self.trash_inset;
        Rect::new(
            right - self.trash_size.width,
            bottom - self.trash_size.height,
            right,
            bottom,
        )
    }

    pub fn capture_anchor(&self) -> Point {
        self.capture_anchor.unwrap_or_else(|| {
            Point::new(
                layout::CAPTURE_ANCHOR_X,
                (self.canvas.height - layout::CAPTURE_ANCHOR_BOTTOM_OFFSET).max(0.0),
            )
        })
    }

    pub fn board_layout(&self) -> BoardLayout {
        BoardLayout {
            photo_size: self.photo_size,
            hover_margin: self.trash_hover_margin,
            capture_anchor: self.capture_anchor(),
            placement_jitter: self.placement_jitter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trash_sits_in_bottom_right_corner() {
        let config = Config::default();
        assert_eq!(
            config.trash_bounds(),
            Rect::new(1160.0, 664.0, 1240.0, 760.0)
        );
    }

    #[test]
    fn test_anchor_follows_canvas_height() {
        let mut config = Config::default();
        assert_eq!(config.capture_anchor(), Point::new(56.0, 500.0));

        config.canvas = Size::new(400.0, 200.0);
        assert_eq!(config.capture_anchor(), Point::new(56.0, 0.0));

        config.capture_anchor = Some(Point::new(1.0, 2.0));
        assert_eq!(config.capture_anchor(), Point::new(1.0, 2.0));
    }

    #[test]
    fn test_partial_file_uses_defaults_for_the_rest() {
        let config: Config = serde_json::from_str(r#"{"storage_key":"other"}"#).unwrap();
        assert_eq!(config.storage_key, "other");
        assert_eq!(config.trash_hover_margin, 50.0);
        assert_eq!(config.default_filter, FilterType::Normal);
    }
}
