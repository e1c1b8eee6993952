// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the photo booth

use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Camera / frame source errors
    Capture(CaptureError),
    /// Persistence and image library errors
    Storage(StorageError),
    /// Board rule violations
    Board(BoardError),
    /// Configuration errors
    Config(String),
    /// Generic error with message
    Other(String),
}

/// Errors raised while acquiring or reading a frame source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// The user refused access to the camera
    PermissionDenied,
    /// No camera (or source file) was found
    NotFound(String),
    /// The device is held by another process
    Busy,
    /// A frame was requested while the source is stopped
    NotStarted,
    /// The frame could not be turned into an image
    ProcessingFailed(String),
    /// Anything else
    Other(String),
}

/// Persistence and image library errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Reading or writing the backing file failed
    Io(String),
    /// The persisted collection could not be decoded
    Malformed(String),
    /// Image encoding or decoding failed
    Image(String),
}

/// Board rule violations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// A new photo was offered while another one still waits for placement
    PendingPhoto,
    /// The referenced photo does not exist
    UnknownPhoto(String),
}

impl CaptureError {
    /// Short message suitable for showing inside the camera lens
    pub fn user_message(&self) -> &'static str {
        match self {
            CaptureError::PermissionDenied => "Please allow camera access",
            CaptureError::NotFound(_) => "No camera device found",
            CaptureError::Busy => "Camera is in use by another application",
            _ => "Unable to access camera",
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Capture(e) => write!(f, "Capture error: {}", e),
            AppError::Storage(e) => write!(f, "Storage error: {}", e),
            AppError::Board(e) => write!(f, "Board error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::PermissionDenied => write!(f, "Camera access denied"),
            CaptureError::NotFound(what) => write!(f, "Camera not found: {}", what),
            CaptureError::Busy => write!(f, "Camera is busy"),
            CaptureError::NotStarted => write!(f, "Camera is not started"),
            CaptureError::ProcessingFailed(msg) => write!(f, "Frame processing failed: {}", msg),
            CaptureError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(msg) => write!(f, "I/O error: {}", msg),
            StorageError::Malformed(msg) => write!(f, "Malformed saved data: {}", msg),
            StorageError::Image(msg) => write!(f, "Image error: {}", msg),
        }
    }
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::PendingPhoto => write!(f, "A photo is still waiting to be placed"),
            BoardError::UnknownPhoto(id) => write!(f, "No photo with id {}", id),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for CaptureError {}
impl std::error::Error for StorageError {}
impl std::error::Error for BoardError {}

impl From<CaptureError> for AppError {
    fn from(err: CaptureError) -> Self {
        AppError::Capture(err)
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Storage(err)
    }
}

impl From<BoardError> for AppError {
    fn from(err: BoardError) -> Self {
        AppError::Board(err)
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Malformed(err.to_string())
    }
}

impl From<image::ImageError> for StorageError {
    fn from(err: image::ImageError) -> Self {
        StorageError::Image(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(StorageError::from(err))
    }
}

impl From<std::io::Error> for CaptureError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => CaptureError::NotFound(err.to_string()),
            std::io::ErrorKind::PermissionDenied => CaptureError::PermissionDenied,
            _ => CaptureError::Other(err.to_string()),
        }
    }
}
