// SPDX-License-Identifier: GPL-3.0-only
// Shared types for camera backend abstraction

//! Shared types for camera backends

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

/// Camera backend type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CameraBackendType {
    /// Video4Linux2 capture nodes (/dev/video*)
    #[default]
    V4l2,
    /// In-process camera producing a test pattern
    Virtual,
}

impl std::fmt::Display for CameraBackendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CameraBackendType::V4l2 => write!(f, "v4l2"),
            CameraBackendType::Virtual => write!(f, "virtual"),
        }
    }
}

impl FromStr for CameraBackendType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v4l2" | "v4l" => Ok(CameraBackendType::V4l2),
            "virtual" | "mock" => Ok(CameraBackendType::Virtual),
            other => Err(format!("unknown camera backend '{}' (expected v4l2 or virtual)", other)),
        }
    }
}

/// Device information from V4L2 capability
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Name of the device (V4L2 card)
    pub card: String,
    /// Driver name (V4L2 driver)
    pub driver: String,
    /// Device path (e.g., /dev/video0)
    pub path: String,
    /// Real device path (resolved symlinks)
    pub real_path: String,
}

/// Represents a camera device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    pub name: String,
    pub path: String,
    pub device_info: Option<DeviceInfo>,
}

impl CameraDevice {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            device_info: None,
        }
    }
}

impl std::fmt::Display for CameraDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.path)
    }
}

/// Negotiated capture format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraFormat {
    pub width: u32,
    pub height: u32,
    /// FourCC as text (e.g., "YUYV", "MJPG", "RGB3")
    pub pixel_format: String,
}

impl std::fmt::Display for CameraFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{} {}", self.width, self.height, self.pixel_format)
    }
}

/// A single frame grabbed from an acquired camera
///
/// `data` is empty when the backend can only report the negotiated format
/// (V4L2 without the `v4l2-streaming` feature).
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub format: CameraFormat,
    pub data: Arc<[u8]>,
    /// Path of the device that produced the frame
    pub source: String,
    pub captured_at: DateTime<Local>,
}

impl CameraFrame {
    pub fn width(&self) -> u32 {
        self.format.width
    }

    pub fn height(&self) -> u32 {
        self.format.height
    }

    /// Whether pixel data was captured
    pub fn has_pixels(&self) -> bool {
        !self.data.is_empty()
    }
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Backend errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Backend (capture API) not available on this system
    NotAvailable(String),
    /// No matching capture device
    DeviceNotFound(String),
    /// Access to the device was refused
    PermissionDenied(String),
    /// Another handle holds the camera
    Busy,
    /// Device opened but could not be configured
    InitializationFailed(String),
    /// Frame capture failed
    CaptureFailed(String),
    /// I/O error
    IoError(String),
    /// Other error
    Other(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::NotAvailable(msg) => write!(f, "Backend not available: {}", msg),
            BackendError::DeviceNotFound(msg) => write!(f, "Device not found: {}", msg),
            BackendError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
            BackendError::Busy => write!(f, "Camera is already in use"),
            BackendError::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            BackendError::CaptureFailed(msg) => write!(f, "Capture failed: {}", msg),
            BackendError::IoError(msg) => write!(f, "I/O error: {}", msg),
            BackendError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => BackendError::PermissionDenied(err.to_string()),
            std::io::ErrorKind::NotFound => BackendError::DeviceNotFound(err.to_string()),
            _ => BackendError::IoError(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_type_parsing() {
        assert_eq!("v4l2".parse::<CameraBackendType>(), Ok(CameraBackendType::V4l2));
        assert_eq!(" Virtual ".parse::<CameraBackendType>(), Ok(CameraBackendType::Virtual));
        assert!("pipewire".parse::<CameraBackendType>().is_err());
    }

    #[test]
    fn test_io_permission_error_maps_to_permission_denied() {
        let io = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
        assert!(matches!(BackendError::from(io), BackendError::PermissionDenied(_)));
    }
}
