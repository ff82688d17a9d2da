// SPDX-License-Identifier: MPL-2.0

//! Error types for the check-in kiosk

use crate::backends::camera::BackendError;
use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Camera-related errors
    Camera(CameraError),
    /// Recognition collaborator errors
    Recognition(RecognitionError),
    /// Configuration errors
    Config(ConfigError),
    /// Terminal/IO errors
    Io(String),
    /// Generic error with message
    Other(String),
}

/// Camera acquisition errors
///
/// Both kinds are recovered on the current screen: the kiosk shows
/// [`CameraError::user_message`] and keeps the patient on the same step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    /// No capture device, permission denied, or device already held
    DeviceUnavailable(String),
    /// No capture API on this platform
    UnsupportedPlatform,
}

/// Recognition collaborator errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionError {
    /// The submitted frame could not be used
    InvalidFrame(String),
    /// The collaborator did not answer
    Unreachable(String),
}

/// Configuration errors
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// No platform configuration directory
    NoConfigDir,
    /// Reading or writing the config file failed
    Io(String),
    /// The config file is not valid JSON for [`crate::Config`]
    Parse(String),
}

impl CameraError {
    /// Text shown on the screen when acquisition fails
    pub fn user_message(&self) -> &'static str {
        match self {
            CameraError::DeviceUnavailable(_) => {
                "Error: Cannot access camera. Please check permissions."
            }
            CameraError::UnsupportedPlatform => {
                "Error: This platform does not support camera access."
            }
        }
    }
}

impl RecognitionError {
    pub fn user_message(&self) -> &'static str {
        match self {
            RecognitionError::InvalidFrame(_) => {
                "Error: The camera image could not be used. Please try again."
            }
            RecognitionError::Unreachable(_) => {
                "Error: Recognition service unavailable. Please see the front desk."
            }
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Camera(e) => write!(f, "Camera error: {}", e),
            AppError::Recognition(e) => write!(f, "Recognition error: {}", e),
            AppError::Config(e) => write!(f, "Configuration error: {}", e),
            AppError::Io(msg) => write!(f, "I/O error: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::DeviceUnavailable(msg) => write!(f, "Camera unavailable: {}", msg),
            CameraError::UnsupportedPlatform => write!(f, "Camera capture is not supported here"),
        }
    }
}

impl fmt::Display for RecognitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecognitionError::InvalidFrame(msg) => write!(f, "Invalid frame: {}", msg),
            RecognitionError::Unreachable(msg) => write!(f, "Service unreachable: {}", msg),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoConfigDir => write!(f, "No configuration directory on this system"),
            ConfigError::Io(msg) => write!(f, "{}", msg),
            ConfigError::Parse(msg) => write!(f, "Invalid config file: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for CameraError {}
impl std::error::Error for RecognitionError {}
impl std::error::Error for ConfigError {}

// Backend failures collapse into the two kinds the screens know about
impl From<BackendError> for CameraError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::NotAvailable(_) => CameraError::UnsupportedPlatform,
            other => CameraError::DeviceUnavailable(other.to_string()),
        }
    }
}

impl From<CameraError> for AppError {
    fn from(err: CameraError) -> Self {
        AppError::Camera(err)
    }
}

impl From<RecognitionError> for AppError {
    fn from(err: RecognitionError) -> Self {
        AppError::Recognition(err)
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err)
    }
}

impl From<BackendError> for AppError {
    fn from(err: BackendError) -> Self {
        AppError::Camera(err.into())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Other(format!("JSON error: {}", err))
    }
}

impl From<ctrlc::Error> for AppError {
    fn from(err: ctrlc::Error) -> Self {
        AppError::Other(format!("Failed to install Ctrl+C handler: {}", err))
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_not_available_maps_to_unsupported_platform() {
        let err: CameraError = BackendError::NotAvailable("no V4L2".into()).into();
        assert_eq!(err, CameraError::UnsupportedPlatform);
    }

    #[test]
    fn test_backend_error_reaches_app_error_as_camera() {
        let err: AppError = BackendError::DeviceNotFound("/dev/video9".into()).into();
        assert!(matches!(err, AppError::Camera(CameraError::DeviceUnavailable(_))));
    }

    #[test]
    fn test_permission_denied_maps_to_device_unavailable() {
        let err: CameraError = BackendError::PermissionDenied("/dev/video0".into()).into();
        assert!(matches!(err, CameraError::DeviceUnavailable(_)));
        assert_eq!(
            err.user_message(),
            "Error: Cannot access camera. Please check permissions."
        );
    }
}
