// SPDX-License-Identifier: GPL-3.0-only

//! V4L2 camera backend
//!
//! Acquisition opens the capture node read/write and keeps the descriptor
//! until the stream is stopped, which is what makes the device show as busy
//! to other applications. Pixel capture uses memory-mapped streaming through
//! the `v4l` crate and is only compiled with the `v4l2-streaming` feature;
//! without it frames report the negotiated format and carry no pixels.

use super::types::*;
use super::v4l2_utils;
use super::{CameraBackend, CameraStream};
use std::fs::{File, OpenOptions};
use std::os::unix::io::AsRawFd;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// V4L2 backend
#[derive(Debug, Default)]
pub struct V4l2Backend;

impl V4l2Backend {
    pub fn new() -> Self {
        Self
    }
}

impl CameraBackend for V4l2Backend {
    fn enumerate_cameras(&self) -> Vec<CameraDevice> {
        let devices = v4l2_utils::enumerate_capture_devices();
        debug!(count = devices.len(), "Enumerated V4L2 capture devices");
        devices
    }

    fn open(&self, device: &CameraDevice) -> BackendResult<Box<dyn CameraStream>> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&device.path)
            .map_err(|e| match e.raw_os_error() {
                Some(libc::EBUSY) => BackendError::Busy,
                _ => BackendError::from(e),
            })?;

        if !v4l2_utils::is_capture_node(file.as_raw_fd()) {
            return Err(BackendError::InitializationFailed(format!(
                "{} is not a video capture device",
                device.path
            )));
        }

        let format = v4l2_utils::query_format(file.as_raw_fd());
        match &format {
            Some(format) => info!(device = %device.name, format = %format, "Opened V4L2 device"),
            None => warn!(device = %device.name, "Opened V4L2 device without a readable format"),
        }

        Ok(Box::new(V4l2Stream {
            device: device.clone(),
            file: Some(file),
            format,
        }))
    }

    fn backend_type(&self) -> CameraBackendType {
        CameraBackendType::V4l2
    }

    fn is_available(&self) -> bool {
        Path::new("/dev").is_dir() && Path::new("/sys/class/video4linux").exists()
    }
}

/// Held V4L2 device
struct V4l2Stream {
    device: CameraDevice,
    file: Option<File>,
    format: Option<CameraFormat>,
}

impl V4l2Stream {
    #[cfg_attr(feature = "v4l2-streaming", allow(dead_code))]
    fn negotiated_format(&self) -> CameraFormat {
        self.format.clone().unwrap_or(CameraFormat {
            width: 0,
            height: 0,
            pixel_format: "????".to_string(),
        })
    }
}

impl CameraStream for V4l2Stream {
    fn device(&self) -> &CameraDevice {
        &self.device
    }

    fn capture_frame(&mut self) -> BackendResult<CameraFrame> {
        if self.file.is_none() {
            return Err(BackendError::CaptureFailed(format!(
                "{} has been released",
                self.device.path
            )));
        }

        #[cfg(feature = "v4l2-streaming")]
        let (format, data) = capture_pixels(&self.device.path)?;

        #[cfg(not(feature = "v4l2-streaming"))]
        let (format, data) = (self.negotiated_format(), Vec::new());

        Ok(CameraFrame {
            format,
            data: Arc::from(data),
            source: self.device.path.clone(),
            captured_at: chrono::Local::now(),
        })
    }

    fn stop(&mut self) {
        if let Some(file) = self.file.take() {
            drop(file);
            info!(device = %self.device.path, "Closed V4L2 device");
        }
    }
}

impl Drop for V4l2Stream {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Grab one frame through a short-lived memory-mapped stream
#[cfg(feature = "v4l2-streaming")]
fn capture_pixels(path: &str) -> BackendResult<(CameraFormat, Vec<u8>)> {
    use v4l::buffer::Type;
    use v4l::io::mmap::Stream;
    use v4l::io::traits::CaptureStream;
    use v4l::video::Capture;

    let dev = v4l::Device::with_path(path)
        .map_err(|e| BackendError::InitializationFailed(format!("{}: {}", path, e)))?;
    let fmt = dev
        .format()
        .map_err(|e| BackendError::InitializationFailed(format!("format query: {}", e)))?;

    let mut stream = Stream::with_buffers(&dev, Type::VideoCapture, 4)
        .map_err(|e| BackendError::CaptureFailed(format!("buffer setup: {}", e)))?;
    let (buf, meta) = stream
        .next()
        .map_err(|e| BackendError::CaptureFailed(e.to_string()))?;

    let used = (meta.bytesused as usize).min(buf.len());
    debug!(path, bytes = used, "Captured V4L2 frame");

    Ok((
        CameraFormat {
            width: fmt.width,
            height: fmt.height,
            pixel_format: fmt.fourcc.to_string(),
        },
        buf[..used].to_vec(),
    ))
}
