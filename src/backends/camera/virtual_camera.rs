// SPDX-License-Identifier: GPL-3.0-only

//! Virtual camera backend
//!
//! An in-process camera that renders a test pattern. It stands in for real
//! hardware on demo kiosks and in tests, and can be told to fail the way real
//! devices do (no devices, permission refused, no capture API).

use super::types::*;
use super::{CameraBackend, CameraStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info};

/// Test pattern resolution
const PATTERN_WIDTH: u32 = 64;
const PATTERN_HEIGHT: u32 = 48;

/// Failure the virtual camera should reproduce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VirtualFault {
    /// Opening any device is refused
    PermissionDenied,
    /// The backend reports no capture API
    Unsupported,
}

/// Virtual camera backend
#[derive(Debug)]
pub struct VirtualBackend {
    devices: Vec<CameraDevice>,
    fault: Option<VirtualFault>,
    /// Streams currently open, shared with every stream
    open_streams: Arc<AtomicUsize>,
}

impl VirtualBackend {
    /// One working virtual camera
    pub fn new() -> Self {
        Self::with_devices(vec![CameraDevice::new(
            "OptiCheck Virtual Camera",
            "virtual:0",
        )])
    }

    pub fn with_devices(devices: Vec<CameraDevice>) -> Self {
        Self {
            devices,
            fault: None,
            open_streams: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A backend with no devices at all
    pub fn empty() -> Self {
        Self::with_devices(Vec::new())
    }

    pub fn with_fault(fault: VirtualFault) -> Self {
        Self {
            fault: Some(fault),
            ..Self::new()
        }
    }

    /// Shared counter of open streams, for observing releases
    pub fn open_streams(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.open_streams)
    }
}

impl Default for VirtualBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraBackend for VirtualBackend {
    fn enumerate_cameras(&self) -> Vec<CameraDevice> {
        if self.fault == Some(VirtualFault::Unsupported) {
            return Vec::new();
        }
        self.devices.clone()
    }

    fn open(&self, device: &CameraDevice) -> BackendResult<Box<dyn CameraStream>> {
        match self.fault {
            Some(VirtualFault::Unsupported) => {
                return Err(BackendError::NotAvailable(
                    "virtual camera configured as unsupported".to_string(),
                ));
            }
            Some(VirtualFault::PermissionDenied) => {
                return Err(BackendError::PermissionDenied(device.path.clone()));
            }
            None => {}
        }

        if !self.devices.iter().any(|d| d.path == device.path) {
            return Err(BackendError::DeviceNotFound(device.path.clone()));
        }

        self.open_streams.fetch_add(1, Ordering::SeqCst);
        info!(device = %device.name, "Opened virtual camera");

        Ok(Box::new(VirtualStream {
            device: device.clone(),
            open: true,
            frame_counter: 0,
            open_streams: Arc::clone(&self.open_streams),
        }))
    }

    fn backend_type(&self) -> CameraBackendType {
        CameraBackendType::Virtual
    }

    fn is_available(&self) -> bool {
        self.fault != Some(VirtualFault::Unsupported)
    }
}

struct VirtualStream {
    device: CameraDevice,
    open: bool,
    frame_counter: u32,
    open_streams: Arc<AtomicUsize>,
}

impl CameraStream for VirtualStream {
    fn device(&self) -> &CameraDevice {
        &self.device
    }

    fn capture_frame(&mut self) -> BackendResult<CameraFrame> {
        if !self.open {
            return Err(BackendError::CaptureFailed(format!(
                "{} has been released",
                self.device.path
            )));
        }

        self.frame_counter = self.frame_counter.wrapping_add(1);
        debug!(frame = self.frame_counter, "Rendering virtual frame");

        Ok(CameraFrame {
            format: CameraFormat {
                width: PATTERN_WIDTH,
                height: PATTERN_HEIGHT,
                pixel_format: "RGB3".to_string(),
            },
            data: Arc::from(test_pattern(self.frame_counter)),
            source: self.device.path.clone(),
            captured_at: chrono::Local::now(),
        })
    }

    fn stop(&mut self) {
        if self.open {
            self.open = false;
            self.open_streams.fetch_sub(1, Ordering::SeqCst);
            info!(device = %self.device.name, "Closed virtual camera");
        }
    }
}

impl Drop for VirtualStream {
    fn drop(&mut self) {
        self.stop();
    }
}

/// RGB24 gradient that shifts by one column per frame
fn test_pattern(frame: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity((PATTERN_WIDTH * PATTERN_HEIGHT * 3) as usize);
    for y in 0..PATTERN_HEIGHT {
        for x in 0..PATTERN_WIDTH {
            let shifted = (x + frame) % PATTERN_WIDTH;
            data.push((shifted * 255 / PATTERN_WIDTH) as u8);
            data.push((y * 255 / PATTERN_HEIGHT) as u8);
            data.push(0x9e);
        }
    }
    data
}
