// SPDX-License-Identifier: MPL-2.0

//! Backend abstraction layer for camera capture
//!
//! The kiosk screens never touch devices directly. They go through
//! [`camera::CameraSession`], which leases the single camera from the
//! [`camera::CameraBackendManager`] and hands it back on every exit path.
//!
//! # Modules
//!
//! - [`camera`]: Camera backends (V4L2, virtual), device enumeration and
//!   scoped acquisition

pub mod camera;
