// SPDX-License-Identifier: GPL-3.0-only

//! Raw V4L2 queries used by the V4L2 backend
//!
//! Issues `VIDIOC_QUERYCAP` and `VIDIOC_G_FMT` directly through libc so that
//! enumeration and acquisition work without the bindgen-based `v4l` crate.

use super::types::{CameraDevice, CameraFormat, DeviceInfo};
use std::os::unix::io::{AsRawFd, RawFd};
use tracing::debug;

/// VIDIOC_QUERYCAP ioctl number
const VIDIOC_QUERYCAP: libc::c_ulong = 0x80685600;

/// VIDIOC_G_FMT ioctl number (_IOWR('V', 4, struct v4l2_format), 208 bytes)
const VIDIOC_G_FMT: libc::c_ulong = 0xC0D05604;

/// V4L2 capability flag for single-planar video capture
const V4L2_CAP_VIDEO_CAPTURE: u32 = 0x0000_0001;

const V4L2_BUF_TYPE_VIDEO_CAPTURE: u32 = 1;

/// V4L2 capability structure for VIDIOC_QUERYCAP ioctl
#[repr(C)]
struct V4l2Capability {
    driver: [u8; 16],
    card: [u8; 32],
    bus_info: [u8; 32],
    version: u32,
    capabilities: u32,
    device_caps: u32,
    reserved: [u32; 3],
}

impl V4l2Capability {
    /// Capabilities of this node, preferring the per-node device caps
    fn node_caps(&self) -> u32 {
        if self.device_caps != 0 {
            self.device_caps
        } else {
            self.capabilities
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy)]
struct V4l2PixFormat {
    width: u32,
    height: u32,
    pixelformat: u32,
    field: u32,
    bytesperline: u32,
    sizeimage: u32,
    colorspace: u32,
    priv_: u32,
    flags: u32,
    ycbcr_enc: u32,
    quantization: u32,
    xfer_func: u32,
}

/// `struct v4l2_format` with the union laid out as `pix` plus padding.
/// The union is 8-byte aligned on 64-bit targets, hence the explicit pad.
#[repr(C)]
struct V4l2Format {
    type_: u32,
    _pad: u32,
    pix: V4l2PixFormat,
    _raw: [u8; 152],
}

/// Query V4L2 capabilities for an open file descriptor.
fn query_v4l2_cap(fd: RawFd) -> Option<V4l2Capability> {
    let mut cap: V4l2Capability = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(fd, VIDIOC_QUERYCAP as _, &mut cap as *mut V4l2Capability) };
    if result < 0 { None } else { Some(cap) }
}

fn c_string(bytes: &[u8]) -> String {
    let len = bytes.iter().position(|&c| c == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..len]).trim().to_string()
}

/// Convert a little-endian FourCC code to text (e.g., 0x56595559 -> "YUYV")
pub fn fourcc_to_string(code: u32) -> String {
    code.to_le_bytes()
        .iter()
        .map(|&b| if b.is_ascii_graphic() { b as char } else { '?' })
        .collect()
}

/// Read the currently negotiated capture format of an open device
pub fn query_format(fd: RawFd) -> Option<CameraFormat> {
    let mut fmt: V4l2Format = unsafe { std::mem::zeroed() };
    fmt.type_ = V4L2_BUF_TYPE_VIDEO_CAPTURE;
    let result = unsafe { libc::ioctl(fd, VIDIOC_G_FMT as _, &mut fmt as *mut V4l2Format) };
    if result < 0 {
        return None;
    }

    Some(CameraFormat {
        width: fmt.pix.width,
        height: fmt.pix.height,
        pixel_format: fourcc_to_string(fmt.pix.pixelformat),
    })
}

/// Check whether an open device node is a video capture node (not metadata)
pub fn is_capture_node(fd: RawFd) -> bool {
    query_v4l2_cap(fd).is_some_and(|cap| cap.node_caps() & V4L2_CAP_VIDEO_CAPTURE != 0)
}

/// Build DeviceInfo from an open V4L2 device
///
/// Resolves symlinks to get the real device path and queries card and driver.
pub fn build_device_info(v4l2_path: &str, fd: RawFd) -> Option<DeviceInfo> {
    let cap = query_v4l2_cap(fd)?;

    let real_path = std::fs::canonicalize(v4l2_path)
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|_| v4l2_path.to_string());

    let info = DeviceInfo {
        card: c_string(&cap.card),
        driver: c_string(&cap.driver),
        path: v4l2_path.to_string(),
        real_path,
    };

    debug!(path = v4l2_path, card = %info.card, driver = %info.driver, "Queried V4L2 device");
    Some(info)
}

/// Numeric suffix of a `videoN` node name, used for stable ordering
fn node_index(name: &str) -> Option<u32> {
    name.strip_prefix("video")?.parse().ok()
}

/// Enumerate `/dev/video*` capture nodes
///
/// Nodes that cannot be opened (permissions) or that only expose metadata are
/// skipped.
pub fn enumerate_capture_devices() -> Vec<CameraDevice> {
    let entries = match std::fs::read_dir("/dev") {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut nodes: Vec<(u32, String)> = entries
        .flatten()
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().to_string();
            node_index(&name).map(|index| (index, format!("/dev/{}", name)))
        })
        .collect();
    nodes.sort();

    let mut devices = Vec::new();
    for (_, path) in nodes {
        let file = match std::fs::File::open(&path) {
            Ok(f) => f,
            Err(e) => {
                debug!(path = %path, error = %e, "Skipping unreadable video node");
                continue;
            }
        };

        if !is_capture_node(file.as_raw_fd()) {
            continue;
        }

        let info = build_device_info(&path, file.as_raw_fd());
        let name = info
            .as_ref()
            .map(|i| i.card.clone())
            .filter(|card| !card.is_empty())
            .unwrap_or_else(|| path.clone());

        devices.push(CameraDevice {
            name,
            path,
            device_info: info,
        });
    }

    devices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fourcc_to_string() {
        assert_eq!(fourcc_to_string(0x5659_5559), "YUYV");
        assert_eq!(fourcc_to_string(u32::from_le_bytes(*b"MJPG")), "MJPG");
    }

    #[test]
    fn test_node_index() {
        assert_eq!(node_index("video0"), Some(0));
        assert_eq!(node_index("video12"), Some(12));
        assert_eq!(node_index("v4l-subdev0"), None);
        assert_eq!(node_index("videoX"), None);
    }

    #[test]
    fn test_struct_sizes_match_kernel_abi() {
        assert_eq!(std::mem::size_of::<V4l2Capability>(), 104);
        assert_eq!(std::mem::size_of::<V4l2Format>(), 208);
    }
}
