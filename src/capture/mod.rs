//! Screen capture collaborators.
//!
//! This module provides:
//! - Region bookkeeping (`RegionSlot`, `RegionCorners`, `ScreenRect`)
//! - Screen grabbing (`ScreenCapture`, `DesktopCapture`)
//! - Image archival (`ImageSink`, `PngArchive`)

pub mod archive;
pub mod region;
pub mod screen;

pub use archive::{ImageSink, PngArchive};
pub use region::{RegionCorners, RegionSlot};
pub use screen::{DesktopCapture, ScreenCapture};
