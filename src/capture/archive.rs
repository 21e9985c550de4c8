//! Best-effort archival of recognized images.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use image::GrayImage;
use std::fs;
use std::path::PathBuf;

use super::region::RegionSlot;

/// Receives normalized images that produced a token.
pub trait ImageSink: Send + Sync {
    fn persist(&self, image: &GrayImage, slot: RegionSlot, at: DateTime<Local>) -> Result<()>;
}

/// Writes `region_<slot>_<timestamp>.png` files into a directory.
#[derive(Debug, Clone)]
pub struct PngArchive {
    dir: PathBuf,
}

impl PngArchive {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn file_path(&self, slot: RegionSlot, at: DateTime<Local>) -> PathBuf {
        self.dir.join(format!(
            "region_{}_{}.png",
            slot.label(),
            at.format("%Y%m%d-%H%M%S")
        ))
    }
}

impl ImageSink for PngArchive {
    fn persist(&self, image: &GrayImage, slot: RegionSlot, at: DateTime<Local>) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create {}", self.dir.display()))?;
        let path = self.file_path(slot, at);
        image
            .save(&path)
            .with_context(|| format!("failed to save {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    #[test]
    fn test_file_name_format() {
        let archive = PngArchive::new(PathBuf::from("imgs"));
        let at = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let path = archive.file_path(RegionSlot::B, at);
        assert_eq!(path, PathBuf::from("imgs").join("region_B_20240309-140507.png"));
    }

    #[test]
    fn test_persist_creates_directory_and_file() {
        let dir = tempdir().unwrap();
        let archive = PngArchive::new(dir.path().join("nested"));
        let img = GrayImage::from_pixel(4, 2, image::Luma([255]));
        let at = Local::now();

        archive.persist(&img, RegionSlot::A, at).unwrap();

        assert!(archive.file_path(RegionSlot::A, at).exists());
    }
}
