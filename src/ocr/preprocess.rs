use image::imageops::{self, FilterType};
use image::{GrayImage, RgbaImage};
use imageproc::contrast::{self, stretch_contrast, ThresholdType};
use imageproc::filter::median_filter;
use imageproc::stats::histogram;

/// Fixed parameters of the normalization pipeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NormalizeParams {
    /// Integer upscale factor (values below 1 are treated as 1)
    pub upscale: u32,
    /// Percent of pixels clipped from each end of the histogram before stretching
    pub cutoff_percent: f32,
    /// Pixels strictly above this become white, the rest black
    pub threshold: u8,
}

impl Default for NormalizeParams {
    fn default() -> Self {
        Self {
            upscale: 2,
            cutoff_percent: 1.0,
            threshold: 170,
        }
    }
}

/// A binarized capture ready for recognition.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedImage(GrayImage);

impl NormalizedImage {
    pub fn as_image(&self) -> &GrayImage {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_raw()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.0.dimensions()
    }
}

/// Converts a captured region into a canonical monochrome bitmap.
///
/// Order matters: grayscale → upscale → autocontrast → 3×3 median → threshold.
/// The median filter runs before thresholding so speckles are removed from
/// gray levels rather than from already-binarized pixels.
///
/// Returns `None` for an empty capture.
pub fn normalize(img: &RgbaImage, params: &NormalizeParams) -> Option<NormalizedImage> {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return None;
    }

    let gray = imageops::grayscale(img);
    let factor = params.upscale.max(1);
    let scaled = if factor == 1 {
        gray
    } else {
        imageops::resize(&gray, w * factor, h * factor, FilterType::Lanczos3)
    };
    let stretched = autocontrast(&scaled, params.cutoff_percent);
    let denoised = median_filter(&stretched, 1, 1);
    Some(NormalizedImage(binarize(&denoised, params.threshold)))
}

/// Stretches the histogram to the full 0..=255 range after clipping
/// `cutoff_percent` of the pixels from each tail.
pub fn autocontrast(img: &GrayImage, cutoff_percent: f32) -> GrayImage {
    let mut counts = histogram(img).channels[0];

    let total: u64 = counts.iter().map(|&c| c as u64).sum();
    let cut = (total as f64 * cutoff_percent.clamp(0.0, 50.0) as f64 / 100.0) as u32;
    if cut > 0 {
        clip_tail(&mut counts, cut, 0..256);
        clip_tail(&mut counts, cut, (0..256).rev());
    }

    let lo = counts.iter().position(|&c| c > 0);
    let hi = counts.iter().rposition(|&c| c > 0);
    match (lo, hi) {
        (Some(lo), Some(hi)) if hi > lo => stretch_contrast(img, lo as u8, hi as u8, 0, 255),
        _ => img.clone(),
    }
}

fn clip_tail(counts: &mut [u32; 256], mut cut: u32, order: impl Iterator<Item = usize>) {
    for ix in order {
        if cut > counts[ix] {
            cut -= counts[ix];
            counts[ix] = 0;
        } else {
            counts[ix] -= cut;
            break;
        }
    }
}

/// Fixed-threshold binarization: `> threshold` → 255, otherwise 0.
pub fn binarize(img: &GrayImage, threshold: u8) -> GrayImage {
    contrast::threshold(img, threshold, ThresholdType::Binary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgba};

    #[test]
    fn test_normalize_upscales_and_binarizes() {
        let img = RgbaImage::from_fn(5, 3, |x, _| {
            if x < 2 {
                Rgba([20, 20, 20, 255])
            } else {
                Rgba([240, 240, 240, 255])
            }
        });
        let out = normalize(&img, &NormalizeParams::default()).unwrap();

        assert_eq!(out.dimensions(), (10, 6));
        assert!(out.as_bytes().iter().all(|&b| b == 0 || b == 255));
        assert_eq!(out.as_image().get_pixel(0, 3)[0], 0);
        assert_eq!(out.as_image().get_pixel(9, 3)[0], 255);
    }

    #[test]
    fn test_normalize_rejects_empty_capture() {
        let img = RgbaImage::new(0, 4);
        assert!(normalize(&img, &NormalizeParams::default()).is_none());
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let img = RgbaImage::from_fn(8, 8, |x, y| {
            let v = ((x * 31 + y * 17) % 256) as u8;
            Rgba([v, v / 2, 255 - v, 255])
        });
        let params = NormalizeParams::default();
        assert_eq!(normalize(&img, &params), normalize(&img, &params));
    }

    #[test]
    fn test_autocontrast_stretches_range() {
        let img = GrayImage::from_fn(4, 1, |x, _| Luma([100 + x as u8 * 10]));
        let out = autocontrast(&img, 0.0);
        assert_eq!(out.get_pixel(0, 0)[0], 0);
        assert_eq!(out.get_pixel(3, 0)[0], 255);
    }

    #[test]
    fn test_autocontrast_maps_midtones_linearly() {
        let img = GrayImage::from_fn(3, 1, |x, _| Luma([[100, 150, 200][x as usize]]));
        let out = autocontrast(&img, 0.0);
        assert_eq!(out.get_pixel(0, 0)[0], 0);
        assert_eq!(out.get_pixel(1, 0)[0], 127);
        assert_eq!(out.get_pixel(2, 0)[0], 255);
    }

    #[test]
    fn test_autocontrast_flat_image_unchanged() {
        let img = GrayImage::from_pixel(3, 3, Luma([128]));
        assert_eq!(autocontrast(&img, 1.0), img);
    }

    #[test]
    fn test_autocontrast_clips_outliers() {
        // 98 mid-gray pixels, one black and one white outlier
        let mut img = GrayImage::from_pixel(10, 10, Luma([100]));
        img.put_pixel(0, 0, Luma([0]));
        img.put_pixel(9, 9, Luma([255]));
        for x in 0..5 {
            img.put_pixel(x, 5, Luma([150]));
        }

        let out = autocontrast(&img, 1.0);

        // Outliers are clipped, so 100 maps to black and 150 to white
        assert_eq!(out.get_pixel(1, 1)[0], 0);
        assert_eq!(out.get_pixel(0, 5)[0], 255);
    }

    #[test]
    fn test_binarize_threshold_is_strict() {
        let img = GrayImage::from_fn(3, 1, |x, _| Luma([[169, 170, 171][x as usize]]));
        let out = binarize(&img, 170);
        assert_eq!(out.get_pixel(0, 0)[0], 0);
        assert_eq!(out.get_pixel(1, 0)[0], 0);
        assert_eq!(out.get_pixel(2, 0)[0], 255);
    }
}
