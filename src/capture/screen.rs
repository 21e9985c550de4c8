//! Screen region capture.
//!
//! On Windows the screen device context is copied with `BitBlt` and read back
//! through `GetDIBits`. Other platforms have no backend.

use anyhow::Result;
use image::RgbaImage;

use super::region::ScreenRect;

/// Grabs the pixels of a screen rectangle.
pub trait ScreenCapture: Send + Sync {
    fn capture(&self, rect: &ScreenRect) -> Result<RgbaImage>;
}

/// Captures directly from the desktop.
#[derive(Debug, Default)]
pub struct DesktopCapture;

#[cfg(windows)]
impl ScreenCapture for DesktopCapture {
    fn capture(&self, rect: &ScreenRect) -> Result<RgbaImage> {
        gdi::capture_screen_rect(rect)
    }
}

#[cfg(not(windows))]
impl ScreenCapture for DesktopCapture {
    fn capture(&self, _rect: &ScreenRect) -> Result<RgbaImage> {
        Err(anyhow::anyhow!(
            "screen capture is not supported on this platform"
        ))
    }
}

#[cfg(windows)]
mod gdi {
    use anyhow::{anyhow, Result};
    use image::RgbaImage;
    use std::ffi::c_void;

    use windows::Win32::Foundation::HWND;
    use windows::Win32::Graphics::Gdi::{
        BitBlt, CreateCompatibleBitmap, CreateCompatibleDC, DeleteDC, DeleteObject, GetDC,
        GetDIBits, ReleaseDC, SelectObject, BITMAPINFO, BITMAPINFOHEADER, BI_RGB,
        DIB_RGB_COLORS, HGDIOBJ, SRCCOPY,
    };

    use crate::capture::region::ScreenRect;

    pub fn capture_screen_rect(rect: &ScreenRect) -> Result<RgbaImage> {
        let width = i32::try_from(rect.width).map_err(|_| anyhow!("capture too wide: {}", rect.width))?;
        let height =
            i32::try_from(rect.height).map_err(|_| anyhow!("capture too tall: {}", rect.height))?;
        let len = rect
            .rgba_len()
            .ok_or_else(|| anyhow!("capture too large: {}x{}", rect.width, rect.height))?;
        let mut buffer = vec![0u8; len];

        unsafe {
            let screen_dc = GetDC(HWND::default());
            if screen_dc.is_invalid() {
                return Err(anyhow!("GetDC failed for the screen"));
            }
            let mem_dc = CreateCompatibleDC(screen_dc);
            let bitmap = CreateCompatibleBitmap(screen_dc, width, height);
            let previous = SelectObject(mem_dc, HGDIOBJ(bitmap.0));

            let blit = BitBlt(mem_dc, 0, 0, width, height, screen_dc, rect.x, rect.y, SRCCOPY);

            let mut info = BITMAPINFO {
                bmiHeader: BITMAPINFOHEADER {
                    biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
                    biWidth: width,
                    // Negative height requests a top-down DIB
                    biHeight: -height,
                    biPlanes: 1,
                    biBitCount: 32,
                    biCompression: BI_RGB.0,
                    ..Default::default()
                },
                ..Default::default()
            };
            let lines = GetDIBits(
                mem_dc,
                bitmap,
                0,
                rect.height,
                Some(buffer.as_mut_ptr() as *mut c_void),
                &mut info,
                DIB_RGB_COLORS,
            );

            SelectObject(mem_dc, previous);
            let _ = DeleteObject(HGDIOBJ(bitmap.0));
            let _ = DeleteDC(mem_dc);
            ReleaseDC(HWND::default(), screen_dc);

            blit.map_err(|e| anyhow!("BitBlt failed: {}", e))?;
            if lines == 0 {
                return Err(anyhow!("GetDIBits returned no scan lines"));
            }
        }

        // BGRA -> RGBA
        for px in buffer.chunks_exact_mut(4) {
            px.swap(0, 2);
            px[3] = 255;
        }

        RgbaImage::from_raw(rect.width, rect.height, buffer)
            .ok_or_else(|| anyhow!("capture buffer size mismatch"))
    }
}
