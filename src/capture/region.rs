//! Monitored screen areas.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two monitored screen areas.
///
/// Slot A must be set before the polling loop can start; slot B is optional.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RegionSlot {
    A,
    B,
}

impl RegionSlot {
    pub const ALL: [RegionSlot; 2] = [RegionSlot::A, RegionSlot::B];

    /// Index into per-slot arrays.
    pub fn index(self) -> usize {
        match self {
            RegionSlot::A => 0,
            RegionSlot::B => 1,
        }
    }

    /// Single-letter label used in file names and the UI.
    pub fn label(self) -> &'static str {
        match self {
            RegionSlot::A => "A",
            RegionSlot::B => "B",
        }
    }
}

impl fmt::Display for RegionSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Two screen corners as picked by the user, in screen pixels.
///
/// The corners may be given in any order; [`RegionCorners::to_rect`] normalizes them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionCorners {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl RegionCorners {
    pub fn new(top_left: (i32, i32), bottom_right: (i32, i32)) -> Self {
        Self {
            x1: top_left.0,
            y1: top_left.1,
            x2: bottom_right.0,
            y2: bottom_right.1,
        }
    }

    /// Converts to an origin + size rectangle.
    ///
    /// Returns `None` when the area is degenerate (zero width or height).
    pub fn to_rect(&self) -> Option<ScreenRect> {
        let width = self.x1.abs_diff(self.x2);
        let height = self.y1.abs_diff(self.y2);
        if width == 0 || height == 0 {
            return None;
        }
        Some(ScreenRect {
            x: self.x1.min(self.x2),
            y: self.y1.min(self.y2),
            width,
            height,
        })
    }
}

impl fmt::Display for RegionCorners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{} → {},{}", self.x1, self.y1, self.x2, self.y2)
    }
}

/// A validated, non-empty screen rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl ScreenRect {
    /// Size of a 32-bit pixel buffer for this rectangle, `None` if it does not fit in memory.
    #[cfg_attr(not(windows), allow(dead_code))]
    pub fn rgba_len(&self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corners_normalize_any_order() {
        let corners = RegionCorners::new((300, 220), (100, 200));
        let rect = corners.to_rect().unwrap();
        assert_eq!(rect, ScreenRect { x: 100, y: 200, width: 200, height: 20 });
    }

    #[test]
    fn test_degenerate_corners_yield_none() {
        assert!(RegionCorners::new((10, 10), (10, 50)).to_rect().is_none());
        assert!(RegionCorners::new((10, 10), (40, 10)).to_rect().is_none());
    }

    #[test]
    fn test_extreme_corners_do_not_overflow() {
        let rect = RegionCorners::new((i32::MIN, 0), (i32::MAX, 1)).to_rect().unwrap();
        assert_eq!(rect.x, i32::MIN);
        assert_eq!(rect.width, u32::MAX);
        assert_eq!(rect.height, 1);
    }

    #[test]
    fn test_rgba_len() {
        let rect = ScreenRect { x: 0, y: 0, width: 3, height: 2 };
        assert_eq!(rect.rgba_len(), Some(24));

        let huge = ScreenRect { x: 0, y: 0, width: u32::MAX, height: u32::MAX };
        if usize::BITS <= 64 {
            assert_eq!(huge.rgba_len(), None);
        }
    }

    #[test]
    fn test_slot_labels() {
        assert_eq!(RegionSlot::A.label(), "A");
        assert_eq!(RegionSlot::B.to_string(), "B");
        assert_eq!(RegionSlot::B.index(), 1);
    }
}
