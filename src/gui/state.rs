//! GUI application state management.
//!
//! Tracks user input values and formats engine state for display.

use crate::automation::Command;
use crate::capture::{RegionCorners, RegionSlot};
use crate::engine::{CycleReport, CycleStatus, EngineSnapshot};

/// Editable corner coordinates for one region.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegionInput {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl From<RegionCorners> for RegionInput {
    fn from(c: RegionCorners) -> Self {
        Self {
            x1: c.x1,
            y1: c.y1,
            x2: c.x2,
            y2: c.y2,
        }
    }
}

impl RegionInput {
    /// Command applying these coordinates to `slot`.
    pub fn to_command(self, slot: RegionSlot) -> Command {
        Command::SetRegion {
            slot,
            top_left: (self.x1, self.y1),
            bottom_right: (self.x2, self.y2),
        }
    }
}

/// GUI application state.
#[derive(Debug)]
pub struct GuiState {
    /// Word list path typed by the user.
    pub dictionary_path: String,
    pub regions: [RegionInput; 2],
    pub min_length: usize,
}

impl GuiState {
    /// Seeds the inputs from the engine's current settings.
    pub fn from_snapshot(snapshot: &EngineSnapshot, dictionary_path: Option<&str>) -> Self {
        let mut regions = [RegionInput::default(); 2];
        for slot in RegionSlot::ALL {
            if let Some(corners) = snapshot.regions[slot.index()] {
                regions[slot.index()] = corners.into();
            }
        }
        Self {
            dictionary_path: dictionary_path.unwrap_or_default().to_string(),
            regions,
            min_length: snapshot.min_length,
        }
    }
}

pub fn region_text(slot: RegionSlot, corners: Option<RegionCorners>) -> String {
    let label = match slot {
        RegionSlot::A => "Region A",
        RegionSlot::B => "Region B (optional)",
    };
    match corners {
        Some(c) => format!("{}: {}", label, c),
        None => format!("{}: Not set", label),
    }
}

pub fn dictionary_text(word_count: usize) -> String {
    if word_count == 0 {
        "No dictionary loaded".to_string()
    } else {
        format!("Loaded {} words (2/3-gram indexed)", word_count)
    }
}

/// Prompt line, flagged while a stuck prompt is being re-read.
pub fn prompt_text(report: Option<&CycleReport>) -> String {
    let Some(report) = report else {
        return "Prompt: ".to_string();
    };
    let body = match report.status {
        CycleStatus::RegionUnset => "(select Region A)".to_string(),
        _ => report.token.to_string(),
    };
    let suffix = if report.correction_exhausted {
        "  [Stuck: check the prompt]"
    } else if report.correcting {
        "  [Auto-correcting…]"
    } else {
        ""
    };
    format!("Prompt: {}{}", body, suffix)
}
