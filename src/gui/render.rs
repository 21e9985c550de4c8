//! GUI rendering functions.
//!
//! Each panel draws itself and returns the commands the user triggered.

use eframe::egui::{self, Color32, RichText};
use std::path::PathBuf;

use super::state::{dictionary_text, prompt_text, region_text, GuiState};
use crate::automation::commands::on_off;
use crate::automation::Command;
use crate::capture::RegionSlot;
use crate::engine::{CycleStatus, EngineSnapshot};

const BUTTON_WIDTH: f32 = 200.0;

fn wide_button(ui: &mut egui::Ui, text: &str) -> bool {
    ui.add_sized([BUTTON_WIDTH, 24.0], egui::Button::new(text))
        .clicked()
}

/// Render the sidebar: loop control, dictionary, regions and toggles.
pub fn render_sidebar(
    ui: &mut egui::Ui,
    state: &mut GuiState,
    snapshot: &EngineSnapshot,
    running: bool,
) -> Vec<Command> {
    let mut commands = Vec::new();

    ui.add_space(8.0);
    ui.heading("WordBomb OCR");
    ui.add_space(12.0);

    // Start/Stop buttons
    ui.add_enabled_ui(!running, |ui| {
        if wide_button(ui, "▶ Start OCR") {
            commands.push(Command::Start);
        }
    });
    ui.add_enabled_ui(running, |ui| {
        if wide_button(ui, "◼ Stop OCR") {
            commands.push(Command::Stop);
        }
    });

    ui.add_space(8.0);
    ui.separator();

    // Dictionary
    ui.label("Word list:");
    ui.add_sized(
        [BUTTON_WIDTH, 20.0],
        egui::TextEdit::singleline(&mut state.dictionary_path).hint_text("path/to/words.txt"),
    );
    let has_path = !state.dictionary_path.trim().is_empty();
    ui.add_enabled_ui(has_path, |ui| {
        if wide_button(ui, "📚 Load Dictionary") {
            commands.push(Command::LoadDictionary(PathBuf::from(
                state.dictionary_path.trim(),
            )));
        }
    });
    ui.label(RichText::new(dictionary_text(snapshot.word_count)).small());

    ui.add_space(8.0);
    ui.separator();

    // Regions
    for slot in RegionSlot::ALL {
        let input = &mut state.regions[slot.index()];
        ui.label(region_text(slot, snapshot.regions[slot.index()]));
        ui.horizontal(|ui| {
            ui.label("x1");
            ui.add(egui::DragValue::new(&mut input.x1));
            ui.label("y1");
            ui.add(egui::DragValue::new(&mut input.y1));
        });
        ui.horizontal(|ui| {
            ui.label("x2");
            ui.add(egui::DragValue::new(&mut input.x2));
            ui.label("y2");
            ui.add(egui::DragValue::new(&mut input.y2));
        });
        if wide_button(ui, &format!("📍 Apply Region {}", slot)) {
            commands.push(input.to_command(slot));
        }
        ui.add_space(4.0);
    }

    ui.separator();

    // Toggles
    if wide_button(ui, &format!("Save images: {}", on_off(snapshot.save_images))) {
        commands.push(Command::ToggleImageSaving);
    }
    if wide_button(
        ui,
        &format!("Char correction: {}", on_off(snapshot.char_correction)),
    ) {
        commands.push(Command::ToggleCharCorrection);
    }

    ui.add_space(8.0);
    ui.label(
        RichText::new(format!("Used: {}", snapshot.typed_letters))
            .monospace()
            .color(Color32::from_rgb(0, 0, 139)),
    );

    commands
}

/// Render the overview: prompt, suggestions and status line.
pub fn render_overview(
    ui: &mut egui::Ui,
    state: &mut GuiState,
    snapshot: &EngineSnapshot,
    status: &str,
) -> Vec<Command> {
    let mut commands = Vec::new();

    ui.heading("Overview");
    ui.add_space(8.0);

    ui.horizontal(|ui| {
        ui.label("Min length:");
        let changed = ui
            .add(
                egui::DragValue::new(&mut state.min_length)
                    .range(1..=30)
                    .speed(0.1),
            )
            .changed();
        if changed {
            commands.push(Command::SetMinLength(state.min_length));
        }
        if ui.button("Capture once").clicked() {
            commands.push(Command::CaptureOnce);
        }
        if ui.button("🔧 Force Auto-Correct").clicked() {
            commands.push(Command::ForceCorrection);
        }
    });

    ui.add_space(8.0);
    let report = snapshot.last_report.as_ref();
    let prompt_color = match report.map(|r| r.status) {
        Some(CycleStatus::Matched) => Color32::from_rgb(0, 120, 200),
        Some(CycleStatus::RegionUnset) => Color32::from_rgb(200, 0, 0),
        _ => Color32::GRAY,
    };
    ui.label(RichText::new(prompt_text(report)).size(16.0).color(prompt_color));

    ui.add_space(4.0);
    ui.horizontal(|ui| {
        if ui.button("🗑 Clear Used Words").clicked() {
            commands.push(Command::ResetUsedWords);
        }
        if ui.button("🔤 Clear Alphabet").clicked() {
            commands.push(Command::ResetTypedLetters);
        }
    });
    ui.label(format!("Used: {}", snapshot.typed_letters));
    ui.label(
        RichText::new(format!("Words typed this game: {}", snapshot.used_word_count)).small(),
    );

    ui.add_space(8.0);
    ui.separator();
    ui.add_space(8.0);

    // Suggestion buttons - click types the word
    egui::ScrollArea::vertical()
        .max_height(ui.available_height() - 40.0)
        .show(ui, |ui| {
            let suggestions = report.map(|r| r.suggestions.as_slice()).unwrap_or_default();
            if suggestions.is_empty() {
                ui.label(RichText::new("No suggestions").italics().color(Color32::GRAY));
            }
            for word in suggestions {
                let button = egui::Button::new(RichText::new(format!("📝 {}", word)).size(14.0));
                if ui.add_sized([280.0, 26.0], button).clicked() {
                    commands.push(Command::TypeWord(word.clone()));
                }
            }
        });

    ui.add_space(8.0);
    ui.label(RichText::new(format!("Status: {}", status)).small());

    commands
}
