//! GUI module for the application.
//!
//! An egui/eframe dashboard. Buttons become `Command`s dispatched to the
//! engine on short-lived threads; every frame redraws from a fresh snapshot.

pub mod render;
pub mod state;

use std::time::Duration;

use eframe::egui::{self, Vec2};
use tracing::info;

use crate::automation::{Command, Dispatcher};

use state::GuiState;

/// Main GUI application struct.
pub struct GuiApp {
    dispatcher: Dispatcher,
    state: GuiState,
}

impl GuiApp {
    pub fn new(dispatcher: Dispatcher, dictionary_path: Option<String>) -> Self {
        let snapshot = dispatcher.engine().snapshot();
        let state = GuiState::from_snapshot(&snapshot, dictionary_path.as_deref());
        Self { dispatcher, state }
    }

    fn dispatch_all(&self, commands: Vec<Command>) {
        for command in commands {
            info!("GUI: {:?}", command);
            self.dispatcher.dispatch(command);
        }
    }
}

impl eframe::App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let snapshot = self.dispatcher.engine().snapshot();
        let running = self.dispatcher.is_running();
        let status = self.dispatcher.status();

        // Polling and hotkey updates happen off the UI thread
        ctx.request_repaint_after(Duration::from_millis(100));

        let sidebar = egui::SidePanel::left("sidebar")
            .resizable(false)
            .exact_width(220.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .show(ui, |ui| {
                        render::render_sidebar(ui, &mut self.state, &snapshot, running)
                    })
                    .inner
            })
            .inner;

        let overview = egui::CentralPanel::default()
            .show(ctx, |ui| {
                render::render_overview(ui, &mut self.state, &snapshot, &status)
            })
            .inner;

        self.dispatch_all(sidebar);
        self.dispatch_all(overview);
    }
}

/// Run the GUI application.
/// This function blocks until the window is closed.
pub fn run_gui(dispatcher: Dispatcher, dictionary_path: Option<String>) -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(Vec2::new(760.0, 620.0))
            .with_min_inner_size(Vec2::new(560.0, 480.0))
            .with_title("WordBomb OCR"),
        ..Default::default()
    };

    eframe::run_native(
        "WordBomb OCR",
        options,
        Box::new(|_cc| Ok(Box::new(GuiApp::new(dispatcher, dictionary_path)))),
    )
}
