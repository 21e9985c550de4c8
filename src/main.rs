//! WordBomb OCR
//!
//! Watches a screen region for the word-game prompt, reads it with
//! Tesseract and suggests dictionary words containing it.

// Hide console window on Windows for GUI mode
#![windows_subsystem = "windows"]

mod automation;
mod capture;
mod config;
mod dictionary;
mod engine;
mod error;
mod gui;
mod logging;
mod ocr;
mod paths;

use anyhow::{anyhow, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

use automation::{spawn_hotkey_listener, Command, Dispatcher, PollingLoop, SendInputKeyboard};
use capture::{DesktopCapture, PngArchive};
use engine::{Collaborators, Engine};
use ocr::{locate_tesseract, tesseract_status, TesseractCli, TesseractPaths};

fn main() -> Result<()> {
    logging::install_panic_hook();

    // Missing output directories only cost logs and archived images
    let directories = paths::ensure_directories();

    let config = config::load_config(&paths::get_config_path());
    if let Err(e) = logging::init(config.debug) {
        eprintln!("Failed to initialize logging: {:#}", e);
    }
    info!("WordBomb OCR starting");
    if let Err(e) = directories {
        warn!("Failed to create output directories: {}", e);
    }

    let tesseract = match locate_tesseract(
        config.tesseract_path.as_deref(),
        config.tessdata_dir.as_deref(),
    ) {
        Ok(found) => {
            let status = tesseract_status(&found);
            if !status.found {
                warn!("Tesseract at {} did not respond", found.executable.display());
            }
            info!(
                "Tesseract: {} (version {}, languages {})",
                found.executable.display(),
                status.version.as_deref().unwrap_or("unknown"),
                status
                    .languages
                    .as_ref()
                    .map(|l| l.join(","))
                    .unwrap_or_else(|| "unknown".to_string())
            );
            found
        }
        Err(e) => {
            warn!("{}. OCR will not work until Tesseract is installed.", e);
            TesseractPaths {
                executable: PathBuf::from("tesseract"),
                tessdata: None,
            }
        }
    };

    let engine = Arc::new(Engine::new(
        &config,
        Collaborators {
            capture: Arc::new(DesktopCapture),
            recognizer: Arc::new(TesseractCli::new(tesseract)),
            injector: Arc::new(SendInputKeyboard::new(config.key_interval())),
            archive: Arc::new(PngArchive::new(paths::get_ocr_images_dir())),
        },
    ));

    let polling = Arc::new(PollingLoop::new(engine.clone(), config.loop_interval()));
    let dispatcher = Dispatcher::new(engine, polling.clone());

    // Startup load goes through the dispatcher so a failure shows in the status line
    if let Some(path) = &config.dictionary_path {
        dispatcher.run(Command::LoadDictionary(path.clone()));
    }

    if let Err(e) = spawn_hotkey_listener(dispatcher.clone()) {
        warn!("Failed to register hotkey: {:#}", e);
    }

    info!("Starting GUI application...");
    let result = gui::run_gui(
        dispatcher,
        config
            .dictionary_path
            .as_ref()
            .map(|p| p.display().to_string()),
    );
    polling.shutdown();

    match result {
        Ok(()) => {
            info!("GUI application exited normally");
            Ok(())
        }
        Err(e) => {
            error!("GUI error: {}", e);
            Err(anyhow!("GUI error: {}", e))
        }
    }
}
