//! User commands.
//!
//! Every button and hotkey becomes a `Command` carrying only the data it
//! needs. Commands run on short-lived threads so the UI never waits on
//! typing, dictionary loads or loop shutdown.

use anyhow::Result;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use tracing::warn;

use super::runner::PollingLoop;
use crate::capture::RegionSlot;
use crate::engine::Engine;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Type a specific suggestion
    TypeWord(String),
    /// Type the current best suggestion (sent by the F8 hotkey)
    #[cfg_attr(not(windows), allow(dead_code))]
    TypeBestWord,
    LoadDictionary(PathBuf),
    ResetUsedWords,
    ResetTypedLetters,
    SetRegion {
        slot: RegionSlot,
        top_left: (i32, i32),
        bottom_right: (i32, i32),
    },
    ToggleImageSaving,
    ToggleCharCorrection,
    ForceCorrection,
    SetMinLength(usize),
    /// Run a single cycle outside the polling loop
    CaptureOnce,
    Start,
    Stop,
}

/// Executes commands against the engine and keeps the latest status line.
#[derive(Clone)]
pub struct Dispatcher {
    engine: Arc<Engine>,
    polling: Arc<PollingLoop>,
    status: Arc<Mutex<String>>,
}

impl Dispatcher {
    pub fn new(engine: Arc<Engine>, polling: Arc<PollingLoop>) -> Self {
        Self {
            engine,
            polling,
            status: Arc::new(Mutex::new("Ready".to_string())),
        }
    }

    pub fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }

    pub fn is_running(&self) -> bool {
        self.polling.is_running()
    }

    /// Latest status message, for display.
    pub fn status(&self) -> String {
        self.status
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_status(&self, message: String) {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner) = message;
    }

    /// Runs the command on its own thread.
    pub fn dispatch(&self, command: Command) -> JoinHandle<()> {
        let dispatcher = self.clone();
        thread::spawn(move || dispatcher.run(command))
    }

    /// Runs the command on the calling thread and records the outcome.
    pub fn run(&self, command: Command) {
        match self.execute(&command) {
            Ok(Some(message)) => self.set_status(message),
            Ok(None) => {}
            Err(e) => {
                warn!("{:?} failed: {:#}", command, e);
                self.set_status(format!("Error: {}", e));
            }
        }
    }

    /// Executes one command. Returns the status message to show, if any.
    pub fn execute(&self, command: &Command) -> Result<Option<String>> {
        let engine = &self.engine;
        let message = match command {
            Command::TypeWord(word) => {
                engine.accept_action(word)?;
                None
            }
            Command::TypeBestWord => {
                if engine.type_best_word()? {
                    None
                } else {
                    Some("No word to type".to_string())
                }
            }
            Command::LoadDictionary(path) => {
                let count = engine.load_dictionary_file(path)?;
                Some(format!("Loaded {} words", count))
            }
            Command::ResetUsedWords => {
                engine.reset_used_words();
                Some("Used words cleared".to_string())
            }
            Command::ResetTypedLetters => {
                engine.reset_typed_letters();
                Some("Used letters cleared".to_string())
            }
            Command::SetRegion {
                slot,
                top_left,
                bottom_right,
            } => {
                engine.set_region(*slot, *top_left, *bottom_right);
                Some(format!("Region {} updated", slot))
            }
            Command::ToggleImageSaving => {
                let on = engine.toggle_image_saving();
                Some(format!("Save images: {}", on_off(on)))
            }
            Command::ToggleCharCorrection => {
                let on = engine.toggle_char_correction();
                Some(format!("Char correction: {}", on_off(on)))
            }
            Command::ForceCorrection => {
                if engine.force_correction() {
                    Some("Will auto-correct on next detection".to_string())
                } else {
                    Some("No prompt to correct".to_string())
                }
            }
            Command::SetMinLength(min_length) => {
                engine.set_min_length(*min_length);
                None
            }
            Command::CaptureOnce => {
                let report = engine.run_cycle(engine.min_length());
                Some(match report.best() {
                    Some(best) => format!("Prompt {}: best {}", report.token, best),
                    None => format!("Prompt {:?}: no suggestions", report.token.as_str()),
                })
            }
            Command::Start => {
                self.polling.start()?;
                Some("Live OCR running".to_string())
            }
            Command::Stop => {
                self.polling.stop();
                Some("Live OCR stopped".to_string())
            }
        };
        Ok(message)
    }
}

pub fn on_off(on: bool) -> &'static str {
    if on { "ON" } else { "OFF" }
}
