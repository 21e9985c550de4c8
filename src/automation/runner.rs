//! Polling loop - runs recognition cycles in a background thread.
//!
//! The loop thread waits on a stop channel between cycles, so a stop request
//! is observed within one loop interval.

use std::sync::mpsc::{channel, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::engine::Engine;
use crate::error::EngineError;

struct Worker {
    stop: Sender<()>,
    handle: JoinHandle<()>,
}

/// Owns the polling thread for one engine.
pub struct PollingLoop {
    engine: Arc<Engine>,
    interval: Duration,
    worker: Mutex<Option<Worker>>,
}

impl PollingLoop {
    pub fn new(engine: Arc<Engine>, interval: Duration) -> Self {
        Self {
            engine,
            interval,
            worker: Mutex::new(None),
        }
    }

    /// Starts polling.
    ///
    /// # Errors
    /// Returns an error if:
    /// - Region A has no coordinates
    /// - The loop is already running
    pub fn start(&self) -> Result<(), EngineError> {
        self.engine.ensure_ready()?;

        let mut worker = self.worker.lock().unwrap_or_else(PoisonError::into_inner);
        if worker.as_ref().is_some_and(|w| !w.handle.is_finished()) {
            return Err(EngineError::AlreadyRunning);
        }

        let (stop, stop_rx) = channel();
        let engine = Arc::clone(&self.engine);
        let interval = self.interval;

        let handle = thread::spawn(move || {
            info!("Live OCR started ({} ms interval)", interval.as_millis());
            loop {
                let report = engine.run_cycle(engine.min_length());
                debug!(
                    "Cycle: token={:?} status={:?} suggestions={}",
                    report.token.as_str(),
                    report.status,
                    report.suggestions.len()
                );
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => continue,
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            info!("Live OCR stopped");
        });

        *worker = Some(Worker { stop, handle });
        Ok(())
    }

    /// Stops polling and waits for the current cycle to finish.
    ///
    /// Returns false if the loop was not running.
    pub fn stop(&self) -> bool {
        let worker = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(worker) = worker else {
            return false;
        };
        let _ = worker.stop.send(());
        if worker.handle.join().is_err() {
            warn!("Polling thread panicked");
        }
        true
    }

    pub fn is_running(&self) -> bool {
        self.worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|w| !w.handle.is_finished())
    }

    /// Stops the loop if it is running. Called once on exit.
    pub fn shutdown(&self) {
        if self.stop() {
            info!("Polling loop shut down");
        }
    }
}

impl Drop for PollingLoop {
    fn drop(&mut self) {
        self.shutdown();
    }
}
