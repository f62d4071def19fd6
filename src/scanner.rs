use crate::signal::CompletionSignal;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Substring Cypress prints once all spec files have run and the reports are flushed
pub const RUN_FINISHED_SENTINEL: &str = "Run Finished";

/// Watches container output for the run-finished sentinel
///
/// Per chunk it only trims, does a substring test and fires the one-shot
/// signal, so it can never back-pressure the output producer. It keeps
/// consuming after the first match; later matches are no-ops through the gate.
pub struct OutputScanner {
    signal: Arc<CompletionSignal>,
}

impl OutputScanner {
    pub fn new(signal: Arc<CompletionSignal>) -> Self {
        Self { signal }
    }

    /// Inspect one chunk of container output
    pub fn observe(&self, chunk: &str) {
        let line = chunk.trim();
        log::debug!("{}", line);
        if line.contains(RUN_FINISHED_SENTINEL) {
            self.signal.signal();
        }
    }

    /// Drain an output line channel on a background task, feeding every line
    /// through [`observe`](Self::observe)
    pub fn spawn(self, mut lines: mpsc::Receiver<String>) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(line) = lines.recv().await {
                self.observe(&line);
            }
        })
    }
}
