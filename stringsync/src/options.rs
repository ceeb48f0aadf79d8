//! Tunables for a [`crate::Synchronizer`].

use std::path::PathBuf;

use crate::{batch::DEFAULT_BATCH_SIZE, context::DEFAULT_CONTEXT_WINDOW};

/// Options controlling extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    /// Maximum number of entries per batch file.
    pub batch_size: usize,
    /// Directory batch files are written to.
    pub output_dir: PathBuf,
    /// Neighbouring strings shown on each side in a context hint.
    pub context_window: usize,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            output_dir: PathBuf::from("."),
            context_window: DEFAULT_CONTEXT_WINDOW,
        }
    }
}

impl SyncOptions {
    /// Creates default options.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_context_window(mut self, context_window: usize) -> Self {
        self.context_window = context_window;
        self
    }
}
