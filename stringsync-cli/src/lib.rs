//! CLI library for testing purposes

pub mod apply;
pub mod cleanup;
pub mod extract;
pub mod validation;

use stringsync::{SyncOptions, Synchronizer};

use crate::validation::{validate_batch_size, validate_output_dir, validate_target_path};

pub use apply::run_apply_command;
pub use cleanup::run_cleanup_command;
pub use extract::run_extract_command;

/// Options shared by every mode: the bound file pair plus extraction tunables.
#[derive(Debug, Clone)]
pub struct CommandOptions {
    pub source: String,
    pub target: String,
    pub batch_size: usize,
    pub output_dir: String,
    pub context_window: usize,
}

impl CommandOptions {
    /// Validates the options and binds a [`Synchronizer`] to the file pair.
    pub fn synchronizer(&self) -> Result<Synchronizer, String> {
        validate_target_path(&self.target)?;
        validate_batch_size(self.batch_size)?;

        let options = SyncOptions::new()
            .with_batch_size(self.batch_size)
            .with_output_dir(&self.output_dir)
            .with_context_window(self.context_window);
        Synchronizer::with_options(&self.source, &self.target, options).map_err(|e| e.to_string())
    }

    pub(crate) fn check_output_dir(&self) -> Result<(), String> {
        validate_output_dir(&self.output_dir)
    }
}
