#![forbid(unsafe_code)]
//! Keep translated Android `strings.xml` files in step with their source.
//!
//! A [`Synchronizer`] is bound to one source file (`res/values/strings.xml`) and one
//! target-locale file (`res/values-lv/strings.xml`) and offers three operations:
//!
//! - **cleanup**: drop target entries that the source no longer has;
//! - **extract**: write the entries the target is missing into JSON batch files
//!   for an external translator;
//! - **apply**: merge a translated batch back into the target.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use stringsync::Synchronizer;
//!
//! let sync = Synchronizer::new("res/values/strings.xml", "res/values-lv/strings.xml")?;
//! sync.cleanup()?;
//! let report = sync.extract()?;
//! for batch in &report.batches {
//!     println!("{} ({} entries)", batch.path.display(), batch.entries);
//! }
//! // ... translate, then:
//! sync.apply("batch_lv_001.json")?;
//! # Ok::<(), stringsync::Error>(())
//! ```

pub mod backup;
pub mod batch;
pub mod context;
pub mod error;
pub mod formats;
pub mod options;
pub mod sync;
pub mod traits;
pub mod types;

// Re-export most used types for easy consumption
pub use crate::{
    batch::{Batch, BatchEntry, DEFAULT_BATCH_SIZE},
    error::Error,
    formats::{AndroidStringsFormat, language_code_from_path},
    options::SyncOptions,
    sync::{ApplyReport, CleanupReport, ExtractReport, Synchronizer, WrittenBatch},
    types::{EntryKind, PluralCategory},
};
