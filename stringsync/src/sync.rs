//! The resource synchronizer: cleanup, extract and apply over one source/target pair.

use std::{
    collections::{HashMap, HashSet},
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use crate::{
    backup::create_backup,
    batch::{Batch, BatchEntry},
    context::{plural_context, string_context},
    error::Error,
    formats::{
        AndroidStringsFormat, Node, PluralItem, PluralsResource, StringResource, Upsert,
        language_code_from_path,
    },
    options::SyncOptions,
    traits::Parser,
    types::EntryKind,
};

/// Outcome of [`Synchronizer::cleanup`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CleanupReport {
    /// The target did not exist, so nothing was done.
    pub target_missing: bool,
    /// Removed entries, in target document order.
    pub removed: Vec<(EntryKind, String)>,
    pub backup: Option<PathBuf>,
}

/// A batch file written by [`Synchronizer::extract`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenBatch {
    pub path: PathBuf,
    pub batch_id: u32,
    pub entries: usize,
}

/// Outcome of [`Synchronizer::extract`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtractReport {
    /// Number of source entries missing from the target.
    pub missing: usize,
    pub batches: Vec<WrittenBatch>,
}

/// Outcome of [`Synchronizer::apply`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApplyReport {
    /// An empty target had to be created first.
    pub created_target: bool,
    pub added: Vec<(EntryKind, String)>,
    pub replaced: Vec<(EntryKind, String)>,
    /// Entries without a usable translation.
    pub skipped: usize,
    pub backup: Option<PathBuf>,
}

impl ApplyReport {
    pub fn applied(&self) -> usize {
        self.added.len() + self.replaced.len()
    }
}

/// Keeps one target-locale `strings.xml` in step with the source `strings.xml`.
#[derive(Debug, Clone)]
pub struct Synchronizer {
    source: PathBuf,
    target: PathBuf,
    language: String,
    options: SyncOptions,
}

impl Synchronizer {
    /// Binds a source/target pair with default options.
    ///
    /// Fails with [`Error::SourceNotFound`] when `source` does not exist.
    pub fn new<S: AsRef<Path>, T: AsRef<Path>>(source: S, target: T) -> Result<Self, Error> {
        Self::with_options(source, target, SyncOptions::default())
    }

    pub fn with_options<S: AsRef<Path>, T: AsRef<Path>>(
        source: S,
        target: T,
        options: SyncOptions,
    ) -> Result<Self, Error> {
        let source = source.as_ref().to_path_buf();
        let target = target.as_ref().to_path_buf();
        if !source.exists() {
            return Err(Error::SourceNotFound(source));
        }
        let language = language_code_from_path(&target);
        debug!(source = %source.display(), target = %target.display(), %language, "synchronizer ready");
        Ok(Synchronizer {
            source,
            target,
            language,
            options,
        })
    }

    pub fn source_path(&self) -> &Path {
        &self.source
    }

    pub fn target_path(&self) -> &Path {
        &self.target
    }

    /// Language code derived from the target's `values-*` directory.
    pub fn language_code(&self) -> &str {
        &self.language
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// Removes target entries that no longer exist in the source.
    ///
    /// Strings are checked against source strings and plurals against source plurals.
    /// The target is backed up and rewritten only when something was removed.
    pub fn cleanup(&self) -> Result<CleanupReport, Error> {
        if !self.target.exists() {
            debug!(target = %self.target.display(), "target missing, cleanup skipped");
            return Ok(CleanupReport {
                target_missing: true,
                ..CleanupReport::default()
            });
        }

        let source = AndroidStringsFormat::read_from(&self.source)?;
        let mut target = AndroidStringsFormat::read_from(&self.target)?;

        let source_strings = source.string_names();
        let source_plurals = source.plural_names();
        let removed = target.retain_entries(|kind, name| match kind {
            EntryKind::Singular => source_strings.contains(name),
            EntryKind::Plural => source_plurals.contains(name),
        });

        if removed.is_empty() {
            return Ok(CleanupReport::default());
        }

        for (kind, name) in &removed {
            debug!(%kind, %name, "removing obsolete entry");
        }
        let backup = create_backup(&self.target)?;
        target.write_to(&self.target)?;
        info!(target = %self.target.display(), removed = removed.len(), "target cleaned up");

        Ok(CleanupReport {
            target_missing: false,
            removed,
            backup,
        })
    }

    /// Source entries absent from the target: strings first, then plurals, each in
    /// source document order.
    pub fn missing_entries(&self) -> Result<Vec<BatchEntry>, Error> {
        let source = AndroidStringsFormat::read_from(&self.source)?;
        let target = if self.target.exists() {
            AndroidStringsFormat::read_from(&self.target)?
        } else {
            AndroidStringsFormat::new()
        };
        let target_strings = target.string_names();
        let target_plurals = target.plural_names();

        let source_strings: Vec<&StringResource> = source.strings().collect();
        let latest_strings: HashMap<&str, &StringResource> = source_strings
            .iter()
            .map(|s| (s.name.as_str(), *s))
            .collect();
        let latest_plurals: HashMap<&str, &PluralsResource> =
            source.plurals().map(|p| (p.name.as_str(), p)).collect();

        let mut missing = Vec::new();

        let mut seen = HashSet::new();
        for s in &source_strings {
            let name = s.name.as_str();
            if target_strings.contains(name) || !seen.insert(name) {
                continue;
            }
            missing.push(BatchEntry::Singular {
                name: name.to_string(),
                source_text: latest_strings[name].value().to_string(),
                context: string_context(&source_strings, name, self.options.context_window),
                translated_text: None,
            });
        }

        let mut seen = HashSet::new();
        for p in source.plurals() {
            let name = p.name.as_str();
            if target_plurals.contains(name) || !seen.insert(name) {
                continue;
            }
            missing.push(BatchEntry::Plural {
                name: name.to_string(),
                items: latest_plurals[name]
                    .items()
                    .iter()
                    .map(|item| (item.quantity, item.value().to_string()))
                    .collect(),
                context: plural_context(name),
                translated_items: None,
            });
        }

        debug!(missing = missing.len(), "computed missing entries");
        Ok(missing)
    }

    /// Missing entries split into batches, without touching the filesystem.
    pub fn plan_batches(&self) -> Result<Vec<Batch>, Error> {
        let missing = self.missing_entries()?;
        Batch::chunk(
            &self.language,
            &self.source,
            &self.target,
            missing,
            self.options.batch_size,
        )
    }

    /// Writes `batch_<lang>_<NNN>.json` files for everything the target lacks.
    ///
    /// Writes nothing when the target is complete.
    pub fn extract(&self) -> Result<ExtractReport, Error> {
        let batches = self.plan_batches()?;
        let missing = batches.iter().map(|b| b.entries.len()).sum();

        if !batches.is_empty() && !self.options.output_dir.as_os_str().is_empty() {
            fs::create_dir_all(&self.options.output_dir)?;
        }

        let mut written = Vec::with_capacity(batches.len());
        for batch in &batches {
            let path = self.options.output_dir.join(batch.file_name());
            batch.write_to(&path)?;
            info!(path = %path.display(), entries = batch.entries.len(), "batch written");
            written.push(WrittenBatch {
                path,
                batch_id: batch.batch_id,
                entries: batch.entries.len(),
            });
        }

        Ok(ExtractReport {
            missing,
            batches: written,
        })
    }

    /// Reads the batch at `batch_path` and merges its translations into the target.
    ///
    /// The batch is validated before anything on disk changes.
    pub fn apply<P: AsRef<Path>>(&self, batch_path: P) -> Result<ApplyReport, Error> {
        let batch = Batch::load(batch_path)?;
        self.apply_batch(&batch)
    }

    /// Merges translated entries of `batch` into the target, upserting by name.
    pub fn apply_batch(&self, batch: &Batch) -> Result<ApplyReport, Error> {
        let mut report = ApplyReport::default();

        if !self.target.exists() {
            if let Some(parent) = self.target.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            AndroidStringsFormat::new().write_to(&self.target)?;
            report.created_target = true;
            info!(target = %self.target.display(), "created empty target");
        }

        let mut target = AndroidStringsFormat::read_from(&self.target)?;
        report.backup = create_backup(&self.target)?;

        for entry in &batch.entries {
            let Some(node) = translated_node(entry, &target) else {
                debug!(name = entry.name(), "no translation, skipped");
                report.skipped += 1;
                continue;
            };
            let key = (entry.kind(), entry.name().to_string());
            match target.upsert(node) {
                Upsert::Added => report.added.push(key),
                Upsert::Replaced => report.replaced.push(key),
            }
        }

        if report.applied() > 0 {
            target.write_to(&self.target)?;
            info!(
                target = %self.target.display(),
                added = report.added.len(),
                replaced = report.replaced.len(),
                "translations applied"
            );
        }
        Ok(report)
    }
}

/// The node an entry's translation turns into, keeping the attributes of any entry
/// it replaces. `None` when the entry carries no usable translation.
fn translated_node(entry: &BatchEntry, target: &AndroidStringsFormat) -> Option<Node> {
    match entry {
        BatchEntry::Singular {
            name,
            translated_text: Some(text),
            ..
        } if !name.is_empty() && !text.is_empty() => {
            let mut sr = StringResource::new(name.as_str(), text.as_str());
            if let Some(existing) = target.find_string(name) {
                sr.attributes = existing.attributes.clone();
            }
            Some(Node::String(sr))
        }
        BatchEntry::Plural {
            name,
            translated_items: Some(items),
            ..
        } if !name.is_empty() => {
            let items: Vec<PluralItem> = items
                .iter()
                .filter(|(_, text)| !text.is_empty())
                .map(|(quantity, text)| PluralItem::new(*quantity, text.as_str()))
                .collect();
            if items.is_empty() {
                return None;
            }
            let mut pr = PluralsResource::new(name.as_str(), items);
            if let Some(existing) = target.find_plurals(name) {
                pr.attributes = existing.attributes.clone();
            }
            Some(Node::Plurals(pr))
        }
        _ => None,
    }
}
