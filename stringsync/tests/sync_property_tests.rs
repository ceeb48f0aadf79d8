use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use stringsync::traits::Parser;
use stringsync::{AndroidStringsFormat, Batch, BatchEntry, SyncOptions, Synchronizer};

/// Where a name lives: `(is_plural, in_source, in_target)`.
type Placement = (bool, bool, bool);

fn key_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9_]{0,12}").expect("valid key regex")
}

fn dataset_strategy(max: usize) -> impl Strategy<Value = BTreeMap<String, Placement>> {
    prop::collection::btree_map(key_strategy(), (any::<bool>(), any::<bool>(), any::<bool>()), 0..max)
}

fn render(names: &BTreeMap<String, Placement>, pick: impl Fn(&Placement) -> bool) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<resources>\n");
    for (name, placement) in names.iter().filter(|(_, p)| pick(*p)) {
        if placement.0 {
            xml.push_str(&format!(
                "  <plurals name=\"{0}\">\n    <item quantity=\"one\">%d {0}</item>\n    <item quantity=\"other\">%d {0}s</item>\n  </plurals>\n",
                name
            ));
        } else {
            xml.push_str(&format!("  <string name=\"{0}\">Text for {0}</string>\n", name));
        }
    }
    xml.push_str("</resources>\n");
    xml
}

struct Workspace {
    _dir: tempfile::TempDir,
    source: PathBuf,
    target: PathBuf,
    batches: PathBuf,
}

fn workspace(names: &BTreeMap<String, Placement>) -> Result<Workspace, TestCaseError> {
    let dir = tempfile::tempdir().map_err(|e| TestCaseError::fail(e.to_string()))?;
    let source = dir.path().join("values/strings.xml");
    let target = dir.path().join("values-de/strings.xml");
    for path in [&source, &target] {
        fs::create_dir_all(path.parent().expect("parent"))
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
    }
    fs::write(&source, render(names, |p| p.1)).map_err(|e| TestCaseError::fail(e.to_string()))?;
    fs::write(&target, render(names, |p| p.2)).map_err(|e| TestCaseError::fail(e.to_string()))?;
    let batches = dir.path().join("batches");
    Ok(Workspace {
        _dir: dir,
        source,
        target,
        batches,
    })
}

fn names_in(path: &Path) -> Result<BTreeSet<String>, TestCaseError> {
    let doc = AndroidStringsFormat::read_from(path).map_err(|e| TestCaseError::fail(e.to_string()))?;
    Ok(doc
        .nodes
        .iter()
        .filter_map(|n| n.name())
        .map(str::to_string)
        .collect())
}

fn expected(names: &BTreeMap<String, Placement>, pick: impl Fn(&Placement) -> bool) -> BTreeSet<String> {
    names
        .iter()
        .filter(|(_, p)| pick(*p))
        .map(|(name, _)| name.clone())
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn cleanup_leaves_intersection_of_names(names in dataset_strategy(40)) {
        let ws = workspace(&names)?;
        let sync = Synchronizer::new(&ws.source, &ws.target)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;

        let report = sync.cleanup().map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(names_in(&ws.target)?, expected(&names, |p| p.1 && p.2));
        prop_assert_eq!(report.removed.len(), expected(&names, |p| !p.1 && p.2).len());

        let again = sync.cleanup().map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert!(again.removed.is_empty());
        prop_assert!(again.backup.is_none());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn extract_covers_exactly_the_missing_names(names in dataset_strategy(260)) {
        let ws = workspace(&names)?;
        let options = SyncOptions::new().with_output_dir(&ws.batches);
        let sync = Synchronizer::with_options(&ws.source, &ws.target, options)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;

        let report = sync.extract().map_err(|e| TestCaseError::fail(e.to_string()))?;
        let missing = expected(&names, |p| p.1 && !p.2);
        prop_assert_eq!(report.missing, missing.len());

        let mut extracted = Vec::new();
        for (i, written) in report.batches.iter().enumerate() {
            let batch = Batch::load(&written.path).map_err(|e| TestCaseError::fail(e.to_string()))?;
            prop_assert_eq!(batch.batch_id as usize, i + 1);
            prop_assert!(batch.entries.len() <= 50);
            if i + 1 < report.batches.len() {
                prop_assert_eq!(batch.entries.len(), 50);
            }
            extracted.extend(batch.entries);
        }

        // Strings first, then plurals, each in source order.
        let mut order: Vec<String> = names
            .iter()
            .filter(|(_, p)| p.1 && !p.2 && !p.0)
            .map(|(n, _)| n.clone())
            .collect();
        order.extend(names.iter().filter(|(_, p)| p.1 && !p.2 && p.0).map(|(n, _)| n.clone()));
        let actual: Vec<String> = extracted.iter().map(|e| e.name().to_string()).collect();
        prop_assert_eq!(actual, order);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn applying_a_translated_batch_adds_its_names(names in dataset_strategy(40)) {
        let ws = workspace(&names)?;
        let sync = Synchronizer::new(&ws.source, &ws.target)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;

        let batches = sync.plan_batches().map_err(|e| TestCaseError::fail(e.to_string()))?;
        let before = names_in(&ws.target)?;
        let Some(mut batch) = batches.into_iter().next() else {
            prop_assert!(expected(&names, |p| p.1 && !p.2).is_empty());
            return Ok(());
        };

        for entry in &mut batch.entries {
            match entry {
                BatchEntry::Singular { source_text, translated_text, .. } => {
                    *translated_text = Some(format!("[de] {}", source_text));
                }
                BatchEntry::Plural { items, translated_items, .. } => {
                    *translated_items = Some(
                        items.iter().map(|(q, text)| (*q, format!("[de] {}", text))).collect(),
                    );
                }
            }
        }
        let batch_names: BTreeSet<String> = batch.entries.iter().map(|e| e.name().to_string()).collect();

        let report = sync.apply_batch(&batch).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(report.applied(), batch.entries.len());

        let after = names_in(&ws.target)?;
        let union: BTreeSet<String> = before.union(&batch_names).cloned().collect();
        prop_assert_eq!(after, union);
    }
}
