//! Batch files: the hand-off between `extract`, the external translator and `apply`.
//!
//! A batch is a JSON object:
//!
//! ```json
//! {
//!   "language": "lv",
//!   "batch_id": 1,
//!   "source_file": "res/values/strings.xml",
//!   "target_file": "res/values-lv/strings.xml",
//!   "entries": [
//!     { "type": "string", "name": "b", "source_text": "World", "context": "", "translated_text": "Pasaule" },
//!     { "type": "plural", "name": "days", "items": { "one": "%d day", "other": "%d days" }, "context": "Plural forms for: days" }
//!   ]
//! }
//! ```

use std::{
    collections::BTreeMap,
    fs,
    io::{BufRead, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    error::Error,
    traits::Parser,
    types::{EntryKind, PluralCategory},
};

/// Default maximum number of entries per batch file.
pub const DEFAULT_BATCH_SIZE: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    pub language: String,
    pub batch_id: u32,
    pub source_file: PathBuf,
    pub target_file: PathBuf,
    pub entries: Vec<BatchEntry>,
}

/// One entry missing from the target, optionally carrying its translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BatchEntry {
    #[serde(rename = "string")]
    Singular {
        name: String,
        #[serde(default)]
        source_text: String,
        #[serde(default)]
        context: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        translated_text: Option<String>,
    },
    Plural {
        name: String,
        #[serde(default)]
        items: BTreeMap<PluralCategory, String>,
        #[serde(default)]
        context: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        translated_items: Option<BTreeMap<PluralCategory, String>>,
    },
}

impl BatchEntry {
    pub fn name(&self) -> &str {
        match self {
            BatchEntry::Singular { name, .. } | BatchEntry::Plural { name, .. } => name,
        }
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            BatchEntry::Singular { .. } => EntryKind::Singular,
            BatchEntry::Plural { .. } => EntryKind::Plural,
        }
    }
}

impl Batch {
    /// Splits `entries` into consecutive batches of at most `batch_size`, numbered from 1.
    pub fn chunk(
        language: &str,
        source_file: &Path,
        target_file: &Path,
        entries: Vec<BatchEntry>,
        batch_size: usize,
    ) -> Result<Vec<Batch>, Error> {
        if batch_size == 0 {
            return Err(Error::InvalidOptions(
                "batch size must be at least 1".to_string(),
            ));
        }

        Ok(entries
            .chunks(batch_size)
            .zip(1u32..)
            .map(|(chunk, batch_id)| Batch {
                language: language.to_string(),
                batch_id,
                source_file: source_file.to_path_buf(),
                target_file: target_file.to_path_buf(),
                entries: chunk.to_vec(),
            })
            .collect())
    }

    /// `batch_<language>_<NNN>.json`
    pub fn file_name(&self) -> String {
        batch_file_name(&self.language, self.batch_id)
    }

    /// Reads and validates a batch file.
    ///
    /// Anything that is not a well-formed batch (bad JSON, missing top-level fields,
    /// unknown entry `type`) is reported as [`Error::InvalidBatch`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Batch, Error> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        serde_json::from_slice(&bytes).map_err(|e| Error::invalid_batch(path, e))
    }
}

pub fn batch_file_name(language: &str, batch_id: u32) -> String {
    format!("batch_{}_{:03}.json", language, batch_id)
}

impl Parser for Batch {
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        serde_json::from_reader(reader).map_err(Error::Batch)
    }

    /// Pretty-printed with two-space indentation; non-ASCII text stays literal.
    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        serde_json::to_writer_pretty(&mut writer, self).map_err(Error::Batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn string_entry(name: &str) -> BatchEntry {
        BatchEntry::Singular {
            name: name.to_string(),
            source_text: format!("text of {}", name),
            context: String::new(),
            translated_text: None,
        }
    }

    #[test]
    fn test_file_name_is_zero_padded() {
        assert_eq!(batch_file_name("lv", 1), "batch_lv_001.json");
        assert_eq!(batch_file_name("pt-rBR", 12), "batch_pt-rBR_012.json");
        assert_eq!(batch_file_name("de", 1234), "batch_de_1234.json");
    }

    #[test]
    fn test_chunk_sizes() {
        let src = Path::new("values/strings.xml");
        let dst = Path::new("values-lv/strings.xml");
        let sizes = |n: usize| {
            let entries = (0..n).map(|i| string_entry(&format!("k{}", i))).collect();
            Batch::chunk("lv", src, dst, entries, DEFAULT_BATCH_SIZE)
                .unwrap()
                .iter()
                .map(|b| b.entries.len())
                .collect::<Vec<_>>()
        };
        assert_eq!(sizes(0), Vec::<usize>::new());
        assert_eq!(sizes(1), vec![1]);
        assert_eq!(sizes(50), vec![50]);
        assert_eq!(sizes(51), vec![50, 1]);
    }

    #[test]
    fn test_chunk_numbers_from_one() {
        let entries = (0..5).map(|i| string_entry(&format!("k{}", i))).collect();
        let batches = Batch::chunk(
            "lv",
            Path::new("a.xml"),
            Path::new("b.xml"),
            entries,
            2,
        )
        .unwrap();
        let ids: Vec<_> = batches.iter().map(|b| b.batch_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(batches[2].entries[0].name(), "k4");
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let result = Batch::chunk("lv", Path::new("a"), Path::new("b"), vec![], 0);
        assert!(matches!(result, Err(Error::InvalidOptions(_))));
    }

    #[test]
    fn test_serialized_shape() {
        let batch = Batch {
            language: "lv".to_string(),
            batch_id: 1,
            source_file: PathBuf::from("values/strings.xml"),
            target_file: PathBuf::from("values-lv/strings.xml"),
            entries: vec![
                BatchEntry::Singular {
                    name: "b".to_string(),
                    source_text: "Wörld".to_string(),
                    context: "Related strings: a: Hello...".to_string(),
                    translated_text: None,
                },
                BatchEntry::Plural {
                    name: "days".to_string(),
                    items: BTreeMap::from([
                        (PluralCategory::Other, "%d days".to_string()),
                        (PluralCategory::One, "%d day".to_string()),
                    ]),
                    context: "Plural forms for: days".to_string(),
                    translated_items: None,
                },
            ],
        };
        let json = batch.to_string_lossy().unwrap();
        let expected = indoc! {r#"
            {
              "language": "lv",
              "batch_id": 1,
              "source_file": "values/strings.xml",
              "target_file": "values-lv/strings.xml",
              "entries": [
                {
                  "type": "string",
                  "name": "b",
                  "source_text": "Wörld",
                  "context": "Related strings: a: Hello..."
                },
                {
                  "type": "plural",
                  "name": "days",
                  "items": {
                    "one": "%d day",
                    "other": "%d days"
                  },
                  "context": "Plural forms for: days"
                }
              ]
            }"#};
        assert_eq!(json, expected);
    }

    #[test]
    fn test_parse_translated_entries() {
        let json = r#"{
            "language": "lv", "batch_id": 2,
            "source_file": "s.xml", "target_file": "t.xml",
            "entries": [
                {"type": "string", "name": "b", "translated_text": "Pasaule"},
                {"type": "plural", "name": "days", "translated_items": {"one": "%d diena", "other": "%d dienas"}}
            ]
        }"#;
        let batch = Batch::from_str(json).unwrap();
        assert_eq!(batch.batch_id, 2);
        assert_eq!(batch.entries[0].kind(), EntryKind::Singular);
        match &batch.entries[1] {
            BatchEntry::Plural {
                translated_items: Some(items),
                ..
            } => assert_eq!(items[&PluralCategory::Other], "%d dienas"),
            other => panic!("unexpected entry: {:?}", other),
        }
    }

    #[test]
    fn test_load_rejects_missing_fields_and_unknown_types() {
        let dir = tempfile::TempDir::new().unwrap();

        let missing = dir.path().join("missing.json");
        fs::write(&missing, r#"{"language": "lv", "entries": []}"#).unwrap();
        assert!(matches!(
            Batch::load(&missing),
            Err(Error::InvalidBatch { .. })
        ));

        let unknown = dir.path().join("unknown.json");
        fs::write(
            &unknown,
            r#"{"language": "lv", "batch_id": 1, "source_file": "s", "target_file": "t",
                "entries": [{"type": "array", "name": "x"}]}"#,
        )
        .unwrap();
        assert!(matches!(
            Batch::load(&unknown),
            Err(Error::InvalidBatch { .. })
        ));

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{ not json").unwrap();
        assert!(matches!(Batch::load(&broken), Err(Error::InvalidBatch { .. })));
    }
}
