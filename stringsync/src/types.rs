//! Small shared types used by the document model, batches and reports.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

/// Standard CLDR plural forms, as used by the `quantity` attribute of `<item>`.
///
/// The derived ordering follows CLDR order, so maps keyed by category list
/// `zero` first and `other` last.
#[derive(Ord, PartialOrd, Eq, PartialEq, Debug, Clone, Copy, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl PluralCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PluralCategory::Zero => "zero",
            PluralCategory::One => "one",
            PluralCategory::Two => "two",
            PluralCategory::Few => "few",
            PluralCategory::Many => "many",
            PluralCategory::Other => "other",
        }
    }
}

impl FromStr for PluralCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zero" => Ok(PluralCategory::Zero),
            "one" => Ok(PluralCategory::One),
            "two" => Ok(PluralCategory::Two),
            "few" => Ok(PluralCategory::Few),
            "many" => Ok(PluralCategory::Many),
            "other" => Ok(PluralCategory::Other),
            _ => Err(format!("Unknown plural category: {}", s)),
        }
    }
}

impl Display for PluralCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two kinds of translatable entries in a resource document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// A `<string>` entry.
    #[serde(rename = "string")]
    Singular,
    /// A `<plurals>` group.
    Plural,
}

impl Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryKind::Singular => f.write_str("string"),
            EntryKind::Plural => f.write_str("plural"),
        }
    }
}
