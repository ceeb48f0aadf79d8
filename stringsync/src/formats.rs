//! Resource file formats understood by stringsync.
//!
//! Only Android `strings.xml` is supported. This module re-exports its document
//! type and knows how Android lays out per-locale resource directories.

pub mod android_strings;

use std::path::Path;

// Reexporting the format for easier access
pub use android_strings::{
    Format as AndroidStringsFormat, Node, PluralItem, PluralsResource, StringResource, Upsert,
};

/// Prefix of locale-qualified Android resource directories (`values-lv`, `values-pt-rBR`).
pub const VALUES_DIR_PREFIX: &str = "values-";

/// Language code used when it cannot be derived from the target path.
pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// Derives the language code from the directory holding `path`.
///
/// `res/values-lv/strings.xml` gives `lv`; anything not under a `values-*`
/// directory gives [`UNKNOWN_LANGUAGE`].
///
/// # Example
/// ```rust
/// use stringsync::formats::language_code_from_path;
/// assert_eq!(language_code_from_path("res/values-pt-rBR/strings.xml"), "pt-rBR");
/// assert_eq!(language_code_from_path("res/values/strings.xml"), "unknown");
/// ```
pub fn language_code_from_path<P: AsRef<Path>>(path: P) -> String {
    path.as_ref()
        .parent()
        .and_then(|dir| dir.file_name())
        .and_then(|name| name.to_str())
        .and_then(|name| name.strip_prefix(VALUES_DIR_PREFIX))
        .filter(|code| !code.is_empty())
        .unwrap_or(UNKNOWN_LANGUAGE)
        .to_string()
}
