//! Tag utilities shared by the provider modules.
//!
//! Provides a lowercase, deduplicating tag accumulator. Every trail ends up
//! with the generic `hiking`, `outdoor` and `nature` tags regardless of
//! provider.

use std::collections::BTreeSet;

/// Tags every normalized trail carries.
pub const GENERIC_TAGS: [&str; 3] = ["hiking", "outdoor", "nature"];

#[derive(Debug, Default)]
pub(crate) struct TagSet(BTreeSet<String>);

impl TagSet {
    pub(crate) fn insert(&mut self, tag: &str) {
        self.0.insert(tag.trim().to_lowercase());
    }

    /// Insert `{prefix}-{value}` unless the value is blank.
    pub(crate) fn insert_prefixed(&mut self, prefix: &str, value: Option<&str>) {
        if let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) {
            self.insert(&format!("{prefix}-{value}"));
        }
    }

    pub(crate) fn finish(mut self) -> Vec<String> {
        for tag in GENERIC_TAGS {
            self.insert(tag);
        }
        self.0.into_iter().collect()
    }
}
