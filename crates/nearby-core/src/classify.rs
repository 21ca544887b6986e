//! Name-prefix classification of catalog records into subcategory buckets.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::business::BusinessRecord;

/// One row of the classification table.
///
/// A business belongs to the `(category, subcategory)` bucket when its name
/// starts with any of `prefixes`. Matching is case-sensitive and literal,
/// so separators such as the trailing `" -"` in `"Doctor -"` are significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRule {
    pub category: String,
    pub subcategory: String,
    pub prefixes: Vec<String>,
}

impl ClassificationRule {
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.prefixes.iter().any(|p| name.starts_with(p.as_str()))
    }
}

/// Classification rules indexed by `(category, subcategory)`.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: HashMap<(String, String), ClassificationRule>,
}

impl RuleTable {
    /// Index `rules` by their `(category, subcategory)` pair.
    ///
    /// A later row for an already-indexed pair replaces the earlier one;
    /// [`crate::load_categories`] rejects such files before they get here.
    #[must_use]
    pub fn new(rules: impl IntoIterator<Item = ClassificationRule>) -> Self {
        let rules = rules
            .into_iter()
            .map(|r| ((r.category.clone(), r.subcategory.clone()), r))
            .collect();
        Self { rules }
    }

    #[must_use]
    pub fn rule(&self, category: &str, subcategory: &str) -> Option<&ClassificationRule> {
        self.rules
            .get(&(category.to_owned(), subcategory.to_owned()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Keep the records that fall into the `(category, subcategory)` bucket,
    /// in input order.
    ///
    /// An unregistered pair yields an empty vector rather than an error.
    #[must_use]
    pub fn classify(
        &self,
        records: &[BusinessRecord],
        category: &str,
        subcategory: &str,
    ) -> Vec<BusinessRecord> {
        let Some(rule) = self.rule(category, subcategory) else {
            return Vec::new();
        };
        records
            .iter()
            .filter(|r| rule.matches(&r.name))
            .cloned()
            .collect()
    }
}
