//! Category presentation metadata and the classification rule table,
//! loaded together from `config/categories.yaml`.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classify::{ClassificationRule, RuleTable};
use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubcategoryDefinition {
    pub name: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDefinition {
    pub name: String,
    /// Gradient start/end colours used by the category tile.
    pub accent_colors: Vec<String>,
    pub subcategories: Vec<SubcategoryDefinition>,
}

impl CategoryDefinition {
    #[must_use]
    pub fn subcategory(&self, name: &str) -> Option<&SubcategoryDefinition> {
        self.subcategories.iter().find(|s| s.name == name)
    }
}

#[derive(Debug, Deserialize)]
pub struct CategoriesFile {
    pub categories: Vec<CategoryDefinition>,
    #[serde(default)]
    pub rules: Vec<ClassificationRule>,
}

impl CategoriesFile {
    /// Split into the read-only presentation store and the classifier table.
    #[must_use]
    pub fn into_parts(self) -> (CategoryStore, RuleTable) {
        (
            CategoryStore {
                categories: self.categories,
            },
            RuleTable::new(self.rules),
        )
    }
}

/// Read-only category listing for the presentation layer, in file order.
#[derive(Debug, Clone, Default)]
pub struct CategoryStore {
    categories: Vec<CategoryDefinition>,
}

impl CategoryStore {
    #[must_use]
    pub fn categories(&self) -> &[CategoryDefinition] {
        &self.categories
    }

    #[must_use]
    pub fn category(&self, name: &str) -> Option<&CategoryDefinition> {
        self.categories.iter().find(|c| c.name == name)
    }
}

/// Load and validate the categories configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_categories(path: &Path) -> Result<CategoriesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CategoriesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_categories(&content)
}

/// Parse and validate categories YAML already in memory.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML does not parse or fails validation.
pub fn parse_categories(content: &str) -> Result<CategoriesFile, ConfigError> {
    let file: CategoriesFile = serde_yaml::from_str(content)?;
    validate_categories(&file)?;
    Ok(file)
}

fn validate_categories(file: &CategoriesFile) -> Result<(), ConfigError> {
    let mut seen_categories = HashSet::new();

    for category in &file.categories {
        if category.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "category name must be non-empty".to_string(),
            ));
        }

        if !seen_categories.insert(category.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate category: '{}'",
                category.name
            )));
        }

        if category.accent_colors.len() != 2 {
            return Err(ConfigError::Validation(format!(
                "category '{}' must declare exactly 2 accent colors, found {}",
                category.name,
                category.accent_colors.len()
            )));
        }

        let mut seen_subcategories = HashSet::new();
        for sub in &category.subcategories {
            if sub.name.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "category '{}' has a subcategory with an empty name",
                    category.name
                )));
            }
            if !seen_subcategories.insert(sub.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate subcategory '{}' in category '{}'",
                    sub.name, category.name
                )));
            }
        }
    }

    let mut seen_rules = HashSet::new();
    for rule in &file.rules {
        let declared = file
            .categories
            .iter()
            .find(|c| c.name == rule.category)
            .and_then(|c| c.subcategory(&rule.subcategory))
            .is_some();
        if !declared {
            return Err(ConfigError::Validation(format!(
                "rule references undeclared subcategory '{} / {}'",
                rule.category, rule.subcategory
            )));
        }

        if !seen_rules.insert((rule.category.as_str(), rule.subcategory.as_str())) {
            return Err(ConfigError::Validation(format!(
                "duplicate rule for '{} / {}'",
                rule.category, rule.subcategory
            )));
        }

        if rule.prefixes.is_empty() || rule.prefixes.iter().any(String::is_empty) {
            return Err(ConfigError::Validation(format!(
                "rule '{} / {}' needs at least one non-empty prefix",
                rule.category, rule.subcategory
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "categories_test.rs"]
mod tests;
