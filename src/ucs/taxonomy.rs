// UCS taxonomy model
//
// Entries keep the order in which they were added; that order is the
// tie-break for equal scores.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// One UCS category/subcategory pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UcsCategory {
    /// CatID such as `TOONAnml`
    pub id: String,
    pub full_name: String,
    pub category: String,
    pub subcategory: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl UcsCategory {
    /// Entry whose full name is derived from category and subcategory
    pub fn new(
        id: impl Into<String>,
        category: impl Into<String>,
        subcategory: impl Into<String>,
    ) -> Self {
        let category = category.into();
        let subcategory = subcategory.into();
        UcsCategory {
            id: id.into(),
            full_name: derive_full_name(&category, &subcategory),
            category,
            subcategory,
            description: String::new(),
            keywords: Vec::new(),
        }
    }

    /// Build from the columns of a taxonomy table row.
    ///
    /// A blank `full_name` is derived as `"{category} {subcategory}"`.
    /// `keywords` is the raw comma-separated column.
    pub fn from_row(
        id: &str,
        full_name: &str,
        category: &str,
        subcategory: &str,
        description: &str,
        keywords: &str,
    ) -> Self {
        let category = category.trim();
        let subcategory = subcategory.trim();
        let full_name = match full_name.trim() {
            "" => derive_full_name(category, subcategory),
            name => name.to_string(),
        };

        UcsCategory {
            id: id.trim().to_string(),
            full_name,
            category: category.to_string(),
            subcategory: subcategory.to_string(),
            description: description.trim().to_string(),
            keywords: parse_keywords(keywords),
        }
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }
}

fn derive_full_name(category: &str, subcategory: &str) -> String {
    format!("{} {}", category, subcategory).trim().to_string()
}

/// Split a comma-separated keyword column, dropping blanks
pub fn parse_keywords(field: &str) -> Vec<String> {
    field
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

/// A taxonomy table row as found in JSON exports of the UCS spreadsheet
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TaxonomyRow {
    pub id: String,
    pub full_name: String,
    pub category: String,
    pub subcategory: String,
    pub description: String,
    /// Comma-separated
    pub keywords: String,
}

impl From<&TaxonomyRow> for UcsCategory {
    fn from(row: &TaxonomyRow) -> Self {
        UcsCategory::from_row(
            &row.id,
            &row.full_name,
            &row.category,
            &row.subcategory,
            &row.description,
            &row.keywords,
        )
    }
}

/// Read-only set of UCS entries, unique by id, in insertion order
#[derive(Debug, Clone, Default)]
pub struct Taxonomy {
    entries: Vec<UcsCategory>,
    index: HashMap<String, usize>,
}

impl Taxonomy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry.
    ///
    /// Entries without an id or category are rejected. An id that is
    /// already present is replaced in place, keeping its position.
    /// Returns whether the entry was stored.
    pub fn insert(&mut self, entry: UcsCategory) -> bool {
        if entry.id.trim().is_empty() || entry.category.trim().is_empty() {
            warn!(
                id = %entry.id,
                category = %entry.category,
                "taxonomy row rejected: missing id or category"
            );
            return false;
        }

        match self.index.get(&entry.id) {
            Some(&pos) => {
                debug!(id = %entry.id, "duplicate taxonomy id replaces earlier row");
                self.entries[pos] = entry;
            }
            None => {
                self.index.insert(entry.id.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
        true
    }

    /// Load a JSON array of taxonomy rows
    pub fn from_json_str(json: &str) -> Result<Self> {
        let rows: Vec<TaxonomyRow> = serde_json::from_str(json).map_err(Error::Taxonomy)?;
        Ok(rows.iter().map(UcsCategory::from).collect())
    }

    pub fn get(&self, id: &str) -> Option<&UcsCategory> {
        self.index.get(id).map(|&pos| &self.entries[pos])
    }

    /// First entry with this category and subcategory, ignoring case
    pub fn find_by_names(&self, category: &str, subcategory: &str) -> Option<&UcsCategory> {
        self.entries.iter().find(|entry| {
            entry.category.eq_ignore_ascii_case(category)
                && entry.subcategory.eq_ignore_ascii_case(subcategory)
        })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UcsCategory> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<UcsCategory> for Taxonomy {
    fn from_iter<I: IntoIterator<Item = UcsCategory>>(iter: I) -> Self {
        let mut taxonomy = Taxonomy::new();
        for entry in iter {
            taxonomy.insert(entry);
        }
        taxonomy
    }
}

impl<'a> IntoIterator for &'a Taxonomy {
    type Item = &'a UcsCategory;
    type IntoIter = std::slice::Iter<'a, UcsCategory>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_row() {
        let entry = UcsCategory::from_row(
            " TOONAnml ",
            "",
            "CARTOON",
            "ANIMAL",
            "Cartoon animal sounds",
            "cartoon, animal,, chicken ,",
        );
        assert_eq!(entry.id, "TOONAnml");
        assert_eq!(entry.full_name, "CARTOON ANIMAL");
        assert_eq!(entry.keywords, vec!["cartoon", "animal", "chicken"]);

        let entry = UcsCategory::from_row("AMBFarm", "Ambience Farm", "AMBIENCE", "FARM", "", "");
        assert_eq!(entry.full_name, "Ambience Farm");
        assert!(entry.keywords.is_empty());
    }

    #[test]
    fn test_rejects_incomplete_rows() {
        let mut taxonomy = Taxonomy::new();
        assert!(!taxonomy.insert(UcsCategory::new("", "ANIMALS", "BIRD")));
        assert!(!taxonomy.insert(UcsCategory::new("ANMLBird", " ", "BIRD")));
        assert!(taxonomy.is_empty());
    }

    #[test]
    fn test_duplicate_id_keeps_position() {
        let taxonomy: Taxonomy = vec![
            UcsCategory::new("A1", "ALPHA", "ONE"),
            UcsCategory::new("B1", "BETA", "ONE"),
            UcsCategory::new("A1", "ALPHA", "REPLACED"),
        ]
        .into_iter()
        .collect();

        assert_eq!(taxonomy.len(), 2);
        let ids: Vec<_> = taxonomy.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["A1", "B1"]);
        assert_eq!(taxonomy.get("A1").unwrap().subcategory, "REPLACED");
    }

    #[test]
    fn test_find_by_names() {
        let taxonomy: Taxonomy = vec![UcsCategory::new("ANMLBird", "ANIMALS", "BIRD")]
            .into_iter()
            .collect();
        assert_eq!(
            taxonomy.find_by_names("animals", "Bird").map(|e| e.id.as_str()),
            Some("ANMLBird")
        );
        assert!(taxonomy.find_by_names("animals", "").is_none());
    }

    #[test]
    fn test_from_json() {
        let json = r#"[
            {"id": "ANMLFarm", "category": "ANIMALS", "subcategory": "FARM", "keywords": "chicken, cow"},
            {"id": "", "category": "BROKEN"}
        ]"#;
        let taxonomy = Taxonomy::from_json_str(json).unwrap();
        assert_eq!(taxonomy.len(), 1);
        let entry = taxonomy.get("ANMLFarm").unwrap();
        assert_eq!(entry.full_name, "ANIMALS FARM");
        assert_eq!(entry.keywords, vec!["chicken", "cow"]);

        let err = Taxonomy::from_json_str("{}").unwrap_err();
        assert!(matches!(err, Error::Taxonomy(_)));
        assert!(err.to_string().starts_with("Invalid taxonomy"));
    }
}
