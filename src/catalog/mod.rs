//! Symptom catalog.
//!
//! The catalog is a fixed, ordered list of symptom/advice pairs read once at
//! startup from a two-column CSV file. An entry's identity is its position.

mod csv;
mod loader;

pub use loader::{load_catalog, locate_catalog, parse_catalog, LoadReport};

use serde::{Deserialize, Serialize};

/// One symptom description and the advice attached to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Symptom text matched against queries. Never empty.
    pub symptom_text: String,
    /// Advice shown when this entry is the best match.
    pub advice_text: String,
}

impl CatalogEntry {
    /// Create an entry, rejecting a blank symptom.
    pub fn new(symptom_text: impl Into<String>, advice_text: impl Into<String>) -> Option<Self> {
        let symptom_text = symptom_text.into();
        if symptom_text.trim().is_empty() {
            return None;
        }
        Some(Self {
            symptom_text,
            advice_text: advice_text.into(),
        })
    }
}
