//! The product-mapping side table: display name -> product id.
//!
//! Loaded once per run from a JSON array of objects. `productName` and
//! `productId` are the authoritative keys; `product_name`/`name` and
//! `product_id`/`id` are tolerated as aliases. Objects missing either
//! side are skipped.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::PodError;

#[derive(Debug, Deserialize)]
struct ProductRow {
    #[serde(rename = "productName", alias = "product_name", alias = "name")]
    product_name: Option<String>,
    #[serde(rename = "productId", alias = "product_id", alias = "id")]
    product_id: Option<String>,
}

/// Immutable name -> id table, loaded once per run.
#[derive(Debug, Default)]
pub struct ProductMap {
    by_name: HashMap<String, String>,
}

impl ProductMap {
    /// Load the table from a JSON file. Unreadable or unparseable input
    /// is an error; the caller treats it as fatal setup failure.
    pub fn load(path: &Path) -> Result<ProductMap, PodError> {
        let data = std::fs::read_to_string(path)?;
        let rows: Vec<ProductRow> = serde_json::from_str(&data)?;
        let mut by_name = HashMap::new();
        for row in rows {
            if let (Some(name), Some(id)) = (row.product_name, row.product_id) {
                by_name.insert(name, id);
            }
        }
        Ok(ProductMap { by_name })
    }

    /// Resolve a product label. Empty labels never resolve.
    pub fn resolve(&self, label: &str) -> Option<&str> {
        let label = label.trim();
        if label.is_empty() {
            return None;
        }
        self.by_name.get(label).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
