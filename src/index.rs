use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::errors::StoreError;
use crate::query::Order;

/// Declaration of a store-maintained index. Only the declaration lives
/// here; building and using the structure is the store's business.
///
/// Names derive from the field list the way document databases spell them:
/// `title_1`, `author_1_published_year_1`, `_-1` for a descending field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexSpec {
    pub fields: Vec<(String, Order)>,
}

impl IndexSpec {
    #[must_use]
    pub fn ascending(field: impl Into<String>) -> Self {
        Self { fields: vec![(field.into(), Order::Asc)] }
    }

    #[must_use]
    pub fn compound(fields: Vec<(&str, Order)>) -> Self {
        Self { fields: fields.into_iter().map(|(f, o)| (f.to_string(), o)).collect() }
    }

    #[must_use]
    pub fn name(&self) -> String {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|(field, order)| {
                let dir = match order {
                    Order::Asc => "1",
                    Order::Desc => "-1",
                };
                format!("{field}_{dir}")
            })
            .collect();
        parts.join("_")
    }

    /// First field of the key, the one a leftmost-prefix lookup can use.
    #[must_use]
    pub fn leading_field(&self) -> Option<&str> {
        self.fields.first().map(|(f, _)| f.as_str())
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        if self.fields.is_empty() {
            return Err(StoreError::StoreOperationFailed("index spec has no fields".into()));
        }
        let mut seen = HashSet::new();
        for (field, _) in &self.fields {
            if field.is_empty() {
                return Err(StoreError::StoreOperationFailed("index field name is empty".into()));
            }
            if !seen.insert(field.as_str()) {
                return Err(StoreError::StoreOperationFailed(format!(
                    "duplicate index field: {field}"
                )));
            }
        }
        Ok(())
    }
}
