use bson::Document as BsonDocument;
use serde::{Deserialize, Serialize};

use crate::errors::StoreError;

/// One record in the books collection.
///
/// The six named fields are the catalog schema. Documents are free to carry
/// more (page counts, publisher imprints); anything unnamed round-trips
/// through `extra` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub published_year: i32,
    pub price: f64,
    pub in_stock: bool,
    #[serde(flatten)]
    pub extra: BsonDocument,
}

impl Book {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        genre: impl Into<String>,
        published_year: i32,
        price: f64,
        in_stock: bool,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            genre: genre.into(),
            published_year,
            price,
            in_stock,
            extra: BsonDocument::new(),
        }
    }

    pub fn to_document(&self) -> Result<BsonDocument, StoreError> {
        Ok(bson::to_document(self)?)
    }

    pub fn from_document(doc: BsonDocument) -> Result<Self, StoreError> {
        Ok(bson::from_document(doc)?)
    }
}

/// Projection row for title/author/price listings. Carries no id and no
/// stock data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSummary {
    pub title: String,
    pub author: String,
    pub price: f64,
}
