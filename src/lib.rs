pub mod book;
pub mod errors;
pub mod explain;
pub mod fixtures;
pub mod index;
pub mod logger;
pub mod memory;
pub mod ops;
pub mod pipeline;
pub mod query;
pub mod store;
pub mod telemetry;
pub mod types;

use crate::book::{Book, BookSummary};
use crate::errors::StoreError;
use crate::explain::ExplainReport;
use crate::ops::{AuthorCount, DecadeCount, GenreAverage};
use crate::query::Cursor;
use crate::store::DocumentStore;

/// Typed facade over one books collection.
///
/// Owns a collection handle and forwards to the free functions in `ops`;
/// use whichever style fits the call site.
pub struct BookCatalog<C> {
    collection: C,
}

impl<C: DocumentStore> BookCatalog<C> {
    pub fn new(collection: C) -> Self {
        Self { collection }
    }

    /// The underlying collection handle.
    pub fn collection(&self) -> &C {
        &self.collection
    }

    // --- Finds ---
    pub fn find_by_genre(&self, genre: &str) -> Result<Cursor<Book>, StoreError> {
        ops::find_by_genre(&self.collection, genre)
    }

    pub fn find_published_after(&self, year: i32) -> Result<Cursor<Book>, StoreError> {
        ops::find_published_after(&self.collection, year)
    }

    pub fn find_by_author(&self, author: &str) -> Result<Cursor<Book>, StoreError> {
        ops::find_by_author(&self.collection, author)
    }

    pub fn find_in_stock_after_year(&self, year: i32) -> Result<Cursor<Book>, StoreError> {
        ops::find_in_stock_after_year(&self.collection, year)
    }

    pub fn list_titles_authors_prices(&self) -> Result<Cursor<BookSummary>, StoreError> {
        ops::list_titles_authors_prices(&self.collection)
    }

    pub fn sort_by_price_asc(&self) -> Result<Cursor<Book>, StoreError> {
        ops::sort_by_price_asc(&self.collection)
    }

    pub fn sort_by_price_desc(&self) -> Result<Cursor<Book>, StoreError> {
        ops::sort_by_price_desc(&self.collection)
    }

    pub fn paginate(
        &self,
        page_size: usize,
        page_index: usize,
    ) -> Result<Cursor<Book>, StoreError> {
        ops::paginate(&self.collection, page_size, page_index)
    }

    // --- Writes ---
    pub fn update_book_price(&self, title: &str, price: f64) -> Result<u64, StoreError> {
        ops::update_book_price(&self.collection, title, price)
    }

    pub fn delete_book_by_title(&self, title: &str) -> Result<u64, StoreError> {
        ops::delete_book_by_title(&self.collection, title)
    }

    // --- Aggregations ---
    pub fn average_price_by_genre(&self) -> Result<Vec<GenreAverage>, StoreError> {
        ops::average_price_by_genre(&self.collection)
    }

    pub fn author_with_most_books(&self) -> Result<Option<AuthorCount>, StoreError> {
        ops::author_with_most_books(&self.collection)
    }

    pub fn count_by_decade(&self) -> Result<Vec<DecadeCount>, StoreError> {
        ops::count_by_decade(&self.collection)
    }

    // --- Indexes and diagnostics ---
    pub fn create_title_index(&self) -> Result<(), StoreError> {
        ops::create_title_index(&self.collection)
    }

    pub fn create_author_year_index(&self) -> Result<(), StoreError> {
        ops::create_author_year_index(&self.collection)
    }

    pub fn explain_title_lookup(&self, title: &str) -> Result<ExplainReport, StoreError> {
        ops::explain_title_lookup(&self.collection, title)
    }
}

/// Initializes the library's default logging.
///
/// Call once, before issuing operations, if the embedding application does
/// not configure logging itself.
pub fn init() -> Result<(), Box<dyn std::error::Error>> {
    logger::init()?;
    Ok(())
}
