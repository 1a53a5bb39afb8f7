use bson::{Bson, Document as BsonDocument};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::book::{Book, BookSummary};
use crate::errors::StoreError;
use crate::explain::ExplainReport;
use crate::index::IndexSpec;
use crate::pipeline::{Accumulator, Expr, Stage};
use crate::query::{Cursor, Filter, FindOptions, Order, SortSpec, UpdateDoc};
use crate::store::DocumentStore;
use crate::telemetry;

/// Mean price for one genre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreAverage {
    #[serde(rename = "_id")]
    pub genre: String,
    pub average_price: f64,
}

/// Shelf count for one author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorCount {
    #[serde(rename = "_id")]
    pub author: String,
    pub book_count: i64,
}

/// Book count for one decade label such as `"1980s"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecadeCount {
    #[serde(rename = "_id")]
    pub decade: String,
    pub count: i64,
}

/// Books whose `genre` equals the given genre exactly.
pub fn find_by_genre<S: DocumentStore + ?Sized>(
    store: &S,
    genre: &str,
) -> Result<Cursor<Book>, StoreError> {
    require_non_empty("genre", genre)?;
    run_find(store, "find_by_genre", &Filter::eq("genre", genre), &FindOptions::default())
}

/// Books published strictly after `year`.
pub fn find_published_after<S: DocumentStore + ?Sized>(
    store: &S,
    year: i32,
) -> Result<Cursor<Book>, StoreError> {
    let filter = Filter::gt("published_year", year);
    run_find(store, "find_published_after", &filter, &FindOptions::default())
}

/// Books whose `author` equals the given author exactly.
pub fn find_by_author<S: DocumentStore + ?Sized>(
    store: &S,
    author: &str,
) -> Result<Cursor<Book>, StoreError> {
    require_non_empty("author", author)?;
    run_find(store, "find_by_author", &Filter::eq("author", author), &FindOptions::default())
}

/// Sets the price of the first book with the given title. Returns how many
/// documents changed (0 or 1).
pub fn update_book_price<S: DocumentStore + ?Sized>(
    store: &S,
    title: &str,
    price: f64,
) -> Result<u64, StoreError> {
    require_non_empty("title", title)?;
    if price < 0.0 || price.is_nan() {
        return Err(StoreError::InvalidArgument(format!(
            "price must be non-negative, got {price}"
        )));
    }
    let update = UpdateDoc { set: vec![("price".to_string(), Bson::Double(price))] };
    let report = store.update_one(&Filter::eq("title", title), &update)?;
    telemetry::log_write(store.name(), "update_book_price", report.modified);
    Ok(report.modified)
}

/// Removes the first book with the given title. Returns how many documents
/// were removed (0 or 1).
pub fn delete_book_by_title<S: DocumentStore + ?Sized>(
    store: &S,
    title: &str,
) -> Result<u64, StoreError> {
    require_non_empty("title", title)?;
    let report = store.delete_one(&Filter::eq("title", title))?;
    telemetry::log_write(store.name(), "delete_book_by_title", report.deleted);
    Ok(report.deleted)
}

/// Books both in stock and published strictly after `year`.
pub fn find_in_stock_after_year<S: DocumentStore + ?Sized>(
    store: &S,
    year: i32,
) -> Result<Cursor<Book>, StoreError> {
    let filter =
        Filter::And(vec![Filter::eq("in_stock", true), Filter::gt("published_year", year)]);
    run_find(store, "find_in_stock_after_year", &filter, &FindOptions::default())
}

/// Title, author and price of every book. No id field in the rows.
pub fn list_titles_authors_prices<S: DocumentStore + ?Sized>(
    store: &S,
) -> Result<Cursor<BookSummary>, StoreError> {
    let options = FindOptions {
        projection: Some(vec!["title".into(), "author".into(), "price".into()]),
        ..FindOptions::default()
    };
    run_find(store, "list_titles_authors_prices", &Filter::True, &options)
}

/// All books, cheapest first. Ties keep the store's default order.
pub fn sort_by_price_asc<S: DocumentStore + ?Sized>(
    store: &S,
) -> Result<Cursor<Book>, StoreError> {
    run_find(store, "sort_by_price_asc", &Filter::True, &price_sorted(Order::Asc))
}

/// All books, dearest first.
pub fn sort_by_price_desc<S: DocumentStore + ?Sized>(
    store: &S,
) -> Result<Cursor<Book>, StoreError> {
    run_find(store, "sort_by_price_desc", &Filter::True, &price_sorted(Order::Desc))
}

/// Page `page_index` (zero-based) of the collection in the store's default
/// order, `page_size` books per page.
pub fn paginate<S: DocumentStore + ?Sized>(
    store: &S,
    page_size: usize,
    page_index: usize,
) -> Result<Cursor<Book>, StoreError> {
    if page_size == 0 {
        return Err(StoreError::InvalidArgument("page_size must be positive".into()));
    }
    let options = FindOptions {
        limit: Some(page_size),
        skip: Some(page_index.saturating_mul(page_size)),
        ..FindOptions::default()
    };
    run_find(store, "paginate", &Filter::True, &options)
}

/// Mean price per genre, one row per distinct genre present.
pub fn average_price_by_genre<S: DocumentStore + ?Sized>(
    store: &S,
) -> Result<Vec<GenreAverage>, StoreError> {
    let stages = [Stage::group(
        Expr::field("genre"),
        vec![("average_price", Accumulator::avg(Expr::field("price")))],
    )];
    run_aggregate(store, "average_price_by_genre", &stages)
}

/// The single author with the most books, with the count; `None` on an
/// empty collection. Ties resolve to whichever author the store orders
/// first.
pub fn author_with_most_books<S: DocumentStore + ?Sized>(
    store: &S,
) -> Result<Option<AuthorCount>, StoreError> {
    let stages = [
        Stage::group(Expr::field("author"), vec![("book_count", Accumulator::count())]),
        Stage::sort_desc("book_count"),
        Stage::Limit(1),
    ];
    let mut rows: Vec<AuthorCount> = run_aggregate(store, "author_with_most_books", &stages)?;
    Ok(rows.pop())
}

/// Book counts per publication decade, ascending by label.
///
/// The label is the first three characters of the stringified year with
/// `"0s"` appended, exactly as the source catalog derived it. Years outside
/// four digits therefore get odd labels; that behavior is kept.
pub fn count_by_decade<S: DocumentStore + ?Sized>(
    store: &S,
) -> Result<Vec<DecadeCount>, StoreError> {
    let decade = Expr::Concat(vec![
        Expr::substr(Expr::field("published_year"), 0, 3),
        Expr::literal("0s"),
    ]);
    let stages = [
        Stage::project(vec![("decade", decade)]),
        Stage::group(Expr::field("decade"), vec![("count", Accumulator::count())]),
        Stage::sort_asc("_id"),
    ];
    run_aggregate(store, "count_by_decade", &stages)
}

/// Declares the ascending index on `title`.
pub fn create_title_index<S: DocumentStore + ?Sized>(store: &S) -> Result<(), StoreError> {
    store.create_index(&IndexSpec::ascending("title"))
}

/// Declares the compound ascending index on `(author, published_year)`.
pub fn create_author_year_index<S: DocumentStore + ?Sized>(store: &S) -> Result<(), StoreError> {
    store.create_index(&IndexSpec::compound(vec![
        ("author", Order::Asc),
        ("published_year", Order::Asc),
    ]))
}

/// Execution statistics for an exact title lookup.
pub fn explain_title_lookup<S: DocumentStore + ?Sized>(
    store: &S,
    title: &str,
) -> Result<ExplainReport, StoreError> {
    require_non_empty("title", title)?;
    let report = store.explain(&Filter::eq("title", title))?;
    log::debug!("collection {}: title lookup plan {}", store.name(), report.plan_summary());
    Ok(report)
}

fn require_non_empty(name: &str, value: &str) -> Result<(), StoreError> {
    if value.is_empty() {
        return Err(StoreError::InvalidArgument(format!("{name} must be a non-empty string")));
    }
    Ok(())
}

fn price_sorted(order: Order) -> FindOptions {
    FindOptions {
        sort: Some(vec![SortSpec { field: "price".to_string(), order }]),
        ..FindOptions::default()
    }
}

fn run_find<S, T>(
    store: &S,
    op: &str,
    filter: &Filter,
    options: &FindOptions,
) -> Result<Cursor<T>, StoreError>
where
    S: DocumentStore + ?Sized,
    T: DeserializeOwned + Clone,
{
    let start = Instant::now();
    let docs = store.find(filter, options)?;
    let rows: Vec<T> = decode_rows(docs)?;
    telemetry::log_query(store.name(), op, start.elapsed().as_millis(), rows.len());
    Ok(Cursor::new(rows))
}

fn run_aggregate<S, T>(store: &S, op: &str, stages: &[Stage]) -> Result<Vec<T>, StoreError>
where
    S: DocumentStore + ?Sized,
    T: DeserializeOwned,
{
    let start = Instant::now();
    let rows = store.aggregate(stages)?;
    let out: Vec<T> = decode_rows(rows)?;
    telemetry::log_query(store.name(), op, start.elapsed().as_millis(), out.len());
    Ok(out)
}

fn decode_rows<T: DeserializeOwned>(docs: Vec<BsonDocument>) -> Result<Vec<T>, StoreError> {
    docs.into_iter().map(|d| bson::from_document(d).map_err(StoreError::from)).collect()
}
