use bson::Bson;

use bookshelf::book::Book;
use bookshelf::errors::StoreError;
use bookshelf::explain::QueryPlan;
use bookshelf::index::IndexSpec;
use bookshelf::memory::MemoryCollection;
use bookshelf::query::{CmpOp, Filter, FindOptions, Order, SortSpec, UpdateDoc};
use bookshelf::store::DocumentStore;

fn book(title: &str, author: &str, year: i32, price: f64) -> Book {
    Book::new(title, author, "g", year, price, true)
}

#[test]
fn find_returns_documents_in_insertion_order() {
    let col = MemoryCollection::new("order");
    for title in ["one", "two", "three"] {
        col.insert_book(&book(title, "a", 2000, 1.0)).unwrap();
    }
    let docs = col.find(&Filter::True, &FindOptions::default()).unwrap();
    let titles: Vec<&str> = docs.iter().map(|d| d.get_str("title").unwrap()).collect();
    assert_eq!(titles, ["one", "two", "three"]);
}

#[test]
fn update_one_touches_only_the_earliest_match() {
    let col = MemoryCollection::new("first_match");
    col.insert_book(&book("Twin", "a", 2000, 2.0)).unwrap();
    col.insert_book(&book("Twin", "b", 2001, 2.0)).unwrap();

    let update = UpdateDoc { set: vec![("price".into(), Bson::from(9.0))] };
    let report = col.update_one(&Filter::eq("title", "Twin"), &update).unwrap();
    assert_eq!(report.matched, 1);
    assert_eq!(report.modified, 1);

    let docs = col.find(&Filter::eq("title", "Twin"), &FindOptions::default()).unwrap();
    assert!((docs[0].get_f64("price").unwrap() - 9.0).abs() < 1e-9);
    assert!((docs[1].get_f64("price").unwrap() - 2.0).abs() < 1e-9);
}

#[test]
fn update_one_with_equal_value_reports_no_modification() {
    let col = MemoryCollection::new("no_change");
    col.insert_book(&book("same", "a", 2000, 2.0)).unwrap();

    let unchanged = UpdateDoc { set: vec![("price".into(), Bson::from(2.0))] };
    let report = col.update_one(&Filter::eq("title", "same"), &unchanged).unwrap();
    assert_eq!(report.matched, 1);
    assert_eq!(report.modified, 0);

    let changed = UpdateDoc { set: vec![("price".into(), Bson::from(3.0))] };
    let report = col.update_one(&Filter::eq("title", "same"), &changed).unwrap();
    assert_eq!(report.matched, 1);
    assert_eq!(report.modified, 1);
}

#[test]
fn delete_one_removes_only_the_earliest_match() {
    let col = MemoryCollection::new("delete_first");
    col.insert_book(&book("Twin", "a", 2000, 1.0)).unwrap();
    col.insert_book(&book("Twin", "b", 2001, 1.0)).unwrap();

    let report = col.delete_one(&Filter::eq("title", "Twin")).unwrap();
    assert_eq!(report.deleted, 1);

    let docs = col.find(&Filter::eq("title", "Twin"), &FindOptions::default()).unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].get_str("author").unwrap(), "b");
}

#[test]
fn skip_beyond_the_end_yields_empty() {
    let col = MemoryCollection::new("skip_past");
    col.insert_book(&book("only", "a", 2000, 1.0)).unwrap();
    let options = FindOptions { skip: Some(usize::MAX), ..FindOptions::default() };
    assert!(col.find(&Filter::True, &options).unwrap().is_empty());
}

#[test]
fn comparison_operators_cover_both_bounds() {
    let col = MemoryCollection::new("bounds");
    for year in [1990, 2000, 2010] {
        col.insert_book(&book(&format!("t{year}"), "a", year, 1.0)).unwrap();
    }
    let count = |op: CmpOp, value: Bson| {
        let filter = Filter::Cmp { path: "published_year".into(), op, value };
        col.find(&filter, &FindOptions::default()).unwrap().len()
    };
    assert_eq!(count(CmpOp::Gt, Bson::Int32(2000)), 1);
    assert_eq!(count(CmpOp::Gte, Bson::Int32(2000)), 2);
    assert_eq!(count(CmpOp::Lt, Bson::Int32(2000)), 1);
    assert_eq!(count(CmpOp::Lte, Bson::Int32(2000)), 2);
    // range comparisons coerce across numeric types
    assert_eq!(count(CmpOp::Gte, Bson::Double(2000.0)), 2);
}

#[test]
fn equality_is_type_strict_while_ranges_coerce() {
    let col = MemoryCollection::new("strict_eq");
    col.insert_book(&book("t", "a", 2000, 1.0)).unwrap();
    let eq_double = Filter::eq("published_year", Bson::Double(2000.0));
    assert!(col.find(&eq_double, &FindOptions::default()).unwrap().is_empty());
    let gte_double = Filter::Cmp {
        path: "published_year".into(),
        op: CmpOp::Gte,
        value: Bson::Double(2000.0),
    };
    assert_eq!(col.find(&gte_double, &FindOptions::default()).unwrap().len(), 1);
}

#[test]
fn sort_with_equal_keys_keeps_insertion_order() {
    let col = MemoryCollection::new("stable_sort");
    col.insert_book(&book("first", "a", 2000, 5.0)).unwrap();
    col.insert_book(&book("second", "a", 2001, 5.0)).unwrap();
    col.insert_book(&book("cheap", "a", 2002, 1.0)).unwrap();

    let options = FindOptions {
        sort: Some(vec![SortSpec { field: "price".into(), order: Order::Asc }]),
        ..FindOptions::default()
    };
    let docs = col.find(&Filter::True, &options).unwrap();
    let titles: Vec<&str> = docs.iter().map(|d| d.get_str("title").unwrap()).collect();
    assert_eq!(titles, ["cheap", "first", "second"]);
}

#[test]
fn create_index_is_idempotent_and_validated() {
    let col = MemoryCollection::new("indexes");
    let title = IndexSpec::ascending("title");
    col.create_index(&title).unwrap();
    col.create_index(&title).unwrap();
    assert_eq!(col.index_names(), vec!["title_1"]);

    let bad = IndexSpec { fields: vec![] };
    assert!(matches!(col.create_index(&bad), Err(StoreError::StoreOperationFailed(_))));

    let compound =
        IndexSpec::compound(vec![("author", Order::Asc), ("published_year", Order::Asc)]);
    col.create_index(&compound).unwrap();
    assert_eq!(col.index_names(), vec!["title_1", "author_1_published_year_1"]);
}

#[test]
fn explain_uses_the_first_index_whose_lead_matches() {
    let col = MemoryCollection::new("plans");
    col.insert_book(&book("t1", "x", 1980, 1.0)).unwrap();
    col.insert_book(&book("t2", "x", 1995, 1.0)).unwrap();
    col.insert_book(&book("t3", "y", 2005, 1.0)).unwrap();

    let by_author = Filter::eq("author", "x");
    let report = col.explain(&by_author).unwrap();
    assert_eq!(report.plan, QueryPlan::CollectionScan);
    assert_eq!(report.docs_examined, 3);
    assert_eq!(report.keys_examined, 0);
    assert_eq!(report.n_returned, 2);

    let compound =
        IndexSpec::compound(vec![("author", Order::Asc), ("published_year", Order::Asc)]);
    col.create_index(&compound).unwrap();

    let report = col.explain(&by_author).unwrap();
    assert_eq!(report.plan, QueryPlan::IndexScan { index: "author_1_published_year_1".into() });
    assert_eq!(report.keys_examined, 2);
    assert_eq!(report.docs_examined, 2);
    assert_eq!(report.n_returned, 2);

    // a conjunction can still ride the index through its author leg
    let narrowed =
        Filter::And(vec![Filter::gt("published_year", 1990), Filter::eq("author", "x")]);
    let report = col.explain(&narrowed).unwrap();
    assert_eq!(report.plan, QueryPlan::IndexScan { index: "author_1_published_year_1".into() });
    assert_eq!(report.n_returned, 1);

    // no index leads on title, so that lookup stays a scan
    let report = col.explain(&Filter::eq("title", "t1")).unwrap();
    assert_eq!(report.plan, QueryPlan::CollectionScan);

    // declaration order breaks ties between usable indexes
    col.create_index(&IndexSpec::ascending("title")).unwrap();
    let both = Filter::And(vec![Filter::eq("author", "x"), Filter::eq("title", "t1")]);
    let report = col.explain(&both).unwrap();
    assert_eq!(report.plan, QueryPlan::IndexScan { index: "author_1_published_year_1".into() });
}

#[test]
fn closed_handle_reports_not_connected() {
    let col = MemoryCollection::new("closed");
    let id = col.insert_book(&book("kept", "a", 2000, 1.0)).unwrap();
    assert!(col.document(&id).is_some());

    col.close();
    assert!(matches!(
        col.find(&Filter::True, &FindOptions::default()),
        Err(StoreError::NotConnected)
    ));
    assert!(matches!(
        col.insert_book(&book("late", "a", 2000, 1.0)),
        Err(StoreError::NotConnected)
    ));
    assert!(matches!(col.aggregate(&[]), Err(StoreError::NotConnected)));
    assert!(matches!(col.delete_one(&Filter::True), Err(StoreError::NotConnected)));
    assert!(matches!(
        col.create_index(&IndexSpec::ascending("title")),
        Err(StoreError::NotConnected)
    ));
    assert!(matches!(col.explain(&Filter::True), Err(StoreError::NotConnected)));
    // introspection survives the close
    assert_eq!(col.len(), 1);
}

#[test]
fn clones_share_state() {
    let col = MemoryCollection::new("shared");
    let clone = col.clone();
    clone.insert_book(&book("via clone", "a", 2000, 1.0)).unwrap();
    assert_eq!(col.len(), 1);

    clone.close();
    assert!(matches!(
        col.find(&Filter::True, &FindOptions::default()),
        Err(StoreError::NotConnected)
    ));
}
