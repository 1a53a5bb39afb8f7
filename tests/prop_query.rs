use proptest::prelude::*;

use bookshelf::book::Book;
use bookshelf::memory::MemoryCollection;
use bookshelf::ops;

fn seeded_with_years(years: &[i32]) -> MemoryCollection {
    let col = MemoryCollection::new("prop");
    for (i, year) in years.iter().enumerate() {
        col.insert_book(&Book::new(format!("b{i}"), "a", "g", *year, 1.0, true)).unwrap();
    }
    col
}

proptest! {
    #[test]
    fn prop_pages_are_disjoint_and_bounded(
        n in 0usize..40,
        page_size in 1usize..10,
        page_index in 0usize..6,
    ) {
        let col = MemoryCollection::new("prop_pages");
        for i in 0..n {
            col.insert_book(&Book::new(format!("b{i}"), "a", "g", 2000, 1.0, true)).unwrap();
        }
        let page = ops::paginate(&col, page_size, page_index).unwrap().to_vec();
        let start = page_index * page_size;
        let expected_len = n.saturating_sub(start).min(page_size);
        prop_assert_eq!(page.len(), expected_len);

        let next = ops::paginate(&col, page_size, page_index + 1).unwrap().to_vec();
        for b in &page {
            prop_assert!(next.iter().all(|o| o.title != b.title));
        }
    }

    #[test]
    fn prop_price_sort_is_non_decreasing(
        prices in proptest::collection::vec(0.0f64..500.0, 0..30),
    ) {
        let col = MemoryCollection::new("prop_prices");
        for (i, price) in prices.iter().enumerate() {
            col.insert_book(&Book::new(format!("b{i}"), "a", "g", 2000, *price, true)).unwrap();
        }
        let asc = ops::sort_by_price_asc(&col).unwrap().to_vec();
        prop_assert_eq!(asc.len(), prices.len());
        for w in asc.windows(2) {
            prop_assert!(w[0].price <= w[1].price);
        }
        let desc = ops::sort_by_price_desc(&col).unwrap().to_vec();
        for w in desc.windows(2) {
            prop_assert!(w[0].price >= w[1].price);
        }
    }

    #[test]
    fn prop_published_after_is_a_strict_bound(
        years in proptest::collection::vec(1400i32..2100, 0..30),
        cutoff in 1400i32..2100,
    ) {
        let col = seeded_with_years(&years);
        let found = ops::find_published_after(&col, cutoff).unwrap().to_vec();
        let expected = years.iter().filter(|y| **y > cutoff).count();
        prop_assert_eq!(found.len(), expected);
        for b in &found {
            prop_assert!(b.published_year > cutoff);
        }
    }
}
