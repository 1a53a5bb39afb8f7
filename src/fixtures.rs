use crate::book::Book;
use crate::errors::StoreError;
use crate::memory::MemoryCollection;
use crate::types::DocumentId;

/// The canonical twelve-book catalog the operations were written against.
/// Page counts and publisher imprints ride in the extra-fields bag.
#[must_use]
pub fn sample_books() -> Vec<Book> {
    vec![
        catalog_book(
            "To Kill a Mockingbird",
            "Harper Lee",
            "Fiction",
            1960,
            12.99,
            true,
            336,
            "J.B. Lippincott & Co.",
        ),
        catalog_book(
            "1984",
            "George Orwell",
            "Dystopian",
            1949,
            10.99,
            true,
            328,
            "Secker & Warburg",
        ),
        catalog_book(
            "The Great Gatsby",
            "F. Scott Fitzgerald",
            "Fiction",
            1925,
            9.99,
            true,
            180,
            "Charles Scribner's Sons",
        ),
        catalog_book(
            "Brave New World",
            "Aldous Huxley",
            "Dystopian",
            1932,
            11.50,
            false,
            311,
            "Chatto & Windus",
        ),
        catalog_book(
            "The Hobbit",
            "J.R.R. Tolkien",
            "Fantasy",
            1937,
            14.99,
            true,
            310,
            "George Allen & Unwin",
        ),
        catalog_book(
            "The Catcher in the Rye",
            "J.D. Salinger",
            "Fiction",
            1951,
            8.99,
            true,
            224,
            "Little, Brown and Company",
        ),
        catalog_book(
            "Pride and Prejudice",
            "Jane Austen",
            "Romance",
            1813,
            7.99,
            true,
            432,
            "T. Egerton, Whitehall",
        ),
        catalog_book(
            "The Lord of the Rings",
            "J.R.R. Tolkien",
            "Fantasy",
            1954,
            19.99,
            false,
            1178,
            "George Allen & Unwin",
        ),
        catalog_book(
            "Animal Farm",
            "George Orwell",
            "Political Satire",
            1945,
            8.50,
            false,
            112,
            "Secker & Warburg",
        ),
        catalog_book(
            "The Alchemist",
            "Paulo Coelho",
            "Fiction",
            1988,
            10.99,
            true,
            197,
            "HarperOne",
        ),
        catalog_book(
            "Moby Dick",
            "Herman Melville",
            "Adventure",
            1851,
            12.50,
            false,
            635,
            "Harper & Brothers",
        ),
        catalog_book(
            "Wuthering Heights",
            "Emily Brontë",
            "Gothic Fiction",
            1847,
            9.99,
            true,
            342,
            "Thomas Cautley Newby",
        ),
    ]
}

/// Seeds `collection` with the sample catalog, in catalog order. Returns
/// the assigned ids.
pub fn seed(collection: &MemoryCollection) -> Result<Vec<DocumentId>, StoreError> {
    sample_books().iter().map(|b| collection.insert_book(b)).collect()
}

#[allow(clippy::too_many_arguments)]
fn catalog_book(
    title: &str,
    author: &str,
    genre: &str,
    year: i32,
    price: f64,
    in_stock: bool,
    pages: i32,
    publisher: &str,
) -> Book {
    let mut book = Book::new(title, author, genre, year, price, in_stock);
    book.extra.insert("pages", pages);
    book.extra.insert("publisher", publisher);
    book
}
