use serde::Deserialize;
use server::database::NewBook;

pub const SEED_FILE: &str = "data/books.json";

const COVER_ENDPOINT: &str = "https://covers.openlibrary.org/b/isbn";

/// (title, year, author, isbn)
const FALLBACK_BOOKS: [(&str, i64, &str, &str); 10] = [
    ("Clean Code", 2008, "Robert C. Martin", "9780132350884"),
    ("The Pragmatic Programmer", 1999, "Andrew Hunt", "9780201616224"),
    (
        "Design Patterns: Elements of Reusable Object-Oriented Software",
        1994,
        "Erich Gamma",
        "9780201633610",
    ),
    (
        "Refactoring: Improving the Design of Existing Code (2nd Edition)",
        2018,
        "Martin Fowler",
        "9780134757599",
    ),
    (
        "Introduction to Algorithms (3rd Edition)",
        2009,
        "Thomas H. Cormen",
        "9780262033848",
    ),
    (
        "Structure and Interpretation of Computer Programs",
        1996,
        "Harold Abelson",
        "9780262510875",
    ),
    (
        "Code Complete (2nd Edition)",
        2004,
        "Steve McConnell",
        "9780735619678",
    ),
    (
        "Patterns of Enterprise Application Architecture",
        2002,
        "Martin Fowler",
        "9780321127426",
    ),
    (
        "Working Effectively with Legacy Code",
        2004,
        "Michael Feathers",
        "9780131177055",
    ),
    ("Clean Architecture", 2017, "Robert C. Martin", "9780134494166"),
];

/// One entry of the seed file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SeedBook {
    pub title: String,
    pub author: String,
    pub year: i64,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl SeedBook {
    /// Blank title or author means the row is skipped.
    pub fn to_new_book(&self) -> Option<NewBook> {
        let title = self.title.trim();
        let author = self.author.trim();

        if title.is_empty() || author.is_empty() {
            return None;
        }

        Some(NewBook {
            title: title.to_string(),
            author: author.to_string(),
            publication_year: self.year,
            image_url: self
                .image_url
                .as_deref()
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(str::to_string),
        })
    }
}

pub fn cover_url(isbn: &str) -> String {
    format!("{COVER_ENDPOINT}/{isbn}-L.jpg")
}

pub fn fallback_books() -> Vec<SeedBook> {
    FALLBACK_BOOKS
        .iter()
        .map(|(title, year, author, isbn)| SeedBook {
            title: title.to_string(),
            author: author.to_string(),
            year: *year,
            image_url: Some(cover_url(isbn)),
        })
        .collect()
}
