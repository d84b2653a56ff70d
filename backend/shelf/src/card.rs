use crate::{
    cover::{Gradient, derive_background},
    models::Book,
};

const UNKNOWN_AUTHOR: &str = "Unknown author";

#[derive(Debug, Clone, PartialEq)]
pub enum Cover {
    Image(String),
    Gradient(Gradient),
}

/// One book on the shelf, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct BookCard {
    pub book_id: i64,
    pub title: String,
    pub authors: String,
    pub year: Option<i64>,
    pub cover: Cover,
}

impl BookCard {
    pub fn from_book(book: &Book) -> Self {
        let cover = match book.image_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Cover::Image(url.to_string()),
            _ => Cover::Gradient(derive_background(&book.title)),
        };

        let authors = book
            .authors
            .as_deref()
            .map(str::trim)
            .filter(|authors| !authors.is_empty())
            .unwrap_or(UNKNOWN_AUTHOR)
            .to_string();

        Self {
            book_id: book.book_id,
            title: book.title.clone(),
            authors,
            year: book.publication_year,
            cover,
        }
    }

    /// Image failed to load, fall back to the title gradient.
    pub fn cover_failed(&mut self) {
        self.cover = Cover::Gradient(derive_background(&self.title));
    }

    pub fn background(&self) -> String {
        match &self.cover {
            Cover::Image(url) => format!("url(\"{url}\")"),
            Cover::Gradient(gradient) => gradient.css(),
        }
    }
}

pub fn shelf_cards(books: &[Book]) -> Vec<BookCard> {
    books.iter().map(BookCard::from_book).collect()
}
