//! # SQLite
//!
//! Book catalog and call log.
//!
//! ## Schema
//! - `books`: id, title, optional year, optional image url
//! - `authors`: unique names
//! - `book_author`: many-to-many link, cascades on delete
//! - Unique index on `title COLLATE NOCASE`, so "dune" and "Dune" are the same book
//! - `logs`: one row per API call, see [`crate::logs`]
//!
//! ## Reads
//! - Authors are folded into one display string with `GROUP_CONCAT`
//! - Books without an image get [`DEFAULT_COVER`]
//! - Ordered by title, case-insensitive
//!
//! ## Writes
//! - Adding a book whose title already exists updates year/image and links the author
//! - Everything for one add happens in a single transaction
use std::{
    fs,
    path::Path,
    sync::{Mutex, MutexGuard},
};

use rusqlite::{Connection, OptionalExtension, Row, params};
use shelf::Book;
use tracing::info;

use crate::error::AppError;

pub const DEFAULT_COVER: &str = "https://images.rawpixel.com/image_png_social_landscape/\
czNmcy1wcml2YXRlL3Jhd3BpeGVsX2ltYWdlcy93ZWJzaXRlX2NvbnRlbnQv\
bHIvam9iNjgzLTAwMzEucG5n.png";

pub const DEFAULT_LIMIT: u32 = 100;

const SCHEMA: &str = "
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS books (
    book_id          INTEGER PRIMARY KEY,
    title            TEXT NOT NULL,
    publication_year INTEGER,
    image_url        TEXT
);

CREATE TABLE IF NOT EXISTS authors (
    author_id INTEGER PRIMARY KEY,
    name      TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS book_author (
    book_id   INTEGER NOT NULL,
    author_id INTEGER NOT NULL,
    PRIMARY KEY (book_id, author_id),
    FOREIGN KEY (book_id) REFERENCES books (book_id) ON DELETE CASCADE,
    FOREIGN KEY (author_id) REFERENCES authors (author_id) ON DELETE CASCADE
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_books_unique_title_nocase
    ON books (title COLLATE NOCASE);

CREATE TABLE IF NOT EXISTS logs (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    function_name  TEXT NOT NULL,
    status         TEXT NOT NULL,
    message        TEXT,
    execution_time REAL,
    http_method    TEXT,
    path           TEXT,
    user_agent     TEXT,
    extra_json     TEXT,
    created_at     TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);
";

const SELECT_BOOKS: &str = "
SELECT b.book_id, b.title, b.publication_year,
       COALESCE(b.image_url, ?1) AS image_url,
       GROUP_CONCAT(a.name, ', ') AS authors
FROM books b
LEFT JOIN book_author ba ON ba.book_id = b.book_id
LEFT JOIN authors a ON a.author_id = ba.author_id
";

const GROUP_BOOKS: &str = "
GROUP BY b.book_id, b.title, b.publication_year, b.image_url
";

#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub publication_year: i64,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Upserted {
    Created(Book),
    Existing(Book),
}

pub struct Catalog {
    conn: Mutex<Connection>,
}

impl Catalog {
    pub fn open(path: &Path) -> Result<Self, AppError> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| AppError::InternalError(Box::new(e)))?;
        }

        let conn = Connection::open(path)?;
        info!("Catalog opened at {}", path.display());

        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, AppError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    /// Deletes the database file and starts over with an empty schema.
    pub fn reset(path: &Path) -> Result<Self, AppError> {
        if path.exists() {
            fs::remove_file(path).map_err(|e| AppError::InternalError(Box::new(e)))?;
        }

        Self::open(path)
    }

    fn with_connection(conn: Connection) -> Result<Self, AppError> {
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, Connection>, AppError> {
        self.conn
            .lock()
            .map_err(|_| AppError::InternalError("catalog lock poisoned".into()))
    }

    /// Case-insensitive substring match on title or author. `None` limit returns everything.
    pub fn list_books(&self, query: &str, limit: Option<u32>) -> Result<Vec<Book>, AppError> {
        let conn = self.lock()?;

        let sql = format!(
            "{SELECT_BOOKS}
            WHERE (?2 = '' OR b.title LIKE ?3 OR a.name LIKE ?3)
            {GROUP_BOOKS}
            ORDER BY b.title COLLATE NOCASE ASC
            LIMIT ?4"
        );

        let pattern = format!("%{query}%");
        let limit = limit.map_or(-1, i64::from);

        let mut statement = conn.prepare(&sql)?;
        let books = statement
            .query_map(params![DEFAULT_COVER, query, pattern, limit], book_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(books)
    }

    pub fn get_book(&self, book_id: i64) -> Result<Option<Book>, AppError> {
        let conn = self.lock()?;

        Ok(select_book(&conn, book_id)?)
    }

    pub fn book_exists(&self, book_id: i64) -> Result<bool, AppError> {
        let conn = self.lock()?;

        let found = conn
            .query_row(
                "SELECT 1 FROM books WHERE book_id = ?1",
                [book_id],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;

        Ok(found.is_some())
    }

    pub fn count_books(&self) -> Result<i64, AppError> {
        let conn = self.lock()?;

        Ok(conn.query_row("SELECT COUNT(*) FROM books", [], |row| row.get(0))?)
    }

    pub fn upsert_book(&self, book: &NewBook) -> Result<Upserted, AppError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT OR IGNORE INTO authors (name) VALUES (?1)",
            [&book.author],
        )?;
        let author_id: i64 = tx.query_row(
            "SELECT author_id FROM authors WHERE name = ?1",
            [&book.author],
            |row| row.get(0),
        )?;

        let existing: Option<i64> = tx
            .query_row(
                "SELECT book_id FROM books WHERE title = ?1 COLLATE NOCASE",
                [&book.title],
                |row| row.get(0),
            )
            .optional()?;

        let (book_id, created) = match existing {
            Some(book_id) => {
                tx.execute(
                    "UPDATE books
                     SET publication_year = COALESCE(?1, publication_year),
                         image_url = COALESCE(?2, image_url)
                     WHERE book_id = ?3",
                    params![book.publication_year, book.image_url, book_id],
                )?;
                (book_id, false)
            }
            None => {
                tx.execute(
                    "INSERT INTO books (title, publication_year, image_url) VALUES (?1, ?2, ?3)",
                    params![book.title, book.publication_year, book.image_url],
                )?;
                (tx.last_insert_rowid(), true)
            }
        };

        tx.execute(
            "INSERT OR IGNORE INTO book_author (book_id, author_id) VALUES (?1, ?2)",
            params![book_id, author_id],
        )?;
        tx.commit()?;

        let stored = select_book(&conn, book_id)?
            .ok_or_else(|| AppError::NotFound(format!("book {book_id} vanished after write")))?;

        Ok(if created {
            Upserted::Created(stored)
        } else {
            Upserted::Existing(stored)
        })
    }
}

fn select_book(conn: &Connection, book_id: i64) -> rusqlite::Result<Option<Book>> {
    let sql = format!("{SELECT_BOOKS} WHERE b.book_id = ?2 {GROUP_BOOKS}");

    conn.query_row(&sql, params![DEFAULT_COVER, book_id], book_from_row)
        .optional()
}

fn book_from_row(row: &Row<'_>) -> rusqlite::Result<Book> {
    Ok(Book {
        book_id: row.get("book_id")?,
        title: row.get("title")?,
        authors: row.get("authors")?,
        publication_year: row.get("publication_year")?,
        image_url: row.get("image_url")?,
    })
}
