//! # Store Management
//!
//! One-off maintenance for the shelf stores. Everything here runs against the same SQLite file and
//! Redis keys the server uses.
//!
//! ## Reset
//! - Deletes the SQLite file and recreates the schema, books and call log are both gone
//!
//! ## Seed
//! - Reads `data/books.json`: an array of `{title, author, year, image_url}`
//! - Missing file falls back to ten programming classics with Open Library covers
//! - Each row goes through the same upsert as `POST /api/books`, so seeding twice is harmless
//! - Rows with a blank title or author are skipped
//!
//! ## Wipe Reviews
//! - Clears every review under the configured key, the catalog is untouched
use std::{fs, io::ErrorKind, path::Path};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use server::{database::Catalog, reviews::ReviewStore};
use tracing::{info, warn};

pub mod models;

use models::{SeedBook, fallback_books};

/// `None` when the file does not exist.
pub fn read_seed_file(path: &Path) -> Result<Option<Vec<SeedBook>>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
    };

    let books = serde_json::from_str(&raw)
        .with_context(|| format!("parsing seed file {}", path.display()))?;

    Ok(Some(books))
}

pub fn load_seed_books(path: &Path) -> Result<Vec<SeedBook>> {
    match read_seed_file(path)? {
        Some(books) => {
            info!("Loaded {} books from {}", books.len(), path.display());
            Ok(books)
        }
        None => {
            warn!("{} not found, using the built-in list", path.display());
            Ok(fallback_books())
        }
    }
}

/// Upserts every valid row and returns how many were written.
pub fn seed(catalog: &Catalog, books: &[SeedBook]) -> Result<usize> {
    let pb = ProgressBar::new(books.len() as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )?
        .progress_chars("=> "),
    );

    let mut written = 0;

    for book in books {
        pb.inc(1);

        let Some(new_book) = book.to_new_book() else {
            warn!("Skipping seed row without title or author");
            continue;
        };

        pb.set_message(new_book.title.clone());
        catalog.upsert_book(&new_book)?;
        written += 1;
    }

    pb.finish_with_message("Done");

    Ok(written)
}

pub fn seed_from_file(catalog: &Catalog, path: &Path) -> Result<usize> {
    let books = load_seed_books(path)?;
    let written = seed(catalog, &books)?;

    println!(
        "Seeded/updated {written} titles. Total in DB: {}.",
        catalog.count_books()?
    );

    Ok(written)
}

pub async fn wipe_reviews(store: &dyn ReviewStore) -> Result<u64> {
    let deleted = store.clear().await?;
    println!("Deleted {deleted} reviews.");

    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use server::{
        database::Catalog,
        reviews::{MemoryReviewStore, ReviewStore},
    };
    use shelf::NewReview;

    use super::{load_seed_books, read_seed_file, seed, wipe_reviews};

    #[test]
    fn test_missing_seed_file_uses_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.json");

        assert!(read_seed_file(&path).unwrap().is_none());
        assert_eq!(load_seed_books(&path).unwrap().len(), 10);
    }

    #[test]
    fn test_seed_from_file_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.json");
        fs::write(
            &path,
            r#"[
                {"title": "Dune", "author": "Frank Herbert", "year": 1965},
                {"title": "dune", "author": "Brian Herbert", "year": 1965, "image_url": "https://x/dune.jpg"},
                {"title": "", "author": "Nobody", "year": 2000}
            ]"#,
        )
        .unwrap();

        let catalog = Catalog::open_in_memory().unwrap();
        let books = load_seed_books(&path).unwrap();

        assert_eq!(seed(&catalog, &books).unwrap(), 2);
        assert_eq!(seed(&catalog, &books).unwrap(), 2);
        assert_eq!(catalog.count_books().unwrap(), 1);

        let dune = &catalog.list_books("dune", None).unwrap()[0];
        assert_eq!(dune.image_url.as_deref(), Some("https://x/dune.jpg"));
    }

    #[test]
    fn test_bad_seed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.json");
        fs::write(&path, "title,author,year").unwrap();

        assert!(read_seed_file(&path).is_err());
    }

    #[tokio::test]
    async fn test_wipe_reviews() {
        let store = MemoryReviewStore::new();

        for book_id in [1, 1, 2] {
            store
                .insert(NewReview {
                    book_id,
                    reviewer: "Ann".to_string(),
                    rating: 4,
                    text: "nice".to_string(),
                })
                .await
                .unwrap();
        }

        assert_eq!(wipe_reviews(&store).await.unwrap(), 3);
        assert!(store.list_for_book(1).await.unwrap().is_empty());
    }
}
