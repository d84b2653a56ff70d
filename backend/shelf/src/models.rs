use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Book {
    pub book_id: i64,
    pub title: String,
    #[serde(default)]
    pub authors: Option<String>,
    #[serde(default)]
    pub publication_year: Option<i64>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Review {
    #[serde(rename = "_id")]
    pub id: String,
    pub book_id: i64,
    pub reviewer: String,
    pub rating: u8,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/reviews`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NewReview {
    pub book_id: i64,
    pub reviewer: String,
    pub rating: u8,
    pub text: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ReviewList {
    pub items: Vec<Review>,
    pub count: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BookList {
    pub items: Vec<Book>,
    pub count: usize,
}

impl From<Vec<Review>> for ReviewList {
    fn from(items: Vec<Review>) -> Self {
        Self {
            count: items.len(),
            items,
        }
    }
}

impl From<Vec<Book>> for BookList {
    fn from(items: Vec<Book>) -> Self {
        Self {
            count: items.len(),
            items,
        }
    }
}
