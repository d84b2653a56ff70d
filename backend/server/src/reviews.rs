//! # Redis
//!
//! Review store.
//!
//! ## Layout
//! - Hash `{key}`: review id to review JSON
//! - Sorted set `{key}:book:{book_id}`: review ids scored by insert sequence
//! - Counter `{key}:seq`: insert sequence, so two reviews in the same instant still have an order
//! - Set `{key}:books`: book ids that have ever had a review, used to clear everything
//! - Newest first is a `ZREVRANGE` on the book's set, then one `HMGET` for the bodies
//! - Insert and delete touch both keys in one atomic pipeline
//!
//! ## Memory
//! Same ordering rules, kept in process: the latest insert comes first. Used by tests and
//! `REVIEW_STORE=memory`.
use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use chrono::Utc;
use redis::{
    AsyncCommands, Client,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use shelf::{NewReview, Review};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;

#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn insert(&self, review: NewReview) -> Result<Review, AppError>;

    /// Newest first.
    async fn list_for_book(&self, book_id: i64) -> Result<Vec<Review>, AppError>;

    /// Number of reviews removed, 0 or 1.
    async fn delete(&self, id: Uuid) -> Result<u64, AppError>;

    /// Removes every review, returns how many there were.
    async fn clear(&self) -> Result<u64, AppError>;
}

fn build_review(review: NewReview) -> Review {
    Review {
        id: Uuid::new_v4().to_string(),
        book_id: review.book_id,
        reviewer: review.reviewer,
        rating: review.rating,
        text: review.text,
        created_at: Utc::now(),
    }
}

pub async fn init_redis(redis_url: &str) -> Result<ConnectionManager, AppError> {
    let config = ConnectionManagerConfig::new()
        .set_number_of_retries(1)
        .set_connection_timeout(Some(Duration::from_millis(100)));

    let client = Client::open(redis_url)?;
    let connection_manager = client.get_connection_manager_with_config(config).await?;

    info!("Connected to Redis");

    Ok(connection_manager)
}

#[derive(Clone)]
pub struct RedisReviewStore {
    connection: ConnectionManager,
    key: String,
}

impl RedisReviewStore {
    pub fn new(connection: ConnectionManager, key: &str) -> Self {
        Self {
            connection,
            key: key.to_string(),
        }
    }

    pub async fn connect(redis_url: &str, key: &str) -> Result<Self, AppError> {
        Ok(Self::new(init_redis(redis_url).await?, key))
    }

    fn book_key(&self, book_id: i64) -> String {
        format!("{}:book:{book_id}", self.key)
    }

    fn books_key(&self) -> String {
        format!("{}:books", self.key)
    }

    fn seq_key(&self) -> String {
        format!("{}:seq", self.key)
    }
}

#[async_trait]
impl ReviewStore for RedisReviewStore {
    async fn insert(&self, review: NewReview) -> Result<Review, AppError> {
        let review = build_review(review);
        let body = serde_json::to_string(&review)?;

        let mut conn = self.connection.clone();
        let score: u64 = conn.incr(self.seq_key(), 1).await?;

        redis::pipe()
            .atomic()
            .hset(&self.key, &review.id, body)
            .zadd(self.book_key(review.book_id), &review.id, score)
            .sadd(self.books_key(), review.book_id)
            .query_async::<()>(&mut conn)
            .await?;

        Ok(review)
    }

    async fn list_for_book(&self, book_id: i64) -> Result<Vec<Review>, AppError> {
        let mut conn = self.connection.clone();

        let ids: Vec<String> = conn.zrevrange(self.book_key(book_id), 0, -1).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let bodies: Vec<Option<String>> = redis::cmd("HMGET")
            .arg(&self.key)
            .arg(&ids)
            .query_async(&mut conn)
            .await?;

        bodies
            .into_iter()
            .flatten()
            .map(|body| serde_json::from_str(&body).map_err(AppError::from))
            .collect()
    }

    async fn delete(&self, id: Uuid) -> Result<u64, AppError> {
        let mut conn = self.connection.clone();
        let id = id.to_string();

        let body: Option<String> = conn.hget(&self.key, &id).await?;
        let Some(body) = body else {
            return Ok(0);
        };

        let review: Review = serde_json::from_str(&body)?;
        redis::pipe()
            .atomic()
            .hdel(&self.key, &id)
            .zrem(self.book_key(review.book_id), &id)
            .query_async::<()>(&mut conn)
            .await?;

        Ok(1)
    }

    async fn clear(&self) -> Result<u64, AppError> {
        let mut conn = self.connection.clone();

        let count: u64 = conn.hlen(&self.key).await?;
        let book_ids: Vec<i64> = conn.smembers(self.books_key()).await?;

        let mut keys: Vec<String> = book_ids
            .into_iter()
            .map(|book_id| self.book_key(book_id))
            .collect();
        keys.push(self.books_key());
        keys.push(self.seq_key());
        keys.push(self.key.clone());

        conn.del::<_, ()>(keys).await?;

        Ok(count)
    }
}

#[derive(Default)]
pub struct MemoryReviewStore {
    reviews: RwLock<HashMap<i64, Vec<Review>>>,
}

impl MemoryReviewStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReviewStore for MemoryReviewStore {
    async fn insert(&self, review: NewReview) -> Result<Review, AppError> {
        let review = build_review(review);

        let mut reviews = self.reviews.write().await;
        let book = reviews.entry(review.book_id).or_default();

        book.insert(0, review.clone());

        Ok(review)
    }

    async fn list_for_book(&self, book_id: i64) -> Result<Vec<Review>, AppError> {
        Ok(self
            .reviews
            .read()
            .await
            .get(&book_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn delete(&self, id: Uuid) -> Result<u64, AppError> {
        let id = id.to_string();
        let mut reviews = self.reviews.write().await;

        for book in reviews.values_mut() {
            if let Some(at) = book.iter().position(|review| review.id == id) {
                book.remove(at);
                return Ok(1);
            }
        }

        Ok(0)
    }

    async fn clear(&self) -> Result<u64, AppError> {
        let mut reviews = self.reviews.write().await;
        let count = reviews.values().map(Vec::len).sum::<usize>();
        reviews.clear();

        Ok(count as u64)
    }
}
