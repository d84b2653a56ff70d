use async_trait::async_trait;
use reqwest::{Client, Response};
use tracing::debug;

use crate::{
    error::ShelfError,
    models::{Book, BookList, NewReview, Review, ReviewList},
};

pub const BOOKS_PATH: &str = "/api/books";
pub const REVIEWS_PATH: &str = "/api/reviews";

#[async_trait]
pub trait ReviewsApi {
    /// Newest first, exactly as the server returned them.
    async fn fetch_reviews(&self, book_id: i64) -> Result<Vec<Review>, ShelfError>;

    async fn submit_review(&self, review: &NewReview) -> Result<(), ShelfError>;
}

/// JSON client for the shelf endpoints.
#[derive(Clone)]
pub struct ShelfClient {
    client: Client,
    base_url: String,
}

impl ShelfClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn list_books(
        &self,
        query: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<Book>, ShelfError> {
        let limit = limit.map_or_else(|| "all".to_string(), |limit| limit.to_string());

        let mut params = vec![("limit", limit)];
        if let Some(query) = query {
            params.push(("q", query.to_string()));
        }

        let response = self
            .client
            .get(self.url(BOOKS_PATH))
            .query(&params)
            .send()
            .await?;

        let list: BookList = success(response)?.json().await?;
        Ok(list.items)
    }
}

#[async_trait]
impl ReviewsApi for ShelfClient {
    async fn fetch_reviews(&self, book_id: i64) -> Result<Vec<Review>, ShelfError> {
        let response = self
            .client
            .get(self.url(REVIEWS_PATH))
            .query(&[("book_id", book_id)])
            .send()
            .await?;

        let list: ReviewList = success(response)?.json().await?;
        debug!("Fetched {} reviews for book {book_id}", list.count);

        Ok(list.items)
    }

    async fn submit_review(&self, review: &NewReview) -> Result<(), ShelfError> {
        let response = self
            .client
            .post(self.url(REVIEWS_PATH))
            .json(review)
            .send()
            .await?;

        success(response).map(|_| ())
    }
}

fn success(response: Response) -> Result<Response, ShelfError> {
    let status = response.status();

    if !status.is_success() {
        return Err(ShelfError::NetworkFailure(format!(
            "{} returned {status}",
            response.url().path()
        )));
    }

    Ok(response)
}
