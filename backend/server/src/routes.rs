use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};
use shelf::{BookList, NewReview, ReviewList};
use tracing::info;
use uuid::Uuid;

use crate::{
    database::{NewBook, Upserted},
    error::AppError,
    state::AppState,
    utils::{as_int, as_text, is_missing, optional_text, parse_body, parse_book_id, parse_limit},
};

const REVIEW_FIELDS: [&str; 4] = ["book_id", "reviewer", "rating", "text"];

#[derive(Deserialize)]
pub struct BooksQuery {
    q: Option<String>,
    limit: Option<String>,
}

#[derive(Deserialize)]
pub struct ReviewsQuery {
    book_id: Option<String>,
}

pub async fn list_books(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BooksQuery>,
) -> Result<Json<BookList>, AppError> {
    let q = query.q.as_deref().map(str::trim).unwrap_or_default();
    let limit = parse_limit(query.limit.as_deref());

    let books = state.catalog.list_books(q, limit)?;

    Ok(Json(books.into()))
}

pub async fn add_book(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let body = parse_body(&body);

    let (Some(title), Some(author)) = (
        optional_text(&body, "title"),
        optional_text(&body, "author"),
    ) else {
        return Err(AppError::BadRequest("title and author required".into()));
    };

    let publication_year = body
        .get("publication_year")
        .and_then(as_int)
        .ok_or_else(|| AppError::BadRequest("publication_year must be an integer".into()))?;

    let book = NewBook {
        title,
        author,
        publication_year,
        image_url: optional_text(&body, "image_url"),
    };

    match state.catalog.upsert_book(&book)? {
        Upserted::Created(book) => {
            info!("Added book {} ({})", book.book_id, book.title);

            Ok((
                StatusCode::CREATED,
                Json(json!({ "message": "Book added successfully", "book": book })),
            ))
        }
        Upserted::Existing(book) => Ok((
            StatusCode::OK,
            Json(json!({
                "message": "Book already existed; updated/linked author.",
                "book": book,
            })),
        )),
    }
}

pub async fn get_reviews(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReviewsQuery>,
) -> Result<Json<ReviewList>, AppError> {
    let book_id = parse_book_id(query.book_id.as_deref())?;

    let reviews = state.reviews.list_for_book(book_id).await?;

    Ok(Json(reviews.into()))
}

pub async fn add_review(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let body = parse_body(&body);

    if let Some(field) = REVIEW_FIELDS
        .into_iter()
        .find(|field| is_missing(&body, field))
    {
        return Err(AppError::required(field));
    }

    let invalid =
        || AppError::BadRequest("rating must be integer 1-5 and book_id integer".into());

    let book_id = body.get("book_id").and_then(as_int).ok_or_else(invalid)?;
    let rating = body
        .get("rating")
        .and_then(as_int)
        .and_then(|rating| u8::try_from(rating).ok())
        .filter(|rating| (1..=5).contains(rating))
        .ok_or_else(invalid)?;

    if !state.catalog.book_exists(book_id)? {
        return Err(AppError::NotFound("book_id does not exist".into()));
    }

    let text_of = |field: &str| body.get(field).map(as_text).unwrap_or_default();

    let review = state
        .reviews
        .insert(NewReview {
            book_id,
            reviewer: text_of("reviewer"),
            rating,
            text: text_of("text"),
        })
        .await?;

    info!("Review {} added for book {book_id}", review.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Review added", "review": review })),
    ))
}

pub async fn delete_review(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = Uuid::parse_str(&id).map_err(|_| AppError::BadRequest("invalid review id".into()))?;

    let deleted = state.reviews.delete(id).await?;

    Ok(Json(json!({ "deleted": deleted })))
}
