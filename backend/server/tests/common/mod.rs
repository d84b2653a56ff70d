#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header::CONTENT_TYPE},
};
use serde_json::Value;
use server::{
    app,
    database::NewBook,
    state::AppState,
};
use tokio::net::TcpListener;
use tower::ServiceExt;

pub const BOOKS: [(&str, &str, i64); 3] = [
    ("The Great Gatsby", "F. Scott Fitzgerald", 1925),
    ("Clean Code", "Robert C. Martin", 2008),
    ("Dune", "Frank Herbert", 1965),
];

pub fn seeded_state() -> Arc<AppState> {
    let state = AppState::ephemeral().expect("in-memory state");

    for (title, author, year) in BOOKS {
        state
            .catalog
            .upsert_book(&NewBook {
                title: title.to_string(),
                author: author.to_string(),
                publication_year: year,
                image_url: None,
            })
            .expect("seed book");
    }

    state
}

pub fn book_id(state: &AppState, title: &str) -> i64 {
    state
        .catalog
        .list_books(title, None)
        .expect("list books")
        .into_iter()
        .find(|book| book.title == title)
        .expect("seeded title")
        .book_id
}

pub async fn send(state: &Arc<AppState>, request: Request<Body>) -> (StatusCode, Value) {
    let response = app(state.clone())
        .oneshot(request)
        .await
        .expect("router is infallible");

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, json)
}

pub async fn get(state: &Arc<AppState>, uri: &str) -> (StatusCode, Value) {
    send(
        state,
        Request::get(uri).body(Body::empty()).expect("request"),
    )
    .await
}

pub async fn post(state: &Arc<AppState>, uri: &str, body: &str) -> (StatusCode, Value) {
    send(
        state,
        Request::post(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
    )
    .await
}

pub async fn delete(state: &Arc<AppState>, uri: &str) -> (StatusCode, Value) {
    send(
        state,
        Request::delete(uri).body(Body::empty()).expect("request"),
    )
    .await
}

/// Binds the router to an ephemeral port and returns its base url.
pub async fn spawn(state: Arc<AppState>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let address = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, app(state)).await.expect("serve");
    });

    format!("http://{address}")
}
