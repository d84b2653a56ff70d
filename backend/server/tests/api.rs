mod common;

use axum::http::StatusCode;
use common::{book_id, delete, get, post, seeded_state};
use serde_json::json;
use server::database::DEFAULT_COVER;

#[tokio::test]
async fn books_list_has_items() {
    let state = seeded_state();

    let (status, body) = get(&state, "/api/books?limit=all").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);
    assert!(body["items"][0]["book_id"].is_i64());
    assert_eq!(body["items"][0]["title"], "Clean Code");
    assert_eq!(body["items"][0]["image_url"], DEFAULT_COVER);
}

#[tokio::test]
async fn books_search_and_limit() {
    let state = seeded_state();

    let (_, body) = get(&state, "/api/books?q=herbert").await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["items"][0]["title"], "Dune");

    let (_, body) = get(&state, "/api/books?limit=1").await;
    assert_eq!(body["count"], 1);

    let (_, body) = get(&state, "/api/books?limit=plenty").await;
    assert_eq!(body["count"], 3);

    let (_, body) = get(&state, "/api/books?limit=-1").await;
    assert_eq!(body["count"], 3);
}

#[tokio::test]
async fn add_book_validation() {
    let state = seeded_state();

    let (status, body) = post(&state, "/api/books", r#"{"title": "Emma"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "title and author required");

    let (status, body) = post(
        &state,
        "/api/books",
        r#"{"title": "Emma", "author": "Jane Austen", "publication_year": "soon"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "publication_year must be an integer");

    let (status, _) = post(&state, "/api/books", "{{ broken").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn add_book_then_existing() {
    let state = seeded_state();

    let (status, body) = post(
        &state,
        "/api/books",
        r#"{"title": "Emma", "author": "Jane Austen", "publication_year": 1815}"#,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Book added successfully");
    assert_eq!(body["book"]["authors"], "Jane Austen");

    let (status, body) = post(
        &state,
        "/api/books",
        r#"{"title": "EMMA", "author": "J. Austen", "publication_year": "1816", "image_url": "https://x/emma.jpg"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Book already existed; updated/linked author.");
    assert_eq!(body["book"]["title"], "Emma");
    assert_eq!(body["book"]["publication_year"], 1816);
    assert_eq!(body["book"]["image_url"], "https://x/emma.jpg");

    let (_, body) = get(&state, "/api/books?limit=all").await;
    assert_eq!(body["count"], 4);
}

#[tokio::test]
async fn get_reviews_validation() {
    let state = seeded_state();

    let (status, body) = get(&state, "/api/reviews").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "book_id is required");

    let (status, body) = get(&state, "/api/reviews?book_id=abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "book_id must be an integer");
}

#[tokio::test]
async fn add_review_validation() {
    let state = seeded_state();
    let dune = book_id(&state, "Dune");

    let (status, body) = post(
        &state,
        "/api/reviews",
        &json!({ "book_id": dune, "reviewer": "  ", "rating": 4, "text": "nice" }).to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "reviewer is required");

    let (status, body) = post(
        &state,
        "/api/reviews",
        &json!({ "book_id": dune, "reviewer": "Ann", "rating": 6, "text": "nice" }).to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "rating must be integer 1-5 and book_id integer");

    let (status, body) = post(
        &state,
        "/api/reviews",
        &json!({ "book_id": 9999, "reviewer": "Ann", "rating": 3, "text": "nice" }).to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "book_id does not exist");

    let (status, body) = post(&state, "/api/reviews", "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "book_id is required");
}

#[tokio::test]
async fn reviews_round_trip() {
    let state = seeded_state();
    let gatsby = book_id(&state, "The Great Gatsby");

    for (reviewer, rating) in [("Nick", json!(5)), ("Daisy", json!("4"))] {
        let (status, body) = post(
            &state,
            "/api/reviews",
            &json!({ "book_id": gatsby, "reviewer": reviewer, "rating": rating, "text": " Great integration! " })
                .to_string(),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Review added");
        assert_eq!(body["review"]["book_id"], gatsby);
        assert_eq!(body["review"]["text"], "Great integration!");
    }

    let (status, body) = get(&state, &format!("/api/reviews?book_id={gatsby}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(body["items"][0]["reviewer"], "Daisy");
    assert_eq!(body["items"][0]["rating"], 4);
    assert_eq!(body["items"][1]["reviewer"], "Nick");

    let id = body["items"][0]["_id"].as_str().unwrap().to_string();

    let (status, body) = delete(&state, &format!("/api/reviews/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], 1);

    let (_, body) = delete(&state, &format!("/api/reviews/{id}")).await;
    assert_eq!(body["deleted"], 0);

    let (_, body) = get(&state, &format!("/api/reviews?book_id={gatsby}")).await;
    assert_eq!(body["count"], 1);
    assert!(body["items"]
        .as_array()
        .unwrap()
        .iter()
        .all(|review| review["_id"] != id.as_str()));
}

#[tokio::test]
async fn delete_invalid_id() {
    let state = seeded_state();

    let (status, body) = delete(&state, "/api/reviews/not-a-uuid").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid review id");
}

#[tokio::test]
async fn calls_are_logged() {
    let state = seeded_state();

    get(&state, "/api/books").await;
    get(&state, "/api/reviews").await;

    assert_eq!(state.catalog.count_logs().unwrap(), 2);
}
