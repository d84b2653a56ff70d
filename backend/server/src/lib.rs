//! JSON API behind the book shelf.
//!
//!
//!
//! # General Infrastructure
//! - One axum server, JSON in and out
//! - SQLite file for books, authors and the call log
//! - Redis for reviews, one hash for bodies plus a sorted set per book
//! - Static page and assets served from `STATIC_DIR`
//!
//!
//!
//! # Routes
//! - `GET /api/books?q=&limit=`: search by title or author, `limit=all` for everything, default 100
//! - `POST /api/books`: add a book, or link another author to an existing title
//! - `GET /api/reviews?book_id=`: reviews for one book, newest first
//! - `POST /api/reviews`: add a review, book must exist
//! - `DELETE /api/reviews/{id}`: remove one review
//!
//! Errors are always `{"error": "..."}` with a 400, 404 or 500.
//!
//!
//!
//! # Notes
//!
//! ## SQLite + Redis
//! Books are relational: authors are shared, titles are unique regardless of case, and listing needs
//! a join. Reviews are append-mostly documents read per book in time order, which a sorted set
//! gives directly.
//!
//! Nothing ties a review to the catalog beyond the existence check on insert. Deleting a book does
//! not delete its reviews.
//!
//!
//!
//! # Setup
//!
//! Environment variables, all optional.
//! ```sh
//! PORT=5000
//! BOOKS_DB_PATH=db/books.db
//! REDIS_URL=redis://127.0.0.1:6379/
//! REVIEWS_KEY=reviews
//! REVIEW_STORE=redis        # or memory
//! STATIC_DIR=static
//! DISABLE_DB_LOGGING=1      # skip the logs table
//! RUST_LOG=info
//! ```
//!
//! Seed the catalog, then run.
//! ```sh
//! cargo run -p manage -- --reset --seed
//! cargo run -p bookshelf
//! ```
use std::{sync::Arc, time::Duration};

use anyhow::Result;
use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    middleware,
    routing::{delete, get},
};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod database;
pub mod error;
pub mod logs;
pub mod reviews;
pub mod routes;
pub mod state;
pub mod utils;

use config::Config;
use logs::log_call;
use routes::{add_book, add_review, delete_review, get_reviews, list_books};
use state::AppState;

pub async fn start_server() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading config...");
    let config = Config::load()?;

    info!("Initializing state...");
    let state = AppState::new(config).await?;

    info!("Starting server...");
    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    serve(listener, state).await?;

    info!("Server shutting down...");

    Ok(())
}

pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> Result<()> {
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let static_dir = state.config.static_dir.clone();

    Router::new()
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .route("/api/books", get(list_books).post(add_book))
        .route("/api/reviews", get(get_reviews).post(add_review))
        .route("/api/reviews/{id}", delete(delete_review))
        .route_layer(middleware::from_fn_with_state(state.clone(), log_call))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(cors)
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
