//! # Shelf
//!
//! Client side of the book shelf. Shared by the server (payload types) and
//! anything that renders the shelf.
//!
//!
//!
//! ## Cover Colors
//! - Books without a cover image, or whose image fails to load, get a gradient
//! - Gradient is picked from the title alone, so a book always looks the same
//! - See [`cover::derive_background`]
//!
//!
//!
//! ## Review Panel
//! - One [`panel::ReviewPanel`] per open book, dropped on close
//! - Default shows the 3 newest reviews, toggle shows all of them
//! - Transitions hand out tickets for the network call to perform
//! - Tickets carry a generation, late responses for a superseded open are dropped
//! - [`controller::ReviewPanelController`] drives the tickets through a [`api::ReviewsApi`]
//!
//! Submitting never inserts locally. A successful post triggers a reload so the list is always
//! what the server has.
//!
//!
//!
//! ## Endpoints
//! - `GET /api/books?q=&limit=`
//! - `GET /api/reviews?book_id=`
//! - `POST /api/reviews`
pub mod api;
pub mod card;
pub mod controller;
pub mod cover;
pub mod error;
pub mod models;
pub mod panel;

pub use api::{ReviewsApi, ShelfClient};
pub use controller::ReviewPanelController;
pub use error::ShelfError;
pub use models::{Book, BookList, NewReview, Review, ReviewList};
pub use panel::{PanelState, PanelView, ReviewPanel};
