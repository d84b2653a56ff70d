//! # Review Panel
//!
//! State for one open book. Owned by whoever shows the panel, dropped on close.
//!
//! ## States
//! - Closed: nothing selected
//! - Loading: fetch in flight, cached reviews (if any) still shown
//! - Loaded: reviews cached, showing the newest [`RECENT_LIMIT`]
//! - Expanded: reviews cached, showing all of them
//! - Error: last fetch failed, no reviews and no toggle shown
//!
//! ## Tickets
//! Transitions that need the network return a ticket instead of doing I/O. The caller performs the
//! request and hands the result back along with the ticket. Every load bumps the generation, so a
//! ticket from before the latest `open` no longer matches and its result is dropped.
use crate::{
    error::ShelfError,
    models::{NewReview, Review},
};

pub const RECENT_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelState {
    Closed,
    Loading,
    Loaded,
    Expanded,
    Error(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum Phase {
    #[default]
    Closed,
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub book_id: i64,
    generation: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmitTicket {
    pub review: NewReview,
    session: u64,
}

/// Contents of the review form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewDraft {
    pub reviewer: String,
    pub rating: Option<i64>,
    pub text: String,
}

impl ReviewDraft {
    pub fn new(reviewer: &str, rating: Option<i64>, text: &str) -> Self {
        Self {
            reviewer: reviewer.to_string(),
            rating,
            text: text.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.reviewer.is_empty() && self.rating.is_none() && self.text.is_empty()
    }

    pub fn validate(&self, book_id: i64) -> Result<NewReview, ShelfError> {
        let reviewer = self.reviewer.trim();
        let text = self.text.trim();

        if reviewer.is_empty() {
            return Err(ShelfError::ValidationFailure("reviewer is required".into()));
        }

        let Some(rating) = self.rating else {
            return Err(ShelfError::ValidationFailure("rating is required".into()));
        };

        if text.is_empty() {
            return Err(ShelfError::ValidationFailure("text is required".into()));
        }

        let rating = u8::try_from(rating)
            .ok()
            .filter(|rating| (1..=5).contains(rating))
            .ok_or_else(|| {
                ShelfError::ValidationFailure("rating must be between 1 and 5".into())
            })?;

        Ok(NewReview {
            book_id,
            reviewer: reviewer.to_string(),
            rating,
            text: text.to_string(),
        })
    }
}

/// Render input for the panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelView<'a> {
    pub state: PanelState,
    pub book_id: Option<i64>,
    pub reviews: &'a [Review],
    pub total: usize,
    pub toggle: Option<String>,
    pub submitting: bool,
    pub draft: &'a ReviewDraft,
}

#[derive(Debug, Default)]
pub struct ReviewPanel {
    book_id: Option<i64>,
    show_all: bool,
    reviews: Option<Vec<Review>>,
    phase: Phase,
    generation: u64,
    session: u64,
    draft: ReviewDraft,
    submitting: bool,
}

impl ReviewPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, book_id: i64) -> FetchTicket {
        self.book_id = Some(book_id);
        self.show_all = false;
        self.reviews = None;
        self.draft = ReviewDraft::default();
        self.submitting = false;
        self.session += 1;

        self.begin_load(book_id)
    }

    /// Ticket to re-fetch the open book, `None` when closed.
    pub fn reload(&mut self) -> Option<FetchTicket> {
        self.book_id.map(|book_id| self.begin_load(book_id))
    }

    fn begin_load(&mut self, book_id: i64) -> FetchTicket {
        self.generation += 1;
        self.phase = Phase::Loading;

        FetchTicket {
            book_id,
            generation: self.generation,
        }
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.generation == self.generation && self.book_id == Some(ticket.book_id)
    }

    pub fn apply_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Review>, ShelfError>,
    ) -> Result<(), ShelfError> {
        if !self.is_current(&ticket) {
            return Err(ShelfError::StaleResponse);
        }

        match result {
            Ok(reviews) => {
                self.reviews = Some(reviews);
                self.phase = Phase::Ready;
                Ok(())
            }
            Err(err) => {
                self.phase = Phase::Failed(err.to_string());
                Err(err)
            }
        }
    }

    pub fn toggle_show_all(&mut self) {
        if self.reviews.is_some() {
            self.show_all = !self.show_all;
        }
    }

    /// Validates the form and hands out a ticket for the post. Invalid input keeps the draft and
    /// never produces a ticket.
    pub fn begin_submission(
        &mut self,
        reviewer: &str,
        rating: Option<i64>,
        text: &str,
    ) -> Result<SubmitTicket, ShelfError> {
        self.draft = ReviewDraft::new(reviewer, rating, text);

        let Some(book_id) = self.book_id else {
            return Err(ShelfError::ValidationFailure("no book selected".into()));
        };

        if self.submitting {
            return Err(ShelfError::ValidationFailure(
                "a review is already being submitted".into(),
            ));
        }

        let review = self.draft.validate(book_id)?;
        self.submitting = true;

        Ok(SubmitTicket {
            review,
            session: self.session,
        })
    }

    /// Success clears the form and returns the reload ticket. Failure keeps the form.
    pub fn finish_submission(
        &mut self,
        ticket: SubmitTicket,
        result: Result<(), ShelfError>,
    ) -> Result<FetchTicket, ShelfError> {
        if ticket.session != self.session {
            return Err(ShelfError::StaleResponse);
        }

        self.submitting = false;
        result?;

        self.draft = ReviewDraft::default();
        Ok(self.begin_load(ticket.review.book_id))
    }

    /// The post was abandoned before a result came back. Unlocks the form and keeps the draft.
    pub fn cancel_submission(&mut self, ticket: &SubmitTicket) {
        if ticket.session == self.session {
            self.submitting = false;
        }
    }

    pub fn close(&mut self) {
        *self = Self {
            generation: self.generation + 1,
            session: self.session + 1,
            ..Self::default()
        };
    }

    pub fn state(&self) -> PanelState {
        match &self.phase {
            Phase::Closed => PanelState::Closed,
            Phase::Loading => PanelState::Loading,
            Phase::Ready if self.show_all => PanelState::Expanded,
            Phase::Ready => PanelState::Loaded,
            Phase::Failed(message) => PanelState::Error(message.clone()),
        }
    }

    pub fn book_id(&self) -> Option<i64> {
        self.book_id
    }

    pub fn show_all(&self) -> bool {
        self.show_all
    }

    pub fn cached_reviews(&self) -> Option<&[Review]> {
        self.reviews.as_deref()
    }

    pub fn draft(&self) -> &ReviewDraft {
        &self.draft
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn visible(&self) -> &[Review] {
        compute_visible(self.cached_reviews(), self.show_all)
    }

    pub fn view(&self) -> PanelView<'_> {
        let state = self.state();
        let failed = matches!(state, PanelState::Error(_));
        let total = self.reviews.as_ref().map_or(0, Vec::len);

        PanelView {
            book_id: self.book_id,
            reviews: if failed { &[] } else { self.visible() },
            total,
            toggle: if failed {
                None
            } else {
                toggle_label(total, self.show_all)
            },
            submitting: self.submitting,
            draft: &self.draft,
            state,
        }
    }
}

pub fn compute_visible(reviews: Option<&[Review]>, show_all: bool) -> &[Review] {
    match reviews {
        None => &[],
        Some(reviews) if show_all => reviews,
        Some(reviews) => &reviews[..reviews.len().min(RECENT_LIMIT)],
    }
}

/// Label for the inactive mode, only when there is something to hide.
pub fn toggle_label(total: usize, show_all: bool) -> Option<String> {
    if total <= RECENT_LIMIT {
        return None;
    }

    Some(if show_all {
        "Show less".to_string()
    } else {
        format!("Show all ({total})")
    })
}
