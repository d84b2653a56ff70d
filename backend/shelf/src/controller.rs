use std::cell::{Ref, RefCell};

use tracing::{debug, warn};

use crate::{
    api::ReviewsApi,
    error::ShelfError,
    panel::{FetchTicket, PanelView, ReviewPanel, SubmitTicket},
};

/// Submission in flight. Dropped before `finish`, it unlocks the form so a cancelled post can be
/// retried.
struct PendingSubmission<'a> {
    panel: &'a RefCell<ReviewPanel>,
    ticket: Option<SubmitTicket>,
}

impl PendingSubmission<'_> {
    fn finish(mut self, result: Result<(), ShelfError>) -> Result<FetchTicket, ShelfError> {
        match self.ticket.take() {
            Some(ticket) => self.panel.borrow_mut().finish_submission(ticket, result),
            None => Err(ShelfError::StaleResponse),
        }
    }
}

impl Drop for PendingSubmission<'_> {
    fn drop(&mut self) {
        let Some(ticket) = self.ticket.take() else {
            return;
        };

        if let Ok(mut panel) = self.panel.try_borrow_mut() {
            debug!("Review submission dropped before completing");
            panel.cancel_submission(&ticket);
        }
    }
}

/// Drives one [`ReviewPanel`] through a [`ReviewsApi`].
///
/// Single logical thread of control: calls may interleave at the network awaits, never while the
/// panel is borrowed.
pub struct ReviewPanelController<A> {
    api: A,
    panel: RefCell<ReviewPanel>,
}

impl<A: ReviewsApi> ReviewPanelController<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            panel: RefCell::new(ReviewPanel::new()),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn panel(&self) -> Ref<'_, ReviewPanel> {
        self.panel.borrow()
    }

    pub fn with_view<R>(&self, render: impl FnOnce(PanelView<'_>) -> R) -> R {
        render(self.panel.borrow().view())
    }

    pub async fn open(&self, book_id: i64) -> Result<(), ShelfError> {
        let ticket = self.panel.borrow_mut().open(book_id);

        self.fetch_reviews(ticket).await
    }

    /// Manual retry after a failed load. No-op when closed.
    pub async fn retry(&self) -> Result<(), ShelfError> {
        let Some(ticket) = self.panel.borrow_mut().reload() else {
            return Ok(());
        };

        self.fetch_reviews(ticket).await
    }

    pub async fn fetch_reviews(&self, ticket: FetchTicket) -> Result<(), ShelfError> {
        let result = self.api.fetch_reviews(ticket.book_id).await;
        let applied = self.panel.borrow_mut().apply_fetch(ticket, result);

        match applied {
            Err(ShelfError::StaleResponse) => {
                debug!("Dropping stale reviews for book {}", ticket.book_id);
                Ok(())
            }
            Err(err) => {
                warn!("Failed to load reviews for book {}: {err}", ticket.book_id);
                Err(err)
            }
            Ok(()) => Ok(()),
        }
    }

    pub fn toggle_show_all(&self) {
        self.panel.borrow_mut().toggle_show_all();
    }

    pub async fn submit_review(
        &self,
        reviewer: &str,
        rating: Option<i64>,
        text: &str,
    ) -> Result<(), ShelfError> {
        let ticket = self
            .panel
            .borrow_mut()
            .begin_submission(reviewer, rating, text)?;

        let review = ticket.review.clone();
        let pending = PendingSubmission {
            panel: &self.panel,
            ticket: Some(ticket),
        };

        let result = self.api.submit_review(&review).await;
        let reload = pending.finish(result);

        match reload {
            Ok(ticket) => self.fetch_reviews(ticket).await,
            Err(ShelfError::StaleResponse) => {
                debug!("Panel moved on before the review was accepted");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    pub fn close(&self) {
        self.panel.borrow_mut().close();
    }
}
