mod common;

use common::{book_id, seeded_state, spawn};
use server::database::DEFAULT_COVER;
use shelf::{
    NewReview, PanelState, ReviewPanelController, ReviewsApi, ShelfClient, ShelfError,
    card::{BookCard, Cover, shelf_cards},
    cover::derive_background,
};

async fn add_reviews(client: &ShelfClient, book_id: i64, count: usize) {
    for n in 0..count {
        client
            .submit_review(&NewReview {
                book_id,
                reviewer: format!("reader {n}"),
                rating: 4,
                text: format!("review number {n}"),
            })
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn shelf_cards_from_server() {
    let base_url = spawn(seeded_state()).await;
    let client = ShelfClient::new(&base_url);

    let books = client.list_books(None, None).await.unwrap();
    assert_eq!(books.len(), 3);

    let mut cards = shelf_cards(&books);
    let gatsby = cards
        .iter_mut()
        .find(|card| card.title == "The Great Gatsby")
        .unwrap();

    assert_eq!(gatsby.authors, "F. Scott Fitzgerald");
    assert_eq!(gatsby.cover, Cover::Image(DEFAULT_COVER.to_string()));

    gatsby.cover_failed();
    assert_eq!(
        gatsby.background(),
        "linear-gradient(160deg, #f093fb, #f5576c)"
    );

    let dune = client.list_books(Some("dune"), Some(5)).await.unwrap();
    assert_eq!(dune.len(), 1);
    assert_eq!(BookCard::from_book(&dune[0]).year, Some(1965));
    assert_eq!(derive_background("Dune").angle, 135);
}

#[tokio::test]
async fn open_toggle_and_submit() {
    let state = seeded_state();
    let dune = book_id(&state, "Dune");
    let base_url = spawn(state).await;

    let client = ShelfClient::new(&base_url);
    add_reviews(&client, dune, 4).await;

    let controller = ReviewPanelController::new(client);
    controller.open(dune).await.unwrap();

    controller.with_view(|view| {
        assert_eq!(view.state, PanelState::Loaded);
        assert_eq!(view.total, 4);
        assert_eq!(view.reviews.len(), 3);
        assert_eq!(view.reviews[0].reviewer, "reader 3");
        assert_eq!(view.toggle.as_deref(), Some("Show all (4)"));
    });

    controller.toggle_show_all();
    controller.with_view(|view| {
        assert_eq!(view.state, PanelState::Expanded);
        assert_eq!(view.reviews.len(), 4);
        assert_eq!(view.toggle.as_deref(), Some("Show less"));
    });

    controller
        .submit_review("Paul", Some(5), "The spice must flow")
        .await
        .unwrap();

    controller.with_view(|view| {
        assert_eq!(view.state, PanelState::Expanded);
        assert_eq!(view.total, 5);
        assert_eq!(view.reviews[0].reviewer, "Paul");
        assert_eq!(view.reviews[0].text, "The spice must flow");
        assert!(view.draft.is_empty());
        assert!(!view.submitting);
    });
}

#[tokio::test]
async fn invalid_submission_stays_local() {
    let state = seeded_state();
    let gatsby = book_id(&state, "The Great Gatsby");
    let base_url = spawn(state).await;

    let controller = ReviewPanelController::new(ShelfClient::new(&base_url));
    controller.open(gatsby).await.unwrap();

    let err = controller
        .submit_review("Nick", Some(9), "Too generous")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ShelfError::ValidationFailure("rating must be between 1 and 5".into())
    );

    assert!(controller.api().fetch_reviews(gatsby).await.unwrap().is_empty());
    controller.with_view(|view| {
        assert_eq!(view.state, PanelState::Loaded);
        assert_eq!(view.draft.reviewer, "Nick");
        assert_eq!(view.toggle, None);
    });
}

#[tokio::test]
async fn server_rejection_is_network_failure() {
    let base_url = spawn(seeded_state()).await;
    let controller = ReviewPanelController::new(ShelfClient::new(&base_url));

    controller.open(9999).await.unwrap();
    assert_eq!(controller.panel().state(), PanelState::Loaded);

    let err = controller
        .submit_review("Ghost", Some(3), "No such book")
        .await
        .unwrap_err();

    assert!(matches!(err, ShelfError::NetworkFailure(_)));
    controller.with_view(|view| {
        assert!(!view.submitting);
        assert_eq!(view.draft.text, "No such book");
    });
}
