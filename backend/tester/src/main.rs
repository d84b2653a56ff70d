use anyhow::Result;
use clap::Parser;
use shelf::{ReviewPanelController, ShelfClient, card::shelf_cards, cover::derive_background};

#[derive(Parser, Debug)]
#[command(author, version, about = "Smoke test a running shelf server")]
struct Args {
    #[arg(default_value = "http://127.0.0.1:5000")]
    base_url: String,

    /// Books to list, all when omitted
    #[arg(long)]
    limit: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let client = ShelfClient::new(&args.base_url);

    let books = client.list_books(None, args.limit).await?;
    println!("Books: {}\n", books.len());

    for card in shelf_cards(&books) {
        println!("{:>5}  {} by {}", card.book_id, card.title, card.authors);
        println!("       cover: {}", card.background());
        println!("       fallback: {}", derive_background(&card.title));
    }

    let Some(first) = books.first() else {
        println!("\nShelf is empty, nothing to open.");
        return Ok(());
    };

    let controller = ReviewPanelController::new(client);
    controller.open(first.book_id).await?;

    controller.with_view(|view| {
        println!("\nPanel for {} ({:?})", first.title, view.state);
        println!("Reviews: {} shown of {}", view.reviews.len(), view.total);

        for review in view.reviews {
            println!(
                "  [{}] {} ({}/5): {}",
                review.created_at.format("%Y-%m-%d"),
                review.reviewer,
                review.rating,
                review.text
            );
        }

        if let Some(toggle) = &view.toggle {
            println!("  {toggle}");
        }
    });

    Ok(())
}
