use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use server::{database::Catalog, reviews::RedisReviewStore};
use tracing_subscriber::{EnvFilter, fmt};

use manage::{models::SEED_FILE, seed_from_file, wipe_reviews};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Delete the SQLite file and recreate the schema
    #[arg(long)]
    reset: bool,

    /// Upsert books from the seed file, or the built-in list
    #[arg(long)]
    seed: bool,

    /// Delete every stored review
    #[arg(long)]
    wipe_reviews: bool,

    #[arg(long, env = "BOOKS_DB_PATH", default_value = "db/books.db")]
    db: PathBuf,

    #[arg(long, default_value = SEED_FILE)]
    seed_file: PathBuf,

    #[arg(long, env = "REDIS_URL", default_value = "redis://127.0.0.1:6379/")]
    redis_url: String,

    #[arg(long, env = "REVIEWS_KEY", default_value = "reviews")]
    reviews_key: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args = Args::parse();

    if !(args.reset || args.seed || args.wipe_reviews) {
        Args::command().print_help()?;
        return Ok(());
    }

    if args.reset {
        Catalog::reset(&args.db)?;
        println!("Reset {}", args.db.display());
    }

    if args.seed {
        let catalog = Catalog::open(&args.db)?;
        seed_from_file(&catalog, &args.seed_file)?;
    }

    if args.wipe_reviews {
        let store = RedisReviewStore::connect(&args.redis_url, &args.reviews_key).await?;
        wipe_reviews(&store).await?;
    }

    Ok(())
}
