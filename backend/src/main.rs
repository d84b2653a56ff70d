#[tokio::main]
async fn main() -> anyhow::Result<()> {
    #[cfg(feature = "seed")]
    {
        let path = std::env::var("BOOKS_DB_PATH").unwrap_or_else(|_| "db/books.db".to_string());
        let catalog = server::database::Catalog::open(std::path::Path::new(&path))?;

        manage::seed_from_file(&catalog, std::path::Path::new(manage::models::SEED_FILE))?;
    }

    server::start_server().await
}
