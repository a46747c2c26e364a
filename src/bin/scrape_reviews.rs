use env_logger::Env;
use toji::services::{
    scrape_all_reviews, write_dataset, PageFetcher, REVIEW_OUTPUT_PATH, REVIEW_SCHEMA,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let fetcher = PageFetcher::new();
    let records = scrape_all_reviews(&fetcher).await;

    let columns = REVIEW_SCHEMA.columns();
    write_dataset(REVIEW_OUTPUT_PATH, &columns, &records)?;

    log::info!(
        "Wrote {} reviews to {}",
        records.len(),
        REVIEW_OUTPUT_PATH
    );
    Ok(())
}
