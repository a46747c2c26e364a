use env_logger::Env;
use toji::services::{
    scrape_ranking, write_dataset, PageFetcher, RANKING_COLUMNS, RANKING_OUTPUT_PATH,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let fetcher = PageFetcher::new();
    let records = scrape_ranking(&fetcher).await;

    write_dataset(RANKING_OUTPUT_PATH, &RANKING_COLUMNS, &records)?;

    log::info!(
        "Wrote {} ranking entries to {}",
        records.len(),
        RANKING_OUTPUT_PATH
    );
    Ok(())
}
