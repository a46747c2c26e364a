use anyhow::Context;
use env_logger::Env;
use toji::{
    configuration::get_configuration,
    domain::{
        record::Record,
        review_tags::{ReviewTags, TAG_COLUMNS},
    },
    services::{parse_tags, write_dataset, OpenaiClient, UTF8_BOM},
};

const INPUT_PATH: &str = "juyondai_all_reviews.csv";
const OUTPUT_PATH: &str = "labeled_reviews.csv";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let configuration = get_configuration().expect("Failed to read configuration.");
    let client = OpenaiClient::new(configuration.api_keys.openai);

    let bytes = std::fs::read(INPUT_PATH).with_context(|| format!("reading {INPUT_PATH}"))?;
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);
    let mut reader = csv::Reader::from_reader(bytes);

    let header: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let content_index = column_index(&header, "content")?;
    let taste_index = column_index(&header, "taste")?;

    let mut columns = header.clone();
    columns.extend(TAG_COLUMNS.iter().map(|c| c.to_string()));

    let mut records = vec![];
    for (index, row) in reader.records().enumerate() {
        let row = row?;
        let mut values: Vec<String> = row.iter().map(str::to_string).collect();

        let content = values.get(content_index).cloned().unwrap_or_default();
        let taste = values.get(taste_index).cloned().unwrap_or_default();

        let raw_tags = client.classify_review(&content, &taste).await?;
        let tags = match parse_tags(&raw_tags) {
            Ok(tags) => tags,
            Err(e) => {
                // Unparseable rows keep their nine tag columns empty.
                log::error!("JSON decode failed on row {}: {}\n{}", index, e, raw_tags);
                ReviewTags::default()
            }
        };

        values.extend(tags.to_columns());
        records.push(Record { values });
    }

    write_dataset(OUTPUT_PATH, &columns, &records)?;

    log::info!("Labeled {} reviews, see {}", records.len(), OUTPUT_PATH);
    Ok(())
}

fn column_index(header: &[String], column: &str) -> anyhow::Result<usize> {
    header
        .iter()
        .position(|c| c == column)
        .with_context(|| format!("{INPUT_PATH} has no '{column}' column"))
}
