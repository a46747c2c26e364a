use std::time::Duration;

use scraper::Html;

use crate::domain::{
    record::{PageResult, Record},
    schema::{FieldRule, FieldSpec, RecordSchema},
};

use super::{FailurePolicy, PageFetcher, PaginationDriver};

pub const REVIEW_BASE_URL: &str = "https://www.saketime.jp/brands/241/page:";
/// Known in advance from manual inspection of the brand page.
pub const REVIEW_TOTAL_PAGES: u32 = 236;
pub const REVIEW_PAGE_DELAY: Duration = Duration::from_millis(500);
pub const REVIEW_OUTPUT_PATH: &str = "juyondai_all_reviews.csv";

/// Selector rules for one review on the brand listing page. The brand name is
/// constant because the whole scrape targets a single brand's listing.
pub const REVIEW_SCHEMA: RecordSchema = RecordSchema {
    item_selector: "li.wrap.clearfix",
    fields: &[
        FieldSpec {
            column: "brand_name",
            rule: FieldRule::Const("十四代"),
        },
        FieldSpec {
            column: "reviewer",
            rule: FieldRule::Text("h3"),
        },
        FieldSpec {
            column: "rating",
            rule: FieldRule::Text("span.review_point"),
        },
        FieldSpec {
            column: "date",
            rule: FieldRule::Text("p.r-date span"),
        },
        FieldSpec {
            column: "content",
            rule: FieldRule::Text("p.r-body"),
        },
        FieldSpec {
            column: "taste",
            rule: FieldRule::JoinedText {
                selector: "div.reviewSpecInfo p.clearfix",
                separator: " ",
            },
        },
    ],
};

/// All reviews on one listing page, plus the markup for page-count discovery.
pub fn extract_reviews(html: Html) -> PageResult {
    let records = REVIEW_SCHEMA.extract_all(&html);
    PageResult { records, html }
}

/// Scrapes every review page in order. Any page failure ends the run with
/// whatever was accumulated up to that point.
pub async fn scrape_all_reviews(fetcher: &PageFetcher) -> Vec<Record> {
    let driver = PaginationDriver {
        total_pages: REVIEW_TOTAL_PAGES,
        delay: REVIEW_PAGE_DELAY,
        policy: FailurePolicy::AbortRun,
    };

    driver
        .run(|page| async move {
            let url = format!("{REVIEW_BASE_URL}{page}");
            let body = fetcher.fetch(&url).await?;
            Ok(extract_reviews(Html::parse_document(&body)).records)
        })
        .await
}
