use std::time::Duration;

use itertools::Itertools;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::domain::{
    record::Record,
    schema::{element_text, extract_field, FieldRule, FieldSpec, RecordSchema},
};

use super::{FailurePolicy, PageFetcher, PaginationDriver, ScrapeError};

pub const RANKING_BASE_URL: &str = "https://www.saketime.jp";
pub const RANKING_PAGE_URL: &str = "https://www.saketime.jp/ranking/page:";
/// Known in advance from manual inspection of the ranking index.
pub const RANKING_TOTAL_PAGES: u32 = 132;
pub const RANKING_PAGE_DELAY: Duration = Duration::from_millis(250);
pub const RANKING_OUTPUT_PATH: &str = "sake_ranking.csv";

pub const RANKING_COLUMNS: [&str; 10] = [
    "順位",
    "銘柄名",
    "読み方",
    "都道府県",
    "蔵元",
    "評価",
    "レビュー数",
    "価格帯",
    "説明",
    "関連銘柄",
];

const RELATED_SECTION_MARKER: &str = "飲む人はこんなお酒も飲んでいます";
const RELATED_BRANDS_LIMIT: usize = 10;

/// Listing-page fields, in column order. The last two ranking columns come
/// from the detail page and are appended after the secondary fetch.
const RANKING_LISTING_SCHEMA: RecordSchema = RecordSchema {
    item_selector: "li.clearfix",
    fields: &[
        FieldSpec {
            column: "順位",
            rule: FieldRule::Text("p[class*='rank-']"),
        },
        FieldSpec {
            column: "銘柄名",
            rule: FieldRule::Text("h2"),
        },
        FieldSpec {
            column: "読み方",
            rule: FieldRule::Custom(extract_kana),
        },
        FieldSpec {
            column: "都道府県",
            rule: FieldRule::Custom(extract_prefecture),
        },
        FieldSpec {
            column: "蔵元",
            rule: FieldRule::Custom(extract_brewery),
        },
        FieldSpec {
            column: "評価",
            rule: FieldRule::Text("span.point"),
        },
        FieldSpec {
            column: "レビュー数",
            rule: FieldRule::Custom(extract_review_count),
        },
        FieldSpec {
            column: "価格帯",
            rule: FieldRule::Custom(extract_price_range),
        },
    ],
};

const DETAIL_LINK_RULE: FieldRule = FieldRule::Attr {
    selector: "h2 a",
    attr: "href",
};

/// The brand reading sits in a bare text node right after the h2 link,
/// wrapped in full-width parentheses.
fn extract_kana(item: ElementRef) -> Option<String> {
    let link_selector = Selector::parse("h2 a").unwrap();
    let link = item.select(&link_selector).next()?;
    let sibling = link.next_sibling()?;
    let text = sibling.value().as_text()?;
    Some(
        text.trim()
            .trim_matches(|c| c == '（' || c == '）')
            .to_string(),
    )
}

fn brand_info_parts(item: ElementRef) -> Option<(String, String)> {
    let selector = Selector::parse("p.brand_info").unwrap();
    let text = element_text(item.select(&selector).next()?);
    text.split_once(" | ")
        .map(|(prefecture, brewery)| (prefecture.trim().to_string(), brewery.trim().to_string()))
}

fn extract_prefecture(item: ElementRef) -> Option<String> {
    brand_info_parts(item).map(|parts| parts.0)
}

fn extract_brewery(item: ElementRef) -> Option<String> {
    brand_info_parts(item).map(|parts| parts.1)
}

/// Review counts render as a parenthesized span like `(123件)`.
fn extract_review_count(item: ElementRef) -> Option<String> {
    let selector = Selector::parse("span").unwrap();
    item.select(&selector)
        .map(element_text)
        .find(|text| text.contains('件'))
        .map(|text| text.trim_matches(|c| c == '(' || c == ')').to_string())
}

fn extract_price_range(item: ElementRef) -> Option<String> {
    let selector = Selector::parse("p.brand_price").unwrap();
    let text = element_text(item.select(&selector).next()?);
    Some(text.replace("通販価格帯：", "").replace('～', "-"))
}

/// Lead paragraph of the brand detail page; empty when the page has none.
fn extract_description(html: &Html) -> String {
    let selector = Selector::parse("div.mod-centerbox p").unwrap();
    html.select(&selector)
        .next()
        .map(element_text)
        .unwrap_or_default()
}

/// The "people who drink this also drink" list on the detail page, formatted
/// as `name (spec) - score` entries joined with ` | `.
fn extract_related_brands(html: &Html) -> String {
    let heading_selector = Selector::parse("h4").unwrap();
    let list_selector = Selector::parse("ol.ranking").unwrap();
    let item_selector = Selector::parse("li.clearfix").unwrap();
    let name_selector = Selector::parse("p.pName").unwrap();
    let spec_selector = Selector::parse("p.pSpec").unwrap();
    let point_selector = Selector::parse("p.point").unwrap();

    let Some(heading) = html
        .select(&heading_selector)
        .find(|h| element_text(*h).contains(RELATED_SECTION_MARKER))
    else {
        return String::new();
    };
    let Some(list) = following_element(heading, &list_selector) else {
        return String::new();
    };

    list.select(&item_selector)
        .take(RELATED_BRANDS_LIMIT)
        .filter_map(|item| {
            let name = item.select(&name_selector).next().map(element_text)?;
            let spec = item.select(&spec_selector).next().map(element_text)?;
            let point = item.select(&point_selector).next().map(element_text)?;
            Some(format!("{name} ({spec}) - {point}"))
        })
        .join(" | ")
}

/// First element matching the selector that appears after `start` in document
/// order, regardless of nesting level.
fn following_element<'a>(start: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    let mut node = *start;
    loop {
        let mut sibling = node.next_sibling();
        while let Some(current) = sibling {
            if let Some(element) = ElementRef::wrap(current) {
                if selector.matches(&element) {
                    return Some(element);
                }
                if let Some(found) = element.select(selector).next() {
                    return Some(found);
                }
            }
            sibling = current.next_sibling();
        }
        node = node.parent()?;
    }
}

/// One listing page. Items without a detail link are not ranking entries and
/// produce nothing; items that fail are logged and skipped without giving up
/// on the rest of the page.
pub async fn extract_ranking_page(fetcher: &PageFetcher, page: u32, html: &Html) -> Vec<Record> {
    let item_selector = Selector::parse(RANKING_LISTING_SCHEMA.item_selector).unwrap();
    let mut records = vec![];

    for item in html.select(&item_selector) {
        match extract_ranking_item(fetcher, item).await {
            Ok(Some(record)) => records.push(record),
            Ok(None) => {}
            Err(e) => log::error!("Error processing item on page {}: {}", page, e),
        }
    }

    records
}

async fn extract_ranking_item(
    fetcher: &PageFetcher,
    item: ElementRef<'_>,
) -> Result<Option<Record>, ScrapeError> {
    let href = extract_field(item, &DETAIL_LINK_RULE);
    if href.is_empty() {
        return Ok(None);
    }

    let detail_url = Url::parse(RANKING_BASE_URL)
        .unwrap()
        .join(&href)
        .map_err(|e| ScrapeError::Extraction(format!("bad detail link {href}: {e}")))?;

    let mut record = RANKING_LISTING_SCHEMA.extract_record(item);

    let detail_body = fetcher.fetch(detail_url.as_str()).await?;
    let detail_html = Html::parse_document(&detail_body);
    record.values.push(extract_description(&detail_html));
    record.values.push(extract_related_brands(&detail_html));

    Ok(Some(record))
}

/// Scrapes the full ranking. A failed page is logged and skipped; the run
/// always reaches the last page.
pub async fn scrape_ranking(fetcher: &PageFetcher) -> Vec<Record> {
    let driver = PaginationDriver {
        total_pages: RANKING_TOTAL_PAGES,
        delay: RANKING_PAGE_DELAY,
        policy: FailurePolicy::SkipPage,
    };

    driver
        .run(|page| async move {
            let url = format!("{RANKING_PAGE_URL}{page}/");
            let body = fetcher.fetch(&url).await?;
            let html = Html::parse_document(&body);
            Ok(extract_ranking_page(fetcher, page, &html).await)
        })
        .await
}
