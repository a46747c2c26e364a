use std::future::Future;
use std::time::Duration;

use scraper::{Html, Selector};

use crate::domain::record::Record;

use super::fetcher::ScrapeError;

/// What to do when a whole page fails to fetch or extract. Both behaviors
/// exist in the wild: the review scrape treats one bad page as fatal, the
/// ranking scrape shrugs and moves on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop the run, keeping what was accumulated so far.
    AbortRun,
    /// Log the page and continue with the next one.
    SkipPage,
}

pub struct PaginationDriver {
    pub total_pages: u32,
    pub delay: Duration,
    pub policy: FailurePolicy,
}

impl PaginationDriver {
    /// Visits pages 1..=total_pages in order, accumulating records. The delay
    /// is self-imposed pacing between successful pages, nothing more.
    pub async fn run<F, Fut>(&self, mut scrape_page: F) -> Vec<Record>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<Vec<Record>, ScrapeError>>,
    {
        let mut records: Vec<Record> = vec![];

        for page in 1..=self.total_pages {
            match scrape_page(page).await {
                Ok(mut page_records) => {
                    records.append(&mut page_records);
                    log::info!("Processed page {} of {}", page, self.total_pages);
                }
                Err(e) => {
                    log::error!("Error processing page {}: {}", page, e);
                    match self.policy {
                        FailurePolicy::AbortRun => break,
                        FailurePolicy::SkipPage => continue,
                    }
                }
            }

            tokio::time::sleep(self.delay).await;
        }

        records
    }
}

/// Highest page number advertised by the pagination control, 1 when the
/// control is absent. Alternative to the hardcoded page counts; not the
/// default until validated against live markup.
pub fn discover_total_pages(html: &Html) -> u32 {
    let link_selector = Selector::parse("div.pagination a").unwrap();
    html.select(&link_selector)
        .last()
        .and_then(|link| link.value().attr("href"))
        .and_then(|href| href.rsplit(':').next())
        .and_then(|page| page.trim_end_matches('/').parse::<u32>().ok())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    fn page_record(page: u32, index: u32) -> Record {
        Record {
            values: vec![format!("page {page} item {index}")],
        }
    }

    fn driver(policy: FailurePolicy, total_pages: u32) -> PaginationDriver {
        PaginationDriver {
            total_pages,
            delay: Duration::ZERO,
            policy,
        }
    }

    #[tokio::test]
    async fn visits_every_page_once_in_order() {
        let visited = RefCell::new(Vec::new());

        let records = driver(FailurePolicy::AbortRun, 4)
            .run(|page| {
                visited.borrow_mut().push(page);
                async move { Ok(vec![page_record(page, 1), page_record(page, 2)]) }
            })
            .await;

        assert_eq!(*visited.borrow(), vec![1, 2, 3, 4]);
        assert_eq!(records.len(), 8);
        assert_eq!(records[0], page_record(1, 1));
        assert_eq!(records[7], page_record(4, 2));
    }

    #[tokio::test]
    async fn abort_policy_keeps_pages_before_the_failure() {
        let visited = RefCell::new(Vec::new());

        let records = driver(FailurePolicy::AbortRun, 5)
            .run(|page| {
                visited.borrow_mut().push(page);
                async move {
                    if page == 3 {
                        Err(ScrapeError::Extraction("listing container".to_string()))
                    } else {
                        Ok(vec![page_record(page, 1)])
                    }
                }
            })
            .await;

        assert_eq!(*visited.borrow(), vec![1, 2, 3]);
        assert_eq!(records, vec![page_record(1, 1), page_record(2, 1)]);
    }

    #[tokio::test]
    async fn skip_policy_drops_only_the_failed_page() {
        let records = driver(FailurePolicy::SkipPage, 5)
            .run(|page| async move {
                if page == 3 {
                    Err(ScrapeError::Extraction("listing container".to_string()))
                } else {
                    Ok(vec![page_record(page, 1)])
                }
            })
            .await;

        assert_eq!(
            records,
            vec![
                page_record(1, 1),
                page_record(2, 1),
                page_record(4, 1),
                page_record(5, 1),
            ]
        );
    }

    #[tokio::test]
    async fn empty_pages_contribute_no_records() {
        let records = driver(FailurePolicy::SkipPage, 3)
            .run(|_| async move { Ok(vec![]) })
            .await;
        assert!(records.is_empty());
    }

    #[test]
    fn discovers_last_page_from_pagination_control() {
        let html = Html::parse_document(
            r#"<div class="pagination">
                <a href="/brands/241/page:1">1</a>
                <a href="/brands/241/page:2">2</a>
                <a href="/brands/241/page:236">236</a>
            </div>"#,
        );
        assert_eq!(discover_total_pages(&html), 236);
    }

    #[test]
    fn discovery_handles_trailing_slash() {
        let html = Html::parse_document(
            r#"<div class="pagination"><a href="/ranking/page:132/">132</a></div>"#,
        );
        assert_eq!(discover_total_pages(&html), 132);
    }

    #[test]
    fn discovery_defaults_to_one_page() {
        let html = Html::parse_document("<p>no pagination here</p>");
        assert_eq!(discover_total_pages(&html), 1);
    }
}
