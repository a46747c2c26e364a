use scraper::Html;

/// One scraped row. Values are aligned to the column list of the schema that
/// produced the record, so every record of a dataset has the same width.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub values: Vec<String>,
}

/// Everything extracted from one listing page. The parsed markup is kept
/// around so callers can also read the pagination control from it.
pub struct PageResult {
    pub records: Vec<Record>,
    pub html: Html,
}
