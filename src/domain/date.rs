use anyhow::Context;
use chrono::NaiveDate;

/// Converts a `<year>年<month>月<day>日` date into `YYYY-MM-DD`, the format
/// downstream analysis expects. Malformed input is an error, never a partial
/// date.
pub fn parse_japanese_date(date_string: &str) -> anyhow::Result<String> {
    let date = NaiveDate::parse_from_str(date_string.trim(), "%Y年%m月%d日")
        .with_context(|| format!("invalid japanese date: {date_string}"))?;
    Ok(date.format("%Y-%m-%d").to_string())
}
