use std::{fs::File, io::Write, path::Path};

use crate::domain::record::Record;

pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Flattens embedded newlines to spaces and trims surrounding whitespace.
/// Applied to every field of every record at write time.
pub fn normalize_field(value: &str) -> String {
    value.replace(['\r', '\n'], " ").trim().to_string()
}

/// Writes the dataset as UTF-8-with-BOM CSV: header row first, every field
/// quoted, one row per record in accumulation order. Any previous file at the
/// path is replaced.
pub fn write_dataset<P, C>(path: P, columns: &[C], records: &[Record]) -> anyhow::Result<()>
where
    P: AsRef<Path>,
    C: AsRef<str>,
{
    let mut file = File::create(path)?;
    file.write_all(UTF8_BOM)?;

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(file);

    writer.write_record(columns.iter().map(AsRef::as_ref))?;
    for record in records {
        writer.write_record(record.values.iter().map(|value| normalize_field(value)))?;
    }
    writer.flush()?;

    Ok(())
}
