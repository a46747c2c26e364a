use itertools::Itertools;
use scraper::{ElementRef, Html, Selector};

use crate::domain::record::Record;

/// How to pull one column's value out of an item container. All selector
/// strings live in schema tables, so selector drift on the source site means
/// editing data, not extraction logic.
pub enum FieldRule {
    /// Fixed value, identical for every record.
    Const(&'static str),
    /// Text of the first element matching the selector.
    Text(&'static str),
    /// Texts of all elements matching the selector, joined with a separator.
    JoinedText {
        selector: &'static str,
        separator: &'static str,
    },
    /// Attribute of the first element matching the selector.
    Attr {
        selector: &'static str,
        attr: &'static str,
    },
    /// Anything a CSS selector alone cannot express.
    Custom(fn(ElementRef) -> Option<String>),
}

pub struct FieldSpec {
    pub column: &'static str,
    pub rule: FieldRule,
}

pub struct RecordSchema {
    /// Selector locating one item container per record.
    pub item_selector: &'static str,
    pub fields: &'static [FieldSpec],
}

impl RecordSchema {
    pub fn columns(&self) -> Vec<&'static str> {
        self.fields.iter().map(|field| field.column).collect()
    }

    /// One record from one item container. A rule that finds nothing yields
    /// the empty string, never a missing column.
    pub fn extract_record(&self, item: ElementRef) -> Record {
        Record {
            values: self
                .fields
                .iter()
                .map(|field| extract_field(item, &field.rule))
                .collect(),
        }
    }

    pub fn extract_all(&self, html: &Html) -> Vec<Record> {
        let item_selector = Selector::parse(self.item_selector).unwrap();
        html.select(&item_selector)
            .map(|item| self.extract_record(item))
            .collect()
    }
}

pub fn extract_field(item: ElementRef, rule: &FieldRule) -> String {
    let value = match rule {
        FieldRule::Const(value) => Some((*value).to_string()),
        FieldRule::Text(selector) => {
            let selector = Selector::parse(selector).unwrap();
            item.select(&selector).next().map(element_text)
        }
        FieldRule::JoinedText {
            selector,
            separator,
        } => {
            let selector = Selector::parse(selector).unwrap();
            let joined = item.select(&selector).map(element_text).join(separator);
            (!joined.is_empty()).then_some(joined)
        }
        FieldRule::Attr { selector, attr } => {
            let selector = Selector::parse(selector).unwrap();
            item.select(&selector)
                .next()
                .and_then(|element| element.value().attr(attr).map(str::to_string))
        }
        FieldRule::Custom(extract) => extract(item),
    };

    value.unwrap_or_default()
}

/// All text under an element, concatenated and trimmed.
pub fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shout_title(item: ElementRef) -> Option<String> {
        let selector = Selector::parse("h3").unwrap();
        item.select(&selector)
            .next()
            .map(|heading| element_text(heading).to_uppercase())
    }

    const TEST_SCHEMA: RecordSchema = RecordSchema {
        item_selector: "li.entry",
        fields: &[
            FieldSpec {
                column: "source",
                rule: FieldRule::Const("fixture"),
            },
            FieldSpec {
                column: "title",
                rule: FieldRule::Text("h3"),
            },
            FieldSpec {
                column: "notes",
                rule: FieldRule::JoinedText {
                    selector: "p.note",
                    separator: " ",
                },
            },
            FieldSpec {
                column: "link",
                rule: FieldRule::Attr {
                    selector: "a",
                    attr: "href",
                },
            },
            FieldSpec {
                column: "shouted",
                rule: FieldRule::Custom(shout_title),
            },
        ],
    };

    #[test]
    fn extracts_every_rule_kind() {
        let html = Html::parse_document(
            r#"<ul>
                <li class="entry">
                    <h3> Juyondai </h3>
                    <p class="note">rich</p>
                    <p class="note">fruity</p>
                    <a href="/brands/241">detail</a>
                </li>
            </ul>"#,
        );

        let records = TEST_SCHEMA.extract_all(&html);
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].values,
            vec!["fixture", "Juyondai", "rich fruity", "/brands/241", "JUYONDAI"]
        );
    }

    #[test]
    fn missing_fields_become_empty_strings() {
        let html = Html::parse_document(r#"<ul><li class="entry"><h3>Only title</h3></li></ul>"#);

        let records = TEST_SCHEMA.extract_all(&html);
        assert_eq!(records.len(), 1);
        // Full column set even when most rules found nothing.
        assert_eq!(records[0].values.len(), TEST_SCHEMA.columns().len());
        assert_eq!(
            records[0].values,
            vec!["fixture", "Only title", "", "", "ONLY TITLE"]
        );
    }

    #[test]
    fn page_without_items_yields_no_records() {
        let html = Html::parse_document("<ul><li class=\"other\">nope</li></ul>");
        assert!(TEST_SCHEMA.extract_all(&html).is_empty());
    }

    #[test]
    fn columns_follow_field_order() {
        assert_eq!(
            TEST_SCHEMA.columns(),
            vec!["source", "title", "notes", "link", "shouted"]
        );
    }
}
