//! CSV encode/decode.
//!
//! The format is the usual flat tabular text: first line holds the
//! column keys, each following line one record, comma-separated, with
//! double-quote escaping for fields containing separators, quotes, or
//! newlines.

use crate::error::{ExchangeError, ExchangeResult};
use tabsync_model::{ColumnDescriptor, ColumnKind, Row, RowDraft};

/// Exports rows as tabular text in the declared column order.
///
/// The header line carries the column keys; only declared columns are
/// emitted, so the id stays out unless a column declares it. Values are
/// rendered per their kind: numbers as plain decimal, structured JSON in
/// compact textual form.
pub fn export_rows(rows: &[Row], columns: &[ColumnDescriptor]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(header_line(columns));

    for row in rows {
        let fields: Vec<String> = columns
            .iter()
            .map(|c| {
                let rendered = row.get(&c.key).map(|v| v.to_display()).unwrap_or_default();
                escape(&rendered)
            })
            .collect();
        lines.push(fields.join(","));
    }

    lines.join("\n")
}

/// Returns an importable header template for a column set.
pub fn template(columns: &[ColumnDescriptor]) -> String {
    header_line(columns)
}

fn header_line(columns: &[ColumnDescriptor]) -> String {
    let keys: Vec<String> = columns.iter().map(|c| escape(&c.key)).collect();
    keys.join(",")
}

/// Imports tabular text as row drafts.
///
/// The first line provides the field keys (whitespace-trimmed); blank
/// lines are skipped; values are coerced per the matching column's
/// declared kind, and fields under headers the column set does not
/// declare stay text for validation to report downstream.
pub fn import_rows(text: &str, columns: &[ColumnDescriptor]) -> ExchangeResult<Vec<RowDraft>> {
    let mut records = parse_records(text)?.into_iter();

    let headers: Vec<String> = records
        .next()
        .ok_or(ExchangeError::EmptyInput)?
        .into_iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut drafts = Vec::new();
    for (index, record) in records.enumerate() {
        if record.len() != headers.len() {
            return Err(ExchangeError::FieldCountMismatch {
                record: index + 1,
                expected: headers.len(),
                actual: record.len(),
            });
        }

        let mut draft = RowDraft::new();
        for (header, raw) in headers.iter().zip(record) {
            let kind = columns
                .iter()
                .find(|c| &c.key == header)
                .map(|c| c.kind)
                .unwrap_or(ColumnKind::Text);
            draft.fields.insert(header.clone(), kind.coerce(&raw));
        }
        drafts.push(draft);
    }

    Ok(drafts)
}

/// Quotes a field when it contains a separator, a quote, or a newline.
fn escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
    {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Splits tabular text into records, honoring quoting across newlines.
fn parse_records(text: &str) -> ExchangeResult<Vec<Vec<String>>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut record_quoted = false;
    let mut line = 1;
    let mut quote_open_line = 1;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' => {
                    // A doubled quote is a literal quote.
                    if chars.peek() == Some(&'"') {
                        field.push('"');
                        chars.next();
                    } else {
                        in_quotes = false;
                    }
                }
                '\n' => {
                    field.push('\n');
                    line += 1;
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => {
                in_quotes = true;
                record_quoted = true;
                quote_open_line = line;
            }
            ',' => {
                record.push(std::mem::take(&mut field));
            }
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                line += 1;
                finish_record(&mut records, &mut record, &mut field, record_quoted);
                record_quoted = false;
            }
            '\n' => {
                line += 1;
                finish_record(&mut records, &mut record, &mut field, record_quoted);
                record_quoted = false;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(ExchangeError::UnterminatedQuote {
            line: quote_open_line,
        });
    }

    // Final record when the text lacks a trailing newline.
    finish_record(&mut records, &mut record, &mut field, record_quoted);

    Ok(records)
}

fn finish_record(
    records: &mut Vec<Vec<String>>,
    record: &mut Vec<String>,
    field: &mut String,
    record_quoted: bool,
) {
    record.push(std::mem::take(field));

    // A lone unquoted field that trims to nothing is a blank line.
    let blank =
        record.len() == 1 && !record_quoted && record[0].trim().is_empty();
    if blank {
        record.clear();
    } else {
        records.push(std::mem::take(record));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tabsync_model::FieldValue;

    fn columns() -> Vec<ColumnDescriptor> {
        vec![
            ColumnDescriptor::text("title", "Title"),
            ColumnDescriptor::number("year", "Year"),
        ]
    }

    #[test]
    fn export_declared_order_excludes_id() {
        let rows = vec![Row::new("a1")
            .with("year", FieldValue::Number(2020.0))
            .with("title", FieldValue::Text("X".into()))];
        assert_eq!(export_rows(&rows, &columns()), "title,year\nX,2020");
    }

    #[test]
    fn export_missing_field_renders_empty() {
        let rows = vec![Row::new("a1").with("title", FieldValue::Text("X".into()))];
        assert_eq!(export_rows(&rows, &columns()), "title,year\nX,");
    }

    #[test]
    fn export_escapes_separators_quotes_and_newlines() {
        let rows = vec![Row::new("a1")
            .with("title", FieldValue::Text("a,\"b\"\nc".into()))
            .with("year", FieldValue::Number(2020.0))];
        assert_eq!(
            export_rows(&rows, &columns()),
            "title,year\n\"a,\"\"b\"\"\nc\",2020"
        );
    }

    #[test]
    fn import_basic() {
        let drafts = import_rows("title,year\nX,2020\nY,2021", &columns()).unwrap();
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].get("title"), Some(&FieldValue::Text("X".into())));
        assert_eq!(drafts[0].get("year"), Some(&FieldValue::Number(2020.0)));
    }

    #[test]
    fn import_trims_headers_and_skips_blank_lines() {
        let drafts =
            import_rows(" title , year \nX,2020\n\n   \nY,2021", &columns()).unwrap();
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[1].get("year"), Some(&FieldValue::Number(2021.0)));
    }

    #[test]
    fn import_quoted_field_spanning_lines() {
        let drafts = import_rows("title,year\n\"a\nb\",2020", &columns()).unwrap();
        assert_eq!(
            drafts[0].get("title"),
            Some(&FieldValue::Text("a\nb".into()))
        );
    }

    #[test]
    fn import_crlf_line_endings() {
        let drafts = import_rows("title,year\r\nX,2020\r\n", &columns()).unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].get("title"), Some(&FieldValue::Text("X".into())));
    }

    #[test]
    fn import_unknown_header_stays_text() {
        let drafts = import_rows("title,volume\nX,12", &columns()).unwrap();
        assert_eq!(drafts[0].get("volume"), Some(&FieldValue::Text("12".into())));
    }

    #[test]
    fn import_empty_number_cell_is_null() {
        let drafts = import_rows("title,year\nX,", &columns()).unwrap();
        assert_eq!(drafts[0].get("year"), Some(&FieldValue::Null));
    }

    #[test]
    fn import_empty_input() {
        assert_eq!(import_rows("", &columns()), Err(ExchangeError::EmptyInput));
    }

    #[test]
    fn import_field_count_mismatch() {
        let err = import_rows("title,year\nX", &columns()).unwrap_err();
        assert_eq!(
            err,
            ExchangeError::FieldCountMismatch {
                record: 1,
                expected: 2,
                actual: 1,
            }
        );
    }

    #[test]
    fn import_unterminated_quote() {
        let err = import_rows("title,year\n\"open,2020", &columns()).unwrap_err();
        assert_eq!(err, ExchangeError::UnterminatedQuote { line: 2 });
    }

    #[test]
    fn template_is_header_only() {
        assert_eq!(template(&columns()), "title,year");
    }

    proptest! {
        #[test]
        fn arbitrary_text_fields_roundtrip(a in any::<String>(), b in any::<String>()) {
            let cols = vec![
                ColumnDescriptor::text("left", "Left"),
                ColumnDescriptor::text("right", "Right"),
            ];
            let rows = vec![Row::new("a1")
                .with("left", FieldValue::Text(a.clone()))
                .with("right", FieldValue::Text(b.clone()))];

            let text = export_rows(&rows, &cols);
            let drafts = import_rows(&text, &cols).unwrap();

            prop_assert_eq!(drafts.len(), 1);
            prop_assert_eq!(drafts[0].get("left"), Some(&FieldValue::Text(a)));
            prop_assert_eq!(drafts[0].get("right"), Some(&FieldValue::Text(b)));
        }
    }
}
