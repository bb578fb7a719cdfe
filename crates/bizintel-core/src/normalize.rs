//! Board normalization: raw per-cell text into typed, rectangular records.
//!
//! Column handling is decided by the normalized title alone:
//! - titles containing "value" or "amount" are numeric; thousands separators,
//!   the rupee glyph and percent signs are stripped before parsing, and a
//!   failed parse becomes `0` (a genuine zero and an unparsable cell are
//!   indistinguishable afterwards);
//! - otherwise titles containing "date" are parsed as timestamps, and a failed
//!   parse becomes [`CellValue::Missing`];
//! - everything else stays trimmed text.
//!
//! A schema column an item has no cell for resolves to the zero sentinel of
//! its kind (`0`, `"0"`, or the null timestamp for dates).

use crate::domain::cell::parse_finite;
use crate::domain::{BoardSnapshot, CellValue, DataQuality, RawBoard, Record, ITEM_COLUMN};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::collections::{HashMap, HashSet};

/// Title substrings that mark a numeric column.
pub const NUMERIC_KEYWORDS: [&str; 2] = ["value", "amount"];

/// Title substring that marks a date column.
pub const DATE_KEYWORD: &str = "date";

const STRIPPED_FROM_AMOUNTS: [char; 3] = [',', '₹', '%'];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d %b %Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

/// How a column's cells are typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Date,
    Text,
}

impl ColumnKind {
    /// Classify a normalized title. Numeric wins over date.
    pub fn of(title: &str) -> Self {
        let title = title.to_lowercase();
        if NUMERIC_KEYWORDS.iter().any(|k| title.contains(k)) {
            ColumnKind::Numeric
        } else if title.contains(DATE_KEYWORD) {
            ColumnKind::Date
        } else {
            ColumnKind::Text
        }
    }

    /// Value an unresolved cell of this kind collapses to.
    fn sentinel(self) -> CellValue {
        match self {
            ColumnKind::Numeric => CellValue::Number(0.0),
            ColumnKind::Date => CellValue::Missing,
            ColumnKind::Text => CellValue::Text("0".to_string()),
        }
    }
}

/// Lowercase and trim a column title.
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Normalize a raw board into a [`BoardSnapshot`].
///
/// Record order follows item order. Unknown column ids fall back to the id
/// as title. Two titles that normalize to the same string share one column;
/// the later cell in schema order overwrites the earlier.
pub fn normalize(board: &RawBoard) -> BoardSnapshot {
    let titles: HashMap<&str, String> = board
        .columns
        .iter()
        .map(|c| (c.id.as_str(), normalize_title(&c.title)))
        .collect();

    let mut columns = Vec::with_capacity(board.columns.len() + 1);
    let mut seen = HashSet::new();
    let mut push_column = |columns: &mut Vec<String>, title: &str| {
        if seen.insert(title.to_string()) {
            columns.push(title.to_string());
        }
    };

    push_column(&mut columns, ITEM_COLUMN);
    for column in &board.columns {
        push_column(&mut columns, &normalize_title(&column.title));
    }

    let mut records = Vec::with_capacity(board.items.len());
    for item in &board.items {
        let mut record = Record::new(item.name.as_str());
        for cell in &item.column_values {
            let title = titles
                .get(cell.id.as_str())
                .cloned()
                .unwrap_or_else(|| normalize_title(&cell.id));
            push_column(&mut columns, &title);
            record.set(title, CellValue::Text(cell.text().to_string()));
        }
        records.push(record);
    }

    let (records, dropped_rows) = drop_blank_rows(records, &columns);
    let quality = DataQuality {
        dropped_rows,
        ..DataQuality::default()
    };
    clean(columns, records, quality)
}

/// Re-run column post-processing over an existing snapshot.
///
/// Normalized snapshots are fixed points: the returned records and columns
/// equal the input's. Blank rows were already dropped from the raw text, so
/// no row is dropped here. The quality tally reflects only this pass.
pub fn renormalize(snapshot: &BoardSnapshot) -> BoardSnapshot {
    clean(
        snapshot.columns().to_vec(),
        snapshot.records().to_vec(),
        DataQuality::default(),
    )
}

fn clean(columns: Vec<String>, records: Vec<Record>, mut quality: DataQuality) -> BoardSnapshot {
    let kinds: Vec<(String, ColumnKind)> = columns
        .iter()
        .map(|c| (c.clone(), ColumnKind::of(c)))
        .collect();

    let mut cleaned = Vec::with_capacity(records.len());

    for record in records {
        let mut out = Record::default();
        for (title, kind) in &kinds {
            let value = match record.get(title) {
                Some(value) => clean_cell(*kind, value, &mut quality),
                None => {
                    quality.missing_cells += 1;
                    kind.sentinel()
                }
            };
            out.set(title.clone(), value);
        }
        cleaned.push(out);
    }

    BoardSnapshot::new(columns, cleaned, quality)
}

/// Drop rows whose raw text is blank in every column.
fn drop_blank_rows(records: Vec<Record>, columns: &[String]) -> (Vec<Record>, usize) {
    let total = records.len();
    let kept: Vec<Record> = records
        .into_iter()
        .filter(|record| !is_blank_row(record, columns))
        .collect();
    let dropped = total - kept.len();
    (kept, dropped)
}

fn is_blank_row(record: &Record, columns: &[String]) -> bool {
    columns.iter().all(|c| match record.get(c) {
        None => true,
        Some(CellValue::Text(s)) => s.trim().is_empty(),
        Some(_) => false,
    })
}

fn clean_cell(kind: ColumnKind, value: &CellValue, quality: &mut DataQuality) -> CellValue {
    match (kind, value) {
        (ColumnKind::Text, CellValue::Text(s)) => CellValue::Text(s.trim().to_string()),
        (ColumnKind::Text, CellValue::Missing) => kind.sentinel(),
        (ColumnKind::Text, other) => CellValue::Text(other.to_string()),

        (ColumnKind::Numeric, CellValue::Number(n)) if n.is_finite() => CellValue::Number(*n),
        (ColumnKind::Numeric, CellValue::Text(s)) => match parse_amount(s) {
            Some(n) => CellValue::Number(n),
            None => {
                quality.coerced_numeric += 1;
                kind.sentinel()
            }
        },
        (ColumnKind::Numeric, _) => {
            quality.coerced_numeric += 1;
            kind.sentinel()
        }

        (ColumnKind::Date, CellValue::Timestamp(ts)) => CellValue::Timestamp(*ts),
        (ColumnKind::Date, CellValue::Missing) => CellValue::Missing,
        (ColumnKind::Date, other) => match parse_timestamp(&other.to_string()) {
            Some(ts) => CellValue::Timestamp(ts),
            None => {
                quality.null_dates += 1;
                CellValue::Missing
            }
        },
    }
}

/// Parse a money-like cell: `"₹1,234.50"` → `1234.5`, `"45%"` → `45`.
pub fn parse_amount(text: &str) -> Option<f64> {
    let stripped: String = text
        .chars()
        .filter(|c| !STRIPPED_FROM_AMOUNTS.contains(c))
        .collect();
    parse_finite(&stripped)
}

/// Parse a calendar date or date-time; naive values are read as UTC.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.with_timezone(&Utc));
    }

    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn column_kind_by_title() {
        assert_eq!(ColumnKind::of("deal value (₹)"), ColumnKind::Numeric);
        assert_eq!(ColumnKind::of("amount"), ColumnKind::Numeric);
        assert_eq!(ColumnKind::of("close date"), ColumnKind::Date);
        assert_eq!(ColumnKind::of("value date"), ColumnKind::Numeric);
        assert_eq!(ColumnKind::of("sector"), ColumnKind::Text);
    }

    #[test]
    fn amount_strips_glyphs() {
        assert_eq!(parse_amount("₹1,234.50"), Some(1234.5));
        assert_eq!(parse_amount("45%"), Some(45.0));
        assert_eq!(parse_amount("₹ 2,000"), Some(2000.0));
        assert_eq!(parse_amount("TBD"), None);
        assert_eq!(parse_amount(""), None);
    }

    #[test]
    fn timestamp_formats() {
        let ts = parse_timestamp("2024-03-15").unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day()), (2024, 3, 15));

        assert!(parse_timestamp("2024-03-15 09:30").is_some());
        assert!(parse_timestamp("2024-03-15T09:30:00Z").is_some());
        assert!(parse_timestamp("03/15/2024").is_some());
        assert!(parse_timestamp("15 Mar 2024").is_some());
        assert!(parse_timestamp("Mar 15, 2024").is_some());
        assert!(parse_timestamp("next week").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn formatted_timestamp_round_trips() {
        let ts = parse_timestamp("2024-03-15 09:30:00").unwrap();
        let rendered = CellValue::Timestamp(ts).to_string();
        assert_eq!(parse_timestamp(&rendered), Some(ts));
    }

    #[test]
    fn titles_are_trimmed_and_lowercased() {
        assert_eq!(normalize_title("  Deal Value "), "deal value");
    }

    #[test]
    fn unknown_column_id_becomes_title() {
        let board = RawBoard::from_titles(["Sector"]).with_item("Acme", &[("Owner_X", "Ana")]);
        let snapshot = normalize(&board);
        assert_eq!(snapshot.columns(), ["item", "sector", "owner_x"]);
        assert_eq!(
            snapshot.records()[0].get("owner_x"),
            Some(&CellValue::from("Ana"))
        );
    }

    #[test]
    fn colliding_titles_keep_later_cell() {
        let mut board = RawBoard::from_titles(["Stage", " stage"]);
        board.columns[1].id = "stage2".to_string();
        let board = board.with_item("Acme", &[("Stage", "Lead"), ("stage2", "Won")]);

        let snapshot = normalize(&board);
        assert_eq!(snapshot.columns(), ["item", "stage"]);
        assert_eq!(
            snapshot.records()[0].get("stage"),
            Some(&CellValue::from("Won"))
        );
    }

    #[test]
    fn blank_rows_are_dropped() {
        let board = RawBoard::from_titles(["Sector"])
            .with_item("  ", &[("Sector", " ")])
            .with_item("Acme", &[("Sector", "Tech")]);
        let snapshot = normalize(&board);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.quality().dropped_rows, 1);
    }

    #[test]
    fn absent_cells_collapse_to_sentinels() {
        let board = RawBoard::from_titles(["Deal Value", "Close Date", "Sector"])
            .with_item("Acme", &[]);
        let snapshot = normalize(&board);
        let record = &snapshot.records()[0];

        assert_eq!(record.get("deal value"), Some(&CellValue::Number(0.0)));
        assert_eq!(record.get("close date"), Some(&CellValue::Missing));
        assert_eq!(record.get("sector"), Some(&CellValue::from("0")));
        assert_eq!(snapshot.quality().missing_cells, 3);
    }

    #[test]
    fn renormalize_keeps_row_with_only_a_bad_date() {
        let board =
            RawBoard::from_titles(["Close Date"]).with_item("  ", &[("Close Date", "someday")]);
        let once = normalize(&board);
        assert_eq!(once.len(), 1);
        assert_eq!(
            once.records()[0].get("close date"),
            Some(&CellValue::Missing)
        );

        let twice = renormalize(&once);
        assert_eq!(twice.records(), once.records());
        assert_eq!(twice.quality().dropped_rows, 0);
    }

    #[test]
    fn empty_text_in_text_column_stays_empty() {
        let board = RawBoard::from_titles(["Sector", "Owner"])
            .with_item("Acme", &[("Sector", ""), ("Owner", "Ana")]);
        let snapshot = normalize(&board);
        assert_eq!(
            snapshot.records()[0].get("sector"),
            Some(&CellValue::from(""))
        );
    }
}
