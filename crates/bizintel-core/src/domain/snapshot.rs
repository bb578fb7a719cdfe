//! Normalized records and board snapshots.

use crate::domain::cell::CellValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Title of the synthetic column holding an item's display name.
pub const ITEM_COLUMN: &str = "item";

/// One normalized row keyed by normalized column title.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    cells: BTreeMap<String, CellValue>,
}

impl Record {
    /// Start a record holding only the synthetic `item` cell.
    pub fn new(item: impl Into<String>) -> Self {
        let mut cells = BTreeMap::new();
        cells.insert(ITEM_COLUMN.to_string(), CellValue::Text(item.into()));
        Self { cells }
    }

    /// Builder form of [`Record::set`].
    pub fn with(mut self, title: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.set(title, value.into());
        self
    }

    /// Set a cell; an existing value under the same title is overwritten.
    pub fn set(&mut self, title: impl Into<String>, value: CellValue) {
        self.cells.insert(title.into(), value);
    }

    pub fn get(&self, title: &str) -> Option<&CellValue> {
        self.cells.get(title)
    }

    /// Display name of the item, if the `item` cell holds text.
    pub fn item(&self) -> &str {
        self.get(ITEM_COLUMN)
            .and_then(CellValue::as_text)
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Per-snapshot tally of degradations absorbed during normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataQuality {
    /// Rows dropped because every cell was blank.
    pub dropped_rows: usize,
    /// Numeric cells that failed to parse and became zero.
    pub coerced_numeric: usize,
    /// Date cells that failed to parse and became the null timestamp.
    pub null_dates: usize,
    /// Schema columns an item carried no cell for.
    pub missing_cells: usize,
}

impl DataQuality {
    pub fn is_clean(&self) -> bool {
        *self == DataQuality::default()
    }
}

/// Rectangular set of normalized records with an ordered column list.
///
/// Immutable once built; every record has an entry for every column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    columns: Vec<String>,
    records: Vec<Record>,
    #[serde(default)]
    quality: DataQuality,
}

impl BoardSnapshot {
    pub fn new(columns: Vec<String>, records: Vec<Record>, quality: DataQuality) -> Self {
        Self {
            columns,
            records,
            quality,
        }
    }

    /// Column titles in schema order, `item` first.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn quality(&self) -> DataQuality {
        self.quality
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_starts_with_item() {
        let record = Record::new("Acme");
        assert_eq!(record.item(), "Acme");
        assert_eq!(record.len(), 1);
    }

    #[test]
    fn later_set_overwrites() {
        let record = Record::new("Acme").with("stage", "Lead").with("stage", "Won");
        assert_eq!(record.get("stage"), Some(&CellValue::from("Won")));
    }

    #[test]
    fn quality_default_is_clean() {
        assert!(DataQuality::default().is_clean());
        let q = DataQuality {
            null_dates: 1,
            ..Default::default()
        };
        assert!(!q.is_clean());
    }
}
