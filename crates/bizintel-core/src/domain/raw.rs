//! Raw board payloads as delivered by a [`BoardSource`](crate::source::BoardSource).

use serde::{Deserialize, Serialize};

/// One schema column: opaque id plus its human title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawColumn {
    pub id: String,
    pub title: String,
}

/// One cell of one item. `text` is `None` when the upstream sent `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCell {
    pub id: String,
    #[serde(default)]
    pub text: Option<String>,
}

impl RawCell {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: Some(text.into()),
        }
    }

    /// Cell text with an absent value read as the empty string.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

/// One board item (row).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawItem {
    pub name: String,
    #[serde(default)]
    pub column_values: Vec<RawCell>,
}

impl RawItem {
    pub fn new(name: impl Into<String>, column_values: Vec<RawCell>) -> Self {
        Self {
            name: name.into(),
            column_values,
        }
    }
}

/// Raw board: ordered schema plus items, untouched by normalization.
///
/// Column order is authoritative; role resolution tie-breaks on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawBoard {
    #[serde(default)]
    pub columns: Vec<RawColumn>,
    #[serde(default)]
    pub items: Vec<RawItem>,
}

impl RawBoard {
    /// Build a board whose column ids equal their titles. Handy for fixtures.
    pub fn from_titles<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns = titles
            .into_iter()
            .map(|t| {
                let title = t.into();
                RawColumn {
                    id: title.clone(),
                    title,
                }
            })
            .collect();
        Self {
            columns,
            items: Vec::new(),
        }
    }

    /// Append an item given `(column_id, text)` pairs.
    pub fn with_item(mut self, name: impl Into<String>, cells: &[(&str, &str)]) -> Self {
        let column_values = cells.iter().map(|(id, text)| RawCell::new(*id, *text)).collect();
        self.items.push(RawItem::new(name, column_values));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_text_reads_as_empty() {
        let cell: RawCell = serde_json::from_str(r#"{"id":"numbers","text":null}"#).unwrap();
        assert_eq!(cell.text(), "");
    }

    #[test]
    fn board_deserializes_upstream_shape() {
        let json = r#"{
            "columns": [{"id": "deal_value", "title": "Deal Value"}],
            "items": [{"name": "Acme", "column_values": [{"id": "deal_value", "text": "1,000"}]}]
        }"#;
        let board: RawBoard = serde_json::from_str(json).unwrap();
        assert_eq!(board.columns[0].title, "Deal Value");
        assert_eq!(board.items[0].column_values[0].text(), "1,000");
    }
}
