//! Column role resolution.
//!
//! A role is found by substring tests over normalized titles, scanning in
//! schema order; the first match wins. Roles are resolved once per snapshot
//! and the resolved titles are passed around explicitly.

use crate::domain::BoardSnapshot;
use serde::{Deserialize, Serialize};

/// Business meaning a column can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    DealValue,
    Probability,
    IndustryOrSector,
    Date,
}

impl ColumnRole {
    pub const ALL: [ColumnRole; 4] = [
        ColumnRole::DealValue,
        ColumnRole::Probability,
        ColumnRole::IndustryOrSector,
        ColumnRole::Date,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ColumnRole::DealValue => "deal_value",
            ColumnRole::Probability => "probability",
            ColumnRole::IndustryOrSector => "industry_or_sector",
            ColumnRole::Date => "date",
        }
    }
}

/// Find the column serving `role` in `snapshot`, if any.
pub fn resolve_role(snapshot: &BoardSnapshot, role: ColumnRole) -> Option<&str> {
    resolve_in(snapshot.columns(), role)
}

/// Find the column serving `role` among `columns`, scanning in order.
pub fn resolve_in(columns: &[String], role: ColumnRole) -> Option<&str> {
    match role {
        ColumnRole::DealValue => first_match(columns, |t| t.contains("deal") && t.contains("value"))
            .or_else(|| first_match(columns, |t| t.contains("value"))),
        ColumnRole::Probability => first_match(columns, |t| t.contains("prob")),
        ColumnRole::IndustryOrSector => {
            first_match(columns, |t| t.contains("industry") || t.contains("sector"))
        }
        ColumnRole::Date => first_match(columns, |t| t.contains("date")),
    }
}

fn first_match(columns: &[String], pred: impl Fn(&str) -> bool) -> Option<&str> {
    columns
        .iter()
        .map(String::as_str)
        .find(|title| pred(title.to_lowercase().as_str()))
}

/// All four roles resolved against one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRoles {
    pub deal_value: Option<String>,
    pub probability: Option<String>,
    pub industry_or_sector: Option<String>,
    pub date: Option<String>,
}

impl ResolvedRoles {
    pub fn resolve(snapshot: &BoardSnapshot) -> Self {
        let find = |role| resolve_role(snapshot, role).map(str::to_string);
        Self {
            deal_value: find(ColumnRole::DealValue),
            probability: find(ColumnRole::Probability),
            industry_or_sector: find(ColumnRole::IndustryOrSector),
            date: find(ColumnRole::Date),
        }
    }

    pub fn get(&self, role: ColumnRole) -> Option<&str> {
        match role {
            ColumnRole::DealValue => self.deal_value.as_deref(),
            ColumnRole::Probability => self.probability.as_deref(),
            ColumnRole::IndustryOrSector => self.industry_or_sector.as_deref(),
            ColumnRole::Date => self.date.as_deref(),
        }
    }

    /// Roles no column could be found for.
    pub fn unresolved(&self) -> Vec<ColumnRole> {
        ColumnRole::ALL
            .into_iter()
            .filter(|role| self.get(*role).is_none())
            .collect()
    }
}
