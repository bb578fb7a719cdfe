//! Metrics engine: headline numbers derived from normalized boards.
//!
//! Every figure degrades to its "unavailable" form when a role cannot be
//! resolved: sums become `0`, breakdowns empty, and risk/quarter absent.

use crate::domain::{BoardSnapshot, CellValue, Record};
use crate::roles::ResolvedRoles;
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Categorical probabilities, keyed by lowercased label.
pub const PROBABILITY_LABELS: [(&str, f64); 3] = [("high", 80.0), ("medium", 50.0), ("low", 20.0)];

/// Number of sectors kept in [`MetricsBundle::sector_totals`].
pub const SECTOR_REPORT_LIMIT: usize = 5;

/// Summed deal value for one sector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorTotal {
    pub sector: String,
    pub total: f64,
}

/// Share of grouped deal value held by the largest sector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcentrationRisk {
    pub dominant_sector: String,
    pub concentration_pct: f64,
}

/// Everything the dashboard and the question engine read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsBundle {
    pub total_pipeline: f64,
    pub weighted_forecast: f64,
    pub total_work_orders: usize,
    /// Descending by total, at most [`SECTOR_REPORT_LIMIT`] entries.
    pub sector_totals: Vec<SectorTotal>,
    pub risk: Option<ConcentrationRisk>,
    pub current_quarter_pipeline: Option<f64>,
    /// Deal-board columns the figures were computed from.
    pub roles: ResolvedRoles,
}

/// Compute a fresh bundle. `now` fixes the "current" quarter.
pub fn compute(
    deals: &BoardSnapshot,
    work_orders: &BoardSnapshot,
    now: DateTime<Utc>,
) -> MetricsBundle {
    let roles = ResolvedRoles::resolve(deals);
    let records = deals.records();

    let total_pipeline = match roles.deal_value.as_deref() {
        Some(value_col) => records.iter().map(|r| deal_value(r, value_col)).sum(),
        None => 0.0,
    };

    let weighted_forecast = match (roles.deal_value.as_deref(), roles.probability.as_deref()) {
        (Some(value_col), Some(prob_col)) => weighted_forecast(records, value_col, prob_col),
        _ => 0.0,
    };

    let (sector_totals, risk) = match (
        roles.deal_value.as_deref(),
        roles.industry_or_sector.as_deref(),
    ) {
        (Some(value_col), Some(sector_col)) => {
            let groups = group_by_sector(records, value_col, sector_col);
            let risk = concentration_risk(&groups);
            let top = groups.into_iter().take(SECTOR_REPORT_LIMIT).collect();
            (top, risk)
        }
        _ => (Vec::new(), None),
    };

    let current_quarter_pipeline = match (roles.deal_value.as_deref(), roles.date.as_deref()) {
        (Some(value_col), Some(date_col)) => {
            Some(quarter_pipeline(records, value_col, date_col, now))
        }
        _ => None,
    };

    MetricsBundle {
        total_pipeline,
        weighted_forecast,
        total_work_orders: work_orders.len(),
        sector_totals,
        risk,
        current_quarter_pipeline,
        roles,
    }
}

/// Numeric probability of a cell: a number as-is, else a categorical label.
///
/// Returns `None` for anything else; such deals are left out of the forecast
/// rather than counted as zero.
pub fn resolve_probability(cell: &CellValue) -> Option<f64> {
    if let Some(n) = cell.as_number() {
        return Some(n);
    }
    let label = cell.as_text()?.trim().to_lowercase();
    PROBABILITY_LABELS
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, pct)| *pct)
}

/// Calendar quarter (1-4) of a timestamp.
pub fn quarter_of(ts: &DateTime<Utc>) -> u32 {
    ts.month0() / 3 + 1
}

fn deal_value(record: &Record, value_col: &str) -> f64 {
    record
        .get(value_col)
        .and_then(CellValue::as_number)
        .unwrap_or(0.0)
}

fn weighted_forecast(records: &[Record], value_col: &str, prob_col: &str) -> f64 {
    records
        .iter()
        .filter_map(|r| {
            let pct = r.get(prob_col).and_then(resolve_probability)?;
            Some(deal_value(r, value_col) * pct / 100.0)
        })
        .sum()
}

/// Group sums sorted descending; ties keep ascending sector order.
fn group_by_sector(records: &[Record], value_col: &str, sector_col: &str) -> Vec<SectorTotal> {
    let mut sums: BTreeMap<String, f64> = BTreeMap::new();
    for record in records {
        let Some(sector) = record.get(sector_col) else {
            continue;
        };
        *sums.entry(sector.to_string()).or_insert(0.0) += deal_value(record, value_col);
    }

    let mut groups: Vec<SectorTotal> = sums
        .into_iter()
        .map(|(sector, total)| SectorTotal { sector, total })
        .collect();
    groups.sort_by(|a, b| b.total.total_cmp(&a.total));
    groups
}

fn concentration_risk(groups: &[SectorTotal]) -> Option<ConcentrationRisk> {
    let grand_total: f64 = groups.iter().map(|g| g.total).sum();
    if grand_total <= 0.0 {
        return None;
    }
    let dominant = groups.first()?;
    Some(ConcentrationRisk {
        dominant_sector: dominant.sector.clone(),
        concentration_pct: dominant.total / grand_total * 100.0,
    })
}

fn quarter_pipeline(
    records: &[Record],
    value_col: &str,
    date_col: &str,
    now: DateTime<Utc>,
) -> f64 {
    let current = quarter_of(&now);
    records
        .iter()
        .filter(|r| {
            r.get(date_col)
                .and_then(CellValue::as_timestamp)
                .is_some_and(|ts| quarter_of(&ts) == current)
        })
        .map(|r| deal_value(r, value_col))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DataQuality;
    use chrono::TimeZone;

    fn snapshot(columns: &[&str], records: Vec<Record>) -> BoardSnapshot {
        BoardSnapshot::new(
            columns.iter().map(|c| c.to_string()).collect(),
            records,
            DataQuality::default(),
        )
    }

    fn deal(value: f64, prob: &str, sector: &str) -> Record {
        Record::new("deal")
            .with("deal value", value)
            .with("probability", prob)
            .with("sector", sector)
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap()
    }

    /// Metrics for a deals board alone, work orders empty.
    fn compute_deals(columns: &[&str], records: Vec<Record>) -> MetricsBundle {
        compute(&snapshot(columns, records), &BoardSnapshot::default(), now())
    }

    #[test]
    fn probability_resolution() {
        assert_eq!(resolve_probability(&CellValue::from("High")), Some(80.0));
        assert_eq!(resolve_probability(&CellValue::from(" medium ")), Some(50.0));
        assert_eq!(resolve_probability(&CellValue::from("37")), Some(37.0));
        assert_eq!(resolve_probability(&CellValue::Number(12.0)), Some(12.0));
        assert_eq!(resolve_probability(&CellValue::from("unknown")), None);
        assert_eq!(resolve_probability(&CellValue::Missing), None);
    }

    #[test]
    fn weighted_forecast_contributions() {
        let cols = ["item", "deal value", "probability", "sector"];
        let high = compute_deals(&cols, vec![deal(1000.0, "High", "A")]);
        assert_eq!(high.weighted_forecast, 800.0);

        let numeric = compute_deals(&cols, vec![deal(1000.0, "37", "A")]);
        assert!((numeric.weighted_forecast - 370.0).abs() < 1e-9);

        let unknown = compute_deals(&cols, vec![deal(1000.0, "unknown", "A")]);
        assert_eq!(unknown.weighted_forecast, 0.0);
        assert_eq!(unknown.total_pipeline, 1000.0);
    }

    #[test]
    fn risk_from_sector_sums() {
        let cols = ["item", "deal value", "probability", "sector"];
        let records = vec![
            deal(400.0, "Low", "B"),
            deal(350.0, "Low", "A"),
            deal(250.0, "Low", "A"),
        ];
        let bundle = compute(&snapshot(&cols, records), &BoardSnapshot::default(), now());

        let risk = bundle.risk.expect("risk");
        assert_eq!(risk.dominant_sector, "A");
        assert!((risk.concentration_pct - 60.0).abs() < 1e-9);
        assert_eq!(bundle.sector_totals[0].sector, "A");
        assert_eq!(bundle.sector_totals[1].total, 400.0);
    }

    #[test]
    fn zero_total_has_no_risk() {
        let cols = ["item", "deal value", "probability", "sector"];
        let records = vec![deal(0.0, "High", "A"), deal(0.0, "High", "B")];
        let bundle = compute(&snapshot(&cols, records), &BoardSnapshot::default(), now());
        assert!(bundle.risk.is_none());
        assert_eq!(bundle.sector_totals.len(), 2);

        let empty = compute(&snapshot(&cols, Vec::new()), &BoardSnapshot::default(), now());
        assert!(empty.risk.is_none());
        assert!(empty.sector_totals.is_empty());
    }

    #[test]
    fn tied_sectors_keep_first_in_key_order() {
        let cols = ["item", "deal value", "probability", "sector"];
        let records = vec![deal(500.0, "High", "Retail"), deal(500.0, "High", "Energy")];
        let bundle = compute(&snapshot(&cols, records), &BoardSnapshot::default(), now());
        assert_eq!(bundle.risk.unwrap().dominant_sector, "Energy");
    }

    #[test]
    fn sector_breakdown_is_capped() {
        let cols = ["item", "deal value", "probability", "sector"];
        let records = (0..8)
            .map(|i| deal(100.0 * (i + 1) as f64, "Low", &format!("S{i}")))
            .collect();
        let bundle = compute(&snapshot(&cols, records), &BoardSnapshot::default(), now());
        assert_eq!(bundle.sector_totals.len(), SECTOR_REPORT_LIMIT);
        assert_eq!(bundle.sector_totals[0].sector, "S7");
        // Risk still sees every group.
        let pct = bundle.risk.unwrap().concentration_pct;
        assert!((pct - 800.0 / 3600.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn unresolved_roles_degrade() {
        let bundle = compute(
            &snapshot(&["item", "owner"], vec![Record::new("x").with("owner", "Ana")]),
            &snapshot(&["item"], vec![Record::new("wo-1"), Record::new("wo-2")]),
            now(),
        );
        assert_eq!(bundle.total_pipeline, 0.0);
        assert_eq!(bundle.weighted_forecast, 0.0);
        assert!(bundle.sector_totals.is_empty());
        assert!(bundle.risk.is_none());
        assert!(bundle.current_quarter_pipeline.is_none());
        assert_eq!(bundle.total_work_orders, 2);
    }

    #[test]
    fn quarter_pipeline_filters_by_quarter() {
        let cols = ["item", "deal value", "close date"];
        let ts = |m| CellValue::Timestamp(Utc.with_ymd_and_hms(2024, m, 1, 0, 0, 0).unwrap());
        let records = vec![
            Record::new("a").with("deal value", 100.0).with("close date", ts(4)),
            Record::new("b").with("deal value", 200.0).with("close date", ts(6)),
            Record::new("c").with("deal value", 400.0).with("close date", ts(7)),
            Record::new("d").with("deal value", 800.0).with("close date", CellValue::Missing),
        ];
        let bundle = compute(&snapshot(&cols, records), &BoardSnapshot::default(), now());
        assert_eq!(bundle.current_quarter_pipeline, Some(300.0));
    }

    #[test]
    fn quarter_of_months() {
        let q = |m| quarter_of(&Utc.with_ymd_and_hms(2024, m, 15, 0, 0, 0).unwrap());
        assert_eq!((q(1), q(3), q(4), q(9), q(10), q(12)), (1, 1, 2, 3, 4, 4));
    }
}
