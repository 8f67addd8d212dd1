//! Historical revenue dataset

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::calendar::YearMonth;

/// Client label used for records without a client
pub const UNASSIGNED_CLIENT: &str = "Unassigned";

/// A single invoiced revenue entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueRecord {
    pub date: NaiveDate,
    pub amount: f64,
    pub client_id: Option<String>,
}

impl RevenueRecord {
    pub fn new(date: NaiveDate, amount: f64, client_id: Option<&str>) -> Self {
        Self {
            date,
            amount,
            client_id: client_id.map(str::to_string),
        }
    }
}

/// Revenue total for one calendar month of one year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRevenue {
    pub period: YearMonth,
    pub label: String,
    pub revenue: f64,
}

/// Revenue total for one calendar quarter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarterlyRevenue {
    pub year: i32,
    pub quarter: u32,
    pub label: String,
    pub revenue: f64,
}

/// Summary statistics over monthly totals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RevenueStatistics {
    pub average_revenue: f64,
    pub min_revenue: f64,
    pub max_revenue: f64,
    pub total_periods: usize,
}

/// Total revenue attributed to a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRevenue {
    pub client: String,
    pub revenue: f64,
}

/// Immutable collection of historical revenue records
///
/// Everything derived from it (seasonality, baseline revenue) must be
/// recomputed when a new dataset replaces it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricalDataset {
    records: Vec<RevenueRecord>,
}

impl HistoricalDataset {
    pub fn new(mut records: Vec<RevenueRecord>) -> Self {
        records.sort_by_key(|r| r.date);
        Self { records }
    }

    pub fn records(&self) -> &[RevenueRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Revenue per (year, month), ascending
    pub fn monthly_totals(&self) -> Vec<MonthlyRevenue> {
        let mut totals: BTreeMap<YearMonth, f64> = BTreeMap::new();
        for record in &self.records {
            *totals.entry(YearMonth::of(record.date)).or_insert(0.0) += record.amount;
        }

        totals
            .into_iter()
            .map(|(period, revenue)| MonthlyRevenue {
                period,
                label: period.label(),
                revenue,
            })
            .collect()
    }

    /// Revenue per (year, quarter), ascending
    pub fn quarterly_totals(&self) -> Vec<QuarterlyRevenue> {
        let mut totals: BTreeMap<(i32, u32), f64> = BTreeMap::new();
        for month in self.monthly_totals() {
            *totals
                .entry((month.period.year, month.period.month.quarter()))
                .or_insert(0.0) += month.revenue;
        }

        totals
            .into_iter()
            .map(|((year, quarter), revenue)| QuarterlyRevenue {
                year,
                quarter,
                label: format!("Q{} {}", quarter, year),
                revenue,
            })
            .collect()
    }

    /// Average of the most recent `trailing_months` monthly totals
    ///
    /// Uses every available month when fewer exist. Returns 0 for an empty dataset.
    pub fn baseline_revenue(&self, trailing_months: usize) -> f64 {
        let totals = self.monthly_totals();
        if totals.is_empty() || trailing_months == 0 {
            return 0.0;
        }
        let window = &totals[totals.len().saturating_sub(trailing_months)..];
        window.iter().map(|m| m.revenue).sum::<f64>() / window.len() as f64
    }

    /// Average, minimum and maximum monthly revenue
    pub fn statistics(&self) -> RevenueStatistics {
        let revenues: Vec<f64> = self.monthly_totals().iter().map(|m| m.revenue).collect();
        if revenues.is_empty() {
            return RevenueStatistics::default();
        }

        RevenueStatistics {
            average_revenue: revenues.iter().sum::<f64>() / revenues.len() as f64,
            min_revenue: revenues.iter().copied().fold(f64::INFINITY, f64::min),
            max_revenue: revenues.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            total_periods: revenues.len(),
        }
    }

    /// Clients ranked by total revenue, highest first
    pub fn top_clients(&self, limit: usize) -> Vec<ClientRevenue> {
        let mut by_client: HashMap<&str, f64> = HashMap::new();
        for record in &self.records {
            let client = record.client_id.as_deref().unwrap_or(UNASSIGNED_CLIENT);
            *by_client.entry(client).or_insert(0.0) += record.amount;
        }

        let mut ranked: Vec<ClientRevenue> = by_client
            .into_iter()
            .map(|(client, revenue)| ClientRevenue {
                client: client.to_string(),
                revenue,
            })
            .collect();

        // Name as tie-breaker keeps the order stable across HashMap iteration orders
        ranked.sort_by(|a, b| {
            b.revenue
                .total_cmp(&a.revenue)
                .then_with(|| a.client.cmp(&b.client))
        });
        ranked.truncate(limit);
        ranked
    }

    /// Last `months` monthly totals, ascending
    pub fn revenue_trend(&self, months: usize) -> Vec<MonthlyRevenue> {
        let totals = self.monthly_totals();
        let start = totals.len().saturating_sub(months);
        totals[start..].to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::CalendarMonth;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> HistoricalDataset {
        HistoricalDataset::new(vec![
            RevenueRecord::new(date(2024, 2, 10), 50_000.0, Some("Kluane")),
            RevenueRecord::new(date(2024, 1, 5), 100_000.0, Some("Explomin")),
            RevenueRecord::new(date(2024, 1, 20), 20_000.0, Some("Kluane")),
            RevenueRecord::new(date(2024, 4, 2), 90_000.0, None),
            RevenueRecord::new(date(2024, 3, 15), 80_000.0, Some("Explomin")),
        ])
    }

    #[test]
    fn test_records_sorted_by_date() {
        let dataset = sample();
        let dates: Vec<NaiveDate> = dataset.records().iter().map(|r| r.date).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);
    }

    #[test]
    fn test_monthly_totals() {
        let totals = sample().monthly_totals();
        assert_eq!(totals.len(), 4);
        assert_eq!(totals[0].period, YearMonth::new(2024, CalendarMonth::January));
        assert_relative_eq!(totals[0].revenue, 120_000.0);
        assert_eq!(totals[0].label, "Jan 2024");
        assert_relative_eq!(totals[3].revenue, 90_000.0);
    }

    #[test]
    fn test_quarterly_totals() {
        let quarters = sample().quarterly_totals();
        assert_eq!(quarters.len(), 2);
        assert_eq!(quarters[0].label, "Q1 2024");
        assert_relative_eq!(quarters[0].revenue, 250_000.0);
        assert_eq!(quarters[1].quarter, 2);
        assert_relative_eq!(quarters[1].revenue, 90_000.0);
    }

    #[test]
    fn test_baseline_uses_trailing_window() {
        let dataset = sample();
        // Last two months: March 80k, April 90k
        assert_relative_eq!(dataset.baseline_revenue(2), 85_000.0);
        // Window longer than history uses everything
        assert_relative_eq!(dataset.baseline_revenue(6), 340_000.0 / 4.0);
        assert_eq!(HistoricalDataset::default().baseline_revenue(6), 0.0);
    }

    #[test]
    fn test_statistics() {
        let stats = sample().statistics();
        assert_eq!(stats.total_periods, 4);
        assert_relative_eq!(stats.min_revenue, 50_000.0);
        assert_relative_eq!(stats.max_revenue, 120_000.0);
        assert_relative_eq!(stats.average_revenue, 85_000.0);

        let empty = HistoricalDataset::default().statistics();
        assert_eq!(empty, RevenueStatistics::default());
    }

    #[test]
    fn test_top_clients() {
        let top = sample().top_clients(5);
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].client, "Explomin");
        assert_relative_eq!(top[0].revenue, 180_000.0);
        assert_eq!(top[1].client, UNASSIGNED_CLIENT);
        assert_eq!(top[2].client, "Kluane");

        assert_eq!(sample().top_clients(1).len(), 1);
    }

    #[test]
    fn test_revenue_trend() {
        let trend = sample().revenue_trend(2);
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].label, "Mar 2024");
        assert_eq!(trend[1].label, "Apr 2024");
    }
}
