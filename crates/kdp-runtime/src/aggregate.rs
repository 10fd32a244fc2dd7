//! Portfolio aggregation: merge per-book series by calendar period.

use kdp_core::{Book, PeriodKey, PeriodRecord, PortfolioProjection, PortfolioSummary};
use std::collections::BTreeMap;
use tracing::debug;

use crate::simulate::project_book;

/// ROI reported when there is revenue but no recorded ad spend.
pub const ROI_SENTINEL: f64 = 1000.0;

/// Percent return on ad spend.
pub fn roi(total_revenue: f64, total_ad_spend: f64) -> f64 {
    if total_ad_spend > 0.0 {
        (total_revenue - total_ad_spend) / total_ad_spend * 100.0
    } else if total_revenue > 0.0 {
        ROI_SENTINEL
    } else {
        0.0
    }
}

/// Sum KPIs over `periods` and derive ROI and spend share.
pub fn summarize(periods: &[PeriodRecord]) -> PortfolioSummary {
    let mut s = PortfolioSummary::default();
    for p in periods {
        s.total_revenue += p.gross_revenue;
        s.total_ad_spend += p.total_ad_spend;
        s.total_net_profit += p.net_profit;
    }
    s.roi = roi(s.total_revenue, s.total_ad_spend);
    s.ad_spend_share = if s.total_revenue > 0.0 {
        s.total_ad_spend / s.total_revenue * 100.0
    } else {
        0.0
    };
    s
}

/// Merge period series keyed by `period_key`, summing metrics.
///
/// Display fields come from the first record seen for a key. Output is in
/// ascending key order. Inputs are not modified.
pub fn merge_periods<'a, I>(series: I) -> Vec<PeriodRecord>
where
    I: IntoIterator<Item = &'a [PeriodRecord]>,
{
    let mut merged: BTreeMap<PeriodKey, PeriodRecord> = BTreeMap::new();
    for records in series {
        for r in records {
            merged
                .entry(r.period_key)
                .and_modify(|acc| acc.absorb(r))
                .or_insert_with(|| r.clone());
        }
    }
    merged.into_values().collect()
}

/// Project every book and merge them into a portfolio view.
pub fn project_portfolio(books: &[Book]) -> PortfolioProjection {
    let projections: Vec<_> = books.iter().map(project_book).collect();
    let periods = merge_periods(projections.iter().map(|p| p.periods.as_slice()));
    let summary = summarize(&periods);
    debug!(
        books = books.len(),
        periods = periods.len(),
        revenue = summary.total_revenue,
        spend = summary.total_ad_spend,
        "portfolio projected"
    );
    PortfolioProjection {
        periods,
        summary,
        books: projections,
    }
}
