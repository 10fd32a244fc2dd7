#![deny(warnings)]

//! Projection runtime: period simulation and portfolio aggregation.
//!
//! `simulate_book` turns one book into 24 fortnightly records, consulting
//! the budget optimizer for auto-optimized titles. `project_portfolio` runs
//! every book and merges the series by calendar period into portfolio KPIs.
//! Everything here is a pure function of its inputs: identical books give
//! bit-identical output.

pub mod aggregate;
pub mod sample;
pub mod simulate;

pub use aggregate::{merge_periods, project_portfolio, roi, summarize, ROI_SENTINEL};
pub use sample::sample_portfolio;
pub use simulate::{
    effective_prices, first_half_active, project_book, simulate_book, FIRST_HALF_CUTOFF_DAY,
    HORIZON_MONTHS, PERIODS_PER_BOOK,
};
