#![deny(warnings)]

//! Ad budget optimizer for auto-optimized books.
//!
//! Spend is chosen by scanning a fixed $25 grid from $0 to $1000 and
//! keeping the first budget with the highest period profit. The grid is part
//! of the model: a finer step changes projected output.

use kdp_core::Genre;
use kdp_econ::{period_profit, ProfitParams};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Spacing of candidate budgets, USD per fortnight.
pub const BUDGET_STEP: f64 = 25.0;
/// Number of steps above zero; the largest candidate is 1000.
pub const BUDGET_STEPS: u32 = 40;

/// Candidate fortnightly budgets in ascending order: 0, 25, ..., 1000.
pub fn budget_grid() -> impl Iterator<Item = f64> {
    (0..=BUDGET_STEPS).map(|i| i as f64 * BUDGET_STEP)
}

/// Fraction of auto-optimized spend routed to Amazon Ads per genre.
pub fn amazon_share(genre: Genre) -> f64 {
    match genre {
        Genre::Fiction => 0.4,
        Genre::NonFiction => 0.7,
        Genre::Business => 0.8,
    }
}

/// Split `budget` into (amazon, facebook). Amazon gets its genre share
/// rounded to whole dollars, Facebook the remainder.
pub fn platform_split(budget: f64, genre: Genre) -> (f64, f64) {
    let amazon = (budget * amazon_share(genre)).round();
    (amazon, budget - amazon)
}

/// Spend chosen for one period.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BudgetDecision {
    pub budget: f64,
    pub amazon_spend: f64,
    pub facebook_spend: f64,
    /// Objective value at `budget`, with full organic demand.
    pub expected_profit: f64,
}

/// Pick the profit-maximizing budget on the grid.
///
/// Ties keep the smaller budget. Outside the launch period a losing best
/// budget is replaced by zero spend whenever zero is at least as good.
pub fn optimize_budget(params: &ProfitParams, genre: Genre, is_launch: bool) -> BudgetDecision {
    let mut best_budget = 0.0;
    let mut best_profit = f64::NEG_INFINITY;
    for budget in budget_grid() {
        let profit = period_profit(budget, params);
        if profit > best_profit {
            best_profit = profit;
            best_budget = budget;
        }
    }

    if best_profit < 0.0 && !is_launch {
        let zero_profit = period_profit(0.0, params);
        if zero_profit >= best_profit {
            best_budget = 0.0;
            best_profit = zero_profit;
        }
    }

    let (amazon_spend, facebook_spend) = platform_split(best_budget, genre);
    trace!(
        budget = best_budget,
        profit = best_profit,
        is_launch,
        "budget optimized"
    );
    BudgetDecision {
        budget: best_budget,
        amazon_spend,
        facebook_spend,
        expected_profit: best_profit,
    }
}
