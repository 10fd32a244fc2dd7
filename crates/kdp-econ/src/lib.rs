#![deny(warnings)]

//! Economic model for KDP titles: pricing, royalties, demand and profit.
//!
//! This crate provides the pure per-period building blocks used by the
//! simulator and the budget optimizer:
//! - Quality-driven launch/normal price tiers
//! - Royalty tiering by list price
//! - Organic and paid demand factors (social proof, ad fatigue, honeymoon, decay)
//! - The period profit function, shared by optimizer and final accounting
//!
//! The constants below are fixed model parameters. Changing any of them
//! changes projected output.

use kdp_core::{Book, Genre};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Subscription payout per normalized page read, in USD.
pub const KENP_RATE: f64 = 0.004;
/// Words per normalized subscription page.
pub const WORDS_PER_KENP_PAGE: f64 = 250.0;
/// Share of organic demand left when a period runs no ads ("ghost mode").
pub const GHOST_MODE_RETENTION: f64 = 0.6;
/// Fortnightly spend at which paid efficiency would reach zero before flooring.
pub const EFFICIENCY_DRAG_SPEND: f64 = 2500.0;
/// CPA growth per fortnight of continuous advertising.
pub const AD_FATIGUE_PER_FORTNIGHT: f64 = 0.025;

/// Launch and steady-state list prices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceTiers {
    pub launch: Decimal,
    pub normal: Decimal,
}

/// Automatic price tiers by quality score.
///
/// Example:
/// let t = price_tiers(9);
/// assert_eq!(t.normal, Decimal::new(999, 2));
pub fn price_tiers(quality: u8) -> PriceTiers {
    let (launch, normal) = if quality >= 9 {
        (399, 999)
    } else if quality >= 5 {
        (299, 799)
    } else {
        (99, 399)
    };
    PriceTiers {
        launch: Decimal::new(launch, 2),
        normal: Decimal::new(normal, 2),
    }
}

/// Royalty share for a list price: 70% inside [2.99, 9.99] inclusive, else 35%.
pub fn royalty_rate(price: Decimal) -> f64 {
    let low = Decimal::new(299, 2);
    let high = Decimal::new(999, 2);
    if price >= low && price <= high {
        0.70
    } else {
        0.35
    }
}

/// Lossy conversion used at the boundary between money inputs and the
/// floating point model. Non-representable values become 0.
pub fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// Demand multiplier applied to acquisition cost per genre.
pub fn genre_factor(genre: Genre) -> f64 {
    match genre {
        Genre::Fiction => 0.8,
        Genre::NonFiction => 1.1,
        Genre::Business => 1.5,
    }
}

/// Credibility boost with diminishing returns in review count.
pub fn social_proof(initial_reviews: u32) -> f64 {
    1.0 + (1.0 + initial_reviews as f64).ln() * 0.05
}

/// Honeymoon boost by fortnights since launch.
pub fn launch_multiplier(age: u32) -> f64 {
    match age {
        0 => 4.0,
        1 => 2.5,
        2 => 1.5,
        3 => 1.2,
        _ => 1.0,
    }
}

/// Month-over-month organic retention, floored at 50%.
pub fn retention_rate(quality: u8) -> f64 {
    (1.0 - (11.0 - quality as f64) * 0.02).max(0.5)
}

/// Subscription reads generated per unit sold.
pub fn reads_per_sale(quality: u8) -> f64 {
    if quality > 6 {
        1.5
    } else {
        0.8
    }
}

/// Demand factors for one book at one fortnight age.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Demand {
    pub social_proof: f64,
    pub genre_factor: f64,
    pub ad_fatigue: f64,
    /// Cost per paid unit before efficiency drag.
    pub effective_cpa: f64,
    pub launch_multiplier: f64,
    pub time_decay: f64,
    /// Organic units for the fortnight, before any ghost-mode penalty.
    pub organic_sales: f64,
}

/// Compute demand for `book` at `age` fortnights after its first active period.
pub fn demand(book: &Book, age: u32) -> Demand {
    let quality = book.quality as f64;
    let social_proof = social_proof(book.initial_reviews);
    let genre_factor = genre_factor(book.genre);
    let base_cpa = (12.0 - quality).max(1.5);
    let ad_fatigue = 1.0 + age as f64 * AD_FATIGUE_PER_FORTNIGHT;
    let effective_cpa = (base_cpa / social_proof) * genre_factor * ad_fatigue;

    let launch_multiplier = launch_multiplier(age);
    // Decay is expressed per month even though steps are fortnightly.
    let time_decay = retention_rate(book.quality).powf(age as f64 / 2.0);
    let base_organic = (quality * 4.0 * social_proof) / 2.0;
    let organic_sales = base_organic * launch_multiplier * time_decay;

    Demand {
        social_proof,
        genre_factor,
        ad_fatigue,
        effective_cpa,
        launch_multiplier,
        time_decay,
        organic_sales,
    }
}

/// Organic demand left in a period with zero ad spend.
pub fn ghost_mode(organic_sales: f64) -> f64 {
    organic_sales * GHOST_MODE_RETENTION
}

/// Everything the profit function needs for one period, independent of budget.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProfitParams {
    pub price: f64,
    pub royalty_rate: f64,
    pub effective_cpa: f64,
    pub organic_sales: f64,
    pub series_ltv: f64,
    pub word_count: f64,
    pub reads_per_sale: f64,
    pub is_series: bool,
}

impl ProfitParams {
    /// Bundle period parameters for `book` selling at `price` under `demand`.
    pub fn new(book: &Book, price: Decimal, demand: &Demand) -> Self {
        ProfitParams {
            price: to_f64(price),
            royalty_rate: royalty_rate(price),
            effective_cpa: demand.effective_cpa,
            organic_sales: demand.organic_sales,
            series_ltv: to_f64(book.series_ltv),
            word_count: book.word_count as f64,
            reads_per_sale: reads_per_sale(book.quality),
            is_series: book.is_series,
        }
    }

    /// Same parameters with organic demand reduced by ghost mode.
    pub fn ghosted(self) -> Self {
        ProfitParams {
            organic_sales: ghost_mode(self.organic_sales),
            ..self
        }
    }
}

/// Result of running one period at a given budget.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PeriodOutcome {
    pub units_sold: u64,
    pub ku_reads: u64,
    pub gross_revenue: f64,
    pub net_profit: f64,
}

/// Run the period accounting for `budget` of ad spend.
///
/// Paid units shrink with spend (efficiency drag, floored at 50%); units and
/// reads are floored; revenue is royalties plus subscription reads plus
/// series read-through.
pub fn evaluate_period(budget: f64, p: &ProfitParams) -> PeriodOutcome {
    let paid_sales = if budget > 0.0 {
        budget / p.effective_cpa
    } else {
        0.0
    };
    let efficiency_drag = (1.0 - budget / EFFICIENCY_DRAG_SPEND).max(0.5);
    let effective_paid_sales = paid_sales * efficiency_drag;

    let total_units = (effective_paid_sales + p.organic_sales).floor();
    let ku_reads = (total_units * p.reads_per_sale).floor();
    let ku_revenue = ku_reads * (p.word_count / WORDS_PER_KENP_PAGE) * KENP_RATE;

    let sales_revenue = total_units * p.price * p.royalty_rate;
    let series_revenue = if p.is_series {
        total_units * p.series_ltv
    } else {
        0.0
    };
    let gross_revenue = sales_revenue + ku_revenue + series_revenue;

    PeriodOutcome {
        units_sold: total_units as u64,
        ku_reads: ku_reads as u64,
        gross_revenue,
        net_profit: gross_revenue - budget,
    }
}

/// Net profit of a period at `budget`. Optimizer objective.
pub fn period_profit(budget: f64, params: &ProfitParams) -> f64 {
    evaluate_period(budget, params).net_profit
}
