//! Period simulator: one book, 24 fortnights.

use chrono::Datelike;
use kdp_core::{Book, BookProjection, Half, PeriodKey, PeriodRecord};
use kdp_econ::{demand, evaluate_period, price_tiers, to_f64, PriceTiers, ProfitParams};
use kdp_optimizer::optimize_budget;
use rust_decimal::Decimal;
use tracing::{debug, trace};

use crate::aggregate::summarize;

/// Months covered by a projection.
pub const HORIZON_MONTHS: u32 = 12;
/// Records emitted per book.
pub const PERIODS_PER_BOOK: usize = (HORIZON_MONTHS * 2) as usize;
/// Last launch day-of-month that still sells in the first half of the launch month.
pub const FIRST_HALF_CUTOFF_DAY: u32 = 10;

/// Whether the first half of the launch month is simulated.
pub fn first_half_active(book: &Book) -> bool {
    book.launch_date.day() <= FIRST_HALF_CUTOFF_DAY
}

/// Launch and normal prices in effect for `book`.
pub fn effective_prices(book: &Book) -> PriceTiers {
    if book.manual_pricing {
        PriceTiers {
            launch: book.price_launch,
            normal: book.price_normal,
        }
    } else {
        price_tiers(book.quality)
    }
}

/// Simulate `book` over the horizon.
///
/// Returns exactly [`PERIODS_PER_BOOK`] records in chronological order. A
/// gated first half is emitted as an all-zero record, and ages are counted
/// from the first active period, which is also the launch period.
pub fn simulate_book(book: &Book) -> Vec<PeriodRecord> {
    let prices = effective_prices(book);
    let mut periods = Vec::with_capacity(PERIODS_PER_BOOK);
    let mut age: Option<u32> = None;

    for month in 0..HORIZON_MONTHS {
        for half in Half::ALL {
            let key = PeriodKey::offset(book.launch_date, month, half);
            if month == 0 && half == Half::First && !first_half_active(book) {
                periods.push(PeriodRecord::empty(key));
                continue;
            }
            let current = age.map_or(0, |a| a + 1);
            age = Some(current);
            periods.push(simulate_period(book, &prices, key, current));
        }
    }

    debug!(
        book = %book.id,
        auto = book.auto_optimize,
        active = age.map_or(0, |a| a + 1),
        "book simulated"
    );
    periods
}

fn simulate_period(book: &Book, prices: &PriceTiers, key: PeriodKey, age: u32) -> PeriodRecord {
    let is_launch = age == 0;
    let price = if is_launch { prices.launch } else { prices.normal };
    // The optimizer sees full organic demand; ghost mode is applied after
    // the budget is fixed.
    let params = ProfitParams::new(book, price, &demand(book, age));

    let (amazon_spend, facebook_spend) = if book.auto_optimize {
        let decision = optimize_budget(&params, book.genre, is_launch);
        trace!(period = %key, budget = decision.budget, "auto budget");
        (decision.amazon_spend, decision.facebook_spend)
    } else {
        (
            to_f64(book.amazon_ad_budget / Decimal::TWO),
            to_f64(book.facebook_ad_budget / Decimal::TWO),
        )
    };
    let total_ad_spend = amazon_spend + facebook_spend;
    let params = if total_ad_spend <= 0.0 {
        params.ghosted()
    } else {
        params
    };
    let outcome = evaluate_period(total_ad_spend, &params);

    PeriodRecord {
        period_key: key,
        label: key.label(),
        month_label: key.month_label(),
        is_first_half: key.is_first_half(),
        units_sold: outcome.units_sold,
        ku_reads: outcome.ku_reads,
        gross_revenue: outcome.gross_revenue,
        amazon_spend,
        facebook_spend,
        total_ad_spend,
        net_profit: outcome.net_profit,
    }
}

/// Simulate `book` and summarize it on its own.
pub fn project_book(book: &Book) -> BookProjection {
    let periods = simulate_book(book);
    let summary = summarize(&periods);
    BookProjection {
        book_id: book.id.clone(),
        title: book.title.clone(),
        periods,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use kdp_core::{BookId, Genre};

    fn scenario_book(day: u32) -> Book {
        Book {
            id: BookId("scenario".to_string()),
            title: "Scenario".to_string(),
            launch_date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
            quality: 7,
            initial_reviews: 0,
            genre: Genre::Fiction,
            word_count: 50_000,
            is_series: false,
            series_ltv: Decimal::ZERO,
            manual_pricing: false,
            price_launch: Decimal::new(299, 2),
            price_normal: Decimal::new(799, 2),
            amazon_ad_budget: Decimal::new(60, 0),
            facebook_ad_budget: Decimal::new(60, 0),
            auto_optimize: false,
        }
    }

    #[test]
    fn early_launch_sells_in_first_half() {
        let periods = simulate_book(&scenario_book(5));
        assert_eq!(periods.len(), PERIODS_PER_BOOK);
        let p0 = &periods[0];
        assert_eq!(p0.period_key.to_string(), "2025-01-H1");
        assert_eq!(p0.amazon_spend, 30.0);
        assert_eq!(p0.facebook_spend, 30.0);
        assert_eq!(p0.total_ad_spend, 60.0);
        // 56 organic + 14.64 paid at launch price 2.99 / 70%
        assert_eq!(p0.units_sold, 70);
        let expected = 70.0 * 2.99 * 0.70 + 105.0 * 200.0 * 0.004;
        assert!((p0.gross_revenue - expected).abs() < 1e-9);
    }

    #[test]
    fn late_launch_gates_first_half() {
        let periods = simulate_book(&scenario_book(20));
        let p0 = &periods[0];
        assert_eq!(p0.units_sold, 0);
        assert_eq!(p0.total_ad_spend, 0.0);
        assert_eq!(p0.net_profit, 0.0);
        assert_eq!(p0.gross_revenue, 0.0);
        // Second half is the launch period: honeymoon demand at the launch price.
        let early = simulate_book(&scenario_book(5));
        assert_eq!(periods[1].units_sold, early[0].units_sold);
        assert_eq!(periods[1].gross_revenue, early[0].gross_revenue);
        assert_eq!(periods[1].period_key.to_string(), "2025-01-H2");
    }

    #[test]
    fn normal_price_after_launch() {
        let mut b = scenario_book(5);
        b.manual_pricing = true;
        b.price_launch = Decimal::new(99, 2);
        b.price_normal = Decimal::new(1299, 2);
        b.amazon_ad_budget = Decimal::ZERO;
        b.facebook_ad_budget = Decimal::ZERO;
        let periods = simulate_book(&b);
        // 0.99 and 12.99 both sit in the 35% tier; ghost mode applies.
        let p0 = &periods[0];
        assert_eq!(p0.units_sold, 33);
        let launch_rev = 33.0 * 0.99 * 0.35 + (33.0_f64 * 1.5).floor() * 200.0 * 0.004;
        assert!((p0.gross_revenue - launch_rev).abs() < 1e-9);
        let p1 = &periods[1];
        let per_unit_after = p1.gross_revenue / p1.units_sold as f64;
        assert!(per_unit_after > 12.99 * 0.35);
    }

    #[test]
    fn zero_budget_triggers_ghost_mode() {
        let mut b = scenario_book(5);
        b.amazon_ad_budget = Decimal::ZERO;
        b.facebook_ad_budget = Decimal::ZERO;
        let p0 = &simulate_book(&b)[0];
        assert_eq!(p0.units_sold, 33);
        assert_eq!(p0.net_profit, p0.gross_revenue);
    }

    #[test]
    fn unprofitable_auto_book_never_spends() {
        let mut b = scenario_book(5);
        b.quality = 3;
        b.auto_optimize = true;
        let periods = simulate_book(&b);
        assert!(periods.iter().all(|p| p.total_ad_spend == 0.0));
        assert!(periods.iter().all(|p| p.net_profit >= 0.0));
    }

    #[test]
    fn auto_book_at_zero_budget_is_ghosted() {
        let mut b = scenario_book(5);
        b.quality = 3;
        b.auto_optimize = true;
        let periods = simulate_book(&b);
        // Launch organic is 3 * 4 / 2 * 4.0 = 24; ghost mode keeps 60%.
        assert_eq!(periods[0].total_ad_spend, 0.0);
        assert_eq!(periods[0].units_sold, 14);
        for (age, p) in periods.iter().enumerate() {
            let organic = demand(&b, age as u32).organic_sales;
            assert_eq!(p.units_sold, (organic * 0.6).floor() as u64, "age {age}");
        }
    }

    #[test]
    fn late_manual_launch_prices_follow_first_active_period() {
        let mut b = scenario_book(20);
        b.manual_pricing = true;
        b.price_launch = Decimal::new(99, 2);
        b.price_normal = Decimal::new(1299, 2);
        let periods = simulate_book(&b);
        let sales_per_unit = |p: &PeriodRecord| {
            let ku = p.ku_reads as f64 * 200.0 * 0.004;
            (p.gross_revenue - ku) / p.units_sold as f64
        };
        assert_eq!(periods[0].units_sold, 0);
        let launch = &periods[1];
        assert_eq!(launch.period_key.to_string(), "2025-01-H2");
        assert!((sales_per_unit(launch) - 0.99 * 0.35).abs() < 1e-9);
        let next = &periods[2];
        assert_eq!(next.period_key.to_string(), "2025-02-H1");
        assert!((sales_per_unit(next) - 12.99 * 0.35).abs() < 1e-9);
    }

    #[test]
    fn auto_book_spends_at_launch_when_ads_pay() {
        let mut b = scenario_book(5);
        b.quality = 10;
        b.genre = Genre::Business;
        b.auto_optimize = true;
        let periods = simulate_book(&b);
        let p0 = &periods[0];
        assert!(p0.total_ad_spend > 0.0 && p0.total_ad_spend < 1000.0);
        assert_eq!(p0.total_ad_spend % 25.0, 0.0);
        assert_eq!(p0.amazon_spend, (p0.total_ad_spend * 0.8).round());
    }

    #[test]
    fn project_book_summarizes_its_periods() {
        let proj = project_book(&scenario_book(5));
        assert_eq!(proj.book_id, BookId("scenario".to_string()));
        let revenue: f64 = proj.periods.iter().map(|p| p.gross_revenue).sum();
        assert!((proj.summary.total_revenue - revenue).abs() < 1e-6);
        assert_eq!(proj.summary.total_ad_spend, 24.0 * 60.0);
    }
}
