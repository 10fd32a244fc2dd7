//! Seeded sample portfolios for demos and benchmarks.

use chrono::NaiveDate;
use kdp_core::{Book, BookId, Genre};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rust_decimal::Decimal;

/// Generate `n` plausible books. Identical `(n, seed)` yields identical books.
pub fn sample_portfolio(n: usize, seed: u64) -> Vec<Book> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n).map(|i| sample_book(&mut rng, i + 1)).collect()
}

fn sample_book(rng: &mut ChaCha8Rng, ordinal: usize) -> Book {
    let genre = match rng.gen_range(0..3) {
        0 => Genre::Fiction,
        1 => Genre::NonFiction,
        _ => Genre::Business,
    };
    let month: u32 = rng.gen_range(1..=12);
    let day: u32 = rng.gen_range(1..=28);
    let launch_date = NaiveDate::from_ymd_opt(2025, month, day).unwrap_or_default();
    let is_series = rng.gen_bool(0.25);
    let series_ltv = if is_series {
        Decimal::new(rng.gen_range(100..=600), 2)
    } else {
        Decimal::ZERO
    };
    let manual_pricing = rng.gen_bool(0.2);
    Book {
        id: BookId(format!("sample-{ordinal}")),
        title: format!("Sample Title {ordinal}"),
        launch_date,
        quality: rng.gen_range(3..=10),
        initial_reviews: rng.gen_range(0..=250),
        genre,
        word_count: rng.gen_range(30..=120) * 1000,
        is_series,
        series_ltv,
        manual_pricing,
        price_launch: if manual_pricing {
            Decimal::new(99, 2)
        } else {
            Decimal::new(299, 2)
        },
        price_normal: Decimal::new(rng.gen_range(3..=9) * 100 + 99, 2),
        amazon_ad_budget: Decimal::new(rng.gen_range(0..=30) * 10, 0),
        facebook_ad_budget: Decimal::new(rng.gen_range(0..=20) * 10, 0),
        auto_optimize: rng.gen_bool(0.3),
    }
}
