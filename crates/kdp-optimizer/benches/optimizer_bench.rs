use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kdp_core::Genre;
use kdp_econ::ProfitParams;

fn params(effective_cpa: f64, organic_sales: f64) -> ProfitParams {
    ProfitParams {
        price: 7.99,
        royalty_rate: 0.70,
        effective_cpa,
        organic_sales,
        series_ltv: 1.5,
        word_count: 80_000.0,
        reads_per_sale: 1.5,
        is_series: true,
    }
}

fn bench_scan(c: &mut Criterion) {
    let cases: Vec<ProfitParams> = (0..24)
        .map(|age| params(3.0 * (1.0 + age as f64 * 0.025), 40.0 * 0.95_f64.powi(age)))
        .collect();
    c.bench_function("optimize 24 periods x 41 budgets", |b| {
        b.iter(|| {
            for p in &cases {
                let _ = black_box(kdp_optimizer::optimize_budget(p, Genre::Business, false));
            }
        })
    });
}

criterion_group!(benches, bench_scan);
criterion_main!(benches);
