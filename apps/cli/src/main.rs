#![deny(warnings)]

//! Headless CLI: project a book portfolio over the next 12 months.

use anyhow::{bail, Context, Result};
use kdp_core::{validate_portfolio, Book, PortfolioProjection, PortfolioSummary};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_SAMPLE_BOOKS: usize = 3;
const DEFAULT_SEED: u64 = 42;

#[derive(Debug, PartialEq)]
struct Args {
    portfolio: Option<PathBuf>,
    sample: Option<usize>,
    seed: u64,
    books: bool,
    json: bool,
    version: bool,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Args> {
    let mut parsed = Args {
        portfolio: None,
        sample: None,
        seed: DEFAULT_SEED,
        books: false,
        json: false,
        version: false,
    };
    let mut it = args.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--portfolio" => {
                let path = it.next().context("--portfolio needs a path")?;
                parsed.portfolio = Some(PathBuf::from(path));
            }
            "--sample" => {
                let n = it.next().context("--sample needs a count")?;
                parsed.sample = Some(n.parse().with_context(|| format!("bad --sample {n}"))?);
            }
            "--seed" => {
                let s = it.next().context("--seed needs a value")?;
                parsed.seed = s.parse().with_context(|| format!("bad --seed {s}"))?;
            }
            "--books" => parsed.books = true,
            "--json" => parsed.json = true,
            "--version" => parsed.version = true,
            other => bail!("unknown argument {other}"),
        }
    }
    Ok(parsed)
}

/// Portfolio files hold either a bare list of books or `{ books: [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum PortfolioFile {
    Wrapped { books: Vec<Book> },
    Bare(Vec<Book>),
}

impl PortfolioFile {
    fn into_books(self) -> Vec<Book> {
        match self {
            PortfolioFile::Wrapped { books } | PortfolioFile::Bare(books) => books,
        }
    }
}

fn parse_portfolio(text: &str, yaml: bool) -> Result<Vec<Book>> {
    let file: PortfolioFile = if yaml {
        serde_yaml::from_str(text).context("parsing YAML portfolio")?
    } else {
        serde_json::from_str(text).context("parsing JSON portfolio")?
    };
    Ok(file.into_books())
}

fn load_portfolio(path: &Path) -> Result<Vec<Book>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading portfolio {}", path.display()))?;
    let yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    parse_portfolio(&text, yaml).with_context(|| format!("in {}", path.display()))
}

fn print_summary(name: &str, s: &PortfolioSummary) {
    println!(
        "{} | revenue: ${:.2} | ad spend: ${:.2} ({:.1}% of revenue) | net profit: ${:.2} | ROI: {:.0}%",
        name, s.total_revenue, s.total_ad_spend, s.ad_spend_share, s.total_net_profit, s.roi
    );
}

fn print_projection(proj: &PortfolioProjection, per_book: bool) {
    println!(
        "{:<12} {:>8} {:>8} {:>12} {:>10} {:>10} {:>12}",
        "period", "units", "reads", "revenue", "amazon", "facebook", "profit"
    );
    for p in &proj.periods {
        println!(
            "{:<12} {:>8} {:>8} {:>12.2} {:>10.2} {:>10.2} {:>12.2}",
            p.label,
            p.units_sold,
            p.ku_reads,
            p.gross_revenue,
            p.amazon_spend,
            p.facebook_spend,
            p.net_profit
        );
    }
    if per_book {
        for b in &proj.books {
            let name = if b.title.is_empty() {
                b.book_id.to_string()
            } else {
                format!("{} ({})", b.title, b.book_id)
            };
            print_summary(&name, &b.summary);
        }
    }
    print_summary("Portfolio", &proj.summary);
}

/// `RUST_LOG`-style directives, falling back to `info` when unset or invalid.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn main() -> Result<()> {
    // Logging setup
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(directives.as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args(std::env::args().skip(1))?;
    if args.version {
        println!(
            "kdp-forecast {} ({} built {})",
            env!("CARGO_PKG_VERSION"),
            env!("GIT_SHA"),
            env!("BUILD_DATE")
        );
        return Ok(());
    }
    info!(portfolio = ?args.portfolio, sample = ?args.sample, seed = args.seed, "starting CLI");

    let books = match (&args.portfolio, args.sample) {
        (Some(_), Some(_)) => bail!("use either --portfolio or --sample, not both"),
        (Some(path), None) => load_portfolio(path)?,
        (None, n) => kdp_runtime::sample_portfolio(n.unwrap_or(DEFAULT_SAMPLE_BOOKS), args.seed),
    };
    validate_portfolio(&books).context("invalid portfolio")?;
    if books.is_empty() {
        println!("Portfolio is empty; add books to project.");
        return Ok(());
    }

    let proj = kdp_runtime::project_portfolio(&books);
    info!(
        books = books.len(),
        periods = proj.periods.len(),
        roi = proj.summary.roi,
        "projection complete"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&proj)?);
    } else {
        print_projection(&proj, args.books);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_flags() {
        let a = parse_args(args(&["--portfolio", "books.yaml", "--books", "--json"])).unwrap();
        assert_eq!(a.portfolio, Some(PathBuf::from("books.yaml")));
        assert!(a.books && a.json && !a.version);
        assert_eq!(a.seed, DEFAULT_SEED);

        let b = parse_args(args(&["--sample", "10", "--seed", "7"])).unwrap();
        assert_eq!(b.sample, Some(10));
        assert_eq!(b.seed, 7);
    }

    #[test]
    fn rejects_bad_numbers_and_missing_values() {
        assert!(parse_args(args(&["--sample", "many"])).is_err());
        assert!(parse_args(args(&["--seed"])).is_err());
        assert!(parse_args(args(&["--portfolio"])).is_err());
    }

    #[test]
    fn unknown_arguments_are_rejected() {
        let err = parse_args(args(&["--portfolo", "demos/portfolio.yaml"])).unwrap_err();
        assert!(err.to_string().contains("--portfolo"));
        assert!(parse_args(args(&["stray"])).is_err());
    }

    #[test]
    fn log_filter_follows_directives() {
        use tracing::level_filters::LevelFilter;
        assert_eq!(log_filter(None).max_level_hint(), Some(LevelFilter::INFO));
        assert_eq!(
            log_filter(Some("warn")).max_level_hint(),
            Some(LevelFilter::WARN)
        );
        assert_eq!(
            log_filter(Some("kdp_optimizer=trace")).max_level_hint(),
            Some(LevelFilter::TRACE)
        );
    }

    #[test]
    fn portfolio_file_shapes() {
        let bare = r#"[{"id":"a","launchDate":"2025-02-01","quality":6,"genre":"business","wordCount":40000}]"#;
        let books = parse_portfolio(bare, false).unwrap();
        assert_eq!(books.len(), 1);

        let wrapped = "
books:
  - id: a
    launchDate: 2025-02-01
    quality: 6
    genre: fiction
    wordCount: 40000
    autoOptimize: true
  - id: b
    launchDate: 2025-03-18
    quality: 9
    genre: non_fiction
    wordCount: 70000
    amazonAdBudget: 120
";
        let books = parse_portfolio(wrapped, true).unwrap();
        assert_eq!(books.len(), 2);
        assert!(books[0].auto_optimize);
        validate_portfolio(&books).unwrap();
    }

    #[test]
    fn malformed_portfolio_is_an_error() {
        assert!(parse_portfolio("{\"books\": 3}", false).is_err());
        assert!(parse_portfolio("- id: x\n  quality: high\n", true).is_err());
    }
}
