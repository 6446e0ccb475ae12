//! Hobart CLI binary.
//!
//! Command-line interface for the Hobart valuation analyzer.

use clap::{Parser, Subcommand};
use hobart::Analyzer;
use hobart::output::{
    ExportFormat, Exporter, ProjectionExport, ValuationExport, generate_valuation_summary,
};
use hobart::valuation::{ProjectionRow, ValuationReport};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "hobart")]
#[command(about = "Hobart: equity valuation from SEC filings and market prices", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a ticker: EPS history, P/E ratios, trend figures
    Analyze {
        /// Stock ticker symbol
        ticker: String,

        /// Show every fiscal year instead of the last ten
        #[arg(long)]
        full: bool,
    },

    /// Project earnings and scenario prices five years forward
    Project {
        /// Stock ticker symbol
        ticker: String,

        /// Base P/E ratio; defaults to the 10-year mean, then the 5-year mean
        #[arg(long)]
        ratio: Option<f64>,

        /// Annual EPS growth in percent; defaults to the 10-year CAGR, then the 5-year CAGR
        #[arg(long)]
        growth: Option<f64>,
    },

    /// Export the valuation table to CSV or JSON
    Export {
        /// Stock ticker symbol
        ticker: String,

        /// Output format (csv, json, pretty-json)
        #[arg(long, default_value = "csv")]
        format: String,

        /// Output file; defaults to <ticker>_valuation.<ext>
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze { ticker, full } => {
            let report = fetch_report(&ticker).await?;
            print_valuation_table(&report, full);
            println!();
            println!("{}", generate_valuation_summary(&report));
        }
        Commands::Project {
            ticker,
            ratio,
            growth,
        } => {
            let report = fetch_report(&ticker).await?;
            let base_ratio = ratio
                .or(report.trend.ratio_mean_10y)
                .or(report.trend.ratio_mean_5y)
                .ok_or("no historical P/E available; pass --ratio")?;
            let growth_rate = growth
                .or(report.trend.eps_cagr_10y)
                .or(report.trend.eps_cagr_5y)
                .ok_or("no historical EPS growth available; pass --growth")?;

            let rows = report.project(base_ratio, growth_rate)?;
            print_projection_table(&report, base_ratio, growth_rate, &rows);
        }
        Commands::Export {
            ticker,
            format,
            output,
        } => {
            let format = ExportFormat::parse(&format)?;
            let report = fetch_report(&ticker).await?;
            let export = ValuationExport::from_report(&report);

            let path = output.unwrap_or_else(|| {
                PathBuf::from(format!(
                    "{}_valuation.{}",
                    report.symbol.to_lowercase(),
                    format.extension()
                ))
            });
            export.export_to_file(&path, format)?;
            println!("Wrote {} rows to {}", export.rows.len(), path.display());
        }
    }

    Ok(())
}

/// Run the analysis behind a spinner.
async fn fetch_report(ticker: &str) -> Result<ValuationReport, Box<dyn std::error::Error>> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}")?);
    spinner.set_message(format!("Fetching data for {}...", ticker.to_uppercase()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let analyzer = Analyzer::new()?;
    let result = analyzer.analyze(ticker).await;
    spinner.finish_and_clear();

    Ok(result?)
}

fn fmt_cell(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{:.2}", v))
}

fn print_valuation_table(report: &ValuationReport, full: bool) {
    let skip = if full || report.rows.len() <= 10 {
        0
    } else {
        report.rows.len() - 10
    };

    println!(
        "{:>6}  {:>12}  {:>8}  {:>10}  {:>8}",
        "FY", "Period end", "EPS", "Price", "P/E"
    );
    for row in &report.rows[skip..] {
        println!(
            "{:>6}  {:>12}  {:>8.2}  {:>10}  {:>8}",
            row.fiscal_year,
            row.period_end.to_string(),
            row.eps,
            fmt_cell(row.price),
            fmt_cell(row.ratio),
        );
    }
    if skip > 0 {
        println!("({} earlier fiscal years hidden; use --full)", skip);
    }
}

fn print_projection_table(
    report: &ValuationReport,
    base_ratio: f64,
    growth_rate: f64,
    rows: &[ProjectionRow],
) {
    let export = ProjectionExport::from_rows(
        &report.symbol,
        report.latest_fiscal_year().unwrap_or_default(),
        rows,
    );

    println!(
        "Projection for {} (base P/E {:.2}, growth {:.2} %/yr)",
        report.symbol, base_ratio, growth_rate
    );
    println!(
        "{:>6}  {:>10}  {:>12}  {:>10}  {:>12}",
        "FY", "EPS", "Pessimistic", "Base", "Optimistic"
    );
    for row in &export.rows {
        println!(
            "{:>6}  {:>10.2}  {:>12.2}  {:>10.2}  {:>12.2}",
            row.fiscal_year,
            row.projected_eps,
            row.price_pessimistic,
            row.price_base,
            row.price_optimistic
        );
    }
}
