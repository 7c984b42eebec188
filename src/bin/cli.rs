//! Options Scanner CLI
//!
//! Command-line front end: fetch a chain, print max pain and open-interest
//! views, optionally export CSV and keep refreshing until Ctrl+C.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use options_scanner::prelude::*;
use options_scanner::report::{render_exposure, render_headline, render_summary_table, render_top};

#[derive(Debug, Parser)]
#[command(name = "options-scanner", version, about = "Open interest and max pain for option chains")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Tradier API token
    #[arg(long, env = "TRADIER_API_KEY", global = true, hide_env_values = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Analyse one expiration of a ticker's chain
    Scan(ScanArgs),
    /// List available expirations
    Expirations {
        /// Underlying symbol
        ticker: String,
    },
}

#[derive(Debug, Args)]
struct ScanArgs {
    /// Underlying symbol
    ticker: String,

    /// Expiration date (YYYY-MM-DD); defaults to the nearest listed
    #[arg(long, short)]
    expiration: Option<NaiveDate>,

    /// Max-pain weighting: oi, volume or combined
    #[arg(long, short)]
    weighting: Option<PainWeighting>,

    /// Strikes to list per side
    #[arg(long)]
    top: Option<usize>,

    /// Print the full strike table
    #[arg(long)]
    table: bool,

    /// Write the strike summary to CSV (use "-" for {TICKER}_options_data.csv)
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Include volume and greeks columns in the CSV
    #[arg(long)]
    extended: bool,

    /// Keep refreshing until interrupted
    #[arg(long)]
    watch: bool,

    /// Seconds between refreshes in watch mode
    #[arg(long)]
    interval: Option<u64>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> ScannerResult<()> {
    let mut config = match &cli.config {
        Some(path) => ScannerConfig::from_file(path)?,
        None => ScannerConfig::default(),
    };
    if cli.api_key.is_some() {
        config.provider.api_key = cli.api_key.clone();
    }

    match cli.command {
        Command::Expirations { ticker } => list_expirations(&config, &ticker.to_uppercase()),
        Command::Scan(args) => {
            if let Some(weighting) = args.weighting {
                config.analysis.weighting = weighting;
            }
            if let Some(top) = args.top {
                config.analysis.top_n = top;
            }
            if let Some(interval) = args.interval {
                config.refresh.interval_secs = interval;
            }
            config.validate()?;
            scan(&config, &args)
        }
    }
}

fn list_expirations(config: &ScannerConfig, ticker: &str) -> ScannerResult<()> {
    let client = TradierClient::new(&config.provider)?;

    match client.fetch_expirations(ticker) {
        Ok(dates) if dates.is_empty() => println!("No expirations listed for {}", ticker),
        Ok(dates) => {
            for date in dates {
                println!("{}", date);
            }
        }
        Err(e) => eprintln!("Error fetching expiration dates: {}", e),
    }
    Ok(())
}

fn scan(config: &ScannerConfig, args: &ScanArgs) -> ScannerResult<()> {
    let ticker = args.ticker.trim().to_uppercase();
    let client = TradierClient::new(&config.provider)?;
    let scanner = OptionsScanner::with_config(client, config.analysis.clone());

    let expiration = match scanner.resolve_expiration(&ticker, args.expiration) {
        Ok(date) => date,
        Err(e) if e.is_provider() => {
            eprintln!("Error fetching expiration dates: {}", e);
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    if !args.watch {
        return scan_once(&scanner, &ticker, expiration, args);
    }

    let token = CancellationToken::new();
    let handler_token = token.clone();
    ctrlc::set_handler(move || {
        eprintln!("\nReceived Ctrl+C, stopping...");
        handler_token.cancel();
    })
    .map_err(|e| ScannerError::config(format!("Failed to install Ctrl+C handler: {}", e)))?;

    let mut failure = None;
    RefreshLoop::from_config(&config.refresh).run(&token, |n| {
        tracing::debug!("Refresh #{}", n);
        if let Err(e) = scan_once(&scanner, &ticker, expiration, args) {
            failure = Some(e);
            token.cancel();
        }
    })?;

    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn scan_once<P: MarketDataProvider>(
    scanner: &OptionsScanner<P>,
    ticker: &str,
    expiration: NaiveDate,
    args: &ScanArgs,
) -> ScannerResult<()> {
    let report = match scanner.scan(ticker, expiration)? {
        ScanOutcome::Complete(report) => report,
        ScanOutcome::NoData { reason, .. } => {
            eprintln!("No data available: {}", reason);
            return Ok(());
        }
    };

    println!("{}", render_headline(&report));
    print!("{}", render_top("CALL OI", &report.top_calls));
    print!("{}", render_top("PUT OI", &report.top_puts));

    println!("\nCall vs. Put Open Interest");
    print!("{}", render_exposure(&report.exposure, 30));

    if args.table {
        println!();
        print!("{}", render_summary_table(&report.summary));
    }

    if let Some(path) = &args.csv {
        let path = if path.as_os_str() == "-" {
            PathBuf::from(default_csv_name(ticker))
        } else {
            path.clone()
        };
        let layout = if args.extended {
            CsvLayout::Extended
        } else {
            CsvLayout::Basic
        };
        export_csv(&report.summary, &path, layout)?;
        println!("\nSaved {}", path.display());
    }

    Ok(())
}
