//! CLI definition and dispatch.

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::console_report::{ConsoleReport, format_currency};
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::svg_chart::SvgChartReport;
use crate::domain::backtest::{self as backtest_engine, BacktestConfig, BacktestResult};
use crate::domain::config_validation::{
    read_date_range, read_initial_balance, read_strategy, read_symbol, validate_backtest_config,
    validate_strategy_config,
};
use crate::domain::error::SmacrossError;
use crate::domain::strategy::Strategy;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::{BacktestReport, ReportPort};

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_OUTPUT_DIR: &str = ".";

#[derive(Parser, Debug)]
#[command(name = "smacross", about = "Moving average crossover backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Command-line values that take precedence over the config file.
#[derive(Args, Debug, Default, Clone)]
pub struct Overrides {
    #[arg(long)]
    pub symbol: Option<String>,
    /// Inclusive, YYYY-MM-DD
    #[arg(long)]
    pub start_date: Option<String>,
    /// Exclusive, YYYY-MM-DD
    #[arg(long)]
    pub end_date: Option<String>,
    #[arg(long)]
    pub short_window: Option<usize>,
    #[arg(long)]
    pub long_window: Option<usize>,
    #[arg(long)]
    pub initial_balance: Option<f64>,
    /// Directory holding <SYMBOL>.csv files
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
    /// Directory for chart output
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[command(flatten)]
        overrides: Overrides,
        /// Skip writing SVG charts
        #[arg(long)]
        no_charts: bool,
        /// List every fill in the summary
        #[arg(long)]
        trades: bool,
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the stored data range for a symbol
    Info {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let outcome = match cli.command {
        Command::Backtest {
            config,
            overrides,
            no_charts,
            trades,
            dry_run,
        } => {
            if dry_run {
                run_dry_run(config.as_deref(), &overrides)
            } else {
                run_backtest(config.as_deref(), &overrides, !no_charts, trades)
            }
        }
        Command::Validate { config } => run_validate(&config),
        Command::Info {
            config,
            symbol,
            data_dir,
        } => {
            let overrides = Overrides {
                symbol,
                data_dir,
                ..Overrides::default()
            };
            run_info(config.as_deref(), &overrides)
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, SmacrossError> {
    FileConfigAdapter::from_file(path).map_err(|e| SmacrossError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Load the config file (if any) and layer the command-line overrides on top.
pub fn load_settings(
    config_path: Option<&Path>,
    overrides: &Overrides,
) -> Result<FileConfigAdapter, SmacrossError> {
    let mut adapter = match config_path {
        Some(path) => {
            eprintln!("Loading config from {}", path.display());
            load_config(path)?
        }
        None => FileConfigAdapter::empty(),
    };

    if let Some(symbol) = &overrides.symbol {
        adapter.set("data", "symbol", symbol.as_str());
    }
    if let Some(start) = &overrides.start_date {
        adapter.set("data", "start_date", start.as_str());
    }
    if let Some(end) = &overrides.end_date {
        adapter.set("data", "end_date", end.as_str());
    }
    if let Some(dir) = &overrides.data_dir {
        adapter.set("data", "data_dir", dir.display().to_string());
    }
    if let Some(short) = overrides.short_window {
        adapter.set("strategy", "short_window", short.to_string());
    }
    if let Some(long) = overrides.long_window {
        adapter.set("strategy", "long_window", long.to_string());
    }
    if let Some(balance) = overrides.initial_balance {
        adapter.set("backtest", "initial_balance", balance.to_string());
    }
    if let Some(dir) = &overrides.output_dir {
        adapter.set("report", "output_dir", dir.display().to_string());
    }
    Ok(adapter)
}

pub fn build_backtest_config(config: &dyn ConfigPort) -> Result<BacktestConfig, SmacrossError> {
    let symbol = read_symbol(config)?;
    let (start_date, end_date) = read_date_range(config)?;
    let initial_balance = read_initial_balance(config)?;
    Ok(BacktestConfig {
        symbol,
        start_date,
        end_date,
        initial_balance,
    })
}

pub fn build_strategy(config: &dyn ConfigPort) -> Result<Strategy, SmacrossError> {
    read_strategy(config)
}

pub fn data_dir(config: &dyn ConfigPort) -> PathBuf {
    PathBuf::from(config.get_string_or("data", "data_dir", DEFAULT_DATA_DIR))
}

pub fn output_dir(config: &dyn ConfigPort) -> PathBuf {
    PathBuf::from(config.get_string_or("report", "output_dir", DEFAULT_OUTPUT_DIR))
}

fn run_backtest(
    config_path: Option<&Path>,
    overrides: &Overrides,
    charts: bool,
    show_trades: bool,
) -> Result<(), SmacrossError> {
    // Stage 1: Load config and apply overrides
    let adapter = load_settings(config_path, overrides)?;

    // Stage 2: Validate strategy first so bad windows fail before any I/O
    let strategy = build_strategy(&adapter)?;
    eprintln!("Strategy: {}", strategy);

    // Stage 3: Build backtest config
    let bt_config = build_backtest_config(&adapter)?;

    // Stage 4: Wire adapters
    let data_port = CsvAdapter::new(data_dir(&adapter));
    let console = ConsoleReport::new(show_trades);
    let chart_report;
    let mut reporters: Vec<&dyn ReportPort> = vec![&console];
    if charts && adapter.get_bool("report", "charts", true) {
        chart_report = SvgChartReport::new(output_dir(&adapter));
        reporters.push(&chart_report);
    }

    // Stages 5-7
    run_backtest_pipeline(&data_port, &bt_config, &strategy, &reporters)?;
    Ok(())
}

/// Fetch, simulate and hand the result to every reporter.
pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    bt_config: &BacktestConfig,
    strategy: &Strategy,
    reporters: &[&dyn ReportPort],
) -> Result<BacktestResult, SmacrossError> {
    // Stage 5: Fetch prices
    eprintln!(
        "Fetching {} from {} to {}",
        bt_config.symbol, bt_config.start_date, bt_config.end_date
    );
    let prices = data_port.fetch_closes(
        &bt_config.symbol,
        bt_config.start_date,
        bt_config.end_date,
    )?;
    eprintln!("  Loaded: {} bars", prices.len());

    // Stage 6: Run backtest
    let result = backtest_engine::run_backtest(
        &bt_config.symbol,
        &prices,
        strategy,
        bt_config.initial_balance,
    )?;
    eprintln!("  Simulated: {} bars after warm-up", result.rows.len());

    // Stage 7: Report
    let report = BacktestReport::new(
        &bt_config.symbol,
        bt_config.start_date,
        bt_config.end_date,
        strategy,
        &result,
    );
    for reporter in reporters {
        reporter.write(&report)?;
    }

    Ok(result)
}

pub fn run_dry_run(config_path: Option<&Path>, overrides: &Overrides) -> Result<(), SmacrossError> {
    let adapter = load_settings(config_path, overrides)?;
    validate_strategy_config(&adapter)?;
    validate_backtest_config(&adapter)?;

    let strategy = build_strategy(&adapter)?;
    let bt_config = build_backtest_config(&adapter)?;

    eprintln!("Config validated successfully\n");
    eprintln!("  symbol:          {}", bt_config.symbol);
    eprintln!(
        "  range:           {} to {} (end exclusive)",
        bt_config.start_date, bt_config.end_date
    );
    eprintln!("  strategy:        {}", strategy);
    eprintln!(
        "  initial balance: {}",
        format_currency(bt_config.initial_balance)
    );
    eprintln!("  data dir:        {}", data_dir(&adapter).display());
    eprintln!("  output dir:      {}", output_dir(&adapter).display());
    eprintln!("\nDry run complete: configuration is valid");
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), SmacrossError> {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = load_config(config_path)?;
    validate_strategy_config(&adapter)?;
    validate_backtest_config(&adapter)?;
    eprintln!("Configuration is valid.");
    Ok(())
}

fn run_info(config_path: Option<&Path>, overrides: &Overrides) -> Result<(), SmacrossError> {
    let adapter = load_settings(config_path, overrides)?;
    let symbol = read_symbol(&adapter)?;
    let data_port = CsvAdapter::new(data_dir(&adapter));

    match data_port.get_data_range(&symbol)? {
        Some((first, last, count)) => {
            println!("{}: {} bars, {} to {}", symbol, count, first, last);
        }
        None => {
            eprintln!("{}: no data found", symbol);
        }
    }
    Ok(())
}
