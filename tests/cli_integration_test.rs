//! CLI integration tests for the backtest command orchestration.
//!
//! Tests cover:
//! - Config parsing (build_backtest_config, build_strategy)
//! - Command-line overrides layered over an INI file
//! - Dry-run mode with real INI files on disk
//! - Full pipeline over CSV files with console and chart reporters
//! - Exit codes from the top-level dispatcher

mod common;

use approx::assert_relative_eq;
use clap::Parser;
use common::*;
use smacross::adapters::console_report::ConsoleReport;
use smacross::adapters::csv_adapter::CsvAdapter;
use smacross::adapters::file_config_adapter::FileConfigAdapter;
use smacross::cli::{self, Cli, Overrides};
use smacross::domain::error::SmacrossError;
use smacross::ports::report_port::ReportPort;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn write_csv(dir: &Path, symbol: &str, prices: &[PricePoint]) {
    let mut content = String::from("Date,Open,High,Low,Close,Volume\n");
    for p in prices {
        content.push_str(&format!(
            "{},{},{},{},{},1000\n",
            p.date, p.close, p.close, p.close, p.close
        ));
    }
    std::fs::write(dir.join(format!("{symbol}.csv")), content).unwrap();
}

fn exit_report(code: ExitCode) -> String {
    format!("{code:?}")
}

const VALID_INI: &str = r#"
[data]
symbol = aapl
start_date = 2021-01-01
end_date = 2021-02-01
data_dir = data

[strategy]
short_window = 2
long_window = 4

[backtest]
initial_balance = 10000

[report]
output_dir = charts
charts = true
"#;

mod config_loading {
    use super::*;

    #[test]
    fn build_backtest_config_from_valid_ini() {
        let config = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let bt = cli::build_backtest_config(&config).unwrap();

        assert_eq!(bt.symbol, "AAPL");
        assert_eq!(bt.start_date, date(2021, 1, 1));
        assert_eq!(bt.end_date, date(2021, 2, 1));
        assert_relative_eq!(bt.initial_balance, 10_000.0);
    }

    #[test]
    fn build_strategy_from_valid_ini() {
        let config = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let strategy = cli::build_strategy(&config).unwrap();
        assert_eq!(strategy.short_window, 2);
        assert_eq!(strategy.long_window, 4);
    }

    #[test]
    fn defaults_fill_strategy_and_balance() {
        let ini = "[data]\nsymbol = MSFT\nstart_date = 2020-01-01\nend_date = 2021-01-01\n";
        let config = FileConfigAdapter::from_string(ini).unwrap();

        let strategy = cli::build_strategy(&config).unwrap();
        assert_eq!(strategy.short_window, 20);
        assert_eq!(strategy.long_window, 50);

        let bt = cli::build_backtest_config(&config).unwrap();
        assert_relative_eq!(bt.initial_balance, 10_000.0);
        assert_eq!(cli::data_dir(&config), PathBuf::from("data"));
        assert_eq!(cli::output_dir(&config), PathBuf::from("."));
    }

    #[test]
    fn missing_symbol_is_config_missing() {
        let ini = "[data]\nstart_date = 2020-01-01\nend_date = 2021-01-01\n";
        let config = FileConfigAdapter::from_string(ini).unwrap();
        let err = cli::build_backtest_config(&config).unwrap_err();
        assert!(matches!(err, SmacrossError::ConfigMissing { key, .. } if key == "symbol"));
    }

    #[test]
    fn inverted_windows_rejected() {
        let ini = "[strategy]\nshort_window = 50\nlong_window = 20\n";
        let config = FileConfigAdapter::from_string(ini).unwrap();
        let err = cli::build_strategy(&config).unwrap_err();
        assert!(matches!(err, SmacrossError::InvalidStrategyParams { .. }));
    }

    #[test]
    fn load_config_missing_file_is_parse_error() {
        let err = cli::load_config(Path::new("/nonexistent/path/config.ini")).unwrap_err();
        assert!(matches!(err, SmacrossError::ConfigParse { .. }));
    }
}

mod overrides {
    use super::*;

    #[test]
    fn overrides_replace_file_values() {
        let file = write_temp_ini(VALID_INI);
        let overrides = Overrides {
            symbol: Some("msft".to_string()),
            start_date: Some("2021-01-10".to_string()),
            short_window: Some(3),
            long_window: Some(9),
            initial_balance: Some(2_500.0),
            ..Overrides::default()
        };

        let config = cli::load_settings(Some(file.path()), &overrides).unwrap();
        let bt = cli::build_backtest_config(&config).unwrap();
        let strategy = cli::build_strategy(&config).unwrap();

        assert_eq!(bt.symbol, "MSFT");
        assert_eq!(bt.start_date, date(2021, 1, 10));
        assert_eq!(bt.end_date, date(2021, 2, 1));
        assert_relative_eq!(bt.initial_balance, 2_500.0);
        assert_eq!((strategy.short_window, strategy.long_window), (3, 9));
    }

    #[test]
    fn overrides_without_file() {
        let overrides = Overrides {
            symbol: Some("TSLA".to_string()),
            start_date: Some("2020-01-01".to_string()),
            end_date: Some("2020-06-01".to_string()),
            data_dir: Some(PathBuf::from("/tmp/prices")),
            ..Overrides::default()
        };

        let config = cli::load_settings(None, &overrides).unwrap();
        assert_eq!(cli::build_backtest_config(&config).unwrap().symbol, "TSLA");
        assert_eq!(cli::data_dir(&config), PathBuf::from("/tmp/prices"));
    }

    #[test]
    fn override_window_zero_rejected() {
        let overrides = Overrides {
            short_window: Some(0),
            ..Overrides::default()
        };
        let config = cli::load_settings(None, &overrides).unwrap();
        let err = cli::build_strategy(&config).unwrap_err();
        assert!(matches!(err, SmacrossError::InvalidStrategyParams { .. }));
    }
}

mod dry_run {
    use super::*;

    #[test]
    fn dry_run_valid_config_succeeds() {
        let file = write_temp_ini(VALID_INI);
        assert!(cli::run_dry_run(Some(file.path()), &Overrides::default()).is_ok());
    }

    #[test]
    fn dry_run_missing_file_fails() {
        let err = cli::run_dry_run(
            Some(Path::new("/nonexistent/path/config.ini")),
            &Overrides::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SmacrossError::ConfigParse { .. }));
    }

    #[test]
    fn dry_run_bad_date_fails() {
        let ini = VALID_INI.replace("2021-02-01", "02/01/2021");
        let file = write_temp_ini(&ini);
        let err = cli::run_dry_run(Some(file.path()), &Overrides::default()).unwrap_err();
        assert!(matches!(err, SmacrossError::ConfigInvalid { key, .. } if key == "end_date"));
    }

    #[test]
    fn dry_run_negative_balance_fails() {
        let file = write_temp_ini(VALID_INI);
        let overrides = Overrides {
            initial_balance: Some(-1.0),
            ..Overrides::default()
        };
        let err = cli::run_dry_run(Some(file.path()), &overrides).unwrap_err();
        assert!(matches!(err, SmacrossError::InvalidStrategyParams { .. }));
    }
}

mod pipeline_csv {
    use super::*;
    use smacross::adapters::svg_chart::SvgChartReport;

    #[test]
    fn pipeline_reads_csv_and_writes_charts() {
        let data_dir = tempfile::TempDir::new().unwrap();
        let out_dir = tempfile::TempDir::new().unwrap();
        let prices = daily_prices("2021-01-01", &tent_closes(100.0, 1.0, 10, 10));
        write_csv(data_dir.path(), "AAPL", &prices);

        let port = CsvAdapter::new(data_dir.path().to_path_buf());
        let charts = SvgChartReport::new(out_dir.path().join("nested"));
        let reporters: Vec<&dyn ReportPort> = vec![&charts];

        let strategy = smacross::domain::strategy::Strategy::new(2, 4).unwrap();
        let mut config = sample_config("AAPL");
        config.start_date = date(2021, 1, 1);
        config.end_date = date(2021, 2, 1);

        let result = cli::run_backtest_pipeline(&port, &config, &strategy, &reporters).unwrap();
        assert_eq!(result.trades().len(), 2);
        assert_relative_eq!(result.final_value(), 10_476.0);

        let (price_svg, portfolio_svg) = charts.output_paths("AAPL");
        let price = std::fs::read_to_string(price_svg).unwrap();
        let portfolio = std::fs::read_to_string(portfolio_svg).unwrap();
        assert!(price.starts_with("<svg"));
        assert!(price.contains("Short 2-Day MA"));
        assert!(portfolio.contains("Portfolio Value Over Time"));
    }

    #[test]
    fn console_summary_matches_pipeline_result() {
        let data_dir = tempfile::TempDir::new().unwrap();
        let prices = daily_prices("2021-01-01", &tent_closes(100.0, 1.0, 10, 10));
        write_csv(data_dir.path(), "AAPL", &prices);

        let port = CsvAdapter::new(data_dir.path().to_path_buf());
        let strategy = smacross::domain::strategy::Strategy::new(2, 4).unwrap();
        let mut config = sample_config("AAPL");
        config.start_date = date(2021, 1, 1);

        let result = cli::run_backtest_pipeline(&port, &config, &strategy, &[]).unwrap();
        let report = smacross::ports::report_port::BacktestReport::new(
            "AAPL",
            config.start_date,
            config.end_date,
            &strategy,
            &result,
        );
        let text = ConsoleReport::new(true).render(&report);

        assert!(text.contains("Initial Balance: $10,000.00"));
        assert!(text.contains("Final Balance: $10,476.00"));
        assert!(text.contains("Net Profit: $476.00 (4.76%)"));
        assert!(text.contains("Trades: 2"));
        assert!(text.contains("2021-01-04"));
    }

    #[test]
    fn missing_csv_is_data_source_error() {
        let data_dir = tempfile::TempDir::new().unwrap();
        let port = CsvAdapter::new(data_dir.path().to_path_buf());
        let err = cli::run_backtest_pipeline(
            &port,
            &sample_config("GONE"),
            &smacross::domain::strategy::Strategy::default(),
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, SmacrossError::DataSource { .. }));
    }
}

mod exit_codes {
    use super::*;

    fn run_args(args: &[&str]) -> String {
        exit_report(cli::run(Cli::parse_from(args)))
    }

    #[test]
    fn backtest_end_to_end_succeeds() {
        let data_dir = tempfile::TempDir::new().unwrap();
        let out_dir = tempfile::TempDir::new().unwrap();
        let prices = daily_prices("2021-01-01", &tent_closes(100.0, 1.0, 10, 10));
        write_csv(data_dir.path(), "AAPL", &prices);
        let file = write_temp_ini(VALID_INI);

        let report = run_args(&[
            "smacross",
            "backtest",
            "--config",
            file.path().to_str().unwrap(),
            "--data-dir",
            data_dir.path().to_str().unwrap(),
            "--output-dir",
            out_dir.path().to_str().unwrap(),
        ]);

        assert_eq!(report, exit_report(ExitCode::SUCCESS));
        assert!(out_dir.path().join("aapl_price_ma.svg").exists());
        assert!(out_dir.path().join("aapl_portfolio.svg").exists());
    }

    #[test]
    fn no_charts_flag_skips_svg_output() {
        let data_dir = tempfile::TempDir::new().unwrap();
        let out_dir = tempfile::TempDir::new().unwrap();
        let prices = daily_prices("2021-01-01", &tent_closes(100.0, 1.0, 10, 10));
        write_csv(data_dir.path(), "AAPL", &prices);
        let file = write_temp_ini(VALID_INI);

        let report = run_args(&[
            "smacross",
            "backtest",
            "--config",
            file.path().to_str().unwrap(),
            "--data-dir",
            data_dir.path().to_str().unwrap(),
            "--output-dir",
            out_dir.path().to_str().unwrap(),
            "--no-charts",
        ]);

        assert_eq!(report, exit_report(ExitCode::SUCCESS));
        assert!(!out_dir.path().join("aapl_price_ma.svg").exists());
    }

    #[test]
    fn invalid_windows_exit_with_parameter_code() {
        let file = write_temp_ini(VALID_INI);
        let report = run_args(&[
            "smacross",
            "backtest",
            "--config",
            file.path().to_str().unwrap(),
            "--short-window",
            "10",
            "--long-window",
            "5",
        ]);
        assert_eq!(report, exit_report(ExitCode::from(4)));
    }

    #[test]
    fn missing_data_exits_with_data_source_code() {
        let data_dir = tempfile::TempDir::new().unwrap();
        let file = write_temp_ini(VALID_INI);
        let report = run_args(&[
            "smacross",
            "backtest",
            "--config",
            file.path().to_str().unwrap(),
            "--data-dir",
            data_dir.path().to_str().unwrap(),
            "--no-charts",
        ]);
        assert_eq!(report, exit_report(ExitCode::from(3)));
    }

    #[test]
    fn short_history_exits_with_data_code() {
        let data_dir = tempfile::TempDir::new().unwrap();
        write_csv(
            data_dir.path(),
            "AAPL",
            &daily_prices("2021-01-01", &[10.0, 11.0, 12.0]),
        );
        let file = write_temp_ini(VALID_INI);
        let report = run_args(&[
            "smacross",
            "backtest",
            "--config",
            file.path().to_str().unwrap(),
            "--data-dir",
            data_dir.path().to_str().unwrap(),
            "--no-charts",
        ]);
        assert_eq!(report, exit_report(ExitCode::from(5)));
    }

    #[test]
    fn validate_missing_config_exits_with_config_code() {
        let report = run_args(&[
            "smacross",
            "validate",
            "--config",
            "/nonexistent/path/config.ini",
        ]);
        assert_eq!(report, exit_report(ExitCode::from(2)));
    }

    #[test]
    fn info_reports_range() {
        let data_dir = tempfile::TempDir::new().unwrap();
        write_csv(
            data_dir.path(),
            "AAPL",
            &daily_prices("2021-01-01", &[10.0, 11.0, 12.0]),
        );
        let report = run_args(&[
            "smacross",
            "info",
            "--symbol",
            "AAPL",
            "--data-dir",
            data_dir.path().to_str().unwrap(),
        ]);
        assert_eq!(report, exit_report(ExitCode::SUCCESS));
    }
}
