//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::validate_simulation_config;
use crate::domain::enrich::enrich;
use crate::domain::error::KumosimError;
use crate::domain::params::SimulationParams;
use crate::domain::recorder::record;
use crate::domain::simulation::run_simulation;
use crate::domain::validation::validate_bars;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "kumosim", about = "Ichimoku-anchored trading simulator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the simulation for the configured codes
    Simulate {
        #[arg(short, long)]
        config: PathBuf,
        /// Directory for the per-code report files
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        market: Option<String>,
        #[arg(long)]
        dry_run: bool,
    },
    /// List available symbols on a market
    ListSymbols {
        #[arg(long)]
        market: String,
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show data range for symbol(s)
    Info {
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        market: Option<String>,
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Simulate {
            config,
            output,
            code,
            market,
            dry_run,
        } => {
            if dry_run {
                run_dry_run(&config)
            } else {
                run_simulate(&config, output.as_ref(), code.as_deref(), market.as_deref())
            }
        }
        Command::ListSymbols { market, config } => run_list_symbols(&market, &config),
        Command::Validate { config } => run_validate(&config),
        Command::Info {
            code,
            market,
            config,
        } => run_info(code.as_deref(), market.as_deref(), &config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = KumosimError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

pub fn build_simulation_params(adapter: &dyn ConfigPort) -> SimulationParams {
    let defaults = SimulationParams::default();
    SimulationParams {
        initial_cash: adapter.get_double("simulation", "initial_cash", defaults.initial_cash),
        partial_exit_fraction: adapter.get_double(
            "simulation",
            "partial_exit_fraction",
            defaults.partial_exit_fraction,
        ),
        stop_loss_multiplier: adapter.get_double(
            "simulation",
            "stop_loss_multiplier",
            defaults.stop_loss_multiplier,
        ),
        take_profit_multiplier: adapter.get_double(
            "simulation",
            "take_profit_multiplier",
            defaults.take_profit_multiplier,
        ),
        temu_period: adapter.get_int("simulation", "temu_period", defaults.temu_period as i64)
            as usize,
        stoch_period: adapter.get_int("simulation", "stoch_period", defaults.stoch_period as i64)
            as usize,
        stoch_smoothing: adapter.get_int(
            "simulation",
            "stoch_smoothing",
            defaults.stoch_smoothing as i64,
        ) as usize,
        tenkan_period: adapter.get_int(
            "simulation",
            "tenkan_period",
            defaults.tenkan_period as i64,
        ) as usize,
        kijun_period: adapter.get_int("simulation", "kijun_period", defaults.kijun_period as i64)
            as usize,
        senkou_b_period: adapter.get_int(
            "simulation",
            "senkou_b_period",
            defaults.senkou_b_period as i64,
        ) as usize,
    }
}

pub fn parse_codes(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn resolve_codes(code_override: Option<&str>, adapter: &dyn ConfigPort) -> Vec<String> {
    match code_override {
        Some(c) => parse_codes(c),
        None => adapter
            .get_string("simulation", "codes")
            .or_else(|| adapter.get_string("simulation", "code"))
            .map(|c| parse_codes(&c))
            .unwrap_or_default(),
    }
}

fn resolve_market(market_override: Option<&str>, adapter: &dyn ConfigPort) -> Option<String> {
    market_override
        .map(str::to_string)
        .or_else(|| adapter.get_string("simulation", "market"))
        .filter(|m| !m.trim().is_empty())
}

/// Date window for fetching; unset bounds fall back to the full range.
fn resolve_dates(adapter: &dyn ConfigPort) -> Result<(NaiveDate, NaiveDate), KumosimError> {
    let parse = |key: &str, fallback: NaiveDate| -> Result<NaiveDate, KumosimError> {
        match adapter.get_string("simulation", key) {
            None => Ok(fallback),
            Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|_| {
                KumosimError::ConfigInvalid {
                    section: "simulation".into(),
                    key: key.into(),
                    reason: "invalid date format (expected YYYY-MM-DD)".into(),
                }
            }),
        }
    };
    Ok((
        parse("start_date", NaiveDate::MIN)?,
        parse("end_date", NaiveDate::MAX)?,
    ))
}

fn data_path(adapter: &dyn ConfigPort) -> PathBuf {
    adapter
        .get_string("data", "path")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"))
}

fn run_simulate(
    config_path: &PathBuf,
    output_path: Option<&PathBuf>,
    code_override: Option<&str>,
    market_override: Option<&str>,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_simulation_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let params = build_simulation_params(&adapter);

    let codes = resolve_codes(code_override, &adapter);
    if codes.is_empty() {
        eprintln!("error: no codes configured");
        return ExitCode::from(2);
    }

    let market = match resolve_market(market_override, &adapter) {
        Some(m) => m,
        None => {
            eprintln!("error: market is required");
            return ExitCode::from(2);
        }
    };

    let (start_date, end_date) = match resolve_dates(&adapter) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let data_port = CsvAdapter::new(data_path(&adapter));
    let output_dir = output_path.cloned().unwrap_or_else(|| PathBuf::from("."));

    eprintln!("Simulating {} codes on {}...", codes.len(), market);
    run_simulate_pipeline(&data_port, &params, &codes, &market, start_date, end_date, &output_dir)
}

/// Per-code pipeline: fetch, preflight, enrich, simulate, record, write.
/// Codes run independently and sequentially; a failing code skips to the
/// next with a warning rather than aborting the batch.
#[allow(clippy::too_many_arguments)]
pub fn run_simulate_pipeline(
    data_port: &dyn DataPort,
    params: &SimulationParams,
    codes: &[String],
    market: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    output_dir: &PathBuf,
) -> ExitCode {
    let mut written = 0usize;

    for code in codes {
        let result = simulate_one(data_port, params, code, market, start_date, end_date, output_dir);
        match result {
            Ok(summary) => {
                eprintln!(
                    "  {}: final value {:.1} ({:+.1}%), {} entries, {} partial exits, {} full exits",
                    code,
                    summary.final_value,
                    summary.return_pct,
                    summary.entries,
                    summary.partial_exits,
                    summary.full_exits,
                );
                written += 1;
            }
            Err(e) => {
                eprintln!("warning: skipping {} ({})", code, e);
            }
        }
    }

    if written == 0 {
        eprintln!("error: no valid codes with data to simulate");
        return ExitCode::from(5);
    }
    eprintln!("{} report(s) written to {}", written, output_dir.display());
    ExitCode::SUCCESS
}

pub struct CodeSummary {
    pub final_value: f64,
    pub return_pct: f64,
    pub entries: usize,
    pub partial_exits: usize,
    pub full_exits: usize,
}

fn simulate_one(
    data_port: &dyn DataPort,
    params: &SimulationParams,
    code: &str,
    market: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    output_dir: &PathBuf,
) -> Result<CodeSummary, KumosimError> {
    let bars = data_port.fetch_bars(code, market, start_date, end_date)?;
    validate_bars(&bars, code, market)?;

    let enriched = enrich(&bars, params);
    let states = run_simulation(&enriched, params)?;
    let rows = record(&states);

    let output = output_dir.join(format!("{}_{}_sim.csv", code, market));
    CsvReportAdapter.write(&rows, &output)?;

    let final_value = states.last().map(|s| s.total_value()).unwrap_or(0.0);
    Ok(CodeSummary {
        final_value,
        return_pct: (final_value / params.initial_cash - 1.0) * 100.0,
        entries: states.iter().filter(|s| s.entered).count(),
        partial_exits: states.iter().filter(|s| s.partial_exit > 0.0).count(),
        full_exits: states.iter().filter(|s| s.fully_closed).count(),
    })
}

pub fn run_dry_run(config_path: &PathBuf) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_simulation_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    eprintln!("Config validated successfully");

    let params = build_simulation_params(&adapter);
    eprintln!("\nSimulation parameters:");
    eprintln!("  initial_cash:           {}", params.initial_cash);
    eprintln!("  partial_exit_fraction:  {}", params.partial_exit_fraction);
    eprintln!("  stop_loss_multiplier:   {}", params.stop_loss_multiplier);
    eprintln!("  take_profit_multiplier: {}", params.take_profit_multiplier);
    eprintln!(
        "  periods: temu {}, stochastic {}/{}, ichimoku {}/{}/{}",
        params.temu_period,
        params.stoch_period,
        params.stoch_smoothing,
        params.tenkan_period,
        params.kijun_period,
        params.senkou_b_period,
    );
    eprintln!("  warm-up bars:           {}", params.warmup_bars());

    let market = adapter
        .get_string("simulation", "market")
        .unwrap_or_default();
    let codes = resolve_codes(None, &adapter);

    eprintln!("\nUniverse:");
    eprintln!("  market: {}", market);
    if codes.is_empty() {
        eprintln!("error: no codes configured");
        return ExitCode::from(2);
    }
    eprintln!("  codes: {}", codes.join(", "));
    eprintln!("  data path: {}", data_path(&adapter).display());

    eprintln!("\nDry run complete: configuration is valid");
    ExitCode::SUCCESS
}

fn run_list_symbols(market: &str, config_path: &PathBuf) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let adapter = CsvAdapter::new(data_path(&config));
    let symbols = match adapter.list_symbols(market) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if symbols.is_empty() {
        eprintln!("No symbols found for market {}", market);
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    match validate_simulation_config(&adapter) {
        Ok(()) => {
            eprintln!("Config validated successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_info(
    code_override: Option<&str>,
    market_override: Option<&str>,
    config_path: &PathBuf,
) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let market = match resolve_market(market_override, &config) {
        Some(m) => m,
        None => {
            eprintln!("error: market is required");
            return ExitCode::from(2);
        }
    };

    let codes = resolve_codes(code_override, &config);
    if codes.is_empty() {
        eprintln!("error: no codes configured");
        return ExitCode::from(2);
    }

    let adapter = CsvAdapter::new(data_path(&config));
    for code in &codes {
        match adapter.get_data_range(code, &market) {
            Ok(Some((first, last, count))) => {
                println!("{}: {} to {} ({} bars)", code, first, last, count);
            }
            Ok(None) => {
                println!("{}: no data", code);
            }
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        }
    }
    ExitCode::SUCCESS
}
