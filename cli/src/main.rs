//! PLaNner billing CLI
//!
//! ```sh
//! # Bill for 100 kWh on a 900 VA connection, paid on time
//! planner calculate --start 1000 --end 1100 --power 900 --rate 1352
//!
//! # Two months late, as JSON
//! planner calculate --start 1000 --end 1100 --power 900 --rate 1352 --months-late 2 --json
//!
//! # Lateness from the due date of a period's bill
//! planner calculate --start 1000 --end 1100 --power 900 --rate 1352 \
//!     --period "Maret 2024" --on 2024-05-21
//!
//! # Check a reading pair
//! planner validate --start 1200 --end 1100
//!
//! # Validate the configuration file and exit
//! planner check
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::{error, info, warn};

use planner::config::AppConfig;
use planner::domain::billing::{format_kwh, format_power, format_rupiah, months_late};
use planner::domain::{BillingPeriod, TariffRate, UsageReading};
use planner::shared::telemetry::init_tracing;

/// PLaNner electricity bill calculator.
#[derive(Parser, Debug)]
#[command(
    name = "planner",
    version,
    about = "Electricity bill calculator for household meters",
    long_about = "PLaNner billing: usage, energy cost, tiered admin fee and late \
                  penalty from a pair of meter readings.\n\n\
                  Default config: ~/.config/planner/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "PLANNER_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Calculate an itemized bill.
    Calculate(CalculateArgs),
    /// Check a meter reading pair without billing it.
    Validate(ValidateArgs),
    /// Validate the configuration file and exit.
    Check,
}

#[derive(Args, Debug)]
struct ReadingArgs {
    /// Meter reading at the start of the period (kWh).
    #[arg(long)]
    start: Decimal,

    /// Meter reading at the end of the period (kWh).
    #[arg(long)]
    end: Decimal,
}

#[derive(Args, Debug)]
struct CalculateArgs {
    #[command(flatten)]
    reading: ReadingArgs,

    /// Connection power tier in VA.
    #[arg(long)]
    power: i32,

    /// Rate per kWh in Rupiah.
    #[arg(long)]
    rate: Decimal,

    /// Billing period, e.g. "Maret 2024", 03-2024 or 2024-03. Defaults to the current month.
    #[arg(long)]
    period: Option<BillingPeriod>,

    /// Whole months the payment is late.
    #[arg(long, conflicts_with_all = ["due_date", "on"])]
    months_late: Option<i32>,

    /// Due date (YYYY-MM-DD); defaults to the period's due date when --on is given.
    #[arg(long)]
    due_date: Option<NaiveDate>,

    /// Payment date (YYYY-MM-DD) used with the due date. Defaults to today.
    #[arg(long)]
    on: Option<NaiveDate>,

    /// Print the breakdown as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    #[command(flatten)]
    reading: ReadingArgs,

    /// Print the result as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(planner::default_config_path);
    let config = load_config(&config_path, cli.log_level.as_deref());

    let result = match cli.command {
        Command::Calculate(args) => calculate(&config, args),
        Command::Validate(args) => validate(&config, args),
        Command::Check => check(&config_path, cli.log_level.as_deref()),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: &Path, log_level: Option<&str>) -> AppConfig {
    match AppConfig::load(path) {
        Ok(mut cfg) => {
            if let Some(level) = log_level {
                cfg.logging.level = level.to_string();
            }
            let _ = init_tracing(&cfg.logging);
            info!("Configuration loaded from {}", path.display());
            cfg
        }
        Err(e) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new(
                    log_level.unwrap_or("warn"),
                ))
                .with_writer(std::io::stderr)
                .try_init();
            error!("Failed to load config from {}: {}", path.display(), e);
            error!("Using default configuration.");
            AppConfig::default()
        }
    }
}

fn calculate(
    config: &AppConfig,
    args: CalculateArgs,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let policy = &config.billing;
    let today = Local::now().date_naive();
    let period = args
        .period
        .unwrap_or_else(|| BillingPeriod::containing(today));

    let months = match (args.months_late, args.due_date, args.on) {
        (Some(months), _, _) => months.max(0),
        (None, None, None) => 0,
        (None, due_date, on) => {
            let due_date = match due_date {
                Some(date) => date,
                None => policy
                    .due_date(period)
                    .ok_or_else(|| format!("no due date for period {}", period))?,
            };
            months_late(due_date, on.unwrap_or(today))
        }
    };

    let validation = policy.validate_reading(args.reading.start, args.reading.end);
    if let Some(reason) = &validation.reason {
        warn!(reason = %reason, "Meter reading rejected, billing anyway");
    }

    let reading = UsageReading::new(args.reading.start, args.reading.end, period);
    let tariff = TariffRate::new(args.power, args.rate);
    tariff.validate()?;
    let breakdown = policy.calculate(&reading, &tariff, months);

    info!(
        period = %period,
        power_tier = args.power,
        months_late = months,
        total_due = breakdown.total_due,
        "Bill calculated"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&breakdown)?);
    } else {
        println!(
            "Periode: {} {} ({})",
            period.month_name(),
            period.year,
            format_power(args.power)
        );
        if months > 0 {
            println!("Terlambat: {} bulan", months);
        }
        if let Some(reason) = validation.reason {
            println!("Peringatan: {}", reason);
        }
        println!("{}", breakdown);
    }

    Ok(ExitCode::SUCCESS)
}

fn validate(
    config: &AppConfig,
    args: ValidateArgs,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let validation = config
        .billing
        .validate_reading(args.reading.start, args.reading.end);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&validation)?);
    } else if let Some(reason) = &validation.reason {
        println!("Invalid reading: {}", reason);
    } else {
        let usage = args.reading.end - args.reading.start;
        println!("Reading is valid ({})", format_kwh(usage));
    }

    Ok(if validation.valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Loads the file itself so a broken config fails instead of falling back.
fn check(path: &Path, log_level: Option<&str>) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let mut config = AppConfig::load(path)?;
    if let Some(level) = log_level {
        config.logging.level = level.to_string();
    }
    config.validate()?;

    let policy = &config.billing;
    println!("Configuration is valid");
    println!("   Config file   : {}", path.display());
    for tier in &policy.admin_fee_tiers {
        println!(
            "   Admin fee     : up to {} -> {}",
            format_power(tier.max_power_va),
            format_rupiah(tier.fee)
        );
    }
    println!("   Admin fee     : above -> {}", format_rupiah(policy.admin_fee_above));
    println!("   Late penalty  : {} per month", policy.late_penalty_rate);
    println!("   Usage ceiling : {}", format_kwh(policy.usage_ceiling_kwh));
    println!("   Due day       : {}", policy.due_day);
    println!("   Log level     : {}", config.logging.level);
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_fails_on_unreadable_config() {
        let path = std::env::temp_dir().join(format!("planner-check-{}.toml", std::process::id()));
        std::fs::write(&path, "[billing\ndue_day = ").unwrap();

        let result = check(&path, None);
        std::fs::remove_file(&path).ok();
        assert!(result.is_err());
    }

    #[test]
    fn check_accepts_missing_file_as_defaults() {
        let path = std::env::temp_dir().join("planner-check-absent/config.toml");
        assert!(check(&path, Some("debug")).is_ok());
    }
}
