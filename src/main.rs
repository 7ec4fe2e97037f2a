// Rate grid command line
// Projects a supplier payload and prints it week by week

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;

use rate_grid::models::accommodation::AccommodationUnit;
use rate_grid::models::projection::Projection;
use rate_grid::models::settings::GridSettings;
use rate_grid::services::normalize::{normalize_periods, normalize_rate_type_links, normalize_units};
use rate_grid::services::projection::IntervalProjector;
use rate_grid::services::settings::SettingsService;
use rate_grid::services::supplier::SupplierPayload;
use rate_grid::utils::date::{format_iso, parse_iso, week_rows, DateSpan};

#[derive(Parser)]
#[command(name = "rate-grid")]
#[command(author, version, about = "Project supplier rate periods onto a per-day grid", long_about = None)]
struct Cli {
    /// Supplier payload (JSON with units, periods and linked rate types)
    #[arg(value_name = "FILE")]
    payload: PathBuf,

    /// First day of the window (YYYY-MM-DD), today when omitted
    #[arg(short, long, value_parser = parse_start_date)]
    start: Option<NaiveDate>,

    /// Number of days shown, the configured default when omitted
    #[arg(short, long)]
    days: Option<u32>,

    /// Settings file to use instead of the platform config location
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,
}

fn parse_start_date(value: &str) -> Result<NaiveDate, String> {
    parse_iso(value).ok_or_else(|| format!("invalid date '{}', expected YYYY-MM-DD", value))
}

fn load_settings(path: Option<&Path>) -> Result<GridSettings> {
    let service = match path {
        Some(path) => SettingsService::new(path),
        None => SettingsService::from_default_location()?,
    };
    service.get()
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = load_settings(cli.settings.as_deref()).unwrap_or_else(|err| {
        eprintln!("Falling back to default settings: {:#}", err);
        GridSettings::default()
    });

    env_logger::Builder::new()
        .filter_level(settings.level_filter())
        .parse_default_env()
        .init();

    log::info!("Starting rate grid");

    let data = fs::read_to_string(&cli.payload)
        .with_context(|| format!("Failed to read payload {}", cli.payload.display()))?;
    let payload: SupplierPayload = serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse payload {}", cli.payload.display()))?;

    let start = cli.start.unwrap_or_else(|| Local::now().date_naive());
    let days = cli.days.unwrap_or(settings.default_window_days);
    let window = DateSpan::starting_at(start, days)
        .ok_or_else(|| anyhow!("Invalid window of {} days from {}", days, format_iso(start)))?;

    let units = normalize_units(&payload.units);
    for skipped in &units.skipped {
        eprintln!("skipped unit {}: {}", skipped.index, skipped.reason);
    }
    let normalized = normalize_periods(&payload.periods);
    for skipped in &normalized.skipped {
        eprintln!("skipped record {}: {}", skipped.index, skipped.reason);
    }
    let links = normalize_rate_type_links(&payload.linked_rate_types);
    let projection =
        IntervalProjector::from_settings(&settings).project_with_links(&normalized.periods, &links, window);

    print_catalog(&projection);
    for unit in &units.units {
        print_unit(unit, &projection);
    }

    Ok(())
}

fn print_catalog(projection: &Projection) {
    println!("Rate types:");
    for rate_type in &projection.rate_type_catalog {
        println!("  {:>6}  {}", rate_type.id, rate_type.label);
    }
}

fn print_unit(unit: &AccommodationUnit, projection: &Projection) {
    let rate_type = projection.default_rate_type();

    println!();
    println!("{}", unit.row_label());
    for row in week_rows(projection.window) {
        let cells: Vec<String> = row
            .days()
            .map(|date| {
                let Some(cell) = projection.cell(unit.id, date) else {
                    return format!("{} {:>8}", date.format("%d"), "-");
                };
                let price = rate_type
                    .and_then(|id| cell.price_for(id))
                    .map(|price| format!("{:.2}", price))
                    .unwrap_or_else(|| "-".to_string());
                let stay = cell
                    .minimum_stay
                    .map(|nights| format!("/{}", nights))
                    .unwrap_or_default();
                let promo = if cell.has_promotion { "*" } else { "" };
                format!("{} {:>8}{}{}", date.format("%d"), price, stay, promo)
            })
            .collect();
        println!("  {}  {}", format_iso(row.start), cells.join("  "));
    }
}
