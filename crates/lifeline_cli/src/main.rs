//! CLI probe for `lifeline_core`.
//!
//! # Responsibility
//! - Verify core linkage without the mobile host.
//! - Exercise emergency number storage and the weather lookup from a shell.
//!
//! Usage:
//!   lifeline_cli ping
//!   lifeline_cli emergency get
//!   lifeline_cli emergency set <value>
//!   lifeline_cli weather <latitude> <longitude>

use lifeline_core::db::open_db;
use lifeline_core::{
    init_logging, AppConfig, Coordinate, OpenWeatherClient, PreferenceService, SqlitePreferenceRepository,
    WeatherClient,
};
use std::process::ExitCode;

const USAGE: &str = "usage: lifeline_cli ping | emergency get | emergency set <value> | weather <lat> <lon>";

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[&str]) -> Result<(), String> {
    match args {
        [] | ["ping"] => {
            println!("lifeline_core ping={}", lifeline_core::ping());
            println!("lifeline_core version={}", lifeline_core::core_version());
            Ok(())
        }
        ["emergency", "get"] => {
            let config = load_config()?;
            let conn = open_db(&config.db_path).map_err(|e| e.to_string())?;
            let service = PreferenceService::new(SqlitePreferenceRepository::new(&conn));
            match service.emergency_number().map_err(|e| e.to_string())? {
                Some(value) => println!("{value}"),
                None => println!("(not set)"),
            }
            Ok(())
        }
        ["emergency", "set", value] => {
            let config = load_config()?;
            let conn = open_db(&config.db_path).map_err(|e| e.to_string())?;
            let service = PreferenceService::new(SqlitePreferenceRepository::new(&conn));
            service
                .set_emergency_number(value)
                .map_err(|e| e.to_string())?;
            println!("saved");
            Ok(())
        }
        ["weather", lat, lon] => {
            let coordinate = Coordinate::new(parse_degrees(lat)?, parse_degrees(lon)?);
            let config = load_config()?;
            let client = OpenWeatherClient::new(config.weather).map_err(|e| e.to_string())?;
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|e| format!("failed to start runtime: {e}"))?;
            let temperature = runtime
                .block_on(client.current_temperature(coordinate))
                .map_err(|e| e.to_string())?;
            println!("Temperature: {temperature}°C");
            println!("{}", coordinate.display());
            Ok(())
        }
        _ => Err(USAGE.to_string()),
    }
}

fn load_config() -> Result<AppConfig, String> {
    let config = AppConfig::from_env().map_err(|e| e.to_string())?;
    if let Err(err) = start_logging(&config) {
        eprintln!("warning: file logging disabled: {err}");
    }
    Ok(config)
}

fn start_logging(config: &AppConfig) -> Result<(), String> {
    let log_dir = config.log_dir.to_string_lossy();
    init_logging(&config.log_level, &log_dir)
}

fn parse_degrees(raw: &str) -> Result<f64, String> {
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| format!("invalid coordinate `{raw}`"))
}
