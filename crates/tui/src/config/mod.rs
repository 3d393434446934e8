use std::time::Duration;

use chrono::NaiveDate;
use chrono_tz::Tz;
use clap::Parser;
use serde::Deserialize;

use crate::error::{AppError, Result};

const DEFAULT_CONFIG_PATH: &str = "config/trackspend.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Ledger service URL. Empty means the in-memory ledger seeded from
    /// `data_file`.
    pub base_url: String,
    pub data_file: String,
    pub currency: String,
    pub timezone: String,
    pub load_more_delay_ms: u64,
    pub close_animation_ms: u64,
    pub refresh_delay_ms: u64,
    pub log_file: String,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            data_file: "data/ledger.json".to_string(),
            currency: "PHP".to_string(),
            timezone: "Asia/Manila".to_string(),
            load_more_delay_ms: 500,
            close_animation_ms: 250,
            refresh_delay_ms: 300,
            log_file: "trackspend.log".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn uses_remote_ledger(&self) -> bool {
        !self.base_url.trim().is_empty()
    }

    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| AppError::Timezone(self.timezone.clone()))
    }

    /// Current date in the configured timezone.
    pub fn today(&self) -> Result<NaiveDate> {
        let tz = self.tz()?;
        Ok(chrono::Utc::now().with_timezone(&tz).date_naive())
    }

    pub fn load_more_delay(&self) -> Duration {
        Duration::from_millis(self.load_more_delay_ms)
    }

    pub fn close_animation(&self) -> Duration {
        Duration::from_millis(self.close_animation_ms)
    }

    pub fn refresh_delay(&self) -> Duration {
        Duration::from_millis(self.refresh_delay_ms)
    }
}

#[derive(Debug, Parser)]
#[command(name = "trackspend", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:8080/api/).
    #[arg(long)]
    base_url: Option<String>,
    /// Override the seed file of the in-memory ledger.
    #[arg(long)]
    data_file: Option<String>,
    /// Override timezone (IANA name).
    #[arg(long)]
    timezone: Option<String>,
    /// Override log filter level (e.g. debug).
    #[arg(long)]
    log_level: Option<String>,
}

pub fn load() -> Result<AppConfig> {
    load_from(Args::parse())
}

fn load_from(args: Args) -> Result<AppConfig> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("TRACKSPEND"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(data_file) = args.data_file {
        settings.data_file = data_file;
    }
    if let Some(timezone) = args.timezone {
        settings.timezone = timezone;
    }
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }

    settings.tz()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["trackspend", "--config", "does/not/exist.toml"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults_without_a_config_file() {
        let settings = load_from(args(&[])).unwrap();
        assert!(!settings.uses_remote_ledger());
        assert_eq!(settings.currency, "PHP");
        assert_eq!(settings.load_more_delay(), Duration::from_millis(500));
        assert_eq!(settings.close_animation(), Duration::from_millis(250));
        assert_eq!(settings.tz().unwrap(), chrono_tz::Asia::Manila);
    }

    #[test]
    fn cli_overrides_win() {
        let settings = load_from(args(&[
            "--base-url",
            "http://127.0.0.1:8080/api/",
            "--timezone",
            "Europe/Rome",
        ]))
        .unwrap();
        assert!(settings.uses_remote_ledger());
        assert_eq!(settings.tz().unwrap(), chrono_tz::Europe::Rome);
    }

    #[test]
    fn unknown_timezone_is_rejected() {
        let err = load_from(args(&["--timezone", "Mars/Olympus"])).unwrap_err();
        assert!(matches!(err, AppError::Timezone(tz) if tz == "Mars/Olympus"));
    }
}
