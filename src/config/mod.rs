pub mod form;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::config::form::{parse_time, BirthForm};
#[cfg(feature = "cli")]
use crate::domain::model::Locale;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use chrono::NaiveTime;
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
fn time_arg(value: &str) -> std::result::Result<NaiveTime, String> {
    parse_time(value).map_err(|e| e.to_string())
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "astro-fortune")]
#[command(about = "Zodiac sign, planet positions and fortune readings for a birth date")]
pub struct CliConfig {
    /// Birth year (1900 to the current year)
    #[arg(long)]
    pub year: Option<i32>,

    /// Birth month (1-12)
    #[arg(long)]
    pub month: Option<u32>,

    /// Birth day (1-31)
    #[arg(long)]
    pub day: Option<u32>,

    /// Birth time of day, HH:MM or HH:MM:SS (UTC)
    #[arg(long, value_parser = time_arg)]
    pub time: Option<NaiveTime>,

    /// Birth place, e.g. "Seoul, South Korea"
    #[arg(long)]
    pub place: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, default_value = toml_config::DEFAULT_CONFIG_FILE)]
    pub config: String,

    /// Display language (en, ko); overrides [display] locale
    #[arg(long)]
    pub locale: Option<Locale>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[arg(long, help = "Never prompt; missing date fields are an error")]
    pub no_input: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn form(&self) -> BirthForm {
        BirthForm {
            year: self.year,
            month: self.month,
            day: self.day,
            time: self.time,
            place: self.place.clone(),
        }
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("config", &self.config)
    }
}
