pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod ephemeris;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::toml_config::AppConfig;
pub use core::{CollectingSink, FortuneNarrator, FortuneSession};
pub use ephemeris::EphemerisReader;
pub use utils::error::{FortuneError, Result};
