use crate::core::narrator::{DEFAULT_LANGUAGE, DEFAULT_SYSTEM_PROMPT};
use crate::core::session::FallbackPlace;
use crate::domain::model::{Coordinates, Locale, FALLBACK_COORDINATES};
use crate::utils::error::{FortuneError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "astro-fortune.toml";
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub geocoding: GeocodingConfig,
    pub llm: LlmConfig,
    pub ephemeris: EphemerisConfig,
    pub fallback: FallbackConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodingConfig {
    pub endpoint: String,
    pub user_agent: String,
    pub timeout_seconds: u64,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: "astrology_app".to_string(),
            timeout_seconds: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub model: String,
    /// 回覆語言，會代入 system prompt 與每個 user prompt
    pub language: String,
    pub system_prompt: String,
    pub timeout_seconds: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-3.5-turbo".to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            timeout_seconds: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EphemerisConfig {
    pub path: String,
    /// 檔案不存在時從這裡下載；設為空字串則不下載
    pub download_url: Option<String>,
    pub download_timeout_seconds: u64,
}

impl Default for EphemerisConfig {
    fn default() -> Self {
        Self {
            path: "de421.bsp".to_string(),
            download_url: Some("https://ssd.jpl.nasa.gov/ftp/eph/planets/bsp/de421.bsp".to_string()),
            download_timeout_seconds: 300,
        }
    }
}

impl EphemerisConfig {
    pub fn download_url(&self) -> Option<&str> {
        self.download_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            name: "Seoul".to_string(),
            latitude: FALLBACK_COORDINATES.latitude,
            longitude: FALLBACK_COORDINATES.longitude,
        }
    }
}

impl FallbackConfig {
    pub fn place(&self) -> FallbackPlace {
        FallbackPlace {
            name: self.name.clone(),
            coordinates: Coordinates::new(self.latitude, self.longitude),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub locale: Locale,
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 檔案不存在時使用預設值
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            tracing::debug!("Loading config from {}", path.display());
            Self::from_file(path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| FortuneError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${OPENAI_API_KEY})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| FortuneError::ConfigError {
            message: format!("placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// API key 來源：設定檔 → OPENAI_API_KEY 環境變數
    pub fn resolve_api_key(&self) -> Result<String> {
        self.resolve_api_key_with(|name| std::env::var(name).ok())
    }

    pub fn resolve_api_key_with<F>(&self, lookup: F) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let usable = |value: &str| {
            !value.trim().is_empty() && !validation::is_unresolved_placeholder(value)
        };

        if let Some(key) = self.llm.api_key.as_deref().filter(|k| usable(k)) {
            return Ok(key.trim().to_string());
        }

        match lookup(API_KEY_ENV) {
            Some(key) if usable(&key) => Ok(key.trim().to_string()),
            _ => Err(FortuneError::MissingConfigError {
                field: "llm.api_key".to_string(),
            }),
        }
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("geocoding.endpoint", &self.geocoding.endpoint)?;
        validation::validate_non_empty_string("geocoding.user_agent", &self.geocoding.user_agent)?;
        validation::validate_range("geocoding.timeout_seconds", self.geocoding.timeout_seconds, 1, 300)?;

        validation::validate_url("llm.endpoint", &self.llm.endpoint)?;
        validation::validate_non_empty_string("llm.model", &self.llm.model)?;
        validation::validate_non_empty_string("llm.language", &self.llm.language)?;
        validation::validate_non_empty_string("llm.system_prompt", &self.llm.system_prompt)?;
        validation::validate_range("llm.timeout_seconds", self.llm.timeout_seconds, 1, 600)?;

        validation::validate_path("ephemeris.path", &self.ephemeris.path)?;
        if let Some(url) = self.ephemeris.download_url() {
            validation::validate_url("ephemeris.download_url", url)?;
        }
        validation::validate_range(
            "ephemeris.download_timeout_seconds",
            self.ephemeris.download_timeout_seconds,
            1,
            3600,
        )?;

        validation::validate_non_empty_string("fallback.name", &self.fallback.name)?;
        validation::validate_range("fallback.latitude", self.fallback.latitude, -90.0, 90.0)?;
        validation::validate_range("fallback.longitude", self.fallback.longitude, -180.0, 180.0)?;

        Ok(())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
