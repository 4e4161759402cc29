//! Configuration: indicator catalog, endpoint and export defaults
//!
//! Loaded from `<config_home>/indicadores/config.toml` when present, or from an
//! explicit `--config` path. Every key is optional; missing keys fall back to
//! the built-in catalog below.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{IndicatorError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.bcb.gov.br/dados/serie";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_EXPORT_PATH: &str = "relatorio_mei.xlsx";
pub const FIXTURES_DIR_ENV: &str = "INDICADORES_FIXTURES_DIR";

/// One tracked indicator: display name, SGS series id and alert threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSpec {
    pub name: String,
    pub series_id: u32,
    /// Values strictly above this raise an alert
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub advice: Option<String>,
}

impl IndicatorSpec {
    pub fn new(name: &str, series_id: u32, threshold: f64, advice: &str) -> Self {
        Self {
            name: name.to_string(),
            series_id,
            threshold: Some(threshold),
            advice: Some(advice.to_string()),
        }
    }
}

/// Built-in catalog.
///
/// SELIC and IPCA ids follow the published dashboard (4390 / 433); an older
/// variant used 4189 / 13522. Override in the config file when needed.
///
/// The SELIC and IPCA thresholds (10 and 5) are annual-rate figures, while
/// series 4390 and 433 publish monthly rates (around 1% and 0.4%). With the
/// default ids those two alerts stay `Normal` on real data. Point the catalog
/// at annualized series (e.g. SELIC 4189, IPCA 13522) or lower the thresholds
/// to get alerts that can fire.
pub fn default_indicators() -> Vec<IndicatorSpec> {
    vec![
        IndicatorSpec::new("SELIC", 4390, 10.0, "crédito caro: evite empréstimos"),
        IndicatorSpec::new("IPCA", 433, 5.0, "reajuste preços mensalmente"),
        IndicatorSpec::new(
            "Inadimplencia",
            15885,
            5.0,
            "ofereça descontos para pagamento à vista",
        ),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub timeout_secs: u64,
    pub export_path: PathBuf,
    /// Read `<series_id>.json` files from here instead of the network
    pub fixtures_dir: Option<PathBuf>,
    pub indicators: Vec<IndicatorSpec>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            export_path: PathBuf::from(DEFAULT_EXPORT_PATH),
            fixtures_dir: None,
            indicators: default_indicators(),
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist; the default location is optional.
    /// `INDICADORES_FIXTURES_DIR` overrides `fixtures_dir` in both cases.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => {
                    debug!("No config file found, using built-in defaults");
                    Self::default()
                }
            },
        };

        if let Some(dir) = std::env::var_os(FIXTURES_DIR_ENV) {
            config.fixtures_dir = Some(PathBuf::from(dir));
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        info!("Loading config from {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|e| {
            IndicatorError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| IndicatorError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.indicators.is_empty() {
            return Err(IndicatorError::Config(
                "at least one indicator is required".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(IndicatorError::Config(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for spec in &self.indicators {
            if spec.name.trim().is_empty() {
                return Err(IndicatorError::Config(
                    "indicator name cannot be empty".to_string(),
                ));
            }
            if !seen.insert(spec.name.to_lowercase()) {
                return Err(IndicatorError::Config(format!(
                    "duplicate indicator name: {}",
                    spec.name
                )));
            }
        }
        Ok(())
    }

    /// Case-insensitive catalog lookup
    pub fn indicator(&self, name: &str) -> Result<&IndicatorSpec> {
        self.indicators
            .iter()
            .find(|spec| spec.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| IndicatorError::UnknownIndicator(name.to_string()))
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dir_spec::config_home().map(|dir| dir.join("indicadores").join("config.toml"))
}
