use serde::Deserialize;
use std::fs;
use time::OffsetDateTime;

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    pub table_path: String,
    pub forecast_path: Option<String>,
}

/// Reactive-to-active ratio thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_limit_x1")]
    pub x1: f64,
    #[serde(default = "default_limit_x3")]
    pub x3: f64,
}

fn default_limit_x1() -> f64 {
    0.4843
}

fn default_limit_x3() -> f64 {
    1.1691
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            x1: default_limit_x1(),
            x3: default_limit_x3(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastConfig {
    /// Start of the historical EA shown before the forecast.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub history_start: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub data: DataConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub forecast: ForecastConfig,
    pub http: HttpConfig,
    pub metrics: Option<MetricsConfig>,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        use std::env;

        let path = env::var("DASHBOARD_CONFIG").unwrap_or_else(|_| "dashboard-config.toml".to_string());
        let contents = fs::read_to_string(&path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        let cfg: AppConfig = toml::from_str(contents)?;
        if cfg.limits.x1 >= cfg.limits.x3 {
            anyhow::bail!("limits.x1 must be below limits.x3");
        }
        Ok(cfg)
    }
}
