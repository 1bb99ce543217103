use crate::error::{Result, WaterWalletError};
use crate::models::Language;
use dialoguer::{Input, Password, Select};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub environmental: EnvironmentalConfig,
    #[serde(default)]
    pub groundwater: GroundwaterConfig,
    #[serde(default)]
    pub estimator: EstimatorConfig,
    #[serde(default)]
    pub recommendations: RecommendationsConfig,
}

/// Values substituted when an analysis request leaves a field out.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub crop: String,
    pub region: String,
    pub latitude: f64,
    pub longitude: f64,
    pub area_hectares: f64,
    pub language: Language,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            crop: "sugarcane".into(),
            region: "pune".into(),
            latitude: 19.0,
            longitude: 73.0,
            area_hectares: 1.0,
            language: Language::En,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EnvironmentalConfig {
    pub base_url: String,
    pub timeout_secs: f64,
    pub enabled: bool,
    pub fallback: EnvironmentalFallback,
}

impl Default for EnvironmentalConfig {
    fn default() -> Self {
        Self {
            base_url: "https://power.larc.nasa.gov/api/temporal/daily/point".into(),
            timeout_secs: default_timeout_secs(),
            enabled: true,
            fallback: EnvironmentalFallback::default(),
        }
    }
}

/// Safety values used when the environmental provider cannot answer.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct EnvironmentalFallback {
    pub annual_rain_mm: f64,
    pub soil_moisture: f64,
    pub temp_c: f64,
}

impl Default for EnvironmentalFallback {
    fn default() -> Self {
        Self {
            annual_rain_mm: 700.0,
            soil_moisture: 0.5,
            temp_c: 30.0,
        }
    }
}

#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GroundwaterConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: f64,
    pub enabled: bool,
    pub thresholds: GroundwaterThresholds,
    pub default_depth_m: f64,
    /// Historical average depth per region, merged over the built-in table
    pub regional_averages: BTreeMap<String, f64>,
}

impl Default for GroundwaterConfig {
    fn default() -> Self {
        Self {
            base_url: "https://gw.example.org/api/v1".into(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            enabled: true,
            thresholds: GroundwaterThresholds::default(),
            default_depth_m: 12.0,
            regional_averages: BTreeMap::new(),
        }
    }
}

impl std::fmt::Debug for GroundwaterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroundwaterConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .field("enabled", &self.enabled)
            .field("thresholds", &self.thresholds)
            .field("default_depth_m", &self.default_depth_m)
            .field("regional_averages", &self.regional_averages)
            .finish()
    }
}

/// Depth limits (metres below ground) for the coarse aquifer classification.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct GroundwaterThresholds {
    pub good_max_m: f64,
    pub moderate_max_m: f64,
}

impl Default for GroundwaterThresholds {
    fn default() -> Self {
        Self {
            good_max_m: 8.0,
            moderate_max_m: 15.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Train from the local historical store when it holds enough rows
    pub use_historical: bool,
    pub min_historical_rows: usize,
    pub ridge_lambda: f64,
    pub model_weight: f64,
    pub observed_weight: f64,
    pub observed_base_mm: f64,
    pub observed_mm_per_m: f64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            use_historical: true,
            min_historical_rows: 6,
            ridge_lambda: 0.1,
            model_weight: 0.7,
            observed_weight: 0.3,
            observed_base_mm: 800.0,
            observed_mm_per_m: 20.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RecommendationsConfig {
    pub limit: usize,
}

impl Default for RecommendationsConfig {
    fn default() -> Self {
        Self { limit: 5 }
    }
}

fn default_timeout_secs() -> f64 {
    4.0
}

impl EnvironmentalConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_secs)
    }
}

impl GroundwaterConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_secs)
    }
}

impl Config {
    pub fn load(config_override: Option<&PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => {
                if !p.exists() {
                    return Err(WaterWalletError::Config(format!(
                        "Config file not found at {:?}",
                        p
                    )));
                }
                p.clone()
            }
            None => match Self::find_config_path() {
                Some(p) => p,
                None => {
                    tracing::info!("No config file found - using built-in defaults");
                    return Ok(Self::default());
                }
            },
        };

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| WaterWalletError::Config(format!("Failed to read config: {}", e)))?;

        let config = Self::parse(&config_str)?;
        tracing::debug!("Loaded configuration from {:?}", config_path);
        Ok(config)
    }

    /// Parse YAML text, substituting `${VAR}` placeholders first.
    pub fn parse(content: &str) -> Result<Self> {
        let content = Self::substitute_env_vars(content);

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| WaterWalletError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let est = &self.estimator;
        if est.model_weight < 0.0 || est.observed_weight < 0.0 {
            return Err(WaterWalletError::Config(
                "estimator weights must be non-negative".into(),
            ));
        }
        if est.model_weight + est.observed_weight <= 0.0 {
            return Err(WaterWalletError::Config(
                "estimator weights must not both be zero".into(),
            ));
        }
        if est.observed_mm_per_m < 0.0 {
            return Err(WaterWalletError::Config(
                "observed_mm_per_m must be non-negative".into(),
            ));
        }
        if est.ridge_lambda <= 0.0 {
            return Err(WaterWalletError::Config(
                "ridge_lambda must be positive".into(),
            ));
        }

        let t = &self.groundwater.thresholds;
        if !(t.good_max_m >= 0.0 && t.good_max_m <= t.moderate_max_m) {
            return Err(WaterWalletError::Config(format!(
                "groundwater thresholds out of order: good {} > moderate {}",
                t.good_max_m, t.moderate_max_m
            )));
        }

        for (name, secs) in [
            ("environmental", self.environmental.timeout_secs),
            ("groundwater", self.groundwater.timeout_secs),
        ] {
            if secs <= 0.0 || Duration::try_from_secs_f64(secs).is_err() {
                return Err(WaterWalletError::Config(format!(
                    "{} timeout must be a positive number of seconds",
                    name
                )));
            }
        }

        if self.groundwater.default_depth_m < 0.0
            || self.groundwater.regional_averages.values().any(|d| *d < 0.0)
        {
            return Err(WaterWalletError::Config(
                "groundwater depths must be non-negative".into(),
            ));
        }

        if self.defaults.area_hectares <= 0.0 {
            return Err(WaterWalletError::Config(
                "defaults.area_hectares must be positive".into(),
            ));
        }

        Ok(())
    }

    /// Search for config.yaml in standard locations.
    fn find_config_path() -> Option<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Some(local_config);
        }

        dirs::config_dir()
            .map(|dir| dir.join("water-wallet").join("config.yaml"))
            .filter(|p| p.exists())
    }

    /// Default path for writing new config files (~/.config/water-wallet/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| WaterWalletError::Config("Cannot determine config directory".into()))?
            .join("water-wallet");
        Ok(config_dir.join("config.yaml"))
    }

    /// Run interactive setup prompts and write config to disk.
    pub fn setup_interactive() -> Result<(Self, PathBuf)> {
        println!();
        println!("Let's set up Water Wallet!");
        println!();

        let mut config = Config::default();

        println!("Farm defaults");
        config.defaults.region = Input::new()
            .with_prompt("  Region / district")
            .default(config.defaults.region.clone())
            .interact_text()
            .map_err(input_error)?;

        config.defaults.latitude = Input::new()
            .with_prompt("  Latitude")
            .default(config.defaults.latitude)
            .interact_text()
            .map_err(input_error)?;

        config.defaults.longitude = Input::new()
            .with_prompt("  Longitude")
            .default(config.defaults.longitude)
            .interact_text()
            .map_err(input_error)?;

        config.defaults.crop = Input::new()
            .with_prompt("  Default crop")
            .default(config.defaults.crop.clone())
            .interact_text()
            .map_err(input_error)?;

        let languages = [Language::En, Language::Hi];
        let choice = Select::new()
            .with_prompt("  Language")
            .items(&["en", "hi"])
            .default(0)
            .interact()
            .map_err(input_error)?;
        config.defaults.language = languages[choice];

        println!();

        println!("Groundwater monitoring network (leave URL blank to always use historical averages)");
        let gw_url: String = Input::new()
            .with_prompt("  Base URL")
            .default(String::new())
            .allow_empty(true)
            .interact_text()
            .map_err(input_error)?;

        if gw_url.is_empty() {
            config.groundwater.enabled = false;
        } else {
            config.groundwater.base_url = gw_url;
            let key: String = Password::new()
                .with_prompt("  API key (optional)")
                .allow_empty_password(true)
                .interact()
                .map_err(input_error)?;
            config.groundwater.api_key = (!key.is_empty()).then_some(key);
        }

        println!();

        let config_path = Self::default_config_path()?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(&config)
            .map_err(|e| WaterWalletError::Config(format!("Failed to serialize config: {}", e)))?;

        let content = format!(
            "# Water Wallet Configuration\n# Generated by `water-wallet init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(&config_path, content)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    fn substitute_env_vars(content: &str) -> String {
        let mut result = content.to_string();

        let re = match regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}") {
            Ok(re) => re,
            Err(_) => return result,
        };

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        result
    }

    pub fn data_dir(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        if let Some(dir) = data_dir_override {
            std::fs::create_dir_all(dir)?;
            return Ok(dir.clone());
        }

        if let Ok(dir) = std::env::var("WATER_WALLET_DATA_DIR") {
            let p = PathBuf::from(dir);
            std::fs::create_dir_all(&p)?;
            return Ok(p);
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| WaterWalletError::Config("Cannot determine data directory".into()))?
            .join("water-wallet");

        std::fs::create_dir_all(&data_dir)?;
        Ok(data_dir)
    }

    pub fn db_path(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        Ok(Self::data_dir(data_dir_override)?.join("water-wallet.db"))
    }
}

fn input_error(e: dialoguer::Error) -> WaterWalletError {
    WaterWalletError::Config(format!("Input error: {}", e))
}
