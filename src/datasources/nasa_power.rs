use super::EnvironmentalProvider;
use crate::config::EnvironmentalConfig;
use crate::error::{Result, WaterWalletError};
use crate::models::EnvironmentalFeatures;
use chrono::{Duration, NaiveDate, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Weekly rainfall is scaled by this factor to approximate an annual total.
const ANNUALIZE_FACTOR: f64 = 40.0;
const MIN_ANNUAL_RAIN_MM: f64 = 500.0;

pub struct NasaPowerClient {
    client: reqwest::Client,
    config: EnvironmentalConfig,
}

// NASA POWER daily point API response structures
#[derive(Debug, Deserialize)]
struct PowerResponse {
    properties: PowerProperties,
}

#[derive(Debug, Deserialize)]
struct PowerProperties {
    parameter: PowerParameters,
}

#[derive(Debug, Deserialize)]
struct PowerParameters {
    #[serde(rename = "GWETPROF")]
    soil_wetness: BTreeMap<String, f64>, // root-zone wetness fraction
    #[serde(rename = "T2M")]
    temperature: BTreeMap<String, f64>, // 2m air temperature, C
    #[serde(rename = "PRECTOTCORR")]
    precipitation: BTreeMap<String, f64>, // corrected daily precipitation, mm
}

impl NasaPowerClient {
    pub fn new(config: EnvironmentalConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self { client, config })
    }

    /// Query window runs from ten days ago to three days ago; the most
    /// recent days are not yet published.
    fn build_url(&self, latitude: f64, longitude: f64, today: NaiveDate) -> String {
        let start = today - Duration::days(10);
        let end = today - Duration::days(3);
        format!(
            "{}?parameters=GWETPROF,T2M,PRECTOTCORR&community=AG&longitude={}&latitude={}&start={}&end={}&format=JSON",
            self.config.base_url,
            longitude,
            latitude,
            start.format("%Y%m%d"),
            end.format("%Y%m%d")
        )
    }

    /// Test connection to the NASA POWER API
    pub async fn test_connection(&self, latitude: f64, longitude: f64) -> Result<bool> {
        let url = self.build_url(latitude, longitude, Utc::now().date_naive());

        let response =
            self.client.get(&url).send().await.map_err(|e| {
                WaterWalletError::DataSourceUnavailable(format!("NASA POWER: {}", e))
            })?;

        Ok(response.status().is_success())
    }
}

impl EnvironmentalProvider for NasaPowerClient {
    fn name(&self) -> &'static str {
        "NASA POWER"
    }

    async fn fetch_features(&self, latitude: f64, longitude: f64) -> Result<EnvironmentalFeatures> {
        let url = self.build_url(latitude, longitude, Utc::now().date_naive());
        tracing::debug!("Fetching NASA POWER features for ({}, {})", latitude, longitude);

        let response =
            self.client.get(&url).send().await.map_err(|e| {
                WaterWalletError::DataSourceUnavailable(format!("NASA POWER: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(WaterWalletError::DataSourceUnavailable(format!(
                "NASA POWER returned {}: {}",
                status, body
            )));
        }

        let power: PowerResponse = response.json().await.map_err(|e| {
            WaterWalletError::DataSourceUnavailable(format!(
                "Failed to parse NASA POWER response: {}",
                e
            ))
        })?;

        features_from_parameters(&power.properties.parameter)
    }
}

fn features_from_parameters(params: &PowerParameters) -> Result<EnvironmentalFeatures> {
    // POWER marks missing days with -999
    let soil_moisture = mean(params.soil_wetness.values().copied().filter(|v| *v >= 0.0))
        .ok_or_else(|| missing("GWETPROF"))?;

    let temp_c = mean(params.temperature.values().copied().filter(|v| *v > -50.0))
        .ok_or_else(|| missing("T2M"))?;

    let recent_rain: f64 = params
        .precipitation
        .values()
        .copied()
        .filter(|v| *v >= 0.0)
        .sum();

    Ok(EnvironmentalFeatures {
        annual_rain_mm: (recent_rain * ANNUALIZE_FACTOR).max(MIN_ANNUAL_RAIN_MM),
        soil_moisture: soil_moisture.clamp(0.0, 1.0),
        temp_c,
    })
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

fn missing(parameter: &str) -> WaterWalletError {
    WaterWalletError::DataSourceUnavailable(format!(
        "NASA POWER returned no valid {} values",
        parameter
    ))
}
