use super::historical::normalize_region;
use super::GroundwaterProvider;
use crate::config::GroundwaterConfig;
use crate::error::{Result, WaterWalletError};
use serde::Deserialize;

/// Client for a regional groundwater monitoring network that publishes the
/// latest observed water level per district.
pub struct MonitoringNetworkClient {
    client: reqwest::Client,
    config: GroundwaterConfig,
}

#[derive(Debug, Deserialize)]
struct LatestObservation {
    /// Water level in metres below ground level; some stations report it negative
    #[serde(alias = "water_level_mbgl", alias = "depth")]
    depth_m: f64,
    #[serde(default)]
    #[allow(dead_code)]
    observed_at: Option<String>,
}

impl MonitoringNetworkClient {
    pub fn new(config: GroundwaterConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self { client, config })
    }

    fn latest_url(&self, region: &str) -> String {
        format!(
            "{}/regions/{}/latest",
            self.config.base_url.trim_end_matches('/'),
            normalize_region(region).replace(' ', "%20")
        )
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self.client.get(url);
        match self.config.api_key.as_deref() {
            Some(key) if !key.is_empty() => request.header("X-Api-Key", key),
            _ => request,
        }
    }

    /// Test connection to the monitoring network
    pub async fn test_connection(&self) -> Result<bool> {
        let url = format!("{}/health", self.config.base_url.trim_end_matches('/'));

        let response = self.get(&url).send().await.map_err(|e| {
            WaterWalletError::DataSourceUnavailable(format!("Groundwater network: {}", e))
        })?;

        Ok(response.status().is_success())
    }
}

impl GroundwaterProvider for MonitoringNetworkClient {
    fn name(&self) -> &'static str {
        "Groundwater monitoring network"
    }

    async fn fetch_depth(&self, region: &str) -> Result<f64> {
        let url = self.latest_url(region);
        tracing::debug!("Fetching groundwater level for {}", region);

        let response = self.get(&url).send().await.map_err(|e| {
            WaterWalletError::DataSourceUnavailable(format!("Groundwater network: {}", e))
        })?;

        if !response.status().is_success() {
            return Err(WaterWalletError::DataSourceUnavailable(format!(
                "Groundwater network returned {} for {}",
                response.status(),
                region
            )));
        }

        let observation: LatestObservation = response.json().await.map_err(|e| {
            WaterWalletError::DataSourceUnavailable(format!(
                "Failed to parse groundwater response: {}",
                e
            ))
        })?;

        parse_depth(observation.depth_m)
    }
}

fn parse_depth(raw: f64) -> Result<f64> {
    if raw.is_finite() {
        Ok(raw.abs())
    } else {
        Err(WaterWalletError::DataSourceUnavailable(
            "Groundwater network returned a non-finite depth".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_normalizes_region() {
        let config = GroundwaterConfig {
            base_url: "http://localhost:9000/api/".into(),
            ..Default::default()
        };
        let client = MonitoringNetworkClient::new(config).unwrap();
        assert_eq!(
            client.latest_url(" Pune "),
            "http://localhost:9000/api/regions/pune/latest"
        );
    }

    #[test]
    fn observation_aliases() {
        let obs: LatestObservation =
            serde_json::from_str(r#"{"water_level_mbgl": -7.41}"#).unwrap();
        assert_eq!(parse_depth(obs.depth_m).unwrap(), 7.41);

        let obs: LatestObservation =
            serde_json::from_str(r#"{"depth_m": 12.0, "observed_at": "2024-05-01"}"#).unwrap();
        assert_eq!(parse_depth(obs.depth_m).unwrap(), 12.0);
    }

    #[test]
    fn rejects_non_finite_depth() {
        assert!(parse_depth(f64::NAN).is_err());
    }
}
