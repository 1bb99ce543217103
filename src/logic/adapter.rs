use crate::config::{Config, EnvironmentalFallback, GroundwaterThresholds};
use crate::datasources::{EnvironmentalProvider, GroundwaterProvider, HistoricalAverages};
use crate::error::{Result, WaterWalletError};
use crate::models::{
    AcquiredSample, DataSource, EnvironmentSample, EnvironmentalFeatures, GroundwaterReading,
    GroundwaterStatus, SampleProvenance,
};
use std::future::Future;
use std::time::Duration;

/// Normalizes the environmental and groundwater providers into a single
/// sample. Provider failures are replaced by fallback values and recorded in
/// the sample's provenance; acquisition itself never fails.
pub struct FeatureAdapter<E, G> {
    environmental: Option<E>,
    groundwater: Option<G>,
    fallback: EnvironmentalFallback,
    environmental_timeout: Duration,
    groundwater_timeout: Duration,
    thresholds: GroundwaterThresholds,
    historical: HistoricalAverages,
}

impl<E: EnvironmentalProvider, G: GroundwaterProvider> FeatureAdapter<E, G> {
    /// A `None` provider is treated as permanently unavailable.
    pub fn new(environmental: Option<E>, groundwater: Option<G>, config: &Config) -> Self {
        Self {
            environmental,
            groundwater,
            fallback: config.environmental.fallback,
            environmental_timeout: config.environmental.timeout(),
            groundwater_timeout: config.groundwater.timeout(),
            thresholds: config.groundwater.thresholds,
            historical: HistoricalAverages::new(
                &config.groundwater.regional_averages,
                config.groundwater.default_depth_m,
            ),
        }
    }

    /// Both providers are queried concurrently, so latency is bounded by the
    /// slower timeout rather than their sum.
    pub async fn acquire(&self, latitude: f64, longitude: f64, region: &str) -> AcquiredSample {
        let ((features, env_source, env_summary), groundwater) = tokio::join!(
            self.acquire_features(latitude, longitude),
            self.acquire_groundwater(region)
        );

        let sample = EnvironmentSample::new(features, &groundwater);
        let provenance = SampleProvenance {
            environmental: env_source,
            groundwater: groundwater.source,
            environmental_summary: env_summary,
            groundwater_summary: groundwater.summary(),
        };

        AcquiredSample { sample, provenance }
    }

    async fn acquire_features(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> (EnvironmentalFeatures, DataSource, String) {
        let result = match self.environmental {
            Some(ref provider) => {
                with_timeout(
                    provider.name(),
                    self.environmental_timeout,
                    provider.fetch_features(latitude, longitude),
                )
                .await
                .and_then(validate_features)
            }
            None => Err(WaterWalletError::DataSourceUnavailable(
                "environmental provider disabled".into(),
            )),
        };

        match result {
            Ok(features) => {
                let summary = format!(
                    "{}: {:.0} mm/yr rain, soil moisture {:.2}, {:.1} °C",
                    DataSource::NasaPower,
                    features.annual_rain_mm,
                    features.soil_moisture,
                    features.temp_c
                );
                (features, DataSource::NasaPower, summary)
            }
            Err(e) => {
                tracing::warn!("Environmental features unavailable, using safety defaults: {}", e);
                let features = EnvironmentalFeatures {
                    annual_rain_mm: self.fallback.annual_rain_mm,
                    soil_moisture: self.fallback.soil_moisture,
                    temp_c: self.fallback.temp_c,
                };
                let summary = format!(
                    "{}: {:.0} mm/yr rain, soil moisture {:.2}, {:.1} °C ({})",
                    DataSource::SafetyDefaults,
                    features.annual_rain_mm,
                    features.soil_moisture,
                    features.temp_c,
                    e
                );
                (features, DataSource::SafetyDefaults, summary)
            }
        }
    }

    /// Groundwater reading for a region; falls back to the historical average.
    pub async fn acquire_groundwater(&self, region: &str) -> GroundwaterReading {
        let result = match self.groundwater {
            Some(ref provider) => {
                with_timeout(
                    provider.name(),
                    self.groundwater_timeout,
                    provider.fetch_depth(region),
                )
                .await
            }
            None => Err(WaterWalletError::DataSourceUnavailable(
                "groundwater provider disabled".into(),
            )),
        };

        match result {
            Ok(depth_m) => GroundwaterReading {
                region: region.to_string(),
                depth_m,
                status: classify_depth(depth_m, &self.thresholds),
                source: DataSource::MonitoringNetwork,
            },
            Err(e) => {
                let (depth_m, known) = self.historical.depth_for(region);
                if known {
                    tracing::warn!(
                        "Groundwater reading unavailable for {}, using historical average: {}",
                        region,
                        e
                    );
                } else {
                    tracing::warn!(
                        "Groundwater reading unavailable for unknown region {}, using global default: {}",
                        region,
                        e
                    );
                }
                GroundwaterReading {
                    region: region.to_string(),
                    depth_m,
                    status: GroundwaterStatus::Historical,
                    source: DataSource::HistoricalAverage,
                }
            }
        }
    }
}

/// Coarse aquifer classification from a live depth reading.
pub fn classify_depth(depth_m: f64, thresholds: &GroundwaterThresholds) -> GroundwaterStatus {
    if depth_m <= thresholds.good_max_m {
        GroundwaterStatus::Good
    } else if depth_m <= thresholds.moderate_max_m {
        GroundwaterStatus::Moderate
    } else {
        GroundwaterStatus::Critical
    }
}

async fn with_timeout<T>(
    name: &str,
    timeout: Duration,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(WaterWalletError::DataSourceUnavailable(format!(
            "{} timed out after {:?}",
            name, timeout
        ))),
    }
}

fn validate_features(features: EnvironmentalFeatures) -> Result<EnvironmentalFeatures> {
    let valid = features.annual_rain_mm.is_finite()
        && features.annual_rain_mm >= 0.0
        && (0.0..=1.0).contains(&features.soil_moisture)
        && features.temp_c.is_finite();

    if valid {
        Ok(features)
    } else {
        Err(WaterWalletError::InvalidData(format!(
            "environmental features out of range: {:?}",
            features
        )))
    }
}
