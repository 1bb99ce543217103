pub mod historical;
pub mod monitoring_network;
pub mod nasa_power;

pub use historical::HistoricalAverages;
pub use monitoring_network::MonitoringNetworkClient;
pub use nasa_power::NasaPowerClient;

use crate::error::Result;
use crate::models::EnvironmentalFeatures;
use std::future::Future;

/// Source of satellite-derived rainfall, soil moisture and temperature.
pub trait EnvironmentalProvider: Send + Sync {
    fn name(&self) -> &'static str;

    fn fetch_features(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> impl Future<Output = Result<EnvironmentalFeatures>> + Send;
}

/// Source of observed groundwater depth (metres below ground) per region.
pub trait GroundwaterProvider: Send + Sync {
    fn name(&self) -> &'static str;

    fn fetch_depth(&self, region: &str) -> impl Future<Output = Result<f64>> + Send;
}
