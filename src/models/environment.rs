use serde::{Deserialize, Serialize};

/// Coarse aquifer health classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroundwaterStatus {
    Good,
    Moderate,
    Critical,
    /// Depth came from a historical average, not a live observation
    Historical,
}

impl GroundwaterStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroundwaterStatus::Good => "good",
            GroundwaterStatus::Moderate => "moderate",
            GroundwaterStatus::Critical => "critical",
            GroundwaterStatus::Historical => "historical",
        }
    }
}

impl std::fmt::Display for GroundwaterStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where a piece of environmental input came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    NasaPower,
    MonitoringNetwork,
    SafetyDefaults,
    HistoricalAverage,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::NasaPower => "NASA POWER satellite",
            DataSource::MonitoringNetwork => "Groundwater monitoring network",
            DataSource::SafetyDefaults => "Safety defaults",
            DataSource::HistoricalAverage => "Historical regional average",
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(
            self,
            DataSource::SafetyDefaults | DataSource::HistoricalAverage
        )
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Rainfall, moisture and temperature features from the environmental provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalFeatures {
    pub annual_rain_mm: f64,
    pub soil_moisture: f64,
    pub temp_c: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundwaterReading {
    pub region: String,
    pub depth_m: f64,
    pub status: GroundwaterStatus,
    pub source: DataSource,
}

impl GroundwaterReading {
    pub fn summary(&self) -> String {
        format!(
            "{}: {:.1} m below ground ({}) for {}",
            self.source, self.depth_m, self.status, self.region
        )
    }
}

/// The normalized environmental input for one analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnvironmentSample {
    pub annual_rain_mm: f64,
    pub soil_moisture: f64,
    pub temp_c: f64,
    pub groundwater_depth_m: f64,
    pub groundwater_status: GroundwaterStatus,
}

impl EnvironmentSample {
    /// Builds a sample, clamping values into their valid ranges.
    pub fn new(features: EnvironmentalFeatures, groundwater: &GroundwaterReading) -> Self {
        Self {
            annual_rain_mm: non_negative(features.annual_rain_mm),
            soil_moisture: if features.soil_moisture.is_finite() {
                features.soil_moisture.clamp(0.0, 1.0)
            } else {
                0.0
            },
            temp_c: features.temp_c,
            groundwater_depth_m: non_negative(groundwater.depth_m.abs()),
            groundwater_status: groundwater.status,
        }
    }

    /// The four numeric features in estimator order.
    pub fn features(&self) -> [f64; 4] {
        [
            self.annual_rain_mm,
            self.soil_moisture,
            self.temp_c,
            self.groundwater_depth_m,
        ]
    }
}

/// Which providers answered live and which were replaced by fallbacks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleProvenance {
    pub environmental: DataSource,
    pub groundwater: DataSource,
    pub environmental_summary: String,
    pub groundwater_summary: String,
}

/// A sample together with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AcquiredSample {
    pub sample: EnvironmentSample,
    pub provenance: SampleProvenance,
}

fn non_negative(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        0.0
    }
}
