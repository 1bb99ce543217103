use super::{GroundwaterStatus, Recommendation, Verdict};
use crate::error::{Result, WaterWalletError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Language {
    #[default]
    En,
    Hi,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
        }
    }
}

impl FromStr for Language {
    type Err = WaterWalletError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Language::En),
            "hi" | "hindi" => Ok(Language::Hi),
            other => Err(WaterWalletError::InvalidRequest(format!(
                "unsupported language '{}' (expected en or hi)",
                other
            ))),
        }
    }
}

impl TryFrom<String> for Language {
    type Error = WaterWalletError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An analysis request as submitted by a caller. Missing fields take the
/// configured defaults; present fields must be well-formed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisRequest {
    pub crop: Option<String>,
    pub area: Option<f64>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub region: Option<String>,
    pub language: Option<Language>,
    pub month: Option<u32>,
}

impl AnalysisRequest {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| WaterWalletError::InvalidRequest(e.to_string()))
    }
}

/// A request after defaults were applied and every field validated.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    pub crop: String,
    pub area_hectares: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub region: String,
    pub language: Language,
    pub month: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct WaterSummary {
    pub available_mm: f64,
    pub needed_mm: f64,
    pub balance_mm: f64,
    pub groundwater_depth_m: f64,
    pub groundwater_status: GroundwaterStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct DataSources {
    pub environmental_summary: String,
    pub groundwater_summary: String,
    pub estimator_label: String,
    pub environmental_fallback: bool,
    pub groundwater_fallback: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    pub selected_crop: String,
    pub crop_recognized: bool,
    pub in_season: bool,
    pub message: String,
    pub expected_profit: f64,
    pub duration_days: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub verdict: Verdict,
    pub language: Language,
    pub month: u32,
    pub water: WaterSummary,
    pub data_sources: DataSources,
    pub outcome: Outcome,
    pub recommendations: Vec<Recommendation>,
}
