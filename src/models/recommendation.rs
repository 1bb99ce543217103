use super::CropType;
use serde::Serialize;

/// An alternative crop that fits the available water.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub crop_id: String,
    pub display_name: String,
    #[serde(rename = "type")]
    pub crop_type: CropType,
    pub profit_total: f64,
    pub water_needed_mm: f64,
    pub profit_per_drop: f64,
    pub sowing_start_month: u32,
    pub sowing_tag: String,
    pub is_immediate: bool,
    pub duration_days: u32,
}
