use super::adapter::FeatureAdapter;
use super::blending::WaterBlender;
use super::catalog::CropCatalog;
use super::estimator::WaterEstimator;
use super::feasibility::{self, GroundwaterContext};
use super::ranker;
use crate::config::{Config, DefaultsConfig};
use crate::datasources::{EnvironmentalProvider, GroundwaterProvider};
use crate::error::{Result, WaterWalletError};
use crate::models::{
    AnalysisReport, AnalysisRequest, DataSources, Outcome, ValidatedRequest, WaterSummary,
};
use chrono::Datelike;
use std::sync::Arc;

/// Runs the full analysis for one request: acquire features, estimate
/// available water, evaluate the requested crop and rank the alternatives.
///
/// The estimator and catalog are built once at startup and shared read-only
/// between requests.
pub struct AnalysisService<E, G> {
    adapter: FeatureAdapter<E, G>,
    estimator: Arc<dyn WaterEstimator>,
    blender: WaterBlender,
    catalog: Arc<CropCatalog>,
    defaults: DefaultsConfig,
    limit: usize,
}

impl<E: EnvironmentalProvider, G: GroundwaterProvider> AnalysisService<E, G> {
    pub fn new(
        adapter: FeatureAdapter<E, G>,
        estimator: Arc<dyn WaterEstimator>,
        catalog: Arc<CropCatalog>,
        config: &Config,
    ) -> Self {
        Self {
            adapter,
            estimator,
            blender: WaterBlender::new(&config.estimator),
            catalog,
            defaults: config.defaults.clone(),
            limit: config.recommendations.limit,
        }
    }

    pub async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisReport> {
        let current_month = chrono::Local::now().month();
        let request = self.validate(request, current_month)?;
        Ok(self.analyze_validated(&request).await)
    }

    /// Applies defaults to missing fields and rejects malformed ones.
    pub fn validate(&self, request: AnalysisRequest, current_month: u32) -> Result<ValidatedRequest> {
        let area_hectares = request.area.unwrap_or(self.defaults.area_hectares);
        if !area_hectares.is_finite() || area_hectares <= 0.0 {
            return Err(WaterWalletError::InvalidRequest(format!(
                "area must be a positive number of hectares, got {}",
                area_hectares
            )));
        }

        let latitude = request.lat.unwrap_or(self.defaults.latitude);
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(WaterWalletError::InvalidRequest(format!(
                "latitude {} outside [-90, 90]",
                latitude
            )));
        }

        let longitude = request.lon.unwrap_or(self.defaults.longitude);
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(WaterWalletError::InvalidRequest(format!(
                "longitude {} outside [-180, 180]",
                longitude
            )));
        }

        let month = request.month.unwrap_or(current_month);
        if !(1..=12).contains(&month) {
            return Err(WaterWalletError::InvalidRequest(format!(
                "month {} outside 1-12",
                month
            )));
        }

        let crop = non_blank(request.crop).unwrap_or_else(|| self.defaults.crop.clone());
        let region = non_blank(request.region).unwrap_or_else(|| self.defaults.region.clone());

        Ok(ValidatedRequest {
            crop: crop.to_lowercase(),
            area_hectares,
            latitude,
            longitude,
            region,
            language: request.language.unwrap_or(self.defaults.language),
            month,
        })
    }

    pub async fn analyze_validated(&self, request: &ValidatedRequest) -> AnalysisReport {
        let acquired = self
            .adapter
            .acquire(request.latitude, request.longitude, &request.region)
            .await;
        let sample = acquired.sample;

        let water = self.blender.blend(self.estimator.as_ref(), &sample);
        tracing::info!(
            "Available water {} mm (model {:.0} mm, observed {:.0} mm)",
            water.available_mm,
            water.model_estimate_mm,
            water.observed_mm
        );

        let lookup = self.catalog.find_or_default(&request.crop);
        if !lookup.recognized {
            tracing::warn!(
                "Unknown crop '{}', falling back to {}",
                request.crop,
                lookup.crop.id
            );
        }
        let crop = lookup.crop;

        let assessment = feasibility::evaluate(
            crop,
            request.area_hectares,
            water.available_mm,
            request.month,
            GroundwaterContext {
                status: sample.groundwater_status,
                depth_m: sample.groundwater_depth_m,
            },
            request.language,
        );

        let mut recommendations = ranker::rank(
            &self.catalog,
            crop.id,
            request.area_hectares,
            water.available_mm,
            request.month,
            self.limit,
        );
        ranker::localize(&mut recommendations, request.language);

        AnalysisReport {
            verdict: assessment.verdict,
            language: request.language,
            month: request.month,
            water: WaterSummary {
                available_mm: assessment.available_mm,
                needed_mm: assessment.required_mm,
                balance_mm: assessment.balance_mm,
                groundwater_depth_m: sample.groundwater_depth_m,
                groundwater_status: sample.groundwater_status,
            },
            data_sources: DataSources {
                environmental_summary: acquired.provenance.environmental_summary,
                groundwater_summary: acquired.provenance.groundwater_summary,
                estimator_label: self.estimator.label(),
                environmental_fallback: acquired.provenance.environmental.is_fallback(),
                groundwater_fallback: acquired.provenance.groundwater.is_fallback(),
            },
            outcome: Outcome {
                selected_crop: crop.id.to_string(),
                crop_recognized: lookup.recognized,
                in_season: assessment.in_season,
                message: assessment.message,
                expected_profit: crop.profit_total(request.area_hectares),
                duration_days: crop.duration_days,
            },
            recommendations,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
