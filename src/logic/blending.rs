use super::estimator::WaterEstimator;
use crate::config::EstimatorConfig;
use crate::models::EnvironmentSample;
use serde::Serialize;

/// Weights and depth mapping used to fuse the learned estimate with the
/// observed groundwater reading.
#[derive(Debug, Clone, Copy)]
pub struct WaterBlender {
    model_weight: f64,
    observed_weight: f64,
    observed_base_mm: f64,
    observed_mm_per_m: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BlendedWater {
    pub available_mm: f64,
    pub model_estimate_mm: f64,
    pub observed_mm: f64,
}

impl WaterBlender {
    pub fn new(config: &EstimatorConfig) -> Self {
        Self {
            model_weight: config.model_weight,
            observed_weight: config.observed_weight,
            observed_base_mm: config.observed_base_mm,
            observed_mm_per_m: config.observed_mm_per_m,
        }
    }

    /// Water implied by the depth to the water table; deeper means less.
    pub fn observed_available_mm(&self, groundwater_depth_m: f64) -> f64 {
        (self.observed_base_mm - groundwater_depth_m.abs() * self.observed_mm_per_m).max(0.0)
    }

    pub fn blend(&self, estimator: &dyn WaterEstimator, sample: &EnvironmentSample) -> BlendedWater {
        let model_estimate_mm = estimator.estimate(sample).max(0.0);
        let observed_mm = self.observed_available_mm(sample.groundwater_depth_m);
        let available_mm = (self.model_weight * model_estimate_mm
            + self.observed_weight * observed_mm)
            .round()
            .max(0.0);

        BlendedWater {
            available_mm,
            model_estimate_mm,
            observed_mm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::estimator::{RidgeEstimator, TrainingSource, CALIBRATION_TABLE};
    use crate::models::GroundwaterStatus;

    struct Fixed(f64);

    impl WaterEstimator for Fixed {
        fn estimate(&self, _sample: &EnvironmentSample) -> f64 {
            self.0
        }

        fn label(&self) -> String {
            "fixed".into()
        }
    }

    fn sample(rain: f64, depth: f64) -> EnvironmentSample {
        EnvironmentSample {
            annual_rain_mm: rain,
            soil_moisture: 0.5,
            temp_c: 30.0,
            groundwater_depth_m: depth,
            groundwater_status: GroundwaterStatus::Good,
        }
    }

    #[test]
    fn observed_mapping_is_floored() {
        let blender = WaterBlender::new(&EstimatorConfig::default());
        assert_eq!(blender.observed_available_mm(0.0), 800.0);
        assert_eq!(blender.observed_available_mm(10.0), 600.0);
        assert_eq!(blender.observed_available_mm(40.0), 0.0);
        assert_eq!(blender.observed_available_mm(100.0), 0.0);
    }

    #[test]
    fn blends_with_default_weights_and_rounds() {
        let blender = WaterBlender::new(&EstimatorConfig::default());
        // 0.7 * 1000 + 0.3 * (800 - 10.5 * 20) = 700 + 177 = 877
        let blended = blender.blend(&Fixed(1000.0), &sample(1000.0, 10.5));
        assert_eq!(blended.available_mm, 877.0);
        assert_eq!(blended.model_estimate_mm, 1000.0);
        assert_eq!(blended.observed_mm, 590.0);

        let blended = blender.blend(&Fixed(100.3), &sample(1000.0, 40.0));
        assert_eq!(blended.available_mm, 70.0);
    }

    #[test]
    fn custom_weights() {
        let config = EstimatorConfig {
            model_weight: 0.0,
            observed_weight: 1.0,
            ..Default::default()
        };
        let blender = WaterBlender::new(&config);
        let blended = blender.blend(&Fixed(5000.0), &sample(1000.0, 5.0));
        assert_eq!(blended.available_mm, 700.0);
    }

    #[test]
    fn negative_estimates_cannot_make_blend_negative() {
        let blender = WaterBlender::new(&EstimatorConfig::default());
        let blended = blender.blend(&Fixed(-400.0), &sample(0.0, 60.0));
        assert_eq!(blended.available_mm, 0.0);
    }

    #[test]
    fn more_rain_never_reduces_available_water() {
        let model =
            RidgeEstimator::fit(CALIBRATION_TABLE, 0.1, TrainingSource::Calibration).unwrap();
        let blender = WaterBlender::new(&EstimatorConfig::default());
        let mut last = 0.0;
        for rain in (0..=40).map(|i| i as f64 * 100.0) {
            let available = blender.blend(&model, &sample(rain, 12.0)).available_mm;
            assert!(available >= last, "rain {} gave {} < {}", rain, available, last);
            last = available;
        }
    }

    #[test]
    fn deeper_water_table_never_increases_available_water() {
        let model =
            RidgeEstimator::fit(CALIBRATION_TABLE, 0.1, TrainingSource::Calibration).unwrap();
        let blender = WaterBlender::new(&EstimatorConfig::default());
        let mut last = f64::MAX;
        for depth in (0..=50).map(|i| i as f64) {
            let available = blender.blend(&model, &sample(1200.0, depth)).available_mm;
            assert!(available <= last);
            last = available;
        }
    }
}
