use crate::config::EstimatorConfig;
use crate::error::{Result, WaterWalletError};
use crate::models::EnvironmentSample;
use serde::{Deserialize, Serialize};

const FEATURES: usize = 4;
const RAIN: usize = 0;
const MOISTURE: usize = 1;
const DEPTH: usize = 3;

/// Maps an environment sample to a predicted available-water figure (mm).
///
/// Implementations only read state fixed at construction, so a single
/// instance is shared by every in-flight analysis.
pub trait WaterEstimator: Send + Sync {
    fn estimate(&self, sample: &EnvironmentSample) -> f64;

    /// Short description of the model and its training data.
    fn label(&self) -> String;
}

/// One `(rain, moisture, temp, depth) -> available water` training row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingSample {
    pub annual_rain_mm: f64,
    pub soil_moisture: f64,
    pub temp_c: f64,
    pub groundwater_depth_m: f64,
    pub available_water_mm: f64,
}

impl TrainingSample {
    pub const fn new(
        annual_rain_mm: f64,
        soil_moisture: f64,
        temp_c: f64,
        groundwater_depth_m: f64,
        available_water_mm: f64,
    ) -> Self {
        Self {
            annual_rain_mm,
            soil_moisture,
            temp_c,
            groundwater_depth_m,
            available_water_mm,
        }
    }

    fn features(&self) -> [f64; FEATURES] {
        [
            self.annual_rain_mm,
            self.soil_moisture,
            self.temp_c,
            self.groundwater_depth_m,
        ]
    }

    pub fn validate(&self) -> Result<()> {
        let finite = self.features().iter().all(|v| v.is_finite())
            && self.available_water_mm.is_finite();
        if !finite {
            return Err(WaterWalletError::InvalidData(
                "training sample contains a non-finite value".into(),
            ));
        }
        if self.annual_rain_mm < 0.0 || self.groundwater_depth_m < 0.0 {
            return Err(WaterWalletError::InvalidData(
                "rainfall and groundwater depth must be non-negative".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.soil_moisture) {
            return Err(WaterWalletError::InvalidData(format!(
                "soil moisture {} outside [0, 1]",
                self.soil_moisture
            )));
        }
        if self.available_water_mm < 0.0 {
            return Err(WaterWalletError::InvalidData(
                "available water must be non-negative".into(),
            ));
        }
        Ok(())
    }
}

/// Calibration table spanning wet coastal, intermediate and drought-prone
/// districts. Used whenever no usable historical dataset is available.
pub const CALIBRATION_TABLE: &[TrainingSample] = &[
    TrainingSample::new(3000.0, 0.9, 26.0, 3.0, 2800.0), // Konkan
    TrainingSample::new(400.0, 0.2, 42.0, 24.0, 300.0),  // Rajasthan border
    TrainingSample::new(1200.0, 0.6, 30.0, 9.0, 1400.0), // Pune / Nashik
    TrainingSample::new(600.0, 0.3, 36.0, 16.0, 500.0),  // Marathwada
    TrainingSample::new(2500.0, 0.8, 24.0, 5.0, 2400.0), // Kolhapur
    TrainingSample::new(500.0, 0.2, 39.0, 18.0, 400.0),  // Vidarbha
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingSource {
    Historical,
    Calibration,
}

impl TrainingSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrainingSource::Historical => "historical records",
            TrainingSource::Calibration => "calibration samples",
        }
    }
}

/// Linear ridge regression over standardized features.
///
/// Rainfall and moisture weights are constrained non-negative and the
/// depth weight non-positive; a feature whose fitted weight has the wrong
/// sign is removed and the model refitted. Predictions are floored at zero.
#[derive(Debug, Clone)]
pub struct RidgeEstimator {
    means: [f64; FEATURES],
    scales: [f64; FEATURES],
    weights: [f64; FEATURES],
    intercept: f64,
    sample_count: usize,
    source: TrainingSource,
}

impl RidgeEstimator {
    pub fn fit(samples: &[TrainingSample], lambda: f64, source: TrainingSource) -> Result<Self> {
        if samples.len() < 2 {
            return Err(WaterWalletError::Estimator(format!(
                "need at least 2 training samples, got {}",
                samples.len()
            )));
        }
        for sample in samples {
            sample
                .validate()
                .map_err(|e| WaterWalletError::Estimator(e.to_string()))?;
        }
        if lambda.is_nan() || lambda <= 0.0 {
            return Err(WaterWalletError::Estimator(
                "ridge penalty must be positive".into(),
            ));
        }

        let n = samples.len() as f64;
        let rows: Vec<[f64; FEATURES]> = samples.iter().map(|s| s.features()).collect();
        let targets: Vec<f64> = samples.iter().map(|s| s.available_water_mm).collect();

        let mut means = [0.0; FEATURES];
        let mut scales = [1.0; FEATURES];
        let mut active = [true; FEATURES];
        for j in 0..FEATURES {
            means[j] = rows.iter().map(|r| r[j]).sum::<f64>() / n;
            let var = rows.iter().map(|r| (r[j] - means[j]).powi(2)).sum::<f64>() / n;
            if var.sqrt() > 1e-12 {
                scales[j] = var.sqrt();
            } else {
                active[j] = false;
            }
        }

        if !active.iter().any(|a| *a) {
            return Err(WaterWalletError::Estimator(
                "training samples have no distinct feature values".into(),
            ));
        }

        let z: Vec<[f64; FEATURES]> = rows
            .iter()
            .map(|r| {
                let mut out = [0.0; FEATURES];
                for j in 0..FEATURES {
                    out[j] = (r[j] - means[j]) / scales[j];
                }
                out
            })
            .collect();
        let intercept = targets.iter().sum::<f64>() / n;
        let centered: Vec<f64> = targets.iter().map(|y| y - intercept).collect();

        let mut weights = [0.0; FEATURES];
        for _ in 0..FEATURES {
            weights = solve_ridge(&z, &centered, &active, lambda)?;

            let violation = [RAIN, MOISTURE]
                .into_iter()
                .find(|&j| weights[j] < 0.0)
                .or_else(|| (weights[DEPTH] > 0.0).then_some(DEPTH));

            match violation {
                Some(j) => {
                    tracing::debug!("Dropping feature {} with wrong-signed weight {}", j, weights[j]);
                    active[j] = false;
                    weights[j] = 0.0;
                    if !active.iter().any(|a| *a) {
                        weights = [0.0; FEATURES];
                        break;
                    }
                }
                None => break,
            }
        }

        if weights.iter().any(|w| !w.is_finite()) || !intercept.is_finite() {
            return Err(WaterWalletError::Estimator(
                "regression produced non-finite parameters".into(),
            ));
        }

        tracing::info!(
            "Trained water estimator on {} {} (weights {:?}, intercept {:.1})",
            samples.len(),
            source.as_str(),
            weights,
            intercept
        );

        Ok(Self {
            means,
            scales,
            weights,
            intercept,
            sample_count: samples.len(),
            source,
        })
    }

    pub fn source(&self) -> TrainingSource {
        self.source
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }
}

impl WaterEstimator for RidgeEstimator {
    fn estimate(&self, sample: &EnvironmentSample) -> f64 {
        let x = sample.features();
        let prediction = (0..FEATURES).fold(self.intercept, |acc, j| {
            acc + self.weights[j] * (x[j] - self.means[j]) / self.scales[j]
        });
        prediction.max(0.0)
    }

    fn label(&self) -> String {
        format!(
            "Ridge regression trained on {} {}",
            self.sample_count(),
            self.source().as_str()
        )
    }
}

/// Solves `(ZᵀZ + λI) w = Zᵀy` restricted to the active columns.
fn solve_ridge(
    z: &[[f64; FEATURES]],
    y: &[f64],
    active: &[bool; FEATURES],
    lambda: f64,
) -> Result<[f64; FEATURES]> {
    let cols: Vec<usize> = (0..FEATURES).filter(|j| active[*j]).collect();
    let k = cols.len();

    // Augmented matrix [A | b]
    let mut m = vec![vec![0.0; k + 1]; k];
    for (a, &ja) in cols.iter().enumerate() {
        for (b, &jb) in cols.iter().enumerate() {
            m[a][b] = z.iter().map(|row| row[ja] * row[jb]).sum::<f64>();
        }
        m[a][a] += lambda;
        m[a][k] = z.iter().zip(y).map(|(row, yi)| row[ja] * yi).sum::<f64>();
    }

    // Gaussian elimination with partial pivoting
    for col in 0..k {
        let pivot = (col..k)
            .max_by(|&a, &b| m[a][col].abs().total_cmp(&m[b][col].abs()))
            .unwrap_or(col);
        if m[pivot][col].abs() < 1e-12 {
            return Err(WaterWalletError::Estimator(
                "singular normal equations".into(),
            ));
        }
        m.swap(col, pivot);
        for row in (col + 1)..k {
            let factor = m[row][col] / m[col][col];
            for c in col..=k {
                let delta = factor * m[col][c];
                m[row][c] -= delta;
            }
        }
    }

    let mut solution = vec![0.0; k];
    for row in (0..k).rev() {
        let tail: f64 = ((row + 1)..k).map(|c| m[row][c] * solution[c]).sum();
        solution[row] = (m[row][k] - tail) / m[row][row];
    }

    let mut weights = [0.0; FEATURES];
    for (i, &j) in cols.iter().enumerate() {
        weights[j] = solution[i];
    }
    Ok(weights)
}

/// Trains the process-wide estimator.
///
/// Historical rows are used when enabled and plentiful enough; otherwise, or
/// when they cannot be fitted, the calibration table is used. Failure to fit
/// the calibration table is fatal.
pub fn train_estimator(
    config: &EstimatorConfig,
    historical: Option<Vec<TrainingSample>>,
) -> Result<RidgeEstimator> {
    match historical {
        Some(rows) if config.use_historical && rows.len() >= config.min_historical_rows.max(2) => {
            match RidgeEstimator::fit(&rows, config.ridge_lambda, TrainingSource::Historical) {
                Ok(model) => return Ok(model),
                Err(e) => {
                    tracing::warn!("Historical dataset unusable, using calibration table: {}", e);
                }
            }
        }
        Some(rows) if config.use_historical => {
            tracing::info!(
                "Historical dataset has {} rows (need {}), using calibration table",
                rows.len(),
                config.min_historical_rows
            );
        }
        Some(_) => tracing::info!("Historical training disabled, using calibration table"),
        None => tracing::info!("No historical dataset, using calibration table"),
    }

    RidgeEstimator::fit(
        CALIBRATION_TABLE,
        config.ridge_lambda,
        TrainingSource::Calibration,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GroundwaterStatus;

    fn sample(rain: f64, moisture: f64, temp: f64, depth: f64) -> EnvironmentSample {
        EnvironmentSample {
            annual_rain_mm: rain,
            soil_moisture: moisture,
            temp_c: temp,
            groundwater_depth_m: depth,
            groundwater_status: GroundwaterStatus::Moderate,
        }
    }

    fn calibrated() -> RidgeEstimator {
        RidgeEstimator::fit(CALIBRATION_TABLE, 0.1, TrainingSource::Calibration).unwrap()
    }

    #[test]
    fn calibration_fit_orders_regimes() {
        let model = calibrated();
        let wet = model.estimate(&sample(3000.0, 0.9, 26.0, 3.0));
        let mid = model.estimate(&sample(1200.0, 0.6, 30.0, 9.0));
        let dry = model.estimate(&sample(400.0, 0.2, 42.0, 24.0));
        assert!(wet > mid, "wet {} should exceed mid {}", wet, mid);
        assert!(mid > dry, "mid {} should exceed dry {}", mid, dry);
    }

    #[test]
    fn estimate_is_monotonic_in_rain_moisture_and_depth() {
        let model = calibrated();
        let mut last = f64::MIN;
        for rain in [0.0, 300.0, 800.0, 1500.0, 2500.0, 4000.0] {
            let v = model.estimate(&sample(rain, 0.5, 30.0, 10.0));
            assert!(v >= last);
            last = v;
        }

        let mut last = f64::MIN;
        for moisture in [0.0, 0.2, 0.4, 0.6, 0.8, 1.0] {
            let v = model.estimate(&sample(1000.0, moisture, 30.0, 10.0));
            assert!(v >= last);
            last = v;
        }

        let mut last = f64::MAX;
        for depth in [0.0, 5.0, 10.0, 20.0, 40.0] {
            let v = model.estimate(&sample(1000.0, 0.5, 30.0, depth));
            assert!(v <= last);
            last = v;
        }
    }

    #[test]
    fn estimate_is_never_negative() {
        let model = calibrated();
        assert!(model.estimate(&sample(0.0, 0.0, 50.0, 200.0)) >= 0.0);
    }

    #[test]
    fn estimate_is_deterministic() {
        let a = calibrated();
        let b = calibrated();
        let s = sample(900.0, 0.4, 33.0, 12.0);
        assert_eq!(a.estimate(&s), b.estimate(&s));
    }

    #[test]
    fn wrong_signed_rain_weight_is_dropped() {
        // Rain rises while available water falls: the constraint removes rain.
        let rows = [
            TrainingSample::new(100.0, 0.5, 30.0, 10.0, 900.0),
            TrainingSample::new(500.0, 0.5, 30.0, 10.0, 500.0),
            TrainingSample::new(900.0, 0.5, 30.0, 10.0, 100.0),
        ];
        let model = RidgeEstimator::fit(&rows, 0.1, TrainingSource::Historical).unwrap();
        let low = model.estimate(&sample(100.0, 0.5, 30.0, 10.0));
        let high = model.estimate(&sample(900.0, 0.5, 30.0, 10.0));
        assert!(high >= low);
    }

    #[test]
    fn two_distinct_rows_are_enough() {
        let rows = [
            TrainingSample::new(500.0, 0.2, 35.0, 15.0, 400.0),
            TrainingSample::new(2000.0, 0.8, 25.0, 4.0, 2000.0),
        ];
        let model = RidgeEstimator::fit(&rows, 0.1, TrainingSource::Historical).unwrap();
        assert!(
            model.estimate(&sample(2000.0, 0.8, 25.0, 4.0))
                > model.estimate(&sample(500.0, 0.2, 35.0, 15.0))
        );
    }

    #[test]
    fn rejects_too_few_or_identical_rows() {
        let one = [TrainingSample::new(500.0, 0.2, 35.0, 15.0, 400.0)];
        assert!(RidgeEstimator::fit(&one, 0.1, TrainingSource::Historical).is_err());

        let same = [one[0], one[0], one[0]];
        assert!(matches!(
            RidgeEstimator::fit(&same, 0.1, TrainingSource::Historical),
            Err(WaterWalletError::Estimator(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_rows() {
        let rows = [
            TrainingSample::new(500.0, 1.4, 35.0, 15.0, 400.0),
            TrainingSample::new(2000.0, 0.8, 25.0, 4.0, 2000.0),
        ];
        assert!(RidgeEstimator::fit(&rows, 0.1, TrainingSource::Historical).is_err());
    }

    #[test]
    fn training_policy_prefers_sufficient_history() {
        let config = EstimatorConfig {
            min_historical_rows: 2,
            ..Default::default()
        };
        let rows = vec![
            TrainingSample::new(500.0, 0.2, 35.0, 15.0, 400.0),
            TrainingSample::new(2000.0, 0.8, 25.0, 4.0, 2000.0),
        ];
        let model = train_estimator(&config, Some(rows)).unwrap();
        assert_eq!(model.source(), TrainingSource::Historical);
        assert_eq!(model.sample_count(), 2);
        assert!(model.label().contains("historical"));
    }

    #[test]
    fn training_policy_falls_back_to_calibration() {
        let config = EstimatorConfig::default();

        let model = train_estimator(&config, None).unwrap();
        assert_eq!(model.source(), TrainingSource::Calibration);

        let short = vec![TrainingSample::new(500.0, 0.2, 35.0, 15.0, 400.0)];
        let model = train_estimator(&config, Some(short)).unwrap();
        assert_eq!(model.source(), TrainingSource::Calibration);

        let degenerate = vec![TrainingSample::new(500.0, 0.2, 35.0, 15.0, 400.0); 8];
        let model = train_estimator(&config, Some(degenerate)).unwrap();
        assert_eq!(model.source(), TrainingSource::Calibration);
        assert_eq!(model.sample_count(), CALIBRATION_TABLE.len());
    }

    #[test]
    fn training_policy_respects_disabled_history() {
        let config = EstimatorConfig {
            use_historical: false,
            min_historical_rows: 2,
            ..Default::default()
        };
        let rows = vec![
            TrainingSample::new(500.0, 0.2, 35.0, 15.0, 400.0),
            TrainingSample::new(2000.0, 0.8, 25.0, 4.0, 2000.0),
        ];
        let model = train_estimator(&config, Some(rows)).unwrap();
        assert_eq!(model.source(), TrainingSource::Calibration);
    }
}
