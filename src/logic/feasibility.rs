use super::messages;
use crate::models::{
    AssessmentReason, Crop, GroundwaterStatus, Language, Verdict, WaterAssessment,
};

/// Groundwater context for the soft-caution check.
#[derive(Debug, Clone, Copy)]
pub struct GroundwaterContext {
    pub status: GroundwaterStatus,
    pub depth_m: f64,
}

/// Evaluates one crop against the available water and the calendar.
///
/// Checks run in order and the first match decides the verdict:
/// - water deficit: FAIL
/// - outside the sowing window: FAIL
/// - critical groundwater: WARNING
/// - otherwise: PASS
pub fn evaluate(
    crop: &Crop,
    area_hectares: f64,
    available_mm: f64,
    current_month: u32,
    groundwater: GroundwaterContext,
    language: Language,
) -> WaterAssessment {
    let required_mm = crop.water_needed_mm(area_hectares);
    let balance_mm = available_mm - required_mm;
    let in_season = crop.is_sowable_in(current_month);

    let (verdict, reason) = if balance_mm < 0.0 {
        let deficit_mm = balance_mm.abs();
        (
            Verdict::Fail,
            AssessmentReason::WaterDeficit {
                deficit_mm,
                shortfall_pct: deficit_mm / required_mm * 100.0,
            },
        )
    } else if !in_season {
        (
            Verdict::Fail,
            AssessmentReason::OutOfSeason {
                start_month: crop.sowing_window.start_month,
                end_month: crop.sowing_window.end_month,
            },
        )
    } else if groundwater.status == GroundwaterStatus::Critical {
        (
            Verdict::Warning,
            AssessmentReason::CriticalGroundwater {
                depth_m: groundwater.depth_m,
            },
        )
    } else {
        (Verdict::Pass, AssessmentReason::Optimal)
    };

    tracing::debug!(
        "{}: required {:.0} mm, available {:.0} mm, in season {}, verdict {}",
        crop.id,
        required_mm,
        available_mm,
        in_season,
        verdict
    );

    WaterAssessment {
        available_mm,
        required_mm,
        balance_mm,
        in_season,
        verdict,
        reason,
        message: messages::assessment_message(language, verdict, crop.display_name, &reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::catalog::CropCatalog;

    fn good() -> GroundwaterContext {
        GroundwaterContext {
            status: GroundwaterStatus::Good,
            depth_m: 5.0,
        }
    }

    fn critical() -> GroundwaterContext {
        GroundwaterContext {
            status: GroundwaterStatus::Critical,
            depth_m: 22.0,
        }
    }

    #[test]
    fn deficit_fails_regardless_of_season_or_groundwater() {
        let catalog = CropCatalog::builtin();
        let wheat = catalog.get("wheat").unwrap();

        for month in 1..=12 {
            for gw in [good(), critical()] {
                let a = evaluate(wheat, 1.0, 300.0, month, gw, Language::En);
                assert_eq!(a.verdict, Verdict::Fail);
                assert!(matches!(a.reason, AssessmentReason::WaterDeficit { .. }));
            }
        }
    }

    #[test]
    fn deficit_reports_magnitude_and_percentage() {
        let catalog = CropCatalog::builtin();
        let sugarcane = catalog.get("sugarcane").unwrap();
        let a = evaluate(sugarcane, 1.0, 881.0, 11, good(), Language::En);
        assert_eq!(a.required_mm, 2200.0);
        assert_eq!(a.balance_mm, -1319.0);
        match a.reason {
            AssessmentReason::WaterDeficit {
                deficit_mm,
                shortfall_pct,
            } => {
                assert_eq!(deficit_mm, 1319.0);
                assert!((shortfall_pct - 59.954545).abs() < 1e-3);
            }
            other => panic!("unexpected reason {:?}", other),
        }
        assert!(a.message.contains("1319 mm"));
    }

    #[test]
    fn out_of_season_fails_with_window() {
        let catalog = CropCatalog::builtin();
        let rice = catalog.get("rice").unwrap();
        let a = evaluate(rice, 1.0, 2000.0, 11, good(), Language::En);
        assert_eq!(a.verdict, Verdict::Fail);
        assert!(!a.in_season);
        assert_eq!(
            a.reason,
            AssessmentReason::OutOfSeason {
                start_month: 6,
                end_month: 7
            }
        );
        assert!(a.message.contains("June"));
    }

    #[test]
    fn critical_groundwater_is_only_a_warning() {
        let catalog = CropCatalog::builtin();
        let wheat = catalog.get("wheat").unwrap();
        let a = evaluate(wheat, 1.0, 500.0, 11, critical(), Language::En);
        assert_eq!(a.verdict, Verdict::Warning);
        assert!(a.message.contains("drought"));
    }

    #[test]
    fn sufficient_in_season_passes() {
        let catalog = CropCatalog::builtin();
        let chickpea = catalog.get("chickpea").unwrap();
        let a = evaluate(chickpea, 1.0, 300.0, 10, good(), Language::En);
        assert_eq!(a.verdict, Verdict::Pass);
        assert_eq!(a.balance_mm, 0.0);
        assert!(a.in_season);

        let historical = GroundwaterContext {
            status: GroundwaterStatus::Historical,
            depth_m: 9.6,
        };
        assert_eq!(evaluate(chickpea, 1.0, 300.0, 10, historical, Language::En).verdict, Verdict::Pass);
    }

    #[test]
    fn required_water_is_linear_in_area() {
        let catalog = CropCatalog::builtin();
        for crop in catalog.iter() {
            let one = evaluate(crop, 1.5, 10_000.0, 1, good(), Language::En);
            let two = evaluate(crop, 3.0, 10_000.0, 1, good(), Language::En);
            assert!((two.required_mm - 2.0 * one.required_mm).abs() < 1e-9);
        }
    }

    #[test]
    fn wrapping_window_season_check() {
        let catalog = CropCatalog::builtin();
        let sugarcane = catalog.get("sugarcane").unwrap();
        for month in 1..=12 {
            let a = evaluate(sugarcane, 1.0, 5000.0, month, good(), Language::En);
            let expected = matches!(month, 10 | 11 | 12 | 1 | 2);
            assert_eq!(a.in_season, expected, "month {}", month);
        }
    }

    #[test]
    fn message_follows_requested_language() {
        let catalog = CropCatalog::builtin();
        let chickpea = catalog.get("chickpea").unwrap();
        let en = evaluate(chickpea, 1.0, 300.0, 10, good(), Language::En);
        let hi = evaluate(chickpea, 1.0, 300.0, 10, good(), Language::Hi);
        assert_eq!(en.reason, hi.reason);
        assert!(hi.message.starts_with("स्वीकृत"));
        assert!(!en.message.starts_with("स्वीकृत"));
    }
}
