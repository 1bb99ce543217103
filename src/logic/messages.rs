use crate::models::{AssessmentReason, Language, Verdict};
use chrono::Month;

const HINDI_MONTHS: [&str; 12] = [
    "जनवरी", "फ़रवरी", "मार्च", "अप्रैल", "मई", "जून", "जुलाई", "अगस्त", "सितंबर", "अक्टूबर",
    "नवंबर", "दिसंबर",
];

pub fn month_name(lang: Language, month: u32) -> String {
    let index = month.clamp(1, 12);
    match lang {
        Language::En => u8::try_from(index)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map(|m| m.name().to_string())
            .unwrap_or_default(),
        Language::Hi => HINDI_MONTHS[(index - 1) as usize].to_string(),
    }
}

/// Outcome text for a crop assessment.
pub fn assessment_message(
    lang: Language,
    verdict: Verdict,
    crop_name: &str,
    reason: &AssessmentReason,
) -> String {
    match verdict {
        Verdict::Pass => pass_message(lang, crop_name),
        Verdict::Warning => warning_message(lang, crop_name, reason),
        Verdict::Fail => fail_message(lang, crop_name, reason),
    }
}

fn pass_message(lang: Language, crop_name: &str) -> String {
    match lang {
        Language::En => format!(
            "Approved: {} is safe to sow. Water availability is sufficient and the season is right.",
            crop_name
        ),
        Language::Hi => format!(
            "स्वीकृत: {} बोना सुरक्षित है। पानी पर्याप्त है और मौसम सही है।",
            crop_name
        ),
    }
}

fn warning_message(lang: Language, crop_name: &str, reason: &AssessmentReason) -> String {
    let depth_m = match reason {
        AssessmentReason::CriticalGroundwater { depth_m } => *depth_m,
        _ => 0.0,
    };
    match lang {
        Language::En => format!(
            "Caution: {} has enough water this season, but groundwater is critically low ({:.1} m below ground). Prefer drought-tolerant practices.",
            crop_name, depth_m
        ),
        Language::Hi => format!(
            "सावधानी: {} के लिए इस मौसम में पानी पर्याप्त है, लेकिन भूजल स्तर बहुत नीचे है ({:.1} मीटर)। सूखा-सहनशील तरीके अपनाएं।",
            crop_name, depth_m
        ),
    }
}

fn fail_message(lang: Language, crop_name: &str, reason: &AssessmentReason) -> String {
    match (lang, reason) {
        (
            Language::En,
            AssessmentReason::WaterDeficit {
                deficit_mm,
                shortfall_pct,
            },
        ) => format!(
            "Risk: {} is not recommended. Water deficit of {:.0} mm ({:.1}% short of the requirement).",
            crop_name, deficit_mm, shortfall_pct
        ),
        (
            Language::Hi,
            AssessmentReason::WaterDeficit {
                deficit_mm,
                shortfall_pct,
            },
        ) => format!(
            "जोखिम: {} की सलाह नहीं दी जाती। {:.0} मिमी पानी की कमी है (आवश्यकता से {:.1}% कम)।",
            crop_name, deficit_mm, shortfall_pct
        ),
        (
            Language::En,
            AssessmentReason::OutOfSeason {
                start_month,
                end_month,
            },
        ) => format!(
            "Risk: wrong season for {}. Sow between {} and {}.",
            crop_name,
            month_name(lang, *start_month),
            month_name(lang, *end_month)
        ),
        (
            Language::Hi,
            AssessmentReason::OutOfSeason {
                start_month,
                end_month,
            },
        ) => format!(
            "जोखिम: {} के लिए गलत मौसम। {} से {} के बीच बुवाई करें।",
            crop_name,
            month_name(lang, *start_month),
            month_name(lang, *end_month)
        ),
        (Language::En, _) => format!("Risk: {} is not recommended.", crop_name),
        (Language::Hi, _) => format!("जोखिम: {} की सलाह नहीं दी जाती।", crop_name),
    }
}

/// Tag shown next to a recommended crop.
pub fn sowing_tag(lang: Language, is_immediate: bool, start_month: u32) -> String {
    match (lang, is_immediate) {
        (Language::En, true) => "Sow now".to_string(),
        (Language::Hi, true) => "अभी बोएं".to_string(),
        (Language::En, false) => format!("Wait ({})", month_name(lang, start_month)),
        (Language::Hi, false) => format!("रुकें ({})", month_name(lang, start_month)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_names() {
        assert_eq!(month_name(Language::En, 1), "January");
        assert_eq!(month_name(Language::En, 10), "October");
        assert_eq!(month_name(Language::Hi, 10), "अक्टूबर");
    }

    #[test]
    fn deficit_message_reports_magnitude_and_percentage() {
        let reason = AssessmentReason::WaterDeficit {
            deficit_mm: 1319.0,
            shortfall_pct: 59.96,
        };
        let msg = assessment_message(Language::En, Verdict::Fail, "Sugarcane", &reason);
        assert!(msg.contains("1319 mm"));
        assert!(msg.contains("60.0%"));
    }

    #[test]
    fn season_message_names_window() {
        let reason = AssessmentReason::OutOfSeason {
            start_month: 6,
            end_month: 7,
        };
        let msg = assessment_message(Language::En, Verdict::Fail, "Rice", &reason);
        assert!(msg.contains("June"));
        assert!(msg.contains("July"));

        let msg = assessment_message(Language::Hi, Verdict::Fail, "Rice", &reason);
        assert!(msg.contains("जून"));
    }

    #[test]
    fn warning_mentions_drought_tolerance() {
        let reason = AssessmentReason::CriticalGroundwater { depth_m: 21.0 };
        let msg = assessment_message(Language::En, Verdict::Warning, "Wheat", &reason);
        assert!(msg.contains("drought-tolerant"));
        assert!(msg.contains("21.0 m"));
    }

    #[test]
    fn sowing_tags() {
        assert_eq!(sowing_tag(Language::En, true, 6), "Sow now");
        assert_eq!(sowing_tag(Language::En, false, 6), "Wait (June)");
        assert_eq!(sowing_tag(Language::Hi, false, 6), "रुकें (जून)");
    }
}
