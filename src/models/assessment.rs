use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Pass,
    Warning,
    Fail,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Pass => "PASS",
            Verdict::Warning => "WARNING",
            Verdict::Fail => "FAIL",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a verdict was reached; rendered into a message per language.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssessmentReason {
    WaterDeficit { deficit_mm: f64, shortfall_pct: f64 },
    OutOfSeason { start_month: u32, end_month: u32 },
    CriticalGroundwater { depth_m: f64 },
    Optimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterAssessment {
    pub available_mm: f64,
    pub required_mm: f64,
    pub balance_mm: f64,
    pub in_season: bool,
    pub verdict: Verdict,
    pub reason: AssessmentReason,
    pub message: String,
}
