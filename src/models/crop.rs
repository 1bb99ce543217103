use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CropType {
    Cereal,
    Millet,
    Cash,
    Oil,
    Pulse,
    Vegetable,
    Plantation,
}

impl CropType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CropType::Cereal => "Cereal",
            CropType::Millet => "Millet",
            CropType::Cash => "Cash",
            CropType::Oil => "Oil",
            CropType::Pulse => "Pulse",
            CropType::Vegetable => "Vegetable",
            CropType::Plantation => "Plantation",
        }
    }
}

impl std::fmt::Display for CropType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Calendar months (1-12) during which a crop may be sown.
/// A window whose start is after its end wraps across the new year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SowingWindow {
    pub start_month: u32,
    pub end_month: u32,
}

impl SowingWindow {
    pub const fn new(start_month: u32, end_month: u32) -> Self {
        Self {
            start_month,
            end_month,
        }
    }

    pub fn wraps_year(&self) -> bool {
        self.start_month > self.end_month
    }

    pub fn contains(&self, month: u32) -> bool {
        if self.wraps_year() {
            month >= self.start_month || month <= self.end_month
        } else {
            self.start_month <= month && month <= self.end_month
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Crop {
    pub id: &'static str,
    pub display_name: &'static str,
    #[serde(rename = "type")]
    pub crop_type: CropType,
    pub water_requirement_mm_per_hectare: f64,
    pub profit_per_hectare: f64,
    pub sowing_window: SowingWindow,
    pub duration_days: u32,
}

impl Crop {
    pub fn water_needed_mm(&self, area_hectares: f64) -> f64 {
        self.water_requirement_mm_per_hectare * area_hectares
    }

    pub fn profit_total(&self, area_hectares: f64) -> f64 {
        self.profit_per_hectare * area_hectares
    }

    pub fn is_sowable_in(&self, month: u32) -> bool {
        self.sowing_window.contains(month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapping_window_spans_new_year() {
        let window = SowingWindow::new(10, 2);
        assert!(window.wraps_year());
        for month in [10, 11, 12, 1, 2] {
            assert!(window.contains(month), "month {} should be in season", month);
        }
        for month in 3..=9 {
            assert!(!window.contains(month), "month {} should be out of season", month);
        }
    }

    #[test]
    fn plain_window_is_inclusive() {
        let window = SowingWindow::new(6, 7);
        assert!(!window.wraps_year());
        for month in 1..=12 {
            assert_eq!(window.contains(month), month == 6 || month == 7);
        }
    }

    #[test]
    fn single_month_window() {
        let window = SowingWindow::new(3, 3);
        assert!(window.contains(3));
        assert!(!window.contains(2));
        assert!(!window.contains(4));
    }
}
