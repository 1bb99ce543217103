use crate::error::{Result, WaterWalletError};
use crate::models::{Crop, CropType, SowingWindow};

pub const DEFAULT_CROP_ID: &str = "sugarcane";

/// Seasonal water requirement (mm per hectare) and profit (per hectare) for
/// the crops grown across the supported regions.
const CROPS: &[Crop] = &[
    // Cereals
    crop("rice", "Rice", CropType::Cereal, 1200.0, 45_000.0, (6, 7), 120),
    crop("wheat", "Wheat", CropType::Cereal, 450.0, 35_000.0, (10, 11), 110),
    crop("maize", "Maize", CropType::Cereal, 500.0, 32_000.0, (6, 10), 100),
    crop("jowar", "Jowar", CropType::Millet, 400.0, 25_000.0, (6, 7), 110),
    // Cash and commercial
    crop("sugarcane", "Sugarcane", CropType::Cash, 2200.0, 130_000.0, (10, 2), 365),
    crop("cotton", "Cotton", CropType::Cash, 700.0, 60_000.0, (5, 6), 160),
    crop("soybean", "Soybean", CropType::Oil, 450.0, 40_000.0, (6, 7), 100),
    // Pulses and vegetables
    crop("chickpea", "Chickpea", CropType::Pulse, 300.0, 38_000.0, (10, 11), 110),
    crop("tomato", "Tomato", CropType::Vegetable, 600.0, 90_000.0, (8, 11), 90),
    crop("onion", "Onion", CropType::Vegetable, 550.0, 75_000.0, (8, 12), 120),
    crop("okra", "Okra", CropType::Vegetable, 400.0, 55_000.0, (2, 6), 70),
    // Plantation
    crop("coffee", "Coffee", CropType::Plantation, 1800.0, 150_000.0, (6, 8), 365),
];

const fn crop(
    id: &'static str,
    display_name: &'static str,
    crop_type: CropType,
    water_requirement_mm_per_hectare: f64,
    profit_per_hectare: f64,
    sowing: (u32, u32),
    duration_days: u32,
) -> Crop {
    Crop {
        id,
        display_name,
        crop_type,
        water_requirement_mm_per_hectare,
        profit_per_hectare,
        sowing_window: SowingWindow::new(sowing.0, sowing.1),
        duration_days,
    }
}

/// Read-only crop reference data, keyed by id, in a fixed iteration order.
#[derive(Debug, Clone)]
pub struct CropCatalog {
    crops: Vec<Crop>,
    default_index: usize,
}

/// The outcome of a catalog lookup that falls back to the default crop.
#[derive(Debug, Clone, Copy)]
pub struct CropLookup<'a> {
    pub crop: &'a Crop,
    pub recognized: bool,
}

impl CropCatalog {
    /// The built-in catalog.
    pub fn builtin() -> Self {
        Self {
            crops: CROPS.to_vec(),
            default_index: CROPS
                .iter()
                .position(|c| c.id == DEFAULT_CROP_ID)
                .unwrap_or(0),
        }
    }

    /// The built-in catalog with a configured default crop, which must exist.
    pub fn with_default(default_id: &str) -> Result<Self> {
        Self::new(CROPS.to_vec(), default_id)
    }

    pub fn new(crops: Vec<Crop>, default_id: &str) -> Result<Self> {
        for (i, c) in crops.iter().enumerate() {
            if crops[..i].iter().any(|other| other.id == c.id) {
                return Err(WaterWalletError::InvalidData(format!(
                    "duplicate crop id '{}'",
                    c.id
                )));
            }
            if c.water_requirement_mm_per_hectare.is_nan() || c.water_requirement_mm_per_hectare <= 0.0 {
                return Err(WaterWalletError::InvalidData(format!(
                    "crop '{}' must have a positive water requirement",
                    c.id
                )));
            }
            if c.profit_per_hectare < 0.0 || c.duration_days == 0 {
                return Err(WaterWalletError::InvalidData(format!(
                    "crop '{}' has invalid profit or duration",
                    c.id
                )));
            }
            let w = c.sowing_window;
            if !(1..=12).contains(&w.start_month) || !(1..=12).contains(&w.end_month) {
                return Err(WaterWalletError::InvalidData(format!(
                    "crop '{}' has a sowing window outside 1-12",
                    c.id
                )));
            }
        }

        let default_index = crops
            .iter()
            .position(|c| c.id.eq_ignore_ascii_case(default_id.trim()))
            .ok_or_else(|| {
                WaterWalletError::NotFound(format!("default crop '{}' not in catalog", default_id))
            })?;

        Ok(Self {
            crops,
            default_index,
        })
    }

    pub fn get(&self, id: &str) -> Option<&Crop> {
        let id = id.trim();
        self.crops.iter().find(|c| c.id.eq_ignore_ascii_case(id))
    }

    /// Case-insensitive lookup that resolves unknown ids to the default crop.
    pub fn find_or_default(&self, id: &str) -> CropLookup<'_> {
        match self.get(id) {
            Some(crop) => CropLookup {
                crop,
                recognized: true,
            },
            None => CropLookup {
                crop: self.default_crop(),
                recognized: false,
            },
        }
    }

    pub fn default_crop(&self) -> &Crop {
        &self.crops[self.default_index]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Crop> {
        self.crops.iter()
    }

    pub fn crops(&self) -> &[Crop] {
        &self.crops
    }
}

impl Default for CropCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = CropCatalog::new(CROPS.to_vec(), DEFAULT_CROP_ID).unwrap();
        assert_eq!(catalog.crops().len(), 12);
        assert_eq!(catalog.default_crop().id, "sugarcane");
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let catalog = CropCatalog::builtin();
        let lookup = catalog.find_or_default("  ChickPea ");
        assert!(lookup.recognized);
        assert_eq!(lookup.crop.id, "chickpea");
    }

    #[test]
    fn unknown_crop_falls_back_to_default() {
        let catalog = CropCatalog::builtin();
        let lookup = catalog.find_or_default("dragonfruit");
        assert!(!lookup.recognized);
        assert_eq!(lookup.crop.id, DEFAULT_CROP_ID);
    }

    #[test]
    fn sugarcane_window_wraps() {
        let catalog = CropCatalog::builtin();
        let sugarcane = catalog.get("sugarcane").unwrap();
        assert!(sugarcane.is_sowable_in(1));
        assert!(sugarcane.is_sowable_in(11));
        assert!(!sugarcane.is_sowable_in(6));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut crops = CROPS.to_vec();
        crops.push(CROPS[0].clone());
        assert!(CropCatalog::new(crops, DEFAULT_CROP_ID).is_err());
    }

    #[test]
    fn rejects_zero_water_requirement() {
        let crops = vec![crop("air", "Air", CropType::Cash, 0.0, 1.0, (1, 12), 10)];
        assert!(CropCatalog::new(crops, "air").is_err());
    }

    #[test]
    fn configured_default_must_exist() {
        let catalog = CropCatalog::with_default(" Wheat ").unwrap();
        assert_eq!(catalog.default_crop().id, "wheat");
        assert_eq!(catalog.find_or_default("dragonfruit").crop.id, "wheat");

        assert!(matches!(
            CropCatalog::with_default("dragonfruit"),
            Err(WaterWalletError::NotFound(_))
        ));
    }

    #[test]
    fn rejects_missing_default() {
        let crops = vec![CROPS[1].clone()];
        assert!(matches!(
            CropCatalog::new(crops, "sugarcane"),
            Err(WaterWalletError::NotFound(_))
        ));
    }
}
