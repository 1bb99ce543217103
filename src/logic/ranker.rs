use super::catalog::CropCatalog;
use super::messages;
use crate::models::{Language, Recommendation};
use std::cmp::Ordering;

/// Ranks alternative crops that fit within the available water.
///
/// Crops sowable this month come first, then higher profit per mm of water.
/// Equal keys keep catalog order.
pub fn rank(
    catalog: &CropCatalog,
    excluding: &str,
    area_hectares: f64,
    available_mm: f64,
    current_month: u32,
    limit: usize,
) -> Vec<Recommendation> {
    let mut candidates: Vec<Recommendation> = catalog
        .iter()
        .filter(|crop| !crop.id.eq_ignore_ascii_case(excluding))
        .filter_map(|crop| {
            let water_needed_mm = crop.water_needed_mm(area_hectares);
            if water_needed_mm <= 0.0 || water_needed_mm > available_mm {
                return None;
            }

            let profit_total = crop.profit_total(area_hectares);
            let is_immediate = crop.is_sowable_in(current_month);
            let start_month = crop.sowing_window.start_month;

            Some(Recommendation {
                crop_id: crop.id.to_string(),
                display_name: crop.display_name.to_string(),
                crop_type: crop.crop_type,
                profit_total,
                water_needed_mm,
                profit_per_drop: profit_total / water_needed_mm,
                sowing_start_month: start_month,
                sowing_tag: messages::sowing_tag(Language::En, is_immediate, start_month),
                is_immediate,
                duration_days: crop.duration_days,
            })
        })
        .collect();

    candidates.sort_by(|a, b| {
        b.is_immediate.cmp(&a.is_immediate).then_with(|| {
            b.profit_per_drop
                .partial_cmp(&a.profit_per_drop)
                .unwrap_or(Ordering::Equal)
        })
    });
    candidates.truncate(limit);
    candidates
}

/// Re-renders sowing tags for the requested language.
pub fn localize(recommendations: &mut [Recommendation], lang: Language) {
    for rec in recommendations {
        rec.sowing_tag = messages::sowing_tag(lang, rec.is_immediate, rec.sowing_start_month);
    }
}
