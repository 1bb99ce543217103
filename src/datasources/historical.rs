use std::collections::BTreeMap;

/// Long-run average pre-monsoon water level per district, metres below ground.
const BUILTIN_AVERAGES: &[(&str, f64)] = &[
    ("ahmadnagar", 10.93),
    ("ahmednagar", 10.93),
    ("akola", 13.1),
    ("amravati", 12.6),
    ("aurangabad", 15.9),
    ("beed", 16.4),
    ("jalgaon", 14.2),
    ("jalna", 14.9),
    ("kolhapur", 5.1),
    ("latur", 17.2),
    ("nagpur", 11.3),
    ("nashik", 8.4),
    ("osmanabad", 16.8),
    ("prayagraj", 12.4),
    ("pune", 9.6),
    ("ratnagiri", 4.6),
    ("sangli", 9.1),
    ("satara", 7.2),
    ("solapur", 13.8),
];

/// Historical groundwater depths used when the monitoring network is unavailable.
#[derive(Debug, Clone)]
pub struct HistoricalAverages {
    depths: BTreeMap<String, f64>,
    default_depth_m: f64,
}

impl HistoricalAverages {
    /// Built-in table with `overrides` taking precedence.
    pub fn new(overrides: &BTreeMap<String, f64>, default_depth_m: f64) -> Self {
        let mut depths: BTreeMap<String, f64> = BUILTIN_AVERAGES
            .iter()
            .map(|(region, depth)| (region.to_string(), *depth))
            .collect();

        for (region, depth) in overrides {
            depths.insert(normalize_region(region), depth.abs());
        }

        Self {
            depths,
            default_depth_m,
        }
    }

    /// Average depth for a region, or the global default when the region is unknown.
    /// The flag reports whether the region was found.
    pub fn depth_for(&self, region: &str) -> (f64, bool) {
        match self.depths.get(&normalize_region(region)) {
            Some(depth) => (*depth, true),
            None => (self.default_depth_m, false),
        }
    }
}

pub fn normalize_region(region: &str) -> String {
    region.trim().to_lowercase()
}
