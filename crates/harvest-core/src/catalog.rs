//! Static reference tables: crops, farm locations, and weather events.
//!
//! Catalogs are built once at startup and never mutated. The crop catalog
//! can be replaced wholesale from configuration; the others are fixed.

use std::collections::BTreeMap;

use harvest_types::{Coordinates, Crop, FarmLocation, WeatherEvent};

/// Lookup table of plantable crops keyed by id.
#[derive(Debug, Clone, PartialEq)]
pub struct CropCatalog {
    crops: BTreeMap<String, Crop>,
}

impl CropCatalog {
    /// The built-in crop table.
    pub fn builtin() -> Self {
        Self::from_crops(vec![
            crop("corn", "Corn", 90, 0.7, (15.0, 30.0), 50, 120, "\u{1f33d}", (0.3, 0.1, 0.6)),
            crop("wheat", "Wheat", 120, 0.5, (10.0, 25.0), 30, 80, "\u{1f33e}", (0.4, 0.2, 0.7)),
            crop("soybean", "Soybean", 100, 0.6, (20.0, 30.0), 40, 100, "\u{1fad8}", (0.8, 0.4, 0.5)),
            crop("tomato", "Tomato", 80, 0.8, (18.0, 28.0), 60, 150, "\u{1f345}", (0.2, -0.1, 0.3)),
            crop("coverCrop", "Cover Crop", 60, 0.3, (5.0, 35.0), 20, 0, "\u{1f331}", (1.2, 0.8, 0.9)),
        ])
    }

    /// Build a catalog from explicit entries. Later duplicates win.
    pub fn from_crops(crops: Vec<Crop>) -> Self {
        Self {
            crops: crops.into_iter().map(|c| (c.id.clone(), c)).collect(),
        }
    }

    /// Look up a crop by id.
    pub fn get(&self, id: &str) -> Option<&Crop> {
        self.crops.get(id)
    }

    /// All crops in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Crop> {
        self.crops.values()
    }

    /// Number of crops.
    pub fn len(&self) -> usize {
        self.crops.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.crops.is_empty()
    }
}

impl Default for CropCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Lookup table of selectable farm locations keyed by id.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationCatalog {
    locations: BTreeMap<String, FarmLocation>,
}

impl LocationCatalog {
    /// The built-in location table.
    pub fn builtin() -> Self {
        let locations = [
            location("iowa", "Iowa Corn Belt", (42.0308, -93.6319), "Continental", "Prairie Soil", 300),
            location("california", "Central Valley", (36.7783, -119.4179), "Mediterranean", "Alluvial Soil", 100),
            location("kansas", "Great Plains", (38.5266, -96.7265), "Semi-arid", "Mollisol", 500),
            location("nebraska", "Corn Belt", (41.1254, -98.2681), "Continental", "Loess Soil", 400),
        ];
        Self {
            locations: locations.into_iter().map(|l| (l.id.clone(), l)).collect(),
        }
    }

    /// Look up a location by id.
    pub fn get(&self, id: &str) -> Option<&FarmLocation> {
        self.locations.get(id)
    }

    /// All locations in id order.
    pub fn iter(&self) -> impl Iterator<Item = &FarmLocation> {
        self.locations.values()
    }
}

impl Default for LocationCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// The extreme weather events a farm can face.
pub fn weather_events() -> Vec<WeatherEvent> {
    vec![
        event("drought", 0.7, 14, "Reduces soil moisture by 50%, increases irrigation needs", 0.3),
        event("flood", 0.8, 3, "Damages crops, delays planting, increases disease risk", 0.15),
        event("heatwave", 0.6, 7, "Stresses crops, increases water demand, reduces yields", 0.25),
        event("frost", 0.9, 1, "Can kill sensitive crops, delays planting season", 0.2),
        event("hail", 0.5, 1, "Physical damage to crops, insurance claims", 0.1),
    ]
}

// ---------------------------------------------------------------------------
// Table row helpers
// ---------------------------------------------------------------------------

/// `ecology` is `(carbon_sequestration, soil_health_impact, pest_resistance)`.
#[allow(clippy::too_many_arguments)]
fn crop(
    id: &str,
    name: &str,
    growth_time: u32,
    water_need: f64,
    (temp_min, temp_max): (f64, f64),
    cost: i64,
    base_yield: u32,
    emoji: &str,
    (carbon_sequestration, soil_health_impact, pest_resistance): (f64, f64, f64),
) -> Crop {
    Crop {
        id: id.to_owned(),
        name: name.to_owned(),
        growth_time,
        water_need,
        temp_min,
        temp_max,
        cost,
        base_yield,
        emoji: emoji.to_owned(),
        carbon_sequestration,
        soil_health_impact,
        pest_resistance,
    }
}

fn location(
    id: &str,
    region: &str,
    (lat, lon): (f64, f64),
    climate: &str,
    soil_type: &str,
    elevation: u32,
) -> FarmLocation {
    FarmLocation {
        id: id.to_owned(),
        region: region.to_owned(),
        coordinates: Coordinates::new(lat, lon),
        climate: climate.to_owned(),
        soil_type: soil_type.to_owned(),
        elevation,
    }
}

fn event(kind: &str, severity: f64, duration_days: u32, impact: &str, probability: f64) -> WeatherEvent {
    WeatherEvent {
        kind: kind.to_owned(),
        severity,
        duration_days,
        impact: impact.to_owned(),
        probability,
    }
}
