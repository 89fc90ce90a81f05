//! Coarse region naming used when reverse geocoding is unavailable.

use harvest_types::Coordinates;

/// Name a coordinate by hemisphere, latitude band, and longitude sector.
///
/// ```text
/// (42.0, -93.6)  -> "Northern Mid-latitudes, Americas"
/// (-1.3, 36.8)   -> "Southern Tropics, Europe/Africa"
/// ```
pub fn region_band(at: Coordinates) -> String {
    let hemisphere = if at.is_southern() {
        "Southern"
    } else {
        "Northern"
    };

    let abs_lat = at.lat.abs();
    let band = if abs_lat < 23.5 {
        "Tropics"
    } else if abs_lat < 35.0 {
        "Subtropics"
    } else if abs_lat < 55.0 {
        "Mid-latitudes"
    } else if abs_lat < 66.5 {
        "Subpolar"
    } else {
        "Polar"
    };

    let sector = if at.lon < -30.0 {
        "Americas"
    } else if at.lon < 60.0 {
        "Europe/Africa"
    } else {
        "Asia/Oceania"
    };

    format!("{hemisphere} {band}, {sector}")
}
