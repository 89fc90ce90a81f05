//! Simplified clear-sky solar radiation model.
//!
//! Peak irradiance is approximated from the solar declination for the day
//! of year and the site latitude, then attenuated linearly by cloud cover
//! (full cover removes 70%).

/// Peak clear-sky irradiance at normal incidence, in W/m².
const PEAK_IRRADIANCE: f64 = 1000.0;

/// Fraction of radiation removed at 100% cloud cover.
const MAX_CLOUD_ATTENUATION: f64 = 0.7;

/// Solar declination in degrees for a day of year (1-366).
pub fn declination(day_of_year: u32) -> f64 {
    let angle = 360.0 * (284.0 + f64::from(day_of_year)) / 365.0;
    23.45 * angle.to_radians().sin()
}

/// Estimated solar radiation in W/m² for a latitude, day of year, and
/// cloud cover percentage. Never negative.
pub fn solar_radiation(lat: f64, day_of_year: u32, cloud_cover_pct: f64) -> f64 {
    let zenith = (lat - declination(day_of_year)).to_radians();
    let clear_sky = (PEAK_IRRADIANCE * zenith.cos()).max(0.0);
    let cover = (cloud_cover_pct / 100.0).clamp(0.0, 1.0);
    clear_sky * (1.0 - cover * MAX_CLOUD_ATTENUATION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declination_peaks_near_solstices() {
        // June solstice (day 172) near +23.45, December (day 355) near -23.45.
        assert!(declination(172) > 23.0);
        assert!(declination(355) < -23.0);
    }

    #[test]
    fn full_cloud_cover_removes_seventy_percent() {
        let clear = solar_radiation(0.0, 80, 0.0);
        let overcast = solar_radiation(0.0, 80, 100.0);
        assert!(clear > 0.0);
        assert!((overcast - clear * 0.3).abs() < 1e-9);
    }

    #[test]
    fn radiation_is_never_negative() {
        for day in [1_u32, 100, 200, 300, 365] {
            assert!(solar_radiation(89.0, day, 50.0) >= 0.0);
            assert!(solar_radiation(-89.0, day, 50.0) >= 0.0);
        }
    }

    #[test]
    fn cloud_cover_is_clamped() {
        let over = solar_radiation(40.0, 172, 250.0);
        let full = solar_radiation(40.0, 172, 100.0);
        assert!((over - full).abs() < 1e-9);
    }
}
