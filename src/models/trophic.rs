//! Carlson trophic state index from Secchi depth: `TSI = 60 - 14.41 * ln(SD)`.

use std::fmt;

use crate::error::Result;
use crate::image::Image;
use crate::models::constants::{
    EUTROPHIC_MAX, MESOTROPHIC_MAX, OLIGOTROPHIC_MAX, TSI_BASE, TSI_SLOPE,
};
use crate::models::secchi::SECCHI_BAND;

/// Band name of derived trophic state images.
pub const TSI_BAND: &str = "tsi";

/// Trophic state index for one Secchi depth (m). `None` for non-positive depths.
pub fn trophic_state_index(secchi_depth: f32) -> Option<f32> {
    let sd = secchi_depth as f64;
    if !sd.is_finite() || sd <= 0.0 {
        return None;
    }
    Some((TSI_BASE - TSI_SLOPE * sd.ln()) as f32)
}

/// Trophic state image of a Secchi depth image.
pub fn trophic_state(image: &Image) -> Result<Image> {
    let tsi = image.band(SECCHI_BAND)?.map(trophic_state_index);
    Ok(image.derive(TSI_BAND, tsi))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrophicClass {
    Oligotrophic,
    Mesotrophic,
    Eutrophic,
    Hypereutrophic,
}

impl TrophicClass {
    pub fn from_index(tsi: f64) -> Self {
        if tsi < OLIGOTROPHIC_MAX {
            TrophicClass::Oligotrophic
        } else if tsi < MESOTROPHIC_MAX {
            TrophicClass::Mesotrophic
        } else if tsi < EUTROPHIC_MAX {
            TrophicClass::Eutrophic
        } else {
            TrophicClass::Hypereutrophic
        }
    }
}

impl fmt::Display for TrophicClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrophicClass::Oligotrophic => write!(f, "oligotrophic"),
            TrophicClass::Mesotrophic => write!(f, "mesotrophic"),
            TrophicClass::Eutrophic => write!(f, "eutrophic"),
            TrophicClass::Hypereutrophic => write!(f, "hypereutrophic"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::Raster;
    use approx::assert_relative_eq;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_reference_value() {
        // SD from Rrs_488 = 0.02, Rrs_667 = 0.01
        let tsi = trophic_state_index(4.6526).unwrap();
        assert_relative_eq!(tsi, 37.846, epsilon = 1e-2);
        assert_relative_eq!(trophic_state_index(1.0).unwrap(), 60.0);
    }

    #[test]
    fn test_decreases_with_depth() {
        let depths = [0.1_f32, 0.5, 1.0, 2.0, 4.0, 8.0, 16.0];
        let indices: Vec<f32> = depths
            .iter()
            .map(|&sd| trophic_state_index(sd).unwrap())
            .collect();

        assert!(indices.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_non_positive_depth_is_nodata() {
        assert_eq!(trophic_state_index(0.0), None);
        assert_eq!(trophic_state_index(-1.0), None);
    }

    #[test]
    fn test_image_transform_keeps_timestamp() {
        let timestamp = Utc.with_ymd_and_hms(2016, 8, 15, 0, 0, 0).unwrap();
        let gt = [0.0, 1.0, 0.0, 1.0, 0.0, -1.0];
        let sd = Raster::from_vec(vec![1.0, 0.0, f32::NAN, 4.0], 2, 2, gt).unwrap();
        let image = Image::new("A2016228", timestamp)
            .with_band(SECCHI_BAND, sd)
            .unwrap();

        let derived = trophic_state(&image).unwrap();
        let tsi = derived.band(TSI_BAND).unwrap();

        assert_eq!(derived.timestamp(), timestamp);
        assert_eq!(derived.id(), "A2016228");
        assert_eq!(tsi.get(0, 0), Some(60.0));
        assert_eq!(tsi.get(1, 0), None);
        assert_eq!(tsi.get(0, 1), None);
        assert!(tsi.get(1, 1).is_some());
    }

    #[test]
    fn test_classes() {
        assert_eq!(TrophicClass::from_index(35.0), TrophicClass::Oligotrophic);
        assert_eq!(TrophicClass::from_index(40.0), TrophicClass::Mesotrophic);
        assert_eq!(TrophicClass::from_index(39.99), TrophicClass::Oligotrophic);
        assert_eq!(TrophicClass::from_index(49.99), TrophicClass::Mesotrophic);
        assert_eq!(TrophicClass::from_index(50.0), TrophicClass::Eutrophic);
        assert_eq!(TrophicClass::from_index(55.0), TrophicClass::Eutrophic);
        assert_eq!(TrophicClass::from_index(69.99), TrophicClass::Eutrophic);
        assert_eq!(TrophicClass::from_index(70.0), TrophicClass::Hypereutrophic);
    }
}
