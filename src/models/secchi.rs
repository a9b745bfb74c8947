//! Secchi depth from the blue/red remote sensing reflectance ratio.
//!
//! ```text
//! ln_blueRed = ln(Rrs_488 / Rrs_667)
//! log10(MOSD) = 1.4856 * ln_blueRed + 0.2734
//! SD = 0.1777 * MOSD + 1.0813            [m]
//! ```

use crate::error::Result;
use crate::image::Image;
use crate::models::constants::{
    BLUE_WAVELENGTH, MOSD_INTERCEPT, MOSD_SLOPE, RED_WAVELENGTH, SD_GAIN, SD_OFFSET,
};
use crate::sat_bands::SatBands;

/// Band name of derived Secchi depth images.
pub const SECCHI_BAND: &str = "secchi_depth";

/// Secchi depth (m) for one pixel. `None` when the band ratio is not a positive finite number.
pub fn secchi_depth(rrs_blue: f32, rrs_red: f32) -> Option<f32> {
    let ratio = rrs_blue as f64 / rrs_red as f64;
    if !ratio.is_finite() || ratio <= 0.0 {
        return None;
    }

    let ln_blue_red = ratio.ln();
    let log_mosd = MOSD_SLOPE * ln_blue_red + MOSD_INTERCEPT;
    let mosd = 10_f64.powf(log_mosd);
    let sd = SD_GAIN * mosd + SD_OFFSET;

    sd.is_finite().then_some(sd as f32)
}

/// Secchi depth image of `image`, using the sensor bands closest to 488 and 667 nm.
pub fn secchi(image: &Image, bands: &SatBands) -> Result<Image> {
    let blue = image.band(&bands.rrs_band(BLUE_WAVELENGTH))?;
    let red = image.band(&bands.rrs_band(RED_WAVELENGTH))?;

    let sd = blue.zip_map(red, secchi_depth)?;

    Ok(image.derive(SECCHI_BAND, sd))
}
