//! Model coefficients
//!
//! Coefficients of the Secchi depth regression (fit against in-situ transparency, R² = 0.8748)
//! and of Carlson's (1977) trophic state index.

/// Blue reference wavelength of the band ratio (nm)
pub const BLUE_WAVELENGTH: u32 = 488;

/// Red reference wavelength of the band ratio (nm)
pub const RED_WAVELENGTH: u32 = 667;

/// Slope of log10(MOSD) against ln(Rrs_blue / Rrs_red)
pub const MOSD_SLOPE: f64 = 1.4856;

/// Intercept of log10(MOSD) against ln(Rrs_blue / Rrs_red)
pub const MOSD_INTERCEPT: f64 = 0.2734;

/// Linear rescaling from MOSD to Secchi depth (m)
pub const SD_GAIN: f64 = 0.1777;
pub const SD_OFFSET: f64 = 1.0813;

/// Carlson TSI(SD) = TSI_BASE - TSI_SLOPE * ln(SD)
pub const TSI_BASE: f64 = 60.0;
pub const TSI_SLOPE: f64 = 14.41;

/// Upper bounds of the Carlson trophic classes
pub const OLIGOTROPHIC_MAX: f64 = 40.0;
pub const MESOTROPHIC_MAX: f64 = 50.0;
pub const EUTROPHIC_MAX: f64 = 70.0;
