use std::fmt;

use crate::raster::Raster;

/// Summary statistics of the valid pixels of a raster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterSummary {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
    pub valid: usize,
    pub total: usize,
}

impl RasterSummary {
    /// Statistics are `NaN` when the raster holds no valid pixel.
    pub fn new(raster: &Raster) -> Self {
        let valid_values: Vec<f32> = raster
            .data()
            .iter()
            .filter(|v| !v.is_nan())
            .copied()
            .collect();

        let (min, max, mean) = if valid_values.is_empty() {
            (f32::NAN, f32::NAN, f32::NAN)
        } else {
            (
                valid_values.iter().fold(f32::INFINITY, |a, &b| a.min(b)),
                valid_values.iter().fold(f32::NEG_INFINITY, |a, &b| a.max(b)),
                (valid_values.iter().map(|&v| v as f64).sum::<f64>() / valid_values.len() as f64)
                    as f32,
            )
        };

        Self {
            min,
            max,
            mean,
            valid: valid_values.len(),
            total: raster.data().len(),
        }
    }

    pub fn valid_fraction(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        self.valid as f32 / self.total as f32
    }
}

impl fmt::Display for RasterSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Min: {:.3}", self.min)?;
        writeln!(f, "  Max: {:.3}", self.max)?;
        writeln!(f, "  Mean: {:.3}", self.mean)?;
        write!(
            f,
            "  Valid pixels: {} / {} ({:.1}%)",
            self.valid,
            self.total,
            100.0 * self.valid_fraction()
        )
    }
}
