//! In-memory single-band rasters.
//!
//! Cells are `f32` stored row-major; `NaN` marks no-data everywhere in the crate so that
//! arithmetic on missing pixels never produces a valid value by accident.

pub mod mask;

pub use mask::RegionMask;

use std::fmt;

use crate::bbox::Bbox;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    width: usize,
    height: usize,
    geo_transform: [f64; 6],
    data: Vec<f32>,
}

impl Raster {
    pub fn from_vec(
        data: Vec<f32>,
        width: usize,
        height: usize,
        geo_transform: [f64; 6],
    ) -> Result<Self> {
        if data.len() != width * height {
            return Err(Error::InvalidDimensions {
                width,
                height,
                len: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            geo_transform,
            data,
        })
    }

    pub fn filled(width: usize, height: usize, geo_transform: [f64; 6], value: f32) -> Self {
        Self {
            width,
            height,
            geo_transform,
            data: vec![value; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn geo_transform(&self) -> &[f64; 6] {
        &self.geo_transform
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let value = self.data[y * self.width + x];
        (!value.is_nan()).then_some(value)
    }

    pub fn extent(&self) -> Bbox {
        Bbox::from_geo_transform(&self.geo_transform, self.width, self.height)
    }

    /// Geographic coordinates of the centre of pixel `(x, y)`.
    pub fn pixel_center(&self, x: usize, y: usize) -> (f64, f64) {
        let gt = &self.geo_transform;
        let px = x as f64 + 0.5;
        let py = y as f64 + 0.5;
        (
            gt[0] + px * gt[1] + py * gt[2],
            gt[3] + px * gt[4] + py * gt[5],
        )
    }

    /// Pixel holding geographic point `(x, y)` on a north-up grid.
    pub fn pixel_at(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        let gt = &self.geo_transform;
        let col = ((x - gt[0]) / gt[1]).floor();
        let row = ((y - gt[3]) / gt[5]).floor();

        if col < 0.0 || row < 0.0 || col >= self.width as f64 || row >= self.height as f64 {
            return None;
        }
        Some((col as usize, row as usize))
    }

    pub fn same_grid(&self, other: &Raster) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.geo_transform == other.geo_transform
    }

    pub fn valid_count(&self) -> usize {
        self.data.iter().filter(|v| !v.is_nan()).count()
    }

    /// Apply `f` to every valid cell. `None` results, and non-finite ones, become no-data.
    pub fn map<F>(&self, f: F) -> Raster
    where
        F: Fn(f32) -> Option<f32>,
    {
        let data = self
            .data
            .iter()
            .map(|&v| {
                if v.is_nan() {
                    return f32::NAN;
                }
                f(v).filter(|r| r.is_finite()).unwrap_or(f32::NAN)
            })
            .collect();

        Raster {
            data,
            ..self.with_same_meta()
        }
    }

    /// Combine two rasters cell by cell. No-data in either input gives no-data.
    pub fn zip_map<F>(&self, other: &Raster, f: F) -> Result<Raster>
    where
        F: Fn(f32, f32) -> Option<f32>,
    {
        self.check_same_size(other)?;

        let data = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(&a, &b)| {
                if a.is_nan() || b.is_nan() {
                    return f32::NAN;
                }
                f(a, b).filter(|r| r.is_finite()).unwrap_or(f32::NAN)
            })
            .collect();

        Ok(Raster {
            data,
            ..self.with_same_meta()
        })
    }

    /// Copy of this raster with every cell outside `mask` set to no-data.
    pub fn masked(&self, mask: &RegionMask) -> Result<Raster> {
        if mask.width() != self.width || mask.height() != self.height {
            return Err(Error::SizeMismatch {
                ew: self.width,
                eh: self.height,
                aw: mask.width(),
                ah: mask.height(),
            });
        }

        let data = self
            .data
            .iter()
            .enumerate()
            .map(|(i, &v)| if mask.includes(i) { v } else { f32::NAN })
            .collect();

        Ok(Raster {
            data,
            ..self.with_same_meta()
        })
    }

    pub fn check_same_size(&self, other: &Raster) -> Result<()> {
        if self.width != other.width || self.height != other.height {
            return Err(Error::SizeMismatch {
                ew: self.width,
                eh: self.height,
                aw: other.width,
                ah: other.height,
            });
        }
        Ok(())
    }

    /// Same size and same geotransform, so cells at one index cover the same ground.
    pub fn check_same_grid(&self, other: &Raster) -> Result<()> {
        self.check_same_size(other)?;
        if !self.same_grid(other) {
            return Err(Error::GridMismatch {
                expected: self.geo_transform,
                actual: other.geo_transform,
            });
        }
        Ok(())
    }

    fn with_same_meta(&self) -> Raster {
        Raster {
            width: self.width,
            height: self.height,
            geo_transform: self.geo_transform,
            data: Vec::new(),
        }
    }
}

impl fmt::Display for Raster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Raster {{ {}x{}, valid pixels: {} }}",
            self.width,
            self.height,
            self.valid_count()
        )
    }
}
