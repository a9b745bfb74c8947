//! Raster exports.
//!
//! Composites are resampled (nearest neighbour) onto a north-up EPSG:4326 grid covering the
//! export region at a fixed nominal scale, clipped to the region polygon, and written as
//! single-band `f32` GeoTIFFs with `NaN` as no-data.

use gdal::Metadata;
use gdal::raster::Buffer;
use gdal::spatial_ref::SpatialRef;
use gdal::DriverManager;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::raster::{Raster, RegionMask};
use crate::region::Region;

/// Nominal export resolution in meters.
pub const EXPORT_SCALE: f64 = 250.0;

/// Length of one degree of latitude at the equator, used to express the scale in degrees.
pub const METERS_PER_DEGREE: f64 = 111_320.0;

#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub description: String,
    /// Meters per pixel.
    pub scale: f64,
    pub region: Region,
}

impl ExportRequest {
    pub fn new(description: impl Into<String>, region: Region) -> Self {
        Self {
            description: description.into(),
            scale: EXPORT_SCALE,
            region,
        }
    }

    /// Pixel size of the export grid in degrees.
    pub fn pixel_size(&self) -> f64 {
        self.scale / METERS_PER_DEGREE
    }

    /// `Mean Secchi Depth` is written as `Mean_Secchi_Depth.tif`.
    pub fn file_name(&self) -> String {
        let stem: Vec<&str> = self.description.split_whitespace().collect();
        format!("{}.tif", stem.join("_"))
    }
}

/// A completed export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportTask {
    pub description: String,
    pub path: PathBuf,
    pub width: usize,
    pub height: usize,
    pub scale: f64,
    pub valid_pixels: usize,
}

pub trait Exporter {
    fn export(&self, raster: &Raster, request: &ExportRequest) -> Result<ExportTask>;
}

/// Writes exports as GeoTIFFs into one directory.
#[derive(Debug, Clone)]
pub struct GeoTiffExporter {
    output_directory: PathBuf,
}

impl GeoTiffExporter {
    pub fn new<P: Into<PathBuf>>(output_directory: P) -> Self {
        Self {
            output_directory: output_directory.into(),
        }
    }

    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }
}

impl Exporter for GeoTiffExporter {
    fn export(&self, raster: &Raster, request: &ExportRequest) -> Result<ExportTask> {
        fs::create_dir_all(&self.output_directory)?;

        let resampled = resample_to_region(raster, request)?;
        let path = self.output_directory.join(request.file_name());
        write_geotiff(&path, &resampled, &request.description)?;

        info!(
            "✓ Exported {} ({}x{} at {} m) to: {}",
            request.description,
            resampled.width(),
            resampled.height(),
            request.scale,
            path.display()
        );

        Ok(ExportTask {
            description: request.description.clone(),
            path,
            width: resampled.width(),
            height: resampled.height(),
            scale: request.scale,
            valid_pixels: resampled.valid_count(),
        })
    }
}

/// Nearest-neighbour resample of `raster` onto the export grid of `request`, clipped to its
/// region. Grid cells falling outside `raster` are no-data.
pub fn resample_to_region(raster: &Raster, request: &ExportRequest) -> Result<Raster> {
    let bbox = request.region.bbox();
    let pixel_size = request.pixel_size();

    let width = (bbox.width() / pixel_size).ceil().max(1.0) as usize;
    let height = (bbox.height() / pixel_size).ceil().max(1.0) as usize;
    let geo_transform = [bbox.xmin, pixel_size, 0.0, bbox.ymax, 0.0, -pixel_size];

    let template = Raster::filled(width, height, geo_transform, f32::NAN);
    let data: Vec<f32> = (0..height)
        .flat_map(|y| (0..width).map(move |x| (x, y)))
        .map(|(x, y)| {
            let (lon, lat) = template.pixel_center(x, y);
            raster
                .pixel_at(lon, lat)
                .and_then(|(sx, sy)| raster.get(sx, sy))
                .unwrap_or(f32::NAN)
        })
        .collect();
    let grid = Raster::from_vec(data, width, height, geo_transform)?;

    let mask = RegionMask::new(&grid, &request.region);
    grid.masked(&mask)
}

/// Writes a single-band `f32` GeoTIFF in EPSG:4326.
pub fn write_geotiff<P: AsRef<Path>>(path: P, raster: &Raster, description: &str) -> Result<()> {
    let driver = DriverManager::get_driver_by_name("GTiff")?;

    let (width, height) = (raster.width(), raster.height());
    let mut dataset = driver.create_with_band_type::<f32, _>(path.as_ref(), width, height, 1)?;
    dataset.set_geo_transform(raster.geo_transform())?;
    dataset.set_spatial_ref(&SpatialRef::from_epsg(4326)?)?;

    let mut band = dataset.rasterband(1)?;
    band.set_no_data_value(Some(f64::NAN))?;
    band.set_description(description)?;

    let mut buffer = Buffer::new((width, height), raster.data().to_vec());
    band.write((0, 0), (width, height), &mut buffer)?;

    Ok(())
}
