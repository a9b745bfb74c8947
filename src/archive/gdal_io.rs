use gdal::Dataset;

use crate::bbox::Bbox;
use crate::error::Result;
use crate::raster::Raster;
use crate::region::Region;

/// Reads band 1 of `path` over the pixel window covering the region's bounding box.
///
/// Returns `None` when the raster footprint does not intersect the region. Values are scaled by
/// the band's scale and offset; the band's no-data value becomes `NaN`.
pub fn read_region(path: &str, region: &Region) -> Result<Option<Raster>> {
    let dataset = Dataset::open(path)?;
    let (width, height) = dataset.raster_size();
    let geo_transform = dataset.geo_transform()?;

    let footprint = Bbox::from_geo_transform(&geo_transform, width, height);
    if !region.intersects(&footprint) {
        return Ok(None);
    }

    let Some((x, y, w, h)) = region.bbox().pixel_window(&geo_transform, width, height) else {
        return Ok(None);
    };

    let band = dataset.rasterband(1)?;
    let buffer = band.read_as::<f32>((x as isize, y as isize), (w, h), (w, h), None)?;
    let scale = band.scale().unwrap_or(1.0);
    let offset = band.offset().unwrap_or(0.0);
    let missing_value = band.no_data_value();

    let data = buffer
        .data()
        .iter()
        .map(|&raw| {
            if raw.is_nan() || missing_value.is_some_and(|mv| raw == mv as f32) {
                f32::NAN
            } else {
                (raw as f64 * scale + offset) as f32
            }
        })
        .collect();

    let window_transform = [
        geo_transform[0] + x as f64 * geo_transform[1],
        geo_transform[1],
        geo_transform[2],
        geo_transform[3] + y as f64 * geo_transform[5],
        geo_transform[4],
        geo_transform[5],
    ];

    Raster::from_vec(data, w, h, window_transform).map(Some)
}
