//! Temporal compositing.

use log::debug;

use crate::collection::ImageCollection;
use crate::error::Result;
use crate::raster::Raster;

/// Per-pixel mean of `band` across the collection.
///
/// Each pixel averages only the images with a valid value there; pixels never observed stay
/// no-data. Returns `None` for an empty collection. All images must share one grid: same size
/// and same geotransform.
pub fn temporal_mean(collection: &ImageCollection, band: &str) -> Result<Option<Raster>> {
    let mut images = collection.iter();
    let Some(first) = images.next() else {
        return Ok(None);
    };

    let reference = first.band(band)?;
    let mut sums = vec![0.0_f64; reference.data().len()];
    let mut counts = vec![0_u32; reference.data().len()];

    for raster in std::iter::once(Ok(reference)).chain(images.map(|image| image.band(band))) {
        let raster = raster?;
        reference.check_same_grid(raster)?;

        for (i, &value) in raster.data().iter().enumerate() {
            if !value.is_nan() {
                sums[i] += value as f64;
                counts[i] += 1;
            }
        }
    }

    let data: Vec<f32> = sums
        .iter()
        .zip(counts.iter())
        .map(|(&sum, &count)| {
            if count == 0 {
                f32::NAN
            } else {
                (sum / count as f64) as f32
            }
        })
        .collect();

    let composite = Raster::from_vec(
        data,
        reference.width(),
        reference.height(),
        *reference.geo_transform(),
    )?;
    debug!(
        "Composited {} images of {}: {}",
        collection.len(),
        band,
        composite
    );

    Ok(Some(composite))
}
