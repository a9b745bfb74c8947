//! Regional time series: one reduced value per image, in acquisition order.

use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::collection::ImageCollection;
use crate::error::Result;
use crate::raster::RegionMask;
use crate::region::Region;

/// Statistic applied to the valid pixels of the region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reducer {
    #[default]
    Mean,
    Median,
    Min,
    Max,
}

impl Reducer {
    /// `None` for an empty slice. Reorders `values`.
    pub fn reduce(&self, values: &mut [f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }

        match self {
            Reducer::Mean => Some(values.iter().sum::<f64>() / values.len() as f64),
            Reducer::Median => {
                values.sort_by(|a, b| a.total_cmp(b));
                let n = values.len();
                if n % 2 == 0 {
                    Some((values[n / 2 - 1] + values[n / 2]) / 2.0)
                } else {
                    Some(values[n / 2])
                }
            }
            Reducer::Min => values.iter().copied().reduce(f64::min),
            Reducer::Max => values.iter().copied().reduce(f64::max),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Reducer::Mean => "mean",
            Reducer::Median => "median",
            Reducer::Min => "min",
            Reducer::Max => "max",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub timestamp: DateTime<Utc>,
    pub id: String,
    /// `None` when no valid pixel fell inside the region.
    pub value: Option<f64>,
    /// Number of valid pixels reduced.
    pub count: usize,
}

#[derive(Debug, Clone)]
pub struct TimeSeries {
    pub band: String,
    pub reducer: Reducer,
    pub points: Vec<SeriesPoint>,
}

impl TimeSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points that carry a value.
    pub fn values(&self) -> impl Iterator<Item = (DateTime<Utc>, f64)> + '_ {
        self.points
            .iter()
            .filter_map(|p| p.value.map(|v| (p.timestamp, v)))
    }

    /// Mean over the points that carry a value.
    pub fn mean(&self) -> Option<f64> {
        let mut values: Vec<f64> = self.values().map(|(_, v)| v).collect();
        Reducer::Mean.reduce(&mut values)
    }

    /// Writes `date,id,<band>_<reducer>,count` rows; missing values are empty cells.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        let column = format!("{}_{}", self.band, self.reducer.name());
        wtr.write_record(["date", "id", column.as_str(), "count"])?;

        for point in &self.points {
            let value = point.value.map(|v| v.to_string()).unwrap_or_default();
            wtr.write_record([
                point.timestamp.format("%Y-%m-%d").to_string(),
                point.id.clone(),
                value,
                point.count.to_string(),
            ])?;
        }

        wtr.flush()?;
        Ok(())
    }

    pub fn to_csv_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.write_csv(File::create(path)?)
    }
}

/// Reduces `band` of every image over the region.
///
/// Images whose grid does not overlap the region are left out; every other image yields exactly
/// one point, in the collection's (timestamp) order.
pub fn series_by_region(
    collection: &ImageCollection,
    band: &str,
    region: &Region,
    reducer: Reducer,
) -> Result<TimeSeries> {
    let mut points = Vec::with_capacity(collection.len());
    let mut cached: Option<([f64; 6], usize, usize, RegionMask)> = None;

    for image in collection {
        let raster = image.band(band)?;
        if !region.intersects(&raster.extent()) {
            continue;
        }

        // Images of one product share a grid, so the mask is rebuilt only when it changes.
        let (gt, width, height) = (*raster.geo_transform(), raster.width(), raster.height());
        let reusable = matches!(
            &cached,
            Some((cached_gt, w, h, _)) if *cached_gt == gt && *w == width && *h == height
        );
        if !reusable {
            cached = Some((gt, width, height, RegionMask::new(raster, region)));
        }
        let Some((_, _, _, mask)) = &cached else {
            continue;
        };

        let mut values: Vec<f64> = raster
            .data()
            .iter()
            .enumerate()
            .filter(|&(i, v)| mask.includes(i) && !v.is_nan())
            .map(|(_, &v)| v as f64)
            .collect();

        points.push(SeriesPoint {
            timestamp: image.timestamp(),
            id: image.id().to_string(),
            count: values.len(),
            value: reducer.reduce(&mut values),
        });
    }

    Ok(TimeSeries {
        band: band.to_string(),
        reducer,
        points,
    })
}
