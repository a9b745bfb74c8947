//! Image sources
//!
//! An [`ImageSource`] answers collection queries (time window + region + bands) and single-image
//! lookups. [`LocalArchive`] reads OB.DAAC Level-3 granules through GDAL; an in-memory
//! [`ImageCollection`] answers the same queries by filtering itself.

pub mod gdal_io;
pub mod granule;
pub mod local;

pub use granule::Granule;
pub use local::LocalArchive;

use log::warn;

use crate::collection::ImageCollection;
use crate::config::TimeWindow;
use crate::error::{Error, Result};
use crate::image::Image;
use crate::region::Region;

#[derive(Debug, Clone)]
pub struct CollectionQuery {
    pub time_window: TimeWindow,
    pub region: Region,
    pub bands: Vec<String>,
}

impl CollectionQuery {
    pub fn new(time_window: TimeWindow, region: Region, bands: &[&str]) -> Self {
        Self {
            time_window,
            region,
            bands: bands.iter().map(|b| b.to_string()).collect(),
        }
    }
}

pub trait ImageSource {
    /// Images acquired within the window whose footprint intersects the region and that carry
    /// every requested band, ordered by acquisition time.
    fn query(&self, query: &CollectionQuery) -> Result<ImageCollection>;

    /// One image by id, clipped to the region.
    fn image(&self, id: &str, region: &Region, bands: &[String]) -> Result<Image>;
}

fn has_bands(image: &Image, bands: &[String]) -> bool {
    let missing: Vec<&String> = bands
        .iter()
        .filter(|band| image.band(band).is_err())
        .collect();
    if !missing.is_empty() {
        warn!("✗ {} is missing bands {:?}, skipping", image.id(), missing);
    }
    missing.is_empty()
}

impl ImageSource for ImageCollection {
    fn query(&self, query: &CollectionQuery) -> Result<ImageCollection> {
        let filtered = self
            .filter_date(&query.time_window)
            .filter_bounds(&query.region);
        let images = filtered
            .iter()
            .filter(|image| has_bands(image, &query.bands))
            .cloned()
            .collect();
        Ok(ImageCollection::from_images(images))
    }

    fn image(&self, id: &str, region: &Region, bands: &[String]) -> Result<Image> {
        match self.get(id) {
            Some(image) if has_bands(image, bands) => image.clip(region),
            _ => Err(Error::UnknownImage(id.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::Raster;
    use chrono::{TimeZone, Utc};

    const GT: [f64; 6] = [0.0, 1.0, 0.0, 4.0, 0.0, -1.0];

    fn collection() -> ImageCollection {
        let images = (1..=6)
            .map(|day| {
                let image = Image::new(
                    format!("A201612{}", day),
                    Utc.with_ymd_and_hms(2016, 5, day, 0, 0, 0).unwrap(),
                )
                .with_band("chlor_a", Raster::filled(4, 4, GT, day as f32))
                .unwrap();
                if day == 4 {
                    image
                } else {
                    image
                        .with_band("Rrs_488", Raster::filled(4, 4, GT, 0.02))
                        .unwrap()
                }
            })
            .collect();
        ImageCollection::from_images(images)
    }

    fn region() -> Region {
        Region::new(&[[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0]]).unwrap()
    }

    #[test]
    fn test_in_memory_query_filters_window_and_bands() {
        let query = CollectionQuery::new(
            TimeWindow::parse("2016-05-02", "2016-05-05").unwrap(),
            region(),
            &["chlor_a", "Rrs_488"],
        );

        let result = collection().query(&query).unwrap();
        let ids: Vec<&str> = result.iter().map(Image::id).collect();

        assert_eq!(ids, vec!["A2016122", "A2016123", "A2016125"]);
    }

    #[test]
    fn test_empty_window_gives_empty_collection() {
        let query = CollectionQuery::new(
            TimeWindow::parse("2017-01-01", "2017-01-31").unwrap(),
            region(),
            &["chlor_a"],
        );

        assert!(collection().query(&query).unwrap().is_empty());
    }

    #[test]
    fn test_single_image_is_clipped() {
        let image = collection()
            .image("A2016123", &region(), &["chlor_a".to_string()])
            .unwrap();
        let chl = image.band("chlor_a").unwrap();

        assert_eq!(chl.valid_count(), 4);
        assert_eq!(chl.get(0, 3), Some(3.0));
        assert_eq!(chl.get(3, 0), None);
    }

    #[test]
    fn test_unknown_image() {
        let err = collection()
            .image("A2099001", &region(), &["chlor_a".to_string()])
            .unwrap_err();
        assert!(matches!(err, Error::UnknownImage(_)));
    }
}
