//! Time-ordered image collections.

use chrono::{DateTime, Utc};
use log::debug;

use crate::config::TimeWindow;
use crate::error::Result;
use crate::image::Image;
use crate::region::Region;

/// Images ordered by acquisition time, at most one per acquisition.
#[derive(Debug, Clone, Default)]
pub struct ImageCollection {
    images: Vec<Image>,
}

impl ImageCollection {
    /// Sorts by timestamp and drops repeated acquisitions, keeping the first one seen.
    pub fn from_images(mut images: Vec<Image>) -> Self {
        images.sort_by_key(|image| image.timestamp());

        let before = images.len();
        images.dedup_by(|later, earlier| later.timestamp() == earlier.timestamp());
        if images.len() != before {
            debug!(
                "Dropped {} duplicate acquisitions",
                before - images.len()
            );
        }

        Self { images }
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Image> {
        self.images.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Image> {
        self.images.iter().find(|image| image.id() == id)
    }

    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.images.iter().map(Image::timestamp).collect()
    }

    pub fn filter_date(&self, window: &TimeWindow) -> Self {
        self.filter(|image| window.contains(image.timestamp()))
    }

    /// Keeps images whose grid intersects the region.
    pub fn filter_bounds(&self, region: &Region) -> Self {
        self.filter(|image| {
            image
                .grid()
                .is_some_and(|grid| region.intersects(&grid.extent()))
        })
    }

    pub fn select(&self, band: &str) -> Result<Self> {
        self.map(|image| image.select(band))
    }

    /// Applies `f` to every image. The result has the same length and order as `self`.
    pub fn map<F>(&self, f: F) -> Result<Self>
    where
        F: Fn(&Image) -> Result<Image>,
    {
        let images = self.images.iter().map(f).collect::<Result<Vec<_>>>()?;
        Ok(Self { images })
    }

    fn filter<P>(&self, predicate: P) -> Self
    where
        P: Fn(&Image) -> bool,
    {
        Self {
            images: self
                .images
                .iter()
                .filter(|image| predicate(*image))
                .cloned()
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ImageCollection {
    type Item = &'a Image;
    type IntoIter = std::slice::Iter<'a, Image>;

    fn into_iter(self) -> Self::IntoIter {
        self.images.iter()
    }
}
