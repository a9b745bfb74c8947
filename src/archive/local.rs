use glob::Pattern;
use log::{debug, info, warn};
use std::collections::BTreeMap;
use walkdir::WalkDir;

use crate::archive::gdal_io::read_region;
use crate::archive::granule::{AcquisitionKey, Granule};
use crate::archive::{CollectionQuery, ImageSource};
use crate::collection::ImageCollection;
use crate::config::Product;
use crate::error::{Error, Result};
use crate::image::Image;
use crate::region::Region;

/// Level-3 granules of one product stored under a local directory.
#[derive(Debug)]
pub struct LocalArchive {
    product: Product,
    pattern: Pattern,
}

impl LocalArchive {
    pub fn new(product: Product) -> Result<Self> {
        if !product.archive.is_dir() {
            return Err(Error::MissingArchive(product.archive.clone()));
        }
        let pattern = Pattern::new(&product.file_pattern())?;
        Ok(Self { product, pattern })
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    /// All granules of the product at its resolution, searched recursively.
    pub fn granules(&self) -> Vec<Granule> {
        WalkDir::new(&self.product.archive)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| self.pattern.matches(&entry.file_name().to_string_lossy()))
            .filter_map(|entry| {
                let granule = Granule::parse(entry.path());
                if granule.is_none() {
                    debug!("Skipping unrecognised file {}", entry.path().display());
                }
                granule
            })
            .filter(|granule| {
                granule.sensor == self.product.sensor
                    && granule.frequency == self.product.frequency
                    && granule.resolution == self.product.resolution
            })
            .collect()
    }

    fn group_acquisitions<I>(granules: I) -> BTreeMap<AcquisitionKey, Vec<Granule>>
    where
        I: IntoIterator<Item = Granule>,
    {
        let mut acquisitions: BTreeMap<AcquisitionKey, Vec<Granule>> = BTreeMap::new();
        for granule in granules {
            acquisitions
                .entry(granule.acquisition_key())
                .or_default()
                .push(granule);
        }
        acquisitions
    }

    /// Builds the image of one acquisition over the region's window.
    ///
    /// `None` when a required band is missing, when the footprint misses the region, or when the
    /// band grids disagree.
    fn load_image(
        &self,
        granules: &[Granule],
        region: &Region,
        bands: &[String],
    ) -> Result<Option<Image>> {
        let Some(first) = granules.first() else {
            return Ok(None);
        };
        let id = first.image_id();

        let mut image = Image::new(id.clone(), first.timestamp())
            .with_property("product", self.product.id.clone());

        for band in bands {
            let Some(granule) = granules.iter().find(|g| &g.band == band) else {
                warn!("✗ {} has no {} granule, skipping acquisition", id, band);
                return Ok(None);
            };

            let raster = match read_region(&granule.gdal_path(), region) {
                Ok(Some(raster)) => raster,
                Ok(None) => {
                    debug!("{} does not intersect the region", granule.file_name());
                    return Ok(None);
                }
                Err(e) => {
                    warn!("Could not load {}: {}", granule.file_name(), e);
                    return Ok(None);
                }
            };

            image = match image.with_band(band.clone(), raster) {
                Ok(image) => image.with_property(format!("source:{}", band), granule.file_name()),
                Err(e) => {
                    warn!("{} has inconsistent band grids: {}", id, e);
                    return Ok(None);
                }
            };
        }

        Ok(Some(image))
    }
}

impl ImageSource for LocalArchive {
    fn query(&self, query: &CollectionQuery) -> Result<ImageCollection> {
        let granules = self
            .granules()
            .into_iter()
            .filter(|granule| query.time_window.contains(granule.timestamp()));
        let acquisitions = Self::group_acquisitions(granules);

        info!(
            "{}: {} acquisitions from {}",
            self.product.id,
            acquisitions.len(),
            query.time_window
        );

        let mut images = Vec::with_capacity(acquisitions.len());
        for granules in acquisitions.values() {
            if let Some(image) = self.load_image(granules, &query.region, &query.bands)? {
                debug!("✓ Loaded {}", image);
                images.push(image);
            }
        }

        Ok(ImageCollection::from_images(images))
    }

    fn image(&self, id: &str, region: &Region, bands: &[String]) -> Result<Image> {
        let granules = self
            .granules()
            .into_iter()
            .filter(|granule| granule.image_id() == id);
        let acquisitions = Self::group_acquisitions(granules);

        for granules in acquisitions.values() {
            if let Some(image) = self.load_image(granules, region, bands)? {
                return image.clip(region);
            }
        }

        Err(Error::UnknownImage(id.to_string()))
    }
}
