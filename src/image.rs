use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Error, Result};
use crate::raster::{Raster, RegionMask};
use crate::region::Region;

/// A multi-band acquisition. All bands share one grid.
#[derive(Debug, Clone)]
pub struct Image {
    id: String,
    timestamp: DateTime<Utc>,
    bands: BTreeMap<String, Raster>,
    properties: BTreeMap<String, String>,
}

impl Image {
    pub fn new(id: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            timestamp,
            bands: BTreeMap::new(),
            properties: BTreeMap::new(),
        }
    }

    /// Adds a band; its grid must match the bands already present.
    pub fn with_band(mut self, name: impl Into<String>, raster: Raster) -> Result<Self> {
        if let Some(existing) = self.bands.values().next() {
            existing.check_same_size(&raster)?;
        }
        self.bands.insert(name.into(), raster);
        Ok(self)
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn band(&self, name: &str) -> Result<&Raster> {
        self.bands.get(name).ok_or_else(|| Error::MissingBand {
            image: self.id.clone(),
            band: name.to_string(),
        })
    }

    pub fn band_names(&self) -> impl Iterator<Item = &str> {
        self.bands.keys().map(String::as_str)
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Single-band image holding `name`, keeping id, timestamp and properties.
    pub fn select(&self, name: &str) -> Result<Image> {
        let raster = self.band(name)?.clone();
        Ok(Image {
            id: self.id.clone(),
            timestamp: self.timestamp,
            bands: BTreeMap::from([(name.to_string(), raster)]),
            properties: self.properties.clone(),
        })
    }

    /// New single-band image computed from this one. Only the id and the acquisition timestamp
    /// are carried over.
    pub fn derive(&self, name: impl Into<String>, raster: Raster) -> Image {
        Image {
            id: self.id.clone(),
            timestamp: self.timestamp,
            bands: BTreeMap::from([(name.into(), raster)]),
            properties: BTreeMap::new(),
        }
    }

    /// Copy with every pixel outside the region set to no-data in all bands.
    pub fn clip(&self, region: &Region) -> Result<Image> {
        let Some(grid) = self.grid() else {
            return Ok(self.clone());
        };
        let mask = RegionMask::new(grid, region);

        let mut bands = BTreeMap::new();
        for (name, raster) in &self.bands {
            bands.insert(name.clone(), raster.masked(&mask)?);
        }

        Ok(Image {
            id: self.id.clone(),
            timestamp: self.timestamp,
            bands,
            properties: self.properties.clone(),
        })
    }

    /// Any band of the image, standing in for the grid they all share.
    pub fn grid(&self) -> Option<&Raster> {
        self.bands.values().next()
    }
}

impl fmt::Display for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bands: Vec<&str> = self.band_names().collect();
        write!(
            f,
            "{} ({}) bands: {:?}",
            self.id,
            self.timestamp.format("%Y-%m-%d"),
            bands
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const GT: [f64; 6] = [0.0, 1.0, 0.0, 2.0, 0.0, -1.0];

    fn image() -> Image {
        Image::new("A2016100", Utc.with_ymd_and_hms(2016, 4, 9, 0, 0, 0).unwrap())
            .with_band("chlor_a", Raster::filled(2, 2, GT, 3.0))
            .unwrap()
            .with_band("Rrs_488", Raster::filled(2, 2, GT, 0.02))
            .unwrap()
            .with_property("source", "AQUA_MODIS.20160409.L3m.DAY.CHL.chlor_a.4km.nc")
    }

    #[test]
    fn test_select_keeps_metadata() {
        let chl = image().select("chlor_a").unwrap();

        assert_eq!(chl.band_names().collect::<Vec<_>>(), vec!["chlor_a"]);
        assert_eq!(chl.id(), "A2016100");
        assert!(chl.property("source").is_some());
    }

    #[test]
    fn test_missing_band_is_reported() {
        let err = image().select("Rrs_667").unwrap_err();
        assert!(matches!(err, Error::MissingBand { ref band, .. } if band == "Rrs_667"));
    }

    #[test]
    fn test_derive_keeps_only_id_and_timestamp() {
        let source = image();
        let derived = source.derive("secchi_depth", Raster::filled(2, 2, GT, 4.0));

        assert_eq!(derived.id(), source.id());
        assert_eq!(derived.timestamp(), source.timestamp());
        assert_eq!(derived.property("source"), None);
    }

    #[test]
    fn test_bands_must_share_grid() {
        let result = Image::new("A2016100", Utc::now())
            .with_band("chlor_a", Raster::filled(2, 2, GT, 1.0))
            .unwrap()
            .with_band("Rrs_488", Raster::filled(3, 3, GT, 1.0));

        assert!(result.is_err());
    }
}
