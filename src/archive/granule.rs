//! OB.DAAC Level-3 granule names.
//!
//! `AQUA_MODIS.20160401.L3m.DAY.RRS.Rrs_488.4km.nc`
//! `AQUA_MODIS.20250701_20250731.L3m.MO.CHL.chlor_a.4km.cog.tif`

use chrono::{DateTime, NaiveDate, Utc};
use std::path::{Path, PathBuf};

use crate::config::TimeStep;
use crate::sat_bands::Satellites;

#[derive(Debug, Clone, PartialEq)]
pub struct Granule {
    pub path: PathBuf,
    pub sensor: Satellites,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub frequency: TimeStep,
    pub suite: String,
    pub band: String,
    pub resolution: String,
}

/// Granules sharing a key belong to the same acquisition.
pub type AcquisitionKey = (Satellites, NaiveDate, TimeStep, String);

impl Granule {
    pub fn parse(path: &Path) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?;
        let parts: Vec<&str> = file_name.split('.').collect();

        if parts.len() < 8 || parts[2] != "L3m" {
            return None;
        }

        let extension = parts[parts.len() - 1];
        if !matches!(extension, "tif" | "tiff" | "nc") {
            return None;
        }

        let sensor = Satellites::from_mission(parts[0])?;

        let (start, end) = match parts[1].split_once('_') {
            Some((start, end)) => (parse_date(start)?, parse_date(end)?),
            None => {
                let date = parse_date(parts[1])?;
                (date, date)
            }
        };

        Some(Self {
            path: path.to_path_buf(),
            sensor,
            start,
            end,
            frequency: parts[3].parse().ok()?,
            suite: parts[4].to_string(),
            band: parts[5].to_string(),
            resolution: parts[6].to_string(),
        })
    }

    /// Acquisition time: start of the compositing period, midnight UTC.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.start.and_time(chrono::NaiveTime::MIN).and_utc()
    }

    /// Collection image id, e.g. `A2017183` for Aqua on 2017-07-02.
    pub fn image_id(&self) -> String {
        format!("{}{}", self.sensor.id_prefix(), self.start.format("%Y%j"))
    }

    pub fn acquisition_key(&self) -> AcquisitionKey {
        (
            self.sensor,
            self.start,
            self.frequency,
            self.resolution.clone(),
        )
    }

    /// Path GDAL opens: NetCDF granules are addressed through their variable.
    pub fn gdal_path(&self) -> String {
        let path = self.path.to_string_lossy();
        if self.path.extension().is_some_and(|ext| ext == "nc") {
            format!("NETCDF:{}:{}", path, self.band)
        } else {
            path.to_string()
        }
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y%m%d").ok()
}
