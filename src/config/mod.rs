use serde::Deserialize;
use serde::Deserializer;
use serde::de::Error;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::region::Region;
use crate::sat_bands::Satellites;

pub mod error;
pub use error::ConfigError;

pub mod time_step;
pub use time_step::TimeStep;

pub mod time_window;
pub use time_window::TimeWindow;

/// Collection id of the MODIS-Aqua Level-3 standard mapped image product.
pub const DEFAULT_PRODUCT_ID: &str = "NASA/OCEANDATA/MODIS-Aqua/L3SMI";

/// An ocean-color product stored as Level-3 granules under `archive`.
#[derive(Debug, Deserialize, Clone)]
pub struct Product {
    #[serde(default = "default_product_id")]
    pub id: String,
    pub archive: PathBuf,
    #[serde(default = "default_sensor")]
    pub sensor: Satellites,
    #[serde(default = "default_frequency")]
    pub frequency: TimeStep,
    /// Granule resolution (`4km`, `9km`). One archive may hold several; only this one is read.
    #[serde(default = "default_resolution")]
    pub resolution: String,
    /// Glob matched against granule file names.
    pub pattern: Option<String>,
}

fn default_product_id() -> String {
    DEFAULT_PRODUCT_ID.to_string()
}

fn default_sensor() -> Satellites {
    Satellites::Modis
}

fn default_frequency() -> TimeStep {
    TimeStep::Daily
}

fn default_resolution() -> String {
    "4km".to_string()
}

impl Product {
    pub fn new<P: Into<PathBuf>>(archive: P, sensor: Satellites, frequency: TimeStep) -> Self {
        Self {
            id: default_product_id(),
            archive: archive.into(),
            sensor,
            frequency,
            resolution: default_resolution(),
            pattern: None,
        }
    }

    pub fn with_resolution(mut self, resolution: impl Into<String>) -> Self {
        self.resolution = resolution.into();
        self
    }

    pub fn file_pattern(&self) -> String {
        self.pattern.clone().unwrap_or_else(|| {
            format!("{}.*.L3m.{}.*", self.sensor.mission(), self.frequency.code())
        })
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    time_window: TimeWindow,
    region: Option<Region>,
    product: Product,
    output_directory: PathBuf,
    single_image: Option<String>,
}

// Deserializes a Config, checking that the dates parse and are in order and that the region, when
// present, is a valid polygon.
impl<'de> Deserialize<'de> for Config {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ConfigHelper {
            start_date: String,
            end_date: String,
            region: Option<Vec<[f64; 2]>>,
            product: Product,
            output_directory: Option<PathBuf>,
            single_image: Option<String>,
        }

        let helper = ConfigHelper::deserialize(deserializer)?;

        let time_window = TimeWindow::parse(&helper.start_date, &helper.end_date)
            .map_err(|e| D::Error::custom(format!("Invalid time window: {}", e)))?;

        let region = match helper.region {
            Some(coords) => Some(
                Region::new(&coords)
                    .map_err(|e| D::Error::custom(ConfigError::InvalidRegion(e)))?,
            ),
            None => None,
        };

        Ok(Config {
            time_window,
            region,
            product: helper.product,
            output_directory: helper
                .output_directory
                .unwrap_or_else(|| PathBuf::from("./output")),
            single_image: helper.single_image,
        })
    }
}

impl Config {
    pub fn new(time_window: TimeWindow, product: Product) -> Self {
        Self {
            time_window,
            region: None,
            product,
            output_directory: PathBuf::from("./output"),
            single_image: None,
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let config: Config = serde_json::from_reader(reader)?;

        Ok(config)
    }

    pub fn with_region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    pub fn with_time_window(mut self, time_window: TimeWindow) -> Self {
        self.time_window = time_window;
        self
    }

    pub fn with_output_directory<P: Into<PathBuf>>(mut self, output_directory: P) -> Self {
        self.output_directory = output_directory.into();
        self
    }

    pub fn with_single_image(mut self, id: impl Into<String>) -> Self {
        self.single_image = Some(id.into());
        self
    }

    pub fn time_window(&self) -> &TimeWindow {
        &self.time_window
    }

    /// The area of interest. Every stage needs it, so a missing region is reported up front.
    pub fn region(&self) -> Result<&Region, ConfigError> {
        self.region.as_ref().ok_or(ConfigError::MissingRegion)
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    pub fn single_image(&self) -> Option<&str> {
        self.single_image.as_deref()
    }
}
