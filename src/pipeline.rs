//! End-to-end water quality workflow.
//!
//! Queries an [`ImageSource`] for the configured window and region, derives Secchi depth and
//! trophic state images, builds one regional mean series per indicator and exports the temporal
//! mean of each indicator. Optionally summarises a single acquisition.

use chrono::{DateTime, Utc};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use crate::archive::{CollectionQuery, ImageSource, LocalArchive};
use crate::chart::ScatterChart;
use crate::collection::ImageCollection;
use crate::composite::temporal_mean;
use crate::config::Config;
use crate::error::Result;
use crate::export::{ExportRequest, ExportTask, Exporter, GeoTiffExporter};
use crate::models::constants::{BLUE_WAVELENGTH, RED_WAVELENGTH};
use crate::models::{SECCHI_BAND, TSI_BAND, secchi, trophic_state};
use crate::raster::Raster;
use crate::region::Region;
use crate::sat_bands::{CHLOR_A, SatBands};
use crate::series::{Reducer, TimeSeries, series_by_region};
use crate::utils::RasterSummary;

/// One indicator carried through the series and export stages.
#[derive(Debug, Clone, Copy)]
pub struct Indicator {
    pub band: &'static str,
    pub chart_title: &'static str,
    pub axis_title: &'static str,
    pub export_description: &'static str,
}

pub const CHLOROPHYLL: Indicator = Indicator {
    band: CHLOR_A,
    chart_title: "Mean chlor_a",
    axis_title: "chlor_a (ug / L)",
    export_description: "Mean Chlorophyll-a",
};

pub const SECCHI_DEPTH: Indicator = Indicator {
    band: SECCHI_BAND,
    chart_title: "Mean Secchi Depth",
    axis_title: "Zsd [m]",
    export_description: "Mean Secchi Depth",
};

pub const TROPHIC_STATE: Indicator = Indicator {
    band: TSI_BAND,
    chart_title: "Mean TSI",
    axis_title: "TSI value",
    export_description: "Mean Trophic State (from index)",
};

#[derive(Debug, Clone)]
pub struct SeriesOutput {
    pub title: String,
    pub series: TimeSeries,
    pub csv: PathBuf,
    pub chart: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ImageSummary {
    pub id: String,
    pub summary: RasterSummary,
}

#[derive(Debug, Clone, Default)]
pub struct PipelineReport {
    pub images: usize,
    /// Id and acquisition time of every image in the filtered collection, in order.
    pub available: Vec<(String, DateTime<Utc>)>,
    pub series: Vec<SeriesOutput>,
    pub exports: Vec<ExportTask>,
    pub single_image: Option<ImageSummary>,
}

/// Derived collections, one per indicator, all in acquisition order.
#[derive(Debug, Clone)]
pub struct IndicatorCollections {
    pub chlorophyll: ImageCollection,
    pub secchi_depth: ImageCollection,
    pub trophic_state: ImageCollection,
}

impl IndicatorCollections {
    /// Selects chlorophyll and derives Secchi depth then trophic state from `collection`.
    pub fn derive(collection: &ImageCollection, bands: &SatBands) -> Result<Self> {
        let chlorophyll = collection.select(CHLOR_A)?;
        let secchi_depth = collection.map(|image| secchi(image, bands))?;
        let trophic_state = secchi_depth.map(trophic_state)?;

        Ok(Self {
            chlorophyll,
            secchi_depth,
            trophic_state,
        })
    }

    fn iter(&self) -> impl Iterator<Item = (Indicator, &ImageCollection)> {
        [
            (CHLOROPHYLL, &self.chlorophyll),
            (SECCHI_DEPTH, &self.secchi_depth),
            (TROPHIC_STATE, &self.trophic_state),
        ]
        .into_iter()
    }
}

pub struct Pipeline<S: ImageSource, E: Exporter> {
    config: Config,
    source: S,
    exporter: E,
}

impl Pipeline<LocalArchive, GeoTiffExporter> {
    /// Pipeline reading the configured archive and writing GeoTIFFs under `<output>/exports`.
    pub fn from_config(config: Config) -> Result<Self> {
        let source = LocalArchive::new(config.product().clone())?;
        let exporter = GeoTiffExporter::new(config.output_directory().join("exports"));
        Ok(Self::new(config, source, exporter))
    }
}

impl<S: ImageSource, E: Exporter> Pipeline<S, E> {
    pub fn new(config: Config, source: S, exporter: E) -> Self {
        Self {
            config,
            source,
            exporter,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn exporter(&self) -> &E {
        &self.exporter
    }

    pub fn run(&self) -> Result<PipelineReport> {
        let region = self.config.region()?;
        let bands = SatBands::new(self.config.product().sensor);

        let collection = self.query(region, &bands)?;
        info!(
            "Found {} images from {}",
            collection.len(),
            self.config.time_window()
        );

        // Everything that can fail on the inputs runs before the first file is written.
        let single_image = match self.config.single_image() {
            Some(id) => Some(self.inspect(id, region)?),
            None => None,
        };

        let indicators = IndicatorCollections::derive(&collection, &bands)?;
        let composites = indicators
            .iter()
            .map(|(indicator, images)| Ok((indicator, temporal_mean(images, indicator.band)?)))
            .collect::<Result<Vec<_>>>()?;

        let series_directory = self.config.output_directory().join("series");
        fs::create_dir_all(&series_directory)?;

        let mut report = PipelineReport {
            images: collection.len(),
            available: collection
                .iter()
                .map(|image| (image.id().to_string(), image.timestamp()))
                .collect(),
            single_image,
            ..Default::default()
        };

        for (indicator, images) in indicators.iter() {
            report
                .series
                .push(self.series(indicator, images, region, &series_directory)?);
        }

        for (indicator, mean) in &composites {
            if let Some(task) = self.export(*indicator, mean.as_ref(), region)? {
                report.exports.push(task);
            }
        }

        Ok(report)
    }

    fn query(&self, region: &Region, bands: &SatBands) -> Result<ImageCollection> {
        let blue = bands.rrs_band(BLUE_WAVELENGTH);
        let red = bands.rrs_band(RED_WAVELENGTH);
        let query = CollectionQuery::new(
            *self.config.time_window(),
            region.clone(),
            &[CHLOR_A, blue.as_str(), red.as_str()],
        );
        self.source.query(&query)
    }

    fn series(
        &self,
        indicator: Indicator,
        images: &ImageCollection,
        region: &Region,
        directory: &Path,
    ) -> Result<SeriesOutput> {
        let series = series_by_region(images, indicator.band, region, Reducer::Mean)?;
        let stem = format!("{}_{}", indicator.band, series.reducer.name());

        let csv = directory.join(format!("{}.csv", stem));
        series.to_csv_file(&csv)?;

        let chart = directory.join(format!("{}.json", stem));
        ScatterChart::new(indicator.chart_title, indicator.axis_title, &series).to_json_file(&chart)?;

        info!(
            "✓ {}: {} points ({} with values) to: {}",
            indicator.chart_title,
            series.len(),
            series.values().count(),
            csv.display()
        );

        Ok(SeriesOutput {
            title: indicator.chart_title.to_string(),
            series,
            csv,
            chart,
        })
    }

    fn export(
        &self,
        indicator: Indicator,
        mean: Option<&Raster>,
        region: &Region,
    ) -> Result<Option<ExportTask>> {
        let Some(mean) = mean else {
            warn!(
                "✗ No images to composite, skipping export of {}",
                indicator.export_description
            );
            return Ok(None);
        };

        let request = ExportRequest::new(indicator.export_description, region.clone());
        self.exporter.export(mean, &request).map(Some)
    }

    fn inspect(&self, id: &str, region: &Region) -> Result<ImageSummary> {
        let image = self.source.image(id, region, &[CHLOR_A.to_string()])?;
        let summary = RasterSummary::new(image.band(CHLOR_A)?);
        info!("{} {}:\n{}", id, CHLOR_A, summary);

        Ok(ImageSummary {
            id: id.to_string(),
            summary,
        })
    }
}
