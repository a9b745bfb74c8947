pub mod archive;
pub mod bbox;
pub mod chart;
pub mod collection;
pub mod composite;
pub mod config;
pub mod error;
pub mod export;
pub mod image;
pub mod models;
pub mod pipeline;
pub mod raster;
pub mod region;
pub mod sat_bands;
pub mod series;
pub mod utils;

pub use error::{Error, Result};
