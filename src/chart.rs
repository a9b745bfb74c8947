//! Scatter chart descriptors for regional time series.
//!
//! Charts are persisted as JSON (title, axis label, marker options and the points to plot) for
//! whatever plotting front end consumes them. Points without a value are left out.

use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::error::Result;
use crate::series::TimeSeries;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub date: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterChart {
    pub chart_type: &'static str,
    pub title: String,
    pub v_axis: Axis,
    pub line_width: u32,
    pub point_size: u32,
    pub points: Vec<ChartPoint>,
}

impl ScatterChart {
    pub fn new(title: &str, v_axis_title: &str, series: &TimeSeries) -> Self {
        let points = series
            .values()
            .map(|(timestamp, value)| ChartPoint {
                date: timestamp.format("%Y-%m-%d").to_string(),
                value,
            })
            .collect();

        Self {
            chart_type: "ScatterChart",
            title: title.to_string(),
            v_axis: Axis {
                title: v_axis_title.to_string(),
            },
            line_width: 1,
            point_size: 4,
            points,
        }
    }

    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}
