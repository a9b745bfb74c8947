//! Area of interest used both as a spatial filter and as the reduction footprint.

use geo::{Area, BoundingRect, Contains, InteriorPoint, Intersects, LineString, Point, Polygon};

use crate::bbox::Bbox;

/// A closed polygon of (longitude, latitude) vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    polygon: Polygon<f64>,
    bbox: Bbox,
}

impl Region {
    pub fn new(coords: &[[f64; 2]]) -> Result<Self, String> {
        let mut vertices: Vec<(f64, f64)> = Vec::with_capacity(coords.len());
        for &[lon, lat] in coords {
            if !lon.is_finite() || !lat.is_finite() {
                return Err("Coordinates must be finite numbers".to_string());
            }
            if !(-180.0..=180.0).contains(&lon) {
                return Err(format!("Longitude {} must be between -180 and 180", lon));
            }
            if !(-90.0..=90.0).contains(&lat) {
                return Err(format!("Latitude {} must be between -90 and 90", lat));
            }
            if vertices.last() != Some(&(lon, lat)) {
                vertices.push((lon, lat));
            }
        }

        // The ring is closed by the polygon itself.
        if vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }

        if vertices.len() < 3 {
            return Err("A region needs at least 3 distinct vertices".to_string());
        }

        let polygon = Polygon::new(LineString::from(vertices), vec![]);
        if polygon.unsigned_area() <= 0.0 {
            return Err("Region vertices must not be collinear".to_string());
        }

        let rect = polygon
            .bounding_rect()
            .ok_or_else(|| "Region has no extent".to_string())?;

        let bbox = Bbox::new(rect.min().x, rect.max().x, rect.min().y, rect.max().y)?;

        Ok(Self { polygon, bbox })
    }

    pub fn bbox(&self) -> &Bbox {
        &self.bbox
    }

    pub fn polygon(&self) -> &Polygon<f64> {
        &self.polygon
    }

    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        self.polygon.contains(&Point::new(lon, lat))
    }

    /// Whether a raster footprint overlaps the polygon, not only its bounding box.
    pub fn intersects(&self, footprint: &Bbox) -> bool {
        self.bbox.intersects(footprint) && self.polygon.intersects(&footprint.to_rect())
    }

    /// A point guaranteed to lie inside the polygon.
    pub fn interior_point(&self) -> Option<(f64, f64)> {
        self.polygon.interior_point().map(|p| (p.x(), p.y()))
    }
}
