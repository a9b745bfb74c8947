use geo::{Coord, Rect};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bbox {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl Bbox {
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Result<Self, String> {
        if !(-180.0..=180.0).contains(&xmin) || !(-180.0..=180.0).contains(&xmax) {
            return Err("Longitude values must be between -180 and 180".to_string());
        }

        if !(-90.0..=90.0).contains(&ymin) || !(-90.0..=90.0).contains(&ymax) {
            return Err("Latitude values must be between -90 and 90".to_string());
        }

        if xmin > xmax || ymin > ymax {
            return Err("Min values must be <= max values".to_string());
        }

        Ok(Bbox {
            xmin,
            xmax,
            ymin,
            ymax,
        })
    }

    /// Extent covered by a `width` x `height` grid with a north-up geotransform.
    pub fn from_geo_transform(geo_transform: &[f64; 6], width: usize, height: usize) -> Self {
        let x0 = geo_transform[0];
        let y0 = geo_transform[3];
        let x1 = x0 + geo_transform[1] * width as f64;
        let y1 = y0 + geo_transform[5] * height as f64;

        Bbox {
            xmin: x0.min(x1),
            xmax: x0.max(x1),
            ymin: y0.min(y1),
            ymax: y0.max(y1),
        }
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    pub fn intersects(&self, other: &Bbox) -> bool {
        self.xmin <= other.xmax
            && self.xmax >= other.xmin
            && self.ymin <= other.ymax
            && self.ymax >= other.ymin
    }

    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            Coord {
                x: self.xmin,
                y: self.ymin,
            },
            Coord {
                x: self.xmax,
                y: self.ymax,
            },
        )
    }

    /// Pixel window `(x_offset, y_offset, width, height)` of this box inside a grid, clamped to
    /// the grid. `None` when the box falls outside it.
    pub fn pixel_window(
        &self,
        geo_transform: &[f64; 6],
        width: usize,
        height: usize,
    ) -> Option<(usize, usize, usize, usize)> {
        // geotransform: [top_left_x, pixel_width, 0, top_left_y, 0, -pixel_height]
        let pixel_min_x = ((self.xmin - geo_transform[0]) / geo_transform[1]).floor() as i64;
        let pixel_max_x = ((self.xmax - geo_transform[0]) / geo_transform[1]).ceil() as i64;
        let pixel_min_y = ((self.ymax - geo_transform[3]) / geo_transform[5]).floor() as i64;
        let pixel_max_y = ((self.ymin - geo_transform[3]) / geo_transform[5]).ceil() as i64;

        let start_x = pixel_min_x.max(0).min(width as i64) as usize;
        let end_x = pixel_max_x.max(0).min(width as i64) as usize;
        let start_y = pixel_min_y.max(0).min(height as i64) as usize;
        let end_y = pixel_max_y.max(0).min(height as i64) as usize;

        if end_x <= start_x || end_y <= start_y {
            return None;
        }

        Some((start_x, start_y, end_x - start_x, end_y - start_y))
    }
}
