use crate::raster::Raster;
use crate::region::Region;

/// Pixels of a grid that belong to a region.
///
/// A pixel belongs to the region when its centre lies inside the polygon. Polygons smaller than a
/// pixel still select the one pixel holding their interior point, so a point-like region reduces
/// to that pixel's value.
#[derive(Debug, Clone)]
pub struct RegionMask {
    width: usize,
    height: usize,
    inside: Vec<bool>,
}

impl RegionMask {
    pub fn new(grid: &Raster, region: &Region) -> Self {
        let (width, height) = (grid.width(), grid.height());
        let mut inside = vec![false; width * height];

        if region.intersects(&grid.extent()) {
            for y in 0..height {
                for x in 0..width {
                    let (lon, lat) = grid.pixel_center(x, y);
                    inside[y * width + x] = region.contains(lon, lat);
                }
            }

            if !inside.contains(&true)
                && let Some((lon, lat)) = region.interior_point()
                && let Some((x, y)) = grid.pixel_at(lon, lat)
            {
                inside[y * width + x] = true;
            }
        }

        Self {
            width,
            height,
            inside,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn includes(&self, index: usize) -> bool {
        self.inside.get(index).copied().unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        !self.inside.contains(&true)
    }

    pub fn len(&self) -> usize {
        self.inside.iter().filter(|&&i| i).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 4x4 one-degree grid covering lon [0, 4], lat [0, 4]
    fn grid() -> Raster {
        Raster::filled(4, 4, [0.0, 1.0, 0.0, 4.0, 0.0, -1.0], 1.0)
    }

    #[test]
    fn test_selects_pixel_centres_inside_polygon() {
        let region = Region::new(&[[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0]]).unwrap();
        let mask = RegionMask::new(&grid(), &region);

        // bottom-left 2x2 block: rows 2 and 3, cols 0 and 1
        assert_eq!(mask.len(), 4);
        assert!(mask.includes(2 * 4));
        assert!(mask.includes(3 * 4 + 1));
        assert!(!mask.includes(0));
    }

    #[test]
    fn test_sub_pixel_region_selects_one_pixel() {
        let region = Region::new(&[[1.1, 3.1], [1.3, 3.1], [1.3, 3.3]]).unwrap();
        let mask = RegionMask::new(&grid(), &region);

        assert_eq!(mask.len(), 1);
        assert!(mask.includes(1));
    }

    #[test]
    fn test_disjoint_region_is_empty() {
        let region = Region::new(&[[10.0, 10.0], [11.0, 10.0], [11.0, 11.0]]).unwrap();
        let mask = RegionMask::new(&grid(), &region);

        assert!(mask.is_empty());
    }
}
