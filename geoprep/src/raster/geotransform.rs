/// Affine mapping between pixel indices and map coordinates.
///
/// Same shape as a GDAL geotransform without the rotation terms: scanned
/// maps are north-up, so only origin and pixel size matter. `pixel_height`
/// is negative because row indices grow downward while northings grow up.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoTransform {
    pub origin_x: f64,
    pub origin_y: f64,
    pub pixel_width: f64,
    pub pixel_height: f64,
}

impl GeoTransform {
    pub fn new(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            pixel_width,
            pixel_height,
        }
    }

    /// Builds a transform from map bounds, for scans that carry no
    /// georeferencing tags.
    pub fn from_bounds(west: f64, south: f64, east: f64, north: f64, width: u32, height: u32) -> Self {
        Self {
            origin_x: west,
            origin_y: north,
            pixel_width: (east - west) / width as f64,
            pixel_height: (south - north) / height as f64,
        }
    }

    /// Map coordinates of a pixel center.
    pub fn pixel_to_geo(&self, col: f64, row: f64) -> (f64, f64) {
        (
            self.origin_x + (col + 0.5) * self.pixel_width,
            self.origin_y + (row + 0.5) * self.pixel_height,
        )
    }

    pub fn geo_to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        (
            (x - self.origin_x) / self.pixel_width - 0.5,
            (y - self.origin_y) / self.pixel_height - 0.5,
        )
    }
}
