use std::f64::consts::PI;

use crate::controller::MapViewport;

/// Web Mercator breaks down at the poles
const MAX_LAT: f64 = 85.0;

/// Kilometres per degree of longitude at the equator
const KM_PER_DEGREE: f64 = 111.32;

/// Normalised Mercator `y` in `[0, 1]`, north at 0
fn mercator_y(lat: f64) -> f64 {
    let lat_rad = lat.clamp(-MAX_LAT, MAX_LAT).to_radians();
    (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0
}

fn mercator_x(lon: f64) -> f64 {
    (lon + 180.0) / 360.0
}

/// Maps geographic coordinates onto a braille canvas of a given pixel size.
#[derive(Clone, Debug)]
pub struct Projection {
    center_x: f64,
    center_y: f64,
    /// Pixels per unit of normalised Mercator space
    scale: f64,
    pub width: usize,
    pub height: usize,
}

impl Projection {
    pub fn new(viewport: MapViewport, width: usize, height: usize) -> Self {
        Self {
            center_x: mercator_x(viewport.center.lng),
            center_y: mercator_y(viewport.center.lat),
            scale: viewport.scale() * width as f64,
            width,
            height,
        }
    }

    /// Pixel coordinates of `(lon, lat)`
    pub fn project(&self, lon: f64, lat: f64) -> (i32, i32) {
        let px = (mercator_x(lon) - self.center_x) * self.scale + self.width as f64 / 2.0;
        let py = (mercator_y(lat) - self.center_y) * self.scale + self.height as f64 / 2.0;
        (px as i32, py as i32)
    }

    /// Horizontal pixel length of a distance along the equator
    pub fn km_to_pixels(&self, km: f64) -> f64 {
        km / KM_PER_DEGREE / 360.0 * self.scale
    }

    /// Whether a projected point lands on, or just beside, the canvas
    pub fn is_visible(&self, px: i32, py: i32) -> bool {
        px >= -10 && px < self.width as i32 + 10 && py >= -10 && py < self.height as i32 + 10
    }

    /// Rough bounding-box test for a segment
    pub fn line_might_be_visible(&self, p1: (i32, i32), p2: (i32, i32)) -> bool {
        p1.0.max(p2.0) >= 0
            && p1.0.min(p2.0) < self.width as i32
            && p1.1.max(p2.1) >= 0
            && p1.1.min(p2.1) < self.height as i32
    }
}
