use crate::braille::BrailleCanvas;
use crate::controller::MapViewport;
use crate::map::geometry::{draw_disc, draw_line, draw_ring};
use crate::map::projection::Projection;

/// A geographic line (sequence of lon/lat coordinates)
pub type LineString = Vec<(f64, f64)>;

/// Level of detail for basemap data
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lod {
    Low,    // 110m - world view
    Medium, // 50m - continental
    High,   // 10m - regional
}

impl Lod {
    /// Select LOD from the viewport's projection scale
    pub fn from_scale(scale: f64) -> Self {
        if scale < 2.0 {
            Lod::Low
        } else if scale < 8.0 {
            Lod::Medium
        } else {
            Lod::High
        }
    }
}

/// A circle drawn for one country.
#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub lon: f64,
    pub lat: f64,
    pub radius_km: f64,
    pub selected: bool,
    pub label: Option<String>,
}

/// Layer toggles
#[derive(Clone, Debug)]
pub struct DisplaySettings {
    pub show_borders: bool,
    pub show_markers: bool,
    pub show_labels: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_borders: true,
            show_markers: true,
            show_labels: true,
        }
    }
}

/// Rendered layers, back to front, plus text labels in cell coordinates
pub struct MapLayers {
    pub coastlines: BrailleCanvas,
    pub borders: BrailleCanvas,
    pub markers: BrailleCanvas,
    pub selected: BrailleCanvas,
    pub labels: Vec<(u16, u16, String)>,
}

/// Basemap geometry at several resolutions, drawn under country markers.
#[derive(Default)]
pub struct MapRenderer {
    coastlines_low: Vec<LineString>,
    coastlines_medium: Vec<LineString>,
    coastlines_high: Vec<LineString>,
    borders_medium: Vec<LineString>,
    borders_high: Vec<LineString>,
    pub settings: DisplaySettings,
}

impl MapRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finest coastline set available at or below `lod`
    fn coastlines(&self, lod: Lod) -> &[LineString] {
        let candidates = match lod {
            Lod::High => [&self.coastlines_high, &self.coastlines_medium, &self.coastlines_low],
            Lod::Medium => [&self.coastlines_medium, &self.coastlines_low, &self.coastlines_low],
            Lod::Low => [&self.coastlines_low, &self.coastlines_medium, &self.coastlines_high],
        };
        candidates
            .into_iter()
            .find(|set| !set.is_empty())
            .map(|set| set.as_slice())
            .unwrap_or(&[])
    }

    /// Borders only show once zoomed past the world view
    fn borders(&self, lod: Lod) -> &[LineString] {
        match lod {
            Lod::Low => &[],
            Lod::Medium => self.borders_medium.as_slice(),
            Lod::High if self.borders_high.is_empty() => self.borders_medium.as_slice(),
            Lod::High => self.borders_high.as_slice(),
        }
    }

    /// Draw the basemap and `markers` onto canvases of `cols` x `rows` cells.
    pub fn render(&self, cols: usize, rows: usize, viewport: MapViewport, markers: &[Marker]) -> MapLayers {
        let projection = Projection::new(viewport, cols * 2, rows * 4);
        let lod = Lod::from_scale(viewport.scale());

        let mut layers = MapLayers {
            coastlines: BrailleCanvas::new(cols, rows),
            borders: BrailleCanvas::new(cols, rows),
            markers: BrailleCanvas::new(cols, rows),
            selected: BrailleCanvas::new(cols, rows),
            labels: Vec::new(),
        };

        for line in self.coastlines(lod) {
            draw_linestring(&mut layers.coastlines, line, &projection);
        }
        if self.settings.show_borders {
            for line in self.borders(lod) {
                draw_linestring(&mut layers.borders, line, &projection);
            }
        }

        if self.settings.show_markers {
            let max_radius = (projection.height / 6).clamp(2, 24) as i32;
            for marker in markers.iter().filter(|m| !m.selected) {
                let (px, py) = projection.project(marker.lon, marker.lat);
                if !projection.is_visible(px, py) {
                    continue;
                }
                let radius = (projection.km_to_pixels(marker.radius_km).round() as i32).clamp(1, max_radius);
                if radius <= 2 {
                    draw_disc(&mut layers.markers, (px, py), radius);
                } else {
                    draw_ring(&mut layers.markers, (px, py), radius);
                }
            }
        }

        // The selection is always drawn, whatever the toggles say
        for marker in markers.iter().filter(|m| m.selected) {
            let (px, py) = projection.project(marker.lon, marker.lat);
            if !projection.is_visible(px, py) {
                continue;
            }
            draw_disc(&mut layers.selected, (px, py), 2);

            if let (true, Some(label), Ok(x), Ok(y)) = (
                self.settings.show_labels,
                &marker.label,
                u16::try_from(px / 2),
                u16::try_from(py / 4),
            ) {
                layers.labels.push((x.saturating_add(2), y, label.clone()));
            }
        }

        layers
    }

    pub fn add_coastline(&mut self, line: LineString, lod: Lod) {
        match lod {
            Lod::Low => self.coastlines_low.push(line),
            Lod::Medium => self.coastlines_medium.push(line),
            Lod::High => self.coastlines_high.push(line),
        }
    }

    pub fn add_border(&mut self, line: LineString, lod: Lod) {
        match lod {
            Lod::High => self.borders_high.push(line),
            Lod::Low | Lod::Medium => self.borders_medium.push(line),
        }
    }

    pub fn has_data(&self) -> bool {
        !self.coastlines_low.is_empty()
            || !self.coastlines_medium.is_empty()
            || !self.coastlines_high.is_empty()
    }

    pub fn toggle_borders(&mut self) {
        self.settings.show_borders = !self.settings.show_borders;
    }

    pub fn toggle_markers(&mut self) {
        self.settings.show_markers = !self.settings.show_markers;
    }

    pub fn toggle_labels(&mut self) {
        self.settings.show_labels = !self.settings.show_labels;
    }
}

/// Draw a linestring, skipping segments that are off-canvas or that wrap
/// around the antimeridian
fn draw_linestring(canvas: &mut BrailleCanvas, line: &LineString, projection: &Projection) {
    let mut points = line.iter().map(|&(lon, lat)| projection.project(lon, lat));
    let Some(mut prev) = points.next() else {
        return;
    };
    for point in points {
        let jump = ((point.0 - prev.0).abs() + (point.1 - prev.1).abs()) as usize;
        if jump < projection.width && projection.line_might_be_visible(prev, point) {
            draw_line(canvas, prev, point);
        }
        prev = point;
    }
}
