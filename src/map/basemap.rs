//! Natural Earth coastline and border files for the map background.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use geojson::{GeoJson, Geometry, Value};
use log::{info, warn};

use crate::map::{LineString, Lod, MapRenderer};

const COASTLINE_FILES: [(&str, Lod); 3] = [
    ("ne_110m_coastline.json", Lod::Low),
    ("ne_50m_coastline.json", Lod::Medium),
    ("ne_10m_coastline.json", Lod::High),
];

const BORDER_FILES: [(&str, Lod); 2] = [
    ("ne_50m_borders.json", Lod::Medium),
    ("ne_10m_borders.json", Lod::High),
];

/// Load whichever basemap files exist in `data_dir`, then fall back to a
/// coarse built-in outline if no coastline could be read.
///
/// A missing or unreadable file is logged and skipped.
pub fn load_basemap(renderer: &mut MapRenderer, data_dir: &Path) {
    let layers = COASTLINE_FILES
        .iter()
        .map(|&(name, lod)| (name, lod, true))
        .chain(BORDER_FILES.iter().map(|&(name, lod)| (name, lod, false)));

    for (name, lod, is_coastline) in layers {
        let path = data_dir.join(name);
        if !path.exists() {
            continue;
        }
        match read_lines(&path) {
            Ok(lines) => {
                info!("loaded {} lines from {}", lines.len(), path.display());
                for line in lines {
                    if is_coastline {
                        renderer.add_coastline(line, lod);
                    } else {
                        renderer.add_border(line, lod);
                    }
                }
            }
            Err(e) => warn!("skipping {}: {e:#}", path.display()),
        }
    }

    if !renderer.has_data() {
        info!("no coastline data in {}; using built-in outline", data_dir.display());
        add_fallback_outline(renderer);
    }
}

/// Every line and polygon ring in a GeoJSON file
fn read_lines(path: &Path) -> Result<Vec<LineString>> {
    let content = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let geojson: GeoJson = content.parse().context("invalid GeoJSON")?;

    let mut lines = Vec::new();
    match &geojson {
        GeoJson::FeatureCollection(collection) => {
            for geometry in collection.features.iter().filter_map(|f| f.geometry.as_ref()) {
                collect_lines(geometry, &mut lines);
            }
        }
        GeoJson::Feature(feature) => {
            if let Some(geometry) = &feature.geometry {
                collect_lines(geometry, &mut lines);
            }
        }
        GeoJson::Geometry(geometry) => collect_lines(geometry, &mut lines),
    }
    Ok(lines)
}

fn collect_lines(geometry: &Geometry, out: &mut Vec<LineString>) {
    let to_line = |positions: &Vec<Vec<f64>>| -> LineString {
        positions
            .iter()
            .filter(|p| p.len() >= 2)
            .map(|p| (p[0], p[1]))
            .collect()
    };

    match &geometry.value {
        Value::LineString(positions) => out.push(to_line(positions)),
        Value::MultiLineString(lines) => out.extend(lines.iter().map(to_line)),
        // Exterior rings only
        Value::Polygon(rings) => out.extend(rings.first().map(to_line)),
        Value::MultiPolygon(polygons) => {
            out.extend(polygons.iter().filter_map(|rings| rings.first()).map(to_line));
        }
        Value::GeometryCollection(geometries) => {
            for geometry in geometries {
                collect_lines(geometry, out);
            }
        }
        Value::Point(_) | Value::MultiPoint(_) => {}
    }
}

/// Very rough continent outlines so the map is never empty
fn add_fallback_outline(renderer: &mut MapRenderer) {
    let continents: [&[(f64, f64)]; 7] = [
        // North America
        &[
            (-166.0, 68.0), (-141.0, 60.0), (-124.0, 48.0), (-117.0, 32.0),
            (-105.0, 20.0), (-87.0, 15.0), (-80.0, 25.0), (-76.0, 35.0),
            (-66.0, 45.0), (-56.0, 52.0), (-64.0, 60.0), (-82.0, 64.0),
            (-110.0, 69.0), (-140.0, 70.0), (-166.0, 68.0),
        ],
        // South America
        &[
            (-80.0, 9.0), (-61.0, 8.0), (-50.0, 0.0), (-35.0, -7.0),
            (-41.0, -22.0), (-58.0, -38.0), (-68.0, -54.0), (-74.0, -45.0),
            (-71.0, -18.0), (-81.0, -4.0), (-80.0, 9.0),
        ],
        // Europe
        &[
            (-9.0, 37.0), (3.0, 43.0), (12.0, 44.0), (24.0, 38.0),
            (29.0, 41.0), (40.0, 47.0), (40.0, 66.0), (28.0, 71.0),
            (15.0, 68.0), (5.0, 60.0), (8.0, 54.0), (-2.0, 48.0),
            (-9.0, 43.0), (-9.0, 37.0),
        ],
        // Africa
        &[
            (-17.0, 21.0), (-10.0, 35.0), (10.0, 37.0), (32.0, 31.0),
            (43.0, 12.0), (51.0, 11.0), (40.0, -15.0), (32.0, -29.0),
            (19.0, -35.0), (12.0, -17.0), (9.0, 4.0), (-8.0, 4.0),
            (-17.0, 14.0), (-17.0, 21.0),
        ],
        // Asia
        &[
            (40.0, 66.0), (70.0, 73.0), (110.0, 76.0), (180.0, 69.0),
            (160.0, 60.0), (142.0, 46.0), (128.0, 35.0), (121.0, 30.0),
            (108.0, 21.0), (100.0, 8.0), (94.0, 17.0), (80.0, 9.0),
            (72.0, 21.0), (57.0, 25.0), (44.0, 13.0), (34.0, 28.0),
            (36.0, 36.0), (40.0, 47.0),
        ],
        // Australia
        &[
            (114.0, -22.0), (130.0, -12.0), (142.0, -11.0), (153.0, -26.0),
            (150.0, -37.0), (140.0, -38.0), (131.0, -31.0), (115.0, -34.0),
            (114.0, -22.0),
        ],
        // Greenland
        &[
            (-55.0, 60.0), (-43.0, 60.0), (-20.0, 70.0), (-18.0, 80.0),
            (-60.0, 82.0), (-72.0, 77.0), (-55.0, 60.0),
        ],
    ];

    for outline in continents {
        renderer.add_coastline(outline.to_vec(), Lod::Low);
    }
}
