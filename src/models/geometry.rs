use serde::{Deserialize, Serialize};

/// A geographic coordinate in decimal degrees (EPSG:4326).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub latitude: f64,
    pub longitude: f64,
}

/// Path geometry of a storm: the ordered sequence of its observation
/// coordinates. Single-observation storms produce a degenerate point rather
/// than a one-vertex line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PathGeometry {
    Point(Coord),
    LineString(Vec<Coord>),
}

impl PathGeometry {
    pub fn num_points(&self) -> usize {
        match self {
            Self::Point(_) => 1,
            Self::LineString(coords) => coords.len(),
        }
    }

    /// Render as WKT, longitude first, suitable for loading into a spatial
    /// column (e.g. `STGeomFromText(..., 4326)`).
    pub fn to_wkt(&self) -> String {
        match self {
            Self::Point(c) => format!("POINT({} {})", c.longitude, c.latitude),
            Self::LineString(coords) => {
                let points: Vec<String> = coords
                    .iter()
                    .map(|c| format!("{} {}", c.longitude, c.latitude))
                    .collect();
                format!("LINESTRING({})", points.join(", "))
            }
        }
    }
}
