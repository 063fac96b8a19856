//! Derives per-storm path geometry from the ordered track coordinates.

use crate::models::{Coord, PathGeometry};

pub struct PathBuilder;

impl PathBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build geometry from coordinates in observation order. Empty input
    /// yields `None`; a single coordinate yields a point rather than a
    /// degenerate one-vertex line.
    pub fn build(&self, coords: &[Coord]) -> Option<PathGeometry> {
        match coords {
            [] => None,
            [only] => Some(PathGeometry::Point(*only)),
            many => Some(PathGeometry::LineString(many.to_vec())),
        }
    }
}

impl Default for PathBuilder {
    fn default() -> Self {
        Self::new()
    }
}
