//! Axis-aligned bounding boxes

use geo::{BoundingRect, Coord, LineString, Polygon, Rect};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x: min_x.min(max_x),
            min_y: min_y.min(max_y),
            max_x: min_x.max(max_x),
            max_y: min_y.max(max_y),
        }
    }

    /// Degenerate box around a single coordinate
    pub fn from_coord(c: Coord<f64>) -> Self {
        Self::new(c.x, c.y, c.x, c.y)
    }

    pub fn of_line(line: &LineString<f64>) -> Option<Self> {
        line.bounding_rect().map(Self::from)
    }

    pub fn of_polygon(polygon: &Polygon<f64>) -> Option<Self> {
        polygon.bounding_rect().map(Self::from)
    }

    /// All four bounds are finite numbers
    pub fn is_finite(&self) -> bool {
        self.min_x.is_finite()
            && self.min_y.is_finite()
            && self.max_x.is_finite()
            && self.max_y.is_finite()
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Number of distinct corners of the envelope.
    ///
    /// 4 for a box with area, 2 when it collapses to a segment in one axis,
    /// 1 when it collapses to a point.
    pub fn corner_count(&self) -> usize {
        match (self.width() > 0.0, self.height() > 0.0) {
            (true, true) => 4,
            (false, false) => 1,
            _ => 2,
        }
    }

    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }

    pub fn contains(&self, other: &BoundingBox) -> bool {
        self.min_x <= other.min_x
            && self.min_y <= other.min_y
            && self.max_x >= other.max_x
            && self.max_y >= other.max_y
    }

    /// Euclidean gap between two boxes; 0 when they touch or overlap.
    pub fn distance(&self, other: &BoundingBox) -> f64 {
        let dx = (other.min_x - self.max_x).max(self.min_x - other.max_x).max(0.0);
        let dy = (other.min_y - self.max_y).max(self.min_y - other.max_y).max(0.0);
        dx.hypot(dy)
    }

    /// Grow the box by `margin` on every side.
    pub fn expand(&self, margin: f64) -> Self {
        Self {
            min_x: self.min_x - margin,
            min_y: self.min_y - margin,
            max_x: self.max_x + margin,
            max_y: self.max_y + margin,
        }
    }

    /// Smallest box covering both
    pub fn union(&self, other: &BoundingBox) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

impl From<Rect<f64>> for BoundingBox {
    fn from(rect: Rect<f64>) -> Self {
        Self {
            min_x: rect.min().x,
            min_y: rect.min().y,
            max_x: rect.max().x,
            max_y: rect.max().y,
        }
    }
}
