//! Adaptive ring simplification
//!
//! Tries Douglas-Peucker tolerances from coarsest to finest and keeps the
//! first ring whose area deviation from the original stays under a ratio.
//! Douglas-Peucker only drops vertices, so every retained vertex is a
//! bit-for-bit copy of an original one.

use curbside_core::{Error, Result};
use geo::{Area, BooleanOps, LineString, Polygon, Simplify};
use serde::{Deserialize, Serialize};

/// Parameters for adaptive simplification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimplifyParams {
    /// Douglas-Peucker tolerances, strictly descending (coarsest first).
    /// Defaults suit coordinates in degrees.
    pub tolerances: Vec<f64>,
    /// Largest accepted `area(original XOR simplified) / area(original)`
    pub max_area_ratio: f64,
}

impl Default for SimplifyParams {
    fn default() -> Self {
        Self {
            tolerances: vec![0.001, 0.0005, 0.0004, 0.0003, 0.0002, 0.0001],
            max_area_ratio: 0.05,
        }
    }
}

impl SimplifyParams {
    pub fn validate(&self) -> Result<()> {
        if self.tolerances.is_empty() {
            return Err(Error::invalid_parameter(
                "tolerances",
                "[]",
                "at least one tolerance is required",
            ));
        }
        if let Some(bad) = self.tolerances.iter().find(|t| !(t.is_finite() && **t > 0.0)) {
            return Err(Error::invalid_parameter(
                "tolerances",
                bad,
                "tolerances must be positive and finite",
            ));
        }
        if self.tolerances.windows(2).any(|w| w[1] >= w[0]) {
            return Err(Error::invalid_parameter(
                "tolerances",
                format!("{:?}", self.tolerances),
                "tolerances must be strictly descending",
            ));
        }
        if !(self.max_area_ratio > 0.0) {
            return Err(Error::invalid_parameter(
                "max_area_ratio",
                self.max_area_ratio,
                "must be positive",
            ));
        }
        Ok(())
    }
}

/// Result of adaptive simplification
#[derive(Debug, Clone, PartialEq)]
pub struct SimplifiedRing {
    /// Closed ring whose vertices are a subsequence of the original
    pub ring: LineString<f64>,
    /// Tolerance that produced `ring`; `None` when the original was kept
    pub tolerance: Option<f64>,
    /// Area deviation of `ring` from the original
    pub area_ratio: f64,
}

/// Symmetric-difference area of `candidate` against `original`, relative to
/// the original area.
pub fn area_difference_ratio(original: &Polygon<f64>, candidate: &Polygon<f64>) -> f64 {
    let area = original.unsigned_area();
    if area <= 0.0 {
        return 0.0;
    }
    original.xor(candidate).unsigned_area() / area
}

/// Simplify the exterior ring of `polygon`.
///
/// The first tolerance whose ratio falls under `max_area_ratio` wins. If none
/// does, the finest tolerance's ring is used. Candidates that collapse below
/// a valid ring never qualify; if every candidate collapses the original ring
/// is returned unchanged.
pub fn simplify_ring(polygon: &Polygon<f64>, params: &SimplifyParams) -> SimplifiedRing {
    let exterior = polygon.exterior();
    let original = Polygon::new(exterior.clone(), vec![]);
    let mut finest: Option<SimplifiedRing> = None;

    for &tolerance in &params.tolerances {
        let ring = exterior.simplify(&tolerance);
        if ring.0.len() < 4 {
            continue;
        }

        let area_ratio = area_difference_ratio(&original, &Polygon::new(ring.clone(), vec![]));
        let candidate = SimplifiedRing {
            ring,
            tolerance: Some(tolerance),
            area_ratio,
        };
        if area_ratio < params.max_area_ratio {
            return candidate;
        }
        finest = Some(candidate);
    }

    finest.unwrap_or_else(|| SimplifiedRing {
        ring: exterior.clone(),
        tolerance: None,
        area_ratio: 0.0,
    })
}
