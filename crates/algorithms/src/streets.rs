//! Street matching
//!
//! Finds the street segment(s) fronting a blockface:
//! 1. Query the street index for the nearest candidates to the blockface
//!    envelope, oversampled relative to the envelope's corner count.
//! 2. The first candidate (nearest first) that contains the blockface within
//!    `epsilon` wins outright.
//! 3. Otherwise every candidate contained by the blockface within `epsilon`
//!    is a partial match (a shorter segment fronting part of the face).
//!
//! The candidate count is a heuristic, not a bound: a street network cut
//! into many more pieces than the block has sides can still lose fronting
//! segments past the k-th candidate. Raise `oversampling` for such data.

use curbside_core::{Algorithm, BlockFace, BoundingBox, Error, Result, SpatialIndex, Street};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::linear::within_distance;

/// Parameters for street matching
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreetMatchParams {
    /// Containment tolerance in coordinate units (default ~5 m in degrees)
    pub epsilon: f64,
    /// Candidates requested per envelope corner
    pub oversampling: usize,
}

impl Default for StreetMatchParams {
    fn default() -> Self {
        Self {
            epsilon: 0.00005,
            oversampling: 2,
        }
    }
}

impl StreetMatchParams {
    pub fn validate(&self) -> Result<()> {
        if !(self.epsilon >= 0.0 && self.epsilon.is_finite()) {
            return Err(Error::invalid_parameter(
                "epsilon",
                self.epsilon,
                "must be finite and non-negative",
            ));
        }
        if self.oversampling == 0 {
            return Err(Error::invalid_parameter("oversampling", 0, "must be at least 1"));
        }
        Ok(())
    }
}

/// Outcome of matching one blockface. Indices point into the street slice
/// the match was computed against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreetMatch {
    /// A single street covers the whole blockface
    Full(usize),
    /// Streets that each cover part of the blockface, nearest first
    Partial(Vec<usize>),
    /// No candidate passed either containment test
    Unmatched,
}

impl StreetMatch {
    pub fn indices(&self) -> Vec<usize> {
        match self {
            StreetMatch::Full(i) => vec![*i],
            StreetMatch::Partial(v) => v.clone(),
            StreetMatch::Unmatched => Vec::new(),
        }
    }

    pub fn is_match(&self) -> bool {
        !matches!(self, StreetMatch::Unmatched)
    }

    /// Matched streets, borrowed from `streets`
    pub fn streets<'a>(&self, streets: &'a [Street]) -> Vec<&'a Street> {
        self.indices()
            .into_iter()
            .filter_map(|i| streets.get(i))
            .collect()
    }
}

/// Index every street envelope under its position in `streets`.
pub fn build_street_index(streets: &[Street]) -> SpatialIndex {
    SpatialIndex::from_boxes(
        streets
            .iter()
            .enumerate()
            .filter_map(|(i, street)| BoundingBox::of_line(&street.geometry).map(|bbox| (i, bbox))),
    )
}

/// Number of nearest candidates to request for an envelope
pub fn candidate_count(envelope: &BoundingBox, oversampling: usize) -> usize {
    oversampling * envelope.corner_count()
}

/// Match one blockface against the indexed streets.
pub fn find_matching_streets(
    blockface: &BlockFace,
    streets: &[Street],
    index: &SpatialIndex,
    params: &StreetMatchParams,
) -> StreetMatch {
    let envelope = match blockface.envelope() {
        Some(e) => e,
        None => return StreetMatch::Unmatched,
    };

    let k = candidate_count(&envelope, params.oversampling);
    let candidates = index.nearest(&envelope, k);

    let mut partial = Vec::new();
    for &i in &candidates {
        let Some(street) = streets.get(i) else {
            continue;
        };
        if within_distance(&blockface.geometry, &street.geometry, params.epsilon) {
            debug!(blockface = %blockface.id, street = %street.id, candidates = candidates.len(), "full street match");
            return StreetMatch::Full(i);
        }
        if within_distance(&street.geometry, &blockface.geometry, params.epsilon) {
            partial.push(i);
        }
    }

    debug!(
        blockface = %blockface.id,
        candidates = candidates.len(),
        partial = partial.len(),
        "street match"
    );

    if partial.is_empty() {
        StreetMatch::Unmatched
    } else {
        StreetMatch::Partial(partial)
    }
}

/// Street matching algorithm
#[derive(Debug, Clone, Default)]
pub struct StreetMatcher;

impl Algorithm for StreetMatcher {
    type Input = (BlockFace, Vec<Street>);
    type Output = StreetMatch;
    type Params = StreetMatchParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "StreetMatcher"
    }

    fn description(&self) -> &'static str {
        "Find the street segment(s) fronting a blockface by nearest search and buffered containment"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        params.validate()?;
        let (blockface, streets) = input;
        let index = build_street_index(&streets);
        Ok(find_matching_streets(&blockface, &streets, &index, &params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Coord, LineString};

    fn face(coords: Vec<(f64, f64)>) -> BlockFace {
        let first = coords[0];
        let last = coords[coords.len() - 1];
        BlockFace::new(
            "B1",
            1,
            (
                Coord { x: first.0, y: first.1 },
                Coord { x: last.0, y: last.1 },
            ),
            LineString::from(coords),
        )
    }

    fn street(id: &str, coords: Vec<(f64, f64)>) -> Street {
        Street::new(id, LineString::from(coords))
    }

    fn params() -> StreetMatchParams {
        StreetMatchParams {
            epsilon: 1.0,
            oversampling: 2,
        }
    }

    #[test]
    fn test_candidate_count() {
        assert_eq!(candidate_count(&BoundingBox::new(0.0, 0.0, 1.0, 1.0), 2), 8);
        assert_eq!(candidate_count(&BoundingBox::new(0.0, 0.0, 1.0, 0.0), 2), 4);
        assert_eq!(candidate_count(&BoundingBox::new(0.0, 0.0, 1.0, 1.0), 3), 12);
    }

    #[test]
    fn test_full_match_short_circuits() {
        let bf = face(vec![(10.0, 0.5), (50.0, 0.5), (90.0, 0.6)]);
        let streets = vec![
            street("far", vec![(0.0, 40.0), (100.0, 40.0)]),
            street("main", vec![(0.0, 0.0), (100.0, 0.0)]),
            street("main-dup", vec![(0.0, 0.2), (100.0, 0.2)]),
        ];
        let index = build_street_index(&streets);

        let m = find_matching_streets(&bf, &streets, &index, &params());
        // Both "main" and "main-dup" contain the face; the nearer one wins.
        assert_eq!(m, StreetMatch::Full(2));
        assert_eq!(m.streets(&streets)[0].id, "main-dup");
    }

    #[test]
    fn test_partial_matches_collected() {
        let bf = face(vec![(0.0, 0.0), (100.0, 0.0)]);
        let streets = vec![
            street("west", vec![(0.0, 0.3), (40.0, 0.3)]),
            street("cross", vec![(50.0, -30.0), (50.0, 30.0)]),
            street("east", vec![(40.0, 0.3), (100.0, 0.3)]),
        ];
        let index = build_street_index(&streets);

        let m = find_matching_streets(&bf, &streets, &index, &params());
        match &m {
            StreetMatch::Partial(idx) => {
                let mut sorted = idx.clone();
                sorted.sort_unstable();
                assert_eq!(sorted, vec![0, 2]);
            }
            other => panic!("expected partial match, got {:?}", other),
        }
        assert!(m.is_match());
    }

    #[test]
    fn test_unmatched() {
        let bf = face(vec![(0.0, 0.0), (100.0, 0.0)]);
        let streets = vec![
            street("cross", vec![(50.0, -30.0), (50.0, 30.0)]),
            street("far", vec![(0.0, 40.0), (100.0, 40.0)]),
        ];
        let index = build_street_index(&streets);

        let m = find_matching_streets(&bf, &streets, &index, &params());
        assert_eq!(m, StreetMatch::Unmatched);
        assert!(m.indices().is_empty());
        assert!(!m.is_match());
    }

    #[test]
    fn test_empty_street_set() {
        let bf = face(vec![(0.0, 0.0), (1.0, 0.0)]);
        let m = find_matching_streets(&bf, &[], &SpatialIndex::new(), &params());
        assert_eq!(m, StreetMatch::Unmatched);
    }

    #[test]
    fn test_params_validation() {
        assert!(StreetMatchParams::default().validate().is_ok());
        let bad = StreetMatchParams {
            oversampling: 0,
            ..StreetMatchParams::default()
        };
        assert!(bad.validate().is_err());
        let bad = StreetMatchParams {
            epsilon: f64::NAN,
            ..StreetMatchParams::default()
        };
        assert!(StreetMatcher.execute((face(vec![(0.0, 0.0), (1.0, 0.0)]), vec![]), bad).is_err());
    }
}
