//! Building to block spatial join
//!
//! Every building is tested for intersection against the blocks and
//! classified by how many it touches:
//! - exactly one: a unique match, the building inherits that block id
//! - more than one: a multi-match (footprint straddles a block boundary)
//! - none: a non-match (the ground under it is missing from the blocks)
//!
//! Finding no block is an expected outcome, not an error.

use std::collections::HashMap;

use curbside_core::{Algorithm, Block, BoundingBox, Building, Error, Result, SpatialIndex};
use geo::Intersects;
use tracing::{info, warn};

/// A building whose footprint touches several blocks
#[derive(Debug, Clone, PartialEq)]
pub struct MultiMatch {
    pub building: Building,
    /// Intersected blocks, in block input order
    pub block_ids: Vec<String>,
}

/// Result of [`join_buildings_blocks`]. The three buckets partition the
/// distinct building ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JoinClassification {
    /// Uniquely matched buildings, with `block_id` filled in
    pub matches: Vec<Building>,
    pub multimatches: Vec<MultiMatch>,
    pub nonmatches: Vec<Building>,
}

impl JoinClassification {
    pub fn len(&self) -> usize {
        self.matches.len() + self.multimatches.len() + self.nonmatches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Buildings that can take part in frontage assignment
    pub fn matched_buildings(&self) -> &[Building] {
        &self.matches
    }
}

/// Building/block join algorithm
#[derive(Debug, Clone, Default)]
pub struct BuildingBlockJoiner;

impl Algorithm for BuildingBlockJoiner {
    type Input = (Vec<Building>, Vec<Block>);
    type Output = JoinClassification;
    type Params = ();
    type Error = Error;

    fn name(&self) -> &'static str {
        "BuildingBlockJoiner"
    }

    fn description(&self) -> &'static str {
        "Classify buildings as matching one, several or no blocks by footprint intersection"
    }

    fn execute(&self, input: Self::Input, _params: Self::Params) -> Result<Self::Output> {
        let (buildings, blocks) = input;
        Ok(join_buildings_blocks(&buildings, &blocks))
    }
}

/// Join buildings to the blocks their footprints intersect.
///
/// Block envelopes are indexed first so only blocks whose envelope overlaps a
/// footprint's envelope get the exact intersection test. Results are grouped
/// by building id; a repeated id pools the blocks of all its records and
/// keeps the first record.
pub fn join_buildings_blocks(buildings: &[Building], blocks: &[Block]) -> JoinClassification {
    let index = SpatialIndex::from_boxes(blocks.iter().enumerate().filter_map(|(i, block)| {
        block
            .geometry
            .0
            .iter()
            .filter_map(BoundingBox::of_polygon)
            .reduce(|a, b| a.union(&b))
            .map(|bbox| (i, bbox))
    }));

    // Groups in first-seen order: (first record, intersected block positions)
    let mut order: Vec<(&Building, Vec<usize>)> = Vec::with_capacity(buildings.len());
    let mut by_id: HashMap<&str, usize> = HashMap::with_capacity(buildings.len());

    for building in buildings {
        let hits: Vec<usize> = match BoundingBox::of_polygon(&building.footprint) {
            Some(bbox) => index
                .intersecting(&bbox)
                .into_iter()
                .filter(|&i| blocks[i].geometry.intersects(&building.footprint))
                .collect(),
            None => Vec::new(),
        };

        match by_id.get(building.id.as_str()) {
            Some(&slot) => {
                warn!(building = %building.id, "duplicate building id; pooling block matches");
                let pooled = &mut order[slot].1;
                for hit in hits {
                    if !pooled.contains(&hit) {
                        pooled.push(hit);
                    }
                }
                pooled.sort_unstable();
            }
            None => {
                by_id.insert(building.id.as_str(), order.len());
                order.push((building, hits));
            }
        }
    }

    let mut out = JoinClassification::default();
    for (building, hits) in order {
        match hits.as_slice() {
            [] => out.nonmatches.push(building.clone()),
            [only] => out
                .matches
                .push(building.clone().with_block(blocks[*only].geoid.as_str())),
            _ => out.multimatches.push(MultiMatch {
                building: building.clone(),
                block_ids: hits.iter().map(|&i| blocks[i].geoid.clone()).collect(),
            }),
        }
    }

    info!(
        buildings = buildings.len(),
        blocks = blocks.len(),
        matches = out.matches.len(),
        multimatches = out.multimatches.len(),
        nonmatches = out.nonmatches.len(),
        "joined buildings to blocks"
    );
    out
}
