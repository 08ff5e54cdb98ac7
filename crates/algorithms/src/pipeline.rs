//! Batch drivers
//!
//! Run the per-item algorithms over whole collections. A block that fails
//! (for example on coordinate reconciliation) is recorded as a
//! [`BlockFailure`] and the batch carries on with the remaining blocks.
//! Invalid parameters still abort the whole batch.

use std::collections::HashMap;

use curbside_core::{
    Block, BlockFace, Building, Error, FrontageRef, FrontageStride, Result, SpatialIndex, Street,
    StreetSegment,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::blockface::{drop_noncontiguous_blocks, generate_blockfaces, SimplifyParams};
use crate::frontage::{frontages_for_blockface, FrontageParams};
use crate::join::{join_buildings_blocks, JoinClassification};
use crate::streets::{build_street_index, find_matching_streets, StreetMatchParams};

/// Parameters for a full pipeline run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineParams {
    #[serde(default)]
    pub simplify: SimplifyParams,
    #[serde(default)]
    pub street_match: StreetMatchParams,
    #[serde(default)]
    pub frontage: FrontageParams,
}

impl PipelineParams {
    pub fn validate(&self) -> Result<()> {
        self.simplify.validate()?;
        self.street_match.validate()?;
        self.frontage.validate()
    }
}

/// A block that could not be processed, and why
#[derive(Debug, Clone, PartialEq)]
pub struct BlockFailure {
    pub block_id: String,
    pub error: Error,
}

/// Output of [`blockfaces_for_blocks`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockfaceBatch {
    /// Blockfaces of every successful block, in block input order
    pub blockfaces: Vec<BlockFace>,
    /// Ids of blocks excluded as non-contiguous
    pub dropped: Vec<String>,
    pub failures: Vec<BlockFailure>,
}

/// Output of [`frontages_for_blockfaces`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontageBatch {
    pub strides: Vec<FrontageStride>,
    pub failures: Vec<BlockFailure>,
}

/// Everything a pipeline run produces
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineOutput {
    pub join: JoinClassification,
    pub blockfaces: BlockfaceBatch,
    pub street_segments: Vec<StreetSegment>,
    pub frontages: FrontageBatch,
}

/// Generate blockfaces for every contiguous block.
pub fn blockfaces_for_blocks(blocks: &[Block], params: &SimplifyParams) -> Result<BlockfaceBatch> {
    params.validate()?;
    info!(blocks = blocks.len(), "generating blockfaces");

    let (contiguous, dropped) = drop_noncontiguous_blocks(blocks);
    for block_id in &dropped {
        warn!(block = %block_id, "dropping non-contiguous block");
    }

    let mut batch = BlockfaceBatch {
        dropped,
        ..BlockfaceBatch::default()
    };
    for block in &contiguous {
        match generate_blockfaces(block, params) {
            Ok(faces) => batch.blockfaces.extend(faces),
            Err(error) => {
                warn!(block = %block.geoid, %error, "blockface generation failed");
                batch.failures.push(BlockFailure {
                    block_id: block.geoid.clone(),
                    error,
                });
            }
        }
    }

    info!(
        blockfaces = batch.blockfaces.len(),
        dropped = batch.dropped.len(),
        failures = batch.failures.len(),
        "generated blockfaces"
    );
    Ok(batch)
}

/// Match every blockface to its street segments.
///
/// Each match yields a copy of the street tagged with the block and blockface
/// it fronts; a street fronting several blockfaces appears once per
/// blockface. Streets that front nothing are appended once, untagged, in
/// street input order.
pub fn merge_street_segments(
    blockfaces: &[BlockFace],
    streets: &[Street],
    index: &SpatialIndex,
    params: &StreetMatchParams,
) -> Result<Vec<StreetSegment>> {
    params.validate()?;

    let mut segments = Vec::new();
    let mut fronting = vec![false; streets.len()];
    let mut unmatched_faces = 0usize;

    for blockface in blockfaces {
        let matched = find_matching_streets(blockface, streets, index, params).indices();
        if matched.is_empty() {
            unmatched_faces += 1;
        }
        for i in matched {
            let Some(street) = streets.get(i) else {
                continue;
            };
            fronting[i] = true;
            segments.push(StreetSegment {
                street: street.clone(),
                frontage: Some(FrontageRef {
                    block_id: blockface.block_id.clone(),
                    blockface_id: blockface.id.clone(),
                }),
            });
        }
    }

    let matched_rows = segments.len();
    segments.extend(
        streets
            .iter()
            .zip(&fronting)
            .filter(|(_, &hit)| !hit)
            .map(|(street, _)| StreetSegment {
                street: street.clone(),
                frontage: None,
            }),
    );

    info!(
        blockfaces = blockfaces.len(),
        streets = streets.len(),
        matched_rows,
        unmatched_blockfaces = unmatched_faces,
        unmatched_streets = segments.len() - matched_rows,
        "merged street segments"
    );
    Ok(segments)
}

/// Assign frontage along every blockface.
///
/// Buildings are grouped by their `block_id`; each blockface only considers
/// the buildings of its own block. Buildings without a block are ignored.
pub fn frontages_for_blockfaces(
    blockfaces: &[BlockFace],
    buildings: &[Building],
    params: &FrontageParams,
) -> Result<FrontageBatch> {
    params.validate()?;

    let mut by_block: HashMap<&str, Vec<Building>> = HashMap::new();
    for building in buildings {
        if let Some(block_id) = building.block_id.as_deref() {
            by_block.entry(block_id).or_default().push(building.clone());
        }
    }

    let mut batch = FrontageBatch::default();
    for blockface in blockfaces {
        let Some(candidates) = by_block.get(blockface.block_id.as_str()) else {
            continue;
        };
        match frontages_for_blockface(candidates, blockface, params) {
            Ok(strides) => batch.strides.extend(strides),
            Err(error) => {
                warn!(blockface = %blockface.id, %error, "frontage assignment failed");
                batch.failures.push(BlockFailure {
                    block_id: blockface.block_id.clone(),
                    error,
                });
            }
        }
    }

    info!(
        blockfaces = blockfaces.len(),
        blocks_with_buildings = by_block.len(),
        strides = batch.strides.len(),
        failures = batch.failures.len(),
        "assigned frontages"
    );
    Ok(batch)
}

/// Run the whole chain: join, blockfaces, street merge, frontage.
///
/// Frontage is assigned using the uniquely matched buildings only.
pub fn run_pipeline(
    blocks: &[Block],
    buildings: &[Building],
    streets: &[Street],
    params: &PipelineParams,
) -> Result<PipelineOutput> {
    params.validate()?;

    let join = join_buildings_blocks(buildings, blocks);
    let blockfaces = blockfaces_for_blocks(blocks, &params.simplify)?;

    let street_index = build_street_index(streets);
    let street_segments = merge_street_segments(
        &blockfaces.blockfaces,
        streets,
        &street_index,
        &params.street_match,
    )?;

    let frontages = frontages_for_blockfaces(
        &blockfaces.blockfaces,
        join.matched_buildings(),
        &params.frontage,
    )?;

    Ok(PipelineOutput {
        join,
        blockfaces,
        street_segments,
        frontages,
    })
}

/// The records belonging to one block
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockData {
    pub street_segments: Vec<StreetSegment>,
    pub blockfaces: Vec<BlockFace>,
    pub buildings: Vec<Building>,
}

impl BlockData {
    /// Pick out the street segments, blockfaces and buildings tagged with
    /// `block_id`. Ids are compared exactly.
    pub fn select(
        block_id: &str,
        street_segments: &[StreetSegment],
        blockfaces: &[BlockFace],
        buildings: &[Building],
    ) -> Self {
        Self {
            street_segments: street_segments
                .iter()
                .filter(|s| s.block_id() == Some(block_id))
                .cloned()
                .collect(),
            blockfaces: blockfaces
                .iter()
                .filter(|f| f.block_id == block_id)
                .cloned()
                .collect(),
            buildings: buildings
                .iter()
                .filter(|b| b.block_id.as_deref() == Some(block_id))
                .cloned()
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.street_segments.is_empty() && self.blockfaces.is_empty() && self.buildings.is_empty()
    }
}
