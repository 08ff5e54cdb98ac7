//! Frontage assignment for a single blockface

use curbside_core::{
    Algorithm, BlockFace, BoundingBox, Building, Error, FrontageStride, Result, SpatialIndex,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::strides::{collect_strides, sample_offsets, Sample};
use crate::linear::{interpolate, slice_range};

/// Parameters for frontage assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontageParams {
    /// Distance between samples as a fraction of the blockface length.
    /// One nearest-building query is issued per sample.
    pub step_size: f64,
    /// Offsets are snapped to multiples of this value
    pub offset_tolerance: f64,
}

impl Default for FrontageParams {
    fn default() -> Self {
        Self {
            step_size: 0.01,
            offset_tolerance: 1e-9,
        }
    }
}

impl FrontageParams {
    pub fn validate(&self) -> Result<()> {
        if !(self.step_size > 0.0 && self.step_size < 1.0) {
            return Err(Error::invalid_parameter(
                "step_size",
                self.step_size,
                "must be in (0, 1)",
            ));
        }
        if !(self.offset_tolerance >= 0.0 && self.offset_tolerance < self.step_size / 2.0) {
            return Err(Error::invalid_parameter(
                "offset_tolerance",
                self.offset_tolerance,
                "must be non-negative and below half the step size",
            ));
        }
        Ok(())
    }
}

/// Frontage assignment algorithm
#[derive(Debug, Clone, Default)]
pub struct FrontageAssigner;

impl Algorithm for FrontageAssigner {
    type Input = (Vec<Building>, BlockFace);
    type Output = Vec<FrontageStride>;
    type Params = FrontageParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "FrontageAssigner"
    }

    fn description(&self) -> &'static str {
        "Split a blockface into contiguous strides, each fronted by its nearest building"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        let (buildings, blockface) = input;
        frontages_for_blockface(&buildings, &blockface, &params)
    }
}

/// Index building footprint envelopes under their position in `buildings`.
pub fn build_building_index(buildings: &[Building]) -> SpatialIndex {
    SpatialIndex::from_boxes(buildings.iter().enumerate().filter_map(|(i, building)| {
        BoundingBox::of_polygon(&building.footprint).map(|bbox| (i, bbox))
    }))
}

/// Assign the length of `blockface` to the buildings nearest to it.
///
/// Returns strides ordered by start offset that tile `[0, 1)` without gaps
/// or overlap. An empty building set yields no strides.
pub fn frontages_for_blockface(
    buildings: &[Building],
    blockface: &BlockFace,
    params: &FrontageParams,
) -> Result<Vec<FrontageStride>> {
    params.validate()?;
    if buildings.is_empty() {
        return Ok(Vec::new());
    }
    if blockface.geometry.0.is_empty() {
        return Err(Error::EmptyGeometry {
            what: "blockface",
            id: blockface.id.clone(),
        });
    }

    let index = build_building_index(buildings);
    if index.is_empty() {
        return Ok(Vec::new());
    }

    let samples: Vec<Sample> = sample_offsets(params.step_size, params.offset_tolerance)
        .into_iter()
        .filter_map(|offset| {
            let point = interpolate(&blockface.geometry, offset)?;
            let nearest = *index.nearest(&BoundingBox::from_coord(point), 1).first()?;
            Some(Sample {
                offset,
                building: nearest,
            })
        })
        .collect();

    let strides: Vec<FrontageStride> = collect_strides(&samples)
        .into_iter()
        .map(|span| FrontageStride {
            blockface_id: blockface.id.clone(),
            block_id: blockface.block_id.clone(),
            building_id: buildings[span.building].id.clone(),
            start: span.start,
            end: span.end,
            geometry: slice_range(&blockface.geometry, span.start, span.end),
        })
        .collect();

    debug!(
        blockface = %blockface.id,
        samples = samples.len(),
        strides = strides.len(),
        "assigned frontage"
    );
    Ok(strides)
}
