//! # Curbside Algorithms
//!
//! Blockface decomposition of city blocks, street matching and building
//! frontage assignment.
//!
//! ## Modules
//!
//! - **linear**: Arc-length cutting, slicing and point-to-line proximity
//! - **join**: Building to block spatial join
//! - **blockface**: Contiguity filter, adaptive simplification, blockface generation
//! - **streets**: Street index and blockface to street matching
//! - **frontage**: Nearest-building sampling and stride assignment
//! - **pipeline**: Batch drivers and per-block selection

pub mod blockface;
pub mod frontage;
pub mod join;
pub mod linear;
pub mod pipeline;
pub mod streets;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::blockface::{
        blockfaces_for_block, drop_noncontiguous_blocks, generate_blockfaces, simplify_ring,
        BlockfaceGenerator, ContiguousBlock, SimplifyParams,
    };
    pub use crate::frontage::{frontages_for_blockface, FrontageAssigner, FrontageParams};
    pub use crate::join::{join_buildings_blocks, BuildingBlockJoiner, JoinClassification, MultiMatch};
    pub use crate::linear::{cut, interpolate, reverse, slice_range};
    pub use crate::pipeline::{
        blockfaces_for_blocks, frontages_for_blockfaces, merge_street_segments, run_pipeline,
        BlockData, BlockFailure, BlockfaceBatch, FrontageBatch, PipelineOutput, PipelineParams,
    };
    pub use crate::streets::{
        build_street_index, find_matching_streets, StreetMatch, StreetMatchParams, StreetMatcher,
    };
    pub use curbside_core::prelude::*;
}
