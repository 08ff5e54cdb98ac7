//! Blockface generation
//!
//! Decomposes a block boundary into ordered blockfaces, one per side:
//! - Contiguity: blocks must reduce to a single polygon (islands are dropped)
//! - Simplify: adaptive Douglas-Peucker picks the coarsest acceptable ring
//! - Generate: reconcile simplified vertices against the original ring and
//!   emit the full-resolution run between each consecutive pair

mod contiguity;
mod generate;
mod simplify;

pub use contiguity::{contiguous_polygon, drop_noncontiguous_blocks, is_simple_ring, ContiguousBlock};
pub use generate::{blockfaces_for_block, generate_blockfaces, reconcile_runs, BlockfaceGenerator};
pub use simplify::{area_difference_ratio, simplify_ring, SimplifiedRing, SimplifyParams};
