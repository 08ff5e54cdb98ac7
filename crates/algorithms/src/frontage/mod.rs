//! Building frontage assignment
//!
//! Walks a blockface at a fixed step, asks the building index which
//! footprint is nearest at each sample, and merges runs of samples with the
//! same nearest building into frontage strides:
//! - Strides: sampling offsets and the run-length reduction
//! - Assign: per-blockface driver that materializes stride geometry

mod assign;
mod strides;

pub use assign::{build_building_index, frontages_for_blockface, FrontageAssigner, FrontageParams};
pub use strides::{collect_strides, quantize, sample_offsets, Sample, StrideSpan};
