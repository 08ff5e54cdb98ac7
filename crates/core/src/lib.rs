//! # Curbside Core
//!
//! Core types, traits and indexing for the Curbside blockface engine.
//!
//! This crate provides:
//! - `Block`, `Building`, `Street`: pre-parsed input features
//! - `BlockFace`, `FrontageStride`, `StreetSegment`: derived records
//! - `SpatialIndex`: R-tree over bounding boxes with k-nearest queries
//! - Algorithm trait for consistent API

pub mod error;
pub mod index;
pub mod vector;

pub use error::{Error, Result};
pub use index::SpatialIndex;
pub use vector::{
    AttributeValue, Block, BlockFace, BoundingBox, Building, FrontageRef, FrontageStride, Street,
    StreetSegment,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::index::SpatialIndex;
    pub use crate::vector::{
        AttributeValue, Block, BlockFace, BoundingBox, Building, FrontageRef, FrontageStride,
        Street, StreetSegment,
    };
    pub use crate::Algorithm;
}

/// Core trait for all algorithms in Curbside.
///
/// Algorithms are pure functions that transform input data according to parameters.
pub trait Algorithm {
    /// Input type for the algorithm
    type Input;
    /// Output type for the algorithm
    type Output;
    /// Parameters controlling algorithm behavior
    type Params: Default;
    /// Error type for algorithm execution
    type Error: std::error::Error;

    /// Returns the algorithm name
    fn name(&self) -> &'static str;

    /// Returns a description of what the algorithm does
    fn description(&self) -> &'static str;

    /// Execute the algorithm
    fn execute(&self, input: Self::Input, params: Self::Params) -> std::result::Result<Self::Output, Self::Error>;

    /// Execute with default parameters
    fn execute_default(&self, input: Self::Input) -> std::result::Result<Self::Output, Self::Error> {
        self.execute(input, Self::Params::default())
    }
}
