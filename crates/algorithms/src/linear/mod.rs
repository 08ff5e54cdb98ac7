//! Linear referencing on polylines
//!
//! Positions along a line are normalized arc-length in `[0, 1]`:
//! - Cut: split a line in two at a position
//! - Slice: extract the sub-line between two positions
//! - Interpolate: the point at a position
//! - Proximity: point/line distances and epsilon containment

mod cut;
mod proximity;

pub use cut::{cut, interpolate, reverse, slice_range, vertex_positions};
pub use proximity::{point_line_distance, point_segment_distance, within_distance};
