//! Vector data structures
//!
//! - `Block`, `Building`, `Street`: pre-parsed inputs
//! - `BlockFace`, `FrontageStride`, `StreetSegment`: derived outputs
//! - `BoundingBox`: axis-aligned envelope shared by the index and matchers

mod envelope;
mod features;

pub use envelope::BoundingBox;
pub use features::{
    Block, BlockFace, Building, FrontageRef, FrontageStride, Street, StreetSegment,
};

use serde::{Deserialize, Serialize};

/// Attribute value types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::String(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::String(s)
    }
}

impl From<i64> for AttributeValue {
    fn from(v: i64) -> Self {
        AttributeValue::Int(v)
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        AttributeValue::Float(v)
    }
}

impl From<bool> for AttributeValue {
    fn from(v: bool) -> Self {
        AttributeValue::Bool(v)
    }
}
