//! Blocks, streets, buildings and the records derived from them

use std::collections::HashMap;

use geo::{Coord, Line, LineString, MultiPolygon, Polygon};
use serde::{Deserialize, Serialize};

use super::{AttributeValue, BoundingBox};

/// A census block: identifier plus boundary.
///
/// The boundary is kept as a `MultiPolygon` so island blocks survive loading;
/// only blocks that reduce to one polygon get blockfaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub geoid: String,
    pub geometry: MultiPolygon<f64>,
}

impl Block {
    pub fn new(geoid: impl Into<String>, geometry: impl Into<MultiPolygon<f64>>) -> Self {
        Self {
            geoid: geoid.into(),
            geometry: geometry.into(),
        }
    }
}

/// One side of a block boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockFace {
    /// `{block_id}_{sequence}`
    pub id: String,
    pub block_id: String,
    /// 1-based position around the ring
    pub sequence: usize,
    /// Endpoints of the simplified edge this face was reconciled against
    pub simplified: Line<f64>,
    /// Full-resolution run of the original ring
    pub geometry: LineString<f64>,
}

impl BlockFace {
    pub fn new(
        block_id: impl Into<String>,
        sequence: usize,
        simplified: (Coord<f64>, Coord<f64>),
        geometry: LineString<f64>,
    ) -> Self {
        let block_id = block_id.into();
        Self {
            id: Self::compose_id(&block_id, sequence),
            block_id,
            sequence,
            simplified: Line::new(simplified.0, simplified.1),
            geometry,
        }
    }

    pub fn compose_id(block_id: &str, sequence: usize) -> String {
        format!("{block_id}_{sequence}")
    }

    pub fn envelope(&self) -> Option<BoundingBox> {
        BoundingBox::of_line(&self.geometry)
    }
}

/// A street centerline with arbitrary attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Street {
    pub id: String,
    pub geometry: LineString<f64>,
    pub properties: HashMap<String, AttributeValue>,
}

impl Street {
    pub fn new(id: impl Into<String>, geometry: LineString<f64>) -> Self {
        Self {
            id: id.into(),
            geometry,
            properties: HashMap::new(),
        }
    }

    /// Set an attribute
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<AttributeValue>) {
        self.properties.insert(key.into(), value.into());
    }

    /// Get an attribute
    pub fn get_property(&self, key: &str) -> Option<&AttributeValue> {
        self.properties.get(key)
    }
}

/// A building footprint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub id: String,
    pub footprint: Polygon<f64>,
    /// Parent block, set once the building is uniquely joined to one
    pub block_id: Option<String>,
}

impl Building {
    pub fn new(id: impl Into<String>, footprint: Polygon<f64>) -> Self {
        Self {
            id: id.into(),
            footprint,
            block_id: None,
        }
    }

    pub fn with_block(mut self, block_id: impl Into<String>) -> Self {
        self.block_id = Some(block_id.into());
        self
    }
}

/// Contiguous run of a blockface assigned to a single building.
///
/// Offsets are normalized arc-length; `start < end` and the strides of one
/// blockface tile `[0, 1)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrontageStride {
    pub blockface_id: String,
    pub block_id: String,
    pub building_id: String,
    pub start: f64,
    pub end: f64,
    pub geometry: LineString<f64>,
}

impl FrontageStride {
    pub fn span(&self) -> f64 {
        self.end - self.start
    }
}

/// Which blockface a street segment fronts
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrontageRef {
    pub block_id: String,
    pub blockface_id: String,
}

/// A street, augmented with the blockface it fronts when one was found
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreetSegment {
    pub street: Street,
    pub frontage: Option<FrontageRef>,
}

impl StreetSegment {
    pub fn block_id(&self) -> Option<&str> {
        self.frontage.as_ref().map(|f| f.block_id.as_str())
    }

    pub fn blockface_id(&self) -> Option<&str> {
        self.frontage.as_ref().map(|f| f.blockface_id.as_str())
    }
}
