//! Contiguity filter for block geometries
//!
//! A block has a well-defined boundary sequence only when its parts fuse into
//! exactly one polygon with a simple exterior ring. Island blocks (disjoint
//! parts) and self-intersecting rings (which split apart when cleaned) are
//! excluded.

use curbside_core::Block;
use geo::{BooleanOps, Intersects, Line, LineString, MultiPolygon, Polygon};

/// A block whose boundary is a single polygon
#[derive(Debug, Clone, PartialEq)]
pub struct ContiguousBlock {
    pub geoid: String,
    pub polygon: Polygon<f64>,
}

impl ContiguousBlock {
    /// The closed exterior ring the blockfaces are cut from
    pub fn ring(&self) -> &LineString<f64> {
        self.polygon.exterior()
    }
}

/// The single polygon a block geometry reduces to, if any.
///
/// A one-part geometry is returned as-is so its ring keeps the source vertex
/// order. Multi-part geometries are fused with a boolean union; only a union
/// that yields exactly one polygon counts as contiguous. Either way the
/// exterior ring must not cross or touch itself.
pub fn contiguous_polygon(geometry: &MultiPolygon<f64>) -> Option<Polygon<f64>> {
    let polygon = match geometry.0.as_slice() {
        [] => return None,
        [single] => single.clone(),
        parts => {
            let mut fused = parts.iter().fold(MultiPolygon::new(vec![]), |acc, part| {
                acc.union(&MultiPolygon::new(vec![part.clone()]))
            });
            if fused.0.len() != 1 {
                return None;
            }
            fused.0.remove(0)
        }
    };

    // A valid closed ring needs at least 3 distinct vertices plus closure
    if polygon.exterior().0.len() < 4 || !is_simple_ring(polygon.exterior()) {
        return None;
    }
    Some(polygon)
}

/// Whether no two non-adjacent edges of a closed ring meet.
///
/// Zero-length edges are skipped. The first and last edges share the closing
/// vertex and count as adjacent.
pub fn is_simple_ring(ring: &LineString<f64>) -> bool {
    let edges: Vec<Line<f64>> = ring.lines().filter(|l| l.start != l.end).collect();
    let n = edges.len();
    for i in 0..n {
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            if edges[i].intersects(&edges[j]) {
                return false;
            }
        }
    }
    true
}

/// Split blocks into contiguous ones and the ids of those dropped.
pub fn drop_noncontiguous_blocks(blocks: &[Block]) -> (Vec<ContiguousBlock>, Vec<String>) {
    let mut kept = Vec::with_capacity(blocks.len());
    let mut dropped = Vec::new();

    for block in blocks {
        match contiguous_polygon(&block.geometry) {
            Some(polygon) => kept.push(ContiguousBlock {
                geoid: block.geoid.clone(),
                polygon,
            }),
            None => dropped.push(block.geoid.clone()),
        }
    }

    (kept, dropped)
}
