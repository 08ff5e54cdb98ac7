//! Blockface generation from a contiguous block
//!
//! Each consecutive pair of simplified vertices marks one side of the block.
//! The original ring is walked forward to find where each simplified vertex
//! sits, and the original vertices between two matches (inclusive) become
//! that side's full-resolution geometry.

use curbside_core::{Algorithm, Block, BlockFace, Error, Result};
use geo::{Coord, LineString};
use tracing::debug;

use super::contiguity::{contiguous_polygon, ContiguousBlock};
use super::simplify::{simplify_ring, SimplifyParams};

/// Blockface generation algorithm
#[derive(Debug, Clone, Default)]
pub struct BlockfaceGenerator;

impl Algorithm for BlockfaceGenerator {
    type Input = ContiguousBlock;
    type Output = Vec<BlockFace>;
    type Params = SimplifyParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "BlockfaceGenerator"
    }

    fn description(&self) -> &'static str {
        "Split a block boundary into ordered blockfaces aligned with its simplified sides"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        params.validate()?;
        generate_blockfaces(&input, &params)
    }
}

/// Locate each simplified vertex in the original ring.
///
/// Returns one inclusive `(start, end)` index run into `original` per
/// simplified edge. The scan only moves forward and never reads past the end
/// of `original`; a vertex that cannot be found fails with
/// [`Error::Reconciliation`].
///
/// Runs tile the ring: each run starts where the previous one ended, and the
/// last run is extended to the final vertex of `original`.
pub fn reconcile_runs(
    block_id: &str,
    original: &[Coord<f64>],
    simplified: &[Coord<f64>],
) -> Result<Vec<(usize, usize)>> {
    let not_found = |c: Coord<f64>, position: usize| Error::Reconciliation {
        block_id: block_id.to_string(),
        x: c.x,
        y: c.y,
        position,
    };

    let (first, rest) = match simplified.split_first() {
        Some((first, rest)) if !rest.is_empty() => (first, rest),
        _ => {
            return Err(Error::Algorithm(format!(
                "block {block_id}: simplified ring has fewer than two vertices"
            )))
        }
    };
    if original.first() != Some(first) {
        return Err(not_found(*first, 0));
    }

    let mut runs = Vec::with_capacity(rest.len());
    let mut cursor = 0;
    for target in rest {
        let found = original
            .get(cursor + 1..)
            .and_then(|tail| tail.iter().position(|c| c == target))
            .map(|offset| cursor + 1 + offset)
            .ok_or_else(|| not_found(*target, cursor))?;
        runs.push((cursor, found));
        cursor = found;
    }

    // A ring that touches its own start point can match the closing vertex
    // early; the remaining vertices belong to the last side.
    let last_index = original.len() - 1;
    if let Some(last) = runs.last_mut() {
        if last.1 < last_index {
            last.1 = last_index;
        }
    }

    Ok(runs)
}

/// Generate the ordered blockfaces of a contiguous block.
///
/// Blockfaces are numbered from 1 in ring order. Concatenating their
/// geometries (dropping each shared start vertex) reproduces the ring.
pub fn generate_blockfaces(block: &ContiguousBlock, params: &SimplifyParams) -> Result<Vec<BlockFace>> {
    let original = &block.ring().0;
    let simplified = simplify_ring(&block.polygon, params);

    debug!(
        block = %block.geoid,
        tolerance = ?simplified.tolerance,
        area_ratio = simplified.area_ratio,
        original_vertices = original.len(),
        simplified_vertices = simplified.ring.0.len(),
        "simplified block ring"
    );

    let runs = reconcile_runs(&block.geoid, original, &simplified.ring.0)?;

    let faces: Vec<BlockFace> = runs
        .iter()
        .zip(simplified.ring.0.windows(2))
        .enumerate()
        .map(|(n, (&(start, end), pair))| {
            BlockFace::new(
                block.geoid.as_str(),
                n + 1,
                (pair[0], pair[1]),
                LineString::new(original[start..=end].to_vec()),
            )
        })
        .collect();

    debug!(block = %block.geoid, blockfaces = faces.len(), "generated blockfaces");
    Ok(faces)
}

/// Generate blockfaces for a raw block, rejecting non-contiguous geometry.
pub fn blockfaces_for_block(block: &Block, params: &SimplifyParams) -> Result<Vec<BlockFace>> {
    let polygon = contiguous_polygon(&block.geometry).ok_or_else(|| Error::NonContiguousBlock {
        block_id: block.geoid.clone(),
    })?;
    generate_blockfaces(
        &ContiguousBlock {
            geoid: block.geoid.clone(),
            polygon,
        },
        params,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{MultiPolygon, Polygon};

    fn c(x: f64, y: f64) -> Coord<f64> {
        Coord { x, y }
    }

    /// Unit square whose sides carry extra near-collinear vertices
    fn detailed_block() -> ContiguousBlock {
        ContiguousBlock {
            geoid: "060750101001000".into(),
            polygon: Polygon::new(
                LineString::from(vec![
                    (0.0, 0.0),
                    (0.3, 0.00001),
                    (0.6, 0.0),
                    (1.0, 0.0),
                    (1.0, 0.5),
                    (1.0, 1.0),
                    (0.5, 1.00002),
                    (0.0, 1.0),
                    (0.0, 0.0),
                ]),
                vec![],
            ),
        }
    }

    fn coarse() -> SimplifyParams {
        SimplifyParams {
            tolerances: vec![0.01],
            ..SimplifyParams::default()
        }
    }

    /// Concatenate face geometries, dropping each face's shared start vertex
    fn concatenate(faces: &[BlockFace]) -> Vec<Coord<f64>> {
        let mut out: Vec<Coord<f64>> = Vec::new();
        for face in faces {
            let skip = usize::from(!out.is_empty());
            out.extend(face.geometry.0.iter().skip(skip));
        }
        out
    }

    #[test]
    fn test_reconcile_runs() {
        let original = vec![c(0.0, 0.0), c(1.0, 0.0), c(2.0, 0.0), c(2.0, 1.0), c(0.0, 0.0)];
        let simplified = vec![c(0.0, 0.0), c(2.0, 0.0), c(2.0, 1.0), c(0.0, 0.0)];
        let runs = reconcile_runs("b", &original, &simplified).unwrap();
        assert_eq!(runs, vec![(0, 2), (2, 3), (3, 4)]);
    }

    #[test]
    fn test_reconcile_missing_vertex_fails() {
        let original = vec![c(0.0, 0.0), c(1.0, 0.0), c(1.0, 1.0), c(0.0, 0.0)];
        // Perturbed by floating-point noise
        let simplified = vec![c(0.0, 0.0), c(1.0 + 1e-15, 0.0), c(0.0, 0.0)];

        let err = reconcile_runs("4242", &original, &simplified).unwrap_err();
        assert!(matches!(err, Error::Reconciliation { ref block_id, position: 0, .. } if block_id == "4242"));
        assert!(err.to_string().contains("coordinate reconciliation failed for block 4242"));
    }

    #[test]
    fn test_reconcile_out_of_order_vertex_fails() {
        let original = vec![c(0.0, 0.0), c(1.0, 0.0), c(1.0, 1.0), c(0.0, 1.0), c(0.0, 0.0)];
        // (1, 0) appears after (1, 1) in the simplified ring: the forward scan
        // cannot go back for it.
        let simplified = vec![c(0.0, 0.0), c(1.0, 1.0), c(1.0, 0.0), c(0.0, 0.0)];
        assert!(reconcile_runs("b", &original, &simplified).is_err());
    }

    #[test]
    fn test_reconcile_first_vertex_mismatch() {
        let original = vec![c(0.0, 0.0), c(1.0, 0.0), c(1.0, 1.0), c(0.0, 0.0)];
        let simplified = vec![c(1.0, 0.0), c(1.0, 1.0), c(1.0, 0.0)];
        assert!(reconcile_runs("b", &original, &simplified).is_err());
        assert!(reconcile_runs("b", &original, &simplified[..1]).is_err());
    }

    #[test]
    fn test_generate_sides() {
        let block = detailed_block();
        let faces = generate_blockfaces(&block, &coarse()).unwrap();

        assert_eq!(faces.len(), 4);
        let ids: Vec<&str> = faces.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "060750101001000_1",
                "060750101001000_2",
                "060750101001000_3",
                "060750101001000_4"
            ]
        );
        for (n, face) in faces.iter().enumerate() {
            assert_eq!(face.sequence, n + 1);
            assert_eq!(face.block_id, "060750101001000");
            assert_eq!(face.geometry.0.first(), Some(&face.simplified.start));
            assert_eq!(face.geometry.0.last(), Some(&face.simplified.end));
        }

        // South side keeps its intermediate vertices
        assert_eq!(faces[0].geometry.0.len(), 4);
        assert_eq!(faces[1].geometry.0.len(), 3);
    }

    #[test]
    fn test_concatenation_reproduces_ring() {
        let block = detailed_block();
        for params in [coarse(), SimplifyParams::default()] {
            let faces = generate_blockfaces(&block, &params).unwrap();
            assert_eq!(concatenate(&faces), block.ring().0);
        }
    }

    #[test]
    fn test_blockfaces_for_block_rejects_islands() {
        let a = Polygon::new(
            LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]),
            vec![],
        );
        let b = Polygon::new(
            LineString::from(vec![(5.0, 5.0), (6.0, 5.0), (6.0, 6.0), (5.0, 5.0)]),
            vec![],
        );
        let block = Block::new("9999", MultiPolygon::new(vec![a, b]));

        let err = blockfaces_for_block(&block, &coarse()).unwrap_err();
        assert_eq!(
            err,
            Error::NonContiguousBlock {
                block_id: "9999".into()
            }
        );
    }

    #[test]
    fn test_algorithm_trait() {
        let algo = BlockfaceGenerator;
        assert_eq!(algo.name(), "BlockfaceGenerator");
        let faces = algo.execute(detailed_block(), coarse()).unwrap();
        assert_eq!(faces.len(), 4);

        let bad = SimplifyParams {
            tolerances: vec![],
            ..SimplifyParams::default()
        };
        assert!(algo.execute(detailed_block(), bad).is_err());
    }
}
