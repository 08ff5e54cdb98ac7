//! Bounding-box spatial index
//!
//! An R-tree over envelopes with two queries:
//! - `nearest`: the k entries whose boxes are closest to a query box
//! - `intersecting`: every entry whose box overlaps a query box
//!
//! Distances are box-to-box gaps, so a query box that overlaps an entry is at
//! distance 0 from it. Equal distances are reported in insertion order.

use rstar::{RTree, RTreeObject, AABB};

use crate::vector::BoundingBox;

/// An envelope stored in the tree, tagged with the caller's id
#[derive(Debug, Clone)]
struct IndexedBox {
    id: usize,
    /// Insertion order, used to break distance ties
    seq: usize,
    bbox: BoundingBox,
}

impl RTreeObject for IndexedBox {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        to_aabb(&self.bbox)
    }
}

fn to_aabb(bbox: &BoundingBox) -> AABB<[f64; 2]> {
    AABB::from_corners([bbox.min_x, bbox.min_y], [bbox.max_x, bbox.max_y])
}

/// Spatial index over bounding boxes.
///
/// Built once per input collection and queried read-only afterwards.
///
/// # Example
/// ```rust
/// use curbside_core::index::SpatialIndex;
/// use curbside_core::vector::BoundingBox;
///
/// let mut index = SpatialIndex::new();
/// index.insert(0, BoundingBox::new(0.0, 0.0, 1.0, 1.0));
/// index.insert(1, BoundingBox::new(5.0, 5.0, 6.0, 6.0));
///
/// let query = BoundingBox::new(4.0, 4.0, 4.5, 4.5);
/// assert_eq!(index.nearest(&query, 1), vec![1]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SpatialIndex {
    tree: RTree<IndexedBox>,
    extent: Option<BoundingBox>,
}

impl SpatialIndex {
    /// Create an empty spatial index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bulk-load an index from `(id, box)` pairs.
    pub fn from_boxes(boxes: impl IntoIterator<Item = (usize, BoundingBox)>) -> Self {
        let mut extent: Option<BoundingBox> = None;
        let items: Vec<IndexedBox> = boxes
            .into_iter()
            .enumerate()
            .map(|(seq, (id, bbox))| {
                extent = Some(extent.map_or(bbox, |e| e.union(&bbox)));
                IndexedBox { id, seq, bbox }
            })
            .collect();

        Self {
            tree: RTree::bulk_load(items),
            extent,
        }
    }

    /// Number of entries in the index.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Check if index is empty.
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Insert an entry.
    pub fn insert(&mut self, id: usize, bbox: BoundingBox) {
        let seq = self.tree.size();
        self.extent = Some(self.extent.map_or(bbox, |e| e.union(&bbox)));
        self.tree.insert(IndexedBox { id, seq, bbox });
    }

    /// Ids of all entries whose box overlaps `query`, in insertion order.
    pub fn intersecting(&self, query: &BoundingBox) -> Vec<usize> {
        let mut hits: Vec<&IndexedBox> = self
            .tree
            .locate_in_envelope_intersecting(&to_aabb(query))
            .collect();
        hits.sort_by_key(|e| e.seq);
        hits.into_iter().map(|e| e.id).collect()
    }

    /// Up to `k` ids ordered nearest first. A query with a NaN or infinite
    /// bound has no nearest entries.
    ///
    /// The search window around `query` grows until it holds at least `k`
    /// entries whose gap to `query` is within the window margin; every entry
    /// outside that set is then provably farther than every entry inside it.
    pub fn nearest(&self, query: &BoundingBox, k: usize) -> Vec<usize> {
        let extent = match self.extent {
            Some(extent) if k > 0 && query.is_finite() => extent,
            _ => return Vec::new(),
        };

        let mut radius = query.distance(&extent);
        let mut step = extent.width().max(extent.height()) / 16.0;
        if step <= 0.0 || !step.is_finite() {
            step = 1.0;
        }

        loop {
            let window = query.expand(radius);
            let covers_all = window.contains(&extent);

            let mut found: Vec<(f64, usize, usize)> = self
                .tree
                .locate_in_envelope_intersecting(&to_aabb(&window))
                .map(|e| (query.distance(&e.bbox), e.seq, e.id))
                .filter(|&(d, _, _)| covers_all || d <= radius)
                .collect();

            if covers_all || found.len() >= k {
                found.sort_by(|a, b| {
                    a.0.partial_cmp(&b.0)
                        .unwrap_or(std::cmp::Ordering::Equal)
                        .then(a.1.cmp(&b.1))
                });
                return found.into_iter().take(k).map(|(_, _, id)| id).collect();
            }

            radius += step;
            step *= 2.0;
        }
    }
}
