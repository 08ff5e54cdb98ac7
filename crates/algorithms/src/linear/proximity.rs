//! Distances between points and polylines
//!
//! `within_distance` answers "does `reference` buffered by `epsilon` contain
//! `subject`?" without building the buffer polygon: every point of `subject`
//! must lie within `epsilon` of `reference`. The test is exact per segment
//! rather than sampled.

use curbside_core::BoundingBox;
use geo::{Coord, LineString};

/// Euclidean distance from `p` to the segment `a`-`b`
pub fn point_segment_distance(p: Coord<f64>, a: Coord<f64>, b: Coord<f64>) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;

    if len_sq <= 0.0 {
        return (p.x - a.x).hypot(p.y - a.y);
    }

    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    let cx = a.x + t * dx;
    let cy = a.y + t * dy;
    (p.x - cx).hypot(p.y - cy)
}

/// Distance from `p` to the nearest point of `line` (infinite for an empty line)
pub fn point_line_distance(p: Coord<f64>, line: &LineString<f64>) -> f64 {
    match line.0.as_slice() {
        [] => f64::INFINITY,
        [only] => (p.x - only.x).hypot(p.y - only.y),
        coords => coords
            .windows(2)
            .map(|w| point_segment_distance(p, w[0], w[1]))
            .fold(f64::INFINITY, f64::min),
    }
}

/// Slack allowed between covered parameter intervals
const COVER_TOLERANCE: f64 = 1e-9;

/// Whether every point of `subject` lies within `epsilon` of `reference`.
///
/// Exact up to floating-point rounding: each subject segment is clipped
/// against the `epsilon` neighbourhood of every reference segment, and the
/// resulting parameter intervals must cover the whole segment.
pub fn within_distance(subject: &LineString<f64>, reference: &LineString<f64>, epsilon: f64) -> bool {
    if subject.0.is_empty() || reference.0.is_empty() || !(epsilon >= 0.0) {
        return false;
    }

    // Cheap reject on envelopes
    match (BoundingBox::of_line(subject), BoundingBox::of_line(reference)) {
        (Some(s), Some(r)) if r.expand(epsilon).contains(&s) => {}
        _ => return false,
    }

    if subject.0.len() == 1 {
        return point_line_distance(subject.0[0], reference) <= epsilon;
    }

    let pieces: Vec<(Coord<f64>, Coord<f64>)> = match reference.0.as_slice() {
        [only] => vec![(*only, *only)],
        coords => coords.windows(2).map(|w| (w[0], w[1])).collect(),
    };

    subject.0.windows(2).all(|w| {
        let (a, b) = (w[0], w[1]);
        if a == b {
            return point_line_distance(a, reference) <= epsilon;
        }
        let mut spans: Vec<(f64, f64)> = pieces
            .iter()
            .filter_map(|&(s0, s1)| reach_interval(a, b, s0, s1, epsilon))
            .collect();
        covers_unit_interval(&mut spans)
    })
}

/// Parameters `t` for which `a + t·(b - a)` is within `epsilon` of the
/// segment `s0`-`s1`, clipped to `[0, 1]`.
///
/// The neighbourhood of a segment is convex (a rectangle capped by two
/// discs), so its intersection with a line is a single interval: the hull
/// of the three pieces.
fn reach_interval(
    a: Coord<f64>,
    b: Coord<f64>,
    s0: Coord<f64>,
    s1: Coord<f64>,
    epsilon: f64,
) -> Option<(f64, f64)> {
    let d = b - a;
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    let mut widen = |span: Option<(f64, f64)>| {
        if let Some((t0, t1)) = span {
            lo = lo.min(t0);
            hi = hi.max(t1);
        }
    };

    widen(disc_interval(a, d, s0, epsilon));
    if s1 != s0 {
        widen(disc_interval(a, d, s1, epsilon));

        // Rectangle in the segment's own frame, unnormalized
        let e = s1 - s0;
        let len_sq = e.x * e.x + e.y * e.y;
        let rel = a - s0;
        let along = linear_interval(rel.x * e.x + rel.y * e.y, d.x * e.x + d.y * e.y, 0.0, len_sq);
        let half_width = epsilon * len_sq.sqrt();
        let across = linear_interval(
            e.x * rel.y - e.y * rel.x,
            e.x * d.y - e.y * d.x,
            -half_width,
            half_width,
        );
        if let (Some(p), Some(q)) = (along, across) {
            let t0 = p.0.max(q.0);
            let t1 = p.1.min(q.1);
            if t0 <= t1 {
                widen(Some((t0, t1)));
            }
        }
    }

    let (t0, t1) = (lo.max(0.0), hi.min(1.0));
    (t0 <= t1).then_some((t0, t1))
}

/// Solutions of `|a + t·d - c| <= r`
fn disc_interval(a: Coord<f64>, d: Coord<f64>, c: Coord<f64>, r: f64) -> Option<(f64, f64)> {
    let rel = a - c;
    let qa = d.x * d.x + d.y * d.y;
    let qb = 2.0 * (rel.x * d.x + rel.y * d.y);
    let qc = rel.x * rel.x + rel.y * rel.y - r * r;
    let disc = qb * qb - 4.0 * qa * qc;
    if qa <= 0.0 || disc < 0.0 {
        return None;
    }
    let root = disc.sqrt();
    Some(((-qb - root) / (2.0 * qa), (-qb + root) / (2.0 * qa)))
}

/// Solutions of `lo <= p + q·t <= hi`
fn linear_interval(p: f64, q: f64, lo: f64, hi: f64) -> Option<(f64, f64)> {
    if q == 0.0 {
        return (lo <= p && p <= hi).then_some((f64::NEG_INFINITY, f64::INFINITY));
    }
    let t0 = (lo - p) / q;
    let t1 = (hi - p) / q;
    Some((t0.min(t1), t0.max(t1)))
}

fn covers_unit_interval(spans: &mut [(f64, f64)]) -> bool {
    spans.sort_by(|x, y| x.0.partial_cmp(&y.0).unwrap_or(std::cmp::Ordering::Equal));
    let mut reach = 0.0;
    for &(t0, t1) in spans.iter() {
        if t0 > reach + COVER_TOLERANCE {
            return false;
        }
        reach = f64::max(reach, t1);
    }
    reach >= 1.0 - COVER_TOLERANCE
}
