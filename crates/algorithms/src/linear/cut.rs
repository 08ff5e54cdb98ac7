//! Cutting and slicing lines by normalized arc-length
//!
//! `cut` splits a line at a single position; `slice_range` composes two
//! cuts to extract `[start, end)`.

use geo::{Coord, LineString};

/// Two positions closer than this are treated as the same vertex
const VERTEX_TOLERANCE: f64 = 1e-12;

fn segment_length(a: Coord<f64>, b: Coord<f64>) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

fn lerp(a: Coord<f64>, b: Coord<f64>, t: f64) -> Coord<f64> {
    Coord {
        x: a.x + (b.x - a.x) * t,
        y: a.y + (b.y - a.y) * t,
    }
}

/// Normalized arc-length of every vertex.
///
/// Returns `None` for lines with fewer than two vertices or zero length,
/// which have no meaningful parametrization.
pub fn vertex_positions(line: &LineString<f64>) -> Option<Vec<f64>> {
    let coords = &line.0;
    if coords.len() < 2 {
        return None;
    }

    let mut cumulative = Vec::with_capacity(coords.len());
    let mut total = 0.0;
    cumulative.push(0.0);
    for w in coords.windows(2) {
        total += segment_length(w[0], w[1]);
        cumulative.push(total);
    }

    if total <= 0.0 || !total.is_finite() {
        return None;
    }

    Some(cumulative.into_iter().map(|d| d / total).collect())
}

/// Point at normalized arc-length `fraction` along `line`.
///
/// The fraction is clamped to `[0, 1]`. A zero-length line yields its first
/// vertex; an empty line yields `None`.
pub fn interpolate(line: &LineString<f64>, fraction: f64) -> Option<Coord<f64>> {
    let coords = &line.0;
    let first = *coords.first()?;
    let positions = match vertex_positions(line) {
        Some(p) => p,
        None => return Some(first),
    };

    let f = fraction.clamp(0.0, 1.0);
    for i in 1..coords.len() {
        if positions[i] >= f {
            let span = positions[i] - positions[i - 1];
            if span <= 0.0 {
                return Some(coords[i]);
            }
            let t = ((f - positions[i - 1]) / span).clamp(0.0, 1.0);
            return Some(lerp(coords[i - 1], coords[i], t));
        }
    }

    coords.last().copied()
}

/// Split `line` in two at normalized arc-length `distance`.
///
/// Returns the line unchanged (as a single piece) when `distance <= 0` or
/// `distance >= 1`. When the position falls on a vertex both halves share
/// that vertex; otherwise an interpolated vertex is inserted and shared.
///
/// ```rust
/// use curbside_algorithms::linear::cut;
/// use geo::LineString;
///
/// let line = LineString::from(vec![(0.0, 0.0), (1.0, 0.0)]);
/// let pieces = cut(&line, 0.5);
/// assert_eq!(pieces[0], LineString::from(vec![(0.0, 0.0), (0.5, 0.0)]));
/// assert_eq!(pieces[1], LineString::from(vec![(0.5, 0.0), (1.0, 0.0)]));
/// ```
pub fn cut(line: &LineString<f64>, distance: f64) -> Vec<LineString<f64>> {
    if !(distance > 0.0 && distance < 1.0) {
        return vec![line.clone()];
    }
    let positions = match vertex_positions(line) {
        Some(p) => p,
        None => return vec![line.clone()],
    };

    let coords = &line.0;
    let last = coords.len() - 1;
    for (i, &pd) in positions.iter().enumerate() {
        if i > 0 && i < last && (pd - distance).abs() <= VERTEX_TOLERANCE {
            return vec![
                LineString::new(coords[..=i].to_vec()),
                LineString::new(coords[i..].to_vec()),
            ];
        }
        if pd > distance {
            let span = pd - positions[i - 1];
            let t = ((distance - positions[i - 1]) / span).clamp(0.0, 1.0);
            let cp = lerp(coords[i - 1], coords[i], t);

            let mut left = coords[..i].to_vec();
            left.push(cp);
            let mut right = Vec::with_capacity(coords.len() - i + 1);
            right.push(cp);
            right.extend_from_slice(&coords[i..]);

            return vec![LineString::new(left), LineString::new(right)];
        }
    }

    vec![line.clone()]
}

/// The same line traversed end to start
pub fn reverse(line: &LineString<f64>) -> LineString<f64> {
    LineString::new(line.0.iter().rev().copied().collect())
}

/// Sub-line of `line` spanning normalized arc-length `[start, end)`.
///
/// The prefix before `start` is cut away first. `end` is then re-expressed
/// relative to the remaining sub-line, whose length is `1 - start` of the
/// original, and the remainder is cut there.
///
/// Bounds are clamped to `[0, 1]`. An empty or inverted range yields the
/// single point at `start`.
pub fn slice_range(line: &LineString<f64>, start: f64, end: f64) -> LineString<f64> {
    let start = start.clamp(0.0, 1.0);
    let end = end.clamp(0.0, 1.0);

    if end <= start {
        return LineString::new(interpolate(line, start).into_iter().collect());
    }

    let remainder = if start > 0.0 {
        match cut(line, start).pop() {
            Some(tail) => tail,
            None => line.clone(),
        }
    } else {
        line.clone()
    };

    if end >= 1.0 {
        return remainder;
    }

    let relative_end = (end - start) / (1.0 - start);
    cut(&remainder, relative_end)
        .into_iter()
        .next()
        .unwrap_or(remainder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::{Euclidean, Length};

    fn unit_line() -> LineString<f64> {
        LineString::from(vec![(0.0, 0.0), (1.0, 0.0)])
    }

    fn l_shape() -> LineString<f64> {
        // Two legs of length 3 and 1: the corner sits at 0.75
        LineString::from(vec![(0.0, 0.0), (3.0, 0.0), (3.0, 1.0)])
    }

    fn assert_coords_eq(line: &LineString<f64>, expected: &[(f64, f64)]) {
        assert_eq!(line.0.len(), expected.len(), "vertex count of {:?}", line);
        for (c, &(x, y)) in line.0.iter().zip(expected) {
            assert_relative_eq!(c.x, x, epsilon = 1e-12);
            assert_relative_eq!(c.y, y, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_cut_midpoint() {
        let pieces = cut(&unit_line(), 0.5);
        assert_eq!(pieces.len(), 2);
        assert_coords_eq(&pieces[0], &[(0.0, 0.0), (0.5, 0.0)]);
        assert_coords_eq(&pieces[1], &[(0.5, 0.0), (1.0, 0.0)]);
    }

    #[test]
    fn test_cut_out_of_range_is_noop() {
        let line = l_shape();
        for d in [-1.0, 0.0, 1.0, 1.5, f64::NAN] {
            let pieces = cut(&line, d);
            assert_eq!(pieces, vec![line.clone()], "distance {}", d);
        }
    }

    #[test]
    fn test_cut_on_vertex() {
        let pieces = cut(&l_shape(), 0.75);
        assert_coords_eq(&pieces[0], &[(0.0, 0.0), (3.0, 0.0)]);
        assert_coords_eq(&pieces[1], &[(3.0, 0.0), (3.0, 1.0)]);
    }

    #[test]
    fn test_cut_between_vertices() {
        let pieces = cut(&l_shape(), 0.875);
        assert_coords_eq(&pieces[0], &[(0.0, 0.0), (3.0, 0.0), (3.0, 0.5)]);
        assert_coords_eq(&pieces[1], &[(3.0, 0.5), (3.0, 1.0)]);
    }

    #[test]
    fn test_cut_zero_length_line() {
        let line = LineString::from(vec![(2.0, 2.0), (2.0, 2.0)]);
        assert_eq!(cut(&line, 0.5), vec![line]);
    }

    #[test]
    fn test_vertex_positions() {
        let p = vertex_positions(&l_shape()).unwrap();
        assert_eq!(p.len(), 3);
        assert_relative_eq!(p[0], 0.0);
        assert_relative_eq!(p[1], 0.75);
        assert_relative_eq!(p[2], 1.0);
        assert!(vertex_positions(&LineString::from(vec![(1.0, 1.0)])).is_none());
    }

    #[test]
    fn test_interpolate() {
        let line = l_shape();
        let c = interpolate(&line, 0.5).unwrap();
        assert_relative_eq!(c.x, 2.0, epsilon = 1e-12);
        assert_relative_eq!(c.y, 0.0, epsilon = 1e-12);

        let c = interpolate(&line, 2.0).unwrap();
        assert_eq!(c, Coord { x: 3.0, y: 1.0 });

        assert!(interpolate(&LineString::new(vec![]), 0.5).is_none());
    }

    #[test]
    fn test_reverse() {
        let r = reverse(&l_shape());
        assert_coords_eq(&r, &[(3.0, 1.0), (3.0, 0.0), (0.0, 0.0)]);
    }

    #[test]
    fn test_slice_range_interior() {
        // [0.25, 0.875) of the L: x from 1.0 to the corner, then up to y = 0.5
        let s = slice_range(&l_shape(), 0.25, 0.875);
        assert_coords_eq(&s, &[(1.0, 0.0), (3.0, 0.0), (3.0, 0.5)]);
    }

    #[test]
    fn test_slice_range_full_and_edges() {
        let line = l_shape();
        assert_eq!(slice_range(&line, 0.0, 1.0), line);

        let head = slice_range(&line, 0.0, 0.5);
        assert_coords_eq(&head, &[(0.0, 0.0), (2.0, 0.0)]);

        let tail = slice_range(&line, 0.5, 1.0);
        assert_coords_eq(&tail, &[(2.0, 0.0), (3.0, 0.0), (3.0, 1.0)]);
    }

    #[test]
    fn test_slice_range_matches_reversed_cut() {
        // Same result as trimming the prefix through the reversed line
        let line = LineString::from(vec![(0.0, 0.0), (2.0, 1.0), (4.0, 0.0), (5.0, 3.0)]);
        let (start, end) = (0.3, 0.7);

        let reversed_prefix = cut(&reverse(&line), 1.0 - start).remove(0);
        let trimmed = reverse(&reversed_prefix);
        let expected = cut(&trimmed, (end - start) / (1.0 - start)).remove(0);

        let got = slice_range(&line, start, end);
        assert_eq!(got.0.len(), expected.0.len());
        for (a, b) in got.0.iter().zip(expected.0.iter()) {
            assert_relative_eq!(a.x, b.x, epsilon = 1e-9);
            assert_relative_eq!(a.y, b.y, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_slice_lengths_add_up() {
        let line = LineString::from(vec![(0.0, 0.0), (2.0, 1.0), (4.0, 0.0), (5.0, 3.0)]);
        let total = line.length::<Euclidean>();
        let bounds = [0.0, 0.1, 0.45, 0.5, 0.93, 1.0];

        let sum: f64 = bounds
            .windows(2)
            .map(|w| slice_range(&line, w[0], w[1]).length::<Euclidean>())
            .sum();
        assert_relative_eq!(sum, total, epsilon = 1e-9);

        let piece = slice_range(&line, 0.1, 0.45);
        assert_relative_eq!(piece.length::<Euclidean>(), 0.35 * total, epsilon = 1e-9);
    }

    #[test]
    fn test_slice_empty_range() {
        let s = slice_range(&unit_line(), 0.4, 0.4);
        assert_eq!(s.0.len(), 1);
        assert_relative_eq!(s.0[0].x, 0.4, epsilon = 1e-12);
    }
}
