//! Sampling offsets and stride reduction

/// Nearest building observed at one offset along a blockface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub offset: f64,
    /// Position of the building in the input slice
    pub building: usize,
}

/// A run of samples sharing the same nearest building, as `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrideSpan {
    pub start: f64,
    pub end: f64,
    pub building: usize,
}

/// Snap `value` to the nearest multiple of `tolerance`.
///
/// Offsets derived from the same sample index always snap to the same value,
/// so stride boundaries compare exactly.
pub fn quantize(value: f64, tolerance: f64) -> f64 {
    if tolerance > 0.0 {
        (value / tolerance).round() * tolerance
    } else {
        value
    }
}

/// Offsets `0, step, 2·step, …` strictly below 1.
///
/// Each offset is computed from its index rather than by accumulation, and
/// offsets within `tolerance` of 1 are left out.
pub fn sample_offsets(step: f64, tolerance: f64) -> Vec<f64> {
    if !(step > 0.0) {
        return vec![0.0];
    }
    (0u64..)
        .map(|k| quantize(k as f64 * step, tolerance))
        .take_while(|&offset| offset < 1.0 - tolerance)
        .collect()
}

/// Run-length reduce ordered samples into contiguous strides.
///
/// A new stride starts whenever the nearest building changes; each stride
/// ends where the next begins and the last one is closed at exactly 1.0.
/// `samples` must be sorted by offset.
pub fn collect_strides(samples: &[Sample]) -> Vec<StrideSpan> {
    let Some(first) = samples.first() else {
        return Vec::new();
    };
    debug_assert!(samples.windows(2).all(|w| w[0].offset < w[1].offset));

    let mut spans = Vec::new();
    let mut start = first.offset;
    let mut current = first.building;

    for sample in &samples[1..] {
        if sample.building != current {
            spans.push(StrideSpan {
                start,
                end: sample.offset,
                building: current,
            });
            start = sample.offset;
            current = sample.building;
        }
    }

    spans.push(StrideSpan {
        start,
        end: 1.0,
        building: current,
    });
    spans
}
