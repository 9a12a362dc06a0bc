//! Deterministic batch downsampling.

pub const MIN_RATIO: f64 = 0.1;
pub const MAX_RATIO: f64 = 1.0;

/// Lists this short are never reduced.
const MIN_LEN_TO_SAMPLE: usize = 3;

/// Reduces `items` to roughly `ratio` of its length, keeping the first and last elements.
///
/// The ratio is clamped to `[0.1, 1.0]`. Interior elements are picked at a fixed stride so
/// the result is reproducible for a given input and ratio, and relative order is kept.
///
/// # Examples
///
/// ```
/// use convo_graph::transform::downsample;
///
/// let picked = downsample((0..10).collect::<Vec<_>>(), 0.3);
/// assert_eq!(picked, vec![0, 1, 9]);
/// ```
pub fn downsample<T>(items: Vec<T>, ratio: f64) -> Vec<T> {
    let ratio = clamp_ratio(ratio);
    let len = items.len();
    if ratio >= MAX_RATIO || len <= MIN_LEN_TO_SAMPLE {
        return items;
    }

    let keep = sample_indices(len, ratio);
    let mut keep = keep.into_iter().peekable();
    items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| {
            if keep.peek() == Some(&i) {
                keep.next();
                Some(item)
            } else {
                None
            }
        })
        .collect()
}

/// Clamps to `[MIN_RATIO, MAX_RATIO]`; NaN is read as "keep everything".
pub fn clamp_ratio(ratio: f64) -> f64 {
    if ratio.is_nan() { MAX_RATIO } else { ratio.clamp(MIN_RATIO, MAX_RATIO) }
}

/// Strictly increasing indices into a list of `len > 3` elements.
fn sample_indices(len: usize, ratio: f64) -> Vec<usize> {
    let target = ((len as f64 * ratio).floor() as usize).max(1);
    let mut indices = Vec::with_capacity(target.max(2));
    indices.push(0);

    if target > 2 {
        let picks = target - 2;
        let middle_len = len - 2;
        let stride = middle_len as f64 / picks as f64;
        // stride >= 1 because picks <= middle_len, so indices never repeat.
        indices.extend((0..picks).map(|i| 1 + (i as f64 * stride).floor() as usize));
    }

    indices.push(len - 1);
    indices
}
