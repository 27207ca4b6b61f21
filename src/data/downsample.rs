//! Structural downsampling of ordered series.
//!
//! Charts are redrawn every refresh tick, so the number of points handed to
//! the renderer has to stay bounded no matter how much history the feed
//! returns. Thinning is by fixed stride: no interpolation, no averaging, and
//! the output is always an order-preserving subsequence of the input.

/// Reduce `items` to roughly `target` elements by keeping every stride-th
/// element, where `stride = max(1, len / target)`.
///
/// Input at or under the target is returned unchanged. The result length is
/// `ceil(len / stride)`, which can exceed `target` by up to one stride's
/// worth of remainder. Deterministic: output membership depends only on the
/// input length.
pub fn downsample<T: Clone>(items: &[T], target: usize) -> Vec<T> {
    let target = target.max(1);
    if items.len() <= target {
        return items.to_vec();
    }

    let stride = (items.len() / target).max(1);
    items.iter().step_by(stride).cloned().collect()
}
