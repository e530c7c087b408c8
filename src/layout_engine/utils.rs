use crate::common::config::GapSettings;
use crate::sys::geometry::{Edges, Rect, Round};

/// The part of the screen left for tiles once outer gaps are taken off.
pub fn compute_tiling_area(screen: Rect, gaps: &GapSettings) -> Rect {
    let outer = &gaps.outer;
    screen.inset(outer.left, outer.top, outer.right, outer.bottom).round()
}

/// Splits `len` into `n` whole-pixel segments starting at `start`.
///
/// Every segment but the last is `floor(len / n)` long; the last one takes the
/// remainder so the segments always add up to exactly `len`.
pub fn split_span(start: f64, len: f64, n: usize) -> Vec<(f64, f64)> {
    if n == 0 {
        return Vec::new();
    }
    let each = (len / n as f64).floor();
    let mut spans = Vec::with_capacity(n);
    for i in 0..n - 1 {
        spans.push((start + each * i as f64, each));
    }
    let used = each * (n - 1) as f64;
    spans.push((start + used, len - used));
    spans
}

/// Like [`split_span`], but each segment gets a share proportional to its weight.
///
/// Falls back to an even split when the weights carry no information.
pub fn fit_spans(weights: &[f64], start: f64, len: f64) -> Vec<(f64, f64)> {
    let total: f64 = weights.iter().sum();
    if weights.is_empty() || !(total > 0.0) || weights.iter().any(|w| *w < 0.0) {
        return split_span(start, len, weights.len());
    }
    let mut spans = Vec::with_capacity(weights.len());
    let mut offset = 0.0;
    for w in &weights[..weights.len() - 1] {
        let seg = (len * w / total).floor();
        spans.push((start + offset, seg));
        offset += seg;
    }
    spans.push((start + offset, (len - offset).max(0.0)));
    spans
}

/// Shrinks a tile rectangle into the frame its window should get.
///
/// Sides flush with the tiling area keep their position; shared sides give up
/// half of the inner gap each, so neighbouring windows end up one full gap apart.
pub fn apply_inner_gaps(tile: Rect, area: Rect, gaps: &GapSettings) -> Rect {
    let (left, top, right, bottom) = inner_gap_insets(tile.edges_on(&area), gaps);
    tile.inset(left, top, right, bottom)
}

/// Inverse of [`apply_inner_gaps`] for a window frame reported by the host.
pub fn remove_inner_gaps(frame: Rect, area: Rect, gaps: &GapSettings) -> Rect {
    let (left, top, right, bottom) = inner_gap_insets(frame.edges_on(&area), gaps);
    frame.inset(-left, -top, -right, -bottom)
}

fn inner_gap_insets(flush: Edges, gaps: &GapSettings) -> (f64, f64, f64, f64) {
    let half_h = gaps.inner.horizontal / 2.0;
    let half_v = gaps.inner.vertical / 2.0;
    let side = |edge: Edges, amount: f64| if flush.contains(edge) { 0.0 } else { amount };
    (
        side(Edges::LEFT, half_h),
        side(Edges::TOP, half_v),
        side(Edges::RIGHT, half_h),
        side(Edges::BOTTOM, half_v),
    )
}

/// Smallest `r` with `r * r >= n`.
pub fn ceil_sqrt(n: usize) -> usize {
    let mut r = (n as f64).sqrt() as usize;
    while r * r < n {
        r += 1;
    }
    while r > 0 && (r - 1) * (r - 1) >= n {
        r -= 1;
    }
    r
}
