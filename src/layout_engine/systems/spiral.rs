use serde::{Deserialize, Serialize};

use super::{LayoutStrategy, TileFrame};
use crate::layout_engine::LayoutKind;
use crate::layout_engine::layout::Tile;
use crate::sys::geometry::{Point, Rect};

/// Each new tile takes half of the tile added before it, turning a quarter
/// further every time.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpiralLayout {}

/// Splits `rect` in two, returning `(kept, taken)`. The taken half lies on
/// the side selected by `phase`: bottom, right, top, left.
fn bisect(rect: Rect, phase: usize) -> (Rect, Rect) {
    let half_w = (rect.width / 2.0).floor();
    let half_h = (rect.height / 2.0).floor();
    let (l, t, r, b) = (rect.left(), rect.top(), rect.right(), rect.bottom());
    match phase % 4 {
        0 => (Rect::from_edges(l, t, r, t + half_h), Rect::from_edges(l, t + half_h, r, b)),
        1 => (Rect::from_edges(l, t, l + half_w, b), Rect::from_edges(l + half_w, t, r, b)),
        2 => (Rect::from_edges(l, t + half_h, r, b), Rect::from_edges(l, t, r, t + half_h)),
        _ => (Rect::from_edges(l + half_w, t, r, b), Rect::from_edges(l, t, l + half_w, b)),
    }
}

impl LayoutStrategy for SpiralLayout {
    fn name(&self) -> &'static str { "Spiral" }

    fn kind(&self) -> LayoutKind { LayoutKind::Spiral }

    fn add_tile(&mut self, frame: TileFrame<'_>, _at: Option<Point>) -> usize {
        let count = frame.tiles.len();
        let Some(previous) = frame.tiles.last_mut() else {
            frame.tiles.push(Tile::new(frame.screen));
            return 0;
        };
        let (kept, taken) = bisect(previous.rect, count);
        previous.rect = kept;
        frame.tiles.push(Tile::new(taken));
        count
    }

    /// Merges the last two slots and drops one. The tiles after `index` move
    /// down a slot, so every remaining tile keeps a slot from before.
    fn remove_tile(&mut self, frame: TileFrame<'_>, _index: usize) {
        let tiles = frame.tiles;
        let Some(last) = tiles.pop() else {
            return;
        };
        if let Some(previous) = tiles.last_mut() {
            previous.rect = previous.rect.union(&last.rect);
        }
    }
}
