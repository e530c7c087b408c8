use serde::{Deserialize, Serialize};

use crate::layout_engine::layout::Tile;
use crate::layout_engine::utils::split_span;
use crate::sys::geometry::Rect;

const MIN_RATIO: f64 = 0.05;
const MAX_RATIO: f64 = 0.95;

/// Master bookkeeping shared by the master/stack layouts.
///
/// `count` is what the user asked for; the number of masters actually on
/// screen is that clamped to the number of tiles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MasterArea {
    pub count: usize,
    pub ratio: f64,
}

impl MasterArea {
    pub fn effective(&self, tiles: usize) -> usize { self.count.min(tiles) }

    /// The configured ratio pulled inside `MIN_RATIO..=MAX_RATIO`.
    pub fn ratio(&self) -> f64 {
        if self.ratio.is_nan() { 0.5 } else { self.ratio.clamp(MIN_RATIO, MAX_RATIO) }
    }

    /// Width of the master area. Read back from the tiles while they are
    /// split into masters and slaves, so a dragged border survives edits;
    /// otherwise derived from the ratio.
    pub fn width(&self, screen: Rect, tiles: &[Tile]) -> f64 {
        let masters = self.effective(tiles.len());
        if masters > 0 && masters < tiles.len() {
            let width = tiles[masters - 1].rect.right() - screen.left();
            if width > 0.0 && width < screen.width {
                return width;
            }
        }
        (screen.width * self.ratio()).floor()
    }

    /// Master rectangles side by side within `width`, and what is left for
    /// the slaves. With no slaves the masters take the whole screen.
    pub fn split(
        &self,
        screen: Rect,
        masters: usize,
        slaves: usize,
        width: f64,
    ) -> (Vec<Rect>, Option<Rect>) {
        if masters == 0 {
            return (Vec::new(), (slaves > 0).then_some(screen));
        }
        let width = if slaves == 0 { screen.width } else { width };
        let columns = split_span(screen.x, width, masters)
            .into_iter()
            .map(|(x, w)| Rect::new(x, screen.y, w, screen.height))
            .collect();
        let rest = (slaves > 0).then(|| {
            Rect::from_edges(screen.x + width, screen.y, screen.right(), screen.bottom())
        });
        (columns, rest)
    }

    /// Moves one slave into the master area. Returns whether anything changed.
    pub fn increase(&mut self, tiles: usize) -> bool {
        let current = self.effective(tiles);
        if current >= tiles {
            return false;
        }
        self.count = current + 1;
        true
    }

    pub fn decrement(&mut self, tiles: usize) -> bool {
        let current = self.effective(tiles);
        if current == 0 {
            return false;
        }
        self.count = current - 1;
        true
    }
}
