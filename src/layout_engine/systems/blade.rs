use serde::{Deserialize, Serialize};

use super::{LayoutStrategy, TileFrame};
use crate::layout_engine::LayoutKind;
use crate::layout_engine::layout::Tile;
use crate::layout_engine::utils::split_span;
use crate::sys::geometry::{Point, Rect};

/// Full-height columns of equal width, in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BladeLayout {}

fn columns(screen: Rect, tiles: &mut [Tile]) {
    let spans = split_span(screen.x, screen.width, tiles.len());
    for (tile, (x, width)) in tiles.iter_mut().zip(spans) {
        tile.rect = Rect::new(x, screen.y, width, screen.height);
    }
}

impl LayoutStrategy for BladeLayout {
    fn name(&self) -> &'static str { "Blade" }

    fn kind(&self) -> LayoutKind { LayoutKind::Blade }

    fn add_tile(&mut self, frame: TileFrame<'_>, _at: Option<Point>) -> usize {
        frame.tiles.push(Tile::default());
        columns(frame.screen, frame.tiles);
        frame.tiles.len() - 1
    }

    fn remove_tile(&mut self, frame: TileFrame<'_>, index: usize) {
        frame.tiles.remove(index);
        columns(frame.screen, frame.tiles);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_log::test;

    use super::*;

    #[test]
    fn columns_share_width_with_remainder_on_the_right() {
        let screen = Rect::new(0.0, 0.0, 1000.0, 600.0);
        let mut blade = BladeLayout::default();
        let mut tiles = Vec::new();
        for _ in 0..3 {
            blade.add_tile(TileFrame { screen, tiles: &mut tiles }, None);
        }
        assert_eq!(tiles[2].rect, Rect::new(666.0, 0.0, 334.0, 600.0));

        blade.remove_tile(TileFrame { screen, tiles: &mut tiles }, 0);
        assert_eq!(
            tiles.iter().map(|t| t.rect).collect::<Vec<_>>(),
            vec![Rect::new(0.0, 0.0, 500.0, 600.0), Rect::new(500.0, 0.0, 500.0, 600.0)]
        );
    }
}
