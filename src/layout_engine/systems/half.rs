use serde::{Deserialize, Serialize};

use super::master::MasterArea;
use super::{LayoutStrategy, TileFrame};
use crate::common::config::LayoutSettings;
use crate::layout_engine::LayoutKind;
use crate::layout_engine::layout::Tile;
use crate::layout_engine::utils::split_span;
use crate::sys::geometry::{Point, Rect};

/// Masters side by side on the left, slaves stacked on the right.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HalfLayout {
    master: MasterArea,
}

impl HalfLayout {
    pub fn new(settings: &LayoutSettings) -> Self {
        HalfLayout {
            master: MasterArea {
                count: settings.master_count,
                ratio: settings.master_ratio,
            },
        }
    }

    fn arrange(&self, screen: Rect, tiles: &mut [Tile], master_width: f64) {
        let masters = self.master.effective(tiles.len());
        let slaves = tiles.len() - masters;
        let (mut rects, rest) = self.master.split(screen, masters, slaves, master_width);
        if let Some(area) = rest {
            rects.extend(
                split_span(area.y, area.height, slaves)
                    .into_iter()
                    .map(|(y, h)| Rect::new(area.x, y, area.width, h)),
            );
        }
        for (tile, rect) in tiles.iter_mut().zip(rects) {
            tile.rect = rect;
        }
    }
}

impl LayoutStrategy for HalfLayout {
    fn name(&self) -> &'static str { "Half" }

    fn kind(&self) -> LayoutKind { LayoutKind::Half }

    fn add_tile(&mut self, frame: TileFrame<'_>, _at: Option<Point>) -> usize {
        let width = self.master.width(frame.screen, frame.tiles);
        frame.tiles.push(Tile::default());
        self.arrange(frame.screen, frame.tiles, width);
        frame.tiles.len() - 1
    }

    fn remove_tile(&mut self, frame: TileFrame<'_>, index: usize) {
        let width = self.master.width(frame.screen, frame.tiles);
        frame.tiles.remove(index);
        self.arrange(frame.screen, frame.tiles, width);
    }

    fn increase_master(&mut self, frame: TileFrame<'_>) -> bool {
        let width = self.master.width(frame.screen, frame.tiles);
        if !self.master.increase(frame.tiles.len()) {
            return false;
        }
        self.arrange(frame.screen, frame.tiles, width);
        true
    }

    fn decrement_master(&mut self, frame: TileFrame<'_>) -> bool {
        let width = self.master.width(frame.screen, frame.tiles);
        if !self.master.decrement(frame.tiles.len()) {
            return false;
        }
        self.arrange(frame.screen, frame.tiles, width);
        true
    }

    fn master_count(&self) -> usize { self.master.count }
}
