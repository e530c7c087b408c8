use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};

use super::error::LayoutError;
use super::layout::{Tile, propagate_resize, rescale_tiles};
use super::LayoutKind;
use crate::common::config::LayoutSettings;
use crate::sys::geometry::{Point, Rect};

/// The screen and tiles a strategy works on for one edit.
///
/// For gravity-aware strategies both are already rotated into bottom-gravity
/// space, so a strategy never needs to know which way the screen is turned.
pub struct TileFrame<'a> {
    pub screen: Rect,
    pub tiles: &'a mut Vec<Tile>,
}

/// A tiling algorithm.
///
/// The wrapping [`super::Layout`] validates indices before calling in and
/// owns the tile storage; strategies only keep their own bookkeeping.
#[enum_dispatch]
pub trait LayoutStrategy {
    fn name(&self) -> &'static str;
    fn kind(&self) -> LayoutKind;

    /// Inserts one tile, lays the screen out again and returns the new index.
    fn add_tile(&mut self, frame: TileFrame<'_>, at: Option<Point>) -> usize;

    /// Removes tile `index`, which the caller has checked to be in range.
    fn remove_tile(&mut self, frame: TileFrame<'_>, index: usize);

    fn resize_tile(
        &mut self,
        frame: TileFrame<'_>,
        index: usize,
        rect: Rect,
    ) -> Result<(), LayoutError> {
        propagate_resize(frame.screen, frame.tiles, index, rect)
    }

    fn set_layout_area(&mut self, frame: TileFrame<'_>, area: Rect) -> Result<(), LayoutError> {
        rescale_tiles(frame.tiles, frame.screen, area)
    }

    fn increase_master(&mut self, _frame: TileFrame<'_>) -> bool { false }
    fn decrement_master(&mut self, _frame: TileFrame<'_>) -> bool { false }
    /// Configured master count. May exceed the number of tiles.
    fn master_count(&self) -> usize { 0 }

    fn set_split_mode(&mut self, _mode: SplitMode) -> bool { false }

    /// Drops per-layout state before the tiles are replayed from scratch.
    fn reset(&mut self, _screen: Rect) {}

    /// Whether edits should run in bottom-gravity space.
    fn uses_gravity(&self) -> bool { true }

    fn draw_tree(&self) -> Option<String> { None }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[enum_dispatch(LayoutStrategy)]
pub enum LayoutStrategyKind {
    Half(HalfLayout),
    Grid(GridLayout),
    Spiral(SpiralLayout),
    Blade(BladeLayout),
    I3(I3Layout),
}

impl LayoutStrategyKind {
    pub fn new(kind: LayoutKind, screen: Rect, settings: &LayoutSettings) -> Self {
        match kind {
            LayoutKind::Half => HalfLayout::new(settings).into(),
            LayoutKind::Grid => GridLayout::new(settings).into(),
            LayoutKind::Spiral => SpiralLayout::default().into(),
            LayoutKind::Blade => BladeLayout::default().into(),
            LayoutKind::I3 => I3Layout::new(settings.split_orientation, screen).into(),
        }
    }
}

mod blade;
mod grid;
mod half;
mod i3;
mod master;
mod spiral;

pub use blade::BladeLayout;
pub use grid::{GridLayout, get_grid_measurements, grid_cell};
pub use half::HalfLayout;
pub use i3::{I3Layout, SplitMode};
pub use spiral::SpiralLayout;
