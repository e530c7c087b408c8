//! The shared half of every layout: tile storage, gravity, and the edits
//! whose behaviour does not depend on the algorithm.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::error::{LayoutError, check_index};
use super::gravity::{Gravity, Rotation};
use super::systems::{LayoutStrategy, LayoutStrategyKind, SplitMode, TileFrame};
use super::LayoutKind;
use crate::common::config::LayoutSettings;
use crate::sys::geometry::{Edges, Point, Rect, SameAs};

/// One slot of a layout. Its position in [`Layout::tiles`] is its index,
/// which shifts whenever an earlier tile is added or removed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub rect: Rect,
}

impl Tile {
    pub fn new(rect: Rect) -> Self { Tile { rect } }
}

#[derive(Serialize, Deserialize)]
pub struct Layout {
    screen: Rect,
    tiles: Vec<Tile>,
    gravity: Gravity,
    auto_rotate_portrait: bool,
    strategy: LayoutStrategyKind,
    /// Set while tiles and screen are rotated into bottom-gravity space.
    #[serde(skip)]
    rotation: Option<Rotation>,
}

impl Layout {
    pub fn new(kind: LayoutKind, screen: Rect, settings: &LayoutSettings) -> Self {
        Layout {
            screen,
            tiles: Vec::new(),
            gravity: settings.gravity,
            auto_rotate_portrait: settings.auto_rotate_portrait,
            strategy: LayoutStrategyKind::new(kind, screen, settings),
            rotation: None,
        }
    }

    pub fn name(&self) -> &'static str { self.strategy.name() }

    pub fn kind(&self) -> LayoutKind { self.strategy.kind() }

    pub fn screen(&self) -> Rect { self.screen }

    pub fn tiles(&self) -> &[Tile] { &self.tiles }

    pub fn rects(&self) -> Vec<Rect> { self.tiles.iter().map(|t| t.rect).collect() }

    pub fn len(&self) -> usize { self.tiles.len() }

    pub fn is_empty(&self) -> bool { self.tiles.is_empty() }

    pub fn gravity(&self) -> Gravity { self.gravity }

    /// Index of the first master tile, if this layout has masters right now.
    pub fn master_index(&self) -> Option<usize> { (self.master_count() > 0).then_some(0) }

    pub fn master_count(&self) -> usize { self.strategy.master_count().min(self.tiles.len()) }

    pub fn draw_tree(&self) -> Option<String> { self.strategy.draw_tree() }

    /// Adds a tile, optionally at a screen position, and returns its index.
    #[instrument(level = "debug", skip(self), fields(layout = self.name()))]
    pub fn add_tile(&mut self, at: Option<Point>) -> usize {
        let at = if self.strategy.uses_gravity() {
            at.map(|p| self.screen_rotation().apply_point(p))
        } else {
            at
        };
        let index = self.with_gravity(|strategy, frame| strategy.add_tile(frame, at));
        debug!(index, tiles = self.tiles.len(), "added tile");
        index
    }

    #[instrument(level = "debug", skip(self), fields(layout = self.name()))]
    pub fn remove_tile(&mut self, index: usize) -> Result<(), LayoutError> {
        check_index(index, self.tiles.len()).inspect_err(|e| warn!("{e}"))?;
        self.with_gravity(|strategy, frame| strategy.remove_tile(frame, index));
        Ok(())
    }

    /// Moves the edges of tile `index` to those of `rect` and drags every
    /// tile sharing a moved edge along with it.
    #[instrument(level = "debug", skip(self), fields(layout = self.name()))]
    pub fn resize_tile(&mut self, index: usize, rect: Rect) -> Result<(), LayoutError> {
        let frame = TileFrame { screen: self.screen, tiles: &mut self.tiles };
        self.strategy.resize_tile(frame, index, rect).inspect_err(|e| warn!("resize refused: {e}"))
    }

    /// Moves the layout to a new area, scaling every tile with it.
    #[instrument(level = "debug", skip(self), fields(layout = self.name()))]
    pub fn set_layout_area(&mut self, area: Rect) -> Result<(), LayoutError> {
        if self.screen.is_empty() || area.is_empty() {
            warn!(old = ?self.screen, "cannot rescale between empty areas");
            return Err(LayoutError::DegenerateGeometry);
        }
        let turns = self.quarter_turns();
        let frame = TileFrame { screen: self.screen, tiles: &mut self.tiles };
        self.strategy.set_layout_area(frame, area)?;
        self.screen = area;
        if self.strategy.uses_gravity() && self.quarter_turns() != turns {
            debug!("screen orientation flipped, rebuilding tiles");
            self.reset_tile_sizes();
        }
        Ok(())
    }

    /// Forgets every size the user dragged and lays the same number of tiles
    /// out from scratch.
    pub fn reset_tile_sizes(&mut self) {
        let count = self.tiles.len();
        self.strategy.reset(self.screen);
        self.tiles.clear();
        for _ in 0..count {
            self.add_tile(None);
        }
    }

    pub fn increase_master(&mut self) -> bool {
        self.with_gravity(|strategy, frame| strategy.increase_master(frame))
    }

    pub fn decrement_master(&mut self) -> bool {
        self.with_gravity(|strategy, frame| strategy.decrement_master(frame))
    }

    pub fn set_split_mode(&mut self, mode: SplitMode) -> bool { self.strategy.set_split_mode(mode) }

    pub fn set_gravity(&mut self, gravity: Gravity) {
        if self.gravity == gravity {
            return;
        }
        self.gravity = gravity;
        if self.strategy.uses_gravity() {
            self.reset_tile_sizes();
        }
    }

    /// Rotates screen and tiles into bottom-gravity space. Does nothing when
    /// they are already rotated.
    pub fn apply_gravity(&mut self) {
        if self.rotation.is_some() {
            return;
        }
        let rotation = self.screen_rotation();
        self.transform(rotation);
        self.rotation = Some(rotation);
    }

    /// Undoes [`Self::apply_gravity`].
    pub fn unapply_gravity(&mut self) {
        if let Some(rotation) = self.rotation.take() {
            self.transform(rotation.inverse());
        }
    }

    fn transform(&mut self, rotation: Rotation) {
        if rotation.is_identity() {
            return;
        }
        self.screen = rotation.apply(self.screen);
        for tile in &mut self.tiles {
            tile.rect = rotation.apply(tile.rect);
        }
    }

    fn quarter_turns(&self) -> u8 {
        let portrait = self.auto_rotate_portrait && self.screen.height > self.screen.width;
        (self.gravity.quarter_turns() + u8::from(portrait)) % 4
    }

    fn screen_rotation(&self) -> Rotation { Rotation::around(self.screen, self.quarter_turns()) }

    fn with_gravity<R>(
        &mut self,
        f: impl FnOnce(&mut LayoutStrategyKind, TileFrame<'_>) -> R,
    ) -> R {
        let rotate = self.strategy.uses_gravity();
        if rotate {
            self.apply_gravity();
        }
        let result = f(&mut self.strategy, TileFrame {
            screen: self.screen,
            tiles: &mut self.tiles,
        });
        if rotate {
            self.unapply_gravity();
        }
        result
    }
}

/// Scales every tile from `old` to `new`, keeping edges that sat on the old
/// border glued to the new border.
///
/// Edges are mapped rather than sizes, so two tiles that shared an edge before
/// still share it afterwards.
pub(crate) fn rescale_tiles(tiles: &mut [Tile], old: Rect, new: Rect) -> Result<(), LayoutError> {
    if old.is_empty() || new.is_empty() {
        return Err(LayoutError::DegenerateGeometry);
    }
    let xs = new.width / old.width;
    let ys = new.height / old.height;
    let map_x = |v: f64| new.x + ((v - old.x) * xs).floor();
    let map_y = |v: f64| new.y + ((v - old.y) * ys).floor();
    for tile in tiles {
        let r = tile.rect;
        let on = r.edges_on(&old);
        let pick = |edge: Edges, anchored: f64, scaled: f64| {
            if on.contains(edge) { anchored } else { scaled }
        };
        tile.rect = Rect::from_edges(
            pick(Edges::LEFT, new.left(), map_x(r.left())),
            pick(Edges::TOP, new.top(), map_y(r.top())),
            pick(Edges::RIGHT, new.right(), map_x(r.right())),
            pick(Edges::BOTTOM, new.bottom(), map_y(r.bottom())),
        );
    }
    Ok(())
}

/// Drag-resize shared by every layout.
///
/// Adjacency is inferred from coordinates: when an edge of tile `index`
/// moves, every other tile with an edge on the old coordinate (on either
/// side) follows. Edges on the screen border never move. Nothing is changed
/// unless every resulting tile keeps a positive size.
pub(crate) fn propagate_resize(
    screen: Rect,
    tiles: &mut [Tile],
    index: usize,
    rect: Rect,
) -> Result<(), LayoutError> {
    check_index(index, tiles.len())?;
    if tiles.len() == 1 {
        return Err(LayoutError::SingleTile);
    }
    let wanted = rect.intersection(&screen).ok_or(LayoutError::OffScreen)?;
    if wanted.is_empty() {
        return Err(LayoutError::DegenerateGeometry);
    }

    let old = tiles[index].rect;
    let border = old.edges_on(&screen);
    let mut edges: Vec<[f64; 4]> = tiles.iter().map(|t| sides(t.rect)).collect();
    let before = sides(old);
    let after = sides(wanted);

    for (side, edge) in [Edges::LEFT, Edges::TOP, Edges::RIGHT, Edges::BOTTOM].into_iter().enumerate() {
        let (from, to) = (before[side], after[side]);
        if border.contains(edge) || from.same_as(to) {
            continue;
        }
        edges[index][side] = to;
        // Left/right are slots 0 and 2, top/bottom 1 and 3.
        let axis = side % 2;
        for (i, other) in edges.iter_mut().enumerate() {
            if i == index {
                continue;
            }
            for slot in [axis, axis + 2] {
                if other[slot].same_as(from) {
                    other[slot] = to;
                }
            }
        }
    }

    let resized: Vec<Rect> = edges.iter().map(|&[l, t, r, b]| Rect::from_edges(l, t, r, b)).collect();
    if resized.iter().any(Rect::is_empty) {
        return Err(LayoutError::DegenerateGeometry);
    }
    for (tile, rect) in tiles.iter_mut().zip(resized) {
        tile.rect = rect;
    }
    Ok(())
}

fn sides(rect: Rect) -> [f64; 4] { [rect.left(), rect.top(), rect.right(), rect.bottom()] }

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_log::test;

    use super::*;

    fn tiles(rects: &[Rect]) -> Vec<Tile> { rects.iter().copied().map(Tile::new).collect() }

    fn rects(tiles: &[Tile]) -> Vec<Rect> { tiles.iter().map(|t| t.rect).collect() }

    const SCREEN: Rect = Rect::new(0.0, 0.0, 1000.0, 800.0);

    fn master_stack() -> Vec<Tile> {
        tiles(&[
            Rect::new(0.0, 0.0, 500.0, 800.0),
            Rect::new(500.0, 0.0, 500.0, 400.0),
            Rect::new(500.0, 400.0, 500.0, 400.0),
        ])
    }

    #[test]
    fn dragging_shared_edge_moves_both_sides() {
        let mut t = master_stack();
        propagate_resize(SCREEN, &mut t, 0, Rect::new(0.0, 0.0, 600.0, 800.0)).unwrap();
        assert_eq!(
            rects(&t),
            vec![
                Rect::new(0.0, 0.0, 600.0, 800.0),
                Rect::new(600.0, 0.0, 400.0, 400.0),
                Rect::new(600.0, 400.0, 400.0, 400.0),
            ]
        );
    }

    #[test]
    fn dragging_moves_tiles_sharing_the_same_edge() {
        let mut t = master_stack();
        // Drag the left edge of the top slave; the bottom slave shares it.
        propagate_resize(SCREEN, &mut t, 1, Rect::new(450.0, 0.0, 550.0, 400.0)).unwrap();
        assert_eq!(
            rects(&t),
            vec![
                Rect::new(0.0, 0.0, 450.0, 800.0),
                Rect::new(450.0, 0.0, 550.0, 400.0),
                Rect::new(450.0, 400.0, 550.0, 400.0),
            ]
        );
    }

    #[test]
    fn screen_border_edges_stay_put() {
        let mut t = master_stack();
        propagate_resize(SCREEN, &mut t, 0, Rect::new(100.0, 50.0, 400.0, 700.0)).unwrap();
        assert_eq!(rects(&t), rects(&master_stack()));
    }

    #[test]
    fn horizontal_edge_propagates_to_stack_neighbour() {
        let mut t = master_stack();
        propagate_resize(SCREEN, &mut t, 2, Rect::new(500.0, 300.0, 500.0, 500.0)).unwrap();
        assert_eq!(t[1].rect, Rect::new(500.0, 0.0, 500.0, 300.0));
        assert_eq!(t[2].rect, Rect::new(500.0, 300.0, 500.0, 500.0));
        assert_eq!(t[0].rect, Rect::new(0.0, 0.0, 500.0, 800.0));
    }

    #[test]
    fn resize_rejections_leave_tiles_untouched() {
        let mut t = master_stack();
        assert_eq!(
            propagate_resize(SCREEN, &mut t, 3, SCREEN),
            Err(LayoutError::InvalidIndex { index: 3, len: 3 })
        );
        assert_eq!(
            propagate_resize(SCREEN, &mut t, 0, Rect::new(2000.0, 0.0, 10.0, 10.0)),
            Err(LayoutError::OffScreen)
        );
        assert_eq!(
            propagate_resize(SCREEN, &mut t, 0, Rect::new(1000.0, 0.0, 10.0, 10.0)),
            Err(LayoutError::DegenerateGeometry)
        );
        // Pushing the master edge past the slaves would collapse them.
        assert_eq!(
            propagate_resize(SCREEN, &mut t, 0, Rect::new(0.0, 0.0, 1000.0, 800.0)),
            Err(LayoutError::DegenerateGeometry)
        );
        assert_eq!(rects(&t), rects(&master_stack()));

        let mut single = tiles(&[SCREEN]);
        assert_eq!(
            propagate_resize(SCREEN, &mut single, 0, Rect::new(0.0, 0.0, 10.0, 10.0)),
            Err(LayoutError::SingleTile)
        );
    }

    #[test]
    fn rescale_keeps_edges_shared_and_anchored() {
        let mut t = tiles(&[
            Rect::new(0.0, 0.0, 333.0, 800.0),
            Rect::new(333.0, 0.0, 333.0, 800.0),
            Rect::new(666.0, 0.0, 334.0, 800.0),
        ]);
        rescale_tiles(&mut t, SCREEN, Rect::new(10.0, 20.0, 1500.0, 600.0)).unwrap();
        assert_eq!(
            rects(&t),
            vec![
                Rect::new(10.0, 20.0, 499.0, 600.0),
                Rect::new(509.0, 20.0, 500.0, 600.0),
                Rect::new(1009.0, 20.0, 501.0, 600.0),
            ]
        );
    }

    #[test]
    fn rescale_from_empty_area_is_refused() {
        let mut t = master_stack();
        assert_eq!(
            rescale_tiles(&mut t, Rect::new(0.0, 0.0, 0.0, 800.0), SCREEN),
            Err(LayoutError::DegenerateGeometry)
        );
        assert_eq!(rects(&t), rects(&master_stack()));
    }
}
