use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{LayoutStrategy, TileFrame};
use crate::layout_engine::container::ContainerTree;
use crate::layout_engine::error::LayoutError;
use crate::layout_engine::layout::{Tile, propagate_resize};
use crate::layout_engine::{LayoutKind, Orientation};
use crate::model::tree::NodeId;
use crate::sys::geometry::{Point, Rect};

/// How the next tile added over an existing one is placed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[derive(strum_macros::Display, strum_macros::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SplitMode {
    /// Next to the tile, inside the same container.
    #[default]
    Normal,
    /// Split the tile side by side.
    HorizontalWrap,
    /// Split the tile top and bottom.
    VerticalWrap,
}

impl SplitMode {
    fn wrap_orientation(self) -> Option<Orientation> {
        match self {
            SplitMode::Normal => None,
            SplitMode::HorizontalWrap => Some(Orientation::Horizontal),
            SplitMode::VerticalWrap => Some(Orientation::Vertical),
        }
    }
}

/// Manual splits, i3 style. The split tree is the source of truth; the
/// tile list mirrors its leaves in preorder.
#[derive(Clone, Serialize, Deserialize)]
pub struct I3Layout {
    tree: ContainerTree,
    orientation: Orientation,
    mode: SplitMode,
}

impl I3Layout {
    pub fn new(orientation: Orientation, screen: Rect) -> Self {
        I3Layout {
            tree: ContainerTree::new(orientation, screen),
            orientation,
            mode: SplitMode::Normal,
        }
    }

    pub fn tree(&self) -> &ContainerTree { &self.tree }

    pub fn mode(&self) -> SplitMode { self.mode }

    fn sync(&self, tiles: &mut Vec<Tile>) {
        tiles.clear();
        tiles.extend(self.tree.leaves().into_iter().map(|leaf| Tile::new(self.tree.rect(leaf))));
    }

    fn target_at(&self, point: Point) -> Option<Target> {
        let node = self.tree.leaf_at(point)?;
        let parent = self.tree.find_parent_container(node)?;
        let position = self.tree.children(parent).iter().position(|&c| c == node)?;
        Some(Target { node, parent, position })
    }

    /// Places `leaf` relative to `target` according to `mode`, returning the
    /// container that needs its children laid out again.
    fn place_next_to(
        &mut self,
        Target { node, parent, position }: Target,
        leaf: NodeId,
        mode: SplitMode,
    ) -> Result<NodeId, LayoutError> {
        match mode.wrap_orientation() {
            None => {
                self.tree.add_node(parent, leaf, position + 1)?;
                Ok(parent)
            }
            Some(orientation) if self.tree.children(parent).len() <= 1 => {
                debug!(%orientation, "split of lone tile turns its container");
                self.tree.set_orientation(parent, orientation);
                self.tree.add_node(parent, leaf, position + 1)?;
                Ok(parent)
            }
            Some(orientation) => {
                let container = self.tree.wrap(node, orientation).ok_or(LayoutError::NotAChild)?;
                self.tree.add_node(container, leaf, 1)?;
                Ok(container)
            }
        }
    }
}

/// A leaf together with where it sits in its container.
struct Target {
    node: NodeId,
    parent: NodeId,
    position: usize,
}

impl LayoutStrategy for I3Layout {
    fn name(&self) -> &'static str { "i3" }

    fn kind(&self) -> LayoutKind { LayoutKind::I3 }

    fn add_tile(&mut self, frame: TileFrame<'_>, at: Option<Point>) -> usize {
        let mode = std::mem::take(&mut self.mode);
        let leaf = self.tree.new_leaf(Rect::default());
        let placed = at
            .and_then(|point| self.target_at(point))
            .and_then(|target| self.place_next_to(target, leaf, mode).ok());
        let container = match placed {
            Some(container) => container,
            None => {
                // Nothing under the point: append at the end.
                let root = self.tree.root();
                if let Err(e) = self.tree.add_node(root, leaf, usize::MAX) {
                    warn!("cannot append tile to the root: {e}");
                }
                root
            }
        };
        self.tree.recalculate_size(container);
        self.sync(frame.tiles);
        let leaves = self.tree.leaves();
        leaves.iter().position(|&l| l == leaf).unwrap_or(leaves.len().saturating_sub(1))
    }

    fn remove_tile(&mut self, frame: TileFrame<'_>, index: usize) {
        let Some(leaf) = self.tree.leaves().get(index).copied() else {
            return;
        };
        if let Some(parent) = self.tree.find_parent_container(leaf) {
            if self.tree.remove_node(parent, leaf).is_ok() {
                self.tree.recalculate_size(parent);
                self.tree.cleanup();
            }
        }
        self.sync(frame.tiles);
    }

    fn resize_tile(
        &mut self,
        frame: TileFrame<'_>,
        index: usize,
        rect: Rect,
    ) -> Result<(), LayoutError> {
        propagate_resize(frame.screen, frame.tiles, index, rect)?;
        for (leaf, tile) in self.tree.leaves().into_iter().zip(frame.tiles.iter()) {
            self.tree.set_rect(leaf, tile.rect);
        }
        self.tree.update_container_sizes();
        Ok(())
    }

    fn set_layout_area(&mut self, frame: TileFrame<'_>, area: Rect) -> Result<(), LayoutError> {
        if frame.screen.is_empty() || area.is_empty() {
            return Err(LayoutError::DegenerateGeometry);
        }
        self.tree.resize_node(self.tree.root(), area);
        self.sync(frame.tiles);
        Ok(())
    }

    fn set_split_mode(&mut self, mode: SplitMode) -> bool {
        self.mode = mode;
        true
    }

    fn reset(&mut self, screen: Rect) {
        self.tree = ContainerTree::new(self.orientation, screen);
        self.mode = SplitMode::Normal;
    }

    fn uses_gravity(&self) -> bool { false }

    fn draw_tree(&self) -> Option<String> { Some(self.tree.draw_tree()) }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_log::test;

    use super::*;

    const SCREEN: Rect = Rect::new(0.0, 0.0, 1000.0, 800.0);

    struct Fixture {
        i3: I3Layout,
        tiles: Vec<Tile>,
    }

    impl Fixture {
        fn new() -> Self {
            Fixture {
                i3: I3Layout::new(Orientation::Horizontal, SCREEN),
                tiles: Vec::new(),
            }
        }

        fn add(&mut self, at: Option<Point>, mode: SplitMode) -> usize {
            self.i3.set_split_mode(mode);
            self.i3.add_tile(TileFrame { screen: SCREEN, tiles: &mut self.tiles }, at)
        }

        fn remove(&mut self, index: usize) {
            self.i3.remove_tile(TileFrame { screen: SCREEN, tiles: &mut self.tiles }, index)
        }

        fn rects(&self) -> Vec<Rect> { self.tiles.iter().map(|t| t.rect).collect() }
    }

    #[test]
    fn normal_mode_inserts_after_tile_under_point() {
        let mut f = Fixture::new();
        f.add(None, SplitMode::Normal);
        f.add(None, SplitMode::Normal);
        let index = f.add(Some(Point::new(10.0, 10.0)), SplitMode::Normal);
        assert_eq!(index, 1);
        assert_eq!(
            f.rects(),
            vec![
                Rect::new(0.0, 0.0, 333.0, 800.0),
                Rect::new(333.0, 0.0, 333.0, 800.0),
                Rect::new(666.0, 0.0, 334.0, 800.0),
            ]
        );
    }

    #[test]
    fn wrap_mode_splits_the_tile_under_point() {
        let mut f = Fixture::new();
        f.add(None, SplitMode::Normal);
        f.add(None, SplitMode::Normal);
        let index = f.add(Some(Point::new(700.0, 10.0)), SplitMode::VerticalWrap);
        assert_eq!(index, 2);
        assert_eq!(
            f.rects(),
            vec![
                Rect::new(0.0, 0.0, 500.0, 800.0),
                Rect::new(500.0, 0.0, 500.0, 400.0),
                Rect::new(500.0, 400.0, 500.0, 400.0),
            ]
        );
        assert_eq!(f.i3.mode(), SplitMode::Normal);
        let root = f.i3.tree().root();
        assert_eq!(f.i3.tree().children(root).len(), 2);
    }

    #[test]
    fn wrap_on_lone_tile_turns_the_root() {
        let mut f = Fixture::new();
        f.add(None, SplitMode::Normal);
        f.add(Some(Point::new(10.0, 10.0)), SplitMode::VerticalWrap);
        let root = f.i3.tree().root();
        assert_eq!(f.i3.tree().orientation(root), Some(Orientation::Vertical));
        assert_eq!(
            f.rects(),
            vec![Rect::new(0.0, 0.0, 1000.0, 400.0), Rect::new(0.0, 400.0, 1000.0, 400.0)]
        );
    }

    #[test]
    fn mode_resets_even_without_a_target() {
        let mut f = Fixture::new();
        f.add(None, SplitMode::HorizontalWrap);
        assert_eq!(f.i3.mode(), SplitMode::Normal);
        f.add(Some(Point::new(5000.0, 5000.0)), SplitMode::VerticalWrap);
        assert_eq!(f.i3.mode(), SplitMode::Normal);
        assert_eq!(f.tiles.len(), 2);
    }

    #[test]
    fn removing_cleans_up_wrappers() {
        let mut f = Fixture::new();
        f.add(None, SplitMode::Normal);
        f.add(None, SplitMode::Normal);
        f.add(Some(Point::new(700.0, 10.0)), SplitMode::VerticalWrap);
        f.remove(2);
        let tree = f.i3.tree();
        assert_eq!(tree.len(), 3);
        assert_eq!(
            f.rects(),
            vec![Rect::new(0.0, 0.0, 500.0, 800.0), Rect::new(500.0, 0.0, 500.0, 800.0)]
        );
    }

    #[test]
    fn resize_writes_back_into_the_tree() {
        let mut f = Fixture::new();
        f.add(None, SplitMode::Normal);
        f.add(None, SplitMode::Normal);
        f.add(Some(Point::new(700.0, 10.0)), SplitMode::VerticalWrap);
        f.i3
            .resize_tile(
                TileFrame { screen: SCREEN, tiles: &mut f.tiles },
                0,
                Rect::new(0.0, 0.0, 400.0, 800.0),
            )
            .unwrap();
        let tree = f.i3.tree();
        let column = tree.children(tree.root())[1];
        assert_eq!(tree.rect(column), Rect::new(400.0, 0.0, 600.0, 800.0));

        // A later layout pass keeps the dragged proportions.
        f.i3.set_layout_area(TileFrame { screen: SCREEN, tiles: &mut f.tiles }, SCREEN).unwrap();
        assert_eq!(f.tiles[0].rect, Rect::new(0.0, 0.0, 400.0, 800.0));
    }

    #[test]
    fn append_to_a_leaf_root_keeps_the_tree() {
        let saved = ron::ser::to_string(&I3Layout::new(Orientation::Horizontal, SCREEN)).unwrap();
        let saved = saved.replace(char::is_whitespace, "");
        let corrupt = saved.replacen("Container(orientation:horizontal,", "Leaf(", 1);
        assert_ne!(corrupt, saved);

        let mut i3: I3Layout = ron::from_str(&corrupt).unwrap();
        let mut tiles = Vec::new();
        i3.add_tile(TileFrame { screen: SCREEN, tiles: &mut tiles }, None);
        let root = i3.tree().root();
        assert_eq!(i3.tree().leaves(), vec![root]);
        assert_eq!(tiles.len(), 1);
    }

    #[test]
    fn out_of_range_removal_is_ignored() {
        let mut f = Fixture::new();
        f.add(None, SplitMode::Normal);
        f.remove(3);
        assert_eq!(f.rects(), vec![SCREEN]);
    }
}
