//! Split tree behind the manual (i3 style) layout.
//!
//! Containers lay their children out side by side or stacked, leaves stand
//! for tiles. Leaf order in a preorder walk is the tile order of the layout.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::LayoutError;
use super::graph::Orientation;
use super::utils::{fit_spans, split_span};
use crate::model::tree::{NodeId, Tree};
use crate::sys::geometry::{Point, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    Container { orientation: Orientation, rect: Rect },
    Leaf { rect: Rect },
}

impl NodeKind {
    pub fn rect(&self) -> Rect {
        match self {
            NodeKind::Container { rect, .. } | NodeKind::Leaf { rect } => *rect,
        }
    }

    fn rect_mut(&mut self) -> &mut Rect {
        match self {
            NodeKind::Container { rect, .. } | NodeKind::Leaf { rect } => rect,
        }
    }

    pub fn orientation(&self) -> Option<Orientation> {
        match self {
            NodeKind::Container { orientation, .. } => Some(*orientation),
            NodeKind::Leaf { .. } => None,
        }
    }

    pub fn is_leaf(&self) -> bool { matches!(self, NodeKind::Leaf { .. }) }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ContainerTree {
    tree: Tree<NodeKind>,
    root: NodeId,
}

impl ContainerTree {
    pub fn new(orientation: Orientation, rect: Rect) -> Self {
        let mut tree = Tree::new();
        let root = tree.mk_node(NodeKind::Container { orientation, rect });
        ContainerTree { tree, root }
    }

    pub fn root(&self) -> NodeId { self.root }

    pub fn kind(&self, node: NodeId) -> Option<&NodeKind> { self.tree.get(node) }

    pub fn rect(&self, node: NodeId) -> Rect {
        self.tree.get(node).map(NodeKind::rect).unwrap_or_default()
    }

    pub fn set_rect(&mut self, node: NodeId, rect: Rect) {
        if let Some(kind) = self.tree.get_mut(node) {
            *kind.rect_mut() = rect;
        }
    }

    pub fn orientation(&self, node: NodeId) -> Option<Orientation> {
        self.tree.get(node).and_then(NodeKind::orientation)
    }

    pub fn set_orientation(&mut self, node: NodeId, orientation: Orientation) -> bool {
        match self.tree.get_mut(node) {
            Some(NodeKind::Container { orientation: o, .. }) => {
                *o = orientation;
                true
            }
            _ => false,
        }
    }

    pub fn is_container(&self, node: NodeId) -> bool { self.orientation(node).is_some() }

    pub fn children(&self, node: NodeId) -> &[NodeId] { self.tree.children(node) }

    /// Number of nodes in the tree, root included.
    pub fn len(&self) -> usize { self.tree.len() }

    pub fn new_leaf(&mut self, rect: Rect) -> NodeId { self.tree.mk_node(NodeKind::Leaf { rect }) }

    pub fn new_container(&mut self, orientation: Orientation, rect: Rect) -> NodeId {
        self.tree.mk_node(NodeKind::Container { orientation, rect })
    }

    /// Attaches a detached `node` as child `index` of container `parent`.
    pub fn add_node(
        &mut self,
        parent: NodeId,
        node: NodeId,
        index: usize,
    ) -> Result<usize, LayoutError> {
        if !self.is_container(parent) {
            return Err(LayoutError::NotAChild);
        }
        self.tree.insert_child(parent, index, node).ok_or(LayoutError::NotAChild)
    }

    /// Deletes `node` (and anything below it) from `parent`. Sizes are left
    /// alone; callers follow up with [`Self::recalculate_size`] or a cleanup.
    pub fn remove_node(&mut self, parent: NodeId, node: NodeId) -> Result<(), LayoutError> {
        if node == self.root || self.tree.parent(node) != Some(parent) {
            return Err(LayoutError::NotAChild);
        }
        self.tree.remove(node);
        Ok(())
    }

    pub fn find_parent_container(&self, node: NodeId) -> Option<NodeId> { self.tree.parent(node) }

    /// Leaves in tile order.
    pub fn leaves(&self) -> Vec<NodeId> {
        self.tree
            .traverse_preorder(self.root)
            .filter(|&n| self.tree.get(n).is_some_and(NodeKind::is_leaf))
            .collect()
    }

    pub fn leaf_at(&self, point: Point) -> Option<NodeId> {
        self.leaves().into_iter().find(|&leaf| self.rect(leaf).contains(point))
    }

    /// Puts `node` inside a new container of the given orientation that takes
    /// its place and its rectangle. The root cannot be wrapped.
    pub fn wrap(&mut self, node: NodeId, orientation: Orientation) -> Option<NodeId> {
        self.tree.parent(node)?;
        let container = self.new_container(orientation, self.rect(node));
        if !self.tree.replace(node, container) {
            self.tree.remove(container);
            return None;
        }
        self.tree.push_back(container, node);
        Some(container)
    }

    /// Sets every container's rectangle to the union of its children's, leaves first.
    pub fn update_container_sizes(&mut self) {
        let order: Vec<_> = self.tree.traverse_postorder(self.root).collect();
        for node in order {
            if !self.is_container(node) {
                continue;
            }
            let union = self
                .children(node)
                .iter()
                .map(|&c| self.rect(c))
                .reduce(|a, b| a.union(&b));
            if let Some(union) = union {
                self.set_rect(node, union);
            }
        }
    }

    /// Gives `node` a new rectangle and spreads it over the children, each
    /// keeping its current share along the container's axis.
    pub fn resize_node(&mut self, node: NodeId, rect: Rect) {
        let Some(kind) = self.tree.get_mut(node) else {
            return;
        };
        *kind.rect_mut() = rect;
        let NodeKind::Container { orientation, .. } = *kind else {
            return;
        };
        let children = self.children(node).to_vec();
        if children.is_empty() {
            return;
        }
        let weights: Vec<f64> =
            children.iter().map(|&c| axis_len(self.rect(c), orientation)).collect();
        let spans = fit_spans(&weights, axis_start(rect, orientation), axis_len(rect, orientation));
        for (child, span) in children.into_iter().zip(spans) {
            self.resize_node(child, span_rect(rect, orientation, span));
        }
    }

    /// Splits the container's rectangle evenly between its children.
    pub fn recalculate_size(&mut self, node: NodeId) {
        let Some(orientation) = self.orientation(node) else {
            return;
        };
        let rect = self.rect(node);
        let children = self.children(node).to_vec();
        let spans = split_span(axis_start(rect, orientation), axis_len(rect, orientation), children.len());
        for (child, span) in children.into_iter().zip(spans) {
            self.resize_node(child, span_rect(rect, orientation, span));
        }
    }

    /// Restores the structural invariants after removals: no empty containers
    /// below the root, no container with a single child below the root, and
    /// no root whose only child is a container. Runs until nothing changes.
    pub fn cleanup(&mut self) -> bool {
        let mut changed = false;
        while self.cleanup_pass() {
            changed = true;
        }
        changed
    }

    fn cleanup_pass(&mut self) -> bool {
        let mut changed = false;
        let order: Vec<_> = self.tree.traverse_postorder(self.root).collect();
        for node in order {
            if node == self.root || !self.tree.contains(node) || !self.is_container(node) {
                continue;
            }
            let children = self.children(node).to_vec();
            match children[..] {
                [] => {
                    let parent = self.tree.parent(node);
                    self.tree.remove(node);
                    if let Some(parent) = parent {
                        self.resize_node(parent, self.rect(parent));
                    }
                    debug!(?node, "pruned empty container");
                    changed = true;
                }
                [only] => {
                    let rect = self.rect(node);
                    self.tree.detach(only);
                    if !self.tree.replace(node, only) {
                        self.tree.push_back(node, only);
                        continue;
                    }
                    self.tree.remove(node);
                    self.resize_node(only, rect);
                    debug!(?node, ?only, "unwrapped single-child container");
                    changed = true;
                }
                _ => {}
            }
        }

        let root_children = self.children(self.root).to_vec();
        if let [only] = root_children[..] {
            if let Some(orientation) = self.orientation(only) {
                let grandchildren = self.children(only).to_vec();
                for &child in &grandchildren {
                    self.tree.detach(child);
                }
                self.tree.remove(only);
                for child in grandchildren {
                    self.tree.push_back(self.root, child);
                }
                self.set_orientation(self.root, orientation);
                self.resize_node(self.root, self.rect(self.root));
                debug!(?only, %orientation, "spliced container into root");
                changed = true;
            }
        }
        changed
    }

    pub fn draw_tree(&self) -> String {
        let leaves = self.leaves();
        let tree = self.ascii_tree(self.root, &leaves);
        let mut out = String::new();
        let _ = ascii_tree::write_tree(&mut out, &tree);
        out
    }

    fn ascii_tree(&self, node: NodeId, leaves: &[NodeId]) -> ascii_tree::Tree {
        let desc = match self.tree.get(node) {
            Some(NodeKind::Container { orientation, rect }) => {
                format!("{orientation} {}", describe(*rect))
            }
            Some(NodeKind::Leaf { rect }) => match leaves.iter().position(|&l| l == node) {
                Some(index) => format!("tile {index} {}", describe(*rect)),
                None => format!("tile ? {}", describe(*rect)),
            },
            None => format!("{node:?} <missing>"),
        };
        let children: Vec<_> =
            self.children(node).iter().map(|&c| self.ascii_tree(c, leaves)).collect();
        if children.is_empty() {
            ascii_tree::Tree::Leaf(vec![desc])
        } else {
            ascii_tree::Tree::Node(desc, children)
        }
    }
}

fn describe(rect: Rect) -> String {
    format!("[{} {} {}x{}]", rect.x, rect.y, rect.width, rect.height)
}

fn axis_start(rect: Rect, orientation: Orientation) -> f64 {
    match orientation {
        Orientation::Horizontal => rect.x,
        Orientation::Vertical => rect.y,
    }
}

fn axis_len(rect: Rect, orientation: Orientation) -> f64 {
    match orientation {
        Orientation::Horizontal => rect.width,
        Orientation::Vertical => rect.height,
    }
}

fn span_rect(rect: Rect, orientation: Orientation, (start, len): (f64, f64)) -> Rect {
    match orientation {
        Orientation::Horizontal => Rect::new(start, rect.y, len, rect.height),
        Orientation::Vertical => Rect::new(rect.x, start, rect.width, len),
    }
}
