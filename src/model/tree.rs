use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Represents a node somewhere in the tree.
    pub struct NodeId;
}

/// N-ary tree stored in an arena.
///
/// Every node carries a payload of type `T`, a link to its parent and an
/// ordered list of children. Several roots may live in the same arena; a node
/// without a parent is either a root or not yet attached.
#[derive(Clone, Serialize, Deserialize)]
pub struct Tree<T> {
    map: SlotMap<NodeId, Node<T>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node<T> {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: T,
}

impl<T> Default for Tree<T> {
    fn default() -> Self { Tree { map: SlotMap::default() } }
}

impl<T> Tree<T> {
    pub fn new() -> Self { Self::default() }

    /// Creates an unattached node.
    pub fn mk_node(&mut self, data: T) -> NodeId {
        self.map.insert(Node { parent: None, children: Vec::new(), data })
    }

    pub fn len(&self) -> usize { self.map.len() }

    pub fn is_empty(&self) -> bool { self.map.is_empty() }

    pub fn contains(&self, id: NodeId) -> bool { self.map.contains_key(id) }

    pub fn get(&self, id: NodeId) -> Option<&T> { self.map.get(id).map(|n| &n.data) }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.map.get_mut(id).map(|n| &mut n.data)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> { self.map.get(id).and_then(|n| n.parent) }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.map.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Position of `id` among its parent's children.
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    /// Inserts an unattached `child` under `parent` at `index`, clamped to the
    /// current child count. Returns the position actually used.
    ///
    /// Attaching a node that already has a parent, or attaching a node below
    /// itself, is refused and returns `None`.
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) -> Option<usize> {
        if parent == child || !self.contains(parent) || !self.contains(child) {
            return None;
        }
        if self.parent(child).is_some() || self.ancestors(parent).any(|a| a == child) {
            return None;
        }
        let siblings = &mut self.map[parent].children;
        let index = index.min(siblings.len());
        siblings.insert(index, child);
        self.map[child].parent = Some(parent);
        Some(index)
    }

    pub fn push_back(&mut self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.insert_child(parent, usize::MAX, child)
    }

    /// Unlinks `id` from its parent, keeping its subtree alive.
    /// Returns the position it occupied.
    pub fn detach(&mut self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)?;
        self.map[parent].children.remove(index);
        self.map[id].parent = None;
        Some(index)
    }

    /// Puts unattached `new` where `old` is and detaches `old`.
    pub fn replace(&mut self, old: NodeId, new: NodeId) -> bool {
        if old == new || self.parent(new).is_some() || !self.contains(new) {
            return false;
        }
        let Some(parent) = self.parent(old) else {
            return false;
        };
        let Some(index) = self.detach(old) else {
            return false;
        };
        self.insert_child(parent, index, new).is_some()
    }

    /// Detaches `id` and deletes it together with its whole subtree.
    /// Returns the payloads that were removed, in postorder.
    pub fn remove(&mut self, id: NodeId) -> Vec<T> {
        if !self.contains(id) {
            return Vec::new();
        }
        self.detach(id);
        let doomed: Vec<_> = self.traverse_postorder(id).collect();
        doomed.into_iter().filter_map(|n| self.map.remove(n)).map(|n| n.data).collect()
    }

    pub fn traverse_preorder(&self, root: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        PreorderTraversal::new(self, root)
    }

    pub fn traverse_postorder(&self, root: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        PostorderTraversal::new(self, root)
    }

    /// Returns an iterator over all ancestors of the node, including itself.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut next = self.contains(id).then_some(id);
        std::iter::from_fn(move || {
            let node = next;
            next = node.and_then(|n| self.parent(n));
            node
        })
    }
}

struct PreorderTraversal<'a, T> {
    stack: Vec<NodeId>,
    tree: &'a Tree<T>,
}

impl<'a, T> PreorderTraversal<'a, T> {
    fn new(tree: &'a Tree<T>, root: NodeId) -> Self {
        let stack = if tree.contains(root) { vec![root] } else { vec![] };
        Self { stack, tree }
    }
}

impl<'a, T> Iterator for PreorderTraversal<'a, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(self.tree.children(node).iter().rev().copied());
        Some(node)
    }
}

struct PostorderTraversal<'a, T> {
    // (node, index of the next child to visit)
    stack: Vec<(NodeId, usize)>,
    tree: &'a Tree<T>,
}

impl<'a, T> PostorderTraversal<'a, T> {
    fn new(tree: &'a Tree<T>, root: NodeId) -> Self {
        let stack = if tree.contains(root) { vec![(root, 0)] } else { vec![] };
        Self { stack, tree }
    }
}

impl<'a, T> Iterator for PostorderTraversal<'a, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (node, next_child) = self.stack.last_mut()?;
            let node = *node;
            if let Some(&child) = self.tree.children(node).get(*next_child) {
                *next_child += 1;
                self.stack.push((child, 0));
            } else {
                self.stack.pop();
                return Some(node);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A tree with the following structure:
    /// ```text
    ///         [tree]              [other_tree]
    ///        __root__              other_root
    ///       /    |   \
    /// child1  child2  child3
    ///            |
    ///           gc1
    /// ```
    struct TestTree {
        tree: Tree<&'static str>,
        root: NodeId,
        child1: NodeId,
        child2: NodeId,
        child3: NodeId,
        gc1: NodeId,
        other_root: NodeId,
    }

    impl TestTree {
        #[rustfmt::skip]
        fn new() -> Self {
            let mut tree = Tree::new();
            let root = tree.mk_node("root");
            let child1 = tree.mk_node("child1");
            let child2 = tree.mk_node("child2");
            let child3 = tree.mk_node("child3");
            let gc1 = tree.mk_node("gc1");
            tree.push_back(root, child1).unwrap();
            tree.push_back(root, child2).unwrap();
            tree.push_back(root, child3).unwrap();
            tree.push_back(child2, gc1).unwrap();
            let other_root = tree.mk_node("other_root");

            TestTree { tree, root, child1, child2, child3, gc1, other_root }
        }

        #[track_caller]
        fn assert_children_are<const N: usize>(&self, children: [NodeId; N], parent: NodeId) {
            assert_eq!(children.as_slice(), self.tree.children(parent), "children did not match");
            for child in self.tree.children(parent) {
                assert_eq!(self.tree.parent(*child), Some(parent), "child has incorrect parent");
            }
        }
    }

    #[test]
    fn children() {
        let t = TestTree::new();
        t.assert_children_are([t.child1, t.child2, t.child3], t.root);
        t.assert_children_are([t.gc1], t.child2);
        t.assert_children_are([], t.child1);
        t.assert_children_are([], t.other_root);
        assert_eq!(t.tree.get(t.gc1), Some(&"gc1"));
    }

    #[test]
    fn ancestors() {
        let t = TestTree::new();
        let ancestors = |node: NodeId| t.tree.ancestors(node).collect::<Vec<_>>();
        assert_eq!([t.child1, t.root], *ancestors(t.child1));
        assert_eq!([t.gc1, t.child2, t.root], *ancestors(t.gc1));
        assert_eq!([t.root], *ancestors(t.root));
        assert_eq!([t.other_root], *ancestors(t.other_root));
    }

    #[test]
    fn traverse_postorder() {
        let t = TestTree::new();
        let traverse = |node: NodeId| t.tree.traverse_postorder(node).collect::<Vec<_>>();
        assert_eq!([t.child1, t.gc1, t.child2, t.child3, t.root], *traverse(t.root));
        assert_eq!([t.child1], *traverse(t.child1));
    }

    #[test]
    fn traverse_preorder() {
        let t = TestTree::new();
        let traverse = |node: NodeId| t.tree.traverse_preorder(node).collect::<Vec<_>>();
        assert_eq!([t.root, t.child1, t.child2, t.gc1, t.child3], *traverse(t.root));
        assert_eq!([t.child1], *traverse(t.child1));
    }

    #[test]
    fn insert_child_clamps_index() {
        let mut t = TestTree::new();
        let first = t.tree.mk_node("first");
        let last = t.tree.mk_node("last");
        assert_eq!(Some(0), t.tree.insert_child(t.root, 0, first));
        assert_eq!(Some(4), t.tree.insert_child(t.root, 99, last));
        t.assert_children_are([first, t.child1, t.child2, t.child3, last], t.root);
    }

    #[test]
    fn attached_nodes_cannot_be_attached_twice() {
        let mut t = TestTree::new();
        assert_eq!(None, t.tree.push_back(t.child3, t.child1));
        assert_eq!(None, t.tree.push_back(t.root, t.root));
        t.assert_children_are([t.child1, t.child2, t.child3], t.root);
    }

    #[test]
    fn cycles_are_refused() {
        let mut t = TestTree::new();
        t.tree.detach(t.child2);
        // gc1 is below child2, so child2 cannot go below gc1.
        assert_eq!(None, t.tree.push_back(t.gc1, t.child2));
        t.assert_children_are([t.gc1], t.child2);
    }

    #[test]
    fn detach_keeps_subtree() {
        let mut t = TestTree::new();
        assert_eq!(Some(1), t.tree.detach(t.child2));
        t.assert_children_are([t.child1, t.child3], t.root);
        assert_eq!(None, t.tree.parent(t.child2));
        t.assert_children_are([t.gc1], t.child2);
        assert!(t.tree.contains(t.gc1));
    }

    #[test]
    fn replace() {
        let mut t = TestTree::new();
        let wrapper = t.tree.mk_node("wrapper");
        assert!(t.tree.replace(t.child2, wrapper));
        t.assert_children_are([t.child1, wrapper, t.child3], t.root);
        assert_eq!(None, t.tree.parent(t.child2));
        t.tree.push_back(wrapper, t.child2).unwrap();
        t.assert_children_are([t.child2], wrapper);
        assert_eq!([t.gc1, t.child2, wrapper, t.root], *t.tree.ancestors(t.gc1).collect::<Vec<_>>());
    }

    #[test]
    fn replace_root_fails() {
        let mut t = TestTree::new();
        let other = t.tree.mk_node("other");
        assert!(!t.tree.replace(t.root, other));
        assert_eq!(None, t.tree.parent(other));
    }

    #[test]
    fn remove() {
        let mut t = TestTree::new();
        let removed = t.tree.remove(t.child2);
        assert_eq!(vec!["gc1", "child2"], removed);
        t.assert_children_are([t.child1, t.child3], t.root);
        assert!(!t.tree.contains(t.child2));
        assert!(!t.tree.contains(t.gc1));

        t.tree.remove(t.root);
        assert!(!t.tree.contains(t.child1));
        assert!(!t.tree.contains(t.child3));
        assert!(t.tree.contains(t.other_root));
        assert_eq!(1, t.tree.len());
    }

    #[test]
    fn removed_ids_are_not_reused_as_valid() {
        let mut t = TestTree::new();
        let gc1 = t.gc1;
        t.tree.remove(gc1);
        assert_eq!(None, t.tree.get(gc1));
        assert!(t.tree.children(gc1).is_empty());
        assert_eq!(0, t.tree.ancestors(gc1).count());
        assert_eq!(0, t.tree.traverse_preorder(gc1).count());
    }

    #[test]
    fn empty_tree_operations() {
        let tree: Tree<()> = Tree::new();
        assert!(tree.is_empty());
        assert!(!tree.contains(NodeId::default()));
    }
}
