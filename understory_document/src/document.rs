// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core document implementation: structure, updates, order and focus queries.

use alloc::vec::Vec;
use core::cmp::Ordering;

use smallvec::SmallVec;

use crate::types::{NodeFlags, NodeId};

/// Root→node chain used for order comparisons. Most UI trees are shallow.
type Path = SmallVec<[NodeId; 16]>;

/// A mirror of the host's element tree.
///
/// The document only tracks structure and focus-related flags. It answers the
/// questions the headless components need from the host: which of two
/// elements comes first in document order, whether an element lies inside a
/// subtree, and which elements can take focus.
///
/// ## Example
///
/// ```rust
/// use core::cmp::Ordering;
/// use understory_document::{Document, NodeFlags};
///
/// let mut doc = Document::new();
/// let list = doc.insert(None, NodeFlags::empty());
/// let b = doc.insert(Some(list), NodeFlags::FOCUSABLE);
/// // Mounted later, but placed before `b`.
/// let a = doc.insert_at(Some(list), 0, NodeFlags::FOCUSABLE);
///
/// assert_eq!(doc.compare(a, b), Ordering::Less);
/// assert!(doc.contains(list, a));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Document {
    /// Element storage; `None` marks a removed element's slot.
    nodes: Vec<Option<Node>>,
    /// Generation last handed out for each slot, so stale ids stay stale.
    generations: Vec<u32>,
    free_list: Vec<usize>,
    /// Top-level elements, in document order.
    roots: Vec<NodeId>,
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    flags: NodeFlags,
}

impl Node {
    fn new(generation: u32, flags: NodeFlags) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            flags,
        }
    }
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new element as the last child of `parent` (or as the last root).
    pub fn insert(&mut self, parent: Option<NodeId>, flags: NodeFlags) -> NodeId {
        self.insert_at(parent, usize::MAX, flags)
    }

    /// Insert a new element at child position `index` of `parent`.
    ///
    /// `index` is clamped to the number of existing children, so
    /// `usize::MAX` appends. A stale `parent` inserts the element as a root.
    pub fn insert_at(&mut self, parent: Option<NodeId>, index: usize, flags: NodeFlags) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, flags));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, flags)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        let id = NodeId::new(idx, generation);
        match parent.filter(|&p| self.is_alive(p)) {
            Some(p) => {
                if let Some(parent_node) = self.node_mut(p) {
                    let at = index.min(parent_node.children.len());
                    parent_node.children.insert(at, id);
                }
                if let Some(node) = self.node_mut(id) {
                    node.parent = Some(p);
                }
            }
            None => {
                let at = index.min(self.roots.len());
                self.roots.insert(at, id);
            }
        }
        id
    }

    /// Remove an element and its subtree.
    ///
    /// Removing a stale id is a no-op.
    pub fn remove(&mut self, id: NodeId) {
        let Some(node) = self.node(id) else {
            return;
        };
        let parent = node.parent;
        let children = node.children.clone();
        match parent {
            Some(p) => {
                if let Some(parent_node) = self.node_mut(p) {
                    parent_node.children.retain(|&c| c != id);
                }
            }
            None => self.roots.retain(|&r| r != id),
        }
        for child in children {
            self.remove_detached(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    fn remove_detached(&mut self, id: NodeId) {
        let Some(node) = self.node(id) else {
            return;
        };
        let children = node.children.clone();
        for child in children {
            self.remove_detached(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Returns `true` if `id` refers to an element that is still in the document.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Returns the parent of an element, or `None` for roots and stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Returns the children of an element, or an empty slice if it is stale.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        match self.node(id) {
            Some(n) => &n.children,
            None => &[],
        }
    }

    /// Returns the flags of an element if the identifier is live.
    pub fn flags(&self, id: NodeId) -> Option<NodeFlags> {
        self.node(id).map(|n| n.flags)
    }

    /// Update element flags.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) {
        if let Some(n) = self.node_mut(id) {
            n.flags = flags;
        }
    }

    /// Returns `true` if `node` is `ancestor` or lies inside its subtree.
    ///
    /// Stale ids are never contained.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        if !self.is_alive(ancestor) {
            return false;
        }
        let mut current = Some(node).filter(|&n| self.is_alive(n));
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.parent_of(n);
        }
        false
    }

    /// Compare two elements by document (pre-order, depth-first) position.
    ///
    /// An ancestor precedes its descendants. Stale ids sort after every live
    /// element and compare equal to each other.
    pub fn compare(&self, a: NodeId, b: NodeId) -> Ordering {
        match (self.is_alive(a), self.is_alive(b)) {
            (false, false) => return Ordering::Equal,
            (false, true) => return Ordering::Greater,
            (true, false) => return Ordering::Less,
            (true, true) => {}
        }
        if a == b {
            return Ordering::Equal;
        }
        let pa = self.path_to(a);
        let pb = self.path_to(b);
        let shared = pa.iter().zip(pb.iter()).take_while(|(x, y)| x == y).count();
        match (pa.get(shared), pb.get(shared)) {
            // One path is a prefix of the other: the ancestor comes first.
            (None, _) => Ordering::Less,
            (_, None) => Ordering::Greater,
            (Some(&da), Some(&db)) => {
                let siblings = match shared.checked_sub(1) {
                    Some(i) => self.children_of(pa[i]),
                    None => self.roots.as_slice(),
                };
                let ia = siblings.iter().position(|&s| s == da);
                let ib = siblings.iter().position(|&s| s == db);
                ia.cmp(&ib)
            }
        }
    }

    fn path_to(&self, id: NodeId) -> Path {
        let mut path = Path::new();
        let mut current = Some(id);
        while let Some(n) = current {
            path.push(n);
            current = self.parent_of(n);
        }
        path.reverse();
        path
    }

    /// Returns `true` if the element can receive focus right now.
    ///
    /// The element must be focusable or tabbable, not disabled, and neither it
    /// nor any ancestor may be hidden.
    pub fn is_focusable(&self, id: NodeId) -> bool {
        let Some(flags) = self.flags(id) else {
            return false;
        };
        if !flags.intersects(NodeFlags::FOCUSABLE | NodeFlags::TABBABLE)
            || flags.contains(NodeFlags::DISABLED)
        {
            return false;
        }
        !self.is_hidden(id)
    }

    /// Returns `true` if the element participates in sequential Tab navigation.
    pub fn is_tabbable(&self, id: NodeId) -> bool {
        self.flags(id)
            .is_some_and(|f| f.contains(NodeFlags::TABBABLE))
            && self.is_focusable(id)
    }

    fn is_hidden(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(n) = current {
            if self
                .flags(n)
                .is_some_and(|f| f.contains(NodeFlags::HIDDEN))
            {
                return true;
            }
            current = self.parent_of(n);
        }
        false
    }

    /// Tabbable elements inside `root` (inclusive), in document order.
    pub fn tabbables_within(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.is_alive(root) {
            return out;
        }
        let mut current = Some(root);
        while let Some(n) = current {
            if !self.contains(root, n) {
                break;
            }
            if self.is_tabbable(n) {
                out.push(n);
            }
            current = self.next_in_order(n);
        }
        out
    }

    fn next_in_order(&self, current: NodeId) -> Option<NodeId> {
        if let Some(&first_child) = self.children_of(current).first() {
            return Some(first_child);
        }
        let mut node = current;
        loop {
            if let Some(next) = self.next_sibling(node) {
                return Some(next);
            }
            node = self.parent_of(node)?;
        }
    }

    fn siblings_of(&self, node: NodeId) -> &[NodeId] {
        match self.parent_of(node) {
            Some(p) => self.children_of(p),
            None => self.roots.as_slice(),
        }
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let siblings = self.siblings_of(node);
        let pos = siblings.iter().position(|&id| id == node)?;
        siblings.get(pos + 1).copied()
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes
            .get(id.idx())
            .and_then(|slot| slot.as_ref())
            .filter(|n| n.generation == id.1)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes
            .get_mut(id.idx())
            .and_then(|slot| slot.as_mut())
            .filter(|n| n.generation == id.1)
    }
}
