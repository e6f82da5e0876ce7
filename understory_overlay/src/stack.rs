// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The open-instance stack.
//!
//! Every overlay instance (menu, listbox, dialog)
//! registers with one [`OverlayStack`] shared by the whole UI. The stack is
//! the single owner of each instance's open state, which lets it enforce the
//! cross-instance rules no single component can see:
//!
//! - **Mutual exclusion**: opening an instance closes every other open
//!   instance of the same [`OverlayGroup`], except its own ancestors.
//! - **Nesting**: instances record a parent. Closing an instance closes its
//!   open descendants, and [`OverlayStack::top_most`] names the most recently
//!   opened instance so only it reacts to Escape.
//! - **Focus return on eviction**: an evicted instance hands focus back to
//!   its trigger only if focus was still inside it.
//! - **Listener requirements**: the union of listeners wanted by open
//!   instances, which becomes empty the moment the last one closes.
//! - **Close hooks**: an instance closed by another one's operation learns
//!   about it through its [`CloseHook`], so its owner can notify subscribers.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;

use smallvec::SmallVec;
use understory_document::{Document, NodeId};

use crate::listeners::Listeners;

/// Identifier of a registered overlay instance.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayId(u64);

/// Mutual-exclusion group.
///
/// At most one instance per group is open at a time (ancestors excepted). The
/// host decides what groups mean; components ship sensible defaults.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct OverlayGroup(pub u64);

impl OverlayGroup {
    /// Popup lists (menus, listboxes): opening one closes the others.
    pub const POPUP: Self = Self(1);
}

/// Registration parameters for an instance.
#[derive(Clone, Debug, Default)]
pub struct OverlayConfig {
    /// Mutual-exclusion group, if any.
    pub group: Option<OverlayGroup>,
    /// Enclosing instance, for nesting.
    pub parent: Option<OverlayId>,
    /// Global listeners this instance needs while open.
    pub listeners: Listeners,
}

/// An instance that was closed as a side effect of another operation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Dismissal {
    /// The closed instance.
    pub id: OverlayId,
    /// Where focus should go, if it has to move.
    pub restore_focus: Option<NodeId>,
}

/// Closed instances, innermost first.
pub type Closed = SmallVec<[OverlayId; 2]>;

/// Instances evicted by an open.
pub type Dismissals = SmallVec<[Dismissal; 2]>;

/// Callback run when an instance is closed by an operation on another one.
#[derive(Clone)]
pub struct CloseHook(Rc<dyn Fn(OverlayId)>);

impl CloseHook {
    /// Wrap a callback receiving the closed instance's id.
    pub fn new(hook: impl Fn(OverlayId) + 'static) -> Self {
        Self(Rc::new(hook))
    }

    /// Run the callback.
    pub fn call(&self, id: OverlayId) {
        (self.0)(id);
    }
}

impl fmt::Debug for CloseHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CloseHook")
    }
}

#[derive(Clone, Debug)]
struct Entry {
    id: OverlayId,
    group: Option<OverlayGroup>,
    parent: Option<OverlayId>,
    listeners: Listeners,
    trigger: Option<NodeId>,
    containers: SmallVec<[NodeId; 2]>,
    close_hook: Option<CloseHook>,
}

/// Registry of overlay instances and their open state.
#[derive(Clone, Debug, Default)]
pub struct OverlayStack {
    entries: Vec<Entry>,
    /// Open instances, least recently opened first.
    open: Vec<OverlayId>,
    next_id: u64,
}

impl OverlayStack {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a closed instance.
    pub fn register(&mut self, config: OverlayConfig) -> OverlayId {
        self.next_id += 1;
        let id = OverlayId(self.next_id);
        self.entries.push(Entry {
            id,
            group: config.group,
            parent: config.parent,
            listeners: config.listeners,
            trigger: None,
            containers: SmallVec::new(),
            close_hook: None,
        });
        id
    }

    /// Remove an instance (on unmount), closing it and its open descendants.
    ///
    /// Returns the instances that were open. Deregistering twice is a no-op.
    pub fn deregister(&mut self, id: OverlayId) -> Closed {
        let closed = self.close(id);
        self.entries.retain(|e| e.id != id);
        closed
    }

    /// Returns `true` if the instance is registered.
    pub fn is_registered(&self, id: OverlayId) -> bool {
        self.entry(id).is_some()
    }

    /// Set the element focus returns to when the instance closes.
    pub fn set_trigger(&mut self, id: OverlayId, trigger: Option<NodeId>) {
        if let Some(e) = self.entry_mut(id) {
            e.trigger = trigger;
        }
    }

    /// The element focus returns to when the instance closes.
    pub fn trigger(&self, id: OverlayId) -> Option<NodeId> {
        self.entry(id).and_then(|e| e.trigger)
    }

    /// Set the subtrees the instance owns, besides its trigger.
    pub fn set_containers(&mut self, id: OverlayId, containers: &[NodeId]) {
        if let Some(e) = self.entry_mut(id) {
            e.containers = containers.iter().copied().collect();
        }
    }

    /// Set the hook run when another operation closes the instance.
    pub fn set_close_hook(&mut self, id: OverlayId, hook: Option<CloseHook>) {
        if let Some(e) = self.entry_mut(id) {
            e.close_hook = hook;
        }
    }

    /// Hooks of the `closed` instances other than `except`, in the given order.
    ///
    /// Callers run them once the stack is no longer borrowed.
    pub fn close_hooks(
        &self,
        closed: impl IntoIterator<Item = OverlayId>,
        except: OverlayId,
    ) -> SmallVec<[(OverlayId, CloseHook); 2]> {
        closed
            .into_iter()
            .filter(|&id| id != except)
            .filter_map(|id| Some((id, self.entry(id)?.close_hook.clone()?)))
            .collect()
    }

    /// Returns `true` if `node` lies inside the instance: its trigger, its
    /// containers, or anything owned by an open descendant.
    pub fn owns(&self, doc: &Document, id: OverlayId, node: NodeId) -> bool {
        let Some(e) = self.entry(id) else {
            return false;
        };
        let direct = e
            .trigger
            .iter()
            .chain(e.containers.iter())
            .any(|&root| doc.contains(root, node));
        direct
            || self
                .open
                .iter()
                .any(|&child| self.parent_of(child) == Some(id) && self.owns(doc, child, node))
    }

    /// Open an instance.
    ///
    /// Other open instances of the same group are closed first (with their
    /// descendants), unless they are ancestors of `id`. `focused` is the
    /// element that has focus right now; an evicted instance only asks for
    /// focus back on its trigger if `focused` was inside it.
    pub fn open(&mut self, doc: &Document, id: OverlayId, focused: Option<NodeId>) -> Dismissals {
        let mut dismissed = Dismissals::new();
        let Some(group) = self.entry(id).map(|e| e.group) else {
            return dismissed;
        };
        if self.is_open(id) {
            return dismissed;
        }
        if let Some(group) = group {
            let rivals: SmallVec<[OverlayId; 2]> = self
                .open
                .iter()
                .copied()
                .filter(|&other| {
                    self.entry(other).and_then(|e| e.group) == Some(group)
                        && !self.is_ancestor(other, id)
                })
                .collect();
            for rival in rivals {
                let restore_focus = match focused {
                    Some(f) if self.owns(doc, rival, f) => self.trigger(rival),
                    _ => None,
                };
                for closed in self.close(rival) {
                    log::debug!("overlay {closed:?} evicted by {id:?}");
                    dismissed.push(Dismissal {
                        id: closed,
                        restore_focus: if closed == rival { restore_focus } else { None },
                    });
                }
            }
        }
        log::debug!("overlay {id:?} opened");
        self.open.push(id);
        dismissed
    }

    /// Close an instance and its open descendants.
    ///
    /// Returns every instance that was open, innermost first. Closing a
    /// closed instance returns an empty list.
    pub fn close(&mut self, id: OverlayId) -> Closed {
        let mut closed = Closed::new();
        if !self.is_open(id) {
            return closed;
        }
        // Most recently opened first, so descendants close before ancestors.
        let doomed: SmallVec<[OverlayId; 4]> = self
            .open
            .iter()
            .rev()
            .copied()
            .filter(|&other| other == id || self.is_ancestor(id, other))
            .collect();
        for d in doomed {
            self.open.retain(|&o| o != d);
            log::debug!("overlay {d:?} closed");
            closed.push(d);
        }
        closed
    }

    /// Returns `true` if the instance is open.
    pub fn is_open(&self, id: OverlayId) -> bool {
        self.open.contains(&id)
    }

    /// Open instances, least recently opened first.
    pub fn open_instances(&self) -> &[OverlayId] {
        &self.open
    }

    /// The most recently opened instance.
    pub fn top_most(&self) -> Option<OverlayId> {
        self.open.last().copied()
    }

    /// Returns `true` if `id` is open and no instance opened after it is still open.
    pub fn is_top_most(&self, id: OverlayId) -> bool {
        self.top_most() == Some(id)
    }

    /// The registered parent of an instance.
    pub fn parent_of(&self, id: OverlayId) -> Option<OverlayId> {
        self.entry(id).and_then(|e| e.parent)
    }

    /// Returns `true` if `ancestor` is a strict ancestor of `id`.
    pub fn is_ancestor(&self, ancestor: OverlayId, id: OverlayId) -> bool {
        let mut current = self.parent_of(id);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent_of(p);
        }
        false
    }

    /// Listeners wanted by the open instances.
    pub fn listeners(&self) -> Listeners {
        self.open
            .iter()
            .filter_map(|&id| self.entry(id))
            .fold(Listeners::empty(), |acc, e| acc | e.listeners)
    }

    fn entry(&self, id: OverlayId) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    fn entry_mut(&mut self, id: OverlayId) -> Option<&mut Entry> {
        self.entries.iter_mut().find(|e| e.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use understory_document::NodeFlags;

    fn popup(stack: &mut OverlayStack, doc: &mut Document) -> (OverlayId, NodeId, NodeId) {
        let id = stack.register(OverlayConfig {
            group: Some(OverlayGroup::POPUP),
            listeners: Listeners::OUTSIDE_CLICK,
            ..OverlayConfig::default()
        });
        let root = doc.insert(None, NodeFlags::empty());
        let button = doc.insert(Some(root), NodeFlags::CONTROL);
        let items = doc.insert(Some(root), NodeFlags::FOCUSABLE);
        stack.set_trigger(id, Some(button));
        stack.set_containers(id, &[items]);
        (id, button, items)
    }

    #[test]
    fn opening_second_popup_evicts_first_and_restores_focus_when_inside() {
        let mut doc = Document::new();
        let mut stack = OverlayStack::new();
        let (a, a_button, a_items) = popup(&mut stack, &mut doc);
        let (b, _, _) = popup(&mut stack, &mut doc);

        assert!(stack.open(&doc, a, Some(a_button)).is_empty());
        // Focus is still on A's items when B opens (e.g. via a shortcut).
        let dismissed = stack.open(&doc, b, Some(a_items));
        assert_eq!(
            dismissed.as_slice(),
            &[Dismissal {
                id: a,
                restore_focus: Some(a_button)
            }]
        );
        assert!(!stack.is_open(a));
        assert!(stack.is_open(b));
    }

    #[test]
    fn evicted_popup_leaves_focus_alone_when_user_moved_it() {
        let mut doc = Document::new();
        let mut stack = OverlayStack::new();
        let (a, _, _) = popup(&mut stack, &mut doc);
        let (b, b_button, _) = popup(&mut stack, &mut doc);

        stack.open(&doc, a, None);
        // The user clicked B's button, which took focus.
        let dismissed = stack.open(&doc, b, Some(b_button));
        assert_eq!(dismissed[0].restore_focus, None);
    }

    #[test]
    fn different_groups_coexist() {
        let mut doc = Document::new();
        let mut stack = OverlayStack::new();
        let (menu, _, _) = popup(&mut stack, &mut doc);
        let dialog = stack.register(OverlayConfig::default());
        stack.open(&doc, dialog, None);
        stack.open(&doc, menu, None);
        assert_eq!(stack.open_instances(), &[dialog, menu]);
    }

    #[test]
    fn ancestors_in_same_group_are_not_evicted() {
        let doc = Document::new();
        let mut stack = OverlayStack::new();
        let outer = stack.register(OverlayConfig {
            group: Some(OverlayGroup::POPUP),
            ..OverlayConfig::default()
        });
        let inner = stack.register(OverlayConfig {
            group: Some(OverlayGroup::POPUP),
            parent: Some(outer),
            ..OverlayConfig::default()
        });
        stack.open(&doc, outer, None);
        assert!(stack.open(&doc, inner, None).is_empty());
        assert!(stack.is_open(outer));
        assert!(stack.is_top_most(inner));
    }

    #[test]
    fn nested_instances_close_innermost_first() {
        let doc = Document::new();
        let mut stack = OverlayStack::new();
        let a = stack.register(OverlayConfig::default());
        let b = stack.register(OverlayConfig {
            parent: Some(a),
            ..OverlayConfig::default()
        });
        let c = stack.register(OverlayConfig {
            parent: Some(b),
            ..OverlayConfig::default()
        });
        for id in [a, b, c] {
            stack.open(&doc, id, None);
        }
        assert_eq!(stack.top_most(), Some(c));
        assert_eq!(stack.close(c).as_slice(), &[c]);
        assert_eq!(stack.open_instances().len(), 2);
        // Closing the root takes the remaining descendant with it.
        stack.open(&doc, c, None);
        assert_eq!(stack.close(a).as_slice(), &[c, b, a]);
        assert!(stack.open_instances().is_empty());
    }

    #[test]
    fn close_hooks_skip_the_acting_instance() {
        let doc = Document::new();
        let mut stack = OverlayStack::new();
        let outer = stack.register(OverlayConfig::default());
        let inner = stack.register(OverlayConfig {
            parent: Some(outer),
            ..OverlayConfig::default()
        });
        let silent = stack.register(OverlayConfig {
            parent: Some(inner),
            ..OverlayConfig::default()
        });
        for id in [outer, inner] {
            stack.set_close_hook(id, Some(CloseHook::new(|_| {})));
        }
        for id in [outer, inner, silent] {
            stack.open(&doc, id, None);
        }
        let closed = stack.close(outer);
        let hooks = stack.close_hooks(closed, outer);
        let ids: Vec<_> = hooks.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, [inner]);
    }

    #[test]
    fn deregister_while_open_cleans_up() {
        let mut doc = Document::new();
        let mut stack = OverlayStack::new();
        let (a, _, _) = popup(&mut stack, &mut doc);
        stack.open(&doc, a, None);
        assert_eq!(stack.listeners(), Listeners::OUTSIDE_CLICK);
        assert_eq!(stack.deregister(a).as_slice(), &[a]);
        assert!(!stack.is_registered(a));
        assert!(stack.listeners().is_empty());
        assert!(stack.deregister(a).is_empty());
    }

    #[test]
    fn ownership_includes_open_descendants() {
        let mut doc = Document::new();
        let mut stack = OverlayStack::new();
        let parent = stack.register(OverlayConfig::default());
        let child = stack.register(OverlayConfig {
            parent: Some(parent),
            ..OverlayConfig::default()
        });
        let parent_panel = doc.insert(None, NodeFlags::empty());
        // Child content is rendered elsewhere (a portal).
        let child_panel = doc.insert(None, NodeFlags::empty());
        let inside_child = doc.insert(Some(child_panel), NodeFlags::CONTROL);
        stack.set_containers(parent, &[parent_panel]);
        stack.set_containers(child, &[child_panel]);

        stack.open(&doc, parent, None);
        assert!(!stack.owns(&doc, parent, inside_child));
        stack.open(&doc, child, None);
        assert!(stack.owns(&doc, parent, inside_child));
    }

    #[test]
    fn reopening_an_open_instance_is_a_noop() {
        let doc = Document::new();
        let mut stack = OverlayStack::new();
        let a = stack.register(OverlayConfig::default());
        stack.open(&doc, a, None);
        stack.open(&doc, a, None);
        assert_eq!(stack.open_instances(), &[a]);
    }
}
