// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared stack context and RAII instance handles.
//!
//! [`Overlays`] is the explicit context object components receive instead of
//! a global: a cheap clone of one shared [`OverlayStack`]. Each component
//! instance holds an [`OverlayHandle`]; dropping it (component unmount)
//! deregisters the instance and closes it if it was open, so listener
//! requirements drop with it.
//!
//! Every handle operation that closes *other* instances (eviction on open,
//! descendants on close or drop) runs their [`CloseHook`]s afterwards, with
//! the stack released.

use alloc::rc::Rc;
use core::cell::RefCell;

use understory_document::{Document, NodeId};

use crate::listeners::Listeners;
use crate::stack::{CloseHook, Closed, Dismissals, OverlayConfig, OverlayId, OverlayStack};

/// Shared open-instance stack.
///
/// ```
/// use understory_document::Document;
/// use understory_overlay::handle::Overlays;
/// use understory_overlay::stack::OverlayConfig;
///
/// let doc = Document::new();
/// let overlays = Overlays::new();
/// let dialog = overlays.register(OverlayConfig::default());
/// dialog.open(&doc, None);
/// assert_eq!(overlays.open_count(), 1);
/// drop(dialog);
/// assert_eq!(overlays.open_count(), 0);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Overlays {
    stack: Rc<RefCell<OverlayStack>>,
}

impl Overlays {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an instance and return its owning handle.
    pub fn register(&self, config: OverlayConfig) -> OverlayHandle {
        let id = self.stack.borrow_mut().register(config);
        OverlayHandle {
            id,
            stack: Rc::clone(&self.stack),
        }
    }

    /// Run `f` with read access to the stack.
    pub fn with<R>(&self, f: impl FnOnce(&OverlayStack) -> R) -> R {
        f(&self.stack.borrow())
    }

    /// The most recently opened instance.
    pub fn top_most(&self) -> Option<OverlayId> {
        self.stack.borrow().top_most()
    }

    /// Number of open instances.
    pub fn open_count(&self) -> usize {
        self.stack.borrow().open_instances().len()
    }

    /// Listeners wanted by the open instances.
    pub fn listeners(&self) -> Listeners {
        self.stack.borrow().listeners()
    }

    /// Returns `true` if `id` is open.
    pub fn is_open(&self, id: OverlayId) -> bool {
        self.stack.borrow().is_open(id)
    }
}

/// Owning handle for one registered instance.
///
/// Not `Clone`: exactly one handle exists per instance.
#[derive(Debug)]
pub struct OverlayHandle {
    id: OverlayId,
    stack: Rc<RefCell<OverlayStack>>,
}

impl OverlayHandle {
    /// The instance id.
    pub fn id(&self) -> OverlayId {
        self.id
    }

    /// A context for the same stack, for registering children.
    pub fn overlays(&self) -> Overlays {
        Overlays {
            stack: Rc::clone(&self.stack),
        }
    }

    /// Open the instance. See [`OverlayStack::open`].
    pub fn open(&self, doc: &Document, focused: Option<NodeId>) -> Dismissals {
        let dismissed = self.stack.borrow_mut().open(doc, self.id, focused);
        self.run_close_hooks(dismissed.iter().map(|d| d.id));
        dismissed
    }

    /// Close the instance and its descendants. See [`OverlayStack::close`].
    pub fn close(&self) -> Closed {
        let closed = self.stack.borrow_mut().close(self.id);
        self.run_close_hooks(closed.iter().copied());
        closed
    }

    /// Set the hook run when another instance's operation closes this one.
    pub fn set_close_hook(&self, hook: CloseHook) {
        self.stack.borrow_mut().set_close_hook(self.id, Some(hook));
    }

    /// Returns `true` if the instance is open.
    pub fn is_open(&self) -> bool {
        self.stack.borrow().is_open(self.id)
    }

    /// Returns `true` if the instance is the most recently opened one.
    pub fn is_top_most(&self) -> bool {
        self.stack.borrow().is_top_most(self.id)
    }

    /// Set the element focus returns to.
    pub fn set_trigger(&self, trigger: Option<NodeId>) {
        self.stack.borrow_mut().set_trigger(self.id, trigger);
    }

    /// The element focus returns to.
    pub fn trigger(&self) -> Option<NodeId> {
        self.stack.borrow().trigger(self.id)
    }

    /// Set the subtrees the instance owns.
    pub fn set_containers(&self, containers: &[NodeId]) {
        self.stack.borrow_mut().set_containers(self.id, containers);
    }

    /// Returns `true` if `node` is inside the instance. See [`OverlayStack::owns`].
    pub fn owns(&self, doc: &Document, node: NodeId) -> bool {
        self.stack.borrow().owns(doc, self.id, node)
    }

    fn run_close_hooks(&self, closed: impl IntoIterator<Item = OverlayId>) {
        let hooks = match self.stack.try_borrow() {
            Ok(stack) => stack.close_hooks(closed, self.id),
            Err(_) => return,
        };
        for (id, hook) in hooks {
            hook.call(id);
        }
    }
}

impl Drop for OverlayHandle {
    fn drop(&mut self) {
        // A panicking borrow here would abort during unwinding.
        let Ok(mut stack) = self.stack.try_borrow_mut() else {
            return;
        };
        let closed = stack.deregister(self.id);
        let hooks = stack.close_hooks(closed, self.id);
        drop(stack);
        for (id, hook) in hooks {
            hook.call(id);
        }
    }
}
