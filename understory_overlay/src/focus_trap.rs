// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focus containment for modal panels and Tab policy for popups.
//!
//! A [`FocusTrap`] keeps sequential focus inside a container while active:
//! Tab and Shift+Tab cycle among the container's tabbable descendants,
//! wrapping at both ends, and focus that escapes (a pointer click outside,
//! script) is pulled back. On deactivation focus returns to whatever had it
//! before activation, if that element still exists.

use understory_document::{Document, NodeId};

/// What Tab does while a popup list is open.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum TabBehavior {
    /// Tab is consumed; focus stays in the item container.
    #[default]
    Trap,
    /// The popup closes without restoring focus and the default Tab
    /// movement proceeds.
    Exit,
}

/// Focus trap over one container.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FocusTrap {
    container: NodeId,
    restore_to: Option<NodeId>,
    active: bool,
}

impl FocusTrap {
    /// Create an inactive trap over `container`.
    pub fn new(container: NodeId) -> Self {
        Self {
            container,
            restore_to: None,
            active: false,
        }
    }

    /// The trapped container.
    pub fn container(&self) -> NodeId {
        self.container
    }

    /// Returns `true` while active.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Activate the trap and pick the element to focus first.
    ///
    /// `focused_before` is remembered for restoration. `initial` wins if it is
    /// focusable and inside the container; otherwise the first tabbable
    /// descendant; otherwise the container itself if it can take focus.
    pub fn activate(
        &mut self,
        doc: &Document,
        focused_before: Option<NodeId>,
        initial: Option<NodeId>,
    ) -> Option<NodeId> {
        self.active = true;
        self.restore_to = focused_before;
        if let Some(n) = initial.filter(|&n| doc.contains(self.container, n) && doc.is_focusable(n))
        {
            return Some(n);
        }
        doc.tabbables_within(self.container)
            .first()
            .copied()
            .or_else(|| doc.is_focusable(self.container).then_some(self.container))
    }

    /// The element Tab (or Shift+Tab when `backwards`) moves focus to.
    ///
    /// Wraps at both ends. With nothing tabbable inside, focus stays put.
    pub fn next_tab_stop(
        &self,
        doc: &Document,
        current: Option<NodeId>,
        backwards: bool,
    ) -> Option<NodeId> {
        let stops = doc.tabbables_within(self.container);
        if stops.is_empty() {
            return current;
        }
        let last = stops.len() - 1;
        let index = match current.and_then(|c| stops.iter().position(|&s| s == c)) {
            Some(i) if backwards => if i == 0 { last } else { i - 1 },
            Some(i) => if i == last { 0 } else { i + 1 },
            None if backwards => last,
            None => 0,
        };
        Some(stops[index])
    }

    /// Where focus must go after it moved to `focused`, if it escaped.
    ///
    /// Returns `None` while focus is inside or the trap is inactive.
    pub fn contain(&self, doc: &Document, focused: Option<NodeId>) -> Option<NodeId> {
        if !self.active {
            return None;
        }
        match focused {
            Some(f) if doc.contains(self.container, f) => None,
            _ => self.next_tab_stop(doc, None, false),
        }
    }

    /// Deactivate and return the element to restore focus to.
    pub fn deactivate(&mut self, doc: &Document) -> Option<NodeId> {
        if !self.active {
            return None;
        }
        self.active = false;
        self.restore_to.take().filter(|&n| doc.is_alive(n))
    }
}
