// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Outside-click detection.
//!
//! A click counts as outside only if the pointer went *down* outside too.
//! Dragging from inside an open menu and releasing outside (a text selection,
//! a scrollbar drag) must not close it. The host runs this after the
//! target's own handlers, so the trigger's click toggles and is never also an
//! outside click: the trigger is one of the containers.

use understory_document::{Document, NodeId};

/// Pointer-down / click pairing for outside-click detection.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct OutsideClick {
    down_target: Option<NodeId>,
}

impl OutsideClick {
    /// Create a detector with no pointer down recorded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the element under a pointer down.
    pub fn on_pointer_down(&mut self, target: Option<NodeId>) {
        self.down_target = target;
    }

    /// Returns `true` if a click on `target` is outside every container.
    ///
    /// Consumes the recorded pointer down.
    pub fn is_outside(
        &mut self,
        doc: &Document,
        target: Option<NodeId>,
        containers: &[NodeId],
    ) -> bool {
        let down = self.down_target.take();
        let inside = |node: Option<NodeId>| match node {
            Some(n) if !doc.is_alive(n) => None,
            Some(n) => Some(containers.iter().any(|&c| doc.contains(c, n))),
            None => Some(false),
        };
        // Stale targets (removed by the target's own handler) are ignored.
        match (inside(down), inside(target)) {
            (Some(false), Some(false)) => true,
            _ => false,
        }
    }
}
