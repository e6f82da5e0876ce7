// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Open/close transitions: why an instance opened or closed, and where focus
//! goes afterwards.

use understory_document::{Document, NodeId};

/// What caused an open.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Origin {
    /// A key on the trigger.
    Keyboard,
    /// A pointer click on the trigger.
    Pointer,
    /// Application code. Focus stays where it is.
    #[default]
    Programmatic,
}

impl Origin {
    /// Returns `true` if opening from this origin moves focus into the container.
    pub fn moves_focus(self) -> bool {
        !matches!(self, Self::Programmatic)
    }
}

/// What caused a close.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CloseReason {
    /// Escape pressed while top-most.
    Escape,
    /// Pointer landed outside the instance.
    OutsideClick {
        /// Element under the pointer, if any.
        target: Option<NodeId>,
    },
    /// Focus moved outside the instance.
    FocusOut,
    /// An enabled item was activated.
    Activated,
    /// The trigger was clicked again.
    Toggle,
    /// Application code.
    Programmatic,
    /// Closed by opening another instance of the same group.
    Evicted,
    /// Tab left the instance.
    TabExit,
}

/// Where focus should go after closing for `reason`.
///
/// Focus returns to `trigger` unless the user already put it somewhere
/// else: an outside click that landed on a focusable element, focus moving
/// out, or Tab leaving. Evictions are decided by the stack, which knows
/// whether focus was inside. A trigger that no longer exists is ignored.
pub fn focus_after_close(
    doc: &Document,
    reason: CloseReason,
    trigger: Option<NodeId>,
) -> Option<NodeId> {
    let restore = match reason {
        CloseReason::OutsideClick { target } => !target.is_some_and(|t| doc.is_focusable(t)),
        CloseReason::FocusOut | CloseReason::TabExit | CloseReason::Evicted => false,
        CloseReason::Escape
        | CloseReason::Activated
        | CloseReason::Toggle
        | CloseReason::Programmatic => true,
    };
    trigger.filter(|&t| restore && doc.is_alive(t))
}
