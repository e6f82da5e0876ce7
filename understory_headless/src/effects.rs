// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordered side effects returned by component handlers.
//!
//! Handlers never touch the host directly. They return [`Effects`] in the
//! order the host should apply them: focus moves, default-action
//! suppression, item activation, scrolling, sibling dismissals and a
//! `Changed` marker whenever the component snapshot changed.

use smallvec::SmallVec;
use understory_document::NodeId;
use understory_overlay::stack::{Dismissal, OverlayId};

/// One side effect for the host to apply.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Move focus to the element.
    Focus(NodeId),
    /// Suppress the event's default action.
    PreventDefault,
    /// Stop the event from reaching outer handlers.
    StopPropagation,
    /// The item was chosen (menu item action, listbox option, radio option).
    Activate(NodeId),
    /// Scroll the element into view.
    ScrollIntoView(NodeId),
    /// Another instance was closed because this one opened.
    Dismissed {
        /// The closed instance.
        id: OverlayId,
        /// Where focus should return, if it has to move.
        restore_focus: Option<NodeId>,
    },
    /// The enclosing form should submit.
    SubmitForm,
    /// The component snapshot changed; re-render.
    Changed,
}

/// Effects of one handler call, in application order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Effects(SmallVec<[Effect; 4]>);

impl Effects {
    /// No effects.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an effect.
    pub fn push(&mut self, effect: Effect) {
        self.0.push(effect);
    }

    /// Append a focus move, if there is a target.
    pub fn focus(&mut self, target: Option<NodeId>) {
        if let Some(node) = target {
            self.0.push(Effect::Focus(node));
        }
    }

    /// Append `PreventDefault` unless already present.
    pub fn prevent_default(&mut self) {
        if !self.contains(&Effect::PreventDefault) {
            self.0.push(Effect::PreventDefault);
        }
    }

    /// Append one `Dismissed` effect per evicted instance.
    pub fn dismissed(&mut self, dismissals: impl IntoIterator<Item = Dismissal>) {
        for d in dismissals {
            self.0.push(Effect::Dismissed {
                id: d.id,
                restore_focus: d.restore_focus,
            });
        }
    }

    /// Append all of `other`.
    pub fn extend(&mut self, other: Self) {
        self.0.extend(other.0);
    }

    /// The effects, in order.
    pub fn as_slice(&self) -> &[Effect] {
        &self.0
    }

    /// Iterate over the effects.
    pub fn iter(&self) -> core::slice::Iter<'_, Effect> {
        self.0.iter()
    }

    /// Returns `true` if there are no effects.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if `effect` is present.
    pub fn contains(&self, effect: &Effect) -> bool {
        self.0.contains(effect)
    }

    /// The last focus target, which is where focus ends up.
    pub fn focus_target(&self) -> Option<NodeId> {
        self.0.iter().rev().find_map(|e| match e {
            Effect::Focus(n) => Some(*n),
            _ => None,
        })
    }

    /// The activated item, if any.
    pub fn activated(&self) -> Option<NodeId> {
        self.0.iter().find_map(|e| match e {
            Effect::Activate(n) => Some(*n),
            _ => None,
        })
    }

    /// Returns `true` if the default action should be suppressed.
    pub fn prevents_default(&self) -> bool {
        self.contains(&Effect::PreventDefault)
    }

    /// Returns `true` if the snapshot changed.
    pub fn changed(&self) -> bool {
        self.contains(&Effect::Changed)
    }
}

impl<'a> IntoIterator for &'a Effects {
    type Item = &'a Effect;
    type IntoIter = core::slice::Iter<'a, Effect>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
