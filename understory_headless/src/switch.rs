// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Switch: a two-state toggle.
//!
//! A click toggles. Space toggles on key *up*, so holding Space never
//! flickers the switch; Enter does not toggle but asks the enclosing form to
//! submit. An optional [`SwitchGroup`] ties a `Switch.Label` and a
//! `Switch.Description` to the switch: clicking the label toggles and focuses
//! the switch.

use core::cell::RefCell;

use understory_document::NodeId;
use understory_event_state::key::{Key, KeyEvent, KeyPressState};

use crate::effects::{Effect, Effects};
use crate::error::UsageError;
use crate::notify::{Observers, SubscriptionId};
use crate::render::{AttrValue, Props};
use crate::scope::Scope;

/// Observable switch state.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SwitchSnapshot {
    /// On or off.
    pub checked: bool,
}

/// Headless switch.
#[derive(Debug)]
pub struct Switch {
    checked: bool,
    disabled: bool,
    node: Option<NodeId>,
    label: Option<NodeId>,
    description: Option<NodeId>,
    keys: KeyPressState,
    observers: Observers<SwitchSnapshot>,
}

impl Switch {
    /// Create a switch.
    pub fn new(checked: bool) -> Self {
        Self {
            checked,
            disabled: false,
            node: None,
            label: None,
            description: None,
            keys: KeyPressState::new(),
            observers: Observers::with_initial(SwitchSnapshot { checked }),
        }
    }

    /// Builder form of [`Switch::set_disabled`].
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Enable or disable input.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// The switch element.
    pub fn set_node(&mut self, node: Option<NodeId>) {
        self.node = node;
    }

    /// The switch element.
    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    /// On or off.
    pub fn is_checked(&self) -> bool {
        self.checked
    }

    /// Current observable state.
    pub fn snapshot(&self) -> SwitchSnapshot {
        SwitchSnapshot {
            checked: self.checked,
        }
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(&mut self, callback: impl FnMut(&SwitchSnapshot) + 'static) -> SubscriptionId {
        self.observers.subscribe(callback)
    }

    /// Remove a subscription.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Set the state (controlled use).
    pub fn set_checked(&mut self, checked: bool) -> Effects {
        self.checked = checked;
        self.commit(Effects::new())
    }

    /// Flip the state; a no-op while disabled.
    pub fn toggle(&mut self) -> Effects {
        if self.disabled {
            return Effects::new();
        }
        self.checked = !self.checked;
        log::trace!("switch {:?} -> {}", self.node, self.checked);
        self.commit(Effects::new())
    }

    /// Click on the switch.
    pub fn on_click(&mut self) -> Effects {
        self.toggle()
    }

    /// Keydown on the switch.
    pub fn on_key_down(&mut self, event: &KeyEvent) -> Effects {
        let mut fx = Effects::new();
        let fresh = self.keys.on_key_down(event).is_press();
        match event.key {
            // Suppress scrolling; the toggle happens on key up.
            Key::Space => fx.prevent_default(),
            Key::Enter if fresh && !self.disabled => fx.push(Effect::SubmitForm),
            _ => {}
        }
        fx
    }

    /// Keyup on the switch.
    pub fn on_key_up(&mut self, key: Key) -> Effects {
        let was_held = self.keys.on_key_up(key);
        if key == Key::Space && was_held {
            let mut fx = Effects::new();
            fx.prevent_default();
            fx.extend(self.toggle());
            return fx;
        }
        Effects::new()
    }

    /// The switch lost focus. A Space released elsewhere will not toggle it.
    pub fn on_blur(&mut self) -> Effects {
        self.keys.clear();
        Effects::new()
    }

    /// Props for `Switch`.
    pub fn props(&self) -> Props {
        Props::new()
            .with("role", AttrValue::Str("switch"))
            .with("tabindex", AttrValue::Int(0))
            .with("aria-checked", AttrValue::Bool(self.checked))
            .with_opt("aria-disabled", self.disabled.then_some(AttrValue::Bool(true)))
            .with_opt("aria-labelledby", self.label.map(AttrValue::Ref))
            .with_opt("aria-describedby", self.description.map(AttrValue::Ref))
    }

    fn commit(&mut self, mut fx: Effects) -> Effects {
        if self.observers.publish(self.snapshot()) {
            fx.push(Effect::Changed);
        }
        fx
    }
}

/// A switch with its label and description.
#[derive(Debug)]
pub struct SwitchGroup {
    switch: Switch,
}

impl SwitchGroup {
    /// Name used in usage errors.
    pub const NAME: &'static str = "Switch.Group";

    /// Group `switch`.
    pub fn new(switch: Switch) -> Self {
        Self { switch }
    }

    /// The group provided to `Switch.Label` and `Switch.Description` parts.
    pub fn from_scope<'s>(
        scope: &Scope<'s>,
        part: &'static str,
    ) -> Result<&'s RefCell<Self>, UsageError> {
        scope.require::<RefCell<Self>>(part, Self::NAME)
    }

    /// The switch.
    pub fn switch(&self) -> &Switch {
        &self.switch
    }

    /// The switch, mutably.
    pub fn switch_mut(&mut self) -> &mut Switch {
        &mut self.switch
    }

    /// The label element.
    pub fn set_label(&mut self, label: Option<NodeId>) {
        self.switch.label = label;
    }

    /// The description element.
    pub fn set_description(&mut self, description: Option<NodeId>) {
        self.switch.description = description;
    }

    /// Click on the label: toggle and focus the switch.
    pub fn on_label_click(&mut self) -> Effects {
        if self.switch.disabled {
            return Effects::new();
        }
        let mut fx = Effects::new();
        fx.focus(self.switch.node);
        fx.extend(self.switch.toggle());
        fx
    }

    /// Props for `Switch.Label`.
    pub fn label_props(&self) -> Props {
        Props::new().with_opt("for", self.switch.node.map(AttrValue::Ref))
    }
}
