// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Disclosure: a button that shows and hides a panel.
//!
//! Unlike menus, a disclosure panel is part of the page flow: it takes no
//! part in the overlay stack and does not close on outside clicks or focus
//! moving away.

use core::cell::RefCell;

use understory_document::{Document, NodeId};
use understory_event_state::key::{Key, KeyEvent, KeyPressState};

use crate::effects::{Effect, Effects};
use crate::error::UsageError;
use crate::notify::{Observers, SubscriptionId};
use crate::render::{AttrValue, Props, RenderFeatures, Visibility};
use crate::scope::Scope;

/// Observable disclosure state.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DisclosureSnapshot {
    /// The panel is shown.
    pub open: bool,
}

/// Headless disclosure.
#[derive(Debug)]
pub struct Disclosure {
    open: bool,
    button: Option<NodeId>,
    panel: Option<NodeId>,
    keys: KeyPressState,
    observers: Observers<DisclosureSnapshot>,
}

impl Disclosure {
    /// Name used in usage errors.
    pub const NAME: &'static str = "Disclosure";

    /// Create a disclosure, initially shown if `open`.
    pub fn new(open: bool) -> Self {
        Self {
            open,
            button: None,
            panel: None,
            keys: KeyPressState::new(),
            observers: Observers::with_initial(DisclosureSnapshot { open }),
        }
    }

    /// The disclosure provided to `Disclosure.Button` and `Disclosure.Panel`.
    pub fn from_scope<'s>(
        scope: &Scope<'s>,
        part: &'static str,
    ) -> Result<&'s RefCell<Self>, UsageError> {
        scope.require::<RefCell<Self>>(part, Self::NAME)
    }

    /// The `Disclosure.Button` element.
    pub fn set_button(&mut self, button: Option<NodeId>) {
        self.button = button;
    }

    /// The `Disclosure.Panel` element.
    pub fn set_panel(&mut self, panel: Option<NodeId>) {
        self.panel = panel;
    }

    /// The panel is shown.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Current observable state.
    pub fn snapshot(&self) -> DisclosureSnapshot {
        DisclosureSnapshot { open: self.open }
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(
        &mut self,
        callback: impl FnMut(&DisclosureSnapshot) + 'static,
    ) -> SubscriptionId {
        self.observers.subscribe(callback)
    }

    /// Remove a subscription.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Show or hide the panel.
    pub fn set_open(&mut self, open: bool) -> Effects {
        self.open = open;
        self.commit(Effects::new())
    }

    /// Flip the panel.
    pub fn toggle(&mut self) -> Effects {
        self.set_open(!self.open)
    }

    /// Hide the panel and move focus to `focus_target`, or to the button.
    ///
    /// A target that no longer exists is ignored.
    pub fn close(&mut self, doc: &Document, focus_target: Option<NodeId>) -> Effects {
        let mut fx = Effects::new();
        fx.focus(focus_target.or(self.button).filter(|&n| doc.is_alive(n)));
        fx.extend(self.set_open(false));
        fx
    }

    /// Click on `Disclosure.Button`.
    pub fn on_button_click(&mut self) -> Effects {
        self.toggle()
    }

    /// Keydown on `Disclosure.Button`.
    pub fn on_button_key_down(&mut self, event: &KeyEvent) -> Effects {
        let fresh = self.keys.on_key_down(event).is_press();
        match event.key {
            Key::Enter | Key::Space => {
                let mut fx = Effects::new();
                fx.prevent_default();
                if fresh {
                    fx.extend(self.toggle());
                }
                fx
            }
            _ => Effects::new(),
        }
    }

    /// Keyup on `Disclosure.Button`.
    pub fn on_key_up(&mut self, key: Key) -> Effects {
        self.keys.on_key_up(key);
        let mut fx = Effects::new();
        // Firefox clicks buttons on Space keyup.
        if key == Key::Space {
            fx.prevent_default();
        }
        fx
    }

    /// The button lost focus. Keys held on it no longer count as held.
    pub fn on_blur(&mut self) -> Effects {
        self.keys.clear();
        Effects::new()
    }

    /// Click on a button rendered inside the panel: close, focus the
    /// disclosure button.
    pub fn on_panel_button_click(&mut self, doc: &Document) -> Effects {
        self.close(doc, None)
    }

    /// Props for `Disclosure.Button`.
    pub fn button_props(&self) -> Props {
        Props::new()
            .with("aria-expanded", AttrValue::Bool(self.open))
            .with_opt(
                "aria-controls",
                self.panel.filter(|_| self.open).map(AttrValue::Ref),
            )
    }

    /// Presence of `Disclosure.Panel` under `features`.
    pub fn panel_visibility(&self, features: RenderFeatures) -> Visibility {
        features.resolve(self.open)
    }

    fn commit(&mut self, mut fx: Effects) -> Effects {
        if self.observers.publish(self.snapshot()) {
            fx.push(Effect::Changed);
        }
        fx
    }
}
