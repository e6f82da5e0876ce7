// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Radio group: a set of options with exactly one checked.
//!
//! Radio groups have no open state; navigation is always live. Focus roves:
//! only one option is a Tab stop (the checked one, else the first enabled
//! one), and arrow keys move focus *and* check, wrapping at both ends.
//! Space checks the focused option; Enter asks the enclosing form to submit.

use core::cell::RefCell;

use hashbrown::HashMap;
use understory_collection::navigator::{Navigation, NavigationPolicy, WrapMode};
use understory_collection::registry::ItemData;
use understory_collection::state::NavigationState;
use understory_collection::typeahead::TypeaheadConfig;
use understory_document::{Document, NodeId};
use understory_event_state::key::{Key, KeyEvent, KeyPressState};

use crate::effects::{Effect, Effects};
use crate::error::UsageError;
use crate::notify::{Observers, SubscriptionId};
use crate::popup::ItemState;
use crate::render::{AttrValue, Props};
use crate::scope::Scope;

/// Radio group configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RadioGroupConfig {
    /// The whole group ignores input and has no Tab stop.
    pub disabled: bool,
    /// Arrow key wrapping.
    pub wrap: WrapMode,
}

impl Default for RadioGroupConfig {
    fn default() -> Self {
        Self {
            disabled: false,
            wrap: WrapMode::Wrap,
        }
    }
}

/// Observable radio group state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RadioGroupSnapshot<V> {
    /// The checked value.
    pub value: Option<V>,
    /// The option that last had focus.
    pub active: Option<NodeId>,
}

/// Headless radio group over option values of type `V`.
#[derive(Debug)]
pub struct RadioGroup<V> {
    nav: NavigationState<NodeId>,
    values: HashMap<NodeId, V>,
    value: Option<V>,
    disabled: bool,
    keys: KeyPressState,
    observers: Observers<RadioGroupSnapshot<V>>,
}

impl<V: Clone + PartialEq + 'static> RadioGroup<V> {
    /// Name used in usage errors.
    pub const NAME: &'static str = "RadioGroup";

    /// Create a group with `value` checked.
    pub fn new(config: RadioGroupConfig, value: Option<V>) -> Self {
        let policy = NavigationPolicy {
            wrap: config.wrap,
            ..NavigationPolicy::default()
        };
        let snapshot = RadioGroupSnapshot {
            value: value.clone(),
            active: None,
        };
        Self {
            nav: NavigationState::with_config(policy, TypeaheadConfig::default()),
            values: HashMap::new(),
            value,
            disabled: config.disabled,
            keys: KeyPressState::new(),
            observers: Observers::with_initial(snapshot),
        }
    }

    /// The group provided to `RadioGroup.Option` parts.
    pub fn from_scope<'s>(
        scope: &Scope<'s>,
        part: &'static str,
    ) -> Result<&'s RefCell<Self>, UsageError> {
        scope.require::<RefCell<Self>>(part, Self::NAME)
    }

    /// Register or update an option.
    pub fn register_option(
        &mut self,
        doc: &Document,
        option: NodeId,
        value: V,
        data: ItemData,
    ) -> bool {
        self.values.insert(option, value);
        self.nav.register(doc, option, data)
    }

    /// Unregister an option.
    pub fn unregister_option(&mut self, option: NodeId) -> Effects {
        self.values.remove(&option);
        self.nav.unregister(option);
        self.commit(Effects::new())
    }

    /// The checked value.
    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    /// Replace the checked value (controlled use).
    pub fn set_value(&mut self, value: Option<V>) -> Effects {
        self.value = value;
        self.commit(Effects::new())
    }

    /// The checked option, if its value is registered.
    pub fn checked_option(&self) -> Option<NodeId> {
        let value = self.value.as_ref()?;
        self.nav
            .registry()
            .ids()
            .find(|id| self.values.get(id) == Some(value))
    }

    /// The option that takes focus when tabbing into the group.
    pub fn tab_stop(&self) -> Option<NodeId> {
        if self.disabled {
            return None;
        }
        let registry = self.nav.registry();
        self.checked_option()
            .filter(|&id| registry.is_enabled(id))
            .or_else(|| registry.items().iter().find(|i| i.is_enabled()).map(|i| i.id))
    }

    /// Current observable state.
    pub fn snapshot(&self) -> RadioGroupSnapshot<V> {
        RadioGroupSnapshot {
            value: self.value.clone(),
            active: self.nav.active(),
        }
    }

    /// Render state of one option.
    pub fn option_state(&self, option: NodeId) -> ItemState {
        ItemState {
            active: self.nav.is_active(option),
            disabled: self.disabled || !self.nav.registry().is_enabled(option),
            selected: self.checked_option() == Some(option),
        }
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(
        &mut self,
        callback: impl FnMut(&RadioGroupSnapshot<V>) + 'static,
    ) -> SubscriptionId {
        self.observers.subscribe(callback)
    }

    /// Remove a subscription.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// An option received focus.
    pub fn on_option_focus(&mut self, option: NodeId) -> Effects {
        if !self.disabled {
            self.nav.navigate(Navigation::Specific(option));
        }
        self.commit(Effects::new())
    }

    /// Focus left the group.
    pub fn on_blur(&mut self) -> Effects {
        self.nav.deactivate();
        self.keys.clear();
        self.commit(Effects::new())
    }

    /// Apply a navigation command, checking the option it lands on.
    pub fn dispatch(&mut self, command: Navigation<NodeId>) -> Effects {
        let mut fx = Effects::new();
        if self.disabled {
            return fx;
        }
        if self.nav.navigate(command)
            && let Some(option) = self.nav.active()
        {
            fx.push(Effect::Focus(option));
            fx.extend(self.check(option));
        }
        self.commit(fx)
    }

    /// Keydown on `option`.
    pub fn on_option_key_down(&mut self, option: NodeId, event: &KeyEvent) -> Effects {
        let mut fx = Effects::new();
        if self.disabled {
            return fx;
        }
        let fresh = self.keys.on_key_down(event).is_press();
        // Keys arrive at the focused option; make it the reference point.
        self.nav.navigate(Navigation::Specific(option));
        let command = match event.key {
            Key::ArrowDown | Key::ArrowRight => Navigation::Next,
            Key::ArrowUp | Key::ArrowLeft => Navigation::Previous,
            Key::Space => {
                fx.prevent_default();
                if fresh && self.nav.registry().is_enabled(option) {
                    fx.extend(self.check(option));
                }
                return self.commit(fx);
            }
            Key::Enter => {
                if fresh {
                    fx.push(Effect::SubmitForm);
                }
                return self.commit(fx);
            }
            _ => return self.commit(fx),
        };
        fx.prevent_default();
        fx.extend(self.dispatch(command));
        self.commit(fx)
    }

    /// Keyup anywhere in the group.
    pub fn on_key_up(&mut self, key: Key) {
        self.keys.on_key_up(key);
    }

    /// Click on `option`: focus and check it.
    pub fn on_option_click(&mut self, option: NodeId) -> Effects {
        let mut fx = Effects::new();
        if self.disabled || !self.nav.registry().is_enabled(option) {
            return fx;
        }
        self.nav.navigate(Navigation::Specific(option));
        fx.push(Effect::Focus(option));
        fx.extend(self.check(option));
        self.commit(fx)
    }

    /// Props for `RadioGroup`.
    pub fn group_props(&self) -> Props {
        Props::new()
            .with("role", AttrValue::Str("radiogroup"))
            .with_opt("aria-disabled", self.disabled.then_some(AttrValue::Bool(true)))
    }

    /// Props for one `RadioGroup.Option`.
    pub fn option_props(&self, option: NodeId) -> Props {
        let state = self.option_state(option);
        let tabindex = if self.tab_stop() == Some(option) { 0 } else { -1 };
        Props::new()
            .with("role", AttrValue::Str("radio"))
            .with("aria-checked", AttrValue::Bool(state.selected))
            .with("tabindex", AttrValue::Int(tabindex))
            .with_opt("aria-disabled", state.disabled.then_some(AttrValue::Bool(true)))
    }

    fn check(&mut self, option: NodeId) -> Effects {
        let mut fx = Effects::new();
        let Some(value) = self.values.get(&option) else {
            return fx;
        };
        if self.value.as_ref() != Some(value) {
            log::debug!("radio option {option:?} checked");
            self.value = Some(value.clone());
            fx.push(Effect::Activate(option));
        }
        fx
    }

    fn commit(&mut self, mut fx: Effects) -> Effects {
        if self.observers.publish(self.snapshot()) {
            fx.push(Effect::Changed);
        }
        fx
    }
}
