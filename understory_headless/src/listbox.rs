// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listbox: a button that opens a list of selectable options.
//!
//! Like a [`Menu`](crate::menu::Menu), but options carry values and opening
//! starts on the selected option. In single mode choosing an option selects
//! it and closes; in `multiple` mode choosing toggles it and the list stays
//! open.
//!
//! The value shape must match the mode: [`ListboxValue::Single`] without
//! `multiple`, [`ListboxValue::Multiple`] with it. A mismatch is a
//! [`UsageError::ValueShape`].

use alloc::vec::Vec;
use core::cell::RefCell;

use hashbrown::HashMap;
use kurbo::Point;
use understory_collection::navigator::{EmptyPolicy, Navigation, NavigationPolicy};
use understory_collection::registry::ItemData;
use understory_collection::typeahead::TypeaheadConfig;
use understory_document::{Document, NodeId};
use understory_event_state::key::{Key, KeyEvent};
use understory_overlay::controller::{CloseReason, Origin};
use understory_overlay::focus_trap::TabBehavior;
use understory_overlay::handle::Overlays;
use understory_overlay::stack::{OverlayGroup, OverlayId};

pub use crate::popup::Orientation;

use crate::effects::{Effect, Effects};
use crate::error::UsageError;
use crate::notify::{SharedObservers, SubscriptionId};
use crate::popup::{ItemState, ItemsKey, PopupList};
use crate::render::{AttrValue, Props, RenderFeatures, Visibility};
use crate::scope::Scope;

/// Listbox configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListboxConfig {
    /// Several options can be selected; choosing toggles and stays open.
    pub multiple: bool,
    /// The whole listbox ignores input.
    pub disabled: bool,
    /// Which arrow keys move between options.
    pub orientation: Orientation,
    /// What Tab does while open.
    pub tab: TabBehavior,
    /// Mutual-exclusion group.
    pub group: Option<OverlayGroup>,
    /// Enclosing overlay.
    pub parent: Option<OverlayId>,
    /// Type-ahead timing.
    pub typeahead: TypeaheadConfig,
    /// How the closed option container renders.
    pub options: RenderFeatures,
}

impl Default for ListboxConfig {
    fn default() -> Self {
        Self {
            multiple: false,
            disabled: false,
            orientation: Orientation::Vertical,
            tab: TabBehavior::Trap,
            group: Some(OverlayGroup::POPUP),
            parent: None,
            typeahead: TypeaheadConfig::default(),
            options: RenderFeatures::default(),
        }
    }
}

/// The selected value(s).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListboxValue<V> {
    /// At most one value.
    Single(Option<V>),
    /// Any number of values.
    Multiple(Vec<V>),
}

impl<V: PartialEq> ListboxValue<V> {
    /// Returns `true` if `value` is selected.
    pub fn contains(&self, value: &V) -> bool {
        match self {
            Self::Single(v) => v.as_ref() == Some(value),
            Self::Multiple(vs) => vs.contains(value),
        }
    }
}

/// Observable listbox state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListboxSnapshot<V> {
    /// The option list is open.
    pub open: bool,
    /// The active option.
    pub active: Option<NodeId>,
    /// The selection.
    pub value: ListboxValue<V>,
}

/// Headless listbox state machine over option values of type `V`.
#[derive(Debug)]
pub struct Listbox<V> {
    list: PopupList,
    multiple: bool,
    disabled: bool,
    options_features: RenderFeatures,
    values: HashMap<NodeId, V>,
    value: ListboxValue<V>,
    observers: SharedObservers<ListboxSnapshot<V>>,
}

impl<V: Clone + PartialEq + 'static> Listbox<V> {
    /// Name used in usage errors.
    pub const NAME: &'static str = "Listbox";

    /// Create a closed listbox.
    pub fn new(
        overlays: &Overlays,
        config: ListboxConfig,
        value: ListboxValue<V>,
    ) -> Result<Self, UsageError> {
        check_shape(config.multiple, &value)?;
        let mut list = PopupList::new(
            overlays,
            config.group,
            config.parent,
            NavigationPolicy {
                empty: EmptyPolicy::Keep,
                ..NavigationPolicy::default()
            },
            config.typeahead,
            config.tab,
        );
        list.orientation = config.orientation;
        let snapshot = ListboxSnapshot {
            open: false,
            active: None,
            value: value.clone(),
        };
        let observers = SharedObservers::with_initial(snapshot);
        list.set_close_hook(observers.close_hook(|s| {
            s.open = false;
            s.active = None;
        }));
        Ok(Self {
            list,
            multiple: config.multiple,
            disabled: config.disabled,
            options_features: config.options,
            values: HashMap::new(),
            value,
            observers,
        })
    }

    /// The listbox provided to child parts.
    pub fn from_scope<'s>(
        scope: &Scope<'s>,
        part: &'static str,
    ) -> Result<&'s RefCell<Self>, UsageError> {
        scope.require::<RefCell<Self>>(part, Self::NAME)
    }

    /// The overlay id.
    pub fn id(&self) -> OverlayId {
        self.list.id()
    }

    /// Set the trigger button.
    pub fn set_button(&mut self, button: Option<NodeId>) {
        self.list.set_button(button);
    }

    /// Set the option container.
    pub fn set_options(&mut self, options: Option<NodeId>) {
        self.list.set_items(options);
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
        self.list.register(doc, option, data)
    }

    /// Unregister an option (on unmount).
    pub fn unregister_option(&mut self, option: NodeId) -> Effects {
        self.values.remove(&option);
        self.list.unregister(option);
        self.commit(Effects::new())
    }

    /// Re-sort options after elements moved in the document.
    pub fn resort(&mut self, doc: &Document) {
        self.list.nav.resort(doc);
    }

    /// Returns `true` while open.
    pub fn is_open(&self) -> bool {
        self.list.is_open()
    }

    /// The active option. Always `None` while closed.
    pub fn active(&self) -> Option<NodeId> {
        self.list.active()
    }

    /// The selection.
    pub fn value(&self) -> &ListboxValue<V> {
        &self.value
    }

    /// Replace the selection (controlled use).
    pub fn set_value(&mut self, value: ListboxValue<V>) -> Result<Effects, UsageError> {
        check_shape(self.multiple, &value)?;
        self.value = value;
        Ok(self.commit(Effects::new()))
    }

    /// Returns `true` if `option` is selected.
    pub fn is_selected(&self, option: NodeId) -> bool {
        self.values.get(&option).is_some_and(|v| self.value.contains(v))
    }

    /// The first selected option in document order.
    pub fn selected_option(&self) -> Option<NodeId> {
        self.list.nav.registry().ids().find(|&id| self.is_selected(id))
    }

    /// Current observable state.
    pub fn snapshot(&self) -> ListboxSnapshot<V> {
        ListboxSnapshot {
            open: self.is_open(),
            active: self.active(),
            value: self.value.clone(),
        }
    }

    /// Render state of one option.
    pub fn option_state(&self, option: NodeId) -> ItemState {
        ItemState {
            selected: self.is_selected(option),
            ..self.list.item_state(option)
        }
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(
        &mut self,
        callback: impl FnMut(&ListboxSnapshot<V>) + 'static,
    ) -> SubscriptionId {
        self.observers.subscribe(callback)
    }

    /// Remove a subscription.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Open or close. Opening starts on the selected option.
    pub fn set_open(
        &mut self,
        doc: &Document,
        open: bool,
        origin: Origin,
        focused: Option<NodeId>,
    ) -> Effects {
        if self.disabled {
            return Effects::new();
        }
        let fx = if open {
            let seed = self.selected_seed().unwrap_or(Navigation::Nothing);
            self.list.open(doc, origin, seed, focused)
        } else {
            self.list.close(doc, CloseReason::Programmatic)
        };
        self.commit(fx)
    }

    /// Close for `reason`.
    pub fn close(&mut self, doc: &Document, reason: CloseReason) -> Effects {
        let fx = self.list.close(doc, reason);
        self.commit(fx)
    }

    /// Apply a navigation command. Inert while closed.
    pub fn dispatch(&mut self, command: Navigation<NodeId>) -> Effects {
        let fx = self.list.navigate(command);
        self.commit(fx)
    }

    /// Keydown on the button.
    pub fn on_button_key_down(
        &mut self,
        doc: &Document,
        event: &KeyEvent,
        focused: Option<NodeId>,
    ) -> Effects {
        if self.disabled {
            return Effects::new();
        }
        let fresh = self.list.key_down(event);
        let fallback = match event.key {
            Key::Enter | Key::Space | Key::ArrowDown => Navigation::First,
            Key::ArrowUp => Navigation::Last,
            _ => return Effects::new(),
        };
        let mut fx = Effects::new();
        fx.prevent_default();
        if !fresh && matches!(event.key, Key::Enter | Key::Space) {
            return fx;
        }
        let seed = self.selected_seed().unwrap_or(fallback);
        fx.extend(self.list.open(doc, Origin::Keyboard, seed, focused));
        self.commit(fx)
    }

    /// Keyup anywhere in the listbox.
    pub fn on_key_up(&mut self, key: Key) -> Effects {
        self.list.key_up(key);
        let mut fx = Effects::new();
        if key == Key::Space {
            fx.prevent_default();
        }
        fx
    }

    /// Click on the button: toggles.
    pub fn on_button_click(&mut self, doc: &Document, focused: Option<NodeId>) -> Effects {
        if self.disabled {
            return Effects::new();
        }
        let fx = if self.is_open() {
            self.list.close(doc, CloseReason::Toggle)
        } else {
            let seed = self.selected_seed().unwrap_or(Navigation::Nothing);
            self.list.open(doc, Origin::Pointer, seed, focused)
        };
        self.commit(fx)
    }

    /// Keydown on the option container. `now` is a monotonic time in ms.
    pub fn on_options_key_down(&mut self, doc: &Document, event: &KeyEvent, now: u64) -> Effects {
        let fx = match self.list.items_key_down(doc, event, now) {
            ItemsKey::Done(fx) => fx,
            ItemsKey::Activate(active) => {
                let mut fx = Effects::new();
                fx.prevent_default();
                match active {
                    Some(option) => fx.extend(self.choose(doc, option)),
                    None if !self.multiple => {
                        fx.extend(self.list.close(doc, CloseReason::Activated));
                    }
                    None => {}
                }
                fx
            }
        };
        self.commit(fx)
    }

    /// Pointer moved over an option.
    pub fn on_option_pointer_move(&mut self, option: NodeId, position: Point) -> Effects {
        self.list.pointer_move(option, position);
        self.commit(Effects::new())
    }

    /// Pointer left an option.
    pub fn on_option_pointer_leave(&mut self, option: NodeId) -> Effects {
        self.list.pointer_leave(option);
        self.commit(Effects::new())
    }

    /// Click on an option. Disabled options do nothing.
    pub fn on_option_click(&mut self, doc: &Document, option: NodeId) -> Effects {
        let mut fx = Effects::new();
        if !self.is_open() || !self.list.nav.registry().is_enabled(option) {
            fx.prevent_default();
            return fx;
        }
        // Clicking also makes the option active, for multiple mode.
        self.list.nav.navigate(Navigation::Specific(option));
        fx.extend(self.choose(doc, option));
        self.commit(fx)
    }

    /// Pointer down anywhere in the document.
    pub fn on_pointer_down(&mut self, target: Option<NodeId>) {
        self.list.pointer_down(target);
    }

    /// Click anywhere in the document, after the target's own handlers.
    pub fn on_document_click(&mut self, doc: &Document, target: Option<NodeId>) -> Effects {
        let fx = self.list.document_click(doc, target);
        self.commit(fx)
    }

    /// Focus left the listbox for good (window blur, host focus reset).
    ///
    /// Held keys are forgotten so the next press on the button counts as fresh.
    pub fn on_blur(&mut self) -> Effects {
        self.list.blur();
        Effects::new()
    }

    /// Focus moved to `target`.
    pub fn on_focus_in(&mut self, doc: &Document, target: Option<NodeId>) -> Effects {
        let fx = self.list.focus_in(doc, target);
        self.commit(fx)
    }

    /// The overlay stack closed this listbox.
    ///
    /// Subscribers were already told; this forgets navigation state.
    pub fn on_dismissed(&mut self) -> Effects {
        self.list.sync_closed();
        self.commit(Effects::new())
    }

    /// Expire type-ahead at `now`.
    pub fn poll(&mut self, now: u64) -> bool {
        self.list.poll(now)
    }

    /// When the host should call [`Listbox::poll`] next.
    pub fn search_deadline(&self) -> Option<u64> {
        self.list.search_deadline()
    }

    /// Props for `Listbox.Button`.
    pub fn button_props(&self) -> Props {
        let open = self.is_open();
        Props::new()
            .with("aria-haspopup", AttrValue::Str("listbox"))
            .with("aria-expanded", AttrValue::Bool(open))
            .with_opt("aria-controls", self.list.items().filter(|_| open).map(AttrValue::Ref))
            .with_opt("disabled", self.disabled.then_some(AttrValue::Bool(true)))
    }

    /// Props for `Listbox.Options`.
    pub fn options_props(&self) -> Props {
        let orientation = match self.list.orientation {
            Orientation::Vertical => "vertical",
            Orientation::Horizontal => "horizontal",
        };
        Props::new()
            .with("role", AttrValue::Str("listbox"))
            .with("tabindex", AttrValue::Int(-1))
            .with("aria-orientation", AttrValue::Str(orientation))
            .with_opt("aria-multiselectable", self.multiple.then_some(AttrValue::Bool(true)))
            .with_opt("aria-labelledby", self.list.button().map(AttrValue::Ref))
            .with_opt("aria-activedescendant", self.active().map(AttrValue::Ref))
    }

    /// Props for one `Listbox.Option`.
    pub fn option_props(&self, option: NodeId) -> Props {
        let state = self.option_state(option);
        Props::new()
            .with("role", AttrValue::Str("option"))
            .with("tabindex", AttrValue::Int(-1))
            .with("aria-selected", AttrValue::Bool(state.selected))
            .with_opt("aria-disabled", state.disabled.then_some(AttrValue::Bool(true)))
    }

    /// Presence of `Listbox.Options`.
    pub fn options_visibility(&self) -> Visibility {
        self.options_features.resolve(self.is_open())
    }

    fn selected_seed(&self) -> Option<Navigation<NodeId>> {
        self.selected_option()
            .filter(|&id| self.list.nav.registry().is_enabled(id))
            .map(Navigation::Specific)
    }

    fn choose(&mut self, doc: &Document, option: NodeId) -> Effects {
        let mut fx = Effects::new();
        let Some(value) = self.values.get(&option).cloned() else {
            return fx;
        };
        fx.push(Effect::Activate(option));
        match &mut self.value {
            ListboxValue::Single(current) => {
                *current = Some(value);
                fx.extend(self.list.close(doc, CloseReason::Activated));
            }
            ListboxValue::Multiple(values) => {
                if let Some(i) = values.iter().position(|v| *v == value) {
                    values.remove(i);
                } else {
                    values.push(value);
                }
            }
        }
        log::debug!("listbox option {option:?} chosen");
        fx
    }

    fn commit(&mut self, mut fx: Effects) -> Effects {
        if self.observers.publish(self.snapshot()) {
            fx.push(Effect::Changed);
        }
        fx
    }
}

fn check_shape<V>(multiple: bool, value: &ListboxValue<V>) -> Result<(), UsageError> {
    match (multiple, matches!(value, ListboxValue::Multiple(_))) {
        (true, false) => Err(UsageError::ValueShape {
            component: "Listbox",
            flag: "multiple",
            expected: "a list of values",
        }),
        (false, true) => Err(UsageError::ValueShape {
            component: "Listbox",
            flag: "single selection",
            expected: "at most one value",
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use understory_document::NodeFlags;

    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    enum Fulfillment {
        Pickup,
        Delivery,
        DineIn,
    }

    struct Fixture {
        doc: Document,
        button: NodeId,
        options: NodeId,
        nodes: [NodeId; 3],
    }

    fn fixture() -> Fixture {
        let mut doc = Document::new();
        let button = doc.insert(None, NodeFlags::CONTROL);
        let options = doc.insert(None, NodeFlags::FOCUSABLE);
        let nodes = [
            doc.insert(Some(options), NodeFlags::empty()),
            doc.insert(Some(options), NodeFlags::empty()),
            doc.insert(Some(options), NodeFlags::empty()),
        ];
        Fixture {
            doc,
            button,
            options,
            nodes,
        }
    }

    fn listbox(
        f: &Fixture,
        config: ListboxConfig,
        value: ListboxValue<Fulfillment>,
    ) -> Listbox<Fulfillment> {
        let overlays = Overlays::new();
        let mut lb = Listbox::new(&overlays, config, value).unwrap();
        lb.set_button(Some(f.button));
        lb.set_options(Some(f.options));
        let entries = [
            (Fulfillment::Pickup, "Pickup", false),
            (Fulfillment::Delivery, "Home delivery", true),
            (Fulfillment::DineIn, "Dine-in", false),
        ];
        for (node, (value, text, disabled)) in f.nodes.iter().zip(entries) {
            lb.register_option(&f.doc, *node, value, ItemData::new(text).disabled(disabled));
        }
        lb
    }

    fn key(k: Key) -> KeyEvent {
        KeyEvent::new(k)
    }

    #[test]
    fn value_shape_must_match_mode() {
        let overlays = Overlays::new();
        let multiple = ListboxConfig {
            multiple: true,
            ..ListboxConfig::default()
        };
        let err = Listbox::new(&overlays, multiple, ListboxValue::Single(Some(1_u8)));
        assert!(matches!(err, Err(UsageError::ValueShape { flag: "multiple", .. })));
        let err = Listbox::new(
            &overlays,
            ListboxConfig::default(),
            ListboxValue::Multiple(vec![1_u8]),
        );
        assert!(err.is_err());
        let single = ListboxValue::Single(None::<u8>);
        let mut ok = Listbox::new(&overlays, ListboxConfig::default(), single).unwrap();
        assert!(ok.set_value(ListboxValue::Multiple(vec![])).is_err());
    }

    #[test]
    fn opening_starts_on_the_selected_option() {
        let f = fixture();
        let selected = ListboxValue::Single(Some(Fulfillment::DineIn));
        let mut lb = listbox(&f, ListboxConfig::default(), selected);
        lb.on_button_key_down(&f.doc, &key(Key::ArrowDown), Some(f.button));
        assert_eq!(lb.active(), Some(f.nodes[2]));
        lb.close(&f.doc, CloseReason::Escape);
        lb.on_button_click(&f.doc, Some(f.button));
        assert_eq!(lb.active(), Some(f.nodes[2]));
    }

    #[test]
    fn opening_without_selection_falls_back_to_ends() {
        let f = fixture();
        let mut lb = listbox(&f, ListboxConfig::default(), ListboxValue::Single(None));
        lb.on_button_key_down(&f.doc, &key(Key::ArrowUp), Some(f.button));
        assert_eq!(lb.active(), Some(f.nodes[2]));
        lb.close(&f.doc, CloseReason::Escape);
        lb.on_button_click(&f.doc, Some(f.button));
        assert_eq!(lb.active(), None);
    }

    #[test]
    fn single_selection_closes_and_restores_focus() {
        let f = fixture();
        let mut lb = listbox(&f, ListboxConfig::default(), ListboxValue::Single(None));
        lb.on_button_key_down(&f.doc, &key(Key::Enter), Some(f.button));
        lb.on_key_up(Key::Enter);
        let fx = lb.on_options_key_down(&f.doc, &key(Key::Enter), 0);
        assert_eq!(lb.value(), &ListboxValue::Single(Some(Fulfillment::Pickup)));
        assert!(!lb.is_open());
        assert_eq!(fx.focus_target(), Some(f.button));
        assert!(fx.changed());
        assert!(lb.option_state(f.nodes[0]).selected);
    }

    #[test]
    fn multiple_selection_toggles_and_stays_open() {
        let f = fixture();
        let config = ListboxConfig {
            multiple: true,
            ..ListboxConfig::default()
        };
        let mut lb = listbox(&f, config, ListboxValue::Multiple(vec![Fulfillment::DineIn]));
        lb.on_button_click(&f.doc, Some(f.button));
        lb.on_option_click(&f.doc, f.nodes[0]);
        assert!(lb.is_open());
        assert_eq!(
            lb.value(),
            &ListboxValue::Multiple(vec![Fulfillment::DineIn, Fulfillment::Pickup])
        );
        lb.on_option_click(&f.doc, f.nodes[2]);
        assert_eq!(lb.value(), &ListboxValue::Multiple(vec![Fulfillment::Pickup]));
        // Disabled options cannot be chosen.
        lb.on_option_click(&f.doc, f.nodes[1]);
        assert_eq!(lb.value(), &ListboxValue::Multiple(vec![Fulfillment::Pickup]));
        assert_eq!(
            lb.options_props().get("aria-multiselectable"),
            Some(&AttrValue::Bool(true))
        );
    }

    #[test]
    fn horizontal_listbox_uses_left_and_right() {
        let f = fixture();
        let config = ListboxConfig {
            orientation: Orientation::Horizontal,
            ..ListboxConfig::default()
        };
        let mut lb = listbox(&f, config, ListboxValue::Single(None));
        lb.on_button_key_down(&f.doc, &key(Key::ArrowDown), Some(f.button));
        lb.on_options_key_down(&f.doc, &key(Key::ArrowDown), 0);
        assert_eq!(lb.active(), Some(f.nodes[0]));
        lb.on_options_key_down(&f.doc, &key(Key::ArrowRight), 0);
        assert_eq!(lb.active(), Some(f.nodes[2]));
        lb.on_options_key_down(&f.doc, &key(Key::ArrowLeft), 0);
        assert_eq!(lb.active(), Some(f.nodes[0]));
    }

    #[test]
    fn disabled_listbox_ignores_input() {
        let f = fixture();
        let config = ListboxConfig {
            disabled: true,
            ..ListboxConfig::default()
        };
        let mut lb = listbox(&f, config, ListboxValue::Single(None));
        assert!(lb.on_button_click(&f.doc, Some(f.button)).is_empty());
        assert!(lb.on_button_key_down(&f.doc, &key(Key::Enter), Some(f.button)).is_empty());
        assert!(!lb.is_open());
        assert_eq!(lb.button_props().get("disabled"), Some(&AttrValue::Bool(true)));
    }

    #[test]
    fn disabled_selected_option_falls_back() {
        let f = fixture();
        let selected = ListboxValue::Single(Some(Fulfillment::Delivery));
        let mut lb = listbox(&f, ListboxConfig::default(), selected);
        lb.on_button_key_down(&f.doc, &key(Key::ArrowDown), Some(f.button));
        assert_eq!(lb.active(), Some(f.nodes[0]));
    }
}
