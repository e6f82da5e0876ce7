// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Menu: a button that opens a list of actions.
//!
//! Parts: `Menu.Button` (the trigger), `Menu.Items` (the focusable item
//! container) and `Menu.Item`. Items register with their rendered text; the
//! container keeps keyboard focus while open and tracks the active item with
//! `aria-activedescendant`, so items themselves are never focused.
//!
//! ## Keyboard
//!
//! | Where | Key | Effect |
//! |-------|-----|--------|
//! | button | Enter, Space, ArrowDown | open, first enabled item active |
//! | button | ArrowUp | open, last enabled item active |
//! | items | ArrowDown / ArrowUp | next / previous enabled item, no wrap |
//! | items | Home, PageUp / End, PageDown | first / last enabled item |
//! | items | Enter, Space | activate the active item and close |
//! | items | Escape | close (top-most menu only), focus the button |
//! | items | Tab | per [`TabBehavior`] |
//! | items | printable characters | type-ahead |
//!
//! ## Example
//!
//! ```
//! use understory_collection::registry::ItemData;
//! use understory_document::{Document, NodeFlags};
//! use understory_event_state::key::{Key, KeyEvent};
//! use understory_headless::menu::{Menu, MenuConfig};
//! use understory_overlay::handle::Overlays;
//!
//! let mut doc = Document::new();
//! let button = doc.insert(None, NodeFlags::CONTROL);
//! let items = doc.insert(None, NodeFlags::FOCUSABLE);
//! let edit = doc.insert(Some(items), NodeFlags::empty());
//! let delete = doc.insert(Some(items), NodeFlags::empty());
//!
//! let overlays = Overlays::new();
//! let mut menu = Menu::new(&overlays, MenuConfig::default());
//! menu.set_button(Some(button));
//! menu.set_items(Some(items));
//! menu.register_item(&doc, edit, ItemData::new("Edit"));
//! menu.register_item(&doc, delete, ItemData::new("Delete"));
//!
//! let fx = menu.on_button_key_down(&doc, &KeyEvent::new(Key::ArrowDown), Some(button));
//! assert!(menu.is_open());
//! assert_eq!(menu.active(), Some(edit));
//! assert_eq!(fx.focus_target(), Some(items));
//!
//! menu.on_items_key_down(&doc, &KeyEvent::new(Key::Character('d')), 0);
//! assert_eq!(menu.active(), Some(delete));
//! ```

use core::cell::RefCell;

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

use crate::effects::{Effect, Effects};
use crate::error::UsageError;
use crate::notify::{SharedObservers, SubscriptionId};
use crate::popup::{ItemState, ItemsKey, PopupList};
use crate::render::{AttrValue, Props, RenderFeatures, Visibility};
use crate::scope::Scope;

/// Menu configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuConfig {
    /// What Tab does while open.
    pub tab: TabBehavior,
    /// Mutual-exclusion group; by default menus and listboxes close each other.
    pub group: Option<OverlayGroup>,
    /// Enclosing overlay, for menus opened from inside dialogs or other menus.
    pub parent: Option<OverlayId>,
    /// Type-ahead timing.
    pub typeahead: TypeaheadConfig,
    /// Home/End over a menu with no enabled items.
    pub empty: EmptyPolicy,
    /// How the closed item container renders.
    pub items: RenderFeatures,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            tab: TabBehavior::Trap,
            group: Some(OverlayGroup::POPUP),
            parent: None,
            typeahead: TypeaheadConfig::default(),
            empty: EmptyPolicy::Clear,
            items: RenderFeatures::default(),
        }
    }
}

/// Observable menu state.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct MenuSnapshot {
    /// The menu is open.
    pub open: bool,
    /// The active item.
    pub active: Option<NodeId>,
}

/// Headless menu state machine.
#[derive(Debug)]
pub struct Menu {
    list: PopupList,
    items_features: RenderFeatures,
    observers: SharedObservers<MenuSnapshot>,
}

impl Menu {
    /// Name used in usage errors.
    pub const NAME: &'static str = "Menu";

    /// Create a closed menu registered with `overlays`.
    pub fn new(overlays: &Overlays, config: MenuConfig) -> Self {
        let policy = NavigationPolicy {
            empty: config.empty,
            ..NavigationPolicy::default()
        };
        let list = PopupList::new(
            overlays,
            config.group,
            config.parent,
            policy,
            config.typeahead,
            config.tab,
        );
        let observers = SharedObservers::with_initial(MenuSnapshot::default());
        list.set_close_hook(observers.close_hook(|s| *s = MenuSnapshot::default()));
        Self {
            list,
            items_features: config.items,
            observers,
        }
    }

    /// The menu provided to child parts.
    ///
    /// Fails with [`UsageError::MissingParent`] when `part` is rendered
    /// outside a menu.
    pub fn from_scope<'s>(
        scope: &Scope<'s>,
        part: &'static str,
    ) -> Result<&'s RefCell<Self>, UsageError> {
        scope.require::<RefCell<Self>>(part, Self::NAME)
    }

    /// The menu's overlay id, for nesting other overlays under it.
    pub fn id(&self) -> OverlayId {
        self.list.id()
    }

    /// Set the trigger button.
    pub fn set_button(&mut self, button: Option<NodeId>) {
        self.list.set_button(button);
    }

    /// Set the item container.
    pub fn set_items(&mut self, items: Option<NodeId>) {
        self.list.set_items(items);
    }

    /// Register or update an item. Returns `true` if it was new.
    pub fn register_item(&mut self, doc: &Document, item: NodeId, data: ItemData) -> bool {
        self.list.register(doc, item, data)
    }

    /// Unregister an item (on unmount). Returns the resulting effects.
    pub fn unregister_item(&mut self, item: NodeId) -> Effects {
        self.list.unregister(item);
        self.commit(Effects::new())
    }

    /// Re-sort items after elements moved in the document.
    pub fn resort(&mut self, doc: &Document) {
        self.list.nav.resort(doc);
    }

    /// Returns `true` while open.
    pub fn is_open(&self) -> bool {
        self.list.is_open()
    }

    /// The active item. Always `None` while closed.
    pub fn active(&self) -> Option<NodeId> {
        self.list.active()
    }

    /// Current observable state.
    pub fn snapshot(&self) -> MenuSnapshot {
        MenuSnapshot {
            open: self.is_open(),
            active: self.active(),
        }
    }

    /// Render state of one item.
    pub fn item_state(&self, item: NodeId) -> ItemState {
        self.list.item_state(item)
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(&mut self, callback: impl FnMut(&MenuSnapshot) + 'static) -> SubscriptionId {
        self.observers.subscribe(callback)
    }

    /// Remove a subscription.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Open or close.
    ///
    /// Opening seeds no active item. Closing returns focus to the button.
    pub fn set_open(
        &mut self,
        doc: &Document,
        open: bool,
        origin: Origin,
        focused: Option<NodeId>,
    ) -> Effects {
        let fx = if open {
            self.list.open(doc, origin, Navigation::Nothing, focused)
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
        let fresh = self.list.key_down(event);
        let seed = match event.key {
            Key::Enter | Key::Space | Key::ArrowDown => Navigation::First,
            Key::ArrowUp => Navigation::Last,
            _ => return Effects::new(),
        };
        let mut fx = Effects::new();
        fx.prevent_default();
        if !fresh && matches!(event.key, Key::Enter | Key::Space) {
            // Held activation key arriving after an item closed the menu.
            return fx;
        }
        fx.extend(self.list.open(doc, Origin::Keyboard, seed, focused));
        self.commit(fx)
    }

    /// Keyup anywhere in the menu.
    pub fn on_key_up(&mut self, key: Key) -> Effects {
        self.list.key_up(key);
        let mut fx = Effects::new();
        if key == Key::Space {
            // Space keyup would click the focused button.
            fx.prevent_default();
        }
        fx
    }

    /// Click on the button: toggles.
    pub fn on_button_click(&mut self, doc: &Document, focused: Option<NodeId>) -> Effects {
        let fx = if self.is_open() {
            self.list.close(doc, CloseReason::Toggle)
        } else {
            self.list.open(doc, Origin::Pointer, Navigation::Nothing, focused)
        };
        self.commit(fx)
    }

    /// Keydown on the item container. `now` is a monotonic time in ms.
    pub fn on_items_key_down(&mut self, doc: &Document, event: &KeyEvent, now: u64) -> Effects {
        let fx = match self.list.items_key_down(doc, event, now) {
            ItemsKey::Done(fx) => fx,
            ItemsKey::Activate(active) => {
                let mut fx = Effects::new();
                fx.prevent_default();
                fx.extend(self.activate(doc, active));
                fx
            }
        };
        self.commit(fx)
    }

    /// Pointer moved over an item.
    pub fn on_item_pointer_move(&mut self, item: NodeId, position: Point) -> Effects {
        self.list.pointer_move(item, position);
        self.commit(Effects::new())
    }

    /// Pointer left an item.
    pub fn on_item_pointer_leave(&mut self, item: NodeId) -> Effects {
        self.list.pointer_leave(item);
        self.commit(Effects::new())
    }

    /// Click on an item. Disabled items do nothing and keep the menu open.
    pub fn on_item_click(&mut self, doc: &Document, item: NodeId) -> Effects {
        let mut fx = Effects::new();
        if !self.is_open() || !self.list.nav.registry().is_enabled(item) {
            fx.prevent_default();
            return fx;
        }
        fx.extend(self.activate(doc, Some(item)));
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

    /// Focus left the menu for good (window blur, host focus reset).
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

    /// The overlay stack closed this menu (another menu opened).
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

    /// When the host should call [`Menu::poll`] next.
    pub fn search_deadline(&self) -> Option<u64> {
        self.list.search_deadline()
    }

    /// Props for `Menu.Button`.
    pub fn button_props(&self) -> Props {
        let open = self.is_open();
        Props::new()
            .with("aria-haspopup", AttrValue::Str("menu"))
            .with("aria-expanded", AttrValue::Bool(open))
            .with_opt("aria-controls", self.list.items().filter(|_| open).map(AttrValue::Ref))
    }

    /// Props for `Menu.Items`.
    pub fn items_props(&self) -> Props {
        Props::new()
            .with("role", AttrValue::Str("menu"))
            .with("tabindex", AttrValue::Int(-1))
            .with_opt("aria-labelledby", self.list.button().map(AttrValue::Ref))
            .with_opt("aria-activedescendant", self.active().map(AttrValue::Ref))
    }

    /// Props for one `Menu.Item`.
    pub fn item_props(&self, item: NodeId) -> Props {
        let state = self.item_state(item);
        Props::new()
            .with("role", AttrValue::Str("menuitem"))
            .with("tabindex", AttrValue::Int(-1))
            .with_opt("aria-disabled", state.disabled.then_some(AttrValue::Bool(true)))
    }

    /// Presence of `Menu.Items`.
    pub fn items_visibility(&self) -> Visibility {
        self.items_features.resolve(self.is_open())
    }

    fn activate(&mut self, doc: &Document, item: Option<NodeId>) -> Effects {
        let mut fx = Effects::new();
        if let Some(item) = item {
            log::debug!("menu item {item:?} activated");
            fx.push(Effect::Activate(item));
        }
        fx.extend(self.list.close(doc, CloseReason::Activated));
        fx
    }

    fn commit(&mut self, mut fx: Effects) -> Effects {
        if self.observers.publish(self.snapshot()) {
            fx.push(Effect::Changed);
        }
        fx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use understory_document::NodeFlags;
    use understory_event_state::key::Modifiers;
    use understory_overlay::listeners::Listeners;

    struct Fixture {
        doc: Document,
        overlays: Overlays,
        menu: Menu,
        button: NodeId,
        items: NodeId,
        pickup: NodeId,
        delivery: NodeId,
        dine_in: NodeId,
        outside: NodeId,
    }

    fn fixture() -> Fixture {
        let mut doc = Document::new();
        let button = doc.insert(None, NodeFlags::CONTROL);
        let items = doc.insert(None, NodeFlags::FOCUSABLE);
        let pickup = doc.insert(Some(items), NodeFlags::empty());
        let delivery = doc.insert(Some(items), NodeFlags::empty());
        let dine_in = doc.insert(Some(items), NodeFlags::empty());
        let outside = doc.insert(None, NodeFlags::empty());
        let overlays = Overlays::new();
        let mut menu = Menu::new(&overlays, MenuConfig::default());
        menu.set_button(Some(button));
        menu.set_items(Some(items));
        // Mount order differs from document order.
        menu.register_item(&doc, dine_in, ItemData::new("Dine-in"));
        menu.register_item(&doc, pickup, ItemData::new("Pickup"));
        menu.register_item(&doc, delivery, ItemData::new("Home delivery").disabled(true));
        Fixture {
            doc,
            overlays,
            menu,
            button,
            items,
            pickup,
            delivery,
            dine_in,
            outside,
        }
    }

    fn key(k: Key) -> KeyEvent {
        KeyEvent::new(k)
    }

    #[test]
    fn arrow_up_on_button_opens_on_last() {
        let mut f = fixture();
        let fx = f.menu.on_button_key_down(&f.doc, &key(Key::ArrowUp), Some(f.button));
        assert_eq!(f.menu.active(), Some(f.dine_in));
        assert!(fx.prevents_default());
        assert!(fx.changed());
    }

    #[test]
    fn click_opens_without_active_item() {
        let mut f = fixture();
        let fx = f.menu.on_button_click(&f.doc, Some(f.button));
        assert!(f.menu.is_open());
        assert_eq!(f.menu.active(), None);
        assert_eq!(fx.focus_target(), Some(f.items));
        // Clicking again closes and keeps focus on the button.
        let fx = f.menu.on_button_click(&f.doc, Some(f.items));
        assert!(!f.menu.is_open());
        assert_eq!(fx.focus_target(), Some(f.button));
    }

    #[test]
    fn navigation_is_inert_while_closed() {
        let mut f = fixture();
        assert!(f.menu.dispatch(Navigation::First).is_empty());
        assert_eq!(f.menu.active(), None);
        let fx = f.menu.on_items_key_down(&f.doc, &key(Key::ArrowDown), 0);
        assert!(fx.is_empty());
    }

    #[test]
    fn disabled_item_click_is_a_noop() {
        let mut f = fixture();
        f.menu.on_button_key_down(&f.doc, &key(Key::Enter), Some(f.button));
        let fx = f.menu.on_item_click(&f.doc, f.delivery);
        assert!(f.menu.is_open());
        assert_eq!(fx.activated(), None);
        assert_eq!(f.menu.active(), Some(f.pickup));
    }

    #[test]
    fn enter_activates_once_per_press() {
        let mut f = fixture();
        f.menu.on_button_key_down(&f.doc, &key(Key::Enter), Some(f.button));
        f.menu.on_key_up(Key::Enter);
        f.menu.on_items_key_down(&f.doc, &key(Key::End), 0);

        let fx = f.menu.on_items_key_down(&f.doc, &key(Key::Enter), 10);
        assert_eq!(fx.activated(), Some(f.dine_in));
        assert!(!f.menu.is_open());
        assert_eq!(fx.focus_target(), Some(f.button));

        // The held key keeps repeating on the button; it must not reopen.
        let fx = f.menu.on_button_key_down(&f.doc, &key(Key::Enter).repeated(), Some(f.button));
        assert!(!f.menu.is_open());
        assert!(fx.prevents_default());
        // Some platforms omit the repeat marker.
        f.menu.on_button_key_down(&f.doc, &key(Key::Enter), Some(f.button));
        assert!(!f.menu.is_open());
        f.menu.on_key_up(Key::Enter);
        f.menu.on_button_key_down(&f.doc, &key(Key::Enter), Some(f.button));
        assert!(f.menu.is_open());
    }

    #[test]
    fn key_released_elsewhere_does_not_block_reopening() {
        let mut f = fixture();
        f.menu.on_button_key_down(&f.doc, &key(Key::Enter), Some(f.button));
        f.menu.on_key_up(Key::Enter);
        let fx = f.menu.on_items_key_down(&f.doc, &key(Key::Enter), 0);
        assert_eq!(fx.activated(), Some(f.pickup));
        assert!(!f.menu.is_open());

        // The action moved focus away; the Enter keyup never reaches the menu.
        f.menu.on_focus_in(&f.doc, Some(f.outside));
        f.menu.on_button_key_down(&f.doc, &key(Key::Enter), Some(f.button));
        assert!(f.menu.is_open());

        // Same after a window blur while Space is down.
        f.menu.close(&f.doc, CloseReason::Programmatic);
        f.menu.on_button_key_down(&f.doc, &key(Key::Space), Some(f.button));
        f.menu.close(&f.doc, CloseReason::Programmatic);
        f.menu.on_blur();
        f.menu.on_button_key_down(&f.doc, &key(Key::Space), Some(f.button));
        assert!(f.menu.is_open());
    }

    #[test]
    fn pointer_hover_and_leave() {
        let mut f = fixture();
        f.menu.on_button_click(&f.doc, Some(f.button));
        f.menu.on_item_pointer_move(f.dine_in, Point::new(5.0, 30.0));
        assert_eq!(f.menu.active(), Some(f.dine_in));
        // Moving over a disabled item keeps the current one.
        f.menu.on_item_pointer_move(f.delivery, Point::new(5.0, 20.0));
        assert_eq!(f.menu.active(), Some(f.dine_in));
        // Leaving a non-active item changes nothing.
        f.menu.on_item_pointer_leave(f.delivery);
        assert_eq!(f.menu.active(), Some(f.dine_in));
        f.menu.on_item_pointer_leave(f.dine_in);
        assert_eq!(f.menu.active(), None);
    }

    #[test]
    fn stationary_pointer_does_not_steal_active_item() {
        let mut f = fixture();
        f.menu.on_button_click(&f.doc, Some(f.button));
        let here = Point::new(5.0, 10.0);
        f.menu.on_item_pointer_move(f.pickup, here);
        f.menu.on_items_key_down(&f.doc, &key(Key::End), 0);
        assert_eq!(f.menu.active(), Some(f.dine_in));
        // The list scrolled; a move is reported over another item at the same spot.
        f.menu.on_item_pointer_move(f.pickup, here);
        assert_eq!(f.menu.active(), Some(f.dine_in));
    }

    #[test]
    fn escape_closes_and_restores_focus() {
        let mut f = fixture();
        f.menu.on_button_key_down(&f.doc, &key(Key::ArrowDown), Some(f.button));
        let fx = f.menu.on_items_key_down(&f.doc, &key(Key::Escape), 0);
        assert!(!f.menu.is_open());
        assert_eq!(fx.focus_target(), Some(f.button));
        assert!(fx.contains(&Effect::StopPropagation));
        assert!(f.overlays.listeners().is_empty());
    }

    #[test]
    fn tab_behavior_trap_and_exit() {
        let mut f = fixture();
        f.menu.on_button_key_down(&f.doc, &key(Key::ArrowDown), Some(f.button));
        let fx = f.menu.on_items_key_down(&f.doc, &key(Key::Tab), 0);
        assert!(f.menu.is_open());
        assert!(fx.prevents_default());

        let mut doc = f.doc.clone();
        let button = doc.insert(None, NodeFlags::CONTROL);
        let mut exit = Menu::new(
            &f.overlays,
            MenuConfig {
                tab: TabBehavior::Exit,
                ..MenuConfig::default()
            },
        );
        exit.set_button(Some(button));
        exit.on_button_key_down(&doc, &key(Key::ArrowDown), Some(button));
        let shift_tab = key(Key::Tab).with_modifiers(Modifiers::SHIFT);
        let fx = exit.on_items_key_down(&doc, &shift_tab, 0);
        assert!(!exit.is_open());
        assert!(!fx.prevents_default());
        assert_eq!(fx.focus_target(), None);
    }

    #[test]
    fn outside_click_closes_and_trigger_click_toggles() {
        let mut f = fixture();
        f.menu.on_button_click(&f.doc, Some(f.button));
        // A click on the trigger is inside.
        f.menu.on_pointer_down(Some(f.button));
        assert!(f.menu.on_document_click(&f.doc, Some(f.button)).is_empty());
        assert!(f.menu.is_open());

        f.menu.on_pointer_down(Some(f.outside));
        let fx = f.menu.on_document_click(&f.doc, Some(f.outside));
        assert!(!f.menu.is_open());
        // The target is not focusable, so focus returns to the button.
        assert_eq!(fx.focus_target(), Some(f.button));
    }

    #[test]
    fn typeahead_skips_disabled_and_space_searches_mid_query() {
        let mut f = fixture();
        f.menu.on_button_click(&f.doc, Some(f.button));
        f.menu.on_items_key_down(&f.doc, &key(Key::Character('h')), 0);
        assert_eq!(f.menu.active(), None);
        f.menu.poll(1_000);
        f.menu.on_items_key_down(&f.doc, &key(Key::Character('d')), 1_000);
        assert_eq!(f.menu.active(), Some(f.dine_in));
        // Space while searching types, it does not activate.
        let fx = f.menu.on_items_key_down(&f.doc, &key(Key::Space), 1_100);
        assert!(f.menu.is_open());
        assert_eq!(fx.activated(), None);
        // Command chords are not typed.
        let copy = key(Key::Character('p')).with_modifiers(Modifiers::CONTROL);
        f.menu.on_items_key_down(&f.doc, &copy, 1_200);
        assert_eq!(f.menu.active(), Some(f.dine_in));
    }

    #[test]
    fn unregistering_active_item_clears_it() {
        let mut f = fixture();
        f.menu.on_button_key_down(&f.doc, &key(Key::ArrowUp), Some(f.button));
        let fx = f.menu.unregister_item(f.dine_in);
        assert_eq!(f.menu.active(), None);
        assert!(fx.changed());
    }

    #[test]
    fn subscribers_follow_open_and_active() {
        let mut f = fixture();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        f.menu.subscribe(move |s| sink.borrow_mut().push(*s));
        f.menu.on_button_key_down(&f.doc, &key(Key::ArrowDown), Some(f.button));
        f.menu.on_items_key_down(&f.doc, &key(Key::ArrowDown), 0);
        f.menu.on_items_key_down(&f.doc, &key(Key::ArrowDown), 0);
        assert_eq!(
            *seen.borrow(),
            [
                MenuSnapshot {
                    open: true,
                    active: Some(f.pickup)
                },
                MenuSnapshot {
                    open: true,
                    active: Some(f.dine_in)
                },
            ]
        );
    }

    #[test]
    fn props_reflect_state() {
        let mut f = fixture();
        assert_eq!(f.menu.items_visibility(), Visibility::Unmounted);
        f.menu.on_button_key_down(&f.doc, &key(Key::ArrowDown), Some(f.button));
        let props = f.menu.button_props();
        assert_eq!(props.get("aria-expanded"), Some(&AttrValue::Bool(true)));
        assert_eq!(props.get("aria-controls"), Some(&AttrValue::Ref(f.items)));
        assert_eq!(
            f.menu.items_props().get("aria-activedescendant"),
            Some(&AttrValue::Ref(f.pickup))
        );
        assert_eq!(
            f.menu.item_props(f.delivery).get("aria-disabled"),
            Some(&AttrValue::Bool(true))
        );
        assert_eq!(f.menu.items_visibility(), Visibility::Visible);
        assert_eq!(f.overlays.listeners(), Listeners::POPUP);
    }

    #[test]
    fn parts_need_a_menu_in_scope() {
        let f = fixture();
        let root = Scope::root();
        assert!(Menu::from_scope(&root, "Menu.Item").is_err());
        let menu = RefCell::new(f.menu);
        let scope = root.provide(&menu);
        let found = Menu::from_scope(&scope, "Menu.Item");
        assert!(found.is_ok_and(|m| !m.borrow().is_open()));
    }
}
