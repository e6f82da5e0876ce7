// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared machinery of button-triggered popup lists (menus, listboxes).

use kurbo::Point;
use smallvec::SmallVec;
use understory_collection::navigator::{Navigation, NavigationPolicy};
use understory_collection::registry::ItemData;
use understory_collection::state::NavigationState;
use understory_collection::typeahead::TypeaheadConfig;
use understory_document::{Document, NodeId};
use understory_event_state::key::{Key, KeyEvent, KeyPressState};
use understory_event_state::pointer::TrackedPointer;
use understory_overlay::controller::{CloseReason, Origin, focus_after_close};
use understory_overlay::focus_trap::TabBehavior;
use understory_overlay::handle::{OverlayHandle, Overlays};
use understory_overlay::listeners::Listeners;
use understory_overlay::outside::OutsideClick;
use understory_overlay::stack::{CloseHook, OverlayConfig, OverlayGroup, OverlayId};

use crate::effects::{Effect, Effects};

/// Layout direction of a list, deciding which arrow keys move.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    /// ArrowUp / ArrowDown.
    #[default]
    Vertical,
    /// ArrowLeft / ArrowRight.
    Horizontal,
}

/// Render state of one item.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct ItemState {
    /// The item is the active (highlighted) one.
    pub active: bool,
    /// The item is disabled.
    pub disabled: bool,
    /// The item is selected / checked.
    pub selected: bool,
}

/// What a keydown on the item container asks for.
#[derive(Debug)]
pub(crate) enum ItemsKey {
    /// Fully handled.
    Done(Effects),
    /// Enter or Space was freshly pressed outside a search.
    Activate(Option<NodeId>),
}

/// Open state, navigation and input tracking for one popup list.
#[derive(Debug)]
pub(crate) struct PopupList {
    overlay: OverlayHandle,
    pub(crate) nav: NavigationState<NodeId>,
    button: Option<NodeId>,
    items: Option<NodeId>,
    keys: KeyPressState,
    pointer: TrackedPointer,
    outside: OutsideClick,
    pub(crate) tab: TabBehavior,
    pub(crate) orientation: Orientation,
}

impl PopupList {
    pub(crate) fn new(
        overlays: &Overlays,
        group: Option<OverlayGroup>,
        parent: Option<OverlayId>,
        policy: NavigationPolicy,
        typeahead: TypeaheadConfig,
        tab: TabBehavior,
    ) -> Self {
        let overlay = overlays.register(OverlayConfig {
            group,
            parent,
            listeners: Listeners::POPUP,
        });
        Self {
            overlay,
            nav: NavigationState::with_config(policy, typeahead),
            button: None,
            items: None,
            keys: KeyPressState::new(),
            pointer: TrackedPointer::new(),
            outside: OutsideClick::new(),
            tab,
            orientation: Orientation::Vertical,
        }
    }

    pub(crate) fn id(&self) -> OverlayId {
        self.overlay.id()
    }

    pub(crate) fn set_close_hook(&self, hook: CloseHook) {
        self.overlay.set_close_hook(hook);
    }

    pub(crate) fn button(&self) -> Option<NodeId> {
        self.button
    }

    pub(crate) fn items(&self) -> Option<NodeId> {
        self.items
    }

    pub(crate) fn set_button(&mut self, button: Option<NodeId>) {
        self.button = button;
        self.overlay.set_trigger(button);
    }

    pub(crate) fn set_items(&mut self, items: Option<NodeId>) {
        self.items = items;
        self.overlay.set_containers(items.as_slice());
    }

    pub(crate) fn register(&mut self, doc: &Document, node: NodeId, data: ItemData) -> bool {
        self.nav.register(doc, node, data)
    }

    pub(crate) fn unregister(&mut self, node: NodeId) -> bool {
        self.nav.unregister(node)
    }

    pub(crate) fn is_open(&self) -> bool {
        self.overlay.is_open()
    }

    /// The active item; always `None` while closed.
    pub(crate) fn active(&self) -> Option<NodeId> {
        if self.is_open() { self.nav.active() } else { None }
    }

    pub(crate) fn item_state(&self, node: NodeId) -> ItemState {
        ItemState {
            active: self.active() == Some(node),
            disabled: !self.nav.registry().is_enabled(node),
            selected: false,
        }
    }

    /// Open (or, if already open, re-seed) and apply `seed`.
    pub(crate) fn open(
        &mut self,
        doc: &Document,
        origin: Origin,
        seed: Navigation<NodeId>,
        focused: Option<NodeId>,
    ) -> Effects {
        let mut fx = Effects::new();
        if !self.is_open() {
            fx.dismissed(self.overlay.open(doc, focused));
            self.nav.reset(None);
            self.pointer.reset();
            log::debug!("popup {:?} opened ({origin:?})", self.overlay.id());
        }
        self.nav.navigate(seed);
        if origin.moves_focus() {
            fx.focus(self.items);
        }
        if let Some(active) = self.nav.active() {
            fx.push(Effect::ScrollIntoView(active));
        }
        fx
    }

    pub(crate) fn close(&mut self, doc: &Document, reason: CloseReason) -> Effects {
        let mut fx = Effects::new();
        let closed = self.overlay.close();
        if closed.is_empty() {
            return fx;
        }
        let own = self.overlay.id();
        for id in closed.into_iter().filter(|&id| id != own) {
            fx.push(Effect::Dismissed {
                id,
                restore_focus: None,
            });
        }
        self.nav.deactivate();
        self.pointer.reset();
        log::debug!("popup {own:?} closed ({reason:?})");
        fx.focus(focus_after_close(doc, reason, self.button));
        fx
    }

    /// Forget navigation state after the stack closed the instance on its own.
    pub(crate) fn sync_closed(&mut self) {
        if !self.is_open() {
            self.nav.deactivate();
            self.pointer.reset();
        }
    }

    /// Apply a navigation command; inert while closed.
    pub(crate) fn navigate(&mut self, command: Navigation<NodeId>) -> Effects {
        let mut fx = Effects::new();
        if !self.is_open() {
            return fx;
        }
        if self.nav.navigate(command)
            && let Some(active) = self.nav.active()
        {
            fx.push(Effect::ScrollIntoView(active));
        }
        fx
    }

    /// Record a keydown and report whether it is a fresh press.
    pub(crate) fn key_down(&mut self, event: &KeyEvent) -> bool {
        self.keys.on_key_down(event).is_press()
    }

    pub(crate) fn key_up(&mut self, key: Key) {
        self.keys.on_key_up(key);
    }

    pub(crate) fn items_key_down(
        &mut self,
        doc: &Document,
        event: &KeyEvent,
        now: u64,
    ) -> ItemsKey {
        let mut fx = Effects::new();
        if !self.is_open() {
            return ItemsKey::Done(fx);
        }
        let fresh = self.key_down(event);
        let (next, previous) = match self.orientation {
            Orientation::Vertical => (Key::ArrowDown, Key::ArrowUp),
            Orientation::Horizontal => (Key::ArrowRight, Key::ArrowLeft),
        };
        match event.key {
            Key::Space if self.nav.is_searching(now) => {
                fx.prevent_default();
                self.nav.search(' ', now);
            }
            Key::Enter | Key::Space => {
                if fresh {
                    return ItemsKey::Activate(self.nav.active());
                }
                fx.prevent_default();
            }
            Key::Escape => {
                if self.overlay.is_top_most() {
                    fx.prevent_default();
                    fx.push(Effect::StopPropagation);
                    fx.extend(self.close(doc, CloseReason::Escape));
                }
            }
            Key::Tab => match self.tab {
                TabBehavior::Trap => fx.prevent_default(),
                TabBehavior::Exit => fx.extend(self.close(doc, CloseReason::TabExit)),
            },
            k if k == next => {
                fx.prevent_default();
                fx.extend(self.navigate(Navigation::Next));
            }
            k if k == previous => {
                fx.prevent_default();
                fx.extend(self.navigate(Navigation::Previous));
            }
            Key::Home | Key::PageUp => {
                fx.prevent_default();
                fx.extend(self.navigate(Navigation::First));
            }
            Key::End | Key::PageDown => {
                fx.prevent_default();
                fx.extend(self.navigate(Navigation::Last));
            }
            Key::Backspace => {
                if self.nav.is_searching(now) {
                    fx.prevent_default();
                    self.nav.search_backspace(now);
                }
            }
            Key::Character(c) if !event.has_command_modifier() => {
                if let Some(found) = self.nav.search(c, now) {
                    fx.push(Effect::ScrollIntoView(found));
                }
            }
            _ => {}
        }
        ItemsKey::Done(fx)
    }

    pub(crate) fn pointer_move(&mut self, node: NodeId, position: Point) -> bool {
        if !self.is_open() || !self.pointer.moved(position) {
            return false;
        }
        if !self.nav.registry().is_enabled(node) || self.nav.is_active(node) {
            return false;
        }
        self.nav.navigate(Navigation::Specific(node))
    }

    pub(crate) fn pointer_leave(&mut self, node: NodeId) -> bool {
        if !self.is_open() || !self.nav.is_active(node) {
            return false;
        }
        self.nav.navigate(Navigation::Nothing)
    }

    pub(crate) fn pointer_down(&mut self, target: Option<NodeId>) {
        self.outside.on_pointer_down(target);
    }

    pub(crate) fn document_click(&mut self, doc: &Document, target: Option<NodeId>) -> Effects {
        if !self.is_open() {
            return Effects::new();
        }
        let containers: SmallVec<[NodeId; 2]> =
            self.button.into_iter().chain(self.items).collect();
        if !self.outside.is_outside(doc, target, &containers) {
            return Effects::new();
        }
        // Content of open nested popups counts as inside.
        if target.is_some_and(|t| self.overlay.owns(doc, t)) {
            return Effects::new();
        }
        self.close(doc, CloseReason::OutsideClick { target })
    }

    /// Focus landed on `target`. Outside the owned subtrees, held keys are
    /// forgotten (their keyups go elsewhere) and an open list closes.
    pub(crate) fn focus_in(&mut self, doc: &Document, target: Option<NodeId>) -> Effects {
        match target {
            Some(t) if !self.overlay.owns(doc, t) => {
                self.keys.clear();
                if self.is_open() {
                    self.close(doc, CloseReason::FocusOut)
                } else {
                    Effects::new()
                }
            }
            _ => Effects::new(),
        }
    }

    /// The host window or the component lost focus.
    pub(crate) fn blur(&mut self) {
        self.keys.clear();
    }

    pub(crate) fn poll(&mut self, now: u64) -> bool {
        self.nav.poll(now)
    }

    pub(crate) fn search_deadline(&self) -> Option<u64> {
        self.nav.typeahead().deadline()
    }
}
