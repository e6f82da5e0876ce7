// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dialog: a modal panel with a focus trap.
//!
//! A dialog is always controlled. The application owns `open` and is told
//! through `on_close` when the user asks to close (Escape, a click outside
//! the panel); it then calls [`Dialog::set_open`] with `false`. Only the
//! top-most open dialog reacts, so with nested dialogs each Escape closes one
//! level.
//!
//! While open, Tab and Shift+Tab cycle among the tabbable elements of the
//! panel and focus that escapes is pulled back. Closing returns focus to
//! whatever had it before the dialog opened.
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use understory_document::{Document, NodeFlags};
//! use understory_event_state::key::{Key, KeyEvent};
//! use understory_headless::dialog::{Dialog, DialogConfig};
//! use understory_overlay::controller::CloseReason;
//! use understory_overlay::handle::Overlays;
//!
//! let mut doc = Document::new();
//! let opener = doc.insert(None, NodeFlags::CONTROL);
//! let panel = doc.insert(None, NodeFlags::empty());
//! let confirm = doc.insert(Some(panel), NodeFlags::CONTROL);
//!
//! let requests = Rc::new(RefCell::new(Vec::new()));
//! let sink = requests.clone();
//! let overlays = Overlays::new();
//! let mut dialog = Dialog::new(
//!     &overlays,
//!     DialogConfig::default(),
//!     Some(false),
//!     Some(Box::new(move |reason: CloseReason| sink.borrow_mut().push(reason))),
//! )
//! .unwrap();
//! dialog.set_panel(Some(panel));
//!
//! let fx = dialog.set_open(&doc, true, Some(opener));
//! assert_eq!(fx.focus_target(), Some(confirm));
//!
//! dialog.on_key_down(&doc, &KeyEvent::new(Key::Escape), Some(confirm));
//! assert_eq!(*requests.borrow(), [CloseReason::Escape]);
//!
//! let fx = dialog.set_open(&doc, false, Some(confirm));
//! assert_eq!(fx.focus_target(), Some(opener));
//! ```

use alloc::boxed::Box;
use core::cell::RefCell;
use core::fmt;

use understory_document::{Document, NodeId};
use understory_event_state::key::{Key, KeyEvent};
use understory_overlay::controller::CloseReason;
use understory_overlay::focus_trap::FocusTrap;
use understory_overlay::handle::{OverlayHandle, Overlays};
use understory_overlay::listeners::Listeners;
use understory_overlay::outside::OutsideClick;
use understory_overlay::stack::{OverlayConfig, OverlayId};

use crate::effects::{Effect, Effects};
use crate::error::UsageError;
use crate::notify::{SharedObservers, SubscriptionId};
use crate::render::{AttrValue, Props, RenderFeatures, Visibility};
use crate::scope::Scope;

/// Close request callback.
pub type OnClose = Box<dyn FnMut(CloseReason)>;

/// Dialog configuration.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DialogConfig {
    /// Enclosing overlay, for dialogs opened from inside another one.
    pub parent: Option<OverlayId>,
    /// Element focused on open; defaults to the first tabbable element.
    pub initial_focus: Option<NodeId>,
}

/// Observable dialog state.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DialogSnapshot {
    /// The dialog is open.
    pub open: bool,
}

/// Headless modal dialog.
pub struct Dialog {
    overlay: OverlayHandle,
    open: bool,
    on_close: OnClose,
    initial_focus: Option<NodeId>,
    panel: Option<NodeId>,
    title: Option<NodeId>,
    description: Option<NodeId>,
    trap: Option<FocusTrap>,
    outside: OutsideClick,
    observers: SharedObservers<DialogSnapshot>,
}

impl fmt::Debug for Dialog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dialog")
            .field("overlay", &self.overlay)
            .field("open", &self.open)
            .field("panel", &self.panel)
            .field("trap", &self.trap)
            .finish_non_exhaustive()
    }
}

impl Dialog {
    /// Name used in usage errors.
    pub const NAME: &'static str = "Dialog";

    /// Create a dialog.
    ///
    /// `open` and `on_close` must both be provided. The initial `open` value
    /// takes effect on [`Dialog::mount`].
    pub fn new(
        overlays: &Overlays,
        config: DialogConfig,
        open: Option<bool>,
        on_close: Option<OnClose>,
    ) -> Result<Self, UsageError> {
        let (open, on_close) = match (open, on_close) {
            (Some(open), Some(on_close)) => (open, on_close),
            (Some(_), None) => {
                return Err(UsageError::MissingControlPair {
                    component: Self::NAME,
                    provided: "open",
                    missing: "on_close",
                });
            }
            (None, Some(_)) => {
                return Err(UsageError::MissingControlPair {
                    component: Self::NAME,
                    provided: "on_close",
                    missing: "open",
                });
            }
            (None, None) => {
                return Err(UsageError::MissingControl {
                    component: Self::NAME,
                    first: "open",
                    second: "on_close",
                });
            }
        };
        let overlay = overlays.register(OverlayConfig {
            group: None,
            parent: config.parent,
            listeners: Listeners::MODAL,
        });
        let observers = SharedObservers::with_initial(DialogSnapshot { open: false });
        overlay.set_close_hook(observers.close_hook(|s| s.open = false));
        Ok(Self {
            overlay,
            open,
            on_close,
            initial_focus: config.initial_focus,
            panel: None,
            title: None,
            description: None,
            trap: None,
            outside: OutsideClick::new(),
            observers,
        })
    }

    /// The dialog provided to `Dialog.Panel`, `Dialog.Title` and
    /// `Dialog.Description` parts.
    pub fn from_scope<'s>(
        scope: &Scope<'s>,
        part: &'static str,
    ) -> Result<&'s RefCell<Self>, UsageError> {
        scope.require::<RefCell<Self>>(part, Self::NAME)
    }

    /// Overlay id, used as the parent of nested overlays.
    pub fn id(&self) -> OverlayId {
        self.overlay.id()
    }

    /// The `Dialog.Panel` element.
    pub fn set_panel(&mut self, panel: Option<NodeId>) {
        self.panel = panel;
        self.overlay.set_containers(panel.as_slice());
        self.trap = panel.map(FocusTrap::new);
    }

    /// The `Dialog.Title` element.
    pub fn set_title(&mut self, title: Option<NodeId>) {
        self.title = title;
    }

    /// The `Dialog.Description` element.
    pub fn set_description(&mut self, description: Option<NodeId>) {
        self.description = description;
    }

    /// The dialog is open.
    pub fn is_open(&self) -> bool {
        self.overlay.is_open()
    }

    /// Current observable state.
    pub fn snapshot(&self) -> DialogSnapshot {
        DialogSnapshot {
            open: self.is_open(),
        }
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(
        &mut self,
        callback: impl FnMut(&DialogSnapshot) + 'static,
    ) -> SubscriptionId {
        self.observers.subscribe(callback)
    }

    /// Remove a subscription.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Apply the initial `open` value once the parts are in the document.
    pub fn mount(&mut self, doc: &Document, focused: Option<NodeId>) -> Effects {
        self.set_open(doc, self.open, focused)
    }

    /// Apply the application's `open` value.
    ///
    /// `focused` is the element that has focus right now; on open it becomes
    /// the restore target.
    pub fn set_open(&mut self, doc: &Document, open: bool, focused: Option<NodeId>) -> Effects {
        let mut fx = Effects::new();
        self.open = open;
        if open && !self.overlay.is_open() {
            fx.dismissed(self.overlay.open(doc, focused));
            log::debug!("dialog {:?} opened", self.overlay.id());
            if let Some(trap) = &mut self.trap {
                fx.focus(trap.activate(doc, focused, self.initial_focus));
            }
        } else if !open {
            let own = self.overlay.id();
            for id in self.overlay.close().into_iter().filter(|&id| id != own) {
                fx.push(Effect::Dismissed {
                    id,
                    restore_focus: None,
                });
            }
            // The trap may outlive the overlay if an ancestor closed first.
            if let Some(trap) = &mut self.trap
                && trap.is_active()
            {
                log::debug!("dialog {own:?} closed");
                fx.focus(trap.deactivate(doc));
            }
        }
        self.commit(fx)
    }

    /// Keydown anywhere while the dialog may be open.
    ///
    /// Hosts deliver keys to every open dialog; only the top-most reacts.
    pub fn on_key_down(
        &mut self,
        doc: &Document,
        event: &KeyEvent,
        focused: Option<NodeId>,
    ) -> Effects {
        let mut fx = Effects::new();
        if !self.overlay.is_open() || !self.overlay.is_top_most() {
            return fx;
        }
        match event.key {
            Key::Escape => {
                fx.prevent_default();
                fx.push(Effect::StopPropagation);
                (self.on_close)(CloseReason::Escape);
            }
            Key::Tab => {
                if let Some(trap) = self.trap.filter(FocusTrap::is_active) {
                    fx.prevent_default();
                    fx.focus(trap.next_tab_stop(doc, focused, event.shift()));
                }
            }
            _ => {}
        }
        fx
    }

    /// Pointer down anywhere.
    pub fn on_pointer_down(&mut self, target: Option<NodeId>) {
        self.outside.on_pointer_down(target);
    }

    /// Click anywhere, after the target's own handlers.
    pub fn on_document_click(&mut self, doc: &Document, target: Option<NodeId>) -> Effects {
        let mut fx = Effects::new();
        if !self.overlay.is_open() || !self.overlay.is_top_most() {
            // Keep the recorded pointer down from leaking into a later click.
            self.outside = OutsideClick::new();
            return fx;
        }
        let panel = self.panel.as_slice();
        if self.outside.is_outside(doc, target, panel)
            && !target.is_some_and(|t| self.overlay.owns(doc, t))
        {
            fx.prevent_default();
            (self.on_close)(CloseReason::OutsideClick { target });
        }
        fx
    }

    /// Focus moved to `target`.
    pub fn on_focus_in(&mut self, doc: &Document, target: Option<NodeId>) -> Effects {
        let mut fx = Effects::new();
        if !self.overlay.is_open() || !self.overlay.is_top_most() {
            return fx;
        }
        if let Some(trap) = &self.trap {
            fx.focus(trap.contain(doc, target));
        }
        fx
    }

    /// Props for `Dialog.Panel`.
    pub fn panel_props(&self) -> Props {
        Props::new()
            .with("role", AttrValue::Str("dialog"))
            .with("aria-modal", AttrValue::Bool(true))
            .with("tabindex", AttrValue::Int(-1))
            .with_opt("aria-labelledby", self.title.map(AttrValue::Ref))
            .with_opt("aria-describedby", self.description.map(AttrValue::Ref))
    }

    /// Presence of `Dialog.Panel` under `features`.
    pub fn panel_visibility(&self, features: RenderFeatures) -> Visibility {
        features.resolve(self.is_open())
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

    type Requests = Rc<RefCell<Vec<CloseReason>>>;

    struct Fixture {
        doc: Document,
        opener: NodeId,
        panel: NodeId,
        cancel: NodeId,
        confirm: NodeId,
        outside: NodeId,
    }

    fn fixture() -> Fixture {
        let mut doc = Document::new();
        let opener = doc.insert(None, NodeFlags::CONTROL);
        let outside = doc.insert(None, NodeFlags::CONTROL);
        let panel = doc.insert(None, NodeFlags::FOCUSABLE);
        let cancel = doc.insert(Some(panel), NodeFlags::CONTROL);
        let confirm = doc.insert(Some(panel), NodeFlags::CONTROL);
        Fixture {
            doc,
            opener,
            panel,
            cancel,
            confirm,
            outside,
        }
    }

    fn dialog(overlays: &Overlays, config: DialogConfig) -> (Dialog, Requests) {
        let requests = Requests::default();
        let sink = requests.clone();
        let dialog = Dialog::new(
            overlays,
            config,
            Some(false),
            Some(Box::new(move |reason: CloseReason| sink.borrow_mut().push(reason))),
        );
        match dialog {
            Ok(d) => (d, requests),
            Err(e) => panic!("{e}"),
        }
    }

    #[test]
    fn control_pair_is_required() {
        let overlays = Overlays::new();
        let config = DialogConfig::default();
        let on_close = || -> OnClose { Box::new(|_: CloseReason| {}) };
        assert_eq!(
            Dialog::new(&overlays, config, Some(true), None).err(),
            Some(UsageError::MissingControlPair {
                component: "Dialog",
                provided: "open",
                missing: "on_close",
            })
        );
        assert_eq!(
            Dialog::new(&overlays, config, None, Some(on_close())).err(),
            Some(UsageError::MissingControlPair {
                component: "Dialog",
                provided: "on_close",
                missing: "open",
            })
        );
        assert_eq!(
            Dialog::new(&overlays, config, None, None).err(),
            Some(UsageError::MissingControl {
                component: "Dialog",
                first: "open",
                second: "on_close",
            })
        );
        assert!(Dialog::new(&overlays, config, Some(false), Some(on_close())).is_ok());
    }

    #[test]
    fn initial_focus_and_restore() {
        let f = fixture();
        let overlays = Overlays::new();
        let config = DialogConfig {
            initial_focus: Some(f.confirm),
            ..DialogConfig::default()
        };
        let (mut dialog, _) = dialog(&overlays, config);
        dialog.set_panel(Some(f.panel));
        let fx = dialog.set_open(&f.doc, true, Some(f.opener));
        assert_eq!(fx.focus_target(), Some(f.confirm));
        assert!(fx.changed());
        assert_eq!(overlays.listeners(), Listeners::MODAL);
        let fx = dialog.set_open(&f.doc, false, Some(f.confirm));
        assert_eq!(fx.focus_target(), Some(f.opener));
        assert!(overlays.listeners().is_empty());
    }

    #[test]
    fn tab_cycles_within_panel() {
        let f = fixture();
        let overlays = Overlays::new();
        let (mut dialog, _) = dialog(&overlays, DialogConfig::default());
        dialog.set_panel(Some(f.panel));
        dialog.set_open(&f.doc, true, Some(f.opener));
        let tab = KeyEvent::new(Key::Tab);
        let fx = dialog.on_key_down(&f.doc, &tab, Some(f.cancel));
        assert_eq!(fx.focus_target(), Some(f.confirm));
        assert!(fx.prevents_default());
        let fx = dialog.on_key_down(&f.doc, &tab, Some(f.confirm));
        assert_eq!(fx.focus_target(), Some(f.cancel));
    }

    #[test]
    fn escaped_focus_is_pulled_back() {
        let f = fixture();
        let overlays = Overlays::new();
        let (mut dialog, _) = dialog(&overlays, DialogConfig::default());
        dialog.set_panel(Some(f.panel));
        dialog.set_open(&f.doc, true, Some(f.opener));
        let fx = dialog.on_focus_in(&f.doc, Some(f.outside));
        assert_eq!(fx.focus_target(), Some(f.cancel));
        assert!(dialog.on_focus_in(&f.doc, Some(f.confirm)).is_empty());
    }

    #[test]
    fn outside_click_requests_close() {
        let f = fixture();
        let overlays = Overlays::new();
        let (mut dialog, requests) = dialog(&overlays, DialogConfig::default());
        dialog.set_panel(Some(f.panel));
        dialog.set_open(&f.doc, true, Some(f.opener));
        dialog.on_pointer_down(Some(f.cancel));
        dialog.on_document_click(&f.doc, Some(f.cancel));
        assert!(requests.borrow().is_empty());
        dialog.on_pointer_down(Some(f.outside));
        dialog.on_document_click(&f.doc, Some(f.outside));
        assert_eq!(
            *requests.borrow(),
            [CloseReason::OutsideClick {
                target: Some(f.outside)
            }]
        );
        // Controlled: still open until the application says otherwise.
        assert!(dialog.is_open());
    }

    #[test]
    fn only_top_most_dialog_reacts() {
        let mut f = fixture();
        let inner_panel = f.doc.insert(None, NodeFlags::empty());
        let inner_button = f.doc.insert(Some(inner_panel), NodeFlags::CONTROL);
        let overlays = Overlays::new();
        let (mut outer, outer_requests) = dialog(&overlays, DialogConfig::default());
        outer.set_panel(Some(f.panel));
        let config = DialogConfig {
            parent: Some(outer.id()),
            ..DialogConfig::default()
        };
        let (mut inner, inner_requests) = dialog(&overlays, config);
        inner.set_panel(Some(inner_panel));
        let inner_seen: Rc<RefCell<Vec<bool>>> = Rc::default();
        let sink = inner_seen.clone();
        inner.subscribe(move |s| sink.borrow_mut().push(s.open));
        outer.set_open(&f.doc, true, Some(f.opener));
        inner.set_open(&f.doc, true, Some(f.confirm));

        let escape = KeyEvent::new(Key::Escape);
        inner.on_key_down(&f.doc, &escape, Some(inner_button));
        outer.on_key_down(&f.doc, &escape, Some(inner_button));
        assert_eq!(inner_requests.borrow().len(), 1);
        assert!(outer_requests.borrow().is_empty());

        // Clicking the nested dialog is not outside the outer one.
        outer.on_pointer_down(Some(inner_button));
        outer.on_document_click(&f.doc, Some(inner_button));
        assert!(outer_requests.borrow().is_empty());

        // Closing the outer dialog closes the nested one with it.
        let fx = outer.set_open(&f.doc, false, Some(inner_button));
        assert!(!inner.is_open());
        assert!(fx.contains(&Effect::Dismissed {
            id: inner.id(),
            restore_focus: None,
        }));
        assert_eq!(*inner_seen.borrow(), [true, false]);
    }

    #[test]
    fn title_and_description_label_the_panel() {
        let mut f = fixture();
        let title = f.doc.insert(Some(f.panel), NodeFlags::empty());
        let overlays = Overlays::new();
        let (dialog, _) = dialog(&overlays, DialogConfig::default());
        let cell = RefCell::new(dialog);
        let root = Scope::root();
        let scope = root.provide(&cell);
        Dialog::from_scope(&scope, "Dialog.Title")
            .map(|d| d.borrow_mut().set_title(Some(title)))
            .ok();
        let props = cell.borrow().panel_props();
        assert_eq!(props.get("aria-labelledby"), Some(&AttrValue::Ref(title)));
        assert_eq!(props.get("role"), Some(&AttrValue::Str("dialog")));
        assert!(Dialog::from_scope(&root, "Dialog.Title").is_err());
    }
}
