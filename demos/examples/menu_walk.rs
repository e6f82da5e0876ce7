// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A toy host driving a headless menu and a confirmation dialog.
//!
//! This example shows how to combine:
//! - `understory_document` as the host's mirror of its element tree,
//! - `understory_headless` components fed with key and pointer events,
//! - `understory_overlay` as the shared open-instance context.
//!
//! The host applies [`Effects`] by printing them and tracking focus.
//!
//! Run:
//! - `cargo run -p understory_demos --example menu_walk`

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use kurbo::Point;
use understory_collection::registry::ItemData;
use understory_document::{Document, NodeFlags, NodeId};
use understory_event_state::key::{Key, KeyEvent};
use understory_headless::dialog::{Dialog, DialogConfig};
use understory_headless::effects::{Effect, Effects};
use understory_headless::menu::{Menu, MenuConfig};
use understory_overlay::controller::CloseReason;
use understory_overlay::handle::Overlays;

/// Minimal host: element names for printing and the focused element.
struct Host {
    names: HashMap<NodeId, &'static str>,
    focused: Option<NodeId>,
}

impl Host {
    fn add(
        &mut self,
        doc: &mut Document,
        parent: Option<NodeId>,
        flags: NodeFlags,
        name: &'static str,
    ) -> NodeId {
        let node = doc.insert(parent, flags);
        self.names.insert(node, name);
        node
    }

    fn name(&self, node: NodeId) -> &'static str {
        self.names.get(&node).copied().unwrap_or("?")
    }

    fn apply(&mut self, what: &str, fx: &Effects) {
        println!("{what}");
        for effect in fx {
            match *effect {
                Effect::Focus(n) => {
                    self.focused = Some(n);
                    println!("  focus -> {}", self.name(n));
                }
                Effect::Activate(n) => println!("  activate {}", self.name(n)),
                Effect::ScrollIntoView(n) => println!("  scroll {} into view", self.name(n)),
                Effect::Dismissed { id, restore_focus } => {
                    println!("  dismissed {id:?}");
                    if let Some(n) = restore_focus {
                        self.focused = Some(n);
                    }
                }
                Effect::Changed => println!("  re-render"),
                Effect::PreventDefault | Effect::StopPropagation | Effect::SubmitForm => {}
            }
        }
    }
}

fn main() {
    let mut doc = Document::new();
    let mut host = Host {
        names: HashMap::new(),
        focused: None,
    };
    let button = host.add(&mut doc, None, NodeFlags::CONTROL, "Menu.Button");
    let items = host.add(&mut doc, None, NodeFlags::FOCUSABLE, "Menu.Items");
    let pickup = host.add(&mut doc, Some(items), NodeFlags::empty(), "Pickup");
    let delivery = host.add(&mut doc, Some(items), NodeFlags::empty(), "Home delivery");
    let dine_in = host.add(&mut doc, Some(items), NodeFlags::empty(), "Dine-in");
    let panel = host.add(&mut doc, None, NodeFlags::empty(), "Dialog.Panel");
    let cancel = host.add(&mut doc, Some(panel), NodeFlags::CONTROL, "Cancel");
    host.add(&mut doc, Some(panel), NodeFlags::CONTROL, "Confirm");
    host.focused = Some(button);

    let overlays = Overlays::new();
    let mut menu = Menu::new(&overlays, MenuConfig::default());
    menu.set_button(Some(button));
    menu.set_items(Some(items));
    menu.register_item(&doc, dine_in, ItemData::new("Dine-in"));
    menu.register_item(&doc, pickup, ItemData::new("Pickup"));
    menu.register_item(&doc, delivery, ItemData::new("Home delivery").disabled(true));

    let fx = menu.on_button_key_down(&doc, &KeyEvent::new(Key::ArrowDown), host.focused);
    host.apply("ArrowDown on the button", &fx);
    menu.on_key_up(Key::ArrowDown);
    let fx = menu.on_items_key_down(&doc, &KeyEvent::new(Key::ArrowDown), 0);
    host.apply("ArrowDown skips the disabled item", &fx);

    // Hovering the disabled item changes nothing; hovering Pickup activates it.
    let fx = menu.on_item_pointer_move(delivery, Point::new(10.0, 30.0));
    host.apply("pointer over Home delivery", &fx);
    let fx = menu.on_item_pointer_move(pickup, Point::new(10.0, 10.0));
    host.apply("pointer over Pickup", &fx);

    let fx = menu.on_items_key_down(&doc, &KeyEvent::new(Key::Enter), 100);
    host.apply("Enter", &fx);

    // Choosing an option asks for confirmation in a dialog.
    let close_requested = Rc::new(Cell::new(None));
    let sink = Rc::clone(&close_requested);
    let Ok(mut dialog) = Dialog::new(
        &overlays,
        DialogConfig::default(),
        Some(false),
        Some(Box::new(move |reason: CloseReason| sink.set(Some(reason)))),
    ) else {
        return;
    };
    dialog.set_panel(Some(panel));
    let fx = dialog.set_open(&doc, true, host.focused);
    host.apply("dialog opened", &fx);

    let fx = dialog.on_key_down(&doc, &KeyEvent::new(Key::Tab), host.focused);
    host.apply("Tab", &fx);
    let fx = dialog.on_key_down(&doc, &KeyEvent::new(Key::Tab), host.focused);
    host.apply("Tab wraps", &fx);
    assert_eq!(host.focused, Some(cancel));

    let fx = dialog.on_key_down(&doc, &KeyEvent::new(Key::Escape), host.focused);
    host.apply("Escape", &fx);
    if let Some(reason) = close_requested.take() {
        println!("application closes the dialog ({reason:?})");
        let fx = dialog.set_open(&doc, false, host.focused);
        host.apply("dialog closed", &fx);
    }
    println!("focus ends on {}", host.focused.map_or("nothing", |n| host.name(n)));
}
