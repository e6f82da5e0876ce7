// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Whole-component walks driven the way a host would drive them.

use std::cell::RefCell;
use std::rc::Rc;

use understory_collection::navigator::Navigation;
use understory_collection::registry::ItemData;
use understory_document::{Document, NodeFlags, NodeId};
use understory_event_state::key::{Key, KeyEvent};
use understory_headless::dialog::{Dialog, DialogConfig};
use understory_headless::effects::Effect;
use understory_headless::listbox::{Listbox, ListboxConfig, ListboxValue};
use understory_headless::menu::{Menu, MenuConfig};
use understory_headless::scope::Scope;
use understory_headless::UsageError;
use understory_overlay::controller::CloseReason;
use understory_overlay::handle::Overlays;

fn key(k: Key) -> KeyEvent {
    KeyEvent::new(k)
}

struct FulfillmentMenu {
    doc: Document,
    menu: Menu,
    button: NodeId,
    items: NodeId,
    pickup: NodeId,
    delivery: NodeId,
    dine_in: NodeId,
}

fn fulfillment_menu(overlays: &Overlays) -> FulfillmentMenu {
    let mut doc = Document::new();
    let button = doc.insert(None, NodeFlags::CONTROL);
    let items = doc.insert(None, NodeFlags::FOCUSABLE);
    let pickup = doc.insert(Some(items), NodeFlags::empty());
    let delivery = doc.insert(Some(items), NodeFlags::empty());
    let dine_in = doc.insert(Some(items), NodeFlags::empty());
    let mut menu = Menu::new(overlays, MenuConfig::default());
    menu.set_button(Some(button));
    menu.set_items(Some(items));
    menu.register_item(&doc, pickup, ItemData::new("Pickup"));
    menu.register_item(&doc, delivery, ItemData::new("Home delivery").disabled(true));
    menu.register_item(&doc, dine_in, ItemData::new("Dine-in"));
    FulfillmentMenu {
        doc,
        menu,
        button,
        items,
        pickup,
        delivery,
        dine_in,
    }
}

#[test]
fn fulfillment_walk_skips_disabled_and_stops_at_end() {
    let overlays = Overlays::new();
    let mut f = fulfillment_menu(&overlays);
    let fx = f.menu.on_button_click(&f.doc, Some(f.button));
    assert_eq!(fx.focus_target(), Some(f.items));
    assert_eq!(f.menu.active(), None);

    let down = key(Key::ArrowDown);
    f.menu.on_items_key_down(&f.doc, &down, 0);
    assert_eq!(f.menu.active(), Some(f.pickup));
    f.menu.on_key_up(Key::ArrowDown);
    f.menu.on_items_key_down(&f.doc, &down, 10);
    assert_eq!(f.menu.active(), Some(f.dine_in));
    f.menu.on_key_up(Key::ArrowDown);
    f.menu.on_items_key_down(&f.doc, &down, 20);
    assert_eq!(f.menu.active(), Some(f.dine_in));
    assert!(!f.menu.item_state(f.delivery).active);
    assert!(f.menu.item_state(f.delivery).disabled);

    let fx = f.menu.on_items_key_down(&f.doc, &key(Key::Enter), 30);
    assert_eq!(fx.activated(), Some(f.dine_in));
    assert_eq!(fx.focus_target(), Some(f.button));
    assert!(!f.menu.is_open());
    assert_eq!(overlays.open_count(), 0);
}

#[test]
fn disabled_item_click_keeps_menu_open() {
    let overlays = Overlays::new();
    let mut f = fulfillment_menu(&overlays);
    f.menu.on_button_click(&f.doc, Some(f.button));
    let fx = f.menu.on_item_click(&f.doc, f.delivery);
    assert_eq!(fx.activated(), None);
    assert!(fx.prevents_default());
    assert!(f.menu.is_open());
}

#[test]
fn unregistering_active_item_clears_it() {
    let overlays = Overlays::new();
    let mut f = fulfillment_menu(&overlays);
    f.menu
        .on_button_key_down(&f.doc, &key(Key::ArrowUp), Some(f.button));
    assert_eq!(f.menu.active(), Some(f.dine_in));
    let fx = f.menu.unregister_item(f.dine_in);
    assert!(fx.changed());
    assert_eq!(f.menu.active(), None);
    assert_eq!(f.menu.snapshot().active, None);
    // Navigation restarts from nothing rather than a neighbor.
    f.menu.dispatch(Navigation::Previous);
    assert_eq!(f.menu.active(), Some(f.pickup));
}

#[test]
fn items_follow_document_order_whatever_the_mount_order() {
    let mut doc = Document::new();
    let button = doc.insert(None, NodeFlags::CONTROL);
    let items = doc.insert(None, NodeFlags::FOCUSABLE);
    let b = doc.insert(Some(items), NodeFlags::empty());
    let d = doc.insert(Some(items), NodeFlags::empty());
    let overlays = Overlays::new();
    let mut menu = Menu::new(&overlays, MenuConfig::default());
    menu.set_button(Some(button));
    menu.set_items(Some(items));
    menu.register_item(&doc, d, ItemData::new("d"));
    menu.register_item(&doc, b, ItemData::new("b"));
    // Mounted late, placed first and between.
    let a = doc.insert_at(Some(items), 0, NodeFlags::empty());
    let c = doc.insert_at(Some(items), 2, NodeFlags::empty());
    menu.register_item(&doc, c, ItemData::new("c"));
    menu.register_item(&doc, a, ItemData::new("a"));

    menu.set_open(&doc, true, Default::default(), None);
    let mut walk = Vec::new();
    for _ in 0..4 {
        menu.dispatch(Navigation::Next);
        walk.extend(menu.active());
    }
    assert_eq!(walk, [a, b, c, d]);

    // Unregistering and re-registering keeps the order too.
    menu.unregister_item(b);
    menu.register_item(&doc, b, ItemData::new("b"));
    menu.dispatch(Navigation::First);
    menu.dispatch(Navigation::Next);
    assert_eq!(menu.active(), Some(b));
}

#[test]
fn typeahead_extends_within_window_only() {
    let mut doc = Document::new();
    let items = doc.insert(None, NodeFlags::FOCUSABLE);
    let names = ["alice", "bob", "oscar"];
    let nodes: Vec<NodeId> = names
        .iter()
        .map(|_| doc.insert(Some(items), NodeFlags::empty()))
        .collect();
    let overlays = Overlays::new();
    let mut menu = Menu::new(&overlays, MenuConfig::default());
    menu.set_items(Some(items));
    for (node, name) in nodes.iter().zip(names) {
        menu.register_item(&doc, *node, ItemData::new(name));
    }
    menu.set_open(&doc, true, Default::default(), None);

    let b = key(Key::Character('b'));
    let o = key(Key::Character('o'));
    menu.on_items_key_down(&doc, &b, 0);
    menu.on_key_up(Key::Character('b'));
    menu.on_items_key_down(&doc, &o, 100);
    menu.on_key_up(Key::Character('o'));
    assert_eq!(menu.active(), Some(nodes[1]));
    assert_eq!(menu.search_deadline(), Some(450));

    menu.close(&doc, CloseReason::Programmatic);
    menu.set_open(&doc, true, Default::default(), None);
    menu.on_items_key_down(&doc, &b, 1000);
    menu.on_key_up(Key::Character('b'));
    assert!(menu.poll(1400));
    menu.on_items_key_down(&doc, &o, 1400);
    assert_eq!(menu.active(), Some(nodes[2]));
}

#[test]
fn eviction_restores_focus_only_from_inside() {
    let mut doc = Document::new();
    let a_button = doc.insert(None, NodeFlags::CONTROL);
    let a_items = doc.insert(None, NodeFlags::FOCUSABLE);
    let a_item = doc.insert(Some(a_items), NodeFlags::empty());
    let b_button = doc.insert(None, NodeFlags::CONTROL);
    let b_items = doc.insert(None, NodeFlags::FOCUSABLE);
    let b_item = doc.insert(Some(b_items), NodeFlags::empty());
    let overlays = Overlays::new();
    let mut a = Menu::new(&overlays, MenuConfig::default());
    a.set_button(Some(a_button));
    a.set_items(Some(a_items));
    a.register_item(&doc, a_item, ItemData::new("Open"));
    let mut b = Menu::new(&overlays, MenuConfig::default());
    b.set_button(Some(b_button));
    b.set_items(Some(b_items));
    b.register_item(&doc, b_item, ItemData::new("Cut"));
    let a_seen: Rc<RefCell<Vec<bool>>> = Rc::default();
    let sink = a_seen.clone();
    a.subscribe(move |s| sink.borrow_mut().push(s.open));

    a.on_button_click(&doc, Some(a_button));
    let fx = b.on_button_click(&doc, Some(a_items));
    assert!(fx.contains(&Effect::Dismissed {
        id: a.id(),
        restore_focus: Some(a_button),
    }));
    // B still takes focus last.
    assert_eq!(fx.focus_target(), Some(b_items));
    // A's subscribers heard the eviction without the host calling A.
    assert_eq!(*a_seen.borrow(), [true, false]);
    assert!(!a.on_dismissed().changed());

    b.close(&doc, CloseReason::Programmatic);
    a.set_open(&doc, true, Default::default(), None);
    let fx = b.on_button_click(&doc, Some(b_button));
    assert!(fx.contains(&Effect::Dismissed {
        id: a.id(),
        restore_focus: None,
    }));
}

#[test]
fn nested_dialogs_close_one_level_per_escape() {
    let mut doc = Document::new();
    let opener = doc.insert(None, NodeFlags::CONTROL);
    let overlays = Overlays::new();
    let requests: Rc<RefCell<Vec<usize>>> = Rc::default();
    let mut dialogs: Vec<Dialog> = Vec::new();
    for level in 0..3 {
        let panel = doc.insert(None, NodeFlags::empty());
        doc.insert(Some(panel), NodeFlags::CONTROL);
        let sink = requests.clone();
        let config = DialogConfig {
            parent: dialogs.last().map(Dialog::id),
            ..DialogConfig::default()
        };
        let dialog = Dialog::new(
            &overlays,
            config,
            Some(false),
            Some(Box::new(move |_: CloseReason| sink.borrow_mut().push(level))),
        );
        let Ok(mut dialog) = dialog else {
            panic!("dialog is fully controlled");
        };
        dialog.set_panel(Some(panel));
        dialogs.push(dialog);
    }
    let mut focused = Some(opener);
    for dialog in &mut dialogs {
        let fx = dialog.set_open(&doc, true, focused);
        focused = fx.focus_target();
    }
    assert_eq!(overlays.open_count(), 3);

    let escape = key(Key::Escape);
    for expected in [2, 1, 0] {
        // The host delivers the key to every dialog; only the top-most asks to close.
        for dialog in &mut dialogs {
            dialog.on_key_down(&doc, &escape, focused);
        }
        let closing = requests.borrow_mut().pop();
        assert_eq!(closing, Some(expected));
        assert!(requests.borrow().is_empty());
        let fx = dialogs[expected].set_open(&doc, false, focused);
        focused = fx.focus_target();
        assert_eq!(overlays.open_count(), expected);
    }
    assert_eq!(focused, Some(opener));
    assert!(overlays.listeners().is_empty());
}

#[test]
fn listbox_reopens_on_selected_option() {
    let mut doc = Document::new();
    let button = doc.insert(None, NodeFlags::CONTROL);
    let options = doc.insert(None, NodeFlags::FOCUSABLE);
    let nodes: Vec<NodeId> = (0..3)
        .map(|_| doc.insert(Some(options), NodeFlags::empty()))
        .collect();
    let overlays = Overlays::new();
    let value = ListboxValue::Single(None);
    let Ok(mut listbox) = Listbox::new(&overlays, ListboxConfig::default(), value) else {
        panic!("single value for a single listbox");
    };
    listbox.set_button(Some(button));
    listbox.set_options(Some(options));
    for (node, name) in nodes.iter().zip(["Pickup", "Home delivery", "Dine-in"]) {
        listbox.register_option(&doc, *node, name, ItemData::new(name));
    }

    listbox.on_button_key_down(&doc, &key(Key::ArrowDown), Some(button));
    listbox.on_options_key_down(&doc, &key(Key::End), 0);
    let fx = listbox.on_options_key_down(&doc, &key(Key::Enter), 10);
    assert_eq!(fx.focus_target(), Some(button));
    assert_eq!(listbox.value(), &ListboxValue::Single(Some("Dine-in")));
    assert!(!listbox.is_open());

    listbox.on_button_click(&doc, Some(button));
    assert_eq!(listbox.active(), Some(nodes[2]));
}

#[test]
fn child_parts_need_their_parent() {
    let overlays = Overlays::new();
    let menu = RefCell::new(Menu::new(&overlays, MenuConfig::default()));
    let root = Scope::root();
    assert_eq!(
        Menu::from_scope(&root, "Menu.Item").err(),
        Some(UsageError::MissingParent {
            part: "Menu.Item",
            parent: "Menu",
        })
    );
    let scope = root.provide(&menu);
    assert!(Menu::from_scope(&scope, "Menu.Item").is_ok());
}
