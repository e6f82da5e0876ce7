// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Headless: behavior and accessibility for interactive widgets,
//! without any rendering.
//!
//! Each component is a plain state struct. The host feeds it input events
//! (keys, pointer, focus) and gets back an ordered list of [`Effects`] to
//! apply: move focus, prevent the default action, scroll an item into view,
//! and so on. Subscribers are notified with a snapshot after every change.
//! Markup is produced by the host through a [`RenderAdapter`] from the props
//! each component computes.
//!
//! - [`menu`]: a button opening a list of actions.
//! - [`listbox`]: a button opening a list of options, single or multiple.
//! - [`radio_group`]: one checked option out of several, with a roving tab stop.
//! - [`switch`]: a two-state toggle, with optional label and description.
//! - [`disclosure`]: a button showing and hiding a panel.
//! - [`dialog`]: a controlled modal panel with a focus trap.
//! - [`transition`]: class phases for showing and hiding, with nested children.
//!
//! Shared pieces: [`scope`] passes parent components to child parts,
//! [`render`] resolves render-as variants and hidden-part policy, [`error`]
//! defines the usage errors reported for misassembled components, and
//! [`notify`] is the subscriber list every component uses.
//!
//! Menus and listboxes share one [`Overlays`](understory_overlay::handle::Overlays)
//! context: opening one closes any other, and Escape closes only the innermost
//! open instance.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_collection::registry::ItemData;
//! use understory_document::{Document, NodeFlags};
//! use understory_headless::effects::Effect;
//! use understory_headless::menu::{Menu, MenuConfig};
//! use understory_overlay::handle::Overlays;
//!
//! let mut doc = Document::new();
//! let button = doc.insert(None, NodeFlags::CONTROL);
//! let items = doc.insert(None, NodeFlags::FOCUSABLE);
//! let copy = doc.insert(Some(items), NodeFlags::empty());
//!
//! let overlays = Overlays::new();
//! let mut menu = Menu::new(&overlays, MenuConfig::default());
//! menu.set_button(Some(button));
//! menu.set_items(Some(items));
//! menu.register_item(&doc, copy, ItemData::new("Copy"));
//!
//! menu.on_button_click(&doc, Some(button));
//! assert!(menu.is_open());
//!
//! let fx = menu.on_item_click(&doc, copy);
//! assert_eq!(fx.activated(), Some(copy));
//! assert!(fx.contains(&Effect::Focus(button)));
//! assert!(!menu.is_open());
//! ```
//!
//! ## Features
//!
//! - `std` (enabled by default): use the standard library for `kurbo`.
//! - `libm`: enables `no_std` builds of `kurbo` that rely on `libm`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod dialog;
pub mod disclosure;
pub mod effects;
pub mod error;
pub mod listbox;
pub mod menu;
pub mod notify;
pub mod radio_group;
pub mod render;
pub mod scope;
pub mod switch;
pub mod transition;

mod popup;

pub use effects::{Effect, Effects};
pub use error::UsageError;
pub use popup::{ItemState, Orientation};
pub use render::RenderAdapter;
