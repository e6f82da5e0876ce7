// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Overlay: open/close coordination for popups and dialogs.
//!
//! Menus, listboxes and dialogs all open and close, and
//! their open states interact: two menus must not be open at once, Escape
//! must close only the innermost of three nested dialogs, and document-wide
//! listeners must vanish the moment nothing needs them. This crate owns those
//! cross-instance rules.
//!
//! - [`stack`]: [`OverlayStack`](stack::OverlayStack), the single owner of
//!   open state, with mutual-exclusion groups and nesting.
//! - [`handle`]: [`Overlays`](handle::Overlays), the shared context object,
//!   and [`OverlayHandle`](handle::OverlayHandle), which deregisters its
//!   instance on drop.
//! - [`controller`]: open origins, close reasons and focus return.
//! - [`outside`]: outside-click detection based on pointer-down targets.
//! - [`focus_trap`]: Tab containment for modal panels and [`TabBehavior`](focus_trap::TabBehavior)
//!   for popups.
//! - [`listeners`]: listener requirements and a diffing sync against the host.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_document::{Document, NodeFlags};
//! use understory_overlay::handle::Overlays;
//! use understory_overlay::stack::{OverlayConfig, OverlayGroup};
//!
//! let mut doc = Document::new();
//! let a_button = doc.insert(None, NodeFlags::CONTROL);
//! let overlays = Overlays::new();
//! let popup = || OverlayConfig { group: Some(OverlayGroup::POPUP), ..OverlayConfig::default() };
//! let a = overlays.register(popup());
//! let b = overlays.register(popup());
//! a.set_trigger(Some(a_button));
//!
//! a.open(&doc, Some(a_button));
//! // Opening B closes A; focus was on A's trigger (inside A), so it goes back there.
//! let dismissed = b.open(&doc, Some(a_button));
//! assert_eq!(dismissed[0].id, a.id());
//! assert_eq!(dismissed[0].restore_focus, Some(a_button));
//! assert!(!a.is_open());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod controller;
pub mod focus_trap;
pub mod handle;
pub mod listeners;
pub mod outside;
pub mod stack;
