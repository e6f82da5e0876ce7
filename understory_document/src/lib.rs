// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Document: a host-mirrored element tree for headless UI.
//!
//! Headless components never touch a real DOM. They still need answers the DOM
//! normally gives for free:
//!
//! - **Document order**: which of two elements comes first, used to keep
//!   registered items sorted by where they render rather than when they
//!   mounted ([`Document::compare`]).
//! - **Containment**: whether an event target lies inside a component's owned
//!   subtree, used for outside-click and focus-out detection
//!   ([`Document::contains`]).
//! - **Focusability**: which elements can take focus and in which order Tab
//!   visits them ([`Document::is_focusable`], [`Document::tabbables_within`]).
//!
//! The host keeps a [`Document`] in sync with its own element tree (inserting
//! and removing nodes as it mounts and unmounts) and hands `&Document` to the
//! components when they need one of these answers.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_document::{Document, NodeFlags};
//!
//! let mut doc = Document::new();
//! let menu = doc.insert(None, NodeFlags::empty());
//! let button = doc.insert(Some(menu), NodeFlags::CONTROL);
//! let items = doc.insert(Some(menu), NodeFlags::FOCUSABLE);
//! let outside = doc.insert(None, NodeFlags::CONTROL);
//!
//! assert!(doc.contains(menu, button));
//! assert!(!doc.contains(menu, outside));
//! assert!(doc.is_focusable(items));
//! assert!(!doc.is_tabbable(items));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod document;
mod types;

pub use document::Document;
pub use types::{NodeFlags, NodeId};
