// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Collection: roving active-item state for headless lists.
//!
//! Menus, listboxes and radio groups share one piece of hard logic: a
//! dynamically registered list of items, one of which is *active*
//! (highlighted, not yet chosen), moved by keyboard, pointer and type-ahead.
//! This crate models that logic without knowing anything about rendering.
//!
//! - [`registry`]: [`ItemRegistry`](registry::ItemRegistry) keeps items in
//!   document order, whatever order they mount in, using a host-provided
//!   [`DocumentOrder`](registry::DocumentOrder).
//! - [`navigator`]: [`compute_next`](navigator::compute_next), a pure function
//!   from a [`Navigation`](navigator::Navigation) command to the next active
//!   item, skipping disabled items and never wrapping unless asked to.
//! - [`typeahead`]: [`Typeahead`](typeahead::Typeahead), a timed query buffer
//!   matched against item text.
//! - [`state`]: [`NavigationState`](state::NavigationState), which combines
//!   the three and guarantees the active item is never a stale reference.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_collection::navigator::Navigation;
//! use understory_collection::registry::{ItemData, NaturalOrder};
//! use understory_collection::state::NavigationState;
//!
//! let mut list = NavigationState::new();
//! for (id, name) in [(0_u32, "alice"), (1, "bob"), (2, "charlie")] {
//!     list.register(&NaturalOrder, id, ItemData::new(name));
//! }
//!
//! list.navigate(Navigation::Last);
//! assert_eq!(list.active(), Some(2));
//!
//! // Type-ahead: "b" jumps to bob.
//! assert_eq!(list.search('b', 0), Some(1));
//! assert_eq!(list.active(), Some(1));
//! ```
//!
//! Ids are generic: any small, copyable, hashable handle works. With the
//! `document_adapter` feature, an `understory_document::Document` orders
//! `understory_document::NodeId` items directly.
//!
//! ## Features
//!
//! - `document_adapter`: implements [`DocumentOrder`](registry::DocumentOrder)
//!   for `understory_document::Document`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod adapters;
pub mod navigator;
pub mod registry;
pub mod state;
pub mod typeahead;
