// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Event State: small input state machines for headless UI.
//!
//! Hosts deliver raw platform events; components want cleaner signals.
//! This crate bridges the two without knowing anything about components:
//!
//! - [`key`]: a toolkit-neutral [`Key`](key::Key) model plus
//!   [`KeyPressState`](key::KeyPressState), which turns keydown/keyup
//!   transitions into exactly one press per physical key press, filtering
//!   auto-repeat.
//! - [`pointer`]: [`TrackedPointer`](pointer::TrackedPointer), which reports
//!   whether a pointer really moved. Content scrolling under a stationary
//!   pointer produces "move" events over new targets; those should not
//!   change hover-driven state.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_event_state::key::{Key, KeyEvent, KeyPressState, KeyTransition};
//!
//! let mut keys = KeyPressState::new();
//! assert_eq!(keys.on_key_down(&KeyEvent::new(Key::Enter)), KeyTransition::Pressed);
//! // The platform keeps sending keydown while the key is held.
//! assert_eq!(keys.on_key_down(&KeyEvent::new(Key::Enter).repeated()), KeyTransition::Repeated);
//! keys.on_key_up(Key::Enter);
//! assert_eq!(keys.on_key_down(&KeyEvent::new(Key::Enter)), KeyTransition::Pressed);
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for `kurbo`.
//! - `libm`: enables `no_std` builds of `kurbo` that rely on `libm`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod key;
pub mod pointer;
