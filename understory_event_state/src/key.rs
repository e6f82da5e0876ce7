// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard input model and discrete press tracking.
//!
//! Platforms report a held key as a stream of keydown events, usually with a
//! `repeat` marker on all but the first. Activation keys (Enter, Space) must
//! fire their action once per physical press, so that filtering happens here,
//! at the input layer, and not inside component logic.
//!
//! [`KeyPressState`] treats a keydown as a fresh press only if:
//! 1. the event is not marked as a repeat, and
//! 2. the same key has not already been seen going down without a matching keyup.
//!
//! The second rule covers platforms that do not set the repeat marker.
//! Hosts should call [`KeyPressState::clear`] when focus leaves the owning
//! component, since the matching keyup may then be delivered elsewhere.

use alloc::vec::Vec;

/// A toolkit-neutral key.
///
/// Only the keys the headless components react to are named. Everything that
/// produces text is a [`Key::Character`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Enter / Return.
    Enter,
    /// The space bar.
    Space,
    /// Escape.
    Escape,
    /// Tab (Shift+Tab is Tab with [`Modifiers::SHIFT`]).
    Tab,
    /// Backspace.
    Backspace,
    /// Arrow up.
    ArrowUp,
    /// Arrow down.
    ArrowDown,
    /// Arrow left.
    ArrowLeft,
    /// Arrow right.
    ArrowRight,
    /// Home.
    Home,
    /// End.
    End,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Any other key that produces a printable character.
    Character(char),
}

impl Key {
    /// Map a typed character to a key, folding `' '` into [`Key::Space`].
    pub fn from_char(c: char) -> Self {
        if c == ' ' { Self::Space } else { Self::Character(c) }
    }

    /// The printable character for this key, if it produces one.
    pub fn printable(self) -> Option<char> {
        match self {
            Self::Space => Some(' '),
            Self::Character(c) if !c.is_control() => Some(c),
            _ => None,
        }
    }
}

bitflags::bitflags! {
    /// Modifier keys held during a key event.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Shift.
        const SHIFT   = 0b0000_0001;
        /// Control.
        const CONTROL = 0b0000_0010;
        /// Alt / Option.
        const ALT     = 0b0000_0100;
        /// Meta / Command / Windows.
        const META    = 0b0000_1000;
    }
}

/// A keydown event as delivered by the host.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key that went down.
    pub key: Key,
    /// Modifiers held at the time of the event.
    pub modifiers: Modifiers,
    /// Whether the platform marked this event as auto-repeat.
    pub repeat: bool,
}

impl KeyEvent {
    /// A plain, non-repeated keydown with no modifiers.
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::empty(),
            repeat: false,
        }
    }

    /// Set the modifiers on this event.
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Mark this event as an auto-repeat.
    pub fn repeated(mut self) -> Self {
        self.repeat = true;
        self
    }

    /// Returns `true` if Shift is held.
    pub fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }

    /// Returns `true` if a command-style modifier (Control, Alt, Meta) is held.
    ///
    /// Type-ahead ignores such chords so shortcuts are not captured as text.
    pub fn has_command_modifier(&self) -> bool {
        self.modifiers
            .intersects(Modifiers::CONTROL | Modifiers::ALT | Modifiers::META)
    }
}

/// Classification of a keydown by [`KeyPressState::on_key_down`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeyTransition {
    /// A new physical press.
    Pressed,
    /// Auto-repeat of a key that is already held.
    Repeated,
}

impl KeyTransition {
    /// Returns `true` for [`KeyTransition::Pressed`].
    pub fn is_press(self) -> bool {
        matches!(self, Self::Pressed)
    }
}

/// Tracks which keys are currently held.
#[derive(Clone, Debug, Default)]
pub struct KeyPressState {
    held: Vec<Key>,
}

impl KeyPressState {
    /// Create a tracker with no keys held.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a keydown and classify it.
    pub fn on_key_down(&mut self, event: &KeyEvent) -> KeyTransition {
        if event.repeat || self.held.contains(&event.key) {
            return KeyTransition::Repeated;
        }
        self.held.push(event.key);
        KeyTransition::Pressed
    }

    /// Record a keyup.
    ///
    /// Returns `true` if the key was held.
    pub fn on_key_up(&mut self, key: Key) -> bool {
        let before = self.held.len();
        self.held.retain(|&k| k != key);
        self.held.len() != before
    }

    /// Returns `true` if `key` is currently held.
    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// Forget all held keys.
    pub fn clear(&mut self) {
        self.held.clear();
    }
}
