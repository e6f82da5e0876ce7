// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Type-ahead search over item text.
//!
//! Typed characters accumulate in a query buffer. Each character re-arms a
//! single-shot deadline; once it passes without further input the buffer is
//! cleared. Time is supplied by the host as milliseconds from any monotonic
//! clock, the same convention the other input helpers use.
//!
//! Matching scans items circularly in document order for the first enabled
//! item whose normalized text starts with the query:
//!
//! - A new search starts just after the active item, so repeatedly typing the
//!   same letter cycles through items with that initial.
//! - A search already in progress starts *at* the active item, so extending
//!   a query that already matches it keeps it.
//!
//! The host does not have to run a timer: [`Typeahead::feed`] expires a stale
//! buffer lazily. Hosts that want the buffer to clear on time (for example to
//! decide whether Space types or activates) schedule a wake-up at
//! [`Typeahead::deadline`] and call [`Typeahead::poll`].
//!
//! ```
//! use understory_collection::registry::Item;
//! use understory_collection::typeahead::Typeahead;
//!
//! let item = |id: u32, text: &str| Item { id, disabled: false, text_value: text.into() };
//! let items = [item(0, "alice"), item(1, "bob"), item(2, "charlie")];
//! let mut search = Typeahead::new();
//!
//! assert_eq!(search.feed('b', 0, &items, None), Some(1));
//! assert_eq!(search.feed('o', 100, &items, Some(1)), Some(1));
//! assert_eq!(search.query(), "bo");
//! ```

use alloc::string::String;

use crate::registry::Item;

/// Type-ahead configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TypeaheadConfig {
    /// Idle time after the last character before the query clears.
    pub timeout_ms: u64,
}

impl Default for TypeaheadConfig {
    fn default() -> Self {
        Self { timeout_ms: 350 }
    }
}

/// Type-ahead query buffer with an expiry deadline.
#[derive(Clone, Debug, Default)]
pub struct Typeahead {
    /// Configuration; changes apply from the next character.
    pub config: TypeaheadConfig,
    query: String,
    deadline: Option<u64>,
}

impl Typeahead {
    /// Create an empty buffer with the default timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty buffer with a custom configuration.
    pub fn with_config(config: TypeaheadConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Append a character and find the matching item.
    ///
    /// Returns the id of the first match, or `None` when nothing matches. The
    /// character is kept in the buffer either way.
    pub fn feed<K: Copy + Eq>(
        &mut self,
        c: char,
        now: u64,
        items: &[Item<K>],
        active: Option<K>,
    ) -> Option<K> {
        self.poll(now);
        let was_searching = self.is_searching();
        self.query.extend(c.to_lowercase());
        self.arm(now);
        self.find(items, active, was_searching)
    }

    /// Remove the last character and find the matching item for what remains.
    ///
    /// An emptied buffer matches nothing.
    pub fn backspace<K: Copy + Eq>(
        &mut self,
        now: u64,
        items: &[Item<K>],
        active: Option<K>,
    ) -> Option<K> {
        self.poll(now);
        if self.query.pop().is_none() {
            return None;
        }
        if self.query.is_empty() {
            self.clear();
            return None;
        }
        self.arm(now);
        self.find(items, active, true)
    }

    /// Clear the buffer if its deadline has passed.
    ///
    /// Returns `true` if the buffer was cleared.
    pub fn poll(&mut self, now: u64) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.clear();
                true
            }
            _ => false,
        }
    }

    /// Clear the buffer and cancel the deadline.
    pub fn clear(&mut self) {
        self.query.clear();
        self.deadline = None;
    }

    /// The current (lowercased) query.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Returns `true` while a query is buffered.
    pub fn is_searching(&self) -> bool {
        !self.query.is_empty()
    }

    /// When the buffer will clear, if a query is buffered.
    pub fn deadline(&self) -> Option<u64> {
        self.deadline
    }

    fn arm(&mut self, now: u64) {
        self.deadline = Some(now.saturating_add(self.config.timeout_ms));
    }

    fn find<K: Copy + Eq>(
        &self,
        items: &[Item<K>],
        active: Option<K>,
        was_searching: bool,
    ) -> Option<K> {
        let len = items.len();
        if len == 0 {
            return None;
        }
        let start = match active.and_then(|id| items.iter().position(|item| item.id == id)) {
            Some(i) if was_searching => i,
            Some(i) => i + 1,
            None => 0,
        };
        (0..len)
            .map(|offset| &items[(start + offset) % len])
            .find(|item| item.is_enabled() && item.text_value.starts_with(self.query.as_str()))
            .map(|item| item.id)
    }
}
