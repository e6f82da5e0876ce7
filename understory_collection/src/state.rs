// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Navigation state: registry, active item, and type-ahead in one place.

use core::hash::Hash;

use crate::navigator::{Navigation, NavigationPolicy, compute_next};
use crate::registry::{DocumentOrder, Item, ItemData, ItemRegistry};
use crate::typeahead::{Typeahead, TypeaheadConfig};

/// Roving active-item state for one list.
///
/// The active item is held by id, weakly: the id may name an item that has
/// since unregistered. Unregistering the active item clears it immediately,
/// and [`NavigationState::active`] validates on read, so callers never
/// observe a stale reference.
///
/// ## Example
///
/// ```rust
/// use understory_collection::navigator::Navigation;
/// use understory_collection::registry::{ItemData, NaturalOrder};
/// use understory_collection::state::NavigationState;
///
/// let mut state = NavigationState::new();
/// state.register(&NaturalOrder, 1_u32, ItemData::new("Pickup"));
/// state.register(&NaturalOrder, 2, ItemData::new("Home delivery").disabled(true));
/// state.register(&NaturalOrder, 3, ItemData::new("Dine-in"));
///
/// state.navigate(Navigation::Next);
/// assert_eq!(state.active(), Some(1));
/// state.navigate(Navigation::Next);
/// assert_eq!(state.active(), Some(3));
/// ```
#[derive(Clone, Debug)]
pub struct NavigationState<K> {
    registry: ItemRegistry<K>,
    active: Option<K>,
    typeahead: Typeahead,
    /// Navigator configuration.
    pub policy: NavigationPolicy,
}

impl<K> Default for NavigationState<K> {
    fn default() -> Self {
        Self {
            registry: ItemRegistry::default(),
            active: None,
            typeahead: Typeahead::default(),
            policy: NavigationPolicy::default(),
        }
    }
}

impl<K: Copy + Eq + Hash + core::fmt::Debug> NavigationState<K> {
    /// Create empty state with the default policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create empty state with explicit navigator and type-ahead configuration.
    pub fn with_config(policy: NavigationPolicy, typeahead: TypeaheadConfig) -> Self {
        Self {
            registry: ItemRegistry::new(),
            active: None,
            typeahead: Typeahead::with_config(typeahead),
            policy,
        }
    }

    /// Register (or update) an item. See [`ItemRegistry::register`].
    pub fn register(&mut self, order: &impl DocumentOrder<K>, id: K, data: ItemData) -> bool {
        let added = self.registry.register(order, id, data);
        log::trace!("register item {id:?} (new: {added}), {} items", self.registry.len());
        added
    }

    /// Unregister an item, clearing the active item if it was this one.
    pub fn unregister(&mut self, id: K) -> bool {
        let removed = self.registry.unregister(id);
        if removed && self.active == Some(id) {
            log::trace!("active item {id:?} unregistered");
            self.active = None;
        }
        removed
    }

    /// Re-sort items after elements moved. See [`ItemRegistry::resort`].
    pub fn resort(&mut self, order: &impl DocumentOrder<K>) {
        self.registry.resort(order);
    }

    /// The registry.
    pub fn registry(&self) -> &ItemRegistry<K> {
        &self.registry
    }

    /// Items in document order.
    pub fn items(&self) -> &[Item<K>] {
        self.registry.items()
    }

    /// The active item, if it is still registered.
    pub fn active(&self) -> Option<K> {
        self.active.filter(|&id| self.registry.contains(id))
    }

    /// Returns `true` if `id` is the active item.
    pub fn is_active(&self, id: K) -> bool {
        self.active() == Some(id)
    }

    /// Apply a navigation command.
    ///
    /// Returns `true` if the active item changed.
    pub fn navigate(&mut self, command: Navigation<K>) -> bool {
        let before = self.active();
        let next = compute_next(command, self.registry.items(), before, &self.policy);
        self.active = next;
        if next != before {
            log::trace!("{command:?}: active {before:?} -> {next:?}");
        }
        next != before
    }

    /// Feed a typed character to type-ahead and jump to the match.
    ///
    /// Returns the matched item. Without a match the active item is unchanged.
    pub fn search(&mut self, c: char, now: u64) -> Option<K> {
        let found = self
            .typeahead
            .feed(c, now, self.registry.items(), self.active());
        if let Some(id) = found {
            self.navigate(Navigation::Specific(id));
        }
        found
    }

    /// Remove the last type-ahead character and jump to the new match.
    pub fn search_backspace(&mut self, now: u64) -> Option<K> {
        let found = self
            .typeahead
            .backspace(now, self.registry.items(), self.active());
        if let Some(id) = found {
            self.navigate(Navigation::Specific(id));
        }
        found
    }

    /// The type-ahead buffer.
    pub fn typeahead(&self) -> &Typeahead {
        &self.typeahead
    }

    /// Returns `true` while a type-ahead query is buffered at `now`.
    pub fn is_searching(&mut self, now: u64) -> bool {
        self.typeahead.poll(now);
        self.typeahead.is_searching()
    }

    /// Expire the type-ahead buffer if its deadline passed.
    pub fn poll(&mut self, now: u64) -> bool {
        self.typeahead.poll(now)
    }

    /// Start a fresh navigation session (on open).
    ///
    /// Clears the type-ahead buffer and sets the active item to `seed`, which
    /// must be a registered, enabled item to take effect.
    pub fn reset(&mut self, seed: Option<K>) {
        self.typeahead.clear();
        self.active = None;
        if let Some(id) = seed {
            self.navigate(Navigation::Specific(id));
        }
    }

    /// Clear the active item and the type-ahead buffer, keeping registrations.
    pub fn deactivate(&mut self) {
        self.typeahead.clear();
        self.active = None;
    }
}
