// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Item registry: a document-ordered set of registered items.
//!
//! Items register when they mount and unregister when they unmount. Mount
//! order is not render order: a conditionally rendered earlier sibling can
//! mount after later siblings already registered. The registry therefore
//! never trusts call order. Every registration re-sorts the list through a
//! [`DocumentOrder`] supplied by the host, so any navigation command that
//! follows observes a list in true document order.

use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::hash::Hash;

use hashbrown::HashMap;

/// Orders item ids by where their elements appear in the document.
///
/// Implementations must be a total order over the ids currently registered.
pub trait DocumentOrder<K> {
    /// Compare the document positions of two items.
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// Orders ids by their own [`Ord`] implementation.
///
/// Useful when ids are already positions (for example indices into a static
/// array of options).
#[derive(Copy, Clone, Debug, Default)]
pub struct NaturalOrder;

impl<K: Ord> DocumentOrder<K> for NaturalOrder {
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

impl<K, T: DocumentOrder<K> + ?Sized> DocumentOrder<K> for &T {
    fn compare(&self, a: &K, b: &K) -> Ordering {
        (**self).compare(a, b)
    }
}

/// Per-item data supplied at registration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemData {
    /// Whether the item is disabled.
    ///
    /// Disabled items keep their place in the list but can never become
    /// active, be matched by type-ahead, or be activated.
    pub disabled: bool,
    /// Normalized text used for type-ahead matching.
    pub text_value: String,
}

impl ItemData {
    /// Enabled item data with the given rendered text.
    ///
    /// The text is trimmed and lowercased for case-insensitive matching.
    pub fn new(text: &str) -> Self {
        Self {
            disabled: false,
            text_value: normalize_text(text),
        }
    }

    /// Mark the item as disabled.
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// Trim and lowercase rendered text for type-ahead matching.
pub fn normalize_text(text: &str) -> String {
    text.trim().to_lowercase()
}

/// A registered item, as seen by the navigator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Item<K> {
    /// Stable item identity.
    pub id: K,
    /// Whether the item is disabled.
    pub disabled: bool,
    /// Normalized text used for type-ahead matching.
    pub text_value: String,
}

impl<K> Item<K> {
    /// Returns `true` if the item can become active.
    pub fn is_enabled(&self) -> bool {
        !self.disabled
    }
}

/// Document-ordered registry of items keyed by `K`.
#[derive(Clone, Debug)]
pub struct ItemRegistry<K> {
    items: Vec<Item<K>>,
    positions: HashMap<K, usize>,
}

impl<K> Default for ItemRegistry<K> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            positions: HashMap::new(),
        }
    }
}

impl<K: Copy + Eq + Hash> ItemRegistry<K> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an item, or update the data of an already registered one.
    ///
    /// Returns `true` if the id was not registered before.
    pub fn register(&mut self, order: &impl DocumentOrder<K>, id: K, data: ItemData) -> bool {
        let item = Item {
            id,
            disabled: data.disabled,
            text_value: data.text_value,
        };
        let added = match self.positions.get(&id) {
            Some(&pos) => {
                self.items[pos] = item;
                false
            }
            None => {
                self.items.push(item);
                true
            }
        };
        self.resort(order);
        added
    }

    /// Unregister an item.
    ///
    /// Returns `true` if the id was registered. Unregistering twice is a no-op.
    pub fn unregister(&mut self, id: K) -> bool {
        let Some(pos) = self.positions.remove(&id) else {
            return false;
        };
        self.items.remove(pos);
        self.reindex();
        true
    }

    /// Re-sort all items by document position.
    ///
    /// Registration already does this; hosts call it directly when elements
    /// move without remounting.
    pub fn resort(&mut self, order: &impl DocumentOrder<K>) {
        self.items.sort_by(|a, b| order.compare(&a.id, &b.id));
        self.reindex();
    }

    fn reindex(&mut self) {
        self.positions.clear();
        for (i, item) in self.items.iter().enumerate() {
            self.positions.insert(item.id, i);
        }
    }

    /// Items in document order.
    pub fn items(&self) -> &[Item<K>] {
        &self.items
    }

    /// Item ids in document order.
    pub fn ids(&self) -> impl Iterator<Item = K> + '_ {
        self.items.iter().map(|item| item.id)
    }

    /// Look up a registered item.
    pub fn get(&self, id: K) -> Option<&Item<K>> {
        self.positions.get(&id).map(|&pos| &self.items[pos])
    }

    /// Position of an item in document order.
    pub fn index_of(&self, id: K) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    /// Returns `true` if the id is registered.
    pub fn contains(&self, id: K) -> bool {
        self.positions.contains_key(&id)
    }

    /// Returns `true` if the id is registered and enabled.
    pub fn is_enabled(&self, id: K) -> bool {
        self.get(id).is_some_and(Item::is_enabled)
    }

    /// Number of registered items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        self.items.clear();
        self.positions.clear();
    }
}
