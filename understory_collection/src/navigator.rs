// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Active-item navigator: pure next-active computation.
//!
//! The navigator maps a [`Navigation`] command, a document-ordered item list
//! and the current active id to the next active id. It has no side effects;
//! the caller applies focus and re-renders.
//!
//! ## Rules
//!
//! - Disabled items are never candidates but keep their slot in the list, so
//!   scanning walks past them.
//! - [`Navigation::Next`] / [`Navigation::Previous`] scan from the active
//!   index (or from before the first / after the last item when nothing is
//!   active). With [`WrapMode::Never`] an exhausted scan leaves the active
//!   item unchanged.
//! - [`Navigation::First`] / [`Navigation::Last`] jump to the first / last
//!   enabled item. With no enabled items, [`EmptyPolicy`] decides between
//!   clearing and keeping the current item.
//! - [`Navigation::Specific`] jumps only to a registered, enabled item.
//! - An active id that is no longer registered resolves to `None` before any
//!   rule applies. The navigator never retargets a neighbor.
//!
//! ```
//! use understory_collection::navigator::{Navigation, NavigationPolicy, compute_next};
//! use understory_collection::registry::Item;
//!
//! let item = |id: u32, disabled: bool| Item { id, disabled, text_value: "x".into() };
//! let items = [item(0, false), item(1, true), item(2, false)];
//! let policy = NavigationPolicy::default();
//!
//! assert_eq!(compute_next(Navigation::Next, &items, None, &policy), Some(0));
//! assert_eq!(compute_next(Navigation::Next, &items, Some(0), &policy), Some(2));
//! // No wrap: stays on the last enabled item.
//! assert_eq!(compute_next(Navigation::Next, &items, Some(2), &policy), Some(2));
//! ```

use crate::registry::Item;

/// A navigation command.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Navigation<K> {
    /// First enabled item (Home, PageUp).
    First,
    /// Last enabled item (End, PageDown).
    Last,
    /// Next enabled item after the active one.
    Next,
    /// Previous enabled item before the active one.
    Previous,
    /// A specific item, if it is enabled.
    Specific(K),
    /// No active item.
    Nothing,
}

/// Wrap behavior for [`Navigation::Next`] and [`Navigation::Previous`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum WrapMode {
    /// Stop at the ends; the active item stays where it is.
    #[default]
    Never,
    /// Continue from the opposite end.
    Wrap,
}

/// What [`Navigation::First`] and [`Navigation::Last`] do when no item is enabled.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum EmptyPolicy {
    /// The active item becomes `None`.
    #[default]
    Clear,
    /// The active item is left unchanged.
    Keep,
}

/// Navigator configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct NavigationPolicy {
    /// Wrap behavior for relative moves.
    pub wrap: WrapMode,
    /// Behavior of absolute moves over an all-disabled list.
    pub empty: EmptyPolicy,
}

impl NavigationPolicy {
    /// A policy that wraps relative moves, as radio groups do.
    pub fn wrapping() -> Self {
        Self {
            wrap: WrapMode::Wrap,
            ..Self::default()
        }
    }
}

/// Compute the next active item.
///
/// `active` may name an item that is no longer in `items`; it is then treated
/// as `None`.
pub fn compute_next<K: Copy + Eq>(
    command: Navigation<K>,
    items: &[Item<K>],
    active: Option<K>,
    policy: &NavigationPolicy,
) -> Option<K> {
    let current = active.and_then(|id| items.iter().position(|item| item.id == id));
    let unchanged = current.map(|i| items[i].id);

    match command {
        Navigation::Nothing => None,
        Navigation::Specific(id) => {
            match items.iter().find(|item| item.id == id) {
                Some(item) if item.is_enabled() => Some(id),
                _ => unchanged,
            }
        }
        Navigation::First => first_enabled(items).or_else(|| empty(policy, unchanged)),
        Navigation::Last => last_enabled(items).or_else(|| empty(policy, unchanged)),
        Navigation::Next => {
            let start = current.map_or(0, |i| i + 1);
            let found = items
                .iter()
                .skip(start)
                .find(|item| item.is_enabled())
                .map(|item| item.id);
            match (found, policy.wrap, current) {
                (Some(id), _, _) => Some(id),
                (None, WrapMode::Wrap, Some(i)) => items[..i]
                    .iter()
                    .find(|item| item.is_enabled())
                    .map(|item| item.id)
                    .or(unchanged),
                (None, _, _) => unchanged,
            }
        }
        Navigation::Previous => {
            let end = current.unwrap_or(items.len());
            let found = items[..end]
                .iter()
                .rev()
                .find(|item| item.is_enabled())
                .map(|item| item.id);
            match (found, policy.wrap, current) {
                (Some(id), _, _) => Some(id),
                (None, WrapMode::Wrap, Some(i)) => items[i + 1..]
                    .iter()
                    .rev()
                    .find(|item| item.is_enabled())
                    .map(|item| item.id)
                    .or(unchanged),
                (None, _, _) => unchanged,
            }
        }
    }
}

fn first_enabled<K: Copy>(items: &[Item<K>]) -> Option<K> {
    items.iter().find(|item| item.is_enabled()).map(|item| item.id)
}

fn last_enabled<K: Copy>(items: &[Item<K>]) -> Option<K> {
    items
        .iter()
        .rev()
        .find(|item| item.is_enabled())
        .map(|item| item.id)
}

fn empty<K>(policy: &NavigationPolicy, unchanged: Option<K>) -> Option<K> {
    match policy.empty {
        EmptyPolicy::Clear => None,
        EmptyPolicy::Keep => unchanged,
    }
}
