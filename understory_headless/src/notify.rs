// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Snapshot subscriptions.
//!
//! Components keep their state in plain structs and publish a snapshot after
//! every handler call. [`Observers::publish`] compares against the last
//! published snapshot and only calls subscribers when something changed.
//!
//! Overlay components keep theirs in [`SharedObservers`]: another instance
//! can close them (eviction, a parent closing), and their subscribers must
//! hear about it without the host calling back into the component.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use understory_overlay::stack::CloseHook;

/// Token returned by [`Observers::subscribe`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback<T> = Box<dyn FnMut(&T)>;

/// Subscribers to a snapshot of type `T`.
pub struct Observers<T> {
    subscribers: Vec<(SubscriptionId, Callback<T>)>,
    next_id: u64,
    last: Option<T>,
}

impl<T> Default for Observers<T> {
    fn default() -> Self {
        Self {
            subscribers: Vec::new(),
            next_id: 0,
            last: None,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Observers<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("subscribers", &self.subscribers.len())
            .field("next_id", &self.next_id)
            .field("last", &self.last)
            .finish()
    }
}

impl<T: Clone + PartialEq> Observers<T> {
    /// No subscribers, nothing published.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with an initial snapshot, so publishing it again is silent.
    pub fn with_initial(snapshot: T) -> Self {
        Self {
            last: Some(snapshot),
            ..Self::default()
        }
    }

    /// Add a subscriber.
    pub fn subscribe(&mut self, callback: impl FnMut(&T) + 'static) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a subscriber. Returns `true` if it was subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(s, _)| *s != id);
        self.subscribers.len() != before
    }

    /// Number of subscribers.
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Returns `true` if nobody is subscribed.
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Publish `snapshot` if it differs from the last one.
    ///
    /// Returns `true` if it differed.
    pub fn publish(&mut self, snapshot: T) -> bool {
        if self.last.as_ref() == Some(&snapshot) {
            return false;
        }
        for (_, callback) in &mut self.subscribers {
            callback(&snapshot);
        }
        self.last = Some(snapshot);
        true
    }

    /// Publish the last snapshot with `update` applied.
    ///
    /// Does nothing if nothing was published yet.
    pub fn publish_update(&mut self, update: impl FnOnce(&mut T)) -> bool {
        let Some(mut next) = self.last.clone() else {
            return false;
        };
        update(&mut next);
        self.publish(next)
    }
}

/// [`Observers`] that an overlay close hook can also publish to.
#[derive(Debug)]
pub struct SharedObservers<T>(Rc<RefCell<Observers<T>>>);

impl<T: Clone + PartialEq + 'static> SharedObservers<T> {
    /// Create with an initial snapshot.
    pub fn with_initial(snapshot: T) -> Self {
        Self(Rc::new(RefCell::new(Observers::with_initial(snapshot))))
    }

    /// Add a subscriber.
    pub fn subscribe(&self, callback: impl FnMut(&T) + 'static) -> SubscriptionId {
        self.0.borrow_mut().subscribe(callback)
    }

    /// Remove a subscriber. Returns `true` if it was subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.0.borrow_mut().unsubscribe(id)
    }

    /// Publish `snapshot` if it differs from the last one.
    ///
    /// Returns `false` without publishing while these subscribers are
    /// already being called.
    pub fn publish(&self, snapshot: T) -> bool {
        self.0.try_borrow_mut().is_ok_and(|mut o| o.publish(snapshot))
    }

    /// A hook publishing the last snapshot with `closed` applied.
    ///
    /// The hook holds the subscribers weakly; it goes quiet once the
    /// component is dropped.
    pub fn close_hook(&self, closed: fn(&mut T)) -> CloseHook {
        let weak = Rc::downgrade(&self.0);
        CloseHook::new(move |id| {
            let Some(observers) = weak.upgrade() else {
                return;
            };
            let Ok(mut guard) = observers.try_borrow_mut() else {
                log::warn!("overlay {id:?} closed while its subscribers were running");
                return;
            };
            if guard.publish_update(closed) {
                log::debug!("overlay {id:?} closed by another instance");
            }
        })
    }
}
