// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Global listener requirements.
//!
//! Open overlays need document-wide listeners (outside pointer, focus-in,
//! Escape, focus trap) that must not outlive them. The stack computes the
//! set wanted right now ([`OverlayStack::listeners`](crate::stack::OverlayStack::listeners));
//! [`ListenerSync`] diffs that against what is attached and tells the host
//! exactly which listeners to attach or detach, synchronously, after every
//! open, close or unmount.

use bitflags::bitflags;

bitflags! {
    /// Document-wide listeners an open overlay needs.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Listeners: u8 {
        /// Pointer down / click anywhere, for outside-click dismissal.
        const OUTSIDE_CLICK = 1 << 0;
        /// Focus moving anywhere, for focus-out dismissal.
        const FOCUS_IN = 1 << 1;
        /// Escape at document level.
        const ESCAPE = 1 << 2;
        /// Tab interception for a focus trap.
        const FOCUS_TRAP = 1 << 3;
    }
}

impl Listeners {
    /// What popup lists (menus, listboxes) need.
    pub const POPUP: Self = Self::OUTSIDE_CLICK.union(Self::FOCUS_IN);
    /// What modal dialogs need.
    pub const MODAL: Self = Self::OUTSIDE_CLICK
        .union(Self::ESCAPE)
        .union(Self::FOCUS_TRAP);
}

/// Host side of listener management.
pub trait ListenerHost {
    /// Attach the listeners in `set`.
    fn attach(&mut self, set: Listeners);
    /// Detach the listeners in `set`.
    fn detach(&mut self, set: Listeners);
}

/// Tracks which listeners are attached and applies differences.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ListenerSync {
    attached: Listeners,
}

impl ListenerSync {
    /// Nothing attached.
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently attached listeners.
    pub fn attached(&self) -> Listeners {
        self.attached
    }

    /// Bring the attached set to `wanted`.
    ///
    /// Detaches before attaching. Returns `true` if anything changed.
    pub fn sync(&mut self, wanted: Listeners, host: &mut impl ListenerHost) -> bool {
        let stale = self.attached - wanted;
        let missing = wanted - self.attached;
        if !stale.is_empty() {
            log::trace!("detach listeners {stale:?}");
            host.detach(stale);
        }
        if !missing.is_empty() {
            log::trace!("attach listeners {missing:?}");
            host.attach(missing);
        }
        self.attached = wanted;
        !(stale.is_empty() && missing.is_empty())
    }

    /// Detach everything (teardown).
    pub fn release(&mut self, host: &mut impl ListenerHost) {
        self.sync(Listeners::empty(), host);
    }
}
