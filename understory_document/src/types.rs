// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the document: node identifiers and flags.

/// Identifier for an element in a [`Document`](crate::Document) (generational).
///
/// Ids of removed elements become stale; every query treats a stale id as
/// "not in the document" rather than panicking.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Element flags controlling focus participation.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct NodeFlags: u8 {
        /// Element can receive focus programmatically (`tabindex="-1"` and up).
        const FOCUSABLE = 0b0000_0001;
        /// Element participates in sequential Tab navigation.
        ///
        /// Implies [`NodeFlags::FOCUSABLE`] for all focus queries.
        const TABBABLE  = 0b0000_0010;
        /// Element is disabled; it cannot receive focus.
        const DISABLED  = 0b0000_0100;
        /// Element is hidden; neither it nor its subtree can receive focus.
        const HIDDEN    = 0b0000_1000;
    }
}

impl NodeFlags {
    /// Flags for a plain interactive control such as a `<button>`.
    pub const CONTROL: Self = Self::FOCUSABLE.union(Self::TABBABLE);
}
