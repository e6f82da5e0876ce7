// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Document adapter: order items by their element's position in a [`Document`].
//!
//! With this adapter the item id *is* the element id, so the registry never
//! holds anything that keeps the element alive. Items whose element has
//! already been removed sort last until they unregister.

use core::cmp::Ordering;

use understory_document::{Document, NodeId};

use crate::registry::DocumentOrder;

impl DocumentOrder<NodeId> for Document {
    fn compare(&self, a: &NodeId, b: &NodeId) -> Ordering {
        Self::compare(self, *a, *b)
    }
}
