// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapters that integrate the collection with other Understory crates.

#[cfg(feature = "document_adapter")]
pub mod document;
