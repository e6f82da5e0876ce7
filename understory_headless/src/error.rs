// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Usage errors.
//!
//! These report developer mistakes in how components are assembled. They are
//! returned from constructors and resolution calls so they surface on first
//! render. Runtime conditions (no enabled items, a disabled item clicked, no
//! type-ahead match, stale ids) are never errors.

use alloc::string::String;

/// A component was assembled incorrectly.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum UsageError {
    /// A child part was used outside its parent component.
    #[error("<{part} /> is missing a parent <{parent} /> component")]
    MissingParent {
        /// The part that was resolved, e.g. `Menu.Item`.
        part: &'static str,
        /// The component it must be nested in.
        parent: &'static str,
    },
    /// One half of a controlled pair was provided without the other.
    #[error("<{component} /> has `{provided}` but is missing `{missing}`")]
    MissingControlPair {
        /// The component.
        component: &'static str,
        /// The prop that was provided.
        provided: &'static str,
        /// The prop that must accompany it.
        missing: &'static str,
    },
    /// Neither half of a required controlled pair was provided.
    #[error("<{component} /> requires both `{first}` and `{second}`")]
    MissingControl {
        /// The component.
        component: &'static str,
        /// First prop of the pair.
        first: &'static str,
        /// Second prop of the pair.
        second: &'static str,
    },
    /// A value does not match the shape a flag demands.
    #[error("<{component} /> with `{flag}` expects {expected}")]
    ValueShape {
        /// The component.
        component: &'static str,
        /// The flag deciding the shape.
        flag: &'static str,
        /// Description of the expected value.
        expected: &'static str,
    },
    /// Props were passed to a part rendered as a fragment.
    #[error("<{part} /> is rendered as a fragment and cannot take the props: {props}")]
    FragmentProps {
        /// The part.
        part: &'static str,
        /// Comma-separated names of the rejected props.
        props: String,
    },
}
