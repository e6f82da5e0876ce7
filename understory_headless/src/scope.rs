// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parent contexts for child parts.
//!
//! A [`Scope`] is a linked chain of provided values, built on the stack as
//! the host walks its render tree. Parent components provide themselves (or
//! a context value); child parts look them up by type. The nearest provider
//! wins, so nested components of the same kind shadow outer ones.
//!
//! ```
//! use understory_headless::scope::Scope;
//!
//! struct MenuContext(u32);
//!
//! let root = Scope::root();
//! let outer = MenuContext(1);
//! let inner = MenuContext(2);
//! let s1 = root.provide(&outer);
//! let s2 = s1.provide(&inner);
//!
//! assert_eq!(s2.get::<MenuContext>().map(|m| m.0), Some(2));
//! assert!(root.require::<MenuContext>("Menu.Item", "Menu").is_err());
//! ```

use core::any::Any;
use core::fmt;

use crate::error::UsageError;

/// A chain of provided contexts.
#[derive(Clone, Copy)]
pub struct Scope<'a> {
    parent: Option<&'a Scope<'a>>,
    value: Option<&'a (dyn Any + 'static)>,
}

impl fmt::Debug for Scope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("depth", &self.depth())
            .finish_non_exhaustive()
    }
}

impl Default for Scope<'_> {
    fn default() -> Self {
        Self::root()
    }
}

impl<'a> Scope<'a> {
    /// The empty scope.
    pub fn root() -> Self {
        Self {
            parent: None,
            value: None,
        }
    }

    /// A child scope that additionally provides `value`.
    pub fn provide<'b, T: Any>(&'b self, value: &'b T) -> Scope<'b>
    where
        'a: 'b,
    {
        Scope {
            parent: Some(self),
            value: Some(value),
        }
    }

    /// The nearest provided `T`.
    pub fn get<T: Any>(&self) -> Option<&'a T> {
        let mut current: Option<&Scope<'a>> = Some(self);
        while let Some(scope) = current {
            if let Some(v) = scope.value.and_then(|v| v.downcast_ref::<T>()) {
                return Some(v);
            }
            current = scope.parent;
        }
        None
    }

    /// The nearest provided `T`, or a [`UsageError::MissingParent`] naming
    /// `part` and the `parent` component that should have provided it.
    pub fn require<T: Any>(
        &self,
        part: &'static str,
        parent: &'static str,
    ) -> Result<&'a T, UsageError> {
        self.get::<T>()
            .ok_or(UsageError::MissingParent { part, parent })
    }

    fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.parent;
        while let Some(scope) = current {
            depth += 1;
            current = scope.parent;
        }
        depth
    }
}
