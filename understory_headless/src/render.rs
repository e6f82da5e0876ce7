// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render-as polymorphism and hidden-part policy.
//!
//! Every part renders through one [`RenderAdapter`] supplied by the host. A
//! part can render as a plain tag, as a host component, or as a
//! [`As::Fragment`] that forwards its accessibility props to a single child.
//! Whether a hidden part renders at all is decided by [`RenderFeatures`]:
//!
//! | visible | `is_static` | strategy | result |
//! |---------|-------------|----------|--------|
//! | yes     | any         | any      | [`Visibility::Visible`] |
//! | no      | yes         | any      | [`Visibility::Visible`] (the host controls visibility) |
//! | no      | no          | `Hidden` | [`Visibility::Hidden`] (rendered with `hidden`) |
//! | no      | no          | `Unmount`| [`Visibility::Unmounted`] |

use alloc::string::String;
use alloc::vec::Vec;

use understory_document::NodeId;

use crate::error::UsageError;

/// What a part renders as.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum As<C> {
    /// A host element tag, e.g. `"button"`.
    Tag(&'static str),
    /// A host component.
    Component(C),
    /// No wrapper; props are forwarded to the single child.
    Fragment,
}

/// How hidden parts are removed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum RenderStrategy {
    /// Hidden parts are not rendered.
    #[default]
    Unmount,
    /// Hidden parts render with the `hidden` attribute.
    Hidden,
}

/// Render features of a part that can be hidden.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct RenderFeatures {
    /// Always render; the host shows and hides the part itself.
    pub is_static: bool,
    /// Strategy when not static.
    pub strategy: RenderStrategy,
}

/// Resolved presence of a part.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Rendered normally.
    Visible,
    /// Rendered with the `hidden` attribute.
    Hidden,
    /// Not rendered.
    Unmounted,
}

impl RenderFeatures {
    /// Decide presence for a part whose owner says it is `visible`.
    pub fn resolve(self, visible: bool) -> Visibility {
        if visible || self.is_static {
            return Visibility::Visible;
        }
        match self.strategy {
            RenderStrategy::Hidden => Visibility::Hidden,
            RenderStrategy::Unmount => Visibility::Unmounted,
        }
    }
}

/// An attribute value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttrValue {
    /// A fixed string, e.g. a role.
    Str(&'static str),
    /// An owned string.
    Text(String),
    /// A boolean; `aria-*` booleans render as `"true"` / `"false"`.
    Bool(bool),
    /// An integer, e.g. `tabindex`.
    Int(i32),
    /// A reference to another element's id.
    Ref(NodeId),
}

/// Attributes for one rendered part, in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Props {
    attrs: Vec<(&'static str, AttrValue)>,
}

impl Props {
    /// No attributes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Props::set`].
    pub fn with(mut self, name: &'static str, value: AttrValue) -> Self {
        self.set(name, value);
        self
    }

    /// Builder form of [`Props::set_opt`].
    pub fn with_opt(mut self, name: &'static str, value: Option<AttrValue>) -> Self {
        self.set_opt(name, value);
        self
    }

    /// Set an attribute, replacing any previous value.
    pub fn set(&mut self, name: &'static str, value: AttrValue) {
        match self.attrs.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
    }

    /// Set an attribute if `value` is present; remove it otherwise.
    pub fn set_opt(&mut self, name: &'static str, value: Option<AttrValue>) {
        match value {
            Some(v) => self.set(name, v),
            None => self.remove(name),
        }
    }

    /// Remove an attribute.
    pub fn remove(&mut self, name: &'static str) {
        self.attrs.retain(|(n, _)| *n != name);
    }

    /// Look up an attribute.
    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.attrs.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    /// Attribute names, in order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.attrs.iter().map(|(n, _)| *n)
    }

    /// Attributes, in order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &AttrValue)> + '_ {
        self.attrs.iter().map(|(n, v)| (*n, v))
    }

    /// Returns `true` if there are no attributes.
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// Overlay `other` on top of these props; `other` wins on conflicts.
    pub fn merge(&mut self, other: &Self) {
        for (name, value) in &other.attrs {
            self.set(name, value.clone());
        }
    }
}

/// Host side of rendering.
pub trait RenderAdapter {
    /// Host component type for [`As::Component`].
    type Component;
    /// What rendering produces.
    type Output;

    /// Render a plain element.
    fn tag(&mut self, tag: &'static str, props: Props) -> Self::Output;
    /// Render a host component.
    fn component(&mut self, component: &Self::Component, props: Props) -> Self::Output;
    /// Forward props onto the single child.
    fn fragment(&mut self, props: Props) -> Self::Output;
}

/// Render one part.
///
/// `props` are the part's own accessibility props; `user` are the props the
/// application passed, which win on conflicts. A fragment cannot take user
/// props, since it has no element of its own to put them on.
pub fn render<A: RenderAdapter>(
    adapter: &mut A,
    part: &'static str,
    as_: &As<A::Component>,
    props: &Props,
    user: &Props,
    visibility: Visibility,
) -> Result<Option<A::Output>, UsageError> {
    if let As::Fragment = as_
        && !user.is_empty()
    {
        let names: Vec<&str> = user.names().collect();
        return Err(UsageError::FragmentProps {
            part,
            props: names.join(", "),
        });
    }
    let mut merged = props.clone();
    merged.merge(user);
    match visibility {
        Visibility::Unmounted => return Ok(None),
        Visibility::Hidden => merged.set("hidden", AttrValue::Bool(true)),
        Visibility::Visible => {}
    }
    Ok(Some(match as_ {
        As::Tag(tag) => adapter.tag(*tag, merged),
        As::Component(c) => adapter.component(c, merged),
        As::Fragment => adapter.fragment(merged),
    }))
}
