// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transition: class phases for showing and hiding a part.
//!
//! Timing is the host's business. A transition only says which classes apply
//! at each phase; the host reports the frame boundary
//! ([`Transition::next_frame`]) and the end of the CSS transition
//! ([`Transition::on_transition_end`]).
//!
//! ```text
//! show:  Idle/Left -> Entering(from) -> Entering(to) -> Entered
//! hide:  Entered/Idle -> Leaving(from) -> Leaving(to) -> Left
//! ```
//!
//! A container with nested `Transition.Child` parts does not finish until
//! every child that started has reported its end, so a parent never unmounts
//! while a child is still animating out.
//!
//! ```
//! use understory_headless::transition::{Transition, TransitionConfig, TransitionPhase};
//!
//! let mut config = TransitionConfig::default();
//! config.classes.leave = "transition".into();
//! config.classes.leave_from = "opacity-100".into();
//! config.classes.leave_to = "opacity-0".into();
//!
//! let mut fade = Transition::new(true, config);
//! fade.set_show(false);
//! assert_eq!(fade.classes(), ["transition", "opacity-100"]);
//! fade.next_frame();
//! assert_eq!(fade.classes(), ["transition", "opacity-0"]);
//! fade.on_transition_end();
//! assert_eq!(fade.phase(), TransitionPhase::Left);
//! ```

use alloc::string::String;
use alloc::vec::Vec;

use smallvec::SmallVec;
use understory_document::NodeId;

use crate::effects::{Effect, Effects};
use crate::error::UsageError;
use crate::notify::{Observers, SubscriptionId};
use crate::render::{RenderFeatures, Visibility};
use crate::scope::Scope;

/// Where a transition is.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum TransitionPhase {
    /// At rest since mount; nothing has run.
    #[default]
    Idle,
    /// Showing.
    Entering,
    /// Shown, enter finished.
    Entered,
    /// Hiding.
    Leaving,
    /// Hidden, leave finished.
    Left,
}

/// Classes per phase, each a whitespace-separated list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransitionClasses {
    /// Applied for the whole enter.
    pub enter: String,
    /// Applied for the first frame of the enter.
    pub enter_from: String,
    /// Applied from the second frame of the enter until it ends.
    pub enter_to: String,
    /// Applied once the enter ended, while shown.
    pub entered: String,
    /// Applied for the whole leave.
    pub leave: String,
    /// Applied for the first frame of the leave.
    pub leave_from: String,
    /// Applied from the second frame of the leave until it ends.
    pub leave_to: String,
}

/// Transition configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransitionConfig {
    /// Run the enter transition when mounted shown.
    pub appear: bool,
    /// Phase classes.
    pub classes: TransitionClasses,
    /// Whether a hidden part unmounts or stays with `hidden`.
    pub features: RenderFeatures,
}

/// What a `Transition` provides to its `Transition.Child` parts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TransitionContext {
    /// The parent's `show`.
    pub show: bool,
    /// The parent's `appear`.
    pub appear: bool,
}

/// Observable transition state.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TransitionSnapshot {
    /// Requested visibility.
    pub show: bool,
    /// Current phase.
    pub phase: TransitionPhase,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Frame {
    From,
    To,
}

/// Headless transition.
#[derive(Debug)]
pub struct Transition {
    show: bool,
    appear: bool,
    phase: TransitionPhase,
    frame: Frame,
    own_done: bool,
    children: SmallVec<[NodeId; 4]>,
    classes: TransitionClasses,
    features: RenderFeatures,
    observers: Observers<TransitionSnapshot>,
}

impl Transition {
    /// Name used in usage errors.
    pub const NAME: &'static str = "Transition";

    /// Create a transition, mounted shown if `show`.
    pub fn new(show: bool, config: TransitionConfig) -> Self {
        let phase = if show && config.appear {
            TransitionPhase::Entering
        } else {
            TransitionPhase::Idle
        };
        Self {
            show,
            appear: config.appear,
            phase,
            frame: Frame::From,
            own_done: false,
            children: SmallVec::new(),
            classes: config.classes,
            features: config.features,
            observers: Observers::with_initial(TransitionSnapshot { show, phase }),
        }
    }

    /// Create a `Transition.Child` following the nearest enclosing transition.
    pub fn child(scope: &Scope<'_>, config: TransitionConfig) -> Result<Self, UsageError> {
        let parent = scope.require::<TransitionContext>("Transition.Child", Self::NAME)?;
        let config = TransitionConfig {
            appear: parent.appear,
            ..config
        };
        Ok(Self::new(parent.show, config))
    }

    /// The context to provide to nested `Transition.Child` parts.
    pub fn context(&self) -> TransitionContext {
        TransitionContext {
            show: self.show,
            appear: self.appear,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    /// Requested visibility.
    pub fn show(&self) -> bool {
        self.show
    }

    /// Current observable state.
    pub fn snapshot(&self) -> TransitionSnapshot {
        TransitionSnapshot {
            show: self.show,
            phase: self.phase,
        }
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(
        &mut self,
        callback: impl FnMut(&TransitionSnapshot) + 'static,
    ) -> SubscriptionId {
        self.observers.subscribe(callback)
    }

    /// Remove a subscription.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Show or hide, starting the matching transition.
    pub fn set_show(&mut self, show: bool) -> Effects {
        if show == self.show {
            return Effects::new();
        }
        self.show = show;
        self.phase = if show {
            TransitionPhase::Entering
        } else {
            TransitionPhase::Leaving
        };
        self.frame = Frame::From;
        self.own_done = false;
        log::trace!("transition {:?}", self.phase);
        self.commit(Effects::new())
    }

    /// The first frame of a running transition was painted.
    ///
    /// Returns `true` if the classes changed.
    pub fn next_frame(&mut self) -> bool {
        let running = matches!(
            self.phase,
            TransitionPhase::Entering | TransitionPhase::Leaving
        );
        if running && self.frame == Frame::From {
            self.frame = Frame::To;
            return true;
        }
        false
    }

    /// The part's own CSS transition ended.
    pub fn on_transition_end(&mut self) -> Effects {
        self.own_done = true;
        self.settle()
    }

    /// A nested child started transitioning.
    pub fn notify_child_start(&mut self, child: NodeId) {
        if !self.children.contains(&child) {
            self.children.push(child);
        }
    }

    /// A nested child finished transitioning.
    pub fn notify_child_end(&mut self, child: NodeId) -> Effects {
        self.children.retain(|c| *c != child);
        self.settle()
    }

    /// Classes that apply now, in order.
    pub fn classes(&self) -> Vec<&str> {
        let c = &self.classes;
        let lists: [&str; 2] = match (self.phase, self.frame) {
            (TransitionPhase::Entering, Frame::From) => [c.enter.as_str(), c.enter_from.as_str()],
            (TransitionPhase::Entering, Frame::To) => [c.enter.as_str(), c.enter_to.as_str()],
            (TransitionPhase::Entered, _) => [c.entered.as_str(), ""],
            (TransitionPhase::Leaving, Frame::From) => [c.leave.as_str(), c.leave_from.as_str()],
            (TransitionPhase::Leaving, Frame::To) => [c.leave.as_str(), c.leave_to.as_str()],
            (TransitionPhase::Idle | TransitionPhase::Left, _) => ["", ""],
        };
        lists.iter().flat_map(|l| l.split_whitespace()).collect()
    }

    /// The part should be on screen.
    pub fn is_visible(&self) -> bool {
        match self.phase {
            TransitionPhase::Idle => self.show,
            TransitionPhase::Left => false,
            TransitionPhase::Entering | TransitionPhase::Entered | TransitionPhase::Leaving => true,
        }
    }

    /// Presence of the part under the configured features.
    pub fn visibility(&self) -> Visibility {
        self.features.resolve(self.is_visible())
    }

    fn settle(&mut self) -> Effects {
        if !self.own_done || !self.children.is_empty() {
            return Effects::new();
        }
        let finished = match self.phase {
            TransitionPhase::Entering => TransitionPhase::Entered,
            TransitionPhase::Leaving => TransitionPhase::Left,
            _ => return Effects::new(),
        };
        self.phase = finished;
        self.own_done = false;
        log::trace!("transition {finished:?}");
        self.commit(Effects::new())
    }

    fn commit(&mut self, mut fx: Effects) -> Effects {
        if self.observers.publish(self.snapshot()) {
            fx.push(Effect::Changed);
        }
        fx
    }
}
