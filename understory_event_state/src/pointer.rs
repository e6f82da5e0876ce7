// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracked pointer: distinguish real pointer motion from content moving under it.
//!
//! When a list scrolls (for example because keyboard navigation scrolled the
//! active item into view), the element under a stationary pointer changes and
//! the host reports a move over the new element. Treating that as hover would
//! steal the active item from the keyboard. [`TrackedPointer`] remembers the
//! last screen position and only reports movement when it actually changes.
//!
//! ```
//! use kurbo::Point;
//! use understory_event_state::pointer::TrackedPointer;
//!
//! let mut pointer = TrackedPointer::new();
//! assert!(pointer.moved(Point::new(10.0, 10.0)));
//! // Same screen position, different element underneath: not a move.
//! assert!(!pointer.moved(Point::new(10.0, 10.0)));
//! assert!(pointer.moved(Point::new(11.0, 10.0)));
//! ```

use kurbo::Point;

/// Last observed pointer position in screen space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TrackedPointer {
    last: Option<Point>,
}

impl TrackedPointer {
    /// Create a tracker that has not seen the pointer yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a position and report whether it differs from the last one.
    ///
    /// The first observation always counts as movement.
    pub fn moved(&mut self, position: Point) -> bool {
        if self.last == Some(position) {
            return false;
        }
        self.last = Some(position);
        true
    }

    /// Forget the last position.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_observation_is_movement() {
        let mut pointer = TrackedPointer::new();
        assert!(pointer.moved(Point::new(0.0, 0.0)));
        assert!(!pointer.moved(Point::new(0.0, 0.0)));
    }

    #[test]
    fn reset_forgets_position() {
        let mut pointer = TrackedPointer::new();
        assert!(pointer.moved(Point::new(5.0, 5.0)));
        pointer.reset();
        assert!(pointer.moved(Point::new(5.0, 5.0)));
    }
}
