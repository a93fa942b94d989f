// Copyright 2026 the Tremor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The gesture vocabulary.
//!
//! [`GestureKind`] names the fourteen notifications the recognizer can fire.
//! [`GestureEvent`] is the immutable value passed to every listener: the
//! contact snapshot of the originating raw event plus a kind-specific
//! [`GestureDetail`] payload. Computed gesture data (pinch scale, rotation
//! angle, press-move delta, swipe direction) travels in the payload rather
//! than being written onto a shared event object.

use alloc::vec::Vec;
use core::fmt;

use kurbo::{Point, Vec2};

/// One of the fourteen gesture notifications.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GestureKind {
    /// Two-contact rotation; carries the signed angle since the last sample.
    Rotate,
    /// A contact sequence began.
    TouchStart,
    /// A second contact joined the sequence.
    MultipointStart,
    /// The sequence dropped below two contacts.
    MultipointEnd,
    /// Two-contact scale change; carries the ratio to the pinch start.
    Pinch,
    /// Displacement beyond the swipe threshold ended the sequence.
    Swipe,
    /// A below-threshold sequence ended (fires for every tap, including the
    /// first tap of a double-tap).
    Tap,
    /// Two qualifying taps within the double-tap window.
    DoubleTap,
    /// A contact held still for the long-press delay.
    LongTap,
    /// A tap that was not followed by a second one within the window.
    SingleTap,
    /// Single-contact movement; carries the delta from the previous sample.
    PressMove,
    /// Any contact movement.
    TouchMove,
    /// A contact lifted.
    TouchEnd,
    /// The platform aborted the sequence.
    TouchCancel,
}

impl GestureKind {
    /// Number of gesture kinds.
    pub const COUNT: usize = 14;

    /// All kinds, in dispatch-table order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Rotate,
        Self::TouchStart,
        Self::MultipointStart,
        Self::MultipointEnd,
        Self::Pinch,
        Self::Swipe,
        Self::Tap,
        Self::DoubleTap,
        Self::LongTap,
        Self::SingleTap,
        Self::PressMove,
        Self::TouchMove,
        Self::TouchEnd,
        Self::TouchCancel,
    ];

    /// Returns a stable index into per-kind tables.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Rotate => 0,
            Self::TouchStart => 1,
            Self::MultipointStart => 2,
            Self::MultipointEnd => 3,
            Self::Pinch => 4,
            Self::Swipe => 5,
            Self::Tap => 6,
            Self::DoubleTap => 7,
            Self::LongTap => 8,
            Self::SingleTap => 9,
            Self::PressMove => 10,
            Self::TouchMove => 11,
            Self::TouchEnd => 12,
            Self::TouchCancel => 13,
        }
    }

    /// Returns the conventional lowerCamel callback name for this kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Rotate => "rotate",
            Self::TouchStart => "touchStart",
            Self::MultipointStart => "multipointStart",
            Self::MultipointEnd => "multipointEnd",
            Self::Pinch => "pinch",
            Self::Swipe => "swipe",
            Self::Tap => "tap",
            Self::DoubleTap => "doubleTap",
            Self::LongTap => "longTap",
            Self::SingleTap => "singleTap",
            Self::PressMove => "pressMove",
            Self::TouchMove => "touchMove",
            Self::TouchEnd => "touchEnd",
            Self::TouchCancel => "touchCancel",
        }
    }
}

/// The reported direction of a swipe.
///
/// The mapping from displacement to name is a compatibility contract carried
/// over from existing consumers (see [`GestureEvent`] docs in the recognizer
/// module) and must not be re-derived from intuition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SwipeDirection {
    /// Start x exceeds end x by the larger displacement.
    Left,
    /// End x meets or exceeds start x by the larger displacement.
    Right,
    /// Start y exceeds end y by the larger displacement.
    Up,
    /// End y meets or exceeds start y by the larger displacement.
    Down,
}

impl SwipeDirection {
    /// Returns the direction name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "Left",
            Self::Right => "Right",
            Self::Up => "Up",
            Self::Down => "Down",
        }
    }
}

/// Kind-specific payload carried by a [`GestureEvent`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureDetail {
    /// No computed data for this kind.
    None,
    /// Scale ratio between the current contact distance and the distance at
    /// multi-touch start.
    Pinch {
        /// Current distance divided by the pinch-start distance.
        scale: f64,
    },
    /// Signed rotation since the previous multi-touch sample.
    Rotate {
        /// Degrees; negative for counter-clockwise contact rotation.
        degrees: f64,
    },
    /// Single-contact movement since the previous sample.
    PressMove {
        /// Page-coordinate delta; zero on the first move of a sequence.
        delta: Vec2,
    },
    /// Swipe classification at sequence end.
    Swipe {
        /// Dominant-axis direction.
        direction: SwipeDirection,
    },
}

/// An immutable gesture notification.
#[derive(Clone, PartialEq)]
pub struct GestureEvent {
    /// Which notification fired.
    pub kind: GestureKind,
    /// Snapshot of the active contacts for the originating raw event
    /// (remaining contacts for an end event, empty for cancel).
    pub contacts: Vec<Point>,
    /// Kind-specific computed data.
    pub detail: GestureDetail,
}

impl GestureEvent {
    /// Creates an event with no computed payload.
    #[must_use]
    pub fn new(kind: GestureKind, contacts: Vec<Point>) -> Self {
        Self {
            kind,
            contacts,
            detail: GestureDetail::None,
        }
    }
}

impl fmt::Debug for GestureEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GestureEvent")
            .field("kind", &self.kind)
            .field("contacts", &self.contacts.len())
            .field("detail", &self.detail)
            .finish()
    }
}
