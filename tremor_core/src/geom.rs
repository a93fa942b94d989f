// Copyright 2026 the Tremor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vector helpers for gesture classification.
//!
//! Contacts are [`kurbo::Point`]s in page coordinates; the difference between
//! two simultaneous contacts is a [`kurbo::Vec2`]. `kurbo` already supplies
//! length ([`Vec2::hypot`]), dot, and cross products; this module adds the
//! two derived quantities the recognizer needs: the unsigned angle between
//! two vectors and the signed rotation between successive multi-touch
//! samples.
//!
//! [`Vec2::hypot`]: kurbo::Vec2::hypot

use kurbo::Vec2;

/// Returns the angle between two vectors in radians.
///
/// Returns `0.0` when either vector has zero length. The cosine ratio is
/// clamped above at `1.0` to absorb floating-point overshoot; the lower bound
/// is intentionally left unclamped, matching the established classification
/// behavior for exactly-opposed contact pairs.
#[must_use]
pub fn angle_between(a: Vec2, b: Vec2) -> f64 {
    let mr = a.hypot() * b.hypot();
    if mr == 0.0 {
        return 0.0;
    }
    let mut r = a.dot(b) / mr;
    if r > 1.0 {
        r = 1.0;
    }
    libm::acos(r)
}

/// Returns the signed rotation from `previous` to `current` in degrees.
///
/// The magnitude is [`angle_between`]; the sign follows the cross product:
/// `cross(current, previous) > 0` (counter-clockwise) yields a negative
/// angle.
#[must_use]
pub fn signed_rotation_degrees(current: Vec2, previous: Vec2) -> f64 {
    let mut angle = angle_between(current, previous);
    if current.cross(previous) > 0.0 {
        angle = -angle;
    }
    angle.to_degrees()
}
