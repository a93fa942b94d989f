// Copyright 2026 the Tremor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for tremor.
//!
//! This crate provides the two platform collaborators the core needs:
//!
//! - [`FrameDriver`]: wires a [`FrameScheduler`] to `requestAnimationFrame`
//!   (with a fixed ~16 ms `setTimeout` fallback)
//! - [`GestureBinding`]: binds a [`Recognizer`] to an element's native touch
//!   events and pumps its timers with `setTimeout`
//!
//! [`FrameScheduler`]: tremor_core::batch::FrameScheduler
//! [`Recognizer`]: tremor_core::recognizer::Recognizer

#![no_std]

extern crate alloc;

mod frame;
mod touch;

pub use frame::FrameDriver;
pub use touch::{GestureBinding, GestureCallback, GestureConfig};

use tremor_core::time::HostTime;

/// Returns the current host time from `performance.now()`.
///
/// The returned [`HostTime`] is in microsecond ticks.
#[must_use]
pub fn now() -> HostTime {
    let ms = frame::performance_now();
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "performance.now() returns small positive f64; µs fits in u64"
    )]
    let us = (ms * 1000.0) as u64;
    HostTime(us)
}
