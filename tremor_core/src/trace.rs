// Copyright 2026 the Tremor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for gesture dispatch and flush passes.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! recognizer and the frame scheduler call as they work. All method bodies
//! default to no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional owned sink. When the `trace` feature is
//! **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace` — enables the `Tracer` method bodies (one branch per call).

use alloc::boxed::Box;

use crate::gesture::GestureKind;
use crate::time::HostTime;

/// Which of the recognizer's pending timers an event refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// The 750 ms long-press timer armed at contact start.
    LongPress,
    /// The 250 ms single-tap timer armed at contact end.
    SingleTap,
    /// The zero-delay deferred tap dispatch.
    Tap,
    /// The zero-delay deferred swipe dispatch.
    Swipe,
}

/// Emitted when a gesture notification is dispatched to listeners.
#[derive(Clone, Copy, Debug)]
pub struct GestureDispatchEvent {
    /// Which notification fired.
    pub kind: GestureKind,
    /// Number of contacts in the event snapshot.
    pub contact_count: usize,
    /// Host time of the originating raw event or timer firing.
    pub at: HostTime,
}

/// Emitted when a pending timer is armed.
#[derive(Clone, Copy, Debug)]
pub struct TimerArmedEvent {
    /// Which timer.
    pub timer: TimerKind,
    /// When it is due.
    pub deadline: HostTime,
}

/// Emitted when a pending timer is cancelled before firing.
#[derive(Clone, Copy, Debug)]
pub struct TimerCancelledEvent {
    /// Which timer.
    pub timer: TimerKind,
}

/// Emitted when a pending timer fires.
#[derive(Clone, Copy, Debug)]
pub struct TimerFiredEvent {
    /// Which timer.
    pub timer: TimerKind,
    /// Host time the pump observed when firing.
    pub at: HostTime,
}

/// Emitted at the start of a flush pass.
#[derive(Clone, Copy, Debug)]
pub struct FlushBeginEvent {
    /// Queued measure tasks at pass start.
    pub measures: usize,
    /// Queued mutate tasks at pass start.
    pub mutates: usize,
}

/// Emitted at the end of a flush pass.
#[derive(Clone, Copy, Debug)]
pub struct FlushEndEvent {
    /// Whether the pass was aborted by a task error.
    pub failed: bool,
    /// Tasks still queued after the pass (error remainder plus re-entrant
    /// enqueues).
    pub remaining: usize,
}

/// Receives trace events from the recognizer and the frame scheduler.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a gesture notification is dispatched.
    fn on_gesture(&mut self, e: &GestureDispatchEvent) {
        _ = e;
    }

    /// Called when a pending timer is armed.
    fn on_timer_armed(&mut self, e: &TimerArmedEvent) {
        _ = e;
    }

    /// Called when a pending timer is cancelled.
    fn on_timer_cancelled(&mut self, e: &TimerCancelledEvent) {
        _ = e;
    }

    /// Called when a pending timer fires.
    fn on_timer_fired(&mut self, e: &TimerFiredEvent) {
        _ = e;
    }

    /// Called at the start of a flush pass.
    fn on_flush_begin(&mut self, e: &FlushBeginEvent) {
        _ = e;
    }

    /// Called at the end of a flush pass.
    fn on_flush_end(&mut self, e: &FlushEndEvent) {
        _ = e;
    }

    /// Called when a queued task returns an error.
    fn on_task_failed(&mut self, message: &str) {
        _ = message;
    }
}

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

/// Thin wrapper around an optional owned [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing.
/// When **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
#[derive(Default)]
pub struct Tracer {
    #[cfg(feature = "trace")]
    sink: Option<Box<dyn TraceSink>>,
}

impl core::fmt::Debug for Tracer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl Tracer {
    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Creates a tracer that dispatches to the given sink.
    ///
    /// With the `trace` feature off the sink is dropped immediately.
    #[inline]
    #[must_use]
    pub fn new(sink: Box<dyn TraceSink>) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {}
        }
    }

    /// Emits a [`GestureDispatchEvent`].
    #[inline]
    pub fn gesture(&mut self, e: &GestureDispatchEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_gesture(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TimerArmedEvent`].
    #[inline]
    pub fn timer_armed(&mut self, e: &TimerArmedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_timer_armed(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TimerCancelledEvent`].
    #[inline]
    pub fn timer_cancelled(&mut self, e: &TimerCancelledEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_timer_cancelled(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TimerFiredEvent`].
    #[inline]
    pub fn timer_fired(&mut self, e: &TimerFiredEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_timer_fired(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FlushBeginEvent`].
    #[inline]
    pub fn flush_begin(&mut self, e: &FlushBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_flush_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FlushEndEvent`].
    #[inline]
    pub fn flush_end(&mut self, e: &FlushEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_flush_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a task failure message.
    #[inline]
    pub fn task_failed(&mut self, message: &str) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_task_failed(message);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = message;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_sink_accepts_everything() {
        let mut sink = NoopSink;
        sink.on_gesture(&GestureDispatchEvent {
            kind: GestureKind::Tap,
            contact_count: 1,
            at: HostTime(0),
        });
        sink.on_timer_armed(&TimerArmedEvent {
            timer: TimerKind::LongPress,
            deadline: HostTime(750_000),
        });
        sink.on_flush_begin(&FlushBeginEvent {
            measures: 0,
            mutates: 0,
        });
        sink.on_task_failed("nope");
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.gesture(&GestureDispatchEvent {
            kind: GestureKind::Swipe,
            contact_count: 0,
            at: HostTime(5),
        });
        tracer.flush_end(&FlushEndEvent {
            failed: false,
            remaining: 0,
        });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        #[derive(Default)]
        struct RecordingSink {
            kinds: Vec<GestureKind>,
        }
        impl TraceSink for RecordingSink {
            fn on_gesture(&mut self, e: &GestureDispatchEvent) {
                self.kinds.push(e.kind);
            }
        }

        // The sink is owned by the tracer, so observe through a shared cell.
        use alloc::rc::Rc;
        use core::cell::RefCell;

        struct SharedSink(Rc<RefCell<RecordingSink>>);
        impl TraceSink for SharedSink {
            fn on_gesture(&mut self, e: &GestureDispatchEvent) {
                self.0.borrow_mut().on_gesture(e);
            }
        }

        let shared = Rc::new(RefCell::new(RecordingSink::default()));
        let mut tracer = Tracer::new(Box::new(SharedSink(Rc::clone(&shared))));
        tracer.gesture(&GestureDispatchEvent {
            kind: GestureKind::Pinch,
            contact_count: 2,
            at: HostTime(1),
        });
        assert_eq!(shared.borrow().kinds, [GestureKind::Pinch]);
    }
}
