// Copyright 2026 the Tremor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared in-memory event recording.
//!
//! [`RecorderSink`] implements [`TraceSink`] and appends every event to a
//! shared buffer. The sink is cheaply cloneable: install one clone on the
//! recognizer or scheduler and keep another to read the recording back.

use std::cell::RefCell;
use std::rc::Rc;

use tremor_core::trace::{
    FlushBeginEvent, FlushEndEvent, GestureDispatchEvent, TimerArmedEvent, TimerCancelledEvent,
    TimerFiredEvent, TraceSink,
};

/// One recorded trace event.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// A gesture notification was dispatched.
    Gesture(GestureDispatchEvent),
    /// A pending timer was armed.
    TimerArmed(TimerArmedEvent),
    /// A pending timer was cancelled.
    TimerCancelled(TimerCancelledEvent),
    /// A pending timer fired.
    TimerFired(TimerFiredEvent),
    /// A flush pass began.
    FlushBegin(FlushBeginEvent),
    /// A flush pass ended.
    FlushEnd(FlushEndEvent),
    /// A queued task failed.
    TaskFailed(String),
}

/// A [`TraceSink`] that appends events to a shared buffer.
#[derive(Clone, Debug, Default)]
pub struct RecorderSink {
    events: Rc<RefCell<Vec<RecordedEvent>>>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the events recorded so far.
    #[must_use]
    pub fn snapshot(&self) -> Vec<RecordedEvent> {
        self.events.borrow().clone()
    }

    /// Drains and returns the recorded events.
    pub fn take(&self) -> Vec<RecordedEvent> {
        core::mem::take(&mut *self.events.borrow_mut())
    }

    /// Returns the number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    fn push(&self, event: RecordedEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl TraceSink for RecorderSink {
    fn on_gesture(&mut self, e: &GestureDispatchEvent) {
        self.push(RecordedEvent::Gesture(*e));
    }

    fn on_timer_armed(&mut self, e: &TimerArmedEvent) {
        self.push(RecordedEvent::TimerArmed(*e));
    }

    fn on_timer_cancelled(&mut self, e: &TimerCancelledEvent) {
        self.push(RecordedEvent::TimerCancelled(*e));
    }

    fn on_timer_fired(&mut self, e: &TimerFiredEvent) {
        self.push(RecordedEvent::TimerFired(*e));
    }

    fn on_flush_begin(&mut self, e: &FlushBeginEvent) {
        self.push(RecordedEvent::FlushBegin(*e));
    }

    fn on_flush_end(&mut self, e: &FlushEndEvent) {
        self.push(RecordedEvent::FlushEnd(*e));
    }

    fn on_task_failed(&mut self, message: &str) {
        self.push(RecordedEvent::TaskFailed(message.to_owned()));
    }
}
