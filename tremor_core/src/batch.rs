// Copyright 2026 the Tremor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-batched measure/mutate task queues.
//!
//! [`FrameScheduler`] defers read ("measure") and write ("mutate") work to
//! the next animation-frame boundary so consumers never interleave layout
//! reads with layout writes. Tasks enter one of two FIFO queues; once per
//! scheduled frame the embedder calls [`flush`](FrameScheduler::flush), which
//! drains the measure queue entirely and then the mutate queue.
//!
//! # Sharing
//!
//! There must be one queue pair per page so unrelated consumers coalesce
//! into the same flush. `FrameScheduler` is therefore a cheaply cloneable
//! handle: every clone — and every [`extend`](FrameScheduler::extend)
//! derivative — feeds the same queues and the same scheduling flag. Create
//! one scheduler per page and hand out clones.
//!
//! # Frame scheduling
//!
//! The "next frame" primitive is a platform collaborator registered with
//! [`set_frame_requester`](FrameScheduler::set_frame_requester). Enqueueing
//! work requests at most one frame callback per pending flush (the
//! `scheduled` flag makes scheduling idempotent); the callback is expected
//! to invoke `flush`.
//!
//! # Failure
//!
//! Tasks are fallible. The first error aborts the remaining execution in
//! both queues for that pass; the failed task goes back to the front of its
//! queue and everything still queued is retried on the automatically
//! re-requested flush. A persistently failing task therefore stalls the
//! tasks behind it until it succeeds or is cancelled — retry idempotence is
//! the consumer's concern. The captured error goes to the hook installed
//! with [`set_error_hook`](FrameScheduler::set_error_hook), or is returned
//! from `flush` when no hook is installed.

use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::rc::Rc;
use alloc::string::String;
use core::cell::RefCell;
use core::fmt;

use crate::trace::{FlushBeginEvent, FlushEndEvent, TraceSink, Tracer};

/// Error returned by a failed task.
pub struct TaskError {
    message: String,
}

impl TaskError {
    /// Creates an error with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task failed: {}", self.message)
    }
}

impl fmt::Debug for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TaskError({:?})", self.message)
    }
}

impl core::error::Error for TaskError {}

/// A queued measure or mutate task.
pub type Task = Box<dyn FnMut() -> Result<(), TaskError>>;

/// Handle to a queued task, used for cancellation.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

impl fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TaskHandle({})", self.0)
    }
}

#[derive(Clone, Copy)]
enum Lane {
    Measure,
    Mutate,
}

struct Entry {
    handle: TaskHandle,
    task: Task,
}

struct QueueState {
    measures: VecDeque<Entry>,
    mutates: VecDeque<Entry>,
    scheduled: bool,
    next_handle: u64,
}

struct Inner {
    state: RefCell<QueueState>,
    requester: RefCell<Option<Box<dyn FnMut()>>>,
    error_hook: RefCell<Option<Box<dyn FnMut(TaskError)>>>,
    tracer: RefCell<Tracer>,
}

/// Shared handle to one measure/mutate queue pair.
#[derive(Clone)]
pub struct FrameScheduler {
    inner: Rc<Inner>,
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FrameScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("FrameScheduler")
            .field("measures", &state.measures.len())
            .field("mutates", &state.mutates.len())
            .field("scheduled", &state.scheduled)
            .finish_non_exhaustive()
    }
}

impl FrameScheduler {
    /// Creates a scheduler with empty queues and no frame requester.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(Inner {
                state: RefCell::new(QueueState {
                    measures: VecDeque::new(),
                    mutates: VecDeque::new(),
                    scheduled: false,
                    next_handle: 0,
                }),
                requester: RefCell::new(None),
                error_hook: RefCell::new(None),
                tracer: RefCell::new(Tracer::none()),
            }),
        }
    }

    /// Queues a read task for the next flush and returns its handle.
    pub fn measure(
        &self,
        task: impl FnMut() -> Result<(), TaskError> + 'static,
    ) -> TaskHandle {
        self.push(Lane::Measure, Box::new(task))
    }

    /// Queues a write task for the next flush and returns its handle.
    pub fn mutate(&self, task: impl FnMut() -> Result<(), TaskError> + 'static) -> TaskHandle {
        self.push(Lane::Mutate, Box::new(task))
    }

    /// Removes a queued task before it runs.
    ///
    /// Returns `false` for a task that already executed, is executing right
    /// now (it has been taken off its queue), or was never queued here.
    pub fn cancel(&self, handle: TaskHandle) -> bool {
        let mut state = self.inner.state.borrow_mut();
        if let Some(idx) = state.measures.iter().position(|e| e.handle == handle) {
            state.measures.remove(idx);
            return true;
        }
        if let Some(idx) = state.mutates.iter().position(|e| e.handle == handle) {
            state.mutates.remove(idx);
            return true;
        }
        false
    }

    /// Registers the platform's "next frame" primitive.
    ///
    /// The callback is invoked at most once per pending flush and is
    /// expected to arrange a later [`flush`](Self::flush) call.
    pub fn set_frame_requester(&self, requester: impl FnMut() + 'static) {
        *self.inner.requester.borrow_mut() = Some(Box::new(requester));
    }

    /// Installs the error hook that receives the first task error of each
    /// flush pass. Without a hook the error is returned from `flush`.
    pub fn set_error_hook(&self, hook: impl FnMut(TaskError) + 'static) {
        *self.inner.error_hook.borrow_mut() = Some(Box::new(hook));
    }

    /// Installs a trace sink (requires the `trace` feature to observe
    /// anything).
    pub fn set_trace_sink(&self, sink: Box<dyn TraceSink>) {
        *self.inner.tracer.borrow_mut() = Tracer::new(sink);
    }

    /// Returns `true` while a flush is pending.
    #[must_use]
    pub fn is_flush_scheduled(&self) -> bool {
        self.inner.state.borrow().scheduled
    }

    /// Returns the number of queued tasks across both lanes.
    #[must_use]
    pub fn pending_tasks(&self) -> usize {
        let state = self.inner.state.borrow();
        state.measures.len() + state.mutates.len()
    }

    /// Runs one flush pass: the measure queue fully, then the mutate queue.
    ///
    /// Each task is popped off its queue before it runs, so tasks may freely
    /// enqueue or cancel other tasks. On a task error the pass aborts, the
    /// failed task returns to the front of its queue, and the error is
    /// routed to the error hook — or returned here when none is installed.
    /// If any tasks remain after the pass (error remainder or re-entrant
    /// enqueues into the already-drained lane), another flush is requested
    /// immediately.
    pub fn flush(&self) -> Result<(), TaskError> {
        {
            let state = self.inner.state.borrow();
            self.inner.tracer.borrow_mut().flush_begin(&FlushBeginEvent {
                measures: state.measures.len(),
                mutates: state.mutates.len(),
            });
        }

        let mut error = None;
        'lanes: for lane in [Lane::Measure, Lane::Mutate] {
            loop {
                let entry = {
                    let mut state = self.inner.state.borrow_mut();
                    match lane {
                        Lane::Measure => state.measures.pop_front(),
                        Lane::Mutate => state.mutates.pop_front(),
                    }
                };
                let Some(mut entry) = entry else {
                    break;
                };
                if let Err(err) = (entry.task)() {
                    self.inner.tracer.borrow_mut().task_failed(err.message());
                    // The failed task keeps its place at the head of the
                    // lane and stalls it until it succeeds or is cancelled.
                    let mut state = self.inner.state.borrow_mut();
                    match lane {
                        Lane::Measure => state.measures.push_front(entry),
                        Lane::Mutate => state.mutates.push_front(entry),
                    }
                    error = Some(err);
                    break 'lanes;
                }
            }
        }

        let remaining = {
            let mut state = self.inner.state.borrow_mut();
            state.scheduled = false;
            state.measures.len() + state.mutates.len()
        };
        if remaining > 0 {
            self.schedule_flush();
        }
        self.inner.tracer.borrow_mut().flush_end(&FlushEndEvent {
            failed: error.is_some(),
            remaining,
        });

        match error {
            Some(err) => {
                // Take the hook out while it runs so it may re-enter the
                // scheduler.
                let taken = self.inner.error_hook.borrow_mut().take();
                match taken {
                    Some(mut hook) => {
                        hook(err);
                        *self.inner.error_hook.borrow_mut() = Some(hook);
                        Ok(())
                    }
                    None => Err(err),
                }
            }
            None => Ok(()),
        }
    }

    /// Produces a delegating variant of this scheduler.
    ///
    /// The overrides' [`initialize`](SchedulerOverrides::initialize) hook
    /// runs immediately; unoverridden operations fall through to this
    /// scheduler, and tasks queued through the variant enter the same queue
    /// pair. The base handle stays reachable via [`Extended::base`].
    pub fn extend<O: SchedulerOverrides>(&self, mut overrides: O) -> Extended<O> {
        overrides.initialize(self);
        Extended {
            base: self.clone(),
            overrides,
        }
    }

    fn push(&self, lane: Lane, task: Task) -> TaskHandle {
        let handle = {
            let mut state = self.inner.state.borrow_mut();
            let handle = TaskHandle(state.next_handle);
            state.next_handle += 1;
            let entry = Entry { handle, task };
            match lane {
                Lane::Measure => state.measures.push_back(entry),
                Lane::Mutate => state.mutates.push_back(entry),
            }
            handle
        };
        self.schedule_flush();
        handle
    }

    fn schedule_flush(&self) {
        {
            let mut state = self.inner.state.borrow_mut();
            if state.scheduled {
                return;
            }
            state.scheduled = true;
        }
        if let Some(requester) = self.inner.requester.borrow_mut().as_mut() {
            requester();
        }
    }
}

/// Overridable operations for [`FrameScheduler::extend`].
///
/// Every method has a default body forwarding to the base scheduler, so an
/// extension only implements what it changes.
pub trait SchedulerOverrides {
    /// Runs once when the extension is created.
    fn initialize(&mut self, base: &FrameScheduler) {
        _ = base;
    }

    /// Queues a read task.
    fn measure(&mut self, base: &FrameScheduler, task: Task) -> TaskHandle {
        base.measure(task)
    }

    /// Queues a write task.
    fn mutate(&mut self, base: &FrameScheduler, task: Task) -> TaskHandle {
        base.mutate(task)
    }

    /// Cancels a queued task.
    fn cancel(&mut self, base: &FrameScheduler, handle: TaskHandle) -> bool {
        base.cancel(handle)
    }
}

/// A scheduler variant produced by [`FrameScheduler::extend`].
pub struct Extended<O> {
    base: FrameScheduler,
    overrides: O,
}

impl<O> fmt::Debug for Extended<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extended")
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}

impl<O: SchedulerOverrides> Extended<O> {
    /// Queues a read task through the overrides.
    pub fn measure(
        &mut self,
        task: impl FnMut() -> Result<(), TaskError> + 'static,
    ) -> TaskHandle {
        self.overrides.measure(&self.base, Box::new(task))
    }

    /// Queues a write task through the overrides.
    pub fn mutate(&mut self, task: impl FnMut() -> Result<(), TaskError> + 'static) -> TaskHandle {
        self.overrides.mutate(&self.base, Box::new(task))
    }

    /// Cancels a queued task through the overrides.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        self.overrides.cancel(&self.base, handle)
    }

    /// Returns the underlying scheduler.
    #[must_use]
    pub fn base(&self) -> &FrameScheduler {
        &self.base
    }
}
