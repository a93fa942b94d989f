// Copyright 2026 the Tremor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Touch-gesture recognition and frame-batched task scheduling.
//!
//! `tremor_core` turns a raw stream of touch contacts into semantic gesture
//! notifications (tap, double-tap, long-press, swipe, pinch, rotate,
//! press-move) and batches read/write work onto animation-frame boundaries.
//! It is `no_std` compatible (with `alloc`) and completely platform-free:
//! time arrives as [`HostTime`](time::HostTime) values supplied by the
//! embedder, and the two platform collaborators — a touch-event source and a
//! "next frame" callback primitive — are provided by a backend crate such as
//! `tremor_backend_web`.
//!
//! # Architecture
//!
//! Two independent pipelines share the same time base:
//!
//! ```text
//!   Touch source (backend)                     Consumers
//!       │ contacts + HostTime                      │ measure()/mutate()
//!       ▼                                          ▼
//!   Recognizer ──► ListenerSet::dispatch      FrameScheduler ──► queues
//!       │                  │                       │
//!       │ next_deadline()  ▼                       │ frame requester
//!       ▼            GestureEvent                  ▼
//!   platform timer ──► advance()             frame callback ──► flush()
//! ```
//!
//! **[`geom`]** — Vector helpers over [`kurbo::Vec2`]: the angle between two
//! contact vectors and the signed rotation between successive samples.
//!
//! **[`gesture`]** — The gesture vocabulary: [`GestureKind`](gesture::GestureKind),
//! swipe directions, and the immutable [`GestureEvent`](gesture::GestureEvent)
//! payload passed to listeners.
//!
//! **[`listener`]** — Ordered listener registration and synchronous dispatch,
//! addressed by [`ListenerId`](listener::ListenerId) handles.
//!
//! **[`recognizer`]** — The touch state machine. Consumes
//! start/move/end/cancel contact events, carries per-session geometry and
//! timing state, and fires the fourteen gesture notifications. Pending
//! timers are explicit deadlines the embedder pumps via
//! [`Recognizer::advance`](recognizer::Recognizer::advance).
//!
//! **[`batch`]** — Measure/mutate FIFO queues flushed once per scheduled
//! frame, with idempotent scheduling, error capture, and re-entrant-safe
//! draining.
//!
//! **[`time`]** — Microsecond-tick [`HostTime`](time::HostTime) and
//! [`Duration`](time::Duration).
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types for
//! instrumentation, with zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one
//!   branch per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod batch;
pub mod geom;
pub mod gesture;
pub mod listener;
pub mod recognizer;
pub mod time;
pub mod trace;
