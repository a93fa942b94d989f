// Copyright 2026 the Tremor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and Chrome trace export for tremor
//! diagnostics.
//!
//! This crate provides [`TraceSink`](tremor_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettySink`] — human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`] — shared in-memory recording for inspection
//!   and export.
//! - [`chrome::export`] — writes Chrome Trace Event Format JSON from
//!   recorded events.

pub mod chrome;
pub mod pretty;
pub mod recorder;
