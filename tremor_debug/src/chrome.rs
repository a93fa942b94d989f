// Copyright 2026 the Tremor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] turns events recorded by a
//! [`RecorderSink`](super::recorder::RecorderSink) into [Chrome Trace Event
//! Format][spec] JSON, suitable for `chrome://tracing` or
//! [Perfetto](https://ui.perfetto.dev/).
//!
//! Gesture dispatches and timer firings carry their own microsecond
//! timestamps. Events without an intrinsic time (timer arming/cancellation,
//! flush passes, task failures) inherit the most recent timestamped event's
//! time, which keeps the exported timeline ordered.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::RecordedEvent;

/// Writes recorded events as a Chrome Trace Event Format JSON array.
pub fn export(events: &[RecordedEvent], writer: &mut dyn Write) -> io::Result<()> {
    let mut out: Vec<Value> = Vec::with_capacity(events.len());
    // Timestamp cursor for events with no intrinsic time.
    let mut cursor: u64 = 0;

    for event in events {
        match event {
            RecordedEvent::Gesture(e) => {
                cursor = e.at.ticks();
                out.push(json!({
                    "ph": "i",
                    "name": e.kind.name(),
                    "cat": "Gesture",
                    "ts": cursor,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": { "contacts": e.contact_count }
                }));
            }
            RecordedEvent::TimerArmed(e) => {
                out.push(json!({
                    "ph": "i",
                    "name": format!("{:?} armed", e.timer),
                    "cat": "Timer",
                    "ts": cursor,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": { "deadline_us": e.deadline.ticks() }
                }));
            }
            RecordedEvent::TimerCancelled(e) => {
                out.push(json!({
                    "ph": "i",
                    "name": format!("{:?} cancelled", e.timer),
                    "cat": "Timer",
                    "ts": cursor,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {}
                }));
            }
            RecordedEvent::TimerFired(e) => {
                cursor = e.at.ticks();
                out.push(json!({
                    "ph": "i",
                    "name": format!("{:?} fired", e.timer),
                    "cat": "Timer",
                    "ts": cursor,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {}
                }));
            }
            RecordedEvent::FlushBegin(e) => {
                out.push(json!({
                    "ph": "B",
                    "name": "Flush",
                    "cat": "Scheduler",
                    "ts": cursor,
                    "pid": 0,
                    "tid": 0,
                    "args": { "measures": e.measures, "mutates": e.mutates }
                }));
            }
            RecordedEvent::FlushEnd(e) => {
                out.push(json!({
                    "ph": "E",
                    "name": "Flush",
                    "cat": "Scheduler",
                    "ts": cursor,
                    "pid": 0,
                    "tid": 0,
                    "args": { "failed": e.failed, "remaining": e.remaining }
                }));
            }
            RecordedEvent::TaskFailed(message) => {
                out.push(json!({
                    "ph": "i",
                    "name": "TaskFailed",
                    "cat": "Scheduler",
                    "ts": cursor,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": { "message": message }
                }));
            }
        }
    }

    serde_json::to_writer(writer, &Value::Array(out)).map_err(io::Error::from)
}

#[cfg(test)]
mod tests {
    use kurbo::Point;
    use tremor_core::batch::{FrameScheduler, TaskError};
    use tremor_core::recognizer::Recognizer;
    use tremor_core::time::HostTime;

    use super::*;
    use crate::recorder::RecorderSink;

    #[test]
    fn exports_one_json_object_per_event() {
        let recorder = RecorderSink::new();
        let mut rec = Recognizer::new();
        rec.set_trace_sink(Box::new(recorder.clone()));
        rec.touch_start(&[Point::new(0.0, 0.0)], HostTime::from_millis(1));
        rec.touch_end(&[], HostTime::from_millis(20));
        rec.advance(HostTime::from_millis(500));

        let events = recorder.snapshot();
        let mut buf = Vec::new();
        export(&events, &mut buf).unwrap();

        let parsed: Value = serde_json::from_slice(&buf).unwrap();
        let array = parsed.as_array().unwrap();
        assert_eq!(array.len(), events.len());
        assert!(array.iter().all(|e| e.get("ts").is_some()));
    }

    #[test]
    fn flush_passes_export_as_duration_pairs() {
        let recorder = RecorderSink::new();
        let sched = FrameScheduler::new();
        sched.set_trace_sink(Box::new(recorder.clone()));
        sched.measure(|| Ok(()));
        sched.mutate(|| Err(TaskError::new("broken")));
        let _ = sched.flush();

        let events = recorder.snapshot();
        let mut buf = Vec::new();
        export(&events, &mut buf).unwrap();

        let parsed: Value = serde_json::from_slice(&buf).unwrap();
        let phases: Vec<&str> = parsed
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["ph"].as_str().unwrap())
            .collect();
        assert_eq!(phases, vec!["B", "i", "E"], "begin, task failure, end");
    }
}
