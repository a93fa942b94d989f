// Copyright 2026 the Tremor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable one-line-per-event output.

use std::io::Write;

use tremor_core::trace::{
    FlushBeginEvent, FlushEndEvent, GestureDispatchEvent, TimerArmedEvent, TimerCancelledEvent,
    TimerFiredEvent, TraceSink,
};

/// A [`TraceSink`] that writes one formatted line per event.
///
/// Write errors are swallowed; diagnostics must not take the host down.
#[derive(Debug)]
pub struct PrettySink<W> {
    out: W,
}

impl<W: Write> PrettySink<W> {
    /// Creates a sink writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TraceSink for PrettySink<W> {
    fn on_gesture(&mut self, e: &GestureDispatchEvent) {
        let _ = writeln!(
            self.out,
            "{:>10}us gesture {:<16} contacts={}",
            e.at.ticks(),
            e.kind.name(),
            e.contact_count
        );
    }

    fn on_timer_armed(&mut self, e: &TimerArmedEvent) {
        let _ = writeln!(
            self.out,
            "{:>10}   timer   {:?} armed (due {}us)",
            "",
            e.timer,
            e.deadline.ticks()
        );
    }

    fn on_timer_cancelled(&mut self, e: &TimerCancelledEvent) {
        let _ = writeln!(self.out, "{:>10}   timer   {:?} cancelled", "", e.timer);
    }

    fn on_timer_fired(&mut self, e: &TimerFiredEvent) {
        let _ = writeln!(
            self.out,
            "{:>10}us timer   {:?} fired",
            e.at.ticks(),
            e.timer
        );
    }

    fn on_flush_begin(&mut self, e: &FlushBeginEvent) {
        let _ = writeln!(
            self.out,
            "{:>10}   flush   begin measures={} mutates={}",
            "", e.measures, e.mutates
        );
    }

    fn on_flush_end(&mut self, e: &FlushEndEvent) {
        let _ = writeln!(
            self.out,
            "{:>10}   flush   end failed={} remaining={}",
            "", e.failed, e.remaining
        );
    }

    fn on_task_failed(&mut self, message: &str) {
        let _ = writeln!(self.out, "{:>10}   task    failed: {message}", "");
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Point;
    use tremor_core::recognizer::Recognizer;
    use tremor_core::time::HostTime;

    use super::*;

    #[test]
    fn lines_mention_the_gesture_names() {
        // The sink must be readable back out, so drive a recognizer through
        // a shared buffer sink.
        use std::cell::RefCell;
        use std::rc::Rc;

        #[derive(Clone, Default)]
        struct SharedBuf(Rc<RefCell<Vec<u8>>>);
        impl Write for SharedBuf {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.0.borrow_mut().extend_from_slice(buf);
                Ok(buf.len())
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let buf = SharedBuf::default();
        let mut rec = Recognizer::new();
        rec.set_trace_sink(Box::new(PrettySink::new(buf.clone())));

        rec.touch_start(&[Point::new(1.0, 2.0)], HostTime::from_millis(5));
        rec.touch_end(&[], HostTime::from_millis(20));
        rec.advance(HostTime::from_millis(400));

        let text = String::from_utf8(buf.0.borrow().clone()).unwrap();
        assert!(text.contains("touchStart"), "got:\n{text}");
        assert!(text.contains("singleTap"), "got:\n{text}");
        assert!(text.contains("fired"), "got:\n{text}");
    }
}
