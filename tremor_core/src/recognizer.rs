// Copyright 2026 the Tremor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The touch state machine.
//!
//! [`Recognizer`] consumes raw contact events — start, move, end, cancel —
//! and fires the fourteen [`GestureKind`] notifications through per-kind
//! listener sets. All time is supplied by the embedder as [`HostTime`]
//! values; nothing here reads a clock.
//!
//! # Timer protocol
//!
//! Gesture disambiguation needs four suspensions: a 750 ms long-press timer,
//! a 250 ms single-tap timer (so a second tap can supersede it), and
//! zero-delay deferred dispatches for tap and swipe (letting the platform
//! settle before consumer code runs). These are explicit deadlines, not
//! callbacks: after feeding an event, the embedder asks
//! [`next_deadline`](Recognizer::next_deadline), arms a platform timer, and
//! calls [`advance`](Recognizer::advance) when it fires (or at any later
//! point — due timers fire in deadline order). Tests drive `advance` with
//! simulated time directly.
//!
//! # Session state
//!
//! One recognizer carries one gesture session: the contact geometry and
//! timing fields reset to neutral at the end of every contact sequence.
//! [`touch_cancel`](Recognizer::touch_cancel) only clears timers; the
//! geometry fields are left for the next start to overwrite.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use kurbo::{Point, Vec2};

use crate::geom::signed_rotation_degrees;
use crate::gesture::{GestureDetail, GestureEvent, GestureKind, SwipeDirection};
use crate::listener::{ListenerId, ListenerSet};
use crate::time::{Duration, HostTime};
use crate::trace::{
    GestureDispatchEvent, TimerArmedEvent, TimerCancelledEvent, TimerFiredEvent, TimerKind,
    TraceSink, Tracer,
};

/// Hold time before a stationary contact becomes a long press.
pub const LONG_PRESS_DELAY: Duration = Duration::from_millis(750);

/// Maximum gap between two contact starts that can form a double tap.
pub const DOUBLE_TAP_WINDOW: Duration = Duration::from_millis(250);

/// Delay before a lone tap is confirmed as a single tap. Matches
/// [`DOUBLE_TAP_WINDOW`] so a second contact start can supersede it.
pub const SINGLE_TAP_DELAY: Duration = Duration::from_millis(250);

/// Maximum per-axis distance (device pixels) between two taps of a double
/// tap.
pub const TAP_SLOP: f64 = 30.0;

/// Per-axis displacement (device pixels) beyond which a sequence classifies
/// as a swipe instead of a tap.
pub const SWIPE_THRESHOLD: f64 = 30.0;

/// What the embedder should do with the platform's default action for the
/// raw event it just fed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[must_use]
pub enum DefaultAction {
    /// Let the platform's default behavior proceed.
    Allow,
    /// Suppress the default action (native scroll/zoom would interfere with
    /// an in-progress multi-contact gesture).
    Suppress,
}

/// A deadline plus the contact snapshot to dispatch when it fires.
struct PendingDispatch {
    deadline: HostTime,
    /// Arming order, to break deadline ties the way sequential platform
    /// timers would.
    seq: u64,
    contacts: Vec<Point>,
}

/// The touch-gesture state machine for one bound input surface.
pub struct Recognizer {
    listeners: [ListenerSet; GestureKind::COUNT],

    /// Inter-contact vector at the previous multi-touch sample.
    pair_vector: Option<Vec2>,
    /// Contact distance at multi-touch start; basis for the pinch scale.
    pinch_start_len: Option<f64>,
    /// First contact position of the current sequence.
    first_contact: Option<Point>,
    /// Most recent single-contact position.
    last_contact: Option<Point>,

    /// Position of the previous contact start, for double-tap proximity.
    last_tap_position: Option<Point>,
    /// Time of the previous contact start.
    last_start_time: Option<HostTime>,
    double_tap_candidate: bool,

    long_press: Option<PendingDispatch>,
    single_tap: Option<PendingDispatch>,
    tap: Option<PendingDispatch>,
    swipe: Option<(PendingDispatch, SwipeDirection)>,
    timer_seq: u64,

    tracer: Tracer,
}

impl Default for Recognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Recognizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recognizer")
            .field("pair_vector", &self.pair_vector)
            .field("pinch_start_len", &self.pinch_start_len)
            .field("first_contact", &self.first_contact)
            .field("last_contact", &self.last_contact)
            .field("double_tap_candidate", &self.double_tap_candidate)
            .field("next_deadline", &self.next_deadline())
            .finish_non_exhaustive()
    }
}

impl Recognizer {
    /// Creates a recognizer with no listeners registered.
    #[must_use]
    pub fn new() -> Self {
        Self {
            listeners: core::array::from_fn(|_| ListenerSet::new()),
            pair_vector: None,
            pinch_start_len: None,
            first_contact: None,
            last_contact: None,
            last_tap_position: None,
            last_start_time: None,
            double_tap_candidate: false,
            long_press: None,
            single_tap: None,
            tap: None,
            swipe: None,
            timer_seq: 0,
            tracer: Tracer::none(),
        }
    }

    /// Installs a trace sink (requires the `trace` feature to observe
    /// anything).
    pub fn set_trace_sink(&mut self, sink: Box<dyn TraceSink>) {
        self.tracer = Tracer::new(sink);
    }

    // -- Listener management -----------------------------------------------

    /// Registers a listener for `kind` and returns its handle.
    pub fn on(&mut self, kind: GestureKind, f: impl FnMut(&GestureEvent) + 'static) -> ListenerId {
        self.listeners[kind.index()].add(Box::new(f))
    }

    /// Removes one listener from `kind`'s set.
    pub fn off(&mut self, kind: GestureKind, id: ListenerId) -> bool {
        self.listeners[kind.index()].remove(id)
    }

    /// Removes every listener registered for `kind`.
    pub fn off_all(&mut self, kind: GestureKind) {
        self.listeners[kind.index()].clear();
    }

    /// Removes every listener for every kind.
    pub fn clear_listeners(&mut self) {
        for set in &mut self.listeners {
            set.clear();
        }
    }

    // -- Raw contact events ------------------------------------------------

    /// Feeds a contact-start event. An empty contact list is ignored.
    pub fn touch_start(&mut self, contacts: &[Point], now: HostTime) {
        let Some(&first) = contacts.first() else {
            return;
        };
        let delta = match self.last_start_time {
            Some(last) => now.saturating_duration_since(last),
            None => Duration::ZERO,
        };
        self.first_contact = Some(first);
        self.dispatch(GestureKind::TouchStart, contacts.to_vec(), GestureDetail::None, now);

        if let Some(prev) = self.last_tap_position {
            self.double_tap_candidate = delta > Duration::ZERO
                && delta <= DOUBLE_TAP_WINDOW
                && (prev.x - first.x).abs() < TAP_SLOP
                && (prev.y - first.y).abs() < TAP_SLOP;
        }
        self.last_tap_position = Some(first);
        self.last_start_time = Some(now);

        if contacts.len() > 1 {
            // A second contact voids the single-finger gestures in flight.
            self.cancel_timer(TimerKind::LongPress);
            self.cancel_timer(TimerKind::SingleTap);
            let v = contacts[1] - first;
            self.pair_vector = Some(v);
            self.pinch_start_len = Some(v.hypot());
            self.dispatch(
                GestureKind::MultipointStart,
                contacts.to_vec(),
                GestureDetail::None,
                now,
            );
        }

        self.arm_long_press(contacts.to_vec(), now);
    }

    /// Feeds a contact-move event. An empty contact list is ignored.
    ///
    /// Returns [`DefaultAction::Suppress`] while two or more contacts are
    /// down; the embedder must then suppress the platform default action for
    /// this raw event.
    pub fn touch_move(&mut self, contacts: &[Point], now: HostTime) -> DefaultAction {
        let Some(&current) = contacts.first() else {
            return DefaultAction::Allow;
        };
        // Any movement invalidates a tap in progress.
        self.double_tap_candidate = false;

        if contacts.len() > 1 {
            let v = contacts[1] - current;
            if let Some(prev) = self.pair_vector {
                if let Some(len) = self.pinch_start_len
                    && len > 0.0
                {
                    let scale = v.hypot() / len;
                    self.dispatch(
                        GestureKind::Pinch,
                        contacts.to_vec(),
                        GestureDetail::Pinch { scale },
                        now,
                    );
                }
                let degrees = signed_rotation_degrees(v, prev);
                self.dispatch(
                    GestureKind::Rotate,
                    contacts.to_vec(),
                    GestureDetail::Rotate { degrees },
                    now,
                );
            }
            self.pair_vector = Some(v);
        } else {
            let delta = match self.last_contact {
                Some(prev) => current - prev,
                None => Vec2::ZERO,
            };
            self.dispatch(
                GestureKind::PressMove,
                contacts.to_vec(),
                GestureDetail::PressMove { delta },
                now,
            );
        }

        self.dispatch(GestureKind::TouchMove, contacts.to_vec(), GestureDetail::None, now);
        self.cancel_timer(TimerKind::LongPress);
        self.last_contact = Some(current);

        if contacts.len() > 1 {
            DefaultAction::Suppress
        } else {
            DefaultAction::Allow
        }
    }

    /// Feeds a contact-end event; `remaining` is the contacts still down.
    pub fn touch_end(&mut self, remaining: &[Point], now: HostTime) {
        self.cancel_timer(TimerKind::LongPress);

        if remaining.len() < 2 {
            self.dispatch(
                GestureKind::MultipointEnd,
                remaining.to_vec(),
                GestureDetail::None,
                now,
            );
        }

        if let (Some(first), Some(last)) = (self.first_contact, self.last_contact)
            && ((first.x - last.x).abs() > SWIPE_THRESHOLD
                || (first.y - last.y).abs() > SWIPE_THRESHOLD)
        {
            let direction = swipe_direction(first, last);
            let pending = self.pending(now, remaining.to_vec());
            self.tracer.timer_armed(&TimerArmedEvent {
                timer: TimerKind::Swipe,
                deadline: now,
            });
            self.swipe = Some((pending, direction));
        } else {
            let pending = self.pending(now, remaining.to_vec());
            self.tracer.timer_armed(&TimerArmedEvent {
                timer: TimerKind::Tap,
                deadline: now,
            });
            self.tap = Some(pending);

            if !self.double_tap_candidate {
                let deadline = now + SINGLE_TAP_DELAY;
                let pending = self.pending(deadline, remaining.to_vec());
                self.tracer.timer_armed(&TimerArmedEvent {
                    timer: TimerKind::SingleTap,
                    deadline,
                });
                self.single_tap = Some(pending);
            }
        }

        self.dispatch(GestureKind::TouchEnd, remaining.to_vec(), GestureDetail::None, now);

        // End of sequence: back to the neutral state. The pair vector is
        // reset to zero length, not cleared, so a stray two-contact move
        // before the next start reports a zero rotation.
        self.pair_vector = Some(Vec2::ZERO);
        self.pinch_start_len = None;
        self.first_contact = None;
        self.last_contact = None;
    }

    /// Feeds a contact-cancel event: clears all pending timers and fires
    /// `TouchCancel`.
    ///
    /// Geometry fields are not reset here; the next `touch_start` overwrites
    /// everything a new sequence reads.
    pub fn touch_cancel(&mut self, now: HostTime) {
        self.cancel_timer(TimerKind::SingleTap);
        self.cancel_timer(TimerKind::Tap);
        self.cancel_timer(TimerKind::LongPress);
        self.cancel_timer(TimerKind::Swipe);
        self.dispatch(GestureKind::TouchCancel, Vec::new(), GestureDetail::None, now);
    }

    // -- Timer pump --------------------------------------------------------

    /// Fires every pending timer whose deadline is at or before `now`, in
    /// deadline order (ties in arming order).
    pub fn advance(&mut self, now: HostTime) {
        while let Some(kind) = self.next_due(now) {
            self.fire(kind, now);
        }
    }

    /// Returns the earliest pending deadline, if any, so the embedder can
    /// arm a platform timer.
    #[must_use]
    pub fn next_deadline(&self) -> Option<HostTime> {
        [
            self.long_press.as_ref().map(|p| p.deadline),
            self.single_tap.as_ref().map(|p| p.deadline),
            self.tap.as_ref().map(|p| p.deadline),
            self.swipe.as_ref().map(|(p, _)| p.deadline),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    // -- Internals ---------------------------------------------------------

    fn dispatch(
        &mut self,
        kind: GestureKind,
        contacts: Vec<Point>,
        detail: GestureDetail,
        at: HostTime,
    ) {
        self.tracer.gesture(&GestureDispatchEvent {
            kind,
            contact_count: contacts.len(),
            at,
        });
        let event = GestureEvent {
            kind,
            contacts,
            detail,
        };
        self.listeners[kind.index()].dispatch(&event);
    }

    fn pending(&mut self, deadline: HostTime, contacts: Vec<Point>) -> PendingDispatch {
        let seq = self.timer_seq;
        self.timer_seq += 1;
        PendingDispatch {
            deadline,
            seq,
            contacts,
        }
    }

    fn arm_long_press(&mut self, contacts: Vec<Point>, now: HostTime) {
        let deadline = now + LONG_PRESS_DELAY;
        let pending = self.pending(deadline, contacts);
        self.tracer.timer_armed(&TimerArmedEvent {
            timer: TimerKind::LongPress,
            deadline,
        });
        self.long_press = Some(pending);
    }

    fn cancel_timer(&mut self, kind: TimerKind) {
        let was_pending = match kind {
            TimerKind::LongPress => self.long_press.take().is_some(),
            TimerKind::SingleTap => self.single_tap.take().is_some(),
            TimerKind::Tap => self.tap.take().is_some(),
            TimerKind::Swipe => self.swipe.take().is_some(),
        };
        if was_pending {
            self.tracer.timer_cancelled(&TimerCancelledEvent { timer: kind });
        }
    }

    fn next_due(&self, now: HostTime) -> Option<TimerKind> {
        [
            (
                self.long_press.as_ref().map(|p| (p.deadline, p.seq)),
                TimerKind::LongPress,
            ),
            (
                self.single_tap.as_ref().map(|p| (p.deadline, p.seq)),
                TimerKind::SingleTap,
            ),
            (self.tap.as_ref().map(|p| (p.deadline, p.seq)), TimerKind::Tap),
            (
                self.swipe.as_ref().map(|(p, _)| (p.deadline, p.seq)),
                TimerKind::Swipe,
            ),
        ]
        .into_iter()
        .filter_map(|(meta, kind)| meta.map(|(deadline, seq)| (deadline, seq, kind)))
        .filter(|&(deadline, _, _)| deadline <= now)
        .min_by_key(|&(deadline, seq, _)| (deadline, seq))
        .map(|(_, _, kind)| kind)
    }

    fn fire(&mut self, kind: TimerKind, now: HostTime) {
        self.tracer.timer_fired(&TimerFiredEvent { timer: kind, at: now });
        match kind {
            TimerKind::LongPress => {
                if let Some(p) = self.long_press.take() {
                    self.dispatch(GestureKind::LongTap, p.contacts, GestureDetail::None, now);
                }
            }
            TimerKind::SingleTap => {
                if let Some(p) = self.single_tap.take() {
                    self.dispatch(GestureKind::SingleTap, p.contacts, GestureDetail::None, now);
                }
            }
            TimerKind::Tap => {
                if let Some(p) = self.tap.take() {
                    self.dispatch(
                        GestureKind::Tap,
                        p.contacts.clone(),
                        GestureDetail::None,
                        now,
                    );
                    // A second qualifying tap confirms the double tap here
                    // and supersedes the pending single tap from the first.
                    if self.double_tap_candidate {
                        self.dispatch(GestureKind::DoubleTap, p.contacts, GestureDetail::None, now);
                        self.cancel_timer(TimerKind::SingleTap);
                        self.double_tap_candidate = false;
                    }
                }
            }
            TimerKind::Swipe => {
                if let Some((p, direction)) = self.swipe.take() {
                    self.dispatch(
                        GestureKind::Swipe,
                        p.contacts,
                        GestureDetail::Swipe { direction },
                        now,
                    );
                }
            }
        }
    }
}

/// Classifies the swipe direction from the first and last contact positions.
///
/// The dominant axis wins; the names are a long-standing consumer contract
/// and are kept exactly as established (`first.y - last.y > 0` reports `Up`).
fn swipe_direction(first: Point, last: Point) -> SwipeDirection {
    if (first.x - last.x).abs() >= (first.y - last.y).abs() {
        if first.x - last.x > 0.0 {
            SwipeDirection::Left
        } else {
            SwipeDirection::Right
        }
    } else if first.y - last.y > 0.0 {
        SwipeDirection::Up
    } else {
        SwipeDirection::Down
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;

    use super::*;

    fn pt(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn ms(v: u64) -> HostTime {
        HostTime::from_millis(v)
    }

    /// Registers a recording listener on every gesture kind.
    fn capture(rec: &mut Recognizer) -> Rc<RefCell<Vec<GestureEvent>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        for kind in GestureKind::ALL {
            let log = Rc::clone(&log);
            rec.on(kind, move |e| log.borrow_mut().push(e.clone()));
        }
        log
    }

    fn count(log: &Rc<RefCell<Vec<GestureEvent>>>, kind: GestureKind) -> usize {
        log.borrow().iter().filter(|e| e.kind == kind).count()
    }

    #[test]
    fn tap_fires_then_single_tap_after_delay() {
        let mut rec = Recognizer::new();
        let log = capture(&mut rec);

        rec.touch_start(&[pt(50.0, 50.0)], ms(0));
        rec.touch_end(&[], ms(40));
        rec.advance(ms(40));

        assert_eq!(count(&log, GestureKind::Tap), 1);
        assert_eq!(count(&log, GestureKind::SingleTap), 0, "still in window");

        rec.advance(ms(300));
        assert_eq!(count(&log, GestureKind::SingleTap), 1);
        assert_eq!(count(&log, GestureKind::Swipe), 0);
        assert_eq!(count(&log, GestureKind::DoubleTap), 0);
    }

    #[test]
    fn tap_sequence_dispatch_order() {
        let mut rec = Recognizer::new();
        let log = capture(&mut rec);

        rec.touch_start(&[pt(10.0, 10.0)], ms(0));
        rec.touch_end(&[], ms(30));
        rec.advance(ms(400));

        let kinds: Vec<GestureKind> = log.borrow().iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                GestureKind::TouchStart,
                GestureKind::MultipointEnd,
                GestureKind::TouchEnd,
                GestureKind::Tap,
                GestureKind::SingleTap,
            ]
        );
    }

    #[test]
    fn two_quick_taps_form_double_tap() {
        let mut rec = Recognizer::new();
        let log = capture(&mut rec);

        rec.touch_start(&[pt(100.0, 100.0)], ms(0));
        rec.touch_end(&[], ms(50));
        rec.advance(ms(50)); // first deferred tap

        rec.touch_start(&[pt(110.0, 95.0)], ms(200));
        rec.touch_end(&[], ms(230));
        rec.advance(ms(230)); // second deferred tap + double tap

        rec.advance(ms(2_000));
        assert_eq!(count(&log, GestureKind::Tap), 2);
        assert_eq!(count(&log, GestureKind::DoubleTap), 1);
        assert_eq!(
            count(&log, GestureKind::SingleTap),
            0,
            "the double tap supersedes the first tap's single-tap timer"
        );
    }

    #[test]
    fn taps_outside_window_stay_single() {
        let mut rec = Recognizer::new();
        let log = capture(&mut rec);

        rec.touch_start(&[pt(100.0, 100.0)], ms(0));
        rec.touch_end(&[], ms(10));
        rec.advance(ms(260));

        // 261 ms after the previous start: outside the window.
        rec.touch_start(&[pt(100.0, 100.0)], ms(261));
        rec.touch_end(&[], ms(270));
        rec.advance(ms(600));

        assert_eq!(count(&log, GestureKind::DoubleTap), 0);
        assert_eq!(count(&log, GestureKind::SingleTap), 2);
    }

    #[test]
    fn distant_taps_are_not_double() {
        let mut rec = Recognizer::new();
        let log = capture(&mut rec);

        rec.touch_start(&[pt(100.0, 100.0)], ms(0));
        rec.touch_end(&[], ms(10));
        rec.advance(ms(10));

        rec.touch_start(&[pt(140.0, 100.0)], ms(100)); // 40 px away
        rec.touch_end(&[], ms(110));
        rec.advance(ms(1_000));

        assert_eq!(count(&log, GestureKind::DoubleTap), 0);
        assert_eq!(count(&log, GestureKind::SingleTap), 2);
    }

    #[test]
    fn horizontal_displacement_classifies_swipe_left() {
        let mut rec = Recognizer::new();
        let log = capture(&mut rec);

        rec.touch_start(&[pt(100.0, 100.0)], ms(0));
        let _ = rec.touch_move(&[pt(60.0, 100.0)], ms(20));
        rec.touch_end(&[], ms(30));
        rec.advance(ms(30));

        let swipes: Vec<GestureDetail> = log
            .borrow()
            .iter()
            .filter(|e| e.kind == GestureKind::Swipe)
            .map(|e| e.detail)
            .collect();
        assert_eq!(
            swipes,
            vec![GestureDetail::Swipe {
                direction: SwipeDirection::Left
            }]
        );
        assert_eq!(count(&log, GestureKind::Tap), 0);
        rec.advance(ms(1_000));
        assert_eq!(count(&log, GestureKind::SingleTap), 0);
    }

    #[test]
    fn vertical_direction_mapping_is_the_established_contract() {
        // Finger travels toward smaller y: reported as Up.
        let mut rec = Recognizer::new();
        let log = capture(&mut rec);
        rec.touch_start(&[pt(100.0, 200.0)], ms(0));
        let _ = rec.touch_move(&[pt(100.0, 120.0)], ms(20));
        rec.touch_end(&[], ms(30));
        rec.advance(ms(30));
        assert_eq!(
            log.borrow().iter().find(|e| e.kind == GestureKind::Swipe).map(|e| e.detail),
            Some(GestureDetail::Swipe {
                direction: SwipeDirection::Up
            })
        );

        // Finger travels toward larger y: reported as Down.
        let mut rec = Recognizer::new();
        let log = capture(&mut rec);
        rec.touch_start(&[pt(100.0, 100.0)], ms(0));
        let _ = rec.touch_move(&[pt(100.0, 180.0)], ms(20));
        rec.touch_end(&[], ms(30));
        rec.advance(ms(30));
        assert_eq!(
            log.borrow().iter().find(|e| e.kind == GestureKind::Swipe).map(|e| e.detail),
            Some(GestureDetail::Swipe {
                direction: SwipeDirection::Down
            })
        );
    }

    #[test]
    fn sub_threshold_displacement_is_a_tap() {
        let mut rec = Recognizer::new();
        let log = capture(&mut rec);

        rec.touch_start(&[pt(100.0, 100.0)], ms(0));
        let _ = rec.touch_move(&[pt(120.0, 110.0)], ms(20)); // 20 px, 10 px
        rec.touch_end(&[], ms(30));
        rec.advance(ms(500));

        assert_eq!(count(&log, GestureKind::Swipe), 0);
        assert_eq!(count(&log, GestureKind::Tap), 1);
    }

    #[test]
    fn stationary_hold_fires_long_tap() {
        let mut rec = Recognizer::new();
        let log = capture(&mut rec);

        rec.touch_start(&[pt(10.0, 10.0)], ms(0));
        rec.advance(ms(749));
        assert_eq!(count(&log, GestureKind::LongTap), 0);
        rec.advance(ms(750));
        assert_eq!(count(&log, GestureKind::LongTap), 1);
    }

    #[test]
    fn movement_cancels_long_press() {
        let mut rec = Recognizer::new();
        let log = capture(&mut rec);

        rec.touch_start(&[pt(10.0, 10.0)], ms(0));
        let _ = rec.touch_move(&[pt(12.0, 10.0)], ms(100));
        rec.advance(ms(2_000));
        assert_eq!(count(&log, GestureKind::LongTap), 0);
    }

    #[test]
    fn pinch_scale_is_relative_to_start_distance() {
        let mut rec = Recognizer::new();
        let log = capture(&mut rec);

        rec.touch_start(&[pt(0.0, 0.0), pt(100.0, 0.0)], ms(0));
        assert_eq!(count(&log, GestureKind::MultipointStart), 1);

        let action = rec.touch_move(&[pt(0.0, 0.0), pt(200.0, 0.0)], ms(50));
        assert_eq!(action, DefaultAction::Suppress);

        let pinches: Vec<GestureDetail> = log
            .borrow()
            .iter()
            .filter(|e| e.kind == GestureKind::Pinch)
            .map(|e| e.detail)
            .collect();
        assert_eq!(pinches, vec![GestureDetail::Pinch { scale: 2.0 }]);
    }

    #[test]
    fn rotation_is_relative_to_previous_sample() {
        let mut rec = Recognizer::new();
        let log = capture(&mut rec);

        rec.touch_start(&[pt(0.0, 0.0), pt(100.0, 0.0)], ms(0));
        let _ = rec.touch_move(&[pt(0.0, 0.0), pt(0.0, 100.0)], ms(50));

        let rotations: Vec<GestureDetail> = log
            .borrow()
            .iter()
            .filter(|e| e.kind == GestureKind::Rotate)
            .map(|e| e.detail)
            .collect();
        assert_eq!(rotations.len(), 1);
        let GestureDetail::Rotate { degrees } = rotations[0] else {
            panic!("expected rotate payload");
        };
        assert!((degrees - 90.0).abs() < 1e-9, "got {degrees}");

        // A second identical sample rotates zero degrees.
        let _ = rec.touch_move(&[pt(0.0, 0.0), pt(0.0, 100.0)], ms(60));
        let last = log.borrow().iter().rev().find(|e| e.kind == GestureKind::Rotate).map(|e| e.detail);
        assert_eq!(last, Some(GestureDetail::Rotate { degrees: 0.0 }));
    }

    #[test]
    fn single_contact_move_reports_press_move_deltas() {
        let mut rec = Recognizer::new();
        let log = capture(&mut rec);

        rec.touch_start(&[pt(10.0, 10.0)], ms(0));
        let first = rec.touch_move(&[pt(15.0, 12.0)], ms(10));
        assert_eq!(first, DefaultAction::Allow);
        let _ = rec.touch_move(&[pt(20.0, 10.0)], ms(20));

        let deltas: Vec<GestureDetail> = log
            .borrow()
            .iter()
            .filter(|e| e.kind == GestureKind::PressMove)
            .map(|e| e.detail)
            .collect();
        assert_eq!(
            deltas,
            vec![
                // No previous sample: zero delta.
                GestureDetail::PressMove { delta: Vec2::ZERO },
                GestureDetail::PressMove {
                    delta: Vec2::new(5.0, -2.0)
                },
            ]
        );
    }

    #[test]
    fn second_contact_cancels_single_tap_timer() {
        let mut rec = Recognizer::new();
        let log = capture(&mut rec);

        rec.touch_start(&[pt(10.0, 10.0)], ms(0));
        rec.touch_end(&[], ms(20));
        rec.advance(ms(20)); // deferred tap; single-tap pending at 270 ms

        rec.touch_start(&[pt(10.0, 10.0), pt(80.0, 10.0)], ms(100));
        rec.advance(ms(5_000));
        assert_eq!(
            count(&log, GestureKind::SingleTap),
            0,
            "multi-contact start voids the pending single tap"
        );
    }

    #[test]
    fn cancel_clears_every_pending_timer() {
        let mut rec = Recognizer::new();
        let log = capture(&mut rec);

        rec.touch_start(&[pt(10.0, 10.0)], ms(0));
        rec.touch_cancel(ms(50));
        rec.advance(ms(60_000));

        let kinds: Vec<GestureKind> = log.borrow().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![GestureKind::TouchStart, GestureKind::TouchCancel]);
        assert_eq!(rec.next_deadline(), None);
    }

    #[test]
    fn empty_contact_lists_are_ignored() {
        let mut rec = Recognizer::new();
        let log = capture(&mut rec);

        rec.touch_start(&[], ms(0));
        assert_eq!(rec.touch_move(&[], ms(10)), DefaultAction::Allow);
        assert!(log.borrow().is_empty());
        assert_eq!(rec.next_deadline(), None);
    }

    #[test]
    fn next_deadline_tracks_the_earliest_timer() {
        let mut rec = Recognizer::new();

        rec.touch_start(&[pt(10.0, 10.0)], ms(0));
        assert_eq!(rec.next_deadline(), Some(ms(750)));

        rec.touch_end(&[], ms(40));
        // Deferred tap (due now) beats the 290 ms single-tap deadline.
        assert_eq!(rec.next_deadline(), Some(ms(40)));

        rec.advance(ms(40));
        assert_eq!(rec.next_deadline(), Some(ms(290)));

        rec.advance(ms(290));
        assert_eq!(rec.next_deadline(), None);
    }

    #[test]
    fn move_after_end_without_start_reports_zero_rotation_only() {
        let mut rec = Recognizer::new();
        let log = capture(&mut rec);

        rec.touch_start(&[pt(0.0, 0.0), pt(100.0, 0.0)], ms(0));
        rec.touch_end(&[], ms(20));

        // No start in between: the pinch basis is gone, but the zeroed pair
        // vector still yields a rotation sample (of zero degrees).
        let _ = rec.touch_move(&[pt(0.0, 0.0), pt(50.0, 50.0)], ms(30));
        assert_eq!(count(&log, GestureKind::Pinch), 0, "pinch basis was cleared");
        let last_rotate = log
            .borrow()
            .iter()
            .rev()
            .find(|e| e.kind == GestureKind::Rotate)
            .map(|e| e.detail);
        assert_eq!(last_rotate, Some(GestureDetail::Rotate { degrees: 0.0 }));
    }

    #[test]
    fn off_removes_a_listener_and_off_all_clears_the_kind() {
        let mut rec = Recognizer::new();
        let hits = Rc::new(RefCell::new(0_u32));

        let id = {
            let hits = Rc::clone(&hits);
            rec.on(GestureKind::TouchStart, move |_| *hits.borrow_mut() += 1)
        };
        rec.touch_start(&[pt(0.0, 0.0)], ms(0));
        assert_eq!(*hits.borrow(), 1);

        assert!(rec.off(GestureKind::TouchStart, id));
        rec.touch_start(&[pt(0.0, 0.0)], ms(10));
        assert_eq!(*hits.borrow(), 1);

        {
            let hits = Rc::clone(&hits);
            rec.on(GestureKind::TouchStart, move |_| *hits.borrow_mut() += 1);
        }
        rec.off_all(GestureKind::TouchStart);
        rec.touch_start(&[pt(0.0, 0.0)], ms(20));
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn two_contact_move_without_any_start_has_no_basis() {
        // A pinch sample before any multipoint start has no basis: the
        // two-contact move dispatches TouchMove but neither Pinch nor Rotate.
        let mut rec = Recognizer::new();
        let log = capture(&mut rec);

        let action = rec.touch_move(&[pt(0.0, 0.0), pt(10.0, 0.0)], ms(0));
        assert_eq!(action, DefaultAction::Suppress);
        assert_eq!(count(&log, GestureKind::Pinch), 0);
        assert_eq!(count(&log, GestureKind::Rotate), 0);
        assert_eq!(count(&log, GestureKind::TouchMove), 1);
    }
}
