// Copyright 2026 the Tremor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM touch binding.
//!
//! [`GestureBinding`] connects a [`Recognizer`] to an element's native
//! `touchstart`/`touchmove`/`touchend`/`touchcancel` events, converting each
//! touch list to page-coordinate points and timestamping with
//! [`now`](crate::now). The recognizer's pending deadlines are pumped with a
//! `setTimeout` re-armed after every event and firing.
//!
//! Listeners run synchronously inside the native event (or timer) callback;
//! they must not call back into the binding.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use kurbo::Point;
use wasm_bindgen::JsCast as _;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlElement, TouchEvent, TouchList};

use tremor_core::gesture::{GestureEvent, GestureKind};
use tremor_core::listener::ListenerId;
use tremor_core::recognizer::{DefaultAction, Recognizer};
use tremor_core::time::HostTime;

use crate::frame::{clear_timeout, set_timeout};

/// A consumer callback for one gesture kind.
pub type GestureCallback = Box<dyn FnMut(&GestureEvent)>;

/// The fourteen optional gesture callbacks accepted at attach time.
///
/// Absent callbacks simply register nothing (equivalent to a no-op); more
/// listeners can be added later with [`GestureBinding::on`].
#[derive(Default)]
pub struct GestureConfig {
    /// Two-contact rotation.
    pub rotate: Option<GestureCallback>,
    /// Contact sequence began.
    pub touch_start: Option<GestureCallback>,
    /// Second contact joined.
    pub multipoint_start: Option<GestureCallback>,
    /// Sequence dropped below two contacts.
    pub multipoint_end: Option<GestureCallback>,
    /// Two-contact scale change.
    pub pinch: Option<GestureCallback>,
    /// Above-threshold displacement at sequence end.
    pub swipe: Option<GestureCallback>,
    /// Below-threshold sequence end.
    pub tap: Option<GestureCallback>,
    /// Two qualifying taps in the double-tap window.
    pub double_tap: Option<GestureCallback>,
    /// Stationary hold past the long-press delay.
    pub long_tap: Option<GestureCallback>,
    /// Tap with no second tap in the window.
    pub single_tap: Option<GestureCallback>,
    /// Single-contact movement with deltas.
    pub press_move: Option<GestureCallback>,
    /// Any contact movement.
    pub touch_move: Option<GestureCallback>,
    /// A contact lifted.
    pub touch_end: Option<GestureCallback>,
    /// The platform aborted the sequence.
    pub touch_cancel: Option<GestureCallback>,
}

impl fmt::Debug for GestureConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let set = [
            self.rotate.is_some(),
            self.touch_start.is_some(),
            self.multipoint_start.is_some(),
            self.multipoint_end.is_some(),
            self.pinch.is_some(),
            self.swipe.is_some(),
            self.tap.is_some(),
            self.double_tap.is_some(),
            self.long_tap.is_some(),
            self.single_tap.is_some(),
            self.press_move.is_some(),
            self.touch_move.is_some(),
            self.touch_end.is_some(),
            self.touch_cancel.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count();
        f.debug_struct("GestureConfig").field("callbacks", &set).finish()
    }
}

impl GestureConfig {
    /// Registers every present callback on `recognizer`.
    fn install(self, recognizer: &mut Recognizer) {
        let pairs: [(GestureKind, Option<GestureCallback>); GestureKind::COUNT] = [
            (GestureKind::Rotate, self.rotate),
            (GestureKind::TouchStart, self.touch_start),
            (GestureKind::MultipointStart, self.multipoint_start),
            (GestureKind::MultipointEnd, self.multipoint_end),
            (GestureKind::Pinch, self.pinch),
            (GestureKind::Swipe, self.swipe),
            (GestureKind::Tap, self.tap),
            (GestureKind::DoubleTap, self.double_tap),
            (GestureKind::LongTap, self.long_tap),
            (GestureKind::SingleTap, self.single_tap),
            (GestureKind::PressMove, self.press_move),
            (GestureKind::TouchMove, self.touch_move),
            (GestureKind::TouchEnd, self.touch_end),
            (GestureKind::TouchCancel, self.touch_cancel),
        ];
        for (kind, callback) in pairs {
            if let Some(callback) = callback {
                recognizer.on(kind, callback);
            }
        }
    }
}

/// Pumps the recognizer's pending deadlines with platform timeouts.
struct Pump {
    recognizer: Rc<RefCell<Recognizer>>,
    timeout: Cell<Option<i32>>,
    tick: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl Pump {
    fn new(recognizer: Rc<RefCell<Recognizer>>) -> Rc<Self> {
        let pump = Rc::new(Self {
            recognizer,
            timeout: Cell::new(None),
            tick: RefCell::new(None),
        });
        let inner = Rc::clone(&pump);
        let tick = Closure::wrap(Box::new(move || {
            inner.timeout.set(None);
            {
                inner.recognizer.borrow_mut().advance(crate::now());
            }
            inner.reschedule();
        }) as Box<dyn FnMut()>);
        *pump.tick.borrow_mut() = Some(tick);
        pump
    }

    /// Re-arms the platform timeout to the earliest pending deadline, or
    /// clears it when nothing is pending.
    fn reschedule(&self) {
        if let Some(id) = self.timeout.take() {
            clear_timeout(id);
        }
        let Some(deadline) = self.recognizer.borrow().next_deadline() else {
            return;
        };
        if let Some(tick) = self.tick.borrow().as_ref() {
            let id = set_timeout(tick.as_ref(), delay_millis(deadline, crate::now()));
            self.timeout.set(Some(id));
        }
    }
}

/// Millisecond delay until `deadline`, clamped to zero for past deadlines.
fn delay_millis(deadline: HostTime, now: HostTime) -> i32 {
    let ms = deadline.saturating_duration_since(now).as_millis();
    i32::try_from(ms).unwrap_or(i32::MAX)
}

type TouchClosure = Closure<dyn FnMut(TouchEvent)>;

/// A [`Recognizer`] bound to one element's native touch events.
///
/// Dropping the binding (or calling [`detach`](Self::detach)) unbinds the
/// native handlers and discards all pending timers and listeners.
pub struct GestureBinding {
    target: HtmlElement,
    recognizer: Rc<RefCell<Recognizer>>,
    pump: Rc<Pump>,
    on_start: TouchClosure,
    on_move: TouchClosure,
    on_end: TouchClosure,
    on_cancel: TouchClosure,
}

impl fmt::Debug for GestureBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GestureBinding")
            .field("target", &"HtmlElement")
            .finish_non_exhaustive()
    }
}

impl GestureBinding {
    /// Binds the four native touch listeners on `target` and registers the
    /// configured callbacks.
    pub fn attach(target: HtmlElement, config: GestureConfig) -> Result<Self, JsValue> {
        let mut recognizer = Recognizer::new();
        config.install(&mut recognizer);
        let recognizer = Rc::new(RefCell::new(recognizer));
        let pump = Pump::new(Rc::clone(&recognizer));

        let on_start = {
            let recognizer = Rc::clone(&recognizer);
            let pump = Rc::clone(&pump);
            Closure::wrap(Box::new(move |evt: TouchEvent| {
                let contacts = contact_points(&evt.touches());
                recognizer.borrow_mut().touch_start(&contacts, crate::now());
                pump.reschedule();
            }) as Box<dyn FnMut(TouchEvent)>)
        };
        let on_move = {
            let recognizer = Rc::clone(&recognizer);
            let pump = Rc::clone(&pump);
            Closure::wrap(Box::new(move |evt: TouchEvent| {
                let contacts = contact_points(&evt.touches());
                let action = recognizer.borrow_mut().touch_move(&contacts, crate::now());
                if action == DefaultAction::Suppress {
                    evt.prevent_default();
                }
                pump.reschedule();
            }) as Box<dyn FnMut(TouchEvent)>)
        };
        let on_end = {
            let recognizer = Rc::clone(&recognizer);
            let pump = Rc::clone(&pump);
            Closure::wrap(Box::new(move |evt: TouchEvent| {
                let remaining = contact_points(&evt.touches());
                recognizer.borrow_mut().touch_end(&remaining, crate::now());
                pump.reschedule();
            }) as Box<dyn FnMut(TouchEvent)>)
        };
        let on_cancel = {
            let recognizer = Rc::clone(&recognizer);
            let pump = Rc::clone(&pump);
            Closure::wrap(Box::new(move |_evt: TouchEvent| {
                recognizer.borrow_mut().touch_cancel(crate::now());
                pump.reschedule();
            }) as Box<dyn FnMut(TouchEvent)>)
        };

        let bound = bind(&target, [
            ("touchstart", &on_start),
            ("touchmove", &on_move),
            ("touchend", &on_end),
            ("touchcancel", &on_cancel),
        ]);
        if let Err(err) = bound {
            // Break the pump's closure cycle before bailing out.
            pump.tick.borrow_mut().take();
            return Err(err);
        }

        Ok(Self {
            target,
            recognizer,
            pump,
            on_start,
            on_move,
            on_end,
            on_cancel,
        })
    }

    /// Looks an element up by CSS selector and [attaches](Self::attach) to
    /// it.
    pub fn attach_selector(selector: &str, config: GestureConfig) -> Result<Self, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document in scope"))?;
        let element = document
            .query_selector(selector)?
            .ok_or_else(|| JsValue::from_str("selector matched no element"))?;
        let element: HtmlElement = element.dyn_into()?;
        Self::attach(element, config)
    }

    /// Registers an additional listener for `kind`.
    pub fn on(
        &self,
        kind: GestureKind,
        listener: impl FnMut(&GestureEvent) + 'static,
    ) -> ListenerId {
        self.recognizer.borrow_mut().on(kind, listener)
    }

    /// Removes one listener from `kind`'s set.
    pub fn off(&self, kind: GestureKind, id: ListenerId) -> bool {
        self.recognizer.borrow_mut().off(kind, id)
    }

    /// Returns the bound element.
    #[must_use]
    pub fn target(&self) -> &HtmlElement {
        &self.target
    }

    /// Unbinds the native handlers and tears the recognizer down.
    ///
    /// Consuming the binding makes teardown single-shot; this is equivalent
    /// to dropping it.
    pub fn detach(self) {
        drop(self);
    }
}

impl Drop for GestureBinding {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback("touchstart", self.on_start.as_ref().unchecked_ref());
        let _ = self
            .target
            .remove_event_listener_with_callback("touchmove", self.on_move.as_ref().unchecked_ref());
        let _ = self
            .target
            .remove_event_listener_with_callback("touchend", self.on_end.as_ref().unchecked_ref());
        let _ = self.target.remove_event_listener_with_callback(
            "touchcancel",
            self.on_cancel.as_ref().unchecked_ref(),
        );
        if let Some(id) = self.pump.timeout.take() {
            clear_timeout(id);
        }
        // The tick closure captures the pump; dropping it breaks the cycle.
        self.pump.tick.borrow_mut().take();
        self.recognizer.borrow_mut().clear_listeners();
    }
}

/// Registers the four native touch listeners.
fn bind(target: &HtmlElement, handlers: [(&str, &TouchClosure); 4]) -> Result<(), JsValue> {
    for (name, closure) in handlers {
        target.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
    }
    Ok(())
}

/// Converts a native touch list to page-coordinate points.
fn contact_points(touches: &TouchList) -> Vec<Point> {
    let len = touches.length();
    let mut contacts = Vec::with_capacity(len as usize);
    for i in 0..len {
        if let Some(touch) = touches.item(i) {
            contacts.push(Point::new(f64::from(touch.page_x()), f64::from(touch.page_y())));
        }
    }
    contacts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_clamps_past_deadlines_to_zero() {
        assert_eq!(delay_millis(HostTime(1_000), HostTime(5_000)), 0);
        assert_eq!(delay_millis(HostTime(5_000), HostTime(5_000)), 0);
    }

    #[test]
    fn delay_truncates_to_whole_milliseconds() {
        // 1.5 ms remaining rounds down; the pump re-arms after firing, so a
        // slightly-early callback just re-schedules the remainder.
        assert_eq!(
            delay_millis(HostTime::from_millis(101) + tremor_core::time::Duration(500), HostTime::from_millis(100)),
            1
        );
    }
}
