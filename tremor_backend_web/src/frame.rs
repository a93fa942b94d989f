// Copyright 2026 the Tremor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `requestAnimationFrame` flush driver.
//!
//! [`FrameDriver`] registers itself as a [`FrameScheduler`]'s frame
//! requester: each pending flush arms exactly one `requestAnimationFrame`
//! callback that runs [`flush`]. On platforms without
//! `requestAnimationFrame` the driver falls back to a fixed ~16 ms
//! `setTimeout`, mirroring a 60 Hz frame cadence.
//!
//! A flush error with no error hook installed is rethrown at the JS
//! boundary, where it surfaces as an unhandled error in the frame callback.
//!
//! [`FrameScheduler`]: tremor_core::batch::FrameScheduler
//! [`flush`]: tremor_core::batch::FrameScheduler::flush

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::{Cell, RefCell};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

use tremor_core::batch::FrameScheduler;

// Direct global bindings instead of `web_sys::Window` methods — avoids
// fetching (and unwrapping) the Window object on every frame.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = performance, js_name = "now")]
    pub(crate) fn performance_now() -> f64;

    #[wasm_bindgen(js_name = "requestAnimationFrame")]
    fn request_animation_frame(callback: &JsValue) -> i32;

    #[wasm_bindgen(js_name = "cancelAnimationFrame")]
    fn cancel_animation_frame(id: i32);

    #[wasm_bindgen(js_name = "setTimeout")]
    pub(crate) fn set_timeout(callback: &JsValue, millis: i32) -> i32;

    #[wasm_bindgen(js_name = "clearTimeout")]
    pub(crate) fn clear_timeout(id: i32);
}

/// Frame interval used when `requestAnimationFrame` is unavailable.
const FALLBACK_FRAME_MS: i32 = 16;

/// Drives a [`FrameScheduler`]'s flushes from the browser's frame callback.
///
/// Create with [`FrameDriver::install`]; the driver must outlive the last
/// scheduled flush (keep it alive for the page lifetime, alongside the
/// scheduler).
pub struct FrameDriver {
    inner: Rc<DriverInner>,
}

struct DriverInner {
    /// The JS closure armed for each pending flush.
    flush: RefCell<Option<Closure<dyn FnMut()>>>,
    /// Whether `requestAnimationFrame` exists in the global scope.
    use_raf: bool,
    /// Id of the most recently armed callback, for cancellation on drop.
    pending: Cell<i32>,
}

impl FrameDriver {
    /// Registers a frame requester on `scheduler` and returns the driver.
    pub fn install(scheduler: &FrameScheduler) -> Self {
        let use_raf = js_sys::Reflect::has(
            &js_sys::global(),
            &JsValue::from_str("requestAnimationFrame"),
        )
        .unwrap_or(false);

        let inner = Rc::new(DriverInner {
            flush: RefCell::new(None),
            use_raf,
            pending: Cell::new(0),
        });

        let flush_scheduler = scheduler.clone();
        let closure = Closure::wrap(Box::new(move || {
            if let Err(err) = flush_scheduler.flush() {
                wasm_bindgen::throw_str(err.message());
            }
        }) as Box<dyn FnMut()>);
        *inner.flush.borrow_mut() = Some(closure);

        let requester = Rc::clone(&inner);
        scheduler.set_frame_requester(move || requester.request_frame());

        Self { inner }
    }

    /// Returns `true` when the driver uses `requestAnimationFrame` rather
    /// than the `setTimeout` fallback.
    #[must_use]
    pub fn uses_raf(&self) -> bool {
        self.inner.use_raf
    }
}

impl DriverInner {
    fn request_frame(&self) {
        if let Some(closure) = self.flush.borrow().as_ref() {
            let cb: &JsValue = closure.as_ref();
            let id = if self.use_raf {
                request_animation_frame(cb)
            } else {
                set_timeout(cb, FALLBACK_FRAME_MS)
            };
            self.pending.set(id);
        }
    }
}

impl Drop for FrameDriver {
    fn drop(&mut self) {
        // Cancel any armed callback, then drop the JS closure so it doesn't
        // leak. Cancelling an id that already fired is a no-op.
        let id = self.inner.pending.get();
        if self.inner.use_raf {
            cancel_animation_frame(id);
        } else {
            clear_timeout(id);
        }
        self.inner.flush.borrow_mut().take();
    }
}

impl core::fmt::Debug for FrameDriver {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FrameDriver")
            .field("use_raf", &self.inner.use_raf)
            .finish_non_exhaustive()
    }
}
