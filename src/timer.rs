//! Delayed callbacks behind a disposable handle.

use gloo_timers::callback::Timeout;

/// A scheduled callback that has not run yet.
pub trait Pending {
    fn cancel(self: Box<Self>);
    /// Lets the callback run even though nobody holds the handle any more.
    fn forget(self: Box<Self>);
}

/// Owner of one pending callback. Dropping the handle cancels it, the same
/// way a `gloo_timers` `Timeout` does; call [`TimerHandle::forget`] for
/// fire-and-forget delays.
#[must_use = "dropping a TimerHandle cancels the timer"]
pub struct TimerHandle {
    pending: Option<Box<dyn Pending>>,
}

impl TimerHandle {
    pub fn new(pending: impl Pending + 'static) -> Self {
        Self {
            pending: Some(Box::new(pending)),
        }
    }

    pub fn cancel(mut self) {
        if let Some(pending) = self.pending.take() {
            pending.cancel();
        }
    }

    pub fn forget(mut self) {
        if let Some(pending) = self.pending.take() {
            pending.forget();
        }
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.cancel();
        }
    }
}

pub trait Scheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TimerHandle;
}

impl Pending for Timeout {
    fn cancel(self: Box<Self>) {
        let _ = (*self).cancel();
    }

    fn forget(self: Box<Self>) {
        let _ = (*self).forget();
    }
}

/// `setTimeout` on the browser event loop.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TimerHandle {
        TimerHandle::new(Timeout::new(delay_ms, move || task()))
    }
}
