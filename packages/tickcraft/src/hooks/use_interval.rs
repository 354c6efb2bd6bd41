use crate::{Hook, Hooks, Interval, Scheduler};
use futures::stream::StreamExt;
use generational_box::{GenerationalBox, Owner, SyncStorage};
use log::debug;
use std::{
    pin::Pin,
    task::{Context, Poll, Waker},
    time::Duration,
};

mod private {
    pub trait Sealed {}
    impl Sealed for crate::Hooks<'_> {}
}

/// `UseInterval` is a hook that runs a callback on a recurring timer owned by the component.
///
/// The timer is acquired once, on the component's first update, no matter how many times the
/// component re-renders afterwards. It is released when the component is torn down, so a removed
/// component never keeps ticking.
///
/// # Example
///
/// ```
/// # use tickcraft::prelude::*;
/// # use std::time::Duration;
/// #[component]
/// fn Blinker(mut hooks: Hooks) -> impl Into<AnyElement> {
///     let on = hooks.use_state(|| false);
///     hooks.use_interval(Duration::from_millis(500), move || on.set(!on.get()));
///     element! {
///         Text(content: if on.get() { "*" } else { " " })
///     }
/// }
/// ```
pub trait UseInterval: private::Sealed {
    /// Starts a timer which invokes `f` once every `period`.
    ///
    /// The callback is replaced on every render, so it never observes stale props. The period is
    /// only read on the first render.
    ///
    /// # Panics
    ///
    /// Panics if `period` is zero.
    fn use_interval<F>(&mut self, period: Duration, f: F) -> IntervalHandle
    where
        F: FnMut() + Send + 'static;

    /// Like [`use_interval`](UseInterval::use_interval), but the timer isn't started until
    /// [`IntervalHandle::start`] is called.
    fn use_interval_paused<F>(&mut self, period: Duration, f: F) -> IntervalHandle
    where
        F: FnMut() + Send + 'static;
}

impl UseInterval for Hooks<'_> {
    fn use_interval<F>(&mut self, period: Duration, f: F) -> IntervalHandle
    where
        F: FnMut() + Send + 'static,
    {
        use_interval_impl(self, period, f, true)
    }

    fn use_interval_paused<F>(&mut self, period: Duration, f: F) -> IntervalHandle
    where
        F: FnMut() + Send + 'static,
    {
        use_interval_impl(self, period, f, false)
    }
}

fn use_interval_impl<F>(hooks: &mut Hooks, period: Duration, f: F, running: bool) -> IntervalHandle
where
    F: FnMut() + Send + 'static,
{
    let scheduler = hooks.scheduler().clone();
    let hook = hooks.use_hook(move || UseIntervalImpl::new(scheduler, period, running));
    hook.callback = Box::new(f);
    hook.handle
}

struct IntervalSlot {
    scheduler: Scheduler,
    period: Duration,
    interval: Option<Interval>,
    waker: Option<Waker>,
}

/// A copyable handle to a timer created by [`UseInterval`], used to pause and resume it.
///
/// Stopping the timer releases it from the scheduler. Starting it again acquires a new one, whose
/// first tick comes one full period later.
///
/// Handles outlive their component harmlessly: once the component is torn down, every method
/// does nothing.
pub struct IntervalHandle {
    slot: GenerationalBox<IntervalSlot, SyncStorage>,
}

impl Clone for IntervalHandle {
    fn clone(&self) -> Self {
        *self
    }
}

impl Copy for IntervalHandle {}

impl IntervalHandle {
    /// Starts the timer if it isn't already running.
    pub fn start(&self) {
        if let Ok(mut slot) = self.slot.try_write() {
            if slot.interval.is_none() {
                let interval = slot.scheduler.interval(slot.period);
                slot.interval = Some(interval);
                if let Some(waker) = slot.waker.take() {
                    waker.wake();
                }
            }
        }
    }

    /// Stops the timer if it is running.
    pub fn stop(&self) {
        if let Ok(mut slot) = self.slot.try_write() {
            if let Some(interval) = slot.interval.take() {
                debug!("stopping {} after {} ticks", interval.id(), interval.ticks());
            }
        }
    }

    /// Returns `true` if the timer is running.
    pub fn is_running(&self) -> bool {
        self.slot
            .try_read()
            .map(|slot| slot.interval.is_some())
            .unwrap_or(false)
    }
}

struct UseIntervalImpl {
    _storage: Owner<SyncStorage>,
    handle: IntervalHandle,
    callback: Box<dyn FnMut() + Send>,
}

impl UseIntervalImpl {
    fn new(scheduler: Scheduler, period: Duration, running: bool) -> Self {
        let storage = Owner::default();
        let handle = IntervalHandle {
            slot: storage.insert(IntervalSlot {
                scheduler,
                period,
                interval: None,
                waker: None,
            }),
        };
        if running {
            handle.start();
        }
        Self {
            _storage: storage,
            handle,
            callback: Box::new(|| {}),
        }
    }

    /// Takes one due tick, if there is one, registering the waker otherwise.
    fn poll_tick(&self, cx: &mut Context<'_>) -> bool {
        let Ok(mut slot) = self.handle.slot.try_write() else {
            return false;
        };
        slot.waker = Some(cx.waker().clone());
        match slot.interval.as_mut() {
            Some(interval) => matches!(interval.poll_next_unpin(cx), Poll::Ready(Some(_))),
            None => false,
        }
    }
}

impl Hook for UseIntervalImpl {
    fn poll_change(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let this = self.get_mut();
        // The callback runs without the slot borrowed so that it may stop the timer.
        while this.poll_tick(cx) {
            (this.callback)();
        }
        Poll::Pending
    }
}

impl Drop for UseIntervalImpl {
    fn drop(&mut self) {
        self.handle.stop();
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use std::time::Duration;

    #[component]
    fn Ticker(mut hooks: Hooks) -> impl Into<AnyElement> {
        let mut ticks = hooks.use_state(|| 0u32);
        let timer = hooks.use_interval(Duration::from_secs(1), move || ticks += 1);
        element!(Text(content: format!("{} {}", ticks, timer.is_running())))
    }

    #[test]
    fn test_interval_registered_once() {
        let scheduler = Scheduler::manual();
        let mut mount = Mount::new(element!(Ticker), scheduler.clone());
        for _ in 0..10 {
            mount.render(None);
        }
        assert_eq!(scheduler.active_timers(), 1);

        scheduler.advance(Duration::from_secs(2));
        assert!(mount.poll_changes());
        assert_eq!(mount.render(None).to_string(), "2 true\n");
        assert_eq!(scheduler.active_timers(), 1);

        drop(mount);
        assert_eq!(scheduler.active_timers(), 0);
    }

    #[component]
    fn SelfStopping(mut hooks: Hooks) -> impl Into<AnyElement> {
        let mut ticks = hooks.use_state(|| 0u32);
        let timer = hooks.use_state(|| None::<IntervalHandle>);
        let handle = hooks.use_interval(Duration::from_secs(1), move || {
            ticks += 1;
            if ticks.get() >= 2 {
                if let Some(handle) = timer.get() {
                    handle.stop();
                }
            }
        });
        if timer.get().is_none() {
            timer.set(Some(handle));
        }
        element!(Text(content: format!("{} {}", ticks, handle.is_running())))
    }

    #[test]
    fn test_callback_can_stop_timer() {
        let scheduler = Scheduler::manual();
        let mut mount = Mount::new(element!(SelfStopping), scheduler.clone());
        mount.render(None);
        mount.poll_changes();

        scheduler.advance(Duration::from_secs(5));
        mount.poll_changes();
        assert_eq!(mount.render(None).to_string(), "2 false\n");
        assert_eq!(scheduler.active_timers(), 0);
    }

    #[test]
    fn test_paused_interval() {
        #[component]
        fn Paused(mut hooks: Hooks) -> impl Into<AnyElement> {
            let mut ticks = hooks.use_state(|| 0u32);
            let timer = hooks.use_interval_paused(Duration::from_secs(1), move || ticks += 1);
            element!(Text(content: format!("{} {}", ticks, timer.is_running())))
        }

        let scheduler = Scheduler::manual();
        let mut mount = Mount::new(element!(Paused), scheduler.clone());
        assert_eq!(mount.render(None).to_string(), "0 false\n");
        scheduler.advance(Duration::from_secs(3));
        assert!(!mount.poll_changes());
        assert_eq!(scheduler.active_timers(), 0);
    }
}
