use crate::{Hook, Hooks};
use generational_box::{GenerationalBox, Owner, SyncStorage};
use std::{
    fmt::{self, Debug, Display, Formatter},
    mem,
    ops::AddAssign,
    pin::Pin,
    task::{Context, Poll, Waker},
};

mod private {
    pub trait Sealed {}
    impl Sealed for crate::Hooks<'_> {}
}

/// `UseState` is a hook that gives a component a value which survives re-renders.
///
/// Writing to the value schedules the component to be updated and drawn again.
///
/// # Example
///
/// ```
/// # use tickcraft::prelude::*;
/// # use std::time::Duration;
/// #[component]
/// fn Ticker(mut hooks: Hooks) -> impl Into<AnyElement> {
///     let mut count = hooks.use_state(|| 0);
///
///     hooks.use_interval(Duration::from_millis(100), move || count += 1);
///
///     element! {
///         Text(color: Color::Blue, content: format!("ticks: {}", count))
///     }
/// }
/// ```
pub trait UseState: private::Sealed {
    /// Returns the component's state, creating it with `initial_value` on the first update.
    fn use_state<T, F>(&mut self, initial_value: F) -> State<T>
    where
        T: Unpin + Sync + Send + 'static,
        F: FnOnce() -> T;
}

impl UseState for Hooks<'_> {
    fn use_state<T, F>(&mut self, initial_value: F) -> State<T>
    where
        T: Unpin + Sync + Send + 'static,
        F: FnOnce() -> T,
    {
        self.use_hook(move || StateHook::new(initial_value())).state
    }
}

struct Slot<T> {
    value: T,
    changed: bool,
    waker: Option<Waker>,
}

struct StateHook<T: Send + Sync + 'static> {
    _owner: Owner<SyncStorage>,
    state: State<T>,
}

impl<T: Send + Sync + 'static> StateHook<T> {
    fn new(value: T) -> Self {
        let owner = Owner::default();
        let slot = owner.insert(Slot {
            value,
            changed: false,
            waker: None,
        });
        Self {
            _owner: owner,
            state: State { slot },
        }
    }
}

impl<T: Unpin + Send + Sync + 'static> Hook for StateHook<T> {
    fn poll_change(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let Ok(mut slot) = self.state.slot.try_write() else {
            return Poll::Pending;
        };
        if mem::take(&mut slot.changed) {
            Poll::Ready(())
        } else {
            slot.waker = Some(cx.waker().clone());
            Poll::Pending
        }
    }
}

/// A copyable handle to a value owned by a component.
///
/// Because `State` is a handle, a closure that captures it, such as a timer callback, always works
/// with the current value rather than the one at the time it was captured.
///
/// # Panics
///
/// Using a state after its component has been torn down panics.
pub struct State<T: Send + Sync + 'static> {
    slot: GenerationalBox<Slot<T>, SyncStorage>,
}

impl<T: Send + Sync + 'static> Clone for State<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Send + Sync + 'static> Copy for State<T> {}

impl<T: Copy + Send + Sync + 'static> State<T> {
    /// Returns a copy of the value.
    pub fn get(&self) -> T {
        self.slot.read().value
    }
}

impl<T: Send + Sync + 'static> State<T> {
    /// Replaces the value.
    pub fn set(&self, value: T) {
        self.update(|v| *v = value);
    }

    /// Modifies the value in place. The component is redrawn even if `f` leaves the value as it
    /// was.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        let waker = {
            let mut slot = self.slot.write();
            f(&mut slot.value);
            slot.changed = true;
            slot.waker.take()
        };
        if let Some(waker) = waker {
            waker.wake();
        }
    }
}

impl<T: Debug + Send + Sync + 'static> Debug for State<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.slot.read().value.fmt(f)
    }
}

impl<T: Display + Send + Sync + 'static> Display for State<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.slot.read().value.fmt(f)
    }
}

impl<T: AddAssign + Send + Sync + 'static> AddAssign<T> for State<T> {
    fn add_assign(&mut self, rhs: T) {
        self.update(|v| *v += rhs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::task::{noop_waker, waker, ArcWake};
    use std::sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    };

    #[derive(Default)]
    struct Woken(AtomicBool);

    impl ArcWake for Woken {
        fn wake_by_ref(arc_self: &Arc<Self>) {
            arc_self.0.store(true, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_writes_wake_the_component() {
        let mut hook = StateHook::new(1i64);
        let mut state = hook.state;
        let woken = Arc::new(Woken::default());
        let waker = waker(woken.clone());
        let mut cx = Context::from_waker(&waker);

        assert!(Pin::new(&mut hook).poll_change(&mut cx).is_pending());
        state += 2;
        assert!(woken.0.load(Ordering::SeqCst));
        assert_eq!(state.get(), 3);
        assert!(Pin::new(&mut hook).poll_change(&mut cx).is_ready());
        assert!(Pin::new(&mut hook).poll_change(&mut cx).is_pending());

        state.update(|v| *v = v.saturating_add(i64::MAX));
        assert_eq!(state.get(), i64::MAX);
        assert_eq!(state.to_string(), i64::MAX.to_string());
    }

    #[test]
    fn test_captured_state_sees_latest_value() {
        let mut hook = StateHook::new(1i64);
        let mut state = hook.state;
        let mut increment = move || state += 1;
        increment();
        increment();
        hook.state.set(10);
        increment();
        assert_eq!(hook.state.get(), 11);
        assert_eq!(format!("{:?}", hook.state), "11");
        assert!(Pin::new(&mut hook)
            .poll_change(&mut Context::from_waker(&noop_waker()))
            .is_ready());
    }
}
