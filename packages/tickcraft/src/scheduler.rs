use futures::stream::{Stream, StreamExt};
use log::{debug, trace};
use std::{
    collections::BTreeMap,
    fmt::{self, Debug, Display, Formatter},
    pin::Pin,
    sync::{Arc, Mutex, MutexGuard},
    task::{Context, Poll, Waker},
    time::{Duration, Instant},
};

/// Identifies a timer registered with a [`Scheduler`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl Display for TimerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "timer-{}", self.0)
    }
}

enum Clock {
    System { started: Instant },
    Manual { now: Duration },
}

struct TimerEntry {
    period: Duration,
    // The remaining fields are only used by manual clocks.
    next_due: Duration,
    pending: u64,
    waker: Option<Waker>,
}

struct SchedulerState {
    clock: Clock,
    next_id: u64,
    timers: BTreeMap<TimerId, TimerEntry>,
}

/// `Scheduler` is the host scheduling environment that components acquire timers from.
///
/// There are two kinds of schedulers:
///
/// - [`Scheduler::system`] fires timers according to the system's monotonic clock. This is what
///   the render loop uses.
/// - [`Scheduler::manual`] only moves forward when [`advance`](Scheduler::advance) is called,
///   which makes timer-driven behavior fully deterministic.
///
/// Either way, the scheduler keeps track of every registered timer until its [`Interval`] is
/// dropped, so timers that outlive their owners can be detected via
/// [`active_timers`](Scheduler::active_timers).
///
/// Schedulers are cheap to clone. Clones share the same clock and timers.
#[derive(Clone)]
pub struct Scheduler {
    state: Arc<Mutex<SchedulerState>>,
}

impl Scheduler {
    fn new(clock: Clock) -> Self {
        Self {
            state: Arc::new(Mutex::new(SchedulerState {
                clock,
                next_id: 0,
                timers: BTreeMap::new(),
            })),
        }
    }

    /// Creates a scheduler driven by the system clock.
    pub fn system() -> Self {
        Self::new(Clock::System {
            started: Instant::now(),
        })
    }

    /// Creates a scheduler driven by a virtual clock which starts at zero and only advances when
    /// [`advance`](Self::advance) is called.
    pub fn manual() -> Self {
        Self::new(Clock::Manual {
            now: Duration::ZERO,
        })
    }

    fn lock(&self) -> MutexGuard<'_, SchedulerState> {
        self.state
            .lock()
            .expect("we should be able to lock the scheduler state")
    }

    /// Returns `true` if this scheduler is driven by a virtual clock.
    pub fn is_manual(&self) -> bool {
        matches!(self.lock().clock, Clock::Manual { .. })
    }

    /// Returns the time elapsed since the scheduler was created.
    pub fn now(&self) -> Duration {
        match self.lock().clock {
            Clock::System { started } => started.elapsed(),
            Clock::Manual { now } => now,
        }
    }

    /// Returns the number of timers that are currently registered.
    pub fn active_timers(&self) -> usize {
        self.lock().timers.len()
    }

    /// Registers a recurring timer which ticks once every `period`, starting one period from now.
    ///
    /// The timer stays registered until the returned [`Interval`] is dropped.
    ///
    /// # Panics
    ///
    /// Panics if `period` is zero.
    pub fn interval(&self, period: Duration) -> Interval {
        assert!(!period.is_zero(), "timer period must be non-zero");
        let mut state = self.lock();
        let id = TimerId(state.next_id);
        state.next_id += 1;
        let (next_due, source) = match state.clock {
            Clock::System { .. } => (Duration::ZERO, Some(smol::Timer::interval(period))),
            Clock::Manual { now } => (now + period, None),
        };
        state.timers.insert(
            id,
            TimerEntry {
                period,
                next_due,
                pending: 0,
                waker: None,
            },
        );
        debug!("registered {} with period {:?}", id, period);
        Interval {
            id,
            period,
            ticks: 0,
            source,
            scheduler: self.clone(),
        }
    }

    /// Moves a manual scheduler's clock forward, making every timer that comes due in the
    /// meantime tick once per elapsed period. Ticks are delivered the next time the timers are
    /// polled.
    ///
    /// # Panics
    ///
    /// Panics if this is a system scheduler.
    pub fn advance(&self, by: Duration) {
        let mut wakers = Vec::new();
        {
            let mut state = self.lock();
            let now = match &mut state.clock {
                Clock::Manual { now } => {
                    *now += by;
                    *now
                }
                Clock::System { .. } => panic!("only manual schedulers can be advanced"),
            };
            for entry in state.timers.values_mut() {
                while entry.next_due <= now {
                    entry.pending += 1;
                    entry.next_due += entry.period;
                }
                if entry.pending > 0 {
                    wakers.extend(entry.waker.take());
                }
            }
        }
        for waker in wakers {
            waker.wake();
        }
    }

    fn take_manual_tick(&self, id: TimerId, waker: &Waker) -> bool {
        let mut state = self.lock();
        match state.timers.get_mut(&id) {
            Some(entry) if entry.pending > 0 => {
                entry.pending -= 1;
                true
            }
            Some(entry) => {
                entry.waker = Some(waker.clone());
                false
            }
            None => false,
        }
    }

    fn cancel(&self, id: TimerId) {
        if self.lock().timers.remove(&id).is_some() {
            debug!("cancelled {}", id);
        }
    }
}

impl Debug for Scheduler {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("manual", &self.is_manual())
            .field("now", &self.now())
            .field("active_timers", &self.active_timers())
            .finish()
    }
}

/// A recurring timer registered with a [`Scheduler`].
///
/// `Interval` is a stream which yields the 1-based index of each tick. The timer is cancelled
/// when the `Interval` is dropped.
pub struct Interval {
    id: TimerId,
    period: Duration,
    ticks: u64,
    source: Option<smol::Timer>,
    scheduler: Scheduler,
}

impl Interval {
    /// The id of the timer.
    pub fn id(&self) -> TimerId {
        self.id
    }

    /// The period of the timer.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// The number of ticks delivered so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl Stream for Interval {
    type Item = u64;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;
        let ticked = match this.source.as_mut() {
            Some(timer) => timer.poll_next_unpin(cx).is_ready(),
            None => this.scheduler.take_manual_tick(this.id, cx.waker()),
        };
        if ticked {
            this.ticks += 1;
            trace!("{} tick {}", this.id, this.ticks);
            Poll::Ready(Some(this.ticks))
        } else {
            Poll::Pending
        }
    }
}

impl Drop for Interval {
    fn drop(&mut self) {
        self.scheduler.cancel(self.id);
    }
}

impl Debug for Interval {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interval")
            .field("id", &self.id)
            .field("period", &self.period)
            .field("ticks", &self.ticks)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::task::noop_waker;

    fn poll_ticks(interval: &mut Interval) -> Vec<u64> {
        let waker = noop_waker();
        let mut cx = Context::from_waker(&waker);
        let mut ticks = Vec::new();
        while let Poll::Ready(Some(tick)) = interval.poll_next_unpin(&mut cx) {
            ticks.push(tick);
        }
        ticks
    }

    #[test]
    fn test_manual_interval() {
        let scheduler = Scheduler::manual();
        let mut interval = scheduler.interval(Duration::from_millis(1000));
        assert_eq!(scheduler.active_timers(), 1);
        assert!(poll_ticks(&mut interval).is_empty());

        scheduler.advance(Duration::from_millis(999));
        assert!(poll_ticks(&mut interval).is_empty());

        scheduler.advance(Duration::from_millis(1));
        assert_eq!(poll_ticks(&mut interval), vec![1]);

        scheduler.advance(Duration::from_millis(3000));
        assert_eq!(poll_ticks(&mut interval), vec![2, 3, 4]);
        assert_eq!(interval.ticks(), 4);
        assert_eq!(scheduler.now(), Duration::from_millis(4000));

        drop(interval);
        assert_eq!(scheduler.active_timers(), 0);
    }

    #[test]
    fn test_interval_starts_from_registration_time() {
        let scheduler = Scheduler::manual();
        scheduler.advance(Duration::from_millis(2500));
        let mut interval = scheduler.interval(Duration::from_millis(3000));
        scheduler.advance(Duration::from_millis(2999));
        assert!(poll_ticks(&mut interval).is_empty());
        scheduler.advance(Duration::from_millis(1));
        assert_eq!(poll_ticks(&mut interval), vec![1]);
    }

    #[test]
    fn test_advance_wakes_pending_intervals() {
        use futures::task::{waker, ArcWake};
        use std::sync::atomic::{AtomicBool, Ordering};

        #[derive(Default)]
        struct Flag(AtomicBool);

        impl ArcWake for Flag {
            fn wake_by_ref(arc_self: &Arc<Self>) {
                arc_self.0.store(true, Ordering::SeqCst);
            }
        }

        let scheduler = Scheduler::manual();
        let mut interval = scheduler.interval(Duration::from_secs(1));
        let flag = Arc::new(Flag::default());
        let waker = waker(flag.clone());
        let mut cx = Context::from_waker(&waker);
        assert!(interval.poll_next_unpin(&mut cx).is_pending());

        scheduler.advance(Duration::from_millis(500));
        assert!(!flag.0.load(Ordering::SeqCst));
        scheduler.advance(Duration::from_millis(500));
        assert!(flag.0.load(Ordering::SeqCst));
    }

    #[test]
    fn test_independent_timers() {
        let scheduler = Scheduler::manual();
        let mut fast = scheduler.interval(Duration::from_millis(1000));
        let mut slow = scheduler.interval(Duration::from_millis(3000));
        assert_ne!(fast.id(), slow.id());
        scheduler.advance(Duration::from_millis(3000));
        assert_eq!(poll_ticks(&mut fast).len(), 3);
        assert_eq!(poll_ticks(&mut slow).len(), 1);

        drop(fast);
        assert_eq!(scheduler.active_timers(), 1);
        scheduler.advance(Duration::from_millis(3000));
        assert_eq!(poll_ticks(&mut slow).len(), 1);
    }

    #[test]
    #[should_panic]
    fn test_zero_period() {
        Scheduler::manual().interval(Duration::ZERO);
    }

    #[test]
    fn test_system_interval() {
        let scheduler = Scheduler::system();
        assert!(!scheduler.is_manual());
        let mut interval = scheduler.interval(Duration::from_millis(10));
        let tick = smol::block_on(interval.next());
        assert_eq!(tick, Some(1));
        drop(interval);
        assert_eq!(scheduler.active_timers(), 0);
    }
}
