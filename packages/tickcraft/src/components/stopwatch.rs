use crate::{
    components::{Text, DEFAULT_PERIOD},
    hooks::{UseEffect, UseInterval, UseState},
    AnyElement, Color, Hooks,
};
use std::time::Duration;
use tickcraft_macros::{component, element};

/// The props which can be passed to the [`Stopwatch`] component.
#[derive(Clone, Default)]
pub struct StopwatchProps {
    /// Whether the stopwatch is running. Changing this starts or stops it.
    pub running: bool,

    /// The resolution of the stopwatch. Defaults to one second. Only the value given when the
    /// stopwatch is created is used.
    pub period: Option<Duration>,

    /// The color of the time.
    pub color: Option<Color>,
}

fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// `Stopwatch` shows the time it has spent running, as minutes and seconds.
///
/// It only holds a timer while it is running. Stopping it releases the timer, and starting it again
/// acquires a new one, so it resumes from the time it was stopped at.
///
/// # Example
///
/// ```
/// # use tickcraft::prelude::*;
/// # use std::time::Duration;
/// let scheduler = Scheduler::manual();
/// let mut mount = Mount::new(element!(Stopwatch(running: true)), scheduler.clone());
/// mount.render(None);
///
/// scheduler.advance(Duration::from_secs(75));
/// mount.poll_changes();
/// assert_eq!(mount.render(None).to_string(), "01:15\n");
/// ```
#[component]
pub fn Stopwatch(props: &StopwatchProps, mut hooks: Hooks) -> impl Into<AnyElement> {
    let period = props.period.unwrap_or(DEFAULT_PERIOD);
    let ticks = hooks.use_state(|| 0u32);
    let timer = hooks.use_interval_paused(period, move || {
        ticks.update(|t| *t = t.saturating_add(1))
    });

    let running = props.running;
    hooks.use_effect(
        move || {
            if running {
                timer.start();
            } else {
                timer.stop();
            }
        },
        running,
    );

    let mut content = format_elapsed(period.saturating_mul(ticks.get()));
    if !running {
        content.push_str(" (stopped)");
    }

    element! {
        Text(content, color: props.color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::ZERO), "00:00");
        assert_eq!(format_elapsed(Duration::from_millis(59_999)), "00:59");
        assert_eq!(format_elapsed(Duration::from_secs(61)), "01:01");
        assert_eq!(format_elapsed(Duration::from_secs(100 * 60)), "100:00");
    }

    #[test]
    fn test_stopwatch() {
        let scheduler = Scheduler::manual();
        let mut mount = Mount::new(
            element!(Stopwatch(key: "sw", running: true)),
            scheduler.clone(),
        );
        assert_eq!(mount.render(None).to_string(), "00:00\n");
        assert_eq!(scheduler.active_timers(), 1);

        scheduler.advance(Duration::from_secs(3));
        assert!(mount.poll_changes());
        assert_eq!(mount.render(None).to_string(), "00:03\n");

        mount.replace(element!(Stopwatch(key: "sw", running: false)));
        assert_eq!(mount.render(None).to_string(), "00:03 (stopped)\n");
        assert_eq!(scheduler.active_timers(), 0);

        scheduler.advance(Duration::from_secs(5));
        assert!(!mount.poll_changes());
        assert_eq!(mount.render(None).to_string(), "00:03 (stopped)\n");

        // Stopping a stopped stopwatch does nothing.
        mount.replace(element!(Stopwatch(key: "sw", running: false)));
        mount.render(None);
        assert_eq!(scheduler.active_timers(), 0);

        mount.replace(element!(Stopwatch(key: "sw", running: true)));
        mount.render(None);
        assert_eq!(scheduler.active_timers(), 1);
        scheduler.advance(Duration::from_secs(2));
        assert!(mount.poll_changes());
        assert_eq!(mount.render(None).to_string(), "00:05\n");

        drop(mount);
        assert_eq!(scheduler.active_timers(), 0);
    }

    #[test]
    fn test_stopwatch_starts_stopped() {
        let scheduler = Scheduler::manual();
        let mut mount = Mount::new(element!(Stopwatch), scheduler.clone());
        assert_eq!(mount.render(None).to_string(), "00:00 (stopped)\n");
        assert_eq!(scheduler.active_timers(), 0);
    }
}
