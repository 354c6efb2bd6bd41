use crate::{
    components::{Image, Text, View},
    hooks::{UseInterval, UseState},
    AnyElement, Color, Handler, Hooks, Weight,
};
use std::time::Duration;
use tickcraft_macros::{component, element};

/// The image shown next to the value when no other source is given.
pub const DEFAULT_IMAGE_SRC: &str = "assets/logo.png";

/// The time between increments when no other period is given.
pub const DEFAULT_PERIOD: Duration = Duration::from_millis(1000);

/// The props which can be passed to the [`Counter`] component.
#[derive(Clone)]
pub struct CounterProps {
    /// The value shown before the first tick. Defaults to 1.
    pub initial_value: i64,

    /// The time between increments. Only the value given when the counter is created is used.
    pub period: Duration,

    /// The source of the image shown next to the value.
    pub image_src: String,

    /// The alternative text of the image shown next to the value.
    pub image_alt: String,

    /// The color of the value.
    pub color: Option<Color>,

    /// Invoked with the new value after every increment. Not invoked once the value has reached
    /// [`i64::MAX`].
    pub on_tick: Handler<i64>,
}

impl Default for CounterProps {
    fn default() -> Self {
        Self {
            initial_value: 1,
            period: DEFAULT_PERIOD,
            image_src: DEFAULT_IMAGE_SRC.to_string(),
            image_alt: "logo".to_string(),
            color: None,
            on_tick: Handler::default(),
        }
    }
}

/// `Counter` shows a value which increases by one every period, next to a static image.
///
/// The counter acquires a single timer when it is created and releases it when it is torn down.
/// Re-rendering it, or passing it a different period later on, never acquires another one.
///
/// The value stops at [`i64::MAX`]. Ticks after that leave the counter unchanged.
///
/// # Example
///
/// ```
/// # use tickcraft::prelude::*;
/// # use std::time::Duration;
/// let scheduler = Scheduler::manual();
/// let mut mount = Mount::new(
///     element!(Counter(period: Duration::from_secs(3), image_alt: "dog")),
///     scheduler.clone(),
/// );
/// assert_eq!(mount.render(None).to_string(), "1 [dog]\n");
///
/// scheduler.advance(Duration::from_secs(3));
/// mount.poll_changes();
/// assert_eq!(mount.render(None).to_string(), "2 [dog]\n");
///
/// drop(mount);
/// assert_eq!(scheduler.active_timers(), 0);
/// ```
#[component]
pub fn Counter(props: &CounterProps, mut hooks: Hooks) -> impl Into<AnyElement> {
    let count = hooks.use_state(|| props.initial_value);

    let on_tick = props.on_tick.clone();
    hooks.use_interval(props.period, move || {
        let Some(next) = count.get().checked_add(1) else {
            return;
        };
        count.set(next);
        on_tick(next);
    });

    element! {
        View(gap: 1u32) {
            Text(content: count.to_string(), color: props.color, weight: Weight::Bold)
            Image(src: props.image_src.clone(), alt: props.image_alt.clone())
        }
    }
}
