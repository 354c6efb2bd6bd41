use std::time::Duration;
use tickcraft::prelude::*;

#[component]
fn Blinking(mut hooks: Hooks) -> impl Into<AnyElement> {
    let running = hooks.use_state(|| true);

    // Pause the stopwatch for a second out of every five.
    let mut seconds = hooks.use_state(|| 0u32);
    hooks.use_interval(Duration::from_secs(1), move || {
        seconds += 1;
        running.set(seconds.get() % 5 != 0);
    });

    element! {
        View(gap: 2u32) {
            Text(content: "elapsed:")
            Stopwatch(running: running.get(), color: Color::Green)
        }
    }
}

fn main() {
    smol::block_on(element!(Blinking).render_loop()).unwrap();
}
