use std::time::Duration;
use tickcraft::prelude::*;

#[component]
fn Counters() -> impl Into<AnyElement> {
    element! {
        View(flex_direction: FlexDirection::Column, padding: 1u32) {
            #([1u64, 3, 5].into_iter().map(|secs| element! {
                Counter(
                    key: secs as usize,
                    period: Duration::from_secs(secs),
                    image_alt: format!("every {}s", secs),
                )
            }))
        }
    }
}

fn main() {
    smol::block_on(element!(Counters).render_loop()).unwrap();
}
