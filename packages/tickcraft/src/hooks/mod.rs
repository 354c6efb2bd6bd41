//! This module contains hooks that can be used to add behavior to components.
//!
//! Hooks are implemented as traits which extend the [`Hooks`](crate::Hooks) object that gets passed to your component.
//!
//! For example, if you want to create a hook that counts how many times a component has ticked,
//! you might define and use it like this:
//!
//! ```
//! # use tickcraft::prelude::*;
//! # use std::time::Duration;
//! pub trait UseTickCount {
//!     /// Returns the number of ticks of the given period since the component was created.
//!     fn use_tick_count(&mut self, period: Duration) -> State<u64>;
//! }
//!
//! impl UseTickCount for Hooks<'_> {
//!     fn use_tick_count(&mut self, period: Duration) -> State<u64> {
//!         let mut ticks = self.use_state(|| 0);
//!         self.use_interval(period, move || ticks += 1);
//!         ticks
//!     }
//! }
//!
//! #[component]
//! fn Uptime(mut hooks: Hooks) -> impl Into<AnyElement> {
//!     let ticks = hooks.use_tick_count(Duration::from_secs(1));
//!     element! {
//!         Text(content: format!("up for {}s", ticks))
//!     }
//! }
//! ```

mod use_effect;
pub use use_effect::*;
mod use_interval;
pub use use_interval::*;
mod use_state;
pub use use_state::*;
