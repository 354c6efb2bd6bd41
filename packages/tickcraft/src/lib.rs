//! # tickcraft
//!
//! `tickcraft` is a small declarative, React-like runtime for terminal output. Components own
//! their state and timers through hooks, and everything a component acquires is released when the
//! component is torn down.
//!
//! ```
//! use tickcraft::prelude::*;
//! use std::time::Duration;
//!
//! let scheduler = Scheduler::manual();
//! let mut mount = Mount::new(element!(Counter(period: Duration::from_secs(1))), scheduler.clone());
//! assert_eq!(mount.render(None).to_string(), "1 [logo]\n");
//!
//! scheduler.advance(Duration::from_secs(3));
//! mount.poll_changes();
//! assert_eq!(mount.render(None).to_string(), "4 [logo]\n");
//! ```

#![warn(missing_docs)]

// # Organization
//
// Code is organized into modules primarily for the benefit of the maintainers. Types will be
// re-exported in the root so that users of the library have a flat namespace to work with.
//
// The exception is the models that represent collections of types, namely hooks and components.
// Those types will remain in their modules for the public API.

mod canvas;
mod component;
mod element;
mod handler;
mod hook;
mod multimap;
mod props;
mod render;
mod scheduler;
mod style;

mod flattened_exports {
    pub use crate::canvas::*;
    pub use crate::component::*;
    pub use crate::element::*;
    pub use crate::handler::*;
    pub use crate::hook::*;
    pub use crate::props::*;
    pub use crate::render::*;
    pub use crate::scheduler::*;
    pub use crate::style::*;

    pub use tickcraft_macros::*;
}

pub use flattened_exports::*;

/// Components for crafting your UI.
pub mod components;

/// Hooks for adding behavior to your components.
pub mod hooks;

/// By importing this module, you'll bring all of the crate's commonly used types into scope.
pub mod prelude {
    pub use crate::components::*;
    pub use crate::flattened_exports::*;
    pub use crate::hooks::*;
}

// So we can use our own macros.
extern crate self as tickcraft;
