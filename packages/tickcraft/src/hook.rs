use crate::{render::ComponentUpdater, scheduler::Scheduler};
use std::{
    any::Any,
    pin::Pin,
    task::{Context, Poll},
};

/// Behavior attached to a component instance.
///
/// A hook is created the first time its component is updated and dropped when the component is
/// torn down. Anything a hook holds on to, such as a timer registration, should be released in its
/// [`Drop`] implementation.
///
/// Every method has a default that does nothing.
pub trait Hook: Unpin + Send {
    /// Polled by the render loop. Returns `Ready` when the hook has changed something that should
    /// cause its component to be updated and drawn again.
    fn poll_change(self: Pin<&mut Self>, _cx: &mut Context) -> Poll<()> {
        Poll::Pending
    }

    /// Runs right before the component's update.
    fn pre_component_update(&mut self, _updater: &mut ComponentUpdater) {}

    /// Runs right after the component's update.
    fn post_component_update(&mut self, _updater: &mut ComponentUpdater) {}
}

trait AnyHook: Hook {
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Hook + 'static> AnyHook for T {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// The hooks owned by one component instance, in the order they were first used.
#[derive(Default)]
pub(crate) struct HookList {
    hooks: Vec<Box<dyn AnyHook>>,
}

impl HookList {
    pub fn poll_change(&mut self, cx: &mut Context) -> Poll<()> {
        // Every hook is polled, even after one is ready, so that they all register the waker.
        let ready = self
            .hooks
            .iter_mut()
            .fold(false, |ready, hook| {
                Pin::new(&mut **hook).poll_change(cx).is_ready() || ready
            });
        if ready {
            Poll::Ready(())
        } else {
            Poll::Pending
        }
    }

    pub fn pre_component_update(&mut self, updater: &mut ComponentUpdater) {
        self.hooks
            .iter_mut()
            .for_each(|hook| hook.pre_component_update(updater));
    }

    pub fn post_component_update(&mut self, updater: &mut ComponentUpdater) {
        self.hooks
            .iter_mut()
            .for_each(|hook| hook.post_component_update(updater));
    }
}

/// The handle a component uses to reach its hooks during an update.
///
/// New hooks are defined as traits with methods that call [`use_hook`](Hooks::use_hook), implemented
/// for `Hooks<'_>`. See the [`hooks`](crate::hooks) module for an example.
pub struct Hooks<'a> {
    list: &'a mut HookList,
    creating: bool,
    next: usize,
    scheduler: &'a Scheduler,
}

impl<'a> Hooks<'a> {
    pub(crate) fn new(list: &'a mut HookList, creating: bool, scheduler: &'a Scheduler) -> Self {
        Self {
            list,
            creating,
            next: 0,
            scheduler,
        }
    }

    /// The scheduler the component is mounted on. A timer acquired from it should be owned by a
    /// hook, so that it is released together with the component.
    pub fn scheduler(&self) -> &Scheduler {
        self.scheduler
    }

    /// Returns the component's next hook.
    ///
    /// During the component's first update, the hook is created with `f` and stored. On later
    /// updates, `f` is ignored and the hook stored at the same position is returned instead.
    ///
    /// # Panics
    ///
    /// Panics if the hook at this position has a different type, which happens when a component
    /// doesn't use the same hooks in the same order on every update.
    pub fn use_hook<H, F>(&mut self, f: F) -> &mut H
    where
        F: FnOnce() -> H,
        H: Hook + 'static,
    {
        if self.creating {
            self.list.hooks.push(Box::new(f()));
        }
        let position = self.next;
        self.next += 1;
        self.list
            .hooks
            .get_mut(position)
            .and_then(|hook| hook.as_any_mut().downcast_mut::<H>())
            .unwrap_or_else(|| {
                panic!(
                    "hook #{} is not a {}; hooks must be used in the same order on every update",
                    position,
                    std::any::type_name::<H>()
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[derive(Default)]
    struct FlipProps {
        flip: bool,
    }

    #[component]
    fn Flip(props: &FlipProps, mut hooks: Hooks) -> impl Into<AnyElement> {
        if props.flip {
            hooks.use_effect(|| {}, ());
        }
        hooks.use_state(|| 0u8);
        element!(Text)
    }

    #[test]
    #[should_panic(expected = "same order")]
    fn test_hooks_in_different_order() {
        let mut mount = Mount::new(element!(Flip(key: "f")), Scheduler::manual());
        mount.render(None);
        mount.replace(element!(Flip(key: "f", flip: true)));
        mount.render(None);
    }
}
