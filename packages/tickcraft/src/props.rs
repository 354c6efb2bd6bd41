use std::any::Any;

/// The props type used by components that don't take any props.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProps;

/// Type-erased storage for the props of an element.
#[doc(hidden)]
pub struct AnyProps {
    inner: Box<dyn Any + Send>,
}

impl AnyProps {
    pub(crate) fn new<T: Any + Send>(props: T) -> Self {
        Self {
            inner: Box::new(props),
        }
    }

    pub(crate) fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.inner.downcast_mut()
    }
}
