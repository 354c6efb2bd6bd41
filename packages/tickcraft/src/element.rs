use crate::{
    component::{Component, ComponentHelper, ComponentHelperExt},
    props::AnyProps,
    render::Mount,
    scheduler::Scheduler,
    Canvas,
};
use crossterm::{terminal, tty::IsTty};
use std::{
    fmt::{self, Display},
    future::Future,
    io::{self, stdout, Write},
};

/// Used by the `element!` macro to extend a collection with elements.
#[doc(hidden)]
pub trait ExtendWithElements<T>: Sized {
    fn extend<E: Extend<T>>(self, dest: &mut E);
}

impl<T, U> ExtendWithElements<T> for Element<U>
where
    U: ElementType,
    T: From<Element<U>>,
{
    fn extend<E: Extend<T>>(self, dest: &mut E) {
        dest.extend([self.into()]);
    }
}

impl ExtendWithElements<AnyElement> for AnyElement {
    fn extend<E: Extend<AnyElement>>(self, dest: &mut E) {
        dest.extend([self]);
    }
}

impl<T, U, I> ExtendWithElements<T> for I
where
    I: IntoIterator<Item = U>,
    U: Into<T>,
{
    fn extend<E: Extend<T>>(self, dest: &mut E) {
        dest.extend(self.into_iter().map(|e| e.into()));
    }
}

/// Used by the `element!` macro to extend a collection with elements.
#[doc(hidden)]
pub fn extend_with_elements<T, U, E>(dest: &mut T, elements: U)
where
    T: Extend<E>,
    U: ExtendWithElements<E>,
{
    elements.extend(dest);
}

/// Identifies an element among its siblings.
///
/// Elements keep their component instance (and with it, their state and timers) across renders
/// for as long as their key and type stay the same. The `element!` macro assigns each call site a
/// unique key, so most code never needs to set one explicitly. Elements produced in a loop should
/// be given a key via the `key` prop.
#[derive(Clone, Hash, PartialEq, Eq, Debug)]
pub enum ElementKey {
    /// A key generated by the `element!` macro for its call site.
    Site(u128),
    /// A key given explicitly as a string.
    Named(String),
    /// A key given explicitly as an index.
    Index(usize),
}

impl ElementKey {
    #[doc(hidden)]
    pub const fn site(id: u128) -> Self {
        Self::Site(id)
    }
}

impl Display for ElementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Site(id) => write!(f, "site-{:032x}", id),
            Self::Named(name) => write!(f, "{:?}", name),
            Self::Index(i) => write!(f, "#{}", i),
        }
    }
}

impl From<&str> for ElementKey {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl From<String> for ElementKey {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl From<usize> for ElementKey {
    fn from(i: usize) -> Self {
        Self::Index(i)
    }
}

/// An element of a specific component type, typically created with the `element!` macro.
pub struct Element<T: ElementType> {
    /// The key of the element.
    pub key: ElementKey,
    /// The props of the element.
    pub props: T::Props,
}

/// Types that can be the type of an [`Element`]. This is implemented for every [`Component`].
pub trait ElementType {
    /// The props accepted by elements of this type.
    type Props: Send + 'static;
}

/// A type-erased element.
pub struct AnyElement {
    key: ElementKey,
    props: AnyProps,
    helper: Box<dyn ComponentHelperExt>,
}

impl AnyElement {
    /// Returns the element's key.
    pub fn key(&self) -> &ElementKey {
        &self.key
    }

    pub(crate) fn props_mut(&mut self) -> &mut AnyProps {
        &mut self.props
    }

    pub(crate) fn helper(&self) -> &dyn ComponentHelperExt {
        &*self.helper
    }

    pub(crate) fn props_and_helper(&mut self) -> (&mut AnyProps, &dyn ComponentHelperExt) {
        (&mut self.props, &*self.helper)
    }
}

impl<T> Element<T>
where
    T: Component,
{
    /// Converts the element into an [`AnyElement`].
    pub fn into_any(self) -> AnyElement {
        self.into()
    }
}

impl<T> From<Element<T>> for AnyElement
where
    T: Component,
{
    fn from(e: Element<T>) -> Self {
        Self {
            key: e.key,
            props: AnyProps::new(e.props),
            helper: ComponentHelper::<T>::boxed(),
        }
    }
}

/// Methods for rendering elements outside of a long-lived [`Mount`].
pub trait ElementExt: Into<AnyElement> + Sized {
    /// Renders the element once into a canvas.
    ///
    /// Timers registered during this render are attached to a manual scheduler and released
    /// before this returns, so they never fire.
    fn render(self, max_width: Option<usize>) -> Canvas {
        Mount::new(self, Scheduler::manual()).render(max_width)
    }

    /// Renders the element once and returns it as plain text.
    fn to_string(self) -> String {
        self.render(None).to_string()
    }

    /// Renders the element once and writes it to the given writer as plain text.
    fn write<W: Write>(self, w: W) -> io::Result<()> {
        self.render(None).write(w)
    }

    /// Renders the element once and prints it to stdout, with ANSI formatting if stdout is a
    /// terminal.
    fn print(self) -> io::Result<()> {
        let dest = stdout();
        if dest.is_tty() {
            let width = terminal::size().ok().map(|(w, _)| w as usize);
            self.render(width).write_ansi(dest)
        } else {
            self.write(dest)
        }
    }

    /// Mounts the element on the system clock and re-renders it to stdout every time it changes.
    ///
    /// The returned future only completes on error.
    fn render_loop(self) -> impl Future<Output = io::Result<()>> {
        async move {
            let mut mount = Mount::new(self, Scheduler::system());
            mount.terminal_render_loop(|| false).await
        }
    }
}

impl<E: Into<AnyElement>> ElementExt for E {}
