use crate::{
    element::{ElementKey, ElementType},
    hook::{HookList, Hooks},
    multimap::SiblingMap,
    props::AnyProps,
    render::{ComponentDrawer, ComponentUpdater, LayoutEngine},
    scheduler::Scheduler,
};
use log::debug;
use std::{
    any::{type_name, Any, TypeId},
    marker::PhantomData,
    pin::Pin,
    task::{Context, Poll},
};
use taffy::NodeId;

/// `Component` defines a component type and the methods required for instantiating and rendering
/// the component.
///
/// Most users will not need to implement this trait directly. This is only required for new,
/// low-level component type definitions. Instead, the [`component`](macro@crate::component) macro
/// should be used.
pub trait Component: Any + Unpin + Send {
    /// The type of properties that the component accepts.
    type Props: Send + 'static;

    /// Creates a new instance of the component from a set of properties.
    fn new(props: &Self::Props) -> Self;

    /// Invoked whenever the properties of the component or layout may have changed.
    fn update(&mut self, _props: &mut Self::Props, _hooks: Hooks, _updater: &mut ComponentUpdater) {
    }

    /// Invoked to draw the component.
    fn draw(&mut self, _drawer: &mut ComponentDrawer<'_>) {}

    /// Invoked to determine whether a change has occurred that would require the component to be
    /// updated and redrawn.
    fn poll_change(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<()> {
        Poll::Pending
    }
}

impl<C: Component> ElementType for C {
    type Props = C::Props;
}

pub(crate) trait AnyComponent: Any + Unpin + Send {
    fn update(&mut self, props: &mut AnyProps, hooks: Hooks, updater: &mut ComponentUpdater);
    fn draw(&mut self, drawer: &mut ComponentDrawer<'_>);
    fn poll_change(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()>;
}

impl<C: Component> AnyComponent for C {
    fn update(&mut self, props: &mut AnyProps, hooks: Hooks, updater: &mut ComponentUpdater) {
        Component::update(
            self,
            props
                .downcast_mut()
                .expect("we should be able to downcast the props"),
            hooks,
            updater,
        );
    }

    fn draw(&mut self, drawer: &mut ComponentDrawer<'_>) {
        Component::draw(self, drawer);
    }

    fn poll_change(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        Component::poll_change(self, cx)
    }
}

/// Creates component instances for an element without knowing its concrete type.
pub(crate) trait ComponentHelperExt: Any + Send {
    fn new_component(&self, props: &mut AnyProps) -> Box<dyn AnyComponent>;
    fn component_type_id(&self) -> TypeId;
    fn component_type_name(&self) -> &'static str;
    fn copy(&self) -> Box<dyn ComponentHelperExt>;
}

pub(crate) struct ComponentHelper<C: Component> {
    _marker: PhantomData<fn() -> C>,
}

impl<C: Component> ComponentHelper<C> {
    pub fn boxed() -> Box<dyn ComponentHelperExt> {
        Box::new(Self {
            _marker: PhantomData,
        })
    }
}

impl<C: Component> ComponentHelperExt for ComponentHelper<C> {
    fn new_component(&self, props: &mut AnyProps) -> Box<dyn AnyComponent> {
        Box::new(C::new(
            props
                .downcast_mut::<C::Props>()
                .expect("we should be able to downcast the props"),
        ))
    }

    fn component_type_id(&self) -> TypeId {
        TypeId::of::<C>()
    }

    fn component_type_name(&self) -> &'static str {
        type_name::<C>()
    }

    fn copy(&self) -> Box<dyn ComponentHelperExt> {
        Self::boxed()
    }
}

/// A live instance of a component, along with its hooks and children.
///
/// Dropping an instance drops its hooks, which is what releases any resources they acquired.
pub(crate) struct InstantiatedComponent {
    node_id: NodeId,
    component: Box<dyn AnyComponent>,
    helper: Box<dyn ComponentHelperExt>,
    hooks: HookList,
    children: Components,
    first_update: bool,
}

impl InstantiatedComponent {
    pub fn new(node_id: NodeId, props: &mut AnyProps, helper: &dyn ComponentHelperExt) -> Self {
        debug!("mounting {}", helper.component_type_name());
        Self {
            node_id,
            component: helper.new_component(props),
            helper: helper.copy(),
            hooks: HookList::default(),
            children: Components::default(),
            first_update: true,
        }
    }

    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    pub fn component_type_id(&self) -> TypeId {
        self.helper.component_type_id()
    }

    pub fn update(
        &mut self,
        props: &mut AnyProps,
        layout_engine: &mut LayoutEngine,
        scheduler: &Scheduler,
    ) {
        let mut updater =
            ComponentUpdater::new(self.node_id, &mut self.children, layout_engine, scheduler);
        self.hooks.pre_component_update(&mut updater);
        self.component.update(
            props,
            Hooks::new(&mut self.hooks, self.first_update, scheduler),
            &mut updater,
        );
        self.hooks.post_component_update(&mut updater);
        self.first_update = false;
    }

    pub fn draw(&mut self, drawer: &mut ComponentDrawer<'_>) {
        self.component.draw(drawer);
        self.children.draw(drawer);
    }

    /// Removes this instance's layout node and those of all of its descendants.
    pub fn remove_nodes(&self, layout_engine: &mut LayoutEngine) {
        self.children.remove_nodes(layout_engine);
        layout_engine
            .remove(self.node_id)
            .expect("we should be able to remove the node");
    }

    pub fn poll_change(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let hooks_status = self.hooks.poll_change(cx);
        let component_status = Pin::new(&mut *self.component).poll_change(cx);
        let children_status = Pin::new(&mut self.children).poll_change(cx);
        if hooks_status.is_ready() || component_status.is_ready() || children_status.is_ready() {
            Poll::Ready(())
        } else {
            Poll::Pending
        }
    }
}

impl Drop for InstantiatedComponent {
    fn drop(&mut self) {
        debug!("unmounting {}", self.helper.component_type_name());
    }
}

#[derive(Default)]
pub(crate) struct Components {
    pub components: SiblingMap<ElementKey, InstantiatedComponent>,
}

impl Components {
    pub fn draw(&mut self, drawer: &mut ComponentDrawer<'_>) {
        for component in self.components.values_mut() {
            drawer.for_child_node(component.node_id(), |drawer| {
                component.draw(drawer);
            });
        }
    }

    pub fn remove_nodes(&self, layout_engine: &mut LayoutEngine) {
        for component in self.components.values() {
            component.remove_nodes(layout_engine);
        }
    }

    pub fn poll_change(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let mut is_ready = false;
        for component in self.components.values_mut() {
            if Pin::new(&mut *component).poll_change(cx).is_ready() {
                is_ready = true;
            }
        }
        if is_ready {
            Poll::Ready(())
        } else {
            Poll::Pending
        }
    }
}
