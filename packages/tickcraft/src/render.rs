use crate::{
    canvas::{Canvas, CanvasSubviewMut},
    component::{Components, InstantiatedComponent},
    element::AnyElement,
    multimap::SiblingMap,
    scheduler::Scheduler,
    style::LayoutStyle,
};
use crossterm::{cursor, queue, terminal, tty::IsTty};
use futures::{
    future::poll_fn,
    task::{waker, ArcWake},
};
use std::{
    io::{self, stdout, Write},
    mem,
    pin::Pin,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    task::{Context, Poll},
};
use taffy::{AvailableSpace, Layout, NodeId, Point, Size, Style, TaffyTree};

/// Provides a component with the ability to change its layout and children during an update.
pub struct ComponentUpdater<'a> {
    node_id: NodeId,
    children: &'a mut Components,
    layout_engine: &'a mut LayoutEngine,
    scheduler: &'a Scheduler,
}

impl<'a> ComponentUpdater<'a> {
    pub(crate) fn new(
        node_id: NodeId,
        children: &'a mut Components,
        layout_engine: &'a mut LayoutEngine,
        scheduler: &'a Scheduler,
    ) -> Self {
        Self {
            node_id,
            children,
            layout_engine,
            scheduler,
        }
    }

    /// Sets the layout style of the component's node.
    pub fn set_layout_style(&mut self, layout_style: LayoutStyle) {
        self.layout_engine
            .set_style(self.node_id, layout_style.into())
            .expect("we should be able to set the style");
    }

    /// Sets the intrinsic size of the component's node, in cells. This is used for leaf
    /// components such as text.
    pub fn set_measured_size(&mut self, width: usize, height: usize) {
        let size = Size {
            width: width as f32,
            height: height as f32,
        };
        let context = self
            .layout_engine
            .get_node_context_mut(self.node_id)
            .expect("we should be able to get the node");
        if context.measured_size != Some(size) {
            context.measured_size = Some(size);
            self.layout_engine
                .mark_dirty(self.node_id)
                .expect("we should be able to mark the node as dirty");
        }
    }

    /// Updates the component's children. Children are matched to existing instances by key and
    /// type; unmatched instances are torn down and new ones are created as needed.
    ///
    /// Siblings may share a key, as elements created in a loop without a `key` prop do. Those are
    /// matched to existing instances in order.
    pub fn update_children<'b, I>(&mut self, children: I)
    where
        I: IntoIterator<Item = &'b mut AnyElement>,
    {
        let mut used_components = SiblingMap::with_capacity(self.children.components.len());
        let mut node_ids = Vec::new();

        for child in children {
            let key = child.key().clone();
            let mut component = match self.children.components.take(&key) {
                Some(component)
                    if component.component_type_id() == child.helper().component_type_id() =>
                {
                    component
                }
                replaced => {
                    if let Some(old) = replaced {
                        old.remove_nodes(self.layout_engine);
                    }
                    let new_node_id = self
                        .layout_engine
                        .new_leaf_with_context(Style::default(), LayoutEngineNodeContext::default())
                        .expect("we should be able to add the node");
                    let (props, helper) = child.props_and_helper();
                    InstantiatedComponent::new(new_node_id, props, helper)
                }
            };
            component.update(child.props_mut(), self.layout_engine, self.scheduler);
            node_ids.push(component.node_id());
            used_components.push(key, component);
        }

        let unused = mem::replace(&mut self.children.components, used_components);
        for component in unused.into_values() {
            component.remove_nodes(self.layout_engine);
        }
        self.layout_engine
            .set_children(self.node_id, &node_ids)
            .expect("we should be able to set the children");
    }
}

/// Provides a component with access to its region of the canvas while drawing.
pub struct ComponentDrawer<'a> {
    node_id: NodeId,
    node_position: Point<usize>,
    node_size: Size<usize>,
    layout_engine: &'a LayoutEngine,
    canvas: &'a mut Canvas,
}

impl<'a> ComponentDrawer<'a> {
    /// Gets the calculated layout of the current node.
    pub fn layout(&self) -> Layout {
        *self
            .layout_engine
            .layout(self.node_id)
            .expect("we should be able to get the layout")
    }

    /// Returns the region of the canvas occupied by the current node.
    pub fn canvas(&mut self) -> CanvasSubviewMut {
        self.canvas.subview_mut(
            self.node_position.x,
            self.node_position.y,
            self.node_size.width,
            self.node_size.height,
        )
    }

    /// Moves to the given child node's position, invokes the closure, and moves back.
    pub(crate) fn for_child_node<F>(&mut self, node_id: NodeId, f: F)
    where
        F: FnOnce(&mut Self),
    {
        let old_node_id = self.node_id;
        let old_node_position = self.node_position;
        let old_node_size = self.node_size;
        self.node_id = node_id;
        let layout = self.layout();
        self.node_position = Point {
            x: self.node_position.x + layout.location.x as usize,
            y: self.node_position.y + layout.location.y as usize,
        };
        self.node_size = Size {
            width: layout.size.width as usize,
            height: layout.size.height as usize,
        };
        f(self);
        self.node_id = old_node_id;
        self.node_position = old_node_position;
        self.node_size = old_node_size;
    }
}

#[derive(Default)]
pub(crate) struct LayoutEngineNodeContext {
    measured_size: Option<Size<f32>>,
}

pub(crate) type LayoutEngine = TaffyTree<LayoutEngineNodeContext>;

#[derive(Default)]
struct WakeFlag(AtomicBool);

impl ArcWake for WakeFlag {
    fn wake_by_ref(arc_self: &Arc<Self>) {
        arc_self.0.store(true, Ordering::SeqCst);
    }
}

/// `Mount` is a mounted element tree: the root element, the component instances it has created,
/// and the scheduler their timers are registered with.
///
/// Components are created the first time the tree is rendered and are torn down when they leave
/// the tree or when the mount is dropped. Tearing down a component releases every timer it
/// acquired.
pub struct Mount {
    element: AnyElement,
    scheduler: Scheduler,
    layout_engine: LayoutEngine,
    root_component: InstantiatedComponent,
}

impl Mount {
    /// Mounts an element on the given scheduler.
    pub fn new<E: Into<AnyElement>>(e: E, scheduler: Scheduler) -> Self {
        let mut element = e.into();
        let mut layout_engine = TaffyTree::new();
        let root_node_id = layout_engine
            .new_leaf_with_context(Style::default(), LayoutEngineNodeContext::default())
            .expect("we should be able to add the root");
        let (props, helper) = element.props_and_helper();
        let root_component = InstantiatedComponent::new(root_node_id, props, helper);
        Self {
            element,
            scheduler,
            layout_engine,
            root_component,
        }
    }

    /// Replaces the root element.
    ///
    /// If the new element has the same key and type as the current one, the existing component
    /// instance is kept and only receives new props on the next render. Otherwise, the existing
    /// instance is torn down before the new one is created.
    pub fn replace<E: Into<AnyElement>>(&mut self, e: E) {
        let mut element = e.into();
        if element.key() != self.element.key()
            || element.helper().component_type_id() != self.root_component.component_type_id()
        {
            self.root_component.remove_nodes(&mut self.layout_engine);
            let root_node_id = self
                .layout_engine
                .new_leaf_with_context(Style::default(), LayoutEngineNodeContext::default())
                .expect("we should be able to add the root");
            // The new instance has not been updated yet, so it has no hooks and hasn't acquired
            // anything by the time the old instance is dropped here.
            let (props, helper) = element.props_and_helper();
            let new_component = InstantiatedComponent::new(root_node_id, props, helper);
            drop(mem::replace(&mut self.root_component, new_component));
        }
        self.element = element;
    }

    /// Updates the tree, computes its layout, and draws it into a new canvas.
    pub fn render(&mut self, max_width: Option<usize>) -> Canvas {
        self.root_component.update(
            self.element.props_mut(),
            &mut self.layout_engine,
            &self.scheduler,
        );

        let root_node_id = self.root_component.node_id();
        self.layout_engine
            .compute_layout_with_measure(
                root_node_id,
                Size {
                    width: max_width
                        .map(|w| AvailableSpace::Definite(w as _))
                        .unwrap_or(AvailableSpace::MaxContent),
                    height: AvailableSpace::MaxContent,
                },
                |known_dimensions, available_space, _node_id, node_context, _style| {
                    let measured = node_context
                        .and_then(|cx| cx.measured_size)
                        .unwrap_or(Size::ZERO);
                    let width = match available_space.width {
                        AvailableSpace::Definite(w) => measured.width.min(w),
                        _ => measured.width,
                    };
                    Size {
                        width: known_dimensions.width.unwrap_or(width),
                        height: known_dimensions.height.unwrap_or(measured.height),
                    }
                },
            )
            .expect("we should be able to compute the layout");

        let root_layout = *self
            .layout_engine
            .layout(root_node_id)
            .expect("we should be able to get the root layout");
        let node_size = Size {
            width: root_layout.size.width as usize,
            height: root_layout.size.height as usize,
        };
        let mut canvas = Canvas::new(node_size.width, node_size.height);
        let mut drawer = ComponentDrawer {
            node_id: root_node_id,
            node_position: Point { x: 0, y: 0 },
            node_size,
            layout_engine: &self.layout_engine,
            canvas: &mut canvas,
        };
        self.root_component.draw(&mut drawer);
        canvas
    }

    /// Processes every change that is ready without blocking, including timer ticks that are
    /// already due. Returns `true` if anything changed, meaning that the next render may differ
    /// from the previous one.
    pub fn poll_changes(&mut self) -> bool {
        let flag = Arc::new(WakeFlag::default());
        let waker = waker(flag.clone());
        let mut cx = Context::from_waker(&waker);
        let mut changed = false;
        loop {
            flag.0.store(false, Ordering::SeqCst);
            match Pin::new(&mut self.root_component).poll_change(&mut cx) {
                Poll::Ready(()) => changed = true,
                // Something changed while we were polling, such as a timer callback modifying
                // state that had already been polled.
                Poll::Pending if flag.0.load(Ordering::SeqCst) => {}
                Poll::Pending => break,
            }
        }
        changed
    }

    /// Waits until a change occurs that requires the tree to be re-rendered.
    pub async fn wait(&mut self) {
        let root_component = &mut self.root_component;
        poll_fn(|cx| Pin::new(&mut *root_component).poll_change(cx)).await;
    }

    /// Renders the tree to stdout, then re-renders it in place each time it changes, until
    /// `until` returns `true` after a render.
    ///
    /// If stdout isn't a terminal, each frame is written out in full as plain text instead.
    pub async fn terminal_render_loop<F>(&mut self, mut until: F) -> io::Result<()>
    where
        F: FnMut() -> bool,
    {
        let mut dest = stdout();
        if !dest.is_tty() {
            return self.render_loop_to(dest, until).await;
        }
        let mut prev_height = 0;
        loop {
            if prev_height > 0 {
                queue!(dest, cursor::MoveToPreviousLine(prev_height as _))?;
            }
            let width = terminal::size().ok().map(|(w, _)| w as usize);
            let canvas = self.render(width);
            prev_height = canvas.height();
            canvas.write_ansi(&mut dest)?;
            if until() {
                break;
            }
            self.wait().await;
        }
        Ok(())
    }

    /// Writes a plain text frame to `dest` every time the tree changes, until `until` returns
    /// `true` after a frame.
    pub async fn render_loop_to<W, F>(&mut self, mut dest: W, mut until: F) -> io::Result<()>
    where
        W: Write,
        F: FnMut() -> bool,
    {
        loop {
            self.render(None).write(&mut dest)?;
            if until() {
                return Ok(());
            }
            self.wait().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use std::time::Duration;

    #[derive(Default)]
    struct LabelProps {
        items: Vec<String>,
    }

    #[component]
    fn Labels(props: &LabelProps) -> impl Into<AnyElement> {
        element! {
            View(flex_direction: FlexDirection::Column) {
                #(props.items.iter().enumerate().map(|(i, item)| element! {
                    Text(key: i, content: item.clone())
                }))
            }
        }
    }

    #[test]
    fn test_render_and_replace() {
        let scheduler = Scheduler::manual();
        let mut mount = Mount::new(
            element!(Labels(key: "labels", items: vec!["a".to_string(), "b".to_string()])),
            scheduler,
        );
        assert_eq!(mount.render(None).to_string(), "a\nb\n");

        mount.replace(element!(Labels(key: "labels", items: vec!["c".to_string()])));
        assert_eq!(mount.render(None).to_string(), "c\n");

        mount.replace(element!(Text(content: "plain")));
        assert_eq!(mount.render(None).to_string(), "plain\n");
    }

    #[test]
    fn test_unkeyed_children_from_iterator() {
        let element = element! {
            View(flex_direction: FlexDirection::Column) {
                #((0..3).map(|i| element!(Text(content: i.to_string()))))
            }
        };
        assert_eq!(element.to_string(), "0\n1\n2\n");
    }

    #[derive(Default)]
    struct CountersProps {
        count: usize,
    }

    #[component]
    fn Counters(props: &CountersProps) -> impl Into<AnyElement> {
        element! {
            View(flex_direction: FlexDirection::Column) {
                #((0..props.count).map(|i| element! {
                    Counter(initial_value: 10 * i as i64)
                }))
            }
        }
    }

    #[test]
    fn test_unkeyed_siblings_keep_their_instances() {
        let scheduler = Scheduler::manual();
        let mut mount = Mount::new(
            element!(Counters(key: "counters", count: 3usize)),
            scheduler.clone(),
        );
        assert_eq!(mount.render(None).to_string(), "0 [logo]\n10 [logo]\n20 [logo]\n");
        assert_eq!(scheduler.active_timers(), 3);

        scheduler.advance(Duration::from_secs(1));
        mount.poll_changes();
        assert_eq!(mount.render(None).to_string(), "1 [logo]\n11 [logo]\n21 [logo]\n");
        assert_eq!(scheduler.active_timers(), 3);

        // The trailing sibling is torn down; the others keep their values.
        mount.replace(element!(Counters(key: "counters", count: 2usize)));
        assert_eq!(mount.render(None).to_string(), "1 [logo]\n11 [logo]\n");
        assert_eq!(scheduler.active_timers(), 2);
    }

    #[test]
    fn test_render_loop_to_stops() {
        let scheduler = Scheduler::manual();
        let mut mount = Mount::new(element!(Counter), scheduler.clone());
        let mut frames = Vec::new();
        let mut remaining = 2;
        smol::block_on(smol::future::zip(
            mount.render_loop_to(&mut frames, || {
                remaining -= 1;
                remaining == 0
            }),
            async {
                smol::future::yield_now().await;
                scheduler.advance(Duration::from_secs(1));
            },
        ))
        .0
        .unwrap();
        assert_eq!(
            String::from_utf8(frames).unwrap(),
            "1 [logo]\n2 [logo]\n"
        );
    }

    #[test]
    fn test_max_width_clips() {
        let mut mount = Mount::new(
            element!(Text(content: "hello world")),
            Scheduler::manual(),
        );
        let canvas = mount.render(Some(5));
        assert_eq!(canvas.width(), 5);
        assert_eq!(canvas.to_string(), "hello\n");
    }

    #[test]
    fn test_poll_changes_without_timers() {
        let mut mount = Mount::new(element!(Text(content: "idle")), Scheduler::manual());
        mount.render(None);
        assert!(!mount.poll_changes());
    }

    #[test]
    fn test_wait_for_tick() {
        let scheduler = Scheduler::system();
        let mut mount = Mount::new(
            element!(Counter(period: Duration::from_millis(10))),
            scheduler.clone(),
        );
        assert_eq!(mount.render(None).to_string(), "1 [logo]\n");
        smol::block_on(mount.wait());
        assert_eq!(mount.render(None).to_string(), "2 [logo]\n");
        drop(mount);
        assert_eq!(scheduler.active_timers(), 0);
    }
}
