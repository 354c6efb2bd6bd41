use crate::{
    AlignItems, AnyElement, Component, ComponentUpdater, FlexDirection, Hooks, LayoutStyle,
};

/// The props which can be passed to the [`View`] component.
#[derive(Default)]
pub struct ViewProps {
    /// The elements to render inside of the view.
    pub children: Vec<AnyElement>,

    /// The direction the children are laid out in. Defaults to a row.
    pub flex_direction: FlexDirection,

    /// The number of cells between adjacent children.
    pub gap: u32,

    /// The number of cells between the view's edges and its children.
    pub padding: u32,

    /// How children are aligned along the cross axis.
    pub align_items: Option<AlignItems>,
}

impl ViewProps {
    fn layout_style(&self) -> LayoutStyle {
        LayoutStyle {
            flex_direction: self.flex_direction,
            gap: self.gap,
            padding: self.padding,
            align_items: self.align_items,
        }
    }
}

/// `View` is a container which lays out its children with flexbox.
///
/// # Example
///
/// ```
/// # use tickcraft::prelude::*;
/// let output = element! {
///     View(flex_direction: FlexDirection::Column, padding: 1u32) {
///         Text(content: "a")
///         Text(content: "b")
///     }
/// }
/// .to_string();
/// assert_eq!(output, "\n a\n b\n\n");
/// ```
#[derive(Default)]
pub struct View;

impl Component for View {
    type Props = ViewProps;

    fn new(_props: &Self::Props) -> Self {
        Self
    }

    fn update(&mut self, props: &mut Self::Props, _hooks: Hooks, updater: &mut ComponentUpdater) {
        updater.set_layout_style(props.layout_style());
        updater.update_children(props.children.iter_mut());
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use indoc::indoc;

    #[test]
    fn test_view() {
        assert_eq!(element!(View).to_string(), "");

        let row = element! {
            View(gap: 2u32) {
                Text(content: "a")
                Text(content: "b")
            }
        };
        assert_eq!(row.to_string(), "a  b\n");

        let column = element! {
            View(flex_direction: FlexDirection::Column) {
                Text(content: "top")
                View(gap: 1u32) {
                    Text(content: "left")
                    Text(content: "right")
                }
            }
        };
        assert_eq!(
            column.to_string(),
            indoc! {"
                top
                left right
            "}
        );
    }
}
