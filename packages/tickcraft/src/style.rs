use taffy::{
    geometry,
    style::{LengthPercentage, Style},
    Rect,
};

// Re-export basic enum types.
pub use crossterm::style::Color;
pub use taffy::style::{AlignItems, FlexDirection};

/// The weight of text.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Weight {
    /// The default weight.
    #[default]
    Normal,
    /// Bold text.
    Bold,
    /// Dimmed text.
    Light,
}

/// The layout properties shared by container components.
///
/// All lengths are in terminal cells.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LayoutStyle {
    /// The direction children are laid out in.
    pub flex_direction: FlexDirection,
    /// Space between adjacent children along the main axis.
    pub gap: u32,
    /// Space between the container's edges and its children, on every side.
    pub padding: u32,
    /// How children are aligned along the cross axis.
    pub align_items: Option<AlignItems>,
}

impl From<LayoutStyle> for Style {
    fn from(s: LayoutStyle) -> Self {
        let padding = LengthPercentage::Length(s.padding as _);
        let gap = LengthPercentage::Length(s.gap as _);
        Self {
            flex_direction: s.flex_direction,
            gap: geometry::Size {
                width: gap,
                height: gap,
            },
            padding: Rect {
                left: padding,
                right: padding,
                top: padding,
                bottom: padding,
            },
            align_items: s.align_items,
            ..Default::default()
        }
    }
}
