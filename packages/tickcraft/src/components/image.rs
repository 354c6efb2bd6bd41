use crate::{Component, ComponentDrawer, ComponentUpdater, Hooks, TextStyle, Weight};
use unicode_width::UnicodeWidthStr;

/// The props which can be passed to the [`Image`] component.
#[derive(Clone, Default)]
pub struct ImageProps {
    /// The location of the image.
    pub src: String,

    /// Alternative text describing the image.
    pub alt: String,
}

/// `Image` is a placeholder for a static image.
///
/// The image itself is never fetched. It is drawn as its alternative text in brackets, or as its
/// source if it has no alternative text.
///
/// # Example
///
/// ```
/// # use tickcraft::prelude::*;
/// let output = element!(Image(src: "logo.png", alt: "logo")).to_string();
/// assert_eq!(output, "[logo]\n");
/// ```
#[derive(Default)]
pub struct Image {
    label: String,
}

impl Component for Image {
    type Props = ImageProps;

    fn new(_props: &Self::Props) -> Self {
        Self::default()
    }

    fn update(&mut self, props: &mut Self::Props, _hooks: Hooks, updater: &mut ComponentUpdater) {
        let name = if props.alt.is_empty() {
            &props.src
        } else {
            &props.alt
        };
        self.label = format!("[{}]", name);
        updater.set_measured_size(self.label.width(), 1);
    }

    fn draw(&mut self, drawer: &mut ComponentDrawer<'_>) {
        let style = TextStyle {
            weight: Weight::Light,
            ..Default::default()
        };
        drawer.canvas().set_text(0, 0, &self.label, style);
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn test_image() {
        assert_eq!(
            element!(Image(src: "logo.png", alt: "logo")).to_string(),
            "[logo]\n"
        );
        assert_eq!(element!(Image(src: "logo.png")).to_string(), "[logo.png]\n");
        assert_eq!(element!(Image).to_string(), "[]\n");
    }
}
