use crate::{Color, Component, ComponentDrawer, ComponentUpdater, Hooks, TextStyle, Weight};
use unicode_width::UnicodeWidthStr;

/// The props which can be passed to the [`Text`] component.
#[derive(Clone, Default)]
pub struct TextProps {
    /// The text to display. It is drawn on a single line and clipped to the available width.
    pub content: String,

    /// The color to make the text.
    pub color: Option<Color>,

    /// The weight of the text.
    pub weight: Weight,
}

/// `Text` is a component that renders a single line of text.
///
/// # Example
///
/// ```
/// # use tickcraft::prelude::*;
/// let output = element!(Text(content: "hello", color: Color::Green)).to_string();
/// assert_eq!(output, "hello\n");
/// ```
#[derive(Default)]
pub struct Text {
    content: String,
    style: TextStyle,
}

impl Component for Text {
    type Props = TextProps;

    fn new(_props: &Self::Props) -> Self {
        Self::default()
    }

    fn update(&mut self, props: &mut Self::Props, _hooks: Hooks, updater: &mut ComponentUpdater) {
        self.style = TextStyle {
            color: props.color,
            weight: props.weight,
        };
        if self.content != props.content {
            self.content.clone_from(&props.content);
        }
        updater.set_measured_size(self.content.width(), 1);
    }

    fn draw(&mut self, drawer: &mut ComponentDrawer<'_>) {
        drawer.canvas().set_text(0, 0, &self.content, self.style);
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn test_text() {
        assert_eq!(element!(Text).to_string(), "\n");
        assert_eq!(element!(Text(content: "foo")).to_string(), "foo\n");
        assert_eq!(element!(Text(content: "日本語")).to_string(), "日本語\n");
    }

    #[test]
    fn test_text_style() {
        let canvas = element!(Text(content: "x", color: Color::Red, weight: Weight::Bold))
            .render(None);
        let mut buf = Vec::new();
        canvas.write_ansi(&mut buf).unwrap();
        let output = String::from_utf8(buf).unwrap();
        assert!(output.contains('x'));
        assert_ne!(output, "x\n");
    }
}
