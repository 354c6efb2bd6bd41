use crate::style::{Color, Weight};
use crossterm::{
    csi,
    style::{Attribute, Colored},
};
use std::{
    fmt::{self, Display},
    io::{self, Write},
};
use unicode_width::UnicodeWidthChar;

/// Describes how a piece of text should be drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextStyle {
    /// The foreground color, or `None` for the terminal default.
    pub color: Option<Color>,
    /// The weight of the text.
    pub weight: Weight,
}

#[derive(Clone, Debug, PartialEq)]
struct Character {
    value: char,
    style: TextStyle,
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Cell {
    character: Option<Character>,
    // Set for the cells covered by the right half of a wide character.
    continuation: bool,
}

impl Cell {
    fn is_empty(&self) -> bool {
        self.character.is_none() && !self.continuation
    }
}

/// `Canvas` is the grid of character cells that a component tree is drawn into.
///
/// Most users won't interact with it directly. It is produced by rendering an element, and it can
/// be written to a terminal with [`write_ansi`](Canvas::write_ansi) or converted to a plain string
/// via [`Display`].
#[derive(Clone, Debug, PartialEq)]
pub struct Canvas {
    width: usize,
    cells: Vec<Vec<Cell>>,
}

impl Canvas {
    /// Creates a new blank canvas.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            cells: vec![vec![Cell::default(); width]; height],
        }
    }

    /// The width of the canvas in columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// The height of the canvas in rows.
    pub fn height(&self) -> usize {
        self.cells.len()
    }

    fn set_text_chars<I>(&mut self, x: usize, y: usize, chars: I, style: TextStyle)
    where
        I: IntoIterator<Item = char>,
    {
        let Some(row) = self.cells.get_mut(y) else {
            return;
        };
        let mut x = x;
        for c in chars {
            let w = c.width().unwrap_or(0);
            if w == 0 {
                continue;
            }
            if x + w > row.len() {
                break;
            }
            row[x] = Cell {
                character: Some(Character { value: c, style }),
                continuation: false,
            };
            for cell in &mut row[x + 1..x + w] {
                *cell = Cell {
                    character: None,
                    continuation: true,
                };
            }
            x += w;
        }
    }

    /// Returns a mutable view of a rectangular region of the canvas. Writes through the view are
    /// offset by the region's origin and clipped to its bounds.
    pub fn subview_mut(
        &mut self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> CanvasSubviewMut {
        CanvasSubviewMut {
            x,
            y,
            width,
            height,
            canvas: self,
        }
    }

    fn write_impl<W: Write>(&self, mut w: W, ansi: bool) -> io::Result<()> {
        if ansi {
            write!(w, csi!("0m"))?;
        }

        let mut text_style = TextStyle::default();

        for row in &self.cells {
            let last_non_empty = row.iter().rposition(|cell| !cell.is_empty());
            for cell in row.iter().take(last_non_empty.map_or(0, |i| i + 1)) {
                if cell.continuation {
                    continue;
                }

                if let (true, Some(c)) = (ansi, &cell.character) {
                    // Going back to normal weight requires resetting all attributes.
                    if c.style.weight != text_style.weight && c.style.weight == Weight::Normal {
                        write!(w, csi!("0m"))?;
                        text_style = TextStyle::default();
                    }

                    if c.style.color != text_style.color {
                        write!(
                            w,
                            csi!("{}m"),
                            Colored::ForegroundColor(c.style.color.unwrap_or(Color::Reset))
                        )?;
                    }

                    if c.style.weight != text_style.weight {
                        match c.style.weight {
                            Weight::Bold => write!(w, csi!("{}m"), Attribute::Bold.sgr())?,
                            Weight::Normal => {}
                            Weight::Light => write!(w, csi!("{}m"), Attribute::Dim.sgr())?,
                        }
                    }

                    text_style = c.style;
                }

                match &cell.character {
                    Some(c) => write!(w, "{}", c.value)?,
                    None => w.write_all(b" ")?,
                }
            }
            if ansi {
                // clear until end of line
                write!(w, csi!("K"))?;
                // add a carriage return in case we're in raw mode
                w.write_all(b"\r\n")?;
            } else {
                w.write_all(b"\n")?;
            }
        }
        if ansi {
            write!(w, csi!("0m"))?;
        }
        w.flush()?;
        Ok(())
    }

    /// Writes the canvas to the given writer with ANSI escape codes for colors and weights.
    pub fn write_ansi<W: Write>(&self, w: W) -> io::Result<()> {
        self.write_impl(w, true)
    }

    /// Writes the canvas to the given writer as plain text. Trailing blank cells of each row are
    /// omitted.
    pub fn write<W: Write>(&self, w: W) -> io::Result<()> {
        self.write_impl(w, false)
    }
}

impl Display for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = Vec::with_capacity(self.width * self.cells.len());
        self.write(&mut buf).map_err(|_| fmt::Error)?;
        f.write_str(&String::from_utf8_lossy(&buf))
    }
}

/// A mutable, clipped view of a region of a [`Canvas`].
pub struct CanvasSubviewMut<'a> {
    x: usize,
    y: usize,
    width: usize,
    height: usize,
    canvas: &'a mut Canvas,
}

impl CanvasSubviewMut<'_> {
    /// Writes text starting at the given position relative to the subview. Text that doesn't fit
    /// within the subview is clipped.
    pub fn set_text(&mut self, x: usize, y: usize, text: &str, style: TextStyle) {
        if y >= self.height || x >= self.width {
            return;
        }
        let space = self.width - x;
        let mut used = 0;
        let chars = text.chars().take_while(|c| {
            used += c.width().unwrap_or(0);
            used <= space
        });
        self.canvas
            .set_text_chars(self.x + x, self.y + y, chars, style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_text() {
        let mut canvas = Canvas::new(10, 2);
        assert_eq!(canvas.to_string(), "\n\n");

        canvas
            .subview_mut(2, 1, 4, 1)
            .set_text(0, 0, "hello", TextStyle::default());
        assert_eq!(canvas.to_string(), "\n  hell\n");
    }

    #[test]
    fn test_canvas_wide_chars() {
        let mut canvas = Canvas::new(5, 1);
        canvas
            .subview_mut(0, 0, 5, 1)
            .set_text(0, 0, "日本語", TextStyle::default());
        assert_eq!(canvas.to_string(), "日本\n");
    }

    #[test]
    fn test_canvas_ansi() {
        let mut canvas = Canvas::new(3, 1);
        canvas.subview_mut(0, 0, 3, 1).set_text(
            0,
            0,
            "ab",
            TextStyle {
                color: Some(Color::Red),
                weight: Weight::Bold,
            },
        );
        let mut buf = Vec::new();
        canvas.write_ansi(&mut buf).unwrap();
        let s = String::from_utf8(buf).unwrap();
        assert!(s.starts_with("\x1b[0m"));
        assert!(s.contains("ab"));
        assert!(s.ends_with("\x1b[K\r\n\x1b[0m"));
    }
}
