mod counter;
pub use counter::*;

mod image;
pub use image::*;

mod stopwatch;
pub use stopwatch::*;

mod text;
pub use text::*;

mod view;
pub use view::*;
