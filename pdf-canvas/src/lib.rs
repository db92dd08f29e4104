pub mod canvas;
pub mod fonts;
pub mod graphics;
pub mod images;
pub mod objects;
pub mod writer;

pub use canvas::{Canvas, A4_HEIGHT, A4_WIDTH};
pub use fonts::{BuiltinFont, FontMetrics};
pub use graphics::Color;
pub use images::{ColorSpace, ImageBox, ImageData, ImageError, ImageFormat};
