pub mod error;
pub mod export;
pub mod hit;
pub mod paint;
pub mod text;
pub mod theme;

pub use error::RenderError;
pub use export::{EXPORT_FILE_NAME, encode_png};
pub use hit::{Hit, HitPart, hit_test};
pub use paint::render_scene;
pub use text::FontBook;
pub use theme::{RenderOptions, SelectionTheme, color_bytes};
