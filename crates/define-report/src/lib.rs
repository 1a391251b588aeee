pub mod json;
pub mod text;

pub use json::{payload, render_json};
pub use text::render_text;
