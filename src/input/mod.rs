mod reader;
mod text;

pub use reader::InputReader;
pub use text::{RequestText, build_text, join_lines};
