//! Output formatting for CLI.

mod json;
mod text;

pub use json::{DeleteOutput, JsonFormatter, PathsOutput};
pub use text::TextFormatter;
#[cfg(test)]
mod tests;
