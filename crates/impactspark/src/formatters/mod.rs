//! Output formatters: Markdown, JSON and reference manager exports.

mod export;
mod json;
mod markdown;

pub use export::*;
pub use self::json::*;
pub use markdown::*;
