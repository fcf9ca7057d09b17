//! Formatting a Document back into ShaderLab text

pub mod formatter;
mod renderer;
mod syntax;
mod terminal;

pub use renderer::render;
pub use syntax::*;
pub use terminal::Terminal;
