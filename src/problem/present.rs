use shaderlab::{
    formatting::{formatter, Render},
    language::*,
};

/// Trait for Document types that can present themselves via a renderer
pub trait Present {
    /// Present this value using the given renderer
    fn present(&self, renderer: &dyn Render) -> String;
}

impl Present for Pass {
    fn present(&self, renderer: &dyn Render) -> String {
        formatter::render_pass(self, renderer)
            .trim_end()
            .to_string()
    }
}
