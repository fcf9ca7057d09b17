// Types representing ShaderLab documents, their passes, and render state

mod error;
mod types;

// Re-export all public symbols
pub use error::*;
pub use types::*;
