//! Rewriting generated shaders to draw particles from a visual effect

mod driver;
mod error;
mod inputs;
mod material;
mod registry;
mod target;
mod vertex;

pub use driver::{generate, varying_attributes};
pub use error::GenerationError;
pub use inputs::*;
pub use registry::{Prepare, Registry, Variant};
pub use target::{Custom, HighDefinition, Target, TargetSpec};
pub use vertex::{particle_vert, semantic, varying_struct, vertex_header, VaryingAttribute};
