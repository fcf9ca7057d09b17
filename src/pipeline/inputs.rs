//! The request describing one particle output, as supplied by the caller

use serde::Deserialize;

use crate::pipeline::error::GenerationError;
use crate::pipeline::target::TargetSpec;

/// Everything the driver needs besides the shader text itself. Usually
/// read from a JSON document.
#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    /// Shader family tag, looked up in the registry.
    pub family: String,
    #[serde(default)]
    pub target: TargetSpec,
    #[serde(default)]
    pub material: Material,
    pub particles: ParticleInputs,
}

impl Request {
    pub fn from_json(json: &str) -> Result<Request, GenerationError> {
        let request = serde_json::from_str(json)?;
        Ok(request)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Material {
    pub double_sided: bool,
    pub surface: Surface,
    pub alpha_mode: AlphaMode,
    pub subsurface: bool,
    pub receive_ssr: bool,
    pub low_transparent: bool,
}

impl Default for Material {
    fn default() -> Material {
        Material {
            double_sided: false,
            surface: Surface::Opaque,
            alpha_mode: AlphaMode::Alpha,
            subsurface: false,
            receive_ssr: true,
            low_transparent: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Surface {
    #[default]
    Opaque,
    Transparent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlphaMode {
    #[default]
    Alpha,
    Premultiply,
    Additive,
}

/// How particles are drawn, which decides the body of the generated
/// vertex entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    Mesh,
    Triangle,
    Quad,
    Octagon,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ParticleInputs {
    pub primitive: Primitive,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    /// Names of the attributes written by blocks of the output itself.
    #[serde(default)]
    pub modified_by_output: Vec<String>,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub vertex_functions: String,
    #[serde(default)]
    pub vertex_shader_content: String,
    #[serde(default)]
    pub load_attributes: String,
    /// Declarations replacing the constant buffer of each pass.
    #[serde(default)]
    pub parameters: String,
    /// Expression overriding the object space position, if any.
    #[serde(default)]
    pub position: Option<String>,
}

impl ParticleInputs {
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes
            .iter()
            .any(|attribute| attribute.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Attribute {
    pub name: String,
    #[serde(rename = "type")]
    pub value_type: ValueType,
}

/// A shader property exposed by the graph. The declaration is the HLSL
/// variable declaration without a trailing semicolon, for example
/// `float4 Color_6F1B`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Property {
    pub display_name: String,
    pub declaration: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Float,
    Float2,
    Float3,
    Float4,
    #[serde(alias = "int")]
    Int32,
    #[serde(alias = "uint")]
    Uint32,
    Texture2D,
    Texture2DArray,
    Texture3D,
    TextureCube,
    TextureCubeArray,
    #[serde(alias = "float4x4")]
    Matrix4x4,
    Curve,
    ColorGradient,
    Mesh,
    Spline,
    #[serde(alias = "bool")]
    Boolean,
}

impl ValueType {
    /// The HLSL spelling of this type. Curves, gradients, meshes, and
    /// splines are sampled through other means and have none.
    pub fn hlsl(&self) -> Option<&'static str> {
        match self {
            ValueType::Float => Some("float"),
            ValueType::Float2 => Some("float2"),
            ValueType::Float3 => Some("float3"),
            ValueType::Float4 => Some("float4"),
            ValueType::Int32 => Some("int"),
            ValueType::Uint32 => Some("uint"),
            ValueType::Texture2D => Some("Texture2D"),
            ValueType::Texture2DArray => Some("Texture2DArray"),
            ValueType::Texture3D => Some("Texture3D"),
            ValueType::TextureCube => Some("TextureCube"),
            ValueType::TextureCubeArray => Some("TextureCubeArray"),
            ValueType::Matrix4x4 => Some("float4x4"),
            ValueType::Boolean => Some("bool"),
            ValueType::Curve | ValueType::ColorGradient | ValueType::Mesh | ValueType::Spline => None,
        }
    }
}
