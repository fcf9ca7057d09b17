//! Render pipeline targets: what each one contributes to a generated shader

use serde::Deserialize;

use crate::language::{Pass, Variables};
use crate::splicing::Splice;

/// Hooks supplied by the render pipeline the shader is generated for.
pub trait Target {
    /// Values for the `[name]` placeholders in render state, before the
    /// family's prepare function adjusts them.
    fn default_variables(&self) -> Variables;

    /// Lines placed at the top of the shared program block.
    fn includes(&self) -> Vec<String>;

    /// Lines appended to the program of every generated pass.
    fn pass_includes(&self) -> Vec<String>;

    fn modify_pass(&self, _pass: &mut Pass) {}
}

/// Which target a request asks for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TargetSpec {
    #[default]
    HighDefinition,
    Custom(Custom),
}

impl TargetSpec {
    pub fn build(&self) -> Box<dyn Target + '_> {
        match self {
            TargetSpec::HighDefinition => Box::new(HighDefinition),
            TargetSpec::Custom(custom) => Box::new(custom),
        }
    }
}

/// The High Definition Render Pipeline.
pub struct HighDefinition;

const HDRP_DEFAULTS: [(&str, &str); 26] = [
    ("_StencilRef", "2"),
    ("_StencilRefDepth", "0"),
    ("_StencilRefDistortionVec", "64"),
    ("_StencilRefGBuffer", "2"),
    ("_StencilRefMV", "128"),
    ("_StencilWriteMask", "3"),
    ("_StencilWriteMaskDepth", "48"),
    ("_StencilMaskDistortionVec", "64"),
    ("_StencilWriteMaskGBuffer", "51"),
    ("_StencilWriteMaskMV", "176"),
    ("_CullMode", "Back"),
    ("_CullModeForward", "Back"),
    ("_SrcBlend", "One"),
    ("_DstBlend", "Zero"),
    ("_AlphaSrcBlend", "One"),
    ("_AlphaDstBlend", "Zero"),
    ("_ZWrite", "On"),
    ("_ColorMaskTransparentVel", "RGBA"),
    ("_ZTestDepthEqualForOpaque", "Equal"),
    ("_ZTestGBuffer", "LEqual"),
    ("_DistortionSrcBlend", "One"),
    ("_DistortionDstBlend", "Zero"),
    ("_DistortionBlurBlendOp", "Add"),
    ("_ZTestModeDistortion", "Always"),
    ("_DistortionBlurSrcBlend", "One"),
    ("_DistortionBlurDstBlend", "Zero"),
];

impl Target for HighDefinition {
    fn default_variables(&self) -> Variables {
        HDRP_DEFAULTS
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }

    fn includes(&self) -> Vec<String> {
        vec![
            r#"#include "Packages/com.unity.visualeffectgraph/Shaders/RenderPipeline/HDRP/VFXDefines.hlsl""#
                .to_string(),
        ]
    }

    fn pass_includes(&self) -> Vec<String> {
        vec![
            r#"#include "Packages/com.unity.visualeffectgraph/Shaders/RenderPipeline/HDRP/VFXCommon.cginc""#
                .to_string(),
            r#"#include "Packages/com.unity.visualeffectgraph/Shaders/VFXCommon.cginc""#.to_string(),
        ]
    }

    // the particle varyings ride along in the mesh-to-domain structure
    fn modify_pass(&self, pass: &mut Pass) {
        pass.insert_line(None, "#define VFX_VARYING_PS_INPUTS VaryingsMeshToDS");
        pass.insert_line(None, "#define VFX_VARYING_POSCS positionRWS");
    }
}

/// A target described entirely by the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Custom {
    pub includes: Vec<String>,
    pub pass_includes: Vec<String>,
    pub variables: Variables,
}

impl Target for &Custom {
    fn default_variables(&self) -> Variables {
        self.variables
            .clone()
    }

    fn includes(&self) -> Vec<String> {
        self.includes
            .clone()
    }

    fn pass_includes(&self) -> Vec<String> {
        self.pass_includes
            .clone()
    }
}
