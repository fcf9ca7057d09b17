//! Material preparation for the High Definition shader families. Each
//! function adjusts the placeholder variables to suit the material
//! settings, much as the material inspector would.

use crate::language::{Defines, Variables};
use crate::pipeline::inputs::{AlphaMode, Material, Surface};

// stencil usage
const REGULAR_LIGHTING: i32 = 2;
const SPLIT_LIGHTING: i32 = 1;

// stencil bits
const LIGHTING_MASK: i32 = 3;
const DECALS_FORWARD_OUTPUT_NORMAL_BUFFER: i32 = 16;
const DOESNT_RECEIVE_SSR: i32 = 32;
const DISTORTION_VECTORS: i32 = 64;
const OBJECT_MOTION_VECTORS: i32 = 128;

/// Stencil references and write masks, one pair per group of passes.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Stencil {
    reference: i32,
    write_mask: i32,
    reference_depth: i32,
    write_mask_depth: i32,
    reference_gbuffer: i32,
    write_mask_gbuffer: i32,
    reference_mv: i32,
    write_mask_mv: i32,
}

impl Stencil {
    fn new() -> Stencil {
        let tagged = DOESNT_RECEIVE_SSR | DECALS_FORWARD_OUTPUT_NORMAL_BUFFER;
        Stencil {
            reference: REGULAR_LIGHTING,
            write_mask: LIGHTING_MASK,
            reference_depth: 0,
            write_mask_depth: tagged,
            reference_gbuffer: REGULAR_LIGHTING,
            write_mask_gbuffer: LIGHTING_MASK | tagged,
            reference_mv: OBJECT_MOTION_VECTORS,
            write_mask_mv: OBJECT_MOTION_VECTORS | tagged,
        }
    }

    fn split_lighting(&mut self) {
        self.reference = SPLIT_LIGHTING;
        self.reference_gbuffer = SPLIT_LIGHTING;
    }

    fn without_ssr(&mut self) {
        self.reference_depth |= DOESNT_RECEIVE_SSR;
        self.reference_gbuffer |= DOESNT_RECEIVE_SSR;
        self.reference_mv |= DOESNT_RECEIVE_SSR;
    }

    fn apply(&self, variables: &mut Variables) {
        let values = [
            ("_StencilRef", self.reference),
            ("_StencilWriteMask", self.write_mask),
            ("_StencilRefDepth", self.reference_depth),
            ("_StencilWriteMaskDepth", self.write_mask_depth),
            ("_StencilRefGBuffer", self.reference_gbuffer),
            ("_StencilWriteMaskGBuffer", self.write_mask_gbuffer),
            ("_StencilRefMV", self.reference_mv),
            ("_StencilWriteMaskMV", self.write_mask_mv),
            ("_StencilRefDistortionVec", DISTORTION_VECTORS),
            ("_StencilWriteMaskDistortionVec", DISTORTION_VECTORS),
        ];
        for (name, value) in values {
            set(variables, name, &value.to_string());
        }
    }
}

fn set(variables: &mut Variables, name: &str, value: &str) {
    variables.insert(name.to_string(), value.to_string());
}

fn cull(material: &Material, variables: &mut Variables) {
    if material.double_sided {
        set(variables, "_CullMode", "Off");
        set(variables, "_CullModeForward", "Off");
    }
}

// Blend factors per surface type. Only some families render into the
// low resolution transparent buffer, where the alpha channel accumulates
// differently.
fn blend(material: &Material, variables: &mut Variables, honours_low_transparent: bool) {
    match material.surface {
        Surface::Opaque => {
            set(variables, "_SrcBlend", "One");
            set(variables, "_DstBlend", "Zero");
            set(variables, "_ZWrite", "On");
            set(variables, "_ZTestDepthEqualForOpaque", "Equal");
        }
        Surface::Transparent => {
            set(variables, "_ZTestDepthEqualForOpaque", "LEqual");
            set(variables, "_ZWrite", "Off");

            let destination = match material.alpha_mode {
                AlphaMode::Alpha | AlphaMode::Premultiply => "OneMinusSrcAlpha",
                AlphaMode::Additive => "One",
            };
            let alpha_source = if honours_low_transparent && material.low_transparent {
                "Zero"
            } else {
                "One"
            };

            set(variables, "_SrcBlend", "One");
            set(variables, "_DstBlend", destination);
            set(variables, "_AlphaSrcBlend", alpha_source);
            set(variables, "_AlphaDstBlend", destination);
        }
    }
}

pub fn prepare_hd_lit(material: &Material, variables: &mut Variables, _defines: &mut Defines) {
    cull(material, variables);

    let mut stencil = Stencil::new();
    if material.subsurface {
        stencil.split_lighting();
    }
    if !material.receive_ssr {
        stencil.without_ssr();
    }
    stencil.apply(variables);

    blend(material, variables, true);
}

pub fn prepare_hd_unlit(material: &Material, variables: &mut Variables, _defines: &mut Defines) {
    cull(material, variables);
    Stencil::new().apply(variables);
    blend(material, variables, true);
}

pub fn prepare_fabric(material: &Material, variables: &mut Variables, _defines: &mut Defines) {
    Stencil::new().apply(variables);
    blend(material, variables, false);
}

pub fn prepare_hair(material: &Material, variables: &mut Variables, _defines: &mut Defines) {
    cull(material, variables);

    let mut stencil = Stencil::new();
    if !material.receive_ssr {
        stencil.without_ssr();
    }
    stencil.apply(variables);

    blend(material, variables, false);
}
