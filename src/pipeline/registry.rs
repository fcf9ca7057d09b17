//! Shader families known to the driver

use std::collections::BTreeMap;

use crate::language::{Defines, Variables};
use crate::pipeline::inputs::Material;
use crate::pipeline::material::*;

/// Adjusts placeholder variables and defines for a material.
pub type Prepare = fn(&Material, &mut Variables, &mut Defines);

/// What the driver knows about one family of generated shaders: which
/// passes it rewrites and how the material settings are applied.
#[derive(Clone)]
pub struct Variant {
    pub passes: Vec<String>,
    pub prepare: Option<Prepare>,
}

impl Variant {
    pub fn new(passes: &[&str], prepare: Option<Prepare>) -> Variant {
        Variant {
            passes: passes
                .iter()
                .map(|pass| pass.to_string())
                .collect(),
            prepare,
        }
    }

    pub fn includes_pass(&self, name: &str) -> bool {
        self.passes
            .iter()
            .any(|pass| pass == name)
    }
}

#[derive(Clone, Default)]
pub struct Registry {
    variants: BTreeMap<String, Variant>,
}

impl Registry {
    pub fn new() -> Registry {
        Registry::default()
    }

    /// Add a family, replacing any earlier registration under the same
    /// tag.
    pub fn register(&mut self, tag: &str, variant: Variant) {
        self.variants
            .insert(tag.to_string(), variant);
    }

    pub fn lookup(&self, tag: &str) -> Option<&Variant> {
        self.variants
            .get(tag)
    }

    /// The Unlit family and the four High Definition families.
    pub fn builtin() -> Registry {
        let mut registry = Registry::new();

        registry.register(
            "Unlit",
            Variant::new(
                &[
                    "ShadowCaster",
                    "SceneSelectionPass",
                    "DepthForwardOnly",
                    "MotionVectors",
                    "ForwardOnly",
                    "META",
                ],
                None,
            ),
        );
        registry.register(
            "HDLit",
            Variant::new(
                &[
                    "GBuffer",
                    "ShadowCaster",
                    "DepthOnly",
                    "SceneSelectionPass",
                    "META",
                    "MotionVectors",
                    "DistortionVectors",
                    "TransparentDepthPrepass",
                    "TransparentBackface",
                    "Forward",
                    "TransparentDepthPostpass",
                ],
                Some(prepare_hd_lit),
            ),
        );
        registry.register(
            "Fabric",
            Variant::new(
                &[
                    "ShadowCaster",
                    "DepthForwardOnly",
                    "SceneSelectionPass",
                    "META",
                    "MotionVectors",
                    "ForwardOnly",
                ],
                Some(prepare_fabric),
            ),
        );
        registry.register(
            "HDUnlit",
            Variant::new(
                &[
                    "ShadowCaster",
                    "DepthForwardOnly",
                    "SceneSelectionPass",
                    "META",
                    "MotionVectors",
                    "DistortionVectors",
                    "ForwardOnly",
                ],
                Some(prepare_hd_unlit),
            ),
        );
        registry.register(
            "Hair",
            Variant::new(
                &[
                    "ShadowCaster",
                    "SceneSelectionPass",
                    "META",
                    "DepthForwardOnly",
                    "MotionVectors",
                    "TransparentDepthPrepass",
                    "TransparentBackface",
                    "ForwardOnly",
                    "TransparentDepthPostpass",
                ],
                Some(prepare_hair),
            ),
        );

        registry
    }
}
