#[cfg(test)]
mod generate {
    use std::path::Path;

    use shaderlab::language::*;
    use shaderlab::parsing::{self, ParsingError};
    use shaderlab::pipeline::*;

    fn inputs() -> (String, Request) {
        let source = parsing::load(Path::new("tests/generated/ForwardUnlit.shader")).unwrap();
        let json = parsing::load(Path::new("tests/generated/ForwardUnlit.json")).unwrap();
        let request = Request::from_json(&json).unwrap();
        (source, request)
    }

    fn generated() -> String {
        let (source, request) = inputs();
        generate(&source, &request, &Registry::builtin()).unwrap()
    }

    fn pass<'d>(document: &'d Document, name: &str) -> &'d Pass {
        document
            .find_pass(name)
            .unwrap_or_else(|| panic!("no pass named {}", name))
    }

    fn position(lines: &[String], text: &str) -> usize {
        lines
            .iter()
            .position(|line| line == text)
            .unwrap_or_else(|| panic!("no line {:?} in\n{}", text, lines.join("\n")))
    }

    #[test]
    fn shared_block_gains_defines_and_includes() {
        let result = generated();
        let document = parsing::parse(&result).unwrap();

        let shared = document
            .preamble
            .shared
            .as_ref()
            .unwrap();
        assert_eq!(
            shared.lines,
            vec![
                "#define UNITY_VFX_ACTIVE 1",
                r#"#include "Packages/com.unity.visualeffectgraph/Shaders/RenderPipeline/HDRP/VFXDefines.hlsl""#,
                "#pragma target 4.5",
            ]
        );
    }

    #[test]
    fn placeholders_resolved_for_material() {
        let result = generated();
        let document = parsing::parse(&result).unwrap();
        let state = &pass(&document, "ForwardOnly").state;

        assert_eq!(state.render_state[&RenderStateKey::Cull], "Back");
        assert_eq!(state.render_state[&RenderStateKey::ZWrite], "On");
        assert_eq!(state.render_state[&RenderStateKey::Blend], "One Zero");
        assert_eq!(state.stencil[&StencilKey::Ref], "2");
        assert_eq!(state.stencil[&StencilKey::WriteMask], "3");
        assert_eq!(state.stencil[&StencilKey::Pass], "Replace");
        assert_eq!(state.tags["LightMode"], "ForwardOnly");
    }

    #[test]
    fn double_sided_transparent_material() {
        let (source, mut request) = inputs();
        request
            .material
            .double_sided = true;
        request
            .material
            .surface = Surface::Transparent;
        request
            .material
            .alpha_mode = AlphaMode::Additive;

        let result = generate(&source, &request, &Registry::builtin()).unwrap();
        let document = parsing::parse(&result).unwrap();
        let state = &pass(&document, "ForwardOnly").state;

        assert_eq!(state.render_state[&RenderStateKey::Cull], "Off");
        assert_eq!(state.render_state[&RenderStateKey::ZWrite], "Off");
        assert_eq!(state.render_state[&RenderStateKey::Blend], "One One");
    }

    #[test]
    fn known_pass_rewritten() {
        let result = generated();
        let document = parsing::parse(&result).unwrap();
        let lines = &pass(&document, "ForwardOnly").source_lines;

        // the varyings structure comes first
        assert_eq!(
            &lines[..4],
            &[
                "struct ParticleMeshToPS",
                "{",
                "    nointerpolation float3 color : COLOR1;",
                "    nointerpolation float alpha : COLOR2;",
            ]
        );
        assert_eq!(lines[4], "};");

        assert!(!lines
            .iter()
            .any(|line| line == "#pragma vertex Vert"));
        assert!(!lines
            .iter()
            .any(|line| line.contains("CBUFFER_START") || line.contains("TEXTURE2D(")));

        let parameters = position(lines, "float4 uniform_b;");
        assert_eq!(lines[parameters + 1], "float3 uniform_c;");

        let forwarded = position(lines, "    output.particleID = input.particleID;");
        assert_eq!(lines[forwarded + 1], "    return output;");

        position(
            lines,
            "    SurfaceDescription surfaceDescription = SurfaceDescriptionFunction(surfaceDescriptionInputs,fragInputs.vparticle);",
        );

        let defines = position(lines, "#define VFX_VARYING_PS_INPUTS VaryingsMeshToDS");
        assert_eq!(lines[defines + 1], "#define VFX_VARYING_POSCS positionRWS");
        assert_eq!(
            lines[defines + 2],
            r#"#include "Packages/com.unity.visualeffectgraph/Shaders/RenderPipeline/HDRP/VFXCommon.cginc""#
        );

        let entry = position(
            lines,
            "PackedVaryingsType ParticleVert(uint id : SV_VertexID,uint instID : SV_InstanceID)",
        );
        assert!(entry > defines);
        position(lines, "    result.vparticle.color = color;");
        position(lines, "    result.vparticle.alpha = alpha;");
        assert_eq!(
            lines
                .last()
                .map(|line| line.as_str()),
            Some("#pragma vertex ParticleVert")
        );
    }

    #[test]
    fn surface_function_loads_the_particle() {
        let result = generated();
        let document = parsing::parse(&result).unwrap();
        let lines = &pass(&document, "ForwardOnly").source_lines;

        let buffer = position(lines, "ByteAddressBuffer attributeBuffer;");
        assert_eq!(
            lines[buffer + 1],
            "SurfaceDescription SurfaceDescriptionFunction(SurfaceDescriptionInputs IN,ParticleMeshToPS vParticle)"
        );
        assert_eq!(
            &lines[buffer + 2..buffer + 18],
            &[
                "{",
                "    uint index = IN.particleID;",
                "    float3 color = asfloat(attributeBuffer.Load3((index * 0x8 + 0x0) << 2));",
                "    float alpha = asfloat(attributeBuffer.Load((index * 0x8 + 0x3) << 2));",
                "    bool alive = (bool)attributeBuffer.Load((index * 0x8 + 0x4) << 2);",
                "    color = vParticle.color;",
                "    alpha = vParticle.alpha;",
                "    float4 Color_1 = float4(color,1);",
                "",
                "    if (!alive) discard;",
                "",
                "    SurfaceDescription surface = (SurfaceDescription)0;",
                "    surface.Color = Color_1.xyz;",
                "    surface.Alpha *= alpha;",
                "    return surface;",
                "}",
            ]
        );
    }

    #[test]
    fn unknown_pass_untouched() {
        let (source, _) = inputs();
        let original = parsing::parse(&source).unwrap();

        let result = generated();
        let document = parsing::parse(&result).unwrap();

        assert_eq!(
            pass(&document, "Picking"),
            pass(&original, "Picking")
        );
    }

    #[test]
    fn output_is_stable_and_clean() {
        let result = generated();

        assert!(!result.contains('\r'));
        assert_eq!(
            result
                .matches("#pragma vertex ParticleVert")
                .count(),
            1
        );

        // writing the result back out changes nothing
        let document = parsing::parse(&result).unwrap();
        assert_eq!(document.to_string(), result);
    }

    #[test]
    fn missing_functions_skipped() {
        let (_, request) = inputs();
        let source = "Pass\n{\n    Name \"ForwardOnly\"\n    HLSLPROGRAM\n    #pragma vertex Vert\n    ENDHLSL\n}\n";

        let result = generate(source, &request, &Registry::builtin()).unwrap();
        let document = parsing::parse(&result).unwrap();
        let lines = &pass(&document, "ForwardOnly").source_lines;

        assert_eq!(lines[0], "struct ParticleMeshToPS");
        assert!(!lines
            .iter()
            .any(|line| line.contains("attributeBuffer;")));
        assert_eq!(
            lines
                .last()
                .map(|line| line.as_str()),
            Some("#pragma vertex ParticleVert")
        );
    }

    #[test]
    fn custom_target_and_registry() {
        let request = Request::from_json(
            r##"{
                "family": "Sprites",
                "target": {
                    "kind": "custom",
                    "includes": ["#include \"Custom.hlsl\""],
                    "pass_includes": ["#include \"CustomPass.hlsl\""],
                    "variables": { "_CullMode": "Front" }
                },
                "particles": { "primitive": "triangle" }
            }"##,
        )
        .unwrap();
        let source = "Pass\n{\n    Name \"Main\"\n    Cull [_CullMode]\n}\n";

        let mut registry = Registry::new();
        registry.register("Sprites", Variant::new(&["Main"], None));

        let result = generate(source, &request, &registry).unwrap();
        let document = parsing::parse(&result).unwrap();

        assert_eq!(
            document
                .preamble
                .shared
                .as_ref()
                .map(|program| program.lines.clone()),
            Some(vec![
                "#define UNITY_VFX_ACTIVE 1".to_string(),
                "#include \"Custom.hlsl\"".to_string(),
            ])
        );

        let main = pass(&document, "Main");
        assert_eq!(main.state.render_state[&RenderStateKey::Cull], "Front");
        assert!(main
            .source_lines
            .iter()
            .any(|line| line == "#include \"CustomPass.hlsl\""));
        assert!(!main
            .source_lines
            .iter()
            .any(|line| line.starts_with("#define VFX_VARYING")));
    }

    #[test]
    fn unknown_family_rejected() {
        let (source, mut request) = inputs();
        request.family = "Terrain".to_string();

        assert_eq!(
            generate(&source, &request, &Registry::builtin()),
            Err(GenerationError::UnknownFamily("Terrain".to_string()))
        );
    }

    #[test]
    fn malformed_shader_rejected() {
        let (_, request) = inputs();

        assert_eq!(
            generate(r#"Pass { Tags { "OnlyKey" } }"#, &request, &Registry::builtin()),
            Err(GenerationError::Parsing(ParsingError::DanglingTag(
                14,
                "OnlyKey".to_string()
            )))
        );
    }

    #[test]
    fn unsupported_varying_rejected() {
        let (source, mut request) = inputs();
        request
            .particles
            .attributes
            .push(Attribute {
                name: "ramp".to_string(),
                value_type: ValueType::ColorGradient,
            });
        request
            .particles
            .modified_by_output
            .push("ramp".to_string());
        request
            .particles
            .properties
            .push(Property {
                display_name: "Ramp".to_string(),
                declaration: "float4 Ramp_2".to_string(),
            });

        assert_eq!(
            generate(&source, &request, &Registry::builtin()),
            Err(GenerationError::UnsupportedAttribute(
                "ramp".to_string(),
                ValueType::ColorGradient
            ))
        );
    }
}
