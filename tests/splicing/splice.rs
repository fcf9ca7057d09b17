#[cfg(test)]
mod splice {
    use shaderlab::language::*;
    use shaderlab::parsing;
    use shaderlab::splicing::*;

    fn trim(s: &str) -> &str {
        s.strip_prefix('\n')
            .unwrap_or(s)
    }

    fn forward_pass() -> Pass {
        let document = parsing::parse(trim(
            r#"
Pass
{
    Name "Forward"
    HLSLPROGRAM
    #include "Packages/com.unity.render-pipelines.high-definition/Runtime/RenderPipeline/ShaderPass/ShaderPassForward.hlsl"

    float4 Shade(float3 normal, float2 uv)
    {
        float4 result = 0;
        if (uv.x > 0.5) { result = 1; }
        return result;
    }

    #pragma vertex Vert
    #pragma fragment Frag
    ENDHLSL
}
"#,
        ))
        .unwrap();

        document
            .passes
            .into_iter()
            .next()
            .unwrap()
    }

    #[test]
    fn extraction_then_reinsertion_restores_the_lines() {
        let mut pass = forward_pass();
        let original = pass
            .source_lines
            .clone();

        let function = pass
            .extract_function("float4", "Shade", &[("float3", "normal"), ("float2", "uv")])
            .unwrap();

        assert_eq!(function.index, 2);
        assert_eq!(
            function.lines,
            vec![
                "float4 Shade(float3 normal, float2 uv)",
                "{",
                "    float4 result = 0;",
                "    if (uv.x > 0.5) { result = 1; }",
                "    return result;",
                "}",
            ]
        );
        assert_eq!(
            pass.source_lines
                .len(),
            original.len() - 6
        );

        pass.insert_lines(Some(function.index), function.lines);
        assert_eq!(pass.source_lines, original);
    }

    #[test]
    fn extraction_needs_matching_parameters() {
        let mut pass = forward_pass();
        let original = pass
            .source_lines
            .clone();

        assert_eq!(pass.extract_function("float4", "Shade", &[("float3", "normal")]), None);
        assert_eq!(pass.extract_function("float3", "Shade", &[("float3", "normal"), ("float2", "uv")]), None);
        assert_eq!(pass.extract_function("float4", "Missing", &[]), None);
        assert_eq!(pass.source_lines, original);
    }

    #[test]
    fn include_replaced_by_code() {
        let mut pass = forward_pass();

        let replaced = pass.replace_include(
            "Packages/com.unity.render-pipelines.high-definition/Runtime/RenderPipeline/ShaderPass/ShaderPassForward.hlsl",
            "\n    #define PARTICLE_FORWARD 1\n    #include \"ParticleForward.hlsl\"\n",
        );

        assert!(replaced);
        assert_eq!(
            &pass.source_lines[..4],
            &[
                "",
                "#define PARTICLE_FORWARD 1",
                "#include \"ParticleForward.hlsl\"",
                "",
            ]
        );
        assert!(!pass.replace_include("ShaderPassForward.hlsl", "int x;"));
    }

    #[test]
    fn pragma_removed_and_entry_appended() {
        let mut pass = forward_pass();

        assert_eq!(pass.remove_lines_containing("#pragma vertex Vert"), 1);
        pass.insert_code(
            None,
            "    PackedVaryingsType ParticleVert(AttributesMesh inputMesh)\n    {\n        return Vert(inputMesh);\n    }",
        );

        let tail: Vec<&str> = pass
            .source_lines
            .iter()
            .rev()
            .take(5)
            .rev()
            .map(|line| line.as_str())
            .collect();
        assert_eq!(
            tail,
            vec![
                "#pragma fragment Frag",
                "PackedVaryingsType ParticleVert(AttributesMesh inputMesh)",
                "{",
                "    return Vert(inputMesh);",
                "}",
            ]
        );
    }

    #[test]
    fn spliced_pass_formats_with_its_indentation() {
        let mut document = parsing::parse("SubShader\n{\n    Pass\n    {\n    }\n}\n").unwrap();

        document.passes[0].insert_code(Some(0), "void Foo()\n{\n    return;\n}");

        assert_eq!(
            document.to_string(),
            trim(
                r#"
SubShader
{
    Pass
    {
        HLSLPROGRAM
        void Foo()
        {
            return;
        }
        ENDHLSL
    }
}
"#
            )
        );
    }

    #[test]
    fn shared_block_splicing() {
        let mut document = parsing::parse(trim(
            r#"
HLSLINCLUDE
#include "Common.hlsl"
ENDHLSL
Pass
{
}
"#,
        ))
        .unwrap();

        let shared = document.shared_mut();
        shared.insert_line(Some(0), "#define UNITY_VFX_ACTIVE 1");
        assert!(shared.replace_include("Common.hlsl", "#include \"VFXCommon.hlsl\""));

        assert_eq!(
            document
                .preamble
                .shared
                .as_ref()
                .map(|program| program.lines.clone()),
            Some(vec![
                "#define UNITY_VFX_ACTIVE 1".to_string(),
                "#include \"VFXCommon.hlsl\"".to_string(),
            ])
        );
    }

    #[test]
    fn unindent_and_trim() {
        let lines = trim_blank_lines(unindent("\n        int a;\n            int b;\n\n"));
        assert_eq!(lines, vec!["int a;", "    int b;"]);
    }
}
