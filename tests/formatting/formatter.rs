#[cfg(test)]
mod formatter {
    use std::fs;
    use std::path::Path;

    use shaderlab::formatting::*;
    use shaderlab::language::*;
    use shaderlab::parsing;

    fn trim(s: &str) -> &str {
        s.strip_prefix('\n')
            .unwrap_or(s)
    }

    fn reformat(content: &str) -> String {
        let document = parsing::parse(content)
            .unwrap_or_else(|e| panic!("Failed to parse: {}\n{}", e, content));
        render(&Identity, &document)
    }

    #[test]
    fn pass_on_one_line_expanded() {
        let result = reformat(
            r#"Pass { Name "Forward" Cull Back Tags { "LightMode" = "ForwardOnly" } HLSLPROGRAM void Foo(){} ENDHLSL }"#,
        );

        assert_eq!(
            result,
            trim(
                r#"
Pass
{
    Name "Forward"
    Tags { "LightMode" = "ForwardOnly" }
    Cull Back
    HLSLPROGRAM
    void Foo()
    {
    }
    ENDHLSL
}
"#
            )
        );
    }

    #[test]
    fn render_state_in_canonical_order() {
        let result = reformat("Pass { Blend One One ZWrite Off ColorMask RGB Cull Front ZTest Always }");

        assert_eq!(
            result,
            trim(
                r#"
Pass
{
    Cull Front
    ZTest Always
    ZWrite Off
    ColorMask RGB
    Blend One One
}
"#
            )
        );
    }

    #[test]
    fn tags_survive_a_round_trip() {
        let source = r#"Pass { Tags { "RenderType"="Opaque" "LightMode" = "GBuffer" "Queue" = "Geometry+1" } }"#;
        let first = parsing::parse(source).unwrap();
        let second = parsing::parse(&first.to_string()).unwrap();

        assert_eq!(first.passes[0].state.tags, second.passes[0].state.tags);
        assert_eq!(
            second.passes[0]
                .state
                .tags
                .len(),
            3
        );
        assert_eq!(second.passes[0].state.tags["Queue"], "Geometry+1");
    }

    #[test]
    fn formatting_is_idempotent() {
        let dir = Path::new("tests/samples/");
        let entries = fs::read_dir(dir).expect("Failed to read samples directory");

        let mut count = 0;
        for entry in entries {
            let path = entry
                .expect("Failed to read directory entry")
                .path();
            if path
                .extension()
                .and_then(|s| s.to_str())
                != Some("shader")
            {
                continue;
            }

            let content = parsing::load(&path)
                .unwrap_or_else(|e| panic!("Failed to load file {:?}: {:?}", path, e));
            let once = reformat(&content);
            let twice = reformat(&once);

            assert_eq!(once, twice, "formatting {:?} is not stable", path);
            assert_eq!(
                parsing::parse(&once).unwrap(),
                parsing::parse(&twice).unwrap()
            );
            count += 1;
        }

        assert!(count > 0, "No .shader files found in samples directory");
    }

    #[test]
    fn braces_balance_in_output() {
        let sources = [
            r#"Pass { Name "Forward" Cull Back Tags { "LightMode" = "ForwardOnly" } HLSLPROGRAM void Foo(){} ENDHLSL }"#,
            "Shader \"A\"\n{\n    SubShader\n    {\n        Pass { Stencil { Ref 2 } }\n        Pass { ZWrite On }\n    }\n}\n",
        ];

        for source in sources {
            let result = reformat(source);
            let opening = result
                .matches('{')
                .count();
            let closing = result
                .matches('}')
                .count();
            assert_eq!(opening, closing, "unbalanced output:\n{}", result);
        }
    }

    #[test]
    fn substitutions_written_out() {
        let mut document = parsing::parse(trim(
            r#"
Pass
{
    Cull [_CullMode]
    Stencil
    {
        WriteMask [_StencilWriteMask]
        Ref [_StencilRef]
    }
}
"#,
        ))
        .unwrap();

        let mut variables = Variables::new();
        variables.insert("_CullMode".to_string(), "Off".to_string());
        variables.insert("_StencilRef".to_string(), "2".to_string());
        document.apply_variable_substitutions(&variables);

        assert_eq!(
            document.to_string(),
            trim(
                r#"
Pass
{
    Cull Off
    Stencil
    {
        WriteMask [_StencilWriteMask]
        Ref 2
    }
}
"#
            )
        );
    }

    #[test]
    fn shared_block_gains_lines() {
        let mut document = parsing::parse("Pass { Name \"A\" }").unwrap();

        document
            .shared_mut()
            .lines
            .push("#define UNITY_VFX_ACTIVE 1".to_string());

        assert_eq!(
            document.to_string(),
            "HLSLINCLUDE\n#define UNITY_VFX_ACTIVE 1\nENDHLSL\nPass\n{\n    Name \"A\"\n}\n"
        );
    }

    #[test]
    fn terminal_highlighting() {
        let document = parsing::parse(r#"Pass { Name "Forward" }"#).unwrap();

        let plain = render(&Identity, &document);
        let highlighted = render(&Terminal, &document);

        assert!(highlighted.contains("\u{1b}["));
        assert!(highlighted.contains("Forward"));
        assert_ne!(plain, highlighted);
    }
}
