use crate::problem::Present;
use shaderlab::{formatting::Render, language::*, parsing::ParsingError};

// a small but complete pass, used to illustrate the expected syntax
fn example_pass() -> Pass {
    let mut pass = Pass {
        name: Some("ForwardOnly".to_string()),
        ..Pass::default()
    };
    pass.add_tag("LightMode", "ForwardOnly");
    pass.state
        .render_state
        .insert(RenderStateKey::Cull, "[_CullMode]".to_string());
    pass.state
        .stencil
        .insert(StencilKey::Ref, "[_StencilRef]".to_string());
    pass.marker = Some(Marker::HlslProgram);
    pass.source_lines = vec!["#pragma vertex Vert".to_string()];
    pass
}

/// Generate problem and detail messages for parsing errors
pub fn generate_error_message(error: &ParsingError, renderer: &dyn Render) -> (String, String) {
    match error {
        ParsingError::UnterminatedString(_) => (
            "Unterminated string".to_string(),
            r#"
A string was opened with '"' but the closing '"' was never found. Strings
may contain escaped quotes written as '\"' but must be closed before the
end of the block they appear in.
            "#
            .trim_ascii()
            .to_string(),
        ),
        ParsingError::UnterminatedBlock(_) => (
            "Unterminated block".to_string(),
            r#"
Every '{' that opens a block must have a corresponding '}' that closes it.
Braces inside strings, comments, and program bodies are not counted.
            "#
            .trim_ascii()
            .to_string(),
        ),
        ParsingError::UnterminatedProgram(_) => (
            "Program block without end marker".to_string(),
            format!(
                r#"
A program block opened with HLSLPROGRAM or HLSLINCLUDE must be closed by
a line starting with ENDHLSL; one opened with CGPROGRAM or CGINCLUDE by a
line starting with ENDCG. For example:

{}
                "#,
                example_pass().present(renderer)
            )
            .trim_ascii()
            .to_string(),
        ),
        ParsingError::UnbalancedBraces(_) => (
            "Unbalanced braces".to_string(),
            r#"
There is a '}' without a '{' that it closes, or the shader ended while
blocks were still open.
            "#
            .trim_ascii()
            .to_string(),
        ),
        ParsingError::DanglingTag(_, key) => (
            format!("Tag '{}' has no value", key),
            format!(
                r#"
Tags are written as pairs of quoted strings, a key and its value,
optionally separated by '='. The tag '{}' was not followed by a value.
A pass with tags looks like:

{}
                "#,
                key,
                example_pass().present(renderer)
            )
            .trim_ascii()
            .to_string(),
        ),
        ParsingError::InvalidTags(_) => (
            "Invalid tags".to_string(),
            format!(
                r#"
Tags must be given as a block enclosed in braces. A pass with tags looks
like:

{}
                "#,
                example_pass().present(renderer)
            )
            .trim_ascii()
            .to_string(),
        ),
        ParsingError::Expected(_, value) => (
            format!("Expected {}", value),
            format!(
                "The parser was looking for {} but found something else.",
                value
            ),
        ),
    }
}
