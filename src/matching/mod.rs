//! Regular expressions used for line matching

mod cache;

/// Build the pattern matching a function definition line such as
/// `float4 Shade(float3 normal, float2 uv)`. Identifiers are escaped so
/// they only ever match literally.
pub fn function_signature(return_type: &str, name: &str, parameters: &[(&str, &str)]) -> String {
    let mut pattern = format!(
        r"^\s*{}\s+{}\s*\(",
        regex::escape(return_type),
        regex::escape(name)
    );

    for (i, (kind, argument)) in parameters
        .iter()
        .enumerate()
    {
        if i > 0 {
            pattern.push_str(r"\s*,");
        }
        pattern.push_str(&format!(
            r"\s*{}\s+{}",
            regex::escape(kind),
            regex::escape(argument)
        ));
    }

    pattern.push_str(r"\s*\)\s*$");
    pattern
}
