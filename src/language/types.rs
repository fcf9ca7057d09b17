//! Types representing a parsed ShaderLab document

use std::collections::BTreeMap;

/// Values substituted for `[name]` placeholders in render state and
/// stencil parameters.
pub type Variables = BTreeMap<String, String>;

/// Preprocessor defines injected at the top of the shared program block.
pub type Defines = BTreeMap<String, i32>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub preamble: Preamble,
    pub passes: Vec<Pass>,
    pub epilogue: String,
    /// Brace depth of the shared block and the passes, used for
    /// indentation when writing the document back out.
    pub nesting: usize,
}

impl Document {
    /// The shared program block, created empty if the source had none.
    pub fn shared_mut(&mut self) -> &mut Program {
        self.preamble
            .shared
            .get_or_insert_with(|| Program::new(Marker::HlslInclude))
    }

    pub fn find_pass(&self, name: &str) -> Option<&Pass> {
        self.passes
            .iter()
            .find(|pass| pass.name.as_deref() == Some(name))
    }

    pub fn apply_variable_substitutions(&mut self, variables: &Variables) {
        for pass in self
            .passes
            .iter_mut()
        {
            pass.apply_variable_substitutions(variables);
        }
    }
}

/// Everything ahead of the first pass. The first include block found
/// there is parsed so that code can be spliced into it; the rest is kept
/// verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preamble {
    pub before: String,
    pub shared: Option<Program>,
    pub after: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub marker: Marker,
    pub lines: Vec<String>,
}

impl Program {
    pub fn new(marker: Marker) -> Program {
        Program {
            marker,
            lines: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pass {
    /// Verbatim text that sat between the previous pass and this one.
    pub prefix: String,
    pub name: Option<String>,
    pub state: State,
    pub marker: Option<Marker>,
    pub source_lines: Vec<String>,
}

impl Pass {
    pub fn add_tag(&mut self, key: &str, value: &str) {
        self.state
            .tags
            .insert(key.to_string(), value.to_string());
    }

    /// Render state values have every `[name]` replaced; stencil values
    /// are only replaced when the whole value is exactly `[name]`.
    pub fn apply_variable_substitutions(&mut self, variables: &Variables) {
        for value in self
            .state
            .render_state
            .values_mut()
        {
            for (name, replacement) in variables {
                let placeholder = format!("[{}]", name);
                if value.contains(&placeholder) {
                    *value = value.replace(&placeholder, replacement);
                }
            }
        }

        for value in self
            .state
            .stencil
            .values_mut()
        {
            for (name, replacement) in variables {
                if value.len() == name.len() + 2
                    && value.starts_with('[')
                    && value.ends_with(']')
                    && &value[1..value.len() - 1] == name
                {
                    *value = replacement.clone();
                    break;
                }
            }
        }
    }

    /// Whether a program block is written out for this pass.
    pub fn has_program(&self) -> bool {
        self.marker
            .is_some()
            || !self
                .source_lines
                .is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
    pub tags: BTreeMap<String, String>,
    pub render_state: BTreeMap<RenderStateKey, String>,
    pub stencil: BTreeMap<StencilKey, String>,
}

/// Render state commands kept on a pass, declared in the order they are
/// written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RenderStateKey {
    Cull,
    ZTest,
    ZWrite,
    ZClip,
    ColorMask,
    Blend,
}

impl RenderStateKey {
    pub const ALL: [RenderStateKey; 6] = [
        RenderStateKey::Cull,
        RenderStateKey::ZTest,
        RenderStateKey::ZWrite,
        RenderStateKey::ZClip,
        RenderStateKey::ColorMask,
        RenderStateKey::Blend,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RenderStateKey::Cull => "Cull",
            RenderStateKey::ZTest => "ZTest",
            RenderStateKey::ZWrite => "ZWrite",
            RenderStateKey::ZClip => "ZClip",
            RenderStateKey::ColorMask => "ColorMask",
            RenderStateKey::Blend => "Blend",
        }
    }

    pub fn lookup(name: &str) -> Option<RenderStateKey> {
        Self::ALL
            .into_iter()
            .find(|key| {
                key.as_str()
                    .eq_ignore_ascii_case(name)
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StencilKey {
    ReadMask,
    WriteMask,
    Ref,
    Comp,
    Pass,
    Fail,
    ZFail,
}

impl StencilKey {
    pub const ALL: [StencilKey; 7] = [
        StencilKey::ReadMask,
        StencilKey::WriteMask,
        StencilKey::Ref,
        StencilKey::Comp,
        StencilKey::Pass,
        StencilKey::Fail,
        StencilKey::ZFail,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StencilKey::ReadMask => "ReadMask",
            StencilKey::WriteMask => "WriteMask",
            StencilKey::Ref => "Ref",
            StencilKey::Comp => "Comp",
            StencilKey::Pass => "Pass",
            StencilKey::Fail => "Fail",
            StencilKey::ZFail => "ZFail",
        }
    }

    pub fn lookup(name: &str) -> Option<StencilKey> {
        Self::ALL
            .into_iter()
            .find(|key| {
                key.as_str()
                    .eq_ignore_ascii_case(name)
            })
    }
}

/// Delimiters opening an embedded HLSL or Cg program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    HlslInclude,
    HlslProgram,
    CgInclude,
    CgProgram,
}

impl Marker {
    pub const ALL: [Marker; 4] = [
        Marker::HlslInclude,
        Marker::HlslProgram,
        Marker::CgInclude,
        Marker::CgProgram,
    ];

    pub fn start(&self) -> &'static str {
        match self {
            Marker::HlslInclude => "HLSLINCLUDE",
            Marker::HlslProgram => "HLSLPROGRAM",
            Marker::CgInclude => "CGINCLUDE",
            Marker::CgProgram => "CGPROGRAM",
        }
    }

    pub fn end(&self) -> &'static str {
        match self {
            Marker::HlslInclude | Marker::HlslProgram => "ENDHLSL",
            Marker::CgInclude | Marker::CgProgram => "ENDCG",
        }
    }

    pub fn is_include(&self) -> bool {
        matches!(self, Marker::HlslInclude | Marker::CgInclude)
    }

    pub fn lookup(token: &str) -> Option<Marker> {
        Self::ALL
            .into_iter()
            .find(|marker| {
                marker
                    .start()
                    .eq_ignore_ascii_case(token)
            })
    }
}

/// Whether a token closes a program block.
pub fn is_end_marker(token: &str) -> bool {
    token.eq_ignore_ascii_case("ENDHLSL") || token.eq_ignore_ascii_case("ENDCG")
}

/// Whether a token starts a new parameter, and so terminates a bare
/// value running along the same line.
pub fn is_keyword(token: &str) -> bool {
    token.eq_ignore_ascii_case("Name")
        || token.eq_ignore_ascii_case("Tags")
        || token.eq_ignore_ascii_case("Stencil")
        || RenderStateKey::lookup(token).is_some()
        || StencilKey::lookup(token).is_some()
        || Marker::lookup(token).is_some()
}
