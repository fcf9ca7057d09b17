//! Generated code carrying particle data through the vertex stage

use serde::Serialize;
use tinytemplate::TinyTemplate;

use crate::pipeline::error::GenerationError;
use crate::pipeline::inputs::{ParticleInputs, Primitive};

/// An attribute modified by the output, passed from the vertex to the
/// pixel stage rather than reloaded from the attribute buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VaryingAttribute {
    pub name: String,
    pub kind: &'static str,
}

#[derive(Serialize)]
struct Slot<'a> {
    kind: &'static str,
    name: &'a str,
    semantic: String,
}

#[derive(Serialize)]
struct Varyings<'a> {
    varyings: Vec<Slot<'a>>,
}

#[derive(Serialize)]
struct Context<'a> {
    vertex_functions: &'a str,
    header: &'static str,
    load_attributes: String,
    vertex_shader_content: String,
    position: Option<&'a str>,
    varyings: &'a [VaryingAttribute],
}

static VARYINGS: &str = r#"struct ParticleMeshToPS
\{
{{ for varying in varyings }}    nointerpolation {varying.kind} {varying.name} : {varying.semantic};
{{ endfor }}};"#;

static PARTICLE_VERT: &str = r#"{vertex_functions}
{header}
    {load_attributes}
    float3 size3 = float3(size,size,size);
    #if VFX_USE_SCALEX_CURRENT
    size3.x *= scaleX;
    #endif
    #if VFX_USE_SCALEY_CURRENT
    size3.y *= scaleY;
    #endif
    #if VFX_USE_SCALEZ_CURRENT
    size3.z *= scaleZ;
    #endif
    {vertex_shader_content}
    float4x4 elementToVFX = GetElementToVFXMatrix(axisX,axisY,axisZ,float3(angleX,angleY,angleZ),float3(pivotX,pivotY,pivotZ),size3,position);
    float3 objectPos = inputMesh.positionOS;
{{ if position }}    objectPos = {position};
{{ endif }}    float3 particlePos = mul(elementToVFX,float4(objectPos,1)).xyz;
    inputMesh.positionOS = particlePos;
    PackedVaryingsType result = Vert(inputMesh);
{{ for varying in varyings }}    result.vparticle.{varying.name} = {varying.name};
{{ endfor }}    result.vmesh.particleID = inputMesh.particleID;
    return result;
}
#pragma vertex ParticleVert"#;

static MESH: &str = r#"PackedVaryingsType ParticleVert(AttributesMesh inputMesh)
{
    uint index = inputMesh.particleID;"#;

static TRIANGLE: &str = r#"PackedVaryingsType ParticleVert(uint id : SV_VertexID)
{
    uint particleID = id / 3;
    uint index = particleID;
    AttributesMesh inputMesh = (AttributesMesh)0;
    const float2 kOffsets[] = {
        float2(-0.5f, -0.288675129413604736328125f),
        float2(0.0f, 0.57735025882720947265625f),
        float2(0.5f, -0.288675129413604736328125f),
    };

    const float kUVScale = 0.866025388240814208984375f;

    inputMesh.positionOS = float3(kOffsets[id % 3],0);
#ifdef ATTRIBUTES_NEED_TEXCOORD0
    inputMesh.uv0.xy = (inputMesh.positionOS.xy * kUVScale) + 0.5f;
#endif
    inputMesh.particleID = particleID;"#;

static QUAD: &str = r#"PackedVaryingsType ParticleVert(uint id : SV_VertexID,uint instID : SV_InstanceID)
{
    uint particleID = (id >> 2) + instID * 2048;
    uint index = particleID;
    AttributesMesh inputMesh = (AttributesMesh)0;
    float2 uv;
    uv.x = float(id & 1);
    uv.y = float((id & 2) >> 1);
#ifdef ATTRIBUTES_NEED_TEXCOORD0
    inputMesh.uv0.xy = uv;
#endif
    inputMesh.positionOS = float3(uv - 0.5f,0);
    inputMesh.particleID = particleID;"#;

static OCTAGON: &str = r#"PackedVaryingsType ParticleVert(uint id : SV_VertexID,uint instID : SV_InstanceID)
{
    uint particleID = (id >> 3) + instID * 1024;
    uint index = particleID;
    AttributesMesh inputMesh = (AttributesMesh)0;
    const float2 kUvs[8] =
    {
        float2(-0.5f, 0.0f),
        float2(-0.5f, 0.5f),
        float2(0.0f, 0.5f),
        float2(0.5f, 0.5f),
        float2(0.5f, 0.0f),
        float2(0.5f, -0.5f),
        float2(0.0f, -0.5f),
        float2(-0.5f, -0.5f),
    };

    float cf = id & 1 ? 1.0f - cropFactor : 1.0f;
    inputMesh.positionOS = float3(kUvs[id & 7] * cf,0);
#ifdef ATTRIBUTES_NEED_TEXCOORD0
    inputMesh.uv0.xy = inputMesh.positionOS.xy + 0.5f;
#endif
    inputMesh.particleID = particleID;"#;

/// Opening of the `ParticleVert` entry point, up to where the particle's
/// attributes are loaded.
pub fn vertex_header(primitive: Primitive) -> &'static str {
    match primitive {
        Primitive::Mesh => MESH,
        Primitive::Triangle => TRIANGLE,
        Primitive::Quad => QUAD,
        Primitive::Octagon => OCTAGON,
    }
}

/// Interpolator semantic for the nth varying, counting from zero. The
/// nine colour interpolators are used first, then the normal ones from
/// NORMAL2 up.
pub fn semantic(index: usize) -> String {
    let number = index + 1;
    if number < 10 {
        format!("COLOR{}", number)
    } else {
        format!("NORMAL{}", number - 10 + 2)
    }
}

/// The `ParticleMeshToPS` structure declaring one interpolator per
/// varying attribute.
pub fn varying_struct(varyings: &[VaryingAttribute]) -> Result<String, GenerationError> {
    let context = Varyings {
        varyings: varyings
            .iter()
            .enumerate()
            .map(|(i, varying)| Slot {
                kind: varying.kind,
                name: &varying.name,
                semantic: semantic(i),
            })
            .collect(),
    };

    render("varyings", VARYINGS, &context)
}

/// The `ParticleVert` entry point, which positions the particle then
/// defers to the pass's own `Vert` function.
pub fn particle_vert(
    particles: &ParticleInputs,
    varyings: &[VaryingAttribute],
) -> Result<String, GenerationError> {
    let context = Context {
        vertex_functions: particles
            .vertex_functions
            .trim_end(),
        header: vertex_header(particles.primitive),
        load_attributes: continue_lines(&particles.load_attributes),
        vertex_shader_content: continue_lines(&particles.vertex_shader_content),
        position: particles
            .position
            .as_deref(),
        varyings,
    };

    render("particle_vert", PARTICLE_VERT, &context)
}

// indent the continuation lines of a block substituted after four spaces
fn continue_lines(code: &str) -> String {
    code.trim_end()
        .replace('\n', "\n    ")
}

fn render<C: Serialize>(name: &str, template: &str, context: &C) -> Result<String, GenerationError> {
    let mut tt = TinyTemplate::new();
    tt.set_default_formatter(&tinytemplate::format_unescaped);
    tt.add_template(name, template)?;

    let rendered = tt.render(name, context)?;
    Ok(rendered)
}
