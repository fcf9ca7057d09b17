//! Rewriting a generated shader so that it draws particles

use tracing::{debug, info};

use crate::language::{Defines, Pass};
use crate::parsing;
use crate::pipeline::error::GenerationError;
use crate::pipeline::inputs::{ParticleInputs, Request};
use crate::pipeline::registry::Registry;
use crate::pipeline::target::Target;
use crate::pipeline::vertex::{particle_vert, varying_struct, VaryingAttribute};
use crate::splicing::Splice;

/// Parse the shader, rewrite every pass the request's family knows
/// about, and serialise the result. Only malformed input, an unknown
/// family, or an attribute with no shader type is an error; a pass
/// missing one of the functions being rewritten just skips that step.
pub fn generate(source: &str, request: &Request, registry: &Registry) -> Result<String, GenerationError> {
    let mut document = parsing::parse(source)?;

    let variant = registry
        .lookup(&request.family)
        .ok_or_else(|| GenerationError::UnknownFamily(request.family.clone()))?;

    let target = request
        .target
        .build();
    let mut variables = target.default_variables();
    let mut defines = Defines::new();

    if let Some(prepare) = variant.prepare {
        prepare(&request.material, &mut variables, &mut defines);
    }

    document
        .shared_mut()
        .insert_lines(Some(0), target.includes());

    defines.insert("UNITY_VFX_ACTIVE".to_string(), 1);

    let particles = &request.particles;
    let varyings = varying_attributes(particles)?;
    let structure = varying_struct(&varyings)?;
    let entry = particle_vert(particles, &varyings)?;

    for pass in document
        .passes
        .iter_mut()
    {
        let known = match &pass.name {
            Some(name) => variant.includes_pass(name),
            None => false,
        };
        if !known {
            continue;
        }

        info!(
            "Generating pass {}",
            pass.name
                .as_deref()
                .unwrap_or_default()
        );
        generate_pass(pass, target.as_ref(), particles, &varyings, &structure, &entry);
    }

    let lines = defines
        .iter()
        .map(|(name, value)| format!("#define {} {}", name, value))
        .collect();
    document
        .shared_mut()
        .insert_lines(Some(0), lines);

    document.apply_variable_substitutions(&variables);

    Ok(document
        .to_string()
        .replace('\r', ""))
}

/// Attributes written by the output that the shader can see: `alpha`
/// always, others only when a property carries the same name.
pub fn varying_attributes(particles: &ParticleInputs) -> Result<Vec<VaryingAttribute>, GenerationError> {
    let mut result = Vec::new();

    for attribute in &particles.attributes {
        let name = &attribute.name;

        if !particles
            .modified_by_output
            .contains(name)
        {
            continue;
        }
        let visible = name == "alpha"
            || particles
                .properties
                .iter()
                .any(|property| {
                    property
                        .display_name
                        .eq_ignore_ascii_case(name)
                });
        if !visible {
            continue;
        }

        let kind = attribute
            .value_type
            .hlsl()
            .ok_or_else(|| GenerationError::UnsupportedAttribute(name.clone(), attribute.value_type))?;

        result.push(VaryingAttribute {
            name: name.clone(),
            kind,
        });
    }

    Ok(result)
}

fn generate_pass(
    pass: &mut Pass,
    target: &dyn Target,
    particles: &ParticleInputs,
    varyings: &[VaryingAttribute],
    structure: &str,
    entry: &str,
) {
    pass.insert_code(Some(0), structure);

    target.modify_pass(pass);
    pass.insert_lines(None, target.pass_includes());

    pass.insert_code(None, entry);
    pass.remove_lines_containing("#pragma vertex Vert");

    forward_particle_id(pass);
    replace_constant_buffer(pass, &particles.parameters);
    pass_varyings_to_surface(pass);
    load_particle_in_surface(pass, particles, varyings);
}

// Where the closing lines of an extracted function begin: the last two
// lines, but never the signature or its opening brace.
fn tail_of(lines: &[String]) -> usize {
    2.max(
        lines
            .len()
            .saturating_sub(2),
    )
}

// indentation for a line inside an extracted function's body
fn body_indent(lines: &[String]) -> String {
    let brace = &lines[1];
    let indent = brace.len()
        - brace
            .trim_start()
            .len();
    format!("{}    ", &brace[..indent])
}

fn forward_particle_id(pass: &mut Pass) {
    let function = pass.extract_function(
        "SurfaceDescriptionInputs",
        "FragInputsToSurfaceDescriptionInputs",
        &[("FragInputs", "input"), ("float3", "viewWS")],
    );

    match function {
        Some(function) => {
            let mut lines = function.lines;
            let line = format!("{}output.particleID = input.particleID;", body_indent(&lines));
            lines.insert(tail_of(&lines), line);
            pass.insert_lines(Some(function.index), lines);
        }
        None => debug!("No FragInputsToSurfaceDescriptionInputs() to forward particleID through"),
    }
}

// The graph's constant buffer, along with the texture declarations that
// follow it, gives way to the particle system's parameters.
fn replace_constant_buffer(pass: &mut Pass, parameters: &str) {
    let start = match pass.index_of_line_matching(crate::regex!(r"CBUFFER_START"), 0) {
        Some(start) => start,
        None => {
            debug!("No constant buffer to replace");
            return;
        }
    };

    if let Some(end) = pass.index_of_line_matching(crate::regex!(r"CBUFFER_END"), start) {
        let lines = pass.lines_mut();
        let mut finish = end + 1;
        while finish < lines.len()
            && (lines[finish]
                .trim()
                .is_empty()
                || lines[finish].contains("TEXTURE2D("))
        {
            finish += 1;
        }
        lines.drain(start..finish);
    }

    pass.insert_code(Some(start), parameters);
}

fn pass_varyings_to_surface(pass: &mut Pass) {
    let re = crate::regex!(
        r"SurfaceDescription\s+surfaceDescription\s*=\s*SurfaceDescriptionFunction\s*\(\s*surfaceDescriptionInputs\s*\);"
    );

    match pass.index_of_line_matching(re, 0) {
        Some(index) => {
            let line = &mut pass.lines_mut()[index];
            let indent = line.len()
                - line
                    .trim_start()
                    .len();
            *line = format!(
                "{}SurfaceDescription surfaceDescription = SurfaceDescriptionFunction(surfaceDescriptionInputs,fragInputs.vparticle);",
                &line[..indent]
            );
        }
        None => debug!("No call to SurfaceDescriptionFunction() to rewrite"),
    }
}

// The surface function takes the particle's varyings as an extra
// argument, loads the particle's attributes, and binds any property that
// shares a name with an attribute before its original body runs.
fn load_particle_in_surface(pass: &mut Pass, particles: &ParticleInputs, varyings: &[VaryingAttribute]) {
    let function = pass.extract_function(
        "SurfaceDescription",
        "SurfaceDescriptionFunction",
        &[("SurfaceDescriptionInputs", "IN")],
    );

    let function = match function {
        Some(function) => function,
        None => {
            debug!("No SurfaceDescriptionFunction() to load particle attributes into");
            return;
        }
    };

    let original = function.lines;
    let indent = body_indent(&original);
    let tail = tail_of(&original);

    let mut lines = vec![
        "SurfaceDescription SurfaceDescriptionFunction(SurfaceDescriptionInputs IN,ParticleMeshToPS vParticle)"
            .to_string(),
        original[1].clone(),
        format!("{}uint index = IN.particleID;", indent),
    ];

    for line in particles
        .load_attributes
        .trim_end()
        .lines()
    {
        if line
            .trim()
            .is_empty()
        {
            lines.push(String::new());
        } else {
            lines.push(format!("{}{}", indent, line.trim_end()));
        }
    }

    for varying in varyings {
        lines.push(format!("{}{1} = vParticle.{1};", indent, varying.name));
    }

    for property in &particles.properties {
        let matching = particles
            .attributes
            .iter()
            .find(|attribute| {
                property
                    .display_name
                    .eq_ignore_ascii_case(&attribute.name)
            });
        if let Some(attribute) = matching {
            let value = if attribute.name == "color" {
                "float4(color,1)".to_string()
            } else {
                attribute
                    .name
                    .clone()
            };
            lines.push(format!("{}{} = {};", indent, property.declaration, value));
        }
    }

    lines.push(String::new());
    lines.push(format!("{}if (!alive) discard;", indent));
    lines.push(String::new());

    lines.extend_from_slice(&original[2..tail]);
    if particles.has_attribute("alpha") {
        lines.push(format!("{}surface.Alpha *= alpha;", indent));
    }
    lines.extend_from_slice(&original[tail..]);

    pass.insert_line(Some(function.index), "ByteAddressBuffer attributeBuffer;");
    pass.insert_lines(Some(function.index + 1), lines);
}
