use std::path::Path;

use crate::loaders::error::{MeshError, Stage};
use crate::scene::FaceVertex;

/// Where in a text file a value came from, for diagnostics.
#[derive(Clone, Copy)]
pub struct LineContext<'a> {
    pub path: &'a Path,
    pub stage: Stage,
    pub line: usize,
}

impl LineContext<'_> {
    pub fn error(&self, message: impl Into<String>) -> MeshError {
        MeshError::malformed(self.path, self.stage, self.line, message)
    }
}

pub fn parse_f32_component(raw: &str, ctx: &LineContext, label: &str) -> Result<f32, MeshError> {
    raw.parse::<f32>()
        .map_err(|error| ctx.error(format!("invalid {} '{}': {}", label, raw, error)))
}

/// Parses `count` floats after the directive, allowing `optional` more.
pub fn parse_components(
    parts: &[&str],
    count: usize,
    optional: usize,
    ctx: &LineContext,
) -> Result<Vec<f32>, MeshError> {
    let values = &parts[1..];
    if values.len() < count || values.len() > count + optional {
        return Err(ctx.error(format!(
            "'{}' expects {} values, found {}",
            parts[0],
            if optional == 0 {
                count.to_string()
            } else {
                format!("{} to {}", count, count + optional)
            },
            values.len()
        )));
    }

    values
        .iter()
        .map(|raw| parse_f32_component(raw, ctx, parts[0]))
        .collect()
}

/// Parses one `v`, `v/t`, `v//n` or `v/t/n` face corner into 0-based indices.
pub fn parse_face_vertex(
    token: &str,
    ctx: &LineContext,
    positions_len: usize,
    texcoords_len: usize,
    normals_len: usize,
) -> Result<FaceVertex, MeshError> {
    let fields: Vec<&str> = token.split('/').collect();
    if fields.is_empty() || fields.len() > 3 {
        return Err(ctx.error(format!("invalid face vertex token '{}'", token)));
    }

    if fields[0].is_empty() {
        return Err(ctx.error(format!(
            "missing vertex position index in face token '{}'",
            token
        )));
    }

    let position = parse_obj_index(fields[0], positions_len, ctx, "position")?;

    let texel = if fields.len() > 1 && !fields[1].is_empty() {
        Some(parse_obj_index(fields[1], texcoords_len, ctx, "texcoord")?)
    } else {
        None
    };

    let normal = if fields.len() > 2 && !fields[2].is_empty() {
        Some(parse_obj_index(fields[2], normals_len, ctx, "normal")?)
    } else {
        None
    };

    Ok(FaceVertex {
        position,
        texel,
        normal,
    })
}

fn parse_obj_index(
    raw: &str,
    count: usize,
    ctx: &LineContext,
    label: &str,
) -> Result<u32, MeshError> {
    let parsed = raw
        .parse::<i64>()
        .map_err(|error| ctx.error(format!("invalid {} index '{}': {}", label, raw, error)))?;

    if parsed == 0 {
        return Err(ctx.error(format!("{} index 0 is invalid in OBJ format", label)));
    }

    if count == 0 {
        return Err(ctx.error(format!(
            "{} index '{}' referenced before any {} data was defined",
            label, raw, label
        )));
    }

    let resolved = if parsed > 0 {
        parsed - 1
    } else {
        count as i64 + parsed
    };

    if resolved < 0 || resolved as usize >= count {
        return Err(ctx.error(format!(
            "{} index '{}' is out of bounds (count={})",
            label, raw, count
        )));
    }

    u32::try_from(resolved)
        .map_err(|_| ctx.error(format!("{} index '{}' exceeds 32 bits", label, raw)))
}

/// Everything after `directive` on the line, trimmed; names and paths may
/// contain spaces.
pub fn directive_value<'a>(
    line: &'a str,
    directive: &str,
    ctx: &LineContext,
) -> Result<&'a str, MeshError> {
    line.strip_prefix(directive)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ctx.error(format!("directive '{}' is missing a required value", directive)))
}
