use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::loaders::error::{MeshError, MeshResult, Stage};
use crate::scene::{Material, Model, Rgba};

use super::index::{directive_value, parse_components, LineContext};

/// Parses the material library at `path` into `model`.
///
/// Materials are appended in file order and every group's material name is
/// resolved afterwards. On error the model is left as it was. Returns the
/// number of materials added.
pub fn parse(path: &Path, model: &mut Model) -> MeshResult<usize> {
    let added = append(path, model)?;
    let unresolved = model.resolve_materials(path);
    log::info!(
        "{}: {} materials loaded, {} unresolved group references",
        path.display(),
        added,
        unresolved.len()
    );
    Ok(added)
}

/// Like [`parse`], but leaves group bindings alone so several libraries can
/// be loaded before resolving once.
pub fn append(path: &Path, model: &mut Model) -> MeshResult<usize> {
    let file = File::open(path).map_err(|e| MeshError::io(path, Stage::Open, e))?;
    let materials = read_materials(BufReader::new(file), path, &model.materials)?;
    let added = materials.len();

    model.materials.extend(materials);
    log::debug!("{}: {} materials read", path.display(), added);
    Ok(added)
}

/// Reads materials from `reader`, rejecting names already present in
/// `existing` or repeated within the source.
pub fn read_materials<R: BufRead>(
    reader: R,
    path: &Path,
    existing: &[Material],
) -> MeshResult<Vec<Material>> {
    let mut materials: Vec<Material> = Vec::new();
    let mut current_material: Option<Material> = None;

    for (line_number, line_result) in reader.lines().enumerate() {
        let ctx = LineContext {
            path,
            stage: Stage::Material,
            line: line_number + 1,
        };
        let line = line_result.map_err(|e| MeshError::io(path, Stage::Material, e))?;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();

        if parts[0] == "newmtl" {
            if let Some(material) = current_material.take() {
                materials.push(finish(material));
            }

            let name = directive_value(line, "newmtl", &ctx)?;
            let duplicate = existing
                .iter()
                .chain(materials.iter())
                .any(|material| material.name == name);
            if duplicate {
                return Err(MeshError::DuplicateMaterial {
                    path: path.to_path_buf(),
                    line: ctx.line,
                    name: name.to_string(),
                });
            }
            current_material = Some(Material::new(name));
            continue;
        }

        let material = match current_material.as_mut() {
            Some(material) => material,
            None => {
                log::warn!(
                    "{}: line {}: '{}' before any newmtl, ignored",
                    path.display(),
                    ctx.line,
                    parts[0]
                );
                continue;
            }
        };

        match parts[0] {
            "Ka" => material.ambient = parse_color(&parts, material.ambient, &ctx)?,
            "Kd" => material.diffuse = parse_color(&parts, material.diffuse, &ctx)?,
            "Ks" => material.specular = parse_color(&parts, material.specular, &ctx)?,
            "Ke" => material.emission = parse_color(&parts, material.emission, &ctx)?,
            "Ns" => {
                // Ns runs 0..1000, fixed-function shininess 0..128.
                let exponent = parse_components(&parts, 1, 0, &ctx)?[0];
                material.shininess = exponent / 1000.0 * 128.0;
            }
            "Ni" => material.optical_density = parse_components(&parts, 1, 0, &ctx)?[0],
            "d" => {
                // `-halo` changes how dissolve is applied, not its value.
                let values: Vec<&str> = parts.iter().copied().filter(|&p| p != "-halo").collect();
                material.dissolve = parse_components(&values, 1, 0, &ctx)?[0];
            }
            "Tr" => material.dissolve = 1.0 - parse_components(&parts, 1, 0, &ctx)?[0],
            "map_Kd" => material.texture_path = Some(texture_path(&parts, &ctx)?),
            "illum" => {
                log::debug!(
                    "{}: line {}: illum is derived from Ka, '{}' ignored",
                    path.display(),
                    ctx.line,
                    line
                );
            }
            other => {
                log::debug!(
                    "{}: line {}: unknown keyword '{}'",
                    path.display(),
                    ctx.line,
                    other
                );
            }
        }
    }

    if let Some(material) = current_material {
        materials.push(finish(material));
    }

    Ok(materials)
}

fn finish(mut material: Material) -> Material {
    material.derive_illumination();
    material
}

/// RGB with an optional alpha; a missing alpha keeps the previous one.
/// CIE XYZ and spectral curves are skipped and leave `previous` in place.
fn parse_color(parts: &[&str], previous: Rgba, ctx: &LineContext) -> MeshResult<Rgba> {
    if let Some(&form) = parts.get(1).filter(|&&form| form == "xyz" || form == "spectral") {
        log::warn!(
            "{}: line {}: '{} {}' colours are not supported, value ignored",
            ctx.path.display(),
            ctx.line,
            parts[0],
            form
        );
        return Ok(previous);
    }

    let values = parse_components(parts, 3, 1, ctx)?;
    Ok([
        values[0],
        values[1],
        values[2],
        values.get(3).copied().unwrap_or(previous[3]),
    ])
}

/// File name of a texture statement, skipping any `-option value...`
/// prefix. Names may contain spaces.
fn texture_path(parts: &[&str], ctx: &LineContext) -> MeshResult<String> {
    let mut rest = &parts[1..];

    while let Some((&option, tail)) = rest.split_first() {
        let (required, optional) = match option {
            "-blendu" | "-blendv" | "-bm" | "-boost" | "-cc" | "-clamp" | "-imfchan"
            | "-texres" | "-type" => (1, 0),
            "-mm" => (2, 0),
            "-o" | "-s" | "-t" => (1, 2),
            _ => break,
        };
        if tail.len() < required {
            return Err(ctx.error(format!("texture option '{}' is missing its value", option)));
        }

        // Optional numeric arguments never consume the file name itself.
        let extra = tail[required..]
            .iter()
            .take(optional)
            .take_while(|value| value.parse::<f32>().is_ok())
            .count()
            .min(tail.len().saturating_sub(required + 1));
        rest = &tail[required + extra..];
    }

    if rest.is_empty() {
        return Err(ctx.error(format!("'{}' is missing a texture file", parts[0])));
    }
    Ok(rest.join(" "))
}
