use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::loaders::error::{MeshError, MeshResult, Stage};
use crate::scene::{
    Face, FaceVertex, Model, Position, Texel, Vertex, VertexData, DEFAULT_GROUP,
};

use super::index::{directive_value, parse_components, parse_face_vertex, LineContext};
use super::parse_mtl;
use super::types::{ObjGeometry, ObjLoadOptions};

/// Loads an OBJ file into an extended-layout model.
///
/// Material libraries are looked up next to the OBJ file.
pub fn load(path: &Path, options: &ObjLoadOptions) -> MeshResult<Model> {
    let file = File::open(path).map_err(|e| MeshError::io(path, Stage::Open, e))?;
    let ObjGeometry {
        mut model,
        material_libraries,
    } = read_geometry(BufReader::new(file), path)?;

    if options.load_materials {
        attach_materials(&mut model, path, &material_libraries)?;
    }

    log::info!(
        "{}: imported '{}' ({} faces in {} groups, {} vertices)",
        path.display(),
        model.name,
        model.faces.len(),
        model.groups.len(),
        model.vertex_count()
    );
    Ok(model)
}

/// Loads every library next to the OBJ file, then binds groups once.
fn attach_materials(
    model: &mut Model,
    path: &Path,
    libraries: &[String],
) -> MeshResult<Vec<MeshError>> {
    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
    for library in libraries {
        parse_mtl::append(&base_dir.join(library), model)?;
    }
    Ok(model.resolve_materials(path))
}

/// Reads geometry, groups and material references from OBJ text.
pub fn read_geometry<R: BufRead>(reader: R, path: &Path) -> MeshResult<ObjGeometry> {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();
    let mut texcoords: Vec<[f32; 2]> = Vec::new();

    let mut model = Model::default();
    let mut material_libraries = Vec::new();
    let mut current_group: Option<usize> = None;

    for (line_number, line_result) in reader.lines().enumerate() {
        let ctx = LineContext {
            path,
            stage: Stage::Geometry,
            line: line_number + 1,
        };
        let line = line_result.map_err(|e| MeshError::io(path, Stage::Geometry, e))?;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();

        match parts[0] {
            "o" => model.name = directive_value(line, "o", &ctx)?.to_string(),
            "v" => {
                let v = parse_components(&parts, 3, 1, &ctx)?;
                positions.push([v[0], v[1], v[2]]);
            }
            "vn" => {
                let n = parse_components(&parts, 3, 0, &ctx)?;
                normals.push([n[0], n[1], n[2]]);
            }
            "vt" => {
                let t = parse_components(&parts, 2, 1, &ctx)?;
                texcoords.push([t[0], t[1]]);
            }
            "g" => {
                let name = directive_value(line, "g", &ctx).unwrap_or(DEFAULT_GROUP);
                current_group = Some(model.add_group(name));
            }
            "usemtl" => {
                let material = directive_value(line, "usemtl", &ctx)?;
                let group = *current_group.get_or_insert_with(|| model.add_group(DEFAULT_GROUP));
                model.groups[group].material_name = Some(material.to_string());
            }
            "mtllib" => {
                if parts.len() < 2 {
                    return Err(ctx.error("directive 'mtllib' is missing a required value"));
                }
                material_libraries.extend(parts[1..].iter().map(|name| name.to_string()));
            }
            "f" => {
                if parts.len() < 4 {
                    return Err(ctx.error("face requires at least 3 vertices"));
                }

                let corners = parts[1..]
                    .iter()
                    .map(|token| {
                        parse_face_vertex(
                            token,
                            &ctx,
                            positions.len(),
                            texcoords.len(),
                            normals.len(),
                        )
                    })
                    .collect::<MeshResult<Vec<FaceVertex>>>()?;

                let group = *current_group.get_or_insert_with(|| model.add_group(DEFAULT_GROUP));

                // Polygons become a fan around the first corner.
                for i in 1..corners.len() - 1 {
                    let id = u32::try_from(model.faces.len()).map_err(|_| {
                        MeshError::CountOverflow {
                            path: path.to_path_buf(),
                            stage: Stage::Geometry,
                            count: model.faces.len(),
                        }
                    })?;
                    model.faces.push(Face {
                        corners: [corners[0], corners[i], corners[i + 1]],
                        id,
                    });
                    model.groups[group].faces.push(id);
                }
            }
            other => log::trace!("{}: line {}: skipping '{}'", path.display(), ctx.line, other),
        }
    }

    let (vertices, indices) = assemble(&model.faces, &positions, &texcoords, &normals, path)?;
    model.vertices = VertexData::Full(vertices);
    model.indices = indices;

    Ok(ObjGeometry {
        model,
        material_libraries,
    })
}

/// Turns every distinct (position, texel, normal) corner into one vertex and
/// lists three indices per face, in face order.
fn assemble(
    faces: &[Face],
    positions: &[[f32; 3]],
    texcoords: &[[f32; 2]],
    normals: &[[f32; 3]],
    path: &Path,
) -> MeshResult<(Vec<Vertex>, Vec<u32>)> {
    let mut vertex_map: HashMap<FaceVertex, u32> = HashMap::new();
    let mut vertices: Vec<Vertex> = Vec::new();
    let mut indices: Vec<u32> = Vec::with_capacity(faces.len() * 3);

    for corner in faces.iter().flat_map(|face| face.corners.iter()) {
        let index = match vertex_map.get(corner) {
            Some(&index) => index,
            None => {
                let index = u32::try_from(vertices.len()).map_err(|_| MeshError::CountOverflow {
                    path: path.to_path_buf(),
                    stage: Stage::Vertices,
                    count: vertices.len(),
                })?;

                vertices.push(Vertex {
                    position: Position::from(positions[corner.position as usize]),
                    normal: corner
                        .normal
                        .map(|n| Position::from(normals[n as usize]))
                        .unwrap_or_default(),
                    texel: corner
                        .texel
                        .map(|t| {
                            let [u, v] = texcoords[t as usize];
                            Texel::new(u, v)
                        })
                        .unwrap_or_default(),
                });
                vertex_map.insert(*corner, index);
                index
            }
        };
        indices.push(index);
    }

    Ok((vertices, indices))
}
