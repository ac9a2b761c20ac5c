use std::fs;

use meshbin::loaders::obj::{self, parse_mtl, ObjLoadOptions};
use meshbin::scene::{Group, Model, VertexLayout, ILLUM_AMBIENT, ILLUM_DIFFUSE_SPECULAR};
use meshbin::MeshError;

fn model_with_groups(groups: &[(&str, Option<&str>)]) -> Model {
    let mut model = Model::new("scene", VertexLayout::Full);
    for (name, material) in groups {
        let mut group = Group::new(name);
        group.material_name = material.map(str::to_string);
        model.groups.push(group);
    }
    model
}

#[test]
fn ambient_colour_selects_illumination_model() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lib.mtl");
    fs::write(
        &path,
        "newmtl dark\nKa 0 0 0\nKd 0.5 0.5 0.5\n\nnewmtl lit\nKa 0.2 0 0\nillum 1\n",
    )
    .unwrap();

    let mut model = Model::new("scene", VertexLayout::Full);
    assert_eq!(parse_mtl::parse(&path, &mut model).unwrap(), 2);

    let dark = &model.materials[0];
    assert_eq!(dark.name, "dark");
    assert_eq!(dark.illumination_model, ILLUM_DIFFUSE_SPECULAR);
    assert_eq!(dark.ambient, [1.0, 1.0, 1.0, 1.0]);

    let lit = &model.materials[1];
    assert_eq!(lit.illumination_model, ILLUM_AMBIENT);
    assert_eq!(lit.ambient, [0.2, 0.0, 0.0, 1.0]);
}

#[test]
fn groups_bind_to_materials_by_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lib.mtl");
    fs::write(&path, "newmtl red\nKd 1 0 0\nnewmtl blue\nKd 0 0 1\n").unwrap();

    let mut model = model_with_groups(&[
        ("hull", Some("blue")),
        ("sail", Some("red")),
        ("rope", None),
    ]);
    parse_mtl::parse(&path, &mut model).unwrap();

    assert_eq!(model.groups[0].material, Some(1));
    assert_eq!(model.groups[1].material, Some(0));
    assert_eq!(model.groups[2].material, None);
}

#[test]
fn unknown_material_reference_leaves_group_unbound() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lib.mtl");
    fs::write(&path, "newmtl red\nKd 1 0 0\n").unwrap();

    let mut model = model_with_groups(&[("hull", Some("chrome"))]);
    assert_eq!(parse_mtl::parse(&path, &mut model).unwrap(), 1);
    assert_eq!(model.groups[0].material, None);

    let unresolved = model.resolve_materials(&path);
    assert_eq!(unresolved.len(), 1);
    assert!(matches!(
        &unresolved[0],
        MeshError::UnresolvedMaterialReference { group, material, .. }
            if group == "hull" && material == "chrome"
    ));
    let message = unresolved[0].to_string();
    assert!(message.contains("lib.mtl: material:"), "{}", message);
}

#[test]
fn duplicate_library_leaves_model_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.mtl");
    let second = dir.path().join("second.mtl");
    fs::write(&first, "newmtl red\nKd 1 0 0\n").unwrap();
    fs::write(&second, "newmtl green\nKd 0 1 0\nnewmtl red\nKd 1 1 0\n").unwrap();

    let mut model = model_with_groups(&[("hull", Some("red"))]);
    parse_mtl::parse(&first, &mut model).unwrap();
    let before = model.clone();

    let error = parse_mtl::parse(&second, &mut model).unwrap_err();
    assert!(matches!(error, MeshError::DuplicateMaterial { line: 3, .. }));
    assert_eq!(model, before);
}

#[test]
fn deleting_materials_unbinds_groups() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lib.mtl");
    fs::write(&path, "newmtl red\nKd 1 0 0\n").unwrap();

    let mut model = model_with_groups(&[("hull", Some("red"))]);
    parse_mtl::parse(&path, &mut model).unwrap();
    model.delete_materials();

    assert!(model.materials.is_empty());
    assert_eq!(model.groups[0].material, None);
    assert_eq!(model.groups[0].material_name.as_deref(), Some("red"));
}

#[test]
fn obj_import_pulls_in_its_library() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("box.obj"),
        "mtllib box.mtl\nv 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\ng lid\nusemtl wood\nf 1 2 3 4\n",
    )
    .unwrap();
    fs::write(dir.path().join("box.mtl"), "newmtl wood\nKa 0.1 0.1 0\nNs 500\n").unwrap();

    let model = obj::load(&dir.path().join("box.obj"), &ObjLoadOptions::default()).unwrap();

    assert_eq!(model.index_count(), 6);
    assert_eq!(model.vertex_count(), 4);
    let lid = &model.groups[model.find_group("lid").unwrap()];
    assert_eq!(lid.material, Some(0));
    assert_eq!(model.materials[0].shininess, 64.0);
    assert_eq!(model.materials[0].illumination_model, ILLUM_AMBIENT);
}

#[test]
fn obj_import_can_skip_materials() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tri.obj");
    fs::write(
        &path,
        "mtllib absent.mtl\nv 0 0 0\nv 1 0 0\nv 0 1 0\nusemtl paint\nf 1 2 3\n",
    )
    .unwrap();

    let options = ObjLoadOptions {
        load_materials: false,
    };
    let model = obj::load(&path, &options).unwrap();

    assert!(model.materials.is_empty());
    assert_eq!(model.groups.len(), 1);
    assert_eq!(model.groups[0].material_name.as_deref(), Some("paint"));
    assert_eq!(model.groups[0].material, None);
}

#[test]
fn obj_import_reads_every_library_on_one_mtllib_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pair.obj");
    fs::write(
        &path,
        "mtllib a.mtl b.mtl\nv 0 0 0\nv 1 0 0\nv 0 1 0\ng left\nusemtl first\nf 1 2 3\n\
         g right\nusemtl second\nf 3 2 1\n",
    )
    .unwrap();
    fs::write(dir.path().join("a.mtl"), "newmtl first\nKd 1 0 0\n").unwrap();
    fs::write(dir.path().join("b.mtl"), "newmtl second\nKd 0 1 0\n").unwrap();

    let model = obj::load(&path, &ObjLoadOptions::default()).unwrap();

    let names: Vec<&str> = model.materials.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["first", "second"]);
    assert_eq!(model.groups[0].material, Some(0));
    assert_eq!(model.groups[1].material, Some(1));
}
