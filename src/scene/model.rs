use std::fmt;
use std::path::Path;

use crate::loaders::MeshError;

use super::bounds;
use super::material::Material;
use super::vertex::{Position, VertexData, VertexLayout};

/// Name of the group that collects faces declared before any `g` line.
pub const DEFAULT_GROUP: &str = "default";

/// Counts and name as they appear at the front of a binary model file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub vertex_count: u32,
    pub index_count: u32,
}

/// One corner of a face, 0-based into the source position/texel/normal lists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FaceVertex {
    pub position: u32,
    pub texel: Option<u32>,
    pub normal: Option<u32>,
}

/// A triangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Face {
    pub corners: [FaceVertex; 3],
    pub id: u32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Group {
    pub name: String,
    /// Indices into `Model::faces`.
    pub faces: Vec<u32>,
    /// Material named by `usemtl`, resolved into `material` once the
    /// material library is known.
    pub material_name: Option<String>,
    /// Index into `Model::materials`; `None` when unset or unresolved.
    pub material: Option<usize>,
}

impl Group {
    pub fn new(name: &str) -> Self {
        Group {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Model {
    pub name: String,
    pub vertices: VertexData,
    pub indices: Vec<u32>,
    pub faces: Vec<Face>,
    pub groups: Vec<Group>,
    pub materials: Vec<Material>,
}

impl Model {
    pub fn new(name: &str, layout: VertexLayout) -> Self {
        Model {
            name: name.to_string(),
            vertices: VertexData::empty(layout),
            ..Default::default()
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn layout(&self) -> VertexLayout {
        self.vertices.layout()
    }

    /// Header describing this model; `None` if a count exceeds `u32`.
    pub fn header(&self) -> Option<Header> {
        Some(Header {
            name: self.name.clone(),
            vertex_count: u32::try_from(self.vertex_count()).ok()?,
            index_count: u32::try_from(self.index_count()).ok()?,
        })
    }

    /// Releases every owned array. Safe on an empty or already unloaded model.
    pub fn unload(&mut self) {
        let layout = self.layout();
        self.vertices = VertexData::empty(layout);
        self.indices = Vec::new();
        self.faces = Vec::new();
        self.groups = Vec::new();
        self.delete_materials();
    }

    pub fn find_material(&self, name: &str) -> Option<usize> {
        self.materials
            .iter()
            .position(|material| material.name == name)
    }

    pub fn find_group(&self, name: &str) -> Option<usize> {
        self.groups.iter().position(|group| group.name == name)
    }

    /// Returns the index of the group called `name`, creating it at the end
    /// of the list if it does not exist yet.
    pub fn add_group(&mut self, name: &str) -> usize {
        match self.find_group(name) {
            Some(index) => index,
            None => {
                self.groups.push(Group::new(name));
                self.groups.len() - 1
            }
        }
    }

    /// Binds every group's material name to an index in `materials`.
    ///
    /// Unknown names leave the group unbound and are returned as
    /// [`MeshError::UnresolvedMaterialReference`] diagnostics labelled with
    /// `source`; they never fail the model.
    pub fn resolve_materials(&mut self, source: &Path) -> Vec<MeshError> {
        let mut unresolved = Vec::new();

        for index in 0..self.groups.len() {
            let resolved = self.groups[index]
                .material_name
                .as_deref()
                .map(|name| (name.to_string(), self.find_material(name)));

            let group = &mut self.groups[index];
            match resolved {
                Some((_, Some(material))) => group.material = Some(material),
                Some((name, None)) => {
                    group.material = None;
                    let error = MeshError::UnresolvedMaterialReference {
                        path: source.to_path_buf(),
                        group: group.name.clone(),
                        material: name,
                    };
                    log::warn!("{}", error);
                    unresolved.push(error);
                }
                None => group.material = None,
            }
        }

        unresolved
    }

    /// Drops the material collection and unbinds every group.
    pub fn delete_materials(&mut self) {
        self.materials = Vec::new();
        for group in &mut self.groups {
            group.material = None;
        }
    }

    pub fn group_faces<'a>(&'a self, group: &'a Group) -> impl Iterator<Item = &'a Face> + 'a {
        group
            .faces
            .iter()
            .filter_map(move |&face| self.faces.get(face as usize))
    }

    pub fn summary(&self) -> ModelSummary {
        ModelSummary {
            name: self.name.clone(),
            layout: self.layout(),
            vertex_count: self.vertex_count(),
            index_count: self.index_count(),
            face_count: self.faces.len(),
            group_count: self.groups.len(),
            material_count: self.materials.len(),
            center: bounds::center_all_axes(self.vertices.positions()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ModelSummary {
    pub name: String,
    pub layout: VertexLayout,
    pub vertex_count: usize,
    pub index_count: usize,
    pub face_count: usize,
    pub group_count: usize,
    pub material_count: usize,
    pub center: Position,
}

impl fmt::Display for ModelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Name: {}", self.name)?;
        writeln!(f, "Layout: {}", self.layout)?;
        writeln!(f, "Vertices: {}", self.vertex_count)?;
        writeln!(f, "Indices: {}", self.index_count)?;
        writeln!(f, "Faces: {}", self.face_count)?;
        writeln!(f, "Groups: {}", self.group_count)?;
        writeln!(f, "Materials: {}", self.material_count)?;
        write!(
            f,
            "Center: [{:.2} {:.2} {:.2}]",
            self.center.x, self.center.y, self.center.z
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::vertex::Vertex;

    fn model_with_group(material: &str) -> Model {
        let mut model = Model::new("crate", VertexLayout::Full);
        let group = model.add_group("body");
        model.groups[group].material_name = Some(material.to_string());
        model
    }

    #[test]
    fn add_group_reuses_existing_name() {
        let mut model = Model::default();
        let first = model.add_group("wheels");
        let second = model.add_group("body");
        let again = model.add_group("wheels");

        assert_eq!((first, second, again), (0, 1, 0));
        assert_eq!(model.groups.len(), 2);
    }

    #[test]
    fn resolve_binds_known_material() {
        let mut model = model_with_group("paint");
        model.materials.push(Material::new("glass"));
        model.materials.push(Material::new("paint"));

        let unresolved = model.resolve_materials(Path::new("crate.mtl"));
        assert!(unresolved.is_empty());
        assert_eq!(model.groups[0].material, Some(1));
    }

    #[test]
    fn resolve_leaves_unknown_material_unset() {
        let mut model = model_with_group("chrome");
        model.materials.push(Material::new("paint"));

        let unresolved = model.resolve_materials(Path::new("crate.mtl"));
        assert_eq!(unresolved.len(), 1);
        assert!(matches!(
            &unresolved[0],
            MeshError::UnresolvedMaterialReference { group, material, .. }
                if group == "body" && material == "chrome"
        ));
        assert_eq!(
            unresolved[0].to_string(),
            "crate.mtl: material: group 'body' references unknown material 'chrome'"
        );
        assert_eq!(model.groups[0].material, None);
    }

    #[test]
    fn find_material_on_empty_collection() {
        let model = Model::default();
        assert_eq!(model.find_material("anything"), None);
    }

    #[test]
    fn unload_is_idempotent() {
        let mut model = model_with_group("paint");
        model.vertices = VertexData::Full(vec![Vertex::default(); 3]);
        model.indices = vec![0, 1, 2];
        model.materials.push(Material::new("paint"));
        model.resolve_materials(Path::new("crate.mtl"));

        model.unload();
        model.unload();

        assert_eq!(model.vertex_count(), 0);
        assert_eq!(model.index_count(), 0);
        assert!(model.groups.is_empty());
        assert!(model.materials.is_empty());
        assert_eq!(model.layout(), VertexLayout::Full);
    }

    #[test]
    fn delete_materials_unbinds_groups() {
        let mut model = model_with_group("paint");
        model.materials.push(Material::new("paint"));
        model.resolve_materials(Path::new("crate.mtl"));

        model.delete_materials();
        assert!(model.materials.is_empty());
        assert_eq!(model.groups[0].material, None);
        assert_eq!(model.groups[0].material_name.as_deref(), Some("paint"));
    }

    #[test]
    fn header_tracks_array_lengths() {
        let mut model = Model::new("tri", VertexLayout::Position);
        model.vertices = VertexData::Positions(vec![Position::default(); 3]);
        model.indices = vec![0, 1, 2, 2, 1, 0];

        let header = model.header().expect("counts fit in u32");
        assert_eq!(header.vertex_count, 3);
        assert_eq!(header.index_count, 6);
        assert_eq!(header.name, "tri");
    }
}
