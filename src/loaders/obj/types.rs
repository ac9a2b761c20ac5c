use crate::scene::Model;

#[derive(Clone, Debug)]
pub struct ObjLoadOptions {
    /// Parse the libraries named by `mtllib` and bind group materials.
    pub load_materials: bool,
}

impl Default for ObjLoadOptions {
    fn default() -> Self {
        ObjLoadOptions {
            load_materials: true,
        }
    }
}

/// Geometry read from an OBJ file, before any material library is parsed.
#[derive(Clone, Debug, Default)]
pub struct ObjGeometry {
    pub model: Model,
    /// `mtllib` values in declaration order, as written in the file.
    pub material_libraries: Vec<String>,
}
