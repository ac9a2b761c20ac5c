//! Wavefront OBJ geometry and MTL material libraries.

mod index;
mod parse_obj;
mod types;

pub mod parse_mtl;

pub use parse_obj::{load, read_geometry};
pub use types::{ObjGeometry, ObjLoadOptions};
