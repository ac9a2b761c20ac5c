pub mod binary;
pub mod obj;

mod error;

pub use error::{MeshError, MeshResult, Stage};
