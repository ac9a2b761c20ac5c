//! Loader and exporter for a compact binary mesh format, with OBJ import
//! and MTL material libraries.

pub mod app;
pub mod loaders;
pub mod scene;

pub use loaders::{MeshError, MeshResult, Stage};
