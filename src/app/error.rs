use thiserror::Error;

use crate::loaders::MeshError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Cli(String),
    #[error(transparent)]
    Mesh(#[from] MeshError),
}
