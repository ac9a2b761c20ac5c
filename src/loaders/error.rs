use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::scene::VertexLayout;

/// The part of a file being processed when something went wrong.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Open,
    Header,
    Indices,
    Vertices,
    Geometry,
    Material,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::Open => "open",
            Stage::Header => "header",
            Stage::Indices => "indices",
            Stage::Vertices => "vertices",
            Stage::Geometry => "geometry",
            Stage::Material => "material",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Error)]
pub enum MeshError {
    #[error("{}: {stage}: {source}", .path.display())]
    Io {
        path: PathBuf,
        stage: Stage,
        #[source]
        source: io::Error,
    },
    #[error("{}: header: expected {expected} bytes, got {actual}", .path.display())]
    CorruptHeader {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },
    #[error("{}: {stage}: truncated after {actual} of {expected} elements", .path.display())]
    TruncatedFile {
        path: PathBuf,
        stage: Stage,
        expected: usize,
        actual: usize,
        #[source]
        source: Option<io::Error>,
    },
    #[error("{}: {stage}: cannot allocate {elements} elements ({bytes} bytes)", .path.display())]
    AllocationFailure {
        path: PathBuf,
        stage: Stage,
        elements: usize,
        bytes: usize,
    },
    #[error("{}: {stage}: line {line}: {message}", .path.display())]
    Malformed {
        path: PathBuf,
        stage: Stage,
        line: usize,
        message: String,
    },
    #[error("{}: material: line {line}: duplicate material '{name}'", .path.display())]
    DuplicateMaterial {
        path: PathBuf,
        line: usize,
        name: String,
    },
    #[error(
        "{}: vertices: model holds {} vertices, format expects {}",
        .path.display(),
        .actual,
        .expected
    )]
    LayoutMismatch {
        path: PathBuf,
        expected: VertexLayout,
        actual: VertexLayout,
    },
    #[error("{}: {stage}: {count} elements do not fit a 32-bit count", .path.display())]
    CountOverflow {
        path: PathBuf,
        stage: Stage,
        count: usize,
    },
    #[error(
        "{}: material: group '{group}' references unknown material '{material}'",
        .path.display()
    )]
    UnresolvedMaterialReference {
        path: PathBuf,
        group: String,
        material: String,
    },
}

impl MeshError {
    pub fn io(path: impl Into<PathBuf>, stage: Stage, source: io::Error) -> Self {
        MeshError::Io {
            path: path.into(),
            stage,
            source,
        }
    }

    pub fn malformed(
        path: impl Into<PathBuf>,
        stage: Stage,
        line: usize,
        message: impl Into<String>,
    ) -> Self {
        MeshError::Malformed {
            path: path.into(),
            stage,
            line,
            message: message.into(),
        }
    }

    /// Stage the error was raised in, when it belongs to one.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            MeshError::Io { stage, .. }
            | MeshError::TruncatedFile { stage, .. }
            | MeshError::AllocationFailure { stage, .. }
            | MeshError::Malformed { stage, .. }
            | MeshError::CountOverflow { stage, .. } => Some(*stage),
            MeshError::CorruptHeader { .. } => Some(Stage::Header),
            MeshError::LayoutMismatch { .. } => Some(Stage::Vertices),
            MeshError::DuplicateMaterial { .. } | MeshError::UnresolvedMaterialReference { .. } => {
                Some(Stage::Material)
            }
        }
    }
}

pub type MeshResult<T> = Result<T, MeshError>;
