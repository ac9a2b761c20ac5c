use std::fs::File;
use std::io::{self, BufReader, Read};
use std::mem::size_of;
use std::path::Path;

use bytemuck::{Pod, Zeroable};

use crate::loaders::error::{MeshError, MeshResult, Stage};
use crate::scene::{Model, Position, Vertex, VertexData, VertexLayout};

use super::header::decode_header;
use super::{is_transient, BinaryOptions};

/// Opens `path` and decodes a model from it.
pub fn load(path: &Path, options: &BinaryOptions) -> MeshResult<Model> {
    let file = File::open(path).map_err(|e| MeshError::io(path, Stage::Open, e))?;
    let mut reader = BufReader::new(file);

    let model = decode(&mut reader, path, options)?;
    log::info!(
        "{}: loaded '{}' ({} vertices, {} indices)",
        path.display(),
        model.name,
        model.vertex_count(),
        model.index_count()
    );
    Ok(model)
}

/// Decodes a model from any byte source. `source` only labels diagnostics.
///
/// Either the whole model is returned or nothing is: arrays read before a
/// failure are dropped before the error is handed back.
pub fn decode<R: Read + ?Sized>(
    reader: &mut R,
    source: &Path,
    options: &BinaryOptions,
) -> MeshResult<Model> {
    let format = options.format;

    let mut header_bytes = vec![0u8; format.header_size()];
    if let Err(shortfall) = fill(reader, &mut header_bytes, options.max_retries) {
        return Err(match shortfall.error {
            Some(error) if !is_transient(&error) => MeshError::io(source, Stage::Header, error),
            _ => MeshError::CorruptHeader {
                path: source.to_path_buf(),
                expected: header_bytes.len(),
                actual: shortfall.filled,
            },
        });
    }
    let header = decode_header(&header_bytes, format);
    log::debug!(
        "{}: header '{}' declares {} vertices, {} indices",
        source.display(),
        header.name,
        header.vertex_count,
        header.index_count
    );

    let indices: Vec<u32> = read_array(
        reader,
        header.index_count as usize,
        Stage::Indices,
        source,
        options,
    )?;

    let vertex_count = header.vertex_count as usize;
    let vertices = match format.layout() {
        VertexLayout::Position => VertexData::Positions(read_array::<Position, _>(
            reader,
            vertex_count,
            Stage::Vertices,
            source,
            options,
        )?),
        VertexLayout::Full => VertexData::Full(read_array::<Vertex, _>(
            reader,
            vertex_count,
            Stage::Vertices,
            source,
            options,
        )?),
    };

    Ok(Model {
        name: header.name,
        vertices,
        indices,
        ..Default::default()
    })
}

fn read_array<T: Pod, R: Read + ?Sized>(
    reader: &mut R,
    count: usize,
    stage: Stage,
    source: &Path,
    options: &BinaryOptions,
) -> MeshResult<Vec<T>> {
    let mut items = allocate::<T>(count, stage, source, options)?;

    fill(
        reader,
        bytemuck::cast_slice_mut(items.as_mut_slice()),
        options.max_retries,
    )
    .map_err(|shortfall| MeshError::TruncatedFile {
        path: source.to_path_buf(),
        stage,
        expected: count,
        actual: shortfall.filled / size_of::<T>(),
        source: shortfall.error,
    })?;

    log::debug!("{}: read {} {}", source.display(), count, stage);
    Ok(items)
}

fn allocate<T: Pod>(
    count: usize,
    stage: Stage,
    source: &Path,
    options: &BinaryOptions,
) -> MeshResult<Vec<T>> {
    let failure = || MeshError::AllocationFailure {
        path: source.to_path_buf(),
        stage,
        elements: count,
        bytes: count.saturating_mul(size_of::<T>()),
    };

    let bytes = count.checked_mul(size_of::<T>()).ok_or_else(failure)?;
    if bytes > options.max_allocation_bytes {
        return Err(failure());
    }

    let mut items = Vec::new();
    items.try_reserve_exact(count).map_err(|_| failure())?;
    items.resize(count, <T as Zeroable>::zeroed());
    Ok(items)
}

/// How far a transfer got before it stopped.
#[derive(Debug)]
pub(super) struct Shortfall {
    pub filled: usize,
    /// `None` when the source reached end of file.
    pub error: Option<io::Error>,
}

/// Reads until `buf` is full, re-issuing the read for whatever is still
/// missing after each short read.
///
/// Ends with a [`Shortfall`] when the source reports end of file, fails, or
/// stalls for more than `max_retries` consecutive calls.
pub(super) fn fill<R: Read + ?Sized>(
    reader: &mut R,
    buf: &mut [u8],
    max_retries: u32,
) -> Result<(), Shortfall> {
    let mut filled = 0;
    let mut stalls = 0;

    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => return Err(Shortfall { filled, error: None }),
            Ok(n) => {
                filled += n;
                stalls = 0;
            }
            Err(error) if is_transient(&error) => {
                stalls += 1;
                if stalls > max_retries {
                    return Err(Shortfall {
                        filled,
                        error: Some(error),
                    });
                }
            }
            Err(error) => {
                return Err(Shortfall {
                    filled,
                    error: Some(error),
                })
            }
        }
    }

    Ok(())
}
