use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::loaders::error::{MeshError, MeshResult, Stage};
use crate::scene::{Header, Model};

use super::header::encode_header;
use super::{is_transient, BinaryOptions};

/// Writes `model` to `path` in the layout `load` reads back.
pub fn store(model: &Model, path: &Path, options: &BinaryOptions) -> MeshResult<()> {
    // Nothing is created for a model that cannot be written.
    check_layout(model, path, options)?;
    header_for(model, path)?;

    write_file(path, |writer| encode(model, writer, path, options))?;

    log::info!(
        "{}: stored '{}' ({} vertices, {} indices)",
        path.display(),
        model.name,
        model.vertex_count(),
        model.index_count()
    );
    Ok(())
}

/// Creates `path`, runs `write` against it and flushes. A failed write
/// removes the partial file.
fn write_file<F>(path: &Path, write: F) -> MeshResult<()>
where
    F: FnOnce(&mut BufWriter<File>) -> MeshResult<()>,
{
    let file = File::create(path).map_err(|e| MeshError::io(path, Stage::Open, e))?;
    let mut writer = BufWriter::new(file);

    let result = write(&mut writer).and_then(|()| {
        writer
            .flush()
            .map_err(|e| MeshError::io(path, Stage::Vertices, e))
    });
    drop(writer);

    if result.is_err() {
        if let Err(error) = fs::remove_file(path) {
            log::warn!(
                "{}: could not remove partial output: {}",
                path.display(),
                error
            );
        }
    }
    result
}

/// Writes the header, the index array and the vertex array, in that order.
pub fn encode<W: Write + ?Sized>(
    model: &Model,
    writer: &mut W,
    source: &Path,
    options: &BinaryOptions,
) -> MeshResult<()> {
    check_layout(model, source, options)?;
    let header = header_for(model, source)?;

    drain(
        writer,
        &encode_header(&header, options.format),
        options.max_retries,
    )
    .map_err(|e| MeshError::io(source, Stage::Header, e))?;

    drain(
        writer,
        bytemuck::cast_slice(model.indices.as_slice()),
        options.max_retries,
    )
    .map_err(|e| MeshError::io(source, Stage::Indices, e))?;
    log::debug!("{}: wrote {} indices", source.display(), model.index_count());

    drain(writer, model.vertices.as_bytes(), options.max_retries)
        .map_err(|e| MeshError::io(source, Stage::Vertices, e))?;
    log::debug!(
        "{}: wrote {} vertices",
        source.display(),
        model.vertex_count()
    );

    Ok(())
}

fn check_layout(model: &Model, source: &Path, options: &BinaryOptions) -> MeshResult<()> {
    let expected = options.format.layout();
    if model.layout() != expected {
        return Err(MeshError::LayoutMismatch {
            path: source.to_path_buf(),
            expected,
            actual: model.layout(),
        });
    }
    Ok(())
}

fn header_for(model: &Model, source: &Path) -> MeshResult<Header> {
    let overflow = |stage, count| MeshError::CountOverflow {
        path: source.to_path_buf(),
        stage,
        count,
    };

    let index_count = u32::try_from(model.index_count())
        .map_err(|_| overflow(Stage::Indices, model.index_count()))?;
    let vertex_count = u32::try_from(model.vertex_count())
        .map_err(|_| overflow(Stage::Vertices, model.vertex_count()))?;

    Ok(Header {
        name: model.name.clone(),
        vertex_count,
        index_count,
    })
}

/// Writes all of `buf`, re-issuing the write for the remainder after each
/// short write. Same stall bound as the read side.
fn drain<W: Write + ?Sized>(writer: &mut W, buf: &[u8], max_retries: u32) -> io::Result<()> {
    let mut written = 0;
    let mut stalls = 0;

    while written < buf.len() {
        match writer.write(&buf[written..]) {
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::WriteZero,
                    format!("wrote {} of {} bytes", written, buf.len()),
                ))
            }
            Ok(n) => {
                written += n;
                stalls = 0;
            }
            Err(error) if is_transient(&error) => {
                stalls += 1;
                if stalls > max_retries {
                    return Err(error);
                }
            }
            Err(error) => return Err(error),
        }
    }

    Ok(())
}
