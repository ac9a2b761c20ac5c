//! Binary model files: a fixed header, `index_count` native-endian `u32`
//! indices, then `vertex_count` vertex records.

use std::io;

use crate::scene::VertexLayout;

mod header;
mod read;
mod write;

pub use header::{decode_header, encode_header, NAME_LEN};
pub use read::{decode, load};
pub use write::{encode, store};

/// The two header/vertex layouts found in the wild.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Format {
    /// 20-byte name, counts, and position+normal+texel vertices.
    #[default]
    Extended,
    /// Counts only, and position-only vertices.
    Legacy,
}

impl Format {
    pub fn header_size(self) -> usize {
        match self {
            Format::Extended => NAME_LEN + 8,
            Format::Legacy => 8,
        }
    }

    pub fn layout(self) -> VertexLayout {
        match self {
            Format::Extended => VertexLayout::Full,
            Format::Legacy => VertexLayout::Position,
        }
    }
}

#[derive(Clone, Debug)]
pub struct BinaryOptions {
    pub format: Format,
    /// Consecutive interrupted or would-block calls tolerated before a
    /// transfer is abandoned.
    pub max_retries: u32,
    /// Upper bound for a single array allocation.
    pub max_allocation_bytes: usize,
}

impl Default for BinaryOptions {
    fn default() -> Self {
        BinaryOptions {
            format: Format::Extended,
            max_retries: 16,
            max_allocation_bytes: 1 << 30,
        }
    }
}

impl BinaryOptions {
    pub fn with_format(format: Format) -> Self {
        BinaryOptions {
            format,
            ..Default::default()
        }
    }
}

fn is_transient(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock
    )
}
