use byteorder::{ByteOrder, NativeEndian};

use crate::scene::Header;

use super::Format;

/// Size of the name field in the extended header.
pub const NAME_LEN: usize = 20;

/// Decodes a header from exactly `format.header_size()` bytes.
pub fn decode_header(bytes: &[u8], format: Format) -> Header {
    debug_assert_eq!(bytes.len(), format.header_size());

    match format {
        Format::Extended => {
            let field = &bytes[..NAME_LEN];
            let end = field.iter().position(|&b| b == 0).unwrap_or(NAME_LEN);
            Header {
                name: String::from_utf8_lossy(&field[..end]).into_owned(),
                vertex_count: NativeEndian::read_u32(&bytes[NAME_LEN..NAME_LEN + 4]),
                index_count: NativeEndian::read_u32(&bytes[NAME_LEN + 4..NAME_LEN + 8]),
            }
        }
        Format::Legacy => Header {
            name: String::new(),
            vertex_count: NativeEndian::read_u32(&bytes[0..4]),
            index_count: NativeEndian::read_u32(&bytes[4..8]),
        },
    }
}

pub fn encode_header(header: &Header, format: Format) -> Vec<u8> {
    let mut bytes = vec![0u8; format.header_size()];

    match format {
        Format::Extended => {
            let name = fit_name(&header.name);
            if name.len() < header.name.len() {
                log::warn!(
                    "model name '{}' truncated to '{}' to fit the header",
                    header.name,
                    name
                );
            }
            bytes[..name.len()].copy_from_slice(name.as_bytes());
            NativeEndian::write_u32(&mut bytes[NAME_LEN..NAME_LEN + 4], header.vertex_count);
            NativeEndian::write_u32(&mut bytes[NAME_LEN + 4..NAME_LEN + 8], header.index_count);
        }
        Format::Legacy => {
            NativeEndian::write_u32(&mut bytes[0..4], header.vertex_count);
            NativeEndian::write_u32(&mut bytes[4..8], header.index_count);
        }
    }

    bytes
}

/// Longest prefix of `name` that leaves room for a terminating NUL and
/// ends on a character boundary.
fn fit_name(name: &str) -> &str {
    let mut end = name.len().min(NAME_LEN - 1);
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}
