//! Format constants shared by the triangle and sequence index codecs.

use crate::status::{invalid_parameter, Status};

/// Tag byte of an encoded triangle index buffer.
pub const INDEX_HEADER: u8 = 0xe1;

/// Tag byte of an encoded index sequence.
pub const SEQUENCE_HEADER: u8 = 0xd1;

/// Size of the `codeaux` side table at the end of a triangle stream.
pub const CODEAUX_TABLE_SIZE: usize = 16;

/// Common `(b, c)` vertex-introduction patterns for triangles whose first
/// vertex is new. High nibble describes `b`, low nibble `c`: 0 means a new
/// vertex, `n` means vertex FIFO slot `n - 1`. Only the first 14 entries are
/// addressable from a code byte.
pub const CODEAUX_TABLE: [u8; CODEAUX_TABLE_SIZE] = [
    0x00, 0x76, 0x87, 0x56, 0x67, 0x78, 0xa9, 0x86, 0x65, 0x89, 0x68, 0x98, 0x01, 0x69, 0x00,
    0x00,
];

/// Code-table entries reachable from the low nibble of a fallback code.
pub const CODEAUX_ADDRESSABLE: usize = 14;

/// Edge FIFO slots usable from a code byte; nibble 15 marks a fallback.
pub const EDGE_FIFO_ADDRESSABLE: usize = 15;

/// Third-vertex codes on the shared-edge path.
pub const FEC_NEW: u8 = 0;
pub const FEC_FIFO_LIMIT: u8 = 13;
pub const FEC_DECREMENT: u8 = 13;
pub const FEC_INCREMENT: u8 = 14;
pub const FEC_EXPLICIT: u8 = 15;

/// Fallback code low nibble: first vertex is `next`, control byte follows.
pub const FALLBACK_NEXT: u8 = 14;
/// Fallback code low nibble: first vertex is explicit, control byte follows.
pub const FALLBACK_EXPLICIT: u8 = 15;

/// Control-byte nibble for an explicitly coded vertex.
pub const FE_EXPLICIT: u8 = 15;

/// Vertex FIFO slots addressable from a control-byte nibble (1..=14).
pub const VERTEX_FIFO_ADDRESSABLE: usize = 14;

/// Absolute delta at which the sequence encoder switches baselines.
pub const SEQUENCE_BASELINE_SWITCH: u32 = 30;

/// Widest sequence symbol: a 32-bit zigzag delta plus the baseline bit.
pub const SEQUENCE_SYMBOL_BITS: u32 = 33;

/// Checks that `index_count` describes whole triangles.
pub fn validate_triangle_count(index_count: usize) -> Status {
    if index_count % 3 != 0 {
        return Err(invalid_parameter(format!(
            "triangle index count must be a multiple of 3, got {}",
            index_count
        )));
    }
    Ok(())
}

/// Worst-case size of an encoded triangle index buffer referencing at most
/// `vertex_count` vertices.
pub fn encode_index_buffer_bound(index_count: usize, vertex_count: usize) -> usize {
    let mut vertex_bits = 1;
    while vertex_bits < 32 && vertex_count > 1usize << vertex_bits {
        vertex_bits += 1;
    }
    // Zigzag deltas need one extra bit; varints carry 7 bits per byte.
    let vertex_groups = (vertex_bits + 1 + 6) / 7;
    1 + (index_count / 3) * (2 + 3 * vertex_groups) + CODEAUX_TABLE_SIZE
}

/// Worst-case size of an encoded index sequence.
pub fn encode_index_sequence_bound(index_count: usize) -> usize {
    // A 33-bit symbol fits in five varint bytes.
    1 + index_count * 5
}
