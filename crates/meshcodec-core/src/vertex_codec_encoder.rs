//! Vertex block encoder.
//!
//! Each block is split into byte planes (byte `k` of every vertex). A plane is
//! turned into zigzag deltas against the previous vertex and written as
//! groups of 16 using the smallest [`GroupMode`].

use crate::bit_utils::zigzag8;
use crate::encoder_buffer::EncoderBuffer;
use crate::status::{check_buffer_size, StatusResult};
use crate::vertex_codec_shared::{
    align_to_group, encode_vertex_buffer_bound, group_header_size, validate_vertex_stride,
    vertex_block_size, GroupMode, BYTE_GROUP_SIZE, MAX_VERTEX_STRIDE, VERTEX_BLOCK_MAX_SIZE,
    VERTEX_HEADER,
};

/// Encodes `vertex_count` records of `stride` bytes from `vertices`.
///
/// The result decodes back to `vertices` byte for byte with
/// [`decode_vertex_buffer`](crate::vertex_codec_decoder::decode_vertex_buffer).
pub fn encode_vertex_buffer(
    vertices: &[u8],
    vertex_count: usize,
    stride: usize,
) -> StatusResult<Vec<u8>> {
    validate_vertex_stride(stride)?;
    check_buffer_size("vertex data", vertices.len(), vertex_count, stride)?;

    let mut out = EncoderBuffer::with_capacity(encode_vertex_buffer_bound(vertex_count, stride));
    out.encode_u8(VERTEX_HEADER);

    // The decoder seeds its running state from the tail record, which holds
    // the last vertex; zero-filled for empty buffers.
    let mut tail = [0u8; MAX_VERTEX_STRIDE];
    if vertex_count > 0 {
        tail[..stride].copy_from_slice(&vertices[(vertex_count - 1) * stride..]);
    }
    let mut last_vertex = tail;

    let block_size = vertex_block_size(stride);
    let mut mode_counts = [0usize; 4];
    let mut vertex_offset = 0;

    while vertex_offset < vertex_count {
        let block_len = block_size.min(vertex_count - vertex_offset);
        let block = &vertices[vertex_offset * stride..(vertex_offset + block_len) * stride];
        encode_vertex_block(&mut out, block, block_len, stride, &mut last_vertex, &mut mode_counts);
        vertex_offset += block_len;
    }

    out.encode(&tail[..stride]);

    log::debug!(
        "encoded {} vertices x {} bytes into {} bytes (group modes zero/2-bit/4-bit/literal: {:?})",
        vertex_count,
        stride,
        out.size(),
        mode_counts
    );

    Ok(out.into_vec())
}

fn encode_vertex_block(
    out: &mut EncoderBuffer,
    block: &[u8],
    block_len: usize,
    stride: usize,
    last_vertex: &mut [u8; MAX_VERTEX_STRIDE],
    mode_counts: &mut [usize; 4],
) {
    debug_assert!(block_len > 0 && block_len <= VERTEX_BLOCK_MAX_SIZE);

    // Padding deltas past `block_len` stay zero.
    let mut deltas = [0u8; VERTEX_BLOCK_MAX_SIZE];
    let aligned_len = align_to_group(block_len);

    for k in 0..stride {
        let mut p = last_vertex[k];
        for i in 0..block_len {
            let v = block[i * stride + k];
            deltas[i] = zigzag8(v.wrapping_sub(p));
            p = v;
        }
        encode_byte_plane(out, &deltas[..aligned_len], mode_counts);
    }

    last_vertex[..stride].copy_from_slice(&block[(block_len - 1) * stride..block_len * stride]);

    log::trace!("encoded vertex block of {} elements", block_len);
}

/// Writes the 2-bit group header followed by every group payload.
fn encode_byte_plane(out: &mut EncoderBuffer, deltas: &[u8], mode_counts: &mut [usize; 4]) {
    debug_assert_eq!(deltas.len() % BYTE_GROUP_SIZE, 0);

    let header_size = group_header_size(deltas.len());
    let header_offset = out.reserve_zeroed(header_size);

    for (g, group) in deltas.chunks_exact(BYTE_GROUP_SIZE).enumerate() {
        let (mode, size) = GroupMode::select(group);
        out.bytes_mut(header_offset + g / 4, 1)[0] |= (mode as u8) << ((g % 4) * 2);

        let before = out.size();
        encode_group(out, group, mode);
        debug_assert_eq!(out.size() - before, size);

        mode_counts[mode as usize] += 1;
    }
}

fn encode_group(out: &mut EncoderBuffer, group: &[u8], mode: GroupMode) {
    match mode {
        GroupMode::Zero => {}
        GroupMode::Literal => out.encode(group),
        GroupMode::Bits2 | GroupMode::Bits4 => {
            let bits = mode.bits_per_value();
            let sentinel = mode.sentinel();
            let per_byte = (8 / bits) as usize;

            // Fixed portion, first value in the most significant bits.
            for chunk in group.chunks_exact(per_byte) {
                let mut byte = 0u8;
                for &v in chunk {
                    let enc = if v >= sentinel { sentinel } else { v };
                    byte = (byte << bits) | enc;
                }
                out.encode_u8(byte);
            }

            // Escaped values as literal bytes, in element order.
            for &v in group {
                if v >= sentinel {
                    out.encode_u8(v);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_buffer() {
        let encoded = encode_vertex_buffer(&[], 0, 8).unwrap();
        assert_eq!(encoded, vec![VERTEX_HEADER, 0, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_rejects_bad_stride() {
        assert!(encode_vertex_buffer(&[0; 6], 1, 6).is_err());
        assert!(encode_vertex_buffer(&[0; 8], 1, 4).is_err());
    }

    #[test]
    fn test_constant_vertices_use_zero_groups() {
        let vertices: Vec<u8> = [1u8, 2, 3, 4].repeat(16);
        let encoded = encode_vertex_buffer(&vertices, 16, 4).unwrap();
        // Tag, four one-byte zero headers, tail record.
        assert_eq!(encoded, vec![VERTEX_HEADER, 0, 0, 0, 0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_bits2_packing_order() {
        let mut group = [0u8; 16];
        group[0] = 1;
        group[1] = 2;
        group[4] = 5;
        let mut out = EncoderBuffer::new();
        encode_group(&mut out, &group, GroupMode::Bits2);
        assert_eq!(out.data(), &[0b0110_0000, 0b1100_0000, 0, 0, 5]);
    }

    #[test]
    fn test_output_within_bound() {
        let vertices: Vec<u8> = (0..300 * 12).map(|i| (i * 7919 % 251) as u8).collect();
        let encoded = encode_vertex_buffer(&vertices, 300, 12).unwrap();
        assert!(encoded.len() <= encode_vertex_buffer_bound(300, 12));
    }
}
