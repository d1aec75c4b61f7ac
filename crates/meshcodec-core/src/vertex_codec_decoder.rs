use crate::attribute_filter::{apply_filter, FilterKind};
use crate::bit_utils::unzigzag8;
use crate::decoder_buffer::DecoderBuffer;
use crate::status::{check_buffer_size, CodecError, Status};
use crate::vertex_codec_shared::{
    align_to_group, group_header_size, validate_vertex_stride, vertex_block_size, GroupMode,
    BYTE_GROUP_SIZE, MAX_VERTEX_STRIDE, VERTEX_BLOCK_MAX_SIZE, VERTEX_HEADER,
};

/// Decodes a vertex buffer produced by
/// [`encode_vertex_buffer`](crate::vertex_codec_encoder::encode_vertex_buffer).
///
/// `destination` must hold exactly `vertex_count * stride` bytes.
///
/// # Errors
///
/// Precondition errors for a bad stride or destination size; format errors
/// for a wrong tag byte, a truncated stream, or bytes left over between the
/// last block and the tail record.
pub fn decode_vertex_buffer(
    destination: &mut [u8],
    vertex_count: usize,
    stride: usize,
    buffer: &[u8],
) -> Status {
    validate_vertex_stride(stride)?;
    check_buffer_size("destination", destination.len(), vertex_count, stride)?;

    if buffer.len() < 1 + stride {
        return Err(CodecError::UnexpectedEof(format!(
            "vertex buffer of {} bytes is shorter than header and tail",
            buffer.len()
        )));
    }
    if buffer[0] != VERTEX_HEADER {
        return Err(CodecError::InvalidHeader {
            expected: VERTEX_HEADER,
            found: buffer[0],
        });
    }

    let tail_offset = buffer.len() - stride;
    let mut last_vertex = [0u8; MAX_VERTEX_STRIDE];
    last_vertex[..stride].copy_from_slice(&buffer[tail_offset..]);

    let mut data = DecoderBuffer::new(&buffer[1..tail_offset]);
    let block_size = vertex_block_size(stride);
    let mut vertex_offset = 0;

    while vertex_offset < vertex_count {
        let block_len = block_size.min(vertex_count - vertex_offset);
        let block = &mut destination[vertex_offset * stride..(vertex_offset + block_len) * stride];
        decode_vertex_block(&mut data, block, block_len, stride, &mut last_vertex)?;
        vertex_offset += block_len;
    }

    data.expect_end()?;

    log::debug!(
        "decoded {} vertices x {} bytes from {} bytes",
        vertex_count,
        stride,
        buffer.len()
    );
    Ok(())
}

/// Decodes a vertex buffer and then applies `filter` to the result in place.
pub fn decode_vertex_buffer_with_filter(
    destination: &mut [u8],
    vertex_count: usize,
    stride: usize,
    buffer: &[u8],
    filter: FilterKind,
) -> Status {
    // Filter/stride compatibility is a precondition, checked before decoding.
    filter.validate_stride(stride)?;
    decode_vertex_buffer(destination, vertex_count, stride, buffer)?;
    apply_filter(destination, vertex_count, stride, filter)
}

fn decode_vertex_block(
    data: &mut DecoderBuffer,
    block: &mut [u8],
    block_len: usize,
    stride: usize,
    last_vertex: &mut [u8; MAX_VERTEX_STRIDE],
) -> Status {
    let mut deltas = [0u8; VERTEX_BLOCK_MAX_SIZE];
    let aligned_len = align_to_group(block_len);

    for k in 0..stride {
        decode_byte_plane(data, &mut deltas[..aligned_len])?;

        let mut p = last_vertex[k];
        for i in 0..block_len {
            p = p.wrapping_add(unzigzag8(deltas[i]));
            block[i * stride + k] = p;
        }
    }

    last_vertex[..stride].copy_from_slice(&block[(block_len - 1) * stride..block_len * stride]);
    Ok(())
}

fn decode_byte_plane(data: &mut DecoderBuffer, deltas: &mut [u8]) -> Status {
    let header = data.decode_slice(group_header_size(deltas.len()))?;

    for (g, group) in deltas.chunks_exact_mut(BYTE_GROUP_SIZE).enumerate() {
        let mode = GroupMode::from_bits(header[g / 4] >> ((g % 4) * 2));
        decode_group(data, group, mode)?;
    }
    Ok(())
}

fn decode_group(data: &mut DecoderBuffer, group: &mut [u8], mode: GroupMode) -> Status {
    match mode {
        GroupMode::Zero => group.fill(0),
        GroupMode::Literal => group.copy_from_slice(data.decode_slice(BYTE_GROUP_SIZE)?),
        GroupMode::Bits2 | GroupMode::Bits4 => {
            let bits = mode.bits_per_value();
            let sentinel = mode.sentinel();
            let per_byte = (8 / bits) as usize;
            let packed = data.decode_slice(BYTE_GROUP_SIZE / per_byte)?;

            for (chunk, &byte) in group.chunks_exact_mut(per_byte).zip(packed) {
                let mut byte = byte;
                for v in chunk.iter_mut() {
                    let enc = byte >> (8 - bits);
                    byte = byte.wrapping_shl(bits);
                    *v = enc;
                }
            }

            for v in group.iter_mut() {
                if *v == sentinel {
                    *v = data.decode_u8()?;
                }
            }
        }
    }
    Ok(())
}
