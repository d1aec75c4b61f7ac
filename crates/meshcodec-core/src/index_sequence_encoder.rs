//! Index sequence encoder for streams without triangle structure, such as
//! point or line lists.

use crate::bit_utils::zigzag32;
use crate::encoder_buffer::EncoderBuffer;
use crate::index_codec_shared::{
    encode_index_sequence_bound, SEQUENCE_BASELINE_SWITCH, SEQUENCE_HEADER,
};
use crate::lane_view::IndexWidth;
use crate::status::{check_buffer_size, StatusResult};

/// Encodes `index_count` indices of `index_size` bytes as deltas against two
/// alternating baselines.
///
/// Each symbol is `(zigzag(delta) << 1) | baseline`. The encoder stays on its
/// current baseline while deltas are small and switches to the other one on a
/// jump, so interleaved runs (e.g. line strips sharing a hub vertex) stay cheap.
pub fn encode_index_sequence(
    indices: &[u8],
    index_count: usize,
    index_size: usize,
) -> StatusResult<Vec<u8>> {
    let width = IndexWidth::from_byte_width(index_size)?;
    check_buffer_size("index data", indices.len(), index_count, index_size)?;

    let mut out = EncoderBuffer::with_capacity(encode_index_sequence_bound(index_count));
    out.encode_u8(SEQUENCE_HEADER);

    let mut last = [0u32; 2];
    let mut current = 0usize;
    let mut switches = 0usize;

    for i in 0..index_count {
        let index = width.read(indices, i);

        let candidate = index.wrapping_sub(last[current]) as i32;
        if candidate.unsigned_abs() >= SEQUENCE_BASELINE_SWITCH {
            current ^= 1;
            switches += 1;
        }

        let delta = index.wrapping_sub(last[current]);
        out.encode_varint_u64(((zigzag32(delta) as u64) << 1) | current as u64);
        last[current] = index;
    }

    log::debug!(
        "encoded index sequence of {} into {} bytes ({} baseline switches)",
        index_count,
        out.size(),
        switches
    );

    Ok(out.into_vec())
}
