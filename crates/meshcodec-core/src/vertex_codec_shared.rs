//! Constants and group modes shared by the vertex block encoder and decoder.

use crate::status::{invalid_parameter, Status};

/// Tag byte of an encoded vertex buffer.
pub const VERTEX_HEADER: u8 = 0xa0;

/// Upper bound on the bytes covered by one block.
pub const VERTEX_BLOCK_SIZE_BYTES: usize = 8192;

/// Upper bound on the elements covered by one block.
pub const VERTEX_BLOCK_MAX_SIZE: usize = 256;

/// Elements per group, the unit of mode selection.
pub const BYTE_GROUP_SIZE: usize = 16;

pub const MAX_VERTEX_STRIDE: usize = 256;

/// Encoding of one group of 16 zigzag deltas.
///
/// The discriminant is the 2-bit value stored in the block header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupMode {
    /// All deltas are zero, no payload.
    Zero = 0,
    /// 2 bits per delta, value 3 escapes to a literal byte.
    Bits2 = 1,
    /// 4 bits per delta, value 15 escapes to a literal byte.
    Bits4 = 2,
    /// One literal byte per delta.
    Literal = 3,
}

impl GroupMode {
    pub const ALL: [GroupMode; 4] = [
        GroupMode::Zero,
        GroupMode::Bits2,
        GroupMode::Bits4,
        GroupMode::Literal,
    ];

    #[inline]
    pub fn from_bits(bits: u8) -> Self {
        match bits & 3 {
            0 => GroupMode::Zero,
            1 => GroupMode::Bits2,
            2 => GroupMode::Bits4,
            _ => GroupMode::Literal,
        }
    }

    /// Bits used per delta in the packed portion.
    #[inline]
    pub fn bits_per_value(self) -> u32 {
        match self {
            GroupMode::Zero => 0,
            GroupMode::Bits2 => 2,
            GroupMode::Bits4 => 4,
            GroupMode::Literal => 8,
        }
    }

    /// Packed value that signals a literal escape byte.
    #[inline]
    pub fn sentinel(self) -> u8 {
        ((1u32 << self.bits_per_value()) - 1) as u8
    }

    /// Encoded size of `group` in this mode, or `None` if the mode cannot
    /// represent it.
    pub fn measure(self, group: &[u8]) -> Option<usize> {
        debug_assert_eq!(group.len(), BYTE_GROUP_SIZE);
        match self {
            GroupMode::Zero => group.iter().all(|&v| v == 0).then_some(0),
            GroupMode::Literal => Some(BYTE_GROUP_SIZE),
            GroupMode::Bits2 | GroupMode::Bits4 => {
                let sentinel = self.sentinel();
                let packed = BYTE_GROUP_SIZE * self.bits_per_value() as usize / 8;
                Some(packed + group.iter().filter(|&&v| v >= sentinel).count())
            }
        }
    }

    /// Smallest mode for `group`; ties go to the lower mode.
    pub fn select(group: &[u8]) -> (GroupMode, usize) {
        let mut best = (GroupMode::Literal, BYTE_GROUP_SIZE);
        for mode in GroupMode::ALL.iter().rev() {
            if let Some(size) = mode.measure(group) {
                if size <= best.1 {
                    best = (*mode, size);
                }
            }
        }
        best
    }
}

/// Checks a vertex stride: a multiple of 4 in `[4, 256]`.
pub fn validate_vertex_stride(stride: usize) -> Status {
    if stride == 0 || stride > MAX_VERTEX_STRIDE || stride % 4 != 0 {
        return Err(invalid_parameter(format!(
            "vertex stride must be a multiple of 4 in [4, {}], got {}",
            MAX_VERTEX_STRIDE, stride
        )));
    }
    Ok(())
}

/// Number of vertices per block for the given stride.
pub fn vertex_block_size(stride: usize) -> usize {
    let result = (VERTEX_BLOCK_SIZE_BYTES / stride) & !(BYTE_GROUP_SIZE - 1);
    result.min(VERTEX_BLOCK_MAX_SIZE)
}

/// Header bytes for a byte plane of `element_count` (already group-aligned)
/// elements: 2 bits per group.
#[inline]
pub fn group_header_size(element_count: usize) -> usize {
    (element_count / BYTE_GROUP_SIZE + 3) / 4
}

#[inline]
pub fn align_to_group(count: usize) -> usize {
    (count + BYTE_GROUP_SIZE - 1) & !(BYTE_GROUP_SIZE - 1)
}

/// Worst-case size of an encoded vertex buffer; 0 for a stride the encoder
/// rejects.
pub fn encode_vertex_buffer_bound(vertex_count: usize, stride: usize) -> usize {
    if validate_vertex_stride(stride).is_err() {
        return 0;
    }
    let block_size = vertex_block_size(stride);
    let block_count = (vertex_count + block_size - 1) / block_size;
    let per_plane = group_header_size(block_size) + block_size;
    1 + block_count * stride * per_plane + stride
}
