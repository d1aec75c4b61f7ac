//! Width-tagged numeric views over byte buffers.
//!
//! Vertex and index data arrive as plain bytes. Filters and index codecs read
//! them as little-endian lanes of a fixed width through these views instead of
//! reinterpreting the buffer in place.

use byteorder::{ByteOrder, LittleEndian};
use num_traits::{AsPrimitive, PrimInt};

use crate::status::{invalid_parameter, StatusResult};

/// Width of a single lane in bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneWidth {
    Bits8,
    Bits16,
    Bits32,
}

impl LaneWidth {
    pub const fn byte_length(self) -> usize {
        match self {
            LaneWidth::Bits8 => 1,
            LaneWidth::Bits16 => 2,
            LaneWidth::Bits32 => 4,
        }
    }

    pub const fn bits(self) -> u32 {
        self.byte_length() as u32 * 8
    }
}

/// A fixed-width little-endian integer that can be stored in a lane.
pub trait Lane: PrimInt + AsPrimitive<f32> + 'static {
    const WIDTH: LaneWidth;

    /// Truncating conversion, matching an `as` cast.
    fn from_i32(v: i32) -> Self;

    fn read(bytes: &[u8]) -> Self;

    fn write(self, bytes: &mut [u8]);
}

impl Lane for i8 {
    const WIDTH: LaneWidth = LaneWidth::Bits8;

    #[inline]
    fn from_i32(v: i32) -> Self {
        v as i8
    }

    #[inline]
    fn read(bytes: &[u8]) -> Self {
        bytes[0] as i8
    }

    #[inline]
    fn write(self, bytes: &mut [u8]) {
        bytes[0] = self as u8;
    }
}

impl Lane for i16 {
    const WIDTH: LaneWidth = LaneWidth::Bits16;

    #[inline]
    fn from_i32(v: i32) -> Self {
        v as i16
    }

    #[inline]
    fn read(bytes: &[u8]) -> Self {
        LittleEndian::read_i16(bytes)
    }

    #[inline]
    fn write(self, bytes: &mut [u8]) {
        LittleEndian::write_i16(bytes, self)
    }
}

impl Lane for u32 {
    const WIDTH: LaneWidth = LaneWidth::Bits32;

    #[inline]
    fn from_i32(v: i32) -> Self {
        v as u32
    }

    #[inline]
    fn read(bytes: &[u8]) -> Self {
        LittleEndian::read_u32(bytes)
    }

    #[inline]
    fn write(self, bytes: &mut [u8]) {
        LittleEndian::write_u32(bytes, self)
    }
}

/// Mutable view of a byte buffer as consecutive lanes of type `T`.
///
/// The buffer length must be a multiple of the lane width.
pub struct LaneViewMut<'a, T: Lane> {
    bytes: &'a mut [u8],
    _lane: std::marker::PhantomData<T>,
}

impl<'a, T: Lane> LaneViewMut<'a, T> {
    pub fn new(bytes: &'a mut [u8]) -> StatusResult<Self> {
        if bytes.len() % T::WIDTH.byte_length() != 0 {
            return Err(invalid_parameter(format!(
                "buffer of {} bytes is not a whole number of {}-bit lanes",
                bytes.len(),
                T::WIDTH.bits()
            )));
        }
        Ok(Self {
            bytes,
            _lane: std::marker::PhantomData,
        })
    }

    pub fn len(&self) -> usize {
        self.bytes.len() / T::WIDTH.byte_length()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> T {
        let w = T::WIDTH.byte_length();
        T::read(&self.bytes[index * w..index * w + w])
    }

    #[inline]
    pub fn set(&mut self, index: usize, value: T) {
        let w = T::WIDTH.byte_length();
        value.write(&mut self.bytes[index * w..index * w + w]);
    }
}

/// Byte width of an index buffer element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexWidth {
    U16,
    U32,
}

impl IndexWidth {
    /// Validates an index size given in bytes.
    pub fn from_byte_width(width: usize) -> StatusResult<Self> {
        match width {
            2 => Ok(IndexWidth::U16),
            4 => Ok(IndexWidth::U32),
            _ => Err(invalid_parameter(format!(
                "index width must be 2 or 4 bytes, got {}",
                width
            ))),
        }
    }

    pub const fn byte_length(self) -> usize {
        match self {
            IndexWidth::U16 => 2,
            IndexWidth::U32 => 4,
        }
    }

    /// Reads index `i`, zero-extended to 32 bits.
    #[inline]
    pub fn read(self, bytes: &[u8], i: usize) -> u32 {
        match self {
            IndexWidth::U16 => LittleEndian::read_u16(&bytes[i * 2..i * 2 + 2]) as u32,
            IndexWidth::U32 => LittleEndian::read_u32(&bytes[i * 4..i * 4 + 4]),
        }
    }

    /// Writes index `i`; 16-bit buffers keep the low half of `value`.
    #[inline]
    pub fn write(self, bytes: &mut [u8], i: usize, value: u32) {
        match self {
            IndexWidth::U16 => LittleEndian::write_u16(&mut bytes[i * 2..i * 2 + 2], value as u16),
            IndexWidth::U32 => LittleEndian::write_u32(&mut bytes[i * 4..i * 4 + 4], value),
        }
    }

    /// Packs indices into a little-endian byte buffer of this width.
    pub fn pack(self, indices: &[u32]) -> Vec<u8> {
        let mut bytes = vec![0u8; indices.len() * self.byte_length()];
        for (i, &index) in indices.iter().enumerate() {
            self.write(&mut bytes, i, index);
        }
        bytes
    }

    /// Unpacks a little-endian byte buffer of this width.
    pub fn unpack(self, bytes: &[u8]) -> Vec<u32> {
        (0..bytes.len() / self.byte_length())
            .map(|i| self.read(bytes, i))
            .collect()
    }
}
