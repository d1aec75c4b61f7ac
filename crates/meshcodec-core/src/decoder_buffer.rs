use crate::status::CodecError;

/// Input buffer for reading an encoded stream.
///
/// `DecoderBuffer` provides sequential, bounds-checked byte access. Every read
/// past the end of the underlying slice fails with
/// [`CodecError::UnexpectedEof`], which is how truncated streams are detected.
///
/// # Example
///
/// ```
/// use meshcodec_core::DecoderBuffer;
///
/// let data = [0xd1, 0x96, 0x01];
/// let mut buffer = DecoderBuffer::new(&data);
///
/// assert_eq!(buffer.decode_u8().unwrap(), 0xd1);
/// assert_eq!(buffer.decode_varint().unwrap(), 150);
/// assert_eq!(buffer.remaining_size(), 0);
/// ```
pub struct DecoderBuffer<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> DecoderBuffer<'a> {
    /// Creates a new `DecoderBuffer` from a byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the current read position in bytes.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the number of bytes remaining in the buffer.
    pub fn remaining_size(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Decodes a single byte.
    pub fn decode_u8(&mut self) -> Result<u8, CodecError> {
        match self.data.get(self.pos) {
            Some(&b) => {
                self.pos += 1;
                Ok(b)
            }
            None => Err(CodecError::UnexpectedEof(format!(
                "need 1 byte at offset {}",
                self.pos
            ))),
        }
    }

    /// Decodes and returns a slice of the specified size.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::UnexpectedEof` if not enough bytes remaining.
    pub fn decode_slice(&mut self, size: usize) -> Result<&'a [u8], CodecError> {
        if size > self.remaining_size() {
            return Err(CodecError::UnexpectedEof(format!(
                "need {} bytes, have {}",
                size,
                self.remaining_size()
            )));
        }
        let slice = &self.data[self.pos..self.pos + size];
        self.pos += size;
        Ok(slice)
    }

    /// Decodes a LEB128 unsigned integer of at most 32 bits.
    ///
    /// Bits beyond the 32nd are rejected with [`CodecError::VarintOverflow`].
    pub fn decode_varint(&mut self) -> Result<u32, CodecError> {
        self.decode_varint_bits(32).map(|v| v as u32)
    }

    /// Decodes a LEB128 unsigned integer of at most `max_bits` bits (up to 64).
    pub fn decode_varint_bits(&mut self, max_bits: u32) -> Result<u64, CodecError> {
        debug_assert!(max_bits <= 64);
        let mut val = 0u64;
        let mut shift = 0u32;
        loop {
            let b = self.decode_u8()?;
            let payload = (b & 0x7F) as u64;
            if shift >= max_bits || (max_bits - shift < 7 && payload >> (max_bits - shift) != 0) {
                return Err(CodecError::VarintOverflow);
            }
            val |= payload << shift;
            if (b & 0x80) == 0 {
                return Ok(val);
            }
            shift += 7;
        }
    }

    /// Fails with [`CodecError::TrailingData`] unless the buffer is fully consumed.
    pub fn expect_end(&self) -> Result<(), CodecError> {
        match self.remaining_size() {
            0 => Ok(()),
            n => Err(CodecError::TrailingData(n)),
        }
    }
}
