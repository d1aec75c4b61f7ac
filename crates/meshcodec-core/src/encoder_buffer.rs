/// Growable output buffer for encoded streams.
#[derive(Debug, Clone, Default)]
pub struct EncoderBuffer {
    buffer: Vec<u8>,
}

impl EncoderBuffer {
    /// Create a new empty encoder buffer
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Create a buffer with initial capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Get the current buffer data
    pub fn data(&self) -> &[u8] {
        &self.buffer
    }

    /// Get the current buffer size
    pub fn size(&self) -> usize {
        self.buffer.len()
    }

    pub fn encode_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    /// Encode raw bytes
    pub fn encode(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Encode an unsigned LEB128 varint.
    pub fn encode_varint(&mut self, value: u32) {
        self.encode_varint_u64(value as u64);
    }

    pub fn encode_varint_u64(&mut self, mut value: u64) {
        while value >= 0x80 {
            self.buffer.push((value as u8 & 0x7F) | 0x80);
            value >>= 7;
        }
        self.buffer.push(value as u8);
    }

    /// Append `len` zero bytes and return the offset of the first one.
    ///
    /// Used to reserve header space that is filled in after the payload.
    pub fn reserve_zeroed(&mut self, len: usize) -> usize {
        let offset = self.buffer.len();
        self.buffer.resize(offset + len, 0);
        offset
    }

    /// Mutable access to previously written bytes.
    pub fn bytes_mut(&mut self, offset: usize, len: usize) -> &mut [u8] {
        &mut self.buffer[offset..offset + len]
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.buffer
    }
}
