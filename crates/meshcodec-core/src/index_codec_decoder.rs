use crate::bit_utils::unzigzag32;
use crate::connectivity_fifo::{EdgeFifo, VertexFifo};
use crate::decoder_buffer::DecoderBuffer;
use crate::index_codec_shared::{
    validate_triangle_count, CODEAUX_ADDRESSABLE, CODEAUX_TABLE_SIZE, FALLBACK_NEXT,
    FEC_DECREMENT, FEC_EXPLICIT, FEC_FIFO_LIMIT, FEC_INCREMENT, FEC_NEW, FE_EXPLICIT,
    INDEX_HEADER,
};
use crate::lane_view::IndexWidth;
use crate::status::{check_buffer_size, CodecError, Status, StatusResult};

/// Decodes a triangle index buffer produced by
/// [`encode_index_buffer`](crate::index_codec_encoder::encode_index_buffer).
///
/// `destination` must hold `index_count * index_size` bytes. With 2-byte
/// indices each decoded value is truncated to its low 16 bits.
///
/// # Errors
///
/// Precondition errors for an index count that is not a multiple of 3, an
/// index size other than 2 or 4, or a mis-sized destination. Format errors for
/// a wrong tag, a buffer too short for the code bytes and side table, a
/// truncated data region, or unread bytes before the side table.
pub fn decode_index_buffer(
    destination: &mut [u8],
    index_count: usize,
    index_size: usize,
    buffer: &[u8],
) -> Status {
    validate_triangle_count(index_count)?;
    let width = IndexWidth::from_byte_width(index_size)?;
    check_buffer_size("destination", destination.len(), index_count, index_size)?;

    let triangle_count = index_count / 3;
    if buffer.len() < 1 + triangle_count + CODEAUX_TABLE_SIZE {
        return Err(CodecError::UnexpectedEof(format!(
            "index buffer of {} bytes cannot hold {} triangles",
            buffer.len(),
            triangle_count
        )));
    }
    if buffer[0] != INDEX_HEADER {
        return Err(CodecError::InvalidHeader {
            expected: INDEX_HEADER,
            found: buffer[0],
        });
    }

    let table_offset = buffer.len() - CODEAUX_TABLE_SIZE;
    let codes = &buffer[1..1 + triangle_count];
    let codeaux_table = &buffer[table_offset..];
    let mut data = DecoderBuffer::new(&buffer[1 + triangle_count..table_offset]);

    let mut decoder = TriangleDecoder::new();
    for (t, &code) in codes.iter().enumerate() {
        let [a, b, c] = decoder.decode_triangle(code, codeaux_table, &mut data)?;
        width.write(destination, t * 3, a);
        width.write(destination, t * 3 + 1, b);
        width.write(destination, t * 3 + 2, c);
    }

    data.expect_end()?;

    log::debug!(
        "decoded {} triangles from {} bytes",
        triangle_count,
        buffer.len()
    );
    Ok(())
}

struct TriangleDecoder {
    edge_fifo: EdgeFifo,
    vertex_fifo: VertexFifo,
    next: u32,
    last: u32,
}

impl TriangleDecoder {
    fn new() -> Self {
        Self {
            edge_fifo: EdgeFifo::new(),
            vertex_fifo: VertexFifo::new(),
            next: 0,
            last: 0,
        }
    }

    fn decode_triangle(
        &mut self,
        code: u8,
        codeaux_table: &[u8],
        data: &mut DecoderBuffer,
    ) -> StatusResult<[u32; 3]> {
        let fe = code >> 4;
        let low = code & 15;

        if fe < 15 {
            return self.decode_shared_edge(fe as usize, low, data);
        }

        if (low as usize) < CODEAUX_ADDRESSABLE {
            let codeaux = codeaux_table[low as usize];
            let a = self.allocate();
            let b = self.table_vertex(codeaux >> 4);
            let c = self.table_vertex(codeaux & 15);
            Ok(self.finish_fallback([a, b, c], [0, codeaux >> 4, codeaux & 15]))
        } else {
            self.decode_fallback_with_control(low, data)
        }
    }

    fn decode_shared_edge(
        &mut self,
        edge_slot: usize,
        fec: u8,
        data: &mut DecoderBuffer,
    ) -> StatusResult<[u32; 3]> {
        let (a, b) = self.edge_fifo.get(edge_slot);

        let c = match fec {
            FEC_NEW => self.allocate(),
            FEC_DECREMENT => {
                self.last = self.last.wrapping_sub(1);
                self.last
            }
            FEC_INCREMENT => {
                self.last = self.last.wrapping_add(1);
                self.last
            }
            FEC_EXPLICIT => self.decode_explicit(data)?,
            slot => self.vertex_fifo.get(slot as usize),
        };

        if fec == FEC_NEW || fec >= FEC_FIFO_LIMIT {
            self.vertex_fifo.push(c);
        }

        // Reversed: edges are stored the way the neighbouring triangle walks them.
        self.edge_fifo.push(c, b);
        self.edge_fifo.push(a, c);

        Ok([a, b, c])
    }

    fn decode_fallback_with_control(
        &mut self,
        low: u8,
        data: &mut DecoderBuffer,
    ) -> StatusResult<[u32; 3]> {
        let control = data.decode_u8()?;
        if control == 0 {
            self.next = 0;
        }

        let fea = if low == FALLBACK_NEXT { 0 } else { FE_EXPLICIT };
        let feb = control >> 4;
        let fec = control & 15;

        // Sequential vertices are allocated before any explicit delta is read.
        let mut a = if fea == 0 { self.allocate() } else { 0 };
        let mut b = if feb == FE_EXPLICIT { 0 } else { self.table_vertex(feb) };
        let mut c = if fec == FE_EXPLICIT { 0 } else { self.table_vertex(fec) };

        if fea == FE_EXPLICIT {
            a = self.decode_explicit(data)?;
        }
        if feb == FE_EXPLICIT {
            b = self.decode_explicit(data)?;
        }
        if fec == FE_EXPLICIT {
            c = self.decode_explicit(data)?;
        }

        Ok(self.finish_fallback([a, b, c], [fea, feb, fec]))
    }

    fn finish_fallback(&mut self, triangle: [u32; 3], codes: [u8; 3]) -> [u32; 3] {
        let [a, b, c] = triangle;

        self.vertex_fifo.push(a);
        if codes[1] == 0 || codes[1] == FE_EXPLICIT {
            self.vertex_fifo.push(b);
        }
        if codes[2] == 0 || codes[2] == FE_EXPLICIT {
            self.vertex_fifo.push(c);
        }

        // Reversed: edges are stored the way the neighbouring triangle walks them.
        self.edge_fifo.push(b, a);
        self.edge_fifo.push(c, b);
        self.edge_fifo.push(a, c);

        triangle
    }

    /// Nibble 0 allocates `next`; `n` reads vertex FIFO slot `n - 1`.
    fn table_vertex(&mut self, nibble: u8) -> u32 {
        if nibble == 0 {
            self.allocate()
        } else {
            self.vertex_fifo.get(nibble as usize - 1)
        }
    }

    fn allocate(&mut self) -> u32 {
        let v = self.next;
        self.next = self.next.wrapping_add(1);
        v
    }

    fn decode_explicit(&mut self, data: &mut DecoderBuffer) -> StatusResult<u32> {
        let delta = unzigzag32(data.decode_varint()?);
        self.last = self.last.wrapping_add(delta);
        Ok(self.last)
    }
}
