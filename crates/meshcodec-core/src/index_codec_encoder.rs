//! Triangle index buffer encoder.
//!
//! Every triangle becomes one code byte. Triangles that share an edge with a
//! recently emitted triangle reference that edge by its edge FIFO slot and
//! only describe the third vertex; the rest fall back to describing all three
//! vertices, using the `codeaux` table for common patterns.

use crate::bit_utils::zigzag32;
use crate::connectivity_fifo::{EdgeFifo, VertexFifo};
use crate::encoder_buffer::EncoderBuffer;
use crate::encoder_options::EncoderOptions;
use crate::index_codec_shared::{
    validate_triangle_count, CODEAUX_ADDRESSABLE, CODEAUX_TABLE, EDGE_FIFO_ADDRESSABLE,
    FALLBACK_EXPLICIT, FALLBACK_NEXT, FEC_DECREMENT, FEC_EXPLICIT, FEC_FIFO_LIMIT, FEC_INCREMENT,
    FEC_NEW, FE_EXPLICIT, INDEX_HEADER, VERTEX_FIFO_ADDRESSABLE,
};
use crate::lane_view::IndexWidth;
use crate::status::{check_buffer_size, StatusResult};

/// Encodes a triangle list of `index_count` indices, each `index_size` bytes.
///
/// The stream decodes to exactly the input bytes.
pub fn encode_index_buffer(
    indices: &[u8],
    index_count: usize,
    index_size: usize,
) -> StatusResult<Vec<u8>> {
    encode_index_buffer_with_options(indices, index_count, index_size, &EncoderOptions::default())
}

pub fn encode_index_buffer_with_options(
    indices: &[u8],
    index_count: usize,
    index_size: usize,
    options: &EncoderOptions,
) -> StatusResult<Vec<u8>> {
    validate_triangle_count(index_count)?;
    let width = IndexWidth::from_byte_width(index_size)?;
    check_buffer_size("index data", indices.len(), index_count, index_size)?;

    let triangle_count = index_count / 3;
    let mut codes = Vec::with_capacity(triangle_count);
    let mut data = EncoderBuffer::new();
    let mut encoder = TriangleEncoder::new(options.rotate_triangles());

    for t in 0..triangle_count {
        let triangle = [
            width.read(indices, t * 3),
            width.read(indices, t * 3 + 1),
            width.read(indices, t * 3 + 2),
        ];
        codes.push(encoder.encode_triangle(triangle, &mut data));
    }

    let mut out = EncoderBuffer::with_capacity(1 + codes.len() + data.size() + CODEAUX_TABLE.len());
    out.encode_u8(INDEX_HEADER);
    out.encode(&codes);
    out.encode(data.data());
    out.encode(&CODEAUX_TABLE);

    log::debug!(
        "encoded {} triangles into {} bytes ({} shared-edge, {} data bytes)",
        triangle_count,
        out.size(),
        encoder.shared_edge_count,
        data.size()
    );

    Ok(out.into_vec())
}

#[inline]
fn rotate(triangle: [u32; 3], rotation: usize) -> [u32; 3] {
    [
        triangle[rotation % 3],
        triangle[(rotation + 1) % 3],
        triangle[(rotation + 2) % 3],
    ]
}

/// Encoder-side connectivity state. Mirrors the decoder's state exactly.
struct TriangleEncoder {
    edge_fifo: EdgeFifo,
    vertex_fifo: VertexFifo,
    next: u32,
    last: u32,
    rotate: bool,
    shared_edge_count: usize,
}

impl TriangleEncoder {
    fn new(rotate: bool) -> Self {
        Self {
            edge_fifo: EdgeFifo::new(),
            vertex_fifo: VertexFifo::new(),
            next: 0,
            last: 0,
            rotate,
            shared_edge_count: 0,
        }
    }

    fn encode_triangle(&mut self, triangle: [u32; 3], data: &mut EncoderBuffer) -> u8 {
        let [a, b, c] = triangle;
        // The most recent matching slot wins.
        match self
            .edge_fifo
            .find_triangle_edge(a, b, c, EDGE_FIFO_ADDRESSABLE, self.rotate)
        {
            Some((slot, rotation)) => {
                self.shared_edge_count += 1;
                self.encode_shared_edge(slot, rotate(triangle, rotation), data)
            }
            None => self.encode_fallback(triangle, data),
        }
    }

    fn encode_shared_edge(
        &mut self,
        edge_slot: usize,
        triangle: [u32; 3],
        data: &mut EncoderBuffer,
    ) -> u8 {
        let [a, b, c] = triangle;

        let fec = match self.vertex_fifo.position(c) {
            Some(slot) if slot >= 1 && slot < FEC_FIFO_LIMIT as usize => slot as u8,
            _ if c == self.next => {
                self.next = self.next.wrapping_add(1);
                FEC_NEW
            }
            _ if c.wrapping_add(1) == self.last => FEC_DECREMENT,
            _ if c == self.last.wrapping_add(1) => FEC_INCREMENT,
            _ => FEC_EXPLICIT,
        };

        if fec == FEC_EXPLICIT {
            self.encode_explicit(c, data);
        } else if fec >= FEC_FIFO_LIMIT {
            self.last = c;
        }

        if fec == FEC_NEW || fec >= FEC_FIFO_LIMIT {
            self.vertex_fifo.push(c);
        }

        // Reversed: edges are stored the way the neighbouring triangle walks them.
        self.edge_fifo.push(c, b);
        self.edge_fifo.push(a, c);

        ((edge_slot as u8) << 4) | fec
    }

    fn encode_fallback(&mut self, triangle: [u32; 3], data: &mut EncoderBuffer) -> u8 {
        let triangle = if self.rotate {
            // Put `next` first so the table path applies.
            let rotation = if triangle[1] == self.next {
                1
            } else if triangle[2] == self.next {
                2
            } else {
                0
            };
            rotate(triangle, rotation)
        } else {
            triangle
        };
        let [a, b, c] = triangle;

        // A fresh 0,1,2 triangle starts a new component; restart numbering.
        let reset = a == 0 && b == 1 && c == 2 && self.next > 0;
        if reset {
            self.next = 0;
            self.vertex_fifo.forget();
        }

        let slot_b = self.vertex_fifo.position(b);
        let slot_c = self.vertex_fifo.position(c);

        let fea = if a == self.next {
            self.next = self.next.wrapping_add(1);
            0
        } else {
            FE_EXPLICIT
        };
        let next_after_a = self.next;
        let mut feb = self.fallback_vertex_code(b, slot_b);
        let mut fec = self.fallback_vertex_code(c, slot_c);

        // A zero control byte is reserved for resets.
        if !reset && fea == FE_EXPLICIT && feb == 0 && fec == 0 {
            self.next = next_after_a;
            feb = FE_EXPLICIT;
            fec = FE_EXPLICIT;
        }

        let codeaux = (feb << 4) | fec;
        let table_index = CODEAUX_TABLE[..CODEAUX_ADDRESSABLE]
            .iter()
            .position(|&entry| entry == codeaux);

        let code = match table_index {
            Some(index) if fea == 0 && !reset => 0xf0 | index as u8,
            _ => {
                data.encode_u8(codeaux);
                0xf0 | if fea == 0 { FALLBACK_NEXT } else { FALLBACK_EXPLICIT }
            }
        };

        for (v, fe) in [(a, fea), (b, feb), (c, fec)] {
            if fe == FE_EXPLICIT {
                self.encode_explicit(v, data);
            }
        }

        self.vertex_fifo.push(a);
        if feb == 0 || feb == FE_EXPLICIT {
            self.vertex_fifo.push(b);
        }
        if fec == 0 || fec == FE_EXPLICIT {
            self.vertex_fifo.push(c);
        }

        // Reversed: edges are stored the way the neighbouring triangle walks them.
        self.edge_fifo.push(b, a);
        self.edge_fifo.push(c, b);
        self.edge_fifo.push(a, c);

        code
    }

    /// FIFO slot + 1, 0 for the next sequential vertex, 15 for explicit.
    fn fallback_vertex_code(&mut self, v: u32, slot: Option<usize>) -> u8 {
        match slot {
            Some(slot) if slot < VERTEX_FIFO_ADDRESSABLE => slot as u8 + 1,
            _ if v == self.next => {
                self.next = self.next.wrapping_add(1);
                0
            }
            _ => FE_EXPLICIT,
        }
    }

    fn encode_explicit(&mut self, v: u32, data: &mut EncoderBuffer) {
        data.encode_varint(zigzag32(v.wrapping_sub(self.last)));
        self.last = v;
    }
}
