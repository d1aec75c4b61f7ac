//! Bounded connectivity histories shared by the triangle index encoder and
//! decoder.
//!
//! Both are 16-entry ring buffers addressed most-recent-first: slot 0 is the
//! latest push, slot 15 the oldest surviving one. A push evicts the oldest
//! entry. The encoder and decoder must push exactly the same values in the
//! same order, otherwise slot numbers stop agreeing.

pub const FIFO_CAPACITY: usize = 16;

const SLOT_MASK: usize = FIFO_CAPACITY - 1;

/// Placeholder for slots that were never written.
const EMPTY: u32 = u32::MAX;

/// Most recently introduced vertex indices.
#[derive(Debug, Clone)]
pub struct VertexFifo {
    entries: [u32; FIFO_CAPACITY],
    offset: usize,
    // Slots pushed since creation or the last `forget`; lookups ignore the rest.
    len: usize,
}

impl Default for VertexFifo {
    fn default() -> Self {
        Self::new()
    }
}

impl VertexFifo {
    pub fn new() -> Self {
        Self {
            entries: [EMPTY; FIFO_CAPACITY],
            offset: 0,
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, v: u32) {
        self.entries[self.offset] = v;
        self.offset = (self.offset + 1) & SLOT_MASK;
        self.len = (self.len + 1).min(FIFO_CAPACITY);
    }

    /// Returns the vertex in `slot`, counted from the most recent push.
    #[inline]
    pub fn get(&self, slot: usize) -> u32 {
        debug_assert!(slot < FIFO_CAPACITY);
        self.entries[self.offset.wrapping_sub(1 + slot) & SLOT_MASK]
    }

    /// Finds the most recent slot holding `v`.
    pub fn position(&self, v: u32) -> Option<usize> {
        (0..self.len).find(|&slot| self.get(slot) == v)
    }

    /// Hides all current entries from [`VertexFifo::position`].
    ///
    /// Slot addressing is unaffected, so a decoder that never forgets stays
    /// in step as long as the encoder only references slots pushed since.
    pub fn forget(&mut self) {
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Most recently seen directed edges.
#[derive(Debug, Clone)]
pub struct EdgeFifo {
    entries: [(u32, u32); FIFO_CAPACITY],
    offset: usize,
    len: usize,
}

impl Default for EdgeFifo {
    fn default() -> Self {
        Self::new()
    }
}

impl EdgeFifo {
    pub fn new() -> Self {
        Self {
            entries: [(EMPTY, EMPTY); FIFO_CAPACITY],
            offset: 0,
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, a: u32, b: u32) {
        self.entries[self.offset] = (a, b);
        self.offset = (self.offset + 1) & SLOT_MASK;
        self.len = (self.len + 1).min(FIFO_CAPACITY);
    }

    #[inline]
    pub fn get(&self, slot: usize) -> (u32, u32) {
        debug_assert!(slot < FIFO_CAPACITY);
        self.entries[self.offset.wrapping_sub(1 + slot) & SLOT_MASK]
    }

    /// Finds the most recent slot within the first `limit` slots holding one of
    /// the edges of triangle `(a, b, c)`.
    ///
    /// With `rotate` off only the leading edge `a -> b` is considered. Returns
    /// the slot and the rotation (0, 1 or 2) that brings the matched edge to
    /// the front.
    pub fn find_triangle_edge(
        &self,
        a: u32,
        b: u32,
        c: u32,
        limit: usize,
        rotate: bool,
    ) -> Option<(usize, usize)> {
        for slot in 0..self.len.min(limit) {
            let edge = self.get(slot);
            if edge == (a, b) {
                return Some((slot, 0));
            }
            if rotate {
                if edge == (b, c) {
                    return Some((slot, 1));
                }
                if edge == (c, a) {
                    return Some((slot, 2));
                }
            }
        }
        None
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
