/// Tunables for the encoders.
///
/// Defaults always produce streams that decode to the exact input bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncoderOptions {
    rotate_triangles: bool,
}

impl EncoderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow the triangle encoder to cyclically rotate triangles.
    ///
    /// Rotation lets more triangles reuse a cached edge and so compresses
    /// better, but the decoded buffer then only matches the input up to the
    /// starting vertex of each triangle. Winding order is preserved.
    pub fn with_rotate_triangles(mut self, rotate: bool) -> Self {
        self.rotate_triangles = rotate;
        self
    }

    pub fn rotate_triangles(&self) -> bool {
        self.rotate_triangles
    }
}
