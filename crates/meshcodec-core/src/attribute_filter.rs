//! Post-decode attribute filters.
//!
//! A filter rewrites an already decoded vertex buffer in place, turning the
//! packed integer representation produced by the encoder-side packing
//! routines back into directly usable values:
//!
//! * octahedral: packed unit normals back to signed normalized 3-vectors,
//! * quaternion: three quantized components plus an index back to a unit
//!   quaternion in signed normalized 16-bit lanes,
//! * exponential: shared-exponent mantissas back to `f32` values.

use num_traits::AsPrimitive;

use crate::lane_view::{Lane, LaneViewMut};
use crate::status::{check_buffer_size, invalid_parameter, Status, StatusResult};

/// Which filter to run over a decoded vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterKind {
    #[default]
    None,
    Octahedral,
    Quaternion,
    Exponential,
}

impl FilterKind {
    /// Checks that `stride` is a legal vertex size for this filter.
    ///
    /// Octahedral needs 4 (8-bit lanes) or 8 (16-bit lanes), quaternion needs
    /// 8 and exponential any positive multiple of 4.
    pub fn validate_stride(self, stride: usize) -> Status {
        let valid = match self {
            FilterKind::None => true,
            FilterKind::Octahedral => stride == 4 || stride == 8,
            FilterKind::Quaternion => stride == 8,
            FilterKind::Exponential => stride > 0 && stride % 4 == 0,
        };
        if !valid {
            return Err(invalid_parameter(format!(
                "stride {} is not valid for the {} filter",
                stride,
                self.name()
            )));
        }
        Ok(())
    }

    pub fn name(self) -> &'static str {
        match self {
            FilterKind::None => "none",
            FilterKind::Octahedral => "octahedral",
            FilterKind::Quaternion => "quaternion",
            FilterKind::Exponential => "exponential",
        }
    }
}

/// Applies `kind` in place to `count` vertices of `stride` bytes.
pub fn apply_filter(data: &mut [u8], count: usize, stride: usize, kind: FilterKind) -> Status {
    kind.validate_stride(stride)?;
    check_buffer_size("filter data", data.len(), count, stride)?;

    match kind {
        FilterKind::None => Ok(()),
        FilterKind::Octahedral if stride == 4 => decode_octahedral::<i8>(data),
        FilterKind::Octahedral => decode_octahedral::<i16>(data),
        FilterKind::Quaternion => decode_quaternion(data),
        FilterKind::Exponential => decode_exponential(data),
    }
}

#[inline]
pub(crate) fn round_half_away(v: f32) -> i32 {
    (v + if v >= 0.0 { 0.5 } else { -0.5 }) as i32
}

fn lane_max<T: Lane>() -> f32 {
    ((1i32 << (T::WIDTH.bits() - 1)) - 1) as f32
}

fn decode_octahedral<T: Lane>(data: &mut [u8]) -> Status {
    let mut lanes = LaneViewMut::<T>::new(data)?;
    let max = lane_max::<T>();

    for i in (0..lanes.len()).step_by(4) {
        let x: f32 = lanes.get(i).as_();
        let y: f32 = lanes.get(i + 1).as_();
        let one: f32 = lanes.get(i + 2).as_();

        // Unfold the lower hemisphere.
        let z = one - x.abs() - y.abs();
        let t = z.min(0.0);
        let x = x + if x >= 0.0 { t } else { -t };
        let y = y + if y >= 0.0 { t } else { -t };

        let s = max / (x * x + y * y + z * z).sqrt();

        lanes.set(i, T::from_i32(round_half_away(x * s)));
        lanes.set(i + 1, T::from_i32(round_half_away(y * s)));
        lanes.set(i + 2, T::from_i32(round_half_away(z * s)));
    }
    Ok(())
}

fn decode_quaternion(data: &mut [u8]) -> Status {
    let mut lanes = LaneViewMut::<i16>::new(data)?;
    let max = lane_max::<i16>();

    for i in (0..lanes.len()).step_by(4) {
        let packed = lanes.get(i + 3);
        let ss = std::f32::consts::FRAC_1_SQRT_2 / (packed | 3) as f32;

        let x = lanes.get(i) as f32 * ss;
        let y = lanes.get(i + 1) as f32 * ss;
        let z = lanes.get(i + 2) as f32 * ss;
        let w = (1.0 - x * x - y * y - z * z).max(0.0).sqrt();

        let qc = (packed & 3) as usize;
        lanes.set(i + ((qc + 1) & 3), round_half_away(x * max) as i16);
        lanes.set(i + ((qc + 2) & 3), round_half_away(y * max) as i16);
        lanes.set(i + ((qc + 3) & 3), round_half_away(z * max) as i16);
        lanes.set(i + qc, round_half_away(w * max) as i16);
    }
    Ok(())
}

fn decode_exponential(data: &mut [u8]) -> Status {
    let mut lanes = LaneViewMut::<u32>::new(data)?;

    for i in 0..lanes.len() {
        lanes.set(i, unpack_exponential(lanes.get(i)).to_bits());
    }
    Ok(())
}

/// Value of one packed word: sign-extended 24-bit mantissa times
/// two to the signed top byte.
#[inline]
pub fn unpack_exponential(word: u32) -> f32 {
    let m = ((word << 8) as i32) >> 8;
    let e = (word as i32) >> 24;
    m as f32 * f32::from_bits(((e + 127) as u32) << 23)
}

/// Reads `count * stride` bytes of exponential-filtered output as floats.
pub fn exponential_values(data: &[u8]) -> StatusResult<Vec<f32>> {
    if data.len() % 4 != 0 {
        return Err(invalid_parameter(format!(
            "{} bytes is not a whole number of floats",
            data.len()
        )));
    }
    Ok(data
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}
