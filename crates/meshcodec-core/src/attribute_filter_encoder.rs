//! Encoder-side packing routines inverted by the attribute filters.
//!
//! Each routine takes `count` vertices of `f32` components and produces
//! `count * stride` bytes ready for the vertex codec. Decoding those bytes and
//! applying the matching [`FilterKind`](crate::attribute_filter::FilterKind)
//! reproduces the input up to quantization.

use num_traits::Float;

use crate::attribute_filter::round_half_away;
use crate::lane_view::{Lane, LaneViewMut};
use crate::status::{check_buffer_size, invalid_parameter, Status, StatusResult};

/// Lower bound on the shared exponent search.
const EXPONENT_FLOOR: i32 = -100;

const MANTISSA_LIMIT: i32 = 1 << 23;

/// Quantizes `v` (clamped to [-1, 1]) to a signed `bits`-bit integer,
/// rounding half away from zero.
///
/// `bits` is clamped to `1..=32`; a single bit always yields 0.
#[inline]
pub fn quantize_snorm(v: f32, bits: u32) -> i32 {
    let bits = bits.clamp(1, 32);
    let scale = ((1i64 << (bits - 1)) - 1) as f32;
    let round = if v >= 0.0 { 0.5 } else { -0.5 };
    let v = v.clamp(-1.0, 1.0);
    (v * scale + round) as i32
}

fn check_bits(what: &str, bits: u32, min: u32, max: u32) -> Status {
    if bits < min || bits > max {
        return Err(invalid_parameter(format!(
            "{} precision must be within {}..={} bits, got {}",
            what, min, max, bits
        )));
    }
    Ok(())
}

/// Packs unit vectors with a trailing scalar (4 floats per vertex) into
/// octahedral form.
///
/// Stride 4 stores 8-bit lanes and accepts `bits` in 1..=8; stride 8 stores
/// 16-bit lanes and accepts 1..=16. Lane 2 holds the quantized 1.0 the
/// decoder normalizes against; lane 3 holds the scalar at full lane width.
pub fn encode_filter_oct(
    data: &[f32],
    count: usize,
    stride: usize,
    bits: u32,
) -> StatusResult<Vec<u8>> {
    check_buffer_size("octahedral input", data.len(), count, 4)?;
    let mut out = vec![0u8; count * stride];
    match stride {
        4 => {
            check_bits("octahedral", bits, 1, 8)?;
            pack_octahedral::<i8>(data, &mut out, bits)?;
        }
        8 => {
            check_bits("octahedral", bits, 1, 16)?;
            pack_octahedral::<i16>(data, &mut out, bits)?;
        }
        _ => {
            return Err(invalid_parameter(format!(
                "octahedral stride must be 4 or 8, got {}",
                stride
            )))
        }
    }
    Ok(out)
}

fn pack_octahedral<T: Lane>(data: &[f32], out: &mut [u8], bits: u32) -> Status {
    let mut lanes = LaneViewMut::<T>::new(out)?;
    let one = quantize_snorm(1.0, bits);

    for (i, n) in data.chunks_exact(4).enumerate() {
        let (nx, ny, nz, nw) = (n[0], n[1], n[2], n[3]);

        // Project onto the octahedron.
        let nl = nx.abs() + ny.abs() + nz.abs();
        let ns = if nl == 0.0 { 0.0 } else { 1.0 / nl };
        let nx = nx * ns;
        let ny = ny * ns;

        // Fold the lower hemisphere over the diagonals.
        let u = if nz >= 0.0 { nx } else { (1.0 - ny.abs()) * sign(nx) };
        let v = if nz >= 0.0 { ny } else { (1.0 - nx.abs()) * sign(ny) };

        lanes.set(i * 4, T::from_i32(quantize_snorm(u, bits)));
        lanes.set(i * 4 + 1, T::from_i32(quantize_snorm(v, bits)));
        lanes.set(i * 4 + 2, T::from_i32(one));
        lanes.set(i * 4 + 3, T::from_i32(quantize_snorm(nw, T::WIDTH.bits())));
    }
    Ok(())
}

#[inline]
fn sign(v: f32) -> f32 {
    if v >= 0.0 {
        1.0
    } else {
        -1.0
    }
}

/// Packs unit quaternions (x, y, z, w) into 16-bit lanes, dropping the largest
/// component.
///
/// Stride must be 8 and `bits` within 4..=16. The three remaining components
/// are stored pre-scaled by sqrt(2) in the order following the dropped one;
/// lane 3 stores the quantized 1.0 with the dropped index in its low 2 bits.
pub fn encode_filter_quat(
    data: &[f32],
    count: usize,
    stride: usize,
    bits: u32,
) -> StatusResult<Vec<u8>> {
    if stride != 8 {
        return Err(invalid_parameter(format!(
            "quaternion stride must be 8, got {}",
            stride
        )));
    }
    check_bits("quaternion", bits, 4, 16)?;
    check_buffer_size("quaternion input", data.len(), count, 4)?;

    let mut out = vec![0u8; count * stride];
    let mut lanes = LaneViewMut::<i16>::new(&mut out)?;
    let one = quantize_snorm(1.0, bits);

    for (i, q) in data.chunks_exact(4).enumerate() {
        let mut qc = 0;
        for k in 1..4 {
            if q[k].abs() > q[qc].abs() {
                qc = k;
            }
        }

        // q and -q are the same rotation; keep the dropped component positive.
        let s = sign(q[qc]) * std::f32::consts::SQRT_2;

        for k in 0..3 {
            let component = q[(qc + k + 1) & 3] * s;
            lanes.set(i * 4 + k, quantize_snorm(component, bits) as i16);
        }
        lanes.set(i * 4 + 3, ((one & !3) | qc as i32) as i16);
    }
    Ok(out)
}

/// Packs `stride / 4` floats per vertex as 24-bit mantissas sharing one
/// exponent per vertex.
///
/// `bits` (1..=24) is the mantissa precision of the largest component; the
/// others lose precision relative to it.
pub fn encode_filter_exp(
    data: &[f32],
    count: usize,
    stride: usize,
    bits: u32,
) -> StatusResult<Vec<u8>> {
    if stride == 0 || stride % 4 != 0 {
        return Err(invalid_parameter(format!(
            "exponential stride must be a positive multiple of 4, got {}",
            stride
        )));
    }
    check_bits("exponential", bits, 1, 24)?;
    let components = stride / 4;
    check_buffer_size("exponential input", data.len(), count, components)?;

    let mut out = vec![0u8; count * stride];
    let mut lanes = LaneViewMut::<u32>::new(&mut out)?;

    for (i, v) in data.chunks_exact(components).enumerate() {
        let max_exponent = v
            .iter()
            .map(|&x| frexp_exponent(x))
            .fold(EXPONENT_FLOOR, i32::max);
        let exp = (max_exponent - (bits as i32 - 1)).min(127);
        let scale = 2f32.powi(-exp);

        for (j, &x) in v.iter().enumerate() {
            // An all-ones 24-bit mantissa can round up out of range.
            let m = round_half_away(x * scale).clamp(-MANTISSA_LIMIT, MANTISSA_LIMIT - 1);
            lanes.set(i * components + j, (m as u32 & 0x00ff_ffff) | ((exp as u32) << 24));
        }
    }
    Ok(out)
}

/// Exponent `e` such that `v = f * 2^e` with `0.5 <= |f| < 1`; 0 for zero and
/// non-finite values.
fn frexp_exponent(v: f32) -> i32 {
    if v == 0.0 || !v.is_finite() {
        return 0;
    }
    let (mantissa, exponent, _) = Float::integer_decode(v);
    exponent as i32 + (64 - mantissa.leading_zeros()) as i32
}
