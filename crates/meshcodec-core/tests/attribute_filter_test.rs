use meshcodec_core::attribute_filter::{apply_filter, exponential_values, FilterKind};
use meshcodec_core::attribute_filter_encoder::{
    encode_filter_exp, encode_filter_oct, encode_filter_quat,
};
use meshcodec_core::vertex_codec_decoder::decode_vertex_buffer_with_filter;
use meshcodec_core::vertex_codec_encoder::encode_vertex_buffer;

fn lanes_i16(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(2)
        .map(|c| i16::from_le_bytes([c[0], c[1]]))
        .collect()
}

fn lanes_i8(bytes: &[u8]) -> Vec<i8> {
    bytes.iter().map(|&b| b as i8).collect()
}

/// Deterministic unit vectors covering both hemispheres.
fn unit_vectors(count: usize) -> Vec<[f32; 3]> {
    (0..count)
        .map(|i| {
            let theta = i as f32 * 0.7;
            let z = 1.0 - 2.0 * (i as f32 + 0.5) / count as f32;
            let r = (1.0 - z * z).sqrt();
            [r * theta.cos(), r * theta.sin(), z]
        })
        .collect()
}

#[test]
fn test_octahedral_exact_8bit() {
    let data = [
        1.0, 0.0, 0.0, 0.0, //
        0.0, -1.0, 0.0, 0.0, //
        0.7071068, 0.0, 0.707168, 1.0, //
        -0.7071068, 0.0, -0.707168, 1.0,
    ];
    let encoded = encode_filter_oct(&data, 4, 4, 8).unwrap();
    assert_eq!(
        encoded,
        vec![
            0x7f, 0x00, 0x7f, 0x00, //
            0x00, 0x81, 0x7f, 0x00, //
            0x3f, 0x00, 0x7f, 0x7f, //
            0x81, 0x40, 0x7f, 0x7f,
        ]
    );
}

#[test]
fn test_octahedral_exact_12bit() {
    let data = [1.0, 0.0, 0.0, 0.0, 0.0, -1.0, 0.0, 0.0];
    let encoded = encode_filter_oct(&data, 2, 8, 12).unwrap();
    assert_eq!(
        lanes_i16(&encoded),
        vec![2047, 0, 2047, 0, 0, -2047, 2047, 0]
    );
}

#[test]
fn test_quaternion_exact_12bit() {
    let data = [
        1.0, 0.0, 0.0, 0.0, //
        0.0, -1.0, 0.0, 0.0, //
        0.7071068, 0.0, 0.0, 0.707168, //
        -0.7071068, 0.0, 0.0, -0.707168,
    ];
    let encoded = encode_filter_quat(&data, 4, 8, 12).unwrap();
    assert_eq!(
        encoded,
        vec![
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xfc, 0x07, //
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xfd, 0x07, //
            0xff, 0x07, 0x00, 0x00, 0x00, 0x00, 0xff, 0x07, //
            0xff, 0x07, 0x00, 0x00, 0x00, 0x00, 0xff, 0x07,
        ]
    );
    // The dropped component index sits in the low bits of lane 3.
    for (i, vertex) in encoded.chunks_exact(8).enumerate() {
        let expected = [0, 1, 3, 3][i];
        assert_eq!(lanes_i16(vertex)[3] & 3, expected);
    }
}

#[test]
fn test_exponential_exact() {
    let encoded = encode_filter_exp(&[1.0, -23.4, -0.1], 1, 12, 15).unwrap();
    let words: Vec<u32> = encoded
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    assert_eq!(words, vec![0xf700_0200, 0xf7ff_d133, 0xf7ff_ffcd]);
}

#[test]
fn test_octahedral_round_trip_8bit() {
    let vectors = unit_vectors(64);
    let data: Vec<f32> = vectors.iter().flat_map(|v| [v[0], v[1], v[2], 0.0]).collect();
    let mut packed = encode_filter_oct(&data, 64, 4, 8).unwrap();
    apply_filter(&mut packed, 64, 4, FilterKind::Octahedral).unwrap();

    let lanes = lanes_i8(&packed);
    for (i, v) in vectors.iter().enumerate() {
        for k in 0..3 {
            let decoded = lanes[i * 4 + k] as f32 / 127.0;
            assert!(
                (decoded - v[k]).abs() < 0.05,
                "vertex {} lane {}: {} vs {}",
                i,
                k,
                decoded,
                v[k]
            );
        }
    }
}

#[test]
fn test_octahedral_round_trip_16bit_through_codec() {
    let vectors = unit_vectors(300);
    let data: Vec<f32> = vectors.iter().flat_map(|v| [v[0], v[1], v[2], 1.0]).collect();
    let packed = encode_filter_oct(&data, 300, 8, 16).unwrap();
    let encoded = encode_vertex_buffer(&packed, 300, 8).unwrap();

    let mut decoded = vec![0u8; packed.len()];
    decode_vertex_buffer_with_filter(&mut decoded, 300, 8, &encoded, FilterKind::Octahedral)
        .unwrap();

    let lanes = lanes_i16(&decoded);
    for (i, v) in vectors.iter().enumerate() {
        for k in 0..3 {
            let value = lanes[i * 4 + k] as f32 / 32767.0;
            assert!((value - v[k]).abs() < 1e-3, "vertex {} lane {}", i, k);
        }
        assert_eq!(lanes[i * 4 + 3], 32767);
    }
}

#[test]
fn test_quaternion_round_trip() {
    let quats: Vec<[f32; 4]> = unit_vectors(50)
        .into_iter()
        .enumerate()
        .map(|(i, v)| {
            // Mix a rotation angle into the axis.
            let half = i as f32 * 0.37;
            let s = half.sin();
            [v[0] * s, v[1] * s, v[2] * s, half.cos()]
        })
        .collect();
    let data: Vec<f32> = quats.iter().flatten().copied().collect();
    let mut packed = encode_filter_quat(&data, 50, 8, 16).unwrap();
    apply_filter(&mut packed, 50, 8, FilterKind::Quaternion).unwrap();

    let lanes = lanes_i16(&packed);
    for (i, q) in quats.iter().enumerate() {
        let decoded: Vec<f32> = (0..4).map(|k| lanes[i * 4 + k] as f32 / 32767.0).collect();
        // q and -q describe the same rotation.
        let same = (0..4).all(|k| (decoded[k] - q[k]).abs() < 1e-3);
        let negated = (0..4).all(|k| (decoded[k] + q[k]).abs() < 1e-3);
        assert!(same || negated, "quaternion {}: {:?} vs {:?}", i, decoded, q);
    }
}

#[test]
fn test_exponential_round_trip() {
    let data: Vec<f32> = (0..40).map(|i| (i as f32 - 20.0) * 3.3 + 0.001 * i as f32).collect();
    let packed = encode_filter_exp(&data, 10, 16, 24).unwrap();
    let encoded = encode_vertex_buffer(&packed, 10, 16).unwrap();

    let mut decoded = vec![0u8; packed.len()];
    decode_vertex_buffer_with_filter(&mut decoded, 10, 16, &encoded, FilterKind::Exponential)
        .unwrap();
    let values = exponential_values(&decoded).unwrap();

    for (vertex, original) in values.chunks_exact(4).zip(data.chunks_exact(4)) {
        let max = original.iter().fold(0.0f32, |m, v| m.max(v.abs()));
        for (d, o) in vertex.iter().zip(original) {
            assert!((d - o).abs() <= max * 1e-6, "{} vs {}", d, o);
        }
    }
}

#[test]
fn test_filter_stride_mismatch_is_rejected_before_decoding() {
    let mut out = vec![0u8; 12];
    // The stream is garbage; the stride check must fire first.
    let err = decode_vertex_buffer_with_filter(&mut out, 1, 12, &[0x00], FilterKind::Quaternion)
        .unwrap_err();
    assert!(err.is_precondition_violation());
}
