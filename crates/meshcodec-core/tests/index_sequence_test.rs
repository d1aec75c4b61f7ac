use meshcodec_core::index_codec_shared::{encode_index_sequence_bound, SEQUENCE_HEADER};
use meshcodec_core::index_sequence_decoder::decode_index_sequence;
use meshcodec_core::index_sequence_encoder::encode_index_sequence;
use meshcodec_core::lane_view::IndexWidth;
use meshcodec_core::CodecError;

fn round_trip(indices: &[u32], width: IndexWidth) -> Vec<u8> {
    let bytes = width.pack(indices);
    let size = width.byte_length();
    let encoded = encode_index_sequence(&bytes, indices.len(), size).expect("encode");
    assert_eq!(encoded[0], SEQUENCE_HEADER);
    assert!(encoded.len() <= encode_index_sequence_bound(indices.len()));

    let mut decoded = vec![0u8; bytes.len()];
    decode_index_sequence(&mut decoded, indices.len(), size, &encoded).expect("decode");
    assert_eq!(width.unpack(&decoded), indices);
    encoded
}

#[test]
fn test_sequence_example() {
    let indices = [0, 1, 51, 2, 49, 1000];
    let wide = round_trip(&indices, IndexWidth::U32);
    let narrow = round_trip(&indices, IndexWidth::U16);
    assert_eq!(wide, narrow);
    assert_eq!(wide.len(), 9);
}

#[test]
fn test_line_list_round_trip() {
    // Spokes around a hub: the hub stays on one baseline, the rim on the other.
    let mut indices = Vec::new();
    for i in 1..200u32 {
        indices.extend_from_slice(&[0, i * 40]);
    }
    let encoded = round_trip(&indices, IndexWidth::U32);
    assert!(encoded.len() < indices.len() * 2);
}

#[test]
fn test_extreme_deltas_round_trip() {
    let indices = [0, u32::MAX, 0x8000_0000, 1, 0x7fff_ffff, 0x8000_0001, 0, u32::MAX];
    round_trip(&indices, IndexWidth::U32);
    round_trip(&[0, 0xffff, 0x8000, 1, 0x7fff, 0], IndexWidth::U16);
}

#[test]
fn test_empty_sequence() {
    let encoded = round_trip(&[], IndexWidth::U16);
    assert_eq!(encoded, vec![SEQUENCE_HEADER]);
}

#[test]
fn test_rejects_every_truncation() {
    let indices = [5, 6, 7, 1000, 1001, 3, 70000];
    let bytes = IndexWidth::U32.pack(&indices);
    let encoded = encode_index_sequence(&bytes, indices.len(), 4).unwrap();
    let mut decoded = vec![0u8; bytes.len()];

    for len in 0..encoded.len() {
        let err = decode_index_sequence(&mut decoded, indices.len(), 4, &encoded[..len])
            .expect_err("truncated stream must not decode");
        assert!(matches!(err, CodecError::UnexpectedEof(_)), "len {}: {:?}", len, err);
    }
}

#[test]
fn test_rejects_trailing_bytes() {
    let bytes = IndexWidth::U32.pack(&[1, 2, 3]);
    let mut encoded = encode_index_sequence(&bytes, 3, 4).unwrap();
    encoded.push(0);
    let mut decoded = vec![0u8; 12];
    assert_eq!(
        decode_index_sequence(&mut decoded, 3, 4, &encoded),
        Err(CodecError::TrailingData(1))
    );
}

#[test]
fn test_rejects_triangle_stream() {
    let mut decoded = vec![0u8; 12];
    let err = decode_index_sequence(&mut decoded, 3, 4, &[0xe1, 0, 0, 0]).unwrap_err();
    assert!(err.is_format_error());
}
