use crate::bit_utils::unzigzag32;
use crate::decoder_buffer::DecoderBuffer;
use crate::index_codec_shared::{SEQUENCE_HEADER, SEQUENCE_SYMBOL_BITS};
use crate::lane_view::IndexWidth;
use crate::status::{check_buffer_size, CodecError, Status};

/// Decodes an index sequence produced by
/// [`encode_index_sequence`](crate::index_sequence_encoder::encode_index_sequence).
///
/// The stream carries no trailer; every byte after the tag must belong to one
/// of the `index_count` symbols.
pub fn decode_index_sequence(
    destination: &mut [u8],
    index_count: usize,
    index_size: usize,
    buffer: &[u8],
) -> Status {
    let width = IndexWidth::from_byte_width(index_size)?;
    check_buffer_size("destination", destination.len(), index_count, index_size)?;

    let mut data = DecoderBuffer::new(buffer);
    let tag = data.decode_u8()?;
    if tag != SEQUENCE_HEADER {
        return Err(CodecError::InvalidHeader {
            expected: SEQUENCE_HEADER,
            found: tag,
        });
    }
    if data.remaining_size() < index_count {
        return Err(CodecError::UnexpectedEof(format!(
            "index sequence of {} bytes cannot hold {} indices",
            buffer.len(),
            index_count
        )));
    }

    let mut last = [0u32; 2];
    for i in 0..index_count {
        let symbol = data.decode_varint_bits(SEQUENCE_SYMBOL_BITS)?;
        let current = (symbol & 1) as usize;
        let delta = unzigzag32((symbol >> 1) as u32);

        last[current] = last[current].wrapping_add(delta);
        width.write(destination, i, last[current]);
    }

    data.expect_end()?;

    log::debug!("decoded index sequence of {} from {} bytes", index_count, buffer.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_two_baselines() {
        let buffer = [SEQUENCE_HEADER, 0x00, 0x04, 0xcd, 0x01, 0x04, 0x07, 0x98, 0x1f];
        let mut out = [0u8; 24];
        decode_index_sequence(&mut out, 6, 4, &buffer).unwrap();
        assert_eq!(IndexWidth::U32.unpack(&out), vec![0, 1, 51, 2, 49, 1000]);
    }

    #[test]
    fn test_decode_sixteen_bit() {
        let buffer = [SEQUENCE_HEADER, 0x08, 0x03];
        let mut out = [0u8; 4];
        decode_index_sequence(&mut out, 2, 2, &buffer).unwrap();
        assert_eq!(IndexWidth::U16.unpack(&out), vec![2, 0xffff]);
    }

    #[test]
    fn test_rejects_bad_header() {
        let mut out = [0u8; 4];
        assert_eq!(
            decode_index_sequence(&mut out, 1, 4, &[0xe1, 0x00]),
            Err(CodecError::InvalidHeader {
                expected: SEQUENCE_HEADER,
                found: 0xe1
            })
        );
    }

    #[test]
    fn test_rejects_empty_buffer() {
        let mut out = [0u8; 0];
        assert!(matches!(
            decode_index_sequence(&mut out, 0, 4, &[]),
            Err(CodecError::UnexpectedEof(_))
        ));
    }

    #[test]
    fn test_rejects_truncated_and_trailing() {
        let mut out = [0u8; 8];
        assert!(matches!(
            decode_index_sequence(&mut out, 2, 4, &[SEQUENCE_HEADER, 0x00]),
            Err(CodecError::UnexpectedEof(_))
        ));
        assert!(matches!(
            decode_index_sequence(&mut out, 2, 4, &[SEQUENCE_HEADER, 0x00, 0x80]),
            Err(CodecError::UnexpectedEof(_))
        ));
        assert_eq!(
            decode_index_sequence(&mut out, 2, 4, &[SEQUENCE_HEADER, 0x00, 0x00, 0x00]),
            Err(CodecError::TrailingData(1))
        );
    }

    #[test]
    fn test_rejects_oversized_symbol() {
        let mut out = [0u8; 4];
        assert_eq!(
            decode_index_sequence(&mut out, 1, 4, &[SEQUENCE_HEADER, 0xff, 0xff, 0xff, 0xff, 0x3f]),
            Err(CodecError::VarintOverflow)
        );
    }
}
