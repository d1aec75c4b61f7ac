use std::fmt;

#[cfg(feature = "decoder")]
use crate::attribute_filter::FilterKind;
#[cfg(feature = "encoder")]
use crate::encoder_options::EncoderOptions;
use crate::index_codec_shared::{INDEX_HEADER, SEQUENCE_HEADER};
#[cfg(feature = "decoder")]
use crate::status::{invalid_parameter, Status};
#[cfg(feature = "encoder")]
use crate::status::StatusResult;
use crate::vertex_codec_shared::VERTEX_HEADER;

/// The three encoded stream formats, told apart by their first byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    /// Vertex attribute records, element size is the vertex stride.
    Attributes,
    /// Triangle list indices, element size is the index width.
    Triangles,
    /// Arbitrary index sequence, element size is the index width.
    Indices,
}

impl StreamKind {
    pub const ALL: [StreamKind; 3] = [
        StreamKind::Attributes,
        StreamKind::Triangles,
        StreamKind::Indices,
    ];

    pub const fn header_tag(self) -> u8 {
        match self {
            StreamKind::Attributes => VERTEX_HEADER,
            StreamKind::Triangles => INDEX_HEADER,
            StreamKind::Indices => SEQUENCE_HEADER,
        }
    }

    /// Identifies an encoded stream from its tag byte.
    pub fn detect(buffer: &[u8]) -> Option<StreamKind> {
        let tag = *buffer.first()?;
        Self::ALL.into_iter().find(|kind| kind.header_tag() == tag)
    }

    pub fn name(self) -> &'static str {
        match self {
            StreamKind::Attributes => "attributes",
            StreamKind::Triangles => "triangles",
            StreamKind::Indices => "indices",
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Encodes `count` elements of `element_size` bytes with the codec for `kind`.
///
/// `element_size` is the vertex stride for attributes and the index width
/// otherwise. Options only affect triangle streams.
#[cfg(feature = "encoder")]
pub fn encode_stream(
    kind: StreamKind,
    data: &[u8],
    count: usize,
    element_size: usize,
    options: &EncoderOptions,
) -> StatusResult<Vec<u8>> {
    match kind {
        StreamKind::Attributes => {
            crate::vertex_codec_encoder::encode_vertex_buffer(data, count, element_size)
        }
        StreamKind::Triangles => crate::index_codec_encoder::encode_index_buffer_with_options(
            data,
            count,
            element_size,
            options,
        ),
        StreamKind::Indices => {
            crate::index_sequence_encoder::encode_index_sequence(data, count, element_size)
        }
    }
}

/// Decodes `buffer` with the codec for `kind` into `destination`.
///
/// A filter other than [`FilterKind::None`] is only valid for attribute
/// streams.
#[cfg(feature = "decoder")]
pub fn decode_stream(
    kind: StreamKind,
    destination: &mut [u8],
    count: usize,
    element_size: usize,
    buffer: &[u8],
    filter: FilterKind,
) -> Status {
    if kind != StreamKind::Attributes && filter != FilterKind::None {
        return Err(invalid_parameter(format!(
            "the {} filter only applies to attribute streams, not {}",
            filter.name(),
            kind
        )));
    }
    match kind {
        StreamKind::Attributes => crate::vertex_codec_decoder::decode_vertex_buffer_with_filter(
            destination,
            count,
            element_size,
            buffer,
            filter,
        ),
        StreamKind::Triangles => crate::index_codec_decoder::decode_index_buffer(
            destination,
            count,
            element_size,
            buffer,
        ),
        StreamKind::Indices => crate::index_sequence_decoder::decode_index_sequence(
            destination,
            count,
            element_size,
            buffer,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect() {
        assert_eq!(StreamKind::detect(&[0xa0, 0]), Some(StreamKind::Attributes));
        assert_eq!(StreamKind::detect(&[0xe1]), Some(StreamKind::Triangles));
        assert_eq!(StreamKind::detect(&[0xd1]), Some(StreamKind::Indices));
        assert_eq!(StreamKind::detect(&[0x00]), None);
        assert_eq!(StreamKind::detect(&[]), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(StreamKind::Triangles.to_string(), "triangles");
    }

    #[cfg(all(feature = "decoder", feature = "encoder"))]
    #[test]
    fn test_stream_round_trip() {
        let data: Vec<u8> = (0..64u8).collect();
        for (kind, count, size) in [
            (StreamKind::Attributes, 4, 16),
            (StreamKind::Triangles, 0, 4),
            (StreamKind::Indices, 16, 4),
        ] {
            let source = &data[..count * size];
            let encoded =
                encode_stream(kind, source, count, size, &EncoderOptions::default()).unwrap();
            assert_eq!(StreamKind::detect(&encoded), Some(kind));

            let mut decoded = vec![0u8; source.len()];
            decode_stream(kind, &mut decoded, count, size, &encoded, FilterKind::None).unwrap();
            assert_eq!(decoded, source);
        }
    }

    #[cfg(feature = "decoder")]
    #[test]
    fn test_filter_requires_attributes() {
        let mut out = [0u8; 4];
        let result = decode_stream(
            StreamKind::Indices,
            &mut out,
            1,
            4,
            &[0xd1, 0],
            FilterKind::Exponential,
        );
        assert!(result.unwrap_err().is_precondition_violation());
    }
}
