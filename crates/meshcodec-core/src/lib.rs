//! Mesh Codec Core Library
//!
//! Compression and decompression of GPU-ready mesh buffers: vertex attribute
//! streams, triangle index buffers and plain index sequences, plus the
//! attribute filters that unpack quantized normals, rotations and floats
//! after decoding.
//!
//! Every codec is a pure function over caller-owned byte buffers. Encoded
//! streams start with a one-byte tag identifying their format, see
//! [`StreamKind`].

#![allow(clippy::needless_range_loop)] // Lane and byte-plane loops index several buffers at once

// =============================================================================
// Core modules - always available
// =============================================================================

pub mod attribute_filter;
pub mod bit_utils;
pub mod connectivity_fifo;
pub mod index_codec_shared;
pub mod lane_view;
pub mod status;
pub mod stream_kind;
pub mod vertex_codec_shared;

// =============================================================================
// Decoder-only modules
// =============================================================================

#[cfg(feature = "decoder")]
pub mod decoder_buffer;
#[cfg(feature = "decoder")]
pub mod index_codec_decoder;
#[cfg(feature = "decoder")]
pub mod index_sequence_decoder;
#[cfg(feature = "decoder")]
pub mod vertex_codec_decoder;

// =============================================================================
// Encoder-only modules
// =============================================================================

#[cfg(feature = "encoder")]
pub mod attribute_filter_encoder;
#[cfg(feature = "encoder")]
pub mod encoder_buffer;
#[cfg(feature = "encoder")]
pub mod encoder_options;
#[cfg(feature = "encoder")]
pub mod index_codec_encoder;
#[cfg(feature = "encoder")]
pub mod index_sequence_encoder;
#[cfg(feature = "encoder")]
pub mod vertex_codec_encoder;

// =============================================================================
// Core re-exports - always available
// =============================================================================

pub use attribute_filter::{apply_filter, FilterKind};
pub use connectivity_fifo::{EdgeFifo, VertexFifo};
pub use index_codec_shared::{encode_index_buffer_bound, encode_index_sequence_bound};
pub use lane_view::{IndexWidth, Lane, LaneViewMut, LaneWidth};
pub use status::{CodecError, ErrorKind, Status, StatusResult};
pub use stream_kind::StreamKind;
pub use vertex_codec_shared::{encode_vertex_buffer_bound, GroupMode};

// =============================================================================
// Decoder re-exports
// =============================================================================

#[cfg(feature = "decoder")]
pub use decoder_buffer::DecoderBuffer;
#[cfg(feature = "decoder")]
pub use index_codec_decoder::decode_index_buffer;
#[cfg(feature = "decoder")]
pub use index_sequence_decoder::decode_index_sequence;
#[cfg(feature = "decoder")]
pub use stream_kind::decode_stream;
#[cfg(feature = "decoder")]
pub use vertex_codec_decoder::{decode_vertex_buffer, decode_vertex_buffer_with_filter};

// =============================================================================
// Encoder re-exports
// =============================================================================

#[cfg(feature = "encoder")]
pub use attribute_filter_encoder::{
    encode_filter_exp, encode_filter_oct, encode_filter_quat, quantize_snorm,
};
#[cfg(feature = "encoder")]
pub use encoder_buffer::EncoderBuffer;
#[cfg(feature = "encoder")]
pub use encoder_options::EncoderOptions;
#[cfg(feature = "encoder")]
pub use index_codec_encoder::{encode_index_buffer, encode_index_buffer_with_options};
#[cfg(feature = "encoder")]
pub use index_sequence_encoder::encode_index_sequence;
#[cfg(feature = "encoder")]
pub use stream_kind::encode_stream;
#[cfg(feature = "encoder")]
pub use vertex_codec_encoder::encode_vertex_buffer;
