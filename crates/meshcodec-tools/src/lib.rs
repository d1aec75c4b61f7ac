//! File-level helpers behind the `meshcodec` command-line tool.
//!
//! Raw inputs are flat little-endian buffers: vertex records of `stride`
//! bytes for attribute streams, 2- or 4-byte indices otherwise.

use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use meshcodec_core::{decode_stream, encode_stream, EncoderOptions, FilterKind, StreamKind};

/// Outcome of encoding one raw buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeReport {
    pub kind: StreamKind,
    pub count: usize,
    pub input_size: usize,
    pub output_size: usize,
}

impl EncodeReport {
    pub fn ratio(&self) -> f64 {
        if self.input_size == 0 {
            return 0.0;
        }
        self.output_size as f64 / self.input_size as f64
    }
}

impl fmt::Display for EncodeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} x {}: {} -> {} bytes ({:.1}%)",
            self.count,
            self.kind,
            self.input_size,
            self.output_size,
            self.ratio() * 100.0
        )
    }
}

/// What can be told about an encoded buffer without decoding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamInfo {
    pub kind: Option<StreamKind>,
    pub tag: Option<u8>,
    pub size: usize,
}

impl fmt::Display for StreamInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.tag) {
            (Some(kind), Some(tag)) => {
                write!(f, "{} stream (tag {:#04x}), {} bytes", kind, tag, self.size)
            }
            (None, Some(tag)) => {
                write!(f, "unknown stream (tag {:#04x}), {} bytes", tag, self.size)
            }
            _ => write!(f, "empty buffer"),
        }
    }
}

/// Number of `element_size` elements in a raw buffer of `len` bytes.
pub fn element_count(len: usize, element_size: usize) -> Result<usize> {
    if element_size == 0 {
        bail!("Element size must be positive");
    }
    if len % element_size != 0 {
        bail!(
            "Input of {} bytes is not a whole number of {}-byte elements",
            len,
            element_size
        );
    }
    Ok(len / element_size)
}

pub fn encode_bytes(
    kind: StreamKind,
    data: &[u8],
    element_size: usize,
    options: &EncoderOptions,
) -> Result<(Vec<u8>, EncodeReport)> {
    let count = element_count(data.len(), element_size)?;
    let encoded = encode_stream(kind, data, count, element_size, options)
        .with_context(|| format!("Failed to encode {} stream", kind))?;

    let report = EncodeReport {
        kind,
        count,
        input_size: data.len(),
        output_size: encoded.len(),
    };
    Ok((encoded, report))
}

/// Decodes `buffer`, detecting the stream kind from its tag byte when
/// `kind` is not given.
pub fn decode_bytes(
    buffer: &[u8],
    kind: Option<StreamKind>,
    count: usize,
    element_size: usize,
    filter: FilterKind,
) -> Result<Vec<u8>> {
    let kind = match kind {
        Some(kind) => kind,
        None => StreamKind::detect(buffer).context("Unrecognized stream tag")?,
    };
    let size = count
        .checked_mul(element_size)
        .context("Decoded size overflows")?;

    let mut decoded = vec![0u8; size];
    decode_stream(kind, &mut decoded, count, element_size, buffer, filter)
        .with_context(|| format!("Failed to decode {} stream", kind))?;
    Ok(decoded)
}

pub fn inspect(buffer: &[u8]) -> StreamInfo {
    StreamInfo {
        kind: StreamKind::detect(buffer),
        tag: buffer.first().copied(),
        size: buffer.len(),
    }
}

pub fn encode_file(
    input: &Path,
    output: &Path,
    kind: StreamKind,
    element_size: usize,
    options: &EncoderOptions,
) -> Result<EncodeReport> {
    let data = read_file(input)?;
    let (encoded, report) = encode_bytes(kind, &data, element_size, options)?;
    tracing::debug!("encoded {:?}: {}", input, report);
    write_file(output, &encoded)?;
    Ok(report)
}

pub fn decode_file(
    input: &Path,
    output: &Path,
    kind: Option<StreamKind>,
    count: usize,
    element_size: usize,
    filter: FilterKind,
) -> Result<usize> {
    let buffer = read_file(input)?;
    let decoded = decode_bytes(&buffer, kind, count, element_size, filter)?;
    tracing::debug!(
        "decoded {:?}: {} -> {} bytes",
        input,
        buffer.len(),
        decoded.len()
    );
    write_file(output, &decoded)?;
    Ok(decoded.len())
}

pub fn inspect_file(input: &Path) -> Result<StreamInfo> {
    Ok(inspect(&read_file(input)?))
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Failed to read {:?}", path))
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).with_context(|| format!("Failed to write {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_count() {
        assert_eq!(element_count(24, 12).unwrap(), 2);
        assert_eq!(element_count(0, 4).unwrap(), 0);
        assert!(element_count(10, 4).is_err());
        assert!(element_count(8, 0).is_err());
    }

    #[test]
    fn test_inspect() {
        let info = inspect(&[0xe1, 0xf0]);
        assert_eq!(info.kind, Some(StreamKind::Triangles));
        assert_eq!(info.to_string(), "triangles stream (tag 0xe1), 2 bytes");

        assert_eq!(inspect(&[0x42]).kind, None);
        assert_eq!(inspect(&[]).to_string(), "empty buffer");
    }

    #[test]
    fn test_report_display() {
        let report = EncodeReport {
            kind: StreamKind::Indices,
            count: 4,
            input_size: 16,
            output_size: 6,
        };
        assert_eq!(report.to_string(), "4 x indices: 16 -> 6 bytes (37.5%)");
    }
}
