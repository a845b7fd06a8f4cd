//! Complete binary COPY streams built from row buffers.

use std::io::{Seek, SeekFrom, Write};

/// Signature opening every binary COPY stream.
pub const SIGNATURE: &[u8; 11] = b"PGCOPY\n\xff\r\n\0";

/// Wraps row buffers (as produced by [`WireWriter`](crate::WireWriter)) into a
/// COPY stream: signature, zero flags, empty header extension, the rows and the
/// `-1` trailer.
pub fn copy_stream<R: AsRef<[u8]>>(rows: impl IntoIterator<Item = R>) -> Vec<u8> {
    let mut buf = copy_stream_without_trailer(rows);
    buf.extend_from_slice(&(-1i16).to_be_bytes());
    buf
}

/// Like [`copy_stream`], but ending right after the last row.
pub fn copy_stream_without_trailer<R: AsRef<[u8]>>(
    rows: impl IntoIterator<Item = R>,
) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(SIGNATURE);
    buf.extend_from_slice(&0u32.to_be_bytes());
    buf.extend_from_slice(&0u32.to_be_bytes());
    for row in rows {
        buf.extend_from_slice(row.as_ref());
    }
    buf
}

/// Writes `contents` to a temporary file, positioned at its start.
pub fn temp_file(contents: &[u8]) -> anyhow::Result<tempfile::NamedTempFile> {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(contents)?;
    file.flush()?;
    file.seek(SeekFrom::Start(0))?;
    Ok(file)
}

/// Writes a COPY stream of `rows` to a temporary file.
pub fn copy_file<R: AsRef<[u8]>>(
    rows: impl IntoIterator<Item = R>,
) -> anyhow::Result<tempfile::NamedTempFile> {
    temp_file(&copy_stream(rows))
}
