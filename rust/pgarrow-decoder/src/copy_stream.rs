//! Reader for the binary COPY file format.
//!
//! ```text
//! signature: b"PGCOPY\n\xff\r\n\0"
//! flags: u32, extension_len: u32, extension: [u8; extension_len]
//! tuples: (field_count: i16, [length: i32, data: [u8; length]; field_count])*
//! trailer: field_count = -1
//! ```
//!
//! [`CopyStreamReader`] walks the length prefixes of each tuple and hands the
//! tuple out as one contiguous row buffer for the row decoder.

use std::io::{ErrorKind as IoErrorKind, Read};

use byteorder::{BigEndian, ByteOrder};
use pgarrow_common::{Result, error::Error};

use crate::source::RowSource;

/// The 11-byte signature opening every binary COPY stream.
pub const COPY_SIGNATURE: &[u8; 11] = b"PGCOPY\n\xff\r\n\0";

/// Header flag: every tuple carries an OID field ahead of its columns.
pub const FLAG_HAS_OIDS: u32 = 1 << 16;

/// Flags a reader must understand; bits 0-15 are reserved and ignored.
const CRITICAL_FLAGS: u32 = 0xffff_0000;

/// Field count marking the end of the tuples.
const TRAILER: i16 = -1;

/// The fixed header of a binary COPY stream.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CopyHeader {
    pub flags: u32,
    pub extension: Vec<u8>,
}

impl CopyHeader {
    pub fn has_oids(&self) -> bool {
        self.flags & FLAG_HAS_OIDS != 0
    }

    fn read(reader: &mut impl Read) -> Result<CopyHeader> {
        let mut signature = [0u8; 11];
        if !read_exact_or_eof(reader, &mut signature)? || &signature != COPY_SIGNATURE {
            return Err(Error::invalid_format(
                "copy header",
                "missing binary COPY signature",
            ));
        }

        let mut fixed = [0u8; 8];
        read_tuple_bytes(reader, &mut fixed)?;
        let flags = BigEndian::read_u32(&fixed[..4]);
        let extension_len = BigEndian::read_u32(&fixed[4..]);

        let header = CopyHeader {
            flags,
            extension: read_vec(reader, extension_len as usize)?,
        };
        if header.has_oids() {
            return Err(Error::invalid_format(
                "copy header",
                "streams with OIDs are not supported",
            ));
        }
        if flags & CRITICAL_FLAGS != 0 {
            return Err(Error::invalid_format(
                "copy header",
                format!("unknown critical flags {flags:#010x}"),
            ));
        }
        Ok(header)
    }
}

/// A [`RowSource`] over a binary COPY stream.
///
/// The stream ends at the trailer. A stream that ends exactly at a tuple boundary
/// without a trailer is also accepted; ending inside a tuple is an error.
pub struct CopyStreamReader<R> {
    reader: R,
    header: CopyHeader,
    row: Vec<u8>,
    rows_read: u64,
    finished: bool,
}

impl<R: Read> CopyStreamReader<R> {
    /// Reads and validates the stream header.
    pub fn new(mut reader: R) -> Result<CopyStreamReader<R>> {
        let header = CopyHeader::read(&mut reader)?;
        log::debug!(
            "copy stream header: flags {:#010x}, {} extension bytes",
            header.flags,
            header.extension.len()
        );
        Ok(CopyStreamReader {
            reader,
            header,
            row: Vec::new(),
            rows_read: 0,
            finished: false,
        })
    }

    pub fn header(&self) -> &CopyHeader {
        &self.header
    }

    /// Number of tuples returned so far.
    pub fn rows_read(&self) -> u64 {
        self.rows_read
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Reads the next tuple into `self.row`; `false` at the end of the stream.
    fn read_tuple(&mut self) -> Result<bool> {
        self.row.clear();

        let mut count = [0u8; 2];
        if !read_exact_or_eof(&mut self.reader, &mut count)? {
            log::debug!("copy stream ended without trailer after {} rows", self.rows_read);
            return Ok(false);
        }
        let field_count = BigEndian::read_i16(&count);
        if field_count == TRAILER {
            log::debug!("copy stream trailer after {} rows", self.rows_read);
            return Ok(false);
        }
        if field_count < 0 {
            return Err(Error::invalid_format(
                "copy tuple",
                format!("negative field count {field_count}"),
            ));
        }
        self.row.extend_from_slice(&count);

        for _ in 0..field_count {
            let mut prefix = [0u8; 4];
            read_tuple_bytes(&mut self.reader, &mut prefix)?;
            self.row.extend_from_slice(&prefix);

            let len = BigEndian::read_i32(&prefix);
            if len == -1 {
                continue;
            }
            if len < 0 {
                return Err(Error::invalid_format(
                    "copy tuple",
                    format!("negative field length {len}"),
                ));
            }
            append_exact(&mut self.reader, &mut self.row, len as usize)?;
        }
        self.rows_read += 1;
        Ok(true)
    }
}

impl<R: Read> RowSource for CopyStreamReader<R> {
    fn next_row(&mut self) -> Result<Option<&[u8]>> {
        if self.finished {
            return Ok(None);
        }
        if self.read_tuple()? {
            Ok(Some(self.row.as_slice()))
        } else {
            self.finished = true;
            Ok(None)
        }
    }
}

/// Fills `buf`, returning `false` if the stream ended before its first byte.
fn read_exact_or_eof(reader: &mut impl Read, buf: &mut [u8]) -> Result<bool> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) if filled == 0 => return Ok(false),
            Ok(0) => return Err(unexpected_eof()),
            Ok(n) => filled += n,
            Err(e) if e.kind() == IoErrorKind::Interrupted => {}
            Err(e) => return Err(Error::io("copy stream", e)),
        }
    }
    Ok(true)
}

fn read_tuple_bytes(reader: &mut impl Read, buf: &mut [u8]) -> Result<()> {
    reader.read_exact(buf).map_err(map_read_error)
}

fn read_vec(reader: &mut impl Read, len: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    append_exact(reader, &mut buf, len)?;
    Ok(buf)
}

/// Appends exactly `len` bytes from `reader`, growing `buf` only as data arrives.
fn append_exact(reader: &mut impl Read, buf: &mut Vec<u8>, len: usize) -> Result<()> {
    let read = reader
        .by_ref()
        .take(len as u64)
        .read_to_end(buf)
        .map_err(map_read_error)?;
    if read != len {
        return Err(unexpected_eof());
    }
    Ok(())
}

fn map_read_error(e: std::io::Error) -> Error {
    if e.kind() == IoErrorKind::UnexpectedEof {
        unexpected_eof()
    } else {
        Error::io("copy stream", e)
    }
}

fn unexpected_eof() -> Error {
    Error::invalid_format("copy stream", "unexpected end of stream")
}
