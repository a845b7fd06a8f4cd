//! # pgarrow: PostgreSQL binary COPY to Apache Arrow
//!
//! pgarrow decodes rows in the PostgreSQL binary COPY format (the output of
//! `COPY ... TO STDOUT (FORMAT binary)`) directly into Arrow columns, without going
//! through a textual representation.
//!
//! ## Architecture
//!
//! The decoder resolves a column schema, as reported by the server, into a tree of
//! field decoders once. Each row buffer is then split into its length-prefixed fields
//! and every field is decoded straight into the Arrow builder of its column. Nested
//! server types map onto nested Arrow types: arrays become `LargeList`, composite,
//! geometric and network types become `Struct`.
//!
//! This crate re-exports the component crates:
//!
//! * [`decoder`] - type resolution, field and row decoding, COPY stream reading and
//!   record batch assembly
//! * [`common`] - the shared error type and result helpers
//! * [`support::builders`] - the position-based Arrow builders the decoder writes into
//!
//! ## Example
//!
//! ```rust
//! use pgarrow::decoder::{ColumnDescriptor, CopyStreamReader, TableDecoder, TypeDescriptor, UserOptions};
//!
//! let columns = vec![
//!     ColumnDescriptor::new("id", TypeDescriptor::new("int8recv")),
//!     ColumnDescriptor::new("name", TypeDescriptor::new("textrecv")),
//! ];
//! let mut decoder = TableDecoder::try_new(&columns, &UserOptions::default())?;
//!
//! let mut stream = b"PGCOPY\n\xff\r\n\0".to_vec();
//! stream.extend([0; 8]);
//! // (id: 7, name: null)
//! stream.extend([0, 2, 0, 0, 0, 8, 0, 0, 0, 0, 0, 0, 0, 7, 0xff, 0xff, 0xff, 0xff]);
//! stream.extend([0xff, 0xff]);
//!
//! decoder.consume(CopyStreamReader::new(stream.as_slice())?)?;
//! let batch = decoder.flush()?;
//! assert_eq!(batch.num_rows(), 1);
//! # Ok::<(), pgarrow::common::error::Error>(())
//! ```

pub use pgarrow_common as common;
pub use pgarrow_decoder as decoder;

pub mod support {
    pub use pgarrow_builders as builders;
}
