//! Decoding of PostgreSQL binary COPY rows into Arrow columns.
//!
//! The pieces, leaves first:
//!
//! * [`cursor::ByteCursor`] - big-endian reads over a borrowed row buffer
//! * [`field_decoder::FieldDecoder`] - the per-column decoder tree (scalars, numeric,
//!   arrays, composites and the fixed layouts of geometric and network types)
//! * [`registry::TypeRegistry`] - resolution of server types, identified by their
//!   receive function, into decoder trees
//! * [`row::RowDecoder`] - splits a row buffer into its fields and decodes each column
//! * [`table::TableDecoder`] - owns one Arrow builder per column and emits record batches
//! * [`copy_stream::CopyStreamReader`] - a [`source::RowSource`] over a binary COPY stream
//!
//! Decoded values are written through the [`sink::ColumnSink`] interface, which is
//! implemented for [`pgarrow_builders::ColumnBuilder`].
//!
//! ```rust
//! use pgarrow_decoder::{ColumnDescriptor, TableDecoder, TypeDescriptor, UserOptions};
//!
//! let columns = vec![ColumnDescriptor::new("id", TypeDescriptor::new("int4recv"))];
//! let mut decoder = TableDecoder::try_new(&columns, &UserOptions::default()).unwrap();
//!
//! // One column, a 4-byte field holding 42.
//! let row = [0, 1, 0, 0, 0, 4, 0, 0, 0, 42];
//! decoder.append_row(&row).unwrap();
//! let batch = decoder.flush().unwrap();
//! assert_eq!(batch.num_rows(), 1);
//! ```

pub mod copy_stream;
pub mod cursor;
pub mod datetime;
pub mod field_decoder;
pub mod options;
pub mod registry;
pub mod row;
pub mod sink;
pub mod source;
pub mod table;
pub mod type_desc;
pub mod value;

#[cfg(test)]
mod tests;

pub use copy_stream::{CopyHeader, CopyStreamReader};
pub use cursor::ByteCursor;
pub use field_decoder::FieldDecoder;
pub use options::{IntervalRepresentation, UserOptions};
pub use registry::{DecoderFactory, TypeRegistry};
pub use row::RowDecoder;
pub use sink::ColumnSink;
pub use source::{RowSource, RowsFromIter};
pub use table::TableDecoder;
pub use type_desc::{ColumnDescriptor, TypeDescriptor};
pub use value::{Interval, Value};
