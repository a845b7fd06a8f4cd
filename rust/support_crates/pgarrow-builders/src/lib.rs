//! Position-based builders for value-by-value construction of Arrow arrays, used
//! as the column sinks of the COPY decoder.
//!
//! Every builder has a logical position, the index of the next entry. Entries that
//! are skipped, for instance the fields of a struct entry appended as null, become
//! nulls when the next entry is written or when the array is built.
//!
//! The statically typed builders live in [`leaf`], [`list`] and [`structure`].
//! [`ColumnBuilder`] is the runtime-typed tree of them created from an Arrow
//! [`DataType`](arrow_schema::DataType).
//!
//! ```rust
//! use pgarrow_builders::{ArrayBuilder, Int32Builder, ListBuilder};
//!
//! let mut builder = ListBuilder::<Int32Builder>::default();
//! builder.item().push(1)?;
//! builder.item().push(2)?;
//! builder.finish_list();
//! builder.finish_null_list();
//! let array = builder.build();
//! assert_eq!(array.len(), 2);
//! # Ok::<(), pgarrow_common::error::Error>(())
//! ```

use arrow_array::ArrayRef;

pub mod column;
pub mod leaf;
pub mod list;
pub mod structure;
#[cfg(test)]
mod tests;

pub use column::ColumnBuilder;
pub use leaf::{
    BinaryBuilder, BooleanBuilder, Date32Builder, Decimal128Builder, DictionaryStringBuilder,
    DurationMicrosecondBuilder, Float32Builder, Float64Builder, Int16Builder, Int32Builder,
    Int64Builder, IntervalMonthDayNanoBuilder, LeafBuilder, LeafStorage, PrimitiveBuilder,
    StringBuilder, Time64MicrosecondBuilder, TimestampMicrosecondBuilder, UInt8Builder,
};
pub use list::ListBuilder;
pub use structure::StructBuilder;

/// A builder that appends entries at a logical position and produces one Arrow
/// array per batch.
///
/// A fresh builder is at position 0. `build` pays back any skipped positions as
/// nulls, returns the array and starts over at position 0.
pub trait ArrayBuilder: Send + Sync + 'static {
    fn data_type(&self) -> arrow_schema::DataType;

    /// Position of the next entry.
    fn next_pos(&self) -> u64;

    /// Skips ahead to `pos`, which must not be behind [`next_pos`](Self::next_pos).
    fn move_to_pos(&mut self, pos: u64);

    fn build(&mut self) -> ArrayRef;
}
