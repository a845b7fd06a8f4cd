//! Field decoders: one immutable node tree per column.
//!
//! Every field on the wire is an `i32` length followed by that many bytes, or the
//! length `-1` alone for a null. [`FieldDecoder::decode`] handles the prefix and
//! the null sentinel, then hands the variant a cursor bounded to the field body,
//! so a variant can never read into the next field. Whatever the variant leaves
//! unread is reported as a length mismatch.

use arrow_schema::{DataType, Field, Fields};
use pgarrow_builders::ColumnBuilder;
use pgarrow_common::{Result, error::Error};

use crate::{cursor::ByteCursor, sink::ColumnSink};

pub mod array;
pub mod geometric;
pub mod network;
pub mod numeric;
pub mod record;
pub mod scalar;
pub mod tid;

pub use array::{ArrayDecoder, ArrayDimension, ArrayHeader};
pub use geometric::{GeometricDecoder, GeometricKind};
pub use network::InetDecoder;
pub use numeric::NumericDecoder;
pub use record::RecordDecoder;
pub use scalar::{ScalarDecoder, ScalarKind};
pub use tid::TidDecoder;

/// Length prefix of a null field.
pub const NULL_LENGTH: i32 = -1;

/// Size of the length prefix preceding every field.
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Decoder for one column (or one nested level of a column).
///
/// Built once when the column schema is resolved and immutable afterwards: the
/// same tree decodes any number of rows and may be shared between threads. The
/// destination sink is passed into every call and never retained.
#[derive(Clone, Debug)]
pub enum FieldDecoder {
    /// Fixed and variable width primitive types.
    Scalar(ScalarDecoder),
    /// Arbitrary precision `numeric`, as `Decimal128`.
    Numeric(NumericDecoder),
    /// Arrays of any dimensionality, flattened into a list.
    Array(ArrayDecoder),
    /// Composite types.
    Record(RecordDecoder),
    /// Fixed layouts of float8 coordinates (point, lseg, line, box, circle).
    Geometric(GeometricDecoder),
    /// `inet` and `cidr`.
    Inet(InetDecoder),
    /// Tuple identifiers.
    Tid(TidDecoder),
}

impl FieldDecoder {
    /// Arrow data type of the values this decoder produces.
    pub fn data_type(&self) -> DataType {
        match self {
            FieldDecoder::Scalar(d) => d.data_type(),
            FieldDecoder::Numeric(d) => d.data_type(),
            FieldDecoder::Array(d) => d.data_type(),
            FieldDecoder::Record(d) => d.data_type(),
            FieldDecoder::Geometric(d) => d.data_type(),
            FieldDecoder::Inet(d) => d.data_type(),
            FieldDecoder::Tid(d) => d.data_type(),
        }
    }

    /// Creates an empty column builder matching [`data_type`](Self::data_type).
    pub fn create_builder(&self) -> Result<ColumnBuilder> {
        ColumnBuilder::try_new(&self.data_type())
    }

    /// Decodes one length-prefixed field at the cursor into `sink`.
    ///
    /// Writes exactly one entry (a value or a null) to `sink` and returns the number
    /// of bytes consumed, the 4-byte length prefix included. When the field body is
    /// not fully available the cursor fails before the sink is touched.
    pub fn decode(&self, cursor: &mut ByteCursor, sink: &mut dyn ColumnSink) -> Result<usize> {
        let len = cursor.read_i32()?;
        if len == NULL_LENGTH {
            self.decode_null(sink)?;
            return Ok(LENGTH_PREFIX_SIZE);
        }
        if len < 0 {
            return Err(Error::invalid_format(
                "field",
                format!("negative field length {len}"),
            ));
        }

        let len = len as usize;
        let mut body = ByteCursor::new(cursor.read_bytes(len)?);
        self.decode_value(&mut body, sink)?;
        if !body.is_empty() {
            return Err(Error::length_mismatch(len, body.position()));
        }
        Ok(LENGTH_PREFIX_SIZE + len)
    }

    fn decode_null(&self, sink: &mut dyn ColumnSink) -> Result<()> {
        match self {
            FieldDecoder::Scalar(d) => d.decode_null(sink),
            _ => sink.append_null(),
        }
    }

    fn decode_value(&self, body: &mut ByteCursor, sink: &mut dyn ColumnSink) -> Result<()> {
        match self {
            FieldDecoder::Scalar(d) => d.decode_value(body, sink),
            FieldDecoder::Numeric(d) => d.decode_value(body, sink),
            FieldDecoder::Array(d) => d.decode_value(body, sink),
            FieldDecoder::Record(d) => d.decode_value(body, sink),
            FieldDecoder::Geometric(d) => d.decode_value(body, sink),
            FieldDecoder::Inet(d) => d.decode_value(body, sink),
            FieldDecoder::Tid(d) => d.decode_value(body, sink),
        }
    }
}

/// Struct type with nullable children, matching what the struct builders produce.
pub(crate) fn struct_type<'a>(fields: impl IntoIterator<Item = (&'a str, DataType)>) -> DataType {
    DataType::Struct(
        fields
            .into_iter()
            .map(|(name, data_type)| Field::new(name, data_type, true))
            .collect::<Fields>(),
    )
}

/// Fails with a length mismatch unless the field body is exactly `width` bytes.
#[inline]
pub(crate) fn expect_width(body: &ByteCursor, width: usize) -> Result<()> {
    if body.remaining() != width {
        return Err(Error::length_mismatch(body.remaining(), width));
    }
    Ok(())
}

/// Steps over one length-prefixed field without decoding it.
pub(crate) fn skip_field(cursor: &mut ByteCursor) -> Result<()> {
    let len = cursor.read_i32()?;
    if len >= 0 {
        cursor.read_bytes(len as usize)?;
    }
    Ok(())
}
