//! Type-erased column builders.
//!
//! [`ColumnBuilder`] is a closed set of the statically typed builders in this crate,
//! selected at runtime from an Arrow [`DataType`]. Nested data types produce nested
//! builder trees: a `LargeList` column wraps the builder of its item type and a
//! `Struct` column owns one builder per field.

use arrow_array::ArrayRef;
use arrow_schema::{DataType, IntervalUnit, TimeUnit};
use pgarrow_common::{Result, error::Error};

use crate::{
    ArrayBuilder, BinaryBuilder, BooleanBuilder, Date32Builder, Decimal128Builder,
    DictionaryStringBuilder, DurationMicrosecondBuilder, Float32Builder, Float64Builder,
    Int16Builder, Int32Builder, Int64Builder, IntervalMonthDayNanoBuilder, ListBuilder,
    StringBuilder, StructBuilder, Time64MicrosecondBuilder, TimestampMicrosecondBuilder,
    UInt8Builder,
};

/// A builder for one column whose Arrow type is only known at runtime.
pub enum ColumnBuilder {
    Boolean(BooleanBuilder),
    UInt8(UInt8Builder),
    Int16(Int16Builder),
    Int32(Int32Builder),
    Int64(Int64Builder),
    Float32(Float32Builder),
    Float64(Float64Builder),
    Date32(Date32Builder),
    Time64(Time64MicrosecondBuilder),
    Timestamp(TimestampMicrosecondBuilder),
    Duration(DurationMicrosecondBuilder),
    Interval(IntervalMonthDayNanoBuilder),
    Decimal128(Decimal128Builder),
    Binary(BinaryBuilder),
    String(StringBuilder),
    Dictionary(DictionaryStringBuilder),
    List(Box<ListBuilder<ColumnBuilder>>),
    Struct(StructBuilder),
}

macro_rules! dispatch {
    ($self:expr, $b:ident => $body:expr) => {
        match $self {
            ColumnBuilder::Boolean($b) => $body,
            ColumnBuilder::UInt8($b) => $body,
            ColumnBuilder::Int16($b) => $body,
            ColumnBuilder::Int32($b) => $body,
            ColumnBuilder::Int64($b) => $body,
            ColumnBuilder::Float32($b) => $body,
            ColumnBuilder::Float64($b) => $body,
            ColumnBuilder::Date32($b) => $body,
            ColumnBuilder::Time64($b) => $body,
            ColumnBuilder::Timestamp($b) => $body,
            ColumnBuilder::Duration($b) => $body,
            ColumnBuilder::Interval($b) => $body,
            ColumnBuilder::Decimal128($b) => $body,
            ColumnBuilder::Binary($b) => $body,
            ColumnBuilder::String($b) => $body,
            ColumnBuilder::Dictionary($b) => $body,
            ColumnBuilder::List($b) => $body,
            ColumnBuilder::Struct($b) => $body,
        }
    };
}

impl ColumnBuilder {
    /// Creates the builder (tree) producing arrays of `data_type`.
    pub fn try_new(data_type: &DataType) -> Result<ColumnBuilder> {
        let builder = match data_type {
            DataType::Boolean => ColumnBuilder::Boolean(Default::default()),
            DataType::UInt8 => ColumnBuilder::UInt8(Default::default()),
            DataType::Int16 => ColumnBuilder::Int16(Default::default()),
            DataType::Int32 => ColumnBuilder::Int32(Default::default()),
            DataType::Int64 => ColumnBuilder::Int64(Default::default()),
            DataType::Float32 => ColumnBuilder::Float32(Default::default()),
            DataType::Float64 => ColumnBuilder::Float64(Default::default()),
            DataType::Date32 => ColumnBuilder::Date32(Default::default()),
            DataType::Time64(TimeUnit::Microsecond) => ColumnBuilder::Time64(Default::default()),
            DataType::Timestamp(TimeUnit::Microsecond, _) => ColumnBuilder::Timestamp(
                TimestampMicrosecondBuilder::with_data_type(data_type.clone()),
            ),
            DataType::Duration(TimeUnit::Microsecond) => {
                ColumnBuilder::Duration(Default::default())
            }
            DataType::Interval(IntervalUnit::MonthDayNano) => {
                ColumnBuilder::Interval(Default::default())
            }
            DataType::Decimal128(_, _) => ColumnBuilder::Decimal128(
                Decimal128Builder::with_data_type(data_type.clone()),
            ),
            DataType::LargeBinary => ColumnBuilder::Binary(Default::default()),
            DataType::LargeUtf8 => ColumnBuilder::String(Default::default()),
            DataType::Dictionary(key, value)
                if key.as_ref() == &DataType::Int32 && value.as_ref() == &DataType::Utf8 =>
            {
                ColumnBuilder::Dictionary(Default::default())
            }
            DataType::LargeList(item) => ColumnBuilder::List(Box::new(ListBuilder::new(
                ColumnBuilder::try_new(item.data_type())?,
            ))),
            DataType::Struct(fields) => ColumnBuilder::Struct(StructBuilder::try_new(fields)?),
            _ => {
                return Err(Error::invalid_arg(
                    "data_type",
                    format!("no column builder for {data_type}"),
                ));
            }
        };
        Ok(builder)
    }

    /// Appends a null entry at the current position.
    pub fn push_null(&mut self) {
        match self {
            ColumnBuilder::List(b) => b.finish_null_list(),
            ColumnBuilder::Struct(b) => b.finish_null_struct(),
            ColumnBuilder::Boolean(b) => b.push_null(),
            ColumnBuilder::UInt8(b) => b.push_null(),
            ColumnBuilder::Int16(b) => b.push_null(),
            ColumnBuilder::Int32(b) => b.push_null(),
            ColumnBuilder::Int64(b) => b.push_null(),
            ColumnBuilder::Float32(b) => b.push_null(),
            ColumnBuilder::Float64(b) => b.push_null(),
            ColumnBuilder::Date32(b) => b.push_null(),
            ColumnBuilder::Time64(b) => b.push_null(),
            ColumnBuilder::Timestamp(b) => b.push_null(),
            ColumnBuilder::Duration(b) => b.push_null(),
            ColumnBuilder::Interval(b) => b.push_null(),
            ColumnBuilder::Decimal128(b) => b.push_null(),
            ColumnBuilder::Binary(b) => b.push_null(),
            ColumnBuilder::String(b) => b.push_null(),
            ColumnBuilder::Dictionary(b) => b.push_null(),
        }
    }

    /// Short name of the builder variant, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ColumnBuilder::Boolean(_) => "Boolean",
            ColumnBuilder::UInt8(_) => "UInt8",
            ColumnBuilder::Int16(_) => "Int16",
            ColumnBuilder::Int32(_) => "Int32",
            ColumnBuilder::Int64(_) => "Int64",
            ColumnBuilder::Float32(_) => "Float32",
            ColumnBuilder::Float64(_) => "Float64",
            ColumnBuilder::Date32(_) => "Date32",
            ColumnBuilder::Time64(_) => "Time64",
            ColumnBuilder::Timestamp(_) => "Timestamp",
            ColumnBuilder::Duration(_) => "Duration",
            ColumnBuilder::Interval(_) => "Interval",
            ColumnBuilder::Decimal128(_) => "Decimal128",
            ColumnBuilder::Binary(_) => "LargeBinary",
            ColumnBuilder::String(_) => "LargeUtf8",
            ColumnBuilder::Dictionary(_) => "Dictionary",
            ColumnBuilder::List(_) => "LargeList",
            ColumnBuilder::Struct(_) => "Struct",
        }
    }
}

impl ArrayBuilder for ColumnBuilder {
    fn data_type(&self) -> DataType {
        dispatch!(self, b => b.data_type())
    }

    #[inline]
    fn next_pos(&self) -> u64 {
        dispatch!(self, b => b.next_pos())
    }

    #[inline]
    fn move_to_pos(&mut self, pos: u64) {
        dispatch!(self, b => b.move_to_pos(pos))
    }

    fn build(&mut self) -> ArrayRef {
        dispatch!(self, b => b.build())
    }
}
