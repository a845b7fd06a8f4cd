//! Column sink interface and its Arrow builder implementation.

use pgarrow_builders::ColumnBuilder;
use pgarrow_common::{Result, error::Error};

use crate::value::Value;

/// Append-only destination for the values of one column (or one nesting level of it).
///
/// The Nth value or null appended to a sink becomes the Nth entry of the resulting
/// array, so callers must append in row order. Sinks are single-writer.
///
/// Array levels are written as `begin_entry`, any number of values on
/// [`element`](Self::element), then `end_entry`. Struct levels are written as
/// `begin_record`, one value on each [`field`](Self::field), then `end_record`.
pub trait ColumnSink {
    fn append_value(&mut self, value: Value<'_>) -> Result<()>;

    fn append_null(&mut self) -> Result<()>;

    fn begin_entry(&mut self) -> Result<()>;

    /// Sink receiving the elements of the array entry being written.
    fn element(&mut self) -> Result<&mut dyn ColumnSink>;

    fn end_entry(&mut self) -> Result<()>;

    fn begin_record(&mut self) -> Result<()>;

    /// Sink receiving field `index` of the struct entry being written.
    fn field(&mut self, index: usize) -> Result<&mut dyn ColumnSink>;

    fn end_record(&mut self) -> Result<()>;
}

impl ColumnSink for ColumnBuilder {
    fn append_value(&mut self, value: Value<'_>) -> Result<()> {
        match (self, value) {
            (ColumnBuilder::Boolean(b), Value::Bool(v)) => b.push(v),
            (ColumnBuilder::UInt8(b), Value::UInt8(v)) => b.push(v),
            (ColumnBuilder::Int16(b), Value::Int16(v)) => b.push(v),
            (ColumnBuilder::Int32(b), Value::Int32(v)) => b.push(v),
            (ColumnBuilder::Int64(b), Value::Int64(v)) => b.push(v),
            (ColumnBuilder::Float32(b), Value::Float32(v)) => b.push(v),
            (ColumnBuilder::Float64(b), Value::Float64(v)) => b.push(v),
            (ColumnBuilder::Date32(b), Value::Date32(v)) => b.push(v),
            (ColumnBuilder::Time64(b), Value::Time64(v)) => b.push(v),
            (ColumnBuilder::Timestamp(b), Value::Timestamp(v)) => b.push(v),
            (ColumnBuilder::Duration(b), Value::Duration(v)) => b.push(v),
            (ColumnBuilder::Interval(b), Value::Interval(v)) => b.push(
                arrow_buffer::IntervalMonthDayNano::new(v.months, v.days, v.nanoseconds),
            ),
            (ColumnBuilder::Decimal128(b), Value::Decimal128(v)) => b.push(v),
            (ColumnBuilder::Binary(b), Value::Bytes(v)) => b.push(v),
            (ColumnBuilder::String(b), Value::Text(v)) => b.push(to_str(v)?),
            (ColumnBuilder::Dictionary(b), Value::Text(v)) => b.push(to_str(v)?),
            (builder, value) => Err(Error::sink_mismatch(builder.kind_name(), value.kind_name())),
        }
    }

    fn append_null(&mut self) -> Result<()> {
        self.push_null();
        Ok(())
    }

    fn begin_entry(&mut self) -> Result<()> {
        match self {
            ColumnBuilder::List(_) => Ok(()),
            other => Err(Error::sink_mismatch(other.kind_name(), "LargeList")),
        }
    }

    fn element(&mut self) -> Result<&mut dyn ColumnSink> {
        match self {
            ColumnBuilder::List(list) => Ok(list.item()),
            other => Err(Error::sink_mismatch(other.kind_name(), "LargeList")),
        }
    }

    fn end_entry(&mut self) -> Result<()> {
        match self {
            ColumnBuilder::List(list) => {
                list.finish_list();
                Ok(())
            }
            other => Err(Error::sink_mismatch(other.kind_name(), "LargeList")),
        }
    }

    fn begin_record(&mut self) -> Result<()> {
        match self {
            ColumnBuilder::Struct(_) => Ok(()),
            other => Err(Error::sink_mismatch(other.kind_name(), "Struct")),
        }
    }

    fn field(&mut self, index: usize) -> Result<&mut dyn ColumnSink> {
        match self {
            ColumnBuilder::Struct(fields) => {
                let count = fields.field_count();
                match fields.field(index) {
                    Some(field) => Ok(field),
                    None => Err(Error::invalid_arg(
                        "index",
                        format!("struct has {count} fields"),
                    )),
                }
            }
            other => Err(Error::sink_mismatch(other.kind_name(), "Struct")),
        }
    }

    fn end_record(&mut self) -> Result<()> {
        match self {
            ColumnBuilder::Struct(fields) => {
                fields.finish_struct();
                Ok(())
            }
            other => Err(Error::sink_mismatch(other.kind_name(), "Struct")),
        }
    }
}

#[inline]
fn to_str(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|e| Error::invalid_format("text", e.to_string()))
}

