//! Primitive types: a width-matched big-endian read plus a value transform.

use arrow_schema::{DataType, IntervalUnit, TimeUnit};
use pgarrow_common::{Result, verify_data};

use crate::{
    cursor::ByteCursor,
    datetime,
    options::IntervalRepresentation,
    sink::ColumnSink,
    value::Value,
};

use super::expect_width;

/// Format version byte leading every binary `jsonb` value.
pub const JSONB_VERSION: u8 = 1;

/// Timezone of `timestamptz` columns; the server sends them normalized to UTC.
pub const UTC: &str = "UTC";

/// The scalar decoding rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScalarKind {
    /// One byte, nonzero is true.
    Bool,
    /// Single-byte `"char"`.
    Char,
    Int16,
    /// `int4` and the unsigned 32-bit identifiers (`oid`, `xid`, `cid`, `reg*`).
    Int32,
    /// `int8`, `money`, `pg_lsn`, `xid8`.
    Int64,
    Float32,
    Float64,
    Date,
    Time,
    TimeTz,
    Timestamp,
    TimestampTz,
    Interval(IntervalRepresentation),
    /// UTF-8 text, optionally dictionary encoded.
    Text { dictionary: bool },
    /// Versioned binary `jsonb`, stored as its JSON text.
    Jsonb,
    /// Opaque bytes.
    Bytes,
}

impl ScalarKind {
    /// Exact body width of fixed-width kinds.
    pub fn width(&self) -> Option<usize> {
        match self {
            ScalarKind::Bool | ScalarKind::Char => Some(1),
            ScalarKind::Int16 => Some(2),
            ScalarKind::Int32 | ScalarKind::Float32 | ScalarKind::Date => Some(4),
            ScalarKind::Int64
            | ScalarKind::Float64
            | ScalarKind::Time
            | ScalarKind::Timestamp
            | ScalarKind::TimestampTz => Some(8),
            ScalarKind::TimeTz => Some(12),
            ScalarKind::Interval(_) => Some(16),
            ScalarKind::Text { .. } | ScalarKind::Jsonb | ScalarKind::Bytes => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ScalarDecoder {
    kind: ScalarKind,
}

impl ScalarDecoder {
    pub fn new(kind: ScalarKind) -> ScalarDecoder {
        ScalarDecoder { kind }
    }

    pub fn kind(&self) -> ScalarKind {
        self.kind
    }

    pub fn data_type(&self) -> DataType {
        match self.kind {
            ScalarKind::Bool => DataType::Boolean,
            ScalarKind::Char => DataType::UInt8,
            ScalarKind::Int16 => DataType::Int16,
            ScalarKind::Int32 => DataType::Int32,
            ScalarKind::Int64 => DataType::Int64,
            ScalarKind::Float32 => DataType::Float32,
            ScalarKind::Float64 => DataType::Float64,
            ScalarKind::Date => DataType::Date32,
            ScalarKind::Time | ScalarKind::TimeTz => DataType::Time64(TimeUnit::Microsecond),
            ScalarKind::Timestamp => DataType::Timestamp(TimeUnit::Microsecond, None),
            ScalarKind::TimestampTz => {
                DataType::Timestamp(TimeUnit::Microsecond, Some(UTC.into()))
            }
            ScalarKind::Interval(IntervalRepresentation::MonthDayNano) => {
                DataType::Interval(IntervalUnit::MonthDayNano)
            }
            ScalarKind::Interval(IntervalRepresentation::Duration) => {
                DataType::Duration(TimeUnit::Microsecond)
            }
            ScalarKind::Text { dictionary: true } => {
                DataType::Dictionary(Box::new(DataType::Int32), Box::new(DataType::Utf8))
            }
            ScalarKind::Text { dictionary: false } | ScalarKind::Jsonb => DataType::LargeUtf8,
            ScalarKind::Bytes => DataType::LargeBinary,
        }
    }

    /// Null policy: floating point columns receive NaN instead of a null.
    pub(crate) fn decode_null(&self, sink: &mut dyn ColumnSink) -> Result<()> {
        match self.kind {
            ScalarKind::Float32 => sink.append_value(Value::Float32(f32::NAN)),
            ScalarKind::Float64 => sink.append_value(Value::Float64(f64::NAN)),
            _ => sink.append_null(),
        }
    }

    pub(crate) fn decode_value(
        &self,
        body: &mut ByteCursor,
        sink: &mut dyn ColumnSink,
    ) -> Result<()> {
        if let Some(width) = self.kind.width() {
            expect_width(body, width)?;
        }
        let value = match self.kind {
            ScalarKind::Bool => Value::Bool(body.read_u8()? != 0),
            ScalarKind::Char => Value::UInt8(body.read_u8()?),
            ScalarKind::Int16 => Value::Int16(body.read_i16()?),
            ScalarKind::Int32 => Value::Int32(body.read_i32()?),
            ScalarKind::Int64 => Value::Int64(body.read_i64()?),
            ScalarKind::Float32 => Value::Float32(body.read_f32()?),
            ScalarKind::Float64 => Value::Float64(body.read_f64()?),
            ScalarKind::Date => Value::Date32(datetime::pg_days_to_unix_days(body.read_i32()?)),
            ScalarKind::Time => Value::Time64(body.read_i64()?),
            ScalarKind::TimeTz => {
                let micros = body.read_i64()?;
                let zone = body.read_i32()?;
                Value::Time64(datetime::timetz_to_micros(micros, zone))
            }
            ScalarKind::Timestamp | ScalarKind::TimestampTz => {
                Value::Timestamp(datetime::pg_micros_to_unix_micros(body.read_i64()?))
            }
            ScalarKind::Interval(representation) => {
                let micros = body.read_i64()?;
                let days = body.read_i32()?;
                let months = body.read_i32()?;
                match representation {
                    IntervalRepresentation::MonthDayNano => Value::Interval(
                        datetime::interval_to_month_day_nano(micros, days, months),
                    ),
                    IntervalRepresentation::Duration => {
                        Value::Duration(datetime::interval_to_duration_micros(micros, days))
                    }
                }
            }
            ScalarKind::Text { .. } => Value::Text(body.read_bytes(body.remaining())?),
            ScalarKind::Jsonb => {
                let version = body.read_u8()?;
                verify_data!(jsonb_version, version == JSONB_VERSION);
                Value::Text(body.read_bytes(body.remaining())?)
            }
            ScalarKind::Bytes => Value::Bytes(body.read_bytes(body.remaining())?),
        };
        sink.append_value(value)
    }
}
