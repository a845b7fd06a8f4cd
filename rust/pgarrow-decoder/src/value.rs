//! Typed values handed from decoders to column sinks.

/// A calendar interval split into its three independent components.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Interval {
    pub months: i32,
    pub days: i32,
    pub nanoseconds: i64,
}

/// One decoded field value, borrowing variable-length payloads from the row buffer.
///
/// Temporal values are already converted to the UNIX epoch and to the unit of the
/// variant (days for `Date32`, microseconds for `Time64`, `Timestamp` and `Duration`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value<'a> {
    Bool(bool),
    UInt8(u8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Date32(i32),
    Time64(i64),
    Timestamp(i64),
    Duration(i64),
    Interval(Interval),
    Decimal128(i128),
    /// Opaque bytes, stored verbatim.
    Bytes(&'a [u8]),
    /// Text in the client encoding (UTF-8), validated by the sink.
    Text(&'a [u8]),
}

impl Value<'_> {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "Bool",
            Value::UInt8(_) => "UInt8",
            Value::Int16(_) => "Int16",
            Value::Int32(_) => "Int32",
            Value::Int64(_) => "Int64",
            Value::Float32(_) => "Float32",
            Value::Float64(_) => "Float64",
            Value::Date32(_) => "Date32",
            Value::Time64(_) => "Time64",
            Value::Timestamp(_) => "Timestamp",
            Value::Duration(_) => "Duration",
            Value::Interval(_) => "Interval",
            Value::Decimal128(_) => "Decimal128",
            Value::Bytes(_) => "Bytes",
            Value::Text(_) => "Text",
        }
    }
}
