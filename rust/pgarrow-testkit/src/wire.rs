//! Encoder for the binary COPY field layout.
//!
//! Everything is big-endian. A field is an `i32` length followed by the value
//! bytes, or the length `-1` alone for a null.

use byteorder::{BigEndian, WriteBytesExt};

/// Appends wire-format fields to an in-memory buffer.
///
/// ```
/// use pgarrow_testkit::WireWriter;
///
/// let mut w = WireWriter::new();
/// w.row(2).int4_field(7).null();
/// assert_eq!(w.as_bytes(), &[0, 2, 0, 0, 0, 4, 0, 0, 0, 7, 0xff, 0xff, 0xff, 0xff]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct WireWriter {
    buf: Vec<u8>,
}

impl WireWriter {
    pub fn new() -> WireWriter {
        WireWriter::default()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Row header: the `i16` column count.
    pub fn row(&mut self, column_count: i16) -> &mut Self {
        self.raw_i16(column_count)
    }

    pub fn raw_u8(&mut self, value: u8) -> &mut Self {
        self.buf.push(value);
        self
    }

    pub fn raw_i16(&mut self, value: i16) -> &mut Self {
        self.buf.write_i16::<BigEndian>(value).expect("vec write");
        self
    }

    pub fn raw_u16(&mut self, value: u16) -> &mut Self {
        self.buf.write_u16::<BigEndian>(value).expect("vec write");
        self
    }

    pub fn raw_i32(&mut self, value: i32) -> &mut Self {
        self.buf.write_i32::<BigEndian>(value).expect("vec write");
        self
    }

    pub fn raw_u32(&mut self, value: u32) -> &mut Self {
        self.buf.write_u32::<BigEndian>(value).expect("vec write");
        self
    }

    pub fn raw_i64(&mut self, value: i64) -> &mut Self {
        self.buf.write_i64::<BigEndian>(value).expect("vec write");
        self
    }

    pub fn raw_f32(&mut self, value: f32) -> &mut Self {
        self.buf.write_f32::<BigEndian>(value).expect("vec write");
        self
    }

    pub fn raw_f64(&mut self, value: f64) -> &mut Self {
        self.buf.write_f64::<BigEndian>(value).expect("vec write");
        self
    }

    pub fn raw_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    /// A null field.
    pub fn null(&mut self) -> &mut Self {
        self.raw_i32(-1)
    }

    /// A field holding `bytes`.
    pub fn field(&mut self, bytes: &[u8]) -> &mut Self {
        self.raw_i32(bytes.len() as i32).raw_bytes(bytes)
    }

    /// A field whose body is written by `body`; the length prefix is filled in
    /// afterwards.
    pub fn nested(&mut self, body: impl FnOnce(&mut WireWriter)) -> &mut Self {
        let prefix_pos = self.buf.len();
        self.raw_i32(0);
        body(self);
        let len = (self.buf.len() - prefix_pos - 4) as i32;
        self.buf[prefix_pos..prefix_pos + 4].copy_from_slice(&len.to_be_bytes());
        self
    }

    pub fn bool_field(&mut self, value: bool) -> &mut Self {
        self.nested(|w| {
            w.raw_u8(value as u8);
        })
    }

    pub fn int2_field(&mut self, value: i16) -> &mut Self {
        self.nested(|w| {
            w.raw_i16(value);
        })
    }

    pub fn int4_field(&mut self, value: i32) -> &mut Self {
        self.nested(|w| {
            w.raw_i32(value);
        })
    }

    pub fn int8_field(&mut self, value: i64) -> &mut Self {
        self.nested(|w| {
            w.raw_i64(value);
        })
    }

    pub fn float4_field(&mut self, value: f32) -> &mut Self {
        self.nested(|w| {
            w.raw_f32(value);
        })
    }

    pub fn float8_field(&mut self, value: f64) -> &mut Self {
        self.nested(|w| {
            w.raw_f64(value);
        })
    }

    pub fn text_field(&mut self, value: &str) -> &mut Self {
        self.field(value.as_bytes())
    }

    /// An array field with the given dimension sizes (lower bounds of 1); `elements`
    /// writes the flattened element fields.
    pub fn array_field(
        &mut self,
        element_oid: u32,
        dims: &[i32],
        elements: impl FnOnce(&mut WireWriter),
    ) -> &mut Self {
        self.nested(|w| {
            w.raw_i32(dims.len() as i32).raw_i32(0).raw_u32(element_oid);
            for &size in dims {
                w.raw_i32(size).raw_i32(1);
            }
            elements(w);
        })
    }

    /// A composite field declaring `validcols` fields; `fields` writes each field
    /// as its type oid followed by the field itself.
    pub fn record_field(
        &mut self,
        validcols: i32,
        fields: impl FnOnce(&mut WireWriter),
    ) -> &mut Self {
        self.nested(|w| {
            w.raw_i32(validcols);
            fields(w);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::WireWriter;

    #[test]
    fn test_nested_backfills_length() {
        let mut w = WireWriter::new();
        w.array_field(23, &[2], |w| {
            w.int4_field(1).null();
        });
        let bytes = w.into_bytes();
        // 12 header + 8 dim + 8 element + 4 null
        assert_eq!(&bytes[..4], &32i32.to_be_bytes());
        assert_eq!(bytes.len(), 36);
    }
}
