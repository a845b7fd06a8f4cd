//! Arrays of any dimensionality, flattened into one list entry per field.
//!
//! Wire layout of an array body:
//!
//! ```text
//! ndim: i32, flags: i32, element_oid: u32,
//! [size: i32, lower_bound: i32; ndim],
//! [element field (length-prefixed); product(size)]
//! ```

use std::sync::Arc;

use arrow_schema::{DataType, Field};
use pgarrow_common::{Result, error::Error};
use tinyvec::ArrayVec;

use crate::{cursor::ByteCursor, sink::ColumnSink};

use super::{FieldDecoder, LENGTH_PREFIX_SIZE, skip_field};

/// Maximum number of array dimensions the server allows.
pub const MAX_DIMENSIONS: usize = 6;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ArrayDimension {
    pub size: i32,
    pub lower_bound: i32,
}

/// Shape of an array value as declared in its header.
///
/// Decoding flattens the elements in row-major order; the header is the only
/// place the original shape is recorded.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArrayHeader {
    pub has_nulls: bool,
    pub element_oid: u32,
    pub dims: ArrayVec<[ArrayDimension; MAX_DIMENSIONS]>,
    element_count: usize,
}

impl ArrayHeader {
    /// Reads and validates an array header.
    pub fn read(cursor: &mut ByteCursor) -> Result<ArrayHeader> {
        let ndim = cursor.read_i32()?;
        if ndim < 0 || ndim as usize > MAX_DIMENSIONS {
            return Err(Error::invalid_format(
                "array",
                format!("invalid number of dimensions {ndim}"),
            ));
        }
        let flags = cursor.read_i32()?;
        let element_oid = cursor.read_u32()?;

        let mut dims = ArrayVec::new();
        let mut element_count = if ndim == 0 { 0usize } else { 1usize };
        for _ in 0..ndim {
            let size = cursor.read_i32()?;
            let lower_bound = cursor.read_i32()?;
            if size < 0 {
                return Err(Error::invalid_format(
                    "array",
                    format!("negative dimension size {size}"),
                ));
            }
            element_count = element_count
                .checked_mul(size as usize)
                .ok_or_else(|| Error::invalid_format("array", "element count overflow"))?;
            dims.push(ArrayDimension { size, lower_bound });
        }

        Ok(ArrayHeader {
            has_nulls: flags != 0,
            element_oid,
            dims,
            element_count,
        })
    }

    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// Product of the dimension sizes; `0` for a zero-dimensional (empty) array.
    pub fn element_count(&self) -> usize {
        self.element_count
    }
}

/// Decodes an array field into one list entry holding all of its elements.
///
/// An empty array is an empty list, never a null.
#[derive(Clone, Debug)]
pub struct ArrayDecoder {
    element: Arc<FieldDecoder>,
}

impl ArrayDecoder {
    pub fn new(element: FieldDecoder) -> ArrayDecoder {
        ArrayDecoder {
            element: Arc::new(element),
        }
    }

    pub fn element(&self) -> &FieldDecoder {
        &self.element
    }

    pub fn data_type(&self) -> DataType {
        DataType::LargeList(Arc::new(Field::new(
            "item",
            self.element.data_type(),
            true,
        )))
    }

    pub(crate) fn decode_value(
        &self,
        body: &mut ByteCursor,
        sink: &mut dyn ColumnSink,
    ) -> Result<()> {
        let header = ArrayHeader::read(body)?;
        let count = header.element_count();
        // Each element carries at least its length prefix.
        let min_size = count.saturating_mul(LENGTH_PREFIX_SIZE);
        if body.remaining() < min_size {
            return Err(Error::truncated(min_size, body.remaining()));
        }
        // Element framing must be complete before the sink sees the entry.
        let mut framing = body.clone();
        for _ in 0..count {
            skip_field(&mut framing)?;
        }

        sink.begin_entry()?;
        {
            let items = sink.element()?;
            for _ in 0..count {
                self.element.decode(body, items)?;
            }
        }
        sink.end_entry()
    }
}

#[cfg(test)]
mod tests {
    use pgarrow_common::error::ErrorKind;

    use super::ArrayHeader;
    use crate::cursor::ByteCursor;

    fn header_bytes(ndim: i32, dims: &[(i32, i32)]) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend(ndim.to_be_bytes());
        buf.extend(0i32.to_be_bytes());
        buf.extend(23u32.to_be_bytes());
        for (size, lb) in dims {
            buf.extend(size.to_be_bytes());
            buf.extend(lb.to_be_bytes());
        }
        buf
    }

    #[test]
    fn test_header_shape() {
        let buf = header_bytes(2, &[(2, 1), (3, 0)]);
        let header = ArrayHeader::read(&mut ByteCursor::new(&buf)).unwrap();
        assert_eq!(header.ndim(), 2);
        assert_eq!(header.element_count(), 6);
        assert_eq!(header.element_oid, 23);
        assert_eq!(header.dims[0].lower_bound, 1);
        assert!(!header.has_nulls);

        let buf = header_bytes(0, &[]);
        let header = ArrayHeader::read(&mut ByteCursor::new(&buf)).unwrap();
        assert_eq!(header.element_count(), 0);
    }

    #[test]
    fn test_header_rejects_bad_shapes() {
        for buf in [
            header_bytes(-1, &[]),
            header_bytes(7, &[(1, 1); 7]),
            header_bytes(1, &[(-2, 1)]),
        ] {
            let err = ArrayHeader::read(&mut ByteCursor::new(&buf)).unwrap_err();
            assert!(matches!(err.kind(), ErrorKind::InvalidFormat { .. }));
        }
    }
}
