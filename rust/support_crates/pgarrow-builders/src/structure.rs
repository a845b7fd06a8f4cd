//! Struct array builder with runtime-typed children.

use std::sync::Arc;

use arrow_array::{ArrayRef, StructArray};
use arrow_buffer::NullBufferBuilder;
use arrow_schema::{DataType, Fields};
use pgarrow_common::Result;

use crate::{ArrayBuilder, ColumnBuilder};

/// Builds `StructArray`s, one [`ColumnBuilder`] per field.
///
/// Children are positioned lazily: [`field`](Self::field) moves a child up to the
/// entry being written, and `build` moves every child to the end. A field left
/// unwritten for an entry, and every field of a null entry, ends up null.
pub struct StructBuilder {
    next_pos: u64,
    fields: Fields,
    children: Vec<ColumnBuilder>,
    validity: NullBufferBuilder,
}

impl StructBuilder {
    pub fn try_new(fields: &Fields) -> Result<StructBuilder> {
        let children = fields
            .iter()
            .map(|f| ColumnBuilder::try_new(f.data_type()))
            .collect::<Result<Vec<_>>>()?;
        Ok(StructBuilder {
            next_pos: 0,
            fields: fields.clone(),
            children,
            validity: NullBufferBuilder::new(0),
        })
    }

    pub fn field_count(&self) -> usize {
        self.children.len()
    }

    /// Builder of field `index`, positioned at the current entry.
    pub fn field(&mut self, index: usize) -> Option<&mut ColumnBuilder> {
        let pos = self.next_pos;
        let child = self.children.get_mut(index)?;
        if child.next_pos() < pos {
            child.move_to_pos(pos);
        }
        Some(child)
    }

    pub fn finish_struct(&mut self) {
        self.pay_back_gap();
        self.validity.append_non_null();
        self.next_pos += 1;
    }

    pub fn finish_null_struct(&mut self) {
        self.pay_back_gap();
        self.validity.append_null();
        self.next_pos += 1;
    }

    fn pay_back_gap(&mut self) {
        let missing = (self.next_pos as usize).saturating_sub(self.validity.len());
        if missing > 0 {
            self.validity.append_n_nulls(missing);
        }
    }
}

impl ArrayBuilder for StructBuilder {
    fn data_type(&self) -> DataType {
        DataType::Struct(self.fields.clone())
    }

    #[inline]
    fn next_pos(&self) -> u64 {
        self.next_pos
    }

    #[inline]
    fn move_to_pos(&mut self, pos: u64) {
        self.next_pos = pos;
    }

    fn build(&mut self) -> ArrayRef {
        self.pay_back_gap();
        let len = self.next_pos;
        let nulls = self.validity.finish();
        self.next_pos = 0;

        if self.fields.is_empty() {
            return Arc::new(StructArray::new_empty_fields(len as usize, nulls));
        }
        let columns = self
            .children
            .iter_mut()
            .map(|child| {
                child.move_to_pos(len);
                child.build()
            })
            .collect();
        Arc::new(StructArray::new(self.fields.clone(), columns, nulls))
    }
}
