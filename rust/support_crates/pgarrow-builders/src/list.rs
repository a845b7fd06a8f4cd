//! `LargeList` builder over any child builder.

use std::sync::Arc;

use arrow_array::{ArrayRef, LargeListArray};
use arrow_buffer::{NullBufferBuilder, OffsetBuffer};
use arrow_schema::{DataType, Field, FieldRef};

use crate::ArrayBuilder;

/// Builds `LargeListArray`s.
///
/// Items go to the child returned by [`item`](Self::item). [`finish_list`](Self::finish_list)
/// closes a list spanning every item written since the previous list was closed;
/// [`finish_null_list`](Self::finish_null_list) closes a null one. The builder records
/// the length of every list and derives the offsets when the array is built.
pub struct ListBuilder<T: ArrayBuilder> {
    next_pos: u64,
    items: T,
    lengths: Vec<usize>,
    validity: NullBufferBuilder,
    /// Child position at which the open list starts.
    open_start: u64,
}

impl<T: ArrayBuilder> ListBuilder<T> {
    pub fn new(items: T) -> ListBuilder<T> {
        ListBuilder {
            next_pos: 0,
            items,
            lengths: Vec::new(),
            validity: NullBufferBuilder::new(0),
            open_start: 0,
        }
    }

    pub fn item(&mut self) -> &mut T {
        &mut self.items
    }

    /// Closes the open list as valid and returns its length.
    pub fn finish_list(&mut self) -> usize {
        let len = self.close();
        self.validity.append_non_null();
        len
    }

    /// Closes the open list as null. Items written to it, if any, stay in the child
    /// array but are not reachable through a valid list.
    pub fn finish_null_list(&mut self) {
        self.close();
        self.validity.append_null();
    }

    fn close(&mut self) -> usize {
        self.pay_back_gap();
        let end = self.items.next_pos();
        let len = (end - self.open_start) as usize;
        self.lengths.push(len);
        self.open_start = end;
        self.next_pos += 1;
        len
    }

    /// Skipped positions become empty null lists.
    fn pay_back_gap(&mut self) {
        let missing = (self.next_pos as usize).saturating_sub(self.lengths.len());
        if missing > 0 {
            self.lengths.resize(self.lengths.len() + missing, 0);
            self.validity.append_n_nulls(missing);
        }
    }

    fn item_field(&self) -> FieldRef {
        Arc::new(Field::new("item", self.items.data_type(), true))
    }
}

impl<T: ArrayBuilder + Default> Default for ListBuilder<T> {
    fn default() -> Self {
        ListBuilder::new(T::default())
    }
}

impl<T: ArrayBuilder> ArrayBuilder for ListBuilder<T> {
    fn data_type(&self) -> DataType {
        DataType::LargeList(self.item_field())
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
        let field = self.item_field();
        let offsets = OffsetBuffer::<i64>::from_lengths(std::mem::take(&mut self.lengths));
        let values = self.items.build();
        let nulls = self.validity.finish();
        self.next_pos = 0;
        self.open_start = 0;
        Arc::new(LargeListArray::new(field, offsets, values, nulls))
    }
}
