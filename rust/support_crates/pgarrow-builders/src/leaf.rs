//! Builders for arrays without child arrays.
//!
//! A [`LeafBuilder`] pairs one of Arrow's own builders (the [`LeafStorage`]) with
//! the logical position required by [`ArrayBuilder`]. Positions skipped with
//! `move_to_pos` are paid back as nulls the next time anything is written, and
//! when the array is built.
//!
//! The concrete builders are aliases over the storages:
//!
//! | alias | output |
//! |---|---|
//! | [`BooleanBuilder`] | `Boolean` |
//! | [`UInt8Builder`], [`Int16Builder`], [`Int32Builder`], [`Int64Builder`] | integers |
//! | [`Float32Builder`], [`Float64Builder`] | floating point |
//! | [`Date32Builder`], [`Time64MicrosecondBuilder`] | days since the epoch, microseconds since midnight |
//! | [`TimestampMicrosecondBuilder`] | microseconds since the epoch, optionally with a timezone |
//! | [`DurationMicrosecondBuilder`], [`IntervalMonthDayNanoBuilder`] | elapsed time |
//! | [`Decimal128Builder`] | 128-bit decimals of a fixed precision and scale |
//! | [`BinaryBuilder`], [`StringBuilder`] | `LargeBinary`, `LargeUtf8` |
//! | [`DictionaryStringBuilder`] | `Dictionary(Int32, Utf8)` |

use std::sync::Arc;

use arrow_array::{
    ArrayRef, ArrowPrimitiveType,
    builder::{
        ArrayBuilder as _, LargeBinaryBuilder, LargeStringBuilder, StringDictionaryBuilder,
    },
    types::{
        Date32Type, Decimal128Type, DurationMicrosecondType, Float32Type, Float64Type,
        Int16Type, Int32Type, Int64Type, IntervalMonthDayNanoType, Time64MicrosecondType,
        TimestampMicrosecondType, UInt8Type,
    },
};
use arrow_schema::{ArrowError, DataType};
use pgarrow_common::{Result, error::Error};

use crate::ArrayBuilder;

/// Value storage of a [`LeafBuilder`], implemented for Arrow's builders.
pub trait LeafStorage: Send + Sync + 'static {
    /// What a single append takes.
    type Item<'a>;

    /// Output type when the builder is created with `Default`.
    fn default_type() -> DataType;

    fn create(data_type: &DataType) -> Self;

    /// Number of entries (values and nulls) stored so far.
    fn stored(&self) -> usize;

    fn append_item(&mut self, item: Self::Item<'_>) -> std::result::Result<(), ArrowError>;

    fn append_nulls(&mut self, count: usize);

    /// Produces the array and leaves the storage empty.
    fn finish_array(&mut self) -> ArrayRef;
}

/// A positioned builder for one leaf array type. See the module docs for aliases.
pub struct LeafBuilder<S: LeafStorage> {
    next_pos: u64,
    data_type: DataType,
    storage: S,
}

impl<S: LeafStorage> LeafBuilder<S> {
    /// Creates a builder producing arrays of `data_type`.
    ///
    /// Only parameterized types use this (timestamps with a timezone, decimals with
    /// a precision and scale); the data type must match the storage.
    pub fn with_data_type(data_type: DataType) -> Self {
        LeafBuilder {
            next_pos: 0,
            storage: S::create(&data_type),
            data_type,
        }
    }

    /// Writes a value at the current position and advances.
    pub fn push(&mut self, item: S::Item<'_>) -> Result<()> {
        self.pay_back_gap();
        self.storage
            .append_item(item)
            .map_err(|e| Error::arrow("appending value", e))?;
        self.next_pos += 1;
        Ok(())
    }

    /// Writes a null at the current position and advances.
    pub fn push_null(&mut self) {
        self.pay_back_gap();
        self.storage.append_nulls(1);
        self.next_pos += 1;
    }

    #[inline]
    fn pay_back_gap(&mut self) {
        let stored = self.storage.stored() as u64;
        if stored < self.next_pos {
            self.storage.append_nulls((self.next_pos - stored) as usize);
        }
        debug_assert_eq!(self.storage.stored() as u64, self.next_pos);
    }
}

impl<S: LeafStorage> Default for LeafBuilder<S> {
    fn default() -> Self {
        LeafBuilder::with_data_type(S::default_type())
    }
}

impl<S: LeafStorage> ArrayBuilder for LeafBuilder<S> {
    fn data_type(&self) -> DataType {
        self.data_type.clone()
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
        self.next_pos = 0;
        self.storage.finish_array()
    }
}

impl LeafStorage for arrow_array::builder::BooleanBuilder {
    type Item<'a> = bool;

    fn default_type() -> DataType {
        DataType::Boolean
    }

    fn create(_: &DataType) -> Self {
        Self::new()
    }

    fn stored(&self) -> usize {
        self.len()
    }

    fn append_item(&mut self, item: bool) -> std::result::Result<(), ArrowError> {
        self.append_value(item);
        Ok(())
    }

    fn append_nulls(&mut self, count: usize) {
        arrow_array::builder::BooleanBuilder::append_nulls(self, count);
    }

    fn finish_array(&mut self) -> ArrayRef {
        Arc::new(self.finish())
    }
}

impl<T: ArrowPrimitiveType> LeafStorage for arrow_array::builder::PrimitiveBuilder<T> {
    type Item<'a> = T::Native;

    fn default_type() -> DataType {
        T::DATA_TYPE
    }

    fn create(data_type: &DataType) -> Self {
        Self::new().with_data_type(data_type.clone())
    }

    fn stored(&self) -> usize {
        self.len()
    }

    fn append_item(&mut self, item: T::Native) -> std::result::Result<(), ArrowError> {
        self.append_value(item);
        Ok(())
    }

    fn append_nulls(&mut self, count: usize) {
        arrow_array::builder::PrimitiveBuilder::append_nulls(self, count);
    }

    fn finish_array(&mut self) -> ArrayRef {
        Arc::new(self.finish())
    }
}

impl LeafStorage for LargeBinaryBuilder {
    type Item<'a> = &'a [u8];

    fn default_type() -> DataType {
        DataType::LargeBinary
    }

    fn create(_: &DataType) -> Self {
        Self::new()
    }

    fn stored(&self) -> usize {
        self.len()
    }

    fn append_item(&mut self, item: &[u8]) -> std::result::Result<(), ArrowError> {
        self.append_value(item);
        Ok(())
    }

    fn append_nulls(&mut self, count: usize) {
        (0..count).for_each(|_| self.append_null());
    }

    fn finish_array(&mut self) -> ArrayRef {
        Arc::new(self.finish())
    }
}

impl LeafStorage for LargeStringBuilder {
    type Item<'a> = &'a str;

    fn default_type() -> DataType {
        DataType::LargeUtf8
    }

    fn create(_: &DataType) -> Self {
        Self::new()
    }

    fn stored(&self) -> usize {
        self.len()
    }

    fn append_item(&mut self, item: &str) -> std::result::Result<(), ArrowError> {
        self.append_value(item);
        Ok(())
    }

    fn append_nulls(&mut self, count: usize) {
        (0..count).for_each(|_| self.append_null());
    }

    fn finish_array(&mut self) -> ArrayRef {
        Arc::new(self.finish())
    }
}

/// Each distinct string is stored once; rows hold `Int32` keys. Appending fails
/// once the dictionary outgrows the key space.
impl LeafStorage for StringDictionaryBuilder<Int32Type> {
    type Item<'a> = &'a str;

    fn default_type() -> DataType {
        DataType::Dictionary(Box::new(DataType::Int32), Box::new(DataType::Utf8))
    }

    fn create(_: &DataType) -> Self {
        Self::new()
    }

    fn stored(&self) -> usize {
        self.len()
    }

    fn append_item(&mut self, item: &str) -> std::result::Result<(), ArrowError> {
        self.append(item).map(|_| ())
    }

    fn append_nulls(&mut self, count: usize) {
        (0..count).for_each(|_| self.append_null());
    }

    fn finish_array(&mut self) -> ArrayRef {
        Arc::new(self.finish())
    }
}

pub type BooleanBuilder = LeafBuilder<arrow_array::builder::BooleanBuilder>;

pub type PrimitiveBuilder<T> = LeafBuilder<arrow_array::builder::PrimitiveBuilder<T>>;

pub type UInt8Builder = PrimitiveBuilder<UInt8Type>;
pub type Int16Builder = PrimitiveBuilder<Int16Type>;
pub type Int32Builder = PrimitiveBuilder<Int32Type>;
pub type Int64Builder = PrimitiveBuilder<Int64Type>;
pub type Float32Builder = PrimitiveBuilder<Float32Type>;
pub type Float64Builder = PrimitiveBuilder<Float64Type>;
pub type Date32Builder = PrimitiveBuilder<Date32Type>;
pub type Time64MicrosecondBuilder = PrimitiveBuilder<Time64MicrosecondType>;
pub type TimestampMicrosecondBuilder = PrimitiveBuilder<TimestampMicrosecondType>;
pub type DurationMicrosecondBuilder = PrimitiveBuilder<DurationMicrosecondType>;
pub type IntervalMonthDayNanoBuilder = PrimitiveBuilder<IntervalMonthDayNanoType>;
pub type Decimal128Builder = PrimitiveBuilder<Decimal128Type>;

pub type BinaryBuilder = LeafBuilder<LargeBinaryBuilder>;

pub type StringBuilder = LeafBuilder<LargeStringBuilder>;

pub type DictionaryStringBuilder = LeafBuilder<StringDictionaryBuilder<Int32Type>>;
