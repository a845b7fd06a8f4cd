//! Row sources: anything yielding successive raw row buffers.

use pgarrow_common::Result;

/// A stream of row buffers in the binary COPY tuple layout.
///
/// `Ok(None)` is the normal end of the stream. The returned slice is only valid
/// until the next call.
pub trait RowSource {
    fn next_row(&mut self) -> Result<Option<&[u8]>>;
}

impl<S: RowSource + ?Sized> RowSource for &mut S {
    fn next_row(&mut self) -> Result<Option<&[u8]>> {
        (**self).next_row()
    }
}

/// Adapts an iterator of in-memory row buffers into a [`RowSource`].
pub struct RowsFromIter<I: Iterator> {
    iter: I,
    current: Option<I::Item>,
}

impl<I> RowsFromIter<I>
where
    I: Iterator,
    I::Item: AsRef<[u8]>,
{
    pub fn new(rows: impl IntoIterator<IntoIter = I>) -> RowsFromIter<I> {
        RowsFromIter {
            iter: rows.into_iter(),
            current: None,
        }
    }
}

impl<I> RowSource for RowsFromIter<I>
where
    I: Iterator,
    I::Item: AsRef<[u8]>,
{
    fn next_row(&mut self) -> Result<Option<&[u8]>> {
        self.current = self.iter.next();
        Ok(self.current.as_ref().map(|row| row.as_ref()))
    }
}
