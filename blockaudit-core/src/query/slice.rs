//! Offset/limit windows over fallible result streams.

use std::ops::Range;

use crate::error::AuditResult;

/// A window over a result stream. `limit: None` means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Slice {
    pub offset: usize,
    pub limit: Option<usize>,
}

impl Slice {
    pub fn new(offset: usize, limit: Option<usize>) -> Self {
        Self { offset, limit }
    }

    /// `start..end` becomes offset `start` and limit `end - start`.
    pub fn from_range(range: Range<usize>) -> Self {
        Self {
            offset: range.start,
            limit: Some(range.end.saturating_sub(range.start)),
        }
    }

    pub fn apply<I>(self, inner: I) -> Sliced<I> {
        Sliced {
            inner,
            to_skip: self.offset,
            remaining: self.limit,
            failed: false,
        }
    }
}

/// Iterator returned by [`Slice::apply`].
///
/// Only `Ok` items count toward the offset and limit. The first `Err` is
/// passed through and ends the stream. Once the limit is reached the inner
/// iterator is not polled again.
#[derive(Debug)]
pub struct Sliced<I> {
    inner: I,
    to_skip: usize,
    remaining: Option<usize>,
    failed: bool,
}

impl<I, T> Iterator for Sliced<I>
where
    I: Iterator<Item = AuditResult<T>>,
{
    type Item = AuditResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.remaining == Some(0) {
            return None;
        }
        loop {
            match self.inner.next()? {
                Ok(_) if self.to_skip > 0 => self.to_skip -= 1,
                Ok(item) => {
                    if let Some(remaining) = &mut self.remaining {
                        *remaining -= 1;
                    }
                    return Some(Ok(item));
                }
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
