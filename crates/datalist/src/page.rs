//! Offset and row-count clamping and slicing.

use crate::request::FilterRequest;

/// Smallest page size a request may ask for.
pub const MIN_ROWS: i32 = 1;

/// Largest page size a request may ask for.
pub const MAX_ROWS: i32 = 100;

/// Page size used when a request does not specify one.
pub const DEFAULT_ROWS: i32 = 20;

/// Clamped offset and row count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: usize,
    pub rows: usize,
}

impl Page {
    /// Clamps `offset` to `>= 0` and `rows` to `[MIN_ROWS, MAX_ROWS]`.
    pub fn clamp(offset: i32, rows: i32) -> Page {
        Page {
            offset: offset.max(0) as usize,
            rows: rows.clamp(MIN_ROWS, MAX_ROWS) as usize,
        }
    }

    /// Clamps the request's paging fields in place and returns the page.
    ///
    /// The request keeps the clamped values so the caller can echo them.
    pub fn clamp_request(request: &mut FilterRequest) -> Page {
        let page = Page::clamp(request.offset, request.rows);
        request.offset = page.offset as i32;
        request.rows = page.rows as i32;
        page
    }

    /// Skips `offset` items and takes at most `rows`.
    pub fn apply<I: IntoIterator>(self, items: I) -> impl Iterator<Item = I::Item> {
        items.into_iter().skip(self.offset).take(self.rows)
    }
}
