use std::ops::Range;

use serde::Serialize;

use coord3d_core::{StoreError, StoreResult};

///
/// Which slice of a requested model list to return. `page` is zero-based.
///
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct PageRequest {
    pub page: usize,
    pub page_size: usize,
}

impl PageRequest {
    pub fn new(page: usize, page_size: usize) -> StoreResult<Self> {
        if page_size == 0 {
            return Err(StoreError::InvalidPage(0));
        }
        Ok(PageRequest { page, page_size })
    }

    ///
    /// Build from the one-based page numbers callers use. Pages below 1 are
    /// treated as the first page.
    ///
    pub fn from_one_based(page: i64, page_size: usize) -> StoreResult<Self> {
        let page = usize::try_from(page.max(1) - 1).unwrap_or(usize::MAX);
        PageRequest::new(page, page_size)
    }

    ///
    /// Index range of this page within a list of `count` items. Pages past
    /// the end are empty.
    ///
    pub fn bounds(&self, count: usize) -> Range<usize> {
        let start = self.page.saturating_mul(self.page_size).min(count);
        let end = start.saturating_add(self.page_size).min(count);
        start..end
    }
}

pub fn page_count(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size)
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Serialize)]
pub struct PaginationInfo {
    pub model_count: usize,
    pub page_count: usize,
    /// zero-based
    pub page: usize,
    pub page_size: usize,
}

impl PaginationInfo {
    pub fn new(model_count: usize, request: PageRequest) -> Self {
        PaginationInfo {
            model_count,
            page_count: page_count(model_count, request.page_size),
            page: request.page,
            page_size: request.page_size,
        }
    }
}
