//! Paginated resource lists.
//!
//! A list is split in two halves: a [`ResourceFetcher`] that knows how to load
//! one page of filtered resources, and a [`ResourceList`] controller that owns
//! pagination, filters, selection and the currently displayed page.

use crate::client::ClientError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;

pub mod controller;
pub mod params;

pub use controller::{FetchOutcome, ListSnapshot, ResourceList};
pub use params::{normalize_params, ParamsError};

/// Page requested from a list endpoint. Both fields are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PageRequest {
    page: u32,
    size: u32,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PageError {
    #[error("page must be at least 1")]
    ZeroPage,
    #[error("page size must be at least 1")]
    ZeroSize,
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Result<Self, PageError> {
        if page == 0 {
            return Err(PageError::ZeroPage);
        }
        if size == 0 {
            return Err(PageError::ZeroSize);
        }
        Ok(Self { page, size })
    }

    /// First page of the given size
    pub fn first(size: u32) -> Result<Self, PageError> {
        Self::new(1, size)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Build a request, clamping zero page or size to 1
    pub(crate) fn clamped(page: u32, size: u32) -> Self {
        Self {
            page: page.max(1),
            size: size.max(1),
        }
    }

    /// Same size, different page; page 0 is clamped to 1
    pub(crate) fn at(self, page: u32) -> Self {
        Self {
            page: page.max(1),
            size: self.size,
        }
    }

    /// First page with a different size; size 0 is clamped to 1
    pub(crate) fn resized(self, size: u32) -> Self {
        Self {
            page: 1,
            size: size.max(1),
        }
    }
}

/// Number of pages needed to show `total` items, `size` at a time
pub fn page_count(total: u64, size: u32) -> u32 {
    let size = u64::from(size.max(1));
    total.div_ceil(size).try_into().unwrap_or(u32::MAX)
}

/// One page of resources plus the total across all pages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult<T> {
    #[serde(default = "Vec::new")]
    pub list: Vec<T>,
    #[serde(default)]
    pub total: u64,
}

impl<T> PageResult<T> {
    pub fn new(list: Vec<T>, total: u64) -> Self {
        Self { list, total }
    }

    pub fn empty() -> Self {
        Self {
            list: Vec::new(),
            total: 0,
        }
    }
}

impl<T> Default for PageResult<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// A backend-owned record identified by a numeric id
pub trait Resource {
    fn id(&self) -> i64;
}

/// Loads one page of filtered resources.
///
/// Implementations must not have side effects: fetching the same page with the
/// same filters twice yields the same data unless the backend changed.
#[async_trait]
pub trait ResourceFetcher<T, F>: Send + Sync
where
    T: Send + 'static,
    F: Send + 'static,
{
    async fn fetch(&self, page: PageRequest, filters: F) -> Result<PageResult<T>, ClientError>;
}

/// Adapter turning an async closure into a [`ResourceFetcher`]
pub struct FnFetcher<Fun>(Fun);

/// Wrap a closure `|page, filters| async { ... }` as a fetcher
pub fn fetch_fn<Fun>(fun: Fun) -> FnFetcher<Fun> {
    FnFetcher(fun)
}

#[async_trait]
impl<T, F, Fun, Fut> ResourceFetcher<T, F> for FnFetcher<Fun>
where
    T: Send + 'static,
    F: Send + 'static,
    Fun: Fn(PageRequest, F) -> Fut + Send + Sync,
    Fut: Future<Output = Result<PageResult<T>, ClientError>> + Send + 'static,
{
    async fn fetch(&self, page: PageRequest, filters: F) -> Result<PageResult<T>, ClientError> {
        (self.0)(page, filters).await
    }
}
