//! Paginator state: the page/page-size cursor shared by the table and the chart.
//!
//! Pages are one-based. The paginator never fetches anything; it only validates
//! navigation requests and reports accepted ones as [`PaginatorEvent`]s for
//! the view controller to act on.

use crate::constants::{DEFAULT_PAGE_SIZE, DEFAULT_PAGE_SIZE_OPTIONS, FIRST_PAGE};
use serde::{Deserialize, Serialize};

/// How the upper end of `request_page_change` is checked.
///
/// `Exclusive` rejects `n >= total_pages`, which leaves the last page
/// unreachable through navigation. It is the long-standing behavior and the
/// default; `Inclusive` accepts `n == total_pages`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageBound {
    #[default]
    Exclusive,
    Inclusive,
}

/// An accepted paginator change
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaginatorEvent {
    PageChanged(u32),
    PageSizeChanged(u32),
}

/// State for a paginator instance
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PaginatorState {
    /// Current page (1-indexed)
    current_page: u32,
    /// Rows per page
    page_size: u32,
    /// Sizes offered to the user
    page_size_options: Vec<u32>,
    /// Page count reported by the last accepted fetch
    total_pages: u32,
    #[serde(skip)]
    bound: PageBound,
}

impl Default for PaginatorState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, DEFAULT_PAGE_SIZE_OPTIONS.to_vec())
    }
}

impl PaginatorState {
    pub fn new(initial_page_size: u32, page_size_options: Vec<u32>) -> Self {
        Self {
            current_page: FIRST_PAGE,
            page_size: initial_page_size,
            page_size_options,
            total_pages: 1,
            bound: PageBound::default(),
        }
    }

    pub fn with_bound(mut self, bound: PageBound) -> Self {
        self.bound = bound;
        self
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn page_size_options(&self) -> &[u32] {
        &self.page_size_options
    }

    pub fn bound(&self) -> PageBound {
        self.bound
    }

    /// Replace the page count and go back to the first page.
    ///
    /// The reset happens for every call, even when `total_pages` is unchanged,
    /// so a stale page number never survives a dataset-size change. Returns
    /// true if `current_page` moved.
    pub fn set_total_pages(&mut self, total_pages: u32) -> bool {
        self.total_pages = total_pages;
        self.reset_page()
    }

    /// Replace the selectable sizes. The current page size is kept even if it
    /// is no longer offered; see [`Self::selectable_page_sizes`].
    pub fn set_page_size_options(&mut self, options: Vec<u32>) {
        self.page_size_options = options;
    }

    /// Options to display: the configured ones plus the current size when it
    /// is missing from them, ascending and without duplicates.
    pub fn selectable_page_sizes(&self) -> Vec<u32> {
        let mut sizes = self.page_size_options.clone();
        if !sizes.contains(&self.page_size) {
            sizes.push(self.page_size);
        }
        sizes.sort_unstable();
        sizes.dedup();
        sizes
    }

    /// Navigate to page `n`. Out-of-range requests are ignored silently.
    pub fn request_page_change(&mut self, n: u32) -> Option<PaginatorEvent> {
        if !self.is_reachable(n) {
            return None;
        }
        self.current_page = n;
        Some(PaginatorEvent::PageChanged(n))
    }

    /// Change the page size. Always accepted; the caller decides which page to
    /// show next.
    pub fn request_page_size_change(&mut self, size: u32) -> PaginatorEvent {
        self.page_size = size;
        PaginatorEvent::PageSizeChanged(size)
    }

    /// Move back to the first page without emitting an event. Returns true if
    /// `current_page` moved.
    pub fn reset_page(&mut self) -> bool {
        let moved = self.current_page != FIRST_PAGE;
        self.current_page = FIRST_PAGE;
        moved
    }

    pub fn is_reachable(&self, n: u32) -> bool {
        if n < FIRST_PAGE {
            return false;
        }
        match self.bound {
            PageBound::Exclusive => n < self.total_pages,
            PageBound::Inclusive => n <= self.total_pages,
        }
    }

    pub fn can_go_prev(&self) -> bool {
        self.is_reachable(self.current_page.saturating_sub(1))
    }

    pub fn can_go_next(&self) -> bool {
        self.is_reachable(self.current_page.saturating_add(1))
    }

    /// Label for the current page, see [`range_display_text`].
    pub fn range_label(&self, length: u32) -> String {
        range_display_text(self.current_page, self.page_size, length)
    }
}

/// "Page X of Y" label.
///
/// `page * page_size + 1` treats `page` as zero-based while the paginator is
/// one-based everywhere else; the arithmetic is kept as the table has always
/// shown it.
pub fn range_display_text(page: u32, page_size: u32, length: u32) -> String {
    if length == 0 || page_size == 0 {
        return format!("Page 0 of {}", length);
    }
    let start_index = u64::from(page) * u64::from(page_size);
    format!("Page {} of {}", start_index + 1, length)
}
