//! Offset pagination value types.

use serde::Serialize;

/// 1-based page window. Construct through `handlers::params` so bounds are validated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page_number: u32,
    pub page_size: u32,
}

impl PageRequest {
    pub const DEFAULT_SIZE: u32 = 10;
    pub const MAX_SIZE: u32 = 100;

    pub fn new(page_number: u32, page_size: u32) -> Self {
        PageRequest {
            page_number: page_number.max(1),
            page_size: page_size.clamp(1, Self::MAX_SIZE),
        }
    }

    pub fn offset(&self) -> u64 {
        (self.page_number as u64 - 1) * self.page_size as u64
    }

    pub fn limit(&self) -> u64 {
        self.page_size as u64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest::new(1, Self::DEFAULT_SIZE)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_number: u32,
    pub page_size: u32,
    pub total_count: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total_count: u64) -> Self {
        Page {
            items,
            page_number: request.page_number,
            page_size: request.page_size,
            total_count,
            total_pages: total_count.div_ceil(request.page_size as u64),
        }
    }
}

/// Normalize a user search term: trimmed, `None` when blank.
pub fn search_term(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim).filter(|s| !s.is_empty()).map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_window() {
        let page = PageRequest::new(2, 5);
        assert_eq!(page.offset(), 5);
        assert_eq!(page.limit(), 5);
        assert_eq!(PageRequest::default().offset(), 0);
    }

    #[test]
    fn new_clamps_out_of_range() {
        assert_eq!(PageRequest::new(0, 0), PageRequest::new(1, 1));
        assert_eq!(PageRequest::new(1, 1000).page_size, PageRequest::MAX_SIZE);
    }

    #[test]
    fn total_pages_rounds_up() {
        let page: Page<u8> = Page::new(vec![], PageRequest::new(1, 5), 12);
        assert_eq!(page.total_pages, 3);
        let empty: Page<u8> = Page::new(vec![], PageRequest::new(1, 5), 0);
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn blank_search_terms_are_dropped() {
        assert_eq!(search_term(Some("  ")), None);
        assert_eq!(search_term(Some(" cake ")), Some("cake".into()));
        assert_eq!(search_term(None), None);
    }
}
