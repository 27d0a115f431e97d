//! Page-count derivation and paging-change events for the page selector.

use shared::{domain::ItemsPerPage, protocol::ListQuery};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingChange {
    pub page_number: u32,
    pub items_per_page: ItemsPerPage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationController {
    current_page: u32,
    total_item_count: usize,
    items_per_page: ItemsPerPage,
    page_count: u32,
}

impl Default for PaginationController {
    fn default() -> Self {
        Self::new(ItemsPerPage::default())
    }
}

impl PaginationController {
    pub fn new(items_per_page: ItemsPerPage) -> Self {
        Self {
            current_page: 1,
            total_item_count: 0,
            items_per_page,
            page_count: 0,
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_item_count(&self) -> usize {
        self.total_item_count
    }

    pub fn items_per_page(&self) -> ItemsPerPage {
        self.items_per_page
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn pages(&self) -> Vec<u32> {
        (1..=self.page_count).collect()
    }

    pub fn set_total(&mut self, total_item_count: usize) {
        self.total_item_count = total_item_count;
        self.recompute();
    }

    /// Adopts page, size and total from the state a fetch produced.
    pub fn sync(&mut self, query: &ListQuery, total_item_count: usize) {
        self.current_page = query.page_number;
        self.items_per_page = query.items_per_page;
        self.total_item_count = total_item_count;
        self.recompute();
    }

    /// Clicking the current page or a page outside `1..=page_count` emits nothing.
    pub fn select_page(&mut self, page_number: u32) -> Option<PagingChange> {
        if page_number == self.current_page
            || page_number == 0
            || page_number > self.page_count.max(1)
        {
            return None;
        }
        self.current_page = page_number;
        Some(PagingChange {
            page_number,
            items_per_page: self.items_per_page,
        })
    }

    pub fn select_items_per_page(&mut self, items_per_page: ItemsPerPage) -> Option<PagingChange> {
        if items_per_page == self.items_per_page {
            return None;
        }
        self.items_per_page = items_per_page;
        self.current_page = 1;
        self.recompute();
        Some(PagingChange {
            page_number: 1,
            items_per_page,
        })
    }

    fn recompute(&mut self) {
        let per_page = self.items_per_page.get() as usize;
        self.page_count = self.total_item_count.div_ceil(per_page) as u32;
    }
}

#[cfg(test)]
#[path = "tests/pagination_tests.rs"]
mod tests;
