use serde::{Deserialize, Serialize};

use crate::{
    domain::{ItemsPerPage, UserRecord},
    error::ApiException,
};

/// One page/filter request. `search == None` and `search == Some("")` are the same query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page_number: u32,
    pub items_per_page: ItemsPerPage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page_number: 1,
            items_per_page: ItemsPerPage::default(),
            search: Some(String::new()),
        }
    }
}

impl ListQuery {
    pub fn new(
        page_number: u32,
        items_per_page: ItemsPerPage,
        search: Option<String>,
    ) -> Result<Self, ApiException> {
        if page_number == 0 {
            return Err(ApiException::validation("page number must be at least 1"));
        }
        Ok(Self {
            page_number,
            items_per_page,
            search,
        })
    }

    pub fn first_page(items_per_page: ItemsPerPage, search: impl Into<String>) -> Self {
        Self {
            page_number: 1,
            items_per_page,
            search: Some(search.into()),
        }
    }

    pub fn search_text(&self) -> &str {
        self.search.as_deref().unwrap_or_default()
    }

    pub fn offset(&self) -> usize {
        self.page_number.saturating_sub(1) as usize * self.items_per_page.get() as usize
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListResult {
    #[serde(rename = "total_count")]
    pub total_matching_count: usize,
    pub items: Vec<UserRecord>,
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
