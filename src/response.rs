use serde::Serialize;

use crate::filter::PageRequest;

/// Uniform envelope wrapped around every API answer.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        ApiResponse {
            success: true,
            message: "OK".to_string(),
            data: Some(data),
        }
    }

    pub fn empty() -> Self {
        ApiResponse {
            success: true,
            message: "OK".to_string(),
            data: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub page_number: u64,
    pub page_size: u64,
    pub total_elements: u64,
    pub total_pages: u64,
    pub is_first_page: bool,
    pub is_last_page: bool,
}

impl<T> PageResult<T> {
    /// Builds the page envelope for one slice of a result set of `total` rows.
    pub fn new(items: Vec<T>, page: PageRequest, total: u64) -> Self {
        let total_pages = total.div_ceil(page.size);
        PageResult {
            items,
            page_number: page.page,
            page_size: page.size,
            total_elements: total,
            total_pages,
            is_first_page: page.page == 0,
            is_last_page: page.page >= total_pages.saturating_sub(1),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageResult<U> {
        PageResult {
            items: self.items.into_iter().map(f).collect(),
            page_number: self.page_number,
            page_size: self.page_size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            is_first_page: self.is_first_page,
            is_last_page: self.is_last_page,
        }
    }
}
