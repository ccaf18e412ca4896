//! Pagination support for queries
use serde::{Deserialize, Serialize};

use crate::shared::errors::AppResult;
use crate::shared::utils::Validator;

/// Pagination parameters for queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationParams {
    pub page: u32,
    pub page_size: u32,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
        }
    }
}

impl PaginationParams {
    pub fn new(page: u32, page_size: u32) -> AppResult<Self> {
        Validator::validate_pagination(page, page_size)?;
        Ok(Self { page, page_size })
    }

    /// Calculate offset for database queries
    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.page_size as i64
    }

    /// Get limit for database queries
    pub fn limit(&self) -> i64 {
        self.page_size as i64
    }
}

/// Page bookkeeping reported next to a list result.
///
/// Every field is zero when nothing matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMetadata {
    pub current_page: u32,
    pub page_size: u32,
    pub first_page: u32,
    pub last_page: u32,
    pub total_records: u64,
}

impl PaginationMetadata {
    pub fn calculate(total_records: u64, params: &PaginationParams) -> Self {
        if total_records == 0 || params.page_size == 0 {
            return Self::default();
        }

        let page_size = params.page_size as u64;
        Self {
            current_page: params.page,
            page_size: params.page_size,
            first_page: 1,
            last_page: total_records.div_ceil(page_size) as u32,
            total_records,
        }
    }
}

/// Paginated result wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub metadata: PaginationMetadata,
}

impl<T> PaginatedResult<T> {
    pub fn new(items: Vec<T>, total_records: u64, params: &PaginationParams) -> Self {
        Self {
            items,
            metadata: PaginationMetadata::calculate(total_records, params),
        }
    }

    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            metadata: PaginationMetadata::default(),
        }
    }
}
