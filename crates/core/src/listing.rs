//! List endpoints: query parameters, response shapes and pagination.
//!
//! The backend answers list requests in one of two shapes, a paged envelope
//! `{data, total, totalPages, currentPage}` or a bare JSON array. Both decode
//! into [`ListResponse`] and normalise to a [`Page`].

use crate::config::CoreConfig;
use crate::{ClinicError, ClinicResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Query parameters of a list request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
    pub center_id: Option<String>,
    /// Endpoint-specific filters such as `status` or `date`.
    pub filters: BTreeMap<String, String>,
}

impl ListQuery {
    /// First page with the configured page size.
    pub fn new(cfg: &CoreConfig) -> Self {
        Self {
            page: 1,
            limit: cfg.page_size(),
            search: None,
            center_id: None,
            filters: BTreeMap::new(),
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        // A new search always starts from the first page.
        self.page = 1;
        self
    }

    pub fn with_center(mut self, center_id: impl Into<String>) -> Self {
        self.center_id = Some(center_id.into());
        self
    }

    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    /// Query pairs in wire order. Blank search, centre and filter values are
    /// left out.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ];
        let mut push = |key: &str, value: &str| {
            let value = value.trim();
            if !value.is_empty() {
                pairs.push((key.to_string(), value.to_string()));
            }
        };
        if let Some(search) = &self.search {
            push("search", search);
        }
        if let Some(center_id) = &self.center_id {
            push("centerId", center_id);
        }
        for (key, value) in &self.filters {
            push(key, value);
        }
        pairs
    }
}

/// Paged envelope returned by most list endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedList<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub current_page: u32,
}

/// Either response shape of a list endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Paged(PagedList<T>),
    Bare(Vec<T>),
}

/// A normalised page of results.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub total_pages: u32,
    pub current_page: u32,
}

impl<T> ListResponse<T> {
    /// Normalises to a [`Page`]. A bare array is a single page holding
    /// everything; missing envelope counters are filled in from the items.
    pub fn into_page(self) -> Page<T> {
        match self {
            ListResponse::Paged(paged) => {
                let total = if paged.total == 0 {
                    paged.data.len() as u64
                } else {
                    paged.total
                };
                Page {
                    total,
                    total_pages: paged.total_pages.max(1),
                    current_page: paged.current_page.max(1),
                    items: paged.data,
                }
            }
            ListResponse::Bare(items) => Page {
                total: items.len() as u64,
                total_pages: 1,
                current_page: 1,
                items,
            },
        }
    }
}

/// Decodes a list response body of either shape.
pub fn parse_list<T: DeserializeOwned>(body: &str) -> ClinicResult<Page<T>> {
    serde_json::from_str::<ListResponse<T>>(body)
        .map(ListResponse::into_page)
        .map_err(ClinicError::Deserialization)
}

/// Local pagination state of a list page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
}

impl Pagination {
    pub fn new(limit: u32) -> Self {
        Self {
            page: 1,
            limit: limit.max(1),
            total: 0,
        }
    }

    pub fn total_pages(&self) -> u32 {
        let pages = self.total.div_ceil(u64::from(self.limit));
        pages.max(1) as u32
    }

    /// Adopts the counters of a freshly fetched page.
    pub fn sync<T>(&mut self, page: &Page<T>) {
        self.page = page.current_page.max(1);
        self.total = page.total;
    }

    /// Optimistic bookkeeping after deleting one item, ahead of the re-fetch.
    ///
    /// If the current page would now be past the end, step back one page so
    /// the re-fetch does not land on an empty page.
    pub fn after_delete(&mut self) {
        self.total = self.total.saturating_sub(1);
        if self.page > self.total_pages() {
            self.page = self.total_pages();
        }
    }

    pub fn apply(&self, query: &mut ListQuery) {
        query.page = self.page;
        query.limit = self.limit;
    }
}
