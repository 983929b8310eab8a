//! IPO table request handling.
//!
//! Turns table filter/pagination input into cached queries and maps the
//! outcome to rows plus an optional user notice. Failures never escape:
//! they become a notice and an empty page.

use std::sync::Arc;

use chrono::NaiveDate;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::IpoQuery;
use crate::api::{ApiError, IpoQueryParams, IpoRecord, ListingStatus, Notice};

/// Page shown when none is requested.
pub const DEFAULT_PAGE: u32 = 1;

/// Rows per page when none is requested.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Table filters. Empty strings count as "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpoFilters {
    #[serde(default)]
    pub listing_status: Option<ListingStatus>,
    #[serde(default)]
    pub market: Option<String>,
    #[serde(default)]
    pub exchange: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl IpoFilters {
    fn normalized(self) -> Self {
        Self {
            market: non_empty(self.market),
            exchange: non_empty(self.exchange),
            ..self
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// One table request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpoPageRequest {
    #[serde(flatten)]
    pub filters: IpoFilters,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
}

/// What the table renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IpoTablePage {
    /// Rows, newest `ipo_date` first, undated rows last.
    pub data: Vec<IpoRecord>,
    pub total: u64,
    /// Page actually requested, after any filter-change reset.
    pub page: u32,
    pub page_size: u32,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

impl IpoTablePage {
    fn failed(page: u32, page_size: u32, error: &ApiError) -> Self {
        Self {
            data: Vec::new(),
            total: 0,
            page,
            page_size,
            success: false,
            notice: Some(error.notice()),
        }
    }
}

/// Request logic of the IPO table for one console session.
pub struct IpoListView {
    query: Arc<IpoQuery>,
    /// Filters of the previous request, to detect filter changes.
    previous_filters: Mutex<Option<IpoFilters>>,
}

impl IpoListView {
    pub fn new(query: Arc<IpoQuery>) -> Self {
        Self {
            query,
            previous_filters: Mutex::new(None),
        }
    }

    /// Load one page of the table.
    pub async fn load(&self, request: IpoPageRequest) -> IpoTablePage {
        let filters = request.filters.normalized();
        let mut page = request.page.filter(|p| *p > 0).unwrap_or(DEFAULT_PAGE);
        let page_size = request
            .page_size
            .filter(|s| *s > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE);

        if let (Some(start), Some(end)) = (filters.start_date, filters.end_date)
            && start > end
        {
            let error = ApiError::Validation(format!(
                "start date {start} is after end date {end}"
            ));
            return IpoTablePage::failed(page, page_size, &error);
        }

        {
            let mut previous = self.previous_filters.lock();
            if previous.as_ref().is_some_and(|p| *p != filters) {
                debug!("IPO filters changed, returning to first page");
                page = DEFAULT_PAGE;
            }
            *previous = Some(filters.clone());
        }

        let params = IpoQueryParams {
            listing_status: filters.listing_status,
            start_date: filters.start_date,
            end_date: filters.end_date,
            exchange: filters.exchange,
            market: filters.market,
            page: Some(page),
            page_size: Some(page_size),
        };

        let result = self.query.fetch(&params).await;
        if let Some(error) = result.error {
            return IpoTablePage::failed(page, page_size, &error);
        }

        let Some(response) = result.data else {
            return IpoTablePage::failed(page, page_size, &ApiError::Decode("empty response".into()));
        };

        let mut data = response.data.clone();
        // `None` orders below every date, so descending puts it last.
        data.sort_by(|a, b| b.ipo_date.cmp(&a.ipo_date));

        IpoTablePage {
            data,
            total: response.total,
            page,
            page_size,
            success: true,
            notice: None,
        }
    }

    /// Forget the previous filters, e.g. after the user clears the form.
    pub fn reset_filters(&self) {
        *self.previous_filters.lock() = None;
    }
}

impl std::fmt::Debug for IpoListView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IpoListView").finish_non_exhaustive()
    }
}
