//! IPO data types.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use super::types::ListResponse;

/// Listing stage of an IPO.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    Accepted,
    InReview,
    Approved,
    Unauthorized,
    IpoSuspension,
    IssuedButNotListed,
    NormallyListed,
}

impl ListingStatus {
    pub const ALL: [ListingStatus; 7] = [
        ListingStatus::Accepted,
        ListingStatus::InReview,
        ListingStatus::Approved,
        ListingStatus::Unauthorized,
        ListingStatus::IpoSuspension,
        ListingStatus::IssuedButNotListed,
        ListingStatus::NormallyListed,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpoRecord {
    pub id: i64,
    pub stock_code: String,
    pub name: String,
    pub market: String,
    pub exchange: String,
    pub listing_status: ListingStatus,
    /// Calendar date of the listing. `None` when blank or unparseable.
    #[serde(default, deserialize_with = "lenient_date")]
    pub ipo_date: Option<NaiveDate>,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Filters and pagination of an IPO list query. Also the cache key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IpoQueryParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listing_status: Option<ListingStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

/// Echoed `filters` stay untyped: the server may send blank strings.
pub type IpoListResponse = ListResponse<IpoRecord>;

/// Date part of a `YYYY-MM-DD`-prefixed value: plain dates, `YYYY-MM-DD
/// HH:MM:SS`, and RFC 3339 timestamps all qualify.
pub fn parse_ipo_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date = raw.get(..10)?;
    let rest = raw.get(10..)?;
    if !(rest.is_empty() || rest.starts_with(' ') || rest.starts_with('T')) {
        return None;
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_ipo_date))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpoStatistics {
    pub total: u64,
    #[serde(default)]
    pub by_source: BTreeMap<String, u64>,
    #[serde(default)]
    pub by_status: BTreeMap<String, u64>,
    #[serde(default)]
    pub by_market: BTreeMap<String, u64>,
    #[serde(default)]
    pub by_exchange: BTreeMap<String, u64>,
}
