//! Shareholder structure of a company.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareholderInfo {
    pub shareholder_name: String,
    /// Percentage of total shares.
    pub shareholding_ratio: f64,
    pub shareholding_number: f64,
    pub shareholder_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareholderQueryParams {
    pub company_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_n: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareholderQueryResponse {
    pub company_name: String,
    #[serde(default)]
    pub shareholders: Vec<ShareholderInfo>,
    #[serde(default)]
    pub total_shareholders: u64,
    #[serde(default)]
    pub data_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllingShareholderResponse {
    pub company_name: String,
    pub controlling_shareholder: ShareholderInfo,
}

/// Body of the company-name keyed POST endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRequest {
    pub company_name: String,
}
