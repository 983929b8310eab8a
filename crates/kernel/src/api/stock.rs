//! Listed and unlisted company data.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::types::ListResponse;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockInfo {
    pub stock_code: String,
    pub stock_name: String,
    pub listing_status: String,
    pub exchange: String,
    #[serde(default)]
    pub listing_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registered_capital: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_representative: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockQueryParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listing_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

pub type StockListResponse = ListResponse<StockInfo>;

/// Keyword search over codes and names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockSearchParams {
    pub keyword: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockStatistics {
    pub total_stocks: u64,
    #[serde(default)]
    pub listed_stocks: u64,
    #[serde(default)]
    pub unlisted_stocks: u64,
    #[serde(default)]
    pub by_exchange: BTreeMap<String, u64>,
    #[serde(default)]
    pub by_status: BTreeMap<String, u64>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn optional_company_details_may_be_missing() {
        let stock: StockInfo = serde_json::from_str(
            r#"{"stock_code": "600519", "stock_name": "贵州茅台",
                "listing_status": "listed", "exchange": "SSE",
                "listing_date": "2001-08-27"}"#,
        )
        .unwrap();
        assert_eq!(stock.stock_code, "600519");
        assert!(stock.industry.is_none());

        let json = serde_json::to_value(&stock).unwrap();
        assert!(json.get("industry").is_none());
    }
}
