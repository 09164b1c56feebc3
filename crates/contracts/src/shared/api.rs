use serde::{Deserialize, Serialize};

/// Body of every non-2xx response. `error` is meant for display as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default)]
    pub details: Option<String>,
}

/// Acknowledgement returned by create/update/delete/logout endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    /// Set by `users_create`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    /// Set by `manuals_create`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u64,
}

/// `?id=<n>` selector used by get/update/delete endpoints.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IdQuery {
    pub id: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadImageResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    /// Site-relative path of the stored image, e.g. `/uploads/images/a_20240101_120000.png`
    #[serde(default)]
    pub path: Option<String>,
}
