use serde::{Deserialize, Serialize};

use crate::shared::api::Pagination;
use crate::shared::serde_helpers::{bool_from_int, option_bool_from_int};

// ============================================================================
// Enums
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
    Department,
}

// ============================================================================
// Read models
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

/// Row of `manuals_list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualSummary {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(deserialize_with = "bool_from_int")]
    pub is_published: bool,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    pub author_id: i64,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub step_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualStep {
    #[serde(default)]
    pub id: Option<i64>,
    pub step_number: u32,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub image_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualHistory {
    #[serde(default)]
    pub id: Option<i64>,
    pub action: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Body of `manuals_get`: the manual with tags, ordered steps and the last
/// ten history entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualDetail {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(deserialize_with = "bool_from_int")]
    pub is_published: bool,
    #[serde(default)]
    pub visibility: Visibility,
    pub author_id: i64,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub author_email: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub steps: Vec<ManualStep>,
    #[serde(default)]
    pub histories: Vec<ManualHistory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualResponse {
    pub manual: ManualDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualListResponse {
    pub manuals: Vec<ManualSummary>,
    #[serde(default)]
    pub pagination: Pagination,
}

// ============================================================================
// Write models
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManualStepDto {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
}

/// Payload of `manuals_create`. Steps are numbered by the server in list
/// order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManualDto {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "bool_from_int")]
    pub is_published: bool,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub steps: Vec<ManualStepDto>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Payload of `manuals_update`. Only the fields that are set are sent; the
/// server replaces the whole step list or tag set when `steps` or `tags` is
/// present, even if empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateManualDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        deserialize_with = "option_bool_from_int",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_published: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<ManualStepDto>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}
