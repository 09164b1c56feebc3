use serde::{Deserialize, Serialize};

use crate::shared::serde_helpers::option_number_from_str;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManualSort {
    CreatedAt,
    UpdatedAt,
    Title,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Filters accepted by `manuals_list`. Unset fields are left out of the
/// query string and the server applies its defaults (page 1, 20 per page,
/// newest update first). Numeric filters also accept their decimal text;
/// keys the server does not know are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManualListQuery {
    #[serde(
        default,
        deserialize_with = "option_number_from_str",
        skip_serializing_if = "Option::is_none"
    )]
    pub page: Option<u32>,
    #[serde(
        default,
        deserialize_with = "option_number_from_str",
        skip_serializing_if = "Option::is_none"
    )]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Author user id
    #[serde(
        default,
        deserialize_with = "option_number_from_str",
        skip_serializing_if = "Option::is_none"
    )]
    pub author: Option<i64>,
    /// `1` published only, `0` own drafts only
    #[serde(
        default,
        deserialize_with = "option_number_from_str",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_published: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<ManualSort>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<SortOrder>,
}
