use serde::{Deserialize, Serialize};

use super::auth::Role;
use crate::shared::api::Pagination;
use crate::shared::serde_helpers::option_number_from_str;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserDto {
    pub email: String,
    pub name: String,
    pub password: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

/// Partial update; only the fields that are set are sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

/// Filters accepted by `users_list`. `page` and `limit` also accept their
/// decimal text; unknown keys are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserListQuery {
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
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserListResponse {
    pub users: Vec<User>,
    #[serde(default)]
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_user_omits_unset_fields() {
        let dto = UpdateUserDto {
            name: Some("新しい名前".into()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&dto).unwrap(),
            serde_json::json!({"name": "新しい名前"})
        );
    }

    #[test]
    fn test_list_query_from_input_text() {
        let query: UserListQuery =
            serde_json::from_value(serde_json::json!({"page": "3", "limit": 10, "search": "営業"}))
                .unwrap();
        assert_eq!(query.page, Some(3));
        assert_eq!(query.limit, Some(10));
        assert_eq!(query.search.as_deref(), Some("営業"));
    }

    #[test]
    fn test_user_list_response() {
        let response: UserListResponse = serde_json::from_str(
            r#"{
                "users": [{"id": 2, "email": "x@y.z", "name": "x", "role": "user",
                           "department": "総務", "created_at": "2024-01-01 09:00:00",
                           "updated_at": "2024-01-02 09:00:00"}],
                "pagination": {"page": 1, "limit": 20, "total": 1, "pages": 1}
            }"#,
        )
        .unwrap();
        assert_eq!(response.users.len(), 1);
        assert_eq!(response.users[0].department.as_deref(), Some("総務"));
        assert_eq!(response.pagination.total, 1);
    }
}
