use contracts::shared::api::{ActionResponse, IdQuery};
use contracts::system::users::{CreateUserDto, UpdateUserDto, UserListQuery, UserListResponse};

use crate::shared::api_utils::Endpoint;
use crate::shared::http::{ApiClient, ApiError, ApiRequest, Transport};

pub struct UserApi<'a, T: Transport> {
    client: &'a ApiClient<T>,
}

impl<T: Transport> ApiClient<T> {
    pub fn users(&self) -> UserApi<'_, T> {
        UserApi { client: self }
    }
}

impl<T: Transport> UserApi<'_, T> {
    /// Fetch one page of users
    pub async fn list(&self, query: &UserListQuery) -> Result<UserListResponse, ApiError> {
        self.client
            .request_as(ApiRequest::get(Endpoint::UsersList).query(query)?)
            .await
    }

    /// Create new user (admin only)
    pub async fn create(&self, dto: &CreateUserDto) -> Result<ActionResponse, ApiError> {
        self.client
            .request_as(ApiRequest::post(Endpoint::UsersCreate).json(dto)?)
            .await
    }

    /// Update user
    pub async fn update(&self, id: i64, dto: &UpdateUserDto) -> Result<ActionResponse, ApiError> {
        let request = ApiRequest::post(Endpoint::UsersUpdate)
            .query(&IdQuery { id })?
            .json(dto)?;
        self.client.request_as(request).await
    }

    /// Delete user
    pub async fn delete(&self, id: i64) -> Result<ActionResponse, ApiError> {
        self.client
            .request_as(ApiRequest::post(Endpoint::UsersDelete).query(&IdQuery { id })?)
            .await
    }
}

#[cfg(test)]
mod tests {
    use contracts::system::auth::Role;
    use contracts::system::users::{CreateUserDto, UpdateUserDto, UserListQuery};
    use futures::executor::block_on;
    use serde_json::json;

    use crate::shared::http::testing::{client, MockTransport};
    use crate::shared::http::HttpMethod;

    const EMPTY_PAGE: &str =
        r#"{"users": [], "pagination": {"page": 2, "limit": 10, "total": 0, "pages": 0}}"#;

    #[test]
    fn test_list_encodes_filters() {
        let api = client(MockTransport::default().respond(200, EMPTY_PAGE));
        let query = UserListQuery {
            page: Some(2),
            limit: Some(10),
            search: None,
        };
        let page = block_on(api.users().list(&query)).unwrap();
        assert!(page.users.is_empty());

        let sent = api.transport().last();
        assert_eq!(sent.url, "/app/cgi-bin/api/users_list.py?page=2&limit=10");
        assert_eq!(sent.method, HttpMethod::Get);
        assert_eq!(sent.body, None);
    }

    #[test]
    fn test_list_without_filters() {
        let api = client(MockTransport::default().respond(200, EMPTY_PAGE));
        block_on(api.users().list(&UserListQuery::default())).unwrap();
        assert_eq!(api.transport().last().url, "/app/cgi-bin/api/users_list.py");
    }

    #[test]
    fn test_create_posts_json() {
        let api = client(MockTransport::default().respond(201, r#"{"success": true, "user_id": 12}"#));
        let dto = CreateUserDto {
            email: "new@example.com".into(),
            name: "新人".into(),
            password: "secret1".into(),
            role: Role::User,
            department: None,
        };
        let ack = block_on(api.users().create(&dto)).unwrap();
        assert_eq!(ack.user_id, Some(12));

        let sent = api.transport().last();
        assert_eq!(sent.url, "/app/cgi-bin/api/users_create.py");
        let body: serde_json::Value = serde_json::from_str(sent.body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({"email": "new@example.com", "name": "新人", "password": "secret1", "role": "user"})
        );
    }

    #[test]
    fn test_update_puts_id_in_query() {
        let api = client(MockTransport::default().respond(200, r#"{"success": true}"#));
        let dto = UpdateUserDto {
            department: Some("営業".into()),
            ..Default::default()
        };
        block_on(api.users().update(5, &dto)).unwrap();

        let sent = api.transport().last();
        assert_eq!(sent.url, "/app/cgi-bin/api/users_update.py?id=5");
        assert_eq!(sent.method, HttpMethod::Post);
        assert_eq!(sent.body.as_deref(), Some(r#"{"department":"営業"}"#));
    }

    #[test]
    fn test_delete_has_no_body() {
        let api = client(MockTransport::default().respond(200, r#"{"success": true}"#));
        block_on(api.users().delete(5)).unwrap();

        let sent = api.transport().last();
        assert_eq!(sent.url, "/app/cgi-bin/api/users_delete.py?id=5");
        assert_eq!(sent.method, HttpMethod::Post);
        assert_eq!(sent.body, None);
    }

    #[test]
    fn test_forbidden_delete() {
        let api = client(MockTransport::default().respond(403, r#"{"error": "権限がありません"}"#));
        let err = block_on(api.users().delete(1)).unwrap_err();
        assert_eq!(err.to_string(), "権限がありません");
        assert_eq!(err.status(), Some(403));
    }
}
