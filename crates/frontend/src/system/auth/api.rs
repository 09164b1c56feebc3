use contracts::shared::api::ActionResponse;
use contracts::system::auth::{CurrentUserResponse, LoginRequest, LoginResponse};

use crate::shared::api_utils::Endpoint;
use crate::shared::http::{ApiClient, ApiError, ApiRequest, Transport};

/// Session endpoints. The session itself lives in a same-origin cookie that
/// the client never reads.
pub struct AuthApi<'a, T: Transport> {
    client: &'a ApiClient<T>,
}

impl<T: Transport> ApiClient<T> {
    pub fn auth(&self) -> AuthApi<'_, T> {
        AuthApi { client: self }
    }
}

impl<T: Transport> AuthApi<'_, T> {
    /// Login with email and password
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.client
            .request_as(ApiRequest::post(Endpoint::AuthLogin).json(&request)?)
            .await
    }

    /// Logout (drops the server session)
    pub async fn logout(&self) -> Result<ActionResponse, ApiError> {
        self.client
            .request_as(ApiRequest::post(Endpoint::AuthLogout))
            .await
    }

    /// Get current user info
    pub async fn get_current_user(&self) -> Result<CurrentUserResponse, ApiError> {
        self.client.request_as(ApiRequest::get(Endpoint::AuthMe)).await
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use serde_json::json;

    use crate::shared::http::testing::{client, MockTransport};
    use crate::shared::http::HttpMethod;

    const USER: &str =
        r#"{"id": 1, "email": "admin@example.com", "name": "管理者", "role": "admin", "department": "情報システム"}"#;

    #[test]
    fn test_login_posts_credentials() {
        let api = client(
            MockTransport::default().respond(200, &format!(r#"{{"success": true, "user": {}}}"#, USER)),
        );
        let response = block_on(api.auth().login("admin@example.com", "pw")).unwrap();
        assert_eq!(response.user.name, "管理者");

        let sent = api.transport().last();
        assert_eq!(sent.url, "/app/cgi-bin/api/auth_login.py");
        assert_eq!(sent.method, HttpMethod::Post);
        let body: serde_json::Value = serde_json::from_str(sent.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"email": "admin@example.com", "password": "pw"}));
    }

    #[test]
    fn test_login_rejected() {
        let api = client(MockTransport::default().respond(
            401,
            r#"{"error": "メールアドレスまたはパスワードが正しくありません"}"#,
        ));
        let err = block_on(api.auth().login("a@b.c", "bad")).unwrap_err();
        assert_eq!(err.to_string(), "メールアドレスまたはパスワードが正しくありません");
    }

    #[test]
    fn test_logout_has_no_body() {
        let api = client(MockTransport::default().respond(200, r#"{"success": true}"#));
        let ack = block_on(api.auth().logout()).unwrap();
        assert!(ack.success);
        let sent = api.transport().last();
        assert_eq!(sent.url, "/app/cgi-bin/api/auth_logout.py");
        assert_eq!(sent.method, HttpMethod::Post);
        assert_eq!(sent.body, None);
    }

    #[test]
    fn test_current_user_is_get() {
        let api = client(MockTransport::default().respond(200, &format!(r#"{{"user": {}}}"#, USER)));
        let me = block_on(api.auth().get_current_user()).unwrap();
        assert_eq!(me.user.id, 1);
        assert_eq!(api.transport().last().method, HttpMethod::Get);
    }
}
