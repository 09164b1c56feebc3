//! JSON request plumbing over `fetch`.
//!
//! Requests are described by [`ApiRequest`], turned into a concrete
//! [`PreparedRequest`] against the page's [`ApiBase`], and handed to a
//! [`Transport`]. Response bodies are always parsed as JSON, including error
//! responses, which carry the message to display in their `error` field.

use contracts::shared::api::ErrorBody;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::api_utils::{ApiBase, Endpoint};

/// Shown when a failed response carries no `error` field
pub const REQUEST_FAILED: &str = "リクエストに失敗しました";
/// Same, for image uploads
pub const UPLOAD_FAILED: &str = "画像のアップロードに失敗しました";

/// Failure of an API call. `Display` is the user-facing message in every case.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Transport-level failure (offline, refused, CORS)
    #[error("{0}")]
    Network(String),

    /// Non-2xx status; `message` is the server's `error` field or a fallback
    #[error("{message}")]
    Status { status: u16, message: String },

    /// Response body was not JSON, or not the expected shape
    #[error("{0}")]
    Parse(String),

    /// Request body or query could not be serialized
    #[error("{0}")]
    Encode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credentials {
    SameOrigin,
    Include,
    Omit,
}

impl From<Credentials> for web_sys::RequestCredentials {
    fn from(value: Credentials) -> Self {
        match value {
            Credentials::SameOrigin => web_sys::RequestCredentials::SameOrigin,
            Credentials::Include => web_sys::RequestCredentials::Include,
            Credentials::Omit => web_sys::RequestCredentials::Omit,
        }
    }
}

/// Caller overrides. Every `Some` replaces the default for that key; a
/// `headers` list replaces the default header list as a whole.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Option<HttpMethod>,
    pub headers: Option<Vec<(String, String)>>,
    pub body: Option<String>,
    pub credentials: Option<Credentials>,
}

/// One API call: endpoint, optional encoded query, options.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub endpoint: Endpoint,
    pub query: Option<String>,
    pub options: RequestOptions,
}

impl ApiRequest {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            query: None,
            options: RequestOptions::default(),
        }
    }

    pub fn get(endpoint: Endpoint) -> Self {
        Self::new(endpoint).method(HttpMethod::Get)
    }

    pub fn post(endpoint: Endpoint) -> Self {
        Self::new(endpoint).method(HttpMethod::Post)
    }

    pub fn method(mut self, method: HttpMethod) -> Self {
        self.options.method = Some(method);
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.options
            .headers
            .get_or_insert_with(Vec::new)
            .push((name.to_string(), value.to_string()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.options.body = Some(body.into());
        self
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.options.credentials = Some(credentials);
        self
    }

    /// Serialize `payload` as the JSON body
    pub fn json<B: Serialize + ?Sized>(self, payload: &B) -> Result<Self, ApiError> {
        let body = serde_json::to_string(payload)
            .map_err(|e| ApiError::Encode(format!("Failed to serialize request: {}", e)))?;
        Ok(self.body(body))
    }

    /// Form-encode `params` as the query string; `None` fields are skipped
    pub fn query<Q: Serialize>(mut self, params: &Q) -> Result<Self, ApiError> {
        let query = serde_qs::to_string(params)
            .map_err(|e| ApiError::Encode(format!("Failed to encode query: {}", e)))?;
        self.query = Some(query);
        Ok(self)
    }
}

/// Fully resolved request, ready for the network.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub credentials: Credentials,
}

fn default_headers() -> Vec<(String, String)> {
    vec![("Content-Type".to_string(), "application/json".to_string())]
}

/// Merge `request` over the defaults (GET, JSON content type, same-origin
/// credentials) and resolve its URL. A GET never carries a body.
pub fn prepare(base: &ApiBase, request: &ApiRequest) -> PreparedRequest {
    let options = &request.options;
    let method = options.method.unwrap_or(HttpMethod::Get);
    let body = match method {
        HttpMethod::Get => None,
        HttpMethod::Post => options.body.clone(),
    };

    PreparedRequest {
        url: base.endpoint_url(request.endpoint, request.query.as_deref()),
        method,
        headers: options.headers.clone().unwrap_or_else(default_headers),
        body,
        credentials: options.credentials.unwrap_or(Credentials::SameOrigin),
    }
}

/// Status and raw body of a completed round-trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Parse a response body and apply the status check.
///
/// The body is parsed first, so an error page that is not JSON surfaces as
/// [`ApiError::Parse`] even on a 500.
pub fn interpret_response(response: &RawResponse, fallback: &str) -> Result<Value, ApiError> {
    let data: Value = serde_json::from_str(&response.body)
        .map_err(|e| ApiError::Parse(format!("Failed to parse response: {}", e)))?;

    if !response.ok() {
        let message = ErrorBody::deserialize(&data)
            .ok()
            .map(|body| body.error)
            .filter(|error| !error.is_empty())
            .unwrap_or_else(|| fallback.to_string());
        return Err(ApiError::Status {
            status: response.status,
            message,
        });
    }

    Ok(data)
}

/// Network primitive under [`ApiClient`].
///
/// The browser implementation is [`FetchTransport`]; tests substitute a
/// recording fake.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(&self, request: &PreparedRequest) -> Result<RawResponse, ApiError>;

    /// Multipart POST. No content type is set so the browser adds the boundary.
    async fn send_form(
        &self,
        url: &str,
        form: web_sys::FormData,
        credentials: Credentials,
    ) -> Result<RawResponse, ApiError>;
}

/// `fetch` through gloo-net.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

fn network_error(e: gloo_net::Error) -> ApiError {
    ApiError::Network(e.to_string())
}

async fn read_response(response: gloo_net::http::Response) -> Result<RawResponse, ApiError> {
    let status = response.status();
    let body = response.text().await.map_err(network_error)?;
    Ok(RawResponse { status, body })
}

impl Transport for FetchTransport {
    async fn send(&self, request: &PreparedRequest) -> Result<RawResponse, ApiError> {
        use gloo_net::http::{Method, RequestBuilder};

        let method = match request.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
        };
        let mut builder = RequestBuilder::new(&request.url)
            .method(method)
            .credentials(request.credentials.into());
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let built = match &request.body {
            Some(body) => builder.body(body.clone()),
            None => builder.build(),
        }
        .map_err(network_error)?;

        let response = built.send().await.map_err(network_error)?;
        read_response(response).await
    }

    async fn send_form(
        &self,
        url: &str,
        form: web_sys::FormData,
        credentials: Credentials,
    ) -> Result<RawResponse, ApiError> {
        use gloo_net::http::{Method, RequestBuilder};

        let response = RequestBuilder::new(url)
            .method(Method::POST)
            .credentials(credentials.into())
            .body(form)
            .map_err(network_error)?
            .send()
            .await
            .map_err(network_error)?;
        read_response(response).await
    }
}

/// JSON API client bound to one page's mount root.
#[derive(Debug, Clone)]
pub struct ApiClient<T = FetchTransport> {
    base: ApiBase,
    transport: T,
}

impl ApiClient<FetchTransport> {
    pub fn new(base: ApiBase) -> Self {
        Self::with_transport(base, FetchTransport)
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn with_transport(base: ApiBase, transport: T) -> Self {
        Self { base, transport }
    }

    pub fn base(&self) -> &ApiBase {
        &self.base
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Perform a request and return the decoded JSON body.
    ///
    /// No retries and no timeout; every failure is logged before it is
    /// returned.
    pub async fn request(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let prepared = prepare(&self.base, &request);
        let result = match self.transport.send(&prepared).await {
            Ok(response) => interpret_response(&response, REQUEST_FAILED),
            Err(e) => Err(e),
        };
        if let Err(e) = &result {
            log::error!("API Error: {}", e);
        }
        result
    }

    /// [`request`](Self::request), then decode into `R`
    pub async fn request_as<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R, ApiError> {
        let value = self.request(request).await?;
        decode(value)
    }

    /// Upload a single file as multipart field `field`.
    pub async fn upload<R: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        field: &str,
        file: &web_sys::File,
    ) -> Result<R, ApiError> {
        let url = self.base.endpoint_url(endpoint, None);
        let result = async {
            let form = web_sys::FormData::new()
                .map_err(|e| ApiError::Encode(format!("{:?}", e)))?;
            form.append_with_blob(field, file)
                .map_err(|e| ApiError::Encode(format!("{:?}", e)))?;
            let response = self
                .transport
                .send_form(&url, form, Credentials::SameOrigin)
                .await?;
            interpret_response(&response, UPLOAD_FAILED)
        }
        .await;
        if let Err(e) = &result {
            log::error!("API Error: {}", e);
        }
        decode(result?)
    }
}

fn decode<R: DeserializeOwned>(value: Value) -> Result<R, ApiError> {
    serde_json::from_value(value)
        .map_err(|e| ApiError::Parse(format!("Failed to parse response: {}", e)))
}


#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use serde_json::json;

    use super::testing::*;
    use super::*;
    use crate::shared::config::ApiConfig;

    fn base() -> ApiBase {
        ApiBase::new("/app", &ApiConfig::default())
    }

    fn raw(status: u16, body: &str) -> RawResponse {
        RawResponse {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_prepare_defaults() {
        let prepared = prepare(&base(), &ApiRequest::new(Endpoint::AuthMe));
        assert_eq!(prepared.url, "/app/cgi-bin/api/auth_me.py");
        assert_eq!(prepared.method, HttpMethod::Get);
        assert_eq!(
            prepared.headers,
            vec![("Content-Type".to_string(), "application/json".to_string())]
        );
        assert_eq!(prepared.body, None);
        assert_eq!(prepared.credentials, Credentials::SameOrigin);
    }

    #[test]
    fn test_get_body_is_stripped() {
        let request = ApiRequest::get(Endpoint::ManualsList).body(r#"{"stray":true}"#);
        assert_eq!(prepare(&base(), &request).body, None);

        // Default method is GET too
        let request = ApiRequest::new(Endpoint::ManualsList).body("{}");
        assert_eq!(prepare(&base(), &request).body, None);
    }

    #[test]
    fn test_post_keeps_body() {
        let request = ApiRequest::post(Endpoint::AuthLogin).body("{}");
        let prepared = prepare(&base(), &request);
        assert_eq!(prepared.method, HttpMethod::Post);
        assert_eq!(prepared.body.as_deref(), Some("{}"));
    }

    #[test]
    fn test_caller_headers_replace_defaults() {
        let request = ApiRequest::post(Endpoint::AuthLogin).header("X-Requested-With", "wasm");
        let prepared = prepare(&base(), &request);
        assert_eq!(
            prepared.headers,
            vec![("X-Requested-With".to_string(), "wasm".to_string())]
        );
    }

    #[test]
    fn test_caller_credentials_win() {
        let request = ApiRequest::get(Endpoint::AuthMe).credentials(Credentials::Include);
        assert_eq!(prepare(&base(), &request).credentials, Credentials::Include);
    }

    #[test]
    fn test_interpret_success() {
        let value = interpret_response(&raw(200, r#"{"users": []}"#), REQUEST_FAILED).unwrap();
        assert_eq!(value, json!({"users": []}));
        assert!(interpret_response(&raw(201, r#"{"success": true}"#), REQUEST_FAILED).is_ok());
    }

    #[test]
    fn test_interpret_server_message_verbatim() {
        let err = interpret_response(&raw(401, r#"{"error": "認証が必要です"}"#), REQUEST_FAILED)
            .unwrap_err();
        assert_eq!(err.to_string(), "認証が必要です");
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn test_interpret_fallback_message() {
        for body in [r#"{}"#, r#"{"error": ""}"#, r#"{"error": 5}"#, r#"[]"#] {
            let err = interpret_response(&raw(500, body), REQUEST_FAILED).unwrap_err();
            assert_eq!(err.to_string(), REQUEST_FAILED, "body {}", body);
        }
        let err = interpret_response(&raw(400, "{}"), UPLOAD_FAILED).unwrap_err();
        assert_eq!(err.to_string(), UPLOAD_FAILED);
    }

    #[test]
    fn test_interpret_non_json() {
        let err = interpret_response(&raw(502, "<html>Bad Gateway</html>"), REQUEST_FAILED)
            .unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
        let err = interpret_response(&raw(200, ""), REQUEST_FAILED).unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
    }

    #[test]
    fn test_request_sends_prepared() {
        let api = client(MockTransport::default().respond(200, r#"{"ok": 1}"#));
        let value = block_on(api.request(ApiRequest::get(Endpoint::AuthMe).body("x"))).unwrap();
        assert_eq!(value["ok"], 1);
        let sent = api.transport().last();
        assert_eq!(sent.url, "/app/cgi-bin/api/auth_me.py");
        assert_eq!(sent.body, None);
    }

    #[test]
    fn test_request_propagates_network_error() {
        let api = client(MockTransport::default().fail(ApiError::Network("Failed to fetch".into())));
        let err = block_on(api.request(ApiRequest::get(Endpoint::AuthMe))).unwrap_err();
        assert_eq!(err, ApiError::Network("Failed to fetch".into()));
    }

    #[test]
    fn test_request_as_shape_mismatch() {
        #[derive(Debug, Deserialize)]
        struct Needs {
            #[allow(dead_code)]
            user: String,
        }
        let api = client(MockTransport::default().respond(200, r#"{"other": 1}"#));
        let err = block_on(api.request_as::<Needs>(ApiRequest::get(Endpoint::AuthMe))).unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
    }

    #[test]
    fn test_query_encoding_skips_none() {
        #[derive(Serialize)]
        struct Filter {
            page: Option<u32>,
            #[serde(skip_serializing_if = "Option::is_none")]
            search: Option<String>,
        }
        let request = ApiRequest::get(Endpoint::UsersList)
            .query(&Filter {
                page: Some(2),
                search: None,
            })
            .unwrap();
        assert_eq!(request.query.as_deref(), Some("page=2"));
    }
}
