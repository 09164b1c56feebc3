//! API utilities for frontend-backend communication
//!
//! Works out where the application is mounted from the current page path and
//! builds the URLs of the CGI endpoints below that mount root.

use super::config::ApiConfig;

/// Server-side operations reachable under `<root>/<api_dir>/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    AuthLogin,
    AuthLogout,
    AuthMe,
    UsersList,
    UsersCreate,
    UsersUpdate,
    UsersDelete,
    ManualsList,
    ManualsGet,
    ManualsCreate,
    ManualsUpdate,
    ManualsDelete,
    UploadImage,
}

impl Endpoint {
    /// Script name without extension
    pub fn name(self) -> &'static str {
        match self {
            Endpoint::AuthLogin => "auth_login",
            Endpoint::AuthLogout => "auth_logout",
            Endpoint::AuthMe => "auth_me",
            Endpoint::UsersList => "users_list",
            Endpoint::UsersCreate => "users_create",
            Endpoint::UsersUpdate => "users_update",
            Endpoint::UsersDelete => "users_delete",
            Endpoint::ManualsList => "manuals_list",
            Endpoint::ManualsGet => "manuals_get",
            Endpoint::ManualsCreate => "manuals_create",
            Endpoint::ManualsUpdate => "manuals_update",
            Endpoint::ManualsDelete => "manuals_delete",
            Endpoint::UploadImage => "upload_image",
        }
    }
}

/// Entry-point pages the server renders, relative to the mount root.
///
/// `users/index` comes before `index` so a user listing page is not mistaken
/// for a home page living in a `users` sub-directory.
const ENTRY_POINTS: &[&str] = &[
    "/users/index",
    "/manuals/create",
    "/manuals/edit",
    "/manuals/view",
    "/login",
    "/index",
];

/// Get the application mount root from a page path
///
/// The path must end with one of the known entry points (suffix match, not
/// substring). Everything before the matched suffix is the root.
///
/// # Example
/// ```rust
/// use frontend::shared::api_utils::detect_app_root;
/// assert_eq!(detect_app_root("/app/sub/login.py", "py"), "/app/sub");
/// assert_eq!(detect_app_root("/login.py", "py"), "");
/// assert_eq!(detect_app_root("/about.html", "py"), "");
/// ```
pub fn detect_app_root(pathname: &str, ext: &str) -> String {
    for entry in ENTRY_POINTS {
        let suffix = format!("{}.{}", entry, ext);
        if let Some(root) = pathname.strip_suffix(suffix.as_str()) {
            return root.to_string();
        }
    }
    String::new()
}

/// Resolved API location for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiBase {
    root: String,
    api_dir: String,
    ext: String,
}

impl ApiBase {
    pub fn new(root: impl Into<String>, config: &ApiConfig) -> Self {
        Self {
            root: root.into(),
            api_dir: config.api_dir.trim_matches('/').to_string(),
            ext: config.script_extension.clone(),
        }
    }

    /// Resolve the root for a page path
    pub fn for_path(pathname: &str, config: &ApiConfig) -> Self {
        Self::new(detect_app_root(pathname, &config.script_extension), config)
    }

    /// Resolve the root from `window.location`
    ///
    /// Falls back to a root deployment when no window is available.
    pub fn from_location(config: &ApiConfig) -> Self {
        let pathname = web_sys::window()
            .and_then(|w| w.location().pathname().ok())
            .unwrap_or_default();
        Self::for_path(&pathname, config)
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// `<root>/<api_dir>`
    pub fn api_path(&self) -> String {
        format!("{}/{}", self.root, self.api_dir)
    }

    /// Build a full endpoint URL, with an optional already-encoded query
    ///
    /// # Example
    /// ```rust
    /// use frontend::shared::api_utils::{ApiBase, Endpoint};
    /// use frontend::shared::config::ApiConfig;
    /// let base = ApiBase::new("/app", &ApiConfig::default());
    /// assert_eq!(
    ///     base.endpoint_url(Endpoint::ManualsGet, Some("id=3")),
    ///     "/app/cgi-bin/api/manuals_get.py?id=3"
    /// );
    /// ```
    pub fn endpoint_url(&self, endpoint: Endpoint, query: Option<&str>) -> String {
        let url = format!("{}/{}.{}", self.api_path(), endpoint.name(), self.ext);
        match query {
            Some(q) if !q.is_empty() => format!("{}?{}", url, q),
            _ => url,
        }
    }

    /// Path of the login page under the same root
    pub fn login_path(&self) -> String {
        format!("{}/login.{}", self.root, self.ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_root_for_every_entry_point() {
        let cases = [
            ("/index.py", ""),
            ("/login.py", ""),
            ("/app/index.py", "/app"),
            ("/app/sub/login.py", "/app/sub"),
            ("/app/manuals/create.py", "/app"),
            ("/app/manuals/edit.py", "/app"),
            ("/app/manuals/view.py", "/app"),
            ("/app/users/index.py", "/app"),
            ("/users/index.py", ""),
        ];
        for (path, root) in cases {
            assert_eq!(detect_app_root(path, "py"), root, "path {}", path);
        }
    }

    #[test]
    fn test_detect_root_unrecognized() {
        for path in [
            "",
            "/",
            "/app/",
            "/app/about.py",
            "/app/manuals/delete.py",
            "/app/login.py/extra",
            "/app/login.pyc",
            "/app/xlogin.py",
            "/app/index.cgi",
        ] {
            assert_eq!(detect_app_root(path, "py"), "", "path {}", path);
        }
    }

    #[test]
    fn test_detect_root_other_extension() {
        assert_eq!(detect_app_root("/tools/manuals/edit.cgi", "cgi"), "/tools");
        assert_eq!(detect_app_root("/tools/manuals/edit.py", "cgi"), "");
    }

    #[test]
    fn test_endpoint_urls() {
        let base = ApiBase::for_path("/app/manuals/edit.py", &ApiConfig::default());
        assert_eq!(base.root(), "/app");
        assert_eq!(
            base.endpoint_url(Endpoint::AuthMe, None),
            "/app/cgi-bin/api/auth_me.py"
        );
        assert_eq!(
            base.endpoint_url(Endpoint::UsersList, Some("")),
            "/app/cgi-bin/api/users_list.py"
        );
        assert_eq!(
            base.endpoint_url(Endpoint::UsersDelete, Some("id=9")),
            "/app/cgi-bin/api/users_delete.py?id=9"
        );
        assert_eq!(base.login_path(), "/app/login.py");
    }

    #[test]
    fn test_root_deployment_urls() {
        let base = ApiBase::for_path("/index.py", &ApiConfig::default());
        assert_eq!(
            base.endpoint_url(Endpoint::UploadImage, None),
            "/cgi-bin/api/upload_image.py"
        );
        assert_eq!(base.login_path(), "/login.py");
    }
}
