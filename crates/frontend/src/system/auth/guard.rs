use contracts::system::auth::UserInfo;

use crate::shared::http::{ApiClient, Transport};

/// Where the page is and how to leave it.
pub trait PageLocation {
    fn pathname(&self) -> String;
    fn navigate(&self, url: &str);
}

/// `window.location`
pub struct BrowserLocation;

impl PageLocation for BrowserLocation {
    fn pathname(&self) -> String {
        web_sys::window()
            .and_then(|w| w.location().pathname().ok())
            .unwrap_or_default()
    }

    fn navigate(&self, url: &str) {
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.location().set_href(url) {
                log::error!("Failed to redirect to {}: {:?}", url, e);
            }
        }
    }
}

/// Return the signed-in user, or send the browser to the login page.
///
/// Any failure of `auth_me` counts as "not signed in". The redirect is
/// skipped when already on the login page.
pub async fn check_auth<T, L>(client: &ApiClient<T>, location: &L) -> Option<UserInfo>
where
    T: Transport,
    L: PageLocation,
{
    match client.auth().get_current_user().await {
        Ok(response) => Some(response.user),
        Err(e) => {
            log::debug!("Not authenticated: {}", e);
            let login_path = client.base().login_path();
            if location.pathname() != login_path {
                location.navigate(&login_path);
            }
            None
        }
    }
}
