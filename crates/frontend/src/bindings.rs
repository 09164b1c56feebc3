//! Functions exported to the server-rendered pages.
//!
//! Names follow the camelCase the page templates call. API entry points
//! resolve to plain JS objects and reject with an `Error` whose message is
//! the one to show the user.

use contracts::domain::a001_manual::aggregate::{ManualDto, UpdateManualDto};
use contracts::domain::a001_manual::query::ManualListQuery;
use contracts::system::users::{CreateUserDto, UpdateUserDto, UserListQuery};
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::HtmlInputElement;

use crate::app::{client, with_page};
use crate::domain::a001_manual::ui::form::dom::validate_and_report;
use crate::domain::a001_manual::ui::form::preview;
use crate::shared::clipboard;
use crate::shared::feedback::{self, Severity};
use crate::shared::http::ApiError;
use crate::system::auth::guard::{self, BrowserLocation};

fn js_error(message: &str) -> JsValue {
    js_sys::Error::new(message).into()
}

fn to_js<T: Serialize>(result: Result<T, ApiError>) -> Result<JsValue, JsValue> {
    let value = result.map_err(|e| js_error(&e.to_string()))?;
    serde_wasm_bindgen::to_value(&value).map_err(|e| js_error(&e.to_string()))
}

fn from_js<T: DeserializeOwned>(value: JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| js_error(&e.to_string()))
}

/// `undefined`/`null` become the type's default (no filters)
fn from_js_or_default<T: DeserializeOwned + Default>(value: JsValue) -> Result<T, JsValue> {
    if value.is_undefined() || value.is_null() {
        Ok(T::default())
    } else {
        from_js(value)
    }
}

/// Remove every listener attached at boot.
#[wasm_bindgen(js_name = disposePage)]
pub fn dispose_page() {
    with_page(|page| page.dispose());
}

// ---------------------------------------------------------------------------
// Manual form
// ---------------------------------------------------------------------------

#[wasm_bindgen(js_name = addStep)]
pub fn add_step() -> Option<u32> {
    let form = with_page(|page| page.step_form())?;
    let id = form.borrow_mut().add_step();
    Some(id)
}

#[wasm_bindgen(js_name = removeStep)]
pub fn remove_step(id: u32) -> bool {
    match with_page(|page| page.step_form()) {
        Some(form) => form.borrow_mut().remove_step(id),
        None => false,
    }
}

#[wasm_bindgen(js_name = previewImage)]
pub fn preview_image(input: HtmlInputElement, preview_id: String) -> Result<(), JsValue> {
    preview::preview_image(&input, &preview_id)
}

#[wasm_bindgen(js_name = validateManualForm)]
pub fn validate_manual_form() -> bool {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return false;
    };
    with_page(|page| {
        let form = page.step_form();
        validate_and_report(&document, form.as_ref(), &page.config.form)
    })
}

// ---------------------------------------------------------------------------
// Feedback
// ---------------------------------------------------------------------------

#[wasm_bindgen(js_name = confirmDelete)]
pub fn confirm_delete(message: Option<String>) -> bool {
    feedback::confirm_delete(message.as_deref())
}

#[wasm_bindgen(js_name = copyToClipboard)]
pub fn copy_to_clipboard(text: String) {
    clipboard::copy_to_clipboard(&text);
}

#[wasm_bindgen(js_name = showAlert)]
pub fn show_alert(message: String, severity: Option<String>) {
    let severity = severity.as_deref().map(Severity::parse).unwrap_or_default();
    with_page(|page| feedback::show_alert(&message, severity, &page.config.feedback));
}

/// Accepts whatever a `catch` block caught: an `Error`, a string, or
/// anything else (shown as the generic message).
#[wasm_bindgen(js_name = handleError)]
pub fn handle_error(error: JsValue) {
    let message = feedback::thrown_message(
        error.dyn_ref::<js_sys::Error>().map(|e| String::from(e.message())),
        error.as_string(),
    );
    with_page(|page| feedback::handle_error(&message, &page.config.feedback));
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

/// Resolves to the signed-in user or `null` after redirecting to login
#[wasm_bindgen(js_name = checkAuth)]
pub async fn check_auth() -> Result<JsValue, JsValue> {
    let client = client();
    match guard::check_auth(&*client, &BrowserLocation).await {
        Some(user) => to_js(Ok(user)),
        None => Ok(JsValue::NULL),
    }
}

#[wasm_bindgen]
pub async fn login(email: String, password: String) -> Result<JsValue, JsValue> {
    to_js(client().auth().login(&email, &password).await)
}

#[wasm_bindgen]
pub async fn logout() -> Result<JsValue, JsValue> {
    to_js(client().auth().logout().await)
}

#[wasm_bindgen(js_name = currentUser)]
pub async fn current_user() -> Result<JsValue, JsValue> {
    to_js(client().auth().get_current_user().await)
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// `params`: `{page, limit, search}`. Numbers may be given as input text;
/// other keys are ignored.
#[wasm_bindgen(js_name = listUsers)]
pub async fn list_users(params: JsValue) -> Result<JsValue, JsValue> {
    let query: UserListQuery = from_js_or_default(params)?;
    to_js(client().users().list(&query).await)
}

#[wasm_bindgen(js_name = createUser)]
pub async fn create_user(user: JsValue) -> Result<JsValue, JsValue> {
    let dto: CreateUserDto = from_js(user)?;
    to_js(client().users().create(&dto).await)
}

#[wasm_bindgen(js_name = updateUser)]
pub async fn update_user(id: u32, user: JsValue) -> Result<JsValue, JsValue> {
    let dto: UpdateUserDto = from_js(user)?;
    to_js(client().users().update(i64::from(id), &dto).await)
}

#[wasm_bindgen(js_name = deleteUser)]
pub async fn delete_user(id: u32) -> Result<JsValue, JsValue> {
    to_js(client().users().delete(i64::from(id)).await)
}

// ---------------------------------------------------------------------------
// Manuals
// ---------------------------------------------------------------------------

/// `params`: `{page, limit, search, tag, author, is_published, sort, order}`.
/// Numbers may be given as input text; other keys are ignored.
#[wasm_bindgen(js_name = listManuals)]
pub async fn list_manuals(params: JsValue) -> Result<JsValue, JsValue> {
    let query: ManualListQuery = from_js_or_default(params)?;
    to_js(client().manuals().list(&query).await)
}

#[wasm_bindgen(js_name = getManual)]
pub async fn get_manual(id: u32) -> Result<JsValue, JsValue> {
    to_js(client().manuals().get(i64::from(id)).await)
}

#[wasm_bindgen(js_name = createManual)]
pub async fn create_manual(manual: JsValue) -> Result<JsValue, JsValue> {
    let dto: ManualDto = from_js(manual)?;
    to_js(client().manuals().create(&dto).await)
}

/// Only the keys present in `manual` are changed
#[wasm_bindgen(js_name = updateManual)]
pub async fn update_manual(id: u32, manual: JsValue) -> Result<JsValue, JsValue> {
    let dto: UpdateManualDto = from_js(manual)?;
    to_js(client().manuals().update(i64::from(id), &dto).await)
}

#[wasm_bindgen(js_name = deleteManual)]
pub async fn delete_manual(id: u32) -> Result<JsValue, JsValue> {
    to_js(client().manuals().delete(i64::from(id)).await)
}

#[wasm_bindgen(js_name = uploadImage)]
pub async fn upload_image(file: web_sys::File) -> Result<JsValue, JsValue> {
    to_js(client().manuals().upload_image(&file).await)
}
