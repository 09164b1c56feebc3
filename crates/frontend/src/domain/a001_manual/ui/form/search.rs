use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlFormElement, KeyboardEvent};

use crate::shared::config::FormConfig;
use crate::shared::events::EventBinding;

/// Submit `form` directly when Enter is pressed in `input`, instead of
/// relying on implicit submission. The returned binding removes the
/// listener when dropped.
pub fn setup_search_form(
    input: &web_sys::EventTarget,
    form: HtmlFormElement,
) -> Result<EventBinding, JsValue> {
    EventBinding::listen(input, "keypress", move |event| {
        let is_enter = event
            .dyn_ref::<KeyboardEvent>()
            .map(|key| key.key() == "Enter")
            .unwrap_or(false);
        if is_enter {
            event.prevent_default();
            if let Err(e) = form.submit() {
                log::error!("Search submit failed: {:?}", e);
            }
        }
    })
}

/// Look up `#search-input` / `#search-form` and bind them if both exist
pub fn bind_search_form(document: &Document, config: &FormConfig) -> Result<Option<EventBinding>, JsValue> {
    let Some(input) = document.get_element_by_id(&config.search_input_id) else {
        return Ok(None);
    };
    let Some(form) = document
        .get_element_by_id(&config.search_form_id)
        .and_then(|el| el.dyn_into::<HtmlFormElement>().ok())
    else {
        log::warn!("#{} has no #{}", config.search_input_id, config.search_form_id);
        return Ok(None);
    };
    setup_search_form(&input, form).map(Some)
}
