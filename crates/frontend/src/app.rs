//! Per-page application context and DOM wiring.

use std::cell::RefCell;
use std::rc::Rc;

use once_cell::unsync::OnceCell;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::Document;

use crate::domain::a001_manual::ui::form::dom::{
    bind_step_controls, bind_submit_validation, DomStepSurface, SharedStepForm,
};
use crate::domain::a001_manual::ui::form::search::bind_search_form;
use crate::domain::a001_manual::ui::form::StepForm;
use crate::shared::api_utils::ApiBase;
use crate::shared::config::{load_config, ClientConfig};
use crate::shared::events::EventBinding;
use crate::shared::feedback::dismiss_flash_messages;
use crate::shared::http::ApiClient;

/// Everything one page needs, built once: resolved config and API root,
/// the manual step form if the page has one, and the live event bindings.
pub struct PageContext {
    pub config: ClientConfig,
    pub client: Rc<ApiClient>,
    step_form: RefCell<Option<SharedStepForm>>,
    bindings: RefCell<Vec<EventBinding>>,
}

impl PageContext {
    fn new() -> Self {
        let config = load_config().unwrap_or_else(|e| {
            log::error!("Failed to load client config: {}", e);
            ClientConfig::default()
        });
        let base = ApiBase::from_location(&config.api);
        log::debug!("API root resolved to {:?}", base.root());
        Self {
            client: Rc::new(ApiClient::new(base)),
            config,
            step_form: RefCell::new(None),
            bindings: RefCell::new(Vec::new()),
        }
    }

    pub fn step_form(&self) -> Option<SharedStepForm> {
        self.step_form.borrow().clone()
    }

    fn keep(&self, binding: EventBinding) {
        self.bindings.borrow_mut().push(binding);
    }

    /// Drop every listener registered by [`wire_page`]
    pub fn dispose(&self) {
        self.bindings.borrow_mut().clear();
        self.step_form.borrow_mut().take();
    }
}

thread_local! {
    static PAGE: OnceCell<PageContext> = const { OnceCell::new() };
}

/// Run `f` with the page context, creating it on first use.
pub fn with_page<R>(f: impl FnOnce(&PageContext) -> R) -> R {
    PAGE.with(|page| f(page.get_or_init(PageContext::new)))
}

/// Shared API client of this page
pub fn client() -> Rc<ApiClient> {
    with_page(|page| page.client.clone())
}

/// Wire the page once the document is parsed.
pub fn boot() {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        log::warn!("No document; skipping page wiring");
        return;
    };

    let ready_state = js_sys::Reflect::get(&document, &JsValue::from_str("readyState"))
        .ok()
        .and_then(|v| v.as_string())
        .unwrap_or_default();

    if ready_state == "loading" {
        let doc = document.clone();
        let on_ready = Closure::once(move |_event: web_sys::Event| run_wiring(&doc));
        let _ = document
            .add_event_listener_with_callback("DOMContentLoaded", on_ready.as_ref().unchecked_ref());
        on_ready.forget();
    } else {
        run_wiring(&document);
    }
}

fn run_wiring(document: &Document) {
    with_page(|page| {
        if let Err(e) = wire_page(page, document) {
            log::error!("Page wiring failed: {:?}", e);
        }
    });
}

/// Flash dismissal, search box, and, on manual edit pages, the step form.
pub fn wire_page(page: &PageContext, document: &Document) -> Result<(), JsValue> {
    dismiss_flash_messages(&page.config.feedback);

    if let Some(binding) = bind_search_form(document, &page.config.form)? {
        page.keep(binding);
    }

    let form = DomStepSurface::find(document, &page.config.form)
        .map(|surface| Rc::new(RefCell::new(StepForm::attach(surface))));
    if let Some(form) = &form {
        for binding in bind_step_controls(document, form, &page.config.form)? {
            page.keep(binding);
        }
        log::debug!("Manual form attached with {} step(s)", form.borrow().step_count());
    }
    *page.step_form.borrow_mut() = form.clone();

    if let Some(binding) = bind_submit_validation(document, form, &page.config.form)? {
        page.keep(binding);
    }
    Ok(())
}
