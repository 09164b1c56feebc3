use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlInputElement};

use super::model::{step_block_html, step_element_id, StepForm, StepSurface};
use crate::shared::config::FormConfig;
use crate::shared::events::EventBinding;
use crate::shared::feedback::show_dialog;

const STEP_SELECTOR: &str = ".step-item";
const REMOVE_ATTR: &str = "data-remove-step";

/// Step blocks inside the `#steps-container` element.
pub struct DomStepSurface {
    container: Element,
    count_field: Option<HtmlInputElement>,
}

impl DomStepSurface {
    pub fn new(container: Element, count_field: Option<HtmlInputElement>) -> Self {
        Self {
            container,
            count_field,
        }
    }

    /// Look up the container and count field by id
    pub fn find(document: &Document, config: &FormConfig) -> Option<Self> {
        let container = document.get_element_by_id(&config.steps_container_id)?;
        let count_field = document
            .get_element_by_id(&config.step_count_field_id)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok());
        Some(Self::new(container, count_field))
    }

    pub fn container(&self) -> &Element {
        &self.container
    }

    fn blocks(&self) -> Vec<Element> {
        let Ok(list) = self.container.query_selector_all(STEP_SELECTOR) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }
}

/// `step-12` -> 12
fn parse_step_id(element_id: &str) -> Option<u32> {
    element_id.strip_prefix("step-")?.parse().ok()
}

impl StepSurface for DomStepSurface {
    fn len(&self) -> usize {
        self.blocks().len()
    }

    fn max_step_id(&self) -> Option<u32> {
        self.blocks().iter().filter_map(|el| parse_step_id(&el.id())).max()
    }

    fn render_step(&mut self, id: u32) {
        if let Err(e) = self
            .container
            .insert_adjacent_html("beforeend", &step_block_html(id))
        {
            log::error!("Failed to render step {}: {:?}", id, e);
        }
    }

    fn remove_step(&mut self, id: u32) -> bool {
        let selector = format!("#{}", step_element_id(id));
        match self.container.query_selector(&selector) {
            Ok(Some(block)) => {
                block.remove();
                true
            }
            _ => false,
        }
    }

    fn relabel_steps(&mut self, label: &dyn Fn(usize) -> String) -> usize {
        let blocks = self.blocks();
        for (index, block) in blocks.iter().enumerate() {
            if let Ok(Some(heading)) = block.query_selector("h3") {
                heading.set_text_content(Some(&label(index + 1)));
            }
        }
        blocks.len()
    }

    fn set_step_count(&mut self, count: usize) {
        if let Some(field) = &self.count_field {
            field.set_value(&count.to_string());
        }
    }
}

pub type SharedStepForm = Rc<RefCell<StepForm<DomStepSurface>>>;

/// Step id of the `[data-remove-step]` button an event came from, if any
fn remove_target(event: &web_sys::Event) -> Option<u32> {
    let target = event.target()?.dyn_into::<Element>().ok()?;
    let button = target
        .closest(&format!("[{}]", REMOVE_ATTR))
        .ok()
        .flatten()?;
    button.get_attribute(REMOVE_ATTR)?.parse().ok()
}

/// Wire remove buttons (delegated on the container, so server-rendered
/// blocks work too) and every add button matching `add_step_selector`.
pub fn bind_step_controls(
    document: &Document,
    form: &SharedStepForm,
    config: &FormConfig,
) -> Result<Vec<EventBinding>, JsValue> {
    let mut bindings = Vec::new();

    let container = form.borrow().surface().container().clone();
    let on_remove = form.clone();
    bindings.push(EventBinding::listen(&container, "click", move |event| {
        if let Some(id) = remove_target(&event) {
            event.prevent_default();
            on_remove.borrow_mut().remove_step(id);
        }
    })?);

    let buttons = document.query_selector_all(&config.add_step_selector)?;
    for i in 0..buttons.length() {
        let Some(button) = buttons.item(i) else {
            continue;
        };
        let on_add = form.clone();
        bindings.push(EventBinding::listen(&button, "click", move |event| {
            event.prevent_default();
            on_add.borrow_mut().add_step();
        })?);
    }

    Ok(bindings)
}

/// Current value of the title input, `None` if the page has none
pub fn read_title(document: &Document, config: &FormConfig) -> Option<String> {
    document
        .query_selector(&config.title_selector)
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        .map(|input| input.value())
}

/// Run the pre-submit check, telling the user what is missing on failure.
pub fn validate_and_report(document: &Document, form: Option<&SharedStepForm>, config: &FormConfig) -> bool {
    let title = read_title(document, config);
    let step_count = match form {
        Some(form) => form.borrow().step_count(),
        None => document
            .query_selector_all(STEP_SELECTOR)
            .map(|list| list.length() as usize)
            .unwrap_or(0),
    };
    match super::validate_manual_form(title.as_deref(), step_count) {
        Ok(()) => true,
        Err(e) => {
            show_dialog(&e.to_string());
            false
        }
    }
}

/// Block submission of the manual form when the check fails
pub fn bind_submit_validation(
    document: &Document,
    form: Option<SharedStepForm>,
    config: &FormConfig,
) -> Result<Option<EventBinding>, JsValue> {
    let Some(element) = document.get_element_by_id(&config.manual_form_id) else {
        return Ok(None);
    };
    let document = document.clone();
    let config = config.clone();
    let binding = EventBinding::listen(&element, "submit", move |event| {
        if !validate_and_report(&document, form.as_ref(), &config) {
            event.prevent_default();
        }
    })?;
    Ok(Some(binding))
}
