use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{FileReader, HtmlImageElement, HtmlInputElement};

/// Show the file picked in `input` in the `<img id=preview_id>` element.
///
/// Reads the first selected file as a data URL. Nothing happens when no file
/// is selected; a missing preview element is only noticed once the read
/// completes and is then ignored.
pub fn preview_image(input: &HtmlInputElement, preview_id: &str) -> Result<(), JsValue> {
    let Some(file) = input.files().and_then(|files| files.get(0)) else {
        return Ok(());
    };

    let reader = FileReader::new()?;
    let preview_id = preview_id.to_owned();
    let on_load_reader = reader.clone();
    let on_load = Closure::wrap(Box::new(move |_event: web_sys::Event| {
        let Some(src) = on_load_reader.result().ok().and_then(|r| r.as_string()) else {
            return;
        };
        let preview = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(&preview_id))
            .and_then(|el| el.dyn_into::<HtmlImageElement>().ok());
        if let Some(preview) = preview {
            preview.set_src(&src);
            let _ = preview.style().set_property("display", "block");
        }
    }) as Box<dyn FnMut(_)>);

    reader.set_onload(Some(on_load.as_ref().unchecked_ref()));
    // Keep the closure alive until the read completes
    on_load.forget();
    reader.read_as_data_url(&file)
}
