use namegrid_core::FormInputs;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlInputElement, HtmlTextAreaElement, Window};

use crate::constants::{
    CLONE_WIDTH_ID, MAX_FONT_SIZE_ID, MAX_GRID_WIDTH_ID, MAX_NAME_WIDTH_ID, NAMES_ID,
};

/// Log a message to the browser console.
pub fn log(s: &str) {
    web_sys::console::log_1(&JsValue::from_str(s));
}

/// Tell the user through a blocking alert.
pub fn show_error(window: &Window, message: &str) {
    log(message);
    let _ = window.alert_with_message(message);
}

/// Current text of an `<input>` or `<textarea>`; empty when the element is
/// missing.
pub fn input_value(doc: &Document, id: &str) -> String {
    let Some(el) = doc.get_element_by_id(id) else {
        return String::new();
    };
    if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
        input.value()
    } else if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
        area.value()
    } else {
        el.text_content().unwrap_or_default()
    }
}

pub fn set_input_value(doc: &Document, id: &str, value: &str) {
    if let Some(input) = doc
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
    {
        input.set_value(value);
    }
}

pub fn set_attribute(doc: &Document, id: &str, name: &str, value: &str) {
    if let Some(el) = doc.get_element_by_id(id) {
        let _ = el.set_attribute(name, value);
    }
}

/// Snapshot of every form field the grid depends on.
pub fn read_form(doc: &Document) -> FormInputs {
    FormInputs {
        names: input_value(doc, NAMES_ID),
        page_width: input_value(doc, MAX_GRID_WIDTH_ID),
        cell_width: input_value(doc, CLONE_WIDTH_ID),
        max_font_size: input_value(doc, MAX_FONT_SIZE_ID),
        label_width: input_value(doc, MAX_NAME_WIDTH_ID),
    }
}
