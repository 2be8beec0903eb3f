use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Event, FileReader, HtmlInputElement};

use crate::constants::{DOWNLOAD_LINK_ID, MAX_FONT_SIZE_ID, MAX_NAME_WIDTH_ID, TEMPLATE_INPUT_ID};
use crate::state::State;
use crate::update_grid;
use crate::utils::{log, set_attribute, set_input_value, show_error};

// Wires up the file input handler for loading SVG templates.
pub fn attach_file_input(state: Rc<RefCell<State>>) -> Result<(), JsValue> {
    let doc: Document = state.borrow().document.clone();
    let Some(input) = doc.get_element_by_id(TEMPLATE_INPUT_ID) else {
        log("No template file input on the page");
        return Ok(());
    };
    let input: HtmlInputElement = input.dyn_into()?;
    let st = state.clone();
    let input_for_closure = input.clone();
    let onchange = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |_e: Event| {
        let Some(file) = input_for_closure.files().and_then(|files| files.item(0)) else {
            log("No file selected");
            return;
        };
        let reader = match FileReader::new() {
            Ok(r) => r,
            Err(e) => {
                log(&format!("Failed to create a file reader: {e:?}"));
                return;
            }
        };
        let st2 = st.clone();
        let file_name = file.name();
        let reader_for_closure = reader.clone();
        let onload = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |_ev: Event| {
            let text = reader_for_closure
                .result()
                .ok()
                .and_then(|v| v.as_string())
                .unwrap_or_default();
            if text.is_empty() {
                log("Selected file is empty or unreadable");
                return;
            }
            load_template(&st2, &file_name, &text);
        }));
        reader.set_onload(Some(onload.as_ref().unchecked_ref()));
        if let Err(e) = reader.read_as_text(&file) {
            log(&format!("Failed to read file: {e:?}"));
        }
        onload.forget();
    }));
    input.set_onchange(Some(onchange.as_ref().unchecked_ref()));
    onchange.forget();
    Ok(())
}

/// Replace the session template, pre-fill the form from it and rebuild.
fn load_template(state: &Rc<RefCell<State>>, file_name: &str, text: &str) {
    let mut guard = state.borrow_mut();
    let s = &mut *guard;
    match s.session.load_template(Some(file_name), text) {
        Ok(loaded) => {
            for notice in &loaded.notices {
                log(&notice.to_string());
            }
            if loaded.normalized.text_element().is_some() {
                let d = loaded.defaults;
                set_input_value(&s.document, MAX_FONT_SIZE_ID, &format!("{:.2}", d.font_size_cm));
                set_attribute(
                    &s.document,
                    MAX_FONT_SIZE_ID,
                    "max",
                    &format!("{:.2}", d.max_font_size_cm),
                );
                set_input_value(
                    &s.document,
                    MAX_NAME_WIDTH_ID,
                    &format!("{:.2}", d.label_width_fraction),
                );
            }
        }
        Err(e) => {
            show_error(&s.window, &e.to_string());
            return;
        }
    }
    set_attribute(&s.document, DOWNLOAD_LINK_ID, "download", s.session.file_name());
    update_grid(s);
}
