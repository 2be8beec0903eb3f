use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Array;
use namegrid_core::GridParams;
use namegrid_svg::Session;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Blob, BlobPropertyBag, HtmlElement, Url};

mod constants;
mod measure;
mod state;
mod upload;
mod utils;

use constants::{DOWNLOAD_LINK_ID, LIVE_INPUT_IDS, PREVIEW_ID};
use measure::DomMeasurer;
use state::{STATE, State};
use utils::{log, read_form, show_error};

fn dom_session(document: &web_sys::Document) -> Session {
    Session::new(
        Box::new(DomMeasurer::new(document.clone())),
        Box::new(DomMeasurer::new(document.clone())),
    )
}

/// Rebuild the grid from the current form and refresh preview and download.
pub(crate) fn update_grid(s: &mut State) {
    let form = read_form(&s.document);
    let (svg, file_name, notices) = match s.session.rebuild(&form) {
        // No template yet.
        Ok(None) => return,
        Ok(Some(out)) => (out.svg.clone(), out.file_name.clone(), out.notices.clone()),
        Err(e) => {
            show_error(&s.window, &e.to_string());
            return;
        }
    };
    for notice in &notices {
        show_error(&s.window, &notice.to_string());
    }
    if let Err(e) = show_output(s, &svg, &file_name) {
        log(&format!("Failed to update the download link: {e:?}"));
    }
}

fn show_output(s: &mut State, svg: &str, file_name: &str) -> Result<(), JsValue> {
    if let Some(preview) = s.document.get_element_by_id(PREVIEW_ID) {
        preview.set_inner_html(svg);
    }
    let Some(link) = s.document.get_element_by_id(DOWNLOAD_LINK_ID) else {
        return Ok(());
    };

    let parts = Array::new();
    parts.push(&JsValue::from_str(svg));
    let opts = BlobPropertyBag::new();
    opts.set_type("image/svg+xml");
    let blob = Blob::new_with_str_sequence_and_options(&parts, &opts)?;
    let url = Url::create_object_url_with_blob(&blob)?;
    if let Some(old) = s.download_url.replace(url.clone()) {
        Url::revoke_object_url(&old)?;
    }

    link.set_attribute("href", &url)?;
    link.set_attribute("download", file_name)?;
    if let Some(el) = link.dyn_ref::<HtmlElement>() {
        el.style().set_property("display", "inline-block")?;
    }
    Ok(())
}

fn attach_ui(state: Rc<RefCell<State>>) -> Result<(), JsValue> {
    let doc = state.borrow().document.clone();
    upload::attach_file_input(state.clone())?;

    for id in LIVE_INPUT_IDS {
        let Some(el) = doc.get_element_by_id(id) else {
            continue;
        };
        let el: HtmlElement = el.dyn_into()?;
        let st = state.clone();
        let oninput = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            update_grid(&mut st.borrow_mut());
        }));
        el.set_oninput(Some(oninput.as_ref().unchecked_ref()));
        oninput.forget();
    }
    Ok(())
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;

    let state = Rc::new(RefCell::new(State {
        session: dom_session(&document),
        window,
        document,
        download_url: None,
    }));
    STATE.with(|st| st.replace(Some(state.clone())));
    attach_ui(state)?;
    Ok(())
}

/// Build a grid without touching the page form. `params_json` holds
/// `GridParams`; an empty string uses the defaults.
#[wasm_bindgen]
pub fn generate_grid(template_svg: &str, names: &str, params_json: &str) -> Result<String, JsValue> {
    let params: GridParams = if params_json.trim().is_empty() {
        GridParams::default()
    } else {
        serde_json::from_str(params_json).map_err(|e| JsValue::from_str(&e.to_string()))?
    };
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or("no document")?;

    let mut session = dom_session(&document);
    let to_js = |e: namegrid_svg::SvgError| JsValue::from_str(&e.to_string());
    session.load_template(None, template_svg).map_err(to_js)?;
    let output = session.rebuild(&params.form_inputs(names)).map_err(to_js)?;
    output
        .map(|out| out.svg.clone())
        .ok_or_else(|| JsValue::from_str("Please upload an SVG template."))
}

/// Suggested download name for the current template.
#[wasm_bindgen]
pub fn output_file_name() -> String {
    STATE.with(|st| {
        st.borrow()
            .as_ref()
            .map(|s| s.borrow().session.file_name().to_string())
            .unwrap_or_else(|| namegrid_core::constants::DEFAULT_FILE_NAME.to_string())
    })
}
