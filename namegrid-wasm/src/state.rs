use std::cell::RefCell;
use std::rc::Rc;

use namegrid_svg::Session;
use web_sys::{Document, Window};

/// Global application state stored behind an `Rc<RefCell<_>>` so it can be
/// shared across the WASM callbacks.
pub struct State {
    pub window: Window,
    pub document: Document,
    pub session: Session,
    /// Object URL currently behind the download link, revoked on replace.
    pub download_url: Option<String>,
}

/// Thread local storage for the single runtime state instance.
thread_local! {
    pub static STATE: RefCell<Option<Rc<RefCell<State>>>> = const { RefCell::new(None) };
}
