use namegrid_core::{TextMeasurer, TextMetrics, TextStyle};
use namegrid_svg::{BBox, BoxMeasurer, SvgElement, text_probe_svg};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, SvgGraphicsElement};

use crate::constants::PROBE_HOST_STYLE;

/// Measures probes with the browser's own layout via `getBBox()`.
#[derive(Clone)]
pub struct DomMeasurer {
    document: Document,
}

/// A probe attached to the live document, detached again on drop.
struct AttachedProbe {
    host: Element,
}

impl Drop for AttachedProbe {
    fn drop(&mut self) {
        self.host.remove();
    }
}

impl DomMeasurer {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn attach(&self, probe: &SvgElement) -> Option<AttachedProbe> {
        let body = self.document.body()?;
        let host = self.document.create_element("div").ok()?;
        host.set_attribute("style", PROBE_HOST_STYLE).ok()?;
        host.set_attribute("aria-hidden", "true").ok()?;
        host.set_inner_html(&probe.to_string());
        body.append_child(&host).ok()?;
        Some(AttachedProbe { host })
    }

    fn graphics(probe: &AttachedProbe, selector: &str) -> Option<SvgGraphicsElement> {
        probe
            .host
            .query_selector(selector)
            .ok()??
            .dyn_into::<SvgGraphicsElement>()
            .ok()
    }
}

impl BoxMeasurer for DomMeasurer {
    fn bounding_box(&self, probe: &SvgElement) -> Option<BBox> {
        let attached = self.attach(probe)?;
        let svg = Self::graphics(&attached, "svg")?;
        let rect = svg.get_b_box().ok()?;
        Some(BBox {
            x: f64::from(rect.x()),
            y: f64::from(rect.y()),
            width: f64::from(rect.width()),
            height: f64::from(rect.height()),
        })
    }
}

impl TextMeasurer for DomMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> Option<TextMetrics> {
        let attached = self.attach(&text_probe_svg(text, style))?;
        let node = Self::graphics(&attached, "text")?;
        let rect = node.get_b_box().ok()?;
        Some(TextMetrics {
            width: f64::from(rect.width()),
            height: f64::from(rect.height()),
        })
    }
}
