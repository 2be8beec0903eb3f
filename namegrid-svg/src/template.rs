//! Uploaded template documents.

use std::str::FromStr;

use namegrid_core::constants::{DEFAULT_TEMPLATE_HEIGHT, DEFAULT_TEMPLATE_WIDTH};

use crate::dom::{SvgElement, SvgNode, parse_svg};
use crate::error::Result;
use crate::style::length_to_px;

/// A parsed template. Read-only once loaded; a new upload replaces it.
#[derive(Clone, Debug, PartialEq)]
pub struct Template {
    pub root: SvgElement,
    /// Intrinsic size in the units the children are authored in.
    pub width: f64,
    pub height: f64,
    /// Path from `root` to the first `<text>` in document order.
    pub text_path: Option<Vec<usize>>,
}

impl Template {
    pub fn parse(text: &str) -> Result<Self> {
        let root = parse_svg(text)?;
        let (width, height) = intrinsic_size(&root);
        let text_path = root.find_path(|el| el.name == "text");
        tracing::debug!(width, height, has_text = text_path.is_some(), "template parsed");
        Ok(Self {
            root,
            width,
            height,
            text_path,
        })
    }

    pub fn children(&self) -> &[SvgNode] {
        &self.root.children
    }

    pub fn text_element(&self) -> Option<&SvgElement> {
        self.root.at_path(self.text_path.as_deref()?)
    }

    /// `xmlns:*` declarations the children may rely on.
    pub fn namespaces(&self) -> Vec<(String, String)> {
        self.root
            .prefixed_namespaces()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }
}

/// `viewBox` size when present, else each of `width` / `height` resolved to
/// pixels, else the 100 × 30 default.
fn intrinsic_size(root: &SvgElement) -> (f64, f64) {
    if let Some(vb) = root
        .attr("viewBox")
        .and_then(|v| svgtypes::ViewBox::from_str(v).ok())
        .filter(|vb| vb.w > 0.0 && vb.h > 0.0)
    {
        return (vb.w, vb.h);
    }
    let side = |attr: &str, fallback: f64| {
        root.attr(attr)
            .and_then(length_to_px)
            .filter(|v| *v > 0.0)
            .unwrap_or(fallback)
    };
    (
        side("width", DEFAULT_TEMPLATE_WIDTH),
        side("height", DEFAULT_TEMPLATE_HEIGHT),
    )
}
