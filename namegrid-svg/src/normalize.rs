//! Anchoring template content at the origin.

use namegrid_core::constants::DEFAULT_LABEL_WIDTH_FRACTION;
use namegrid_core::{Notice, TemplateDefaults, TextMeasurer, TextStyle};
use serde::Serialize;

use crate::dom::{SVG_NS, SvgElement, SvgNode};
use crate::css::Stylesheet;
use crate::style::{accumulated_transform, fmt_num, length_to_px, x_scale};
use crate::template::Template;

/// Axis-aligned box in template user units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct BBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Reports the combined extent of everything drawn by a standalone probe
/// document. `None` when there is nothing to measure or the host cannot
/// lay it out.
pub trait BoxMeasurer {
    fn bounding_box(&self, probe: &SvgElement) -> Option<BBox>;
}

/// Standalone `<svg>` holding deep copies of `children`, never part of any
/// output.
pub fn probe_document(children: &[SvgNode], namespaces: &[(String, String)]) -> SvgElement {
    let mut probe = SvgElement::new("svg").with_attr("xmlns", SVG_NS);
    for (k, v) in namespaces {
        probe.set_attr(k.as_str(), v.as_str());
    }
    probe.children = children.to_vec();
    probe
}

/// Bounding box of the template's children. Falls back to the zero box with
/// a notice when the measurer has nothing to report.
pub fn compute_bounding_box(
    template: &Template,
    measurer: &dyn BoxMeasurer,
) -> (BBox, Option<Notice>) {
    let probe = probe_document(template.children(), &template.namespaces());
    match measurer.bounding_box(&probe) {
        Some(bbox) if bbox.x.is_finite() && bbox.y.is_finite() => (bbox, None),
        _ => {
            tracing::warn!("template bounding box unavailable, anchoring at the origin");
            (
                BBox::default(),
                Some(Notice::MeasurementUnavailable {
                    what: "the template bounding box".to_string(),
                }),
            )
        }
    }
}

/// `<g transform="translate(-x,-y)">` around deep copies of `children`.
pub fn build_normalized_group(children: &[SvgNode], bbox: &BBox) -> SvgElement {
    let mut group = SvgElement::new("g").with_attr(
        "transform",
        format!("translate({},{})", fmt_num(-bbox.x), fmt_num(-bbox.y)),
    );
    group.children = children.to_vec();
    group
}

/// The template ready to be cloned into grid cells.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedTemplate {
    pub group: SvgElement,
    pub bbox: BBox,
    /// Path from `group` to the label's `<text>`.
    pub text_path: Option<Vec<usize>>,
    /// Font properties inherited by the label.
    pub text_style: TextStyle,
    /// Horizontal scale from the label's own units to template units.
    pub text_scale: f64,
    pub width: f64,
    pub height: f64,
    pub namespaces: Vec<(String, String)>,
}

impl NormalizedTemplate {
    pub fn new(template: &Template, measurer: &dyn BoxMeasurer) -> (Self, Option<Notice>) {
        let (bbox, notice) = compute_bounding_box(template, measurer);
        let group = build_normalized_group(template.children(), &bbox);
        // The group's children mirror the root's, so the same path applies.
        let text_path = template.text_path.clone();
        let (text_style, text_scale) = match &text_path {
            Some(path) => {
                let sheet = Stylesheet::from_root(&template.root);
                let lineage = template.root.lineage(path);
                (
                    inherited_text_style(&lineage, &sheet),
                    x_scale(&accumulated_transform(lineage.iter().copied())),
                )
            }
            None => (TextStyle::default(), 1.0),
        };
        let normalized = Self {
            group,
            bbox,
            text_path,
            text_style,
            text_scale,
            width: template.width,
            height: template.height,
            namespaces: template.namespaces(),
        };
        (normalized, notice)
    }

    pub fn text_element(&self) -> Option<&SvgElement> {
        self.group.at_path(self.text_path.as_deref()?)
    }

    /// Form defaults: the label's own font size and its share of the template
    /// width.
    pub fn defaults(&self, measurer: &dyn TextMeasurer) -> (TemplateDefaults, Option<Notice>) {
        let Some(text) = self.text_element() else {
            return (TemplateDefaults::default(), None);
        };
        let measured = measurer
            .measure(&text.text_content(), &self.text_style)
            .map(|m| m.width * self.text_scale / self.width)
            .filter(|f| f.is_finite());
        let notice = measured.is_none().then(|| Notice::MeasurementUnavailable {
            what: "the template label".to_string(),
        });
        let fraction = measured.unwrap_or(DEFAULT_LABEL_WIDTH_FRACTION);
        (
            TemplateDefaults::new(self.text_style.font_size, fraction),
            notice,
        )
    }
}

/// Font properties resolved down `lineage`, innermost declaration winning.
/// Rules from the template's `<style>` sheets take part in the cascade.
pub fn inherited_text_style(lineage: &[&SvgElement], sheet: &Stylesheet) -> TextStyle {
    let mut style = TextStyle::default();
    for depth in 1..=lineage.len() {
        let chain = &lineage[..depth];
        if let Some(v) = sheet.property(chain, "font-family") {
            style.font_family = Some(v);
        }
        if let Some(px) = sheet
            .property(chain, "font-size")
            .as_deref()
            .and_then(length_to_px)
            .filter(|v| *v > 0.0)
        {
            style.font_size = px;
        }
        if let Some(v) = sheet.property(chain, "font-weight") {
            style.font_weight = Some(v);
        }
        if let Some(v) = sheet.property(chain, "font-style") {
            style.font_style = Some(v);
        }
    }
    style
}
