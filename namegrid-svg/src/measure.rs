//! Geometry and text metrics computed by laying probes out with `usvg`.

use std::path::Path;
use std::sync::Arc;

use namegrid_core::{TextMeasurer, TextMetrics, TextStyle};

use crate::dom::{SVG_NS, SvgElement};
use crate::normalize::{BBox, BoxMeasurer};
use crate::style::fmt_num;

/// Standalone document holding one `<text>` run at the origin, set in `style`.
pub fn text_probe_svg(text: &str, style: &TextStyle) -> SvgElement {
    let family = match &style.font_family {
        Some(f) => format!("{f}, sans-serif"),
        None => "sans-serif".to_string(),
    };
    let mut el = SvgElement::new("text")
        .with_attr("x", "0")
        .with_attr("y", "0")
        .with_attr("font-family", family)
        .with_attr("font-size", fmt_num(style.font_size));
    if let Some(w) = &style.font_weight {
        el.set_attr("font-weight", w.as_str());
    }
    if let Some(s) = &style.font_style {
        el.set_attr("font-style", s.as_str());
    }
    el.set_text_content(text);

    let mut svg = SvgElement::new("svg").with_attr("xmlns", SVG_NS);
    svg.push(el);
    svg
}

/// Cheap to clone; clones share one font database.
#[derive(Clone)]
pub struct UsvgMeasurer {
    options: Arc<usvg::Options<'static>>,
}

impl UsvgMeasurer {
    /// Measure with the fonts installed on this machine.
    pub fn with_system_fonts() -> Self {
        let mut fontdb = usvg::fontdb::Database::new();
        fontdb.load_system_fonts();
        Self::from_fontdb(fontdb)
    }

    /// No fonts at all: shapes still measure, text does not.
    pub fn without_fonts() -> Self {
        Self::with_database(usvg::fontdb::Database::new())
    }

    /// System fonts plus extra font files; the first file's family becomes
    /// the generic `sans-serif`.
    pub fn with_font_files<P: AsRef<Path>>(paths: &[P]) -> std::io::Result<Self> {
        let mut fontdb = usvg::fontdb::Database::new();
        for p in paths {
            fontdb.load_font_file(p)?;
        }
        let first_family = first_family(&fontdb);
        fontdb.load_system_fonts();
        if let Some(name) = first_family {
            fontdb.set_sans_serif_family(name);
        }
        Ok(Self::with_database(fontdb))
    }

    /// Use `fontdb` as is, mapping `sans-serif` to its first face.
    pub fn from_fontdb(mut fontdb: usvg::fontdb::Database) -> Self {
        if let Some(name) = first_family(&fontdb) {
            fontdb.set_sans_serif_family(name);
        }
        Self::with_database(fontdb)
    }

    fn with_database(fontdb: usvg::fontdb::Database) -> Self {
        tracing::debug!(faces = fontdb.len(), "font database ready");
        let mut options = usvg::Options::default();
        options.fontdb = Arc::new(fontdb);
        Self {
            options: Arc::new(options),
        }
    }

    pub fn has_fonts(&self) -> bool {
        !self.options.fontdb.is_empty()
    }

    fn tree(&self, probe: &SvgElement) -> Option<usvg::Tree> {
        usvg::Tree::from_str(&probe.to_string(), &self.options)
            .map_err(|e| tracing::warn!("probe document rejected: {e}"))
            .ok()
    }
}

fn first_family(fontdb: &usvg::fontdb::Database) -> Option<String> {
    fontdb
        .faces()
        .next()
        .and_then(|face| face.families.first().map(|(n, _)| n.clone()))
}

fn first_text(group: &usvg::Group) -> Option<&usvg::Text> {
    group.children().iter().find_map(|node| match node {
        usvg::Node::Text(text) => Some(text.as_ref()),
        usvg::Node::Group(g) => first_text(g),
        _ => None,
    })
}

impl TextMeasurer for UsvgMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> Option<TextMetrics> {
        let tree = self.tree(&text_probe_svg(text, style))?;
        // Runs without a usable font are dropped during conversion.
        let Some(node) = first_text(tree.root()) else {
            tracing::warn!(text, "no font could lay out the label");
            return None;
        };
        let rect = node.abs_bounding_box();
        Some(TextMetrics {
            width: f64::from(rect.width()),
            height: f64::from(rect.height()),
        })
    }
}

impl BoxMeasurer for UsvgMeasurer {
    fn bounding_box(&self, probe: &SvgElement) -> Option<BBox> {
        let tree = self.tree(probe)?;
        let root = tree.root();
        if !root.has_children() {
            return None;
        }
        let rect = root.abs_bounding_box();
        Some(BBox {
            x: f64::from(rect.x()),
            y: f64::from(rect.y()),
            width: f64::from(rect.width()),
            height: f64::from(rect.height()),
        })
    }
}
