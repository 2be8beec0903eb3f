//! Building the composite grid document.

use namegrid_core::{
    GridError, GridLayout, LabelFitter, LabelNode, NameList, Sizing, TextMeasurer, TextStyle,
};
use serde::Serialize;

use crate::dom::{SVG_NS, SvgElement};
use crate::normalize::NormalizedTemplate;
use crate::style::{fmt_num, set_style_property};

/// Where one name ended up and how large its label was set.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Placement {
    pub name: String,
    pub row: usize,
    pub col: usize,
    pub x: f64,
    pub y: f64,
    /// Fitted size in the label's own units.
    pub font_size: f64,
    /// Label width in canvas units.
    pub rendered_width: f64,
    pub fits: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GridDocument {
    pub root: SvgElement,
    pub placements: Vec<Placement>,
    pub layout: GridLayout,
}

impl GridDocument {
    pub fn to_svg_string(&self) -> String {
        self.root.to_string()
    }
}

/// The label of one grid instance, measured in canvas space.
struct InstanceText<'a> {
    element: &'a mut SvgElement,
    style: TextStyle,
    /// Label units to canvas units along x.
    scale: f64,
    measurer: &'a dyn TextMeasurer,
}

impl LabelNode for InstanceText<'_> {
    fn set_label(&mut self, label: &str) {
        self.element.set_text_content(label);
    }

    fn set_font_size(&mut self, font_size: f64) {
        self.style.font_size = font_size;
        set_style_property(self.element, "font-size", &format!("{}px", fmt_num(font_size)));
    }

    fn rendered_width(&mut self) -> Option<f64> {
        let metrics = self
            .measurer
            .measure(&self.element.text_content(), &self.style)?;
        Some(metrics.width * self.scale)
    }
}

/// Output root sized to the canvas.
fn grid_root(layout: &GridLayout, namespaces: &[(String, String)]) -> SvgElement {
    let w = fmt_num(layout.canvas_width);
    let h = fmt_num(layout.canvas_height);
    let mut root = SvgElement::new("svg")
        .with_attr("width", w.as_str())
        .with_attr("height", h.as_str())
        .with_attr("viewBox", format!("0 0 {w} {h}"))
        .with_attr("xmlns", SVG_NS);
    for (k, v) in namespaces {
        root.set_attr(k.as_str(), v.as_str());
    }
    root
}

fn instance_transform(x: f64, y: f64, scale: f64) -> String {
    let mut t = format!("translate({},{})", fmt_num(x), fmt_num(y));
    if scale != 1.0 {
        t.push_str(&format!(" scale({})", fmt_num(scale)));
    }
    t
}

/// Place one fitted copy of `template` per name, row-major.
pub fn assemble(
    names: &NameList,
    layout: &GridLayout,
    template: Option<&NormalizedTemplate>,
    sizing: &Sizing,
    fitter: &LabelFitter,
    measurer: &dyn TextMeasurer,
) -> Result<GridDocument, GridError> {
    let template = template.ok_or(GridError::MissingTemplate)?;
    let mut root = grid_root(layout, &template.namespaces);
    let budget = sizing.label_width_fraction * layout.cell_width;
    let mut placements = Vec::with_capacity(names.len());

    for (i, name) in names.iter().enumerate() {
        let pos = layout.position(i);
        let (x, y) = layout.cell_origin(i);

        let mut group = template.group.clone();
        let path = template
            .text_path
            .as_deref()
            .ok_or(GridError::MissingTextNode)?;
        let element = group.at_path_mut(path).ok_or(GridError::MissingTextNode)?;
        let mut text = InstanceText {
            element,
            style: template.text_style.clone(),
            scale: template.text_scale * layout.scale,
            measurer,
        };
        let fit = fitter.fit(&mut text, name, sizing.max_font_size, budget)?;
        if !fit.fits {
            tracing::debug!(name, font_size = fit.font_size, "label overflows at the minimum size");
        }

        let mut wrapper =
            SvgElement::new("g").with_attr("transform", instance_transform(x, y, layout.scale));
        wrapper.push(group);
        root.push(wrapper);

        placements.push(Placement {
            name: name.to_string(),
            row: pos.row,
            col: pos.col,
            x,
            y,
            font_size: fit.font_size,
            rendered_width: fit.rendered_width,
            fits: fit.fits,
        });
    }

    tracing::debug!(
        instances = placements.len(),
        columns = layout.columns,
        rows = layout.rows,
        "grid assembled"
    );
    Ok(GridDocument {
        root,
        placements,
        layout: *layout,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{BBox, BoxMeasurer};
    use crate::template::Template;
    use namegrid_core::{DeterministicTextMeasurer, cm_to_px, compute_layout};
    use pretty_assertions::assert_eq;

    struct Origin;

    impl BoxMeasurer for Origin {
        fn bounding_box(&self, _probe: &SvgElement) -> Option<BBox> {
            Some(BBox::default())
        }
    }

    fn normalized(src: &str) -> NormalizedTemplate {
        NormalizedTemplate::new(&Template::parse(src).unwrap(), &Origin).0
    }

    fn sizing(max_font_size: f64, label_width_fraction: f64) -> Sizing {
        Sizing {
            page_width: 220.0,
            cell_width: 50.0,
            max_font_size,
            label_width_fraction,
        }
    }

    #[test]
    fn writes_one_wrapped_copy_per_name() {
        let t = normalized(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="30"><text x="2" y="20">Name</text></svg>"#,
        );
        let names: NameList = ["Al", "Bo"].into_iter().collect();
        let layout = compute_layout(names.len(), 50.0, 100.0, 30.0, 220.0);
        let doc = assemble(
            &names,
            &layout,
            Some(&t),
            &sizing(10.0, 1.0),
            &LabelFitter::default(),
            &DeterministicTextMeasurer::default(),
        )
        .unwrap();
        assert_eq!(
            doc.to_svg_string(),
            concat!(
                r#"<svg width="200" height="15" viewBox="0 0 200 15" xmlns="http://www.w3.org/2000/svg">"#,
                r#"<g transform="translate(0,0) scale(0.5)"><g transform="translate(0,0)"><text x="2" y="20" style="font-size:10px">Al</text></g></g>"#,
                r#"<g transform="translate(50,0) scale(0.5)"><g transform="translate(0,0)"><text x="2" y="20" style="font-size:10px">Bo</text></g></g>"#,
                "</svg>"
            )
        );
        assert_eq!(doc.placements[1].x, 50.0);
        // 2 × 0.6 × 10, halved by the cell scale.
        assert!((doc.placements[0].rendered_width - 6.0).abs() < 1e-9);
    }

    #[test]
    fn unit_scale_is_omitted() {
        assert_eq!(instance_transform(3.0, 4.5, 1.0), "translate(3,4.5)");
        assert_eq!(instance_transform(0.0, 0.0, 2.0), "translate(0,0) scale(2)");
    }

    #[test]
    fn huge_templates_keep_their_exact_scale() {
        let layout = compute_layout(1, cm_to_px(3.0), 100000.0, 30000.0, 220.0);
        let written = instance_transform(0.0, 0.0, layout.scale);
        let scale: f64 = written
            .strip_prefix("translate(0,0) scale(")
            .and_then(|s| s.strip_suffix(')'))
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(scale, layout.scale);
        // The copy spans its cell exactly.
        assert!((100000.0 * scale - layout.cell_width).abs() < 1e-9);
    }

    #[test]
    fn tiny_fitted_sizes_are_not_rounded_away() {
        let t = normalized(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10 3"><text font-size="0.15">Name</text></svg>"#,
        );
        let names: NameList = ["Ada"].into_iter().collect();
        let layout = compute_layout(1, 50.0, 10.0, 3.0, 220.0);
        let doc = assemble(
            &names,
            &layout,
            Some(&t),
            &sizing(0.15, 1.0),
            &LabelFitter::new(0.95, 0.01),
            &DeterministicTextMeasurer::default(),
        )
        .unwrap();
        assert_eq!(doc.placements[0].font_size, 0.15);
        assert!(doc.to_svg_string().contains(r#"style="font-size:0.15px""#));
    }

    #[test]
    fn labels_shrink_to_the_cell_budget() {
        let t = normalized(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="30"><text>Name</text></svg>"#,
        );
        let names: NameList = ["A very long name"].into_iter().collect();
        let layout = compute_layout(1, 50.0, 100.0, 30.0, 220.0);
        let doc = assemble(
            &names,
            &layout,
            Some(&t),
            &sizing(20.0, 0.5),
            &LabelFitter::default(),
            &DeterministicTextMeasurer::default(),
        )
        .unwrap();
        let p = &doc.placements[0];
        assert!(p.fits);
        assert!(p.rendered_width <= 25.0);
        assert!(p.font_size < 20.0);
    }

    #[test]
    fn template_scale_counts_toward_the_label_width() {
        let plain = normalized(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="30"><text>x</text></svg>"#,
        );
        let scaled = normalized(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="30"><g transform="scale(2)"><text>x</text></g></svg>"#,
        );
        let names: NameList = ["Grace Hopper"].into_iter().collect();
        let layout = compute_layout(1, 100.0, 100.0, 30.0, 220.0);
        let run = |t: &NormalizedTemplate| {
            assemble(
                &names,
                &layout,
                Some(t),
                &sizing(20.0, 0.8),
                &LabelFitter::default(),
                &DeterministicTextMeasurer::default(),
            )
            .unwrap()
            .placements[0]
                .font_size
        };
        assert!(run(&scaled) < run(&plain));
    }

    #[test]
    fn missing_template_and_missing_text_are_errors() {
        let names: NameList = ["Ada"].into_iter().collect();
        let layout = compute_layout(1, 50.0, 100.0, 30.0, 220.0);
        let measurer = DeterministicTextMeasurer::default();
        let fitter = LabelFitter::default();
        let err = assemble(&names, &layout, None, &sizing(10.0, 1.0), &fitter, &measurer)
            .unwrap_err();
        assert_eq!(err, GridError::MissingTemplate);

        let no_text = normalized(r#"<svg xmlns="http://www.w3.org/2000/svg"><rect/></svg>"#);
        let err = assemble(&names, &layout, Some(&no_text), &sizing(10.0, 1.0), &fitter, &measurer)
            .unwrap_err();
        assert_eq!(err, GridError::MissingTextNode);
    }

    #[test]
    fn no_names_gives_an_empty_canvas() {
        let t = normalized(r#"<svg xmlns="http://www.w3.org/2000/svg"><text>x</text></svg>"#);
        let names = NameList::parse("\n  \n");
        let layout = compute_layout(0, 50.0, 100.0, 30.0, 220.0);
        let doc = assemble(
            &names,
            &layout,
            Some(&t),
            &sizing(10.0, 1.0),
            &LabelFitter::default(),
            &DeterministicTextMeasurer::default(),
        )
        .unwrap();
        assert!(doc.placements.is_empty());
        assert_eq!(
            doc.to_svg_string(),
            r#"<svg width="200" height="0" viewBox="0 0 200 0" xmlns="http://www.w3.org/2000/svg"/>"#
        );
    }
}
