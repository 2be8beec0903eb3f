//! Presentation attributes, inline `style` declarations, lengths and transforms.

use std::str::FromStr;

use namegrid_core::units::{cm_to_px, in_to_px, mm_to_px, pc_to_px, pt_to_px};
use svgtypes::{Length, LengthUnit, Transform};

use crate::dom::SvgElement;

/// Split an inline `style` attribute into `(property, value)` pairs.
pub fn style_declarations(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (k, v) = decl.split_once(':')?;
            let k = k.trim();
            let v = v.trim();
            (!k.is_empty()).then(|| (k.to_ascii_lowercase(), v.to_string()))
        })
        .collect()
}

/// Write `name: value` into the inline style, replacing an existing
/// declaration and keeping the others in order.
pub fn set_style_property(el: &mut SvgElement, name: &str, value: &str) {
    let mut decls = el.attr("style").map(style_declarations).unwrap_or_default();
    decls.retain(|(k, _)| k != name);
    decls.push((name.to_string(), value.to_string()));
    let style = decls
        .iter()
        .map(|(k, v)| format!("{k}:{v}"))
        .collect::<Vec<_>>()
        .join(";");
    el.set_attr("style", style);
}

/// Resolve an absolute SVG length to pixels. Relative units (`em`, `%`, ...)
/// have no fixed size and yield `None`.
pub fn length_to_px(value: &str) -> Option<f64> {
    let len = Length::from_str(value.trim()).ok()?;
    let px = match len.unit {
        LengthUnit::None | LengthUnit::Px => len.number,
        LengthUnit::Cm => cm_to_px(len.number),
        LengthUnit::Mm => mm_to_px(len.number),
        LengthUnit::In => in_to_px(len.number),
        LengthUnit::Pt => pt_to_px(len.number),
        LengthUnit::Pc => pc_to_px(len.number),
        _ => return None,
    };
    px.is_finite().then_some(px)
}

/// Parse a `transform` attribute; malformed values count as identity, the
/// way renderers ignore them.
pub fn parse_transform(value: &str) -> Transform {
    Transform::from_str(value).unwrap_or_default()
}

/// Same matrix in the f32 form `usvg` composes with.
pub fn to_usvg(t: &Transform) -> usvg::Transform {
    usvg::Transform::from_row(
        t.a as f32, t.b as f32, t.c as f32, t.d as f32, t.e as f32, t.f as f32,
    )
}

/// Combined transform of a chain of elements, outermost first.
pub fn accumulated_transform<'a>(
    chain: impl IntoIterator<Item = &'a SvgElement>,
) -> usvg::Transform {
    chain.into_iter().fold(usvg::Transform::identity(), |acc, el| {
        match el.attr("transform") {
            Some(t) => acc.pre_concat(to_usvg(&parse_transform(t))),
            None => acc,
        }
    })
}

/// Length a horizontal unit vector has after `t`.
pub fn x_scale(t: &usvg::Transform) -> f64 {
    f64::from(t.sx).hypot(f64::from(t.ky))
}

/// Attribute value text: integers without a fraction, everything else in the
/// shortest form that reads back to the same `f64`.
pub fn fmt_num(v: f64) -> String {
    if (v - v.round()).abs() < 1e-9 {
        let r = v.round();
        // Avoid "-0".
        if r == 0.0 {
            return "0".to_string();
        }
        format!("{r:.0}")
    } else {
        format!("{v}")
    }
}
