//! Validation of the raw sizing inputs.
//!
//! Bad values are never fatal: they are replaced by a fallback or clamped into
//! range and a [`Notice`] says what happened.

use serde::{Deserialize, Serialize};

use crate::notice::Notice;
use crate::params::TemplateDefaults;
use crate::units::cm_to_px;

/// Bounds and fallback for one numeric form field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NumberField {
    pub id: &'static str,
    pub min: f64,
    pub max: f64,
    pub fallback: f64,
}

/// Width of one template copy (cm).
pub const CLONE_WIDTH: NumberField = NumberField {
    id: "clone-width",
    min: 0.1,
    max: f64::INFINITY,
    fallback: 3.0,
};

/// Widest row the grid may use (cm).
pub const MAX_GRID_WIDTH: NumberField = NumberField {
    id: "max-grid-width",
    min: 0.1,
    max: f64::INFINITY,
    fallback: 10.0,
};

/// Largest fraction of the cell width a label may take.
pub const MAX_NAME_WIDTH: NumberField = NumberField {
    id: "max-name-width",
    min: 0.1,
    max: 1.0,
    fallback: 1.0,
};

/// Largest label font size (cm); the ceiling comes from the template.
pub fn max_font_size_field(ceiling_cm: f64) -> NumberField {
    NumberField {
        id: "max-font-size",
        min: 0.1,
        max: ceiling_cm.max(0.1),
        fallback: 10.0,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Validated {
    pub value: f64,
    pub notice: Option<Notice>,
}

impl NumberField {
    /// Human name used in messages: `max-grid-width` reads "max grid width".
    pub fn label(&self) -> String {
        self.id.replace('-', " ")
    }

    pub fn validate(&self, raw: &str) -> Validated {
        let Some(v) = parse_leading_number(raw) else {
            let fallback = self.fallback.clamp(self.min, self.max);
            return self.corrected(
                fallback,
                format!(
                    "Invalid value for {}. Using fallback: {}",
                    self.label(),
                    fallback
                ),
            );
        };
        self.check(v)
    }

    /// Range check for a value that did not come from typed text, such as a
    /// template default.
    pub fn check(&self, v: f64) -> Validated {
        if v < self.min {
            return self.corrected(
                self.min,
                format!("Value for {} too small. Clamped to {}.", self.label(), self.min),
            );
        }
        if v > self.max {
            return self.corrected(
                self.max,
                format!("Value for {} too large. Clamped to {}.", self.label(), self.max),
            );
        }
        Validated {
            value: v,
            notice: None,
        }
    }

    fn corrected(&self, value: f64, message: String) -> Validated {
        Validated {
            value,
            notice: Some(Notice::InvalidNumericInput {
                field: self.id.to_string(),
                message,
            }),
        }
    }
}

/// Parse the leading decimal number of `raw`, ignoring any trailing unit or
/// garbage ("3.5cm" reads as 3.5). Returns `None` when no digits lead.
pub fn parse_leading_number(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }
    // Optional exponent, only taken when it carries digits.
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }
    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Raw text of every form input, exactly as typed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormInputs {
    pub names: String,
    /// `max-grid-width` (cm).
    pub page_width: String,
    /// `clone-width` (cm).
    pub cell_width: String,
    /// `max-font-size` (cm); blank means the template's own size.
    pub max_font_size: String,
    /// `max-name-width` (fraction of the cell); blank means the template's own.
    pub label_width: String,
}

/// Validated sizing parameters in SVG pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Sizing {
    pub page_width: f64,
    pub cell_width: f64,
    /// Label font size before fitting, in template user units.
    pub max_font_size: f64,
    pub label_width_fraction: f64,
}

impl FormInputs {
    /// Validate every sizing field against its bounds, collecting notices.
    pub fn resolve(&self, defaults: &TemplateDefaults) -> (Sizing, Vec<Notice>) {
        let mut notices = Vec::new();
        let mut take = |field: NumberField, raw: &str, default: Option<f64>| {
            let v = match default {
                Some(d) if raw.trim().is_empty() => field.check(d),
                _ => field.validate(raw),
            };
            notices.extend(v.notice);
            v.value
        };

        let page_width_cm = take(MAX_GRID_WIDTH, &self.page_width, None);
        let cell_width_cm = take(CLONE_WIDTH, &self.cell_width, None);
        // Blank template-derived fields take the template's value, still
        // held to the field bounds.
        let max_font_size_cm = take(
            max_font_size_field(defaults.max_font_size_cm),
            &self.max_font_size,
            Some(defaults.font_size_cm),
        );
        let label_width_fraction = take(
            MAX_NAME_WIDTH,
            &self.label_width,
            Some(defaults.label_width_fraction),
        );

        let sizing = Sizing {
            page_width: cm_to_px(page_width_cm),
            cell_width: cm_to_px(cell_width_cm),
            max_font_size: cm_to_px(max_font_size_cm),
            label_width_fraction,
        };
        (sizing, notices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::px_to_cm;

    #[test]
    fn reads_the_leading_number_like_a_form_would() {
        assert_eq!(parse_leading_number("3"), Some(3.0));
        assert_eq!(parse_leading_number("  3.5cm"), Some(3.5));
        assert_eq!(parse_leading_number(".5"), Some(0.5));
        assert_eq!(parse_leading_number("5."), Some(5.0));
        assert_eq!(parse_leading_number("-2e1x"), Some(-20.0));
        assert_eq!(parse_leading_number("1e"), Some(1.0));
        assert_eq!(parse_leading_number(""), None);
        assert_eq!(parse_leading_number("cm"), None);
        assert_eq!(parse_leading_number("."), None);
        assert_eq!(parse_leading_number("-"), None);
    }

    #[test]
    fn in_range_values_pass_without_notice() {
        let v = CLONE_WIDTH.validate("4.2");
        assert_eq!(v.value, 4.2);
        assert!(v.notice.is_none());
    }

    #[test]
    fn garbage_uses_the_fallback() {
        let v = MAX_GRID_WIDTH.validate("wide");
        assert_eq!(v.value, 10.0);
        assert_eq!(
            v.notice.map(|n| n.to_string()).as_deref(),
            Some("Invalid value for max grid width. Using fallback: 10")
        );
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let low = CLONE_WIDTH.validate("0");
        assert_eq!(low.value, 0.1);
        assert_eq!(
            low.notice.map(|n| n.to_string()).as_deref(),
            Some("Value for clone width too small. Clamped to 0.1.")
        );

        let high = MAX_NAME_WIDTH.validate("3");
        assert_eq!(high.value, 1.0);
        assert!(matches!(
            high.notice,
            Some(Notice::InvalidNumericInput { ref field, .. }) if field == "max-name-width"
        ));
    }

    #[test]
    fn fallback_is_kept_inside_the_field_range() {
        let field = max_font_size_field(1.5);
        assert_eq!(field.validate("").value, 1.5);
    }

    #[test]
    fn blank_font_and_label_fields_use_template_defaults() {
        let defaults = TemplateDefaults {
            font_size_cm: 0.53,
            max_font_size_cm: 1.06,
            label_width_fraction: 0.4,
        };
        let form = FormInputs {
            names: "Ada".into(),
            page_width: "10".into(),
            cell_width: "3".into(),
            ..Default::default()
        };
        let (sizing, notices) = form.resolve(&defaults);
        assert!(notices.is_empty());
        assert!((px_to_cm(sizing.max_font_size) - 0.53).abs() < 1e-9);
        assert_eq!(sizing.label_width_fraction, 0.4);
        assert!((px_to_cm(sizing.cell_width) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn tiny_template_fonts_are_held_to_the_field_minimum() {
        let defaults = TemplateDefaults::new(0.15, 2.4);
        assert_eq!(defaults.font_size_cm, 0.0);
        let form = FormInputs {
            names: "Ada".into(),
            ..Default::default()
        };
        let (sizing, notices) = form.resolve(&defaults);
        assert!((px_to_cm(sizing.max_font_size) - 0.1).abs() < 1e-9);
        assert_eq!(sizing.label_width_fraction, 1.0);
        let fields: Vec<_> = notices
            .iter()
            .map(|n| match n {
                Notice::InvalidNumericInput { field, .. } => field.as_str(),
                _ => "",
            })
            .collect();
        assert_eq!(fields, ["max-grid-width", "clone-width", "max-font-size", "max-name-width"]);
    }

    #[test]
    fn every_bad_field_reports_once() {
        let defaults = TemplateDefaults::default();
        let form = FormInputs {
            names: String::new(),
            page_width: "x".into(),
            cell_width: "-1".into(),
            max_font_size: "999".into(),
            label_width: "0".into(),
        };
        let (sizing, notices) = form.resolve(&defaults);
        assert_eq!(notices.len(), 4);
        assert!((px_to_cm(sizing.max_font_size) - defaults.max_font_size_cm).abs() < 1e-9);
        assert_eq!(sizing.label_width_fraction, 0.1);
    }
}
