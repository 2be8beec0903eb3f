use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_LABEL_WIDTH_FRACTION, DEFAULT_TEMPLATE_FONT_SIZE_PX};
use crate::input::{CLONE_WIDTH, FormInputs, MAX_GRID_WIDTH};
use crate::units::{px_to_cm, round_to};

/// Values the form is pre-filled with after a template upload.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TemplateDefaults {
    /// The placeholder's own font size (cm, two decimals).
    pub font_size_cm: f64,
    /// Upper bound accepted for the max font size field (cm).
    pub max_font_size_cm: f64,
    /// Placeholder width over template width (two decimals).
    pub label_width_fraction: f64,
}

impl TemplateDefaults {
    pub fn new(font_size_px: f64, label_width_fraction: f64) -> Self {
        let font_size_cm = px_to_cm(font_size_px);
        Self {
            font_size_cm: round_to(font_size_cm, 2),
            max_font_size_cm: round_to(font_size_cm * 2.0, 2),
            label_width_fraction: round_to(label_width_fraction, 2),
        }
    }
}

impl Default for TemplateDefaults {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE_FONT_SIZE_PX, DEFAULT_LABEL_WIDTH_FRACTION)
    }
}

/// Sizing configuration as stored in a JSON file (all lengths in cm).
///
/// ```json
/// { "cell_width_cm": 6, "page_width_cm": 19, "label_width_fraction": 0.8 }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridParams {
    pub cell_width_cm: f64,
    pub page_width_cm: f64,
    /// `None` uses the template's own font size.
    pub max_font_size_cm: Option<f64>,
    /// `None` uses the template's own placeholder width.
    pub label_width_fraction: Option<f64>,
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            cell_width_cm: CLONE_WIDTH.fallback,
            page_width_cm: MAX_GRID_WIDTH.fallback,
            max_font_size_cm: None,
            label_width_fraction: None,
        }
    }
}

impl GridParams {
    /// Render as form text so configured values go through the same
    /// validation as typed ones.
    pub fn form_inputs(&self, names: impl Into<String>) -> FormInputs {
        let opt = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_default();
        FormInputs {
            names: names.into(),
            page_width: self.page_width_cm.to_string(),
            cell_width: self.cell_width_cm.to_string(),
            max_font_size: opt(self.max_font_size_cm),
            label_width: opt(self.label_width_fraction),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_a_twenty_pixel_placeholder() {
        let d = TemplateDefaults::default();
        assert_eq!(d.font_size_cm, 0.53);
        assert_eq!(d.max_font_size_cm, 1.06);
        assert_eq!(d.label_width_fraction, 0.2);
    }

    #[test]
    fn partial_config_fills_in_defaults() {
        let p: GridParams = serde_json::from_str(r#"{ "cell_width_cm": 6.5 }"#).unwrap();
        assert_eq!(p.cell_width_cm, 6.5);
        assert_eq!(p.page_width_cm, 10.0);
        assert_eq!(p.max_font_size_cm, None);
    }

    #[test]
    fn unset_options_become_blank_fields() {
        let form = GridParams::default().form_inputs("Ada\nGrace");
        assert_eq!(form.cell_width, "3");
        assert_eq!(form.page_width, "10");
        assert_eq!(form.max_font_size, "");
        assert_eq!(form.label_width, "");
        assert_eq!(form.names, "Ada\nGrace");
    }
}
