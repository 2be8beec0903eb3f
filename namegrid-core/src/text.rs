use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_TEMPLATE_FONT_SIZE_PX;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_family: Option<String>,
    pub font_size: f64,
    pub font_weight: Option<String>,
    pub font_style: Option<String>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: None,
            font_size: DEFAULT_TEMPLATE_FONT_SIZE_PX,
            font_weight: None,
            font_style: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
}

/// Reports the extent of a run of text set in `style`, in the text's own user
/// units. `None` means the host cannot lay the text out (no font, no live
/// rendering context).
pub trait TextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> Option<TextMetrics>;
}

/// Fixed-advance metrics: every character is `char_width_factor` ems wide.
#[derive(Debug, Clone)]
pub struct DeterministicTextMeasurer {
    pub char_width_factor: f64,
    pub line_height_factor: f64,
}

impl Default for DeterministicTextMeasurer {
    fn default() -> Self {
        Self {
            char_width_factor: 0.6,
            line_height_factor: 1.2,
        }
    }
}

impl TextMeasurer for DeterministicTextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> Option<TextMetrics> {
        let lines = text.split('\n').collect::<Vec<_>>();
        let max_chars = lines
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        Some(TextMetrics {
            width: max_chars as f64 * style.font_size * self.char_width_factor,
            height: lines.len() as f64 * style.font_size * self.line_height_factor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_scales_with_font_size_and_length() {
        let m = DeterministicTextMeasurer::default();
        let style = TextStyle {
            font_size: 10.0,
            ..Default::default()
        };
        let a = m.measure("Ada", &style).unwrap();
        assert!((a.width - 18.0).abs() < 1e-9);
        assert!((a.height - 12.0).abs() < 1e-9);

        let big = TextStyle {
            font_size: 20.0,
            ..style
        };
        let b = m.measure("Ada", &big).unwrap();
        assert!((b.width - 2.0 * a.width).abs() < 1e-9);
    }

    #[test]
    fn longest_line_sets_the_width() {
        let m = DeterministicTextMeasurer {
            char_width_factor: 1.0,
            line_height_factor: 1.0,
        };
        let style = TextStyle {
            font_size: 1.0,
            ..Default::default()
        };
        let metrics = m.measure("ab\nabcd\n", &style).unwrap();
        assert_eq!(metrics.width, 4.0);
        assert_eq!(metrics.height, 3.0);
    }
}
