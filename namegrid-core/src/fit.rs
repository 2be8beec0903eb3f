use serde::Serialize;

use crate::constants::{MIN_FONT_SIZE_PX, SHRINK_FACTOR};
use crate::error::{GridError, Result};

/// A text node whose label and font size can be changed and re-measured.
pub trait LabelNode {
    fn set_label(&mut self, label: &str);
    fn set_font_size(&mut self, font_size: f64);
    /// Width of the label in the space the final document renders it in.
    /// `None` when the node cannot be measured.
    fn rendered_width(&mut self) -> Option<f64>;
}

/// Outcome of fitting one label.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Fit {
    pub font_size: f64,
    pub rendered_width: f64,
    /// Number of measurements taken, the first one included.
    pub iterations: usize,
    /// False when the floor was reached and the label still overflows.
    pub fits: bool,
}

/// Shrinks a label's font size geometrically until it fits a width budget.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelFitter {
    shrink_factor: f64,
    min_font_size: f64,
}

impl Default for LabelFitter {
    fn default() -> Self {
        Self {
            shrink_factor: SHRINK_FACTOR,
            min_font_size: MIN_FONT_SIZE_PX,
        }
    }
}

impl LabelFitter {
    /// `shrink_factor` is kept inside (0, 1) and the floor above zero.
    pub fn new(shrink_factor: f64, min_font_size: f64) -> Self {
        Self {
            shrink_factor: shrink_factor.clamp(0.01, 0.99),
            min_font_size: min_font_size.max(f64::MIN_POSITIVE),
        }
    }

    pub fn shrink_factor(&self) -> f64 {
        self.shrink_factor
    }

    pub fn min_font_size(&self) -> f64 {
        self.min_font_size
    }

    /// Upper bound on measurements for a label starting at `max_font_size`.
    pub fn max_iterations(&self, max_font_size: f64) -> usize {
        if max_font_size.is_nan() || max_font_size <= self.min_font_size {
            return 1;
        }
        let steps = (self.min_font_size / max_font_size).ln() / self.shrink_factor.ln();
        steps.ceil() as usize + 1
    }

    /// Set `label` on `node` and shrink its font size from `max_font_size`
    /// until the rendered width is within `max_label_width` or the floor is hit.
    pub fn fit<N: LabelNode + ?Sized>(
        &self,
        node: &mut N,
        label: &str,
        max_font_size: f64,
        max_label_width: f64,
    ) -> Result<Fit> {
        node.set_label(label);
        let mut font_size = max_font_size;
        node.set_font_size(font_size);
        let mut width = node.rendered_width().ok_or(GridError::MissingTextNode)?;

        let limit = self.max_iterations(max_font_size);
        let mut iterations = 1;
        while width > max_label_width && font_size > self.min_font_size && iterations < limit {
            font_size = (font_size * self.shrink_factor).max(self.min_font_size);
            node.set_font_size(font_size);
            width = node.rendered_width().ok_or(GridError::MissingTextNode)?;
            iterations += 1;
        }
        tracing::debug!(label, font_size, width, iterations, "label fitted");

        Ok(Fit {
            font_size,
            rendered_width: width,
            iterations,
            fits: width <= max_label_width,
        })
    }
}
