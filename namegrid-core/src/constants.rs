/// Application-wide numeric constants.
/// Lengths are SVG user units (CSS pixels) unless noted otherwise.
pub const PX_PER_CM: f64 = 96.0 / 2.54;
pub const PX_PER_IN: f64 = 96.0;
pub const PX_PER_PT: f64 = 96.0 / 72.0;
pub const PX_PER_PC: f64 = 16.0;

/// Multiplier applied to the font size on every fitting step.
pub const SHRINK_FACTOR: f64 = 0.95;
/// Labels are never set smaller than this (px).
pub const MIN_FONT_SIZE_PX: f64 = 1.0;

/// Used when the template carries neither a viewBox nor usable width/height.
pub const DEFAULT_TEMPLATE_WIDTH: f64 = 100.0;
pub const DEFAULT_TEMPLATE_HEIGHT: f64 = 30.0;
/// Used when the text placeholder has no readable font size.
pub const DEFAULT_TEMPLATE_FONT_SIZE_PX: f64 = 20.0;
/// Used when the placeholder width cannot be measured at upload time.
pub const DEFAULT_LABEL_WIDTH_FRACTION: f64 = 0.2;

pub const DEFAULT_FILE_NAME: &str = "names-grid.svg";
pub const FILE_NAME_SUFFIX: &str = "-name-tags.svg";
