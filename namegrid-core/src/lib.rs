//! Layout and label-fitting engine for name-tag grids.
//!
//! Everything in this crate is plain arithmetic plus one injected capability,
//! [`TextMeasurer`], so it runs the same in the browser, on the command line and
//! in tests.

pub mod constants;
pub mod error;
pub mod fit;
pub mod input;
pub mod layout;
pub mod names;
pub mod notice;
pub mod params;
pub mod text;
pub mod units;

pub use error::{GridError, Result};
pub use fit::{Fit, LabelFitter, LabelNode};
pub use input::{FormInputs, NumberField, Sizing, Validated};
pub use layout::{CellPosition, GridLayout, compute_layout};
pub use names::NameList;
pub use notice::Notice;
pub use params::{GridParams, TemplateDefaults};
pub use text::{DeterministicTextMeasurer, TextMeasurer, TextMetrics, TextStyle};
pub use units::{cm_to_px, px_to_cm};
