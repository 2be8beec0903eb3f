//! SVG side of the name-tag grid: template parsing, normalization, grid
//! assembly and serialization.

pub mod assemble;
pub mod css;
pub mod dom;
pub mod error;
pub mod measure;
pub mod normalize;
pub mod session;
pub mod style;
pub mod template;

pub use assemble::{GridDocument, Placement, assemble};
pub use css::Stylesheet;
pub use dom::{SvgElement, SvgNode, parse_svg};
pub use error::{Result, SvgError};
pub use measure::{UsvgMeasurer, text_probe_svg};
pub use normalize::{
    BBox, BoxMeasurer, NormalizedTemplate, build_normalized_group, compute_bounding_box,
};
pub use session::{GridOutput, LoadedTemplate, Session, output_file_name};
pub use template::Template;
