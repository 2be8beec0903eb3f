pub type Result<T> = std::result::Result<T, GridError>;

/// Structural failures that abort a layout pass.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("Please upload an SVG template.")]
    MissingTemplate,

    #[error("No text element found in SVG template.")]
    MissingTextNode,
}
