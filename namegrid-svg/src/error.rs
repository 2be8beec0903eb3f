use namegrid_core::GridError;

pub type Result<T> = std::result::Result<T, SvgError>;

#[derive(Debug, thiserror::Error)]
pub enum SvgError {
    #[error("failed to parse SVG: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("root element is <{0}>, expected <svg>")]
    NotSvg(String),

    #[error(transparent)]
    Grid(#[from] GridError),
}
