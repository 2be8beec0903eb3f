/// Element ids the page is expected to provide.
pub const TEMPLATE_INPUT_ID: &str = "svg-template";
pub const NAMES_ID: &str = "names";
pub const MAX_GRID_WIDTH_ID: &str = "max-grid-width";
pub const CLONE_WIDTH_ID: &str = "clone-width";
pub const MAX_FONT_SIZE_ID: &str = "max-font-size";
pub const MAX_NAME_WIDTH_ID: &str = "max-name-width";
pub const PREVIEW_ID: &str = "svg-preview";
pub const DOWNLOAD_LINK_ID: &str = "download-link";

/// Inputs that trigger a rebuild on every edit.
pub const LIVE_INPUT_IDS: [&str; 5] = [
    NAMES_ID,
    MAX_GRID_WIDTH_ID,
    CLONE_WIDTH_ID,
    MAX_FONT_SIZE_ID,
    MAX_NAME_WIDTH_ID,
];

/// Keeps measurement probes laid out but out of sight.
pub const PROBE_HOST_STYLE: &str =
    "position:absolute;left:-10000px;top:-10000px;visibility:hidden;pointer-events:none";
