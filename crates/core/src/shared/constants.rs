pub const PLUGIN_NAME: &str = "ultraface";
pub const PLUGIN_TITLE: &str = "UltraFace";
pub const PLUGIN_AUTHOR: &str = "chriamue";
pub const PLUGIN_DESCRIPTION: &str = "Plugin to label images.";

pub const ULTRAFACE_MODULE_ID: &str = "ultraface";

/// Directory name under the platform cache dir where module artifacts live.
pub const ARTIFACT_CACHE_DIR_NAME: &str = "UltraFace";
