use std::fmt;

use thiserror::Error;

use crate::config::domain::configuration::ConfigurationError;
use crate::module::domain::module_loader::ModuleLoadError;
use crate::module::domain::processor::ProcessingError;

/// Which step of `process` produced a failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    Configuration,
    Load,
    Processing,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Configuration => write!(f, "configuration"),
            Stage::Load => write!(f, "load"),
            Stage::Processing => write!(f, "processing"),
        }
    }
}

/// Failure surfaced to the host, tagged with the stage that produced it.
///
/// `Load` means the plugin is currently unavailable and a later call may
/// succeed. `Configuration` and `Processing` are specific to the request.
#[derive(Error, Debug)]
pub enum PluginError {
    #[error("configuration stage failed: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("load stage failed: {0}")]
    Load(#[from] ModuleLoadError),
    #[error("processing stage failed: {0}")]
    Processing(#[from] ProcessingError),
}

impl PluginError {
    pub fn stage(&self) -> Stage {
        match self {
            PluginError::Configuration(_) => Stage::Configuration,
            PluginError::Load(_) => Stage::Load,
            PluginError::Processing(_) => Stage::Processing,
        }
    }

    /// Whether retrying the same request later can succeed without the
    /// caller changing anything.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PluginError::Load(_))
    }
}
