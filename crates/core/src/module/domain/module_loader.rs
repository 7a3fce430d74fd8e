use std::error::Error;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use super::processor::Processor;

/// The processing module could not be located or initialised.
///
/// `Clone` so every caller waiting on the same load attempt receives the
/// same failure.
#[derive(Error, Debug, Clone)]
pub enum ModuleLoadError {
    #[error("processing module `{module_id}` is not registered")]
    NotFound { module_id: String },
    #[error("could not locate files for processing module `{module_id}`: {source}")]
    Locate {
        module_id: String,
        #[source]
        source: Arc<dyn Error + Send + Sync>,
    },
    #[error("processing module `{module_id}` failed to initialise: {source}")]
    Init {
        module_id: String,
        #[source]
        source: Arc<dyn Error + Send + Sync>,
    },
    #[error("processing module `{module_id}` implements interface v{found}, expected v{expected}")]
    IncompatibleVersion {
        module_id: String,
        expected: u32,
        found: u32,
    },
}

impl ModuleLoadError {
    pub fn locate(module_id: &str, source: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        Self::Locate {
            module_id: module_id.to_string(),
            source: Arc::from(source.into()),
        }
    }

    pub fn init(module_id: &str, source: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        Self::Init {
            module_id: module_id.to_string(),
            source: Arc::from(source.into()),
        }
    }

    pub fn module_id(&self) -> &str {
        match self {
            Self::NotFound { module_id }
            | Self::Locate { module_id, .. }
            | Self::Init { module_id, .. }
            | Self::IncompatibleVersion { module_id, .. } => module_id,
        }
    }
}

/// Locates and initialises one processing module.
///
/// Called by `ModuleResolver`, which guarantees at most one `load` is in
/// flight at a time and caches the first success.
#[async_trait]
pub trait ModuleLoader: Send + Sync {
    fn module_id(&self) -> &str;

    async fn load(&self) -> Result<Arc<dyn Processor>, ModuleLoadError>;
}
