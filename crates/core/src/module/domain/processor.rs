use std::error::Error;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::domain::configuration::Configuration;
use crate::module::domain::processing_result::ProcessingResult;
use crate::shared::image::Image;

/// Version of the processing interface this adapter speaks. Modules built
/// against a different version are refused at load time.
pub const PROCESSOR_API_VERSION: u32 = 1;

/// The module accepted the call but could not produce a result.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct ProcessingError {
    message: String,
    #[source]
    source: Option<Box<dyn Error + Send + Sync>>,
}

impl ProcessingError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn Error + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Capability exposed by a loaded processing module.
///
/// Implementations must tolerate concurrent calls; the adapter forwards
/// requests from independent callers without serialising them.
#[async_trait]
pub trait Processor: Send + Sync {
    /// Interface version the module was built against.
    fn api_version(&self) -> u32 {
        PROCESSOR_API_VERSION
    }

    async fn process(
        &self,
        config: &Configuration,
        image: Image,
    ) -> Result<ProcessingResult, ProcessingError>;
}

/// Synchronous counterpart of [`Processor`] for modules that do their work
/// on the calling thread. Wrap in `BlockingProcessor` to use it.
pub trait ImageProcessor: Send + Sync {
    fn api_version(&self) -> u32 {
        PROCESSOR_API_VERSION
    }

    fn process_image(
        &self,
        config: &Configuration,
        image: Image,
    ) -> Result<ProcessingResult, ProcessingError>;
}
