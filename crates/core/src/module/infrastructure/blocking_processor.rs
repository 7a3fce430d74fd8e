use std::sync::Arc;

use async_trait::async_trait;

use crate::config::domain::configuration::Configuration;
use crate::module::domain::processing_result::ProcessingResult;
use crate::module::domain::processor::{ImageProcessor, ProcessingError, Processor};
use crate::shared::image::Image;

/// Exposes a synchronous `ImageProcessor` as an async `Processor`.
///
/// Each call runs on tokio's blocking pool, so a slow module never holds
/// up the executor thread. A panic inside the module comes back as a
/// `ProcessingError`.
pub struct BlockingProcessor<P> {
    inner: Arc<P>,
}

impl<P: ImageProcessor + 'static> BlockingProcessor<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

#[async_trait]
impl<P: ImageProcessor + 'static> Processor for BlockingProcessor<P> {
    fn api_version(&self) -> u32 {
        self.inner.api_version()
    }

    async fn process(
        &self,
        config: &Configuration,
        image: Image,
    ) -> Result<ProcessingResult, ProcessingError> {
        let inner = Arc::clone(&self.inner);
        let config = config.clone();
        tokio::task::spawn_blocking(move || inner.process_image(&config, image))
            .await
            .map_err(|e| ProcessingError::with_source("synchronous module did not complete", e))?
    }
}
