use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::config_resolver::ConfigResolver;
use crate::config::domain::configuration::{Configuration, ConfigurationError};
use crate::module::domain::module_handle::ModuleHandle;
use crate::module::domain::module_loader::{ModuleLoadError, ModuleLoader};
use crate::module::domain::processing_result::ProcessingResult;
use crate::module::domain::processor::Processor;
use crate::module::module_resolver::ModuleResolver;
use crate::plugin::domain::host_plugin::HostPlugin;
use crate::plugin::domain::plugin_descriptor::PluginDescriptor;
use crate::plugin::domain::plugin_error::PluginError;
use crate::shared::image::Image;

/// Plugin façade: identity, configuration defaults and image processing,
/// backed by a lazily loaded processing module.
///
/// The adapter adds no behaviour of its own to processing. It validates the
/// configuration, makes sure the module is loaded, forwards the call and
/// returns the module's answer untouched.
pub struct ProcessorPlugin {
    descriptor: PluginDescriptor,
    config: ConfigResolver,
    modules: ModuleResolver,
}

impl ProcessorPlugin {
    pub fn new(
        descriptor: PluginDescriptor,
        config: ConfigResolver,
        loader: Arc<dyn ModuleLoader>,
    ) -> Self {
        Self {
            descriptor,
            config,
            modules: ModuleResolver::new(loader),
        }
    }

    pub fn identity(&self) -> &PluginDescriptor {
        &self.descriptor
    }

    pub fn config_resolver(&self) -> &ConfigResolver {
        &self.config
    }

    pub fn module_resolver(&self) -> &ModuleResolver {
        &self.modules
    }

    pub async fn default_config(&self) -> Configuration {
        self.config.defaults()
    }

    /// Defaults with `overrides` layered on top.
    pub fn merge_config(&self, overrides: Option<&Value>) -> Result<Configuration, ConfigurationError> {
        self.config.resolve(overrides)
    }

    /// Loads the module ahead of the first `process` call.
    pub async fn preload(&self) -> Result<ModuleHandle, ModuleLoadError> {
        self.modules.resolve().await
    }

    /// Processes an image with a host-supplied configuration value.
    ///
    /// A missing configuration is an error; it is not replaced by defaults.
    pub async fn process(
        &self,
        config: Option<Value>,
        image: Image,
    ) -> Result<ProcessingResult, PluginError> {
        let config = config.ok_or(ConfigurationError::Missing)?;
        let config = Configuration::from_value(config)?;
        self.process_with(&config, image).await
    }

    pub async fn process_with(
        &self,
        config: &Configuration,
        image: Image,
    ) -> Result<ProcessingResult, PluginError> {
        self.config.validate(config)?;

        let module = self.modules.resolve().await?;
        log::debug!(
            "{}: forwarding {} byte image to `{}`",
            self.descriptor.name(),
            image.len(),
            module.module_id()
        );

        module.processor().process(config, image).await.map_err(|err| {
            log::warn!("{}: processing failed: {err}", self.descriptor.name());
            PluginError::Processing(err)
        })
    }
}

#[async_trait]
impl HostPlugin for ProcessorPlugin {
    fn descriptor(&self) -> &PluginDescriptor {
        &self.descriptor
    }

    async fn default_config(&self) -> Configuration {
        ProcessorPlugin::default_config(self).await
    }

    async fn process(
        &self,
        config: Option<Value>,
        image: Image,
    ) -> Result<ProcessingResult, PluginError> {
        ProcessorPlugin::process(self, config, image).await
    }
}
