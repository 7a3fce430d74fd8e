use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::config::domain::configuration::Configuration;
use crate::module::domain::processing_result::ProcessingResult;
use crate::shared::image::Image;

use super::plugin_descriptor::PluginDescriptor;
use super::plugin_error::PluginError;

/// The contract a host pipeline programs against.
///
/// `process` takes the configuration as a raw JSON value because that is
/// what hosts hand over; a missing or non-mapping value is rejected before
/// anything is loaded.
#[async_trait]
pub trait HostPlugin: Send + Sync {
    fn descriptor(&self) -> &PluginDescriptor;

    fn name(&self) -> &str {
        self.descriptor().name()
    }

    fn description(&self) -> &str {
        self.descriptor().description()
    }

    async fn default_config(&self) -> Configuration;

    async fn process(
        &self,
        config: Option<Value>,
        image: Image,
    ) -> Result<ProcessingResult, PluginError>;
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("a plugin named `{0}` is already registered")]
    Duplicate(String),
}

/// Receives the plugins a plugin library exports.
pub trait PluginRegistrar {
    fn add_plugin(&mut self, plugin: Box<dyn HostPlugin>) -> Result<(), RegistrationError>;
}

/// Host-side plugin table keyed by plugin name.
#[derive(Default)]
pub struct PluginRegistry {
    plugins: BTreeMap<String, Arc<dyn HostPlugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn HostPlugin>> {
        self.plugins.get(name).cloned()
    }

    pub fn names(&self) -> Vec<&str> {
        self.plugins.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl PluginRegistrar for PluginRegistry {
    fn add_plugin(&mut self, plugin: Box<dyn HostPlugin>) -> Result<(), RegistrationError> {
        let name = plugin.name().to_string();
        if self.plugins.contains_key(&name) {
            return Err(RegistrationError::Duplicate(name));
        }
        log::debug!("Registered plugin `{name}`");
        self.plugins.insert(name, Arc::from(plugin));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoPlugin {
        descriptor: PluginDescriptor,
    }

    impl EchoPlugin {
        fn named(name: &str) -> Box<dyn HostPlugin> {
            Box::new(Self {
                descriptor: PluginDescriptor::new(name, name, "tests", "Echoes the image back"),
            })
        }
    }

    #[async_trait]
    impl HostPlugin for EchoPlugin {
        fn descriptor(&self) -> &PluginDescriptor {
            &self.descriptor
        }

        async fn default_config(&self) -> Configuration {
            Configuration::new()
        }

        async fn process(
            &self,
            _config: Option<Value>,
            image: Image,
        ) -> Result<ProcessingResult, PluginError> {
            Ok(ProcessingResult::from_image(image))
        }
    }

    #[test]
    fn test_default_name_and_description_come_from_descriptor() {
        let plugin = EchoPlugin::named("echo");
        assert_eq!(plugin.name(), "echo");
        assert_eq!(plugin.description(), "Echoes the image back");
    }

    #[test]
    fn test_registry_indexes_by_name() {
        let mut registry = PluginRegistry::new();
        registry.add_plugin(EchoPlugin::named("zoom")).unwrap();
        registry.add_plugin(EchoPlugin::named("echo")).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["echo", "zoom"]);
        assert!(registry.get("echo").is_some());
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_duplicate_name_is_rejected() {
        let mut registry = PluginRegistry::new();
        registry.add_plugin(EchoPlugin::named("echo")).unwrap();

        let err = registry.add_plugin(EchoPlugin::named("echo")).unwrap_err();

        assert_eq!(err, RegistrationError::Duplicate("echo".into()));
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_registered_plugin_is_callable() {
        let mut registry = PluginRegistry::new();
        registry.add_plugin(EchoPlugin::named("echo")).unwrap();
        let plugin = registry.get("echo").unwrap();

        let result = plugin.process(None, Image::new(vec![7, 7])).await.unwrap();

        assert_eq!(result.image.unwrap().data(), &[7, 7]);
    }
}
