//! The UltraFace face-labeling plugin.
//!
//! UltraFace declares no options of its own: its default configuration is
//! empty and every key a caller supplies is handed straight to the module.

use std::sync::Arc;

use crate::config::config_resolver::ConfigResolver;
use crate::module::domain::module_loader::ModuleLoader;
use crate::module::infrastructure::artifact_resolver::{ArtifactResolver, ArtifactSpec};
use crate::module::infrastructure::registry_loader::{ModuleRegistry, ModuleSource, RegistryModuleLoader};
use crate::plugin::domain::host_plugin::{PluginRegistrar, RegistrationError};
use crate::plugin::domain::plugin_descriptor::PluginDescriptor;
use crate::plugin::processor_plugin::ProcessorPlugin;
use crate::shared::constants::{PLUGIN_AUTHOR, PLUGIN_DESCRIPTION, PLUGIN_NAME, PLUGIN_TITLE};

pub fn descriptor() -> PluginDescriptor {
    PluginDescriptor::new(PLUGIN_NAME, PLUGIN_TITLE, PLUGIN_AUTHOR, PLUGIN_DESCRIPTION)
}

/// UltraFace backed by an arbitrary module loader.
pub fn with_loader(loader: Arc<dyn ModuleLoader>) -> ProcessorPlugin {
    ProcessorPlugin::new(descriptor(), ConfigResolver::empty(), loader)
}

/// UltraFace loading its module from `modules`.
///
/// The loaded module is cached by the returned plugin, not process-wide:
/// each call builds an independent plugin that loads the module again on
/// first use. Hosts register one instance per process.
pub fn from_registry(modules: Arc<ModuleRegistry>) -> ProcessorPlugin {
    with_loader(Arc::new(RegistryModuleLoader::new(
        ModuleSource::ultraface(),
        modules,
    )))
}

/// Like [`from_registry`], with a host-supplied artifact resolved before
/// the module is built.
pub fn from_registry_with_artifact(
    modules: Arc<ModuleRegistry>,
    artifact: ArtifactSpec,
    artifacts: ArtifactResolver,
) -> ProcessorPlugin {
    let source = ModuleSource::ultraface().with_artifact(artifact);
    with_loader(Arc::new(
        RegistryModuleLoader::new(source, modules).with_artifact_resolver(artifacts),
    ))
}

/// Registers UltraFace with a host.
pub fn register(
    registrar: &mut dyn PluginRegistrar,
    modules: Arc<ModuleRegistry>,
) -> Result<(), RegistrationError> {
    registrar.add_plugin(Box::new(from_registry(modules)))
}
