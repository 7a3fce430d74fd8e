use std::collections::HashMap;
use std::error::Error;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};

use crate::module::domain::module_loader::{ModuleLoadError, ModuleLoader};
use crate::module::domain::processor::Processor;
use crate::shared::constants::ULTRAFACE_MODULE_ID;

use super::artifact_resolver::{ArtifactResolver, ArtifactSpec};

/// Where a processing module comes from: its registered identifier and the
/// artifact it needs on disk, if any.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSource {
    pub module_id: String,
    #[serde(default)]
    pub artifact: Option<ArtifactSpec>,
}

impl ModuleSource {
    pub fn new(module_id: impl Into<String>) -> Self {
        Self {
            module_id: module_id.into(),
            artifact: None,
        }
    }

    pub fn with_artifact(mut self, artifact: ArtifactSpec) -> Self {
        self.artifact = Some(artifact);
        self
    }

    /// The UltraFace module. It ships its own model, so no artifact is
    /// attached unless the host adds one.
    pub fn ultraface() -> Self {
        Self::new(ULTRAFACE_MODULE_ID)
    }
}

/// What a module factory is given when asked to build its module.
#[derive(Clone, Debug)]
pub struct ModuleContext {
    module_id: String,
    artifact_path: Option<PathBuf>,
}

impl ModuleContext {
    pub fn module_id(&self) -> &str {
        &self.module_id
    }

    /// Resolved on-disk location of the module's artifact.
    pub fn artifact_path(&self) -> Option<&Path> {
        self.artifact_path.as_deref()
    }
}

pub type FactoryResult = Result<Arc<dyn Processor>, Box<dyn Error + Send + Sync>>;

pub type ModuleFactory = Arc<dyn Fn(ModuleContext) -> BoxFuture<'static, FactoryResult> + Send + Sync>;

/// Module identifiers mapped to the factories that build them.
#[derive(Clone, Default)]
pub struct ModuleRegistry {
    factories: HashMap<String, ModuleFactory>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the factory for `module_id`.
    pub fn register<F, Fut>(&mut self, module_id: impl Into<String>, factory: F)
    where
        F: Fn(ModuleContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = FactoryResult> + Send + 'static,
    {
        let factory: ModuleFactory = Arc::new(move |ctx| factory(ctx).boxed());
        self.factories.insert(module_id.into(), factory);
    }

    /// Registers an already-built module instance.
    pub fn register_processor(&mut self, module_id: impl Into<String>, processor: Arc<dyn Processor>) {
        self.register(module_id, move |_ctx| {
            let processor = Arc::clone(&processor);
            async move { Ok(processor) }
        });
    }

    pub fn contains(&self, module_id: &str) -> bool {
        self.factories.contains_key(module_id)
    }

    pub fn module_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    fn factory(&self, module_id: &str) -> Option<ModuleFactory> {
        self.factories.get(module_id).cloned()
    }
}

/// Loads a module by looking up its factory in a `ModuleRegistry`, after
/// making sure the module's artifact is on disk.
pub struct RegistryModuleLoader {
    source: ModuleSource,
    registry: Arc<ModuleRegistry>,
    artifacts: Option<ArtifactResolver>,
}

impl RegistryModuleLoader {
    pub fn new(source: ModuleSource, registry: Arc<ModuleRegistry>) -> Self {
        Self {
            source,
            registry,
            artifacts: None,
        }
    }

    /// Overrides the platform cache-backed resolver.
    pub fn with_artifact_resolver(mut self, resolver: ArtifactResolver) -> Self {
        self.artifacts = Some(resolver);
        self
    }

    pub fn source(&self) -> &ModuleSource {
        &self.source
    }

    async fn resolve_artifact(&self, spec: &ArtifactSpec) -> Result<PathBuf, ModuleLoadError> {
        let module_id = self.source.module_id.as_str();
        let resolver = match &self.artifacts {
            Some(resolver) => resolver.clone(),
            None => ArtifactResolver::with_default_cache()
                .map_err(|e| ModuleLoadError::locate(module_id, e))?,
        };
        resolver
            .resolve(spec)
            .await
            .map_err(|e| ModuleLoadError::locate(module_id, e))
    }
}

#[async_trait]
impl ModuleLoader for RegistryModuleLoader {
    fn module_id(&self) -> &str {
        &self.source.module_id
    }

    async fn load(&self) -> Result<Arc<dyn Processor>, ModuleLoadError> {
        let module_id = self.source.module_id.as_str();
        let factory = self
            .registry
            .factory(module_id)
            .ok_or_else(|| ModuleLoadError::NotFound {
                module_id: module_id.to_string(),
            })?;

        let artifact_path = match &self.source.artifact {
            Some(spec) => Some(self.resolve_artifact(spec).await?),
            None => None,
        };

        let context = ModuleContext {
            module_id: module_id.to_string(),
            artifact_path,
        };
        factory(context)
            .await
            .map_err(|e| ModuleLoadError::init(module_id, e))
    }
}
