use std::fmt;
use std::sync::Arc;

use super::processor::Processor;

/// Shared reference to a loaded processing module.
///
/// Cloning is cheap; every clone points at the same module instance.
#[derive(Clone)]
pub struct ModuleHandle {
    module_id: Arc<str>,
    processor: Arc<dyn Processor>,
}

impl ModuleHandle {
    pub fn new(module_id: impl Into<Arc<str>>, processor: Arc<dyn Processor>) -> Self {
        Self {
            module_id: module_id.into(),
            processor,
        }
    }

    pub fn module_id(&self) -> &str {
        &self.module_id
    }

    pub fn processor(&self) -> &Arc<dyn Processor> {
        &self.processor
    }

    /// True when both handles refer to the same loaded module instance.
    pub fn same_module(&self, other: &ModuleHandle) -> bool {
        Arc::ptr_eq(&self.processor, &other.processor)
    }
}

impl fmt::Debug for ModuleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleHandle")
            .field("module_id", &self.module_id)
            .field("api_version", &self.processor.api_version())
            .finish()
    }
}
