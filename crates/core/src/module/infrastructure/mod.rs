pub mod artifact_resolver;
pub mod blocking_processor;
pub mod registry_loader;
