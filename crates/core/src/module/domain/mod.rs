pub mod module_handle;
pub mod module_loader;
pub mod processing_result;
pub mod processor;
