pub mod domain;
pub mod infrastructure;
pub mod module_resolver;
