pub mod config_resolver;
pub mod domain;
