pub mod domain;
pub mod processor_plugin;
pub mod ultraface;
