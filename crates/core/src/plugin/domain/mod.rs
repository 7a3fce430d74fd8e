pub mod host_plugin;
pub mod plugin_descriptor;
pub mod plugin_error;
