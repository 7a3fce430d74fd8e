//! Plugin adapter exposing the UltraFace image-labeling module to host
//! pipelines.
//!
//! The adapter performs no inference itself. It reports its identity,
//! resolves configuration, loads the processing module once on first use
//! and relays `process` calls to it.

pub mod config;
pub mod module;
pub mod plugin;
pub mod shared;
