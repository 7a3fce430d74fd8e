pub mod configuration;
pub mod option_spec;
