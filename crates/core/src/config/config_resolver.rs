use serde_json::Value;

use crate::config::domain::configuration::{Configuration, ConfigurationError};
use crate::config::domain::option_spec::ConfigSchema;

/// Layers caller overrides on top of `defaults`.
///
/// `None` and JSON `null` both mean "no overrides". Any other non-mapping
/// value is rejected. Keys the defaults do not know are passed through.
pub fn merge(
    defaults: &Configuration,
    overrides: Option<&Value>,
) -> Result<Configuration, ConfigurationError> {
    match overrides {
        None | Some(Value::Null) => Ok(defaults.clone()),
        Some(value) => {
            let overrides = Configuration::from_value(value.clone())?;
            Ok(defaults.merged_with(&overrides))
        }
    }
}

/// Produces a plugin's default configuration and merges caller overrides
/// into it, validating declared options along the way.
#[derive(Clone, Debug, Default)]
pub struct ConfigResolver {
    schema: ConfigSchema,
    defaults: Configuration,
}

impl ConfigResolver {
    pub fn new(schema: ConfigSchema) -> Self {
        let defaults = schema.defaults();
        Self { schema, defaults }
    }

    /// Resolver for a plugin that declares no options.
    pub fn empty() -> Self {
        Self::new(ConfigSchema::empty())
    }

    pub fn schema(&self) -> &ConfigSchema {
        &self.schema
    }

    /// Returns a fresh copy each call; callers may mutate it freely.
    pub fn defaults(&self) -> Configuration {
        self.defaults.clone()
    }

    pub fn merge(
        &self,
        defaults: &Configuration,
        overrides: Option<&Value>,
    ) -> Result<Configuration, ConfigurationError> {
        let merged = merge(defaults, overrides)?;
        self.schema.validate(&merged)?;
        Ok(merged)
    }

    /// Shorthand for merging overrides into this resolver's own defaults.
    pub fn resolve(&self, overrides: Option<&Value>) -> Result<Configuration, ConfigurationError> {
        self.merge(&self.defaults, overrides)
    }

    pub fn validate(&self, config: &Configuration) -> Result<(), ConfigurationError> {
        self.schema.validate(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::domain::option_spec::{OptionSpec, ValueConstraint};
    use rstest::rstest;
    use serde_json::json;

    fn detection_resolver() -> ConfigResolver {
        let schema = ConfigSchema::new(vec![
            OptionSpec::new("threshold", 0.7, "Minimum score for a face to be labeled")
                .with_constraint(ValueConstraint::Number {
                    min: Some(0.0),
                    max: Some(1.0),
                }),
            OptionSpec::new("max_faces", 100, "Upper bound on labeled regions per image")
                .with_constraint(ValueConstraint::Integer {
                    min: Some(1),
                    max: None,
                }),
        ])
        .unwrap();
        ConfigResolver::new(schema)
    }

    // ── Defaults ─────────────────────────────────────────────────────

    #[test]
    fn test_empty_resolver_has_empty_defaults() {
        assert!(ConfigResolver::empty().defaults().is_empty());
    }

    #[test]
    fn test_defaults_are_idempotent() {
        let resolver = detection_resolver();
        let first = resolver.defaults();

        let mut mutated = resolver.defaults();
        mutated.insert("threshold", 0.1);

        for _ in 0..5 {
            assert_eq!(resolver.defaults(), first);
        }
    }

    // ── Merge laws ───────────────────────────────────────────────────

    #[rstest]
    #[case(None)]
    #[case(Some(json!(null)))]
    #[case(Some(json!({})))]
    fn test_merge_identity(#[case] overrides: Option<Value>) {
        let defaults = detection_resolver().defaults();
        let merged = merge(&defaults, overrides.as_ref()).unwrap();
        assert_eq!(merged, defaults);
    }

    #[test]
    fn test_merge_override_law() {
        let defaults = Configuration::new().with("shared", 1).with("default_only", 2);
        let overrides = json!({"shared": 10, "override_only": 30});

        let merged = merge(&defaults, Some(&overrides)).unwrap();

        assert_eq!(merged.get("shared"), Some(&json!(10)));
        assert_eq!(merged.get("default_only"), Some(&json!(2)));
        assert_eq!(merged.get("override_only"), Some(&json!(30)));
    }

    #[test]
    fn test_merge_keeps_every_default_key() {
        let resolver = detection_resolver();
        let merged = resolver.resolve(Some(&json!({"unrelated": "x"}))).unwrap();
        for key in resolver.defaults().keys() {
            assert!(merged.contains_key(key), "missing default key {key}");
        }
    }

    #[rstest]
    #[case(json!([{"threshold": 0.5}]))]
    #[case(json!("threshold=0.5"))]
    #[case(json!(0.5))]
    #[case(json!(false))]
    fn test_merge_rejects_non_mapping_overrides(#[case] overrides: Value) {
        let defaults = Configuration::new();
        let err = merge(&defaults, Some(&overrides)).unwrap_err();
        assert!(matches!(err, ConfigurationError::NotAMapping { .. }));
    }

    // ── Validation ───────────────────────────────────────────────────

    #[test]
    fn test_resolve_rejects_declared_option_out_of_range() {
        let err = detection_resolver()
            .resolve(Some(&json!({"threshold": 1.5})))
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidValue { ref option, .. } if option == "threshold"));
    }

    #[test]
    fn test_resolve_accepts_valid_overrides() {
        let merged = detection_resolver()
            .resolve(Some(&json!({"threshold": 0.9, "max_faces": 5})))
            .unwrap();
        assert_eq!(merged.get("threshold"), Some(&json!(0.9)));
        assert_eq!(merged.get("max_faces"), Some(&json!(5)));
    }

    #[test]
    fn test_undeclared_options_pass_through_unvalidated() {
        let merged = ConfigResolver::empty()
            .resolve(Some(&json!({"anything": [1, 2, 3]})))
            .unwrap();
        assert_eq!(merged.get("anything"), Some(&json!([1, 2, 3])));
    }
}
