use std::collections::HashSet;

use serde_json::Value;

use super::configuration::{value_kind, Configuration, ConfigurationError};

/// Valid-value constraint attached to a declared option.
#[derive(Clone, Debug, PartialEq)]
pub enum ValueConstraint {
    Boolean,
    String,
    Mapping,
    /// Any number, optionally bounded (inclusive).
    Number { min: Option<f64>, max: Option<f64> },
    /// Whole numbers only, optionally bounded (inclusive).
    Integer { min: Option<i64>, max: Option<i64> },
    /// Value must equal one of the listed values.
    OneOf(Vec<Value>),
}

impl ValueConstraint {
    /// Returns a human-readable reason when `value` violates the constraint.
    pub fn check(&self, value: &Value) -> Result<(), String> {
        match self {
            ValueConstraint::Boolean => expect_kind(value, value.is_boolean(), "boolean"),
            ValueConstraint::String => expect_kind(value, value.is_string(), "string"),
            ValueConstraint::Mapping => expect_kind(value, value.is_object(), "mapping"),
            ValueConstraint::Number { min, max } => {
                let n = value
                    .as_f64()
                    .ok_or_else(|| format!("expected number, got {}", value_kind(value)))?;
                check_bounds(n, *min, *max)
            }
            ValueConstraint::Integer { min, max } => {
                let n = value
                    .as_i64()
                    .ok_or_else(|| format!("expected integer, got {value}"))?;
                check_bounds(n, *min, *max)
            }
            ValueConstraint::OneOf(allowed) => {
                if allowed.contains(value) {
                    Ok(())
                } else {
                    let listed: Vec<String> = allowed.iter().map(Value::to_string).collect();
                    Err(format!("expected one of [{}]", listed.join(", ")))
                }
            }
        }
    }
}

fn expect_kind(value: &Value, ok: bool, expected: &str) -> Result<(), String> {
    if ok {
        Ok(())
    } else {
        Err(format!("expected {expected}, got {}", value_kind(value)))
    }
}

fn check_bounds<T>(n: T, min: Option<T>, max: Option<T>) -> Result<(), String>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if let Some(lo) = min {
        if n < lo {
            return Err(format!("must be >= {lo}"));
        }
    }
    if let Some(hi) = max {
        if n > hi {
            return Err(format!("must be <= {hi}"));
        }
    }
    Ok(())
}

/// One recognised plugin option: its default, the effect it has on
/// processing, and the values it accepts.
#[derive(Clone, Debug, PartialEq)]
pub struct OptionSpec {
    name: String,
    default: Value,
    effect: String,
    constraint: Option<ValueConstraint>,
}

impl OptionSpec {
    pub fn new(name: impl Into<String>, default: impl Into<Value>, effect: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: default.into(),
            effect: effect.into(),
            constraint: None,
        }
    }

    pub fn with_constraint(mut self, constraint: ValueConstraint) -> Self {
        self.constraint = Some(constraint);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_value(&self) -> &Value {
        &self.default
    }

    pub fn effect(&self) -> &str {
        &self.effect
    }

    pub fn constraint(&self) -> Option<&ValueConstraint> {
        self.constraint.as_ref()
    }

    pub fn validate(&self, value: &Value) -> Result<(), ConfigurationError> {
        match &self.constraint {
            None => Ok(()),
            Some(constraint) => {
                constraint
                    .check(value)
                    .map_err(|reason| ConfigurationError::InvalidValue {
                        option: self.name.clone(),
                        value: value.clone(),
                        reason,
                    })
            }
        }
    }
}

/// The set of options a plugin declares.
///
/// Undeclared keys are never rejected; only declared options are checked
/// against their constraints.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfigSchema {
    options: Vec<OptionSpec>,
}

impl ConfigSchema {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a schema, rejecting duplicate names and defaults that violate
    /// their own constraint.
    pub fn new(options: Vec<OptionSpec>) -> Result<Self, ConfigurationError> {
        {
            let mut seen = HashSet::new();
            for option in &options {
                if !seen.insert(option.name()) {
                    return Err(ConfigurationError::DuplicateOption(option.name().to_string()));
                }
                option.validate(option.default_value())?;
            }
        }
        Ok(Self { options })
    }

    pub fn options(&self) -> &[OptionSpec] {
        &self.options
    }

    pub fn option(&self, name: &str) -> Option<&OptionSpec> {
        self.options.iter().find(|o| o.name() == name)
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Default configuration in declaration order.
    pub fn defaults(&self) -> Configuration {
        self.options
            .iter()
            .fold(Configuration::new(), |config, option| {
                config.with(option.name(), option.default_value().clone())
            })
    }

    pub fn validate(&self, config: &Configuration) -> Result<(), ConfigurationError> {
        for (key, value) in config.iter() {
            if let Some(option) = self.option(key) {
                option.validate(value)?;
            }
        }
        Ok(())
    }
}
