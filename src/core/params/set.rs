use crate::core::params::definition::{ParameterDefinition, ParameterValue};
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ParameterError {
    Unknown {
        name: String,
    },
    TypeMismatch {
        name: String,
        expected: &'static str,
    },
    FloatOutOfRange {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },
    IntOutOfRange {
        name: String,
        value: i64,
        min: i64,
        max: i64,
    },
}

impl fmt::Display for ParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown { name } => write!(f, "unknown parameter `{}`", name),
            Self::TypeMismatch { name, expected } => {
                write!(f, "parameter `{}` expects a {} value", name, expected)
            }
            Self::FloatOutOfRange {
                name,
                value,
                min,
                max,
            } => {
                write!(
                    f,
                    "parameter `{}` value {} outside [{}, {}]",
                    name, value, min, max
                )
            }
            Self::IntOutOfRange {
                name,
                value,
                min,
                max,
            } => {
                write!(
                    f,
                    "parameter `{}` value {} outside [{}, {}]",
                    name, value, min, max
                )
            }
        }
    }
}

impl Error for ParameterError {}

/// Current values for a fixed definition slice, in definition order.
///
/// Every write is validated against the owning definition, so a stored set is
/// well-typed and in range by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSet {
    definitions: &'static [ParameterDefinition],
    values: Vec<ParameterValue>,
}

impl ParameterSet {
    #[must_use]
    pub fn from_definitions(definitions: &'static [ParameterDefinition]) -> Self {
        Self {
            definitions,
            values: definitions.iter().map(|d| d.default_value()).collect(),
        }
    }

    #[must_use]
    pub fn definitions(&self) -> &'static [ParameterDefinition] {
        self.definitions
    }

    pub fn set(&mut self, name: &str, value: ParameterValue) -> Result<(), ParameterError> {
        let index = self
            .definitions
            .iter()
            .position(|d| d.name() == name)
            .ok_or_else(|| ParameterError::Unknown {
                name: name.to_string(),
            })?;

        match (&self.definitions[index], value) {
            (ParameterDefinition::Float { min, max, .. }, ParameterValue::Float(v)) => {
                if !v.is_finite() || v < *min || v > *max {
                    return Err(ParameterError::FloatOutOfRange {
                        name: name.to_string(),
                        value: v,
                        min: *min,
                        max: *max,
                    });
                }
            }
            (ParameterDefinition::Int { min, max, .. }, ParameterValue::Int(v)) => {
                if v < *min || v > *max {
                    return Err(ParameterError::IntOutOfRange {
                        name: name.to_string(),
                        value: v,
                        min: *min,
                        max: *max,
                    });
                }
            }
            (ParameterDefinition::Float { .. }, ParameterValue::Int(_)) => {
                return Err(ParameterError::TypeMismatch {
                    name: name.to_string(),
                    expected: "float",
                });
            }
            (ParameterDefinition::Int { .. }, ParameterValue::Float(_)) => {
                return Err(ParameterError::TypeMismatch {
                    name: name.to_string(),
                    expected: "integer",
                });
            }
        }

        self.values[index] = value;
        Ok(())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<ParameterValue> {
        self.definitions
            .iter()
            .position(|d| d.name() == name)
            .map(|index| self.values[index])
    }

    #[must_use]
    pub fn float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(|v| v.as_float())
    }

    #[must_use]
    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(|v| v.as_int())
    }

    /// (name, value) pairs in definition order.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, ParameterValue)> + '_ {
        self.definitions
            .iter()
            .zip(self.values.iter())
            .map(|(d, v)| (d.name(), *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFS: &[ParameterDefinition] = &[
        ParameterDefinition::Float {
            name: "c_real",
            label: "c (real)",
            tooltip: "",
            default: -0.745,
            min: -2.0,
            max: 2.0,
            step: 0.001,
        },
        ParameterDefinition::Int {
            name: "power",
            label: "Power",
            tooltip: "",
            default: 2,
            min: 2,
            max: 8,
            step: 1,
        },
    ];

    #[test]
    fn test_from_definitions_uses_defaults() {
        let params = ParameterSet::from_definitions(DEFS);

        assert_eq!(params.float("c_real"), Some(-0.745));
        assert_eq!(params.int("power"), Some(2));
    }

    #[test]
    fn test_set_in_range_value() {
        let mut params = ParameterSet::from_definitions(DEFS);

        params.set("c_real", ParameterValue::Float(0.285)).unwrap();
        params.set("power", ParameterValue::Int(3)).unwrap();

        assert_eq!(params.float("c_real"), Some(0.285));
        assert_eq!(params.int("power"), Some(3));
    }

    #[test]
    fn test_set_rejects_unknown_name() {
        let mut params = ParameterSet::from_definitions(DEFS);
        let result = params.set("missing", ParameterValue::Float(0.0));

        assert_eq!(
            result,
            Err(ParameterError::Unknown {
                name: "missing".to_string()
            })
        );
    }

    #[test]
    fn test_set_rejects_type_mismatch_and_keeps_value() {
        let mut params = ParameterSet::from_definitions(DEFS);
        let result = params.set("power", ParameterValue::Float(3.0));

        assert_eq!(
            result,
            Err(ParameterError::TypeMismatch {
                name: "power".to_string(),
                expected: "integer"
            })
        );
        assert_eq!(params.int("power"), Some(2));
    }

    #[test]
    fn test_set_rejects_out_of_range_float() {
        let mut params = ParameterSet::from_definitions(DEFS);
        let result = params.set("c_real", ParameterValue::Float(2.5));

        assert_eq!(
            result,
            Err(ParameterError::FloatOutOfRange {
                name: "c_real".to_string(),
                value: 2.5,
                min: -2.0,
                max: 2.0
            })
        );
        assert_eq!(params.float("c_real"), Some(-0.745));
    }

    #[test]
    fn test_set_rejects_non_finite_float() {
        let mut params = ParameterSet::from_definitions(DEFS);

        assert!(params.set("c_real", ParameterValue::Float(f64::NAN)).is_err());
    }

    #[test]
    fn test_set_rejects_out_of_range_int() {
        let mut params = ParameterSet::from_definitions(DEFS);

        assert!(params.set("power", ParameterValue::Int(9)).is_err());
        assert!(params.set("power", ParameterValue::Int(1)).is_err());
    }

    #[test]
    fn test_entries_preserve_definition_order() {
        let params = ParameterSet::from_definitions(DEFS);
        let names: Vec<_> = params.entries().map(|(name, _)| name).collect();

        assert_eq!(names, vec!["c_real", "power"]);
    }
}
