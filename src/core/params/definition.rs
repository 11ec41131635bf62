/// Declared parameter of a kernel or colouring algorithm.
///
/// Each definition carries its own bounds so values can be validated the
/// moment a caller sets them; the two variants keep float and integer
/// parameters apart at the type level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParameterDefinition {
    Float {
        name: &'static str,
        label: &'static str,
        tooltip: &'static str,
        default: f64,
        min: f64,
        max: f64,
        step: f64,
    },
    Int {
        name: &'static str,
        label: &'static str,
        tooltip: &'static str,
        default: i64,
        min: i64,
        max: i64,
        step: i64,
    },
}

impl ParameterDefinition {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Float { name, .. } | Self::Int { name, .. } => name,
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Float { label, .. } | Self::Int { label, .. } => label,
        }
    }

    #[must_use]
    pub fn tooltip(&self) -> &'static str {
        match self {
            Self::Float { tooltip, .. } | Self::Int { tooltip, .. } => tooltip,
        }
    }

    #[must_use]
    pub fn default_value(&self) -> ParameterValue {
        match self {
            Self::Float { default, .. } => ParameterValue::Float(*default),
            Self::Int { default, .. } => ParameterValue::Int(*default),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParameterValue {
    Float(f64),
    Int(i64),
}

impl ParameterValue {
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            Self::Int(_) => None,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            Self::Float(_) => None,
        }
    }
}
