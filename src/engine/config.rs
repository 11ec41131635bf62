use crate::core::colouring::RegionTarget;
use crate::core::params::definition::ParameterValue;
use crate::core::params::set::ParameterSet;
use crate::engine::{EngineError, FractalEngine, PaletteSelection};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Serializable parameter value. Untagged so configs read naturally:
/// integers deserialize as `Int`, anything fractional as `Float`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Int(i64),
    Float(f64),
}

impl From<ParameterValue> for ConfigValue {
    fn from(value: ParameterValue) -> Self {
        match value {
            ParameterValue::Float(v) => Self::Float(v),
            ParameterValue::Int(v) => Self::Int(v),
        }
    }
}

impl From<ConfigValue> for ParameterValue {
    fn from(value: ConfigValue) -> Self {
        match value {
            ConfigValue::Float(v) => Self::Float(v),
            ConfigValue::Int(v) => Self::Int(v),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetConfig {
    pub algorithm: String,
    #[serde(default)]
    pub params: BTreeMap<String, ConfigValue>,
    #[serde(default)]
    pub palette: Option<PaletteSelection>,
}

/// Complete render configuration, round-trippable through JSON via serde.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub center_real: f64,
    pub center_imag: f64,
    pub width: f64,
    pub max_iterations: u32,
    pub escape_radius: f64,
    pub kernel: String,
    #[serde(default)]
    pub kernel_params: BTreeMap<String, ConfigValue>,
    pub divergent: TargetConfig,
    pub non_divergent: TargetConfig,
}

fn param_map(params: &ParameterSet) -> BTreeMap<String, ConfigValue> {
    params
        .entries()
        .map(|(name, value)| (name.to_string(), value.into()))
        .collect()
}

fn apply_param_map(params: &mut ParameterSet, map: &BTreeMap<String, ConfigValue>) {
    for (name, value) in map {
        if let Err(err) = params.set(name, (*value).into()) {
            log::warn!("config parameter ignored: {}", err);
        }
    }
}

impl FractalEngine {
    /// Records the full render configuration.
    #[must_use]
    pub fn config(&self) -> EngineConfig {
        let target_config = |target: RegionTarget| {
            let state = self.colouring_state(target);
            TargetConfig {
                algorithm: state.algorithm.name().to_string(),
                params: param_map(&state.params),
                palette: state.palette.clone(),
            }
        };

        EngineConfig {
            center_real: self.view.center_real,
            center_imag: self.view.center_imag,
            width: self.view.width,
            max_iterations: self.view.max_iterations,
            escape_radius: self.view.escape_radius,
            kernel: self.kernel.name().to_string(),
            kernel_params: param_map(&self.kernel_params),
            divergent: target_config(RegionTarget::Divergent),
            non_divergent: target_config(RegionTarget::NonDivergent),
        }
    }

    /// Restores a recorded configuration.
    ///
    /// Unknown kernel or algorithm names and invalid view values fail before
    /// anything is touched. Individual parameter values that no longer
    /// validate are logged and left at their defaults. A palette selection
    /// that no longer resolves is kept; colouring degrades to the
    /// algorithm's fallback until the pack reappears.
    pub fn apply_config(&mut self, config: &EngineConfig) -> Result<(), EngineError> {
        crate::core::data::view_params::ViewParams::validate(
            config.center_real,
            config.center_imag,
            config.width,
            config.max_iterations,
            config.escape_radius,
        )
        .map_err(EngineError::View)?;

        let kernel = self
            .registry
            .kernel(&config.kernel)
            .ok_or_else(|| EngineError::KernelNotFound(config.kernel.clone()))?;

        let resolve_target = |target: RegionTarget, target_config: &TargetConfig| {
            self.registry
                .colouring(target, &target_config.algorithm)
                .ok_or_else(|| EngineError::ColouringNotFound {
                    target,
                    name: target_config.algorithm.clone(),
                })
        };
        let divergent = resolve_target(RegionTarget::Divergent, &config.divergent)?;
        let non_divergent = resolve_target(RegionTarget::NonDivergent, &config.non_divergent)?;

        self.view.center_real = config.center_real;
        self.view.center_imag = config.center_imag;
        self.view.width = config.width;
        self.view.max_iterations = config.max_iterations;
        self.view.escape_radius = config.escape_radius;
        let (width_px, height_px) = self.image_size();
        self.view.update_aspect(width_px, height_px);

        let mut kernel_params = ParameterSet::from_definitions(kernel.parameter_definitions());
        apply_param_map(&mut kernel_params, &config.kernel_params);
        self.kernel = kernel;
        self.kernel_params = kernel_params;

        for (target, algorithm, target_config) in [
            (RegionTarget::Divergent, divergent, &config.divergent),
            (
                RegionTarget::NonDivergent,
                non_divergent,
                &config.non_divergent,
            ),
        ] {
            let mut params = ParameterSet::from_definitions(algorithm.parameter_definitions());
            apply_param_map(&mut params, &target_config.params);

            let state = self.colouring_state_mut(target);
            state.algorithm = algorithm;
            state.params = params;
            state.palette = target_config.palette.clone();
        }

        self.invalidate();

        Ok(())
    }
}
