use tracing::debug;

use crate::filter::chain::FilterChain;
use crate::filter::error::{FilterError, Result};
use crate::filter::types::{FilterKind, NormalizedValue, ParameterUpdateEvent};

/// Relays UI slider and switch events to the filter chain.
///
/// Each slider event is mapped through the kind's fixed transfer function
/// (see [`FilterKind::to_native`]) and written to the matching stage. The
/// enable switch toggles the chain's bypass.
///
/// Out-of-range slider positions are clamped into `[0, 1]`; NaN and
/// infinite positions are rejected with [`FilterError::InvalidValue`].
#[derive(Debug, Clone, PartialEq)]
pub struct FilterParameterController {
    chain: FilterChain,
}

impl FilterParameterController {
    /// Take ownership of a chain and install every stage's default value.
    pub fn new(chain: FilterChain) -> Self {
        let mut controller = Self { chain };
        controller.reset();
        controller
    }

    pub fn chain(&self) -> &FilterChain {
        &self.chain
    }

    /// Set the stage of `kind` from a slider position, returning the native
    /// value written.
    pub fn apply(&mut self, kind: FilterKind, value: f32) -> Result<f32> {
        let position = NormalizedValue::new(value)?;
        let native = kind.to_native(position);
        let stage = self
            .chain
            .stage_mut(kind)
            .ok_or(FilterError::StageNotFound(kind))?;
        stage.set_value(native);
        debug!(%kind, position = position.value(), native, "filter parameter updated");
        Ok(native)
    }

    pub fn apply_event(&mut self, event: &ParameterUpdateEvent) -> Result<f32> {
        self.apply(event.kind, event.value)
    }

    /// Turn the beauty filters on (full chain) or off (raw passthrough).
    pub fn set_enabled(&mut self, enabled: bool) {
        self.chain.set_bypassed(!enabled);
    }

    pub fn is_enabled(&self) -> bool {
        !self.chain.is_bypassed()
    }

    /// Current native value of the stage of `kind`.
    pub fn native_value(&self, kind: FilterKind) -> Result<f32> {
        self.chain
            .stage(kind)
            .map(|s| s.value())
            .ok_or(FilterError::StageNotFound(kind))
    }

    /// Slider position corresponding to the stage's current value.
    pub fn normalized(&self, kind: FilterKind) -> Result<f32> {
        let native = self.native_value(kind)?;
        Ok(kind.to_normalized(native).value())
    }

    /// Restore every stage to its default native value. Leaves the enable
    /// switch as it is.
    pub fn reset(&mut self) {
        for kind in FilterKind::ALL {
            if let Some(stage) = self.chain.stage_mut(kind) {
                stage.set_value(kind.default_value());
            }
        }
    }
}

impl Default for FilterParameterController {
    fn default() -> Self {
        Self::new(FilterChain::build())
    }
}
