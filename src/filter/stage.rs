use crate::filter::ops;
use crate::filter::types::FilterKind;
use crate::frame::Frame;

/// One image operation with a single tunable scalar.
///
/// Stages are created by [`FilterChain::build`](crate::filter::chain::FilterChain::build)
/// and only change value through the parameter controller.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterStage {
    kind: FilterKind,
    value: f32,
}

impl FilterStage {
    /// Create a stage holding its kind's default native value.
    pub fn new(kind: FilterKind) -> Self {
        Self {
            kind,
            value: kind.default_value(),
        }
    }

    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    /// Current native parameter value.
    pub fn value(&self) -> f32 {
        self.value
    }

    pub(crate) fn set_value(&mut self, value: f32) {
        self.value = value;
    }

    /// Run this stage's kernel over a frame.
    pub fn process(&self, frame: &Frame) -> Frame {
        match self.kind {
            FilterKind::Bilateral => ops::bilateral(frame, self.value),
            FilterKind::Exposure => ops::exposure(frame, self.value),
            FilterKind::Brightness => ops::brightness(frame, self.value),
            FilterKind::Saturation => ops::saturation(frame, self.value),
        }
    }
}
