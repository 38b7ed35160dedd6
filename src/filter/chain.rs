//! Fixed linear filter chain.
//!
//! The chain is built once in a fixed order and never rewired stage by stage.
//! The only structural change is the bypass toggle, which routes the source
//! straight to the sink without touching any stage values.

use tracing::info;

use crate::filter::stage::FilterStage;
use crate::filter::types::{FilterKind, Node, Route};
use crate::frame::Frame;

/// Number of stages in every chain.
pub const STAGE_COUNT: usize = 4;

/// Processing order, entry first.
pub const CHAIN_ORDER: [FilterKind; STAGE_COUNT] = [
    FilterKind::Bilateral,
    FilterKind::Brightness,
    FilterKind::Exposure,
    FilterKind::Saturation,
];

/// Ordered beauty filter chain with a single entry and exit stage.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterChain {
    stages: [FilterStage; STAGE_COUNT],
    bypassed: bool,
}

impl FilterChain {
    /// Build the chain Bilateral -> Brightness -> Exposure -> Saturation with
    /// every stage at its default value.
    pub fn build() -> Self {
        Self {
            stages: CHAIN_ORDER.map(FilterStage::new),
            bypassed: false,
        }
    }

    /// First stage; receives source frames when the chain is active.
    pub fn entry(&self) -> &FilterStage {
        &self.stages[0]
    }

    /// Last stage; feeds the sinks when the chain is active.
    pub fn exit(&self) -> &FilterStage {
        &self.stages[STAGE_COUNT - 1]
    }

    /// All stages in processing order.
    pub fn stages(&self) -> &[FilterStage] {
        &self.stages
    }

    /// Look up the stage of the given kind.
    pub fn stage(&self, kind: FilterKind) -> Option<&FilterStage> {
        self.stages.iter().find(|s| s.kind() == kind)
    }

    pub(crate) fn stage_mut(&mut self, kind: FilterKind) -> Option<&mut FilterStage> {
        self.stages.iter_mut().find(|s| s.kind() == kind)
    }

    pub fn is_bypassed(&self) -> bool {
        self.bypassed
    }

    /// Swap between raw passthrough (`true`) and the full chain (`false`).
    pub fn set_bypassed(&mut self, bypassed: bool) {
        if self.bypassed != bypassed {
            info!(bypassed, "filter chain rewired");
        }
        self.bypassed = bypassed;
    }

    pub fn route(&self) -> Route {
        if self.bypassed {
            Route::Bypass
        } else {
            Route::Filtered
        }
    }

    /// The active wiring as `(from, to)` pairs, source first.
    pub fn edges(&self) -> Vec<(Node, Node)> {
        match self.route() {
            Route::Bypass => vec![(Node::Source, Node::Sink)],
            Route::Filtered => {
                let mut edges = Vec::with_capacity(STAGE_COUNT + 1);
                edges.push((Node::Source, Node::Stage(self.entry().kind())));
                for pair in self.stages.windows(2) {
                    edges.push((Node::Stage(pair[0].kind()), Node::Stage(pair[1].kind())));
                }
                edges.push((Node::Stage(self.exit().kind()), Node::Sink));
                edges
            }
        }
    }

    /// Run a frame along the active route.
    pub fn process(&self, frame: &Frame) -> Frame {
        match self.route() {
            Route::Bypass => frame.clone(),
            Route::Filtered => {
                let first = self.entry().process(frame);
                self.stages[1..]
                    .iter()
                    .fold(first, |acc, stage| stage.process(&acc))
            }
        }
    }
}

impl Default for FilterChain {
    fn default() -> Self {
        Self::build()
    }
}
