//! # Sampling Theory Studio Simulation
//!
//! Noise channels, persistent scenarios and the end-to-end
//! sampling/reconstruction pipeline built on `sts-core`.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    Application Layer                    │
//! │                   (sts CLI, renderers)                  │
//! └─────────────────────────────────────────────────────────┘
//!                            │
//!                            ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │  Scenario (JSON)  ──settings──▶  Pipeline  ──▶ PlotData │
//! └─────────────────────────────────────────────────────────┘
//!                            │ NoiseSource
//!                            ▼
//!              ┌──────────────────────────────┐
//!              │ Channel: Ideal/AWGN/Frozen   │
//!              └──────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use sts_sim::prelude::*;
//! use sts_core::SignalComponent;
//!
//! let signal = sts_core::Signal::with_components([SignalComponent::new(5.0, 1.0, 0.0)]);
//! let scenario = Scenario {
//!     sampling: SamplingRate::Absolute(8.0),
//!     show_replicas: true,
//!     ..Scenario::from_signal(&signal)
//! };
//!
//! let mut channel = Channel::new(ChannelConfig::seeded(1));
//! let output = Pipeline::new()
//!     .run(&signal, &scenario.settings(&signal), &mut channel)
//!     .unwrap()
//!     .unwrap();
//! assert!(output.aliased);
//! ```

pub mod channel;
pub mod pipeline;
pub mod scenario;

// Re-exports
pub use channel::{Channel, ChannelConfig, ChannelModel, ChannelStats};
pub use pipeline::{Pipeline, PipelineOutput, PipelineSettings, PlotData};
pub use scenario::{SamplingRate, Scenario, ScenarioError, ScenarioResult};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::channel::{Channel, ChannelConfig, ChannelModel};
    pub use crate::pipeline::{Pipeline, PipelineSettings};
    pub use crate::scenario::{SamplingRate, Scenario};
}
