//! # Sampling Theory Studio Core
//!
//! Signal model, sampling, reconstruction and spectrum analysis for
//! exploring the Nyquist–Shannon sampling theorem.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────────┐  clean + noise  ┌─────────┐  samples  ┌───────────────┐
//! │    Signal    ├────────────────▶│ Sampler ├──────────▶│ Reconstructor │
//! │ (components, │                 └─────────┘           └───────┬───────┘
//! │  file data)  │                                               │
//! └──────┬───────┘                                               ▼
//!        │                                              ┌─────────────────┐
//!        └────────────────────────────────────────────▶│ error / spectrum │
//!                                                       └─────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`component`]: sinusoids and the draft/commit component set
//! - [`signal`]: composed and file-derived signals, evaluation and sampling
//! - [`noise`]: SNR calibration and the [`NoiseSource`] seam
//! - [`reconstruction`]: six reconstruction methods
//! - [`analysis`]: spectrum, replicas, peaks and error statistics
//! - [`timeseries`]: CSV time-series I/O
//!
//! ## Usage
//!
//! ```rust
//! use sts_core::prelude::*;
//!
//! let mut signal = Signal::new();
//! signal.update_active_component(3.0, 1.0, 0.0);
//! signal.add_component();
//!
//! let grid = signal.domain().grid();
//! let eval = signal.evaluate(&grid, false, 20.0, Noiseless).unwrap();
//!
//! let rec = SignalReconstructor::new(&eval.samples.values, &eval.samples.times, &grid).unwrap();
//! let curve = rec.reconstruct(ReconstructionMethod::Sinc).unwrap();
//! assert_eq!(curve.len(), grid.len());
//! ```

pub mod analysis;
pub mod component;
pub mod fft_utils;
pub mod noise;
pub mod reconstruction;
pub mod resample;
pub mod signal;
pub mod timeseries;
pub mod types;

// Re-exports
pub use component::{CommittedComponent, ComponentId, ComponentSet, SignalComponent};
pub use noise::{noise_power_for_snr, NoiseSource, Noiseless, MAXIMUM_SNR_DB};
pub use reconstruction::{ReconstructionMethod, SignalReconstructor};
pub use signal::{Evaluation, SampleSet, Signal, SignalKind, SignalState, TimeDomain};
pub use types::{Point, Sample, SignalError, SignalResult};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::analysis::{SpectrumAnalyzer, SpectrumResult};
    pub use crate::component::{ComponentId, SignalComponent};
    pub use crate::noise::{NoiseSource, Noiseless};
    pub use crate::reconstruction::{ReconstructionMethod, SignalReconstructor};
    pub use crate::signal::{Signal, TimeDomain};
    pub use crate::types::{SignalError, SignalResult};
}
