//! Signal Analysis Module
//!
//! Frequency-domain and error analysis for sampled real signals.
//!
//! ## Features
//!
//! - **Spectrum Analysis**: FFT magnitude spectrum with zero-centered bins
//! - **Aliasing View**: spectral images produced by a given sampling rate
//! - **Peak Detection**: find the spectral lines of a signal
//! - **Statistics**: signal power and reconstruction error metrics
//!
//! ## Example
//!
//! ```rust
//! use sts_core::analysis::{SpectrumAnalyzer, SignalStats};
//!
//! let rate = 100.0;
//! let samples: Vec<f64> = (0..100)
//!     .map(|i| (2.0 * std::f64::consts::PI * 5.0 * i as f64 / rate).sin())
//!     .collect();
//!
//! let analyzer = SpectrumAnalyzer::new();
//! let spectrum = analyzer.compute(&samples, 1.0 / rate);
//! let replicas = analyzer.compute_replica_impulses(&spectrum, 8.0, 20.0);
//! assert!(!replicas.is_empty());
//!
//! let stats = SignalStats::compute(&samples);
//! assert!((stats.mean_power - 0.5).abs() < 1e-9);
//! ```

pub mod peaks;
pub mod spectrum;
pub mod statistics;

pub use peaks::{PeakFinder, SpectralPeak};
pub use spectrum::{
    apparent_frequency, impulse_line, is_aliased, nyquist_rate, ImpulseLine, ReplicaImpulse,
    SpectrumAnalyzer, SpectrumResult,
};
pub use statistics::{measured_snr_db, ReconstructionError, SignalStats};
