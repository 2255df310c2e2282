//! Sampling and Reconstruction Pipeline
//!
//! One pass from a signal to everything a renderer shows:
//!
//! ```text
//!  Signal ──evaluate──▶ clean, noisy, samples
//!                              │
//!                              ├──reconstruct──▶ x̂(t) ──compare──▶ error curve + metrics
//!                              │
//!                              └──spectrum(noisy)──▶ |X(f)| ──replicas(fs)──▶ images
//! ```
//!
//! All curves in [`PlotData`] are `(x, y)` pairs; impulses use the
//! three-point `[(f, 0), (f, m), (f, 0)]` shape.

use serde::Serialize;
use sts_core::analysis::{
    is_aliased, nyquist_rate, ImpulseLine, ReconstructionError, ReplicaImpulse, SpectrumAnalyzer,
    SpectrumResult,
};
use sts_core::types::to_points;
use sts_core::{
    Evaluation, NoiseSource, Point, ReconstructionMethod, Signal, SignalReconstructor,
    SignalResult,
};
use tracing::{debug, info, warn};

/// Per-run settings
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    /// Add noise at the signal's SNR
    pub noise_enabled: bool,
    /// Sampling frequency in Hz
    pub sampling_frequency: f64,
    /// Reconstruction method
    pub method: ReconstructionMethod,
    /// Emit the sample markers
    pub show_samples: bool,
    /// Emit replica impulses and sampling markers
    pub show_replicas: bool,
    /// Half width of the replica window in Hz; derived from the rates when
    /// `None`
    pub spectrum_half_width: Option<f64>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            noise_enabled: false,
            sampling_frequency: 0.0,
            method: ReconstructionMethod::default(),
            show_samples: true,
            show_replicas: false,
            spectrum_half_width: None,
        }
    }
}

impl PipelineSettings {
    /// Replica window half width: the explicit value, or enough to show
    /// a couple of images on each side
    pub fn half_width(&self, maximum_frequency: f64) -> f64 {
        self.spectrum_half_width
            .unwrap_or_else(|| 2.5 * self.sampling_frequency.max(maximum_frequency))
    }
}

/// Renderer-ready curves
#[derive(Debug, Clone, Default, Serialize)]
pub struct PlotData {
    pub original: Vec<Point>,
    pub noisy: Vec<Point>,
    pub samples: Vec<Point>,
    pub reconstruction: Vec<Point>,
    pub difference: Vec<Point>,
    pub spectrum: Vec<ImpulseLine>,
    pub replicas: Vec<ImpulseLine>,
    pub sampling_markers: Vec<ImpulseLine>,
}

/// Everything one pipeline run produced
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub sampling_frequency: f64,
    pub maximum_frequency: f64,
    pub nyquist_rate: f64,
    /// Sampling below the Nyquist rate
    pub aliased: bool,
    pub method: ReconstructionMethod,
    pub evaluation: Evaluation,
    pub reconstruction: Vec<f64>,
    pub error: ReconstructionError,
    pub spectrum: SpectrumResult,
    pub replicas: Vec<ReplicaImpulse>,
    pub plot: PlotData,
}

/// Runs signals through evaluate → sample → reconstruct → compare → spectrum
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    analyzer: SpectrumAnalyzer,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom spectrum analyzer
    pub fn with_analyzer(mut self, analyzer: SpectrumAnalyzer) -> Self {
        self.analyzer = analyzer;
        self
    }

    pub fn analyzer(&self) -> &SpectrumAnalyzer {
        &self.analyzer
    }

    /// Run one pass over the signal's display grid.
    ///
    /// Returns `Ok(None)` when the signal has nothing to show. Fails when
    /// the chosen method does not have enough samples.
    pub fn run<N: NoiseSource>(
        &self,
        signal: &Signal,
        settings: &PipelineSettings,
        noise: N,
    ) -> SignalResult<Option<PipelineOutput>> {
        if signal.is_empty() {
            debug!("Signal is empty; skipping pipeline");
            return Ok(None);
        }

        let fs = settings.sampling_frequency;
        let grid = signal.domain().grid();
        let Some(evaluation) = signal.evaluate(&grid, settings.noise_enabled, fs, noise) else {
            return Ok(None);
        };

        let maximum_frequency = signal.maximum_frequency();
        let aliased = is_aliased(maximum_frequency, fs);
        if aliased {
            warn!(
                sampling_frequency = fs,
                nyquist_rate = nyquist_rate(maximum_frequency),
                "Sampling below the Nyquist rate; expect aliasing"
            );
        }

        let samples = &evaluation.samples;
        let reconstructor = SignalReconstructor::new(&samples.values, &samples.times, &grid)?
            .with_sampling_rate(fs);
        let reconstruction = reconstructor.reconstruct(settings.method)?;
        let error = ReconstructionError::compute(&evaluation.clean, &reconstruction);
        debug!(
            method = settings.method.tag(),
            samples = samples.len(),
            mse = error.mse,
            "Reconstructed signal"
        );

        let noisy = evaluation.noisy();
        let grid_spacing = match grid.as_slice() {
            [first, second, ..] => second - first,
            _ => 0.0,
        };
        let spectrum = self.analyzer.compute(&noisy, grid_spacing);

        let half_width = settings.half_width(maximum_frequency);
        let replicas = if settings.show_replicas {
            self.analyzer
                .compute_replica_impulses(&spectrum, fs, half_width)
        } else {
            Vec::new()
        };
        let sampling_markers = if settings.show_replicas {
            let height = spectrum.find_peak().map(|(_, m)| m).unwrap_or(0.0);
            SpectrumAnalyzer::sampling_markers(fs, half_width, height)
        } else {
            Vec::new()
        };

        let plot = PlotData {
            original: evaluation.clean_points(),
            noisy: to_points(&grid, &noisy),
            samples: if settings.show_samples {
                samples.points()
            } else {
                Vec::new()
            },
            reconstruction: to_points(&grid, &reconstruction),
            difference: to_points(&grid, &error.difference),
            spectrum: spectrum.impulse_lines(),
            replicas: replicas.iter().map(ReplicaImpulse::line).collect(),
            sampling_markers,
        };

        info!(
            fs,
            maximum_frequency,
            aliased,
            method = settings.method.tag(),
            "Pipeline complete"
        );

        Ok(Some(PipelineOutput {
            sampling_frequency: fs,
            maximum_frequency,
            nyquist_rate: nyquist_rate(maximum_frequency),
            aliased,
            method: settings.method,
            evaluation,
            reconstruction,
            error,
            spectrum,
            replicas,
            plot,
        }))
    }
}
