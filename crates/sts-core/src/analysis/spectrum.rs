//! Spectrum Analysis
//!
//! Magnitude spectrum of a real signal and the spectral images created by
//! sampling it.
//!
//! Bins are zero-centered and ascending (`fftshift` layout), so the
//! frequency axis can be handed to a plot unchanged. Magnitudes are
//! normalized by the transform length: a sinusoid of amplitude `A` that
//! completes a whole number of periods in the window shows up as two bins
//! of height `A/2` at `±f`.
//!
//! ## Aliasing
//!
//! Sampling at `fs` replicates every spectral line `f₀` at `f₀ + k·fs` for
//! every integer `k`:
//!
//! ```text
//!  |X(f)|           original       k = 1 images
//!    ^          ┃         ┃      ╎         ╎
//!    |          ┃         ┃      ╎         ╎
//!  --+----------┸----+----┸------┸---------┸----> f
//!             -f₀    0   +f₀   fs-f₀     fs+f₀
//! ```
//!
//! When `fs < 2·f_max` the images fall inside `[-fs/2, fs/2]` and overlap the
//! baseband, which is what [`SpectrumAnalyzer::compute_replica_impulses`]
//! makes visible.

use crate::analysis::peaks::PeakFinder;
use crate::fft_utils::FftProcessor;
use crate::types::Point;
use serde::Serialize;

/// Bins quieter than this (normalized magnitude) are not drawn
pub const DEFAULT_MAGNITUDE_THRESHOLD: f64 = 1e-3;

/// A vertical spike drawn as baseline → peak → baseline
pub type ImpulseLine = [Point; 3];

/// Build the three-point line for an impulse of height `magnitude` at
/// `frequency`
pub fn impulse_line(frequency: f64, magnitude: f64) -> ImpulseLine {
    [(frequency, 0.0), (frequency, magnitude), (frequency, 0.0)]
}

/// Twice the highest frequency present
pub fn nyquist_rate(maximum_frequency: f64) -> f64 {
    2.0 * maximum_frequency.abs()
}

/// True when sampling at `sampling_frequency` loses information about a
/// signal whose highest frequency is `maximum_frequency`
pub fn is_aliased(maximum_frequency: f64, sampling_frequency: f64) -> bool {
    maximum_frequency != 0.0 && sampling_frequency < nyquist_rate(maximum_frequency)
}

/// Frequency in `[0, fs/2]` that `frequency` appears at after sampling
pub fn apparent_frequency(frequency: f64, sampling_frequency: f64) -> f64 {
    if !(sampling_frequency > 0.0) {
        return frequency.abs();
    }
    let folded = frequency.abs().rem_euclid(sampling_frequency);
    folded.min(sampling_frequency - folded)
}

/// Result of spectrum analysis
#[derive(Debug, Clone, Serialize)]
pub struct SpectrumResult {
    /// Bin frequencies in Hz, ascending and zero-centered
    pub frequencies: Vec<f64>,
    /// Normalized magnitude `|X[k]| / N` for every bin
    pub magnitude: Vec<f64>,
    /// Rate the analyzed samples were taken at
    pub sample_rate: f64,
    /// Spacing between bins in Hz
    pub freq_resolution: f64,
    /// Bins below this magnitude are dropped from [`Self::significant`]
    pub threshold: f64,
}

impl SpectrumResult {
    /// Number of bins
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    /// True for an empty spectrum
    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Bins at or above the display threshold as `(frequency, magnitude)`
    pub fn significant(&self) -> Vec<Point> {
        self.frequencies
            .iter()
            .zip(self.magnitude.iter())
            .filter(|(_, &m)| m >= self.threshold)
            .map(|(&f, &m)| (f, m))
            .collect()
    }

    /// Significant bins split into a frequency axis and magnitudes
    pub fn significant_bins(&self) -> (Vec<f64>, Vec<f64>) {
        self.significant().into_iter().unzip()
    }

    /// One impulse line per significant bin
    pub fn impulse_lines(&self) -> Vec<ImpulseLine> {
        self.significant()
            .into_iter()
            .map(|(f, m)| impulse_line(f, m))
            .collect()
    }

    /// Get the peak frequency and magnitude
    pub fn find_peak(&self) -> Option<(f64, f64)> {
        self.frequencies
            .iter()
            .zip(self.magnitude.iter())
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(&f, &m)| (f, m))
    }

    /// Format spectrum as CSV
    pub fn to_csv(&self) -> String {
        let mut output = String::from("frequency_hz,magnitude\n");
        for (freq, mag) in self.significant() {
            output.push_str(&format!("{},{}\n", freq, mag));
        }
        output
    }

    /// Format the strongest bins as a text table
    pub fn to_text(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "Spectrum ({} bins, resolution {:.4} Hz, sample rate {:.2} Hz)\n",
            self.len(),
            self.freq_resolution,
            self.sample_rate
        ));
        output.push_str(&"─".repeat(40));
        output.push('\n');
        output.push_str("  Frequency (Hz)     Magnitude\n");
        output.push_str(&"─".repeat(40));
        output.push('\n');

        let mut bins = self.significant();
        bins.sort_by(|a, b| b.1.total_cmp(&a.1));
        for (freq, mag) in bins.iter().take(20) {
            output.push_str(&format!("{:>14.3}    {:>10.5}\n", freq, mag));
        }
        if bins.is_empty() {
            output.push_str("  No bins above threshold\n");
        }
        output
    }
}

/// Image of a spectral line created by sampling
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReplicaImpulse {
    /// Where the image lands
    pub frequency: f64,
    /// Height, copied from the original line
    pub magnitude: f64,
    /// Original spectral line that was replicated
    pub source_frequency: f64,
    /// Multiple of the sampling frequency the image is shifted by
    pub order: i64,
}

impl ReplicaImpulse {
    /// Drawable spike for this image
    pub fn line(&self) -> ImpulseLine {
        impulse_line(self.frequency, self.magnitude)
    }
}

/// Spectrum analyzer for real-valued signals
#[derive(Debug, Clone)]
pub struct SpectrumAnalyzer {
    threshold: f64,
    peak_finder: PeakFinder,
}

impl Default for SpectrumAnalyzer {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_MAGNITUDE_THRESHOLD,
            peak_finder: PeakFinder::default(),
        }
    }
}

impl SpectrumAnalyzer {
    /// Create an analyzer with the default display threshold
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the display threshold
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the peak finder used to pick lines to replicate
    pub fn with_peak_finder(mut self, peak_finder: PeakFinder) -> Self {
        self.peak_finder = peak_finder;
        self
    }

    /// Display threshold
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Compute the magnitude spectrum of `samples` taken every
    /// `sampling_period` seconds
    pub fn compute(&self, samples: &[f64], sampling_period: f64) -> SpectrumResult {
        let n = samples.len();
        if n == 0 || !(sampling_period > 0.0) {
            return SpectrumResult {
                frequencies: Vec::new(),
                magnitude: Vec::new(),
                sample_rate: 0.0,
                freq_resolution: 0.0,
                threshold: self.threshold,
            };
        }

        let mut fft = FftProcessor::new(n);
        let spectrum = fft.fft_real(samples);
        let scale = 1.0 / n as f64;
        let magnitude: Vec<f64> = FftProcessor::magnitude_spectrum(&spectrum)
            .into_iter()
            .map(|m| m * scale)
            .collect();
        let frequencies = FftProcessor::fft_frequencies(n, sampling_period);

        SpectrumResult {
            frequencies: FftProcessor::fft_shift(&frequencies),
            magnitude: FftProcessor::fft_shift(&magnitude),
            sample_rate: 1.0 / sampling_period,
            freq_resolution: 1.0 / (n as f64 * sampling_period),
            threshold: self.threshold,
        }
    }

    /// Spectral images produced by sampling at `sampling_frequency`.
    ///
    /// Every peak `f₀` of `spectrum` is copied to `f₀ + k·fs` for each
    /// non-zero integer `k` that keeps the image inside
    /// `[-window_half_width, window_half_width]`. Output is sorted by
    /// frequency.
    pub fn compute_replica_impulses(
        &self,
        spectrum: &SpectrumResult,
        sampling_frequency: f64,
        window_half_width: f64,
    ) -> Vec<ReplicaImpulse> {
        if !(sampling_frequency > 0.0) || !(window_half_width > 0.0) {
            return Vec::new();
        }

        let mut replicas = Vec::new();
        for peak in self.peak_finder.find_peaks(spectrum) {
            let f0 = peak.frequency;
            let k_min = ((-window_half_width - f0) / sampling_frequency).ceil() as i64;
            let k_max = ((window_half_width - f0) / sampling_frequency).floor() as i64;
            for k in k_min..=k_max {
                if k == 0 {
                    continue;
                }
                replicas.push(ReplicaImpulse {
                    frequency: f0 + k as f64 * sampling_frequency,
                    magnitude: peak.magnitude,
                    source_frequency: f0,
                    order: k,
                });
            }
        }

        replicas.sort_by(|a, b| a.frequency.total_cmp(&b.frequency));
        replicas
    }

    /// Marker lines at every non-zero multiple of the sampling frequency
    /// inside the window, all of height `height`
    pub fn sampling_markers(
        sampling_frequency: f64,
        window_half_width: f64,
        height: f64,
    ) -> Vec<ImpulseLine> {
        if !(sampling_frequency > 0.0) || !(window_half_width > 0.0) {
            return Vec::new();
        }
        let k_max = (window_half_width / sampling_frequency).floor() as i64;
        (-k_max..=k_max)
            .filter(|&k| k != 0)
            .map(|k| impulse_line(k as f64 * sampling_frequency, height))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn tone(freq: f64, amplitude: f64, rate: f64, n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| amplitude * (2.0 * PI * freq * i as f64 / rate).sin())
            .collect()
    }

    #[test]
    fn test_spectrum_single_tone() {
        let rate = 1000.0;
        let samples = tone(5.0, 2.0, rate, 1000);

        let analyzer = SpectrumAnalyzer::new();
        let result = analyzer.compute(&samples, 1.0 / rate);

        assert_eq!(result.len(), 1000);
        assert!((result.freq_resolution - 1.0).abs() < 1e-12);

        let (freqs, mags) = result.significant_bins();
        assert_eq!(freqs.len(), 2, "only ±5 Hz should remain: {:?}", freqs);
        assert!((freqs[0] + 5.0).abs() < 1e-9);
        assert!((freqs[1] - 5.0).abs() < 1e-9);
        for m in mags {
            assert!((m - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_bins_are_ascending() {
        let samples = tone(3.0, 1.0, 64.0, 63);
        let result = SpectrumAnalyzer::new().compute(&samples, 1.0 / 64.0);
        assert!(result.frequencies.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_empty_input() {
        let result = SpectrumAnalyzer::new().compute(&[], 0.01);
        assert!(result.is_empty());
        assert!(result.find_peak().is_none());
    }

    #[test]
    fn test_impulse_lines() {
        let line = impulse_line(4.0, 0.5);
        assert_eq!(line, [(4.0, 0.0), (4.0, 0.5), (4.0, 0.0)]);

        let samples = tone(10.0, 1.0, 100.0, 100);
        let result = SpectrumAnalyzer::new().compute(&samples, 0.01);
        let lines = result.impulse_lines();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l[0].1 == 0.0 && l[2].1 == 0.0));
    }

    #[test]
    fn test_replicas_below_nyquist() {
        // 5 Hz tone sampled at 4 Hz
        let rate = 1000.0;
        let samples = tone(5.0, 1.0, rate, 1000);
        let analyzer = SpectrumAnalyzer::new();
        let spectrum = analyzer.compute(&samples, 1.0 / rate);

        let replicas = analyzer.compute_replica_impulses(&spectrum, 4.0, 15.0);
        let freqs: Vec<f64> = replicas.iter().map(|r| r.frequency).collect();

        let has = |f: f64| freqs.iter().any(|&x| (x - f).abs() < 1e-9);
        for f in [9.0, 1.0, -9.0, -1.0, 13.0, 3.0, -13.0, -3.0] {
            assert!(has(f), "missing image at {} Hz in {:?}", f, freqs);
        }
        // Images never land on the true component
        assert!(!has(5.0));
        assert!(!has(-5.0));
        assert!(freqs.iter().all(|f| f.abs() <= 15.0 + 1e-9));
        assert!(replicas.iter().all(|r| r.order != 0));
    }

    #[test]
    fn test_replica_window_bounds() {
        let rate = 1000.0;
        let samples = tone(5.0, 1.0, rate, 1000);
        let analyzer = SpectrumAnalyzer::new();
        let spectrum = analyzer.compute(&samples, 1.0 / rate);

        assert!(analyzer.compute_replica_impulses(&spectrum, 0.0, 10.0).is_empty());
        // fs = 100 Hz, window 20 Hz: no image fits
        assert!(analyzer
            .compute_replica_impulses(&spectrum, 100.0, 20.0)
            .is_empty());
    }

    #[test]
    fn test_sampling_markers() {
        let markers = SpectrumAnalyzer::sampling_markers(4.0, 10.0, 1.0);
        let freqs: Vec<f64> = markers.iter().map(|l| l[1].0).collect();
        assert_eq!(freqs, vec![-8.0, -4.0, 4.0, 8.0]);
    }

    #[test]
    fn test_aliasing_helpers() {
        assert_eq!(nyquist_rate(5.0), 10.0);
        assert!(is_aliased(5.0, 4.0));
        assert!(!is_aliased(5.0, 10.0));
        assert!(!is_aliased(0.0, 1.0));

        assert!((apparent_frequency(5.0, 4.0) - 1.0).abs() < 1e-12);
        assert!((apparent_frequency(7.0, 10.0) - 3.0).abs() < 1e-12);
        assert!((apparent_frequency(3.0, 10.0) - 3.0).abs() < 1e-12);
    }
}
