//! Signal Reconstruction
//!
//! Rebuild a continuous-time estimate of a signal from its samples.
//!
//! ## Methods
//!
//! | Method            | Idea                                   | Cost     |
//! |-------------------|----------------------------------------|----------|
//! | Zero-order hold   | hold the last sample                   | O(M log N) |
//! | Linear            | straight lines between samples         | O(M log N) |
//! | Nearest neighbor  | closest sample                         | O(M log N) |
//! | Cubic spline      | natural cubic spline                   | O(N + M log N) |
//! | Sinc              | Whittaker–Shannon sum over all samples | O(N · M) |
//! | Fourier series    | FFT → IFFT → resample                  | O(N log N + M log N) |
//!
//! `N` is the number of samples and `M` the number of output points. Sinc
//! interpolation is the only quadratic path; a few thousand samples onto a
//! 10 000 point grid is tens of millions of `sin` calls.
//!
//! ```text
//!   s[n] ──▶ x(t) = Σ s[n] · sinc((t − tₙ) / Tₛ)
//!
//!   sinc(u) = sin(πu) / (πu),  sinc(0) = 1
//! ```
//!
//! The Fourier-series method treats the sample window as exactly one period
//! of a periodic signal. No windowing or detrending is applied, so a signal
//! that does not repeat seamlessly across the window shows artifacts at the
//! edges. That is the expected behavior of the method. The N periodic
//! values are spread evenly over the whole target grid.
//!
//! The cubic spline uses natural end conditions (zero curvature at both
//! ends), not not-a-knot, so fits through three or four samples differ
//! from a not-a-knot spline near the ends.

use crate::fft_utils::FftProcessor;
use crate::resample::{interp, interp_extrapolate, segment_index};
use crate::types::{arange, linspace, SignalError, SignalResult};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Arguments closer to zero than this evaluate sinc as exactly 1
pub const SINC_ZERO_THRESHOLD: f64 = 1e-10;

/// Normalized sinc, `sin(πu)/(πu)` with `sinc(0) = 1`
#[inline]
pub fn sinc(u: f64) -> f64 {
    if u.abs() < SINC_ZERO_THRESHOLD {
        1.0
    } else {
        let x = PI * u;
        x.sin() / x
    }
}

/// Reconstruction algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconstructionMethod {
    ZeroOrderHold,
    Linear,
    NearestNeighbor,
    CubicSpline,
    /// Ideal bandlimited (Whittaker–Shannon) interpolation
    #[default]
    Sinc,
    FourierSeries,
}

impl ReconstructionMethod {
    /// Every method, in menu order
    pub const ALL: [ReconstructionMethod; 6] = [
        ReconstructionMethod::ZeroOrderHold,
        ReconstructionMethod::Linear,
        ReconstructionMethod::NearestNeighbor,
        ReconstructionMethod::CubicSpline,
        ReconstructionMethod::Sinc,
        ReconstructionMethod::FourierSeries,
    ];

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            ReconstructionMethod::ZeroOrderHold => "Zero-order hold",
            ReconstructionMethod::Linear => "Linear interpolation",
            ReconstructionMethod::NearestNeighbor => "Nearest neighbor interpolation",
            ReconstructionMethod::CubicSpline => "Cubic spline interpolation",
            ReconstructionMethod::Sinc => "Sinc interpolation",
            ReconstructionMethod::FourierSeries => "Fourier series interpolation",
        }
    }

    /// Short tag used on the command line and in scenario files
    pub fn tag(&self) -> &'static str {
        match self {
            ReconstructionMethod::ZeroOrderHold => "zoh",
            ReconstructionMethod::Linear => "linear",
            ReconstructionMethod::NearestNeighbor => "nearest",
            ReconstructionMethod::CubicSpline => "spline",
            ReconstructionMethod::Sinc => "sinc",
            ReconstructionMethod::FourierSeries => "fourier",
        }
    }

    /// Fewest samples the method can work with
    pub fn minimum_samples(&self) -> usize {
        match self {
            ReconstructionMethod::Linear | ReconstructionMethod::CubicSpline => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for ReconstructionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReconstructionMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "zoh" | "zero_order_hold" | "hold" => Ok(ReconstructionMethod::ZeroOrderHold),
            "linear" | "lerp" => Ok(ReconstructionMethod::Linear),
            "nearest" | "nearest_neighbor" | "nn" => Ok(ReconstructionMethod::NearestNeighbor),
            "spline" | "cubic" | "cubic_spline" => Ok(ReconstructionMethod::CubicSpline),
            "sinc" | "nyquist" | "whittaker_shannon" => Ok(ReconstructionMethod::Sinc),
            "fourier" | "fourier_series" | "fft" => Ok(ReconstructionMethod::FourierSeries),
            _ => Err(format!(
                "unknown reconstruction method '{}'; use zoh, linear, nearest, spline, sinc or fourier",
                s
            )),
        }
    }
}

/// Rebuilds a signal on a target grid from its samples.
///
/// Inputs are borrowed and never modified.
#[derive(Debug, Clone)]
pub struct SignalReconstructor<'a> {
    samples: &'a [f64],
    sample_times: Vec<f64>,
    sampling_period: Option<f64>,
    target: &'a [f64],
}

impl<'a> SignalReconstructor<'a> {
    /// Reconstruct from samples taken at explicit, ascending times
    pub fn new(samples: &'a [f64], sample_times: &[f64], target: &'a [f64]) -> SignalResult<Self> {
        if samples.len() != sample_times.len() {
            return Err(SignalError::LengthMismatch {
                samples: samples.len(),
                times: sample_times.len(),
            });
        }
        let sampling_period = match sample_times {
            [first, .., last] => Some((last - first) / (sample_times.len() - 1) as f64),
            _ => None,
        };
        Ok(Self {
            samples,
            sample_times: sample_times.to_vec(),
            sampling_period,
            target,
        })
    }

    /// Reconstruct from samples taken every `1 / sampling_frequency` seconds
    /// starting at the first target time
    pub fn with_sampling_frequency(
        samples: &'a [f64],
        sampling_frequency: f64,
        target: &'a [f64],
    ) -> Self {
        let period = 1.0 / sampling_frequency;
        let start = target.first().copied().unwrap_or(0.0);
        let sample_times: Vec<f64> = (0..samples.len())
            .map(|n| start + n as f64 * period)
            .collect();
        Self {
            samples,
            sample_times,
            sampling_period: (period.is_finite() && period > 0.0).then_some(period),
            target,
        }
    }

    /// Use the known sampling rate for the sinc kernel instead of inferring
    /// it from the sample spacing. Needed when there is a single sample.
    /// Non-positive or non-finite rates are ignored.
    pub fn with_sampling_rate(mut self, sampling_frequency: f64) -> Self {
        let period = 1.0 / sampling_frequency;
        if period.is_finite() && period > 0.0 {
            self.sampling_period = Some(period);
        }
        self
    }

    /// Sample times the reconstructor works from
    pub fn sample_times(&self) -> &[f64] {
        &self.sample_times
    }

    /// Evaluate the chosen method at every target time
    pub fn reconstruct(&self, method: ReconstructionMethod) -> SignalResult<Vec<f64>> {
        let required = method.minimum_samples();
        if self.samples.len() < required {
            return Err(SignalError::InsufficientSamples {
                method: method.name(),
                required,
                actual: self.samples.len(),
            });
        }

        let output = match method {
            ReconstructionMethod::ZeroOrderHold => self.zero_order_hold(),
            ReconstructionMethod::Linear => self.linear(),
            ReconstructionMethod::NearestNeighbor => self.nearest_neighbor(),
            ReconstructionMethod::CubicSpline => self.cubic_spline(),
            ReconstructionMethod::Sinc => self.sinc_interpolation()?,
            ReconstructionMethod::FourierSeries => self.fourier_series(),
        };
        Ok(output)
    }

    fn zero_order_hold(&self) -> Vec<f64> {
        let last = self.samples.len() - 1;
        self.target
            .iter()
            .map(|&t| {
                let idx = self
                    .sample_times
                    .partition_point(|&s| s <= t)
                    .saturating_sub(1)
                    .min(last);
                self.samples[idx]
            })
            .collect()
    }

    fn linear(&self) -> Vec<f64> {
        interp_extrapolate(self.target, &self.sample_times, self.samples)
    }

    fn nearest_neighbor(&self) -> Vec<f64> {
        let times = &self.sample_times;
        let last = self.samples.len() - 1;
        self.target
            .iter()
            .map(|&t| {
                let upper = times.partition_point(|&s| s < t).min(last);
                let idx = if upper > 0 && (t - times[upper - 1]).abs() <= (times[upper] - t).abs() {
                    upper - 1
                } else {
                    upper
                };
                self.samples[idx]
            })
            .collect()
    }

    fn cubic_spline(&self) -> Vec<f64> {
        let spline = NaturalCubicSpline::fit(&self.sample_times, self.samples);
        self.target.iter().map(|&t| spline.value_at(t)).collect()
    }

    fn sinc_interpolation(&self) -> SignalResult<Vec<f64>> {
        let period = self
            .sampling_period
            .filter(|p| *p > 0.0)
            .ok_or(SignalError::InsufficientSamples {
                method: ReconstructionMethod::Sinc.name(),
                required: 2,
                actual: self.samples.len(),
            })?;

        Ok(self
            .target
            .iter()
            .map(|&t| {
                self.samples
                    .iter()
                    .zip(self.sample_times.iter())
                    .map(|(&s, &tn)| s * sinc((t - tn) / period))
                    .sum()
            })
            .collect())
    }

    fn fourier_series(&self) -> Vec<f64> {
        let n = self.samples.len();
        let mut fft = FftProcessor::new(n);
        let spectrum = fft.fft_real(self.samples);
        let periodic: Vec<f64> = fft.ifft(&spectrum).iter().map(|c| c.re).collect();
        let (Some(&first), Some(&last)) = (self.target.first(), self.target.last()) else {
            return Vec::new();
        };
        interp(self.target, &linspace(first, last, n), &periodic)
    }
}

/// Natural cubic spline (zero second derivative at both ends).
///
/// Outside the knots the first and last cubic pieces are extended.
#[derive(Debug, Clone)]
pub struct NaturalCubicSpline {
    knots: Vec<f64>,
    values: Vec<f64>,
    /// Second derivative at each knot
    curvature: Vec<f64>,
}

impl NaturalCubicSpline {
    /// Fit a spline through `(knots[i], values[i])`. Knots must be strictly
    /// ascending.
    pub fn fit(knots: &[f64], values: &[f64]) -> Self {
        let n = knots.len().min(values.len());
        let knots = knots[..n].to_vec();
        let values = values[..n].to_vec();
        let mut curvature = vec![0.0; n];

        if n > 2 {
            // Tridiagonal system for the interior second derivatives,
            // solved with the Thomas algorithm.
            let h: Vec<f64> = knots.windows(2).map(|w| w[1] - w[0]).collect();
            let m = n - 2;
            let mut diag = vec![0.0; m];
            let mut upper = vec![0.0; m];
            let mut rhs = vec![0.0; m];

            for j in 0..m {
                let i = j + 1;
                diag[j] = 2.0 * (h[i - 1] + h[i]);
                upper[j] = h[i];
                rhs[j] = 6.0
                    * ((values[i + 1] - values[i]) / h[i] - (values[i] - values[i - 1]) / h[i - 1]);
            }

            for j in 1..m {
                let lower = h[j];
                let w = lower / diag[j - 1];
                diag[j] -= w * upper[j - 1];
                rhs[j] -= w * rhs[j - 1];
            }

            curvature[m] = rhs[m - 1] / diag[m - 1];
            for j in (0..m - 1).rev() {
                curvature[j + 1] = (rhs[j] - upper[j] * curvature[j + 2]) / diag[j];
            }
        }

        Self {
            knots,
            values,
            curvature,
        }
    }

    /// Evaluate the spline at `t`
    pub fn value_at(&self, t: f64) -> f64 {
        let n = self.knots.len();
        match n {
            0 => 0.0,
            1 => self.values[0],
            _ => {
                let i = segment_index(&self.knots, t);
                let (x0, x1) = (self.knots[i], self.knots[i + 1]);
                let (y0, y1) = (self.values[i], self.values[i + 1]);
                let (m0, m1) = (self.curvature[i], self.curvature[i + 1]);
                let h = x1 - x0;
                let a = x1 - t;
                let b = t - x0;

                m0 * a * a * a / (6.0 * h)
                    + m1 * b * b * b / (6.0 * h)
                    + (y0 / h - m0 * h / 6.0) * a
                    + (y1 / h - m1 * h / 6.0) * b
            }
        }
    }
}

/// Uniform sample times `start, start + 1/fs, ...` strictly below `stop`
pub fn sample_times(start: f64, stop: f64, sampling_frequency: f64) -> Vec<f64> {
    if !(sampling_frequency > 0.0) || !sampling_frequency.is_finite() {
        return Vec::new();
    }
    arange(start, stop, 1.0 / sampling_frequency)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f64, times: &[f64]) -> Vec<f64> {
        times.iter().map(|&t| (2.0 * PI * freq * t).sin()).collect()
    }

    #[test]
    fn test_sinc_values() {
        assert_eq!(sinc(0.0), 1.0);
        assert_eq!(sinc(1e-12), 1.0);
        assert!(sinc(1.0).abs() < 1e-15);
        assert!((sinc(0.5) - 2.0 / PI).abs() < 1e-12);
        assert!(!sinc(1e-9).is_nan());
    }

    #[test]
    fn test_method_parsing() {
        for method in ReconstructionMethod::ALL {
            assert_eq!(method.tag().parse::<ReconstructionMethod>().unwrap(), method);
        }
        assert_eq!(
            "Zero-Order-Hold".parse::<ReconstructionMethod>().unwrap(),
            ReconstructionMethod::ZeroOrderHold
        );
        assert!("lagrange".parse::<ReconstructionMethod>().is_err());
    }

    #[test]
    fn test_constant_signal_hold_and_nearest() {
        let times = sample_times(0.0, 1.0, 10.0);
        let samples = vec![0.7; times.len()];
        let target = linspace(-0.5, 1.5, 101);
        let rec = SignalReconstructor::new(&samples, &times, &target).unwrap();

        for method in [ReconstructionMethod::ZeroOrderHold, ReconstructionMethod::NearestNeighbor] {
            let out = rec.reconstruct(method).unwrap();
            assert_eq!(out.len(), target.len());
            assert!(out.iter().all(|&v| v == 0.7), "{} not constant", method);
        }
    }

    #[test]
    fn test_single_sample_is_constant() {
        let samples = [3.0];
        let times = [0.5];
        let target = linspace(0.0, 1.0, 11);
        let rec = SignalReconstructor::new(&samples, &times, &target).unwrap();

        assert!(rec
            .reconstruct(ReconstructionMethod::ZeroOrderHold)
            .unwrap()
            .iter()
            .all(|&v| v == 3.0));
        assert!(rec
            .reconstruct(ReconstructionMethod::NearestNeighbor)
            .unwrap()
            .iter()
            .all(|&v| v == 3.0));
    }

    #[test]
    fn test_insufficient_samples() {
        let samples = [1.0];
        let times = [0.0];
        let target = [0.0, 0.5];
        let rec = SignalReconstructor::new(&samples, &times, &target).unwrap();

        for method in [ReconstructionMethod::CubicSpline, ReconstructionMethod::Linear] {
            let err = rec.reconstruct(method).unwrap_err();
            assert!(matches!(
                err,
                SignalError::InsufficientSamples { required: 2, actual: 1, .. }
            ));
        }

        let empty: [f64; 0] = [];
        let rec = SignalReconstructor::new(&empty, &empty, &target).unwrap();
        for method in ReconstructionMethod::ALL {
            assert!(rec.reconstruct(method).is_err());
        }
    }

    #[test]
    fn test_length_mismatch() {
        let err = SignalReconstructor::new(&[1.0, 2.0], &[0.0], &[0.0]).unwrap_err();
        assert!(matches!(err, SignalError::LengthMismatch { samples: 2, times: 1 }));
    }

    #[test]
    fn test_zero_order_hold_steps() {
        let samples = [1.0, 2.0, 3.0];
        let times = [0.0, 1.0, 2.0];
        let target = [-1.0, 0.0, 0.5, 1.0, 1.99, 2.0, 5.0];
        let rec = SignalReconstructor::new(&samples, &times, &target).unwrap();
        let out = rec.reconstruct(ReconstructionMethod::ZeroOrderHold).unwrap();

        // Before the first sample clamps; at a sample time that sample holds
        assert_eq!(out, vec![1.0, 1.0, 1.0, 2.0, 2.0, 3.0, 3.0]);
    }

    #[test]
    fn test_nearest_neighbor_ties_pick_lower_index() {
        let samples = [1.0, 2.0, 3.0];
        let times = [0.0, 1.0, 2.0];
        let target = [0.5, 0.6, 1.5, -3.0, 9.0];
        let rec = SignalReconstructor::new(&samples, &times, &target).unwrap();
        let out = rec.reconstruct(ReconstructionMethod::NearestNeighbor).unwrap();
        assert_eq!(out, vec![1.0, 2.0, 2.0, 1.0, 3.0]);
    }

    #[test]
    fn test_linear_extrapolates() {
        let samples = [0.0, 1.0];
        let times = [0.0, 1.0];
        let target = [-1.0, 0.25, 2.0];
        let rec = SignalReconstructor::new(&samples, &times, &target).unwrap();
        let out = rec.reconstruct(ReconstructionMethod::Linear).unwrap();
        assert!((out[0] + 1.0).abs() < 1e-12);
        assert!((out[1] - 0.25).abs() < 1e-12);
        assert!((out[2] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_spline_passes_through_knots() {
        let times = sample_times(0.0, 1.0, 8.0);
        let samples = sine(1.0, &times);
        let rec = SignalReconstructor::new(&samples, &times, &times).unwrap();
        let out = rec.reconstruct(ReconstructionMethod::CubicSpline).unwrap();
        for (a, b) in out.iter().zip(samples.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_spline_reproduces_lines() {
        let times = [0.0, 0.5, 1.5, 2.0, 3.0];
        let samples: Vec<f64> = times.iter().map(|t| 2.0 * t - 1.0).collect();
        let target = linspace(-1.0, 4.0, 51);
        let rec = SignalReconstructor::new(&samples, &times, &target).unwrap();
        let out = rec.reconstruct(ReconstructionMethod::CubicSpline).unwrap();
        for (&t, &v) in target.iter().zip(out.iter()) {
            assert!((v - (2.0 * t - 1.0)).abs() < 1e-9, "t={} v={}", t, v);
        }
    }

    #[test]
    fn test_spline_tracks_smooth_signal() {
        let times = sample_times(0.0, 2.0, 40.0);
        let samples = sine(2.0, &times);
        let target = linspace(0.5, 1.5, 201);
        let rec = SignalReconstructor::new(&samples, &times, &target).unwrap();
        let out = rec.reconstruct(ReconstructionMethod::CubicSpline).unwrap();
        let expected = sine(2.0, &target);
        for (a, b) in out.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-2);
        }
    }

    #[test]
    fn test_sinc_reconstructs_bandlimited_sine() {
        // 2 Hz tone sampled at 20 Hz over 10 s
        let times = sample_times(0.0, 10.0, 20.0);
        let samples = sine(2.0, &times);
        let target = linspace(4.5, 5.5, 301);
        let rec = SignalReconstructor::new(&samples, &times, &target).unwrap();
        let out = rec.reconstruct(ReconstructionMethod::Sinc).unwrap();
        let expected = sine(2.0, &target);

        for (a, b) in out.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 2e-2, "sinc error {} too large", (a - b).abs());
        }
    }

    #[test]
    fn test_sinc_hits_samples_exactly() {
        let times = sample_times(0.0, 1.0, 10.0);
        let samples = sine(1.0, &times);
        let rec = SignalReconstructor::with_sampling_frequency(&samples, 10.0, &times);
        let out = rec.reconstruct(ReconstructionMethod::Sinc).unwrap();
        for (a, b) in out.iter().zip(samples.iter()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn test_fourier_series_on_sample_grid() {
        let times = sample_times(0.0, 1.0, 16.0);
        let samples = sine(3.0, &times);
        let rec = SignalReconstructor::new(&samples, &times, &times).unwrap();
        let out = rec.reconstruct(ReconstructionMethod::FourierSeries).unwrap();
        for (a, b) in out.iter().zip(samples.iter()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn test_fourier_series_spans_target() {
        // Four periodic values spread over 0..6, not pinned to 0..3
        let samples = [1.0, 2.0, 3.0, 4.0];
        let times = [0.0, 1.0, 2.0, 3.0];
        let target = linspace(0.0, 6.0, 7);
        let rec = SignalReconstructor::new(&samples, &times, &target).unwrap();
        let out = rec.reconstruct(ReconstructionMethod::FourierSeries).unwrap();
        let expected = [1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0];
        for (a, b) in out.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-9, "{} vs {}", a, b);
        }
    }

    #[test]
    fn test_single_sample_sinc_with_known_rate() {
        let samples = [2.0];
        let times = [0.0];
        let target = [0.0, 0.5, 1.0];
        let rec = SignalReconstructor::new(&samples, &times, &target).unwrap();
        assert!(matches!(
            rec.reconstruct(ReconstructionMethod::Sinc),
            Err(SignalError::InsufficientSamples { .. })
        ));

        let out = rec
            .with_sampling_rate(1.0)
            .reconstruct(ReconstructionMethod::Sinc)
            .unwrap();
        assert!((out[0] - 2.0).abs() < 1e-12);
        assert!((out[1] - 4.0 / PI).abs() < 1e-12);
        assert!(out[2].abs() < 1e-12);
    }

    #[test]
    fn test_every_method_fills_grid() {
        let times = sample_times(0.0, 1.0, 25.0);
        let samples = sine(3.0, &times);
        let target = linspace(0.0, 1.0, 333);
        let rec = SignalReconstructor::new(&samples, &times, &target).unwrap();
        for method in ReconstructionMethod::ALL {
            let out = rec.reconstruct(method).unwrap();
            assert_eq!(out.len(), target.len(), "{}", method);
            assert!(out.iter().all(|v| v.is_finite()), "{}", method);
        }
    }

    #[test]
    fn test_sample_times() {
        let times = sample_times(0.0, 2.0, 4.0);
        assert_eq!(times.len(), 8);
        assert_eq!(times[1], 0.25);
        assert!(sample_times(0.0, 2.0, 0.0).is_empty());
        assert!(sample_times(0.0, 2.0, f64::NAN).is_empty());
    }
}
