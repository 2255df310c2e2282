//! FFT Utilities
//!
//! Thin wrapper around `rustfft` for the real-valued signals used by the
//! spectrum analyzer and the Fourier-series reconstruction.
//!
//! ## Bin layout
//!
//! Raw FFT output is in "FFT-native" order: DC first, then positive
//! frequencies, then negative frequencies. Everything handed to a renderer
//! is shifted so that bins ascend from the most negative frequency to the
//! most positive one:
//!
//! ```text
//! native:  [ 0, +1, +2, -2, -1 ]      (n = 5)
//! shifted: [ -2, -1, 0, +1, +2 ]
//! ```

use num_complex::Complex64;
use rustfft::{Fft, FftPlanner};
use std::fmt;
use std::sync::Arc;

/// FFT processor for a fixed transform size
pub struct FftProcessor {
    /// FFT size
    size: usize,
    /// Forward FFT instance
    fft_forward: Arc<dyn Fft<f64>>,
    /// Inverse FFT instance
    fft_inverse: Arc<dyn Fft<f64>>,
    /// Scratch buffer shared by both directions
    scratch: Vec<Complex64>,
}

impl fmt::Debug for FftProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FftProcessor")
            .field("size", &self.size)
            .finish()
    }
}

impl FftProcessor {
    /// Create a new FFT processor for the given size
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft_forward = planner.plan_fft_forward(size);
        let fft_inverse = planner.plan_fft_inverse(size);
        let scratch_len = fft_forward
            .get_inplace_scratch_len()
            .max(fft_inverse.get_inplace_scratch_len());
        let scratch = vec![Complex64::new(0.0, 0.0); scratch_len];

        Self {
            size,
            fft_forward,
            fft_inverse,
            scratch,
        }
    }

    /// Get the FFT size
    pub fn size(&self) -> usize {
        self.size
    }

    /// Compute the forward FFT in-place
    pub fn fft_inplace(&mut self, buffer: &mut [Complex64]) {
        assert_eq!(buffer.len(), self.size);
        self.fft_forward.process_with_scratch(buffer, &mut self.scratch);
    }

    /// Forward FFT of a real signal, zero-padded or truncated to `size`
    pub fn fft_real(&mut self, input: &[f64]) -> Vec<Complex64> {
        let mut buffer: Vec<Complex64> = input
            .iter()
            .take(self.size)
            .map(|&x| Complex64::new(x, 0.0))
            .collect();
        buffer.resize(self.size, Complex64::new(0.0, 0.0));
        self.fft_inplace(&mut buffer);
        buffer
    }

    /// Compute the inverse FFT in-place, normalized by `1/N`
    pub fn ifft_inplace(&mut self, buffer: &mut [Complex64]) {
        assert_eq!(buffer.len(), self.size);
        self.fft_inverse.process_with_scratch(buffer, &mut self.scratch);

        let scale = 1.0 / self.size as f64;
        for sample in buffer.iter_mut() {
            *sample *= scale;
        }
    }

    /// Compute the inverse FFT, returning a new buffer
    pub fn ifft(&mut self, input: &[Complex64]) -> Vec<Complex64> {
        let mut buffer = input.to_vec();
        buffer.resize(self.size, Complex64::new(0.0, 0.0));
        self.ifft_inplace(&mut buffer);
        buffer
    }

    /// Magnitude of each bin
    pub fn magnitude_spectrum(spectrum: &[Complex64]) -> Vec<f64> {
        spectrum.iter().map(|c| c.norm()).collect()
    }

    /// Bin center frequencies in FFT-native order (same as numpy's `fftfreq`)
    pub fn fft_frequencies(size: usize, sample_spacing: f64) -> Vec<f64> {
        if size == 0 {
            return Vec::new();
        }
        let resolution = 1.0 / (size as f64 * sample_spacing);
        let positive_end = (size - 1) / 2;
        (0..size)
            .map(|i| {
                let idx = if i <= positive_end {
                    i as f64
                } else {
                    i as f64 - size as f64
                };
                idx * resolution
            })
            .collect()
    }

    /// Move the zero-frequency bin to the center of the spectrum
    ///
    /// Matches numpy's `fftshift` for both even and odd lengths, so shifting
    /// the output of [`FftProcessor::fft_frequencies`] yields ascending bins.
    pub fn fft_shift<T: Clone>(spectrum: &[T]) -> Vec<T> {
        let n = spectrum.len();
        let split = (n + 1) / 2;
        let mut shifted = Vec::with_capacity(n);
        shifted.extend_from_slice(&spectrum[split..]);
        shifted.extend_from_slice(&spectrum[..split]);
        shifted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_fft_ifft_roundtrip() {
        let input: Vec<f64> = (0..16).map(|i| (i as f64 * 0.3).sin()).collect();
        let mut fft = FftProcessor::new(input.len());
        let spectrum = fft.fft_real(&input);
        let back = fft.ifft(&spectrum);

        for (a, b) in input.iter().zip(back.iter()) {
            assert!((a - b.re).abs() < 1e-12);
            assert!(b.im.abs() < 1e-12);
        }
    }

    #[test]
    fn test_single_tone_bin() {
        let n = 64;
        let input: Vec<f64> = (0..n)
            .map(|i| (2.0 * PI * 4.0 * i as f64 / n as f64).cos())
            .collect();
        let mut fft = FftProcessor::new(n);
        let mags = FftProcessor::magnitude_spectrum(&fft.fft_real(&input));

        assert!((mags[4] - n as f64 / 2.0).abs() < 1e-9);
        assert!((mags[n - 4] - n as f64 / 2.0).abs() < 1e-9);
        assert!(mags[5] < 1e-9);
    }

    #[test]
    fn test_frequencies_and_shift() {
        let freqs = FftProcessor::fft_frequencies(5, 1.0);
        assert_eq!(freqs, vec![0.0, 0.2, 0.4, -0.4, -0.2]);
        let shifted = FftProcessor::fft_shift(&freqs);
        assert_eq!(shifted, vec![-0.4, -0.2, 0.0, 0.2, 0.4]);

        let freqs = FftProcessor::fft_frequencies(4, 0.5);
        assert_eq!(freqs, vec![0.0, 0.5, -1.0, -0.5]);
        let shifted = FftProcessor::fft_shift(&freqs);
        assert_eq!(shifted, vec![-1.0, -0.5, 0.0, 0.5]);
    }
}
