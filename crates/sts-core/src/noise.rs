//! Noise calibration
//!
//! Noise is specified as a target signal-to-noise ratio:
//!
//! ```text
//! SNR_dB  = 10 · log10(P_signal / P_noise)
//! P_noise = P_signal / 10^(SNR_dB / 10)
//! ```
//!
//! where `P_signal` is the mean square of the clean signal over the grid it
//! is evaluated on. Drawing the actual noise values is left to a
//! [`NoiseSource`] so callers decide how randomness is seeded; the
//! simulation crate provides Gaussian channels.

/// SNR treated as "no noise at all"
pub const MAXIMUM_SNR_DB: f64 = 100.0;

/// Mean square value of a signal, 0 for an empty slice
pub fn mean_power(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|v| v * v).sum::<f64>() / values.len() as f64
}

/// Noise power required to reach `snr_db` for a signal of power
/// `signal_power`.
///
/// Returns exactly 0 for the noiseless sentinel, for non-finite SNRs and
/// for signals with no power, so silent signals never produce NaN noise.
pub fn noise_power_for_snr(signal_power: f64, snr_db: f64) -> f64 {
    if !signal_power.is_finite() || signal_power <= 0.0 {
        return 0.0;
    }
    if !snr_db.is_finite() || snr_db >= MAXIMUM_SNR_DB {
        return 0.0;
    }
    signal_power / 10.0_f64.powf(snr_db / 10.0)
}

/// Source of zero-mean noise realizations
pub trait NoiseSource {
    /// Draw `len` values with the given variance
    fn draw(&mut self, len: usize, noise_power: f64) -> Vec<f64>;
}

impl<N: NoiseSource + ?Sized> NoiseSource for &mut N {
    fn draw(&mut self, len: usize, noise_power: f64) -> Vec<f64> {
        (**self).draw(len, noise_power)
    }
}

/// A source that never adds noise
#[derive(Debug, Clone, Copy, Default)]
pub struct Noiseless;

impl NoiseSource for Noiseless {
    fn draw(&mut self, len: usize, _noise_power: f64) -> Vec<f64> {
        vec![0.0; len]
    }
}
