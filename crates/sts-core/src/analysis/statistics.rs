//! Signal Statistics
//!
//! Power statistics for real signals and error metrics that compare an
//! original signal with its reconstruction.

use crate::noise::mean_power;
use serde::Serialize;

/// Floor used when converting powers to dB
const POWER_FLOOR: f64 = 1e-20;

fn power_db(power: f64) -> f64 {
    if power > POWER_FLOOR {
        10.0 * power.log10()
    } else {
        -200.0
    }
}

/// Basic statistics of a real signal
#[derive(Debug, Clone, Serialize)]
pub struct SignalStats {
    /// Number of samples analyzed
    pub num_samples: usize,
    /// Mean value
    pub dc_offset: f64,
    /// Mean square value
    pub mean_power: f64,
    /// Mean power in dB
    pub mean_power_db: f64,
    /// RMS amplitude
    pub rms_amplitude: f64,
    /// Largest absolute value
    pub peak_amplitude: f64,
    /// Peak-to-Average Power Ratio in dB
    pub papr_db: f64,
    /// Smallest value
    pub min: f64,
    /// Largest value
    pub max: f64,
}

impl SignalStats {
    /// Compute statistics for the given samples
    pub fn compute(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self::empty();
        }

        let n = samples.len() as f64;
        let dc_offset = samples.iter().sum::<f64>() / n;
        let mean_power = mean_power(samples);
        let peak_amplitude = samples.iter().map(|v| v.abs()).fold(0.0, f64::max);
        let min = samples.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        let papr_db = if mean_power > POWER_FLOOR {
            power_db(peak_amplitude * peak_amplitude) - power_db(mean_power)
        } else {
            0.0
        };

        Self {
            num_samples: samples.len(),
            dc_offset,
            mean_power,
            mean_power_db: power_db(mean_power),
            rms_amplitude: mean_power.sqrt(),
            peak_amplitude,
            papr_db,
            min,
            max,
        }
    }

    fn empty() -> Self {
        Self {
            num_samples: 0,
            dc_offset: 0.0,
            mean_power: 0.0,
            mean_power_db: -200.0,
            rms_amplitude: 0.0,
            peak_amplitude: 0.0,
            papr_db: 0.0,
            min: 0.0,
            max: 0.0,
        }
    }

    /// Format statistics as text
    pub fn to_text(&self) -> String {
        let mut output = String::new();
        output.push_str("Signal Statistics\n");
        output.push_str(&"═".repeat(40));
        output.push('\n');
        output.push_str(&format!("Samples:           {}\n", self.num_samples));
        output.push_str(&format!("DC Offset:         {:.6}\n", self.dc_offset));
        output.push_str(&format!("Mean Power:        {:.6} ({:.2} dB)\n", self.mean_power, self.mean_power_db));
        output.push_str(&format!("RMS Amplitude:     {:.6}\n", self.rms_amplitude));
        output.push_str(&format!("Peak Amplitude:    {:.6}\n", self.peak_amplitude));
        output.push_str(&format!("PAPR:              {:.2} dB\n", self.papr_db));
        output.push_str(&format!("Range:             [{:.6}, {:.6}]\n", self.min, self.max));
        output
    }
}

/// Measured SNR in dB of `clean` against an additive `noise` realization.
///
/// Returns `None` when the noise has no power (the ratio is unbounded).
pub fn measured_snr_db(clean: &[f64], noise: &[f64]) -> Option<f64> {
    let noise_power = mean_power(noise);
    if noise_power <= POWER_FLOOR {
        return None;
    }
    Some(10.0 * (mean_power(clean) / noise_power).log10())
}

/// How far a reconstruction is from the original
#[derive(Debug, Clone, Serialize)]
pub struct ReconstructionError {
    /// `original - reconstructed` at every compared point
    pub difference: Vec<f64>,
    /// Mean squared error
    pub mse: f64,
    /// Root mean squared error
    pub rmse: f64,
    /// Largest absolute difference
    pub max_abs_error: f64,
    /// Power of the original over power of the error, in dB. `None` for a
    /// perfect reconstruction.
    pub snr_db: Option<f64>,
}

impl ReconstructionError {
    /// Compare two curves point by point.
    ///
    /// If the lengths differ only the common prefix is compared.
    pub fn compute(original: &[f64], reconstructed: &[f64]) -> Self {
        let n = original.len().min(reconstructed.len());
        let difference: Vec<f64> = original[..n]
            .iter()
            .zip(&reconstructed[..n])
            .map(|(o, r)| o - r)
            .collect();

        let mse = mean_power(&difference);
        let max_abs_error = difference.iter().map(|d| d.abs()).fold(0.0, f64::max);
        let snr_db = measured_snr_db(&original[..n], &difference);

        Self {
            difference,
            mse,
            rmse: mse.sqrt(),
            max_abs_error,
            snr_db,
        }
    }

    /// Format the metrics as text
    pub fn to_text(&self) -> String {
        let mut output = String::new();
        output.push_str("Reconstruction Error\n");
        output.push_str(&"═".repeat(40));
        output.push('\n');
        output.push_str(&format!("Points:            {}\n", self.difference.len()));
        output.push_str(&format!("MSE:               {:.6e}\n", self.mse));
        output.push_str(&format!("RMSE:              {:.6e}\n", self.rmse));
        output.push_str(&format!("Max |error|:       {:.6e}\n", self.max_abs_error));
        match self.snr_db {
            Some(snr) => output.push_str(&format!("Reconstruction SNR: {:.2} dB\n", snr)),
            None => output.push_str("Reconstruction SNR: exact\n"),
        }
        output
    }
}
