//! Spectral Peak Detection
//!
//! Find the spectral lines of a magnitude spectrum. A bin is a peak when it
//! is a strict local maximum and lies within `threshold_db` of the
//! strongest bin.

use crate::analysis::spectrum::SpectrumResult;
use serde::Serialize;

/// A detected spectral peak
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SpectralPeak {
    /// Frequency in Hz
    pub frequency: f64,
    /// Normalized magnitude
    pub magnitude: f64,
    /// Bin index in spectrum
    pub bin_index: usize,
    /// Level relative to the strongest bin in dB (0 for the strongest)
    pub relative_db: f64,
}

/// Peak detection configuration
#[derive(Debug, Clone)]
pub struct PeakFinder {
    /// How far below the strongest bin a peak may be, in dB
    threshold_db: f64,
    /// Maximum number of peaks to find
    max_peaks: usize,
    /// Minimum distance between peaks in bins
    min_distance: usize,
    /// Bins below this absolute magnitude are never peaks
    floor: f64,
}

impl Default for PeakFinder {
    fn default() -> Self {
        Self {
            threshold_db: 26.0,
            max_peaks: 64,
            min_distance: 1,
            floor: 1e-9,
        }
    }
}

impl PeakFinder {
    /// Create a new peak finder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the threshold below the strongest bin
    pub fn with_threshold(mut self, threshold_db: f64) -> Self {
        self.threshold_db = threshold_db;
        self
    }

    /// Set the maximum number of peaks to find
    pub fn with_max_peaks(mut self, max_peaks: usize) -> Self {
        self.max_peaks = max_peaks;
        self
    }

    /// Set minimum distance between peaks
    pub fn with_min_distance(mut self, min_distance: usize) -> Self {
        self.min_distance = min_distance;
        self
    }

    /// Find peaks in a spectrum result
    pub fn find_peaks(&self, spectrum: &SpectrumResult) -> Vec<SpectralPeak> {
        self.find_peaks_in_magnitude(&spectrum.magnitude, &spectrum.frequencies)
    }

    /// Find peaks in a raw magnitude spectrum
    pub fn find_peaks_in_magnitude(&self, magnitude: &[f64], frequencies: &[f64]) -> Vec<SpectralPeak> {
        let n = magnitude.len().min(frequencies.len());
        if n < 3 {
            return Vec::new();
        }

        let strongest = magnitude[..n].iter().cloned().fold(0.0_f64, f64::max);
        if strongest <= self.floor {
            return Vec::new();
        }
        let threshold = (strongest * 10.0_f64.powf(-self.threshold_db / 20.0)).max(self.floor);

        // Find all local maxima above threshold
        let mut candidates: Vec<(usize, f64)> = (1..n - 1)
            .filter(|&i| {
                let m = magnitude[i];
                m >= threshold && m > magnitude[i - 1] && m > magnitude[i + 1]
            })
            .map(|i| (i, magnitude[i]))
            .collect();

        // Strongest first
        candidates.sort_by(|a, b| b.1.total_cmp(&a.1));

        let mut peaks: Vec<SpectralPeak> = Vec::new();
        for (idx, mag) in candidates {
            if peaks.len() >= self.max_peaks {
                break;
            }
            let too_close = peaks
                .iter()
                .any(|p| p.bin_index.abs_diff(idx) < self.min_distance);
            if too_close {
                continue;
            }
            peaks.push(SpectralPeak {
                frequency: frequencies[idx],
                magnitude: mag,
                bin_index: idx,
                relative_db: 20.0 * (mag / strongest).log10(),
            });
        }

        // Sort by frequency for consistent output
        peaks.sort_by(|a, b| a.frequency.total_cmp(&b.frequency));
        peaks
    }

    /// Highest positive frequency among the peaks, 0 if there are none
    pub fn highest_frequency(&self, spectrum: &SpectrumResult) -> f64 {
        self.find_peaks(spectrum)
            .iter()
            .map(|p| p.frequency)
            .filter(|&f| f > 0.0)
            .fold(0.0, f64::max)
    }

    /// Format peaks as text table
    pub fn format_text(peaks: &[SpectralPeak]) -> String {
        let mut output = String::new();
        output.push_str("Spectral Peaks\n");
        output.push_str(&"═".repeat(56));
        output.push('\n');
        output.push_str(&format!(
            "{:>4}  {:>14}  {:>12}  {:>14}\n",
            "#", "Frequency (Hz)", "Magnitude", "Relative (dB)"
        ));
        output.push_str(&"─".repeat(56));
        output.push('\n');

        for (i, peak) in peaks.iter().enumerate() {
            output.push_str(&format!(
                "{:>4}  {:>14.3}  {:>12.5}  {:>14.2}\n",
                i + 1,
                peak.frequency,
                peak.magnitude,
                peak.relative_db
            ));
        }

        if peaks.is_empty() {
            output.push_str("  No peaks found above threshold\n");
        }

        output
    }

    /// Format peaks as CSV
    pub fn format_csv(peaks: &[SpectralPeak]) -> String {
        let mut output = String::from("frequency_hz,magnitude,bin_index,relative_db\n");
        for peak in peaks {
            output.push_str(&format!(
                "{},{},{},{}\n",
                peak.frequency, peak.magnitude, peak.bin_index, peak.relative_db
            ));
        }
        output
    }
}
