//! Noise Channels
//!
//! Gaussian noise sources for signal evaluation. A channel implements the
//! core [`NoiseSource`] trait, so it plugs straight into
//! [`Signal::evaluate`](sts_core::Signal::evaluate).
//!
//! ## Models
//!
//! | Model        | Behavior                                                  |
//! |--------------|-----------------------------------------------------------|
//! | `Ideal`      | never adds noise                                          |
//! | `Awgn`       | fresh white Gaussian noise on every draw                  |
//! | `FrozenAwgn` | one unit-variance realization, rescaled on every draw     |
//!
//! With `FrozenAwgn`, moving the SNR slider changes how loud the noise is
//! but not its shape, so plots do not flicker between redraws.
//!
//! ## Usage
//!
//! ```rust
//! use sts_core::NoiseSource;
//! use sts_sim::channel::{Channel, ChannelConfig, ChannelModel};
//!
//! let config = ChannelConfig {
//!     model: ChannelModel::Awgn,
//!     seed: Some(7),
//! };
//! let mut channel = Channel::new(config);
//! let noise = channel.draw(1000, 0.25);
//! assert_eq!(noise.len(), 1000);
//! ```

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};
use sts_core::noise::{mean_power, noise_power_for_snr, NoiseSource};
use tracing::trace;

/// Channel model type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelModel {
    /// No noise at all
    Ideal,
    /// Additive White Gaussian Noise, redrawn every time
    #[default]
    Awgn,
    /// AWGN with a fixed realization scaled to the requested power
    FrozenAwgn,
}

impl ChannelModel {
    pub fn name(&self) -> &'static str {
        match self {
            ChannelModel::Ideal => "ideal",
            ChannelModel::Awgn => "awgn",
            ChannelModel::FrozenAwgn => "frozen-awgn",
        }
    }
}

impl std::str::FromStr for ChannelModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "ideal" | "none" => Ok(ChannelModel::Ideal),
            "awgn" => Ok(ChannelModel::Awgn),
            "frozen" | "frozen-awgn" => Ok(ChannelModel::FrozenAwgn),
            _ => Err(format!("unknown channel model '{}'; use ideal, awgn or frozen-awgn", s)),
        }
    }
}

/// Channel configuration
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Channel model to use
    pub model: ChannelModel,
    /// RNG seed; `None` seeds from the OS
    pub seed: Option<u64>,
}

impl ChannelConfig {
    /// Fresh AWGN with a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            model: ChannelModel::Awgn,
            seed: Some(seed),
        }
    }

    /// Frozen AWGN with an optional seed
    pub fn frozen(seed: Option<u64>) -> Self {
        Self {
            model: ChannelModel::FrozenAwgn,
            seed,
        }
    }

    /// Channel that adds nothing
    pub fn ideal() -> Self {
        Self {
            model: ChannelModel::Ideal,
            seed: None,
        }
    }
}

/// Noise channel
#[derive(Debug, Clone)]
pub struct Channel {
    config: ChannelConfig,
    rng: StdRng,
    /// Unit-variance realization reused by `FrozenAwgn`
    frozen: Vec<f64>,
}

impl Channel {
    /// Create a new channel with the given configuration
    pub fn new(config: ChannelConfig) -> Self {
        Self {
            config,
            rng: make_rng(config.seed),
            frozen: Vec::new(),
        }
    }

    /// Reseed and forget any frozen realization
    pub fn reset(&mut self) {
        self.rng = make_rng(self.config.seed);
        self.frozen.clear();
    }

    /// Get current configuration
    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    /// Update configuration
    pub fn set_config(&mut self, config: ChannelConfig) {
        *self = Self::new(config);
    }

    /// Add noise to `clean` at the given SNR.
    ///
    /// The noise power is calibrated on `clean` itself.
    pub fn apply(&mut self, clean: &[f64], snr_db: f64) -> Vec<f64> {
        let noise_power = noise_power_for_snr(mean_power(clean), snr_db);
        let noise = self.draw(clean.len(), noise_power);
        clean.iter().zip(noise.iter()).map(|(c, n)| c + n).collect()
    }

    fn unit_gaussian(&mut self, len: usize) -> Vec<f64> {
        (0..len)
            .map(|_| StandardNormal.sample(&mut self.rng))
            .collect()
    }
}

impl NoiseSource for Channel {
    fn draw(&mut self, len: usize, noise_power: f64) -> Vec<f64> {
        if self.config.model == ChannelModel::Ideal || !(noise_power > 0.0) || !noise_power.is_finite() {
            return vec![0.0; len];
        }
        let sigma = noise_power.sqrt();
        trace!(model = self.config.model.name(), len, noise_power, "Drawing noise");

        match self.config.model {
            ChannelModel::Ideal => vec![0.0; len],
            ChannelModel::Awgn => {
                let mut noise = self.unit_gaussian(len);
                noise.iter_mut().for_each(|n| *n *= sigma);
                noise
            }
            ChannelModel::FrozenAwgn => {
                if self.frozen.len() < len {
                    let extra = self.unit_gaussian(len - self.frozen.len());
                    self.frozen.extend(extra);
                }
                self.frozen[..len].iter().map(|n| n * sigma).collect()
            }
        }
    }
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Generate channel statistics for display
#[derive(Debug, Clone, Serialize)]
pub struct ChannelStats {
    /// Mean signal power
    pub signal_power: f64,
    /// Mean noise power
    pub noise_power: f64,
    /// Measured SNR in dB, `None` when no noise was added
    pub measured_snr_db: Option<f64>,
    /// Peak to average power ratio of the noisy signal
    pub papr_db: f64,
}

impl ChannelStats {
    /// Compute statistics from a clean signal and its noisy version
    pub fn compute(clean: &[f64], noisy: &[f64]) -> Self {
        let signal_power = mean_power(clean);

        // Estimate noise by differencing
        let noise: Vec<f64> = clean
            .iter()
            .zip(noisy.iter())
            .map(|(c, n)| n - c)
            .collect();
        let noise_power = mean_power(&noise);

        let measured_snr_db = sts_core::analysis::measured_snr_db(clean, &noise);

        let peak_power = noisy.iter().map(|s| s * s).fold(0.0_f64, f64::max);
        let avg_power = mean_power(noisy);
        let papr_db = if avg_power > 0.0 {
            10.0 * (peak_power / avg_power).log10()
        } else {
            0.0
        };

        Self {
            signal_power,
            noise_power,
            measured_snr_db,
            papr_db,
        }
    }
}
