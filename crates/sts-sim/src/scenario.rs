//! Scenario files
//!
//! A scenario is everything needed to reproduce a session: the signal, the
//! noise switch, the sampling rate policy, the reconstruction method, the
//! display toggles and the noise channel. Scenarios are stored as JSON.
//!
//! ```json
//! {
//!   "signal": { "kind": "composed", "components": [ ... ], "snr_db": 20.0 },
//!   "noise_enabled": true,
//!   "sampling": { "nyquist_multiple": 2.0 },
//!   "method": "sinc",
//!   "channel": { "model": "awgn", "seed": null }
//! }
//! ```

use crate::channel::ChannelConfig;
use crate::pipeline::PipelineSettings;
use serde::{Deserialize, Serialize};
use std::path::Path;
use sts_core::analysis::nyquist_rate;
use sts_core::{ReconstructionMethod, Signal, SignalError, SignalState};
use thiserror::Error;
use tracing::debug;

/// Scenario loading and saving errors
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Signal error: {0}")]
    Signal(#[from] SignalError),

    #[error("Invalid scenario JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ScenarioResult<T> = Result<T, ScenarioError>;

/// How the sampling frequency is chosen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingRate {
    /// Fixed rate in Hz
    Absolute(f64),
    /// Multiple of the Nyquist rate (`2 · f_max`) of the signal
    NyquistMultiple(f64),
}

impl Default for SamplingRate {
    fn default() -> Self {
        SamplingRate::NyquistMultiple(2.0)
    }
}

impl SamplingRate {
    /// Sampling frequency in Hz for a signal whose highest frequency is
    /// `maximum_frequency`
    pub fn resolve(&self, maximum_frequency: f64) -> f64 {
        match *self {
            SamplingRate::Absolute(hz) => hz,
            SamplingRate::NyquistMultiple(k) => k * nyquist_rate(maximum_frequency),
        }
    }
}

impl std::str::FromStr for SamplingRate {
    type Err = String;

    /// `20`, `20hz` → absolute; `2x`, `2.5xn` → Nyquist multiple
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        let parse = |v: &str| {
            v.trim()
                .parse::<f64>()
                .map_err(|_| format!("invalid sampling rate '{}'", s))
        };
        if let Some(k) = lower.strip_suffix("xn").or_else(|| lower.strip_suffix('x')) {
            Ok(SamplingRate::NyquistMultiple(parse(k)?))
        } else if let Some(hz) = lower.strip_suffix("hz") {
            Ok(SamplingRate::Absolute(parse(hz)?))
        } else {
            Ok(SamplingRate::Absolute(parse(&lower)?))
        }
    }
}

/// A complete, persistable session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub signal: SignalState,
    pub noise_enabled: bool,
    pub sampling: SamplingRate,
    pub show_samples: bool,
    pub show_replicas: bool,
    pub method: ReconstructionMethod,
    pub channel: ChannelConfig,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            signal: SignalState::default(),
            noise_enabled: false,
            sampling: SamplingRate::default(),
            show_samples: true,
            show_replicas: false,
            method: ReconstructionMethod::default(),
            channel: ChannelConfig::default(),
        }
    }
}

impl Scenario {
    /// Scenario around an existing signal with default settings
    pub fn from_signal(signal: &Signal) -> Self {
        Self {
            signal: signal.to_state(),
            ..Self::default()
        }
    }

    /// Rebuild the signal. A file signal whose file is gone comes back
    /// empty rather than failing.
    pub fn signal(&self) -> Signal {
        Signal::from_state(self.signal.clone())
    }

    /// Switch the scenario's signal to a file waveform, keeping its
    /// components. The scenario is unchanged if the file cannot be read.
    pub fn load_signal_file(&mut self, path: impl AsRef<Path>) -> ScenarioResult<()> {
        let mut signal = self.signal();
        signal.load_file(path)?;
        self.signal = signal.to_state();
        Ok(())
    }

    /// Pipeline settings with the sampling rate resolved against `signal`
    pub fn settings(&self, signal: &Signal) -> PipelineSettings {
        PipelineSettings {
            noise_enabled: self.noise_enabled,
            sampling_frequency: self.sampling.resolve(signal.maximum_frequency()),
            method: self.method,
            show_samples: self.show_samples,
            show_replicas: self.show_replicas,
            ..PipelineSettings::default()
        }
    }

    pub fn to_json(&self) -> ScenarioResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> ScenarioResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the scenario as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> ScenarioResult<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)?;
        debug!(path = %path.display(), "Saved scenario");
        Ok(())
    }

    /// Read a scenario written by [`Scenario::save`]
    pub fn load(path: impl AsRef<Path>) -> ScenarioResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let scenario = Self::from_json(&json)?;
        debug!(path = %path.display(), "Loaded scenario");
        Ok(scenario)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ChannelModel;
    use sts_core::{SignalComponent, SignalKind};

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("sts_scenario_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_sampling_rate_resolve() {
        assert_eq!(SamplingRate::Absolute(12.0).resolve(100.0), 12.0);
        assert_eq!(SamplingRate::NyquistMultiple(2.0).resolve(5.0), 20.0);
        assert_eq!(SamplingRate::NyquistMultiple(1.5).resolve(0.0), 0.0);
    }

    #[test]
    fn test_sampling_rate_parse() {
        assert_eq!("40".parse::<SamplingRate>().unwrap(), SamplingRate::Absolute(40.0));
        assert_eq!("7.5Hz".parse::<SamplingRate>().unwrap(), SamplingRate::Absolute(7.5));
        assert_eq!("2x".parse::<SamplingRate>().unwrap(), SamplingRate::NyquistMultiple(2.0));
        assert_eq!("0.5xN".parse::<SamplingRate>().unwrap(), SamplingRate::NyquistMultiple(0.5));
        assert!("fast".parse::<SamplingRate>().is_err());
    }

    #[test]
    fn test_scenario_roundtrip() {
        let mut signal = Signal::with_components([
            SignalComponent::new(2.0, 1.0, 0.0),
            SignalComponent::new(5.0, 0.5, 0.3),
            SignalComponent::new(8.0, 0.25, -1.0),
        ]);
        signal.set_snr_db(15.0);

        let scenario = Scenario {
            noise_enabled: true,
            sampling: SamplingRate::Absolute(33.0),
            show_replicas: true,
            method: ReconstructionMethod::CubicSpline,
            channel: ChannelConfig::frozen(Some(11)),
            ..Scenario::from_signal(&signal)
        };

        let path = temp_path("roundtrip.json");
        scenario.save(&path).unwrap();
        let loaded = Scenario::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, scenario);
        assert_eq!(loaded.signal(), signal);
        assert_eq!(loaded.channel.model, ChannelModel::FrozenAwgn);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let scenario = Scenario::from_json(r#"{ "method": "zero_order_hold" }"#).unwrap();
        assert_eq!(scenario.method, ReconstructionMethod::ZeroOrderHold);
        assert_eq!(scenario.sampling, SamplingRate::NyquistMultiple(2.0));
        assert!(scenario.signal().components().is_empty());
    }

    #[test]
    fn test_settings_resolve_against_signal() {
        let signal = Signal::with_components([SignalComponent::new(10.0, 1.0, 0.0)]);
        let scenario = Scenario {
            sampling: SamplingRate::NyquistMultiple(0.5),
            ..Scenario::from_signal(&signal)
        };
        let settings = scenario.settings(&signal);
        assert_eq!(settings.sampling_frequency, 10.0);
    }

    #[test]
    fn test_missing_file_scenario_is_empty() {
        let mut scenario = Scenario::default();
        scenario.signal.kind = SignalKind::FromFile;
        scenario.signal.file_path = Some(temp_path("gone.csv"));
        let signal = scenario.signal();
        assert_eq!(signal.kind(), SignalKind::FromFile);
        assert!(signal.is_empty());
    }

    #[test]
    fn test_load_signal_file() {
        let path = temp_path("wave.csv");
        std::fs::write(&path, "Time,Amplitude\n0,0\n1,1\n").unwrap();

        let mut scenario = Scenario::default();
        scenario.load_signal_file(&path).unwrap();
        assert_eq!(scenario.signal.kind, SignalKind::FromFile);
        assert_eq!(scenario.signal.file_path.as_deref(), Some(path.as_path()));

        let before = scenario.clone();
        assert!(matches!(
            scenario.load_signal_file(temp_path("absent.csv")),
            Err(ScenarioError::Signal(_))
        ));
        assert_eq!(scenario, before);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_bad_json_errors() {
        assert!(matches!(
            Scenario::from_json("{ not json"),
            Err(ScenarioError::Json(_))
        ));
        assert!(matches!(
            Scenario::load(temp_path("missing.json")),
            Err(ScenarioError::Io(_))
        ));
    }
}
