//! Composed and file-derived signals
//!
//! A [`Signal`] is the sum of its active sinusoidal components plus, for
//! file-derived signals, the waveform read from disk. It is evaluated on
//! any time grid and sampled at any rate:
//!
//! ```text
//!              ┌──────────────┐   clean(t)   ┌─────────┐  clean + noise
//!  components ─┤              ├──────────────┤  noise  ├───────────────▶ grid
//!              │  Σ A·sin(..) │              │ P = P_s │
//!  file data  ─┤  + interp    ├── clean(tₙ) ─┤ /10^snr ├───────────────▶ samples
//!              └──────────────┘              └─────────┘
//! ```
//!
//! Noise power is calibrated on the clean grid and the same power is used
//! for the samples. Randomness comes from a caller-supplied
//! [`NoiseSource`], which keeps evaluation deterministic under test.

use crate::analysis::{PeakFinder, SpectrumAnalyzer};
use crate::component::{CommittedComponent, ComponentId, ComponentSet, SignalComponent};
use crate::noise::{mean_power, noise_power_for_snr, NoiseSource, MAXIMUM_SNR_DB};
use crate::reconstruction::sample_times;
use crate::resample::interp;
use crate::timeseries::{write_time_series, FileWaveform};
use crate::types::{linspace, to_points, Point, SignalError, SignalResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Display window the signal is evaluated and sampled over
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeDomain {
    /// First time (s)
    pub start: f64,
    /// Last time (s), included in the display grid
    pub stop: f64,
    /// Number of points in the display grid
    pub resolution: usize,
}

impl Default for TimeDomain {
    fn default() -> Self {
        Self {
            start: 0.0,
            stop: 2.0,
            resolution: 10_000,
        }
    }
}

impl TimeDomain {
    pub fn new(start: f64, stop: f64, resolution: usize) -> Self {
        Self {
            start,
            stop,
            resolution,
        }
    }

    /// Dense display grid, both ends included
    pub fn grid(&self) -> Vec<f64> {
        linspace(self.start, self.stop, self.resolution)
    }

    /// Window length in seconds
    pub fn duration(&self) -> f64 {
        self.stop - self.start
    }
}

/// How the signal's base waveform is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    /// Sum of components only
    #[default]
    Composed,
    /// File waveform plus components
    FromFile,
}

#[derive(Debug, Clone, PartialEq)]
enum SignalSource {
    Composed,
    FromFile {
        path: PathBuf,
        waveform: Option<FileWaveform>,
    },
}

/// Discrete samples of a signal
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SampleSet {
    /// Sample times, strictly increasing with spacing `1 / fs`
    pub times: Vec<f64>,
    /// Sample values
    pub values: Vec<f64>,
}

impl SampleSet {
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Samples as renderer points
    pub fn points(&self) -> Vec<Point> {
        to_points(&self.times, &self.values)
    }
}

/// One evaluation of a signal over a grid
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Grid the signal was evaluated on
    pub time: Vec<f64>,
    /// Noise-free signal on the grid
    pub clean: Vec<f64>,
    /// Noise added on the grid (all zeros when noise is off)
    pub noise: Vec<f64>,
    /// Samples over the signal's time domain
    pub samples: SampleSet,
    /// Noise power that was applied
    pub noise_power: f64,
}

impl Evaluation {
    /// Clean signal plus noise
    pub fn noisy(&self) -> Vec<f64> {
        self.clean
            .iter()
            .zip(self.noise.iter())
            .map(|(c, n)| c + n)
            .collect()
    }

    pub fn clean_points(&self) -> Vec<Point> {
        to_points(&self.time, &self.clean)
    }

    pub fn noisy_points(&self) -> Vec<Point> {
        to_points(&self.time, &self.noisy())
    }
}

/// Serializable snapshot of a [`Signal`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalState {
    pub kind: SignalKind,
    pub file_path: Option<PathBuf>,
    pub draft: SignalComponent,
    pub components: Vec<CommittedComponent>,
    pub next_id: u64,
    pub domain: TimeDomain,
    pub snr_db: f64,
}

impl Default for SignalState {
    fn default() -> Self {
        Signal::new().to_state()
    }
}

/// A signal built from sinusoids, optionally on top of a file waveform
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    components: ComponentSet,
    source: SignalSource,
    domain: TimeDomain,
    snr_db: f64,
    /// Peak frequency of the file waveform, computed once at load
    max_frequency_cache: f64,
}

impl Default for Signal {
    fn default() -> Self {
        Self::new()
    }
}

impl Signal {
    /// Empty composed signal over the default domain, noiseless
    pub fn new() -> Self {
        Self {
            components: ComponentSet::new(),
            source: SignalSource::Composed,
            domain: TimeDomain::default(),
            snr_db: MAXIMUM_SNR_DB,
            max_frequency_cache: 0.0,
        }
    }

    /// Composed signal with the given components already committed
    pub fn with_components(components: impl IntoIterator<Item = SignalComponent>) -> Self {
        let mut signal = Self::new();
        for component in components {
            signal.components.push(component);
        }
        signal
    }

    /// Signal whose base waveform is read from a CSV file
    pub fn from_file(path: impl AsRef<Path>) -> SignalResult<Self> {
        let mut signal = Self::new();
        signal.load_file(path)?;
        Ok(signal)
    }

    /// Switch to a file-derived base waveform. Components are kept and the
    /// domain moves to the file's time span at the current resolution.
    ///
    /// On error the signal is left exactly as it was.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> SignalResult<()> {
        let path = path.as_ref();
        let waveform = FileWaveform::read(path)?;
        let max_frequency = waveform_peak_frequency(&waveform);
        if let Some((first, last)) = waveform.span().filter(|(first, last)| last > first) {
            self.domain = TimeDomain::new(first, last, self.domain.resolution);
        }
        debug!(
            path = %path.display(),
            rows = waveform.len(),
            max_frequency,
            domain = ?self.domain,
            "Loaded signal file"
        );
        self.source = SignalSource::FromFile {
            path: path.to_path_buf(),
            waveform: Some(waveform),
        };
        self.max_frequency_cache = max_frequency;
        Ok(())
    }

    /// Drop any file waveform and go back to a purely composed signal
    pub fn clear_file(&mut self) {
        self.source = SignalSource::Composed;
        self.max_frequency_cache = 0.0;
    }

    pub fn kind(&self) -> SignalKind {
        match self.source {
            SignalSource::Composed => SignalKind::Composed,
            SignalSource::FromFile { .. } => SignalKind::FromFile,
        }
    }

    /// Path of the file waveform, if any
    pub fn file_path(&self) -> Option<&Path> {
        match &self.source {
            SignalSource::FromFile { path, .. } => Some(path),
            SignalSource::Composed => None,
        }
    }

    /// Loaded file waveform, if any
    pub fn waveform(&self) -> Option<&FileWaveform> {
        match &self.source {
            SignalSource::FromFile { waveform, .. } => waveform.as_ref(),
            SignalSource::Composed => None,
        }
    }

    pub fn components(&self) -> &ComponentSet {
        &self.components
    }

    pub fn domain(&self) -> TimeDomain {
        self.domain
    }

    pub fn set_domain(&mut self, domain: TimeDomain) {
        self.domain = domain;
    }

    /// Target SNR in dB
    pub fn snr_db(&self) -> f64 {
        self.snr_db
    }

    pub fn set_snr_db(&mut self, snr_db: f64) {
        self.snr_db = snr_db;
    }

    /// Overwrite the draft component
    pub fn update_active_component(&mut self, frequency: f64, amplitude: f64, phase: f64) {
        self.components.update_draft(frequency, amplitude, phase);
    }

    /// Commit the draft. Returns `None` (and changes nothing) when the
    /// draft is inert.
    pub fn add_component(&mut self) -> Option<ComponentId> {
        let id = self.components.commit();
        match id {
            Some(id) => debug!(%id, count = self.components.len(), "Committed component"),
            None => debug!("Ignored inert draft component"),
        }
        id
    }

    /// Remove exactly one committed component
    pub fn remove_component(&mut self, id: ComponentId) -> SignalResult<SignalComponent> {
        self.components
            .remove(id)
            .ok_or(SignalError::ComponentNotFound(id))
    }

    /// Highest frequency present: active components and, for file signals,
    /// the strongest-peak frequency found at load time
    pub fn maximum_frequency(&self) -> f64 {
        let components = self.components.maximum_frequency();
        match self.source {
            SignalSource::FromFile { .. } => components.max(self.max_frequency_cache),
            SignalSource::Composed => components,
        }
    }

    /// True when evaluation would produce nothing worth plotting
    pub fn is_empty(&self) -> bool {
        match &self.source {
            SignalSource::Composed => self.components.active().next().is_none(),
            SignalSource::FromFile { waveform, .. } => waveform.is_none(),
        }
    }

    /// Noise-free value at each time, `None` for a file signal with no data
    pub fn clean_values(&self, times: &[f64]) -> Option<Vec<f64>> {
        let mut values = match &self.source {
            SignalSource::Composed => vec![0.0; times.len()],
            SignalSource::FromFile { waveform, .. } => {
                let waveform = waveform.as_ref()?;
                interp(times, &waveform.times, &waveform.values)
            }
        };
        for component in self.components.active() {
            for (v, &t) in values.iter_mut().zip(times.iter()) {
                *v += component.value_at(t);
            }
        }
        Some(values)
    }

    /// Sample times over the domain for the given rate
    pub fn sample_times(&self, sampling_frequency: f64) -> Vec<f64> {
        sample_times(self.domain.start, self.domain.stop, sampling_frequency)
    }

    /// Evaluate on `time_grid` and sample at `sampling_frequency`.
    ///
    /// With `with_noise` set, Gaussian noise calibrated to the signal's SNR
    /// on `time_grid` is added to both the grid values and the samples.
    /// Returns `None` for a file signal whose file could not be loaded.
    pub fn evaluate<N: NoiseSource>(
        &self,
        time_grid: &[f64],
        with_noise: bool,
        sampling_frequency: f64,
        mut noise_source: N,
    ) -> Option<Evaluation> {
        let Some(clean) = self.clean_values(time_grid) else {
            warn!(
                path = ?self.file_path(),
                "Signal file has no data; nothing to evaluate"
            );
            return None;
        };

        let times = self.sample_times(sampling_frequency);
        let sample_clean = self.clean_values(&times)?;

        let noise_power = if with_noise {
            noise_power_for_snr(mean_power(&clean), self.snr_db)
        } else {
            0.0
        };

        let (noise, sample_noise) = if noise_power > 0.0 {
            let mut drawn = noise_source.draw(clean.len() + times.len(), noise_power);
            drawn.resize(clean.len() + times.len(), 0.0);
            let sample_noise = drawn.split_off(clean.len());
            (drawn, sample_noise)
        } else {
            (vec![0.0; clean.len()], vec![0.0; times.len()])
        };

        let values = sample_clean
            .iter()
            .zip(sample_noise.iter())
            .map(|(c, n)| c + n)
            .collect();

        debug!(
            points = clean.len(),
            samples = times.len(),
            noise_power,
            "Evaluated signal"
        );

        Some(Evaluation {
            time: time_grid.to_vec(),
            clean,
            noise,
            samples: SampleSet { times, values },
            noise_power,
        })
    }

    /// Snapshot for persistence
    pub fn to_state(&self) -> SignalState {
        SignalState {
            kind: self.kind(),
            file_path: self.file_path().map(Path::to_path_buf),
            draft: *self.components.draft(),
            components: self.components.committed().to_vec(),
            next_id: self.components.next_id(),
            domain: self.domain,
            snr_db: self.snr_db,
        }
    }

    /// Restore from a snapshot.
    ///
    /// File signals re-read their file but keep the persisted domain. If
    /// the read fails the signal keeps its file kind with no data and
    /// evaluates to nothing.
    pub fn from_state(state: SignalState) -> Self {
        let components = ComponentSet::from_parts(state.draft, state.components, state.next_id);
        let mut signal = Self {
            components,
            source: SignalSource::Composed,
            domain: state.domain,
            snr_db: state.snr_db,
            max_frequency_cache: 0.0,
        };

        if state.kind == SignalKind::FromFile {
            let path = state.file_path.unwrap_or_default();
            if let Err(e) = signal.load_file(&path) {
                warn!(path = %path.display(), error = %e, "Could not reload signal file");
                signal.source = SignalSource::FromFile {
                    path,
                    waveform: None,
                };
            }
            signal.domain = state.domain;
        }
        signal
    }

    /// Write the noise-free signal over the display grid as
    /// `Time,Amplitude` CSV
    pub fn export_csv(&self, path: impl AsRef<Path>) -> SignalResult<()> {
        let grid = self.domain.grid();
        let values = self.clean_values(&grid).ok_or(SignalError::NoData)?;
        write_time_series(path, &grid, &values)
    }
}

/// Highest positive spectral peak of a file waveform, resampled uniformly
/// over its own span
fn waveform_peak_frequency(waveform: &FileWaveform) -> f64 {
    let Some((first, last)) = waveform.span() else {
        return 0.0;
    };
    let n = waveform.len();
    if n < 2 || last <= first {
        return 0.0;
    }
    let grid = linspace(first, last, n);
    let values = interp(&grid, &waveform.times, &waveform.values);
    let period = (last - first) / (n - 1) as f64;
    let spectrum = SpectrumAnalyzer::new().compute(&values, period);
    PeakFinder::new().highest_frequency(&spectrum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::Noiseless;
    use std::f64::consts::PI;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("sts_signal_{}_{}", std::process::id(), name))
    }

    /// Deterministic source returning a fixed pattern scaled by sqrt(P)
    struct Alternating;

    impl NoiseSource for Alternating {
        fn draw(&mut self, len: usize, noise_power: f64) -> Vec<f64> {
            let sigma = noise_power.sqrt();
            (0..len)
                .map(|i| if i % 2 == 0 { sigma } else { -sigma })
                .collect()
        }
    }

    #[test]
    fn test_add_and_remove_components() {
        let mut signal = Signal::new();
        signal.update_active_component(5.0, 1.0, 0.0);
        let a = signal.add_component().unwrap();
        signal.update_active_component(5.0, 2.0, 0.0);
        let b = signal.add_component().unwrap();
        assert_ne!(a, b);
        assert_eq!(signal.components().len(), 2);

        // Same frequency, removed individually
        let removed = signal.remove_component(a).unwrap();
        assert_eq!(removed.amplitude, 1.0);
        assert_eq!(signal.components().len(), 1);
        assert_eq!(signal.components().get(b).unwrap().amplitude, 2.0);
    }

    #[test]
    fn test_remove_unknown_component() {
        let mut signal = Signal::with_components([SignalComponent::new(1.0, 1.0, 0.0)]);
        let before = signal.clone();
        let err = signal.remove_component(ComponentId(42)).unwrap_err();
        assert!(matches!(err, SignalError::ComponentNotFound(ComponentId(42))));
        assert_eq!(signal, before);
    }

    #[test]
    fn test_inert_draft_not_committed() {
        let mut signal = Signal::new();
        signal.update_active_component(0.0, 3.0, 0.0);
        assert!(signal.add_component().is_none());
        signal.update_active_component(7.0, 0.0, 0.0);
        assert!(signal.add_component().is_none());
        assert!(signal.components().is_empty());
    }

    #[test]
    fn test_maximum_frequency_includes_draft() {
        let mut signal = Signal::with_components([
            SignalComponent::new(3.0, 1.0, 0.0),
            SignalComponent::new(7.0, 0.5, 0.0),
        ]);
        assert_eq!(signal.maximum_frequency(), 7.0);

        signal.update_active_component(11.0, 1.0, 0.0);
        assert_eq!(signal.maximum_frequency(), 11.0);

        signal.update_active_component(20.0, 0.0, 0.0);
        assert_eq!(signal.maximum_frequency(), 7.0);
    }

    #[test]
    fn test_evaluate_sums_components() {
        let signal = Signal::with_components([
            SignalComponent::new(1.0, 1.0, 0.0),
            SignalComponent::new(3.0, 0.5, PI / 2.0),
        ]);
        let grid = linspace(0.0, 1.0, 101);
        let eval = signal.evaluate(&grid, false, 10.0, Noiseless).unwrap();

        for (&t, &v) in grid.iter().zip(eval.clean.iter()) {
            let expected = (2.0 * PI * t).sin() + 0.5 * (2.0 * PI * 3.0 * t + PI / 2.0).sin();
            assert!((v - expected).abs() < 1e-12);
        }
        assert!(eval.noise.iter().all(|&n| n == 0.0));
    }

    #[test]
    fn test_samples_span_domain() {
        let signal = Signal::with_components([SignalComponent::new(1.0, 1.0, 0.0)]);
        let grid = signal.domain().grid();
        let eval = signal.evaluate(&grid, false, 4.0, Noiseless).unwrap();

        assert_eq!(eval.samples.len(), 8);
        assert_eq!(eval.samples.times[0], 0.0);
        assert!(eval.samples.times.windows(2).all(|w| w[1] > w[0]));
        assert!(*eval.samples.times.last().unwrap() < 2.0);
        for (&t, &v) in eval.samples.times.iter().zip(eval.samples.values.iter()) {
            assert!((v - (2.0 * PI * t).sin()).abs() < 1e-12);
        }
    }

    #[test]
    fn test_invalid_sampling_frequency_gives_no_samples() {
        let signal = Signal::with_components([SignalComponent::new(1.0, 1.0, 0.0)]);
        let grid = linspace(0.0, 1.0, 11);
        for fs in [0.0, -5.0, f64::NAN] {
            let eval = signal.evaluate(&grid, false, fs, Noiseless).unwrap();
            assert!(eval.samples.is_empty());
        }
    }

    #[test]
    fn test_noise_calibrated_to_snr() {
        let mut signal = Signal::with_components([SignalComponent::new(2.0, 1.0, 0.0)]);
        signal.set_snr_db(10.0);
        let grid = signal.domain().grid();
        let eval = signal.evaluate(&grid, true, 20.0, Alternating).unwrap();

        let expected = mean_power(&eval.clean) / 10.0;
        assert!((eval.noise_power - expected).abs() < 1e-12);
        assert!((mean_power(&eval.noise) - expected).abs() < 1e-12);

        // Samples carry noise at the same power
        let sample_noise: Vec<f64> = eval
            .samples
            .times
            .iter()
            .zip(eval.samples.values.iter())
            .map(|(&t, &v)| v - (2.0 * PI * 2.0 * t).sin())
            .collect();
        assert!((mean_power(&sample_noise) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_maximum_snr_is_noiseless() {
        let signal = Signal::with_components([SignalComponent::new(2.0, 1.0, 0.0)]);
        assert_eq!(signal.snr_db(), MAXIMUM_SNR_DB);
        let grid = linspace(0.0, 1.0, 50);
        let eval = signal.evaluate(&grid, true, 10.0, Alternating).unwrap();
        assert_eq!(eval.noise_power, 0.0);
        assert_eq!(eval.noisy(), eval.clean);
    }

    #[test]
    fn test_silent_signal_has_no_noise() {
        let mut signal = Signal::new();
        signal.set_snr_db(0.0);
        let grid = linspace(0.0, 1.0, 50);
        let eval = signal.evaluate(&grid, true, 10.0, Alternating).unwrap();
        assert!(eval.noisy().iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_file_signal_interpolates() {
        let path = temp_path("triangle.csv");
        std::fs::write(&path, "Time,Signal\n0,0\n1,1\n2,0\n").unwrap();

        let signal = Signal::from_file(&path).unwrap();
        assert_eq!(signal.kind(), SignalKind::FromFile);
        let values = signal.clean_values(&[1.0, 0.5, -1.0, 3.0]).unwrap();
        assert_eq!(values, vec![1.0, 0.5, 0.0, 0.0]);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_file_domain_follows_file_span() {
        let path = temp_path("late.csv");
        let mut csv = String::from("Time,Signal\n");
        for i in 0..1000 {
            let t = 10.0 + i as f64 / 100.0;
            csv.push_str(&format!("{},{}\n", t, (2.0 * PI * 3.0 * t).sin()));
        }
        std::fs::write(&path, csv).unwrap();

        let signal = Signal::from_file(&path).unwrap();
        let domain = signal.domain();
        assert_eq!(domain.start, 10.0);
        assert!((domain.stop - 19.99).abs() < 1e-9);
        assert_eq!(domain.resolution, TimeDomain::default().resolution);

        let grid = domain.grid();
        let eval = signal.evaluate(&grid, false, 20.0, Noiseless).unwrap();
        let (lo, hi) = eval
            .clean
            .iter()
            .fold((f64::MAX, f64::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        assert!(hi - lo > 1.5);
        assert_eq!(eval.samples.times.first(), Some(&10.0));
        assert!(*eval.samples.times.last().unwrap() > 19.0);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_restored_file_signal_keeps_saved_domain() {
        let path = temp_path("span.csv");
        std::fs::write(&path, "Time,Signal\n5,0\n6,1\n7,0\n").unwrap();

        let mut signal = Signal::from_file(&path).unwrap();
        assert_eq!(signal.domain(), TimeDomain::new(5.0, 7.0, 10_000));
        signal.set_domain(TimeDomain::new(5.5, 6.5, 300));

        let restored = Signal::from_state(signal.to_state());
        assert_eq!(restored.domain(), TimeDomain::new(5.5, 6.5, 300));
        assert!(!restored.is_empty());

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_file_signal_adds_components() {
        let path = temp_path("dc.csv");
        std::fs::write(&path, "Time,Value\n0,1\n2,1\n").unwrap();

        let mut signal = Signal::from_file(&path).unwrap();
        signal.update_active_component(1.0, 1.0, 0.0);
        signal.add_component();
        let values = signal.clean_values(&[0.25]).unwrap();
        assert!((values[0] - 2.0).abs() < 1e-12);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_file_max_frequency_from_spectrum() {
        let path = temp_path("tone.csv");
        let mut csv = String::from("Time,Signal\n");
        for i in 0..200 {
            let t = i as f64 / 100.0;
            csv.push_str(&format!("{},{}\n", t, (2.0 * PI * 5.0 * t).sin()));
        }
        std::fs::write(&path, csv).unwrap();

        let signal = Signal::from_file(&path).unwrap();
        assert!((signal.maximum_frequency() - 5.0).abs() < 0.5);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_file_failure_keeps_state() {
        let mut signal = Signal::with_components([SignalComponent::new(4.0, 1.0, 0.0)]);
        let before = signal.clone();

        let path = temp_path("no_time.csv");
        std::fs::write(&path, "A,B\n0,1\n").unwrap();
        assert!(signal.load_file(&path).is_err());
        assert!(signal.load_file(temp_path("does_not_exist.csv")).is_err());
        assert_eq!(signal, before);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_state_roundtrip() {
        let mut signal = Signal::with_components([
            SignalComponent::new(1.0, 1.0, 0.0),
            SignalComponent::new(2.5, 0.3, 1.2),
            SignalComponent::new(9.0, 0.1, -0.5),
        ]);
        signal.update_active_component(4.0, 0.2, 0.0);
        signal.set_snr_db(17.5);

        let json = serde_json::to_string(&signal.to_state()).unwrap();
        let state: SignalState = serde_json::from_str(&json).unwrap();
        let restored = Signal::from_state(state);

        assert_eq!(restored, signal);
        let grid = linspace(0.0, 2.0, 500);
        assert_eq!(restored.clean_values(&grid), signal.clean_values(&grid));
    }

    #[test]
    fn test_state_with_missing_file_evaluates_empty() {
        let state = SignalState {
            kind: SignalKind::FromFile,
            file_path: Some(temp_path("vanished.csv")),
            ..SignalState::default()
        };
        let signal = Signal::from_state(state);
        assert_eq!(signal.kind(), SignalKind::FromFile);
        assert!(signal.is_empty());
        let grid = linspace(0.0, 1.0, 10);
        assert!(signal.evaluate(&grid, true, 10.0, Noiseless).is_none());
        assert!(matches!(
            signal.export_csv(temp_path("never.csv")),
            Err(SignalError::NoData)
        ));
    }

    #[test]
    fn test_export_csv_reloads() {
        let path = temp_path("export.csv");
        let mut signal = Signal::with_components([SignalComponent::new(1.0, 1.0, 0.0)]);
        signal.set_domain(TimeDomain::new(0.0, 1.0, 101));
        signal.export_csv(&path).unwrap();

        let reloaded = Signal::from_file(&path).unwrap();
        let grid = linspace(0.0, 1.0, 37);
        let a = signal.clean_values(&grid).unwrap();
        let b = reloaded.clean_values(&grid).unwrap();
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 2e-3);
        }

        std::fs::remove_file(&path).ok();
    }
}
