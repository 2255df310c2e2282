//! Sampling Theory Studio Command-Line Interface
//!
//! This CLI provides tools for:
//! - Composing signals from sinusoids or loading them from CSV files
//! - Sampling with optional noise and reconstructing with six methods
//! - Inspecting spectra, aliasing and sampling-induced replicas
//! - Saving and restoring scenarios as JSON
//!
//! Every command prints renderer-ready data as text, CSV or JSON.

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use serde_json::json;
use std::path::PathBuf;
use sts_core::analysis::{apparent_frequency, PeakFinder, SignalStats, SpectrumAnalyzer};
use sts_core::{ReconstructionMethod, Signal, SignalComponent, TimeDomain};
use sts_sim::{
    Channel, ChannelModel, ChannelStats, Pipeline, PipelineOutput, SamplingRate, Scenario,
};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "sts")]
#[command(author, version, about = "Sampling Theory Studio CLI", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sample and reconstruct a signal, then report the error
    #[command(allow_negative_numbers = true)]
    Run {
        #[command(flatten)]
        signal: SignalArgs,

        /// Output format (text, json, csv)
        #[arg(long, default_value = "text")]
        format: String,

        /// Write output to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the spectrum of the signal and the replicas sampling creates
    #[command(allow_negative_numbers = true)]
    Spectrum {
        #[command(flatten)]
        signal: SignalArgs,

        /// Display threshold on normalized magnitude
        #[arg(long, default_value = "0.001")]
        threshold: f64,

        /// Replica window half width in Hz (default: derived from the rates)
        #[arg(long)]
        half_width: Option<f64>,

        /// Output format (text, json, csv, peaks)
        #[arg(long, default_value = "text")]
        format: String,

        /// Write output to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write the noise-free signal to a Time,Amplitude CSV file
    #[command(allow_negative_numbers = true)]
    Export {
        #[command(flatten)]
        signal: SignalArgs,

        /// Output CSV file
        #[arg(short, long, default_value = "signal.csv")]
        output: PathBuf,
    },

    /// Save or inspect scenario files
    Scenario {
        #[command(subcommand)]
        command: ScenarioCommand,
    },

    /// List the reconstruction methods
    Methods,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum ScenarioCommand {
    /// Build a scenario from flags and save it as JSON
    #[command(allow_negative_numbers = true)]
    Save {
        #[command(flatten)]
        signal: SignalArgs,

        /// Output JSON file
        #[arg(short, long, default_value = "scenario.json")]
        output: PathBuf,
    },

    /// Print a summary of a saved scenario
    Show {
        /// Scenario JSON file
        input: PathBuf,
    },
}

/// Flags that describe the signal and how it is sampled
#[derive(Args, Clone, Default)]
struct SignalArgs {
    /// Start from a saved scenario; other flags override it
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Add a component as FREQ:AMP[:PHASE] (Hz, amplitude, radians); repeatable
    #[arg(short, long = "component", value_parser = parse_component)]
    components: Vec<SignalComponent>,

    /// Load the base waveform from a CSV file with a Time column
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Target SNR in dB (100 = noiseless)
    #[arg(long)]
    snr: Option<f64>,

    /// Add noise at the target SNR
    #[arg(long)]
    noise: bool,

    /// Sampling rate: Hz (e.g. 20 or 20hz) or Nyquist multiple (e.g. 2x)
    #[arg(long = "fs")]
    sampling: Option<SamplingRate>,

    /// Reconstruction method (zoh, linear, nearest, spline, sinc, fourier)
    #[arg(short, long)]
    method: Option<ReconstructionMethod>,

    /// Noise channel (ideal, awgn, frozen-awgn)
    #[arg(long)]
    channel: Option<ChannelModel>,

    /// RNG seed for reproducible noise
    #[arg(long)]
    seed: Option<u64>,

    /// Domain start time in seconds
    #[arg(long)]
    start: Option<f64>,

    /// Domain stop time in seconds
    #[arg(long)]
    stop: Option<f64>,

    /// Number of points in the display grid
    #[arg(long)]
    points: Option<usize>,

    /// Include replica impulses and sampling markers
    #[arg(long)]
    replicas: bool,

    /// Leave the sample markers out of the plot data
    #[arg(long)]
    hide_samples: bool,
}

fn parse_component(s: &str) -> std::result::Result<SignalComponent, String> {
    let parts: Vec<&str> = s.split(':').map(str::trim).collect();
    if parts.len() < 2 || parts.len() > 3 {
        return Err(format!("expected FREQ:AMP[:PHASE], got '{}'", s));
    }
    let number = |v: &str, what: &str| {
        v.parse::<f64>()
            .map_err(|_| format!("invalid {} '{}' in component '{}'", what, v, s))
    };
    let frequency = number(parts[0], "frequency")?;
    let amplitude = number(parts[1], "amplitude")?;
    let phase = match parts.get(2) {
        Some(p) => number(p, "phase")?,
        None => 0.0,
    };
    Ok(SignalComponent::new(frequency, amplitude, phase))
}

/// Merge a saved scenario (if any) with the flags
fn build_scenario(args: &SignalArgs) -> Result<Scenario> {
    let mut scenario = match &args.scenario {
        Some(path) => Scenario::load(path)
            .with_context(|| format!("Failed to load scenario {:?}", path))?,
        None => Scenario::default(),
    };

    if let Some(path) = &args.file {
        scenario
            .load_signal_file(path)
            .with_context(|| format!("Failed to load signal file {:?}", path))?;
    }

    let mut signal = scenario.signal();
    for component in &args.components {
        signal.update_active_component(component.frequency, component.amplitude, component.phase);
        if signal.add_component().is_none() {
            warn!(component = %component.label(), "Skipping component with zero frequency or amplitude");
        }
    }
    if let Some(snr) = args.snr {
        signal.set_snr_db(snr);
    }

    let domain = signal.domain();
    let domain = TimeDomain::new(
        args.start.unwrap_or(domain.start),
        args.stop.unwrap_or(domain.stop),
        args.points.unwrap_or(domain.resolution),
    );
    if !(domain.stop > domain.start) {
        anyhow::bail!("Domain stop ({}) must be after start ({})", domain.stop, domain.start);
    }
    if domain.resolution < 2 {
        anyhow::bail!("Display grid needs at least 2 points, got {}", domain.resolution);
    }
    signal.set_domain(domain);
    scenario.signal = signal.to_state();

    if let Some(sampling) = args.sampling {
        scenario.sampling = sampling;
    }
    if let Some(method) = args.method {
        scenario.method = method;
    }
    if let Some(model) = args.channel {
        scenario.channel.model = model;
    }
    if args.seed.is_some() {
        scenario.channel.seed = args.seed;
    }
    scenario.noise_enabled |= args.noise;
    scenario.show_replicas |= args.replicas;
    if args.hide_samples {
        scenario.show_samples = false;
    }

    Ok(scenario)
}

fn write_or_print(output_text: &str, output: Option<PathBuf>, what: &str) -> Result<()> {
    if let Some(output_path) = output {
        std::fs::write(&output_path, output_text)
            .with_context(|| format!("Failed to write {:?}", output_path))?;
        println!("{} written to {:?}", what, output_path);
    } else {
        println!("{}", output_text);
    }
    Ok(())
}

/// Run the pipeline for a scenario; `None` when the signal is empty
fn run_pipeline(
    scenario: &Scenario,
    half_width: Option<f64>,
    analyzer: SpectrumAnalyzer,
) -> Result<Option<(Signal, PipelineOutput)>> {
    let signal = scenario.signal();
    if signal.is_empty() {
        warn!("Signal is empty; add components with -c FREQ:AMP or load a file with --file");
        return Ok(None);
    }

    let mut settings = scenario.settings(&signal);
    settings.spectrum_half_width = half_width;
    if !(settings.sampling_frequency > 0.0) {
        anyhow::bail!(
            "Sampling frequency resolved to {} Hz; pass --fs with a positive rate",
            settings.sampling_frequency
        );
    }

    let mut channel = Channel::new(scenario.channel);
    let output = Pipeline::new()
        .with_analyzer(analyzer)
        .run(&signal, &settings, &mut channel)
        .context("Reconstruction failed")?;
    Ok(output.map(|output| (signal, output)))
}

fn cmd_run(args: SignalArgs, format: String, output: Option<PathBuf>) -> Result<()> {
    let scenario = build_scenario(&args)?;
    let Some((signal, result)) = run_pipeline(&scenario, None, SpectrumAnalyzer::new())? else {
        return Ok(());
    };

    let output_text = match format.as_str() {
        "json" => serde_json::to_string_pretty(&json!({
            "sampling_frequency": result.sampling_frequency,
            "maximum_frequency": result.maximum_frequency,
            "nyquist_rate": result.nyquist_rate,
            "aliased": result.aliased,
            "method": result.method,
            "noise_power": result.evaluation.noise_power,
            "error": {
                "mse": result.error.mse,
                "rmse": result.error.rmse,
                "max_abs_error": result.error.max_abs_error,
                "snr_db": result.error.snr_db,
            },
            "plot": result.plot,
        }))?,
        "csv" => {
            let noisy = result.evaluation.noisy();
            let mut csv = String::from("time,original,noisy,reconstruction,difference\n");
            for i in 0..result.evaluation.time.len() {
                csv.push_str(&format!(
                    "{},{},{},{},{}\n",
                    result.evaluation.time[i],
                    result.evaluation.clean[i],
                    noisy[i],
                    result.reconstruction[i],
                    result.error.difference[i]
                ));
            }
            csv
        }
        "text" => run_summary(&signal, &scenario, &result),
        other => anyhow::bail!("Unknown output format: '{}'. Use: text, json, csv", other),
    };

    write_or_print(&output_text, output, "Reconstruction")
}

fn run_summary(signal: &Signal, scenario: &Scenario, result: &PipelineOutput) -> String {
    let mut out = String::new();
    out.push_str("=== Sampling & Reconstruction ===\n\n");
    out.push_str("Signal:\n");
    if let Some(path) = signal.file_path() {
        out.push_str(&format!("  File:              {:?}\n", path));
    }
    for committed in signal.components().committed() {
        out.push_str(&format!("  {:<6}             {}\n", committed.id.to_string(), committed.component.label()));
    }
    let domain = signal.domain();
    out.push_str(&format!(
        "  Domain:            {} s .. {} s ({} points)\n",
        domain.start, domain.stop, domain.resolution
    ));
    out.push_str(&format!("  Max frequency:     {:.3} Hz\n", result.maximum_frequency));
    out.push_str(&format!("  Nyquist rate:      {:.3} Hz\n\n", result.nyquist_rate));

    out.push_str("Sampling:\n");
    out.push_str(&format!("  Rate:              {:.3} Hz\n", result.sampling_frequency));
    out.push_str(&format!("  Samples:           {}\n", result.evaluation.samples.len()));
    if result.aliased {
        out.push_str("  Aliasing:          YES (below Nyquist)\n");
        for component in signal.components().active() {
            out.push_str(&format!(
                "    {:.3} Hz appears at {:.3} Hz\n",
                component.frequency,
                apparent_frequency(component.frequency, result.sampling_frequency)
            ));
        }
    } else {
        out.push_str("  Aliasing:          no\n");
    }

    out.push_str("\nNoise:\n");
    if scenario.noise_enabled {
        let stats = ChannelStats::compute(&result.evaluation.clean, &result.evaluation.noisy());
        out.push_str(&format!("  Channel:           {}\n", scenario.channel.model.name()));
        out.push_str(&format!("  Target SNR:        {:.2} dB\n", signal.snr_db()));
        match stats.measured_snr_db {
            Some(snr) => out.push_str(&format!("  Measured SNR:      {:.2} dB\n", snr)),
            None => out.push_str("  Measured SNR:      noiseless\n"),
        }
    } else {
        out.push_str("  Disabled\n");
    }

    out.push_str(&format!("\nMethod: {}\n\n", result.method));
    out.push_str(&result.error.to_text());
    out.push('\n');
    out.push_str(&SignalStats::compute(&result.evaluation.clean).to_text());
    out
}

fn cmd_spectrum(
    args: SignalArgs,
    threshold: f64,
    half_width: Option<f64>,
    format: String,
    output: Option<PathBuf>,
) -> Result<()> {
    let mut scenario = build_scenario(&args)?;
    scenario.show_replicas = true;
    let analyzer = SpectrumAnalyzer::new().with_threshold(threshold);
    let Some((_, result)) = run_pipeline(&scenario, half_width, analyzer)? else {
        return Ok(());
    };

    let output_text = match format.as_str() {
        "json" => serde_json::to_string_pretty(&json!({
            "sampling_frequency": result.sampling_frequency,
            "freq_resolution": result.spectrum.freq_resolution,
            "aliased": result.aliased,
            "spectrum": result.plot.spectrum,
            "replicas": result.replicas,
            "sampling_markers": result.plot.sampling_markers,
        }))?,
        "csv" => result.spectrum.to_csv(),
        "peaks" => {
            let peaks = PeakFinder::new().find_peaks(&result.spectrum);
            PeakFinder::format_text(&peaks)
        }
        "text" => {
            let mut out = result.spectrum.to_text();
            out.push_str(&format!(
                "\nReplicas at fs = {:.3} Hz ({}):\n",
                result.sampling_frequency,
                if result.aliased { "aliased" } else { "no aliasing" }
            ));
            for replica in &result.replicas {
                out.push_str(&format!(
                    "  {:>10.3} Hz  from {:>8.3} Hz (k = {:+})  |X| = {:.5}\n",
                    replica.frequency, replica.source_frequency, replica.order, replica.magnitude
                ));
            }
            if result.replicas.is_empty() {
                out.push_str("  none in window\n");
            }
            out
        }
        other => anyhow::bail!("Unknown output format: '{}'. Use: text, json, csv, peaks", other),
    };

    write_or_print(&output_text, output, "Spectrum")
}

fn cmd_export(args: SignalArgs, output: PathBuf) -> Result<()> {
    let scenario = build_scenario(&args)?;
    let signal = scenario.signal();
    signal
        .export_csv(&output)
        .with_context(|| format!("Failed to export signal to {:?}", output))?;
    info!(path = ?output, points = signal.domain().resolution, "Exported signal");
    println!("Signal written to {:?}", output);
    Ok(())
}

fn cmd_scenario_save(args: SignalArgs, output: PathBuf) -> Result<()> {
    let scenario = build_scenario(&args)?;
    scenario
        .save(&output)
        .with_context(|| format!("Failed to save scenario to {:?}", output))?;
    println!("Scenario written to {:?}", output);
    Ok(())
}

fn cmd_scenario_show(input: PathBuf) -> Result<()> {
    let scenario =
        Scenario::load(&input).with_context(|| format!("Failed to load scenario {:?}", input))?;
    let signal = scenario.signal();
    let settings = scenario.settings(&signal);

    println!("=== Scenario {:?} ===", input);
    println!();
    println!("Signal:");
    println!("  Kind:              {:?}", signal.kind());
    if let Some(path) = signal.file_path() {
        let state = if signal.waveform().is_some() { "loaded" } else { "missing" };
        println!("  File:              {:?} ({})", path, state);
    }
    println!("  Components:        {}", signal.components().len());
    for committed in signal.components().committed() {
        println!("    {:<6} {}", committed.id.to_string(), committed.component.label());
    }
    println!("  SNR:               {:.2} dB", signal.snr_db());
    println!("  Max frequency:     {:.3} Hz", signal.maximum_frequency());
    println!();
    println!("Settings:");
    println!("  Sampling:          {:?} -> {:.3} Hz", scenario.sampling, settings.sampling_frequency);
    println!("  Method:            {}", scenario.method);
    println!("  Noise:             {}", if scenario.noise_enabled { "on" } else { "off" });
    println!("  Channel:           {}", scenario.channel.model.name());
    println!("  Show samples:      {}", scenario.show_samples);
    println!("  Show replicas:     {}", scenario.show_replicas);
    Ok(())
}

fn cmd_methods() -> Result<()> {
    println!("=== Reconstruction Methods ===");
    println!();
    println!("{:<10} {:<32} {}", "Tag", "Name", "Min samples");
    for method in ReconstructionMethod::ALL {
        println!(
            "{:<10} {:<32} {}",
            method.tag(),
            method.name(),
            method.minimum_samples()
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run {
            signal,
            format,
            output,
        } => cmd_run(signal, format, output),

        Commands::Spectrum {
            signal,
            threshold,
            half_width,
            format,
            output,
        } => cmd_spectrum(signal, threshold, half_width, format, output),

        Commands::Export { signal, output } => cmd_export(signal, output),

        Commands::Scenario { command } => match command {
            ScenarioCommand::Save { signal, output } => cmd_scenario_save(signal, output),
            ScenarioCommand::Show { input } => cmd_scenario_show(input),
        },

        Commands::Methods => cmd_methods(),

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let bin_name = cmd.get_name().to_string();
            generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
            Ok(())
        }
    }
}
