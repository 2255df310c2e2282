//! Core types for sampling and reconstruction
//!
//! Signals in this crate are real-valued and stored as plain `f64` slices.
//! Anything handed to a renderer is an `(x, y)` pair so that plotting code
//! never has to know about the types defined here.
//!
//! ```text
//!   amplitude
//!      ^        x   (t_n, s[n])  ← a Point in a SampleSet
//!      |      x   x
//!      |    x       x
//!   ---+--x-----------x-----> time
//!      |
//! ```

use crate::component::ComponentId;

/// A real-valued sample
pub type Sample = f64;

/// An `(x, y)` pair as consumed by the plotting collaborator
pub type Point = (f64, f64);

/// Result type for signal operations
pub type SignalResult<T> = Result<T, SignalError>;

/// Errors that can occur while building, loading or reconstructing signals
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    #[error("Invalid signal file: {0}")]
    FileFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{method} needs at least {required} samples, got {actual}")]
    InsufficientSamples {
        method: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("Sample count ({samples}) does not match sample time count ({times})")]
    LengthMismatch { samples: usize, times: usize },

    #[error("No committed component with id {0}")]
    ComponentNotFound(ComponentId),

    #[error("Signal has no data: no file loaded")]
    NoData,
}

/// Zip two equally long slices into renderer points.
///
/// The shorter slice bounds the output.
pub fn to_points(x: &[f64], y: &[f64]) -> Vec<Point> {
    x.iter().copied().zip(y.iter().copied()).collect()
}

/// Evenly spaced values over `[start, stop]`, both ends included.
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            (0..num)
                .map(|i| if i == num - 1 { stop } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Values `start, start + step, ...` strictly below `stop`.
///
/// Values are computed as `start + i * step` rather than by accumulation so
/// long grids do not drift.
pub fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    if !(step > 0.0) || !step.is_finite() || stop <= start {
        return Vec::new();
    }
    let count = ((stop - start) / step).ceil() as usize;
    (0..count)
        .map(|i| start + step * i as f64)
        .filter(|&t| t < stop)
        .collect()
}
