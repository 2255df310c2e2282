//! Resampling onto arbitrary time grids
//!
//! Linear interpolation of `(xp, fp)` pairs onto new abscissae. Two edge
//! policies are provided:
//!
//! - [`interp`] holds the first/last value outside `xp` (file-derived
//!   signals and the Fourier reconstruction use this)
//! - [`interp_extrapolate`] extends the first/last segment linearly
//!
//! `xp` must be ascending. Both functions return an empty vector if `xp` is
//! empty.

/// Index of the segment `[xp[i], xp[i + 1]]` containing `x`, clamped to the
/// first and last segment. Requires `xp.len() >= 2`.
#[inline]
pub(crate) fn segment_index(xp: &[f64], x: f64) -> usize {
    let upper = xp.partition_point(|&v| v <= x);
    upper.saturating_sub(1).min(xp.len() - 2)
}

#[inline]
fn lerp(x0: f64, x1: f64, y0: f64, y1: f64, x: f64) -> f64 {
    let dx = x1 - x0;
    if dx == 0.0 {
        return y0;
    }
    y0 + (y1 - y0) * (x - x0) / dx
}

/// Linear interpolation with edge-hold outside the sample span
pub fn interp(x: &[f64], xp: &[f64], fp: &[f64]) -> Vec<f64> {
    let n = xp.len().min(fp.len());
    match n {
        0 => Vec::new(),
        1 => vec![fp[0]; x.len()],
        _ => {
            let (xp, fp) = (&xp[..n], &fp[..n]);
            x.iter()
                .map(|&t| {
                    if t <= xp[0] {
                        fp[0]
                    } else if t >= xp[n - 1] {
                        fp[n - 1]
                    } else {
                        let i = segment_index(xp, t);
                        lerp(xp[i], xp[i + 1], fp[i], fp[i + 1], t)
                    }
                })
                .collect()
        }
    }
}

/// Linear interpolation with linear extrapolation outside the sample span
pub fn interp_extrapolate(x: &[f64], xp: &[f64], fp: &[f64]) -> Vec<f64> {
    let n = xp.len().min(fp.len());
    match n {
        0 => Vec::new(),
        1 => vec![fp[0]; x.len()],
        _ => {
            let (xp, fp) = (&xp[..n], &fp[..n]);
            x.iter()
                .map(|&t| {
                    let i = segment_index(xp, t);
                    lerp(xp[i], xp[i + 1], fp[i], fp[i + 1], t)
                })
                .collect()
        }
    }
}
