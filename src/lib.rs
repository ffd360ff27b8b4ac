//! srcinv - frequency-domain source signature inversion
//!
//! Estimates the effective source wavelet of a seismic shot gather by linear
//! inversion in the frequency domain, given modelled traces, observed traces
//! and the reference source used for modelling. Ships with the surrounding
//! signal toolbox: corrector application, sine-squared band filtering, time
//! windowing, tapering, gather operations, f-x and f-k spectra and a
//! dispersion-curve picker.
//!
//! Trace gathers are `ndarray` arrays of `f32`, one trace per row. All
//! operations are pure synchronous functions over in-memory data.

use thiserror::Error;

pub mod dispersion;
pub mod estimate;
pub mod filter;
pub mod ops;
pub mod spectrum;
pub mod synth;
pub mod taper;
pub mod window;

// Re-export main types
pub use dispersion::pick_dispersion_curve;
pub use estimate::{apply_corrector, estimate_source, SourceEstimate};
pub use filter::{sine_squared_filter, sine_squared_response};
pub use ops::{normalize, remove_mean, stack, NormalizeMode};
pub use rustfft::num_complex::Complex;
pub use spectrum::{amplitude_spectrum, bin_freqs, fk_spectrum};
pub use synth::{ricker, synthetic_gather, SynthConfig};
pub use taper::{time_taper, TaperKind};
pub use window::time_window;

/// Errors raised by the inversion and signal routines.
#[derive(Debug, Error)]
pub enum SrcInvError {
    /// Input dimensions disagree. Raised before any output is produced.
    #[error("{context} shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch {
        context: &'static str,
        expected: usize,
        got: usize,
    },

    /// A scalar argument is out of range for the operation.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The FFT backend rejected a buffer.
    #[error("fft failed: {0}")]
    Fft(String),
}
