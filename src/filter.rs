//! Zero-phase sine-squared frequency filtering.
//!
//! The filter is a polygonal amplitude response over frequency breakpoints,
//! with sine-squared ramps between them, applied per trace in the frequency
//! domain. Follows the sufilter convention of Seismic Unix.

use log::debug;
use ndarray::{Array2, ArrayView2};

use crate::spectrum::{gather_inverse, gather_spectra, spectrum_len};
use crate::SrcInvError;

/// Build the `ns / 2 + 1` point amplitude response of a sine-squared filter.
///
/// `freqs` are strictly increasing breakpoint frequencies in Hz, `amps` the
/// amplitude at each breakpoint. Breakpoints snap to integer frequency bins.
/// The response is flat at `amps[0]` below the first breakpoint and at the
/// last amplitude above the last one.
pub fn sine_squared_response(
    ns: usize,
    dt: f32,
    freqs: &[f32],
    amps: &[f32],
) -> Result<Vec<f32>, SrcInvError> {
    if ns < 2 {
        return Err(SrcInvError::InvalidParameter(format!(
            "trace length must be at least 2 samples, got {ns}"
        )));
    }
    if dt <= 0.0 {
        return Err(SrcInvError::InvalidParameter(format!(
            "time sampling must be positive, got {dt}"
        )));
    }
    if amps.len() != freqs.len() {
        return Err(SrcInvError::ShapeMismatch {
            context: "filter amplitudes",
            expected: freqs.len(),
            got: amps.len(),
        });
    }
    if freqs.len() < 2 {
        return Err(SrcInvError::InvalidParameter(format!(
            "filter needs at least 2 breakpoints, got {}",
            freqs.len()
        )));
    }
    let nyquist = 0.5 / dt;
    for pair in freqs.windows(2) {
        if pair[1] <= pair[0] {
            return Err(SrcInvError::InvalidParameter(format!(
                "filter frequencies must increase, got {} after {}",
                pair[1], pair[0]
            )));
        }
    }
    if freqs[0] < 0.0 || freqs[freqs.len() - 1] > nyquist {
        return Err(SrcInvError::InvalidParameter(format!(
            "filter frequencies must lie in 0..={nyquist} Hz"
        )));
    }

    let nfft = spectrum_len(ns);
    let df = 1.0 / (ns as f64 * dt as f64);
    let bins: Vec<usize> = freqs.iter().map(|&f| (f as f64 / df) as usize).collect();

    let mut response = vec![0.0f32; nfft];
    for slot in response.iter_mut().take(bins[0]) {
        *slot = amps[0];
    }
    for seg in 0..bins.len() - 1 {
        let b0 = bins[seg];
        let b1 = bins[seg + 1];
        if b1 == b0 {
            continue;
        }
        let a0 = amps[seg] as f64;
        let a1 = amps[seg + 1] as f64;
        let c = 0.5 * std::f64::consts::PI / (b1 - b0) as f64;
        for k in b0..b1 {
            let s = (c * (k - b0) as f64).sin();
            response[k] = if a0 < a1 {
                (a0 + (a1 - a0) * s * s) as f32
            } else if a0 > a1 {
                (a0 - (a0 - a1) * s * s) as f32
            } else {
                amps[seg]
            };
        }
    }
    for slot in response.iter_mut().skip(bins[bins.len() - 1]) {
        *slot = amps[amps.len() - 1];
    }
    Ok(response)
}

/// Filter every trace of a gather with a sine-squared amplitude response.
pub fn sine_squared_filter(
    traces: ArrayView2<f32>,
    dt: f32,
    freqs: &[f32],
    amps: &[f32],
) -> Result<Array2<f32>, SrcInvError> {
    let (n_traces, ns) = traces.dim();
    if n_traces == 0 {
        return Err(SrcInvError::InvalidParameter(
            "gather has no traces".to_string(),
        ));
    }
    let response = sine_squared_response(ns, dt, freqs, amps)?;

    debug!(
        "filtering {n_traces} traces of {ns} samples with {} breakpoints",
        freqs.len()
    );

    let mut spectra = gather_spectra(traces)?;
    for itrace in 0..n_traces {
        for (k, &r) in response.iter().enumerate() {
            spectra[[itrace, k]] *= r;
        }
    }
    gather_inverse(&spectra, ns)
}
