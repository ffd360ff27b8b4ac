//! Real FFT plumbing and spectral transforms of trace gathers.
//!
//! Forward transforms are unnormalized; inverse transforms scale by `1/n` so
//! a forward/inverse round trip reproduces the input.

use ndarray::{Array2, ArrayView2};
use realfft::RealFftPlanner;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use crate::SrcInvError;

/// Number of bins in the spectrum of an `ns`-sample real trace.
pub fn spectrum_len(ns: usize) -> usize {
    ns / 2 + 1
}

/// Bin center frequencies of an `ns`-sample trace sampled at `dt` seconds.
pub fn bin_freqs(ns: usize, dt: f32) -> Result<Vec<f32>, SrcInvError> {
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
    let df = 1.0 / (ns as f32 * dt);
    Ok((0..spectrum_len(ns)).map(|k| k as f32 * df).collect())
}

/// Unnormalized forward real FFT of a single trace.
pub fn forward(trace: &[f32]) -> Result<Vec<Complex<f32>>, SrcInvError> {
    let ns = trace.len();
    if ns < 2 {
        return Err(SrcInvError::InvalidParameter(format!(
            "trace length must be at least 2 samples, got {ns}"
        )));
    }
    let mut planner = RealFftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(ns);
    let mut input = trace.to_vec();
    let mut spectrum = vec![Complex::new(0.0, 0.0); spectrum_len(ns)];
    fft.process(&mut input, &mut spectrum)
        .map_err(|e| SrcInvError::Fft(e.to_string()))?;
    Ok(spectrum)
}

/// Inverse real FFT back to `ns` time samples, scaled by `1/ns`.
pub fn inverse(spectrum: &[Complex<f32>], ns: usize) -> Result<Vec<f32>, SrcInvError> {
    if ns < 2 {
        return Err(SrcInvError::InvalidParameter(format!(
            "trace length must be at least 2 samples, got {ns}"
        )));
    }
    if spectrum.len() != spectrum_len(ns) {
        return Err(SrcInvError::ShapeMismatch {
            context: "spectrum",
            expected: spectrum_len(ns),
            got: spectrum.len(),
        });
    }
    let mut planner = RealFftPlanner::<f32>::new();
    let ifft = planner.plan_fft_inverse(ns);
    let mut input = spectrum.to_vec();
    let mut output = vec![0.0f32; ns];
    ifft.process(&mut input, &mut output)
        .map_err(|e| SrcInvError::Fft(e.to_string()))?;
    let scale = 1.0 / ns as f32;
    for x in output.iter_mut() {
        *x *= scale;
    }
    Ok(output)
}

/// Forward real FFT of every row of a gather. Callers validate shapes.
pub(crate) fn gather_spectra(
    traces: ArrayView2<f32>,
) -> Result<Array2<Complex<f32>>, SrcInvError> {
    let (n_traces, ns) = traces.dim();
    let nfft = spectrum_len(ns);
    let mut planner = RealFftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(ns);
    let mut input = vec![0.0f32; ns];
    let mut output = vec![Complex::new(0.0f32, 0.0); nfft];
    let mut spectra = Array2::from_elem((n_traces, nfft), Complex::new(0.0f32, 0.0));
    for (itrace, row) in traces.rows().into_iter().enumerate() {
        for (dst, src) in input.iter_mut().zip(row.iter()) {
            *dst = *src;
        }
        fft.process(&mut input, &mut output)
            .map_err(|e| SrcInvError::Fft(e.to_string()))?;
        for (k, value) in output.iter().enumerate() {
            spectra[[itrace, k]] = *value;
        }
    }
    Ok(spectra)
}

/// Inverse real FFT of every row of a spectrum gather, scaled by `1/ns`.
pub(crate) fn gather_inverse(
    spectra: &Array2<Complex<f32>>,
    ns: usize,
) -> Result<Array2<f32>, SrcInvError> {
    let (n_traces, nfft) = spectra.dim();
    if nfft != spectrum_len(ns) {
        return Err(SrcInvError::ShapeMismatch {
            context: "spectrum",
            expected: spectrum_len(ns),
            got: nfft,
        });
    }
    let mut planner = RealFftPlanner::<f32>::new();
    let ifft = planner.plan_fft_inverse(ns);
    let mut input = vec![Complex::new(0.0f32, 0.0); nfft];
    let mut output = vec![0.0f32; ns];
    let scale = 1.0 / ns as f32;
    let mut traces = Array2::zeros((n_traces, ns));
    for (itrace, row) in spectra.rows().into_iter().enumerate() {
        for (dst, src) in input.iter_mut().zip(row.iter()) {
            *dst = *src;
        }
        ifft.process(&mut input, &mut output)
            .map_err(|e| SrcInvError::Fft(e.to_string()))?;
        for (t, value) in output.iter().enumerate() {
            traces[[itrace, t]] = *value * scale;
        }
    }
    Ok(traces)
}

/// Per-trace amplitude spectra (f-x panel) and the frequency axis.
pub fn amplitude_spectrum(
    traces: ArrayView2<f32>,
    dt: f32,
) -> Result<(Array2<f32>, Vec<f32>), SrcInvError> {
    let (n_traces, ns) = traces.dim();
    if n_traces == 0 {
        return Err(SrcInvError::InvalidParameter(
            "gather has no traces".to_string(),
        ));
    }
    let freqs = bin_freqs(ns, dt)?;
    let spectra = gather_spectra(traces)?;
    Ok((spectra.mapv(|c| c.norm()), freqs))
}

/// Frequency-wavenumber amplitude panel of a gather with trace spacing `dx`.
///
/// Rows run from the most negative to the most positive wavenumber (zero
/// centered), columns from zero frequency to Nyquist. Returns the panel and
/// both axes.
pub fn fk_spectrum(
    traces: ArrayView2<f32>,
    dt: f32,
    dx: f32,
) -> Result<(Array2<f32>, Vec<f32>, Vec<f32>), SrcInvError> {
    let (n_traces, ns) = traces.dim();
    if n_traces == 0 {
        return Err(SrcInvError::InvalidParameter(
            "gather has no traces".to_string(),
        ));
    }
    if dx <= 0.0 {
        return Err(SrcInvError::InvalidParameter(format!(
            "trace spacing must be positive, got {dx}"
        )));
    }
    let freqs = bin_freqs(ns, dt)?;
    let nfft = freqs.len();

    let spectra = gather_spectra(traces)?;

    // Complex FFT down each frequency column, then center the zero
    // wavenumber with an fftshift of the rows.
    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(n_traces);
    let shift = n_traces / 2;
    let mut column = vec![Complex::new(0.0f32, 0.0); n_traces];
    let mut panel = Array2::zeros((n_traces, nfft));
    for k in 0..nfft {
        for i in 0..n_traces {
            column[i] = spectra[[i, k]];
        }
        fft.process(&mut column);
        for j in 0..n_traces {
            panel[[j, k]] = column[(j + n_traces - shift) % n_traces].norm();
        }
    }

    let wavenumbers = (0..n_traces)
        .map(|j| (j as f32 - shift as f32) / (n_traces as f32 * dx))
        .collect();
    Ok((panel, freqs, wavenumbers))
}
