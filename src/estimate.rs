//! Linear source signature inversion in the frequency domain.
//!
//! Given modelled traces, observed traces and the reference source used for
//! modelling, the inversion builds a per-bin corrector spectrum from the
//! cross and auto spectral sums over all traces, then maps the reference
//! source through its conjugate to get the estimated source.

use log::debug;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use rustfft::num_complex::Complex;

use crate::spectrum::{forward, gather_inverse, gather_spectra, inverse, spectrum_len};
use crate::SrcInvError;

/// Result of a source inversion.
#[derive(Debug, Clone)]
pub struct SourceEstimate {
    /// Estimated source wavelet, `ns` time samples.
    pub wavelet: Array1<f32>,
    /// Complex corrector spectrum, `ns / 2 + 1` bins.
    pub corrector: Array1<Complex<f32>>,
}

/// Estimate the effective source wavelet of a gather.
///
/// `calculated` and `observed` must have the same shape, one trace per row,
/// with rows pairing the modelled and recorded versions of the same trace.
/// `reference` is the source wavelet the modelled traces were computed with
/// and must match the trace length.
///
/// Per frequency bin the corrector is the ratio of the trace-summed cross
/// spectrum `sum(cal * conj(obs))` to the trace-summed auto spectrum
/// `sum(cal * conj(cal))`. Bins with zero auto spectrum carry no information
/// about the source and are left at zero in both outputs instead of
/// dividing by zero.
pub fn estimate_source(
    calculated: ArrayView2<f32>,
    observed: ArrayView2<f32>,
    reference: ArrayView1<f32>,
) -> Result<SourceEstimate, SrcInvError> {
    let (n_traces, ns) = calculated.dim();
    let (obs_traces, obs_ns) = observed.dim();
    if obs_traces != n_traces {
        return Err(SrcInvError::ShapeMismatch {
            context: "observed trace count",
            expected: n_traces,
            got: obs_traces,
        });
    }
    if obs_ns != ns {
        return Err(SrcInvError::ShapeMismatch {
            context: "observed trace length",
            expected: ns,
            got: obs_ns,
        });
    }
    if reference.len() != ns {
        return Err(SrcInvError::ShapeMismatch {
            context: "reference source length",
            expected: ns,
            got: reference.len(),
        });
    }
    if n_traces == 0 {
        return Err(SrcInvError::InvalidParameter(
            "gather has no traces".to_string(),
        ));
    }
    if ns < 2 {
        return Err(SrcInvError::InvalidParameter(format!(
            "trace length must be at least 2 samples, got {ns}"
        )));
    }

    debug!("estimating source over {n_traces} traces of {ns} samples");

    let cal_spectra = gather_spectra(calculated)?;
    let obs_spectra = gather_spectra(observed)?;
    let ref_spectrum = forward(&reference.to_vec())?;
    let nfft = spectrum_len(ns);

    // Trace-summed cross and auto spectra, accumulated in trace order.
    let zero = Complex::new(0.0f32, 0.0);
    let mut num = vec![zero; nfft];
    let mut den = vec![zero; nfft];
    for itrace in 0..n_traces {
        for k in 0..nfft {
            let cal = cal_spectra[[itrace, k]];
            num[k] += cal * obs_spectra[[itrace, k]].conj();
            den[k] += cal * cal.conj();
        }
    }

    let mut corrector = vec![zero; nfft];
    let mut est_spectrum = vec![zero; nfft];
    for k in 0..nfft {
        if den[k] == zero {
            continue;
        }
        corrector[k] = num[k] / den[k];
        est_spectrum[k] = ref_spectrum[k] * corrector[k].conj();
    }

    let wavelet = inverse(&est_spectrum, ns)?;
    Ok(SourceEstimate {
        wavelet: Array1::from(wavelet),
        corrector: Array1::from(corrector),
    })
}

/// Apply a corrector spectrum to a gather.
///
/// Multiplies every trace spectrum by the conjugate of the corrector and
/// transforms back to the time domain, the same mapping the inversion uses
/// to carry the reference source onto the estimate.
pub fn apply_corrector(
    traces: ArrayView2<f32>,
    corrector: ArrayView1<Complex<f32>>,
) -> Result<Array2<f32>, SrcInvError> {
    let (n_traces, ns) = traces.dim();
    if n_traces == 0 {
        return Err(SrcInvError::InvalidParameter(
            "gather has no traces".to_string(),
        ));
    }
    if ns < 2 {
        return Err(SrcInvError::InvalidParameter(format!(
            "trace length must be at least 2 samples, got {ns}"
        )));
    }
    if corrector.len() != spectrum_len(ns) {
        return Err(SrcInvError::ShapeMismatch {
            context: "corrector spectrum",
            expected: spectrum_len(ns),
            got: corrector.len(),
        });
    }

    debug!("applying corrector to {n_traces} traces of {ns} samples");

    let mut spectra = gather_spectra(traces)?;
    for itrace in 0..n_traces {
        for (k, c) in corrector.iter().enumerate() {
            spectra[[itrace, k]] *= c.conj();
        }
    }
    gather_inverse(&spectra, ns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{Array1, Array2};

    fn ramp_gather(n_traces: usize, ns: usize) -> Array2<f32> {
        let mut g = Array2::zeros((n_traces, ns));
        for i in 0..n_traces {
            for t in 0..ns {
                g[[i, t]] = ((i + 1) * (t + 3)) as f32 * 0.01;
            }
        }
        g
    }

    #[test]
    fn test_output_shapes() {
        let cal = ramp_gather(3, 32);
        let reference = Array1::from_elem(32, 0.5f32);
        let est = estimate_source(cal.view(), cal.view(), reference.view()).unwrap();
        assert_eq!(est.wavelet.len(), 32);
        assert_eq!(est.corrector.len(), 17);
    }

    #[test]
    fn test_identity_when_observed_matches_calculated() {
        let cal = ramp_gather(4, 64);
        let reference = ricker_like(64);
        let est = estimate_source(cal.view(), cal.view(), reference.view()).unwrap();
        for c in est.corrector.iter() {
            assert_abs_diff_eq!(c.re, 1.0, epsilon = 1e-4);
            assert_abs_diff_eq!(c.im, 0.0, epsilon = 1e-4);
        }
        for (w, r) in est.wavelet.iter().zip(reference.iter()) {
            assert_abs_diff_eq!(*w, *r, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_zero_calculated_gives_zero_outputs() {
        let cal = Array2::zeros((3, 16));
        let obs = ramp_gather(3, 16);
        let reference = Array1::from_elem(16, 1.0f32);
        let est = estimate_source(cal.view(), obs.view(), reference.view()).unwrap();
        for c in est.corrector.iter() {
            assert_eq!(c.re, 0.0);
            assert_eq!(c.im, 0.0);
        }
        for w in est.wavelet.iter() {
            assert_eq!(*w, 0.0);
            assert!(w.is_finite());
        }
    }

    #[test]
    fn test_scale_factor_recovery() {
        let cal = ramp_gather(2, 32);
        let obs = cal.mapv(|x| 2.5 * x);
        let reference = ricker_like(32);
        let est = estimate_source(cal.view(), obs.view(), reference.view()).unwrap();
        for c in est.corrector.iter() {
            assert_abs_diff_eq!(c.re, 2.5, epsilon = 1e-3);
            assert_abs_diff_eq!(c.im, 0.0, epsilon = 1e-3);
        }
        for (w, r) in est.wavelet.iter().zip(reference.iter()) {
            assert_abs_diff_eq!(*w, 2.5 * *r, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_single_impulse_trace() {
        // Impulse at t=0 for one 8-sample trace: flat unit spectra on both
        // sides, so every one of the 5 corrector bins is exactly one.
        let mut cal = Array2::zeros((1, 8));
        cal[[0, 0]] = 1.0;
        let mut reference = Array1::zeros(8);
        reference[0] = 1.0;
        let est = estimate_source(cal.view(), cal.view(), reference.view()).unwrap();
        assert_eq!(est.corrector.len(), 5);
        for c in est.corrector.iter() {
            assert_abs_diff_eq!(c.re, 1.0, epsilon = 1e-6);
            assert_abs_diff_eq!(c.im, 0.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_multi_trace_accumulation() {
        // Traces are scaled copies of one base trace: cal row r is b_r * base
        // and obs row r is g_r * base, so every bin of the corrector equals
        // sum(b_r * g_r) / sum(b_r^2).
        let ns = 16;
        let base: Vec<f32> = (0..ns).map(|t| (t as f32 * 0.9).sin() + 0.2).collect();
        let b = [1.0f32, 2.0, -1.5, 0.5];
        let g = [0.5f32, 1.0, 2.0, -1.0];
        let mut cal = Array2::zeros((4, ns));
        let mut obs = Array2::zeros((4, ns));
        for r in 0..4 {
            for t in 0..ns {
                cal[[r, t]] = b[r] * base[t];
                obs[[r, t]] = g[r] * base[t];
            }
        }
        let expected: f32 = b.iter().zip(g.iter()).map(|(&x, &y)| x * y).sum::<f32>()
            / b.iter().map(|&x| x * x).sum::<f32>();
        let reference = Array1::from(base);
        let est = estimate_source(cal.view(), obs.view(), reference.view()).unwrap();
        for c in est.corrector.iter() {
            assert_abs_diff_eq!(c.re, expected, epsilon = 1e-4);
            assert_abs_diff_eq!(c.im, 0.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_consistent_traces_dominate() {
        // Four impulse traces, three observed exactly as modelled and one
        // observed 10x too strong. Impulse spectra are flat ones, so every
        // bin accumulates num = 3 * 1 + 10 and den = 4, putting the
        // corrector at 3.25, far closer to the consistent unit ratio than
        // to the outlier's.
        let ns = 16;
        let mut cal = Array2::zeros((4, ns));
        for r in 0..4 {
            cal[[r, 0]] = 1.0;
        }
        let mut obs = cal.clone();
        obs[[3, 0]] = 10.0;
        let mut reference = Array1::zeros(ns);
        reference[0] = 1.0;
        let est = estimate_source(cal.view(), obs.view(), reference.view()).unwrap();
        let expected: f32 = (3.0 * 1.0 + 10.0) / 4.0;
        for c in est.corrector.iter() {
            assert_abs_diff_eq!(c.re, expected, epsilon = 1e-6);
            assert_abs_diff_eq!(c.im, 0.0, epsilon = 1e-6);
            assert!((c.re - 1.0).abs() < (10.0 - c.re).abs());
        }
    }

    #[test]
    fn test_deterministic_outputs() {
        let cal = ramp_gather(3, 32);
        let obs = cal.mapv(|x| x * 1.3 + 0.01);
        let reference = ricker_like(32);
        let a = estimate_source(cal.view(), obs.view(), reference.view()).unwrap();
        let b = estimate_source(cal.view(), obs.view(), reference.view()).unwrap();
        assert_eq!(a.wavelet.to_vec(), b.wavelet.to_vec());
        assert_eq!(a.corrector.to_vec(), b.corrector.to_vec());
    }

    #[test]
    fn test_shape_mismatch_errors() {
        let cal = ramp_gather(3, 32);
        let obs = ramp_gather(2, 32);
        let reference = Array1::from_elem(32, 1.0f32);
        assert!(estimate_source(cal.view(), obs.view(), reference.view()).is_err());

        let obs = ramp_gather(3, 16);
        assert!(estimate_source(cal.view(), obs.view(), reference.view()).is_err());

        let short_ref = Array1::from_elem(8, 1.0f32);
        assert!(estimate_source(cal.view(), cal.view(), short_ref.view()).is_err());

        let empty = Array2::zeros((0, 32));
        let obs = Array2::zeros((0, 32));
        assert!(estimate_source(empty.view(), obs.view(), reference.view()).is_err());
    }

    #[test]
    fn test_apply_corrector_recovers_observed() {
        // With obs = 2.0 * cal the corrector is the constant 2, so applying
        // it to the calculated gather reproduces the observed one.
        let cal = ramp_gather(3, 32);
        let obs = cal.mapv(|x| 2.0 * x);
        let reference = ricker_like(32);
        let est = estimate_source(cal.view(), obs.view(), reference.view()).unwrap();
        let corrected = apply_corrector(cal.view(), est.corrector.view()).unwrap();
        for (c, o) in corrected.iter().zip(obs.iter()) {
            assert_abs_diff_eq!(*c, *o, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_apply_corrector_length_mismatch() {
        let traces = ramp_gather(2, 32);
        let corrector = Array1::from_elem(9, Complex::new(1.0f32, 0.0));
        assert!(apply_corrector(traces.view(), corrector.view()).is_err());
    }

    fn ricker_like(ns: usize) -> Array1<f32> {
        let f0 = 25.0f32;
        let dt = 0.002f32;
        let t0 = 1.2 / f0;
        Array1::from_iter((0..ns).map(|i| {
            let tau = i as f32 * dt - t0;
            let arg = (std::f32::consts::PI * f0 * tau).powi(2);
            (1.0 - 2.0 * arg) * (-arg).exp()
        }))
    }
}
