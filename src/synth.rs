//! Synthetic gather generation for demos and tests.
//!
//! Builds deterministic shot gathers from a convolutional model: a Ricker
//! wavelet delayed by linear moveout per trace, with optional seeded
//! Gaussian noise.

use ndarray::{Array1, Array2};
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

/// Ricker wavelet with peak frequency `f0` Hz, centered at `t0 = 1.2 / f0`.
pub fn ricker(ns: usize, dt: f32, f0: f32) -> Array1<f32> {
    let t0 = 1.2 / f0;
    Array1::from_iter((0..ns).map(|i| {
        let tau = i as f32 * dt - t0;
        let arg = (std::f32::consts::PI * f0 * tau).powi(2);
        (1.0 - 2.0 * arg) * (-arg).exp()
    }))
}

/// Synthetic gather configuration
#[derive(Clone)]
pub struct SynthConfig {
    pub n_traces: usize,
    pub ns: usize,
    pub dt: f32,
    pub f0: f32,
    pub velocity: f32,
    pub dx: f32,
    pub noise_sigma: f32,
    pub seed: u64,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            n_traces: 8,
            ns: 256,
            dt: 0.001,
            f0: 25.0,
            velocity: 1500.0,
            dx: 10.0,
            noise_sigma: 0.0,
            seed: 42,
        }
    }
}

/// Build a gather of moveout-delayed copies of `wavelet`.
///
/// Trace `i` sits at offset `i * dx` and is delayed by `offset / velocity`
/// seconds, rounded to the nearest sample. Same seed, same gather.
pub fn synthetic_gather(config: &SynthConfig, wavelet: &Array1<f32>) -> Array2<f32> {
    let mut traces = Array2::zeros((config.n_traces, config.ns));
    for itrace in 0..config.n_traces {
        let offset = itrace as f32 * config.dx;
        let delay = (offset / config.velocity / config.dt).round() as usize;
        for t in delay..config.ns {
            if t - delay < wavelet.len() {
                traces[[itrace, t]] = wavelet[t - delay];
            }
        }
    }

    if config.noise_sigma > 0.0 {
        let mut rng = rand::rngs::StdRng::seed_from_u64(config.seed);
        let noise_dist = Normal::new(0.0f32, config.noise_sigma).unwrap();
        for x in traces.iter_mut() {
            *x += noise_dist.sample(&mut rng);
        }
    }

    traces
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_ricker_peak() {
        // Peak value 1 at t0 = 1.2 / f0, which is sample 48 at 1 ms.
        let w = ricker(256, 0.001, 25.0);
        assert_abs_diff_eq!(w[48], 1.0, epsilon = 1e-6);
        for (i, value) in w.iter().enumerate() {
            assert!(*value <= w[48] + 1e-6, "sample {i} above peak");
        }
    }

    #[test]
    fn test_gather_moveout() {
        let config = SynthConfig {
            n_traces: 4,
            ns: 128,
            ..Default::default()
        };
        let wavelet = ricker(config.ns, config.dt, config.f0);
        let gather = synthetic_gather(&config, &wavelet);
        assert_eq!(gather.dim(), (4, 128));
        // 10 m offset at 1500 m/s is 6.67 ms, rounded to 7 samples.
        assert_abs_diff_eq!(gather[[0, 48]], 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(gather[[1, 55]], 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(gather[[2, 61]], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_gather_deterministic() {
        let config = SynthConfig {
            noise_sigma: 0.1,
            ..Default::default()
        };
        let wavelet = ricker(config.ns, config.dt, config.f0);
        let a = synthetic_gather(&config, &wavelet);
        let b = synthetic_gather(&config, &wavelet);
        assert_eq!(a, b);

        let other = SynthConfig {
            noise_sigma: 0.1,
            seed: 7,
            ..Default::default()
        };
        let c = synthetic_gather(&other, &wavelet);
        assert_ne!(a, c);
    }
}
