//! Simple gather operations: mean removal, normalization, stacking.

use ndarray::{Array1, Array2, ArrayView2};

use crate::SrcInvError;

/// Normalization reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeMode {
    /// Divide the whole gather by its maximum absolute amplitude.
    Global,
    /// Divide each trace by its own maximum absolute amplitude.
    PerTrace,
}

/// Subtract each trace's mean from its samples.
pub fn remove_mean(traces: ArrayView2<f32>) -> Array2<f32> {
    let mut out = traces.to_owned();
    for mut row in out.rows_mut() {
        let mean = row.sum() / row.len() as f32;
        row.mapv_inplace(|x| x - mean);
    }
    out
}

/// Normalize amplitudes. Traces with no signal are left untouched.
pub fn normalize(traces: ArrayView2<f32>, mode: NormalizeMode) -> Array2<f32> {
    let mut out = traces.to_owned();
    match mode {
        NormalizeMode::Global => {
            let ampmax = out.iter().fold(0.0f32, |m, &x| m.max(x.abs()));
            if ampmax > 0.0 {
                out.mapv_inplace(|x| x / ampmax);
            }
        }
        NormalizeMode::PerTrace => {
            for mut row in out.rows_mut() {
                let ampmax = row.iter().fold(0.0f32, |m, &x| m.max(x.abs()));
                if ampmax > 0.0 {
                    row.mapv_inplace(|x| x / ampmax);
                }
            }
        }
    }
    out
}

/// Weighted sum of all traces into one.
///
/// `weights` defaults to unit weights; with `mean` the sum is divided by the
/// total weight.
pub fn stack(
    traces: ArrayView2<f32>,
    weights: Option<&[f32]>,
    mean: bool,
) -> Result<Array1<f32>, SrcInvError> {
    let (n_traces, ns) = traces.dim();
    if n_traces == 0 {
        return Err(SrcInvError::InvalidParameter(
            "gather has no traces".to_string(),
        ));
    }
    if let Some(w) = weights {
        if w.len() != n_traces {
            return Err(SrcInvError::ShapeMismatch {
                context: "stack weights",
                expected: n_traces,
                got: w.len(),
            });
        }
    }

    let mut stacked = Array1::zeros(ns);
    for (itrace, row) in traces.rows().into_iter().enumerate() {
        let w = weights.map_or(1.0, |w| w[itrace]);
        for (out, &x) in stacked.iter_mut().zip(row.iter()) {
            *out += w * x;
        }
    }

    if mean {
        let total = weights.map_or(n_traces as f32, |w| w.iter().sum());
        if total == 0.0 {
            return Err(SrcInvError::InvalidParameter(
                "stack weights sum to zero".to_string(),
            ));
        }
        stacked.mapv_inplace(|x| x / total);
    }
    Ok(stacked)
}
