//! Edge tapering of trace gathers.

use ndarray::{Array2, ArrayView2};

use crate::SrcInvError;

/// Shape of the taper ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaperKind {
    Linear,
    Sine,
    Cosine,
}

impl TaperKind {
    fn weight(self, i: usize, w: usize) -> f32 {
        let x = i as f32 / w as f32;
        match self {
            TaperKind::Linear => x,
            TaperKind::Sine => (0.5 * std::f32::consts::PI * x).sin(),
            TaperKind::Cosine => 1.0 - (0.5 * std::f32::consts::PI * x).cos(),
        }
    }
}

/// Taper the start and end of every trace to zero.
///
/// `tbeg_ms` and `tend_ms` are the taper lengths in milliseconds at the
/// trace start and end. A zero length leaves that edge untouched.
pub fn time_taper(
    traces: ArrayView2<f32>,
    dt: f32,
    tbeg_ms: f32,
    tend_ms: f32,
    kind: TaperKind,
) -> Result<Array2<f32>, SrcInvError> {
    if dt <= 0.0 {
        return Err(SrcInvError::InvalidParameter(format!(
            "time sampling must be positive, got {dt}"
        )));
    }
    if tbeg_ms < 0.0 || tend_ms < 0.0 {
        return Err(SrcInvError::InvalidParameter(format!(
            "taper lengths must not be negative, got {tbeg_ms} and {tend_ms} ms"
        )));
    }
    let (_, ns) = traces.dim();
    let wbeg = (tbeg_ms * 1e-3 / dt).round() as usize;
    let wend = (tend_ms * 1e-3 / dt).round() as usize;
    if wbeg > ns || wend > ns {
        return Err(SrcInvError::InvalidParameter(format!(
            "taper of {} samples exceeds trace length {ns}",
            wbeg.max(wend)
        )));
    }

    let mut out = traces.to_owned();
    for mut row in out.rows_mut() {
        for i in 0..wbeg {
            row[i] *= kind.weight(i, wbeg);
        }
        for j in 0..wend {
            row[ns - 1 - j] *= kind.weight(j, wend);
        }
    }
    Ok(out)
}
