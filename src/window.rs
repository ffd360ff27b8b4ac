//! Time windowing of trace gathers.

use ndarray::{s, Array2, ArrayView2};

use crate::SrcInvError;

/// Extract the samples between `tmin` and `tmax` seconds from every trace.
///
/// `delay` is the recording delay of the first sample; both window ends are
/// kept, so the output has `int((tmax + delay) / dt) - int((tmin + delay) /
/// dt) + 1` samples per trace.
pub fn time_window(
    traces: ArrayView2<f32>,
    dt: f32,
    delay: f32,
    tmin: f32,
    tmax: f32,
) -> Result<Array2<f32>, SrcInvError> {
    if dt <= 0.0 {
        return Err(SrcInvError::InvalidParameter(format!(
            "time sampling must be positive, got {dt}"
        )));
    }
    if tmax <= tmin {
        return Err(SrcInvError::InvalidParameter(format!(
            "window end {tmax} s must come after start {tmin} s"
        )));
    }
    if tmin + delay < 0.0 {
        return Err(SrcInvError::InvalidParameter(format!(
            "window start {tmin} s lies before the first sample"
        )));
    }
    let (_, ns) = traces.dim();
    let start = ((tmin as f64 + delay as f64) / dt as f64) as usize;
    let end = ((tmax as f64 + delay as f64) / dt as f64) as usize;
    if end >= ns {
        return Err(SrcInvError::InvalidParameter(format!(
            "window end {tmax} s lies beyond the last sample"
        )));
    }
    Ok(traces.slice(s![.., start..=end]).to_owned())
}
