//! Dispersion-curve picking on a velocity-frequency panel.

use log::debug;
use ndarray::{Array2, ArrayView1, ArrayView2};

use crate::SrcInvError;

/// Pick the maximum-energy velocity per frequency column of a dispersion
/// panel.
///
/// `panel` has one row per velocity and one column per frequency, with
/// non-negative amplitudes; `velocities` and `freqs` are its uniformly
/// spaced axes. Picking starts at the column holding `fseed`, seeded at
/// velocity `vseed`, and walks outward to both panel edges. Each pick is the
/// column maximum within `vdelta` (in velocity units) of the previous pick,
/// which keeps the curve from jumping between modes.
///
/// Returns an `(n_freqs, 2)` array of `(frequency, velocity)` rows in
/// column order.
pub fn pick_dispersion_curve(
    panel: ArrayView2<f32>,
    freqs: &[f32],
    velocities: &[f32],
    fseed: f32,
    vseed: f32,
    vdelta: f32,
) -> Result<Array2<f32>, SrcInvError> {
    let (nv, nw) = panel.dim();
    if nv == 0 || nw == 0 {
        return Err(SrcInvError::InvalidParameter(
            "dispersion panel is empty".to_string(),
        ));
    }
    if velocities.len() != nv {
        return Err(SrcInvError::ShapeMismatch {
            context: "velocity axis",
            expected: nv,
            got: velocities.len(),
        });
    }
    if freqs.len() != nw {
        return Err(SrcInvError::ShapeMismatch {
            context: "frequency axis",
            expected: nw,
            got: freqs.len(),
        });
    }
    if nv < 2 || nw < 2 {
        return Err(SrcInvError::InvalidParameter(
            "dispersion axes need at least 2 bins".to_string(),
        ));
    }
    let dv = velocities[1] - velocities[0];
    let dw = freqs[1] - freqs[0];
    if dv <= 0.0 || dw <= 0.0 {
        return Err(SrcInvError::InvalidParameter(
            "dispersion axes must increase".to_string(),
        ));
    }
    if vdelta <= 0.0 {
        return Err(SrcInvError::InvalidParameter(format!(
            "pick window must be positive, got {vdelta}"
        )));
    }
    if vseed < velocities[0] || fseed < freqs[0] {
        return Err(SrcInvError::InvalidParameter(
            "pick seed lies outside the panel".to_string(),
        ));
    }
    let iv_seed = ((vseed - velocities[0]) / dv) as usize;
    let iw_seed = ((fseed - freqs[0]) / dw) as usize;
    if iv_seed >= nv || iw_seed >= nw {
        return Err(SrcInvError::InvalidParameter(
            "pick seed lies outside the panel".to_string(),
        ));
    }
    // Clamped so center + half cannot overflow for arbitrarily wide windows.
    let half = ((vdelta / dv) as usize).min(nv) + 1;

    debug!("picking dispersion curve over {nw} columns, seed column {iw_seed}");

    let seed_pick = window_argmax(panel.column(iw_seed), iv_seed, half);

    let mut curve = Array2::zeros((nw, 2));
    let mut prev = seed_pick;
    for iw in (0..=iw_seed).rev() {
        let pick = window_argmax(panel.column(iw), prev, half);
        curve[[iw, 0]] = freqs[iw];
        curve[[iw, 1]] = velocities[pick];
        prev = pick;
    }
    prev = seed_pick;
    for iw in iw_seed + 1..nw {
        let pick = window_argmax(panel.column(iw), prev, half);
        curve[[iw, 0]] = freqs[iw];
        curve[[iw, 1]] = velocities[pick];
        prev = pick;
    }
    Ok(curve)
}

/// Index of the largest value within `half` bins of `center`, first match
/// on ties.
fn window_argmax(column: ArrayView1<f32>, center: usize, half: usize) -> usize {
    let lo = center.saturating_sub(half);
    let hi = (center + half).min(column.len() - 1);
    let mut best = lo;
    for i in lo..=hi {
        if column[i] > column[best] {
            best = i;
        }
    }
    best
}
