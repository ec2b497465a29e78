//! Dextrose blend solver
//!
//! The blend mixes two dextrose concentrations to hit the target glucose
//! delivery. Writing `P` for the dextrose percentage and `G` for the
//! glucose delivered via TPN — both committed by the *previous* pass, see
//! the feedback notes on [`recalculate`](super::recalculate) — the pair of
//! volumes `(low, high)` solves
//!
//! ```text
//! low + high         = P
//! l·low  + h·high    = 10·G
//! ```
//!
//! where `l` is 0.5 when the 5% concentration is selected (0 otherwise) and
//! `h` is 12.5 when the 25% concentration is selected (5 otherwise). The
//! system is inverted by Cramer's rule on the 2x2 coefficient matrix; its
//! determinant `h - l` is the denominator of the closed form, so a singular
//! matrix and a vanishing denominator are the same condition and both
//! resolve `low` to 0. Volumes are clamped to be non-negative, with `high`
//! derived from the unclamped `low`.

use nalgebra::Matrix2;

use super::types::DextroseBlend;
use crate::order::DextroseSelection;

/// Resolve the dextrose blend for a selection and the previous pass's
/// committed glucose figures
///
/// Only the 5% and 25% selections enter the solver; a pass running under
/// 10% or 50% resolves both volumes to 0. The committed `volume` is the
/// low-pair volume for {5%, 10%} selections and the high-pair volume for
/// {25%, 50%}.
pub fn resolve_blend(
    selection: DextroseSelection,
    tpn_glucose_prev: f64,
    dextrose_pct_prev: f64,
) -> DextroseBlend {
    let low_sel = selection == DextroseSelection::Five;
    let high_sel = selection == DextroseSelection::TwentyFive;

    if !low_sel && !high_sel {
        return DextroseBlend {
            low_volume: 0.0,
            high_volume: 0.0,
            volume: 0.0,
            selection,
        };
    }

    let l = if low_sel { 0.5 } else { 0.0 };
    let h = 5.0 * if high_sel { 2.5 } else { 1.0 };

    let coefficients = Matrix2::new(1.0, 1.0, l, h);
    let determinant = coefficients.determinant();

    let low = if determinant != 0.0 {
        Matrix2::new(dextrose_pct_prev, 1.0, 10.0 * tpn_glucose_prev, h).determinant()
            / determinant
    } else {
        0.0
    };
    let high = dextrose_pct_prev - low;

    let low = low.max(0.0);
    let high = high.max(0.0);
    let volume = if selection.is_low_pair() { low } else { high };

    DextroseBlend {
        low_volume: low,
        high_volume: high,
        volume,
        selection,
    }
}
