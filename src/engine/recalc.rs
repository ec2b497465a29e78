//! Recalculation orchestrator
//!
//! One pass derives a complete [`Prescription`] from the pair
//! `(current InputSnapshot, previous Prescription)` — and from nothing
//! else. Several quantities are mutually dependent (the dextrose volume
//! depends on the glucose delivered, which depends on the dextrose
//! volume); the cycle is broken by reading those quantities from the
//! *previous* committed prescription instead of solving simultaneously.
//! The feedback fields are:
//!
//! - `glucose.tpn_glucose` — consumed by the blend solver and by the
//!   dextrose-percentage numerator,
//! - `glucose.dextrose_pct` — consumed by the blend solver,
//! - `components.potassium_phosphate` — consumed by the potassium chloride
//!   formula and the phosphate-potassium contribution.
//!
//! Under a constant input the lag closes within a handful of passes;
//! [`TpnEngine::settle`] iterates to that fixed point explicitly.
//!
//! [`TpnEngine`] owns the single committed-prescription cell. Committing is
//! a plain write to that cell and never triggers another pass, so the
//! engine cannot recurse; a recalculation request arriving while a pass is
//! already in flight is ignored and the committed prescription returned
//! unchanged.

use super::calc;
use super::dextrose::resolve_blend;
use super::types::{
    ComponentVolumes, FluidTotals, GlucoseParams, InfusionRates, IntakeParams, IvmContribution,
    Prescription,
};
use crate::error::TpnError;
use crate::order::InputSnapshot;

/// Number of passes [`TpnEngine::settle`] attempts before giving up
pub const DEFAULT_SETTLE_PASSES: usize = 8;

/// Tolerance at which two successive prescriptions count as settled
const SETTLE_TOL: f64 = 1e-9;

/// Derive a new prescription from the current order and the previously
/// committed prescription
///
/// Pure with respect to anything outside its two arguments. Fails only if
/// a derived quantity comes out non-finite, which the committed snapshot
/// must never contain.
pub fn recalculate(
    input: &InputSnapshot,
    previous: &Prescription,
) -> Result<Prescription, TpnError> {
    let dw = input.dosing_weight;

    // Feedback fields, one cycle stale
    let tpn_glucose_prev = previous.glucose.tpn_glucose;
    let dextrose_pct_prev = previous.glucose.dextrose_pct;
    let pot_phos_prev = previous.components.potassium_phosphate;

    // Syringe 1
    let lipid = calc::lipid_volume(dw, input.lipid_req);
    let mvi = calc::mvi_volume(dw, input.lipid_req);
    let cell_protectant = calc::cell_protectant_volume(dw, input.cell_protectant);

    // Syringe 2
    let amino_acid = calc::amino_acid_volume(dw, input.protein_req);
    let sodium_from_ivm = calc::sodium_from_ivm(
        input.saline_fifth_normal,
        input.saline_half_normal,
        input.normal_saline,
        dw,
    );
    let sodium_chloride =
        calc::sodium_chloride_volume(dw, input.sodium_req, input.sodium_source, sodium_from_ivm);
    let potassium_chloride =
        calc::potassium_chloride_volume(dw, input.potassium_req, pot_phos_prev);
    let calcium = calc::calcium_volume(dw, input.calcium_req, input.calcium_via_tpn);
    let magnesium = calc::magnesium_volume(dw, input.magnesium_req);
    let potassium_phosphate = calc::potassium_phosphate_volume(dw, input.phosphate_req);

    // Dextrose blend, from the stale feedback pair
    let dextrose = resolve_blend(input.dextrose, tpn_glucose_prev, dextrose_pct_prev);

    // Totals and totals-derived outputs, from the fresh values above
    let total_volume = calc::total_volume(
        lipid,
        mvi,
        cell_protectant,
        amino_acid,
        sodium_chloride,
        potassium_chloride,
        calcium,
        magnesium,
        dextrose.volume,
    );
    let total_fluid = calc::total_fluid_volume(dw, input.fluid_rate);
    let fluid_for_glucose = calc::fluid_for_glucose(
        total_fluid,
        lipid,
        mvi,
        cell_protectant,
        amino_acid,
        sodium_chloride,
    );
    let ivf_per_kg = calc::ivf_per_kg(input.fluid_rate, input.feed_volume);
    let tpn_glucose = calc::tpn_glucose(input.gir, dw, input.dextrose10_ivm);
    let dextrose_pct = calc::dextrose_percentage(tpn_glucose_prev, total_volume);
    let osmolarity = calc::osmolarity(
        lipid,
        amino_acid,
        sodium_chloride,
        potassium_chloride,
        calcium,
        magnesium,
    );

    let prescription = Prescription {
        components: ComponentVolumes {
            lipid,
            mvi,
            cell_protectant,
            amino_acid,
            sodium_chloride,
            potassium_chloride,
            calcium,
            magnesium,
            potassium_phosphate,
        },
        dextrose,
        fluids: FluidTotals {
            total_volume,
            total_fluid,
            fluid_for_glucose,
            feeds: calc::feeds_volume(dw, input.feed_volume),
            ivf_per_kg,
            ivf: calc::ivf_volume(dw, ivf_per_kg),
            tpn_fluid: calc::tpn_fluid(total_fluid, input.ivm_volume),
            osmolarity,
        },
        glucose: GlucoseParams {
            tpn_glucose,
            dextrose_pct,
        },
        intake: IntakeParams {
            calories: calc::caloric_intake(
                input.protein_req,
                input.lipid_req,
                input.gir,
                input.feed_volume,
                input.feed_type,
                input.fortifier,
            ),
            protein: calc::protein_intake(
                input.protein_req,
                input.feed_volume,
                input.feed_type,
                input.fortifier,
            ),
            cnr: calc::cnr(input.gir, input.lipid_req, input.protein_req),
        },
        ivm: IvmContribution {
            sodium: sodium_from_ivm,
            glucose: calc::glucose_from_ivm(input.dextrose10_ivm),
            potassium_from_phosphate: calc::potassium_from_phosphate(pot_phos_prev, dw),
        },
        rates: InfusionRates {
            syringe1_ml_hr: calc::syringe1_rate(lipid, mvi, cell_protectant),
            total_ml_hr: calc::hourly_rate(total_volume),
        },
    };

    if let Some(field) = prescription.non_finite_field() {
        return Err(TpnError::NonFinite { field });
    }

    Ok(prescription)
}

/// State of the engine's non-reentrancy guard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum EngineState {
    #[default]
    Idle,
    Recalculating,
}

/// Owns the committed prescription and sequences recalculation passes
///
/// The engine is single-threaded and synchronous: one pass runs to
/// completion before another may start. It is the sole writer of the
/// committed prescription; committing replaces the whole snapshot at once
/// and never emits a further change event.
///
/// # Example
///
/// ```
/// use neotpn::prelude::*;
///
/// let mut engine = TpnEngine::new();
/// let order = InputSnapshot::new()
///     .with_dosing_weight(2.0)
///     .with_lipid_req(2.0)
///     .with_protein_req(3.0);
///
/// let prescription = engine.recalculate(&order);
/// assert_eq!(prescription.components.lipid, 20.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TpnEngine {
    state: EngineState,
    committed: Prescription,
}

impl TpnEngine {
    /// Engine with an all-zero committed prescription
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently committed prescription
    pub fn committed(&self) -> &Prescription {
        &self.committed
    }

    /// Run one recalculation pass for an input edit and commit the result
    ///
    /// A request arriving while a pass is in flight is not started; the
    /// committed prescription is returned unchanged. If the pass fails the
    /// failure is logged and the previous prescription retained, so a
    /// caller never observes a partially updated or non-finite state.
    pub fn recalculate(&mut self, input: &InputSnapshot) -> &Prescription {
        if self.state == EngineState::Recalculating {
            return &self.committed;
        }
        self.state = EngineState::Recalculating;

        match recalculate(input, &self.committed) {
            Ok(prescription) => {
                self.committed = prescription;
            }
            Err(e) => {
                tracing::error!(error = %e, "recalculation failed, keeping committed prescription");
            }
        }

        self.state = EngineState::Idle;
        &self.committed
    }

    /// Iterate an unchanged input until the prescription stops changing
    ///
    /// The per-edit path advances the lagged feedback one step per edit;
    /// this drives it to the fixed point in one call. Fails with
    /// [`TpnError::NotSettled`] if successive passes still differ after
    /// `max_passes` iterations.
    pub fn settle(
        &mut self,
        input: &InputSnapshot,
        max_passes: usize,
    ) -> Result<&Prescription, TpnError> {
        for _ in 0..max_passes {
            let next = recalculate(input, &self.committed)?;
            let settled = next.approx_eq(&self.committed, SETTLE_TOL);
            self.committed = next;
            if settled {
                return Ok(&self.committed);
            }
        }
        Err(TpnError::NotSettled { passes: max_passes })
    }
}
