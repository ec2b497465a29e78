//! Scenario tests for the recalculation engine
//!
//! Tests exercise whole passes through the public engine API, including
//! the one-cycle-lagged feedback protocol and its fixed point.

use approx::assert_relative_eq;

use crate::engine::*;
use crate::order::*;

// ============================================================================
// Scenario builders
// ============================================================================

/// Typical preterm order: 2 kg, full TPN, no maintenance fluids
fn typical_order() -> InputSnapshot {
    InputSnapshot::new()
        .with_dosing_weight(2.0)
        .with_fluid_rate(150.0)
        .with_protein_req(3.0)
        .with_lipid_req(2.0)
        .with_gir(6.0)
        .with_sodium_req(3.0)
        .with_potassium_req(2.0)
        .with_calcium_req(4.65)
        .with_magnesium_req(0.4)
        .with_phosphate_req(1.0)
        .with_cell_protectant(true)
        .with_calcium_via_tpn(true)
        .with_sodium_source(SodiumSource::Crl)
}

/// Same order with maintenance fluids running alongside
fn order_with_maintenance() -> InputSnapshot {
    typical_order().with_maintenance_fluids(5.0, 2.0, 3.0, 10.0)
}

// ============================================================================
// Single-pass outputs
// ============================================================================

#[test]
fn test_first_pass_component_volumes() {
    let mut engine = TpnEngine::new();
    let p = engine.recalculate(&typical_order());

    assert_relative_eq!(p.components.lipid, 20.0);
    assert_relative_eq!(p.components.mvi, 2.0);
    assert_relative_eq!(p.components.cell_protectant, 1.0);
    assert_relative_eq!(p.components.amino_acid, 60.0);
    // CRL source: (3 - 0) * 2 / 3
    assert_relative_eq!(p.components.sodium_chloride, 2.0);
    // No phosphate committed yet, so nothing to subtract
    assert_relative_eq!(p.components.potassium_chloride, 2.0);
    assert_relative_eq!(p.components.calcium, 1.0);
    assert_relative_eq!(p.components.magnesium, 0.2);
    assert_relative_eq!(p.components.potassium_phosphate, 2.0 / 93.0);

    // 10% selected: the blend solver resolves nothing
    assert_eq!(p.dextrose.volume, 0.0);
    assert_relative_eq!(p.fluids.total_volume, 88.2, epsilon = 1e-9);
    assert_relative_eq!(p.fluids.total_fluid, 300.0);
    assert_relative_eq!(p.fluids.fluid_for_glucose, 300.0 - 85.0);
    assert_relative_eq!(p.glucose.tpn_glucose, 6.0 * 2.0 * 1.44);
    // First pass reads glucose from the all-zero initial prescription
    assert_eq!(p.glucose.dextrose_pct, 0.0);
}

#[test]
fn test_first_pass_intake_and_rates() {
    let mut engine = TpnEngine::new();
    let p = engine.recalculate(&typical_order());

    assert_relative_eq!(p.intake.calories, 3.0 * 4.0 + 2.0 * 9.0 + 6.0 * 5.0);
    assert_relative_eq!(p.intake.protein, 3.0);
    assert_relative_eq!(p.intake.cnr, 6.25 * (4.9 * 6.0 + 9.0 * 2.0) / 3.0);

    assert_relative_eq!(p.rates.syringe1_ml_hr, 23.0 / 24.0);
    assert_relative_eq!(p.rates.total_ml_hr, 88.2 / 24.0, epsilon = 1e-9);

    let osm_num = 0.26 * 20.0 + 0.885 * 60.0 + 1.027 * 2.0 + 4.0 * 2.0 + 0.555 * 1.0 + 2.78 * 0.2;
    let osm_den = 20.0 + 60.0 + 2.0 + 2.0 + 1.0 + 0.2;
    assert_relative_eq!(p.fluids.osmolarity, osm_num / osm_den * 1000.0);
}

#[test]
fn test_maintenance_fluids_offset_sodium_and_glucose() {
    let mut engine = TpnEngine::new();
    let p = engine.recalculate(&order_with_maintenance());

    let na_from_ivm = (5.0 * 0.031 + 2.0 * 0.077 + 3.0 * 0.154) / 2.0;
    assert_relative_eq!(p.ivm.sodium, na_from_ivm);
    assert_relative_eq!(p.ivm.glucose, 1.0);
    // Sodium already running reduces the NaCl draw
    assert_relative_eq!(
        p.components.sodium_chloride,
        (3.0 - na_from_ivm) * 2.0 / 3.0
    );
    // Glucose already running reduces the TPN delivery
    assert_relative_eq!(p.glucose.tpn_glucose, 6.0 * 2.0 * 1.44 - 1.0);
}

#[test]
fn test_empty_order_is_all_zero_and_finite() {
    let mut engine = TpnEngine::new();
    let p = engine.recalculate(&InputSnapshot::new());

    // Zero dosing weight zeroes every volume
    assert_eq!(p.components.lipid, 0.0);
    assert_eq!(p.components.amino_acid, 0.0);
    assert_eq!(p.components.potassium_chloride, 0.0);
    assert_eq!(p.fluids.total_volume, 0.0);
    // Zero total volume yields exactly zero percentage, never NaN
    assert_eq!(p.glucose.dextrose_pct, 0.0);
    assert_eq!(p.fluids.osmolarity, 0.0);
    assert!(p.to_row().iter().all(|(_, v)| v.is_finite()));
}

// ============================================================================
// Feedback protocol
// ============================================================================

#[test]
fn test_phosphate_feedback_lags_one_pass() {
    let order = typical_order();
    let mut engine = TpnEngine::new();

    let first_kcl = engine.recalculate(&order).components.potassium_chloride;
    let second = engine.recalculate(&order);

    // The phosphate committed by pass 1 is subtracted in pass 2
    let expected = (2.0 - (4.4 * (2.0 / 93.0)) / 2.0) * (2.0 / 2.0);
    assert_relative_eq!(second.components.potassium_chloride, expected);
    assert!(second.components.potassium_chloride < first_kcl);
    assert_relative_eq!(
        second.ivm.potassium_from_phosphate,
        (4.4 * (2.0 / 93.0)) / 2.0
    );
}

#[test]
fn test_glucose_feedback_lags_one_pass() {
    let order = typical_order();
    let mut engine = TpnEngine::new();

    engine.recalculate(&order);
    let second = engine.recalculate(&order).clone();

    // Pass 2 reads pass 1's glucose delivery over its own fresh total;
    // under a constant input pass 2's fresh delivery equals pass 1's
    let total = second.fluids.total_volume;
    assert_relative_eq!(
        second.glucose.dextrose_pct,
        second.glucose.tpn_glucose / total * 100.0
    );
}

#[test]
fn test_constant_input_reaches_fixed_point_by_pass_five() {
    for selection in [
        DextroseSelection::Five,
        DextroseSelection::Ten,
        DextroseSelection::TwentyFive,
        DextroseSelection::Fifty,
    ] {
        let order = order_with_maintenance().with_dextrose(selection);
        let mut engine = TpnEngine::new();

        let mut previous = engine.recalculate(&order).clone();
        let mut settled_at = None;
        for pass in 2..=5 {
            let current = engine.recalculate(&order).clone();
            if current.approx_eq(&previous, 1e-9) {
                settled_at = Some(pass);
                break;
            }
            previous = current;
        }
        assert!(
            settled_at.is_some(),
            "selection {selection} still changing after pass 5"
        );
    }
}

#[test]
fn test_settle_matches_repeated_recalculation() {
    let order = order_with_maintenance().with_dextrose(DextroseSelection::Five);

    let mut iterated = TpnEngine::new();
    for _ in 0..DEFAULT_SETTLE_PASSES {
        iterated.recalculate(&order);
    }

    let mut settled = TpnEngine::new();
    let p = settled
        .settle(&order, DEFAULT_SETTLE_PASSES)
        .expect("should settle")
        .clone();

    assert!(p.approx_eq(iterated.committed(), 1e-9));
}

#[test]
fn test_settled_prescription_is_self_consistent() {
    let order = typical_order();
    let mut engine = TpnEngine::new();
    let p = engine
        .settle(&order, DEFAULT_SETTLE_PASSES)
        .expect("should settle")
        .clone();

    // At the fixed point the lagged percentage agrees with its own total
    assert_relative_eq!(
        p.glucose.dextrose_pct,
        p.glucose.tpn_glucose / p.fluids.total_volume * 100.0,
        epsilon = 1e-9
    );
}

// ============================================================================
// Fail-soft commit
// ============================================================================

#[test]
fn test_non_finite_pass_is_rejected() {
    let bad = typical_order().with_dosing_weight(f64::INFINITY);
    let err = recalculate(&bad, &Prescription::default()).unwrap_err();
    assert!(matches!(err, crate::error::TpnError::NonFinite { .. }));
}

#[test]
fn test_failed_pass_keeps_committed_prescription() {
    let order = typical_order();
    let mut engine = TpnEngine::new();
    let good = engine.recalculate(&order).clone();

    let bad = order.with_dosing_weight(f64::NAN);
    let after = engine.recalculate(&bad);

    assert!(after.approx_eq(&good, 0.0));
}
