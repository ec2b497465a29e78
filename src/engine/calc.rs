//! Pure calculation functions for prescription quantities
//!
//! This module contains stateless functions that each compute one derived
//! quantity from raw order fields and, where the feedback protocol demands
//! it, from values committed by the previous pass. All functions are total:
//! every division-by-zero path returns 0 rather than a non-finite value.

use crate::order::{FeedType, FortifierStrength, SodiumSource};

// ============================================================================
// Component volumes
// ============================================================================

/// Volume of 20% lipid emulsion
#[inline]
pub fn lipid_volume(dosing_weight: f64, lipid_req: f64) -> f64 {
    5.0 * dosing_weight * lipid_req
}

/// Multivitamin volume; runs only when lipid runs
#[inline]
pub fn mvi_volume(dosing_weight: f64, lipid_req: f64) -> f64 {
    if lipid_req > 0.0 {
        dosing_weight
    } else {
        0.0
    }
}

/// Cell-protectant additive volume
#[inline]
pub fn cell_protectant_volume(dosing_weight: f64, ordered: bool) -> f64 {
    if ordered {
        0.5 * dosing_weight
    } else {
        0.0
    }
}

/// Amino acid solution volume
#[inline]
pub fn amino_acid_volume(dosing_weight: f64, protein_req: f64) -> f64 {
    10.0 * dosing_weight * protein_req
}

/// Sodium chloride volume
///
/// The sodium already delivered by the maintenance fluids is subtracted
/// from the requirement before scaling; the scaling factor depends on the
/// stock the sodium comes from.
#[inline]
pub fn sodium_chloride_volume(
    dosing_weight: f64,
    sodium_req: f64,
    source: SodiumSource,
    sodium_from_ivm: f64,
) -> f64 {
    let adjusted = sodium_req - sodium_from_ivm;
    match source {
        SodiumSource::Crl => (adjusted * dosing_weight) / 3.0,
        SodiumSource::HypertonicSaline => adjusted * dosing_weight * 2.0,
    }
}

/// Potassium chloride volume
///
/// `pot_phos_prev` is the potassium phosphate volume committed by the
/// previous pass; the potassium it carries is subtracted from the target.
/// Zero dosing weight yields zero volume.
#[inline]
pub fn potassium_chloride_volume(dosing_weight: f64, potassium_req: f64, pot_phos_prev: f64) -> f64 {
    if dosing_weight == 0.0 {
        return 0.0;
    }
    (potassium_req - (4.4 * pot_phos_prev) / dosing_weight) * (dosing_weight / 2.0)
}

/// Calcium volume, only when calcium runs through the TPN line
#[inline]
pub fn calcium_volume(dosing_weight: f64, calcium_req: f64, via_tpn: bool) -> f64 {
    if via_tpn {
        (dosing_weight * calcium_req) / 9.3
    } else {
        0.0
    }
}

/// Magnesium sulphate volume
#[inline]
pub fn magnesium_volume(dosing_weight: f64, magnesium_req: f64) -> f64 {
    (magnesium_req * dosing_weight) / 4.0
}

/// Potassium phosphate volume
#[inline]
pub fn potassium_phosphate_volume(dosing_weight: f64, phosphate_req: f64) -> f64 {
    (phosphate_req * dosing_weight) / 93.0
}

/// Total admixture volume: the eight drawn-up components plus the committed
/// dextrose blend volume (potassium phosphate runs separately)
#[allow(clippy::too_many_arguments)]
#[inline]
pub fn total_volume(
    lipid: f64,
    mvi: f64,
    cell_protectant: f64,
    amino_acid: f64,
    sodium_chloride: f64,
    potassium_chloride: f64,
    calcium: f64,
    magnesium: f64,
    dextrose_volume: f64,
) -> f64 {
    lipid
        + mvi
        + cell_protectant
        + amino_acid
        + sodium_chloride
        + potassium_chloride
        + calcium
        + magnesium
        + dextrose_volume
}

// ============================================================================
// Fluid totals
// ============================================================================

/// Total fluid volume for the day
#[inline]
pub fn total_fluid_volume(dosing_weight: f64, fluid_rate: f64) -> f64 {
    dosing_weight * fluid_rate
}

/// Fluid left for glucose once the fixed components are drawn up
#[inline]
pub fn fluid_for_glucose(
    total_fluid: f64,
    lipid: f64,
    mvi: f64,
    cell_protectant: f64,
    amino_acid: f64,
    sodium_chloride: f64,
) -> f64 {
    total_fluid - (lipid + mvi + cell_protectant + amino_acid + sodium_chloride)
}

/// Oral feed volume for the day
#[inline]
pub fn feeds_volume(dosing_weight: f64, feed_volume: f64) -> f64 {
    dosing_weight * feed_volume
}

/// Intravenous fluid allowance per kg
#[inline]
pub fn ivf_per_kg(fluid_rate: f64, feed_volume: f64) -> f64 {
    fluid_rate - feed_volume
}

/// Intravenous fluid allowance
#[inline]
pub fn ivf_volume(dosing_weight: f64, ivf_per_kg: f64) -> f64 {
    dosing_weight * ivf_per_kg
}

/// Fluid available to TPN after maintenance fluids
#[inline]
pub fn tpn_fluid(total_fluid: f64, ivm_volume: f64) -> f64 {
    total_fluid - ivm_volume
}

// ============================================================================
// Glucose
// ============================================================================

/// Glucose delivered via TPN
///
/// The glucose already running in the 10% dextrose maintenance fluid is
/// subtracted from the target delivery.
#[inline]
pub fn tpn_glucose(gir: f64, dosing_weight: f64, dextrose10_ivm: f64) -> f64 {
    gir * dosing_weight * 1.44 - dextrose10_ivm * 0.1
}

/// Dextrose percentage of the total volume
///
/// `tpn_glucose_prev` is the glucose delivery committed by the previous
/// pass (feedback protocol). Zero or negative total volume yields 0.
#[inline]
pub fn dextrose_percentage(tpn_glucose_prev: f64, total_volume: f64) -> f64 {
    if total_volume > 0.0 {
        (tpn_glucose_prev / total_volume) * 100.0
    } else {
        0.0
    }
}

// ============================================================================
// Admixture properties
// ============================================================================

/// Weighted osmolarity of the admixture, mOsm/L
///
/// Weighted mean of the six osmotically active component volumes, scaled
/// to a litre. An empty admixture (denominator <= 0) yields 0.
pub fn osmolarity(
    lipid: f64,
    amino_acid: f64,
    sodium_chloride: f64,
    potassium_chloride: f64,
    calcium: f64,
    magnesium: f64,
) -> f64 {
    let numerator = 0.26 * lipid
        + 0.885 * amino_acid
        + 1.027 * sodium_chloride
        + 4.0 * potassium_chloride
        + 0.555 * calcium
        + 2.78 * magnesium;

    let denominator =
        lipid + amino_acid + sodium_chloride + potassium_chloride + calcium + magnesium;

    if denominator > 0.0 {
        (numerator / denominator) * 1000.0
    } else {
        0.0
    }
}

// ============================================================================
// Nutritional intake
// ============================================================================

/// Total calories for the day from TPN, feeds, and fortifier
#[inline]
pub fn caloric_intake(
    protein_req: f64,
    lipid_req: f64,
    gir: f64,
    feed_volume: f64,
    feed_type: FeedType,
    fortifier: FortifierStrength,
) -> f64 {
    protein_req * 4.0
        + lipid_req * 9.0
        + gir * 5.0
        + feed_volume * feed_type.calories_per_ml()
        + feed_volume * fortifier.calories_per_ml()
}

/// Total protein for the day from TPN, feeds, and fortifier
#[inline]
pub fn protein_intake(
    protein_req: f64,
    feed_volume: f64,
    feed_type: FeedType,
    fortifier: FortifierStrength,
) -> f64 {
    protein_req + feed_volume * feed_type.protein_per_ml() + feed_volume * fortifier.protein_per_ml()
}

/// Calorie-to-nitrogen ratio of the non-oral intake
///
/// Zero or negative protein requirement yields 0.
#[inline]
pub fn cnr(gir: f64, lipid_req: f64, protein_req: f64) -> f64 {
    if protein_req > 0.0 {
        (6.25 * (4.9 * gir + 9.0 * lipid_req)) / protein_req
    } else {
        0.0
    }
}

// ============================================================================
// Maintenance-fluid contributions
// ============================================================================

/// Sodium per kg delivered by the saline maintenance fluids
///
/// Zero dosing weight divides by 1 instead, so an empty order still yields
/// a finite (absolute) figure.
#[inline]
pub fn sodium_from_ivm(n5: f64, n2: f64, ns: f64, dosing_weight: f64) -> f64 {
    let divisor = if dosing_weight == 0.0 {
        1.0
    } else {
        dosing_weight
    };
    (n5 * 0.031 + n2 * 0.077 + ns * 0.154) / divisor
}

/// Glucose delivered by the 10% dextrose maintenance fluid
#[inline]
pub fn glucose_from_ivm(dextrose10_ivm: f64) -> f64 {
    dextrose10_ivm * 0.1
}

/// Potassium per kg delivered by a potassium phosphate volume
///
/// Zero dosing weight yields 0.
#[inline]
pub fn potassium_from_phosphate(pot_phos: f64, dosing_weight: f64) -> f64 {
    if dosing_weight == 0.0 {
        0.0
    } else {
        (4.4 * pot_phos) / dosing_weight
    }
}

// ============================================================================
// Pump rates
// ============================================================================

/// Syringe 1 (lipid + MVI + cell-protectant) rate over a 24-hour run
#[inline]
pub fn syringe1_rate(lipid: f64, mvi: f64, cell_protectant: f64) -> f64 {
    (lipid + mvi + cell_protectant) / 24.0
}

/// Hourly rate of a volume run over 24 hours
#[inline]
pub fn hourly_rate(volume: f64) -> f64 {
    volume / 24.0
}

// ============================================================================
// Tests
// ============================================================================
