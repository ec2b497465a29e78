//! Prescription types: the derived output snapshot and its parameter groups
//!
//! A [`Prescription`] is the complete set of quantities derived by one
//! recalculation pass. Parameters are grouped the way they are prepared on
//! the unit: syringe component volumes, the resolved dextrose blend, fluid
//! totals, glucose handling, nutritional intake, maintenance-fluid
//! contributions, and pump rates.
//!
//! Every field is a finite `f64`; the orchestrator refuses to commit a
//! prescription containing a non-finite value.

use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt};

use crate::order::DextroseSelection;

/// Individual infusion component volumes in mL
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentVolumes {
    /// 20% lipid emulsion
    pub lipid: f64,
    /// Multivitamin infusion, co-administered with lipid
    pub mvi: f64,
    /// Cell-protectant additive
    pub cell_protectant: f64,
    /// Amino acid solution
    pub amino_acid: f64,
    pub sodium_chloride: f64,
    pub potassium_chloride: f64,
    pub calcium: f64,
    pub magnesium: f64,
    /// Potassium phosphate; read back by the next pass's potassium maths
    pub potassium_phosphate: f64,
}

/// The resolved dextrose blend
///
/// `low_volume` belongs to the {5%, 10%} pair, `high_volume` to the
/// {25%, 50%} pair. `volume` is the committed blend volume — the resolved
/// volume of whichever pair holds `selection`, with the other pair
/// contributing zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DextroseBlend {
    pub low_volume: f64,
    pub high_volume: f64,
    /// Volume entering the total, taken from the selected pair
    pub volume: f64,
    /// Selection the blend was resolved under
    pub selection: DextroseSelection,
}

/// Fluid totals and the admixture osmolarity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FluidTotals {
    /// Sum of all component volumes plus the committed dextrose volume
    pub total_volume: f64,
    /// Total fluid volume (dosing weight x fluid rate)
    pub total_fluid: f64,
    /// Fluid left for glucose once the fixed components are drawn up
    pub fluid_for_glucose: f64,
    /// Oral feed volume for the day, mL
    pub feeds: f64,
    /// Intravenous fluid allowance per kg
    pub ivf_per_kg: f64,
    /// Intravenous fluid allowance, mL
    pub ivf: f64,
    /// Fluid available to TPN after maintenance fluids
    pub tpn_fluid: f64,
    /// Weighted osmolarity of the admixture, mOsm/L
    pub osmolarity: f64,
}

/// Glucose delivery figures
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlucoseParams {
    /// Glucose delivered via TPN; read back by the next pass's blend solver
    pub tpn_glucose: f64,
    /// Dextrose percentage of the total volume; read back by the next
    /// pass's blend solver
    pub dextrose_pct: f64,
}

/// Daily nutritional intake
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntakeParams {
    /// Total calories from TPN, feeds, and fortifier
    pub calories: f64,
    /// Total protein from TPN, feeds, and fortifier
    pub protein: f64,
    /// Calorie-to-nitrogen ratio of the non-oral intake
    pub cnr: f64,
}

/// Quantities already delivered by the maintenance fluids
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IvmContribution {
    /// Sodium per kg delivered by the saline maintenance fluids
    pub sodium: f64,
    /// Glucose delivered by the 10% dextrose maintenance fluid
    pub glucose: f64,
    /// Potassium per kg delivered by the potassium phosphate volume
    pub potassium_from_phosphate: f64,
}

/// Pump rates over a 24-hour run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InfusionRates {
    /// Syringe 1 (lipid + MVI + cell-protectant) rate, mL/hr
    pub syringe1_ml_hr: f64,
    /// Whole prescription rate, mL/hr
    pub total_ml_hr: f64,
}

/// Complete derived output snapshot of one recalculation pass
///
/// Produced by [`recalculate`](crate::engine::recalculate) and committed by
/// [`TpnEngine`](crate::engine::TpnEngine); the committed prescription is
/// the feedback source for the next pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
    pub components: ComponentVolumes,
    pub dextrose: DextroseBlend,
    pub fluids: FluidTotals,
    pub glucose: GlucoseParams,
    pub intake: IntakeParams,
    pub ivm: IvmContribution,
    pub rates: InfusionRates,
}

impl Prescription {
    /// Flatten to ordered name-value pairs
    ///
    /// The ordering follows preparation convention: syringe components,
    /// dextrose blend, fluid totals, glucose, intake, maintenance-fluid
    /// contributions, rates.
    pub fn to_row(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("lipid", self.components.lipid),
            ("mvi", self.components.mvi),
            ("cell_protectant", self.components.cell_protectant),
            ("amino_acid", self.components.amino_acid),
            ("sodium_chloride", self.components.sodium_chloride),
            ("potassium_chloride", self.components.potassium_chloride),
            ("calcium", self.components.calcium),
            ("magnesium", self.components.magnesium),
            ("potassium_phosphate", self.components.potassium_phosphate),
            ("dextrose_low", self.dextrose.low_volume),
            ("dextrose_high", self.dextrose.high_volume),
            ("dextrose_volume", self.dextrose.volume),
            ("total_volume", self.fluids.total_volume),
            ("total_fluid", self.fluids.total_fluid),
            ("fluid_for_glucose", self.fluids.fluid_for_glucose),
            ("feeds", self.fluids.feeds),
            ("ivf_per_kg", self.fluids.ivf_per_kg),
            ("ivf", self.fluids.ivf),
            ("tpn_fluid", self.fluids.tpn_fluid),
            ("osmolarity", self.fluids.osmolarity),
            ("tpn_glucose", self.glucose.tpn_glucose),
            ("dextrose_pct", self.glucose.dextrose_pct),
            ("calories", self.intake.calories),
            ("protein", self.intake.protein),
            ("cnr", self.intake.cnr),
            ("sodium_from_ivm", self.ivm.sodium),
            ("glucose_from_ivm", self.ivm.glucose),
            ("potassium_from_phosphate", self.ivm.potassium_from_phosphate),
            ("syringe1_ml_hr", self.rates.syringe1_ml_hr),
            ("total_ml_hr", self.rates.total_ml_hr),
        ]
    }

    /// Flatten to parameter name-value pairs for export
    pub fn to_params(&self) -> HashMap<&'static str, f64> {
        self.to_row().into_iter().collect()
    }

    /// Name of the first non-finite field, if any
    pub(crate) fn non_finite_field(&self) -> Option<&'static str> {
        self.to_row()
            .into_iter()
            .find(|(_, v)| !v.is_finite())
            .map(|(name, _)| name)
    }

    /// Whether every field of `other` agrees with `self` within `tol`
    ///
    /// Used to detect the fixed point when iterating a constant input.
    pub fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        self.dextrose.selection == other.dextrose.selection
            && self
                .to_row()
                .into_iter()
                .zip(other.to_row())
                .all(|((_, a), (_, b))| (a - b).abs() <= tol)
    }
}

impl fmt::Display for Prescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "TPN Prescription")?;
        writeln!(f, "  Syringe 1")?;
        writeln!(f, "    Lipid:            {:>8.2} mL", self.components.lipid)?;
        writeln!(f, "    MVI:              {:>8.2} mL", self.components.mvi)?;
        writeln!(
            f,
            "    Cell-protectant:  {:>8.2} mL",
            self.components.cell_protectant
        )?;
        writeln!(f, "  Syringe 2")?;
        writeln!(
            f,
            "    Amino acid:       {:>8.2} mL",
            self.components.amino_acid
        )?;
        writeln!(
            f,
            "    NaCl:             {:>8.2} mL",
            self.components.sodium_chloride
        )?;
        writeln!(
            f,
            "    KCl:              {:>8.2} mL",
            self.components.potassium_chloride
        )?;
        writeln!(f, "    Calcium:          {:>8.2} mL", self.components.calcium)?;
        writeln!(
            f,
            "    Magnesium:        {:>8.2} mL",
            self.components.magnesium
        )?;
        writeln!(
            f,
            "    Dextrose ({}):  {:>8.2} mL",
            self.dextrose.selection, self.dextrose.volume
        )?;
        writeln!(f, "  Totals")?;
        writeln!(
            f,
            "    Total volume:     {:>8.2} mL ({:.2} mL/hr)",
            self.fluids.total_volume, self.rates.total_ml_hr
        )?;
        writeln!(
            f,
            "    Osmolarity:       {:>8.2} mOsm/L",
            self.fluids.osmolarity
        )?;
        writeln!(
            f,
            "    Dextrose:         {:>8.2} %",
            self.glucose.dextrose_pct
        )?;
        writeln!(
            f,
            "    Calories:         {:>8.2}    Protein: {:.2}",
            self.intake.calories, self.intake.protein
        )?;
        Ok(())
    }
}
