//! TPN calculation engine
//!
//! This module derives a complete parenteral-nutrition prescription from a
//! clinical order. It integrates with the order types
//! ([`crate::order::InputSnapshot`]) and produces a [`Prescription`] per
//! recalculation pass.
//!
//! # Design Philosophy
//!
//! - **Pure**: one entry point, [`recalculate`], fully determined by the
//!   current order and the previously committed prescription
//! - **Total**: every arithmetic edge case is zero-guarded; a committed
//!   prescription never contains a non-finite value
//! - **Lagged**: circular quantities are read from the previous pass, so
//!   each pass is a single sweep with no in-pass iteration
//!
//! # Key Outputs
//!
//! | Output | Description |
//! |--------|-------------|
//! | Component volumes | Lipid, MVI, cell-protectant, amino acid, NaCl, KCl, Ca, Mg, KPO4 |
//! | Dextrose blend | Low/high pair volumes and the committed blend volume |
//! | Total volume | Admixture total including the dextrose blend |
//! | TFV | Total fluid volume for the day |
//! | Osmolarity | Weighted osmolarity of the admixture, mOsm/L |
//! | TPN glucose | Glucose delivered via TPN |
//! | Dextrose % | Dextrose percentage of the total volume |
//! | Calories / protein | Daily intake including feeds and fortifier |
//! | CNR | Calorie-to-nitrogen ratio of the non-oral intake |
//! | IVM contributions | Sodium, glucose, and phosphate-potassium already running |
//!
//! # Usage
//!
//! ```rust
//! use neotpn::prelude::*;
//!
//! let order = InputSnapshot::new()
//!     .with_dosing_weight(2.0)
//!     .with_fluid_rate(150.0)
//!     .with_lipid_req(2.0)
//!     .with_protein_req(3.0)
//!     .with_gir(6.0);
//!
//! let mut engine = TpnEngine::new();
//! let prescription = engine.recalculate(&order);
//! assert_eq!(prescription.components.lipid, 20.0);
//! assert_eq!(prescription.components.amino_acid, 60.0);
//! ```
//!
//! Editing and recalculating repeatedly under the same order converges to
//! a fixed point; [`TpnEngine::settle`] reaches it in one call.

pub mod calc;

mod dextrose;
mod recalc;
mod types;
mod validate;

#[cfg(test)]
mod tests;

pub use dextrose::resolve_blend;
pub use recalc::{recalculate, TpnEngine, DEFAULT_SETTLE_PASSES};
pub use types::{
    ComponentVolumes, DextroseBlend, FluidTotals, GlucoseParams, InfusionRates, IntakeParams,
    IvmContribution, Prescription,
};
pub use validate::{resolve_selection, validate_ivm, Warning};
